pub mod driver;
pub mod error;
pub mod pages;
pub mod report;
pub mod runner;
pub mod suite;
pub mod utils;

// Re-export common items
pub use error::FixtureError;
pub use report::generate_report;
pub use runner::fixture::Fixture;
pub use runner::run_suite;
