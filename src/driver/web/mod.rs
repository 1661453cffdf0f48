pub mod driver;
pub mod trace;

pub use driver::PlaywrightAutomation;
pub use trace::TraceRecorder;
