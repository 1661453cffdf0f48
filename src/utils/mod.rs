pub mod config;
pub mod data_reader;
pub mod random_data;
