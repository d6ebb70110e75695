pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod logging;
pub mod quiz;
pub mod report;
pub mod store;
pub mod types;
