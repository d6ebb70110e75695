pub mod answer;
pub mod bucket;
pub mod config;
pub mod formula;
pub mod report;
pub mod scoring;
pub mod weights;
