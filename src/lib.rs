pub mod app;
pub mod clock;
pub mod cluster;
pub mod config;
pub mod constants;
pub mod error;
pub mod infra;
pub mod logging;
pub mod parser;
pub mod pipeline;
pub mod resample;
pub mod schedule;
pub mod seeds;
pub mod storage;
pub mod types;

pub use error::{Result, ScraperError};
