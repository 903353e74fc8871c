pub mod benchmarking;
pub mod config;
pub mod error;
pub mod telemetry;
