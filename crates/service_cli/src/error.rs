//! CLI error types

use adapter_loader::LoaderError;
use merton_core::types::CalibrationFailure;
use thiserror::Error;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Data loading or result persistence error
    #[error("Data error: {0}")]
    Loader(#[from] LoaderError),

    /// Single-point calibration failed
    #[error("Calibration error: {0}")]
    Calibration(#[from] CalibrationFailure),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Thread pool could not be configured
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Invalid argument or setting
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
