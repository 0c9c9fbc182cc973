//! Common error types for the eco-score workspace

use thiserror::Error;

/// Common result type for eco-score start-up operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading configuration and static tables
///
/// The estimation path itself never returns these; they only surface at
/// process start-up, before any request is handled.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML document could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Invalid value supplied by the operator
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
