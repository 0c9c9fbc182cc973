//! Error types for eco-score
//!
//! Start-up failures (config, tables, model bundle) are typed errors.
//! Classifier failures at estimation time are caught by the score engine
//! and degrade to a rule-based result.

use std::path::PathBuf;
use thiserror::Error;

/// Model bundle loading/validation error
#[derive(Debug, Error)]
pub enum ModelError {
    /// Bundle file could not be read
    #[error("Read model bundle {path} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bundle is not valid JSON for the expected layout
    #[error("Model bundle JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Declared feature order differs from the encoder's
    #[error("Feature order mismatch: bundle declares {found:?}, expected {expected:?}")]
    FeatureOrder {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// A category encoder has no classes
    #[error("Encoder '{0}' has no classes")]
    EmptyEncoder(String),

    /// Classifier parameters have inconsistent dimensions
    #[error("Model shape mismatch: {0}")]
    ShapeMismatch(String),
}

/// Runtime classifier failure
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// Feature vector contains NaN or infinity
    #[error("Non-finite feature value at position {0}")]
    NonFiniteFeature(usize),

    /// Any other failure reported by a classifier implementation
    #[error("Classifier failed: {0}")]
    Failed(String),
}

/// Start-up error covering configuration, tables and model loading
#[derive(Debug, Error)]
pub enum StartupError {
    /// eco-common error (config, tables TOML)
    #[error(transparent)]
    Common(#[from] eco_common::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}
