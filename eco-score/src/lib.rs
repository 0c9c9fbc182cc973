//! eco-score library interface
//!
//! Resolves product attributes from trust-ranked candidates and scores them
//! with a rule ladder and an optional classifier.

pub mod config;
pub mod error;
pub mod features; // Categorical encoding for the classifier
pub mod fusion; // Candidate builders and attribute resolver
pub mod materials;
pub mod model; // Model bundle loading
pub mod pipeline;
pub mod scoring;
pub mod tables;
pub mod transport;
pub mod types;
pub mod utils;

pub use crate::error::{ClassifierError, ModelError, StartupError};
pub use crate::pipeline::{Estimate, EstimationPipeline, ProductInput};
