//! # Eco Common Library
//!
//! Shared code for the eco-score workspace:
//! - Error types
//! - TOML configuration loading and path resolution
//! - Tracing subscriber set-up

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
