//! Configuration loading and config-file resolution
//!
//! Config file resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`ECO_SCORE_CONFIG`)
//! 3. Platform config directory (`<config_dir>/eco-score/config.toml`)
//! 4. Built-in defaults (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "ECO_SCORE_CONFIG";

/// Directory name under the platform config dir
pub const APP_DIR_NAME: &str = "eco-score";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcoConfig {
    /// Path to the JSON model bundle (classifier + encoders)
    pub model_path: Option<PathBuf>,

    /// Path to a TOML file overriding the built-in lookup tables
    pub tables_path: Option<PathBuf>,

    pub logging: LoggingConfig,

    pub estimation: EstimationConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset (e.g. "info", "eco_score=debug")
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Weight binning policy for the sixth feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightBinning {
    /// Training-time bins: <0.5, <2, <10, else
    #[default]
    Standard,
    /// Quick-estimate bins: >0.5 → 2, >0.1 → 1, else 0
    Coarse,
}

/// Which carbon estimator the pipeline uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarbonMethod {
    /// weight × transport emission factor × distance
    #[default]
    TransportDistance,
    /// weight × material CO2 intensity
    MaterialIntensity,
}

/// Estimation behaviour knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationConfig {
    pub weight_binning: WeightBinning,
    pub carbon_method: CarbonMethod,
    /// Add a 5% packaging allowance to the product weight
    pub include_packaging: bool,
    /// Origin-hub key used as destination when distance is not supplied
    pub destination_hub: String,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            weight_binning: WeightBinning::Standard,
            carbon_method: CarbonMethod::TransportDistance,
            include_packaging: false,
            destination_hub: "UK".to_string(),
        }
    }
}

/// Resolve which config file to read, if any
///
/// Returns `None` when no CLI argument or env var is given and no file
/// exists in the platform config directory.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        debug!("Config path from command line: {}", path.display());
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            debug!("Config path from {}: {}", CONFIG_ENV_VAR, path);
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config directory
    default_config_path().filter(|p| p.exists())
}

/// Platform default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// Load and parse a TOML config file
pub fn load_config(path: &Path) -> Result<EcoConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Read config {} failed: {}", path.display(), e))
    })?;
    let config: EcoConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Resolve and load configuration, falling back to built-in defaults
///
/// An explicitly named file (CLI or env var) that cannot be read is an error;
/// only the absence of any config file yields defaults.
pub fn resolve_config(cli_arg: Option<&Path>) -> Result<EcoConfig> {
    match resolve_config_path(cli_arg) {
        Some(path) => {
            let config = load_config(&path)?;
            info!("Configuration loaded from {}", path.display());
            Ok(config)
        }
        None => {
            info!("No config file found, using built-in defaults");
            Ok(EcoConfig::default())
        }
    }
}

/// Write config as TOML (temp file + rename)
pub fn write_toml_config(config: &EcoConfig, target: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize config failed: {}", e)))?;

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let temp = target.with_extension("toml.tmp");
    std::fs::write(&temp, content)?;
    std::fs::rename(&temp, target)?;
    Ok(())
}
