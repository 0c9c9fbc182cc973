//! Start-up resolution for eco-score
//!
//! Model and tables paths resolve with CLI → ENV → TOML priority, then the
//! pipeline is assembled once and shared.

use eco_common::config::EcoConfig;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::StartupError;
use crate::model::load_model_bundle;
use crate::pipeline::EstimationPipeline;
use crate::tables::load_tables;

/// Environment variable naming the model bundle
pub const MODEL_ENV_VAR: &str = "ECO_SCORE_MODEL";

/// Environment variable naming the tables override file
pub const TABLES_ENV_VAR: &str = "ECO_SCORE_TABLES";

/// Resolve a path setting from 3 tiers
///
/// **Priority:** CLI → ENV → TOML. Blank values are ignored.
fn resolve_path(
    setting: &str,
    cli_arg: Option<&Path>,
    env_var: &str,
    toml_value: Option<&Path>,
) -> Option<PathBuf> {
    let cli = cli_arg.filter(|p| is_valid_path(p)).map(Path::to_path_buf);
    let env = std::env::var(env_var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);
    let toml = toml_value.filter(|p| is_valid_path(p)).map(Path::to_path_buf);

    let mut sources = Vec::new();
    if cli.is_some() {
        sources.push("command line");
    }
    if env.is_some() {
        sources.push("environment");
    }
    if toml.is_some() {
        sources.push("TOML");
    }

    // Warn if multiple sources (potential misconfiguration)
    if sources.len() > 1 {
        warn!(
            "{} path found in multiple sources: {}. Using {} (highest priority).",
            setting,
            sources.join(", "),
            sources[0]
        );
    }

    let resolved = cli.or(env).or(toml);
    match (&resolved, sources.first()) {
        (Some(path), Some(source)) => {
            info!("{} path from {}: {}", setting, source, path.display())
        }
        _ => info!("No {} path configured", setting),
    }
    resolved
}

fn is_valid_path(path: &Path) -> bool {
    !path.as_os_str().is_empty()
}

/// Model bundle path: CLI → `ECO_SCORE_MODEL` → `model_path` in TOML
pub fn resolve_model_path(cli_arg: Option<&Path>, config: &EcoConfig) -> Option<PathBuf> {
    resolve_path("Model bundle", cli_arg, MODEL_ENV_VAR, config.model_path.as_deref())
}

/// Tables override path: CLI → `ECO_SCORE_TABLES` → `tables_path` in TOML
pub fn resolve_tables_path(cli_arg: Option<&Path>, config: &EcoConfig) -> Option<PathBuf> {
    resolve_path("Tables", cli_arg, TABLES_ENV_VAR, config.tables_path.as_deref())
}

/// Load tables and (optionally) the model, and assemble the pipeline
///
/// Without a model bundle the pipeline scores rule-based only.
pub fn build_pipeline(
    config: &EcoConfig,
    cli_model: Option<&Path>,
    cli_tables: Option<&Path>,
) -> Result<EstimationPipeline, StartupError> {
    let tables_path = resolve_tables_path(cli_tables, config);
    let tables = load_tables(tables_path.as_deref())?;

    let destination = &config.estimation.destination_hub;
    if tables.origins.hub(destination).is_none() {
        return Err(eco_common::Error::InvalidInput(format!(
            "destination_hub '{}' has no hub entry (add it under [hubs] in the tables file)",
            destination
        ))
        .into());
    }

    let model = match resolve_model_path(cli_model, config) {
        Some(path) => Some(Arc::new(load_model_bundle(&path)?)),
        None => {
            warn!("No model bundle configured; grades will be rule-based");
            None
        }
    };

    Ok(EstimationPipeline::new(
        Arc::new(tables),
        model,
        config.estimation.clone(),
    ))
}
