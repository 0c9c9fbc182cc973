//! eco-score - product eco-score estimator
//!
//! Reads one product (or an array of products) as JSON, prints the estimate
//! JSON to stdout. Logs go to stderr.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use eco_common::config::{resolve_config, write_toml_config};
use eco_common::logging::init_tracing;
use eco_score::config::build_pipeline;
use eco_score::ProductInput;

/// Command-line arguments for eco-score
#[derive(Parser, Debug)]
#[command(name = "eco-score")]
#[command(about = "Estimate the eco grade of a product")]
#[command(version)]
struct Args {
    /// Config file (TOML); falls back to ECO_SCORE_CONFIG, then the platform config dir
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model bundle (JSON); rule-based grades when absent
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Tables override file (TOML)
    #[arg(short, long)]
    tables: Option<PathBuf>,

    /// Product JSON file; stdin when absent or "-"
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,

    /// Write the effective config to this path and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InputDocument {
    // Items decode one by one so a bad product only fails itself
    Batch(Vec<serde_json::Value>),
    Single(Box<ProductInput>),
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path.filter(|p| p.as_os_str() != "-") {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read input from stdin")?;
            Ok(buffer)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Config resolves before tracing exists; its own logs are dropped
    let config = resolve_config(args.config.as_deref()).context("Failed to load config")?;
    init_tracing(&config.logging).context("Failed to initialize logging")?;

    info!(
        "Starting eco-score {} ({}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_PROFILE")
    );

    if let Some(target) = &args.write_config {
        write_toml_config(&config, target)
            .with_context(|| format!("Failed to write config to {}", target.display()))?;
        info!("Config written to {}", target.display());
        return Ok(());
    }

    let pipeline = build_pipeline(&config, args.model.as_deref(), args.tables.as_deref())
        .context("Failed to initialize estimation pipeline")?;

    let text = read_input(args.input.as_ref())?;
    let document: InputDocument =
        serde_json::from_str(&text).context("Input is not a product JSON object or array")?;

    let output = match document {
        InputDocument::Single(input) => serde_json::to_value(pipeline.estimate(&input))?,
        InputDocument::Batch(items) => {
            info!("Estimating {} products", items.len());
            let results = items
                .into_iter()
                .enumerate()
                .map(|(index, item)| match serde_json::from_value::<ProductInput>(item) {
                    Ok(input) => serde_json::to_value(pipeline.estimate(&input)),
                    Err(e) => {
                        warn!("Skipping product {}: {}", index, e);
                        Ok(json!({ "error": format!("Invalid product: {}", e) }))
                    }
                })
                .collect::<serde_json::Result<Vec<_>>>()?;
            serde_json::Value::Array(results)
        }
    };

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);
    Ok(())
}
