//! Model bundle loading
//!
//! A bundle is one JSON file carrying the classifier parameters and the
//! vocabularies it was trained with:
//!
//! ```json
//! {
//!   "feature_order": ["material", "transport", "recyclability", "origin", "weight_log", "weight_bin"],
//!   "encoders": {
//!     "material": ["Aluminium", "Other", "Plastic"],
//!     "transport": ["Air", "Land", "Ship"],
//!     "recyclability": ["High", "Low", "Medium"],
//!     "origin": ["China", "Other", "Uk"],
//!     "label": ["A", "B", "C"]
//!   },
//!   "model": {
//!     "kind": "softmax",
//!     "coefficients": [[...6 values...], ...],
//!     "intercepts": [...],
//!     "feature_importances": [...6 values...]
//!   }
//! }
//! ```
//!
//! Training-side names such as `material_encoded` or `recycle_encoded` are
//! accepted in `feature_order`.

use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::error::ModelError;
use crate::features::{CategoryEncoderSet, FEATURE_NAMES};
use crate::scoring::{ScoringModel, SoftmaxClassifier};

#[derive(Debug, Deserialize)]
struct ModelBundleFile {
    feature_order: Vec<String>,
    encoders: CategoryEncoderSet,
    model: ModelParams,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ModelParams {
    Softmax {
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
        feature_importances: Vec<f64>,
    },
}

/// Map a training-side column name onto the canonical feature name
fn canonical_feature_name(name: &str) -> String {
    let name = name.trim();
    let base = name.strip_suffix("_encoded").unwrap_or(name);
    match base {
        "recycle" => "recyclability".to_string(),
        other => other.to_string(),
    }
}

/// Parse and validate a bundle from JSON text
pub fn parse_model_bundle(json: &str) -> Result<ScoringModel, ModelError> {
    let bundle: ModelBundleFile = serde_json::from_str(json)?;

    let found: Vec<String> = bundle
        .feature_order
        .iter()
        .map(|n| canonical_feature_name(n))
        .collect();
    if found != FEATURE_NAMES {
        return Err(ModelError::FeatureOrder {
            expected: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            found: bundle.feature_order,
        });
    }

    for (name, encoder) in bundle.encoders.all() {
        if encoder.is_empty() {
            return Err(ModelError::EmptyEncoder(name.to_string()));
        }
    }

    let classifier = match bundle.model {
        ModelParams::Softmax {
            coefficients,
            intercepts,
            feature_importances,
        } => SoftmaxClassifier::new(coefficients, intercepts, feature_importances)?,
    };

    if classifier.class_count() != bundle.encoders.label.len() {
        return Err(ModelError::ShapeMismatch(format!(
            "model has {} classes but label encoder has {}",
            classifier.class_count(),
            bundle.encoders.label.len()
        )));
    }

    Ok(ScoringModel::new(bundle.encoders, Box::new(classifier)))
}

/// Read, parse and validate a bundle file
pub fn load_model_bundle(path: &Path) -> Result<ScoringModel, ModelError> {
    let json = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let model = parse_model_bundle(&json)?;

    info!(
        "Model bundle loaded from {} ({} grade classes, {} materials, {} origins)",
        path.display(),
        model.encoders.label.len(),
        model.encoders.material.len(),
        model.encoders.origin.len()
    );
    Ok(model)
}
