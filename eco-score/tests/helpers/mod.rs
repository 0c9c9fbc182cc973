//! Test Helper Utilities
//!
//! Shared fixtures for eco-score integration tests

#![allow(dead_code)]

use eco_score::error::ClassifierError;
use eco_score::features::{CategoryEncoder, CategoryEncoderSet, FeatureVector};
use eco_score::model::parse_model_bundle;
use eco_score::scoring::{EcoClassifier, ScoringModel};
use eco_score::types::{
    Recyclability, RecyclabilityLevel, ResolutionConfidence, ResolutionResult,
    ResolvedProductAttributes, TransportMode,
};

/// Five-grade softmax bundle whose intercepts favour "B"
pub const SAMPLE_BUNDLE: &str = r#"{
    "feature_order": [
        "material_encoded", "transport_encoded", "recycle_encoded",
        "origin_encoded", "weight_log", "weight_bin_encoded"
    ],
    "encoders": {
        "material": ["Aluminium", "Other", "Plastic"],
        "transport": ["Air", "Land", "Ship"],
        "recyclability": ["High", "Low", "Medium", "Very Low"],
        "origin": ["China", "Other", "Uk"],
        "label": ["A", "B", "C", "D", "F"]
    },
    "model": {
        "kind": "softmax",
        "coefficients": [
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        ],
        "intercepts": [0.0, 1.0, 0.0, 0.0, 0.0],
        "feature_importances": [0.3, 0.2, 0.1, 0.1, 0.2, 0.1]
    }
}"#;

pub fn sample_model() -> ScoringModel {
    parse_model_bundle(SAMPLE_BUNDLE).unwrap()
}

pub fn sample_encoders() -> CategoryEncoderSet {
    CategoryEncoderSet {
        material: CategoryEncoder::new(["Aluminium", "Other", "Plastic"]),
        transport: CategoryEncoder::new(["Air", "Land", "Ship"]),
        recyclability: CategoryEncoder::new(["High", "Low", "Medium", "Very Low"]),
        origin: CategoryEncoder::new(["China", "Other", "Uk"]),
        label: CategoryEncoder::new(["A", "B", "C", "D", "F"]),
    }
}

fn resolved(value: &str, source: &str) -> ResolutionResult {
    ResolutionResult {
        value: value.to_string(),
        confidence: ResolutionConfidence::Medium,
        source: source.to_string(),
        reasoning: "fixture".to_string(),
    }
}

/// Attributes for a product shipped from China to the UK
pub fn sample_attributes(weight_kg: f64, distance_km: f64) -> ResolvedProductAttributes {
    let transport_mode = TransportMode::for_distance(distance_km);
    ResolvedProductAttributes {
        title: "Fixture Kettle".to_string(),
        origin: resolved("China", "user_input"),
        material: resolved("Aluminium", "user_input"),
        packaging: resolved("Plastic", "category_default"),
        materials: Vec::new(),
        primary_material: "Aluminium".to_string(),
        weight_kg,
        recyclability: Recyclability {
            level: RecyclabilityLevel::High,
            percentage: 90,
            description: "fixture".to_string(),
        },
        transport_mode,
        emission_factor: transport_mode.emission_factor(),
        distance_km,
    }
}

/// Classifier with scripted answers
pub struct StubClassifier {
    pub class: Result<usize, String>,
    pub proba: Result<Option<Vec<f64>>, String>,
    pub importances: Vec<f64>,
}

impl StubClassifier {
    pub fn confident(class: usize, top: f64) -> Self {
        let mut proba = vec![(1.0 - top) / 4.0; 5];
        proba[class] = top;
        Self {
            class: Ok(class),
            proba: Ok(Some(proba)),
            importances: vec![1.0; 6],
        }
    }
}

impl EcoClassifier for StubClassifier {
    fn predict(&self, _features: &FeatureVector) -> Result<usize, ClassifierError> {
        self.class.clone().map_err(ClassifierError::Failed)
    }

    fn predict_proba(
        &self,
        _features: &FeatureVector,
    ) -> Result<Option<Vec<f64>>, ClassifierError> {
        self.proba.clone().map_err(ClassifierError::Failed)
    }

    fn feature_importances(&self) -> &[f64] {
        &self.importances
    }
}

pub fn stub_model(classifier: StubClassifier) -> ScoringModel {
    ScoringModel::new(sample_encoders(), Box::new(classifier))
}
