//! Grade scoring: rule-based sub-scores, classifier seam and fusion

pub mod classifier;
pub mod engine;
pub mod rules;

pub use classifier::{EcoClassifier, SoftmaxClassifier};
pub use engine::ScoreEngine;

use crate::features::CategoryEncoderSet;

/// A classifier together with the vocabularies it was trained on
pub struct ScoringModel {
    pub encoders: CategoryEncoderSet,
    pub classifier: Box<dyn EcoClassifier>,
}

impl ScoringModel {
    pub fn new(encoders: CategoryEncoderSet, classifier: Box<dyn EcoClassifier>) -> Self {
        Self {
            encoders,
            classifier,
        }
    }
}

impl std::fmt::Debug for ScoringModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringModel")
            .field("encoders", &self.encoders)
            .field("importances", &self.classifier.feature_importances())
            .finish()
    }
}
