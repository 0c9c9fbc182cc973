// Score Fusion Engine
//
// Combines the rule-based grade with the classifier's grade. A classifier
// that fails, gives no probabilities, or predicts an undecodable label is
// treated as absent: the rule grade stands and ml_confidence is None.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use eco_common::config::WeightBinning;

use crate::features::{FeatureEncoder, FeatureVector, FEATURE_NAMES};
use crate::scoring::rules;
use crate::scoring::ScoringModel;
use crate::types::{Grade, ResolvedProductAttributes, ScoreBasis, ScoreResult};
use crate::utils::round_to;

/// kg CO2 one tree absorbs per year, for the offset hint
pub const KG_CO2_PER_TREE: f64 = 20.0;

/// Scores resolved attributes
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreEngine {
    binning: WeightBinning,
}

/// Classifier verdict that survived every check
struct ModelVerdict {
    grade: Grade,
    confidence_pct: f64,
}

impl ScoreEngine {
    pub fn new(binning: WeightBinning) -> Self {
        Self { binning }
    }

    /// Score one product
    ///
    /// # Arguments
    /// * `attrs` - Resolved product attributes
    /// * `carbon_kg` - Carbon estimate from the chosen estimator
    /// * `model` - Classifier and vocabularies; `None` gives a rule-based result
    pub fn score(
        &self,
        attrs: &ResolvedProductAttributes,
        carbon_kg: f64,
        model: Option<&ScoringModel>,
    ) -> ScoreResult {
        let sub_scores = rules::sub_scores(
            carbon_kg,
            attrs.weight_kg,
            attrs.distance_km,
            attrs.recyclability.level,
        );
        let rule_grade = rules::rule_grade(&sub_scores);

        let (verdict, feature_impact) = match model {
            Some(model) => {
                let features = FeatureEncoder::new(&model.encoders, self.binning).encode(attrs);
                debug!("Feature vector: {:?}", features.values());
                (
                    Self::model_verdict(&features, model),
                    Self::feature_impact(&features, model),
                )
            }
            None => {
                debug!("No classifier configured, using rule-based grade");
                (None, BTreeMap::new())
            }
        };

        let (grade, ml_grade, ml_confidence, basis) = match verdict {
            Some(v) => (v.grade, Some(v.grade), Some(v.confidence_pct), ScoreBasis::Model),
            None => (rule_grade, None, None, ScoreBasis::RuleBased),
        };

        debug!(
            "Score: {} (rule {}, basis {:?}, carbon {:.2} kg)",
            grade, rule_grade, basis, carbon_kg
        );

        ScoreResult {
            grade,
            rule_grade,
            ml_grade,
            ml_confidence,
            basis,
            sub_scores,
            feature_impact,
            carbon_kg,
            trees_to_offset: round_to(carbon_kg / KG_CO2_PER_TREE, 1),
        }
    }

    fn model_verdict(features: &FeatureVector, model: &ScoringModel) -> Option<ModelVerdict> {
        let index = match model.classifier.predict(features) {
            Ok(index) => index,
            Err(e) => {
                warn!("Classifier prediction failed, using rule-based grade: {}", e);
                return None;
            }
        };

        let Some(label) = model.encoders.label.inverse_transform(index) else {
            warn!("Predicted class {} has no label, using rule-based grade", index);
            return None;
        };
        let Some(grade) = Grade::from_label(label) else {
            warn!("Predicted label '{}' is not a grade, using rule-based grade", label);
            return None;
        };

        let proba = match model.classifier.predict_proba(features) {
            Ok(Some(proba)) if !proba.is_empty() && proba.iter().all(|p| p.is_finite()) => proba,
            Ok(_) => {
                warn!("Classifier returned no usable probabilities, using rule-based grade");
                return None;
            }
            Err(e) => {
                warn!("Classifier probabilities failed, using rule-based grade: {}", e);
                return None;
            }
        };

        let top = proba.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let confidence_pct = round_to(top * 100.0, 1).clamp(0.0, 100.0);

        Some(ModelVerdict {
            grade,
            confidence_pct,
        })
    }

    /// encoded value × importance, per feature name
    fn feature_impact(features: &FeatureVector, model: &ScoringModel) -> BTreeMap<String, f64> {
        let importances = model.classifier.feature_importances();
        if importances.len() != FEATURE_NAMES.len() {
            warn!(
                "Classifier reports {} importances for {} features, skipping impact",
                importances.len(),
                FEATURE_NAMES.len()
            );
            return BTreeMap::new();
        }

        features
            .named()
            .zip(importances)
            .map(|((name, value), importance)| (name.to_string(), value * importance))
            .collect()
    }
}
