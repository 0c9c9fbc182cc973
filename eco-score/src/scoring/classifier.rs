// Eco-Grade Classifier Seam
//
// The score engine only sees this trait. The bundled implementation is a
// multinomial logistic (softmax) model whose parameters come from the model
// bundle file.

use crate::error::{ClassifierError, ModelError};
use crate::features::{FeatureVector, FEATURE_COUNT};

/// Grade classifier over the 6-slot feature vector
pub trait EcoClassifier: Send + Sync {
    /// Index of the predicted class (decoded through the label encoder)
    fn predict(&self, features: &FeatureVector) -> Result<usize, ClassifierError>;

    /// Per-class probabilities, if the classifier provides them
    fn predict_proba(&self, features: &FeatureVector)
        -> Result<Option<Vec<f64>>, ClassifierError>;

    /// Global importance per feature position
    fn feature_importances(&self) -> &[f64];
}

/// Linear softmax classifier
#[derive(Debug, Clone, PartialEq)]
pub struct SoftmaxClassifier {
    coefficients: Vec<[f64; FEATURE_COUNT]>,
    intercepts: Vec<f64>,
    feature_importances: Vec<f64>,
}

impl SoftmaxClassifier {
    /// Validate dimensions: one coefficient row and intercept per class, one
    /// importance per feature, all finite
    pub fn new(
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
        feature_importances: Vec<f64>,
    ) -> Result<Self, ModelError> {
        if coefficients.is_empty() {
            return Err(ModelError::ShapeMismatch("model has no classes".to_string()));
        }
        if coefficients.len() != intercepts.len() {
            return Err(ModelError::ShapeMismatch(format!(
                "{} coefficient rows but {} intercepts",
                coefficients.len(),
                intercepts.len()
            )));
        }
        if feature_importances.len() != FEATURE_COUNT {
            return Err(ModelError::ShapeMismatch(format!(
                "expected {} feature importances, got {}",
                FEATURE_COUNT,
                feature_importances.len()
            )));
        }

        let rows = coefficients
            .into_iter()
            .enumerate()
            .map(|(class, row)| {
                <[f64; FEATURE_COUNT]>::try_from(row.as_slice()).map_err(|_| {
                    ModelError::ShapeMismatch(format!(
                        "coefficient row {} has {} values, expected {}",
                        class,
                        row.len(),
                        FEATURE_COUNT
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let all_finite = rows.iter().flatten().all(|v| v.is_finite())
            && intercepts.iter().all(|v| v.is_finite())
            && feature_importances.iter().all(|v| v.is_finite());
        if !all_finite {
            return Err(ModelError::ShapeMismatch(
                "model parameters must be finite".to_string(),
            ));
        }

        Ok(Self {
            coefficients: rows,
            intercepts,
            feature_importances,
        })
    }

    pub fn class_count(&self) -> usize {
        self.intercepts.len()
    }

    fn logits(&self, features: &FeatureVector) -> Result<Vec<f64>, ClassifierError> {
        if let Some(position) = features.values().iter().position(|v| !v.is_finite()) {
            return Err(ClassifierError::NonFiniteFeature(position));
        }
        Ok(self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| {
                intercept
                    + row
                        .iter()
                        .zip(features.values())
                        .map(|(w, x)| w * x)
                        .sum::<f64>()
            })
            .collect())
    }
}

impl EcoClassifier for SoftmaxClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<usize, ClassifierError> {
        let logits = self.logits(features)?;
        // Ties resolve to the lowest class index
        let mut best = 0;
        for (index, value) in logits.iter().enumerate().skip(1) {
            if *value > logits[best] {
                best = index;
            }
        }
        Ok(best)
    }

    fn predict_proba(
        &self,
        features: &FeatureVector,
    ) -> Result<Option<Vec<f64>>, ClassifierError> {
        let logits = self.logits(features)?;
        let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        Ok(Some(exps.into_iter().map(|e| e / total).collect()))
    }

    fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }
}
