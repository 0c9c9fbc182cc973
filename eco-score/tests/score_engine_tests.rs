//! Score fusion engine tests
//!
//! Classifier outcomes are scripted with a stub; every failure mode must fall
//! back to the rule grade with no ML confidence.

mod helpers;

use eco_common::config::WeightBinning;
use eco_score::scoring::ScoreEngine;
use eco_score::types::{Grade, ScoreBasis};
use helpers::{sample_attributes, sample_model, stub_model, StubClassifier};

// ============================================================================
// Classifier Available
// ============================================================================

#[test]
fn test_model_grade_wins_when_classifier_succeeds() {
    let attrs = sample_attributes(2.0, 9000.0);
    let model = stub_model(StubClassifier::confident(1, 0.8));

    let result = ScoreEngine::default().score(&attrs, 9.0, Some(&model));

    assert_eq!(result.grade, Grade::B);
    assert_eq!(result.ml_grade, Some(Grade::B));
    assert_eq!(result.rule_grade, Grade::F);
    assert_eq!(result.ml_confidence, Some(80.0));
    assert_eq!(result.basis, ScoreBasis::Model);
}

#[test]
fn test_feature_impact_is_value_times_importance() {
    let attrs = sample_attributes(2.0, 9000.0);
    let model = stub_model(StubClassifier::confident(0, 0.9));

    let result = ScoreEngine::new(WeightBinning::Standard).score(&attrs, 9.0, Some(&model));

    assert_eq!(result.feature_impact.len(), 6);
    // Aluminium, Air, High and China are all index 0 in the sample vocabularies
    assert_eq!(result.feature_impact["material"], 0.0);
    assert_eq!(result.feature_impact["origin"], 0.0);
    assert!((result.feature_impact["weight_log"] - 3f64.ln()).abs() < 1e-12);
    assert_eq!(result.feature_impact["weight_bin"], 2.0);
}

#[test]
fn test_bundled_softmax_model() {
    let attrs = sample_attributes(2.0, 9000.0);
    let model = sample_model();

    let result = ScoreEngine::default().score(&attrs, 9.0, Some(&model));

    // Intercepts favour "B": e / (e + 4)
    assert_eq!(result.grade, Grade::B);
    assert_eq!(result.ml_confidence, Some(40.5));
    assert_eq!(result.basis, ScoreBasis::Model);
}

// ============================================================================
// Classifier Failure Modes
// ============================================================================

fn assert_rule_based(classifier: StubClassifier) {
    let attrs = sample_attributes(2.0, 9000.0);
    let model = stub_model(classifier);

    let result = ScoreEngine::default().score(&attrs, 9.0, Some(&model));

    assert_eq!(result.grade, result.rule_grade);
    assert_eq!(result.grade, Grade::F);
    assert_eq!(result.ml_grade, None);
    assert_eq!(result.ml_confidence, None);
    assert_eq!(result.basis, ScoreBasis::RuleBased);
}

#[test]
fn test_predict_error_falls_back() {
    assert_rule_based(StubClassifier {
        class: Err("model crashed".to_string()),
        ..StubClassifier::confident(0, 0.9)
    });
}

#[test]
fn test_missing_probabilities_fall_back() {
    assert_rule_based(StubClassifier {
        proba: Ok(None),
        ..StubClassifier::confident(0, 0.9)
    });
}

#[test]
fn test_probability_error_falls_back() {
    assert_rule_based(StubClassifier {
        proba: Err("no proba".to_string()),
        ..StubClassifier::confident(0, 0.9)
    });
}

#[test]
fn test_non_finite_probabilities_fall_back() {
    assert_rule_based(StubClassifier {
        proba: Ok(Some(vec![f64::NAN, 0.5, 0.5, 0.0, 0.0])),
        ..StubClassifier::confident(0, 0.9)
    });
}

#[test]
fn test_undecodable_label_falls_back() {
    assert_rule_based(StubClassifier {
        class: Ok(7),
        ..StubClassifier::confident(0, 0.9)
    });
}

#[test]
fn test_wrong_importance_count_gives_empty_impact() {
    let attrs = sample_attributes(2.0, 9000.0);
    let model = stub_model(StubClassifier {
        importances: vec![1.0; 3],
        ..StubClassifier::confident(2, 0.7)
    });

    let result = ScoreEngine::default().score(&attrs, 9.0, Some(&model));

    assert_eq!(result.grade, Grade::C);
    assert!(result.feature_impact.is_empty());
}

// ============================================================================
// No Classifier
// ============================================================================

#[test]
fn test_no_model_is_rule_based() {
    let attrs = sample_attributes(1.0, 800.0);

    let result = ScoreEngine::default().score(&attrs, 0.1, None);

    assert_eq!(result.grade, Grade::A);
    assert_eq!(result.basis, ScoreBasis::RuleBased);
    assert_eq!(result.ml_confidence, None);
    assert!(result.feature_impact.is_empty());
    assert_eq!(result.sub_scores.recycle, 10.0);
}

#[test]
fn test_score_is_idempotent() {
    let attrs = sample_attributes(3.5, 4200.0);
    let model = sample_model();
    let engine = ScoreEngine::default();

    let first = engine.score(&attrs, 0.29, Some(&model));
    let second = engine.score(&attrs, 0.29, Some(&model));

    assert_eq!(first, second);
}

#[test]
fn test_offset_hint() {
    let attrs = sample_attributes(10.0, 9000.0);

    let result = ScoreEngine::default().score(&attrs, 45.0, None);

    assert_eq!(result.trees_to_offset, 2.3);
}
