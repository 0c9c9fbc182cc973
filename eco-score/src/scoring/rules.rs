// Rule-Based Scorer
//
// Transparent sub-scores (each 0..=10) and a grade ladder. The ladder keys
// off the distance sub-score only; the other sub-scores are reported for
// explanation.

use crate::types::{Grade, RecyclabilityLevel, SubScores};

/// Distance sub-score thresholds, best grade first
const GRADE_LADDER: [(f64, Grade); 4] = [
    (8.0, Grade::A),
    (6.5, Grade::B),
    (5.0, Grade::C),
    (3.5, Grade::D),
];

pub fn carbon_score(carbon_kg: f64) -> f64 {
    (10.0 - carbon_kg * 5.0).max(0.0)
}

pub fn weight_score(weight_kg: f64) -> f64 {
    (10.0 - weight_kg * 2.0).max(0.0)
}

pub fn distance_score(distance_km: f64) -> f64 {
    (10.0 - distance_km / 1000.0).max(0.0)
}

pub fn recycle_score(level: RecyclabilityLevel) -> f64 {
    match level {
        RecyclabilityLevel::Low => 2.0,
        RecyclabilityLevel::Medium => 6.0,
        RecyclabilityLevel::High => 10.0,
        RecyclabilityLevel::VeryLow | RecyclabilityLevel::Unknown => 5.0,
    }
}

pub fn sub_scores(
    carbon_kg: f64,
    weight_kg: f64,
    distance_km: f64,
    level: RecyclabilityLevel,
) -> SubScores {
    SubScores {
        carbon: carbon_score(carbon_kg),
        weight: weight_score(weight_kg),
        distance: distance_score(distance_km),
        recycle: recycle_score(level),
    }
}

/// Grade from the distance sub-score: ≥8 A, ≥6.5 B, ≥5 C, ≥3.5 D, else F
pub fn rule_grade(scores: &SubScores) -> Grade {
    GRADE_LADDER
        .iter()
        .find(|(threshold, _)| scores.distance >= *threshold)
        .map(|(_, grade)| *grade)
        .unwrap_or(Grade::F)
}
