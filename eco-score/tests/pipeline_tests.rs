//! End-to-end estimation pipeline tests

mod helpers;

use std::sync::Arc;

use eco_common::config::{CarbonMethod, EstimationConfig};
use eco_score::pipeline::{EstimationPipeline, ProductInput, RawNumber, DEFAULT_WEIGHT_KG};
use eco_score::tables::Tables;
use eco_score::types::{Grade, RecyclabilityLevel, ResolutionConfidence, ScoreBasis, TransportMode};
use eco_score::utils::round_to;
use helpers::sample_model;

fn aluminium_air_freight() -> ProductInput {
    ProductInput {
        material: Some("Aluminium".to_string()),
        recyclability: Some("High".to_string()),
        weight_kg: Some(RawNumber::Number(2.0)),
        distance_km: Some(RawNumber::Number(9000.0)),
        ..Default::default()
    }
}

fn pipeline_with(settings: EstimationConfig) -> EstimationPipeline {
    EstimationPipeline::new(Arc::new(Tables::default()), None, settings)
}

// ============================================================================
// Reference Scenario
// ============================================================================

#[test]
fn test_long_haul_aluminium_scores_f() {
    let pipeline = EstimationPipeline::rule_based();

    let estimate = pipeline.estimate(&aluminium_air_freight());

    let attrs = &estimate.attributes;
    assert_eq!(attrs.title, "Unknown Product");
    assert_eq!(attrs.primary_material, "Aluminium");
    assert_eq!(attrs.weight_kg, 2.0);
    assert_eq!(attrs.recyclability.level, RecyclabilityLevel::High);
    assert_eq!(attrs.transport_mode, TransportMode::Air);
    assert_eq!(attrs.emission_factor, 0.5);

    assert_eq!(estimate.score.carbon_kg, 9.0);
    assert_eq!(estimate.score.rule_grade, Grade::F);
    assert_eq!(estimate.score.grade, Grade::F);
    assert_eq!(estimate.score.basis, ScoreBasis::RuleBased);
    assert_eq!(estimate.score.ml_confidence, None);
    assert_eq!(estimate.carbon_method, CarbonMethod::TransportDistance);
}

#[test]
fn test_estimate_is_idempotent() {
    let pipeline = EstimationPipeline::new(
        Arc::new(Tables::default()),
        Some(Arc::new(sample_model())),
        EstimationConfig::default(),
    );
    let input = aluminium_air_freight();

    let first = pipeline.estimate(&input);
    let second = pipeline.estimate(&input);

    assert_eq!(first, second);
    assert_eq!(pipeline.rescore(&first.attributes), first.score);
}

#[test]
fn test_model_grade_through_pipeline() {
    let pipeline = EstimationPipeline::new(
        Arc::new(Tables::default()),
        Some(Arc::new(sample_model())),
        EstimationConfig::default(),
    );

    let estimate = pipeline.estimate(&aluminium_air_freight());

    assert_eq!(estimate.score.basis, ScoreBasis::Model);
    assert_eq!(estimate.score.grade, Grade::B);
    assert_eq!(estimate.score.rule_grade, Grade::F);
    assert_eq!(estimate.score.feature_impact.len(), 6);
}

// ============================================================================
// Defaults for Missing or Malformed Input
// ============================================================================

#[test]
fn test_empty_input_uses_defaults() {
    let estimate = EstimationPipeline::rule_based().estimate(&ProductInput::default());

    let attrs = &estimate.attributes;
    assert_eq!(attrs.weight_kg, DEFAULT_WEIGHT_KG);
    assert_eq!(attrs.origin.value, "Unknown");
    assert_eq!(attrs.origin.confidence, ResolutionConfidence::None);
    assert_eq!(attrs.primary_material, "Unknown");
    assert!(attrs.materials.is_empty());
    assert_eq!(attrs.recyclability.level, RecyclabilityLevel::Unknown);
    assert_eq!(attrs.distance_km, 0.0);
    assert_eq!(attrs.transport_mode, TransportMode::Truck);
    assert_eq!(estimate.score.carbon_kg, 0.0);
    assert_eq!(estimate.score.grade, Grade::A);
}

#[test]
fn test_malformed_numbers_fall_back() {
    let input = ProductInput {
        weight_kg: Some(RawNumber::Text("heavy".to_string())),
        distance_km: Some(RawNumber::Text("far away".to_string())),
        ..aluminium_air_freight()
    };

    let attrs = EstimationPipeline::rule_based().resolve_attributes(&input);

    assert_eq!(attrs.weight_kg, DEFAULT_WEIGHT_KG);
    assert_eq!(attrs.distance_km, 0.0);
}

#[test]
fn test_numbers_from_json_text() {
    let input: ProductInput = serde_json::from_str(
        r#"{"material": "Aluminium", "weight": "1.5 kg", "distance_km": "3000"}"#,
    )
    .unwrap();

    let attrs = EstimationPipeline::rule_based().resolve_attributes(&input);

    assert_eq!(attrs.weight_kg, 1.5);
    assert_eq!(attrs.distance_km, 3000.0);
    assert_eq!(attrs.transport_mode, TransportMode::Ship);
}

#[test]
fn test_non_numeric_json_values_fall_back() {
    let input: ProductInput = serde_json::from_str(
        r#"{"material": "Aluminium", "weight": true, "distance": [1]}"#,
    )
    .unwrap();

    let estimate = EstimationPipeline::rule_based().estimate(&input);

    assert_eq!(estimate.attributes.weight_kg, DEFAULT_WEIGHT_KG);
    assert_eq!(estimate.attributes.distance_km, 0.0);
    assert_eq!(estimate.attributes.primary_material, "Aluminium");
}

// ============================================================================
// Distance, Transport and Carbon
// ============================================================================

#[test]
fn test_distance_derived_from_origin_hub() {
    let input = ProductInput {
        origin: Some("Made in China".to_string()),
        weight_kg: Some(RawNumber::Number(1.0)),
        ..Default::default()
    };

    let attrs = EstimationPipeline::rule_based().resolve_attributes(&input);

    assert_eq!(attrs.origin.value, "China");
    assert!(attrs.distance_km > 9000.0 && attrs.distance_km < 9400.0);
    assert_eq!(attrs.transport_mode, TransportMode::Air);
}

#[test]
fn test_pronoun_us_in_title_is_not_an_origin() {
    let input = ProductInput {
        title: Some("Gift For Us Couples Mug".to_string()),
        weight_kg: Some(RawNumber::Number(0.4)),
        ..Default::default()
    };

    let estimate = EstimationPipeline::rule_based().estimate(&input);

    assert_eq!(estimate.attributes.origin.value, "Unknown");
    assert_eq!(estimate.attributes.distance_km, 0.0);
    assert_eq!(estimate.attributes.transport_mode, TransportMode::Truck);
    assert_eq!(estimate.score.grade, Grade::A);
}

#[test]
fn test_transport_override() {
    let input = ProductInput {
        transport: Some("ship".to_string()),
        ..aluminium_air_freight()
    };

    let estimate = EstimationPipeline::rule_based().estimate(&input);

    assert_eq!(estimate.attributes.transport_mode, TransportMode::Ship);
    assert_eq!(estimate.attributes.emission_factor, 0.02);
    assert_eq!(estimate.score.carbon_kg, 0.36);
}

#[test]
fn test_packaging_uplift() {
    let settings = EstimationConfig {
        include_packaging: true,
        ..Default::default()
    };

    let attrs = pipeline_with(settings.clone()).resolve_attributes(&aluminium_air_freight());
    assert!((attrs.weight_kg - 2.1).abs() < 1e-9);

    // Per-product switch wins over the setting
    let input = ProductInput {
        include_packaging: Some(false),
        ..aluminium_air_freight()
    };
    let attrs = pipeline_with(settings).resolve_attributes(&input);
    assert_eq!(attrs.weight_kg, 2.0);
}

#[test]
fn test_material_intensity_method() {
    let pipeline = pipeline_with(EstimationConfig {
        carbon_method: CarbonMethod::MaterialIntensity,
        ..Default::default()
    });

    let estimate = pipeline.estimate(&aluminium_air_freight());

    let intensity = pipeline.tables().materials.co2_intensity("aluminium");
    assert_eq!(estimate.score.carbon_kg, round_to(2.0 * intensity, 2));
    assert_eq!(estimate.carbon_method, CarbonMethod::MaterialIntensity);
}

// ============================================================================
// Materials and Recyclability
// ============================================================================

#[test]
fn test_composite_material_text() {
    let input = ProductInput {
        material: Some("60% Cotton, 40% Polyester".to_string()),
        ..Default::default()
    };

    let attrs = EstimationPipeline::rule_based().resolve_attributes(&input);

    assert_eq!(attrs.materials.len(), 2);
    let total: f64 = attrs.materials.iter().map(|m| m.weight_fraction).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert_eq!(attrs.primary_material, attrs.materials[0].name);
    assert_eq!(attrs.material.value, attrs.primary_material);
}

#[test]
fn test_brand_fallback_material() {
    let input = ProductInput {
        title: Some("Apple Watch Band".to_string()),
        brand: Some("Apple".to_string()),
        ..Default::default()
    };

    let attrs = EstimationPipeline::rule_based().resolve_attributes(&input);

    assert_eq!(attrs.material.value, "Aluminium");
    assert_eq!(attrs.material.source, "brand_db_verified");
    assert_eq!(attrs.materials.len(), 1);
    assert_eq!(attrs.materials[0].weight_fraction, 1.0);
}

#[test]
fn test_declared_recyclability_overrides_computed() {
    let input = ProductInput {
        recyclability: Some("Low".to_string()),
        ..aluminium_air_freight()
    };

    let attrs = EstimationPipeline::rule_based().resolve_attributes(&input);

    assert_eq!(attrs.recyclability.level, RecyclabilityLevel::Low);
    assert!(attrs.recyclability.description.starts_with("Declared recyclability: Low"));
}

#[test]
fn test_declared_recyclability_without_materials() {
    let input = ProductInput {
        recyclability: Some("Medium".to_string()),
        ..Default::default()
    };

    let attrs = EstimationPipeline::rule_based().resolve_attributes(&input);

    assert_eq!(attrs.recyclability.level, RecyclabilityLevel::Medium);
    assert_eq!(
        attrs.recyclability.percentage,
        RecyclabilityLevel::Medium.representative_percentage()
    );
}

#[test]
fn test_estimate_serializes() {
    let estimate = EstimationPipeline::rule_based().estimate(&aluminium_air_freight());

    let json = serde_json::to_value(&estimate).unwrap();

    assert_eq!(json["score"]["grade"], "F");
    assert_eq!(json["score"]["basis"], "rule_based");
    assert_eq!(json["attributes"]["transport_mode"], "Air");
}
