// Estimation Pipeline
//
// Candidates → resolved attributes → materials/recyclability → transport →
// carbon → score. Never fails: every missing or malformed input has a
// documented default.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use eco_common::config::{CarbonMethod, EstimationConfig};

use crate::fusion::{AttributeResolver, CandidateBuilder};
use crate::materials::{primary_material, weighted_recyclability, MaterialAggregator};
use crate::scoring::{ScoreEngine, ScoringModel};
use crate::tables::{trust, Tables, UNKNOWN_MATERIAL};
use crate::transport::{estimate_carbon_kg, select_mode};
use crate::types::{
    Candidate, ConfidenceHint, MaterialEntry, Recyclability, RecyclabilityLevel, ResolutionResult,
    ResolvedProductAttributes, ScoreResult,
};
use crate::utils::{normalize_key, round_to, title_case};

/// Weight used when none (or nonsense) is given
pub const DEFAULT_WEIGHT_KG: f64 = 0.5;

/// Weight multiplier when packaging is included
pub const PACKAGING_UPLIFT: f64 = 1.05;

pub const DEFAULT_TITLE: &str = "Unknown Product";

/// A number that may arrive as JSON number or text ("1.2", "1.2 kg")
///
/// Any other JSON value is kept as `Other` so one bad field never rejects
/// the whole product; it parses to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawNumber {
    /// Numeric value; trailing unit letters are ignored
    pub fn parse(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(text) => text
                .trim()
                .trim_end_matches(|c: char| c.is_alphabetic() || c.is_whitespace())
                .parse()
                .ok(),
            Self::Other(_) => None,
        }
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One product as supplied by the caller
///
/// `*_source` fields name the trust-table source of the corresponding value
/// (default `user_input`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductInput {
    pub title: Option<String>,
    pub brand: Option<String>,
    pub material: Option<String>,
    pub material_source: Option<String>,
    pub origin: Option<String>,
    pub origin_source: Option<String>,
    pub packaging: Option<String>,
    pub packaging_source: Option<String>,
    #[serde(alias = "weight")]
    pub weight_kg: Option<RawNumber>,
    #[serde(alias = "distance")]
    pub distance_km: Option<RawNumber>,
    /// Transport override (Truck, Ship, Air)
    #[serde(alias = "transport_mode", alias = "override_transport_mode")]
    pub transport: Option<String>,
    /// Declared recyclability level (High, Medium, Low, Very Low)
    pub recyclability: Option<String>,
    /// Overrides `estimation.include_packaging` for this product
    pub include_packaging: Option<bool>,
}

/// Full estimate for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub attributes: ResolvedProductAttributes,
    pub score: ScoreResult,
    pub carbon_method: CarbonMethod,
}

/// Shared, read-only estimation context
#[derive(Debug, Clone)]
pub struct EstimationPipeline {
    tables: Arc<Tables>,
    model: Option<Arc<ScoringModel>>,
    settings: EstimationConfig,
}

fn source_or_user(source: Option<&str>) -> String {
    source
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(trust::USER_INPUT)
        .to_string()
}

fn resolve_weight(raw: Option<&RawNumber>) -> f64 {
    let Some(raw) = raw else {
        debug!("No weight given, using {} kg", DEFAULT_WEIGHT_KG);
        return DEFAULT_WEIGHT_KG;
    };
    match raw.parse() {
        Some(weight) if weight.is_finite() && weight > 0.0 => weight,
        Some(weight) => {
            warn!("Weight {} kg is not positive, using {} kg", weight, DEFAULT_WEIGHT_KG);
            DEFAULT_WEIGHT_KG
        }
        None => {
            warn!("Unparsable weight {:?}, using {} kg", raw, DEFAULT_WEIGHT_KG);
            DEFAULT_WEIGHT_KG
        }
    }
}

impl EstimationPipeline {
    pub fn new(
        tables: Arc<Tables>,
        model: Option<Arc<ScoringModel>>,
        settings: EstimationConfig,
    ) -> Self {
        Self {
            tables,
            model,
            settings,
        }
    }

    /// Built-in tables, no classifier, default settings
    pub fn rule_based() -> Self {
        Self::new(Arc::new(Tables::default()), None, EstimationConfig::default())
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn model(&self) -> Option<&ScoringModel> {
        self.model.as_deref()
    }

    pub fn settings(&self) -> &EstimationConfig {
        &self.settings
    }

    /// Resolve, estimate carbon and score one product
    pub fn estimate(&self, input: &ProductInput) -> Estimate {
        let attributes = self.resolve_attributes(input);
        let score = self.rescore(&attributes);

        info!(
            "Estimated '{}': grade {} ({:?}), {:.2} kg CO2",
            attributes.title, score.grade, score.basis, score.carbon_kg
        );

        Estimate {
            attributes,
            score,
            carbon_method: self.settings.carbon_method,
        }
    }

    /// Score already-resolved attributes
    pub fn rescore(&self, attributes: &ResolvedProductAttributes) -> ScoreResult {
        let carbon_kg = estimate_carbon_kg(
            self.settings.carbon_method,
            attributes.weight_kg,
            attributes.emission_factor,
            attributes.distance_km,
            &attributes.primary_material,
            &self.tables.materials,
        );
        ScoreEngine::new(self.settings.weight_binning).score(
            attributes,
            carbon_kg,
            self.model.as_deref(),
        )
    }

    /// Resolve every attribute of one product
    pub fn resolve_attributes(&self, input: &ProductInput) -> ResolvedProductAttributes {
        let tables = self.tables.as_ref();
        let title = input
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE)
            .to_string();
        let brand_key = tables.brands.brand_key(input.brand.as_deref(), &title);

        let mut context = HashMap::new();
        if let Some(brand) = &brand_key {
            context.insert("brand_name".to_string(), brand.clone());
        }
        context.insert("product_title".to_string(), title.clone());

        let builder = CandidateBuilder::new(tables);
        let resolver = AttributeResolver::new(&tables.trust);

        // Origin
        let scraped_origin = input.origin.as_deref().map(|raw| {
            Candidate::new(
                Some(tables.origins.normalize_country(raw)),
                source_or_user(input.origin_source.as_deref()),
                ConfidenceHint::Scraped,
            )
        });
        let fallback_origin = builder.origin(brand_key.as_deref(), &title);
        let origin = resolver.resolve(
            scraped_origin.as_ref(),
            fallback_origin.as_ref(),
            "origin",
            &context,
        );

        // Material
        let parsed = input
            .material
            .as_deref()
            .map(|raw| MaterialAggregator::new(&tables.materials).aggregate(raw))
            .unwrap_or_default();
        let scraped_material = (!parsed.is_empty()).then(|| {
            Candidate::scraped(
                primary_material(&parsed),
                source_or_user(input.material_source.as_deref()),
            )
        });
        let fallback_material = builder.material(brand_key.as_deref(), &title);
        let material = resolver.resolve(
            scraped_material.as_ref(),
            fallback_material.as_ref(),
            "material",
            &context,
        );
        let materials = self.material_entries(&material, parsed);
        let primary = primary_material(&materials).to_string();

        // Packaging
        let scraped_packaging = input.packaging.as_deref().map(|raw| {
            Candidate::new(
                Some(title_case(raw.trim())),
                source_or_user(input.packaging_source.as_deref()),
                ConfidenceHint::Scraped,
            )
        });
        let fallback_packaging = builder.packaging(&title);
        let packaging = resolver.resolve(
            scraped_packaging.as_ref(),
            Some(&fallback_packaging),
            "packaging",
            &context,
        );

        // Weight
        let mut weight_kg = resolve_weight(input.weight_kg.as_ref());
        if input
            .include_packaging
            .unwrap_or(self.settings.include_packaging)
        {
            weight_kg *= PACKAGING_UPLIFT;
        }

        let recyclability = self.recyclability(&materials, input.recyclability.as_deref());

        // Transport
        let distance_km = self.resolve_distance(input.distance_km.as_ref(), &origin.value);
        let (transport_mode, emission_factor) =
            select_mode(distance_km, input.transport.as_deref());

        debug!(
            "Resolved '{}': origin {}, material {}, {:.2} kg, {:.1} km by {}",
            title, origin.value, primary, weight_kg, distance_km, transport_mode
        );

        ResolvedProductAttributes {
            title,
            origin,
            material,
            packaging,
            materials,
            primary_material: primary,
            weight_kg,
            recyclability,
            transport_mode,
            emission_factor,
            distance_km,
        }
    }

    /// Material list behind the resolved material
    ///
    /// Parsed entries are kept when the scraped side won; a fallback winner
    /// becomes a single full-share entry.
    fn material_entries(
        &self,
        resolution: &ResolutionResult,
        parsed: Vec<MaterialEntry>,
    ) -> Vec<MaterialEntry> {
        if resolution.value == UNKNOWN_MATERIAL {
            return Vec::new();
        }
        if !parsed.is_empty()
            && normalize_key(primary_material(&parsed)) == normalize_key(&resolution.value)
        {
            return parsed;
        }
        vec![MaterialEntry {
            name: self.tables.materials.normalize(&resolution.value),
            weight_fraction: 1.0,
            confidence: resolution.confidence.tier(),
            raw_text: resolution.value.clone(),
        }]
    }

    /// Computed recyclability, with a declared level taking precedence
    fn recyclability(&self, materials: &[MaterialEntry], declared: Option<&str>) -> Recyclability {
        let computed = weighted_recyclability(materials, &self.tables.materials);

        let declared = declared
            .filter(|d| !d.trim().is_empty())
            .and_then(|d| {
                let level = RecyclabilityLevel::from_label(d);
                if level.is_none() {
                    warn!("Ignoring unrecognized recyclability level '{}'", d);
                }
                level
            })
            .filter(|level| *level != RecyclabilityLevel::Unknown);

        match declared {
            Some(level) if materials.is_empty() => Recyclability {
                level,
                percentage: level.representative_percentage(),
                description: format!("Declared recyclability: {}", level),
            },
            Some(level) => Recyclability {
                level,
                percentage: computed.percentage,
                description: format!("Declared recyclability: {} ({})", level, computed.description),
            },
            None => computed,
        }
    }

    /// Caller distance, else origin hub → destination hub, else 0
    fn resolve_distance(&self, raw: Option<&RawNumber>, origin: &str) -> f64 {
        match raw {
            Some(raw) => match raw.parse() {
                Some(distance) if distance.is_finite() && distance >= 0.0 => distance,
                _ => {
                    warn!("Malformed distance {:?}, using 0 km", raw);
                    0.0
                }
            },
            None => {
                let destination = &self.settings.destination_hub;
                match self.tables.origins.hub_distance_km(origin, destination) {
                    Some(distance) => {
                        debug!("Distance {} -> {} hub: {:.1} km", origin, destination, distance);
                        round_to(distance, 1)
                    }
                    None => {
                        debug!("No hub route {} -> {}, using 0 km", origin, destination);
                        0.0
                    }
                }
            }
        }
    }
}
