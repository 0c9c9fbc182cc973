// Shared Types and Data Contracts
//
// Contracts between the resolution tier (candidates → resolved attributes)
// and the scoring tier (resolved attributes → grade).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::utils::{is_unknown, title_case};

// ============================================================================
// Resolution Inputs: Candidates
// ============================================================================

/// Which side of a resolution a candidate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceHint {
    /// Read from the product page or supplied by the caller
    Scraped,
    /// Inferred from brand/category/title knowledge
    Fallback,
}

/// A proposed attribute value with provenance
///
/// Blank values and the literal "Unknown" (any case) count as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    value: Option<String>,
    source: String,
    confidence_hint: ConfidenceHint,
}

impl Candidate {
    pub fn new(value: Option<String>, source: impl Into<String>, hint: ConfidenceHint) -> Self {
        Self {
            value: value.map(|v| v.trim().to_string()),
            source: source.into(),
            confidence_hint: hint,
        }
    }

    pub fn scraped(value: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(Some(value.into()), source, ConfidenceHint::Scraped)
    }

    pub fn fallback(value: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(Some(value.into()), source, ConfidenceHint::Fallback)
    }

    /// The value, or `None` if absent or "Unknown"
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !is_unknown(v))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn confidence_hint(&self) -> ConfidenceHint {
        self.confidence_hint
    }
}

// ============================================================================
// Resolution Outputs
// ============================================================================

/// Confidence attached to a resolved attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionConfidence {
    None,
    Low,
    LowMedium,
    Medium,
    MediumHigh,
    High,
    VeryHigh,
}

impl ResolutionConfidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::LowMedium => "low_medium",
            Self::Medium => "medium",
            Self::MediumHigh => "medium_high",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }

    /// Collapse onto the three-tier scale used by material entries
    pub fn tier(self) -> ConfidenceTier {
        match self {
            Self::VeryHigh | Self::High => ConfidenceTier::High,
            Self::MediumHigh | Self::Medium => ConfidenceTier::Medium,
            Self::LowMedium | Self::Low | Self::None => ConfidenceTier::Low,
        }
    }
}

impl fmt::Display for ResolutionConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving one attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    /// Final value ("Unknown" when nothing was available)
    pub value: String,
    pub confidence: ResolutionConfidence,
    /// Source name of the winning candidate ("none" when nothing was available)
    pub source: String,
    /// Human-readable explanation of the decision
    pub reasoning: String,
}

/// Coarse confidence tier for parsed materials and brand intelligence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

// ============================================================================
// Materials and Recyclability
// ============================================================================

/// One parsed material with its share of the product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    /// Canonical material name
    pub name: String,
    /// Share of the product, in (0, 1]
    pub weight_fraction: f64,
    pub confidence: ConfidenceTier,
    /// The text fragment the entry was parsed from
    pub raw_text: String,
}

/// Recyclability level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecyclabilityLevel {
    #[default]
    Unknown,
    #[serde(rename = "Very Low")]
    VeryLow,
    Low,
    Medium,
    High,
}

impl RecyclabilityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::VeryLow => "Very Low",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Parse a declared level ("high", "Very Low", "very_low", ...)
    pub fn from_label(label: &str) -> Option<Self> {
        let key = label.trim().to_lowercase().replace(['_', '-'], " ");
        match key.as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            "very low" => Some(Self::VeryLow),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Level for a weighted percentage: ≥70 High, ≥40 Medium, ≥10 Low, else Very Low
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            70.. => Self::High,
            40..=69 => Self::Medium,
            10..=39 => Self::Low,
            _ => Self::VeryLow,
        }
    }

    /// Representative percentage for a declared level with no materials to weigh
    pub fn representative_percentage(self) -> u8 {
        match self {
            Self::High => 80,
            Self::Medium => 50,
            Self::Low => 25,
            Self::VeryLow => 5,
            Self::Unknown => 0,
        }
    }
}

impl fmt::Display for RecyclabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated recyclability of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recyclability {
    pub level: RecyclabilityLevel,
    /// Weighted recyclable share, 0..=100
    pub percentage: u8,
    pub description: String,
}

impl Recyclability {
    pub fn unknown() -> Self {
        Self {
            level: RecyclabilityLevel::Unknown,
            percentage: 0,
            description: "No material information".to_string(),
        }
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Shipping mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    Truck,
    Ship,
    Air,
}

impl TransportMode {
    pub const ALL: [TransportMode; 3] = [Self::Truck, Self::Ship, Self::Air];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Truck => "Truck",
            Self::Ship => "Ship",
            Self::Air => "Air",
        }
    }

    /// Case-insensitive parse of "truck" / "ship" / "air"
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Label used by the classifier's transport vocabulary
    pub fn feature_label(self) -> &'static str {
        match self {
            Self::Truck => "Land",
            Self::Ship => "Ship",
            Self::Air => "Air",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Resolved Product (Scoring Input)
// ============================================================================

/// Everything the scoring tier needs about one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedProductAttributes {
    pub title: String,
    pub origin: ResolutionResult,
    pub material: ResolutionResult,
    pub packaging: ResolutionResult,
    /// Deduplicated, priority-ordered materials
    pub materials: Vec<MaterialEntry>,
    /// Name of `materials[0]`, or "Unknown"
    pub primary_material: String,
    pub weight_kg: f64,
    pub recyclability: Recyclability,
    pub transport_mode: TransportMode,
    /// kg CO2 per kg per 1000 km for the chosen mode
    pub emission_factor: f64,
    pub distance_km: f64,
}

// ============================================================================
// Scoring Outputs
// ============================================================================

/// Eco grade, best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
        }
    }

    /// Parse a classifier label ("A+", "a", " B ")
    pub fn from_label(label: &str) -> Option<Self> {
        match title_case(label.trim()).as_str() {
            "A+" => Some(Self::APlus),
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "D" => Some(Self::D),
            "E" => Some(Self::E),
            "F" => Some(Self::F),
            _ => None,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which path produced the final grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBasis {
    Model,
    RuleBased,
}

/// Rule-based sub-scores, each 0..=10
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub carbon: f64,
    pub weight: f64,
    pub distance: f64,
    pub recycle: f64,
}

/// Final score for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub grade: Grade,
    pub rule_grade: Grade,
    pub ml_grade: Option<Grade>,
    /// Top-class probability as a percentage (one decimal), when the model ran
    pub ml_confidence: Option<f64>,
    pub basis: ScoreBasis,
    pub sub_scores: SubScores,
    /// Feature name → encoded value × the model's importance for it; empty without a model
    pub feature_impact: BTreeMap<String, f64>,
    pub carbon_kg: f64,
    pub trees_to_offset: f64,
}
