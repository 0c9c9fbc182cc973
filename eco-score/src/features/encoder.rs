// Feature Encoder
//
// Maps resolved attributes onto the fixed 6-slot vector the classifier was
// trained on. Categorical codes are always valid indices into the loaded
// vocabularies.

use serde::{Deserialize, Serialize};
use tracing::warn;

use eco_common::config::WeightBinning;

use crate::types::ResolvedProductAttributes;
use crate::utils::{is_unknown, title_case};

/// Feature names in vector order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "material",
    "transport",
    "recyclability",
    "origin",
    "weight_log",
    "weight_bin",
];

pub const FEATURE_COUNT: usize = 6;

/// Fixed-order encoded feature vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// (name, value) pairs in vector order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

/// Label-encoder vocabulary: sorted unique class names
///
/// Indices are positions in the sorted list, so a serialized vocabulary must
/// already be sorted; reordering it would silently remap every code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct CategoryEncoder {
    classes: Vec<String>,
}

impl TryFrom<Vec<String>> for CategoryEncoder {
    type Error = String;

    fn try_from(classes: Vec<String>) -> Result<Self, Self::Error> {
        if let Some(pair) = classes.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(format!(
                "encoder classes must be sorted and unique ('{}' before '{}')",
                pair[0], pair[1]
            ));
        }
        Ok(Self { classes })
    }
}

impl From<CategoryEncoder> for Vec<String> {
    fn from(encoder: CategoryEncoder) -> Self {
        encoder.classes
    }
}

impl CategoryEncoder {
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Index of `value`, if it is a known class
    pub fn transform(&self, value: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    pub fn inverse_transform(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}

/// Categorical slots and their defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalField {
    Material,
    Transport,
    Recyclability,
    Origin,
}

impl CategoricalField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Material => "material",
            Self::Transport => "transport",
            Self::Recyclability => "recyclability",
            Self::Origin => "origin",
        }
    }

    /// Value substituted for unknown or out-of-vocabulary input
    pub fn default_value(self) -> &'static str {
        match self {
            Self::Material => "Other",
            Self::Transport => "Land",
            Self::Recyclability => "Medium",
            Self::Origin => "Other",
        }
    }
}

/// Vocabularies for the four categorical features plus the grade labels
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEncoderSet {
    pub material: CategoryEncoder,
    pub transport: CategoryEncoder,
    pub recyclability: CategoryEncoder,
    pub origin: CategoryEncoder,
    pub label: CategoryEncoder,
}

impl CategoryEncoderSet {
    pub fn get(&self, field: CategoricalField) -> &CategoryEncoder {
        match field {
            CategoricalField::Material => &self.material,
            CategoricalField::Transport => &self.transport,
            CategoricalField::Recyclability => &self.recyclability,
            CategoricalField::Origin => &self.origin,
        }
    }

    /// (name, encoder) pairs including the label encoder
    pub fn all(&self) -> [(&'static str, &CategoryEncoder); 5] {
        [
            ("material", &self.material),
            ("transport", &self.transport),
            ("recyclability", &self.recyclability),
            ("origin", &self.origin),
            ("label", &self.label),
        ]
    }
}

/// Trim and title-case; blank or "Unknown" becomes `default`
pub fn normalize_category(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !is_unknown(v) => title_case(v.trim()),
        _ => default.to_string(),
    }
}

/// Encode a categorical value, substituting the field default when unseen
///
/// Falls back to index 0 if even the default is outside the vocabulary, so
/// the result is always a valid index for a non-empty encoder.
pub fn safe_encode(value: Option<&str>, encoder: &CategoryEncoder, field: CategoricalField) -> usize {
    let normalized = normalize_category(value, field.default_value());
    if let Some(index) = encoder.transform(&normalized) {
        return index;
    }

    warn!(
        "'{}' not in {} vocabulary, defaulting to '{}'",
        normalized,
        field.name(),
        field.default_value()
    );
    encoder.transform(field.default_value()).unwrap_or_else(|| {
        warn!(
            "Default '{}' missing from {} vocabulary, using index 0",
            field.default_value(),
            field.name()
        );
        0
    })
}

/// `ln(1 + kg)`
pub fn weight_log(weight_kg: f64) -> f64 {
    weight_kg.ln_1p()
}

/// Weight bin code under the given policy
pub fn weight_bin(weight_kg: f64, policy: WeightBinning) -> u8 {
    match policy {
        WeightBinning::Standard => {
            if weight_kg < 0.5 {
                0
            } else if weight_kg < 2.0 {
                1
            } else if weight_kg < 10.0 {
                2
            } else {
                3
            }
        }
        WeightBinning::Coarse => {
            if weight_kg > 0.5 {
                2
            } else if weight_kg > 0.1 {
                1
            } else {
                0
            }
        }
    }
}

/// Encodes resolved attributes against a loaded vocabulary set
#[derive(Debug, Clone, Copy)]
pub struct FeatureEncoder<'a> {
    encoders: &'a CategoryEncoderSet,
    binning: WeightBinning,
}

impl<'a> FeatureEncoder<'a> {
    pub fn new(encoders: &'a CategoryEncoderSet, binning: WeightBinning) -> Self {
        Self { encoders, binning }
    }

    pub fn encode(&self, attrs: &ResolvedProductAttributes) -> FeatureVector {
        let material = safe_encode(
            Some(attrs.primary_material.as_str()),
            &self.encoders.material,
            CategoricalField::Material,
        );
        let transport = safe_encode(
            Some(attrs.transport_mode.feature_label()),
            &self.encoders.transport,
            CategoricalField::Transport,
        );
        let recyclability = safe_encode(
            Some(attrs.recyclability.level.as_str()),
            &self.encoders.recyclability,
            CategoricalField::Recyclability,
        );
        let origin = safe_encode(
            Some(attrs.origin.value.as_str()),
            &self.encoders.origin,
            CategoricalField::Origin,
        );

        FeatureVector([
            material as f64,
            transport as f64,
            recyclability as f64,
            origin as f64,
            weight_log(attrs.weight_kg),
            f64::from(weight_bin(attrs.weight_kg, self.binning)),
        ])
    }
}
