// Material Knowledge Table
//
// Keyword normalization, environmental priority, base recyclability rates
// and CO2 intensities, all keyed by canonical material name.

use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::utils::{contains_phrase, normalize_key, title_case};

/// Name used when a material cannot be determined
pub const UNKNOWN_MATERIAL: &str = "Unknown";

/// kg CO2 per kg when a material has no intensity entry
pub const DEFAULT_CO2_INTENSITY: f64 = 2.0;

/// Minimum normalized Levenshtein similarity for a typo match
pub const FUZZY_THRESHOLD: f64 = 0.85;

/// Values treated as "no material given"
const PLACEHOLDERS: [&str; 5] = ["other", "unknown", "n/a", "not specified", "none"];

/// Words shorter than this are never typo-matched
const FUZZY_MIN_WORD_LEN: usize = 4;

/// Canonical name → keywords, in matching order
///
/// Order matters: the first canonical whose keyword appears in the text wins
/// ("stainless steel" must hit Steel before Metal).
const KEYWORDS: &[(&str, &[&str])] = &[
    ("Aluminium", &["aluminium", "aluminum"]),
    ("Steel", &["stainless steel", "steel"]),
    ("Metal", &["metal", "iron", "copper", "brass", "titanium"]),
    ("Glass", &["glass"]),
    ("Cardboard", &["cardboard", "corrugated"]),
    ("Paper", &["paper"]),
    ("Rubber", &["rubber"]),
    ("Leather", &["leather", "buffalo", "veg tan"]),
    ("Mesh", &["mesh"]),
    ("Cotton", &["cotton"]),
    ("Polyester", &["polyester"]),
    ("Nylon", &["nylon"]),
    ("Polypropylene", &["polypropylene"]),
    ("Silicone", &["silicone"]),
    ("Foam", &["foam", "polyurethane"]),
    ("Plastic", &["plastic", "acrylic", "pvc"]),
    ("Wood", &["wood", "timber", "bamboo"]),
    ("Canvas", &["canvas"]),
    ("Synthetic", &["synthetic"]),
    ("Fabric", &["fabric"]),
    ("Compound", &["compound"]),
    ("Composite", &["composite"]),
    ("Mixed", &["mixed", "various"]),
    ("Textile", &["textile"]),
];

/// Table overrides read from the tables TOML `[materials]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MaterialOverrides {
    /// Canonical name → keywords (extends an existing entry or appends a new one)
    pub keywords: HashMap<String, Vec<String>>,
    pub priority: HashMap<String, u8>,
    pub recyclability: HashMap<String, u8>,
    pub co2_intensity: HashMap<String, f64>,
}

/// Material normalization and per-material figures
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialTable {
    keywords: Vec<(String, Vec<String>)>,
    priority: HashMap<String, u8>,
    recyclability: HashMap<String, u8>,
    co2_intensity: HashMap<String, f64>,
}

impl Default for MaterialTable {
    fn default() -> Self {
        let keywords = KEYWORDS
            .iter()
            .map(|(canonical, words)| {
                (
                    canonical.to_string(),
                    words.iter().map(|w| w.to_string()).collect(),
                )
            })
            .collect();

        Self {
            keywords,
            // Higher = more significant for environmental impact
            priority: hashmap! {
                "Aluminium" => 20,
                "Steel" => 19,
                "Metal" => 18,
                "Glass" => 16,
                "Leather" => 14,
                "Cotton" => 12,
                "Canvas" => 12,
                "Wood" => 11,
                "Cardboard" => 10,
                "Paper" => 10,
                "Rubber" => 8,
                "Plastic" => 6,
                "Polypropylene" => 6,
                "Silicone" => 5,
                "Foam" => 5,
                "Synthetic" => 3,
                "Polyester" => 3,
                "Nylon" => 3,
                "Mesh" => 2,
                "Fabric" => 2,
                "Textile" => 2,
            },
            recyclability: hashmap! {
                "Aluminium" => 90,
                "Steel" => 85,
                "Metal" => 80,
                "Glass" => 80,
                "Cardboard" => 88,
                "Paper" => 75,
                "Plastic" => 55,
                "Cotton" => 50,
                "Polyester" => 45,
                "Synthetic" => 30,
                "Rubber" => 20,
                "Leather" => 10,
                "Polypropylene" => 60,
                "Wood" => 60,
                "Mesh" => 40,
                "Canvas" => 40,
                "Fabric" => 35,
                "Textile" => 35,
                "Mixed" => 30,
                "Nylon" => 25,
                "Silicone" => 15,
                "Composite" => 15,
                "Foam" => 12,
            },
            // kg CO2 per kg of material, keyed lower-case
            co2_intensity: hashmap! {
                "aluminium" => 8.24,
                "steel" => 1.77,
                "metal" => 2.5,
                "glass" => 0.85,
                "paper" => 0.92,
                "cardboard" => 0.82,
                "plastic" => 3.1,
                "polyester" => 5.5,
                "nylon" => 7.3,
                "cotton" => 5.9,
                "rubber" => 2.85,
                "leather" => 17.0,
                "wood" => 0.31,
                "synthetic" => 4.0,
                "foam" => 3.5,
                "silicone" => 3.0,
                "polypropylene" => 1.95,
            },
        }
    }
}

impl MaterialTable {
    /// Map free text onto a canonical material name
    ///
    /// Whole-word keyword match first, then a typo-tolerant match on individual
    /// words, then the title-cased text itself. Placeholders and text of two
    /// characters or fewer give "Unknown".
    pub fn normalize(&self, raw: &str) -> String {
        let key = normalize_key(raw);
        if key.is_empty() || PLACEHOLDERS.contains(&key.as_str()) {
            return UNKNOWN_MATERIAL.to_string();
        }

        if let Some(canonical) = self.match_keyword(&key) {
            return canonical.to_string();
        }

        if let Some(canonical) = self.match_fuzzy(&key) {
            debug!("Material '{}' typo-matched to {}", raw.trim(), canonical);
            return canonical.to_string();
        }

        if key.chars().count() > 2 {
            title_case(&key)
        } else {
            UNKNOWN_MATERIAL.to_string()
        }
    }

    /// First canonical material whose keyword appears as a whole word in `text`
    ///
    /// Used for title guesses, where substring hits ("iron" in "environment")
    /// would be noise.
    pub fn find_in_text(&self, text: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|(_, words)| words.iter().any(|w| contains_phrase(text, w)))
            .map(|(canonical, _)| canonical.as_str())
    }

    pub fn priority(&self, name: &str) -> u8 {
        self.priority.get(name).copied().unwrap_or(0)
    }

    /// Base recyclability rate in percent; unknown materials are 0
    pub fn recyclability_rate(&self, name: &str) -> u8 {
        self.recyclability.get(name).copied().unwrap_or(0)
    }

    /// kg CO2 per kg; `DEFAULT_CO2_INTENSITY` when the material is missing
    pub fn co2_intensity(&self, name: &str) -> f64 {
        self.co2_intensity
            .get(&name.trim().to_lowercase())
            .copied()
            .unwrap_or(DEFAULT_CO2_INTENSITY)
    }

    pub fn with_overrides(mut self, overrides: &MaterialOverrides) -> Self {
        for (canonical, words) in &overrides.keywords {
            let words: Vec<String> = words.iter().map(|w| normalize_key(w)).collect();
            match self.keywords.iter_mut().find(|(c, _)| c == canonical) {
                Some((_, existing)) => existing.extend(words),
                None => self.keywords.push((canonical.clone(), words)),
            }
        }
        for (name, priority) in &overrides.priority {
            self.priority.insert(name.clone(), *priority);
        }
        for (name, rate) in &overrides.recyclability {
            self.recyclability.insert(name.clone(), (*rate).min(100));
        }
        for (name, intensity) in &overrides.co2_intensity {
            if intensity.is_finite() && *intensity >= 0.0 {
                self.co2_intensity.insert(name.to_lowercase(), *intensity);
            }
        }
        self
    }

    fn match_keyword(&self, key: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|(_, words)| words.iter().any(|w| contains_phrase(key, w)))
            .map(|(canonical, _)| canonical.as_str())
    }

    fn match_fuzzy(&self, key: &str) -> Option<&str> {
        let mut best: Option<(&str, f64)> = None;
        for word in key
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| w.chars().count() >= FUZZY_MIN_WORD_LEN)
        {
            for (canonical, words) in &self.keywords {
                for keyword in words.iter().filter(|k| !k.contains(' ')) {
                    let score = strsim::normalized_levenshtein(word, keyword);
                    if score >= FUZZY_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
                        best = Some((canonical.as_str(), score));
                    }
                }
            }
        }
        best.map(|(canonical, _)| canonical)
    }
}
