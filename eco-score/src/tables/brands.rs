// Brand and Category Knowledge
//
// Fallback evidence for origin, material and packaging when a product page
// says nothing (or says something weak).

use serde::Deserialize;
use std::collections::HashMap;

use crate::types::ConfidenceTier;
use crate::utils::{contains_phrase, normalize_key};

/// Known manufacturing location for one product type of a brand
#[derive(Debug, Clone, PartialEq)]
pub struct ManufacturingPattern {
    /// Title phrase identifying the product type ("air fryer")
    pub product_type: String,
    pub country: String,
    pub confidence: ConfidenceTier,
}

/// Multi-location brand with product-specific manufacturing
#[derive(Debug, Clone, PartialEq)]
pub struct BrandIntelligence {
    pub headquarters: String,
    /// Checked in order; first phrase found in the title wins
    pub patterns: Vec<ManufacturingPattern>,
    pub default_country: String,
    pub default_confidence: ConfidenceTier,
}

/// Result of a brand-intelligence lookup
#[derive(Debug, Clone, PartialEq)]
pub struct IntelligenceHit {
    pub country: String,
    pub confidence: ConfidenceTier,
    pub reasoning: String,
}

/// Brand database entry (verified or generic mapping)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BrandFact {
    pub value: String,
    #[serde(default)]
    pub verified: bool,
}

impl BrandFact {
    fn verified(value: &str) -> Self {
        Self {
            value: value.to_string(),
            verified: true,
        }
    }

    fn generic(value: &str) -> Self {
        Self {
            value: value.to_string(),
            verified: false,
        }
    }
}

/// Product category used for packaging defaults
#[derive(Debug, Clone, PartialEq)]
pub struct PackagingCategory {
    pub name: String,
    pub keywords: Vec<String>,
    pub packaging: String,
}

/// Table overrides read from the tables TOML `[brands]` section
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrandOverrides {
    /// Brand → country of origin
    pub origins: HashMap<String, BrandFact>,
    /// Brand → dominant material
    pub materials: HashMap<String, BrandFact>,
}

/// Category used when no packaging keyword matches
pub const DEFAULT_PACKAGING_CATEGORY: &str = "electronics";
pub const DEFAULT_PACKAGING: &str = "Plastic";

/// Title words hinting at kitchen goods of an unknown brand
const KITCHEN_HINTS: [&str; 3] = ["kitchen", "cooking", "appliance"];

#[derive(Debug, Clone, PartialEq)]
pub struct BrandTable {
    intelligence: HashMap<String, BrandIntelligence>,
    origins: HashMap<String, BrandFact>,
    materials: HashMap<String, BrandFact>,
    title_origin_hints: Vec<(String, String)>,
    packaging_categories: Vec<PackagingCategory>,
}

fn pattern(product_type: &str, country: &str, confidence: ConfidenceTier) -> ManufacturingPattern {
    ManufacturingPattern {
        product_type: product_type.to_string(),
        country: country.to_string(),
        confidence,
    }
}

fn intelligence(
    headquarters: &str,
    patterns: Vec<ManufacturingPattern>,
    default_country: &str,
    default_confidence: ConfidenceTier,
) -> BrandIntelligence {
    BrandIntelligence {
        headquarters: headquarters.to_string(),
        patterns,
        default_country: default_country.to_string(),
        default_confidence,
    }
}

impl Default for BrandTable {
    fn default() -> Self {
        use ConfidenceTier::{High, Low, Medium};

        Self {
            intelligence: hashmap! {
                "ninja" => intelligence("USA", vec![
                    pattern("kitchen appliances", "China", Medium),
                    pattern("cookware", "China", Medium),
                    pattern("air fryer", "China", High),
                    pattern("blender", "China", High),
                ], "China", Low),
                "instant pot" => intelligence("Canada", vec![
                    pattern("pressure cooker", "China", High),
                    pattern("air fryer", "China", High),
                ], "China", Medium),
                "tefal" => intelligence("France", vec![
                    pattern("cookware", "France", Medium),
                    pattern("small appliances", "China", Medium),
                ], "France", Low),
                "kitchenaid" => intelligence("USA", vec![
                    pattern("stand mixer", "USA", High),
                    pattern("small appliances", "China", Medium),
                ], "USA", Low),
            },
            origins: hashmap! {
                "apple" => BrandFact::verified("USA"),
                "sony" => BrandFact::verified("Japan"),
                "dyson" => BrandFact::verified("UK"),
                "samsung" => BrandFact::verified("South Korea"),
                "lego" => BrandFact::verified("Denmark"),
                "ikea" => BrandFact::verified("Sweden"),
                "bosch" => BrandFact::verified("Germany"),
                "adidas" => BrandFact::verified("Germany"),
                "nike" => BrandFact::verified("USA"),
                "huawei" => BrandFact::verified("China"),
                "philips" => BrandFact::verified("Netherlands"),
                "nintendo" => BrandFact::verified("Japan"),
                "panasonic" => BrandFact::verified("Japan"),
                "nokia" => BrandFact::verified("Finland"),
                "tefal" => BrandFact::verified("France"),
                "logitech" => BrandFact::verified("Switzerland"),
                "anker" => BrandFact::generic("China"),
                "xiaomi" => BrandFact::generic("China"),
                "lenovo" => BrandFact::generic("China"),
                "microsoft" => BrandFact::generic("USA"),
                "mattel" => BrandFact::generic("USA"),
                "ninja" => BrandFact::generic("USA"),
                "kitchenaid" => BrandFact::generic("USA"),
                "instant pot" => BrandFact::generic("Canada"),
            },
            materials: hashmap! {
                "apple" => BrandFact::verified("Aluminium"),
                "nike" => BrandFact::verified("Synthetic"),
                "ikea" => BrandFact::generic("Wood"),
            },
            title_origin_hints: [
                ("huawei", "China"),
                ("adidas", "Germany"),
                ("apple", "USA"),
                ("nike", "USA"),
                ("sony", "Japan"),
                ("dyson", "UK"),
            ]
            .iter()
            .map(|(k, c)| (k.to_string(), c.to_string()))
            .collect(),
            packaging_categories: vec![
                PackagingCategory {
                    name: "books".to_string(),
                    keywords: vec!["book".into(), "novel".into(), "guide".into()],
                    packaging: "Paper".to_string(),
                },
                PackagingCategory {
                    name: "food".to_string(),
                    keywords: vec!["food".into(), "snack".into(), "organic".into()],
                    packaging: "Mixed".to_string(),
                },
            ],
        }
    }
}

impl BrandTable {
    /// Lookup key for a product's brand
    ///
    /// An explicit brand wins. Otherwise the first two title words are tried,
    /// then the first word, preferring whichever is a known brand.
    pub fn brand_key(&self, brand: Option<&str>, title: &str) -> Option<String> {
        if let Some(brand) = brand.map(normalize_key).filter(|b| !b.is_empty()) {
            return Some(brand);
        }

        let words: Vec<String> = title
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        let first = words.first()?.clone();
        if let Some(second) = words.get(1) {
            let two = format!("{} {}", first, second);
            if self.is_known(&two) {
                return Some(two);
            }
        }
        Some(first)
    }

    pub fn is_known(&self, brand_key: &str) -> bool {
        self.intelligence.contains_key(brand_key)
            || self.origins.contains_key(brand_key)
            || self.materials.contains_key(brand_key)
    }

    /// Context-aware origin guess for a brand and product title
    ///
    /// Unknown brands selling kitchen goods get a low-confidence China guess.
    pub fn intelligence(&self, brand_key: &str, title: &str) -> Option<IntelligenceHit> {
        if let Some(info) = self.intelligence.get(brand_key) {
            let hit = info
                .patterns
                .iter()
                .find(|p| contains_phrase(title, &p.product_type))
                .map(|p| IntelligenceHit {
                    country: p.country.clone(),
                    confidence: p.confidence,
                    reasoning: format!(
                        "Brand {} + product type '{}' -> {}",
                        brand_key, p.product_type, p.country
                    ),
                })
                .unwrap_or_else(|| IntelligenceHit {
                    country: info.default_country.clone(),
                    confidence: info.default_confidence,
                    reasoning: format!(
                        "Brand {} default manufacturing location (HQ {})",
                        brand_key, info.headquarters
                    ),
                });
            return Some(hit);
        }

        if KITCHEN_HINTS.iter().any(|hint| contains_phrase(title, hint)) {
            return Some(IntelligenceHit {
                country: "China".to_string(),
                confidence: ConfidenceTier::Low,
                reasoning: "Generic kitchen appliance -> likely China manufacturing".to_string(),
            });
        }

        None
    }

    pub fn origin(&self, brand_key: &str) -> Option<&BrandFact> {
        self.origins.get(brand_key)
    }

    pub fn material(&self, brand_key: &str) -> Option<&BrandFact> {
        self.materials.get(brand_key)
    }

    /// Country hinted by a well-known brand name anywhere in the title
    pub fn title_origin_hint(&self, title: &str) -> Option<&str> {
        self.title_origin_hints
            .iter()
            .find(|(keyword, _)| contains_phrase(title, keyword))
            .map(|(_, country)| country.as_str())
    }

    /// Packaging category for a title: (category name, default packaging)
    pub fn packaging_category(&self, title: &str) -> (&str, &str) {
        self.packaging_categories
            .iter()
            .find(|c| c.keywords.iter().any(|k| contains_phrase(title, k)))
            .map(|c| (c.name.as_str(), c.packaging.as_str()))
            .unwrap_or((DEFAULT_PACKAGING_CATEGORY, DEFAULT_PACKAGING))
    }

    pub fn with_overrides(mut self, overrides: &BrandOverrides) -> Self {
        for (brand, fact) in &overrides.origins {
            self.origins.insert(normalize_key(brand), fact.clone());
        }
        for (brand, fact) in &overrides.materials {
            self.materials.insert(normalize_key(brand), fact.clone());
        }
        self
    }
}
