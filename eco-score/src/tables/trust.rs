// Source Trust Table
//
// Fixed ordering of evidence sources used when scraped and fallback values
// disagree. Higher = more trustworthy, range 0..=100.

use std::collections::HashMap;
use tracing::debug;

pub const PAGE_EXPLICIT: &str = "page_explicit";
pub const TECHSPEC_ORIGIN: &str = "techspec_origin";
pub const PRODUCT_DETAILS: &str = "product_details";
pub const USER_INPUT: &str = "user_input";
pub const BLOB_FALLBACK: &str = "blob_fallback";
pub const BRAND_INTELLIGENCE: &str = "brand_intelligence";
pub const SHIPPING_PANEL: &str = "shipping_panel";
pub const BRAND_DB_VERIFIED: &str = "brand_db_verified";
pub const CATEGORY_DEFAULT: &str = "category_default";
pub const BRAND_DB_GENERIC: &str = "brand_db_generic";
pub const TITLE_GUESS: &str = "title_guess";
pub const NONE: &str = "none";

/// Highest trust score a source may carry
pub const MAX_TRUST: u32 = 100;

/// Source id → trust score
#[derive(Debug, Clone, PartialEq)]
pub struct TrustTable {
    scores: HashMap<String, u32>,
}

impl Default for TrustTable {
    fn default() -> Self {
        Self {
            scores: hashmap! {
                PAGE_EXPLICIT => 95,
                TECHSPEC_ORIGIN => 90,
                PRODUCT_DETAILS => 85,
                USER_INPUT => 85,
                BLOB_FALLBACK => 75,
                BRAND_INTELLIGENCE => 70,
                SHIPPING_PANEL => 60,
                BRAND_DB_VERIFIED => 55,
                CATEGORY_DEFAULT => 45,
                BRAND_DB_GENERIC => 40,
                TITLE_GUESS => 30,
                NONE => 0,
            },
        }
    }
}

impl TrustTable {
    /// Trust score for a source id; unknown ids score 0
    pub fn trust(&self, source: &str) -> u32 {
        self.scores.get(source).copied().unwrap_or(0)
    }

    /// Replace or add scores, clamping each to `MAX_TRUST`
    pub fn with_overrides(mut self, overrides: &HashMap<String, u32>) -> Self {
        for (source, score) in overrides {
            let clamped = (*score).min(MAX_TRUST);
            debug!("Trust override: {} = {}", source, clamped);
            self.scores.insert(source.clone(), clamped);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_ordering() {
        let table = TrustTable::default();
        let ordered = [
            PAGE_EXPLICIT,
            TECHSPEC_ORIGIN,
            PRODUCT_DETAILS,
            BLOB_FALLBACK,
            BRAND_INTELLIGENCE,
            SHIPPING_PANEL,
            BRAND_DB_VERIFIED,
            BRAND_DB_GENERIC,
            TITLE_GUESS,
            NONE,
        ];
        for pair in ordered.windows(2) {
            assert!(
                table.trust(pair[0]) > table.trust(pair[1]),
                "{} should outrank {}",
                pair[0],
                pair[1]
            );
        }
        assert_eq!(table.trust(USER_INPUT), table.trust(PRODUCT_DETAILS));
        assert!(table.trust(CATEGORY_DEFAULT) > table.trust(BRAND_DB_GENERIC));
        assert!(table.trust(CATEGORY_DEFAULT) < table.trust(BRAND_DB_VERIFIED));
    }

    #[test]
    fn test_unknown_source_is_zero() {
        assert_eq!(TrustTable::default().trust("rumour"), 0);
    }

    #[test]
    fn test_overrides_clamped() {
        let mut overrides = HashMap::new();
        overrides.insert("shipping_panel".to_string(), 65);
        overrides.insert("oracle".to_string(), 250);
        let table = TrustTable::default().with_overrides(&overrides);
        assert_eq!(table.trust(SHIPPING_PANEL), 65);
        assert_eq!(table.trust("oracle"), MAX_TRUST);
        assert_eq!(table.trust(PAGE_EXPLICIT), 95);
    }
}
