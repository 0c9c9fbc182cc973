// Fallback Candidate Builders
//
// Field-specific knowledge lives here; the resolver stays generic. Every
// candidate is tagged with the trust-table source it came from.

use tracing::debug;

use crate::tables::{trust, BrandFact, Tables, UNKNOWN_MATERIAL};
use crate::types::{Candidate, ConfidenceTier};

/// Builds fallback candidates from brand, category and title knowledge
#[derive(Debug, Clone, Copy)]
pub struct CandidateBuilder<'a> {
    tables: &'a Tables,
}

fn brand_db_source(fact: &BrandFact) -> &'static str {
    if fact.verified {
        trust::BRAND_DB_VERIFIED
    } else {
        trust::BRAND_DB_GENERIC
    }
}

impl<'a> CandidateBuilder<'a> {
    pub fn new(tables: &'a Tables) -> Self {
        Self { tables }
    }

    /// Country of origin fallback
    ///
    /// Order: brand intelligence (only when its own confidence is medium or
    /// better), brand database, then a title guess. `None` when nothing matches.
    pub fn origin(&self, brand_key: Option<&str>, title: &str) -> Option<Candidate> {
        if let Some(brand) = brand_key {
            if let Some(hit) = self.tables.brands.intelligence(brand, title) {
                if hit.confidence >= ConfidenceTier::Medium {
                    debug!("Origin fallback from brand intelligence: {}", hit.reasoning);
                    return Some(Candidate::fallback(hit.country, trust::BRAND_INTELLIGENCE));
                }
                debug!(
                    "Brand intelligence too weak ({:?}), skipping: {}",
                    hit.confidence, hit.reasoning
                );
            }

            if let Some(fact) = self.tables.brands.origin(brand) {
                let country = self.tables.origins.normalize_country(&fact.value);
                return Some(Candidate::fallback(country, brand_db_source(fact)));
            }
        }

        let guess = self
            .tables
            .brands
            .title_origin_hint(title)
            .or_else(|| self.tables.origins.find_in_title(title));
        guess.map(|country| Candidate::fallback(country, trust::TITLE_GUESS))
    }

    /// Material fallback: brand material table, then a title keyword
    pub fn material(&self, brand_key: Option<&str>, title: &str) -> Option<Candidate> {
        if let Some(fact) = brand_key.and_then(|b| self.tables.brands.material(b)) {
            let material = self.tables.materials.normalize(&fact.value);
            if material != UNKNOWN_MATERIAL {
                return Some(Candidate::fallback(material, brand_db_source(fact)));
            }
        }

        self.tables
            .materials
            .find_in_text(title)
            .map(|material| Candidate::fallback(material, trust::TITLE_GUESS))
    }

    /// Packaging fallback: category default from title keywords
    pub fn packaging(&self, title: &str) -> Candidate {
        let (category, packaging) = self.tables.brands.packaging_category(title);
        debug!("Packaging category '{}' -> {}", category, packaging);
        Candidate::fallback(packaging, trust::CATEGORY_DEFAULT)
    }
}
