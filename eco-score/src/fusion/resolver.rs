// Attribute Resolver - Scraped vs Fallback Conflict Resolution
//
// One total function over the 2x2 presence matrix of (scraped, fallback).
// Decisions depend only on candidate values and source trust; field name and
// context only colour the reasoning text.

use std::collections::HashMap;
use tracing::debug;

use crate::tables::TrustTable;
use crate::types::{Candidate, ResolutionConfidence, ResolutionResult};
use crate::utils::normalize_key;

/// Scraped sources at or above this trust beat any disagreeing fallback
pub const HIGH_TRUST: u32 = 85;

/// Scraped sources below this trust yield to a disagreeing fallback
pub const MEDIUM_TRUST: u32 = 60;

/// Fallbacks at or below this trust lose to medium-trust scraped data
pub const WEAK_FALLBACK_TRUST: u32 = 50;

/// Value reported when neither side has data
pub const UNKNOWN_VALUE: &str = "Unknown";

/// Source reported when neither side has data
pub const NO_DATA_SOURCE: &str = "no_data";

/// Resolves one attribute from a scraped and a fallback candidate
#[derive(Debug, Clone, Copy)]
pub struct AttributeResolver<'a> {
    trust: &'a TrustTable,
}

impl<'a> AttributeResolver<'a> {
    pub fn new(trust: &'a TrustTable) -> Self {
        Self { trust }
    }

    /// Resolve `field_name` from the two candidates
    ///
    /// # Arguments
    /// * `scraped` - Value read from the page or supplied by the caller
    /// * `fallback` - Value inferred from brand/category/title knowledge
    /// * `field_name` - Attribute name, used in reasoning only
    /// * `context` - Extra facts for the reasoning (e.g. `brand_name`)
    pub fn resolve(
        &self,
        scraped: Option<&Candidate>,
        fallback: Option<&Candidate>,
        field_name: &str,
        context: &HashMap<String, String>,
    ) -> ResolutionResult {
        let scraped = scraped.and_then(|c| c.value().map(|v| (v, c.source())));
        let fallback = fallback.and_then(|c| c.value().map(|v| (v, c.source())));

        let result = match (scraped, fallback) {
            (Some((s_value, s_source)), Some((f_value, f_source))) => {
                if normalize_key(s_value) == normalize_key(f_value) {
                    self.confirmed(s_value, s_source, f_source)
                } else {
                    self.contest(s_value, s_source, f_value, f_source)
                }
            }
            (Some((s_value, s_source)), None) => self.scraped_only(s_value, s_source),
            (None, Some((f_value, f_source))) => ResolutionResult {
                value: f_value.to_string(),
                confidence: ResolutionConfidence::Medium,
                source: f_source.to_string(),
                reasoning: format!(
                    "Fallback only: {} from {} (no scraped data found)",
                    f_value, f_source
                ),
            },
            (None, None) => {
                let subject = context
                    .get("brand_name")
                    .map(String::as_str)
                    .filter(|b| !b.trim().is_empty())
                    .unwrap_or("product");
                ResolutionResult {
                    value: UNKNOWN_VALUE.to_string(),
                    confidence: ResolutionConfidence::None,
                    source: NO_DATA_SOURCE.to_string(),
                    reasoning: format!("No reliable {} data found for {}", field_name, subject),
                }
            }
        };

        debug!(
            "Resolved {}: {} ({}, {}) - {}",
            field_name, result.value, result.confidence, result.source, result.reasoning
        );
        result
    }

    fn confirmed(&self, value: &str, s_source: &str, f_source: &str) -> ResolutionResult {
        ResolutionResult {
            value: value.to_string(),
            confidence: ResolutionConfidence::VeryHigh,
            source: format!("{}_confirmed", s_source),
            reasoning: format!(
                "Scraped data ({}) matches fallback ({}): {}",
                s_source, f_source, value
            ),
        }
    }

    fn contest(
        &self,
        s_value: &str,
        s_source: &str,
        f_value: &str,
        f_source: &str,
    ) -> ResolutionResult {
        let s_trust = self.trust.trust(s_source);
        let f_trust = self.trust.trust(f_source);

        if s_trust >= HIGH_TRUST {
            return ResolutionResult {
                value: s_value.to_string(),
                confidence: ResolutionConfidence::High,
                source: s_source.to_string(),
                reasoning: format!(
                    "High-trust scraped data ({}, trust {}) overrides fallback: {} vs {}",
                    s_source, s_trust, s_value, f_value
                ),
            };
        }

        if s_trust >= MEDIUM_TRUST {
            if f_trust <= WEAK_FALLBACK_TRUST {
                return ResolutionResult {
                    value: s_value.to_string(),
                    confidence: ResolutionConfidence::MediumHigh,
                    source: s_source.to_string(),
                    reasoning: format!(
                        "Medium-trust scraped data ({}, trust {}) preferred over weak fallback ({}, trust {}): {}",
                        s_source, s_trust, f_source, f_trust, s_value
                    ),
                };
            }

            let (winner, winner_source) = if s_trust >= f_trust {
                (s_value, s_source)
            } else {
                (f_value, f_source)
            };
            return ResolutionResult {
                value: winner.to_string(),
                confidence: ResolutionConfidence::Medium,
                source: format!("{}_contested", winner_source),
                reasoning: format!(
                    "Close contest: {} ({}) vs {} ({}) -> chose {}",
                    s_value, s_trust, f_value, f_trust, winner
                ),
            };
        }

        ResolutionResult {
            value: f_value.to_string(),
            confidence: ResolutionConfidence::Medium,
            source: format!("{}_override", f_source),
            reasoning: format!(
                "Fallback overrides low-trust scraped data: {} ({}, trust {}) vs {} ({}, trust {})",
                f_value, f_source, f_trust, s_value, s_source, s_trust
            ),
        }
    }

    fn scraped_only(&self, value: &str, source: &str) -> ResolutionResult {
        let trust = self.trust.trust(source);
        let confidence = match trust {
            95..=100 => ResolutionConfidence::High,
            75..=94 => ResolutionConfidence::MediumHigh,
            50..=74 => ResolutionConfidence::Medium,
            0..=49 => ResolutionConfidence::LowMedium,
            _ => ResolutionConfidence::Low,
        };
        ResolutionResult {
            value: value.to_string(),
            confidence,
            source: source.to_string(),
            reasoning: format!(
                "Only scraped data available from {}: {} (trust: {})",
                source, value, trust
            ),
        }
    }
}
