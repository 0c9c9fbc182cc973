// Material Aggregator
//
// Parses composition text ("59% Rubber, 41% Cotton", "Aluminium, Plastic")
// into canonical material entries, deduplicated and ordered by
// environmental priority.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::tables::{MaterialTable, UNKNOWN_MATERIAL};
use crate::types::{ConfidenceTier, MaterialEntry};

static PERCENTAGE_RE: OnceLock<Regex> = OnceLock::new();
static LIST_NOISE_RE: OnceLock<Regex> = OnceLock::new();

fn percentage_re() -> &'static Regex {
    PERCENTAGE_RE.get_or_init(|| {
        Regex::new(r"(\d+(?:\.\d+)?)\s*%\s*([A-Za-z][A-Za-z\s\-]*)").expect("valid regex")
    })
}

fn list_noise_re() -> &'static Regex {
    LIST_NOISE_RE.get_or_init(|| Regex::new(r"[^\w\s\-]").expect("valid regex"))
}

#[derive(Debug, Clone, Copy)]
pub struct MaterialAggregator<'a> {
    table: &'a MaterialTable,
}

impl<'a> MaterialAggregator<'a> {
    pub fn new(table: &'a MaterialTable) -> Self {
        Self { table }
    }

    /// Parse and then deduplicate/prioritize
    pub fn aggregate(&self, raw_text: &str) -> Vec<MaterialEntry> {
        self.deduplicate_and_prioritize(self.parse_materials(raw_text))
    }

    /// Parse composition text into material entries
    ///
    /// Percentage annotations give high-confidence entries with fraction
    /// pct/100. Without annotations the text is split on commas and each
    /// segment gets an equal share (medium confidence).
    pub fn parse_materials(&self, raw_text: &str) -> Vec<MaterialEntry> {
        let annotated: Vec<_> = percentage_re().captures_iter(raw_text).collect();

        let entries: Vec<MaterialEntry> = if !annotated.is_empty() {
            annotated
                .iter()
                .filter_map(|caps| {
                    let percent: f64 = caps[1].parse().ok()?;
                    if percent <= 0.0 {
                        debug!("Dropping zero-percent material: {}", &caps[0]);
                        return None;
                    }
                    let name_text = caps[2].trim();
                    let name = self.table.normalize(name_text);
                    if name == UNKNOWN_MATERIAL {
                        return None;
                    }
                    Some(MaterialEntry {
                        name,
                        weight_fraction: (percent / 100.0).min(1.0),
                        confidence: ConfidenceTier::High,
                        raw_text: format!("{}% {}", &caps[1], name_text),
                    })
                })
                .collect()
        } else {
            let parts: Vec<&str> = raw_text
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect();
            let share = if parts.len() > 1 {
                1.0 / parts.len() as f64
            } else {
                1.0
            };

            parts
                .into_iter()
                .filter_map(|part| {
                    let cleaned = list_noise_re().replace_all(part, "");
                    let cleaned = cleaned.trim();
                    // Single characters are noise
                    if cleaned.chars().count() <= 1 {
                        return None;
                    }
                    let name = self.table.normalize(cleaned);
                    if name == UNKNOWN_MATERIAL {
                        return None;
                    }
                    Some(MaterialEntry {
                        name,
                        weight_fraction: share,
                        confidence: ConfidenceTier::Medium,
                        raw_text: part.to_string(),
                    })
                })
                .collect()
        };

        debug!("Parsed {} material(s) from '{}'", entries.len(), raw_text);
        entries
    }

    /// Merge duplicate names (higher confidence kept) and sort by
    /// (priority, confidence) descending; ties keep input order
    pub fn deduplicate_and_prioritize(&self, entries: Vec<MaterialEntry>) -> Vec<MaterialEntry> {
        let mut unique: Vec<MaterialEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match unique.iter_mut().find(|e| e.name == entry.name) {
                Some(existing) => {
                    if entry.confidence > existing.confidence {
                        *existing = entry;
                    }
                }
                None => unique.push(entry),
            }
        }

        unique.sort_by(|a, b| {
            let key_a = (self.table.priority(&a.name), a.confidence);
            let key_b = (self.table.priority(&b.name), b.confidence);
            key_b.cmp(&key_a)
        });
        unique
    }
}

/// Name of the first (highest-priority) entry, or "Unknown"
pub fn primary_material(entries: &[MaterialEntry]) -> &str {
    entries
        .first()
        .map(|e| e.name.as_str())
        .unwrap_or(UNKNOWN_MATERIAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, fraction: f64, confidence: ConfidenceTier) -> MaterialEntry {
        MaterialEntry {
            name: name.to_string(),
            weight_fraction: fraction,
            confidence,
            raw_text: name.to_string(),
        }
    }

    #[test]
    fn test_percentage_annotations() {
        let table = MaterialTable::default();
        let entries = MaterialAggregator::new(&table).parse_materials("59% Rubber, 41% Cotton");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Rubber");
        assert!((entries[0].weight_fraction - 0.59).abs() < 1e-9);
        assert_eq!(entries[0].confidence, ConfidenceTier::High);
        assert_eq!(entries[0].raw_text, "59% Rubber");
        assert_eq!(entries[1].name, "Cotton");
        assert!((entries[1].weight_fraction - 0.41).abs() < 1e-9);
    }

    #[test]
    fn test_zero_and_oversized_percentages() {
        let table = MaterialTable::default();
        let entries =
            MaterialAggregator::new(&table).parse_materials("0% Plastic, 150% Aluminum");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Aluminium");
        assert_eq!(entries[0].weight_fraction, 1.0);
    }

    #[test]
    fn test_comma_list_equal_shares() {
        let table = MaterialTable::default();
        let entries = MaterialAggregator::new(&table).parse_materials("Aluminium, Plastic");
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| (e.weight_fraction - 0.5).abs() < 1e-9));
        assert!(entries.iter().all(|e| e.confidence == ConfidenceTier::Medium));
    }

    #[test]
    fn test_list_drops_noise_and_unknown() {
        let table = MaterialTable::default();
        let entries = MaterialAggregator::new(&table).parse_materials("Steel, x, Other, n/a");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Steel");
        assert!((entries[0].weight_fraction - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_single_material_full_share() {
        let table = MaterialTable::default();
        let entries = MaterialAggregator::new(&table).parse_materials("Glass");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].weight_fraction, 1.0);
        assert!(MaterialAggregator::new(&table).parse_materials("").is_empty());
    }

    #[test]
    fn test_dedup_keeps_higher_confidence() {
        let table = MaterialTable::default();
        let entries = MaterialAggregator::new(&table).deduplicate_and_prioritize(vec![
            entry("Plastic", 0.5, ConfidenceTier::Low),
            entry("Plastic", 0.3, ConfidenceTier::High),
        ]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].confidence, ConfidenceTier::High);
        assert_eq!(entries[0].weight_fraction, 0.3);
    }

    #[test]
    fn test_priority_order() {
        let table = MaterialTable::default();
        let entries = MaterialAggregator::new(&table).deduplicate_and_prioritize(vec![
            entry("Wood", 0.2, ConfidenceTier::High),
            entry("Plastic", 0.2, ConfidenceTier::Medium),
            entry("Aluminium", 0.2, ConfidenceTier::Low),
            entry("Cotton", 0.2, ConfidenceTier::Medium),
            entry("Foam", 0.2, ConfidenceTier::Medium),
        ]);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Aluminium", "Cotton", "Wood", "Plastic", "Foam"]);
        assert_eq!(primary_material(&entries), "Aluminium");
    }

    #[test]
    fn test_substring_keywords_ignored() {
        let table = MaterialTable::default();
        let entries = MaterialAggregator::new(&table).aggregate("Environment-safe Bamboo, Cotton");
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Cotton", "Wood"]);
    }

    #[test]
    fn test_priority_ties_break_on_confidence() {
        let table = MaterialTable::default();
        let entries = MaterialAggregator::new(&table).deduplicate_and_prioritize(vec![
            entry("Nylon", 0.5, ConfidenceTier::Medium),
            entry("Polyester", 0.5, ConfidenceTier::High),
        ]);
        assert_eq!(primary_material(&entries), "Polyester");
    }

    #[test]
    fn test_primary_material_empty() {
        assert_eq!(primary_material(&[]), UNKNOWN_MATERIAL);
    }

    #[test]
    fn test_aggregate_percentages_prioritized() {
        let table = MaterialTable::default();
        let entries = MaterialAggregator::new(&table).aggregate("59% Rubber, 41% Cotton");
        // Cotton outranks Rubber regardless of share
        assert_eq!(primary_material(&entries), "Cotton");
    }
}
