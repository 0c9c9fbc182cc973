// Recyclability Estimator
//
// Weighted average of per-material base rates over the aggregated materials.

use tracing::debug;

use crate::tables::MaterialTable;
use crate::types::{MaterialEntry, Recyclability, RecyclabilityLevel};

/// Materials named in a compound description before "+N more"
const DESCRIBED_MATERIALS: usize = 3;

/// Weighted recyclability of a material list
///
/// `percentage = round(Σ rate×w / Σ w)`, with Σw taken as 1.0 when zero.
/// An empty list is `Unknown` at 0%.
pub fn weighted_recyclability(entries: &[MaterialEntry], table: &MaterialTable) -> Recyclability {
    if entries.is_empty() {
        return Recyclability::unknown();
    }

    let total_weight: f64 = entries.iter().map(|e| e.weight_fraction).sum();
    let total_weight = if total_weight > 0.0 { total_weight } else { 1.0 };

    let weighted: f64 = entries
        .iter()
        .map(|e| f64::from(table.recyclability_rate(&e.name)) * e.weight_fraction / total_weight)
        .sum();
    let percentage = weighted.round().clamp(0.0, 100.0) as u8;

    let contributing: Vec<String> = entries
        .iter()
        .filter_map(|e| {
            let rate = table.recyclability_rate(&e.name);
            (rate > 0).then(|| format!("{} ({}%)", e.name, rate))
        })
        .collect();

    let description = if entries.len() == 1 {
        format!(
            "Single material: {}",
            contributing
                .first()
                .cloned()
                .unwrap_or_else(|| format!("{} (no recycling data)", entries[0].name))
        )
    } else {
        let mut text = format!(
            "Compound material: {}",
            contributing
                .iter()
                .take(DESCRIBED_MATERIALS)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );
        if contributing.len() > DESCRIBED_MATERIALS {
            text.push_str(&format!(" +{} more", contributing.len() - DESCRIBED_MATERIALS));
        }
        text
    };

    let level = RecyclabilityLevel::from_percentage(percentage);
    debug!(
        "Recyclability: {}% ({}) from {} material(s)",
        percentage,
        level,
        entries.len()
    );

    Recyclability {
        level,
        percentage,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConfidenceTier;

    fn entry(name: &str, fraction: f64) -> MaterialEntry {
        MaterialEntry {
            name: name.to_string(),
            weight_fraction: fraction,
            confidence: ConfidenceTier::Medium,
            raw_text: name.to_string(),
        }
    }

    #[test]
    fn test_empty_is_unknown() {
        let result = weighted_recyclability(&[], &MaterialTable::default());
        assert_eq!(result.level, RecyclabilityLevel::Unknown);
        assert_eq!(result.percentage, 0);
    }

    #[test]
    fn test_single_material() {
        let result = weighted_recyclability(&[entry("Aluminium", 1.0)], &MaterialTable::default());
        assert_eq!(result.percentage, 90);
        assert_eq!(result.level, RecyclabilityLevel::High);
        assert_eq!(result.description, "Single material: Aluminium (90%)");
    }

    #[test]
    fn test_weighted_average() {
        // 0.59 × 20 + 0.41 × 50 = 32.3
        let result = weighted_recyclability(
            &[entry("Rubber", 0.59), entry("Cotton", 0.41)],
            &MaterialTable::default(),
        );
        assert_eq!(result.percentage, 32);
        assert_eq!(result.level, RecyclabilityLevel::Low);
        assert_eq!(
            result.description,
            "Compound material: Rubber (20%), Cotton (50%)"
        );
    }

    #[test]
    fn test_fractions_not_summing_to_one() {
        // Σw = 0.5, so shares are renormalized: (90×0.25 + 55×0.25) / 0.5 = 72.5
        let result = weighted_recyclability(
            &[entry("Aluminium", 0.25), entry("Plastic", 0.25)],
            &MaterialTable::default(),
        );
        assert_eq!(result.percentage, 73);
        assert_eq!(result.level, RecyclabilityLevel::High);
    }

    #[test]
    fn test_unknown_materials_score_zero() {
        let result = weighted_recyclability(&[entry("Ceramic", 1.0)], &MaterialTable::default());
        assert_eq!(result.percentage, 0);
        assert_eq!(result.level, RecyclabilityLevel::VeryLow);
        assert!(result.description.contains("Ceramic"));
    }

    #[test]
    fn test_description_truncates() {
        let entries: Vec<_> = ["Aluminium", "Steel", "Glass", "Paper", "Plastic"]
            .iter()
            .map(|n| entry(n, 0.2))
            .collect();
        let result = weighted_recyclability(&entries, &MaterialTable::default());
        assert!(result.description.ends_with(" +2 more"), "{}", result.description);
        assert!(result.description.starts_with("Compound material: Aluminium (90%), Steel (85%), Glass (80%)"));
    }
}
