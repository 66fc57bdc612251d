//! In-memory variation catalog with pattern and section indexes.

use std::collections::BTreeMap;
use tracing::warn;

use super::types::{PatternInfo, PatternVariation, VariationFilter, VariationStatistics};

/// Immutable, indexed set of pattern variations.
///
/// Built once from a source's records. Variations keep their load order;
/// the indexes hold positions into that order.
#[derive(Debug, Clone, Default)]
pub struct VariationCatalog {
    variations: Vec<PatternVariation>,
    by_pattern: BTreeMap<String, Vec<usize>>,
    by_section: BTreeMap<String, Vec<usize>>,
    pattern_order: Vec<String>,
    statistics: VariationStatistics,
}

impl VariationCatalog {
    /// Build a catalog, skipping records that are not 14 tiles with a
    /// 14-entry joker mask.
    pub fn new(records: Vec<PatternVariation>) -> Self {
        let mut variations = Vec::with_capacity(records.len());
        let mut skipped = 0;

        for record in records {
            if record.is_well_formed() {
                variations.push(record);
            } else {
                warn!(
                    variation = %record.variation_id(),
                    tiles = record.tiles.len(),
                    jokers = record.jokers.len(),
                    "Skipping malformed variation record"
                );
                skipped += 1;
            }
        }

        let mut by_pattern: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut by_section: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut pattern_order = Vec::new();

        for (idx, variation) in variations.iter().enumerate() {
            let entry = by_pattern.entry(variation.hand_key.clone()).or_default();
            if entry.is_empty() {
                pattern_order.push(variation.hand_key.clone());
            }
            entry.push(idx);
            by_section
                .entry(variation.section.clone())
                .or_default()
                .push(idx);
        }

        let statistics = VariationStatistics {
            total_variations: variations.len(),
            unique_patterns: pattern_order.len(),
            sections: by_section
                .iter()
                .map(|(section, idxs)| (section.clone(), idxs.len()))
                .collect(),
            skipped_records: skipped,
            average_variations_per_pattern: if pattern_order.is_empty() {
                0.0
            } else {
                variations.len() as f64 / pattern_order.len() as f64
            },
        };

        Self {
            variations,
            by_pattern,
            by_section,
            pattern_order,
            statistics,
        }
    }

    /// Variations of a pattern in load order. Empty for unknown keys.
    pub fn variations_for_pattern(&self, key: &str) -> Vec<&PatternVariation> {
        self.resolve(self.by_pattern.get(key))
    }

    /// Variations of a section in load order. Empty for unknown sections.
    pub fn variations_for_section(&self, section: &str) -> Vec<&PatternVariation> {
        self.resolve(self.by_section.get(section))
    }

    pub fn all_variations(&self) -> &[PatternVariation] {
        &self.variations
    }

    /// Variations satisfying every criterion of the filter.
    pub fn filter(&self, criteria: &VariationFilter) -> Vec<&PatternVariation> {
        self.variations
            .iter()
            .filter(|v| criteria.matches(v))
            .collect()
    }

    /// Pattern keys in order of first appearance.
    pub fn pattern_keys(&self) -> &[String] {
        &self.pattern_order
    }

    /// Section names, sorted.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.by_section.keys().map(String::as_str)
    }

    pub fn contains_pattern(&self, key: &str) -> bool {
        self.by_pattern.contains_key(key)
    }

    /// Number of variations of a pattern.
    pub fn variation_count(&self, key: &str) -> usize {
        self.by_pattern.get(key).map(Vec::len).unwrap_or(0)
    }

    pub fn statistics(&self) -> &VariationStatistics {
        &self.statistics
    }

    /// Metadata for every pattern, derived from its first variation.
    pub fn pattern_info(&self) -> Vec<PatternInfo> {
        self.pattern_order
            .iter()
            .filter_map(|key| self.variations_for_pattern(key).first().copied())
            .map(PatternInfo::from_variation)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.variations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variations.is_empty()
    }

    fn resolve(&self, idxs: Option<&Vec<usize>>) -> Vec<&PatternVariation> {
        idxs.map(|idxs| idxs.iter().map(|i| &self.variations[*i]).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileId;

    fn variation(key: &str, section: &str, sequence: u32, points: u32) -> PatternVariation {
        PatternVariation {
            year: 2025,
            section: section.to_string(),
            line: 1,
            pattern_id: 1,
            hand_key: key.to_string(),
            hand_pattern: format!("{} pattern", key),
            hand_criteria: String::new(),
            hand_points: points,
            hand_concealed: false,
            sequence,
            tiles: vec![TileId::from("1B"); 14],
            jokers: vec![true; 14],
        }
    }

    fn sample_catalog() -> VariationCatalog {
        VariationCatalog::new(vec![
            variation("B", "369", 1, 25),
            variation("A", "2025", 1, 30),
            variation("B", "369", 2, 25),
            variation("C", "2025", 1, 50),
        ])
    }

    #[test]
    fn test_index_by_pattern() {
        let catalog = sample_catalog();
        let b = catalog.variations_for_pattern("B");
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].sequence, 1);
        assert_eq!(b[1].sequence, 2);
        assert_eq!(catalog.variation_count("B"), 2);
    }

    #[test]
    fn test_index_by_section() {
        let catalog = sample_catalog();
        let section = catalog.variations_for_section("2025");
        let keys: Vec<&str> = section.iter().map(|v| v.hand_key.as_str()).collect();
        assert_eq!(keys, vec!["A", "C"]);

        let sections: Vec<&str> = catalog.sections().collect();
        assert_eq!(sections, vec!["2025", "369"]);
    }

    #[test]
    fn test_unknown_keys_are_empty() {
        let catalog = sample_catalog();
        assert!(catalog.variations_for_pattern("nope").is_empty());
        assert!(catalog.variations_for_section("nope").is_empty());
        assert_eq!(catalog.variation_count("nope"), 0);
        assert!(!catalog.contains_pattern("nope"));
    }

    #[test]
    fn test_pattern_order_is_first_appearance() {
        let catalog = sample_catalog();
        assert_eq!(catalog.pattern_keys(), &["B", "A", "C"]);
    }

    #[test]
    fn test_filter() {
        let catalog = sample_catalog();
        let hits = catalog.filter(&VariationFilter::new().sections(["2025"]).min_points(40));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].hand_key, "C");
    }

    #[test]
    fn test_statistics() {
        let catalog = sample_catalog();
        let stats = catalog.statistics();
        assert_eq!(stats.total_variations, 4);
        assert_eq!(stats.unique_patterns, 3);
        assert_eq!(stats.sections.get("2025"), Some(&2));
        assert_eq!(stats.sections.get("369"), Some(&2));
        assert_eq!(stats.skipped_records, 0);
        assert!((stats.average_variations_per_pattern - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_records_skipped() {
        let mut short = variation("D", "2025", 1, 25);
        short.tiles.pop();
        let mut bad_mask = variation("E", "2025", 1, 25);
        bad_mask.jokers.push(false);

        let catalog = VariationCatalog::new(vec![short, bad_mask, variation("A", "2025", 1, 25)]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.statistics().skipped_records, 2);
        assert!(catalog.variations_for_pattern("D").is_empty());
    }

    #[test]
    fn test_pattern_info() {
        let catalog = sample_catalog();
        let info = catalog.pattern_info();
        assert_eq!(info.len(), 3);
        assert_eq!(info[0].key, "B");
        assert_eq!(info[2].points, 50);
    }
}
