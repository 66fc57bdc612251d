//! Facts engine.
//!
//! Matches a hand against every variation of the requested patterns and
//! reports what is true: tiles matched, tiles missing, where jokers could
//! go, and how many of the missing tiles are still in the wall. No scoring
//! and no opinions; that is left to the ranking engine.

mod types;

pub use types::{
    JokerAnalysis, MissingTileAvailability, PatternFacts, Progress, TileContribution,
    TileMatching, VariationMatch, WallAvailability,
};

use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::context::GameContext;
use crate::repository::{PatternVariation, VariationCatalog};
use crate::tile::{count_tiles, original_supply, TileCounts, TileId, HAND_SIZE};

/// Computes matching facts against a loaded catalog.
#[derive(Debug, Clone)]
pub struct FactsEngine {
    catalog: Arc<VariationCatalog>,
}

impl FactsEngine {
    pub fn new(catalog: Arc<VariationCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &VariationCatalog {
        &self.catalog
    }

    /// Analyze the hand against each requested pattern.
    ///
    /// Output follows the order of `pattern_keys`. Keys with no variations
    /// and repeated keys are skipped.
    pub fn analyze_patterns(
        &self,
        hand: &[TileId],
        pattern_keys: &[String],
        context: &GameContext,
    ) -> Vec<PatternFacts> {
        let hand_counts = count_tiles(hand);
        let discards = context.discard_counts();
        let exposed = context.exposed_counts();
        let jokers_available = context
            .jokers_in_hand
            .max(hand_counts.get(&TileId::from("joker")));

        let mut seen = HashSet::new();
        let mut results = Vec::new();

        for key in pattern_keys {
            if !seen.insert(key.as_str()) {
                continue;
            }
            let variations = self.catalog.variations_for_pattern(key);
            if variations.is_empty() {
                debug!(pattern = %key, "No variations for pattern, skipping");
                continue;
            }

            results.push(analyze_pattern(
                key,
                &variations,
                &hand_counts,
                jokers_available,
                &discards,
                &exposed,
            ));
        }

        debug!(
            requested = pattern_keys.len(),
            analyzed = results.len(),
            hand_size = hand.len(),
            "Pattern facts computed"
        );
        results
    }
}

fn analyze_pattern(
    key: &str,
    variations: &[&PatternVariation],
    hand: &TileCounts,
    jokers_available: u32,
    discards: &TileCounts,
    exposed: &TileCounts,
) -> PatternFacts {
    let matches: Vec<(VariationMatch, &PatternVariation)> = variations
        .iter()
        .map(|v| (match_variation(hand, v), *v))
        .collect();

    // Best: most tiles matched, then lowest sequence, then load order.
    // Worst: fewest tiles matched, same tie-break.
    let best_idx = select(&matches, |m| std::cmp::Reverse(m.tiles_matched));
    let worst_idx = select(&matches, |m| m.tiles_matched);

    let average_completion =
        matches.iter().map(|(m, _)| m.completion_ratio).sum::<f64>() / matches.len() as f64;

    let (best, best_variation) = &matches[best_idx];
    let joker_analysis = joker_facts(best, best_variation, jokers_available);
    let wall_availability = wall_facts(best, discards, exposed);

    let first = variations[0];
    PatternFacts {
        pattern_id: key.to_string(),
        points: first.hand_points,
        concealed: first.hand_concealed,
        total_variations: variations.len(),
        progress: Progress {
            tiles_needed: best.missing_tiles.len() as u32,
            pairs_formed: hand.kinds_with_at_least(2) as u32,
            sets_formed: hand.kinds_with_at_least(3) as u32,
        },
        tile_matching: TileMatching {
            best_variation: best.clone(),
            worst_variation: matches[worst_idx].0.clone(),
            average_completion,
        },
        joker_analysis,
        wall_availability,
    }
}

/// Index of the match minimizing `(rank(match), sequence, load order)`.
fn select<K: Ord>(
    matches: &[(VariationMatch, &PatternVariation)],
    rank: impl Fn(&VariationMatch) -> K,
) -> usize {
    matches
        .iter()
        .enumerate()
        .min_by_key(|(idx, (m, _))| (rank(m), m.sequence, *idx))
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

/// Exact multiset intersection of the hand with one variation.
pub fn match_variation(hand: &TileCounts, variation: &PatternVariation) -> VariationMatch {
    let required = count_tiles(&variation.tiles);

    let mut tiles_matched = 0;
    let mut missing_tiles = Vec::new();
    for (kind, needed) in required.iter() {
        let have = hand.get(kind).min(needed);
        tiles_matched += have;
        missing_tiles.extend(std::iter::repeat(kind.clone()).take((needed - have) as usize));
    }

    let tile_contributions = hand
        .kinds()
        .map(|kind| {
            let positions: Vec<usize> = variation
                .tiles
                .iter()
                .enumerate()
                .filter(|(_, tile)| tile.canonical() == *kind)
                .map(|(idx, _)| idx)
                .collect();
            let is_critical = match positions.len() {
                0 => false,
                1 => !variation.jokers.get(positions[0]).copied().unwrap_or(false),
                _ => true,
            };
            TileContribution {
                tile_id: kind.clone(),
                is_required: !positions.is_empty(),
                is_critical,
                positions,
            }
        })
        .collect();

    VariationMatch {
        variation_id: variation.variation_id(),
        sequence: variation.sequence,
        tiles_matched,
        completion_ratio: tiles_matched as f64 / HAND_SIZE as f64,
        missing_tiles,
        tile_contributions,
    }
}

fn joker_facts(
    best: &VariationMatch,
    variation: &PatternVariation,
    jokers_available: u32,
) -> JokerAnalysis {
    let missing: HashSet<&TileId> = best.missing_tiles.iter().collect();

    let substitutable_positions: Vec<usize> = variation
        .tiles
        .iter()
        .enumerate()
        .filter(|(idx, tile)| {
            variation.jokers.get(*idx).copied().unwrap_or(false)
                && missing.contains(&tile.canonical())
        })
        .map(|(idx, _)| idx)
        .collect();

    let missing_count = best.missing_tiles.len() as u32;
    let max_jokers_useful = substitutable_positions.len() as u32;
    let placed = jokers_available.min(max_jokers_useful).min(missing_count);

    JokerAnalysis {
        jokers_available,
        joker_slots: variation.joker_slots() as u32,
        substitutable_positions,
        max_jokers_useful,
        jokers_to_complete: missing_count.saturating_sub(jokers_available),
        with_jokers_completion: (best.tiles_matched + placed) as f64 / HAND_SIZE as f64,
    }
}

fn wall_facts(best: &VariationMatch, discards: &TileCounts, exposed: &TileCounts) -> WallAvailability {
    let missing = count_tiles(&best.missing_tiles);

    let missing_tiles: Vec<MissingTileAvailability> = missing
        .iter()
        .map(|(kind, needed)| {
            let supply = original_supply(kind);
            let in_discards = discards.get(kind);
            let exposed = exposed.get(kind);
            MissingTileAvailability {
                tile_id: kind.clone(),
                needed,
                original_supply: supply,
                in_discards,
                exposed,
                remaining_available: supply.saturating_sub(in_discards + exposed),
            }
        })
        .collect();

    let total_missing_in_wall = missing_tiles.iter().map(|m| m.remaining_available).sum();
    let total_missing_needed = missing.total();

    WallAvailability {
        missing_tiles,
        total_missing_in_wall,
        total_missing_needed,
        availability_ratio: if total_missing_needed == 0 {
            0.0
        } else {
            total_missing_in_wall as f64 / total_missing_needed as f64
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn engine() -> FactsEngine {
        FactsEngine::new(Arc::new(fixtures::sample_catalog()))
    }

    fn ids(tiles: &[&str]) -> Vec<TileId> {
        tiles.iter().map(|t| TileId::from(*t)).collect()
    }

    fn make_variation(key: &str, sequence: u32, tiles: &[&str], jokers: &[bool]) -> PatternVariation {
        PatternVariation {
            year: 2025,
            section: "TEST".to_string(),
            line: 1,
            pattern_id: 1,
            hand_key: key.to_string(),
            hand_pattern: String::new(),
            hand_criteria: String::new(),
            hand_points: 25,
            hand_concealed: false,
            sequence,
            tiles: ids(tiles),
            jokers: jokers.to_vec(),
        }
    }

    /// Kong-kong-kong-pair variation over the given four kinds.
    fn kongs(key: &str, sequence: u32, a: &str, b: &str, c: &str, pair: &str) -> PatternVariation {
        let tiles = [a, a, a, a, b, b, b, b, c, c, c, c, pair, pair];
        let mut jokers = vec![true; 12];
        jokers.extend([false, false]);
        make_variation(key, sequence, &tiles, &jokers)
    }

    #[test]
    fn test_sample_hand_facts_are_bounded() {
        let hand = fixtures::sample_hand();
        let context = fixtures::charleston_context(&hand);
        let facts = engine().analyze_patterns(&hand, &fixtures::sample_pattern_keys(), &context);

        assert_eq!(facts.len(), 3);
        for fact in &facts {
            for m in [&fact.tile_matching.best_variation, &fact.tile_matching.worst_variation] {
                assert!(m.tiles_matched <= 14);
                assert_eq!(m.completion_ratio, m.tiles_matched as f64 / 14.0);
                assert_eq!(m.missing_tiles.len() as u32, 14 - m.tiles_matched);
            }
            assert!(
                fact.best_completion() >= fact.tile_matching.worst_variation.completion_ratio,
                "best below worst for {}",
                fact.pattern_id
            );
        }
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let hand = fixtures::sample_hand();
        let context = fixtures::gameplay_context(&hand, 60);
        let keys = fixtures::sample_pattern_keys();
        let engine = engine();
        assert_eq!(
            engine.analyze_patterns(&hand, &keys, &context),
            engine.analyze_patterns(&hand, &keys, &context)
        );
    }

    #[test]
    fn test_unknown_and_duplicate_keys_skipped() {
        let hand = fixtures::sample_hand();
        let context = fixtures::charleston_context(&hand);
        let keys = vec![
            "NOPE".to_string(),
            fixtures::WINDS_DRAGONS.to_string(),
            fixtures::WINDS_DRAGONS.to_string(),
        ];
        let facts = engine().analyze_patterns(&hand, &keys, &context);
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].pattern_id, fixtures::WINDS_DRAGONS);
    }

    #[test]
    fn test_match_counts_min_of_held_and_required() {
        let hand = count_tiles(&ids(&["6B", "6B", "6B", "6B", "6B", "1C"]));
        let variation = kongs("K", 1, "6B", "1C", "2D", "white");
        let m = match_variation(&hand, &variation);

        assert_eq!(m.tiles_matched, 5);
        assert_eq!(m.missing_tiles.len(), 9);
        assert_eq!(m.missing_tiles[0], TileId::from("1C"));

        let six = m.contribution(&TileId::from("6B")).unwrap();
        assert_eq!(six.positions, vec![0, 1, 2, 3]);
        assert!(six.is_required && six.is_critical);
    }

    #[test]
    fn test_single_critical_only_without_joker() {
        let tiles = [
            "flower", "flower", "flower", "flower", "2D", "white", "2D", "5D", "2B", "2B", "2B",
            "2C", "2C", "2C",
        ];
        let mut jokers = vec![true; 14];
        jokers[4..8].iter_mut().for_each(|j| *j = false);
        let variation = make_variation("Y", 1, &tiles, &jokers);

        let hand = count_tiles(&ids(&["white", "5D", "2B", "9C"]));
        let m = match_variation(&hand, &variation);

        assert!(m.contribution(&TileId::from("white")).unwrap().is_critical);
        assert!(m.contribution(&TileId::from("5D")).unwrap().is_critical);
        // 2B appears three times: critical by count.
        assert!(m.contribution(&TileId::from("2B")).unwrap().is_critical);
        let nine = m.contribution(&TileId::from("9C")).unwrap();
        assert!(!nine.is_required && !nine.is_critical);
        assert!(nine.positions.is_empty());
    }

    #[test]
    fn test_tie_break_prefers_lowest_sequence() {
        let catalog = VariationCatalog::new(vec![
            kongs("T", 3, "1B", "2B", "3B", "red"),
            kongs("T", 1, "1C", "2C", "3C", "red"),
            kongs("T", 2, "1D", "2D", "3D", "red"),
        ]);
        let engine = FactsEngine::new(Arc::new(catalog));
        // Hand matches every variation equally (the red pair only).
        let hand = ids(&["red", "red"]);
        let facts = engine.analyze_patterns(&hand, &["T".to_string()], &GameContext::default());

        let matching = &facts[0].tile_matching;
        assert_eq!(matching.best_variation.sequence, 1);
        assert_eq!(matching.worst_variation.sequence, 1);
        assert_eq!(matching.best_variation.variation_id, "T-1");
    }

    #[test]
    fn test_tie_break_falls_back_to_load_order() {
        let catalog = VariationCatalog::new(vec![
            kongs("T", 1, "1B", "2B", "3B", "red"),
            kongs("T", 1, "1C", "2C", "3C", "red"),
        ]);
        let engine = FactsEngine::new(Arc::new(catalog));
        let facts = engine.analyze_patterns(&ids(&["red"]), &["T".to_string()], &GameContext::default());
        assert_eq!(facts[0].best().missing_tiles[0], TileId::from("1B"));
    }

    #[test]
    fn test_best_and_worst_differ() {
        let catalog = VariationCatalog::new(vec![
            kongs("T", 1, "1B", "2B", "3B", "red"),
            kongs("T", 2, "1C", "2C", "3C", "red"),
        ]);
        let engine = FactsEngine::new(Arc::new(catalog));
        let hand = ids(&["1C", "1C", "2C", "red"]);
        let facts = engine.analyze_patterns(&hand, &["T".to_string()], &GameContext::default());

        let matching = &facts[0].tile_matching;
        assert_eq!(matching.best_variation.sequence, 2);
        assert_eq!(matching.best_variation.tiles_matched, 4);
        assert_eq!(matching.worst_variation.sequence, 1);
        assert_eq!(matching.worst_variation.tiles_matched, 1);
        assert!((matching.average_completion - 5.0 / 28.0).abs() < 1e-12);
    }

    #[test]
    fn test_joker_facts() {
        let catalog = VariationCatalog::new(vec![kongs("T", 1, "1B", "2B", "3B", "red")]);
        let engine = FactsEngine::new(Arc::new(catalog));
        // Missing: 1B x2, 2B x4, 3B x4, red x2 (pair slots take no jokers).
        let hand = ids(&["1B", "1B", "joker", "joker", "joker"]);
        let context = GameContext::gameplay(&hand, 60);
        let facts = engine.analyze_patterns(&hand, &["T".to_string()], &context);
        let jokers = &facts[0].joker_analysis;

        assert_eq!(jokers.jokers_available, 3);
        assert_eq!(jokers.joker_slots, 12);
        // Every kong slot of a missing kind, including the 1B slots already held.
        assert_eq!(jokers.substitutable_positions.len(), 12);
        assert_eq!(jokers.max_jokers_useful, 12);
        assert_eq!(jokers.jokers_to_complete, 12 - 3);
        assert!((jokers.with_jokers_completion - 5.0 / 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_wall_availability() {
        let catalog = VariationCatalog::new(vec![kongs("T", 1, "1B", "2B", "3B", "red")]);
        let engine = FactsEngine::new(Arc::new(catalog));
        let hand = ids(&["1B", "1B", "1B", "1B", "2B", "2B", "2B", "2B", "3B", "3B", "3B", "3B"]);
        let context = GameContext::gameplay(&hand, 40)
            .with_discards(ids(&["red"]))
            .with_exposed("east", ids(&["red", "red"]));
        let facts = engine.analyze_patterns(&hand, &["T".to_string()], &context);
        let wall = &facts[0].wall_availability;

        assert_eq!(wall.missing_tiles.len(), 1);
        let red = &wall.missing_tiles[0];
        assert_eq!(red.needed, 2);
        assert_eq!(red.remaining_available, 1);
        assert_eq!(wall.total_missing_in_wall, 1);
        assert_eq!(wall.total_missing_needed, 2);
        assert!((wall.availability_ratio - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_complete_hand_has_zero_availability_ratio() {
        let catalog = VariationCatalog::new(vec![kongs("T", 1, "1B", "2B", "3B", "red")]);
        let engine = FactsEngine::new(Arc::new(catalog));
        let hand = ids(&[
            "1B", "1B", "1B", "1B", "2B", "2B", "2B", "2B", "3B", "3B", "3B", "3B", "red", "red",
        ]);
        let facts = engine.analyze_patterns(&hand, &["T".to_string()], &GameContext::default());
        assert_eq!(facts[0].best_completion(), 1.0);
        assert_eq!(facts[0].wall_availability.availability_ratio, 0.0);
        assert_eq!(facts[0].progress.tiles_needed, 0);
        assert_eq!(facts[0].progress.sets_formed, 3);
        assert_eq!(facts[0].progress.pairs_formed, 4);
    }

    #[test]
    fn test_mixed_case_ids_match_and_count_jokers() {
        let catalog = VariationCatalog::new(vec![kongs("T", 1, "1B", "2B", "3B", "red")]);
        let engine = FactsEngine::new(Arc::new(catalog));
        let hand = ids(&["1b", "1B", "Joker", "JOKER", "Red"]);
        let facts = engine.analyze_patterns(&hand, &["T".to_string()], &GameContext::default());

        assert_eq!(facts[0].best().tiles_matched, 3);
        assert_eq!(facts[0].joker_analysis.jokers_available, 2);
        assert_eq!(
            facts[0].best().contribution(&TileId::from("1b")).unwrap().positions,
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_flower_aliases_match_flower_slots() {
        let hand = ids(&["f1", "f5", "flower"]);
        let variation = make_variation(
            "F",
            1,
            &[
                "flower", "flower", "flower", "flower", "1B", "1B", "1B", "1B", "2B", "2B", "2B",
                "2B", "red", "red",
            ],
            &[true; 14],
        );
        let m = match_variation(&count_tiles(&hand), &variation);
        assert_eq!(m.tiles_matched, 3);
    }
}
