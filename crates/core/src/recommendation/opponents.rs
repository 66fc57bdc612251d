//! Opponent inference from exposed tiles.
//!
//! Heuristic by nature: exposed pairs and pungs suggest tiles an opponent
//! still wants, exposure mixes suggest a pattern family, and runs of
//! numbers make their neighbors dangerous to throw.

use std::collections::{BTreeMap, HashSet};

use super::types::{ExposedFamily, LikelyNeed, OpponentAnalysis};
use crate::context::GameContext;
use crate::tile::{count_tiles, Suit, TileCounts, TileFamily, TileId, TileKind};

/// Need probability for a tile exposed as a pair or pung.
const EXPOSED_NEED_PROBABILITY: f64 = 0.8;
/// Need probability when the tile's family is also being discarded.
const CONTESTED_NEED_PROBABILITY: f64 = 0.5;
/// Honor tiles exposed before a winds/dragons hand is suspected.
const HONOR_FAMILY_MIN: u32 = 3;
/// Numbered tiles exposed before a numeric hand is suspected.
const NUMERIC_FAMILY_MIN: u32 = 6;
/// Discards of a kind after which throwing it is considered safe.
const SAFE_DISCARD_COUNT: u32 = 2;

/// Analyze every opponent that has exposed at least one tile.
///
/// Opponents are reported in id order. Safe discards are drawn from the
/// player's own hand.
pub fn analyze_opponents(hand: &TileCounts, context: &GameContext) -> Vec<OpponentAnalysis> {
    let discards = context.discard_counts();
    let discarded_families: HashSet<TileFamily> = discards
        .kinds()
        .filter_map(|tile| tile.kind().ok())
        .map(|kind| kind.family())
        .collect();

    context
        .exposed_tiles
        .iter()
        .filter(|(_, tiles)| !tiles.is_empty())
        .map(|(opponent, tiles)| {
            analyze_opponent(opponent, tiles, hand, &discards, &discarded_families)
        })
        .collect()
}

fn analyze_opponent(
    opponent: &str,
    tiles: &[TileId],
    hand: &TileCounts,
    discards: &TileCounts,
    discarded_families: &HashSet<TileFamily>,
) -> OpponentAnalysis {
    let exposed = count_tiles(tiles);
    let parsed: Vec<(&TileId, TileKind, u32)> = exposed
        .iter()
        .filter_map(|(tile, count)| tile.kind().ok().map(|kind| (tile, kind, count)))
        .filter(|(_, kind, _)| *kind != TileKind::Joker)
        .collect();
    let jokers_exposed = exposed.get(&TileId::from("joker"));

    let likely_needs: Vec<LikelyNeed> = parsed
        .iter()
        .filter(|(_, _, count)| (2..=3).contains(count))
        .map(|(tile, kind, count)| {
            let contested = discarded_families.contains(&kind.family());
            let probability = if contested {
                CONTESTED_NEED_PROBABILITY
            } else {
                EXPOSED_NEED_PROBABILITY
            };
            let mut reasoning = format!("{} exposed {} copies of {}", opponent, count, tile);
            if contested {
                reasoning.push_str(&format!(", but {} are already being discarded", kind.family()));
            }
            LikelyNeed {
                tile_id: (*tile).clone(),
                probability,
                reasoning,
            }
        })
        .collect();

    let honors: u32 = parsed
        .iter()
        .filter(|(_, kind, _)| kind.is_honor())
        .map(|(_, _, count)| count)
        .sum();
    let numbered: u32 = parsed
        .iter()
        .filter(|(_, kind, _)| kind.is_numbered())
        .map(|(_, _, count)| count)
        .sum();

    let mut exposed_families = Vec::new();
    if honors >= HONOR_FAMILY_MIN {
        exposed_families.push(ExposedFamily::WindsAndDragons);
    }
    if numbered >= NUMERIC_FAMILY_MIN {
        exposed_families.push(ExposedFamily::NumericSequence);
    }

    let risky_discards = risky_tiles(&parsed);

    let families_shown: HashSet<TileFamily> =
        parsed.iter().map(|(_, kind, _)| kind.family()).collect();
    let safe_discards = hand
        .kinds()
        .filter(|tile| !risky_discards.contains(tile))
        .filter(|tile| match tile.kind() {
            Ok(TileKind::Joker) | Err(_) => false,
            Ok(kind) => {
                discards.get(tile) >= SAFE_DISCARD_COUNT
                    || !families_shown.contains(&kind.family())
            }
        })
        .cloned()
        .collect();

    let pattern_clues = pattern_clues(&parsed, &exposed_families, honors, numbered, jokers_exposed);

    OpponentAnalysis {
        opponent_id: opponent.to_string(),
        likely_needs,
        exposed_families,
        safe_discards,
        risky_discards,
        pattern_clues,
    }
}

/// Neighbors of exposed number runs, and the third copy of exposed pairs.
fn risky_tiles(parsed: &[(&TileId, TileKind, u32)]) -> Vec<TileId> {
    let mut risky: Vec<TileId> = Vec::new();
    let mut push = |tile: TileId| {
        if !risky.contains(&tile) {
            risky.push(tile);
        }
    };

    let mut ranks_by_suit: BTreeMap<Suit, Vec<u8>> = BTreeMap::new();
    for (_, kind, _) in parsed {
        if let Some((suit, rank)) = kind.suit_rank() {
            ranks_by_suit.entry(suit).or_default().push(rank);
        }
    }

    for (suit, mut ranks) in ranks_by_suit {
        ranks.sort_unstable();
        ranks.dedup();

        let mut start = 0;
        while start < ranks.len() {
            let mut end = start;
            while end + 1 < ranks.len() && ranks[end + 1] == ranks[end] + 1 {
                end += 1;
            }
            if end > start {
                if ranks[start] > 1 {
                    if let Ok(kind) = TileKind::suited(suit, ranks[start] - 1) {
                        push(kind.into());
                    }
                }
                if ranks[end] < 9 {
                    if let Ok(kind) = TileKind::suited(suit, ranks[end] + 1) {
                        push(kind.into());
                    }
                }
            }
            start = end + 1;
        }
    }

    for (tile, _, count) in parsed {
        if *count == 2 {
            push((*tile).clone());
        }
    }

    risky
}

fn pattern_clues(
    parsed: &[(&TileId, TileKind, u32)],
    families: &[ExposedFamily],
    honors: u32,
    numbered: u32,
    jokers_exposed: u32,
) -> Vec<String> {
    let mut clues = Vec::new();

    for (tile, _, count) in parsed {
        match *count {
            c if c >= 4 => clues.push(format!("Kong of {} exposed", tile)),
            3 => clues.push(format!("Pung of {} exposed", tile)),
            _ => {}
        }
    }

    if families.contains(&ExposedFamily::WindsAndDragons) {
        clues.push(format!(
            "Collecting winds and dragons ({} honor tiles exposed)",
            honors
        ));
    }

    if families.contains(&ExposedFamily::NumericSequence) {
        let suits: HashSet<TileFamily> = parsed
            .iter()
            .filter(|(_, kind, _)| kind.is_numbered())
            .map(|(_, kind, _)| kind.family())
            .collect();
        if suits.len() == 1 {
            if let Some(suit) = suits.iter().next() {
                clues.push(format!("Working numbers in {} ({} exposed)", suit, numbered));
            }
        } else {
            clues.push(format!(
                "Working numbers across {} suits ({} exposed)",
                suits.len(),
                numbered
            ));
        }
    }

    if jokers_exposed > 0 {
        clues.push(format!("Using jokers in exposed sets ({})", jokers_exposed));
    }

    clues
}
