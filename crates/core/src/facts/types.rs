//! Facts engine output types.

use serde::{Deserialize, Serialize};

use crate::tile::TileId;

/// How one hand tile kind relates to a variation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileContribution {
    pub tile_id: TileId,
    /// Slot indices (0..14) this kind occupies in the variation.
    pub positions: Vec<usize>,
    /// Whether the variation requires this kind at all.
    pub is_required: bool,
    /// Required at least twice, or once in a slot no joker can fill.
    pub is_critical: bool,
}

/// Match of a hand against one variation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationMatch {
    pub variation_id: String,
    pub sequence: u32,
    /// Tiles of the variation covered by the hand (0..=14).
    pub tiles_matched: u32,
    /// `tiles_matched / 14`.
    pub completion_ratio: f64,
    /// One entry per missing copy, in variation order.
    pub missing_tiles: Vec<TileId>,
    /// One entry per distinct hand kind, in hand order.
    pub tile_contributions: Vec<TileContribution>,
}

impl VariationMatch {
    /// Contribution record for a hand kind.
    pub fn contribution(&self, tile: &TileId) -> Option<&TileContribution> {
        let key = tile.canonical();
        self.tile_contributions.iter().find(|c| c.tile_id == key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileMatching {
    pub best_variation: VariationMatch,
    pub worst_variation: VariationMatch,
    /// Mean completion ratio over every variation of the pattern.
    pub average_completion: f64,
}

/// Joker facts for the best variation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JokerAnalysis {
    pub jokers_available: u32,
    /// Slots of the best variation that accept a joker.
    pub joker_slots: u32,
    /// Joker-eligible slots held by kinds the hand is missing.
    pub substitutable_positions: Vec<usize>,
    pub max_jokers_useful: u32,
    /// Missing tiles left after spending every available joker.
    pub jokers_to_complete: u32,
    /// Completion ratio if the useful jokers were placed.
    pub with_jokers_completion: f64,
}

/// Wall availability of one missing kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingTileAvailability {
    pub tile_id: TileId,
    /// Copies still needed.
    pub needed: u32,
    pub original_supply: u32,
    pub in_discards: u32,
    pub exposed: u32,
    /// `max(0, supply - discarded - exposed)`.
    pub remaining_available: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallAvailability {
    /// One entry per distinct missing kind.
    pub missing_tiles: Vec<MissingTileAvailability>,
    pub total_missing_in_wall: u32,
    pub total_missing_needed: u32,
    /// `total_missing_in_wall / total_missing_needed`; 0 when nothing is missing.
    pub availability_ratio: f64,
}

/// Generic structure of the hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Missing tiles in the best variation.
    pub tiles_needed: u32,
    /// Hand kinds held at least twice.
    pub pairs_formed: u32,
    /// Hand kinds held at least three times.
    pub sets_formed: u32,
}

/// Every fact the engine derives for one pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternFacts {
    pub pattern_id: String,
    pub points: u32,
    pub concealed: bool,
    pub total_variations: usize,
    pub tile_matching: TileMatching,
    pub joker_analysis: JokerAnalysis,
    pub wall_availability: WallAvailability,
    pub progress: Progress,
}

impl PatternFacts {
    pub fn best(&self) -> &VariationMatch {
        &self.tile_matching.best_variation
    }

    pub fn best_completion(&self) -> f64 {
        self.tile_matching.best_variation.completion_ratio
    }
}
