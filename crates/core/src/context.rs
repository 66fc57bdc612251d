//! Live game state shared by all three engines.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tile::{count_tiles, TileCounts, TileId};

/// Phase of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Pre-game tile exchange. Unwanted tiles are passed.
    #[default]
    Charleston,
    /// Active play. Unwanted tiles are discarded.
    Gameplay,
}

/// Ambient, time-varying game state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameContext {
    /// Current phase.
    #[serde(default)]
    pub phase: GamePhase,
    /// Jokers currently held by the player.
    #[serde(default)]
    pub jokers_in_hand: u32,
    /// Tiles left in the wall.
    #[serde(default)]
    pub wall_tiles_remaining: u32,
    /// Shared discard pile.
    #[serde(default)]
    pub discard_pile: Vec<TileId>,
    /// Exposed (called) tiles per opponent id.
    #[serde(default)]
    pub exposed_tiles: BTreeMap<String, Vec<TileId>>,
    /// Pattern the player is currently working towards, if any.
    /// Enables switch analysis in the ranking engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_focus: Option<String>,
}

/// Tiles in a full set before any are drawn.
const FULL_WALL: u32 = 152;

impl GameContext {
    /// Charleston context for a freshly dealt hand.
    pub fn charleston(hand: &[TileId]) -> Self {
        Self {
            phase: GamePhase::Charleston,
            jokers_in_hand: jokers_in(hand),
            wall_tiles_remaining: FULL_WALL.saturating_sub(hand.len() as u32 * 4),
            ..Default::default()
        }
    }

    /// Gameplay context with the given wall size.
    pub fn gameplay(hand: &[TileId], wall_tiles_remaining: u32) -> Self {
        Self {
            phase: GamePhase::Gameplay,
            jokers_in_hand: jokers_in(hand),
            wall_tiles_remaining,
            ..Default::default()
        }
    }

    pub fn with_discards(mut self, discards: Vec<TileId>) -> Self {
        self.discard_pile = discards;
        self
    }

    pub fn with_exposed(mut self, opponent: impl Into<String>, tiles: Vec<TileId>) -> Self {
        self.exposed_tiles.insert(opponent.into(), tiles);
        self
    }

    pub fn with_focus(mut self, pattern_key: impl Into<String>) -> Self {
        self.current_focus = Some(pattern_key.into());
        self
    }

    pub fn is_charleston(&self) -> bool {
        self.phase == GamePhase::Charleston
    }

    /// Multiset of the discard pile.
    pub fn discard_counts(&self) -> TileCounts {
        count_tiles(&self.discard_pile)
    }

    /// Multiset of every opponent's exposed tiles combined.
    pub fn exposed_counts(&self) -> TileCounts {
        self.exposed_tiles.values().flatten().collect()
    }
}

fn jokers_in(hand: &[TileId]) -> u32 {
    hand.iter().filter(|t| t.is_joker()).count() as u32
}
