//! Recommendation engine output types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tile::TileId;

/// Primary pattern name used when no facts were available.
pub const ANALYSIS_FAILED: &str = "analysis_failed";

/// Recommended action for a tile kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Keep,
    /// Hand the tile on during the Charleston.
    Pass,
    /// Throw the tile during gameplay.
    Discard,
    Neutral,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Keep => "keep",
            ActionKind::Pass => "pass",
            ActionKind::Discard => "discard",
            ActionKind::Neutral => "neutral",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharlestonAction {
    Keep,
    Pass,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameplayAction {
    Keep,
    Discard,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureAction {
    /// Worth calling to complete an exposed set.
    Expose,
    /// Keep concealed for now.
    Keep,
    /// Never expose (jokers, tiles needed in singles or pairs).
    Never,
}

/// What to do with a tile in each phase, independent of the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextualActions {
    pub charleston: CharlestonAction,
    pub gameplay: GameplayAction,
    pub exposure: ExposureAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DangerKind {
    /// Letting go of a tile a top pattern cannot do without.
    PatternDestruction,
    /// Discarding a tile an opponent is likely to call.
    OpponentFeeding,
    /// Passing a tile several live patterns use.
    StrategicError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Danger {
    pub kind: DangerKind,
    pub severity: Severity,
    pub message: String,
}

/// Recommendation for one distinct tile kind in hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileAction {
    pub tile_id: TileId,
    /// Copies of this kind in hand.
    pub copies: u32,
    pub action: ActionKind,
    /// 0-100.
    pub confidence: u8,
    /// 1-10; higher means more important to hold.
    pub priority: u8,
    pub reasoning: String,
    pub contextual_actions: ContextualActions,
    /// Patterns this tile contributes to, strongest completion first.
    pub patterns_helped: Vec<String>,
    pub strongest_pattern: Option<String>,
    pub dangers: Vec<Danger>,
}

impl TileAction {
    pub fn has_high_danger(&self) -> bool {
        self.dangers.iter().any(|d| d.severity == Severity::High)
    }
}

/// A tile an opponent probably wants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LikelyNeed {
    pub tile_id: TileId,
    pub probability: f64,
    pub reasoning: String,
}

/// Pattern family suggested by an opponent's exposures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposedFamily {
    WindsAndDragons,
    NumericSequence,
}

/// Inferences about one opponent from their exposed tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentAnalysis {
    pub opponent_id: String,
    pub likely_needs: Vec<LikelyNeed>,
    pub exposed_families: Vec<ExposedFamily>,
    /// Hand tiles that are safe to throw to this opponent.
    pub safe_discards: Vec<TileId>,
    pub risky_discards: Vec<TileId>,
    pub pattern_clues: Vec<String>,
}

impl OpponentAnalysis {
    /// Probability that this opponent needs the tile, if inferred.
    pub fn need_probability(&self, tile: &TileId) -> Option<f64> {
        let key = tile.canonical();
        self.likely_needs
            .iter()
            .find(|need| need.tile_id == key)
            .map(|need| need.probability)
    }

    pub fn is_risky(&self, tile: &TileId) -> bool {
        let key = tile.canonical();
        self.risky_discards.contains(&key)
    }

    pub fn is_safe(&self, tile: &TileId) -> bool {
        let key = tile.canonical();
        self.safe_discards.contains(&key)
    }
}

/// Safe and risky hand tiles across every opponent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscardSafety {
    /// Safe against every opponent with exposures.
    pub safe_tiles: Vec<TileId>,
    /// Risky against at least one opponent.
    pub risky_tiles: Vec<TileId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimalStrategy {
    pub primary_pattern: String,
    pub backup_pattern: Option<String>,
    /// 0-95.
    pub expected_completion: f64,
    /// Set only when switch analysis recommends switching.
    pub pivot_condition: Option<String>,
}

/// Recommendation engine output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    /// One action per distinct tile kind, in hand order.
    pub tile_actions: Vec<TileAction>,
    pub optimal_strategy: OptimalStrategy,
    pub opponent_analysis: Vec<OpponentAnalysis>,
    pub safety: DiscardSafety,
    pub strategic_advice: Vec<String>,
    /// Actions carrying a high-severity danger.
    pub emergency_actions: Vec<TileAction>,
}

impl Recommendations {
    /// Degraded result for when no pattern facts are available.
    pub fn analysis_failed(advice: impl Into<String>) -> Self {
        Self {
            tile_actions: Vec::new(),
            optimal_strategy: OptimalStrategy {
                primary_pattern: ANALYSIS_FAILED.to_string(),
                backup_pattern: None,
                expected_completion: 0.0,
                pivot_condition: None,
            },
            opponent_analysis: Vec::new(),
            safety: DiscardSafety::default(),
            strategic_advice: vec![advice.into()],
            emergency_actions: Vec::new(),
        }
    }

    pub fn is_analysis_failed(&self) -> bool {
        self.optimal_strategy.primary_pattern == ANALYSIS_FAILED
    }

    pub fn with_action(&self, action: ActionKind) -> Vec<&TileAction> {
        self.tile_actions
            .iter()
            .filter(|a| a.action == action)
            .collect()
    }

    pub fn keep(&self) -> Vec<&TileAction> {
        self.with_action(ActionKind::Keep)
    }

    pub fn pass(&self) -> Vec<&TileAction> {
        self.with_action(ActionKind::Pass)
    }

    pub fn discard(&self) -> Vec<&TileAction> {
        self.with_action(ActionKind::Discard)
    }

    pub fn neutral(&self) -> Vec<&TileAction> {
        self.with_action(ActionKind::Neutral)
    }

    /// Tiles (copies) covered by all actions.
    pub fn tiles_covered(&self) -> u32 {
        self.tile_actions.iter().map(|a| a.copies).sum()
    }
}
