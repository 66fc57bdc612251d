//! Ranking engine output types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The named parts of a pattern's total score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    /// 0-40, from best-variation completion.
    pub current_tile_score: f64,
    /// 0-50, from wall availability of the missing tiles (jokers included).
    pub availability_score: f64,
    /// Always 0. Joker benefit is counted in `availability_score`.
    pub joker_score: f64,
    /// 0-10, from points, difficulty and phase.
    pub priority_score: f64,
}

impl ScoreComponents {
    pub fn sum(&self) -> f64 {
        self.current_tile_score + self.availability_score + self.joker_score + self.priority_score
    }
}

/// Five-band verdict derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationBand {
    Excellent,
    Good,
    Fair,
    Poor,
    Impossible,
}

impl RecommendationBand {
    pub fn from_score(total: f64) -> Self {
        if total >= 80.0 {
            RecommendationBand::Excellent
        } else if total >= 65.0 {
            RecommendationBand::Good
        } else if total >= 45.0 {
            RecommendationBand::Fair
        } else if total >= 25.0 {
            RecommendationBand::Poor
        } else {
            RecommendationBand::Impossible
        }
    }
}

impl fmt::Display for RecommendationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecommendationBand::Excellent => "excellent",
            RecommendationBand::Good => "good",
            RecommendationBand::Fair => "fair",
            RecommendationBand::Poor => "poor",
            RecommendationBand::Impossible => "impossible",
        };
        f.write_str(name)
    }
}

/// Score and verdict for one pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRanking {
    pub pattern_id: String,
    /// 0-100, the sum of the components.
    pub total_score: f64,
    pub components: ScoreComponents,
    pub recommendation: RecommendationBand,
    /// 15-95.
    pub confidence: f64,
    pub is_viable: bool,
    /// Points weighted by joker-assisted completion and availability.
    pub strategic_value: f64,
    pub risk_factors: Vec<String>,
}

/// Comparison of the focus pattern against the best alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchAnalysis {
    pub current_focus: String,
    pub current_score: f64,
    /// Best viable pattern other than the focus, if any.
    pub recommended_pattern: Option<String>,
    pub alternative_score: f64,
    /// `(alternative - focus) / focus`.
    pub improvement_percent: f64,
    pub should_suggest_switch: bool,
    pub reasoning: String,
}

/// Ranking engine output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rankings {
    /// All rankings, descending by total score.
    pub rankings: Vec<PatternRanking>,
    /// Leading viable rankings, at most `max_recommendations`.
    pub top_recommendations: Vec<PatternRanking>,
    pub viable_count: usize,
    /// Present only when a focus pattern was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub switch_analysis: Option<SwitchAnalysis>,
}

impl Rankings {
    pub fn get(&self, pattern_id: &str) -> Option<&PatternRanking> {
        self.rankings.iter().find(|r| r.pattern_id == pattern_id)
    }

    /// Viable rankings in score order.
    pub fn viable(&self) -> impl Iterator<Item = &PatternRanking> {
        self.rankings.iter().filter(|r| r.is_viable)
    }

    pub fn is_empty(&self) -> bool {
        self.rankings.is_empty()
    }
}
