//! Ranking engine.
//!
//! Turns pattern facts plus the game context into a bounded 0-100 score per
//! pattern, a five-band verdict, a viability flag, and, when the player has
//! a focus pattern, an analysis of whether switching would pay off.
//!
//! Score components:
//! - current tiles (0-40): best-variation completion x 40
//! - availability (0-50): how drawable the missing tiles still are, with
//!   jokers in hand counted as extra copies when the pattern takes jokers
//! - priority (0-10): points, difficulty, and phase-dependent progress
//! - joker (always 0): kept for output shape

mod config;
mod types;

pub use config::RankingConfig;
pub use types::{PatternRanking, RecommendationBand, Rankings, ScoreComponents, SwitchAnalysis};

use tracing::{debug, warn};

use crate::context::{GameContext, GamePhase};
use crate::facts::PatternFacts;
use crate::repository::{Difficulty, PatternInfo};

/// Variation count at or above which confidence is raised.
const MANY_VARIATIONS: usize = 50;
/// Variation count at or below which confidence is lowered.
const FEW_VARIATIONS: usize = 10;
/// Variation count that makes a pattern viable on flexibility alone.
const FLEXIBLE_VARIATIONS: usize = 75;
/// Points that make a pattern viable regardless of completion.
const HIGH_VALUE_POINTS: u32 = 50;
/// Useful joker positions that make a pattern viable.
const JOKER_FRIENDLY_POSITIONS: u32 = 4;
/// Availability ratio below which wall availability is flagged.
const LOW_AVAILABILITY_RATIO: f64 = 1.5;
/// Missing tiles above which a pattern is flagged as far away.
const MANY_TILES_NEEDED: u32 = 8;
/// Copies that must come from jokers before dependency is flagged.
const HIGH_JOKER_DEPENDENCY: u32 = 2;

/// Scores patterns from their facts.
#[derive(Debug, Clone, Default)]
pub struct RankingEngine {
    config: RankingConfig,
}

impl RankingEngine {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Rank every pattern in `facts`.
    ///
    /// Patterns without metadata fall back to neutral metadata. Rankings are
    /// sorted by total score, descending; equal scores keep input order.
    pub fn rank_patterns(
        &self,
        facts: &[PatternFacts],
        metadata: &[PatternInfo],
        context: &GameContext,
    ) -> Rankings {
        let mut rankings: Vec<PatternRanking> = facts
            .iter()
            .map(|fact| {
                let info = metadata
                    .iter()
                    .find(|info| info.key == fact.pattern_id)
                    .cloned()
                    .unwrap_or_else(|| {
                        let mut neutral = PatternInfo::neutral(&fact.pattern_id, fact.points);
                        neutral.concealed = fact.concealed;
                        neutral
                    });
                self.rank_pattern(fact, &info, context)
            })
            .collect();

        rankings.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));

        let viable_count = rankings.iter().filter(|r| r.is_viable).count();
        let top_recommendations = rankings
            .iter()
            .filter(|r| r.is_viable)
            .take(self.config.max_recommendations)
            .cloned()
            .collect();

        let switch_analysis = context
            .current_focus
            .as_deref()
            .and_then(|focus| self.analyze_switch(focus, &rankings));

        debug!(
            patterns = rankings.len(),
            viable = viable_count,
            top = rankings.first().map(|r| r.pattern_id.as_str()).unwrap_or("none"),
            "Patterns ranked"
        );

        Rankings {
            rankings,
            top_recommendations,
            viable_count,
            switch_analysis,
        }
    }

    /// Score a single pattern.
    pub fn rank_pattern(
        &self,
        facts: &PatternFacts,
        info: &PatternInfo,
        context: &GameContext,
    ) -> PatternRanking {
        let components = ScoreComponents {
            current_tile_score: current_tile_score(facts),
            availability_score: availability_score(facts),
            joker_score: 0.0,
            priority_score: priority_score(facts, info, context),
        };
        let total_score = (components.current_tile_score
            + components.availability_score
            + components.priority_score)
            .clamp(0.0, 100.0);

        PatternRanking {
            pattern_id: facts.pattern_id.clone(),
            total_score,
            recommendation: RecommendationBand::from_score(total_score),
            confidence: confidence(facts, total_score),
            is_viable: self.is_viable(facts, info),
            strategic_value: info.points as f64
                * facts.joker_analysis.with_jokers_completion
                * (components.availability_score / 50.0),
            risk_factors: risk_factors(facts, info),
            components,
        }
    }

    /// Completion at the threshold, or a strategic override.
    fn is_viable(&self, facts: &PatternFacts, info: &PatternInfo) -> bool {
        facts.best_completion() >= self.config.viability_threshold
            || info.points >= HIGH_VALUE_POINTS
            || facts.joker_analysis.max_jokers_useful >= JOKER_FRIENDLY_POSITIONS
            || facts.total_variations >= FLEXIBLE_VARIATIONS
    }

    fn analyze_switch(&self, focus: &str, rankings: &[PatternRanking]) -> Option<SwitchAnalysis> {
        let Some(current) = rankings.iter().find(|r| r.pattern_id == focus) else {
            warn!(focus, "Focus pattern not among ranked patterns, skipping switch analysis");
            return None;
        };

        let alternative = rankings
            .iter()
            .find(|r| r.is_viable && r.pattern_id != focus);

        let Some(alternative) = alternative else {
            return Some(SwitchAnalysis {
                current_focus: focus.to_string(),
                current_score: current.total_score,
                recommended_pattern: None,
                alternative_score: 0.0,
                improvement_percent: 0.0,
                should_suggest_switch: false,
                reasoning: format!("No viable alternative to {}", focus),
            });
        };

        let improvement = if current.total_score > 0.0 {
            (alternative.total_score - current.total_score) / current.total_score
        } else if alternative.total_score > 0.0 {
            1.0
        } else {
            0.0
        };
        let should_suggest_switch = improvement >= self.config.switch_threshold;

        let reasoning = if should_suggest_switch {
            format!(
                "{} scores {:.0}% higher than {} ({:.1} vs {:.1})",
                alternative.pattern_id,
                improvement * 100.0,
                focus,
                alternative.total_score,
                current.total_score
            )
        } else {
            format!(
                "Stay with {}: best alternative {} is {:.0}% apart",
                focus,
                alternative.pattern_id,
                improvement * 100.0
            )
        };

        Some(SwitchAnalysis {
            current_focus: focus.to_string(),
            current_score: current.total_score,
            recommended_pattern: Some(alternative.pattern_id.clone()),
            alternative_score: alternative.total_score,
            improvement_percent: improvement,
            should_suggest_switch,
            reasoning,
        })
    }
}

fn current_tile_score(facts: &PatternFacts) -> f64 {
    (facts.best_completion() * 40.0).clamp(0.0, 40.0)
}

fn availability_score(facts: &PatternFacts) -> f64 {
    let missing = &facts.wall_availability.missing_tiles;
    if missing.is_empty() {
        return 50.0;
    }

    let jokers = if facts.joker_analysis.joker_slots > 0 {
        facts.joker_analysis.jokers_available
    } else {
        0
    };

    let total_weight: f64 = missing
        .iter()
        .map(|tile| {
            let effective = tile.remaining_available + jokers;
            let fraction = if tile.original_supply == 0 {
                0.0
            } else {
                effective as f64 / tile.original_supply as f64
            };
            availability_weight(fraction)
        })
        .sum();

    (total_weight / missing.len() as f64 * 50.0).clamp(0.0, 50.0)
}

fn availability_weight(fraction: f64) -> f64 {
    if fraction >= 0.75 {
        1.0
    } else if fraction >= 0.5 {
        0.8
    } else if fraction >= 0.25 {
        0.5
    } else if fraction > 0.0 {
        0.2
    } else {
        0.0
    }
}

fn priority_score(facts: &PatternFacts, info: &PatternInfo, context: &GameContext) -> f64 {
    let mut score: f64 = 5.0;

    score += match info.points {
        p if p >= 50 => 3.0,
        p if p >= 35 => 2.0,
        p if p >= 25 => 1.0,
        _ => 0.0,
    };

    score += match info.difficulty {
        Difficulty::Easy => 1.0,
        Difficulty::Medium => 0.0,
        Difficulty::Hard => -1.0,
    };

    match context.phase {
        GamePhase::Charleston if facts.tile_matching.average_completion > 0.5 => score += 1.0,
        GamePhase::Gameplay if facts.best_completion() > 0.7 => score += 2.0,
        _ => {}
    }

    score.clamp(0.0, 10.0)
}

fn confidence(facts: &PatternFacts, total_score: f64) -> f64 {
    let mut confidence = (total_score + 10.0).min(95.0);

    if facts.total_variations >= MANY_VARIATIONS {
        confidence += 5.0;
    } else if facts.total_variations <= FEW_VARIATIONS {
        confidence -= 5.0;
    }

    if (facts.tile_matching.average_completion - facts.best_completion()).abs() < 0.1 {
        confidence += 5.0;
    }

    confidence.clamp(15.0, 95.0)
}

fn risk_factors(facts: &PatternFacts, info: &PatternInfo) -> Vec<String> {
    let mut risks = Vec::new();
    let wall = &facts.wall_availability;

    if wall.total_missing_needed > 0 && wall.availability_ratio < LOW_AVAILABILITY_RATIO {
        risks.push(format!(
            "Low wall availability ({:.1} drawable per missing tile)",
            wall.availability_ratio
        ));
    }

    let from_jokers: u32 = wall
        .missing_tiles
        .iter()
        .map(|tile| tile.needed.saturating_sub(tile.remaining_available))
        .sum();
    if from_jokers >= HIGH_JOKER_DEPENDENCY {
        risks.push(format!(
            "High joker dependency ({} tiles unavailable in the wall)",
            from_jokers
        ));
    }

    if facts.progress.tiles_needed > MANY_TILES_NEEDED {
        risks.push(format!(
            "Many tiles still needed ({})",
            facts.progress.tiles_needed
        ));
    }

    if info.difficulty == Difficulty::Hard {
        risks.push("Hard pattern difficulty".to_string());
    }

    risks
}
