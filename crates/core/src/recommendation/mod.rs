//! Recommendation engine.
//!
//! Turns ranked patterns, pattern facts and opponent signals into one
//! action per distinct tile kind in hand, with phase-specific alternatives,
//! danger warnings, and an overall strategy.
//!
//! Per tile:
//! 1. Gather contributions from every pattern whose best variation is past
//!    the contribution threshold.
//! 2. Walk the decision ladder (jokers, sets, pairs, critical singles,
//!    multi-pattern tiles, dead tiles); the first rung that matches wins.
//! 3. Enforce the phase minimum (passes in the Charleston, a discard in
//!    gameplay) by promoting the lowest-priority tiles.
//! 4. Soften discards that feed an opponent, then attach dangers.
//!
//! A tile that cannot be evaluated degrades to a neutral action carrying a
//! strategic-error danger; missing facts degrade the whole result to
//! [`Recommendations::analysis_failed`].

mod config;
mod opponents;
mod types;

pub use config::RecommendationConfig;
pub use opponents::analyze_opponents;
pub use types::{
    ActionKind, CharlestonAction, ContextualActions, Danger, DangerKind, DiscardSafety,
    ExposedFamily, ExposureAction, GameplayAction, LikelyNeed, OpponentAnalysis,
    OptimalStrategy, Recommendations, Severity, TileAction, ANALYSIS_FAILED,
};

use thiserror::Error;
use tracing::{debug, warn};

use crate::context::GameContext;
use crate::facts::PatternFacts;
use crate::ranking::Rankings;
use crate::tile::{count_tiles, TileCounts, TileError, TileId, TileKind, HAND_SIZE};

const AUTO_SELECTED_NOTE: &str = " (auto-selected for minimum)";
/// Confidence ceiling for actions promoted to meet the minimum.
const PROMOTED_CONFIDENCE: u8 = 50;
/// Confidence removed from a discard an opponent likely needs.
const OPPONENT_CONFIDENCE_PENALTY: u8 = 20;
/// Need probability assumed for a tile that is only risky.
const RISKY_ONLY_PROBABILITY: f64 = 0.4;

/// Errors that can occur while evaluating a single tile.
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("Cannot evaluate tile {tile}: {source}")]
    UnrecognizedTile {
        tile: TileId,
        #[source]
        source: TileError,
    },
}

/// One pattern a tile helps.
#[derive(Debug, Clone)]
struct PatternContribution {
    pattern_id: String,
    completion: f64,
    value: f64,
    is_critical: bool,
    /// Slots the tile fills in the best variation.
    slots: usize,
    concealed: bool,
}

/// Everything the engine knows about one tile kind.
#[derive(Debug, Clone)]
struct TileAssessment {
    kind: TileKind,
    copies: u32,
    /// Strongest completion first.
    contributions: Vec<PatternContribution>,
    total_value: f64,
    /// Critical in one of the top-ranked patterns.
    critical_in: Option<String>,
}

impl TileAssessment {
    fn helps(&self) -> usize {
        self.contributions.len()
    }

    fn strongest(&self) -> Option<&PatternContribution> {
        self.contributions
            .iter()
            .fold(None, |best: Option<&PatternContribution>, c| match best {
                Some(b) if b.value >= c.value => Some(b),
                _ => Some(c),
            })
    }
}

/// Rung of the decision ladder a tile landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rung {
    Joker,
    Set,
    Pair,
    CriticalSingle,
    MultiPattern,
    Dead,
    LowValue,
    Undecided,
}

impl Rung {
    fn keeps(&self) -> bool {
        matches!(
            self,
            Rung::Joker | Rung::Set | Rung::Pair | Rung::CriticalSingle | Rung::MultiPattern
        )
    }

    fn lets_go(&self) -> bool {
        matches!(self, Rung::Dead | Rung::LowValue)
    }
}

/// Produces per-tile recommendations.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    config: RecommendationConfig,
}

impl RecommendationEngine {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecommendationConfig {
        &self.config
    }

    /// Recommend an action for every distinct tile kind in `hand`.
    pub fn generate_recommendations(
        &self,
        hand: &[TileId],
        rankings: &Rankings,
        context: &GameContext,
        facts: &[PatternFacts],
    ) -> Recommendations {
        if facts.is_empty() {
            warn!(
                hand_size = hand.len(),
                "No pattern facts available, returning analysis failure"
            );
            return Recommendations::analysis_failed(
                "Pattern analysis failed: no pattern facts were produced for this hand. \
                 Review your tiles manually against the card.",
            );
        }

        let counts = count_tiles(hand);
        let opponents = analyze_opponents(&counts, context);

        let mut relevant: Vec<&PatternFacts> = facts
            .iter()
            .filter(|f| f.best_completion() > self.config.contribution_threshold)
            .collect();
        relevant.sort_by(|a, b| b.best_completion().total_cmp(&a.best_completion()));

        let window: Vec<&str> = rankings
            .rankings
            .iter()
            .take(self.config.critical_pattern_window)
            .map(|r| r.pattern_id.as_str())
            .collect();

        let mut evaluated: Vec<(TileAction, Option<TileAssessment>)> = counts
            .iter()
            .map(|(tile, copies)| match self.assess_tile(tile, copies, &relevant, &window) {
                Ok(assessment) => (self.decide(tile, &assessment, context), Some(assessment)),
                Err(err) => {
                    warn!(tile = %tile, error = %err, "Tile evaluation failed, using neutral action");
                    (fallback_action(tile, copies, &err), None)
                }
            })
            .collect();

        self.enforce_minimum(&mut evaluated, context);

        for (action, assessment) in &mut evaluated {
            if let Some(assessment) = assessment {
                adjust_for_opponents(action, &opponents);
                let dangers = detect_dangers(action, assessment, rankings, &opponents);
                action.dangers.extend(dangers);
            }
        }

        let tile_actions: Vec<TileAction> = evaluated.into_iter().map(|(a, _)| a).collect();
        let emergency_actions: Vec<TileAction> = tile_actions
            .iter()
            .filter(|a| a.has_high_danger())
            .cloned()
            .collect();
        let optimal_strategy = optimal_strategy(&tile_actions, rankings);
        let safety = discard_safety(&counts, &opponents);
        let strategic_advice = strategic_advice(
            &tile_actions,
            &optimal_strategy,
            rankings,
            context,
            emergency_actions.len(),
        );

        debug!(
            actions = tile_actions.len(),
            emergencies = emergency_actions.len(),
            opponents = opponents.len(),
            primary = %optimal_strategy.primary_pattern,
            "Recommendations generated"
        );

        Recommendations {
            tile_actions,
            optimal_strategy,
            opponent_analysis: opponents,
            safety,
            strategic_advice,
            emergency_actions,
        }
    }

    fn assess_tile(
        &self,
        tile: &TileId,
        copies: u32,
        relevant: &[&PatternFacts],
        window: &[&str],
    ) -> Result<TileAssessment, RecommendationError> {
        let kind = tile
            .kind()
            .map_err(|source| RecommendationError::UnrecognizedTile {
                tile: tile.clone(),
                source,
            })?;

        let contributions: Vec<PatternContribution> = relevant
            .iter()
            .filter_map(|facts| {
                let contribution = facts.best().contribution(tile)?;
                if !contribution.is_required {
                    return None;
                }
                let completion = facts.best_completion();
                let mut base = 0.5;
                if contribution.is_critical {
                    base += 0.3;
                }
                if contribution.positions.len() > 1 {
                    base += 0.2;
                }
                Some(PatternContribution {
                    pattern_id: facts.pattern_id.clone(),
                    completion,
                    value: base * (0.5 + completion),
                    is_critical: contribution.is_critical,
                    slots: contribution.positions.len(),
                    concealed: facts.concealed,
                })
            })
            .collect();

        let total_value = contributions.iter().map(|c| c.value).sum();

        let critical_in = if window.is_empty() {
            contributions
                .iter()
                .max_by(|a, b| a.value.total_cmp(&b.value))
                .filter(|c| c.is_critical)
                .map(|c| c.pattern_id.clone())
        } else {
            contributions
                .iter()
                .find(|c| c.is_critical && window.contains(&c.pattern_id.as_str()))
                .map(|c| c.pattern_id.clone())
        };

        Ok(TileAssessment {
            kind,
            copies,
            contributions,
            total_value,
            critical_in,
        })
    }

    fn rung(&self, assessment: &TileAssessment) -> Rung {
        if assessment.kind == TileKind::Joker {
            Rung::Joker
        } else if assessment.copies >= 3 {
            Rung::Set
        } else if assessment.copies == 2 {
            Rung::Pair
        } else if assessment.critical_in.is_some() {
            Rung::CriticalSingle
        } else if assessment.helps() >= 3 {
            Rung::MultiPattern
        } else if assessment.helps() == 0 {
            Rung::Dead
        } else if assessment.helps() == 1 && assessment.total_value < self.config.low_value_threshold
        {
            Rung::LowValue
        } else {
            Rung::Undecided
        }
    }

    fn decide(&self, tile: &TileId, assessment: &TileAssessment, context: &GameContext) -> TileAction {
        let let_go = if context.is_charleston() {
            ActionKind::Pass
        } else {
            ActionKind::Discard
        };
        let rung = self.rung(assessment);
        let strongest = assessment.strongest().map(|c| c.pattern_id.clone());

        let (action, confidence, priority, reasoning) = match rung {
            Rung::Joker => (
                ActionKind::Keep,
                95,
                10,
                "Jokers fill any pung, kong or quint slot".to_string(),
            ),
            Rung::Set => (
                ActionKind::Keep,
                90,
                9,
                format!("{} copies already form a set", assessment.copies),
            ),
            Rung::Pair => (
                ActionKind::Keep,
                80,
                7,
                "Pair can grow into a pung or kong".to_string(),
            ),
            Rung::CriticalSingle => (
                ActionKind::Keep,
                85,
                8,
                format!(
                    "Critical for {}",
                    assessment.critical_in.as_deref().unwrap_or("a top pattern")
                ),
            ),
            Rung::MultiPattern => (
                ActionKind::Keep,
                75,
                6,
                format!("Helps {} patterns", assessment.helps()),
            ),
            Rung::Dead => (
                let_go,
                85,
                2,
                "Not used by any promising pattern".to_string(),
            ),
            Rung::LowValue => (
                let_go,
                65,
                3,
                format!(
                    "Only helps {} and adds little",
                    strongest.as_deref().unwrap_or("one pattern")
                ),
            ),
            Rung::Undecided => (
                ActionKind::Neutral,
                50,
                5,
                format!("Helps {} pattern(s); hold for now", assessment.helps()),
            ),
        };

        TileAction {
            tile_id: tile.clone(),
            copies: assessment.copies,
            action,
            confidence,
            priority,
            reasoning,
            contextual_actions: contextual_actions(rung, assessment),
            patterns_helped: assessment
                .contributions
                .iter()
                .map(|c| c.pattern_id.clone())
                .collect(),
            strongest_pattern: strongest,
            dangers: Vec::new(),
        }
    }

    /// Promote the lowest-priority actions until the phase minimum holds.
    ///
    /// Jokers are never passed. Ties go to the tile seen first in hand.
    fn enforce_minimum(
        &self,
        evaluated: &mut [(TileAction, Option<TileAssessment>)],
        context: &GameContext,
    ) {
        let charleston = context.is_charleston();
        let (target, minimum) = if charleston {
            (ActionKind::Pass, self.config.min_charleston_passes)
        } else {
            (ActionKind::Discard, self.config.min_gameplay_discards)
        };

        let current = evaluated.iter().filter(|(a, _)| a.action == target).count();
        let mut candidates: Vec<usize> = evaluated
            .iter()
            .enumerate()
            .filter(|(_, (a, _))| a.action != target && !(charleston && a.tile_id.is_joker()))
            .map(|(idx, _)| idx)
            .collect();
        candidates.sort_by_key(|idx| evaluated[*idx].0.priority);

        let needed = minimum
            .min(current + candidates.len())
            .saturating_sub(current);

        for idx in candidates.into_iter().take(needed) {
            let action = &mut evaluated[idx].0;
            debug!(tile = %action.tile_id, from = %action.action, to = %target, "Promoting action to meet minimum");
            action.action = target;
            action.confidence = action.confidence.min(PROMOTED_CONFIDENCE);
            action.reasoning.push_str(AUTO_SELECTED_NOTE);
        }
    }
}

/// Phase-specific alternatives from the same assessment.
fn contextual_actions(rung: Rung, assessment: &TileAssessment) -> ContextualActions {
    let charleston = if rung.keeps() {
        CharlestonAction::Keep
    } else if rung.lets_go() {
        CharlestonAction::Pass
    } else {
        CharlestonAction::Neutral
    };

    // In gameplay any tile feeding a half-built pattern is worth holding.
    let near_complete = assessment
        .contributions
        .first()
        .is_some_and(|c| c.completion >= 0.5);
    let gameplay = if rung.keeps() || near_complete {
        GameplayAction::Keep
    } else if rung.lets_go() {
        GameplayAction::Discard
    } else {
        GameplayAction::Neutral
    };

    let exposure = match (assessment.kind, assessment.strongest()) {
        (TileKind::Joker, _) => ExposureAction::Never,
        (_, Some(c)) if c.slots <= 2 => ExposureAction::Never,
        (_, Some(c)) if assessment.copies >= 2 && !c.concealed => ExposureAction::Expose,
        _ => ExposureAction::Keep,
    };

    ContextualActions {
        charleston,
        gameplay,
        exposure,
    }
}

fn fallback_action(tile: &TileId, copies: u32, err: &RecommendationError) -> TileAction {
    TileAction {
        tile_id: tile.clone(),
        copies,
        action: ActionKind::Neutral,
        confidence: 30,
        priority: 5,
        reasoning: "Could not evaluate this tile; review it manually".to_string(),
        contextual_actions: ContextualActions {
            charleston: CharlestonAction::Neutral,
            gameplay: GameplayAction::Neutral,
            exposure: ExposureAction::Keep,
        },
        patterns_helped: Vec::new(),
        strongest_pattern: None,
        dangers: vec![Danger {
            kind: DangerKind::StrategicError,
            severity: Severity::Medium,
            message: err.to_string(),
        }],
    }
}

fn need_probability<'a>(
    tile: &TileId,
    opponents: &'a [OpponentAnalysis],
) -> Option<(f64, &'a str)> {
    opponents
        .iter()
        .filter_map(|o| o.need_probability(tile).map(|p| (p, o.opponent_id.as_str())))
        .max_by(|a, b| a.0.total_cmp(&b.0))
}

/// Lower confidence and priority of a discard an opponent likely needs.
fn adjust_for_opponents(action: &mut TileAction, opponents: &[OpponentAnalysis]) {
    if action.action != ActionKind::Discard {
        return;
    }
    if let Some((probability, opponent)) = need_probability(&action.tile_id, opponents) {
        action.confidence = action
            .confidence
            .saturating_sub(OPPONENT_CONFIDENCE_PENALTY)
            .max(10);
        action.priority = action.priority.saturating_sub(1).max(1);
        action.reasoning.push_str(&format!(
            " (caution: {} may need this tile, {:.0}% likely)",
            opponent,
            probability * 100.0
        ));
    }
}

fn detect_dangers(
    action: &TileAction,
    assessment: &TileAssessment,
    rankings: &Rankings,
    opponents: &[OpponentAnalysis],
) -> Vec<Danger> {
    let mut dangers = Vec::new();
    let letting_go = matches!(action.action, ActionKind::Pass | ActionKind::Discard);

    if letting_go {
        if let Some(pattern) = &assessment.critical_in {
            let top_score = rankings.rankings.first().map_or(0.0, |r| r.total_score);
            let severity = if top_score >= 70.0 {
                Severity::High
            } else if top_score >= 45.0 {
                Severity::Medium
            } else {
                Severity::Low
            };
            dangers.push(Danger {
                kind: DangerKind::PatternDestruction,
                severity,
                message: format!(
                    "Letting go of {} breaks {}, which needs it",
                    action.tile_id, pattern
                ),
            });
        }
    }

    if action.action == ActionKind::Discard {
        let probability = need_probability(&action.tile_id, opponents)
            .map(|(p, _)| p)
            .or_else(|| {
                opponents
                    .iter()
                    .any(|o| o.is_risky(&action.tile_id))
                    .then_some(RISKY_ONLY_PROBABILITY)
            });
        if let Some(probability) = probability {
            let severity = if probability >= 0.7 {
                Severity::High
            } else if probability >= 0.5 {
                Severity::Medium
            } else {
                Severity::Low
            };
            dangers.push(Danger {
                kind: DangerKind::OpponentFeeding,
                severity,
                message: format!(
                    "Discarding {} may feed an opponent ({:.0}% likely)",
                    action.tile_id,
                    probability * 100.0
                ),
            });
        }
    }

    if action.action == ActionKind::Pass && assessment.helps() >= 2 && rankings.viable_count >= 3 {
        let severity = match rankings.viable_count {
            n if n >= 6 => Severity::High,
            n if n >= 4 => Severity::Medium,
            _ => Severity::Low,
        };
        dangers.push(Danger {
            kind: DangerKind::StrategicError,
            severity,
            message: format!(
                "Passing {} gives up {} patterns while {} remain viable",
                action.tile_id,
                assessment.helps(),
                rankings.viable_count
            ),
        });
    }

    dangers
}

fn optimal_strategy(actions: &[TileAction], rankings: &Rankings) -> OptimalStrategy {
    let primary = rankings
        .viable()
        .next()
        .or_else(|| rankings.rankings.first());
    let backup = primary.and_then(|p| {
        rankings
            .viable()
            .find(|r| r.pattern_id != p.pattern_id)
            .or_else(|| rankings.rankings.iter().find(|r| r.pattern_id != p.pattern_id))
    });

    let keep_count: u32 = actions
        .iter()
        .filter(|a| a.action == ActionKind::Keep)
        .map(|a| a.copies)
        .sum();
    let primary_score = primary.map_or(0.0, |p| p.total_score);
    let expected_completion =
        (keep_count as f64 / HAND_SIZE as f64 * 100.0 + primary_score / 2.0).min(95.0);

    let pivot_condition = rankings
        .switch_analysis
        .as_ref()
        .filter(|s| s.should_suggest_switch)
        .and_then(|s| {
            s.recommended_pattern.as_ref().map(|alt| {
                format!(
                    "Pivot from {} to {}: it scores {:.0}% higher",
                    s.current_focus,
                    alt,
                    s.improvement_percent * 100.0
                )
            })
        });

    OptimalStrategy {
        primary_pattern: primary.map_or_else(|| "none".to_string(), |p| p.pattern_id.clone()),
        backup_pattern: backup.map(|b| b.pattern_id.clone()),
        expected_completion,
        pivot_condition,
    }
}

/// Hand tiles safe against every opponent, and those risky against any.
fn discard_safety(hand: &TileCounts, opponents: &[OpponentAnalysis]) -> DiscardSafety {
    let mut safety = DiscardSafety::default();
    for tile in hand.kinds() {
        if tile.is_joker() {
            continue;
        }
        let risky = opponents
            .iter()
            .any(|o| o.is_risky(tile) || o.need_probability(tile).is_some());
        if risky {
            safety.risky_tiles.push(tile.clone());
        } else if opponents.iter().all(|o| o.is_safe(tile)) {
            safety.safe_tiles.push(tile.clone());
        }
    }
    safety
}

fn strategic_advice(
    actions: &[TileAction],
    strategy: &OptimalStrategy,
    rankings: &Rankings,
    context: &GameContext,
    emergencies: usize,
) -> Vec<String> {
    let mut advice = Vec::new();

    if actions.is_empty() {
        advice.push("No tiles in hand to evaluate".to_string());
    }

    match rankings.get(&strategy.primary_pattern) {
        Some(primary) => advice.push(format!(
            "Focus on {} (score {:.0}, {})",
            primary.pattern_id, primary.total_score, primary.recommendation
        )),
        None => advice.push("No pattern stands out yet; keep your options open".to_string()),
    }

    if let Some(backup) = &strategy.backup_pattern {
        advice.push(format!("Keep {} as a backup", backup));
    }

    if let Some(pivot) = &strategy.pivot_condition {
        advice.push(pivot.clone());
    }

    let let_go: Vec<&str> = actions
        .iter()
        .filter(|a| matches!(a.action, ActionKind::Pass | ActionKind::Discard))
        .map(|a| a.tile_id.as_str())
        .collect();
    if !let_go.is_empty() {
        let verb = if context.is_charleston() { "Pass" } else { "Discard" };
        advice.push(format!("{}: {}", verb, let_go.join(", ")));
    }

    if context.jokers_in_hand > 0 {
        advice.push("Save jokers for pungs, kongs and quints".to_string());
    }

    if emergencies > 0 {
        advice.push(format!(
            "{} tile(s) carry high-severity warnings; review before acting",
            emergencies
        ));
    }

    advice
}
