//! Variation generator.
//!
//! Expands scoring-card definitions into concrete 14-tile variations:
//! suit roles receive every assignment of distinct suits, value
//! alternatives expand into one variation per combination, and the joker
//! mask follows each group's joker rule.

mod types;

pub use types::{ConstraintType, GroupDefinition, PatternDefinition, SuitRole};

use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::debug;

use crate::repository::{PatternInfo, PatternVariation, RepositoryError, VariationSource};
use crate::tile::{Dragon, Suit, TileId, TileKind, Wind, HAND_SIZE};

/// Errors that can occur while expanding card definitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("Unknown suit role: {0}")]
    UnknownSuitRole(String),

    #[error("Unknown constraint type: {0}")]
    UnknownConstraint(String),

    #[error("Group {group} copies the suit of unknown group {target}")]
    UnknownGroup { group: String, target: String },

    #[error("Group {group} has numbered values but no suit")]
    MissingSuit { group: String },

    #[error("Group {group} has invalid value: {value}")]
    InvalidValue { group: String, value: String },

    #[error("Pattern {hand_key} expands to {count} tiles, expected 14")]
    TileCount { hand_key: String, count: usize },

    #[error("Failed to parse card definitions: {0}")]
    ParseError(String),
}

/// Parse card definitions from JSON.
pub fn parse_definitions(json: &str) -> Result<Vec<PatternDefinition>, GeneratorError> {
    serde_json::from_str(json).map_err(|e| GeneratorError::ParseError(e.to_string()))
}

/// Metadata for every distinct pattern key, in first-appearance order.
pub fn pattern_info(definitions: &[PatternDefinition]) -> Vec<PatternInfo> {
    let mut seen = HashSet::new();
    definitions
        .iter()
        .filter(|d| seen.insert(d.hands_key.as_str()))
        .map(PatternDefinition::info)
        .collect()
}

/// Expand every definition into its variations.
///
/// Sequence numbers restart at 1 for each pattern key and run across every
/// definition that shares the key. Identical expansions of one key are kept
/// once.
pub fn generate_variations(
    definitions: &[PatternDefinition],
) -> Result<Vec<PatternVariation>, GeneratorError> {
    let mut variations = Vec::new();
    let mut next_sequence: BTreeMap<&str, u32> = BTreeMap::new();
    let mut seen: HashSet<(String, Vec<TileId>, Vec<bool>)> = HashSet::new();

    for definition in definitions {
        let expansions = expand_definition(definition)?;
        debug!(
            hand_key = %definition.hands_key,
            expansions = expansions.len(),
            "Expanded card definition"
        );

        for (tiles, jokers) in expansions {
            if !seen.insert((definition.hands_key.clone(), tiles.clone(), jokers.clone())) {
                continue;
            }
            let sequence = next_sequence
                .entry(definition.hands_key.as_str())
                .or_insert(0);
            *sequence += 1;

            variations.push(PatternVariation {
                year: definition.year,
                section: definition.section.clone(),
                line: definition.line,
                pattern_id: definition.pattern_id,
                hand_key: definition.hands_key.clone(),
                hand_pattern: definition.hand_pattern.clone(),
                hand_criteria: definition.hand_description.clone(),
                hand_points: definition.hand_points,
                hand_concealed: definition.hand_concealed,
                sequence: *sequence,
                tiles,
                jokers,
            });
        }
    }

    Ok(variations)
}

/// One expansion of a definition: the 14 tiles and their joker mask.
type Expansion = (Vec<TileId>, Vec<bool>);

fn expand_definition(definition: &PatternDefinition) -> Result<Vec<Expansion>, GeneratorError> {
    let mut expansions = Vec::new();

    for assignment in suit_assignments(&definition.groups)? {
        // Each group contributes a list of alternative tile runs.
        let mut per_group: Vec<(Vec<Vec<TileId>>, bool)> = Vec::new();
        for group in &definition.groups {
            let suit = assignment.get(group.group.as_str()).copied();
            per_group.push((group_options(group, suit)?, group.accepts_jokers()));
        }

        let mut partial: Vec<Expansion> = vec![(Vec::new(), Vec::new())];
        for (options, jokers_ok) in &per_group {
            let mut next = Vec::with_capacity(partial.len() * options.len());
            for (tiles, mask) in &partial {
                for option in options {
                    let mut tiles = tiles.clone();
                    let mut mask = mask.clone();
                    tiles.extend(option.iter().cloned());
                    mask.extend(std::iter::repeat(*jokers_ok).take(option.len()));
                    next.push((tiles, mask));
                }
            }
            partial = next;
        }

        for (tiles, mask) in partial {
            if tiles.len() != HAND_SIZE {
                return Err(GeneratorError::TileCount {
                    hand_key: definition.hands_key.clone(),
                    count: tiles.len(),
                });
            }
            expansions.push((tiles, mask));
        }
    }

    Ok(expansions)
}

/// Every assignment of suits to groups.
///
/// Roles any, second and third take distinct suits from each permutation
/// of the three suits; `same_as:` and must-match links copy an assigned
/// suit.
fn suit_assignments(
    groups: &[GroupDefinition],
) -> Result<Vec<BTreeMap<&str, Suit>>, GeneratorError> {
    let roles: Vec<SuitRole> = [SuitRole::Any, SuitRole::Second, SuitRole::Third]
        .into_iter()
        .filter(|role| groups.iter().any(|g| g.suit_role == *role))
        .collect();

    let mut assignments = Vec::new();
    for combo in suit_permutations(roles.len()) {
        let mut assignment: BTreeMap<&str, Suit> = BTreeMap::new();
        for (role, suit) in roles.iter().zip(&combo) {
            for group in groups.iter().filter(|g| g.suit_role == *role) {
                assignment.insert(group.group.as_str(), *suit);
            }
        }

        for group in groups {
            if let SuitRole::SameAs(target) = &group.suit_role {
                if !groups.iter().any(|g| g.group == *target) {
                    return Err(GeneratorError::UnknownGroup {
                        group: group.group.clone(),
                        target: target.clone(),
                    });
                }
                if let Some(suit) = assignment.get(target.as_str()).copied() {
                    assignment.insert(group.group.as_str(), suit);
                }
            }

            if let Some(partner) = &group.must_match {
                let Some(other) = groups.iter().find(|g| g.group == *partner) else {
                    return Err(GeneratorError::UnknownGroup {
                        group: group.group.clone(),
                        target: partner.clone(),
                    });
                };
                let mine = assignment.get(group.group.as_str()).copied();
                let theirs = assignment.get(other.group.as_str()).copied();
                match (mine, theirs) {
                    (Some(suit), None) => {
                        assignment.insert(other.group.as_str(), suit);
                    }
                    (None, Some(suit)) => {
                        assignment.insert(group.group.as_str(), suit);
                    }
                    _ => {}
                }
            }
        }

        assignments.push(assignment);
    }

    Ok(assignments)
}

/// Ordered selections of `k` distinct suits.
fn suit_permutations(k: usize) -> Vec<Vec<Suit>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    let mut result = Vec::new();
    for shorter in suit_permutations(k - 1) {
        for suit in Suit::ALL {
            if !shorter.contains(&suit) {
                let mut combo = shorter.clone();
                combo.push(suit);
                result.push(combo);
            }
        }
    }
    result
}

/// Alternative tile runs a group can take under a suit assignment.
fn group_options(
    group: &GroupDefinition,
    suit: Option<Suit>,
) -> Result<Vec<Vec<TileId>>, GeneratorError> {
    let tokens: Vec<&str> = group
        .constraint_values
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err(invalid(group, &group.constraint_values));
    }

    match group.constraint_type.copies() {
        Some(copies) => {
            let mut options = Vec::new();
            for token in tokens {
                if token.len() > 1 && token.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid(group, token));
                }
                for tile in token_alternatives(group, token, suit)? {
                    options.push(vec![tile; copies]);
                }
            }
            Ok(options)
        }
        None => {
            // Ordered groups: each position may still offer alternatives.
            let mut positions: Vec<Vec<TileId>> = Vec::new();
            for token in tokens {
                if token.chars().all(|c| c.is_ascii_digit()) {
                    for digit in token.chars() {
                        positions.push(token_alternatives(group, &digit.to_string(), suit)?);
                    }
                } else {
                    positions.push(token_alternatives(group, token, suit)?);
                }
            }

            let mut options: Vec<Vec<TileId>> = vec![Vec::new()];
            for alternatives in positions {
                options = options
                    .iter()
                    .flat_map(|prefix| {
                        alternatives.iter().map(move |tile| {
                            let mut run = prefix.clone();
                            run.push(tile.clone());
                            run
                        })
                    })
                    .collect();
            }
            Ok(options)
        }
    }
}

/// Tiles a single value token can stand for.
fn token_alternatives(
    group: &GroupDefinition,
    token: &str,
    suit: Option<Suit>,
) -> Result<Vec<TileId>, GeneratorError> {
    let lower = token.to_ascii_lowercase();

    if let Ok(rank) = lower.parse::<u8>() {
        if rank == 0 {
            return Ok(vec![TileKind::Dragon { dragon: Dragon::White }.into()]);
        }
        let suit = suit.ok_or_else(|| GeneratorError::MissingSuit {
            group: group.group.clone(),
        })?;
        let kind = TileKind::suited(suit, rank).map_err(|_| invalid(group, token))?;
        return Ok(vec![kind.into()]);
    }

    match lower.as_str() {
        "flower" | "f" => Ok(vec![TileKind::Flower.into()]),
        "dragon" | "d" => Ok(match suit {
            Some(suit) => vec![TileKind::Dragon { dragon: matching_dragon(suit) }.into()],
            None => Dragon::ALL
                .into_iter()
                .map(|dragon| TileKind::Dragon { dragon }.into())
                .collect(),
        }),
        "wind" | "w" => Ok(Wind::ALL
            .into_iter()
            .map(|wind| TileKind::Wind { wind }.into())
            .collect()),
        _ => match lower.parse::<TileKind>() {
            Ok(kind @ (TileKind::Wind { .. } | TileKind::Dragon { .. })) => Ok(vec![kind.into()]),
            _ => Err(invalid(group, token)),
        },
    }
}

/// Dragon conventionally paired with each suit.
fn matching_dragon(suit: Suit) -> Dragon {
    match suit {
        Suit::Dots => Dragon::White,
        Suit::Bams => Dragon::Green,
        Suit::Cracks => Dragon::Red,
    }
}

fn invalid(group: &GroupDefinition, value: &str) -> GeneratorError {
    GeneratorError::InvalidValue {
        group: group.group.clone(),
        value: value.to_string(),
    }
}

/// Serves variations generated from card definitions.
#[derive(Debug, Clone)]
pub struct CardSource {
    definitions: Vec<PatternDefinition>,
}

impl CardSource {
    pub fn new(definitions: Vec<PatternDefinition>) -> Self {
        Self { definitions }
    }

    /// Create a source from card JSON.
    pub fn from_json(json: &str) -> Result<Self, GeneratorError> {
        Ok(Self::new(parse_definitions(json)?))
    }

    pub fn definitions(&self) -> &[PatternDefinition] {
        &self.definitions
    }

    /// Metadata for the patterns on this card.
    pub fn pattern_info(&self) -> Vec<PatternInfo> {
        pattern_info(&self.definitions)
    }
}

#[async_trait]
impl VariationSource for CardSource {
    fn name(&self) -> &str {
        "card"
    }

    async fn fetch(&self) -> Result<Vec<PatternVariation>, RepositoryError> {
        Ok(generate_variations(&self.definitions)?)
    }
}
