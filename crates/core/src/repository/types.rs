//! Types for pattern variations and pattern metadata.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tile::{TileId, HAND_SIZE};

/// One concrete 14-tile realization of a scoring pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternVariation {
    /// Card year.
    #[serde(default)]
    pub year: u16,
    /// Card section (e.g. "2025", "ANY LIKE NUMBERS").
    pub section: String,
    /// Line within the section.
    #[serde(default)]
    pub line: u32,
    /// Numeric pattern id on the card.
    #[serde(default, alias = "pattern_id")]
    pub pattern_id: u32,
    /// Stable pattern key shared by all variations of a pattern.
    #[serde(alias = "hand_key")]
    pub hand_key: String,
    /// Display form of the pattern (e.g. "FFFF 2025 222 222").
    #[serde(default, alias = "hand_pattern")]
    pub hand_pattern: String,
    /// Free-text criteria (suit requirements, etc.).
    #[serde(default, alias = "hand_criteria")]
    pub hand_criteria: String,
    /// Point value.
    #[serde(default, alias = "hand_points")]
    pub hand_points: u32,
    /// Whether the hand must be fully concealed.
    #[serde(
        default,
        alias = "hand_concealed",
        alias = "handConceiled",
        alias = "hand_conceiled"
    )]
    pub hand_concealed: bool,
    /// Sequence number of this variation within its pattern.
    #[serde(default)]
    pub sequence: u32,
    /// The 14 required tiles.
    pub tiles: Vec<TileId>,
    /// Parallel mask: `true` where a joker may substitute.
    pub jokers: Vec<bool>,
}

impl PatternVariation {
    /// Unique id of this variation (`<hand_key>-<sequence>`).
    pub fn variation_id(&self) -> String {
        format!("{}-{}", self.hand_key, self.sequence)
    }

    /// Exactly 14 tiles with a matching 14-entry joker mask.
    pub fn is_well_formed(&self) -> bool {
        self.tiles.len() == HAND_SIZE && self.jokers.len() == HAND_SIZE
    }

    /// Number of slots that accept a joker.
    pub fn joker_slots(&self) -> usize {
        self.jokers.iter().filter(|allowed| **allowed).count()
    }

    pub fn allows_jokers(&self) -> bool {
        self.jokers.iter().any(|allowed| *allowed)
    }
}

/// Difficulty band of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Reference metadata for a scoring pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternInfo {
    /// Stable pattern key.
    pub key: String,
    /// Display form of the pattern.
    #[serde(default)]
    pub display: String,
    /// Card section.
    #[serde(default)]
    pub section: String,
    /// Point value.
    #[serde(default)]
    pub points: u32,
    /// Difficulty band.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Whether the hand must be concealed.
    #[serde(default)]
    pub concealed: bool,
    /// Whether any group permits joker substitution.
    #[serde(default)]
    pub jokers_allowed: bool,
}

impl PatternInfo {
    /// Neutral metadata for a pattern with nothing known but its key and points.
    pub fn neutral(key: impl Into<String>, points: u32) -> Self {
        Self {
            key: key.into(),
            display: String::new(),
            section: String::new(),
            points,
            difficulty: Difficulty::Medium,
            concealed: false,
            jokers_allowed: true,
        }
    }

    /// Derive metadata from a variation. Difficulty is not part of the
    /// variation record and defaults to medium.
    pub fn from_variation(variation: &PatternVariation) -> Self {
        Self {
            key: variation.hand_key.clone(),
            display: variation.hand_pattern.clone(),
            section: variation.section.clone(),
            points: variation.hand_points,
            difficulty: Difficulty::Medium,
            concealed: variation.hand_concealed,
            jokers_allowed: variation.allows_jokers(),
        }
    }
}

/// Composable predicate over variations.
///
/// Unset criteria match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariationFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_keys: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concealed: Option<bool>,
}

impl VariationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections = Some(sections.into_iter().map(Into::into).collect());
        self
    }

    pub fn pattern_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pattern_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn min_points(mut self, points: u32) -> Self {
        self.min_points = Some(points);
        self
    }

    pub fn max_points(mut self, points: u32) -> Self {
        self.max_points = Some(points);
        self
    }

    pub fn concealed(mut self, concealed: bool) -> Self {
        self.concealed = Some(concealed);
        self
    }

    /// Whether a variation satisfies every set criterion.
    pub fn matches(&self, variation: &PatternVariation) -> bool {
        if let Some(sections) = &self.sections {
            if !sections.iter().any(|s| *s == variation.section) {
                return false;
            }
        }
        if let Some(keys) = &self.pattern_keys {
            if !keys.iter().any(|k| *k == variation.hand_key) {
                return false;
            }
        }
        if let Some(min) = self.min_points {
            if variation.hand_points < min {
                return false;
            }
        }
        if let Some(max) = self.max_points {
            if variation.hand_points > max {
                return false;
            }
        }
        if let Some(concealed) = self.concealed {
            if variation.hand_concealed != concealed {
                return false;
            }
        }
        true
    }
}

/// Summary statistics of a loaded catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariationStatistics {
    /// Variations accepted into the catalog.
    pub total_variations: usize,
    /// Distinct pattern keys.
    pub unique_patterns: usize,
    /// Variation count per section.
    pub sections: BTreeMap<String, usize>,
    /// Records rejected because they were not 14 tiles with a 14-entry mask.
    pub skipped_records: usize,
    /// Mean variations per pattern.
    pub average_variations_per_pattern: f64,
}
