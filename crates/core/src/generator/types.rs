//! Scoring-card definition types.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::GeneratorError;
use crate::repository::{Difficulty, PatternInfo};

/// One line of the scoring card, before suit and value expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternDefinition {
    /// Stable key shared by every variation this definition expands into.
    #[serde(alias = "Hands_Key", alias = "hands_key")]
    pub hands_key: String,
    #[serde(default, alias = "Year")]
    pub year: u16,
    #[serde(alias = "Section")]
    pub section: String,
    #[serde(default, alias = "Line")]
    pub line: u32,
    #[serde(default, alias = "Pattern_ID", alias = "pattern_id")]
    pub pattern_id: u32,
    #[serde(default, alias = "Hand_Pattern", alias = "hand_pattern")]
    pub hand_pattern: String,
    #[serde(default, alias = "Hand_Description", alias = "hand_description")]
    pub hand_description: String,
    #[serde(default, alias = "Hand_Points", alias = "hand_points")]
    pub hand_points: u32,
    #[serde(
        default,
        alias = "Hand_Conceiled",
        alias = "Hand_Concealed",
        alias = "hand_concealed"
    )]
    pub hand_concealed: bool,
    #[serde(default, alias = "Hand_Difficulty", alias = "hand_difficulty")]
    pub hand_difficulty: Difficulty,
    #[serde(alias = "Groups")]
    pub groups: Vec<GroupDefinition>,
}

impl PatternDefinition {
    /// Metadata for the pattern this definition describes.
    pub fn info(&self) -> PatternInfo {
        PatternInfo {
            key: self.hands_key.clone(),
            display: self.hand_pattern.clone(),
            section: self.section.clone(),
            points: self.hand_points,
            difficulty: self.hand_difficulty,
            concealed: self.hand_concealed,
            jokers_allowed: self.groups.iter().any(GroupDefinition::accepts_jokers),
        }
    }
}

/// One tile group within a card line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDefinition {
    /// Group label, referenced by `same_as:` roles.
    #[serde(alias = "Group")]
    pub group: String,
    #[serde(default, alias = "Suit_Role", alias = "suit_role")]
    pub suit_role: SuitRole,
    #[serde(alias = "Constraint_Type", alias = "constraint_type")]
    pub constraint_type: ConstraintType,
    /// Comma-separated values. Identical-tile groups treat them as
    /// alternatives; ordered groups treat them as consecutive tiles.
    #[serde(
        alias = "Constraint_Values",
        alias = "constraint_values",
        deserialize_with = "text_or_number"
    )]
    pub constraint_values: String,
    #[serde(default, alias = "Jokers_Allowed", alias = "jokers_allowed")]
    pub jokers_allowed: bool,
    /// Another group that must share this group's suit.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "Constraint_Must_Match",
        alias = "must_match"
    )]
    pub must_match: Option<String>,
}

impl GroupDefinition {
    /// Whether jokers may stand in for this group's tiles. Only pungs and
    /// larger identical groups accept them; singles, sequences and pairs never do.
    pub fn accepts_jokers(&self) -> bool {
        self.jokers_allowed && self.constraint_type.copies().is_some_and(|n| n >= 3)
    }
}

/// Suit assignment role of a group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SuitRole {
    /// Honors, flowers, or a value with no suit.
    #[default]
    None,
    /// First distinct suit.
    Any,
    /// Second distinct suit.
    Second,
    /// Third distinct suit.
    Third,
    /// Same suit as the named group.
    SameAs(String),
}

impl FromStr for SuitRole {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let role = s.trim();
        if let Some(group) = role.strip_prefix("same_as:") {
            return Ok(SuitRole::SameAs(group.trim().to_string()));
        }
        match role.to_ascii_lowercase().as_str() {
            "" | "none" => Ok(SuitRole::None),
            "any" => Ok(SuitRole::Any),
            "second" => Ok(SuitRole::Second),
            "third" => Ok(SuitRole::Third),
            _ => Err(GeneratorError::UnknownSuitRole(s.to_string())),
        }
    }
}

impl TryFrom<String> for SuitRole {
    type Error = GeneratorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SuitRole> for String {
    fn from(role: SuitRole) -> Self {
        role.to_string()
    }
}

impl fmt::Display for SuitRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuitRole::None => write!(f, "none"),
            SuitRole::Any => write!(f, "any"),
            SuitRole::Second => write!(f, "second"),
            SuitRole::Third => write!(f, "third"),
            SuitRole::SameAs(group) => write!(f, "same_as:{}", group),
        }
    }
}

/// Shape of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ConstraintType {
    Single,
    Pair,
    Pung,
    Kong,
    Quint,
    Sequence,
}

impl ConstraintType {
    /// Copies of one tile for identical-tile groups; `None` for ordered
    /// groups whose length follows their values.
    pub fn copies(&self) -> Option<usize> {
        match self {
            ConstraintType::Pair => Some(2),
            ConstraintType::Pung => Some(3),
            ConstraintType::Kong => Some(4),
            ConstraintType::Quint => Some(5),
            ConstraintType::Single | ConstraintType::Sequence => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintType::Single => "single",
            ConstraintType::Pair => "pair",
            ConstraintType::Pung => "pung",
            ConstraintType::Kong => "kong",
            ConstraintType::Quint => "quint",
            ConstraintType::Sequence => "sequence",
        }
    }
}

impl FromStr for ConstraintType {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(ConstraintType::Single),
            "pair" => Ok(ConstraintType::Pair),
            "pung" => Ok(ConstraintType::Pung),
            "kong" => Ok(ConstraintType::Kong),
            "quint" => Ok(ConstraintType::Quint),
            "sequence" | "run" => Ok(ConstraintType::Sequence),
            _ => Err(GeneratorError::UnknownConstraint(s.to_string())),
        }
    }
}

impl TryFrom<String> for ConstraintType {
    type Error = GeneratorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConstraintType> for String {
    fn from(constraint: ConstraintType) -> Self {
        constraint.as_str().to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(u64),
}

/// Card files write values such as `2025` or `6` as bare numbers.
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suit_role_parse() {
        assert_eq!("any".parse::<SuitRole>().unwrap(), SuitRole::Any);
        assert_eq!("".parse::<SuitRole>().unwrap(), SuitRole::None);
        assert_eq!(
            "same_as:g2".parse::<SuitRole>().unwrap(),
            SuitRole::SameAs("g2".to_string())
        );
        assert!(matches!(
            "fourth".parse::<SuitRole>(),
            Err(GeneratorError::UnknownSuitRole(_))
        ));
    }

    #[test]
    fn test_constraint_copies() {
        assert_eq!(ConstraintType::Kong.copies(), Some(4));
        assert_eq!(ConstraintType::Sequence.copies(), None);
        assert!(matches!(
            "sextet".parse::<ConstraintType>(),
            Err(GeneratorError::UnknownConstraint(_))
        ));
    }

    #[test]
    fn test_deserialize_card_style_keys() {
        let json = r#"{
            "Hands_Key": "2025-1",
            "Section": "2025",
            "Line": 1,
            "Hand_Points": 25,
            "Hand_Conceiled": false,
            "Groups": [
                {"Group": "g1", "Suit_Role": "any", "Constraint_Type": "sequence",
                 "Constraint_Values": 2025, "Jokers_Allowed": false}
            ]
        }"#;
        let definition: PatternDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(definition.hands_key, "2025-1");
        assert_eq!(definition.groups[0].constraint_values, "2025");
        assert_eq!(definition.groups[0].suit_role, SuitRole::Any);
        assert_eq!(definition.hand_difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_pairs_never_accept_jokers() {
        let pair = GroupDefinition {
            group: "g1".to_string(),
            suit_role: SuitRole::Any,
            constraint_type: ConstraintType::Pair,
            constraint_values: "6".to_string(),
            jokers_allowed: true,
            must_match: None,
        };
        assert!(!pair.accepts_jokers());

        let kong = GroupDefinition {
            constraint_type: ConstraintType::Kong,
            ..pair
        };
        assert!(kong.accepts_jokers());
    }
}
