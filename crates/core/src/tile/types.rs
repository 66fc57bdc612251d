//! Tile identifier and kind types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::TileError;

/// Canonical identifier shared by every flower tile.
const FLOWER_ID: &str = "flower";

/// Opaque tile identifier, e.g. `"6B"`, `"east"`, `"white"`, `"joker"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(String);

impl TileId {
    /// Create a tile id from any string token.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the identifier into a tile kind.
    pub fn kind(&self) -> Result<TileKind, TileError> {
        self.0.parse()
    }

    /// Identifier used for multiset counting.
    ///
    /// Recognized ids are rewritten in the form [`TileKind`] displays:
    /// honors and jokers lowercase, suit letters uppercase, and every flower
    /// alias as `"flower"`. Unrecognized ids are returned unchanged.
    pub fn canonical(&self) -> TileId {
        match self.kind() {
            Ok(kind) => TileId::from(kind),
            Err(_) => self.clone(),
        }
    }

    pub fn is_joker(&self) -> bool {
        matches!(self.kind(), Ok(TileKind::Joker))
    }

    pub fn is_flower(&self) -> bool {
        matches!(self.kind(), Ok(TileKind::Flower))
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TileId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TileId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<TileKind> for TileId {
    fn from(kind: TileKind) -> Self {
        Self(kind.to_string())
    }
}

/// The three numbered suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Dots,
    Bams,
    Cracks,
}

impl Suit {
    pub const ALL: [Suit; 3] = [Suit::Dots, Suit::Bams, Suit::Cracks];

    /// Single-letter suffix used in tile ids.
    pub fn letter(&self) -> char {
        match self {
            Suit::Dots => 'D',
            Suit::Bams => 'B',
            Suit::Cracks => 'C',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'D' => Some(Suit::Dots),
            'B' => Some(Suit::Bams),
            'C' => Some(Suit::Cracks),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wind {
    East,
    South,
    West,
    North,
}

impl Wind {
    pub const ALL: [Wind; 4] = [Wind::East, Wind::South, Wind::West, Wind::North];

    fn name(&self) -> &'static str {
        match self {
            Wind::East => "east",
            Wind::South => "south",
            Wind::West => "west",
            Wind::North => "north",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dragon {
    Red,
    Green,
    White,
}

impl Dragon {
    pub const ALL: [Dragon; 3] = [Dragon::Red, Dragon::Green, Dragon::White];

    fn name(&self) -> &'static str {
        match self {
            Dragon::Red => "red",
            Dragon::Green => "green",
            Dragon::White => "white",
        }
    }
}

/// A parsed tile kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TileKind {
    Suited { suit: Suit, rank: u8 },
    Wind { wind: Wind },
    Dragon { dragon: Dragon },
    Flower,
    Joker,
}

impl TileKind {
    pub fn suited(suit: Suit, rank: u8) -> Result<Self, TileError> {
        if !(1..=9).contains(&rank) {
            return Err(TileError::RankOutOfRange { suit, rank });
        }
        Ok(TileKind::Suited { suit, rank })
    }

    pub fn family(&self) -> TileFamily {
        match self {
            TileKind::Suited { suit: Suit::Dots, .. } => TileFamily::Dots,
            TileKind::Suited { suit: Suit::Bams, .. } => TileFamily::Bams,
            TileKind::Suited { suit: Suit::Cracks, .. } => TileFamily::Cracks,
            TileKind::Wind { .. } => TileFamily::Winds,
            TileKind::Dragon { .. } => TileFamily::Dragons,
            TileKind::Flower => TileFamily::Flowers,
            TileKind::Joker => TileFamily::Jokers,
        }
    }

    /// Winds and dragons.
    pub fn is_honor(&self) -> bool {
        matches!(self, TileKind::Wind { .. } | TileKind::Dragon { .. })
    }

    pub fn is_numbered(&self) -> bool {
        matches!(self, TileKind::Suited { .. })
    }

    /// Suit and rank of a numbered tile.
    pub fn suit_rank(&self) -> Option<(Suit, u8)> {
        match self {
            TileKind::Suited { suit, rank } => Some((*suit, *rank)),
            _ => None,
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileKind::Suited { suit, rank } => write!(f, "{}{}", rank, suit.letter()),
            TileKind::Wind { wind } => f.write_str(wind.name()),
            TileKind::Dragon { dragon } => f.write_str(dragon.name()),
            TileKind::Flower => f.write_str(FLOWER_ID),
            TileKind::Joker => f.write_str("joker"),
        }
    }
}

impl FromStr for TileKind {
    type Err = TileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "joker" => return Ok(TileKind::Joker),
            "flower" => return Ok(TileKind::Flower),
            "east" => return Ok(TileKind::Wind { wind: Wind::East }),
            "south" => return Ok(TileKind::Wind { wind: Wind::South }),
            "west" => return Ok(TileKind::Wind { wind: Wind::West }),
            "north" => return Ok(TileKind::Wind { wind: Wind::North }),
            "red" => return Ok(TileKind::Dragon { dragon: Dragon::Red }),
            "green" => return Ok(TileKind::Dragon { dragon: Dragon::Green }),
            "white" => return Ok(TileKind::Dragon { dragon: Dragon::White }),
            _ => {}
        }

        let chars: Vec<char> = lower.chars().collect();
        if chars.len() != 2 {
            return Err(TileError::Unrecognized(s.to_string()));
        }

        // f1..f8 are flower aliases
        if chars[0] == 'f' {
            return match chars[1].to_digit(10) {
                Some(1..=8) => Ok(TileKind::Flower),
                _ => Err(TileError::Unrecognized(s.to_string())),
            };
        }

        let rank = chars[0]
            .to_digit(10)
            .ok_or_else(|| TileError::Unrecognized(s.to_string()))? as u8;
        let suit =
            Suit::from_letter(chars[1]).ok_or_else(|| TileError::Unrecognized(s.to_string()))?;
        TileKind::suited(suit, rank)
    }
}

/// Broad grouping of tile kinds, used for opponent inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileFamily {
    Dots,
    Bams,
    Cracks,
    Winds,
    Dragons,
    Flowers,
    Jokers,
}

impl fmt::Display for TileFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TileFamily::Dots => "dots",
            TileFamily::Bams => "bams",
            TileFamily::Cracks => "cracks",
            TileFamily::Winds => "winds",
            TileFamily::Dragons => "dragons",
            TileFamily::Flowers => "flowers",
            TileFamily::Jokers => "jokers",
        };
        f.write_str(name)
    }
}
