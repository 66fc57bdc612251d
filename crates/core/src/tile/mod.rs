//! Tile identifiers, tile kinds, and multiset counting.
//!
//! Tiles travel through the pipeline as opaque [`TileId`] tokens ("6B",
//! "white", "joker", ...). Parsing an id into a [`TileKind`] is only needed
//! where the suit or rank matters (opponent inference, exposure rules);
//! matching itself compares ids.

mod counts;
mod types;

pub use counts::{count_tiles, TileCounts};
pub use types::{Dragon, Suit, TileFamily, TileId, TileKind, Wind};

use thiserror::Error;

/// Copies of a regular tile in a physical set.
pub const STANDARD_SUPPLY: u32 = 4;

/// Copies of the joker in a physical set.
pub const JOKER_SUPPLY: u32 = 8;

/// Size of the interchangeable flower pool.
pub const FLOWER_SUPPLY: u32 = 8;

/// Number of tiles in a complete hand.
pub const HAND_SIZE: usize = 14;

/// Errors that can occur when interpreting tile identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TileError {
    #[error("Unrecognized tile identifier: {0}")]
    Unrecognized(String),

    #[error("Rank out of range for {suit:?}: {rank}")]
    RankOutOfRange { suit: Suit, rank: u8 },
}

/// Original supply of a tile in a physical set.
///
/// Only used for wall-availability math. Unknown identifiers are treated
/// like any other regular tile.
pub fn original_supply(tile: &TileId) -> u32 {
    match tile.kind() {
        Ok(TileKind::Joker) => JOKER_SUPPLY,
        Ok(TileKind::Flower) => FLOWER_SUPPLY,
        _ => STANDARD_SUPPLY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_original_supply() {
        assert_eq!(original_supply(&TileId::from("joker")), 8);
        assert_eq!(original_supply(&TileId::from("flower")), 8);
        assert_eq!(original_supply(&TileId::from("f3")), 8);
        assert_eq!(original_supply(&TileId::from("6B")), 4);
        assert_eq!(original_supply(&TileId::from("white")), 4);
        assert_eq!(original_supply(&TileId::from("mystery")), 4);
    }

    #[test]
    fn test_error_display() {
        let err = TileError::Unrecognized("10Z".to_string());
        assert_eq!(err.to_string(), "Unrecognized tile identifier: 10Z");
    }
}
