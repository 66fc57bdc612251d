//! Multiset counting over tile sequences.

use serde::{Deserialize, Serialize};

use super::TileId;

/// Ordered multiset of tile identifiers.
///
/// Entries keep the order in which each kind first appeared. Hands and
/// variations hold at most a handful of distinct kinds, so lookups are a
/// linear scan over a flat vector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileCounts {
    entries: Vec<(TileId, u32)>,
}

impl TileCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one copy of a tile (flowers are pooled under `"flower"`).
    pub fn add(&mut self, tile: &TileId) {
        let key = tile.canonical();
        match self.entries.iter_mut().find(|(id, _)| *id == key) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((key, 1)),
        }
    }

    /// Copies of a tile (flower aliases resolve to the pooled count).
    pub fn get(&self, tile: &TileId) -> u32 {
        let key = tile.canonical();
        self.entries
            .iter()
            .find(|(id, _)| *id == key)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn contains(&self, tile: &TileId) -> bool {
        self.get(tile) > 0
    }

    /// Distinct kinds and their counts, in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&TileId, u32)> {
        self.entries.iter().map(|(id, count)| (id, *count))
    }

    /// Distinct kinds in first-appearance order.
    pub fn kinds(&self) -> impl Iterator<Item = &TileId> {
        self.entries.iter().map(|(id, _)| id)
    }

    /// Number of distinct kinds.
    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    /// Total number of tiles counted.
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Kinds held at least `min` times.
    pub fn kinds_with_at_least(&self, min: u32) -> usize {
        self.entries.iter().filter(|(_, count)| *count >= min).count()
    }
}

impl<'a> FromIterator<&'a TileId> for TileCounts {
    fn from_iter<I: IntoIterator<Item = &'a TileId>>(iter: I) -> Self {
        let mut counts = TileCounts::new();
        for tile in iter {
            counts.add(tile);
        }
        counts
    }
}

/// Count tile identifiers in a sequence into a multiset.
pub fn count_tiles(tiles: &[TileId]) -> TileCounts {
    tiles.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(tiles: &[&str]) -> Vec<TileId> {
        tiles.iter().map(|t| TileId::from(*t)).collect()
    }

    #[test]
    fn test_count_tiles_preserves_first_appearance() {
        let counts = count_tiles(&ids(&["6B", "1C", "6B", "joker", "1C", "6B"]));
        let entries: Vec<(String, u32)> = counts
            .iter()
            .map(|(id, count)| (id.to_string(), count))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("6B".to_string(), 3),
                ("1C".to_string(), 2),
                ("joker".to_string(), 1),
            ]
        );
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.distinct(), 3);
    }

    #[test]
    fn test_flowers_pool_together() {
        let counts = count_tiles(&ids(&["f1", "f2", "flower", "6B"]));
        assert_eq!(counts.get(&TileId::from("flower")), 3);
        assert_eq!(counts.get(&TileId::from("f4")), 3);
        assert_eq!(counts.distinct(), 2);
    }

    #[test]
    fn test_case_variants_count_as_one_kind() {
        let counts = count_tiles(&ids(&["6b", "6B", "Joker", "joker", "East"]));
        assert_eq!(counts.get(&TileId::from("6B")), 2);
        assert_eq!(counts.get(&TileId::from("joker")), 2);
        assert_eq!(counts.get(&TileId::from("east")), 1);
        assert_eq!(counts.distinct(), 3);
    }

    #[test]
    fn test_missing_kind_is_zero() {
        let counts = count_tiles(&ids(&["6B"]));
        assert_eq!(counts.get(&TileId::from("9D")), 0);
        assert!(!counts.contains(&TileId::from("9D")));
    }

    #[test]
    fn test_kinds_with_at_least() {
        let counts = count_tiles(&ids(&["6B", "6B", "6B", "1C", "1C", "2D"]));
        assert_eq!(counts.kinds_with_at_least(2), 2);
        assert_eq!(counts.kinds_with_at_least(3), 1);
    }

    #[test]
    fn test_empty() {
        let counts = count_tiles(&[]);
        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
    }
}
