//! Testing utilities and mock implementations.
//!
//! Provides a mock [`VariationSource`](crate::repository::VariationSource)
//! and a small scoring card with a known hand, so every engine can be
//! exercised without a real variation asset.
//!
//! # Example
//!
//! ```rust,ignore
//! use tilewise_core::testing::{fixtures, MockVariationSource};
//!
//! let source = MockVariationSource::with_variations(fixtures::sample_variations());
//! let repo = VariationRepository::new(Arc::new(source));
//! let catalog = repo.load().await?;
//! ```

mod mock_source;

pub use mock_source::MockVariationSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::context::GameContext;
    use crate::facts::{
        JokerAnalysis, MissingTileAvailability, PatternFacts, Progress, TileMatching,
        VariationMatch, WallAvailability,
    };
    use crate::generator::{
        generate_variations, pattern_info, ConstraintType, GroupDefinition, PatternDefinition,
        SuitRole,
    };
    use crate::repository::{Difficulty, PatternInfo, PatternVariation, VariationCatalog};
    use crate::tile::{original_supply, TileId, HAND_SIZE};

    /// Flowers, a kong of 6s, a pair of 6s and a kong of 6s, each in its own suit.
    pub const LIKE_NUMBERS: &str = "2025-LIKE_NUMBERS-1";
    /// Flowers, 2025 in one suit, pungs of 2s in the other two.
    pub const YEAR_2025: &str = "2025-2025-1";
    /// A flower pair and a kong of each dragon.
    pub const WINDS_DRAGONS: &str = "2025-WINDS_DRAGONS-1";

    fn group(
        name: &str,
        suit_role: SuitRole,
        constraint_type: ConstraintType,
        values: &str,
        jokers_allowed: bool,
    ) -> GroupDefinition {
        GroupDefinition {
            group: name.to_string(),
            suit_role,
            constraint_type,
            constraint_values: values.to_string(),
            jokers_allowed,
            must_match: None,
        }
    }

    fn definition(
        key: &str,
        section: &str,
        pattern: &str,
        points: u32,
        difficulty: Difficulty,
        groups: Vec<GroupDefinition>,
    ) -> PatternDefinition {
        PatternDefinition {
            hands_key: key.to_string(),
            year: 2025,
            section: section.to_string(),
            line: 1,
            pattern_id: 1,
            hand_pattern: pattern.to_string(),
            hand_description: String::new(),
            hand_points: points,
            hand_concealed: false,
            hand_difficulty: difficulty,
            groups,
        }
    }

    /// FFFF 6666 66 6666, three suits.
    pub fn like_numbers_definition() -> PatternDefinition {
        definition(
            LIKE_NUMBERS,
            "LIKE NUMBERS",
            "FFFF 6666 66 6666",
            25,
            Difficulty::Easy,
            vec![
                group("g1", SuitRole::None, ConstraintType::Kong, "flower", true),
                group("g2", SuitRole::Any, ConstraintType::Kong, "6", true),
                group("g3", SuitRole::Second, ConstraintType::Pair, "6", false),
                group("g4", SuitRole::Third, ConstraintType::Kong, "6", true),
            ],
        )
    }

    /// FFFF 2025 222 222, three suits.
    pub fn year_definition() -> PatternDefinition {
        definition(
            YEAR_2025,
            "2025",
            "FFFF 2025 222 222",
            30,
            Difficulty::Medium,
            vec![
                group("g1", SuitRole::None, ConstraintType::Kong, "flower", true),
                group("g2", SuitRole::Any, ConstraintType::Sequence, "2025", false),
                group("g3", SuitRole::Second, ConstraintType::Pung, "2", true),
                group("g4", SuitRole::Third, ConstraintType::Pung, "2", true),
            ],
        )
    }

    /// FF DDDD DDDD DDDD, one of each dragon.
    pub fn winds_dragons_definition() -> PatternDefinition {
        definition(
            WINDS_DRAGONS,
            "WINDS - DRAGONS",
            "FF DDDD DDDD DDDD",
            50,
            Difficulty::Hard,
            vec![
                group("g1", SuitRole::None, ConstraintType::Pair, "flower", false),
                group("g2", SuitRole::None, ConstraintType::Kong, "red", true),
                group("g3", SuitRole::None, ConstraintType::Kong, "green", true),
                group("g4", SuitRole::None, ConstraintType::Kong, "white", true),
            ],
        )
    }

    pub fn sample_definitions() -> Vec<PatternDefinition> {
        vec![
            like_numbers_definition(),
            year_definition(),
            winds_dragons_definition(),
        ]
    }

    /// Every variation of the sample card (13 records).
    pub fn sample_variations() -> Vec<PatternVariation> {
        generate_variations(&sample_definitions()).unwrap_or_default()
    }

    pub fn sample_catalog() -> VariationCatalog {
        VariationCatalog::new(sample_variations())
    }

    pub fn sample_pattern_info() -> Vec<PatternInfo> {
        pattern_info(&sample_definitions())
    }

    pub fn sample_pattern_keys() -> Vec<String> {
        vec![
            LIKE_NUMBERS.to_string(),
            YEAR_2025.to_string(),
            WINDS_DRAGONS.to_string(),
        ]
    }

    /// A dealt hand leaning towards like numbers, with one joker.
    pub fn sample_hand() -> Vec<TileId> {
        [
            "6B", "6B", "6C", "6C", "1B", "1C", "2B", "flower", "joker", "4D", "5D", "9B",
            "white", "green",
        ]
        .iter()
        .map(|t| TileId::from(*t))
        .collect()
    }

    pub fn charleston_context(hand: &[TileId]) -> GameContext {
        GameContext::charleston(hand)
    }

    /// Gameplay context with a few unrelated discards and no exposures.
    pub fn gameplay_context(hand: &[TileId], wall_tiles_remaining: u32) -> GameContext {
        GameContext::gameplay(hand, wall_tiles_remaining)
            .with_discards(vec![TileId::from("north"), TileId::from("8C")])
    }

    /// Build facts directly, bypassing the facts engine.
    ///
    /// `missing` lists `(tile, needed, remaining_in_wall)`; the gap between
    /// supply and remaining is booked as exposed.
    pub fn make_facts(
        id: &str,
        points: u32,
        tiles_matched: u32,
        average_completion: f64,
        missing: &[(&str, u32, u32)],
    ) -> PatternFacts {
        let missing_tiles: Vec<TileId> = missing
            .iter()
            .flat_map(|(tile, needed, _)| {
                std::iter::repeat(TileId::from(*tile)).take(*needed as usize)
            })
            .collect();
        let completion_ratio = tiles_matched as f64 / HAND_SIZE as f64;

        let best = VariationMatch {
            variation_id: format!("{}-1", id),
            sequence: 1,
            tiles_matched,
            completion_ratio,
            missing_tiles,
            tile_contributions: Vec::new(),
        };

        let availability: Vec<MissingTileAvailability> = missing
            .iter()
            .map(|(tile, needed, remaining)| {
                let tile_id = TileId::from(*tile);
                let supply = original_supply(&tile_id);
                MissingTileAvailability {
                    tile_id,
                    needed: *needed,
                    original_supply: supply,
                    in_discards: 0,
                    exposed: supply.saturating_sub(*remaining),
                    remaining_available: *remaining,
                }
            })
            .collect();
        let total_missing_in_wall: u32 = availability.iter().map(|m| m.remaining_available).sum();
        let total_missing_needed: u32 = availability.iter().map(|m| m.needed).sum();

        PatternFacts {
            pattern_id: id.to_string(),
            points,
            concealed: false,
            total_variations: 6,
            tile_matching: TileMatching {
                worst_variation: best.clone(),
                best_variation: best,
                average_completion,
            },
            joker_analysis: JokerAnalysis {
                jokers_available: 0,
                joker_slots: 0,
                substitutable_positions: Vec::new(),
                max_jokers_useful: 0,
                jokers_to_complete: total_missing_needed,
                with_jokers_completion: completion_ratio,
            },
            wall_availability: WallAvailability {
                missing_tiles: availability,
                total_missing_in_wall,
                total_missing_needed,
                availability_ratio: if total_missing_needed == 0 {
                    0.0
                } else {
                    total_missing_in_wall as f64 / total_missing_needed as f64
                },
            },
            progress: Progress {
                tiles_needed: total_missing_needed,
                pairs_formed: 0,
                sets_formed: 0,
            },
        }
    }
}
