pub mod advisor;
pub mod config;
pub mod context;
pub mod facts;
pub mod generator;
pub mod ranking;
pub mod recommendation;
pub mod repository;
pub mod testing;
pub mod tile;

pub use advisor::{Advisor, AdvisorError, AdvisorReport};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, RepositoryConfig,
};
pub use context::{GameContext, GamePhase};
pub use facts::{match_variation, FactsEngine, PatternFacts, VariationMatch};
pub use generator::{
    generate_variations, parse_definitions, CardSource, GeneratorError, PatternDefinition,
};
pub use ranking::{
    PatternRanking, RankingConfig, RankingEngine, Rankings, RecommendationBand, SwitchAnalysis,
};
pub use recommendation::{
    ActionKind, RecommendationConfig, RecommendationEngine, RecommendationError,
    Recommendations, TileAction,
};
pub use repository::{
    Difficulty, JsonFileSource, PatternInfo, PatternVariation, RepositoryError, StaticSource,
    VariationCatalog, VariationFilter, VariationRepository, VariationSource,
};
pub use tile::{count_tiles, TileCounts, TileError, TileFamily, TileId, TileKind};
