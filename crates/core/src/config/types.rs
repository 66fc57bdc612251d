use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ranking::RankingConfig;
use crate::recommendation::RecommendationConfig;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub recommendation: RecommendationConfig,
}

/// Variation repository configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RepositoryConfig {
    /// Path to the variation JSON asset
    #[serde(default = "default_repository_path")]
    pub path: PathBuf,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            path: default_repository_path(),
        }
    }
}

fn default_repository_path() -> PathBuf {
    PathBuf::from("nmjl-variations.json")
}
