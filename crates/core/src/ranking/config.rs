//! Ranking engine configuration.

use serde::{Deserialize, Serialize};

/// Thresholds for the ranking engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Best-variation completion (0.0-1.0) at which a pattern is viable
    /// without a strategic override.
    #[serde(default = "default_viability_threshold")]
    pub viability_threshold: f64,

    /// Relative improvement (0.0-1.0) over the focus pattern at which a
    /// switch is suggested.
    #[serde(default = "default_switch_threshold")]
    pub switch_threshold: f64,

    /// Maximum viable patterns listed as top recommendations.
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
}

fn default_viability_threshold() -> f64 {
    0.40
}

fn default_switch_threshold() -> f64 {
    0.15
}

fn default_max_recommendations() -> usize {
    5
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            viability_threshold: default_viability_threshold(),
            switch_threshold: default_switch_threshold(),
            max_recommendations: default_max_recommendations(),
        }
    }
}
