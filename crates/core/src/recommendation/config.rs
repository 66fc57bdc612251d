//! Recommendation engine configuration.

use serde::{Deserialize, Serialize};

/// Thresholds for the recommendation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Pass actions required during the Charleston, capped by the number of
    /// passable (non-joker) tile kinds.
    #[serde(default = "default_min_charleston_passes")]
    pub min_charleston_passes: usize,

    /// Discard actions required during gameplay, capped by the number of
    /// tile kinds.
    #[serde(default = "default_min_gameplay_discards")]
    pub min_gameplay_discards: usize,

    /// Best-variation completion (0.0-1.0) a pattern needs before its tiles
    /// count as contributions.
    #[serde(default = "default_contribution_threshold")]
    pub contribution_threshold: f64,

    /// Contribution value below which a tile helping one pattern is let go.
    #[serde(default = "default_low_value_threshold")]
    pub low_value_threshold: f64,

    /// Number of top-ranked patterns whose critical tiles are protected.
    #[serde(default = "default_critical_pattern_window")]
    pub critical_pattern_window: usize,
}

fn default_min_charleston_passes() -> usize {
    3
}

fn default_min_gameplay_discards() -> usize {
    1
}

fn default_contribution_threshold() -> f64 {
    0.15
}

fn default_low_value_threshold() -> f64 {
    0.3
}

fn default_critical_pattern_window() -> usize {
    3
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            min_charleston_passes: default_min_charleston_passes(),
            min_gameplay_discards: default_min_gameplay_discards(),
            contribution_threshold: default_contribution_threshold(),
            low_value_threshold: default_low_value_threshold(),
            critical_pattern_window: default_critical_pattern_window(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RecommendationConfig::default();
        assert_eq!(config.min_charleston_passes, 3);
        assert_eq!(config.min_gameplay_discards, 1);
        assert_eq!(config.contribution_threshold, 0.15);
        assert_eq!(config.low_value_threshold, 0.3);
        assert_eq!(config.critical_pattern_window, 3);
    }
}
