use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Every ranking and recommendation threshold lies in [0, 1]
/// - At least one recommendation is returned
/// - The critical pattern window covers at least one pattern
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let thresholds = [
        ("ranking.viability_threshold", config.ranking.viability_threshold),
        ("ranking.switch_threshold", config.ranking.switch_threshold),
        (
            "recommendation.contribution_threshold",
            config.recommendation.contribution_threshold,
        ),
        (
            "recommendation.low_value_threshold",
            config.recommendation.low_value_threshold,
        ),
    ];
    for (name, value) in thresholds {
        if !(0.0..=1.0).contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be between 0 and 1, got {}",
                name, value
            )));
        }
    }

    if config.ranking.max_recommendations == 0 {
        return Err(ConfigError::ValidationError(
            "ranking.max_recommendations cannot be 0".to_string(),
        ));
    }

    if config.recommendation.critical_pattern_window == 0 {
        return Err(ConfigError::ValidationError(
            "recommendation.critical_pattern_window cannot be 0".to_string(),
        ));
    }

    Ok(())
}
