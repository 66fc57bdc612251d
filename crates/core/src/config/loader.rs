use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load configuration from file with environment variable overrides
///
/// Variables use the `TILEWISE_` prefix and `__` between section and key,
/// e.g. `TILEWISE_RANKING__SWITCH_THRESHOLD=0.2`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("TILEWISE_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_empty_uses_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.repository.path, PathBuf::from("nmjl-variations.json"));
        assert_eq!(config.ranking.viability_threshold, 0.40);
        assert_eq!(config.recommendation.min_charleston_passes, 3);
    }

    #[test]
    fn test_load_config_from_str_partial_section() {
        let toml = r#"
[ranking]
switch_threshold = 0.25

[recommendation]
critical_pattern_window = 5
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.ranking.switch_threshold, 0.25);
        assert_eq!(config.ranking.max_recommendations, 5);
        assert_eq!(config.recommendation.critical_pattern_window, 5);
        assert_eq!(config.recommendation.contribution_threshold, 0.15);
    }

    #[test]
    fn test_load_config_from_str_wrong_type() {
        let toml = r#"
[ranking]
max_recommendations = "many"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/tilewise.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[repository]
path = "/data/variations-2025.json"

[recommendation]
min_charleston_passes = 2
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(
            config.repository.path,
            PathBuf::from("/data/variations-2025.json")
        );
        assert_eq!(config.recommendation.min_charleston_passes, 2);
        assert_eq!(config.recommendation.min_gameplay_discards, 1);
    }
}
