//! Built-in variation sources.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::types::PatternVariation;
use super::{RepositoryError, VariationSource};

/// Shape of a variation asset on disk: either a bare list of records or an
/// envelope with metadata and a `completeHands` list.
#[derive(Deserialize)]
#[serde(untagged)]
enum VariationAsset {
    Bare(Vec<PatternVariation>),
    Envelope {
        #[serde(rename = "completeHands", alias = "complete_hands")]
        complete_hands: Vec<PatternVariation>,
    },
}

/// Parse a JSON variation asset.
pub fn parse_variations(json: &str) -> Result<Vec<PatternVariation>, RepositoryError> {
    let asset: VariationAsset =
        serde_json::from_str(json).map_err(|e| RepositoryError::ParseError(e.to_string()))?;
    Ok(match asset {
        VariationAsset::Bare(variations) => variations,
        VariationAsset::Envelope { complete_hands } => complete_hands,
    })
}

/// Reads variations from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl VariationSource for JsonFileSource {
    fn name(&self) -> &str {
        "json_file"
    }

    async fn fetch(&self) -> Result<Vec<PatternVariation>, RepositoryError> {
        if !self.path.exists() {
            return Err(RepositoryError::NotFound(self.path.display().to_string()));
        }
        let json = tokio::fs::read_to_string(&self.path).await?;
        parse_variations(&json)
    }
}

/// Serves a fixed, in-memory list of variations.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    variations: Vec<PatternVariation>,
}

impl StaticSource {
    pub fn new(variations: Vec<PatternVariation>) -> Self {
        Self { variations }
    }
}

#[async_trait]
impl VariationSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<Vec<PatternVariation>, RepositoryError> {
        Ok(self.variations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const RECORD: &str = r#"{
        "section": "2025",
        "handKey": "2025-1",
        "handPoints": 25,
        "sequence": 1,
        "tiles": ["flower","flower","flower","flower","2D","white","2D","5D","2B","2B","2B","2C","2C","2C"],
        "jokers": [true,true,true,true,false,false,false,false,true,true,true,true,true,true]
    }"#;

    #[test]
    fn test_parse_bare_list() {
        let json = format!("[{}]", RECORD);
        let variations = parse_variations(&json).unwrap();
        assert_eq!(variations.len(), 1);
        assert_eq!(variations[0].hand_key, "2025-1");
    }

    #[test]
    fn test_parse_envelope() {
        let json = format!(
            r#"{{"metadata": {{"year": 2025, "total_hands": 1}}, "completeHands": [{}]}}"#,
            RECORD
        );
        let variations = parse_variations(&json).unwrap();
        assert_eq!(variations.len(), 1);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_variations("{not json");
        assert!(matches!(result, Err(RepositoryError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_json_file_source() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[{}]", RECORD).unwrap();

        let source = JsonFileSource::new(file.path());
        let variations = source.fetch().await.unwrap();
        assert_eq!(variations.len(), 1);
        assert_eq!(source.name(), "json_file");
    }

    #[tokio::test]
    async fn test_json_file_source_missing() {
        let source = JsonFileSource::new("/nonexistent/variations.json");
        let result = source.fetch().await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticSource::new(parse_variations(&format!("[{}]", RECORD)).unwrap());
        assert_eq!(source.fetch().await.unwrap().len(), 1);
    }
}
