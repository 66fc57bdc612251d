//! Variation repository.
//!
//! Holds every enumerated variation of every scoring pattern together with
//! indexes by pattern key and by section. The repository is constructed
//! with a [`VariationSource`] and loads from it exactly once; concurrent
//! callers that arrive before the first load finishes await that same load.
//!
//! Queries never fail. Unknown keys, and any query issued before a
//! successful load, return empty results.

mod catalog;
mod sources;
mod types;

pub use catalog::VariationCatalog;
pub use sources::{parse_variations, JsonFileSource, StaticSource};
pub use types::{Difficulty, PatternInfo, PatternVariation, VariationFilter, VariationStatistics};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::generator::GeneratorError;

/// Errors that can occur while loading variations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Variation asset not found: {0}")]
    NotFound(String),

    #[error("Variation source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Failed to parse variation asset: {0}")]
    ParseError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Variation generation failed: {0}")]
    Generation(#[from] GeneratorError),
}

/// Supplier of raw variation records.
#[async_trait]
pub trait VariationSource: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &str;

    /// Fetch every variation record.
    async fn fetch(&self) -> Result<Vec<PatternVariation>, RepositoryError>;
}

/// Load-once, read-only store of pattern variations.
pub struct VariationRepository {
    source: Arc<dyn VariationSource>,
    catalog: OnceCell<Arc<VariationCatalog>>,
}

impl std::fmt::Debug for VariationRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariationRepository")
            .field("source", &self.source.name())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl VariationRepository {
    /// Create an unloaded repository backed by the given source.
    pub fn new(source: Arc<dyn VariationSource>) -> Self {
        Self {
            source,
            catalog: OnceCell::new(),
        }
    }

    /// Create a repository that is already loaded with the given catalog.
    pub fn preloaded(catalog: VariationCatalog) -> Self {
        Self {
            source: Arc::new(StaticSource::default()),
            catalog: OnceCell::new_with(Some(Arc::new(catalog))),
        }
    }

    /// Load the catalog from the source, once.
    ///
    /// Callers that arrive while a load is in flight wait for it and share
    /// its result. A failed load leaves the repository unloaded, so the
    /// next call tries again.
    pub async fn load(&self) -> Result<Arc<VariationCatalog>, RepositoryError> {
        let catalog = self
            .catalog
            .get_or_try_init(|| async {
                let start = Instant::now();
                info!(source = self.source.name(), "Loading pattern variations");

                let records = self.source.fetch().await?;
                let catalog = VariationCatalog::new(records);
                let stats = catalog.statistics();

                info!(
                    source = self.source.name(),
                    variations = stats.total_variations,
                    patterns = stats.unique_patterns,
                    skipped = stats.skipped_records,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Pattern variations loaded"
                );
                Ok::<_, RepositoryError>(Arc::new(catalog))
            })
            .await?;

        Ok(Arc::clone(catalog))
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.initialized()
    }

    /// The loaded catalog, if any.
    pub fn catalog(&self) -> Option<Arc<VariationCatalog>> {
        self.catalog.get().cloned()
    }

    pub fn variations_for_pattern(&self, key: &str) -> Vec<&PatternVariation> {
        match self.catalog.get() {
            Some(catalog) => catalog.variations_for_pattern(key),
            None => {
                debug!(key, "Variation query before load");
                Vec::new()
            }
        }
    }

    pub fn variations_for_section(&self, section: &str) -> Vec<&PatternVariation> {
        self.catalog
            .get()
            .map(|catalog| catalog.variations_for_section(section))
            .unwrap_or_default()
    }

    pub fn all_variations(&self) -> &[PatternVariation] {
        self.catalog
            .get()
            .map(|catalog| catalog.all_variations())
            .unwrap_or(&[])
    }

    pub fn filter(&self, criteria: &VariationFilter) -> Vec<&PatternVariation> {
        self.catalog
            .get()
            .map(|catalog| catalog.filter(criteria))
            .unwrap_or_default()
    }

    /// Statistics of the loaded catalog, or empty statistics before load.
    pub fn statistics(&self) -> VariationStatistics {
        self.catalog
            .get()
            .map(|catalog| catalog.statistics().clone())
            .unwrap_or_default()
    }
}
