//! Mock variation source for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::repository::{PatternVariation, RepositoryError, VariationSource};

/// Mock implementation of the VariationSource trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable variation records
/// - Count fetches to assert load-once behavior
/// - Simulate failures and slow sources
///
/// # Example
///
/// ```rust,ignore
/// use tilewise_core::testing::{fixtures, MockVariationSource};
///
/// let source = Arc::new(MockVariationSource::with_variations(fixtures::sample_variations()));
/// source.fail_next("asset server offline").await;
///
/// let repo = VariationRepository::new(source.clone());
/// assert!(repo.load().await.is_err());
/// assert!(repo.load().await.is_ok());
/// assert_eq!(source.fetch_count(), 2);
/// ```
pub struct MockVariationSource {
    /// Records returned by each successful fetch.
    variations: Arc<RwLock<Vec<PatternVariation>>>,
    /// If set, the next fetch fails with this message.
    next_error: Arc<RwLock<Option<String>>>,
    /// Simulated fetch latency.
    delay: Option<Duration>,
    fetches: Arc<AtomicUsize>,
}

impl std::fmt::Debug for MockVariationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockVariationSource")
            .field("variations", &"<variations>")
            .field("next_error", &"<next_error>")
            .field("delay", &self.delay)
            .field("fetches", &self.fetch_count())
            .finish()
    }
}

impl Default for MockVariationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockVariationSource {
    /// Create a source that returns no records.
    pub fn new() -> Self {
        Self::with_variations(Vec::new())
    }

    pub fn with_variations(variations: Vec<PatternVariation>) -> Self {
        Self {
            variations: Arc::new(RwLock::new(variations)),
            next_error: Arc::new(RwLock::new(None)),
            delay: None,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sleep this long inside every fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub async fn set_variations(&self, variations: Vec<PatternVariation>) {
        *self.variations.write().await = variations;
    }

    /// Make the next fetch fail as unavailable.
    pub async fn fail_next(&self, message: &str) {
        *self.next_error.write().await = Some(message.to_string());
    }

    /// Number of fetches started so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VariationSource for MockVariationSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self) -> Result<Vec<PatternVariation>, RepositoryError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.next_error.write().await.take() {
            return Err(RepositoryError::SourceUnavailable(message));
        }

        Ok(self.variations.read().await.clone())
    }
}
