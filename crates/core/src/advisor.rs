//! Advisor - runs a hand through facts, ranking, and recommendation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::context::GameContext;
use crate::facts::{FactsEngine, PatternFacts};
use crate::ranking::{RankingEngine, Rankings};
use crate::recommendation::{RecommendationEngine, Recommendations};
use crate::repository::{JsonFileSource, PatternInfo, RepositoryError, VariationRepository};
use crate::tile::TileId;

/// Errors that can occur while advising on a hand.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Variation repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("No patterns loaded")]
    NoPatterns,
}

/// Output of one pass through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorReport {
    pub facts: Vec<PatternFacts>,
    pub rankings: Rankings,
    pub recommendations: Recommendations,
    /// Wall time for the whole pass, including a first repository load.
    pub duration_ms: u64,
}

/// Coordinates the repository and the three engines.
///
/// The repository loads on first use; later calls reuse the catalog.
#[derive(Debug)]
pub struct Advisor {
    repository: Arc<VariationRepository>,
    ranking: RankingEngine,
    recommendation: RecommendationEngine,
    /// Overrides metadata derived from the catalog.
    metadata: Option<Vec<PatternInfo>>,
}

impl Advisor {
    pub fn new(repository: Arc<VariationRepository>) -> Self {
        Self {
            repository,
            ranking: RankingEngine::default(),
            recommendation: RecommendationEngine::default(),
            metadata: None,
        }
    }

    /// Build an advisor reading the configured variation asset.
    pub fn from_config(config: &Config) -> Self {
        let source = JsonFileSource::new(config.repository.path.clone());
        Self::new(Arc::new(VariationRepository::new(Arc::new(source))))
            .with_ranking(RankingEngine::new(config.ranking.clone()))
            .with_recommendation(RecommendationEngine::new(config.recommendation.clone()))
    }

    pub fn with_ranking(mut self, ranking: RankingEngine) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_recommendation(mut self, recommendation: RecommendationEngine) -> Self {
        self.recommendation = recommendation;
        self
    }

    /// Use this metadata instead of deriving it from the catalog, e.g. card
    /// metadata that carries difficulty.
    pub fn with_metadata(mut self, metadata: Vec<PatternInfo>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn repository(&self) -> &VariationRepository {
        &self.repository
    }

    /// Advise on the hand against every loaded pattern.
    pub async fn advise(
        &self,
        hand: &[TileId],
        context: &GameContext,
    ) -> Result<AdvisorReport, AdvisorError> {
        let catalog = self.repository.load().await?;
        if catalog.pattern_keys().is_empty() {
            return Err(AdvisorError::NoPatterns);
        }
        let keys = catalog.pattern_keys().to_vec();
        self.advise_patterns(hand, &keys, context).await
    }

    /// Advise on the hand against the given patterns only.
    pub async fn advise_patterns(
        &self,
        hand: &[TileId],
        pattern_keys: &[String],
        context: &GameContext,
    ) -> Result<AdvisorReport, AdvisorError> {
        let start = Instant::now();
        let catalog = self.repository.load().await?;

        let facts = FactsEngine::new(Arc::clone(&catalog)).analyze_patterns(hand, pattern_keys, context);

        let derived;
        let metadata = match &self.metadata {
            Some(metadata) => metadata.as_slice(),
            None => {
                derived = catalog.pattern_info();
                derived.as_slice()
            }
        };
        let rankings = self.ranking.rank_patterns(&facts, metadata, context);
        debug!(
            patterns = facts.len(),
            viable = rankings.viable_count,
            "Facts and rankings ready"
        );

        let recommendations =
            self.recommendation
                .generate_recommendations(hand, &rankings, context, &facts);

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            hand_size = hand.len(),
            patterns = facts.len(),
            viable = rankings.viable_count,
            primary = %recommendations.optimal_strategy.primary_pattern,
            duration_ms,
            "Advice generated"
        );

        Ok(AdvisorReport {
            facts,
            rankings,
            recommendations,
            duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{StaticSource, VariationCatalog};
    use crate::testing::{fixtures, MockVariationSource};

    fn advisor() -> Advisor {
        let repo = VariationRepository::preloaded(fixtures::sample_catalog());
        Advisor::new(Arc::new(repo)).with_metadata(fixtures::sample_pattern_info())
    }

    #[tokio::test]
    async fn test_advise_runs_every_pattern() {
        let hand = fixtures::sample_hand();
        let report = advisor()
            .advise(&hand, &fixtures::charleston_context(&hand))
            .await
            .unwrap();

        assert_eq!(report.facts.len(), 3);
        assert_eq!(report.rankings.rankings.len(), 3);
        assert!(!report.recommendations.is_analysis_failed());
        assert_eq!(report.recommendations.tiles_covered(), 14);
    }

    #[tokio::test]
    async fn test_advise_patterns_subset() {
        let hand = fixtures::sample_hand();
        let keys = vec![fixtures::WINDS_DRAGONS.to_string()];
        let report = advisor()
            .advise_patterns(&hand, &keys, &fixtures::gameplay_context(&hand, 60))
            .await
            .unwrap();

        assert_eq!(report.facts.len(), 1);
        assert_eq!(
            report.recommendations.optimal_strategy.primary_pattern,
            fixtures::WINDS_DRAGONS
        );
    }

    #[tokio::test]
    async fn test_unknown_patterns_degrade_to_analysis_failed() {
        let hand = fixtures::sample_hand();
        let keys = vec!["NOPE".to_string()];
        let report = advisor()
            .advise_patterns(&hand, &keys, &fixtures::charleston_context(&hand))
            .await
            .unwrap();

        assert!(report.facts.is_empty());
        assert!(report.recommendations.is_analysis_failed());
    }

    #[tokio::test]
    async fn test_empty_catalog_is_no_patterns() {
        let repo = VariationRepository::preloaded(VariationCatalog::new(Vec::new()));
        let result = Advisor::new(Arc::new(repo))
            .advise(&fixtures::sample_hand(), &GameContext::default())
            .await;
        assert!(matches!(result, Err(AdvisorError::NoPatterns)));
    }

    #[tokio::test]
    async fn test_source_failure_surfaces_and_recovers() {
        let source = Arc::new(MockVariationSource::with_variations(
            fixtures::sample_variations(),
        ));
        source.fail_next("offline").await;
        let advisor = Advisor::new(Arc::new(VariationRepository::new(source.clone())));
        let hand = fixtures::sample_hand();
        let context = fixtures::charleston_context(&hand);

        let first = advisor.advise(&hand, &context).await;
        assert!(matches!(
            first,
            Err(AdvisorError::Repository(RepositoryError::SourceUnavailable(_)))
        ));

        assert!(advisor.advise(&hand, &context).await.is_ok());
        assert!(advisor.repository().is_loaded());
    }

    #[tokio::test]
    async fn test_metadata_derived_from_catalog_without_override() {
        let repo = VariationRepository::new(Arc::new(StaticSource::new(
            fixtures::sample_variations(),
        )));
        let advisor = Advisor::new(Arc::new(repo));
        let hand = fixtures::sample_hand();
        let report = advisor
            .advise(&hand, &fixtures::charleston_context(&hand))
            .await
            .unwrap();
        // Winds-dragons is worth 50 points, which alone makes it viable.
        assert!(report
            .rankings
            .get(fixtures::WINDS_DRAGONS)
            .unwrap()
            .is_viable);
    }

    #[test]
    fn test_from_config_is_lazy() {
        let advisor = Advisor::from_config(&Config::default());
        assert!(!advisor.repository().is_loaded());
    }
}
