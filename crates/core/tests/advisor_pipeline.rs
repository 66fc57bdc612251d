//! Advisor pipeline integration tests.
//!
//! These tests run a dealt hand end to end through every engine:
//! - Card definitions and JSON assets as variation sources
//! - Charleston and gameplay recommendations
//! - Configuration flowing into the engines
//! - Load-once behavior under concurrent callers

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tempfile::NamedTempFile;

use tilewise_core::{
    load_config_from_str,
    recommendation::ExposureAction,
    testing::{fixtures, MockVariationSource},
    ActionKind, Advisor, CardSource, Config, GameContext, RepositoryConfig, TileId,
    VariationRepository,
};

/// Advisor over the sample card, with card metadata.
fn card_advisor() -> Advisor {
    let source = CardSource::new(fixtures::sample_definitions());
    let metadata = source.pattern_info();
    let repository = VariationRepository::new(Arc::new(source));
    Advisor::new(Arc::new(repository)).with_metadata(metadata)
}

/// Write the sample variations to a temp file, optionally in an envelope.
fn variation_asset(envelope: bool) -> NamedTempFile {
    let variations = serde_json::to_value(fixtures::sample_variations()).unwrap();
    let json = if envelope {
        serde_json::json!({
            "metadata": { "year": 2025 },
            "completeHands": variations,
        })
    } else {
        variations
    };
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", json).unwrap();
    file
}

#[tokio::test]
async fn test_charleston_hand_end_to_end() {
    let hand = fixtures::sample_hand();
    let report = card_advisor()
        .advise(&hand, &GameContext::charleston(&hand))
        .await
        .unwrap();

    assert_eq!(report.facts.len(), 3);
    assert_eq!(report.rankings.rankings.len(), 3);
    assert!(report.rankings.viable_count >= 1);

    let recommendations = &report.recommendations;
    assert_eq!(recommendations.tile_actions.len(), 12);
    assert_eq!(recommendations.tiles_covered(), 14);
    assert!(recommendations.pass().len() >= 3);
    assert!(recommendations.discard().is_empty());
    assert!(!recommendations.strategic_advice.is_empty());

    let joker = recommendations
        .tile_actions
        .iter()
        .find(|a| a.tile_id.is_joker())
        .unwrap();
    assert_eq!(joker.action, ActionKind::Keep);
    assert_eq!(joker.contextual_actions.exposure, ExposureAction::Never);
}

#[tokio::test]
async fn test_gameplay_hand_end_to_end() {
    let hand = fixtures::sample_hand();
    let context = GameContext::gameplay(&hand, 48)
        .with_discards(vec![TileId::from("north"), TileId::from("north")])
        .with_exposed(
            "east",
            ["3D", "3D", "3D", "4D", "4D", "4D"]
                .iter()
                .map(|t| TileId::from(*t))
                .collect(),
        );
    let report = card_advisor().advise(&hand, &context).await.unwrap();
    let recommendations = &report.recommendations;

    assert!(recommendations.discard().len() >= 1);
    assert!(recommendations.pass().is_empty());
    assert_eq!(recommendations.opponent_analysis.len(), 1);
    // 5D borders the exposed 3D-4D run.
    assert!(recommendations
        .safety
        .risky_tiles
        .contains(&TileId::from("5D")));
}

#[tokio::test]
async fn test_json_asset_from_config() {
    for envelope in [false, true] {
        let asset = variation_asset(envelope);
        let config = Config {
            repository: RepositoryConfig {
                path: asset.path().to_path_buf(),
            },
            ..Default::default()
        };
        let advisor = Advisor::from_config(&config);
        let hand = fixtures::sample_hand();
        let report = advisor
            .advise(&hand, &GameContext::charleston(&hand))
            .await
            .unwrap();

        assert_eq!(report.facts.len(), 3);
        assert_eq!(advisor.repository().statistics().total_variations, 13);
    }
}

#[tokio::test]
async fn test_missing_asset_is_repository_error() {
    let config = load_config_from_str(
        r#"
[repository]
path = "/nonexistent/variations.json"
"#,
    )
    .unwrap();
    let hand = fixtures::sample_hand();
    let result = Advisor::from_config(&config)
        .advise(&hand, &GameContext::charleston(&hand))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_configured_pass_minimum() {
    let config = load_config_from_str(
        r#"
[recommendation]
min_charleston_passes = 5
"#,
    )
    .unwrap();
    let source = CardSource::new(fixtures::sample_definitions());
    let advisor = Advisor::new(Arc::new(VariationRepository::new(Arc::new(source))))
        .with_recommendation(tilewise_core::RecommendationEngine::new(
            config.recommendation.clone(),
        ));
    let hand = fixtures::sample_hand();
    let report = advisor
        .advise(&hand, &GameContext::charleston(&hand))
        .await
        .unwrap();
    assert!(report.recommendations.pass().len() >= 5);
}

#[tokio::test]
async fn test_concurrent_advice_loads_once() {
    let source = Arc::new(
        MockVariationSource::with_variations(fixtures::sample_variations())
            .with_delay(Duration::from_millis(20)),
    );
    let advisor = Arc::new(Advisor::new(Arc::new(VariationRepository::new(
        source.clone(),
    ))));
    let hand = fixtures::sample_hand();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let advisor = Arc::clone(&advisor);
            let hand = hand.clone();
            tokio::spawn(async move {
                advisor
                    .advise(&hand, &GameContext::charleston(&hand))
                    .await
                    .map(|report| report.recommendations.tile_actions.len())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 12);
    }
    assert_eq!(source.fetch_count(), 1);
}

#[test]
fn test_advice_is_deterministic() {
    let hand = fixtures::sample_hand();
    let context = GameContext::charleston(&hand);
    let advisor = card_advisor();

    let first = tokio_test::block_on(advisor.advise(&hand, &context)).unwrap();
    let second = tokio_test::block_on(advisor.advise(&hand, &context)).unwrap();
    assert_eq!(first.rankings, second.rankings);
    assert_eq!(first.recommendations, second.recommendations);
}
