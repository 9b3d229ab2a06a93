use super::*;
use crate::embedding::{EmbeddingError, MockEmbeddingProvider};

fn resolver() -> AnchorResolver {
    AnchorResolver::new()
}

#[test]
fn test_anchor_count_matches_scale_points() {
    let resolver = resolver();
    let label_pairs = [
        None,
        Some(("Strongly disagree", "Strongly agree")),
        Some(("Hate it", "Love it")),
    ];
    let questions = [None, Some("How satisfied are you?"), Some("Tell us more")];

    for min in -3..=3 {
        for span in [1, 2, 4, 6, 8, 10, 20, 100] {
            let max = min + span;
            for labels in label_pairs {
                for question in questions {
                    let mut scale = ScaleDefinition::likert(min, max).unwrap();
                    if let Some((low, high)) = labels {
                        scale = scale.with_labels(low, high);
                    }
                    if let Some(q) = question {
                        scale = scale.with_question(q);
                    }
                    let set = resolver.resolve(&scale);
                    assert_eq!(set.len(), (max - min + 1) as usize);
                    assert_eq!(set.min, min);
                    assert_eq!(set.max, max);
                }
            }
        }
    }
}

#[test]
fn test_resolution_is_idempotent() {
    let resolver = resolver();
    let scales = [
        ScaleDefinition::likert(1, 5).unwrap(),
        ScaleDefinition::likert(1, 9)
            .unwrap()
            .with_labels("Terrible", "Wonderful"),
        ScaleDefinition::recommendation(),
        ScaleDefinition::rating(1, 10)
            .unwrap()
            .with_question("How would you rate the quality of the product?"),
    ];
    for scale in &scales {
        assert_eq!(
            resolver.resolve_with_tier(scale),
            resolver.resolve_with_tier(scale)
        );
    }
}

#[test]
fn test_recommendation_kind_always_uses_fixed_ladder() {
    let store = TemplateStore::new();
    let expected = store.anchors(SemanticFamily::Recommendation, 11).unwrap();

    let scale = ScaleDefinition::recommendation()
        .with_labels("Strongly disagree", "Strongly agree")
        .with_question("How much do you trust this brand?");
    let resolution = resolver().resolve_with_tier(&scale);

    assert_eq!(resolution.tier, ResolutionTier::FixedScale);
    assert_eq!(resolution.anchors.family, SemanticFamily::Recommendation);
    assert_eq!(resolution.anchors.anchors, expected);
    assert_eq!(resolution.anchors.min, 0);
    assert_eq!(resolution.anchors.max, 10);
}

#[test]
fn test_label_match_is_case_and_whitespace_insensitive() {
    let scale = ScaleDefinition::likert(1, 5)
        .unwrap()
        .with_labels("  VERY   Dissatisfied ", "Very satisfied");
    let resolution = resolver().resolve_with_tier(&scale);

    assert_eq!(resolution.tier, ResolutionTier::LabelMatch);
    assert_eq!(resolution.anchors.family, SemanticFamily::Satisfaction);
}

#[test]
fn test_single_known_label_still_matches() {
    let scale = ScaleDefinition::likert(1, 5)
        .unwrap()
        .with_labels("", "Extremely important");
    assert_eq!(scale.low_label(), None);

    let resolution = resolver().resolve_with_tier(&scale);
    assert_eq!(resolution.tier, ResolutionTier::LabelMatch);
    assert_eq!(resolution.anchors.family, SemanticFamily::Importance);
}

#[test]
fn test_text_inference_first_rule_wins() {
    let resolver = resolver();
    let cases = [
        (
            "How satisfied are you with the price?",
            SemanticFamily::Satisfaction,
        ),
        ("How much do you trust our support team?", SemanticFamily::Trust),
        ("Is the product worth what you paid?", SemanticFamily::Value),
        ("How often do you cook at home?", SemanticFamily::Frequency),
        (
            "Please rate your agreement with this statement.",
            SemanticFamily::Agreement,
        ),
    ];
    for (question, family) in cases {
        let scale = ScaleDefinition::likert(1, 5)
            .unwrap()
            .with_question(question);
        let resolution = resolver.resolve_with_tier(&scale);
        assert_eq!(resolution.tier, ResolutionTier::TextInference, "{question}");
        assert_eq!(resolution.anchors.family, family, "{question}");
    }
}

#[test]
fn test_unmatched_labels_interpolate_custom_anchors() {
    let scale = ScaleDefinition::likert(1, 5)
        .unwrap()
        .with_labels("Boring", "Thrilling")
        .with_question("How satisfied are you?");
    let resolution = resolver().resolve_with_tier(&scale);

    assert_eq!(resolution.tier, ResolutionTier::CustomInterpolation);
    assert!(resolution.tier.is_fallback());
    let anchors = &resolution.anchors.anchors;
    assert_eq!(resolution.anchors.family, SemanticFamily::Custom);
    assert!(anchors[0].contains("Boring"));
    assert!(anchors[0].contains("firmly"));
    assert!(anchors[1].contains("Boring"));
    assert!(anchors[2].contains("Boring") && anchors[2].contains("Thrilling"));
    assert!(anchors[3].contains("Thrilling"));
    assert!(anchors[4].contains("Thrilling"));
    assert!(anchors[4].contains("firmly"));
}

#[test]
fn test_custom_interpolation_buckets_by_position() {
    let buckets: Vec<_> = (0..7)
        .map(|i| IntensityBucket::for_position(i, 7))
        .collect();
    assert_eq!(
        buckets,
        vec![
            IntensityBucket::VeryLow,
            IntensityBucket::Low,
            IntensityBucket::Low,
            IntensityBucket::Neutral,
            IntensityBucket::High,
            IntensityBucket::High,
            IntensityBucket::VeryHigh,
        ]
    );
}

#[test]
fn test_default_tier_uses_agreement() {
    let resolution = resolver().resolve_with_tier(&ScaleDefinition::likert(1, 5).unwrap());
    assert_eq!(resolution.tier, ResolutionTier::Default);
    assert_eq!(resolution.anchors.family, SemanticFamily::Agreement);

    let vague = ScaleDefinition::likert(1, 5)
        .unwrap()
        .with_question("Tell us about your weekend.");
    assert_eq!(
        resolver().resolve_with_tier(&vague).tier,
        ResolutionTier::Default
    );
}

#[test]
fn test_authored_seven_point_ladder_is_used_verbatim() {
    let store = TemplateStore::new();
    let template = store.template(SemanticFamily::Agreement).unwrap();
    assert!(template.has_exact(7));

    let anchors = store.anchors(SemanticFamily::Agreement, 7).unwrap();
    assert_eq!(anchors, template.ladders[1].iter().map(|s| s.to_string()).collect::<Vec<_>>());
    assert_eq!(anchors[3], template.canonical()[2]);
}

#[test]
fn test_resampling_uses_nearest_index_projection() {
    let five = [0, 1, 2, 3, 4];
    assert_eq!(resample(&five, 3), vec![0, 2, 4]);
    assert_eq!(resample(&five, 7), vec![0, 1, 1, 2, 3, 3, 4]);
    assert_eq!(resample(&five, 2), vec![0, 4]);
    assert_eq!(resample(&five, 1), vec![2]);

    let seven = [0, 1, 2, 3, 4, 5, 6];
    assert_eq!(resample(&seven, 5), vec![0, 2, 3, 5, 6]);

    let eleven: Vec<usize> = (0..11).collect();
    assert_eq!(resample(&eleven, 5), vec![0, 3, 5, 8, 10]);
}

#[test]
fn test_poles_are_preserved_for_every_family_and_size() {
    let store = TemplateStore::new();
    for template in store.templates() {
        let canonical = template.canonical();
        for points in 2..=15 {
            let anchors = template.anchors_for(points);
            assert_eq!(anchors.len(), points);
            if template.has_exact(points) {
                continue;
            }
            assert_eq!(anchors[0], canonical[0], "{}", template.family);
            assert_eq!(
                anchors[points - 1],
                canonical[canonical.len() - 1],
                "{}",
                template.family
            );
        }
    }
}

#[test]
fn test_catalog_covers_every_templated_family() {
    let store = TemplateStore::new();
    assert_eq!(store.templates().len(), SemanticFamily::TEMPLATED.len());
    for family in SemanticFamily::TEMPLATED {
        let template = store.template(family).unwrap();
        assert!(template.authored_sizes().all(|n| [5, 7, 11].contains(&n)));
    }
    assert!(store.template(SemanticFamily::Custom).is_none());
}

#[test]
fn test_scale_definition_rejects_bad_bounds() {
    assert_eq!(
        ScaleDefinition::likert(5, 5),
        Err(ScaleError::InvalidBounds { min: 5, max: 5 })
    );
    assert_eq!(
        ScaleDefinition::likert(3, 1),
        Err(ScaleError::InvalidBounds { min: 3, max: 1 })
    );
    assert!(matches!(
        ScaleDefinition::likert(1, 500),
        Err(ScaleError::TooManyPoints { points: 500, .. })
    ));
}

#[test]
fn test_scale_definition_deserializes_with_validation() {
    let scale: ScaleDefinition = serde_json::from_str(
        r#"{"kind":"likert","min":1,"max":7,"low_label":"Never","high_label":"Always"}"#,
    )
    .unwrap();
    assert_eq!(scale.points(), 7);
    assert_eq!(scale.high_label(), Some("Always"));

    let nps: ScaleDefinition = serde_json::from_str(r#"{"kind":"recommendation"}"#).unwrap();
    assert_eq!(nps, ScaleDefinition::recommendation());

    assert!(serde_json::from_str::<ScaleDefinition>(r#"{"kind":"recommendation","min":1,"max":5}"#).is_err());
    assert!(serde_json::from_str::<ScaleDefinition>(r#"{"kind":"likert","min":4,"max":2}"#).is_err());
}

#[test]
fn test_anchor_key_fingerprints_only_custom_sets() {
    let resolver = resolver();
    let agreement = resolver.resolve(&ScaleDefinition::likert(1, 5).unwrap());
    assert!(agreement.key().fingerprint.is_none());

    let a = resolver.resolve(
        &ScaleDefinition::likert(1, 5)
            .unwrap()
            .with_labels("Cold", "Hot"),
    );
    let b = resolver.resolve(
        &ScaleDefinition::likert(1, 5)
            .unwrap()
            .with_labels("Quiet", "Loud"),
    );
    assert_eq!(a.family, SemanticFamily::Custom);
    assert_ne!(a.key(), b.key());
    assert_eq!(a.key(), a.clone().key());
}

struct ShoutingTier;

impl TierStrategy for ShoutingTier {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::Extension
    }

    fn resolve(&self, scale: &ScaleDefinition, _store: &TemplateStore) -> Option<AnchorSet> {
        let question = scale.question_text()?;
        if !question.ends_with('!') {
            return None;
        }
        Some(AnchorSet {
            family: SemanticFamily::Custom,
            anchors: (0..scale.points()).map(|i| format!("LEVEL {i}!")).collect(),
            min: scale.min(),
            max: scale.max(),
        })
    }
}

struct WrongSizeTier;

impl TierStrategy for WrongSizeTier {
    fn tier(&self) -> ResolutionTier {
        ResolutionTier::Extension
    }

    fn resolve(&self, scale: &ScaleDefinition, _store: &TemplateStore) -> Option<AnchorSet> {
        Some(AnchorSet {
            family: SemanticFamily::Custom,
            anchors: vec!["only one".to_string()],
            min: scale.min(),
            max: scale.max(),
        })
    }
}

#[test]
fn test_extension_tier_is_additive() {
    let resolver = AnchorResolver::new().insert_tier(1, Box::new(ShoutingTier));
    assert_eq!(resolver.tiers()[1], ResolutionTier::Extension);
    assert_eq!(resolver.tiers().len(), 6);

    let loud = ScaleDefinition::likert(1, 3)
        .unwrap()
        .with_question("Rate us!");
    let resolution = resolver.resolve_with_tier(&loud);
    assert_eq!(resolution.tier, ResolutionTier::Extension);
    assert_eq!(resolution.anchors.anchors[2], "LEVEL 2!");

    let quiet = ScaleDefinition::likert(1, 3)
        .unwrap()
        .with_question("How satisfied are you?");
    assert_eq!(
        resolver.resolve_with_tier(&quiet).tier,
        ResolutionTier::TextInference
    );
}

#[test]
fn test_tier_with_wrong_anchor_count_is_skipped() {
    let resolver = AnchorResolver::new().insert_tier(0, Box::new(WrongSizeTier));
    let resolution = resolver.resolve_with_tier(&ScaleDefinition::likert(1, 5).unwrap());
    assert_eq!(resolution.tier, ResolutionTier::Default);
    assert_eq!(resolution.anchors.len(), 5);
}

#[tokio::test]
async fn test_cache_embeds_each_set_once() {
    let provider = MockEmbeddingProvider::new(16);
    let cache = AnchorEmbeddingCache::new();
    let set = resolver().resolve(&ScaleDefinition::likert(1, 5).unwrap());

    let first = cache.get_or_embed(&set, &provider).await.unwrap();
    let second = cache.get_or_embed(&set, &provider).await.unwrap();

    assert_eq!(provider.calls(), 1);
    assert_eq!(provider.texts_embedded(), 5);
    assert_eq!(first.len(), 5);
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert!(cache.contains(&set));

    cache.run_pending_tasks();
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_cache_separates_custom_sets_of_equal_length() {
    let provider = MockEmbeddingProvider::new(8);
    let cache = AnchorEmbeddingCache::new();
    let resolver = resolver();
    let a = resolver.resolve(&ScaleDefinition::likert(1, 5).unwrap().with_labels("Cold", "Hot"));
    let b = resolver.resolve(&ScaleDefinition::likert(1, 5).unwrap().with_labels("Quiet", "Loud"));

    let va = cache.get_or_embed(&a, &provider).await.unwrap();
    let vb = cache.get_or_embed(&b, &provider).await.unwrap();

    assert_eq!(provider.calls(), 2);
    assert_ne!(va, vb);
}

#[tokio::test]
async fn test_cache_propagates_provider_failure() {
    let provider = MockEmbeddingProvider::new(8);
    provider.fail("quota exceeded");
    let cache = AnchorEmbeddingCache::new();
    let set = resolver().resolve(&ScaleDefinition::likert(1, 5).unwrap());

    let err = cache.get_or_embed(&set, &provider).await.unwrap_err();
    assert!(matches!(err, EmbeddingError::ProviderFailed { .. }));
    assert!(!cache.contains(&set));
}

#[test]
fn test_cache_insert_validates_shape() {
    let cache = AnchorEmbeddingCache::new();
    let set = resolver().resolve(&ScaleDefinition::likert(1, 3).unwrap());

    let err = cache.insert(&set, vec![vec![1.0, 0.0]; 2]).unwrap_err();
    assert!(matches!(
        err,
        EmbeddingError::CountMismatch {
            expected: 3,
            actual: 2
        }
    ));

    let ragged = vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0], vec![0.0, 1.0]];
    assert!(matches!(
        cache.insert(&set, ragged),
        Err(EmbeddingError::Dimension(_))
    ));

    assert!(cache.insert(&set, vec![vec![1.0, 0.0]; 3]).is_ok());
    assert!(cache.get(&set).is_some());
}
