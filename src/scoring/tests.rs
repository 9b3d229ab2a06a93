use super::error::ScoringError;
use super::scorer::{
    SimilarityScorer, cosine_similarity, normalize, normalized_entropy, reduce_rating,
    similarity_vector, softmax,
};
use super::types::{Normalization, RatingPolicy, ScoreResult};

const TOLERANCE: f64 = 1e-6;

fn assert_is_distribution(dist: &[f64], n: usize) {
    assert_eq!(dist.len(), n);
    assert!(dist.iter().all(|p| *p >= 0.0), "negative mass: {:?}", dist);
    let sum: f64 = dist.iter().sum();
    assert!((sum - 1.0).abs() < TOLERANCE, "sum = {}", sum);
}

#[test]
fn test_cosine_similarity_identical_and_orthogonal() {
    let a = [1.0f32, 0.0, 0.0];
    let b = [0.0f32, 1.0, 0.0];
    assert!((cosine_similarity(&a, &a) - 1.0).abs() < TOLERANCE);
    assert!(cosine_similarity(&a, &b).abs() < TOLERANCE);
    assert!((cosine_similarity(&a, &[-1.0, 0.0, 0.0]) + 1.0).abs() < TOLERANCE);
}

#[test]
fn test_cosine_similarity_zero_norm_is_zero() {
    let zero = [0.0f32; 4];
    let v = [0.3f32, 0.1, 0.9, 0.2];
    assert_eq!(cosine_similarity(&zero, &v), 0.0);
    assert_eq!(cosine_similarity(&v, &zero), 0.0);
}

#[test]
fn test_similarity_vector_rejects_empty_anchor_set() {
    let err = similarity_vector(&[1.0, 0.0], &[]).unwrap_err();
    assert!(matches!(err, ScoringError::InvalidInput { .. }));
}

#[test]
fn test_similarity_vector_rejects_dimension_mismatch() {
    let anchors = vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]];
    let err = similarity_vector(&[1.0, 0.0], &anchors).unwrap_err();
    match err {
        ScoringError::InvalidInput { reason } => assert!(reason.contains("anchor 1")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_similarity_vector_rejects_zero_dimension_response() {
    let err = similarity_vector(&[], &[vec![]]).unwrap_err();
    assert!(matches!(err, ScoringError::InvalidInput { .. }));
}

#[test]
fn test_scorer_rejects_bad_temperature() {
    assert!(SimilarityScorer::new(0.0).is_err());
    assert!(SimilarityScorer::new(-0.5).is_err());
    assert!(SimilarityScorer::new(f64::NAN).is_err());
    assert!(SimilarityScorer::new(f64::INFINITY).is_err());
    assert!(SimilarityScorer::new(0.2).is_ok());
}

#[test]
fn test_scorer_rejects_non_finite_similarity() {
    let scorer = SimilarityScorer::default();
    let err = scorer
        .score_similarities(&[0.1, f64::NAN, 0.3], 1)
        .unwrap_err();
    assert!(matches!(err, ScoringError::InvalidInput { .. }));
}

#[test]
fn test_min_max_normalization_values() {
    let normalized = normalize(&[0.60, 0.65, 0.70, 0.75, 0.90], Normalization::MinMax).unwrap();
    let expected = [0.0, 1.0 / 6.0, 1.0 / 3.0, 0.5, 1.0];
    for (got, want) in normalized.iter().zip(expected.iter()) {
        assert!((got - want).abs() < TOLERANCE, "{normalized:?}");
    }
}

#[test]
fn test_z_score_normalization_has_zero_mean_unit_variance() {
    let normalized = normalize(&[0.2, 0.4, 0.6, 0.8], Normalization::ZScore).unwrap();
    let mean: f64 = normalized.iter().sum::<f64>() / 4.0;
    let var: f64 = normalized.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 4.0;
    assert!(mean.abs() < TOLERANCE);
    assert!((var - 1.0).abs() < TOLERANCE);
}

#[test]
fn test_flat_vector_normalizes_to_none() {
    let flat = [0.7; 5];
    assert!(normalize(&flat, Normalization::MinMax).is_none());
    assert!(normalize(&flat, Normalization::ZScore).is_none());
    assert_eq!(normalize(&flat, Normalization::None).unwrap(), flat.to_vec());
}

#[test]
fn test_strongly_positive_response_rates_five() {
    let scorer = SimilarityScorer::new(0.2)
        .unwrap()
        .with_normalization(Normalization::MinMax);
    let result = scorer
        .score_similarities(&[0.60, 0.65, 0.70, 0.75, 0.90], 1)
        .unwrap();

    assert_is_distribution(&result.distribution, 5);
    assert_eq!(result.rating, 5);
    assert_eq!(result.peak_index(), 4);
    assert!(result.distribution[4] > 0.85, "{:?}", result.distribution);
    // Entropy-based confidence for this vector is ~0.69.
    assert!(result.confidence > 0.65, "confidence = {}", result.confidence);
    assert!(result.confidence < 0.75, "confidence = {}", result.confidence);
}

#[test]
fn test_equal_similarities_give_uniform_distribution() {
    for normalization in Normalization::ALL {
        for temperature in [0.01, 0.2, 5.0] {
            let scorer = SimilarityScorer::new(temperature)
                .unwrap()
                .with_normalization(normalization);
            let result = scorer.score_similarities(&[0.7; 5], 1).unwrap();

            for p in &result.distribution {
                assert!((p - 0.2).abs() < TOLERANCE);
            }
            assert_eq!(result.rating, 3);
            assert!(result.confidence.abs() < TOLERANCE);
        }
    }
}

#[test]
fn test_distribution_invariants_hold_across_modes() {
    let inputs: [&[f64]; 4] = [
        &[0.1],
        &[0.3, -0.2],
        &[0.81, 0.82, 0.815, 0.83, 0.80, 0.79, 0.84],
        &[-1.0, 0.0, 1.0, 0.5, 0.25, -0.5, 0.75, 0.1, 0.2, 0.3, 0.4],
    ];
    for sims in inputs {
        for normalization in Normalization::ALL {
            for temperature in [1e-4, 0.05, 0.2, 1.0, 100.0] {
                let scorer = SimilarityScorer::new(temperature)
                    .unwrap()
                    .with_normalization(normalization);
                let result = scorer.score_similarities(sims, 0).unwrap();
                assert_is_distribution(&result.distribution, sims.len());
                assert!((0..sims.len() as i32).contains(&result.rating));
                assert!((0.0..=1.0).contains(&result.confidence));
            }
        }
    }
}

#[test]
fn test_single_anchor_is_certain() {
    let result = SimilarityScorer::default()
        .score_similarities(&[0.4], 3)
        .unwrap();
    assert_eq!(result.distribution, vec![1.0]);
    assert_eq!(result.rating, 3);
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn test_raising_one_similarity_never_lowers_its_mass() {
    let base = [0.61, 0.66, 0.64, 0.70, 0.68];
    for normalization in [Normalization::None, Normalization::MinMax] {
        let scorer = SimilarityScorer::new(0.2)
            .unwrap()
            .with_normalization(normalization);
        for idx in 0..base.len() {
            let before = scorer.score_similarities(&base, 1).unwrap();
            for bump in [0.001, 0.01, 0.05, 0.2] {
                let mut raised = base;
                raised[idx] += bump;
                let after = scorer.score_similarities(&raised, 1).unwrap();
                assert!(
                    after.distribution[idx] + 1e-12 >= before.distribution[idx],
                    "mode={normalization} idx={idx} bump={bump}"
                );
            }
        }
    }
}

#[test]
fn test_high_temperature_approaches_uniform() {
    let sims = [0.1, 0.4, 0.9, 0.3, 0.2];
    let dist = softmax(&normalize(&sims, Normalization::MinMax).unwrap(), 1e6);
    for p in dist {
        assert!((p - 0.2).abs() < 1e-4);
    }
}

#[test]
fn test_low_temperature_approaches_one_hot() {
    let sims = [0.1, 0.4, 0.9, 0.3, 0.2];
    let dist = softmax(&normalize(&sims, Normalization::MinMax).unwrap(), 1e-6);
    assert_eq!(dist, vec![0.0, 0.0, 1.0, 0.0, 0.0]);

    let scorer = SimilarityScorer::new(1e-9).unwrap();
    let result = scorer.score_similarities(&sims, 1).unwrap();
    assert_eq!(result.rating, 3);
    assert!((result.confidence - 1.0).abs() < TOLERANCE);
}

#[test]
fn test_low_temperature_ties_go_to_lowest_index() {
    let sims = [0.9, 0.1, 0.9, 0.2, 0.3];
    let result = SimilarityScorer::new(1e-9)
        .unwrap()
        .score_similarities(&sims, 1)
        .unwrap();
    assert_eq!(result.distribution, vec![1.0, 0.0, 0.0, 0.0, 0.0]);
    assert_eq!(result.rating, 1);
    assert!((result.confidence - 1.0).abs() < TOLERANCE);

    // Ties only collapse once the other entries vanish.
    let warm = SimilarityScorer::new(1.0)
        .unwrap()
        .score_similarities(&sims, 1)
        .unwrap();
    assert!((warm.distribution[0] - warm.distribution[2]).abs() < TOLERANCE);
    assert!(warm.distribution[0] < 1.0);

    // Fully flat raw similarities stay uniform at any temperature.
    let flat = SimilarityScorer::new(1e-9)
        .unwrap()
        .with_normalization(Normalization::None)
        .score_similarities(&[0.7; 5], 1)
        .unwrap();
    assert_eq!(flat.distribution, vec![0.2; 5]);
    assert_eq!(flat.rating, 3);
}

#[test]
fn test_lower_temperature_sharpens_distribution() {
    let sims = [0.60, 0.65, 0.70, 0.75, 0.90];
    let sharp = SimilarityScorer::new(0.05)
        .unwrap()
        .score_similarities(&sims, 1)
        .unwrap();
    let flat = SimilarityScorer::new(1.0)
        .unwrap()
        .score_similarities(&sims, 1)
        .unwrap();
    assert!(sharp.confidence > flat.confidence);
    assert!(sharp.distribution[4] > flat.distribution[4]);
}

#[test]
fn test_expected_value_rating_is_clamped() {
    // Over-weighted distributions (not produced by the scorer) still clamp.
    assert_eq!(
        reduce_rating(&[0.0, 0.0, 0.0, 0.0, 1.2], 1, RatingPolicy::ExpectedValue),
        5
    );
    assert_eq!(
        reduce_rating(&[-0.2, 0.0, 0.0, 0.0, 0.0], 1, RatingPolicy::ExpectedValue),
        1
    );
    assert_eq!(
        reduce_rating(&[0.0, 0.0, 0.0, 0.0, 1.0 + 1e-12], 1, RatingPolicy::ExpectedValue),
        5
    );
}

#[test]
fn test_expected_value_rounds_half_boundary_within_scale() {
    assert_eq!(
        reduce_rating(&[0.0, 0.0, 0.0, 0.5, 0.5], 1, RatingPolicy::ExpectedValue),
        5
    );
    assert_eq!(
        reduce_rating(&[0.5, 0.5, 0.0, 0.0, 0.0], 1, RatingPolicy::ExpectedValue),
        2
    );
}

#[test]
fn test_expected_value_and_argmax_diverge_on_bimodal_distribution() {
    let bimodal = [0.45, 0.0, 0.0, 0.0, 0.55];
    assert_eq!(reduce_rating(&bimodal, 1, RatingPolicy::ExpectedValue), 3);
    assert_eq!(reduce_rating(&bimodal, 1, RatingPolicy::Argmax), 5);
}

#[test]
fn test_argmax_breaks_ties_by_lowest_index() {
    assert_eq!(
        reduce_rating(&[0.1, 0.4, 0.1, 0.4, 0.0], 0, RatingPolicy::Argmax),
        1
    );
}

#[test]
fn test_normalized_entropy_bounds() {
    assert_eq!(normalized_entropy(&[0.0, 1.0, 0.0]), 0.0);
    assert!((normalized_entropy(&[0.25; 4]) - 1.0).abs() < TOLERANCE);
    assert_eq!(normalized_entropy(&[1.0]), 0.0);
}

#[test]
fn test_score_with_vectors_matches_precomputed_similarities() {
    let response = vec![0.9f32, 0.1, 0.0];
    let anchors = vec![
        vec![0.0f32, 1.0, 0.0],
        vec![0.5f32, 0.5, 0.0],
        vec![1.0f32, 0.0, 0.0],
    ];
    let scorer = SimilarityScorer::default();
    let from_vectors = scorer.score(&response, &anchors, 1).unwrap();
    let sims = similarity_vector(&response, &anchors).unwrap();
    let from_sims = scorer.score_similarities(&sims, 1).unwrap();
    assert_eq!(from_vectors, from_sims);
    assert_eq!(from_vectors.rating, 3);
}

#[test]
fn test_zero_response_vector_falls_back_to_uniform() {
    let anchors = vec![vec![1.0f32, 0.0], vec![0.0f32, 1.0], vec![0.7f32, 0.7]];
    let result = SimilarityScorer::default()
        .score(&[0.0, 0.0], &anchors, 1)
        .unwrap();
    for p in &result.distribution {
        assert!((p - 1.0 / 3.0).abs() < TOLERANCE);
    }
    assert_eq!(result.rating, 2);
}

#[test]
fn test_score_result_helpers() {
    let result = ScoreResult {
        rating: 4,
        distribution: vec![0.0, 0.1, 0.2, 0.7],
        confidence: 0.5,
    };
    assert_eq!(result.len(), 4);
    assert!(!result.is_empty());
    assert_eq!(result.peak_index(), 3);
    assert!((result.expected_value(1) - 3.6).abs() < TOLERANCE);
}

#[test]
fn test_parse_modes() {
    assert_eq!("min-max".parse::<Normalization>().unwrap(), Normalization::MinMax);
    assert_eq!("Z-Score".parse::<Normalization>().unwrap(), Normalization::ZScore);
    assert_eq!("none".parse::<Normalization>().unwrap(), Normalization::None);
    assert!("softplus".parse::<Normalization>().is_err());

    assert_eq!(
        "expected-value".parse::<RatingPolicy>().unwrap(),
        RatingPolicy::ExpectedValue
    );
    assert_eq!("argmax".parse::<RatingPolicy>().unwrap(), RatingPolicy::Argmax);
    assert!("median".parse::<RatingPolicy>().is_err());
}

#[test]
fn test_display_round_trips_through_from_str() {
    for normalization in Normalization::ALL {
        assert_eq!(
            normalization.to_string().parse::<Normalization>().unwrap(),
            normalization
        );
    }
}
