use tracing::trace;

use crate::constants::DEFAULT_TEMPERATURE;

use super::error::{ScoringError, ScoringResult};
use super::types::{Normalization, RatingPolicy, ScoreResult, argmax_index};

/// Spread below which a similarity vector is treated as flat.
const FLAT_EPSILON: f64 = 1e-12;

/// Converts anchor similarities into a rating distribution.
///
/// Holds only the tunable parameters; every call is independent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScorer {
    temperature: f64,
    normalization: Normalization,
    policy: RatingPolicy,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            normalization: Normalization::default(),
            policy: RatingPolicy::default(),
        }
    }
}

impl SimilarityScorer {
    /// Creates a scorer with the given temperature and default normalization/policy.
    pub fn new(temperature: f64) -> ScoringResult<Self> {
        validate_temperature(temperature)?;
        Ok(Self {
            temperature,
            ..Default::default()
        })
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn with_policy(mut self, policy: RatingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns a copy with a different temperature.
    pub fn with_temperature(self, temperature: f64) -> ScoringResult<Self> {
        validate_temperature(temperature)?;
        Ok(Self {
            temperature,
            ..self
        })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    pub fn policy(&self) -> RatingPolicy {
        self.policy
    }

    /// Scores a response vector against anchor vectors for a scale starting at `min`.
    ///
    /// Anchor `i` corresponds to scale point `min + i`.
    pub fn score(
        &self,
        response: &[f32],
        anchors: &[Vec<f32>],
        min: i32,
    ) -> ScoringResult<ScoreResult> {
        let similarities = similarity_vector(response, anchors)?;
        self.score_similarities(&similarities, min)
    }

    /// Scores a precomputed similarity vector (one entry per anchor).
    pub fn score_similarities(&self, similarities: &[f64], min: i32) -> ScoringResult<ScoreResult> {
        if similarities.is_empty() {
            return Err(ScoringError::invalid("anchor set is empty"));
        }
        if let Some(i) = similarities.iter().position(|s| !s.is_finite()) {
            return Err(ScoringError::invalid(format!(
                "similarity at index {} is not finite",
                i
            )));
        }

        let distribution = match normalize(similarities, self.normalization) {
            Some(normalized) => softmax(&normalized, self.temperature),
            None => uniform(similarities.len()),
        };

        let rating = reduce_rating(&distribution, min, self.policy);
        let confidence = (1.0 - normalized_entropy(&distribution)).clamp(0.0, 1.0);

        trace!(
            rating,
            confidence,
            points = distribution.len(),
            temperature = self.temperature,
            normalization = %self.normalization,
            "Scored similarity vector"
        );

        Ok(ScoreResult {
            rating,
            distribution,
            confidence,
        })
    }
}

fn validate_temperature(temperature: f64) -> ScoringResult<()> {
    if !(temperature.is_finite() && temperature > 0.0) {
        return Err(ScoringError::invalid(format!(
            "temperature must be positive and finite, got {}",
            temperature
        )));
    }
    Ok(())
}

/// Cosine similarity; `0` when either vector has zero norm or lengths differ.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b.iter())
            .fold((0.0f64, 0.0f64, 0.0f64), |(dot, na, nb), (av, bv)| {
                let av = *av as f64;
                let bv = *bv as f64;
                (dot + av * bv, na + av * av, nb + bv * bv)
            });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Cosine similarity of `response` to each anchor, validating dimensions.
pub fn similarity_vector(response: &[f32], anchors: &[Vec<f32>]) -> ScoringResult<Vec<f64>> {
    if anchors.is_empty() {
        return Err(ScoringError::invalid("anchor set is empty"));
    }
    if response.is_empty() {
        return Err(ScoringError::invalid("response vector has zero dimensions"));
    }
    if response.iter().any(|x| !x.is_finite()) {
        return Err(ScoringError::invalid("response vector has non-finite values"));
    }

    anchors
        .iter()
        .enumerate()
        .map(|(i, anchor)| {
            if anchor.len() != response.len() {
                return Err(ScoringError::invalid(format!(
                    "anchor {} has dimension {}, response has {}",
                    i,
                    anchor.len(),
                    response.len()
                )));
            }
            if anchor.iter().any(|x| !x.is_finite()) {
                return Err(ScoringError::invalid(format!(
                    "anchor {} has non-finite values",
                    i
                )));
            }
            Ok(cosine_similarity(response, anchor))
        })
        .collect()
}

/// Applies a normalization mode; `None` when the vector is flat and the
/// caller should fall back to the uniform distribution.
pub fn normalize(similarities: &[f64], mode: Normalization) -> Option<Vec<f64>> {
    if similarities.is_empty() {
        return None;
    }

    match mode {
        Normalization::None => Some(similarities.to_vec()),
        Normalization::MinMax => {
            let min = similarities.iter().copied().fold(f64::INFINITY, f64::min);
            let max = similarities
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max);
            let range = max - min;
            if range < FLAT_EPSILON {
                return None;
            }
            Some(similarities.iter().map(|s| (s - min) / range).collect())
        }
        Normalization::ZScore => {
            let n = similarities.len() as f64;
            let mean = similarities.iter().sum::<f64>() / n;
            let variance = similarities
                .iter()
                .map(|s| (s - mean).powi(2))
                .sum::<f64>()
                / n;
            let std = variance.sqrt();
            if std < FLAT_EPSILON {
                return None;
            }
            Some(similarities.iter().map(|s| (s - mean) / std).collect())
        }
    }
}

/// Temperature-scaled softmax with max-shift for numerical stability.
///
/// The shift is applied before dividing by the temperature, so very small
/// temperatures drive non-maximal entries to exactly `0` instead of overflowing.
/// Once that happens, tied maxima collapse onto the lowest tied index; a fully
/// flat input stays uniform.
pub fn softmax(values: &[f64], temperature: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = values
        .iter()
        .map(|v| ((v - max) / temperature).exp())
        .collect();
    let sum: f64 = exps.iter().sum();

    let peaks = exps.iter().filter(|e| **e == 1.0).count();
    let collapsed = peaks > 1
        && peaks < exps.len()
        && exps.iter().all(|e| *e == 1.0 || *e == 0.0);

    if collapsed || !(sum.is_finite() && sum > 0.0) {
        let mut one_hot = vec![0.0; values.len()];
        one_hot[argmax_index(values)] = 1.0;
        return one_hot;
    }

    exps.into_iter().map(|e| e / sum).collect()
}

/// Shannon entropy divided by `log2(N)`; `0` for a single-point distribution.
pub fn normalized_entropy(distribution: &[f64]) -> f64 {
    if distribution.len() <= 1 {
        return 0.0;
    }

    let entropy: f64 = distribution
        .iter()
        .filter(|p| **p > 0.0)
        .map(|p| -p * p.log2())
        .sum();

    entropy / (distribution.len() as f64).log2()
}

/// Reduces a distribution over `[min, min + N - 1]` to one point.
pub fn reduce_rating(distribution: &[f64], min: i32, policy: RatingPolicy) -> i32 {
    if distribution.is_empty() {
        return min;
    }
    let max = min.saturating_add(distribution.len() as i32 - 1);

    let rating = match policy {
        RatingPolicy::ExpectedValue => {
            let expected: f64 = distribution
                .iter()
                .enumerate()
                .map(|(i, p)| p * (min as f64 + i as f64))
                .sum();
            expected.round() as i32
        }
        RatingPolicy::Argmax => min.saturating_add(argmax_index(distribution) as i32),
    };

    rating.clamp(min, max)
}

fn uniform(n: usize) -> Vec<f64> {
    vec![1.0 / n as f64; n]
}
