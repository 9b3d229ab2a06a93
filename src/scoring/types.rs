use serde::{Deserialize, Serialize};

use super::error::ScoringError;

/// How raw cosine similarities are rescaled before the softmax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// Raw cosine values.
    None,
    /// Rescale so the smallest similarity is `0` and the largest is `1`.
    #[default]
    MinMax,
    /// Subtract the mean, divide by the population standard deviation.
    ZScore,
}

impl Normalization {
    pub const ALL: [Normalization; 3] = [
        Normalization::None,
        Normalization::MinMax,
        Normalization::ZScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Normalization::None => "none",
            Normalization::MinMax => "min-max",
            Normalization::ZScore => "z-score",
        }
    }
}

impl std::fmt::Display for Normalization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Normalization {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "raw" => Ok(Normalization::None),
            "min-max" | "minmax" | "min_max" => Ok(Normalization::MinMax),
            "z-score" | "zscore" | "z_score" => Ok(Normalization::ZScore),
            other => Err(ScoringError::UnknownVariant {
                kind: "normalization",
                value: other.to_string(),
            }),
        }
    }
}

/// How a probability distribution is reduced to a single scale point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatingPolicy {
    /// `round(Σ p[i] * (min + i))`, clamped to the scale.
    #[default]
    ExpectedValue,
    /// Most probable point; ties go to the lowest index.
    Argmax,
}

impl RatingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingPolicy::ExpectedValue => "expected-value",
            RatingPolicy::Argmax => "argmax",
        }
    }
}

impl std::fmt::Display for RatingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RatingPolicy {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expected-value" | "expected_value" | "expected" | "mean" => {
                Ok(RatingPolicy::ExpectedValue)
            }
            "argmax" | "mode" => Ok(RatingPolicy::Argmax),
            other => Err(ScoringError::UnknownVariant {
                kind: "rating policy",
                value: other.to_string(),
            }),
        }
    }
}

/// Outcome of one scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Point rating in `[min, max]`.
    pub rating: i32,
    /// Probability per scale point, ordered low → high.
    pub distribution: Vec<f64>,
    /// `1 - normalized entropy` of the distribution, in `[0, 1]`.
    pub confidence: f64,
}

impl ScoreResult {
    /// Number of scale points.
    pub fn len(&self) -> usize {
        self.distribution.len()
    }

    /// Returns `true` if the distribution is empty (never for a scorer output).
    pub fn is_empty(&self) -> bool {
        self.distribution.is_empty()
    }

    /// Unrounded expected value of the distribution for a scale starting at `min`.
    pub fn expected_value(&self, min: i32) -> f64 {
        self.distribution
            .iter()
            .enumerate()
            .map(|(i, p)| p * (min as f64 + i as f64))
            .sum()
    }

    /// Index of the most probable point (lowest index on ties).
    pub fn peak_index(&self) -> usize {
        argmax_index(&self.distribution)
    }
}

pub(crate) fn argmax_index(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
