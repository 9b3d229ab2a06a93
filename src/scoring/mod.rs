//! Similarity scoring: response vector + anchor vectors → rating distribution.
//!
//! The pipeline per call is cosine similarity, normalization, temperature
//! softmax, rating reduction and entropy-based confidence. Every step is a pure
//! function of its inputs, so a [`SimilarityScorer`] can be shared freely
//! across threads.
//!
//! # Degenerate inputs
//!
//! - A zero-norm vector has similarity `0` to everything.
//! - A similarity vector with zero range (min-max) or zero deviation (z-score)
//!   produces the uniform distribution.
//!
//! Malformed input (empty anchor set, dimension mismatch, non-finite values,
//! non-positive temperature) is rejected with [`ScoringError::InvalidInput`].

pub mod error;
pub mod scorer;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{ScoringError, ScoringResult};
pub use scorer::{
    SimilarityScorer, cosine_similarity, normalize, normalized_entropy, reduce_rating,
    similarity_vector, softmax,
};
pub use types::{Normalization, RatingPolicy, ScoreResult};
