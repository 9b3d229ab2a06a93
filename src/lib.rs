//! Anchor-based semantic similarity rating (used by `ssr-calibrate` and integration tests).
//!
//! Free-text survey responses are rated by comparing their embedding with the
//! embeddings of one natural-language anchor statement per scale point.
//!
//! # Public API Surface
//!
//! ## Anchors
//! - [`ScaleDefinition`], [`AnchorSet`], [`SemanticFamily`] - Scale and anchor types
//! - [`AnchorResolver`], [`TierStrategy`], [`TemplateStore`] - Ordered-tier resolution
//! - [`AnchorEmbeddingCache`] - Per-set memoization of anchor vectors
//!
//! ## Scoring
//! - [`SimilarityScorer`], [`ScoreResult`] - Similarities → distribution, rating, confidence
//! - [`Normalization`], [`RatingPolicy`] - Scorer options
//!
//! ## Embedding & Pipeline
//! - [`EmbeddingProvider`], [`EmbedMode`] - Consumed embedding contract
//! - [`StubEmbedder`] - Deterministic provider for dry runs
//! - [`RatingPipeline`], [`RatedResponse`] - Resolve, embed and score in one call
//!
//! ## Calibration & Analysis
//! - [`Calibrator`], [`CalibrationConfig`], [`CalibrationReport`] - Temperature
//!   search, leave-one-domain-out and bootstrap validation
//! - [`RaterComparison`], [`ComparisonReport`] - Paired rater statistics
//!
//! ## Configuration
//! - [`Config`], [`ConfigError`] - `SSR_*` environment configuration
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod analysis;
pub mod anchors;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod embedding;
pub mod pipeline;
pub mod scoring;

pub use analysis::{ComparisonReport, PairedCase, RaterComparison};
pub use anchors::{
    AnchorEmbeddingCache, AnchorResolver, AnchorSet, Resolution, ResolutionTier, ScaleDefinition,
    ScaleError, ScaleKind, SemanticFamily, TemplateStore, TierStrategy,
};
pub use calibration::{
    BootstrapReport, CalibrationConfig, CalibrationError, CalibrationMetrics, CalibrationReport,
    CalibrationResult, Calibrator, LabeledCase, LodoReport, MetricSummary, ResolutionDiagnostics,
    TemperatureSelection,
};
pub use config::{Config, ConfigError};
pub use constants::{DimValidationError, validate_embedding_dim};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbeddingProvider;
pub use embedding::{EmbedMode, EmbeddingError, EmbeddingProvider, StubEmbedder};
pub use pipeline::{PipelineError, PipelineResult, RatedResponse, RatingPipeline};
pub use scoring::{
    Normalization, RatingPolicy, ScoreResult, ScoringError, ScoringResult, SimilarityScorer,
};
