//! Scale definitions and anchor resolution.
//!
//! A [`ScaleDefinition`] is turned into an [`AnchorSet`] (one natural-language
//! statement per scale point) by [`AnchorResolver`], which walks an ordered list
//! of tiers:
//!
//! 1. fixed-scale override (recommendation kind → 11-point ladder)
//! 2. pole-label match against the label table
//! 3. keyword inference from the question text (only without a label pair)
//! 4. custom interpolation between unmatched pole labels
//! 5. default agreement family
//!
//! Resolution never fails. Sizes that differ from a family's authored ladders
//! are served by nearest-index resampling, which is coarse for sizes far from
//! the authored ones.
//!
//! [`AnchorEmbeddingCache`] memoizes embedded anchor vectors per set.

pub mod cache;
pub mod error;
pub mod resolver;
pub mod templates;
pub mod types;

#[cfg(test)]
mod tests;

pub use cache::{AnchorEmbeddingCache, AnchorVectors};
pub use error::ScaleError;
pub use resolver::{
    AnchorResolver, CustomInterpolationTier, DefaultTier, FixedScaleTier, IntensityBucket,
    LabelMatchTier, TextInferenceTier, TierStrategy,
};
pub use templates::{AnchorTemplate, TemplateStore, project_index, resample};
pub use types::{
    AnchorKey, AnchorSet, MAX_SCALE_POINTS, RECOMMENDATION_MAX, RECOMMENDATION_MIN, Resolution,
    ResolutionTier, ScaleDefinition, ScaleKind, SemanticFamily,
};
