//! End-to-end rating: scale → anchors → vectors → score.
//!
//! [`RatingPipeline`] owns the resolver, the anchor-embedding cache and the
//! scorer. The embedding provider is the only suspension point; anchors are
//! embedded once per anchor set in [`EmbedMode::Document`] and responses on
//! every call in [`EmbedMode::Query`].
//!
//! [`EmbedMode::Document`]: crate::embedding::EmbedMode::Document
//! [`EmbedMode::Query`]: crate::embedding::EmbedMode::Query

pub mod error;
pub mod rater;
pub mod types;


pub use error::{PipelineError, PipelineResult};
pub use rater::RatingPipeline;
pub use types::RatedResponse;
