//! Embedding provider contract.
//!
//! The scoring core never computes embeddings itself; callers plug in an
//! [`EmbeddingProvider`]. [`StubEmbedder`] produces deterministic vectors for
//! tests and dry runs.

mod error;
/// Provider trait and embedding mode.
pub mod provider;
/// Deterministic stub provider.
pub mod stub;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingProvider;
pub use provider::{EmbedMode, EmbeddingProvider, embed_checked};
pub use stub::{DEFAULT_STUB_DIM, StubEmbedder};
