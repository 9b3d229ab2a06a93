//! Anchor-embedding cache.
//!
//! Anchor statements are embedded once per process and reused for every
//! response scored against the same set. Entries are populated lazily and
//! never invalidated; two tasks racing to populate the same key both compute
//! identical vectors, so last-writer-wins is harmless.

use std::sync::Arc;

use moka::sync::Cache;
use tracing::debug;

use super::types::{AnchorKey, AnchorSet};
use crate::constants::{DEFAULT_ANCHOR_CACHE_CAPACITY, validate_embedding_dim};
use crate::embedding::{EmbedMode, EmbeddingError, EmbeddingProvider, embed_checked};

/// Shared anchor vectors for one anchor set, in anchor order.
pub type AnchorVectors = Arc<Vec<Vec<f32>>>;

/// Memoization table from anchor-set key to embedded anchors.
pub struct AnchorEmbeddingCache {
    entries: Cache<AnchorKey, AnchorVectors>,
}

impl AnchorEmbeddingCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ANCHOR_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Cached vectors for `set`, if present.
    pub fn get(&self, set: &AnchorSet) -> Option<AnchorVectors> {
        self.entries.get(&set.key())
    }

    /// Stores vectors for `set` after checking count and dimensionality.
    pub fn insert(
        &self,
        set: &AnchorSet,
        vectors: Vec<Vec<f32>>,
    ) -> Result<AnchorVectors, EmbeddingError> {
        if vectors.len() != set.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: set.len(),
                actual: vectors.len(),
            });
        }
        let dim = vectors.first().map(Vec::len).unwrap_or(0);
        for vector in &vectors {
            validate_embedding_dim(vector.len(), dim)?;
        }

        let vectors = Arc::new(vectors);
        self.entries.insert(set.key(), Arc::clone(&vectors));
        Ok(vectors)
    }

    /// Returns cached vectors, embedding the anchors on a miss.
    pub async fn get_or_embed<P>(
        &self,
        set: &AnchorSet,
        provider: &P,
    ) -> Result<AnchorVectors, EmbeddingError>
    where
        P: EmbeddingProvider + ?Sized,
    {
        if let Some(vectors) = self.get(set) {
            return Ok(vectors);
        }

        debug!(
            family = %set.family,
            points = set.len(),
            "Anchor cache miss, embedding anchors"
        );
        let vectors = embed_checked(provider, &set.anchors, EmbedMode::Document).await?;
        self.insert(set, vectors)
    }

    /// Returns `true` if vectors for `set` are cached.
    pub fn contains(&self, set: &AnchorSet) -> bool {
        self.entries.contains_key(&set.key())
    }

    /// Number of cached anchor sets.
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    /// Runs pending maintenance so `len` reflects recent inserts.
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }
}

impl Default for AnchorEmbeddingCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AnchorEmbeddingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnchorEmbeddingCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
