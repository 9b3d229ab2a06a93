use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::error::EmbeddingError;
use super::provider::{EmbedMode, EmbeddingProvider};
use super::stub::StubEmbedder;

/// Provider with an explicit text → vector table and call accounting.
///
/// Texts missing from the table fall back to [`StubEmbedder`] vectors.
#[derive(Clone)]
pub struct MockEmbeddingProvider {
    vectors: Arc<RwLock<HashMap<String, Vec<f32>>>>,
    fallback: StubEmbedder,
    dim: usize,
    calls: Arc<AtomicUsize>,
    texts_embedded: Arc<AtomicUsize>,
    modes: Arc<RwLock<Vec<EmbedMode>>>,
    fail_with: Arc<RwLock<Option<String>>>,
}

impl MockEmbeddingProvider {
    pub fn new(dim: usize) -> Self {
        Self {
            vectors: Arc::default(),
            fallback: StubEmbedder::new(dim.max(1)).unwrap_or_default(),
            dim,
            calls: Arc::default(),
            texts_embedded: Arc::default(),
            modes: Arc::default(),
            fail_with: Arc::default(),
        }
    }

    /// Registers the vector returned for `text`.
    pub fn insert(&self, text: impl Into<String>, vector: Vec<f32>) {
        self.vectors.write().insert(text.into(), vector);
    }

    /// Makes every subsequent call fail with `reason`.
    pub fn fail(&self, reason: impl Into<String>) {
        *self.fail_with.write() = Some(reason.into());
    }

    /// Number of `embed` calls made.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Total texts embedded across all calls.
    pub fn texts_embedded(&self) -> usize {
        self.texts_embedded.load(Ordering::SeqCst)
    }

    /// Mode of every call, in call order.
    pub fn modes(&self) -> Vec<EmbedMode> {
        self.modes.read().clone()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(
        &self,
        texts: &[String],
        mode: EmbedMode,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.modes.write().push(mode);
        if let Some(reason) = self.fail_with.read().clone() {
            return Err(EmbeddingError::ProviderFailed { reason });
        }
        self.texts_embedded.fetch_add(texts.len(), Ordering::SeqCst);

        let table = self.vectors.read();
        Ok(texts
            .iter()
            .map(|t| {
                table
                    .get(t)
                    .cloned()
                    .unwrap_or_else(|| self.fallback.embed_one(t))
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}
