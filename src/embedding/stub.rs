use async_trait::async_trait;
use tracing::debug;

use super::error::EmbeddingError;
use super::provider::{EmbedMode, EmbeddingProvider};

/// Default stub embedding dimension.
pub const DEFAULT_STUB_DIM: usize = 384;

/// Deterministic embedder: each text maps to a fixed pseudo-random unit vector.
///
/// Identical texts always embed identically; the vectors carry no semantics.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dim: usize,
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_STUB_DIM,
        }
    }
}

impl StubEmbedder {
    pub fn new(dim: usize) -> Result<Self, EmbeddingError> {
        if dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "stub dimension must be non-zero".to_string(),
            });
        }
        Ok(Self { dim })
    }

    /// Embeds a single text synchronously.
    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let hash = blake3::hash(text.as_bytes());
        let mut state = u64::from_le_bytes(
            hash.as_bytes()[0..8]
                .try_into()
                .unwrap_or([0u8; 8]),
        );

        let mut embedding = Vec::with_capacity(self.dim);
        for _ in 0..self.dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }
        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(
        &self,
        texts: &[String],
        mode: EmbedMode,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        debug!(count = texts.len(), ?mode, "Generating stub embeddings");
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dim
    }
}
