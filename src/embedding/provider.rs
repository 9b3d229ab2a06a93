use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::EmbeddingError;
use crate::constants::validate_embedding_dim;

/// Whether texts are embedded as stored documents (anchors) or queries (responses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedMode {
    Document,
    Query,
}

/// External embedding service.
///
/// Implementations own batching, retries and backoff; the core only ever sees
/// finished vectors.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds `texts`, returning one vector per text in input order.
    async fn embed(&self, texts: &[String], mode: EmbedMode)
    -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Fixed output dimensionality.
    fn dimension(&self) -> usize;
}

/// Calls `provider` and checks the output count and dimensionality.
pub async fn embed_checked<P>(
    provider: &P,
    texts: &[String],
    mode: EmbedMode,
) -> Result<Vec<Vec<f32>>, EmbeddingError>
where
    P: EmbeddingProvider + ?Sized,
{
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let vectors = provider.embed(texts, mode).await?;
    if vectors.len() != texts.len() {
        return Err(EmbeddingError::CountMismatch {
            expected: texts.len(),
            actual: vectors.len(),
        });
    }

    let expected = provider.dimension();
    for vector in &vectors {
        validate_embedding_dim(vector.len(), expected)?;
    }
    Ok(vectors)
}
