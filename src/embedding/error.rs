use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding provider failed: {reason}")]
    ProviderFailed { reason: String },

    #[error("provider returned {actual} vectors for {expected} texts")]
    CountMismatch { expected: usize, actual: usize },

    #[error("embedding dimension error: {0}")]
    Dimension(#[from] crate::constants::DimValidationError),

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },
}
