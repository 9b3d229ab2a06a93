use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

impl ScoringError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ScoringError::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Convenience result type for scoring operations.
pub type ScoringResult<T> = Result<T, ScoringError>;
