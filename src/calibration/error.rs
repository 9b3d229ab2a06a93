use thiserror::Error;

use crate::scoring::ScoringError;

#[derive(Debug, Error)]
pub enum CalibrationError {
    /// Too few cases, domains or split members for a meaningful estimate.
    #[error("insufficient data: {reason}")]
    InsufficientData { reason: String },

    #[error("invalid case '{id}': {reason}")]
    InvalidCase { id: String, reason: String },

    #[error("invalid calibration configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("scoring error: {0}")]
    Scoring(#[from] ScoringError),
}

impl CalibrationError {
    pub(crate) fn insufficient(reason: impl Into<String>) -> Self {
        CalibrationError::InsufficientData {
            reason: reason.into(),
        }
    }
}

/// Convenience result type for calibration operations.
pub type CalibrationResult<T> = Result<T, CalibrationError>;
