use thiserror::Error;

/// Errors raised when constructing a [`ScaleDefinition`](super::ScaleDefinition).
///
/// Resolution itself never fails; only malformed scale bounds are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaleError {
    #[error("invalid scale bounds: max ({max}) must be greater than min ({min})")]
    InvalidBounds { min: i32, max: i32 },

    #[error("scale has {points} points; at most {limit} are supported")]
    TooManyPoints { points: i64, limit: usize },

    #[error("recommendation scales are fixed at 0-10, got {min}-{max}")]
    FixedScaleMismatch { min: i32, max: i32 },
}
