//! Cross-cutting, shared constants.
//!
//! Engine defaults live here so the scorer, the calibrator and the config layer
//! agree on them without importing each other.

/// Softmax temperature used when the caller does not supply one.
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

/// Temperature grid searched by calibration when none is configured.
pub const DEFAULT_CANDIDATE_TEMPERATURES: &[f64] = &[0.05, 0.1, 0.15, 0.2, 0.3, 0.5, 0.75, 1.0];

/// Seed for the bootstrap pseudo-random generator.
pub const DEFAULT_SEED: u64 = 42;

/// Number of bootstrap repeats.
pub const DEFAULT_BOOTSTRAP_ITERATIONS: usize = 1000;

/// Fewest bootstrap repeats for which percentile intervals are reported as-is.
pub const MIN_BOOTSTRAP_ITERATIONS: usize = 100;

/// Share of cases used for training in each bootstrap repeat.
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.7;

/// Max entries in the anchor-embedding cache.
pub const DEFAULT_ANCHOR_CACHE_CAPACITY: u64 = 1024;

/// Percentile bounds of the reported bootstrap interval.
pub const CI_LOWER_PERCENTILE: f64 = 2.5;
pub const CI_UPPER_PERCENTILE: f64 = 97.5;

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    DimensionMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for DimValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDimension => write!(f, "embedding dimension cannot be zero"),
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "dimension mismatch: expected {}, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for DimValidationError {}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// Use this at module boundaries (provider output, cached anchor vectors) so a
/// provider that changes dimensionality mid-session is caught before scoring.
///
/// # Example
///
/// ```
/// use ssr::constants::validate_embedding_dim;
///
/// validate_embedding_dim(384, 384).unwrap();
/// assert!(validate_embedding_dim(0, 0).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if expected == 0 || actual == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
