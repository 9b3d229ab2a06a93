//! Temperature calibration on labeled cases.
//!
//! Works purely on precomputed similarity vectors:
//!
//! - [`find_best_temperature`]: grid search maximizing exact matches, ties
//!   broken by mean absolute error
//! - [`leave_one_domain_out`]: per-domain hold-out with pooled test metrics
//! - [`bootstrap`]: seeded shuffle/split repeats with percentile intervals
//!
//! [`Calibrator`] bundles these behind a [`CalibrationConfig`] and produces a
//! serializable [`CalibrationReport`]. Grid cells, folds and repeats run on the
//! rayon pool; results are collected in a fixed order so reports do not depend
//! on scheduling.

pub mod bootstrap;
pub mod calibrator;
pub mod error;
pub mod lodo;
pub mod search;
pub mod stats;
pub mod types;


pub use bootstrap::{bootstrap, bootstrap_splits, effective_iterations};
pub use calibrator::{CalibrationConfig, Calibrator, validate_cases};
pub use error::{CalibrationError, CalibrationResult};
pub use lodo::leave_one_domain_out;
pub use search::{evaluate, find_best_temperature};
pub use stats::{MetricSummary, mean, median, percentile_sorted, std_dev};
pub use types::{
    BootstrapReport, BootstrapSample, BootstrapSplit, CalibrationMetrics, CalibrationReport,
    FoldReport, GridPoint, LabeledCase, LodoReport, ResolutionDiagnostics, TemperatureSelection,
};
