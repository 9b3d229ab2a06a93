use tracing::info;

use super::bootstrap::{bootstrap, bootstrap_splits, effective_iterations};
use super::error::{CalibrationError, CalibrationResult};
use super::lodo::{group_by_domain, leave_one_domain_out};
use super::search::{evaluate, find_best_temperature, validate_candidates};
use super::types::{
    BootstrapReport, BootstrapSplit, CalibrationMetrics, CalibrationReport, LabeledCase,
    LodoReport, ResolutionDiagnostics, TemperatureSelection,
};
use crate::config::Config;
use crate::constants::{
    DEFAULT_BOOTSTRAP_ITERATIONS, DEFAULT_CANDIDATE_TEMPERATURES, DEFAULT_SEED,
    DEFAULT_TRAIN_FRACTION,
};
use crate::scoring::{Normalization, RatingPolicy, SimilarityScorer};

/// Settings for a calibration run.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationConfig {
    pub candidate_temperatures: Vec<f64>,
    pub normalization: Normalization,
    pub policy: RatingPolicy,
    /// Requested bootstrap repeats (raised to the minimum when smaller).
    pub bootstrap_iterations: usize,
    pub train_fraction: f64,
    pub seed: u64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            candidate_temperatures: DEFAULT_CANDIDATE_TEMPERATURES.to_vec(),
            normalization: Normalization::default(),
            policy: RatingPolicy::default(),
            bootstrap_iterations: DEFAULT_BOOTSTRAP_ITERATIONS,
            train_fraction: DEFAULT_TRAIN_FRACTION,
            seed: DEFAULT_SEED,
        }
    }
}

impl From<&Config> for CalibrationConfig {
    fn from(config: &Config) -> Self {
        Self {
            candidate_temperatures: config.candidate_temperatures.clone(),
            normalization: config.normalization,
            policy: config.rating_policy,
            bootstrap_iterations: config.bootstrap_iterations,
            train_fraction: config.train_fraction,
            seed: config.seed,
        }
    }
}

impl CalibrationConfig {
    pub fn validate(&self) -> CalibrationResult<()> {
        validate_candidates(&self.candidate_temperatures)?;
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(CalibrationError::InvalidConfig {
                reason: format!(
                    "train fraction must be in (0, 1), got {}",
                    self.train_fraction
                ),
            });
        }
        if self.bootstrap_iterations == 0 {
            return Err(CalibrationError::InvalidConfig {
                reason: "bootstrap iterations must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Chooses and validates the scoring temperature on labeled cases.
///
/// Similarity vectors are precomputed; nothing here embeds text. Every entry
/// point checks the cases first and fails with
/// [`CalibrationError::InvalidCase`] or [`CalibrationError::InsufficientData`]
/// instead of producing a degenerate estimate.
#[derive(Debug, Clone)]
pub struct Calibrator {
    config: CalibrationConfig,
}

impl Calibrator {
    pub fn new(config: CalibrationConfig) -> CalibrationResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Metrics for all cases at a fixed temperature.
    pub fn evaluate(
        &self,
        cases: &[LabeledCase],
        temperature: f64,
    ) -> CalibrationResult<CalibrationMetrics> {
        validate_cases(cases)?;
        let scorer = self.scorer(temperature)?;
        evaluate(&cases.iter().collect::<Vec<_>>(), &scorer)
    }

    /// Grid search over the configured candidates using all cases.
    pub fn find_best_temperature(
        &self,
        cases: &[LabeledCase],
    ) -> CalibrationResult<TemperatureSelection> {
        validate_cases(cases)?;
        find_best_temperature(
            &cases.iter().collect::<Vec<_>>(),
            &self.config.candidate_temperatures,
            self.config.normalization,
            self.config.policy,
        )
    }

    pub fn leave_one_domain_out(&self, cases: &[LabeledCase]) -> CalibrationResult<LodoReport> {
        validate_cases(cases)?;
        leave_one_domain_out(
            cases,
            &self.config.candidate_temperatures,
            self.config.normalization,
            self.config.policy,
        )
    }

    /// Train/test index assignments the bootstrap would use for `cases`.
    pub fn bootstrap_splits(
        &self,
        cases: &[LabeledCase],
    ) -> CalibrationResult<Vec<BootstrapSplit>> {
        let classes: Vec<i32> = cases.iter().map(|c| c.gold).collect();
        bootstrap_splits(
            &classes,
            effective_iterations(self.config.bootstrap_iterations),
            self.config.train_fraction,
            self.config.seed,
        )
    }

    pub fn bootstrap(&self, cases: &[LabeledCase]) -> CalibrationResult<BootstrapReport> {
        validate_cases(cases)?;
        bootstrap(
            cases,
            &self.config.candidate_temperatures,
            self.config.normalization,
            self.config.policy,
            self.config.bootstrap_iterations,
            self.config.train_fraction,
            self.config.seed,
        )
    }

    /// Full run: selection on all cases, LODO, bootstrap and resolution diagnostics.
    pub fn calibrate(&self, cases: &[LabeledCase]) -> CalibrationResult<CalibrationReport> {
        validate_cases(cases)?;
        let domains: Vec<String> = group_by_domain(cases)
            .keys()
            .map(|domain| domain.to_string())
            .collect();

        let selection = self.find_best_temperature(cases)?;
        info!(
            temperature = selection.temperature,
            exact_pct = selection.metrics.exact_pct(),
            mae = selection.metrics.mae(),
            cases = cases.len(),
            "Selected temperature on full dataset"
        );

        let lodo = self.leave_one_domain_out(cases)?;
        info!(
            folds = lodo.folds.len(),
            pooled_exact_pct = lodo.pooled.exact_pct(),
            temperature_mean = lodo.temperature_mean,
            temperature_std = lodo.temperature_std,
            "Leave-one-domain-out complete"
        );

        let bootstrap = self.bootstrap(cases)?;
        info!(
            iterations = bootstrap.iterations,
            exact_pct_mean = bootstrap.exact_pct.mean,
            temperature_mean = bootstrap.temperature.mean,
            "Bootstrap complete"
        );

        let resolution =
            ResolutionDiagnostics::from_tiers(cases.iter().filter_map(|c| c.resolution_tier));

        Ok(CalibrationReport {
            cases: cases.len(),
            domains,
            normalization: self.config.normalization,
            policy: self.config.policy,
            selection,
            lodo,
            bootstrap,
            resolution,
        })
    }

    fn scorer(&self, temperature: f64) -> CalibrationResult<SimilarityScorer> {
        Ok(SimilarityScorer::new(temperature)?
            .with_normalization(self.config.normalization)
            .with_policy(self.config.policy))
    }
}

/// Rejects empty datasets and cases the scorer cannot rate.
pub fn validate_cases(cases: &[LabeledCase]) -> CalibrationResult<()> {
    if cases.is_empty() {
        return Err(CalibrationError::insufficient("no labeled cases"));
    }
    for case in cases {
        let invalid = |reason: String| CalibrationError::InvalidCase {
            id: case.id.clone(),
            reason,
        };
        if case.similarities.is_empty() {
            return Err(invalid("similarity vector is empty".to_string()));
        }
        if case.similarities.iter().any(|s| !s.is_finite()) {
            return Err(invalid("similarity vector has non-finite values".to_string()));
        }
        let Some(scale_max) = case.checked_scale_max() else {
            return Err(invalid(format!(
                "scale starting at {} with {} points overflows",
                case.scale_min,
                case.similarities.len()
            )));
        };
        if case.gold < case.scale_min || case.gold > scale_max {
            return Err(invalid(format!(
                "gold rating {} outside scale [{}, {}]",
                case.gold, case.scale_min, scale_max
            )));
        }
    }
    Ok(())
}
