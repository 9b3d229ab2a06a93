use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::stats::MetricSummary;
use crate::anchors::ResolutionTier;
use crate::scoring::{Normalization, RatingPolicy};

fn default_scale_min() -> i32 {
    1
}

/// A response with a gold rating and its precomputed anchor similarities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledCase {
    #[serde(default)]
    pub id: String,
    /// Semantic grouping used for leave-one-domain-out folds.
    pub domain: String,
    /// Gold rating on the case's scale.
    pub gold: i32,
    /// Scale value of anchor 0.
    #[serde(default = "default_scale_min")]
    pub scale_min: i32,
    /// Cosine similarity to each anchor, low pole first.
    pub similarities: Vec<f64>,
    /// Tier that resolved the case's anchors, if known.
    #[serde(default)]
    pub resolution_tier: Option<ResolutionTier>,
}

impl LabeledCase {
    pub fn new(
        id: impl Into<String>,
        domain: impl Into<String>,
        gold: i32,
        similarities: Vec<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            domain: domain.into(),
            gold,
            scale_min: default_scale_min(),
            similarities,
            resolution_tier: None,
        }
    }

    pub fn with_scale_min(mut self, scale_min: i32) -> Self {
        self.scale_min = scale_min;
        self
    }

    pub fn with_resolution_tier(mut self, tier: ResolutionTier) -> Self {
        self.resolution_tier = Some(tier);
        self
    }

    /// Scale value of the last anchor; `None` when it does not fit in `i32`.
    pub fn checked_scale_max(&self) -> Option<i32> {
        let points = i32::try_from(self.similarities.len()).ok()?;
        self.scale_min.checked_add(points - 1)
    }

    /// Scale value of the last anchor, saturating at `i32::MAX`.
    pub fn scale_max(&self) -> i32 {
        self.checked_scale_max().unwrap_or(i32::MAX)
    }
}

/// Accuracy of predicted ratings against gold ratings.
///
/// Counts are kept alongside the rates so metrics from disjoint case sets can
/// be pooled exactly with [`CalibrationMetrics::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CalibrationMetrics {
    pub cases: usize,
    pub exact: usize,
    pub within_one: usize,
    pub absolute_error_sum: f64,
}

impl CalibrationMetrics {
    /// Builds metrics from `(predicted, gold)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (i32, i32)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::default(), |mut acc, (predicted, gold)| {
                acc.record(predicted, gold);
                acc
            })
    }

    pub fn record(&mut self, predicted: i32, gold: i32) {
        let diff = (predicted - gold).abs();
        self.cases += 1;
        if diff == 0 {
            self.exact += 1;
        }
        if diff <= 1 {
            self.within_one += 1;
        }
        self.absolute_error_sum += diff as f64;
    }

    /// Pools two disjoint metric sets.
    pub fn merge(self, other: Self) -> Self {
        Self {
            cases: self.cases + other.cases,
            exact: self.exact + other.exact,
            within_one: self.within_one + other.within_one,
            absolute_error_sum: self.absolute_error_sum + other.absolute_error_sum,
        }
    }

    /// Exact-match rate in percent.
    pub fn exact_pct(&self) -> f64 {
        pct(self.exact, self.cases)
    }

    /// Within-one-point rate in percent.
    pub fn within_one_pct(&self) -> f64 {
        pct(self.within_one, self.cases)
    }

    /// Mean absolute error.
    pub fn mae(&self) -> f64 {
        if self.cases == 0 {
            return 0.0;
        }
        self.absolute_error_sum / self.cases as f64
    }
}

fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 * 100.0 / total as f64
}

impl std::fmt::Display for CalibrationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "exact {:.1}% | within-one {:.1}% | MAE {:.3} (n={})",
            self.exact_pct(),
            self.within_one_pct(),
            self.mae(),
            self.cases
        )
    }
}

/// Metrics for one candidate temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub temperature: f64,
    pub metrics: CalibrationMetrics,
}

/// Winner of a temperature search plus the full grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSelection {
    pub temperature: f64,
    pub metrics: CalibrationMetrics,
    pub grid: Vec<GridPoint>,
}

/// One held-out domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldReport {
    pub domain: String,
    /// Temperature calibrated on the other domains.
    pub temperature: f64,
    pub train_metrics: CalibrationMetrics,
    pub test_metrics: CalibrationMetrics,
}

/// Leave-one-domain-out cross-validation outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LodoReport {
    pub folds: Vec<FoldReport>,
    /// Test metrics pooled over the union of held-out domains.
    pub pooled: CalibrationMetrics,
    pub temperature_mean: f64,
    pub temperature_std: f64,
}

/// Case indices of one bootstrap repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Outcome of one bootstrap repeat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapSample {
    pub temperature: f64,
    pub test_metrics: CalibrationMetrics,
}

/// Distribution of metrics over bootstrap repeats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapReport {
    /// Repeats actually run.
    pub iterations: usize,
    /// Repeats requested by the caller.
    pub requested_iterations: usize,
    pub seed: u64,
    pub train_fraction: f64,
    pub exact_pct: MetricSummary,
    pub within_one_pct: MetricSummary,
    pub mae: MetricSummary,
    pub temperature: MetricSummary,
}

/// How often each anchor-resolution tier produced the cases' anchors.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolutionDiagnostics {
    /// Cases with a known tier.
    pub resolved: usize,
    pub by_tier: BTreeMap<ResolutionTier, usize>,
    /// Cases resolved through custom interpolation or the default family.
    pub fallback: usize,
}

impl ResolutionDiagnostics {
    pub fn from_tiers(tiers: impl IntoIterator<Item = ResolutionTier>) -> Self {
        let mut diagnostics = Self::default();
        for tier in tiers {
            diagnostics.record(tier);
        }
        diagnostics
    }

    pub fn record(&mut self, tier: ResolutionTier) {
        self.resolved += 1;
        *self.by_tier.entry(tier).or_insert(0) += 1;
        if tier.is_fallback() {
            self.fallback += 1;
        }
    }

    /// Share of resolved cases that went through a fallback tier, in `[0, 1]`.
    pub fn fallback_rate(&self) -> f64 {
        if self.resolved == 0 {
            return 0.0;
        }
        self.fallback as f64 / self.resolved as f64
    }
}

/// Full calibration outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub cases: usize,
    pub domains: Vec<String>,
    pub normalization: Normalization,
    pub policy: RatingPolicy,
    /// Search over all cases.
    pub selection: TemperatureSelection,
    pub lodo: LodoReport,
    pub bootstrap: BootstrapReport,
    pub resolution: ResolutionDiagnostics,
}

impl std::fmt::Display for CalibrationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "cases: {} across {} domains ({} / {})",
            self.cases,
            self.domains.len(),
            self.normalization,
            self.policy
        )?;
        writeln!(
            f,
            "selected temperature: {} ({})",
            self.selection.temperature, self.selection.metrics
        )?;
        writeln!(
            f,
            "LODO pooled: {} | temperature {:.3} ± {:.3}",
            self.lodo.pooled, self.lodo.temperature_mean, self.lodo.temperature_std
        )?;
        for fold in &self.lodo.folds {
            writeln!(
                f,
                "  held out {:<16} T={:<6} {}",
                fold.domain, fold.temperature, fold.test_metrics
            )?;
        }
        writeln!(
            f,
            "bootstrap (R={}): exact% {} | within-one% {} | MAE {} | T {}",
            self.bootstrap.iterations,
            self.bootstrap.exact_pct,
            self.bootstrap.within_one_pct,
            self.bootstrap.mae,
            self.bootstrap.temperature
        )?;
        write!(
            f,
            "fallback resolution rate: {:.1}% of {} resolved cases",
            self.resolution.fallback_rate() * 100.0,
            self.resolution.resolved
        )
    }
}
