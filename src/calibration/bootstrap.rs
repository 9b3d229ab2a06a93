use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use tracing::warn;

use super::error::{CalibrationError, CalibrationResult};
use super::search::{evaluate, find_best_temperature};
use super::stats::MetricSummary;
use super::types::{BootstrapReport, BootstrapSample, BootstrapSplit, LabeledCase};
use crate::constants::MIN_BOOTSTRAP_ITERATIONS;
use crate::scoring::{Normalization, RatingPolicy, SimilarityScorer};

/// Repeats actually run for a requested count.
pub fn effective_iterations(requested: usize) -> usize {
    if requested < MIN_BOOTSTRAP_ITERATIONS {
        warn!(
            requested,
            used = MIN_BOOTSTRAP_ITERATIONS,
            "Bootstrap repeat count too small for stable percentile intervals, raising"
        );
        return MIN_BOOTSTRAP_ITERATIONS;
    }
    requested
}

/// Number of training cases for `n` cases, keeping both sides non-empty.
pub(crate) fn train_size(n: usize, train_fraction: f64) -> usize {
    let raw = (n as f64 * train_fraction).round() as usize;
    raw.clamp(1, n - 1)
}

/// Shuffled train/test assignments for `iterations` repeats.
///
/// `classes[i]` is the gold rating of case `i`. Every train split holds at
/// least one case of each gold rating present: after the shuffle, the first
/// case of each rating goes to train, the remaining train slots are filled in
/// shuffled order and the rest is test. Each repeat draws its own seed from a
/// master generator seeded with `seed`, so the assignments depend only on
/// `(classes, iterations, train_fraction, seed)`.
pub fn bootstrap_splits(
    classes: &[i32],
    iterations: usize,
    train_fraction: f64,
    seed: u64,
) -> CalibrationResult<Vec<BootstrapSplit>> {
    let n = classes.len();
    if n < 2 {
        return Err(CalibrationError::insufficient(format!(
            "bootstrap needs at least two cases to split, found {}",
            n
        )));
    }
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(CalibrationError::InvalidConfig {
            reason: format!("train fraction must be in (0, 1), got {}", train_fraction),
        });
    }

    let train_len = train_size(n, train_fraction);
    let levels = classes.iter().collect::<BTreeSet<_>>().len();
    if levels > train_len {
        return Err(CalibrationError::insufficient(format!(
            "train split of {} cases cannot cover {} gold ratings",
            train_len, levels
        )));
    }

    let mut master = StdRng::seed_from_u64(seed);
    let seeds: Vec<u64> = (0..iterations).map(|_| master.next_u64()).collect();

    Ok(seeds
        .into_iter()
        .map(|repeat_seed| {
            let mut rng = StdRng::seed_from_u64(repeat_seed);
            let mut order: Vec<usize> = (0..n).collect();
            order.shuffle(&mut rng);

            let mut seen = BTreeSet::new();
            let (mut train, mut rest): (Vec<usize>, Vec<usize>) =
                order.into_iter().partition(|&i| seen.insert(classes[i]));
            let test = rest.split_off(train_len - train.len());
            train.extend(rest);
            BootstrapSplit { train, test }
        })
        .collect())
}

/// Runs the bootstrap: calibrate on each train split, evaluate on its test split.
pub fn bootstrap(
    cases: &[LabeledCase],
    candidates: &[f64],
    normalization: Normalization,
    policy: RatingPolicy,
    requested_iterations: usize,
    train_fraction: f64,
    seed: u64,
) -> CalibrationResult<BootstrapReport> {
    let iterations = effective_iterations(requested_iterations);
    let classes: Vec<i32> = cases.iter().map(|c| c.gold).collect();
    let splits = bootstrap_splits(&classes, iterations, train_fraction, seed)?;

    let samples = splits
        .par_iter()
        .map(|split| -> CalibrationResult<BootstrapSample> {
            let train: Vec<&LabeledCase> = split.train.iter().map(|&i| &cases[i]).collect();
            let test: Vec<&LabeledCase> = split.test.iter().map(|&i| &cases[i]).collect();
            let selection = find_best_temperature(&train, candidates, normalization, policy)?;
            let scorer = SimilarityScorer::new(selection.temperature)?
                .with_normalization(normalization)
                .with_policy(policy);
            Ok(BootstrapSample {
                temperature: selection.temperature,
                test_metrics: evaluate(&test, &scorer)?,
            })
        })
        .collect::<CalibrationResult<Vec<_>>>()?;

    let column = |f: fn(&BootstrapSample) -> f64| -> Vec<f64> { samples.iter().map(f).collect() };

    Ok(BootstrapReport {
        iterations,
        requested_iterations,
        seed,
        train_fraction,
        exact_pct: MetricSummary::from_values(&column(|s| s.test_metrics.exact_pct())),
        within_one_pct: MetricSummary::from_values(&column(|s| s.test_metrics.within_one_pct())),
        mae: MetricSummary::from_values(&column(|s| s.test_metrics.mae())),
        temperature: MetricSummary::from_values(&column(|s| s.temperature)),
    })
}
