use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::debug;

use super::error::{CalibrationError, CalibrationResult};
use super::search::{evaluate, find_best_temperature};
use super::stats::{mean, std_dev};
use super::types::{CalibrationMetrics, FoldReport, LabeledCase, LodoReport};
use crate::scoring::{Normalization, RatingPolicy, SimilarityScorer};

/// Groups cases by domain, in domain-name order.
pub(crate) fn group_by_domain(cases: &[LabeledCase]) -> BTreeMap<&str, Vec<&LabeledCase>> {
    let mut groups: BTreeMap<&str, Vec<&LabeledCase>> = BTreeMap::new();
    for case in cases {
        groups.entry(case.domain.as_str()).or_default().push(case);
    }
    groups
}

/// Leave-one-domain-out cross-validation.
///
/// Each fold calibrates on every domain except one and scores only the held
/// out domain at that temperature. The held-out domain's labels never reach
/// its own temperature choice.
pub fn leave_one_domain_out(
    cases: &[LabeledCase],
    candidates: &[f64],
    normalization: Normalization,
    policy: RatingPolicy,
) -> CalibrationResult<LodoReport> {
    let groups = group_by_domain(cases);
    if groups.len() < 2 {
        return Err(CalibrationError::insufficient(format!(
            "leave-one-domain-out needs at least two domains, found {}",
            groups.len()
        )));
    }

    let domains: Vec<&str> = groups.keys().copied().collect();
    let folds = domains
        .par_iter()
        .map(|&held_out| -> CalibrationResult<FoldReport> {
            let train: Vec<&LabeledCase> = groups
                .iter()
                .filter(|(domain, _)| **domain != held_out)
                .flat_map(|(_, members)| members.iter().copied())
                .collect();
            let test = &groups[held_out];

            let selection = find_best_temperature(&train, candidates, normalization, policy)?;
            let scorer = SimilarityScorer::new(selection.temperature)?
                .with_normalization(normalization)
                .with_policy(policy);
            let test_metrics = evaluate(test, &scorer)?;

            debug!(
                domain = held_out,
                temperature = selection.temperature,
                train_cases = train.len(),
                test_cases = test.len(),
                test_exact = test_metrics.exact,
                "LODO fold evaluated"
            );

            Ok(FoldReport {
                domain: held_out.to_string(),
                temperature: selection.temperature,
                train_metrics: selection.metrics,
                test_metrics,
            })
        })
        .collect::<CalibrationResult<Vec<_>>>()?;

    let pooled = folds
        .iter()
        .fold(CalibrationMetrics::default(), |acc, fold| {
            acc.merge(fold.test_metrics)
        });
    let temperatures: Vec<f64> = folds.iter().map(|fold| fold.temperature).collect();

    Ok(LodoReport {
        pooled,
        temperature_mean: mean(&temperatures),
        temperature_std: std_dev(&temperatures),
        folds,
    })
}
