use rayon::prelude::*;
use tracing::debug;

use super::error::{CalibrationError, CalibrationResult};
use super::types::{CalibrationMetrics, GridPoint, LabeledCase, TemperatureSelection};
use crate::scoring::{Normalization, RatingPolicy, SimilarityScorer};

/// Scores every case with `scorer` and compares against gold ratings.
pub fn evaluate(
    cases: &[&LabeledCase],
    scorer: &SimilarityScorer,
) -> CalibrationResult<CalibrationMetrics> {
    let mut metrics = CalibrationMetrics::default();
    for case in cases {
        let result = scorer.score_similarities(&case.similarities, case.scale_min)?;
        metrics.record(result.rating, case.gold);
    }
    Ok(metrics)
}

pub(crate) fn validate_candidates(candidates: &[f64]) -> CalibrationResult<()> {
    if candidates.is_empty() {
        return Err(CalibrationError::InvalidConfig {
            reason: "candidate temperature list is empty".to_string(),
        });
    }
    if let Some(bad) = candidates.iter().find(|t| !t.is_finite() || **t <= 0.0) {
        return Err(CalibrationError::InvalidConfig {
            reason: format!("candidate temperature must be positive and finite, got {}", bad),
        });
    }
    Ok(())
}

/// Grid search over `candidates`.
///
/// The winner maximizes the exact-match count; ties go to the lower MAE and
/// then to the earlier candidate. Candidates are evaluated in parallel but the
/// grid is reported in input order.
pub fn find_best_temperature(
    cases: &[&LabeledCase],
    candidates: &[f64],
    normalization: Normalization,
    policy: RatingPolicy,
) -> CalibrationResult<TemperatureSelection> {
    validate_candidates(candidates)?;
    if cases.is_empty() {
        return Err(CalibrationError::insufficient(
            "temperature search needs at least one case",
        ));
    }

    let grid = candidates
        .par_iter()
        .map(|&temperature| -> CalibrationResult<GridPoint> {
            let scorer = SimilarityScorer::new(temperature)?
                .with_normalization(normalization)
                .with_policy(policy);
            let metrics = evaluate(cases, &scorer)?;
            Ok(GridPoint {
                temperature,
                metrics,
            })
        })
        .collect::<CalibrationResult<Vec<_>>>()?;

    let mut best = grid[0];
    for point in &grid[1..] {
        if beats(&point.metrics, &best.metrics) {
            best = *point;
        }
    }

    debug!(
        temperature = best.temperature,
        exact = best.metrics.exact,
        mae = best.metrics.mae(),
        cases = cases.len(),
        "Temperature grid searched"
    );

    Ok(TemperatureSelection {
        temperature: best.temperature,
        metrics: best.metrics,
        grid,
    })
}

fn beats(candidate: &CalibrationMetrics, incumbent: &CalibrationMetrics) -> bool {
    candidate.exact > incumbent.exact
        || (candidate.exact == incumbent.exact && candidate.mae() < incumbent.mae())
}
