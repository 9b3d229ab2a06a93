use std::collections::BTreeMap;

use tracing::info;

use super::hypothesis::{
    holm_bonferroni, kruskal_wallis, levene_median, mcnemar, wilcoxon_signed_rank,
};
use super::types::{
    ComparisonReport, DomainComparison, KruskalWallisTest, PairedCase, PersonaDivergence,
    RaterAccuracy, Spread, TargetLevelError,
};
use crate::calibration::{CalibrationError, CalibrationResult, mean, median, std_dev};

/// Family-wise significance level for the adjusted tests.
pub const DEFAULT_ALPHA: f64 = 0.05;

fn spread(values: &[f64]) -> Spread {
    Spread {
        mean: mean(values),
        std: std_dev(values),
        median: median(values),
    }
}

fn pct(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 * 100.0 / total as f64
}

fn accuracy(ratings: &[i32], errors: &[i32]) -> RaterAccuracy {
    let ratings: Vec<f64> = ratings.iter().map(|r| *r as f64).collect();
    let signed: Vec<f64> = errors.iter().map(|e| *e as f64).collect();
    let absolute: Vec<f64> = signed.iter().map(|e| e.abs()).collect();
    RaterAccuracy {
        mean_rating: mean(&ratings),
        error: spread(&signed),
        exact_pct: pct(errors.iter().filter(|e| **e == 0).count(), errors.len()),
        within_one_pct: pct(errors.iter().filter(|e| e.abs() <= 1).count(), errors.len()),
        mae: mean(&absolute),
    }
}

/// Paired comparison of two raters scoring the same texts.
///
/// Runs a Wilcoxon signed-rank test on `primary - secondary`, a McNemar test
/// on per-case exact matches and a median-centred Levene test on the two
/// raters' signed errors, then adjusts the three with Holm-Bonferroni.
/// A Kruskal-Wallis test of |divergence| across personas is reported
/// unadjusted, alongside breakdowns by domain, persona and target level.
#[derive(Debug, Clone, Copy)]
pub struct RaterComparison {
    alpha: f64,
}

impl Default for RaterComparison {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl RaterComparison {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn compare(&self, cases: &[PairedCase]) -> CalibrationResult<ComparisonReport> {
        if cases.is_empty() {
            return Err(CalibrationError::insufficient(
                "rater comparison needs at least one paired case",
            ));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(CalibrationError::InvalidConfig {
                reason: format!("alpha must be in (0, 1), got {}", self.alpha),
            });
        }

        let divergences: Vec<f64> = cases.iter().map(|c| c.divergence() as f64).collect();
        let primary_ratings: Vec<i32> = cases.iter().map(|c| c.primary).collect();
        let secondary_ratings: Vec<i32> = cases.iter().map(|c| c.secondary).collect();
        let primary_errors: Vec<i32> = cases.iter().map(PairedCase::primary_error).collect();
        let secondary_errors: Vec<i32> = cases.iter().map(PairedCase::secondary_error).collect();
        let confidences: Vec<f64> = cases.iter().map(|c| c.secondary_confidence).collect();

        let divergence_test = wilcoxon_signed_rank(&divergences);
        let accuracy_test = mcnemar(
            cases
                .iter()
                .map(|c| (c.primary == c.target, c.secondary == c.target)),
        );
        let primary_signed: Vec<f64> = primary_errors.iter().map(|e| *e as f64).collect();
        let secondary_signed: Vec<f64> = secondary_errors.iter().map(|e| *e as f64).collect();
        let variance_test =
            levene_median(&[primary_signed.as_slice(), secondary_signed.as_slice()]);
        let secondary_var = std_dev(&secondary_signed).powi(2);
        let variance_ratio =
            (secondary_var > 0.0).then(|| std_dev(&primary_signed).powi(2) / secondary_var);

        let adjusted = holm_bonferroni(
            &[
                ("rating divergence (Wilcoxon)", divergence_test.p_value),
                ("exact-match accuracy (McNemar)", accuracy_test.p_value),
                ("error variance (Levene)", variance_test.p_value),
            ],
            self.alpha,
        );
        let (persona_test, per_persona) = per_persona(cases);

        let report = ComparisonReport {
            cases: cases.len(),
            alpha: self.alpha,
            divergence: spread(&divergences),
            primary: accuracy(&primary_ratings, &primary_errors),
            secondary: accuracy(&secondary_ratings, &secondary_errors),
            divergence_test,
            accuracy_test,
            variance_test,
            variance_ratio,
            adjusted,
            per_domain: per_domain(cases),
            persona_test,
            per_persona,
            per_target: per_target(cases),
            secondary_confidence: spread(&confidences),
        };

        info!(
            cases = report.cases,
            mean_divergence = report.divergence.mean,
            wilcoxon_p = report.divergence_test.p_value,
            mcnemar_p = report.accuracy_test.p_value,
            levene_p = report.variance_test.p_value,
            significant = report.significant(),
            "Rater comparison complete"
        );
        Ok(report)
    }
}

fn per_domain(cases: &[PairedCase]) -> Vec<DomainComparison> {
    let mut groups: BTreeMap<&str, Vec<&PairedCase>> = BTreeMap::new();
    for case in cases {
        groups.entry(case.domain.as_str()).or_default().push(case);
    }

    groups
        .into_iter()
        .map(|(domain, members)| {
            let n = members.len();
            let abs_div: Vec<f64> = members
                .iter()
                .map(|c| c.divergence().abs() as f64)
                .collect();
            DomainComparison {
                domain: domain.to_string(),
                cases: n,
                primary_exact_pct: pct(
                    members.iter().filter(|c| c.primary_error() == 0).count(),
                    n,
                ),
                secondary_exact_pct: pct(
                    members.iter().filter(|c| c.secondary_error() == 0).count(),
                    n,
                ),
                mean_abs_divergence: mean(&abs_div),
            }
        })
        .collect()
}

fn per_persona(cases: &[PairedCase]) -> (Option<KruskalWallisTest>, Vec<PersonaDivergence>) {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for case in cases {
        groups
            .entry(case.persona.as_str())
            .or_default()
            .push(case.divergence().abs() as f64);
    }

    let persona_test = (groups.len() >= 2).then(|| {
        let samples: Vec<&[f64]> = groups.values().map(Vec::as_slice).collect();
        kruskal_wallis(&samples)
    });
    let breakdown = groups
        .into_iter()
        .map(|(persona, abs_div)| PersonaDivergence {
            persona: persona.to_string(),
            cases: abs_div.len(),
            mean_abs_divergence: mean(&abs_div),
            median_abs_divergence: median(&abs_div),
        })
        .collect();
    (persona_test, breakdown)
}

fn per_target(cases: &[PairedCase]) -> Vec<TargetLevelError> {
    let mut groups: BTreeMap<i32, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for case in cases {
        let (primary, secondary) = groups.entry(case.target).or_default();
        primary.push(case.primary_error() as f64);
        secondary.push(case.secondary_error() as f64);
    }

    groups
        .into_iter()
        .map(|(target, (primary, secondary))| TargetLevelError {
            target,
            cases: primary.len(),
            primary: spread(&primary),
            secondary: spread(&secondary),
        })
        .collect()
}
