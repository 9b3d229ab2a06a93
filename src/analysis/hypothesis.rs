//! Nonparametric paired tests and multiple-comparison adjustment.

use std::f64::consts::SQRT_2;

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor};
use statrs::function::erf::{erf, erfc};

use super::types::{HolmAdjusted, KruskalWallisTest, LeveneTest, McNemarTest, WilcoxonTest};
use crate::calibration::{mean, median};

/// Below this many discordant pairs McNemar uses the exact binomial form.
pub const MCNEMAR_EXACT_THRESHOLD: usize = 25;

/// Largest sample for which the signed-rank p-value comes from the exact
/// null distribution (when there are no zeros and no ties).
pub const WILCOXON_EXACT_MAX_N: usize = 50;

pub fn normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / SQRT_2))
}

/// Survival function of the chi-square distribution with one degree of freedom.
fn chi_square_1_sf(x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    erfc((x / 2.0).sqrt())
}

/// Average ranks (1-based) of `values`, ties sharing the mean of their ranks.
///
/// Returns the ranks in input order and the tie correction `Σ(t³ - t)`.
pub fn average_ranks(values: &[f64]) -> (Vec<f64>, f64) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut tie_term = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        let rank = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = rank;
        }
        let t = (end - start) as f64;
        tie_term += t * t * t - t;
        start = end;
    }
    (ranks, tie_term)
}

/// Two-sided Wilcoxon signed-rank test.
///
/// Zero differences are dropped. With no zeros, no tied magnitudes and at
/// most [`WILCOXON_EXACT_MAX_N`] pairs the p-value is exact; otherwise it uses
/// the normal approximation with tie-corrected variance and no continuity
/// correction. `z` is always the normal score.
pub fn wilcoxon_signed_rank(differences: &[f64]) -> WilcoxonTest {
    let nonzero: Vec<f64> = differences.iter().copied().filter(|d| *d != 0.0).collect();
    let n = nonzero.len();
    if n == 0 {
        return WilcoxonTest {
            n_nonzero: 0,
            w_plus: 0.0,
            w_minus: 0.0,
            statistic: 0.0,
            z: 0.0,
            p_value: 1.0,
            exact: false,
            rank_biserial: 0.0,
        };
    }

    let magnitudes: Vec<f64> = nonzero.iter().map(|d| d.abs()).collect();
    let (ranks, tie_term) = average_ranks(&magnitudes);
    let (w_plus, w_minus) = nonzero
        .iter()
        .zip(&ranks)
        .fold((0.0, 0.0), |(plus, minus), (d, r)| {
            if *d > 0.0 { (plus + r, minus) } else { (plus, minus + r) }
        });
    let statistic = w_plus.min(w_minus);

    let nf = n as f64;
    let rank_total = nf * (nf + 1.0) / 2.0;
    let expected = rank_total / 2.0;
    let variance = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - tie_term / 48.0;
    let (z, approx_p) = if variance > 0.0 {
        let z = (statistic - expected) / variance.sqrt();
        (z, (2.0 * normal_cdf(-z.abs())).min(1.0))
    } else {
        (0.0, 1.0)
    };

    let exact = n == differences.len() && tie_term == 0.0 && n <= WILCOXON_EXACT_MAX_N;
    let p_value = if exact {
        signed_rank_exact_p(n, statistic)
    } else {
        approx_p
    };

    WilcoxonTest {
        n_nonzero: n,
        w_plus,
        w_minus,
        statistic,
        z,
        p_value,
        exact,
        rank_biserial: 1.0 - 2.0 * statistic / rank_total,
    }
}

/// Two-sided exact p-value of a tie-free signed-rank statistic
/// `min(W+, W-)` over `n` pairs.
fn signed_rank_exact_p(n: usize, statistic: f64) -> f64 {
    let max_sum = n * (n + 1) / 2;
    // counts[s] = number of rank subsets summing to s
    let mut counts = vec![0u64; max_sum + 1];
    counts[0] = 1;
    for rank in 1..=n {
        for sum in (rank..=max_sum).rev() {
            counts[sum] += counts[sum - rank];
        }
    }
    let w = (statistic.round() as usize).min(max_sum);
    let tail: u64 = counts[..=w].iter().sum();
    (2.0 * tail as f64 / 2f64.powi(n as i32)).min(1.0)
}

/// Two-sided exact binomial p-value for `k = min(b, c)` successes in `n`
/// trials at probability one half.
fn binomial_two_sided(k: usize, n: usize) -> f64 {
    let mut coefficient = 1.0;
    let mut cdf = 0.0;
    for i in 0..=k {
        if i > 0 {
            coefficient *= (n - i + 1) as f64 / i as f64;
        }
        cdf += coefficient;
    }
    (2.0 * cdf * 0.5f64.powi(n as i32)).min(1.0)
}

/// McNemar test on `(primary_correct, secondary_correct)` pairs.
pub fn mcnemar(outcomes: impl IntoIterator<Item = (bool, bool)>) -> McNemarTest {
    let (mut both, mut primary_only, mut secondary_only, mut neither) = (0, 0, 0, 0);
    for outcome in outcomes {
        match outcome {
            (true, true) => both += 1,
            (true, false) => primary_only += 1,
            (false, true) => secondary_only += 1,
            (false, false) => neither += 1,
        }
    }

    let (b, c) = (primary_only, secondary_only);
    let discordant = b + c;
    let exact = discordant < MCNEMAR_EXACT_THRESHOLD;
    let (statistic, p_value) = if discordant == 0 {
        (0.0, 1.0)
    } else if exact {
        let k = b.min(c);
        (k as f64, binomial_two_sided(k, discordant))
    } else {
        let diff = (b as f64 - c as f64).abs() - 1.0;
        let statistic = diff * diff / discordant as f64;
        (statistic, chi_square_1_sf(statistic))
    };

    let odds_ratio = match (b, c) {
        (0, 0) => Some(1.0),
        (_, 0) => None,
        (b, c) => Some(b as f64 / c as f64),
    };

    McNemarTest {
        both,
        primary_only,
        secondary_only,
        neither,
        exact,
        statistic,
        p_value,
        odds_ratio,
    }
}

/// Levene's test for equal variances, centred on group medians
/// (Brown-Forsythe). Empty groups are ignored.
///
/// When every deviation equals its group mean the statistic is `0` if the
/// groups also agree and infinite otherwise.
pub fn levene_median(groups: &[&[f64]]) -> LeveneTest {
    let groups: Vec<&[f64]> = groups.iter().copied().filter(|g| !g.is_empty()).collect();
    let k = groups.len();
    let total: usize = groups.iter().map(|g| g.len()).sum();
    let null = LeveneTest {
        statistic: 0.0,
        df_between: k.saturating_sub(1) as f64,
        df_within: total.saturating_sub(k) as f64,
        p_value: 1.0,
    };
    if k < 2 || total <= k {
        return null;
    }

    let deviations: Vec<Vec<f64>> = groups
        .iter()
        .map(|g| {
            let centre = median(g);
            g.iter().map(|v| (v - centre).abs()).collect()
        })
        .collect();
    let group_means: Vec<f64> = deviations.iter().map(|d| mean(d)).collect();
    let grand_mean = deviations.iter().flatten().sum::<f64>() / total as f64;

    let between: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(d, m)| d.len() as f64 * (m - grand_mean).powi(2))
        .sum();
    let within: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(d, m)| d.iter().map(|v| (v - m).powi(2)).sum::<f64>())
        .sum();

    if within == 0.0 {
        if between == 0.0 {
            return null;
        }
        return LeveneTest {
            statistic: f64::INFINITY,
            p_value: 0.0,
            ..null
        };
    }

    let statistic = (null.df_within * between) / (null.df_between * within);
    let p_value = FisherSnedecor::new(null.df_between, null.df_within)
        .map(|f| f.sf(statistic))
        .unwrap_or(1.0);

    LeveneTest {
        statistic,
        p_value,
        ..null
    }
}

/// Kruskal-Wallis H test with tie correction. Empty groups are ignored.
pub fn kruskal_wallis(groups: &[&[f64]]) -> KruskalWallisTest {
    let groups: Vec<&[f64]> = groups.iter().copied().filter(|g| !g.is_empty()).collect();
    let k = groups.len();
    let null = KruskalWallisTest {
        groups: k,
        statistic: 0.0,
        df: k.saturating_sub(1) as f64,
        p_value: 1.0,
    };
    if k < 2 {
        return null;
    }

    let pooled: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let n = pooled.len() as f64;
    let (ranks, tie_term) = average_ranks(&pooled);
    let correction = 1.0 - tie_term / (n * n * n - n);
    if correction <= 0.0 {
        return null;
    }

    let mut offset = 0;
    let mut rank_term = 0.0;
    for group in &groups {
        let rank_sum: f64 = ranks[offset..offset + group.len()].iter().sum();
        rank_term += rank_sum * rank_sum / group.len() as f64;
        offset += group.len();
    }
    let h = 12.0 / (n * (n + 1.0)) * rank_term - 3.0 * (n + 1.0);
    let statistic = (h / correction).max(0.0);
    let p_value = ChiSquared::new(null.df)
        .map(|chi| chi.sf(statistic))
        .unwrap_or(1.0);

    KruskalWallisTest {
        statistic,
        p_value,
        ..null
    }
}

/// Holm-Bonferroni step-down adjustment, reported in input order.
pub fn holm_bonferroni(tests: &[(&str, f64)], alpha: f64) -> Vec<HolmAdjusted> {
    let m = tests.len();
    let mut order: Vec<usize> = (0..m).collect();
    order.sort_by(|&a, &b| tests[a].1.total_cmp(&tests[b].1));

    let mut adjusted = vec![0.0; m];
    let mut running_max: f64 = 0.0;
    for (step, &idx) in order.iter().enumerate() {
        let scaled = ((m - step) as f64 * tests[idx].1).min(1.0);
        running_max = running_max.max(scaled);
        adjusted[idx] = running_max;
    }

    tests
        .iter()
        .zip(adjusted)
        .map(|(&(name, p_raw), p_adjusted)| HolmAdjusted {
            name: name.to_string(),
            p_raw,
            p_adjusted,
            reject: p_adjusted <= alpha,
        })
        .collect()
}
