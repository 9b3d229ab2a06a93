//! Paired comparison of two raters on the same texts.
//!
//! Used to check whether a model rating its own generated text agrees with
//! the anchor engine rating that text: divergence, accuracy and error-variance
//! tests with Holm-Bonferroni adjustment, a persona effect test, and
//! per-domain / per-persona / per-target breakdowns.

pub mod comparison;
pub mod hypothesis;
pub mod types;

#[cfg(test)]
mod tests;

pub use comparison::{DEFAULT_ALPHA, RaterComparison};
pub use hypothesis::{
    MCNEMAR_EXACT_THRESHOLD, WILCOXON_EXACT_MAX_N, average_ranks, holm_bonferroni,
    kruskal_wallis, levene_median, mcnemar, normal_cdf, wilcoxon_signed_rank,
};
pub use types::{
    ComparisonReport, DomainComparison, HolmAdjusted, KruskalWallisTest, LeveneTest, McNemarTest,
    PairedCase, PersonaDivergence, RaterAccuracy, Spread, TargetLevelError, WilcoxonTest,
};
