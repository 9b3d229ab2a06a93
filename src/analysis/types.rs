use serde::{Deserialize, Serialize};

/// One text rated by two raters against a known target rating.
///
/// Typically the primary rater is the model that generated the text rating
/// its own output, and the secondary rater is the anchor engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedCase {
    pub domain: String,
    #[serde(default)]
    pub persona: String,
    /// Rating the text was written to express.
    pub target: i32,
    pub primary: i32,
    pub secondary: i32,
    /// Secondary rater's confidence in `[0, 1]`.
    #[serde(default)]
    pub secondary_confidence: f64,
}

impl PairedCase {
    pub fn new(domain: impl Into<String>, target: i32, primary: i32, secondary: i32) -> Self {
        Self {
            domain: domain.into(),
            persona: String::new(),
            target,
            primary,
            secondary,
            secondary_confidence: 0.0,
        }
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.secondary_confidence = confidence;
        self
    }

    /// `primary - secondary`.
    pub fn divergence(&self) -> i32 {
        self.primary - self.secondary
    }

    pub fn primary_error(&self) -> i32 {
        self.primary - self.target
    }

    pub fn secondary_error(&self) -> i32 {
        self.secondary - self.target
    }
}

/// Mean, population SD and median of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Spread {
    pub mean: f64,
    pub std: f64,
    pub median: f64,
}

/// Accuracy of one rater against the targets.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RaterAccuracy {
    pub mean_rating: f64,
    /// Signed error `rating - target`.
    pub error: Spread,
    pub exact_pct: f64,
    pub within_one_pct: f64,
    pub mae: f64,
}

/// Two-sided Wilcoxon signed-rank test on paired differences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WilcoxonTest {
    /// Pairs with a non-zero difference.
    pub n_nonzero: usize,
    pub w_plus: f64,
    pub w_minus: f64,
    /// `min(w_plus, w_minus)`.
    pub statistic: f64,
    pub z: f64,
    pub p_value: f64,
    /// `true` when the p-value comes from the exact null distribution.
    pub exact: bool,
    pub rank_biserial: f64,
}

/// Levene's test (median-centred) for equal variances across groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeveneTest {
    pub statistic: f64,
    pub df_between: f64,
    pub df_within: f64,
    pub p_value: f64,
}

/// Kruskal-Wallis H test across independent groups.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KruskalWallisTest {
    /// Non-empty groups compared.
    pub groups: usize,
    pub statistic: f64,
    pub df: f64,
    pub p_value: f64,
}

/// McNemar test on paired binary outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct McNemarTest {
    pub both: usize,
    /// Primary right, secondary wrong.
    pub primary_only: usize,
    /// Primary wrong, secondary right.
    pub secondary_only: usize,
    pub neither: usize,
    /// `true` when the exact binomial form was used.
    pub exact: bool,
    /// `min(b, c)` for the exact form, continuity-corrected chi-square otherwise.
    pub statistic: f64,
    pub p_value: f64,
    /// `b / c`; `None` when `c == 0` and `b > 0`.
    pub odds_ratio: Option<f64>,
}

/// One p-value after Holm-Bonferroni adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HolmAdjusted {
    pub name: String,
    pub p_raw: f64,
    pub p_adjusted: f64,
    pub reject: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainComparison {
    pub domain: String,
    pub cases: usize,
    pub primary_exact_pct: f64,
    pub secondary_exact_pct: f64,
    pub mean_abs_divergence: f64,
}

/// Absolute divergence for one persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaDivergence {
    pub persona: String,
    pub cases: usize,
    pub mean_abs_divergence: f64,
    pub median_abs_divergence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetLevelError {
    pub target: i32,
    pub cases: usize,
    pub primary: Spread,
    pub secondary: Spread,
}

/// Full paired comparison of two raters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub cases: usize,
    pub alpha: f64,
    /// `primary - secondary`.
    pub divergence: Spread,
    pub primary: RaterAccuracy,
    pub secondary: RaterAccuracy,
    pub divergence_test: WilcoxonTest,
    pub accuracy_test: McNemarTest,
    /// Primary versus secondary signed errors.
    pub variance_test: LeveneTest,
    /// `var(primary error) / var(secondary error)`; `None` when the
    /// secondary errors do not vary.
    pub variance_ratio: Option<f64>,
    pub adjusted: Vec<HolmAdjusted>,
    pub per_domain: Vec<DomainComparison>,
    /// |divergence| across personas; `None` with fewer than two personas.
    pub persona_test: Option<KruskalWallisTest>,
    pub per_persona: Vec<PersonaDivergence>,
    pub per_target: Vec<TargetLevelError>,
    pub secondary_confidence: Spread,
}

impl ComparisonReport {
    /// Tests rejected after adjustment.
    pub fn significant(&self) -> usize {
        self.adjusted.iter().filter(|a| a.reject).count()
    }
}
