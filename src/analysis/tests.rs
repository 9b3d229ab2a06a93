use super::comparison::RaterComparison;
use super::types::PairedCase;
use crate::calibration::CalibrationError;

const TOLERANCE: f64 = 1e-9;

fn sample_cases() -> Vec<PairedCase> {
    vec![
        PairedCase::new("health", 5, 5, 4).with_confidence(0.6),
        PairedCase::new("health", 4, 4, 4).with_confidence(0.8),
        PairedCase::new("finance", 2, 2, 3).with_confidence(0.4),
        PairedCase::new("finance", 1, 1, 1).with_confidence(0.9),
        PairedCase::new("finance", 5, 5, 3).with_confidence(0.5),
    ]
}

#[test]
fn test_divergence_and_accuracy_summaries() {
    let report = RaterComparison::new().compare(&sample_cases()).unwrap();

    assert_eq!(report.cases, 5);
    assert!((report.divergence.mean - 0.4).abs() < TOLERANCE);
    assert_eq!(report.divergence.median, 0.0);

    assert!((report.primary.exact_pct - 100.0).abs() < TOLERANCE);
    assert_eq!(report.primary.mae, 0.0);
    assert!((report.secondary.exact_pct - 40.0).abs() < TOLERANCE);
    assert!((report.secondary.within_one_pct - 80.0).abs() < TOLERANCE);
    assert!((report.secondary.mae - 0.8).abs() < TOLERANCE);
    assert!((report.secondary.error.mean + 0.4).abs() < TOLERANCE);
}

#[test]
fn test_paired_tests_and_adjustment() {
    let report = RaterComparison::new().compare(&sample_cases()).unwrap();

    assert_eq!(report.divergence_test.n_nonzero, 3);
    assert_eq!(report.divergence_test.w_plus, 4.5);
    assert_eq!(report.divergence_test.w_minus, 1.5);

    assert_eq!(report.accuracy_test.primary_only, 3);
    assert_eq!(report.accuracy_test.secondary_only, 0);
    assert_eq!(report.accuracy_test.both, 2);
    assert!(report.accuracy_test.exact);
    assert_eq!(report.accuracy_test.odds_ratio, None);
    assert!((report.accuracy_test.p_value - 0.25).abs() < TOLERANCE);

    assert_eq!(report.adjusted.len(), 3);
    assert_eq!(report.adjusted[2].name, "error variance (Levene)");
    assert!(report.adjusted.iter().all(|a| a.p_adjusted >= a.p_raw));
    assert_eq!(report.significant(), 0);
}

#[test]
fn test_per_domain_breakdown_is_sorted() {
    let report = RaterComparison::new().compare(&sample_cases()).unwrap();
    let domains: Vec<&str> = report.per_domain.iter().map(|d| d.domain.as_str()).collect();
    assert_eq!(domains, ["finance", "health"]);

    let finance = &report.per_domain[0];
    assert_eq!(finance.cases, 3);
    assert!((finance.primary_exact_pct - 100.0).abs() < TOLERANCE);
    assert!((finance.secondary_exact_pct - 100.0 / 3.0).abs() < TOLERANCE);
    assert!((finance.mean_abs_divergence - 1.0).abs() < TOLERANCE);

    let health = &report.per_domain[1];
    assert!((health.secondary_exact_pct - 50.0).abs() < TOLERANCE);
    assert!((health.mean_abs_divergence - 0.5).abs() < TOLERANCE);
}

#[test]
fn test_per_target_signed_errors() {
    let report = RaterComparison::new().compare(&sample_cases()).unwrap();
    let targets: Vec<i32> = report.per_target.iter().map(|t| t.target).collect();
    assert_eq!(targets, [1, 2, 4, 5]);

    let top = report.per_target.last().unwrap();
    assert_eq!(top.cases, 2);
    assert_eq!(top.primary.mean, 0.0);
    assert!((top.secondary.mean + 1.5).abs() < TOLERANCE);
    assert!((top.secondary.std - 0.5).abs() < TOLERANCE);
}

#[test]
fn test_confidence_summary() {
    let report = RaterComparison::new().compare(&sample_cases()).unwrap();
    assert!((report.secondary_confidence.mean - 0.64).abs() < TOLERANCE);
    assert!((report.secondary_confidence.median - 0.6).abs() < TOLERANCE);
}

#[test]
fn test_identical_raters_are_not_significant() {
    let cases: Vec<PairedCase> = (1..=5)
        .map(|r| PairedCase::new("d", r, r, r).with_persona("p"))
        .collect();
    let report = RaterComparison::new().compare(&cases).unwrap();
    assert_eq!(report.divergence_test.p_value, 1.0);
    assert_eq!(report.accuracy_test.p_value, 1.0);
    assert_eq!(report.significant(), 0);
}

#[test]
fn test_empty_comparison_is_insufficient() {
    let err = RaterComparison::new().compare(&[]).unwrap_err();
    assert!(matches!(err, CalibrationError::InsufficientData { .. }));
}

#[test]
fn test_alpha_must_be_a_probability() {
    let err = RaterComparison::new()
        .with_alpha(0.0)
        .compare(&sample_cases())
        .unwrap_err();
    assert!(matches!(err, CalibrationError::InvalidConfig { .. }));
}

#[test]
fn test_paired_case_optional_fields_default() {
    let case: PairedCase = serde_json::from_str(
        r#"{ "domain": "travel", "target": 3, "primary": 4, "secondary": 3 }"#,
    )
    .unwrap();
    assert_eq!(case.persona, "");
    assert_eq!(case.secondary_confidence, 0.0);
    assert_eq!(case.divergence(), 1);
}

#[test]
fn test_error_variance_compression() {
    let report = RaterComparison::new().compare(&sample_cases()).unwrap();

    assert!((report.variance_test.statistic - 4.571_428_571).abs() < 1e-6);
    assert!((report.variance_test.p_value - 0.064_969_374).abs() < 1e-6);
    assert_eq!(report.variance_test.df_within, 8.0);
    assert_eq!(report.variance_ratio, Some(0.0));

    let levene = &report.adjusted[2];
    assert!((levene.p_raw - report.variance_test.p_value).abs() < TOLERANCE);
    assert!(!levene.reject);
}

#[test]
fn test_variance_ratio_absent_when_secondary_errors_are_constant() {
    let cases = vec![
        PairedCase::new("d", 3, 4, 3),
        PairedCase::new("d", 2, 1, 2),
        PairedCase::new("d", 5, 5, 5),
    ];
    let report = RaterComparison::new().compare(&cases).unwrap();
    assert_eq!(report.variance_ratio, None);
}

#[test]
fn test_persona_breakdown_and_kruskal_wallis() {
    let cases = vec![
        PairedCase::new("d", 3, 4, 3).with_persona("analyst"),
        PairedCase::new("d", 3, 3, 3).with_persona("analyst"),
        PairedCase::new("d", 3, 5, 3).with_persona("analyst"),
        PairedCase::new("d", 3, 3, 3).with_persona("retiree"),
        PairedCase::new("d", 3, 3, 3).with_persona("retiree"),
        PairedCase::new("d", 3, 4, 3).with_persona("retiree"),
    ];
    let report = RaterComparison::new().compare(&cases).unwrap();

    let personas: Vec<&str> = report.per_persona.iter().map(|p| p.persona.as_str()).collect();
    assert_eq!(personas, ["analyst", "retiree"]);
    assert_eq!(report.per_persona[0].cases, 3);
    assert!((report.per_persona[0].mean_abs_divergence - 1.0).abs() < TOLERANCE);
    assert_eq!(report.per_persona[0].median_abs_divergence, 1.0);
    assert!((report.per_persona[1].mean_abs_divergence - 1.0 / 3.0).abs() < TOLERANCE);
    assert_eq!(report.per_persona[1].median_abs_divergence, 0.0);

    let test = report.persona_test.unwrap();
    assert_eq!(test.groups, 2);
    assert!((test.statistic - 0.888_888_889).abs() < 1e-6);
    assert!((test.p_value - 0.345_778_586).abs() < 1e-6);
}

#[test]
fn test_single_persona_has_no_persona_test() {
    let report = RaterComparison::new().compare(&sample_cases()).unwrap();
    assert!(report.persona_test.is_none());
    assert_eq!(report.per_persona.len(), 1);
    assert_eq!(report.per_persona[0].persona, "");
}
