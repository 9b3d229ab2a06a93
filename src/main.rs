//! `ssr-calibrate` entrypoint.
//!
//! Loads a labeled dataset, calibrates the scoring temperature and writes the
//! report as pretty JSON to `SSR_REPORT_PATH` (or stdout).

use std::fs;
use std::io::Write;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use ssr::analysis::{ComparisonReport, PairedCase, RaterComparison};
use ssr::calibration::{CalibrationConfig, CalibrationReport, Calibrator, LabeledCase};
use ssr::config::Config;

#[derive(Debug, Deserialize)]
struct Dataset {
    #[serde(default)]
    cases: Vec<LabeledCase>,
    /// Optional paired ratings for a rater comparison.
    #[serde(default)]
    pairs: Vec<PairedCase>,
}

#[derive(Debug, Serialize)]
struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    calibration: Option<CalibrationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<ComparisonReport>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let dataset_path = config.require_dataset_path()?;

    let raw = fs::read_to_string(dataset_path)
        .with_context(|| format!("reading dataset {}", dataset_path.display()))?;
    let dataset: Dataset = serde_json::from_str(&raw)
        .with_context(|| format!("parsing dataset {}", dataset_path.display()))?;

    tracing::info!(
        path = %dataset_path.display(),
        cases = dataset.cases.len(),
        pairs = dataset.pairs.len(),
        normalization = %config.normalization,
        policy = %config.rating_policy,
        "Dataset loaded"
    );

    if dataset.cases.is_empty() && dataset.pairs.is_empty() {
        anyhow::bail!(
            "dataset {} has neither cases nor pairs",
            dataset_path.display()
        );
    }

    let calibration = if dataset.cases.is_empty() {
        None
    } else {
        let calibrator = Calibrator::new(CalibrationConfig::from(&config))?;
        let report = calibrator.calibrate(&dataset.cases)?;
        tracing::info!("\n{}", report);
        Some(report)
    };

    let comparison = if dataset.pairs.is_empty() {
        None
    } else {
        Some(RaterComparison::new().compare(&dataset.pairs)?)
    };

    let json = serde_json::to_string_pretty(&Output {
        calibration,
        comparison,
    })?;

    match &config.report_path {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("writing report {}", path.display()))?;
            tracing::info!(path = %path.display(), "Report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }

    Ok(())
}
