//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `SSR_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_ANCHOR_CACHE_CAPACITY, DEFAULT_BOOTSTRAP_ITERATIONS, DEFAULT_CANDIDATE_TEMPERATURES,
    DEFAULT_SEED, DEFAULT_TEMPERATURE, DEFAULT_TRAIN_FRACTION,
};
use crate::scoring::{Normalization, RatingPolicy};

/// Engine configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SSR_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Labeled dataset for `ssr-calibrate`. Required by the binary.
    pub dataset_path: Option<PathBuf>,

    /// Where the calibration report is written. Default: stdout.
    pub report_path: Option<PathBuf>,

    /// Softmax temperature for rating. Default: `0.2`.
    pub temperature: f64,

    /// Temperatures searched during calibration.
    /// Default: `0.05,0.1,0.15,0.2,0.3,0.5,0.75,1.0`.
    pub candidate_temperatures: Vec<f64>,

    /// Default: `min-max`.
    pub normalization: Normalization,

    /// Default: `expected-value`.
    pub rating_policy: RatingPolicy,

    /// Requested bootstrap repeats. Default: `1000`.
    pub bootstrap_iterations: usize,

    /// Share of cases in each bootstrap train split. Default: `0.7`.
    pub train_fraction: f64,

    /// Bootstrap RNG seed. Default: `42`.
    pub seed: u64,

    /// Max anchor sets kept in the embedding cache. Default: `1024`.
    pub anchor_cache_capacity: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_path: None,
            report_path: None,
            temperature: DEFAULT_TEMPERATURE,
            candidate_temperatures: DEFAULT_CANDIDATE_TEMPERATURES.to_vec(),
            normalization: Normalization::default(),
            rating_policy: RatingPolicy::default(),
            bootstrap_iterations: DEFAULT_BOOTSTRAP_ITERATIONS,
            train_fraction: DEFAULT_TRAIN_FRACTION,
            seed: DEFAULT_SEED,
            anchor_cache_capacity: DEFAULT_ANCHOR_CACHE_CAPACITY,
        }
    }
}

impl Config {
    pub const ENV_DATASET_PATH: &'static str = "SSR_DATASET_PATH";
    pub const ENV_REPORT_PATH: &'static str = "SSR_REPORT_PATH";
    pub const ENV_TEMPERATURE: &'static str = "SSR_TEMPERATURE";
    pub const ENV_CANDIDATE_TEMPERATURES: &'static str = "SSR_CANDIDATE_TEMPERATURES";
    pub const ENV_NORMALIZATION: &'static str = "SSR_NORMALIZATION";
    pub const ENV_RATING_POLICY: &'static str = "SSR_RATING_POLICY";
    pub const ENV_BOOTSTRAP_ITERATIONS: &'static str = "SSR_BOOTSTRAP_ITERATIONS";
    pub const ENV_TRAIN_FRACTION: &'static str = "SSR_TRAIN_FRACTION";
    pub const ENV_SEED: &'static str = "SSR_SEED";
    pub const ENV_ANCHOR_CACHE_CAPACITY: &'static str = "SSR_ANCHOR_CACHE_CAPACITY";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// A variable that is set but malformed is an error, not a silent default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            dataset_path: Self::parse_optional_path_from_env(Self::ENV_DATASET_PATH),
            report_path: Self::parse_optional_path_from_env(Self::ENV_REPORT_PATH),
            temperature: Self::parse_from_env(Self::ENV_TEMPERATURE, defaults.temperature)?,
            candidate_temperatures: Self::parse_list_from_env(
                Self::ENV_CANDIDATE_TEMPERATURES,
                defaults.candidate_temperatures,
            )?,
            normalization: Self::parse_from_env(Self::ENV_NORMALIZATION, defaults.normalization)?,
            rating_policy: Self::parse_from_env(Self::ENV_RATING_POLICY, defaults.rating_policy)?,
            bootstrap_iterations: Self::parse_from_env(
                Self::ENV_BOOTSTRAP_ITERATIONS,
                defaults.bootstrap_iterations,
            )?,
            train_fraction: Self::parse_from_env(
                Self::ENV_TRAIN_FRACTION,
                defaults.train_fraction,
            )?,
            seed: Self::parse_from_env(Self::ENV_SEED, defaults.seed)?,
            anchor_cache_capacity: Self::parse_from_env(
                Self::ENV_ANCHOR_CACHE_CAPACITY,
                defaults.anchor_cache_capacity,
            )?,
        })
    }

    /// Checks value invariants and the dataset path (does not create or open files).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_TEMPERATURE,
                reason: format!("must be positive, got {}", self.temperature),
            });
        }

        if self.candidate_temperatures.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_CANDIDATE_TEMPERATURES,
                reason: "list is empty".to_string(),
            });
        }
        if let Some(bad) = self
            .candidate_temperatures
            .iter()
            .find(|t| !(t.is_finite() && **t > 0.0))
        {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_CANDIDATE_TEMPERATURES,
                reason: format!("must all be positive, got {}", bad),
            });
        }

        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_TRAIN_FRACTION,
                reason: format!("must be in (0, 1), got {}", self.train_fraction),
            });
        }

        if self.bootstrap_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_BOOTSTRAP_ITERATIONS,
                reason: "must be at least 1".to_string(),
            });
        }

        if self.anchor_cache_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_ANCHOR_CACHE_CAPACITY,
                reason: "must be at least 1".to_string(),
            });
        }

        if let Some(ref path) = self.dataset_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        if let Some(ref path) = self.report_path
            && path.is_dir()
        {
            return Err(ConfigError::IsADirectory { path: path.clone() });
        }

        Ok(())
    }

    /// Dataset path, or [`ConfigError::MissingEnvVar`] when unset.
    pub fn require_dataset_path(&self) -> Result<&PathBuf, ConfigError> {
        self.dataset_path
            .as_ref()
            .ok_or(ConfigError::MissingEnvVar {
                name: Self::ENV_DATASET_PATH,
            })
    }

    fn parse_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
                name: var_name,
                value: value.clone(),
                reason: e.to_string(),
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_list_from_env(
        var_name: &'static str,
        default: Vec<f64>,
    ) -> Result<Vec<f64>, ConfigError> {
        let Ok(value) = env::var(var_name) else {
            return Ok(default);
        };
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                item.parse::<f64>().map_err(|e| ConfigError::ParseError {
                    name: var_name,
                    value: value.clone(),
                    reason: format!("'{}': {}", item, e),
                })
            })
            .collect()
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}
