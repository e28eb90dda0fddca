//! Configuration of a demonstration run.
//!
//! Every field has a default, so a JSON file only needs to name what it
//! changes:
//!
//! ```json
//! { "n_samples": 5000, "solver": "cholesky" }
//! ```

use crate::dataset::SyntheticConfig;
use crate::model::RidgeSolver;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating a [`DemoConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Parameters of the target-encoding demonstration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    #[serde(flatten)]
    pub dataset: SyntheticConfig,
    /// Share of samples held out for testing.
    pub test_fraction: f64,
    pub split_seed: u64,
    /// Seed of the target encoder's fold shuffle.
    pub encoder_seed: u64,
    pub cv_folds: usize,
    pub ridge_alpha: f64,
    pub solver: RidgeSolver,
    pub fit_intercept: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            dataset: SyntheticConfig::default(),
            test_fraction: 0.25,
            split_seed: 0,
            encoder_seed: 0,
            cv_folds: 5,
            ridge_alpha: 1e-6,
            solver: RidgeSolver::Lsqr,
            fit_intercept: false,
        }
    }
}

impl DemoConfig {
    /// Reads a JSON config; missing fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the settings that are only meaningful together.
    ///
    /// Estimator hyperparameters are validated again when fitting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.cv_folds < 2 {
            return Err(ConfigError::Invalid(format!(
                "cv_folds must be at least 2, got {}",
                self.cv_folds
            )));
        }
        let n_train = self.dataset.n_samples as f64 * (1.0 - self.test_fraction);
        if n_train < self.cv_folds as f64 {
            return Err(ConfigError::Invalid(format!(
                "{} samples leave fewer training rows than cv_folds ({})",
                self.dataset.n_samples, self.cv_folds
            )));
        }
        Ok(())
    }
}
