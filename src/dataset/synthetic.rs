//! Synthetic regression data with categorical features of known usefulness.
//!
//! The generated matrix has three integer-coded columns:
//! - `informative`: a noisy discretization of the target, so its categories
//!   carry real signal;
//! - `shuffled`: the same values randomly permuted across rows, so the
//!   marginal distribution matches but the signal is gone;
//! - `near_unique`: almost one category per row and no signal at all, the
//!   feature a target encoder without cross fitting overfits on.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::{BinStrategy, KBinsDiscretizer, PreprocessingError, Transformer};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

/// Shape and randomness of the generated dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    pub n_samples: usize,
    /// Cardinality of the `informative` and `shuffled` columns.
    pub n_categories: usize,
    /// Standard deviation of the noise added before binning the target.
    pub noise_scale: f64,
    /// `near_unique` draws from `floor(near_unique_fraction * n_samples)` codes.
    pub near_unique_fraction: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            n_samples: 50_000,
            n_categories: 100,
            noise_scale: 0.5,
            near_unique_fraction: 0.9,
            seed: 42,
        }
    }
}

/// Integer-coded features, the continuous target and the column names.
#[derive(Clone, Debug)]
pub struct CategoricalDataset<B: Backend> {
    pub x: Tensor2D<B>,
    pub y: Tensor1D<B>,
    pub feature_names: Vec<String>,
}

impl<B: Backend> CategoricalDataset<B> {
    pub fn n_samples(&self) -> usize {
        self.y.len()
    }
}

fn validate(config: &SyntheticConfig) -> Result<usize, PreprocessingError> {
    if config.n_samples == 0 {
        return Err(PreprocessingError::InvalidParameter(
            "n_samples must be positive".to_string(),
        ));
    }
    if config.n_categories < 2 {
        return Err(PreprocessingError::InvalidParameter(format!(
            "n_categories must be at least 2, got {}",
            config.n_categories
        )));
    }
    if !(config.noise_scale.is_finite() && config.noise_scale >= 0.0) {
        return Err(PreprocessingError::InvalidParameter(format!(
            "noise_scale must be a non-negative finite number, got {}",
            config.noise_scale
        )));
    }
    if !(config.near_unique_fraction > 0.0 && config.near_unique_fraction <= 1.0) {
        return Err(PreprocessingError::InvalidParameter(format!(
            "near_unique_fraction must lie in (0, 1], got {}",
            config.near_unique_fraction
        )));
    }
    let near_unique = (config.near_unique_fraction * config.n_samples as f64).floor() as usize;
    if near_unique == 0 {
        return Err(PreprocessingError::InvalidParameter(format!(
            "near_unique_fraction {} leaves no categories for {} samples",
            config.near_unique_fraction, config.n_samples
        )));
    }
    Ok(near_unique)
}

/// Builds the three-column dataset described in the module docs.
///
/// Deterministic for a given `config.seed`.
pub fn make_target_encoding_dataset<B: Backend>(
    config: &SyntheticConfig,
) -> Result<CategoricalDataset<B>, PreprocessingError> {
    let near_unique_cardinality = validate(config)?;
    let n = config.n_samples;
    let mut rng = Pcg64::seed_from_u64(config.seed);

    let y: Vec<f64> = (0..n).map(|_| rng.sample(StandardNormal)).collect();
    let noisy: Vec<f64> = y
        .iter()
        .map(|&t| {
            let z: f64 = rng.sample(StandardNormal);
            t + config.noise_scale * z
        })
        .collect();

    let binned = KBinsDiscretizer::<B>::new()
        .with_n_bins(config.n_categories)
        .with_strategy(BinStrategy::Uniform)
        .fit_transform(&Tensor2D::from_f64(noisy, n, 1))?
        .ravel();

    // hide the ordering of the bins behind a random relabelling
    let mut relabel: Vec<usize> = (0..config.n_categories).collect();
    relabel.shuffle(&mut rng);
    let informative: Vec<f64> = binned
        .iter()
        .map(|&b| relabel[b as usize] as f64)
        .collect();

    let mut shuffled = informative.clone();
    shuffled.shuffle(&mut rng);

    let near_unique: Vec<f64> = (0..n)
        .map(|_| rng.random_range(0..near_unique_cardinality) as f64)
        .collect();

    let mut data = Vec::with_capacity(n * 3);
    for i in 0..n {
        data.extend_from_slice(&[informative[i], shuffled[i], near_unique[i]]);
    }

    tracing::debug!(
        n_samples = n,
        n_categories = config.n_categories,
        near_unique_cardinality,
        "generated synthetic target-encoding dataset"
    );

    Ok(CategoricalDataset {
        x: Tensor2D::from_f64(data, n, 3),
        y: Tensor1D::from_f64(y),
        feature_names: ["informative", "shuffled", "near_unique"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    })
}
