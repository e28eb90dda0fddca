//! Sample splitting: hold-out train/test splits and K-fold partitions.
//!
//! Both splitters are deterministic given a seed. Shuffling uses a seeded
//! `Pcg64` generator, so the same seed reproduces the same indices on every
//! platform.

mod kfold;
mod split;

pub use kfold::KFold;
pub use split::{split_indices, train_test_split, TrainTestSplit};

use crate::preprocessing::PreprocessingError;
use thiserror::Error;

/// Errors raised while splitting samples.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Invalid splitter configuration.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Not enough samples for the requested split.
    #[error("Too few samples: need at least {needed}, got {got}")]
    TooFewSamples { needed: usize, got: usize },
    /// `x` and `y` disagree on the number of samples.
    #[error("Length mismatch: {x_rows} rows in X, {y_len} targets")]
    LengthMismatch { x_rows: usize, y_len: usize },
    /// Gathering the selected rows failed.
    #[error(transparent)]
    Data(#[from] PreprocessingError),
}
