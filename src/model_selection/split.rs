use super::SplitError;
use crate::backend::{Backend, Tensor1D, Tensor2D};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

/// The four pieces of a hold-out split.
#[derive(Clone, Debug)]
pub struct TrainTestSplit<B: Backend> {
    pub x_train: Tensor2D<B>,
    pub x_test: Tensor2D<B>,
    pub y_train: Tensor1D<B>,
    pub y_test: Tensor1D<B>,
}

/// Shuffled `(train, test)` indices for `n_samples` rows.
///
/// `n_test = ceil(test_fraction * n_samples)`; the test indices are the
/// first `n_test` entries of a seeded permutation and the train indices the
/// rest, both in permutation order.
pub fn split_indices(
    n_samples: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), SplitError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SplitError::InvalidParameter(format!(
            "test_fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }
    let n_test = (test_fraction * n_samples as f64).ceil() as usize;
    if n_test == 0 || n_test >= n_samples {
        return Err(SplitError::TooFewSamples {
            needed: 2,
            got: n_samples,
        });
    }

    let mut permutation: Vec<usize> = (0..n_samples).collect();
    let mut rng = Pcg64::seed_from_u64(seed);
    permutation.shuffle(&mut rng);

    let train = permutation.split_off(n_test);
    Ok((train, permutation))
}

/// Randomly splits `x`/`y` into train and test subsets.
///
/// # Example
/// ```
/// use targetenc_rs::backend::{CpuBackend, Tensor1D, Tensor2D};
/// use targetenc_rs::model_selection::train_test_split;
///
/// let x = Tensor2D::<CpuBackend>::new((0..8).map(|v| v as f32).collect(), 8, 1);
/// let y = Tensor1D::<CpuBackend>::new((0..8).map(|v| v as f32).collect());
/// let split = train_test_split(&x, &y, 0.25, 0).unwrap();
/// assert_eq!(split.x_test.shape(), (2, 1));
/// assert_eq!(split.y_train.len(), 6);
/// ```
pub fn train_test_split<B: Backend>(
    x: &Tensor2D<B>,
    y: &Tensor1D<B>,
    test_fraction: f64,
    seed: u64,
) -> Result<TrainTestSplit<B>, SplitError> {
    let (rows, _) = x.shape();
    if rows != y.len() {
        return Err(SplitError::LengthMismatch {
            x_rows: rows,
            y_len: y.len(),
        });
    }
    let (train, test) = split_indices(rows, test_fraction, seed)?;
    tracing::debug!(n_train = train.len(), n_test = test.len(), "train/test split");

    Ok(TrainTestSplit {
        x_train: x.select_rows(&train)?,
        x_test: x.select_rows(&test)?,
        y_train: y.select(&train)?,
        y_test: y.select(&test)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_split_sizes_round_test_up() {
        let (train, test) = split_indices(10, 0.25, 0).unwrap();
        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 7);

        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_rejects_bad_fraction() {
        assert!(split_indices(10, 0.0, 0).is_err());
        assert!(split_indices(10, 1.0, 0).is_err());
        assert!(split_indices(10, f64::NAN, 0).is_err());
    }

    #[test]
    fn test_split_needs_two_samples() {
        assert!(matches!(
            split_indices(1, 0.5, 0),
            Err(SplitError::TooFewSamples { .. })
        ));
    }

    #[test]
    fn test_train_test_split_keeps_rows_aligned() {
        // y equals the first feature, so alignment is easy to check
        let n = 20;
        let x_data: Vec<f32> = (0..n).flat_map(|i| [i as f32, -(i as f32)]).collect();
        let x = Tensor2D::<CpuBackend>::new(x_data, n, 2);
        let y = Tensor1D::<CpuBackend>::new((0..n).map(|i| i as f32).collect());

        let split = train_test_split(&x, &y, 0.25, 5).unwrap();
        assert_eq!(split.x_test.n_rows(), 5);
        assert_eq!(split.x_train.n_rows(), 15);
        let first_col = split.x_train.column_at(0).unwrap().to_vec();
        assert_eq!(first_col, split.y_train.to_vec());
    }

    #[test]
    fn test_train_test_split_length_mismatch() {
        let x = Tensor2D::<CpuBackend>::zeros(4, 1);
        let y = Tensor1D::<CpuBackend>::zeros(3);
        assert!(matches!(
            train_test_split(&x, &y, 0.25, 0),
            Err(SplitError::LengthMismatch { x_rows: 4, y_len: 3 })
        ));
    }
}
