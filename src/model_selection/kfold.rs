use super::SplitError;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

/// K-fold partition of `0..n_samples`.
///
/// Every index lands in exactly one test fold. Fold sizes differ by at most
/// one: the first `n_samples % n_splits` folds take the extra sample. Without
/// shuffling the folds are contiguous blocks.
///
/// # Example
/// ```
/// use targetenc_rs::model_selection::KFold;
///
/// let kfold = KFold::new(3).unwrap().with_shuffle(42);
/// let folds = kfold.split(10).unwrap();
/// assert_eq!(folds.len(), 3);
/// assert_eq!(folds[0].1.len(), 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KFold {
    n_splits: usize,
    seed: Option<u64>,
}

impl KFold {
    /// Creates a splitter with `n_splits` folds (at least 2).
    pub fn new(n_splits: usize) -> Result<Self, SplitError> {
        if n_splits < 2 {
            return Err(SplitError::InvalidParameter(format!(
                "n_splits must be at least 2, got {}",
                n_splits
            )));
        }
        Ok(Self {
            n_splits,
            seed: None,
        })
    }

    /// Shuffle indices with the given seed before partitioning.
    pub fn with_shuffle(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn num_splits(&self) -> usize {
        self.n_splits
    }

    /// Returns `(train_indices, test_indices)` for every fold, both sorted.
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>, SplitError> {
        if n_samples < self.n_splits {
            return Err(SplitError::TooFewSamples {
                needed: self.n_splits,
                got: n_samples,
            });
        }

        let mut order: Vec<usize> = (0..n_samples).collect();
        if let Some(seed) = self.seed {
            let mut rng = Pcg64::seed_from_u64(seed);
            order.shuffle(&mut rng);
        }

        let base = n_samples / self.n_splits;
        let extra = n_samples % self.n_splits;
        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < extra);
            let stop = start + size;

            let mut in_test = vec![false; n_samples];
            for &i in &order[start..stop] {
                in_test[i] = true;
            }
            let (test, train): (Vec<usize>, Vec<usize>) =
                (0..n_samples).partition(|&i| in_test[i]);
            folds.push((train, test));
            start = stop;
        }
        Ok(folds)
    }

    /// Returns the split for a single fold.
    pub fn get_split(
        &self,
        fold: usize,
        n_samples: usize,
    ) -> Result<(Vec<usize>, Vec<usize>), SplitError> {
        if fold >= self.n_splits {
            return Err(SplitError::InvalidParameter(format!(
                "fold {} out of range for {} splits",
                fold, self.n_splits
            )));
        }
        let mut folds = self.split(n_samples)?;
        Ok(folds.swap_remove(fold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kfold_rejects_single_split() {
        assert!(matches!(
            KFold::new(1),
            Err(SplitError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_kfold_contiguous_without_shuffle() {
        let folds = KFold::new(3).unwrap().split(7).unwrap();
        assert_eq!(folds[0].1, vec![0, 1, 2]);
        assert_eq!(folds[1].1, vec![3, 4]);
        assert_eq!(folds[2].1, vec![5, 6]);
        assert_eq!(folds[1].0, vec![0, 1, 2, 5, 6]);
    }

    #[test]
    fn test_kfold_every_index_tested_once() {
        let n = 53;
        let folds = KFold::new(5).unwrap().with_shuffle(7).split(n).unwrap();
        let mut seen = vec![0usize; n];
        for (train, test) in &folds {
            assert_eq!(train.len() + test.len(), n);
            for &i in test {
                seen[i] += 1;
            }
            assert!(train.iter().all(|i| !test.contains(i)));
        }
        assert!(seen.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_kfold_shuffle_is_deterministic() {
        let a = KFold::new(4).unwrap().with_shuffle(11).split(40).unwrap();
        let b = KFold::new(4).unwrap().with_shuffle(11).split(40).unwrap();
        let c = KFold::new(4).unwrap().with_shuffle(12).split(40).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_kfold_too_few_samples() {
        let err = KFold::new(5).unwrap().split(4).unwrap_err();
        assert!(matches!(err, SplitError::TooFewSamples { needed: 5, got: 4 }));
    }

    #[test]
    fn test_get_split_matches_split() {
        let kfold = KFold::new(3).unwrap().with_shuffle(3);
        let all = kfold.split(9).unwrap();
        assert_eq!(kfold.get_split(2, 9).unwrap(), all[2]);
        assert!(kfold.get_split(3, 9).is_err());
    }
}
