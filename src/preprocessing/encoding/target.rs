//! Target encoding for categorical features with a continuous target.
//!
//! Each category is replaced by a shrunk estimate of the target mean over the
//! rows sharing that category. [`SupervisedTransformer::fit_transform`] cross
//! fits: the encoding of a training row is learned from the other folds, so a
//! row's own target never reaches its own feature value.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::model_selection::KFold;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, SupervisedTransformer};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;

/// Shrinkage of per-category means towards the global target mean.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Smoothing {
    /// Empirical Bayes weight from the within-category and global variance.
    #[default]
    Auto,
    /// Fixed pseudo-count `m`: `(sum_c + m * mean) / (n_c + m)`.
    Fixed(f64),
}

/// Unfitted target encoder.
///
/// # Example
/// ```ignore
/// use targetenc_rs::preprocessing::{SupervisedTransformer, TargetEncoder};
/// use targetenc_rs::backend::CpuBackend;
///
/// let encoder = TargetEncoder::<CpuBackend>::new().with_random_state(0);
///
/// // cross-fitted encoding for training
/// let (fitted, x_train_enc) = encoder.fit_transform(&x_train, &y_train)?;
/// // full-data encoding for anything else
/// let x_test_enc = fitted.transform(&x_test)?;
/// ```
#[derive(Clone, Debug)]
pub struct TargetEncoder<B: Backend> {
    smooth: Smoothing,
    cv: usize,
    shuffle: bool,
    random_state: Option<u64>,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for TargetEncoder<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> TargetEncoder<B> {
    /// Auto smoothing, 5 shuffled folds, unseeded.
    pub fn new() -> Self {
        Self {
            smooth: Smoothing::Auto,
            cv: 5,
            shuffle: true,
            random_state: None,
            _backend: PhantomData,
        }
    }

    pub fn with_smooth(mut self, smooth: Smoothing) -> Self {
        self.smooth = smooth;
        self
    }

    /// Number of cross-fitting folds used by `fit_transform`.
    pub fn with_cv(mut self, cv: usize) -> Self {
        self.cv = cv;
        self
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// Seed for the fold shuffle. Ignored when shuffling is off.
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    fn validate(&self) -> Result<(), PreprocessingError> {
        if let Smoothing::Fixed(m) = self.smooth {
            if !(m.is_finite() && m >= 0.0) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "smooth must be a non-negative finite number, got {}",
                    m
                )));
            }
        }
        if self.cv < 2 {
            return Err(PreprocessingError::InvalidParameter(format!(
                "cv must be at least 2, got {}",
                self.cv
            )));
        }
        Ok(())
    }

    fn kfold(&self) -> Result<KFold, PreprocessingError> {
        let kfold =
            KFold::new(self.cv).map_err(|e| PreprocessingError::InvalidParameter(e.to_string()))?;
        Ok(match (self.shuffle, self.random_state) {
            (false, _) => kfold,
            (true, Some(seed)) => kfold.with_shuffle(seed),
            (true, None) => kfold.with_shuffle(rand::rng().random()),
        })
    }
}

/// Validated categorical input: rounded codes in row-major order plus the target.
struct Observations {
    codes: Vec<i64>,
    y: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Observations {
    fn new<B: Backend>(x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<Self, PreprocessingError> {
        let (rows, cols) = x.shape();
        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit TargetEncoder on empty data".to_string(),
            ));
        }
        if y.len() != rows {
            return Err(PreprocessingError::LengthMismatch {
                x_rows: rows,
                y_len: y.len(),
            });
        }
        let y = y.to_vec();
        if let Some(v) = y.iter().find(|v| !v.is_finite()) {
            return Err(PreprocessingError::MissingValues(format!(
                "TargetEncoder expects a finite target, got {}",
                v
            )));
        }
        Ok(Self {
            codes: category_codes(x)?,
            y,
            rows,
            cols,
        })
    }
}

fn category_codes<B: Backend>(x: &Tensor2D<B>) -> Result<Vec<i64>, PreprocessingError> {
    let (_, cols) = x.shape();
    x.ravel()
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            if v.is_finite() {
                Ok(v.round() as i64)
            } else {
                Err(PreprocessingError::MissingValues(format!(
                    "TargetEncoder expects finite categories, got {} at ({}, {})",
                    v,
                    i / cols,
                    i % cols
                )))
            }
        })
        .collect()
}

/// Per-category encodings learned from a subset of rows.
struct ColumnEncoding {
    categories: Vec<i64>,
    encodings: Vec<f64>,
}

/// Learns every column's encoding from the rows in `subset`.
fn learn_encodings(
    obs: &Observations,
    subset: &[usize],
    smooth: Smoothing,
) -> (Vec<ColumnEncoding>, f64) {
    let n = subset.len() as f64;
    let mean = subset.iter().map(|&r| obs.y[r]).sum::<f64>() / n;
    let variance = subset
        .iter()
        .map(|&r| (obs.y[r] - mean).powi(2))
        .sum::<f64>()
        / n;

    let columns = (0..obs.cols)
        .map(|col| {
            let mut stats: BTreeMap<i64, (usize, f64)> = BTreeMap::new();
            for &r in subset {
                let entry = stats.entry(obs.codes[r * obs.cols + col]).or_insert((0, 0.0));
                entry.0 += 1;
                entry.1 += obs.y[r];
            }

            let encodings = match smooth {
                Smoothing::Fixed(m) => stats
                    .values()
                    .map(|&(count, sum)| (sum + m * mean) / (count as f64 + m))
                    .collect(),
                Smoothing::Auto => {
                    let mut sq_dev: BTreeMap<i64, f64> = BTreeMap::new();
                    for &r in subset {
                        let code = obs.codes[r * obs.cols + col];
                        let (count, sum) = stats[&code];
                        let d = obs.y[r] - sum / count as f64;
                        *sq_dev.entry(code).or_insert(0.0) += d * d;
                    }
                    stats
                        .iter()
                        .map(|(code, &(count, sum))| {
                            let n_c = count as f64;
                            let within = sq_dev[code] / n_c;
                            let lambda = variance * n_c / (variance * n_c + within);
                            if lambda.is_nan() {
                                mean
                            } else {
                                lambda * (sum / n_c) + (1.0 - lambda) * mean
                            }
                        })
                        .collect()
                }
            };

            ColumnEncoding {
                categories: stats.into_keys().collect(),
                encodings,
            }
        })
        .collect();

    (columns, mean)
}

impl<B: Backend> SupervisedTransformer<B> for TargetEncoder<B> {
    type Fitted = FittedTargetEncoder<B>;

    /// Learns full-data encodings. The returned encoder's `transform` is what
    /// unseen data should go through.
    fn fit(&self, x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<Self::Fitted, PreprocessingError> {
        self.validate()?;
        let obs = Observations::new(x, y)?;
        let all: Vec<usize> = (0..obs.rows).collect();
        let (columns, target_mean) = learn_encodings(&obs, &all, self.smooth);

        for (col, c) in columns.iter().enumerate() {
            tracing::debug!(column = col, n_categories = c.categories.len(), "learned target encodings");
        }

        FittedTargetEncoder::from_params(TargetEncoderParams {
            categories_: columns.iter().map(|c| c.categories.clone()).collect(),
            encodings_: columns.into_iter().map(|c| c.encodings).collect(),
            target_mean,
            smooth: self.smooth,
            n_features_in: obs.cols,
        })
    }

    /// Fits on the full data and returns the cross-fitted training encoding.
    ///
    /// The output differs from `fit(x, y)?.transform(x)`: every row is
    /// encoded with statistics from the folds it does not belong to.
    fn fit_transform(
        &self,
        x: &Tensor2D<B>,
        y: &Tensor1D<B>,
    ) -> Result<(Self::Fitted, Tensor2D<B>), PreprocessingError> {
        let fitted = self.fit(x, y)?;
        let obs = Observations::new(x, y)?;

        let folds = self
            .kfold()?
            .split(obs.rows)
            .map_err(|e| PreprocessingError::InvalidParameter(e.to_string()))?;

        let mut out = vec![0.0; obs.rows * obs.cols];
        for (fold, (train, test)) in folds.iter().enumerate() {
            let (columns, fold_mean) = learn_encodings(&obs, train, self.smooth);
            for (col, enc) in columns.iter().enumerate() {
                for &r in test {
                    let code = obs.codes[r * obs.cols + col];
                    out[r * obs.cols + col] = match enc.categories.binary_search(&code) {
                        Ok(pos) => enc.encodings[pos],
                        Err(_) => fold_mean,
                    };
                }
            }
            tracing::debug!(
                fold,
                n_train = train.len(),
                n_test = test.len(),
                fold_mean,
                "cross-fitted target encoding fold"
            );
        }

        Ok((fitted, Tensor2D::from_f64(out, obs.rows, obs.cols)))
    }
}

/// Serializable parameters for a fitted target encoder.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TargetEncoderParams {
    /// Sorted categories for each input column.
    pub categories_: Vec<Vec<i64>>,
    /// Encoding of each category, aligned with `categories_`.
    pub encodings_: Vec<Vec<f64>>,
    /// Mean of the target seen during fit.
    pub target_mean: f64,
    pub smooth: Smoothing,
    /// Number of input features.
    pub n_features_in: usize,
}

/// Fitted target encoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedTargetEncoder<B: Backend> {
    categories_: Vec<Vec<i64>>,
    encodings_: Vec<Vec<f64>>,
    lookup: Vec<HashMap<i64, f64>>,
    target_mean: f64,
    smooth: Smoothing,
    n_features_in: usize,
    _backend: PhantomData<B>,
}

impl<B: Backend> FittedTargetEncoder<B> {
    /// Sorted categories learned for each feature.
    pub fn categories(&self) -> &[Vec<i64>] {
        &self.categories_
    }

    /// Full-data encodings, aligned with [`categories`](Self::categories).
    pub fn encodings(&self) -> &[Vec<f64>] {
        &self.encodings_
    }

    /// Target mean used for unknown categories.
    pub fn target_mean(&self) -> f64 {
        self.target_mean
    }

    pub fn smooth(&self) -> Smoothing {
        self.smooth
    }

    /// Encoding of a single category, if it was seen during fit.
    pub fn encoding_of(&self, column: usize, category: i64) -> Option<f64> {
        self.lookup.get(column)?.get(&category).copied()
    }
}

impl<B: Backend> FittedTransformer<B> for FittedTargetEncoder<B> {
    type Input = Tensor2D<B>;
    type Output = Tensor2D<B>;
    type Params = TargetEncoderParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let (rows, cols) = data.shape();
        if cols != self.n_features_in {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.n_features_in,
                got_features: cols,
            });
        }

        let out = category_codes(data)?
            .into_iter()
            .enumerate()
            .map(|(i, code)| {
                self.lookup[i % cols]
                    .get(&code)
                    .copied()
                    .unwrap_or(self.target_mean)
            })
            .collect();
        Ok(Tensor2D::from_f64(out, rows, cols))
    }

    fn extract_params(&self) -> Self::Params {
        TargetEncoderParams {
            categories_: self.categories_.clone(),
            encodings_: self.encodings_.clone(),
            target_mean: self.target_mean,
            smooth: self.smooth,
            n_features_in: self.n_features_in,
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.categories_.len() != params.n_features_in
            || params.encodings_.len() != params.n_features_in
        {
            return Err(PreprocessingError::InvalidParameter(
                "categories and encodings must cover every feature".to_string(),
            ));
        }
        let mut lookup = Vec::with_capacity(params.n_features_in);
        for (col, (cats, encs)) in params.categories_.iter().zip(&params.encodings_).enumerate() {
            if cats.len() != encs.len() {
                return Err(PreprocessingError::InvalidShape {
                    expected: format!("{} encodings for column {}", cats.len(), col),
                    got: encs.len().to_string(),
                });
            }
            lookup.push(cats.iter().copied().zip(encs.iter().copied()).collect());
        }

        Ok(Self {
            categories_: params.categories_,
            encodings_: params.encodings_,
            lookup,
            target_mean: params.target_mean,
            smooth: params.smooth,
            n_features_in: params.n_features_in,
            _backend: PhantomData,
        })
    }

    fn n_features_in(&self) -> usize {
        self.n_features_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    type B = CpuBackend;

    fn single_column(codes: &[f64]) -> Tensor2D<B> {
        Tensor2D::from_f64(codes.to_vec(), codes.len(), 1)
    }

    #[test]
    fn test_fixed_smoothing_formula() {
        // category 0: y = 1, 3; category 1: y = 8
        let x = single_column(&[0.0, 0.0, 1.0]);
        let y = Tensor1D::<B>::from_f64(vec![1.0, 3.0, 8.0]);
        let fitted = TargetEncoder::<B>::new()
            .with_smooth(Smoothing::Fixed(1.0))
            .fit(&x, &y)
            .unwrap();

        assert_eq!(fitted.categories(), &[vec![0, 1]]);
        assert!((fitted.target_mean() - 4.0).abs() < 1e-12);
        // (4 + 4) / 3 and (8 + 4) / 2
        assert!((fitted.encodings()[0][0] - 8.0 / 3.0).abs() < 1e-12);
        assert!((fitted.encodings()[0][1] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_smoothing_is_category_mean() {
        let x = single_column(&[2.0, 2.0, 5.0, 5.0]);
        let y = Tensor1D::<B>::from_f64(vec![1.0, 2.0, 10.0, 20.0]);
        let fitted = TargetEncoder::<B>::new()
            .with_smooth(Smoothing::Fixed(0.0))
            .fit(&x, &y)
            .unwrap();
        assert_eq!(fitted.encoding_of(0, 2), Some(1.5));
        assert_eq!(fitted.encoding_of(0, 5), Some(15.0));
        assert_eq!(fitted.encoding_of(0, 7), None);
    }

    #[test]
    fn test_auto_smoothing_formula() {
        // y mean 2.5, population variance 1.25
        let x = single_column(&[0.0, 0.0, 1.0, 1.0]);
        let y = Tensor1D::<B>::from_f64(vec![1.0, 2.0, 3.0, 4.0]);
        let fitted = TargetEncoder::<B>::new().fit(&x, &y).unwrap();

        // within-category variance 0.25, lambda = 2.5 / 2.75
        let lambda = 2.5 / 2.75;
        let expected_0 = lambda * 1.5 + (1.0 - lambda) * 2.5;
        let expected_1 = lambda * 3.5 + (1.0 - lambda) * 2.5;
        assert!((fitted.encodings()[0][0] - expected_0).abs() < 1e-12);
        assert!((fitted.encodings()[0][1] - expected_1).abs() < 1e-12);
    }

    #[test]
    fn test_auto_smoothing_constant_target_falls_back_to_mean() {
        let x = single_column(&[0.0, 1.0, 1.0]);
        let y = Tensor1D::<B>::from_f64(vec![3.0, 3.0, 3.0]);
        let fitted = TargetEncoder::<B>::new().fit(&x, &y).unwrap();
        assert_eq!(fitted.encodings()[0], vec![3.0, 3.0]);
    }

    #[test]
    fn test_transform_unknown_category_uses_target_mean() {
        let x = single_column(&[0.0, 1.0]);
        let y = Tensor1D::<B>::from_f64(vec![0.0, 10.0]);
        let fitted = TargetEncoder::<B>::new()
            .with_smooth(Smoothing::Fixed(0.0))
            .fit(&x, &y)
            .unwrap();

        let out = fitted.transform(&single_column(&[1.0, 42.0, 0.4])).unwrap();
        // 0.4 rounds to category 0
        assert_eq!(out.ravel(), vec![10.0, 5.0, 0.0]);
    }

    #[test]
    fn test_fit_transform_does_not_leak_unique_categories() {
        // every row is its own category: the training encoding must not see y
        let n = 50;
        let codes: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y_vals: Vec<f64> = (0..n).map(|i| (i * 7 % 13) as f64).collect();
        let x = single_column(&codes);
        let y = Tensor1D::<B>::from_f64(y_vals.clone());

        let encoder = TargetEncoder::<B>::new()
            .with_smooth(Smoothing::Fixed(0.0))
            .with_random_state(0);
        let (fitted, cross_fitted) = encoder.fit_transform(&x, &y).unwrap();

        // non-CV encoding reproduces the target exactly
        assert_eq!(fitted.transform(&x).unwrap().ravel(), y_vals);

        // CV encoding only ever sees the mean of the other folds
        let folds = KFold::new(5).unwrap().with_shuffle(0).split(n).unwrap();
        let cf = cross_fitted.ravel();
        for (train, test) in folds {
            let mean = train.iter().map(|&r| y_vals[r]).sum::<f64>() / train.len() as f64;
            for r in test {
                assert!((cf[r] - mean).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_fit_transform_is_reproducible_with_seed() {
        let x = Tensor2D::<B>::from_f64(
            (0..40).map(|i| (i % 4) as f64).chain((0..40).map(|i| (i % 7) as f64)).collect(),
            40,
            2,
        );
        let y = Tensor1D::<B>::from_f64((0..40).map(|i| i as f64 * 0.5).collect());
        let encoder = TargetEncoder::<B>::new().with_random_state(11);

        let (_, a) = encoder.fit_transform(&x, &y).unwrap();
        let (_, b) = encoder.fit_transform(&x, &y).unwrap();
        assert_eq!(a.ravel(), b.ravel());
        assert_eq!(a.shape(), (40, 2));
    }

    #[test]
    fn test_invalid_inputs() {
        let x = single_column(&[0.0, 1.0, 2.0]);
        let y = Tensor1D::<B>::from_f64(vec![1.0, 2.0, 3.0]);

        assert!(matches!(
            TargetEncoder::<B>::new().with_cv(1).fit(&x, &y),
            Err(PreprocessingError::InvalidParameter(_))
        ));
        assert!(matches!(
            TargetEncoder::<B>::new()
                .with_smooth(Smoothing::Fixed(-1.0))
                .fit(&x, &y),
            Err(PreprocessingError::InvalidParameter(_))
        ));
        assert!(matches!(
            TargetEncoder::<B>::new().fit(&x, &Tensor1D::from_f64(vec![1.0])),
            Err(PreprocessingError::LengthMismatch { x_rows: 3, y_len: 1 })
        ));
        assert!(matches!(
            TargetEncoder::<B>::new().fit(&single_column(&[0.0, f64::NAN, 1.0]), &y),
            Err(PreprocessingError::MissingValues(_))
        ));
        // fewer rows than folds
        assert!(TargetEncoder::<B>::new().fit_transform(&x, &y).is_err());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let x = single_column(&[0.0, 1.0, 1.0, 3.0]);
        let y = Tensor1D::<B>::from_f64(vec![1.0, 2.0, 4.0, 8.0]);
        let fitted = TargetEncoder::<B>::new().fit(&x, &y).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("target_encoder.bin");
        fitted.save_to_file(&path).unwrap();
        let loaded = FittedTargetEncoder::<B>::load_from_file(&path).unwrap();

        assert_eq!(loaded.categories(), fitted.categories());
        assert_eq!(loaded.target_mean(), fitted.target_mean());
        assert_eq!(loaded.smooth(), Smoothing::Auto);
        assert_eq!(
            loaded.transform(&x).unwrap().ravel(),
            fitted.transform(&x).unwrap().ravel()
        );
    }
}
