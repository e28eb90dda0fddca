//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: unsupervised fitting from features alone (e.g. discretizers).
//! - [`SupervisedTransformer`]: fitting that needs the target (e.g. target encoders).
//! - [`FittedTransformer`]: after fitting; ready for inference and serialization.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;

/// Unfitted transformer that learns from features only.
///
/// # Example
/// ```ignore
/// use targetenc_rs::preprocessing::{KBinsDiscretizer, Transformer};
/// use targetenc_rs::backend::CpuBackend;
///
/// let kbins = KBinsDiscretizer::<CpuBackend>::new().with_n_bins(10);
/// let fitted = kbins.fit(&data)?;
/// let binned = fitted.transform(&new_data)?;
/// ```
pub trait Transformer<B: Backend>: Clone {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<
        B,
        Params = Self::Params,
        Input = Self::Input,
        Output = Self::Output,
    >;

    /// Fit the transformer to the training data.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if data is empty, contains non-finite
    /// values, or the hyperparameters are invalid.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit the transformer and transform the same data.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        self.fit(data)?.transform(data)
    }
}

/// Unfitted transformer whose parameters depend on the target.
///
/// `fit_transform` is allowed to differ from `fit` followed by `transform`:
/// a transformer that would leak the target into its own training output
/// (a target encoder) produces the training output out-of-fold instead.
pub trait SupervisedTransformer<B: Backend>: Clone {
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<B, Input = Tensor2D<B>, Output = Tensor2D<B>>;

    /// Learn parameters from `x` and the target `y`.
    fn fit(&self, x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<Self::Fitted, PreprocessingError>;

    /// Learn parameters from `x`/`y` and produce the representation of `x`
    /// that a downstream estimator should be trained on.
    fn fit_transform(
        &self,
        x: &Tensor2D<B>,
        y: &Tensor1D<B>,
    ) -> Result<(Self::Fitted, Tensor2D<B>), PreprocessingError> {
        let fitted = self.fit(x, y)?;
        let transformed = fitted.transform(x)?;
        Ok((fitted, transformed))
    }
}

/// Fitted transformer ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `save_to_file` / `load_from_file` are cross-platform compatible.
pub trait FittedTransformer<B: Backend>: Clone {
    /// Input data type for transformation.
    type Input;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the feature count differs from fit
    /// or the input contains invalid values.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;

    /// Reverse the transformation, when the transformer supports it.
    fn inverse_transform(&self, _data: &Self::Output) -> Result<Self::Input, PreprocessingError> {
        Err(PreprocessingError::InvalidParameter(
            "inverse_transform is not supported by this transformer".to_string(),
        ))
    }

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>
    where
        Self: Sized;

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        self.extract_params().write_to(path)
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let params = Self::Params::from_bytes(&bytes)
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        Self::from_params(params)
    }

    /// Returns the number of features seen during fit.
    fn n_features_in(&self) -> usize;
}
