//! Linear models and the traits that tie them to the rest of the crate.
//!
//! - [`Estimator`]: something that learns a fitted model from `(x, y)`.
//! - [`InferenceModel`]: a fitted model that predicts and can be saved.
//!
//! [`Ridge`] is the only estimator here; it produces a
//! [`LinearModel<B, Fitted>`](LinearModel).

pub mod error;
pub mod linear;
pub mod ridge;
mod solver;
pub mod state;

pub use error::ModelError;
pub use linear::{LinearModel, LinearParams, SerializableLinearParams};
pub use ridge::{Ridge, RidgeSolver};
pub use state::{Fitted, Unfitted};

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::serialization::SerializableParams;

/// A fitted model ready for prediction and serialization.
pub trait InferenceModel<B: Backend> {
    type InputSingle;
    type OutputSingle;
    type InputBatch;
    type OutputBatch;
    /// Serializable representation of the learned parameters.
    type ParamsRepr: SerializableParams;

    fn predict(&self, input: &Self::InputSingle) -> Result<Self::OutputSingle, ModelError>;
    fn predict_batch(&self, input: &Self::InputBatch) -> Result<Self::OutputBatch, ModelError>;

    fn extract_params(&self) -> Self::ParamsRepr;

    fn from_params(params: Self::ParamsRepr) -> Result<Self, ModelError>
    where
        Self: Sized;

    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        self.extract_params().write_to(path)
    }

    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ModelError>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let params = Self::ParamsRepr::from_bytes(&bytes)
            .map_err(|e| ModelError::SerializationError(e.to_string()))?;
        Self::from_params(params)
    }
}

/// An unfitted regressor: hyperparameters in, fitted model out.
pub trait Estimator<B: Backend>: Clone {
    type Fitted: InferenceModel<B, InputBatch = Tensor2D<B>, OutputBatch = Tensor1D<B>>;

    /// Learn a model from features `x` and target `y`.
    ///
    /// # Errors
    /// Returns [`ModelError`] if the data is empty, `x` and `y` disagree in
    /// length, or the hyperparameters are invalid.
    fn fit(&self, x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<Self::Fitted, ModelError>;
}
