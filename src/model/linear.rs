//! Linear regression model with compile-time state tracking.
//!
//! - `LinearModel<B, Unfitted>`: zero-initialized parameters, the starting
//!   point handed to an estimator.
//! - `LinearModel<B, Fitted>`: inference-only, serializable predictor
//!   `y = w^T x + b`.
//!
//! A fitted model is free from training hyperparameters: the regularization
//! strength and solver that produced it are not stored.

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::metrics::r2_score;
use crate::model::{Fitted, InferenceModel, ModelError, Unfitted};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Weights and bias of a linear model.
#[derive(Clone, Debug)]
pub struct LinearParams<B: Backend> {
    pub weights: Tensor1D<B>,
    pub bias: Scalar<B>,
}

/// Serializable representation of linear model parameters.
///
/// Stored as `f64` so that a model restored from disk predicts exactly what
/// the saved one did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableLinearParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl<B: Backend> From<&LinearParams<B>> for SerializableLinearParams {
    fn from(params: &LinearParams<B>) -> Self {
        Self {
            weights: params.weights.to_vec(),
            bias: params.bias.to_f64(),
        }
    }
}

impl<B: Backend> TryFrom<SerializableLinearParams> for LinearParams<B> {
    type Error = ModelError;

    fn try_from(value: SerializableLinearParams) -> Result<Self, Self::Error> {
        if value.weights.iter().any(|w| !w.is_finite()) || !value.bias.is_finite() {
            return Err(ModelError::InvalidParameter(
                "linear model parameters must be finite".to_string(),
            ));
        }
        Ok(Self {
            weights: Tensor1D::from_f64(value.weights),
            bias: Scalar::new(value.bias),
        })
    }
}

/// A linear model with state encoded at the type level.
///
/// `predict()` only exists on `LinearModel<B, Fitted>`.
pub struct LinearModel<B: Backend, S> {
    params: LinearParams<B>,
    _state: PhantomData<S>,
}

impl<B: Backend, S> Clone for LinearModel<B, S> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            _state: PhantomData,
        }
    }
}

impl<B: Backend, S> std::fmt::Debug for LinearModel<B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearModel")
            .field("weights", &self.params.weights)
            .field("bias", &self.params.bias.to_f64())
            .finish()
    }
}

impl<B: Backend, S> LinearModel<B, S> {
    pub fn params(&self) -> &LinearParams<B> {
        &self.params
    }

    /// Number of features the model expects.
    pub fn n_features(&self) -> usize {
        self.params.weights.len()
    }
}

/// Alias for an **unfitted** linear regression model.
pub type LinearRegression<B> = LinearModel<B, Unfitted>;

impl<B: Backend> LinearModel<B, Unfitted> {
    /// Creates a model with zero weights and zero bias.
    pub fn zeros(n_features: usize) -> Self {
        Self {
            params: LinearParams {
                weights: Tensor1D::zeros(n_features),
                bias: Scalar::new(0.0),
            },
            _state: PhantomData,
        }
    }

    /// Replaces the parameters.
    ///
    /// # Errors
    /// Returns [`ModelError::FeatureMismatch`] if the weight count changes.
    pub fn update_params(&mut self, params: LinearParams<B>) -> Result<(), ModelError> {
        if params.weights.len() != self.n_features() {
            return Err(ModelError::FeatureMismatch {
                expected_features: self.n_features(),
                got_features: params.weights.len(),
            });
        }
        self.params = params;
        Ok(())
    }

    pub fn into_fitted(self) -> LinearModel<B, Fitted> {
        LinearModel::<B, Fitted>::new(self.params)
    }
}

impl<B: Backend> LinearModel<B, Fitted> {
    /// Creates a fitted linear model from trained parameters.
    pub fn new(params: LinearParams<B>) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    /// Learned weights, one per feature.
    pub fn coefficients(&self) -> Vec<f64> {
        self.params.weights.to_vec()
    }

    pub fn intercept(&self) -> f64 {
        self.params.bias.to_f64()
    }

    /// Coefficient of determination of the predictions on `x` against `y`.
    pub fn score(&self, x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<f64, ModelError> {
        let predictions = self.predict_batch(x)?;
        r2_score(y, &predictions)
    }
}

impl<B: Backend> InferenceModel<B> for LinearModel<B, Fitted> {
    type InputSingle = Tensor1D<B>;
    type InputBatch = Tensor2D<B>;
    type OutputSingle = Scalar<B>;
    type OutputBatch = Tensor1D<B>;
    type ParamsRepr = SerializableLinearParams;

    fn predict(&self, input: &Self::InputSingle) -> Result<Self::OutputSingle, ModelError> {
        if input.len() != self.n_features() {
            return Err(ModelError::FeatureMismatch {
                expected_features: self.n_features(),
                got_features: input.len(),
            });
        }
        Ok(self.params.weights.dot(input) + self.params.bias)
    }

    fn predict_batch(&self, input: &Self::InputBatch) -> Result<Self::OutputBatch, ModelError> {
        if input.n_cols() != self.n_features() {
            return Err(ModelError::FeatureMismatch {
                expected_features: self.n_features(),
                got_features: input.n_cols(),
            });
        }
        Ok(input.dot(&self.params.weights).add_scalar(&self.params.bias))
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self, ModelError> {
        Ok(Self::new(LinearParams::try_from(params)?))
    }
}
