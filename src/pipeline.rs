//! A supervised preprocessing step followed by an estimator.
//!
//! Fitting goes through the transformer's `fit_transform`, so a target
//! encoder in front of the estimator cross fits its training output, while
//! prediction goes through the fitted transformer's plain `transform`.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::metrics::r2_score;
use crate::model::{Estimator, InferenceModel, ModelError};
use crate::model_selection::SplitError;
use crate::preprocessing::{FittedTransformer, PreprocessingError, SupervisedTransformer};
use std::marker::PhantomData;
use thiserror::Error;

/// Error raised anywhere along a fit/predict workflow.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Preprocessing(#[from] PreprocessingError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Split(#[from] SplitError),
}

/// Unfitted pipeline: a supervised transformer and a final estimator.
///
/// # Example
/// ```ignore
/// use targetenc_rs::pipeline::SupervisedPipeline;
/// use targetenc_rs::preprocessing::TargetEncoder;
/// use targetenc_rs::model::Ridge;
///
/// let pipeline = SupervisedPipeline::new(
///     TargetEncoder::<CpuBackend>::new().with_random_state(0),
///     Ridge::new().with_alpha(1e-6),
/// );
/// let fitted = pipeline.fit(&x_train, &y_train)?;
/// let r2 = fitted.score(&x_test, &y_test)?;
/// ```
#[derive(Clone, Debug)]
pub struct SupervisedPipeline<B, T, E>
where
    B: Backend,
    T: SupervisedTransformer<B>,
    E: Estimator<B>,
{
    transformer: T,
    estimator: E,
    _backend: PhantomData<B>,
}

impl<B, T, E> SupervisedPipeline<B, T, E>
where
    B: Backend,
    T: SupervisedTransformer<B>,
    E: Estimator<B>,
{
    pub fn new(transformer: T, estimator: E) -> Self {
        Self {
            transformer,
            estimator,
            _backend: PhantomData,
        }
    }

    /// Fits the transformer with `fit_transform` and the estimator on its output.
    pub fn fit(
        &self,
        x: &Tensor2D<B>,
        y: &Tensor1D<B>,
    ) -> Result<FittedSupervisedPipeline<B, T::Fitted, E::Fitted>, PipelineError> {
        let (transformer, x_transformed) = self.transformer.fit_transform(x, y)?;
        let estimator = self.estimator.fit(&x_transformed, y)?;
        Ok(FittedSupervisedPipeline {
            transformer,
            estimator,
            _backend: PhantomData,
        })
    }
}

/// Fitted pipeline ready for inference.
#[derive(Clone, Debug)]
pub struct FittedSupervisedPipeline<B, F, M>
where
    B: Backend,
    F: FittedTransformer<B, Input = Tensor2D<B>, Output = Tensor2D<B>>,
    M: InferenceModel<B, InputBatch = Tensor2D<B>, OutputBatch = Tensor1D<B>>,
{
    transformer: F,
    estimator: M,
    _backend: PhantomData<B>,
}

impl<B, F, M> FittedSupervisedPipeline<B, F, M>
where
    B: Backend,
    F: FittedTransformer<B, Input = Tensor2D<B>, Output = Tensor2D<B>>,
    M: InferenceModel<B, InputBatch = Tensor2D<B>, OutputBatch = Tensor1D<B>>,
{
    /// Applies the fitted transformer (full-data statistics, no cross fitting).
    pub fn transform(&self, x: &Tensor2D<B>) -> Result<Tensor2D<B>, PipelineError> {
        Ok(self.transformer.transform(x)?)
    }

    pub fn predict(&self, x: &Tensor2D<B>) -> Result<Tensor1D<B>, PipelineError> {
        let transformed = self.transform(x)?;
        Ok(self.estimator.predict_batch(&transformed)?)
    }

    /// R² of the pipeline's predictions on `x` against `y`.
    pub fn score(&self, x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<f64, PipelineError> {
        let predictions = self.predict(x)?;
        Ok(r2_score(y, &predictions)?)
    }

    pub fn transformer(&self) -> &F {
        &self.transformer
    }

    /// The last step of the pipeline.
    pub fn final_estimator(&self) -> &M {
        &self.estimator
    }
}
