//! # targetenc-rs
//!
//! Target encoding for high-cardinality categorical features, with the
//! cross fitting that keeps it from leaking the target, on top of a small
//! type-safe estimator library with pluggable backends.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: unfitted estimators and fitted models are
//!   different types (`TargetEncoder` vs `FittedTargetEncoder`,
//!   `LinearModel<B, Unfitted>` vs `LinearModel<B, Fitted>`), so inference on
//!   an untrained estimator does not compile.
//! - **Training/Inference Separation**: fitted values hold only what
//!   prediction needs and round-trip through plain serializable params.
//! - **Backend Agnosticism**: everything is generic over [`Backend`].
//! - **No Leakage by Default**: [`SupervisedPipeline`](pipeline::SupervisedPipeline)
//!   trains its estimator on the transformer's `fit_transform` output, which
//!   the target encoder computes out-of-fold.
//!
//! ## Quick Start
//!
//! ```rust
//! use targetenc_rs::backend::{CpuBackend, Tensor1D, Tensor2D};
//! use targetenc_rs::model::Ridge;
//! use targetenc_rs::pipeline::SupervisedPipeline;
//! use targetenc_rs::preprocessing::TargetEncoder;
//!
//! // one categorical column, target = 2 * category
//! let codes: Vec<f64> = (0..40).map(|i| (i % 4) as f64).collect();
//! let y = Tensor1D::<CpuBackend>::from_f64(codes.iter().map(|c| 2.0 * c).collect());
//! let x = Tensor2D::<CpuBackend>::from_f64(codes, 40, 1);
//!
//! let pipeline = SupervisedPipeline::new(
//!     TargetEncoder::new().with_random_state(0),
//!     Ridge::new().with_alpha(1e-6),
//! );
//! let fitted = pipeline.fit(&x, &y).unwrap();
//! assert!(fitted.score(&x, &y).unwrap() > 0.99);
//! ```
//!
//! ## Module Structure
//!
//! - `backend`: tensor abstractions and computation primitives
//! - `preprocessing`: `KBinsDiscretizer`, `TargetEncoder` and the transformer traits
//! - `model`: ridge regression producing fitted linear models
//! - `model_selection`: train/test and K-fold splitting
//! - `metrics`: R² and mean squared error
//! - `pipeline`: supervised transformer followed by an estimator
//! - `dataset`: the synthetic categorical dataset
//! - `config`, `report`, `workflow`: the `target-encoder-cv` demonstration
//! - `serialization`: parameter persistence

pub mod backend;

/// Configuration of the demonstration run.
pub mod config;

/// Synthetic datasets.
pub mod dataset;

/// Regression metrics.
pub mod metrics;

/// Linear models with compile-time state safety.
pub mod model;

/// Sample splitting utilities.
pub mod model_selection;

/// Preprocessing followed by an estimator.
pub mod pipeline;

/// Data preprocessing transformers.
pub mod preprocessing;

/// Score tables and coefficient charts.
pub mod report;

/// Model persistence.
pub mod serialization;

/// The cross-fitting comparison end to end.
pub mod workflow;

/// Re-export of core backend types for convenient usage.
pub use backend::{Backend, CpuBackend, ScalarOps, Tensor1D, Tensor2D};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Estimator, InferenceModel, Ridge};

    // Helper function to create (n, 1) matrix from column data
    fn col_to_tensor2d<B: Backend>(col: &[f32]) -> Tensor2D<B> {
        Tensor2D::<B>::new(col.to_vec(), col.len(), 1)
    }

    fn slice_to_tensor1d<B: Backend>(slice: &[f32]) -> Tensor1D<B> {
        Tensor1D::<B>::new(slice.to_vec())
    }

    #[test]
    fn test_linear_regression_identity() {
        // y = x
        let x = col_to_tensor2d::<CpuBackend>(&[1.0, 2.0, 3.0, 4.0]);
        let y = slice_to_tensor1d::<CpuBackend>(&[1.0, 2.0, 3.0, 4.0]);

        let fitted = Ridge::new().with_alpha(0.0).fit(&x, &y).unwrap();
        let pred = fitted
            .predict(&slice_to_tensor1d::<CpuBackend>(&[2.5]))
            .unwrap()
            .to_f64();
        assert!((pred - 2.5).abs() < 1e-9, "Expected ~2.5, got {}", pred);
    }

    #[test]
    fn test_linear_regression_with_bias() {
        // y = 2*x + 1
        let x = col_to_tensor2d::<CpuBackend>(&[0.0, 1.0, 2.0, 3.0]);
        let y = slice_to_tensor1d::<CpuBackend>(&[1.0, 3.0, 5.0, 7.0]);

        let fitted = Ridge::new().with_alpha(1e-8).fit(&x, &y).unwrap();
        for (input, expected) in [(0.0f32, 1.0), (1.0, 3.0), (3.0, 7.0)] {
            let p = fitted
                .predict(&slice_to_tensor1d::<CpuBackend>(&[input]))
                .unwrap()
                .to_f64();
            assert!((p - expected).abs() < 1e-6, "p({}) = {}", input, p);
        }
    }
}
