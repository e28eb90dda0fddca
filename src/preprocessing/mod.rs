//! Data preprocessing transformers.
//!
//! Transformers follow the same type-state pattern as the models in this
//! library: an unfitted builder holding hyperparameters produces a fitted
//! value that owns everything learned from the data and can be saved and
//! loaded.
//!
//! # Core Traits
//!
//! - [`Transformer`]: unsupervised, learns from features only
//! - [`SupervisedTransformer`]: learns from features and the target
//! - [`FittedTransformer`]: fitted transformer ready for inference
//!
//! # Available Transformers
//!
//! - [`KBinsDiscretizer`]: bin continuous features (uniform, quantile, k-means)
//! - [`TargetEncoder`]: replace categories with shrunk target means, cross
//!   fitted on the training data
//!
//! # Example
//!
//! ```ignore
//! use targetenc_rs::preprocessing::{FittedTransformer, SupervisedTransformer, TargetEncoder};
//! use targetenc_rs::backend::CpuBackend;
//!
//! let encoder = TargetEncoder::<CpuBackend>::new().with_random_state(0);
//! let (fitted, train_encoded) = encoder.fit_transform(&x_train, &y_train)?;
//!
//! fitted.save_to_file("encoder.bin")?;
//! let loaded = FittedTargetEncoder::load_from_file("encoder.bin")?;
//! let test_encoded = loaded.transform(&x_test)?;
//! ```

pub mod discretization;
pub mod encoding;
pub mod error;
pub mod traits;

pub use discretization::{
    BinStrategy, FittedKBinsDiscretizer, KBinsDiscretizer, KBinsDiscretizerParams,
};
pub use encoding::{FittedTargetEncoder, Smoothing, TargetEncoder, TargetEncoderParams};
pub use error::PreprocessingError;
pub use traits::{FittedTransformer, SupervisedTransformer, Transformer};
