//! Encoders for categorical features.

mod target;

pub use target::{FittedTargetEncoder, Smoothing, TargetEncoder, TargetEncoderParams};
