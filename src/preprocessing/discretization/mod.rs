//! Discretization of continuous features into ordinal bins.

mod kbins;

pub use kbins::{BinStrategy, FittedKBinsDiscretizer, KBinsDiscretizer, KBinsDiscretizerParams};
