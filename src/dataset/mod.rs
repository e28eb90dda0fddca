//! Datasets used to exercise the encoders.

mod synthetic;

pub use synthetic::{make_target_encoding_dataset, CategoricalDataset, SyntheticConfig};
