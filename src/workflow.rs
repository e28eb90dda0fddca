//! End-to-end comparison of target encoding with and without cross fitting.
//!
//! 1. generate the synthetic dataset and split it;
//! 2. fit ridge on the raw category codes;
//! 3. fit ridge behind a [`TargetEncoder`] inside a [`SupervisedPipeline`],
//!    which cross fits the training encoding;
//! 4. fit ridge on the encoder's plain `fit` + `transform` output, which
//!    leaks each row's target into its own encoding.

use crate::backend::Backend;
use crate::config::DemoConfig;
use crate::dataset::make_target_encoding_dataset;
use crate::model::{Estimator, Ridge};
use crate::model_selection::train_test_split;
use crate::pipeline::{PipelineError, SupervisedPipeline};
use crate::preprocessing::{FittedTransformer, SupervisedTransformer, TargetEncoder};
use crate::report::{CoefficientChart, ScoreReport};
use serde::Serialize;

/// Scores and coefficient charts of one run.
#[derive(Clone, Debug, Serialize)]
pub struct Comparison {
    pub scores: ScoreReport,
    pub cv_coefficients: CoefficientChart,
    pub no_cv_coefficients: CoefficientChart,
}

/// Runs the comparison described in the module docs.
pub fn compare_target_encodings<B: Backend>(
    config: &DemoConfig,
) -> Result<Comparison, PipelineError> {
    let dataset = make_target_encoding_dataset::<B>(&config.dataset)?;
    let split = train_test_split(&dataset.x, &dataset.y, config.test_fraction, config.split_seed)?;
    tracing::info!(
        n_train = split.y_train.len(),
        n_test = split.y_test.len(),
        "generated and split dataset"
    );

    let ridge = Ridge::<B>::new()
        .with_alpha(config.ridge_alpha)
        .with_solver(config.solver)
        .with_fit_intercept(config.fit_intercept);
    let encoder = TargetEncoder::<B>::new()
        .with_cv(config.cv_folds)
        .with_random_state(config.encoder_seed);

    let raw = ridge.fit(&split.x_train, &split.y_train)?;
    let raw_train = raw.score(&split.x_train, &split.y_train)?;
    let raw_test = raw.score(&split.x_test, &split.y_test)?;
    tracing::info!(raw_train, raw_test, "fitted ridge on raw categories");

    let with_cv = SupervisedPipeline::new(encoder.clone(), ridge.clone())
        .fit(&split.x_train, &split.y_train)?;
    let cv_train = with_cv.score(&split.x_train, &split.y_train)?;
    let cv_test = with_cv.score(&split.x_test, &split.y_test)?;
    tracing::info!(cv_train, cv_test, "fitted ridge behind cross-fitted target encoding");

    let no_cv_encoder = encoder.fit(&split.x_train, &split.y_train)?;
    let x_train_encoded = no_cv_encoder.transform(&split.x_train)?;
    let x_test_encoded = no_cv_encoder.transform(&split.x_test)?;
    let no_cv = ridge.fit(&x_train_encoded, &split.y_train)?;
    let no_cv_train = no_cv.score(&x_train_encoded, &split.y_train)?;
    let no_cv_test = no_cv.score(&x_test_encoded, &split.y_test)?;
    tracing::info!(no_cv_train, no_cv_test, "fitted ridge on target encoding without cross fitting");

    Ok(Comparison {
        scores: ScoreReport {
            raw_train,
            raw_test,
            cv_train,
            cv_test,
            no_cv_train,
            no_cv_test,
        },
        cv_coefficients: CoefficientChart::new(
            "Target Encoder with cross fitting",
            &dataset.feature_names,
            &with_cv.final_estimator().coefficients(),
        ),
        no_cv_coefficients: CoefficientChart::new(
            "Target Encoder without cross fitting",
            &dataset.feature_names,
            &no_cv.coefficients(),
        ),
    })
}
