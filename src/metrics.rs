//! Regression metrics.

use crate::backend::{Backend, Tensor1D};
use crate::model::ModelError;

fn check_lengths<B: Backend>(y_true: &Tensor1D<B>, y_pred: &Tensor1D<B>) -> Result<(), ModelError> {
    if y_true.is_empty() {
        return Err(ModelError::EmptyData(
            "metrics need at least one sample".to_string(),
        ));
    }
    if y_true.len() != y_pred.len() {
        return Err(ModelError::LengthMismatch {
            x_rows: y_pred.len(),
            y_len: y_true.len(),
        });
    }
    Ok(())
}

/// Coefficient of determination `1 - SS_res / SS_tot`.
///
/// A constant `y_true` scores 1.0 when predicted exactly and 0.0 otherwise.
///
/// # Example
/// ```
/// use targetenc_rs::backend::{CpuBackend, Tensor1D};
/// use targetenc_rs::metrics::r2_score;
///
/// let y = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0]);
/// assert_eq!(r2_score(&y, &y).unwrap(), 1.0);
/// ```
pub fn r2_score<B: Backend>(y_true: &Tensor1D<B>, y_pred: &Tensor1D<B>) -> Result<f64, ModelError> {
    check_lengths(y_true, y_pred)?;

    let residual = y_true.sub(y_pred);
    let ss_res = residual.dot(&residual).to_f64();
    let ss_tot = y_true.variance().to_f64() * y_true.len() as f64;

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

/// Mean of squared differences.
pub fn mean_squared_error<B: Backend>(
    y_true: &Tensor1D<B>,
    y_pred: &Tensor1D<B>,
) -> Result<f64, ModelError> {
    check_lengths(y_true, y_pred)?;
    let residual = y_true.sub(y_pred);
    Ok(residual.mul(&residual).mean().to_f64())
}
