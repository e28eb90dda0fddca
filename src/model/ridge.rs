//! Ridge regression: least squares with an L2 penalty on the weights.

use crate::backend::{Backend, Scalar, Tensor1D, Tensor2D};
use crate::model::linear::{LinearParams, LinearRegression};
use crate::model::solver::{cholesky_solve, lsqr, LsqrStop};
use crate::model::{Estimator, Fitted, LinearModel, ModelError};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Algorithm used to solve the penalized least-squares problem.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RidgeSolver {
    /// Closed form through the regularized normal equations.
    #[default]
    Cholesky,
    /// Iterative damped least squares; never forms `XᵀX`.
    Lsqr,
}

impl std::str::FromStr for RidgeSolver {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cholesky" => Ok(Self::Cholesky),
            "lsqr" => Ok(Self::Lsqr),
            other => Err(ModelError::InvalidParameter(format!(
                "unknown ridge solver '{}', expected 'cholesky' or 'lsqr'",
                other
            ))),
        }
    }
}

/// Ridge regression estimator.
///
/// Minimizes `||y - Xw - b||² + alpha · ||w||²`. The intercept is never
/// penalized.
///
/// # Example
/// ```
/// use targetenc_rs::backend::{CpuBackend, Tensor1D, Tensor2D};
/// use targetenc_rs::model::{Estimator, Ridge, RidgeSolver};
///
/// let x = Tensor2D::<CpuBackend>::new(vec![0.0, 1.0, 2.0, 3.0], 4, 1);
/// let y = Tensor1D::<CpuBackend>::new(vec![1.0, 3.0, 5.0, 7.0]);
///
/// let model = Ridge::new()
///     .with_alpha(1e-9)
///     .with_solver(RidgeSolver::Lsqr)
///     .fit(&x, &y)
///     .unwrap();
/// assert!((model.coefficients()[0] - 2.0).abs() < 1e-6);
/// assert!((model.intercept() - 1.0).abs() < 1e-6);
/// ```
#[derive(Clone, Debug)]
pub struct Ridge<B: Backend> {
    alpha: f64,
    fit_intercept: bool,
    solver: RidgeSolver,
    max_iter: Option<usize>,
    tol: f64,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for Ridge<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> Ridge<B> {
    /// `alpha = 1.0`, with intercept, Cholesky solver.
    pub fn new() -> Self {
        Self {
            alpha: 1.0,
            fit_intercept: true,
            solver: RidgeSolver::default(),
            max_iter: None,
            tol: 1e-6,
            _backend: PhantomData,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    pub fn with_solver(mut self, solver: RidgeSolver) -> Self {
        self.solver = solver;
        self
    }

    /// Iteration cap for LSQR. Defaults to `max(2 · n_features, 50)`.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    /// Relative stopping tolerance for LSQR.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn solver(&self) -> RidgeSolver {
        self.solver
    }

    fn validate(&self, x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<(), ModelError> {
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(ModelError::InvalidParameter(format!(
                "alpha must be a non-negative finite number, got {}",
                self.alpha
            )));
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(ModelError::InvalidParameter(format!(
                "tol must be positive, got {}",
                self.tol
            )));
        }
        if self.max_iter == Some(0) {
            return Err(ModelError::InvalidParameter(
                "max_iter must be positive".to_string(),
            ));
        }

        let (rows, cols) = x.shape();
        if rows == 0 || cols == 0 {
            return Err(ModelError::EmptyData(format!(
                "Cannot fit Ridge on a {}x{} matrix",
                rows, cols
            )));
        }
        if y.len() != rows {
            return Err(ModelError::LengthMismatch {
                x_rows: rows,
                y_len: y.len(),
            });
        }
        if x.ravel().iter().chain(y.to_vec().iter()).any(|v| !v.is_finite()) {
            return Err(ModelError::InvalidParameter(
                "Ridge expects finite inputs".to_string(),
            ));
        }
        Ok(())
    }

    /// LSQR iteration cap: `max_iter`, or `max(2 · n_features, 50)`.
    fn lsqr_max_iter(&self, n_features: usize) -> usize {
        self.max_iter.unwrap_or((2 * n_features).max(50))
    }

    fn solve(&self, x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<Vec<f64>, ModelError> {
        let n_features = x.n_cols();
        match self.solver {
            RidgeSolver::Cholesky => {
                let mut gram = x.gram().ravel();
                for j in 0..n_features {
                    gram[j * n_features + j] += self.alpha;
                }
                cholesky_solve(gram, x.tdot(y).to_vec())
            }
            RidgeSolver::Lsqr => {
                let max_iter = self.lsqr_max_iter(n_features);
                let out = lsqr(x, y, self.alpha.sqrt(), self.tol, self.tol, max_iter);
                if out.stop == LsqrStop::IterationLimit {
                    tracing::warn!(max_iter, "lsqr stopped on the iteration limit");
                } else {
                    tracing::debug!(iterations = out.iterations, stop = ?out.stop, "lsqr converged");
                }
                Ok(out.x)
            }
        }
    }
}

impl<B: Backend> Estimator<B> for Ridge<B> {
    type Fitted = LinearModel<B, Fitted>;

    fn fit(&self, x: &Tensor2D<B>, y: &Tensor1D<B>) -> Result<Self::Fitted, ModelError> {
        self.validate(x, y)?;
        let (rows, cols) = x.shape();

        let (weights, bias) = if self.fit_intercept {
            let x_mean = x.col_mean().to_vec();
            let y_mean = y.mean().to_f64();
            let centered: Vec<f64> = x
                .ravel()
                .iter()
                .enumerate()
                .map(|(i, v)| v - x_mean[i % cols])
                .collect();
            let xc = Tensor2D::from_f64(centered, rows, cols);
            let yc = y.add_scalar(&Scalar::new(-y_mean));

            let w = self.solve(&xc, &yc)?;
            let bias = y_mean - w.iter().zip(&x_mean).map(|(w, m)| w * m).sum::<f64>();
            (w, bias)
        } else {
            (self.solve(x, y)?, 0.0)
        };

        tracing::debug!(
            solver = ?self.solver,
            alpha = self.alpha,
            n_samples = rows,
            n_features = cols,
            "fitted ridge regression"
        );

        let mut model = LinearRegression::<B>::zeros(cols);
        model.update_params(LinearParams {
            weights: Tensor1D::from_f64(weights),
            bias: Scalar::new(bias),
        })?;
        Ok(model.into_fitted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;
    use crate::model::InferenceModel;

    type B = CpuBackend;

    fn line_data() -> (Tensor2D<B>, Tensor1D<B>) {
        // y = 3 x0 - 2 x1 + 4
        let rows = vec![
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![2.0, 3.0],
            vec![3.0, 1.0],
            vec![4.0, 5.0],
            vec![5.0, 2.0],
        ];
        let y = rows.iter().map(|r| 3.0 * r[0] - 2.0 * r[1] + 4.0).collect();
        (Tensor2D::from_rows(&rows).unwrap(), Tensor1D::from_f64(y))
    }

    #[test]
    fn test_ridge_recovers_exact_line() {
        let (x, y) = line_data();
        for solver in [RidgeSolver::Cholesky, RidgeSolver::Lsqr] {
            let model = Ridge::<B>::new()
                .with_alpha(1e-10)
                .with_solver(solver)
                .with_tol(1e-12)
                .fit(&x, &y)
                .unwrap();
            let w = model.coefficients();
            assert!((w[0] - 3.0).abs() < 1e-6, "{:?}: {:?}", solver, w);
            assert!((w[1] + 2.0).abs() < 1e-6, "{:?}: {:?}", solver, w);
            assert!((model.intercept() - 4.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ridge_without_intercept() {
        let x = Tensor2D::<B>::new(vec![1.0, 2.0, 3.0], 3, 1);
        let y = Tensor1D::<B>::new(vec![2.0, 4.0, 6.0]);
        let model = Ridge::<B>::new()
            .with_alpha(0.0)
            .with_fit_intercept(false)
            .fit(&x, &y)
            .unwrap();
        assert!((model.coefficients()[0] - 2.0).abs() < 1e-12);
        assert_eq!(model.intercept(), 0.0);
    }

    #[test]
    fn test_ridge_shrinks_towards_zero() {
        // single feature: w = sum(xy) / (sum(x²) + alpha)
        let x = Tensor2D::<B>::new(vec![1.0, 2.0], 2, 1);
        let y = Tensor1D::<B>::new(vec![1.0, 2.0]);
        let model = Ridge::<B>::new()
            .with_alpha(5.0)
            .with_fit_intercept(false)
            .fit(&x, &y)
            .unwrap();
        assert!((model.coefficients()[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_solvers_agree_with_penalty() {
        let (x, y) = line_data();
        let chol = Ridge::<B>::new().with_alpha(2.0).fit(&x, &y).unwrap();
        let lsqr = Ridge::<B>::new()
            .with_alpha(2.0)
            .with_solver(RidgeSolver::Lsqr)
            .with_tol(1e-12)
            .fit(&x, &y)
            .unwrap();
        for (a, b) in chol.coefficients().iter().zip(lsqr.coefficients()) {
            assert!((a - b).abs() < 1e-6);
        }
        assert!((chol.intercept() - lsqr.intercept()).abs() < 1e-6);
    }

    #[test]
    fn test_lsqr_iteration_cap() {
        let ridge = Ridge::<B>::new().with_solver(RidgeSolver::Lsqr);
        assert_eq!(ridge.lsqr_max_iter(2), 50);
        assert_eq!(ridge.lsqr_max_iter(40), 80);
        assert_eq!(ridge.clone().with_max_iter(1).lsqr_max_iter(40), 1);

        // stopping on the cap still yields a usable model
        let (x, y) = line_data();
        let model = ridge
            .with_alpha(1e-3)
            .with_max_iter(1)
            .with_tol(1e-14)
            .fit(&x, &y)
            .unwrap();
        assert!(model.coefficients().iter().all(|w| w.is_finite()));
        assert!(model.intercept().is_finite());
        assert!(model.predict_batch(&x).unwrap().to_vec().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_cholesky_singular_without_penalty() {
        // duplicated column
        let x = Tensor2D::<B>::new(vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0], 3, 2);
        let y = Tensor1D::<B>::new(vec![1.0, 2.0, 3.0]);
        let result = Ridge::<B>::new().with_alpha(0.0).fit(&x, &y);
        assert!(matches!(result, Err(ModelError::Singular(_))));
    }

    #[test]
    fn test_ridge_invalid_inputs() {
        let (x, y) = line_data();
        assert!(matches!(
            Ridge::<B>::new().with_alpha(-1.0).fit(&x, &y),
            Err(ModelError::InvalidParameter(_))
        ));
        assert!(matches!(
            Ridge::<B>::new().fit(&x, &Tensor1D::from_f64(vec![1.0])),
            Err(ModelError::LengthMismatch { x_rows: 6, y_len: 1 })
        ));
        assert!(matches!(
            Ridge::<B>::new().fit(&Tensor2D::zeros(0, 2), &Tensor1D::zeros(0)),
            Err(ModelError::EmptyData(_))
        ));
    }

    #[test]
    fn test_fitted_ridge_predicts() {
        let (x, y) = line_data();
        let model = Ridge::<B>::new().with_alpha(1e-10).fit(&x, &y).unwrap();
        let pred = model.predict_batch(&x).unwrap().to_vec();
        for (p, t) in pred.iter().zip(y.to_vec()) {
            assert!((p - t).abs() < 1e-6);
        }
        assert!(model.score(&x, &y).unwrap() > 0.999_999);
    }

    #[test]
    fn test_solver_from_str() {
        assert_eq!("LSQR".parse::<RidgeSolver>().unwrap(), RidgeSolver::Lsqr);
        assert_eq!("cholesky".parse::<RidgeSolver>().unwrap(), RidgeSolver::Cholesky);
        assert!("svd".parse::<RidgeSolver>().is_err());
    }
}
