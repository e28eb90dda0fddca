//! Numerical kernels behind [`Ridge`](super::Ridge).

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::model::ModelError;

/// Solves the symmetric positive definite system `a · x = b` in place via
/// Cholesky factorization. `a` is row-major `n × n`.
pub(crate) fn cholesky_solve(mut a: Vec<f64>, mut b: Vec<f64>) -> Result<Vec<f64>, ModelError> {
    let n = b.len();
    debug_assert_eq!(a.len(), n * n);

    // pivots at rounding level of the largest diagonal entry count as zero
    let max_diag = (0..n).map(|j| a[j * n + j]).fold(0.0f64, f64::max);
    let pivot_tol = n as f64 * f64::EPSILON * max_diag;

    // a <- L (lower triangle)
    for j in 0..n {
        let mut diag = a[j * n + j];
        for k in 0..j {
            diag -= a[j * n + k] * a[j * n + k];
        }
        if !(diag.is_finite() && diag > pivot_tol) {
            return Err(ModelError::Singular(format!(
                "matrix is not positive definite (pivot {} = {})",
                j, diag
            )));
        }
        let l_jj = diag.sqrt();
        a[j * n + j] = l_jj;
        for i in (j + 1)..n {
            let mut s = a[i * n + j];
            for k in 0..j {
                s -= a[i * n + k] * a[j * n + k];
            }
            a[i * n + j] = s / l_jj;
        }
    }

    // L z = b
    for i in 0..n {
        let mut s = b[i];
        for k in 0..i {
            s -= a[i * n + k] * b[k];
        }
        b[i] = s / a[i * n + i];
    }
    // L^T x = z
    for i in (0..n).rev() {
        let mut s = b[i];
        for k in (i + 1)..n {
            s -= a[k * n + i] * b[k];
        }
        b[i] = s / a[i * n + i];
    }
    Ok(b)
}

/// Why LSQR stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LsqrStop {
    /// `x = 0` is the exact solution.
    TrivialSolution,
    /// The residual is small enough for a compatible system.
    Compatible,
    /// The normal-equation residual is small enough (least squares).
    LeastSquares,
    IterationLimit,
}

#[derive(Debug)]
pub(crate) struct LsqrOutcome {
    pub(crate) x: Vec<f64>,
    pub(crate) iterations: usize,
    pub(crate) stop: LsqrStop,
}

fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Paige–Saunders LSQR for `min ||A x - b||² + damp² ||x||²`.
///
/// `atol` and `btol` are the relative stopping tolerances on the
/// normal-equation residual and on the residual.
pub(crate) fn lsqr<B: Backend>(
    a: &Tensor2D<B>,
    b: &Tensor1D<B>,
    damp: f64,
    atol: f64,
    btol: f64,
    max_iter: usize,
) -> LsqrOutcome {
    let n = a.n_cols();
    let mut x = vec![0.0; n];

    let mut u = b.to_vec();
    let mut beta = norm(&u);
    if beta > 0.0 {
        u.iter_mut().for_each(|ui| *ui /= beta);
    }
    let mut v = a.tdot(&Tensor1D::from_f64(u.clone())).to_vec();
    let mut alpha = norm(&v);
    if alpha > 0.0 {
        v.iter_mut().for_each(|vi| *vi /= alpha);
    }

    if alpha * beta == 0.0 {
        return LsqrOutcome {
            x,
            iterations: 0,
            stop: LsqrStop::TrivialSolution,
        };
    }

    let bnorm = beta;
    let mut w = v.clone();
    let mut rhobar = alpha;
    let mut phibar = beta;
    let mut anorm_sq = 0.0;
    let mut res2 = 0.0;

    for itn in 1..=max_iter {
        // bidiagonalization step
        let av = a.dot(&Tensor1D::from_f64(v.clone())).to_vec();
        u.iter_mut().zip(&av).for_each(|(ui, avi)| *ui = avi - alpha * *ui);
        beta = norm(&u);
        anorm_sq += alpha * alpha + beta * beta + damp * damp;
        if beta > 0.0 {
            u.iter_mut().for_each(|ui| *ui /= beta);
            let atu = a.tdot(&Tensor1D::from_f64(u.clone())).to_vec();
            v.iter_mut().zip(&atu).for_each(|(vi, atui)| *vi = atui - beta * *vi);
            alpha = norm(&v);
            if alpha > 0.0 {
                v.iter_mut().for_each(|vi| *vi /= alpha);
            }
        }

        // rotation eliminating the damping term
        let rhobar1 = rhobar.hypot(damp);
        let cs1 = rhobar / rhobar1;
        let sn1 = damp / rhobar1;
        let psi = sn1 * phibar;
        phibar *= cs1;

        // rotation eliminating the subdiagonal
        let rho = rhobar1.hypot(beta);
        let cs = rhobar1 / rho;
        let sn = beta / rho;
        let theta = sn * alpha;
        rhobar = -cs * alpha;
        let phi = cs * phibar;
        phibar *= sn;
        let tau = sn * phi;

        let t1 = phi / rho;
        let t2 = -theta / rho;
        for i in 0..n {
            x[i] += t1 * w[i];
            w[i] = v[i] + t2 * w[i];
        }

        res2 += psi * psi;
        let rnorm = (phibar * phibar + res2).sqrt();
        let anorm = anorm_sq.sqrt();
        let arnorm = alpha * tau.abs();
        let xnorm = norm(&x);

        let test1 = rnorm / bnorm;
        let test2 = if rnorm > 0.0 {
            arnorm / (anorm * rnorm)
        } else {
            0.0
        };
        let rtol = btol + atol * anorm * xnorm / bnorm;

        if test2 <= atol {
            return LsqrOutcome {
                x,
                iterations: itn,
                stop: LsqrStop::LeastSquares,
            };
        }
        if test1 <= rtol {
            return LsqrOutcome {
                x,
                iterations: itn,
                stop: LsqrStop::Compatible,
            };
        }
    }

    LsqrOutcome {
        x,
        iterations: max_iter,
        stop: LsqrStop::IterationLimit,
    }
}
