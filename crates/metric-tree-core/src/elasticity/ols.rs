//! Ordinary least squares on `nalgebra` matrices.
//!
//! Coefficients come from an SVD solve with a rank cutoff, so rank-deficient
//! and underdetermined designs still yield the minimum-norm solution. The
//! inverse of `XᵀX` is only formed for the coefficient covariance, and falls
//! back to an eigen pseudo-inverse when the matrix is singular.

use nalgebra::{DMatrix, DVector};

use crate::error::{CoreError, CoreResult};

/// Relative cutoff for eigenvalues in the pseudo-inverse.
const PINV_RCOND: f64 = 1e-15;

/// Total sums of squares at or below this mean a constant target.
const SST_EPS: f64 = 1e-12;

/// Raw least-squares fit, including the intercept coefficient if present.
#[derive(Debug, Clone)]
pub struct OlsFit {
    pub beta: Vec<f64>,
    pub std_errors: Vec<f64>,
    pub sse: f64,
    pub dof: usize,
    pub r2: f64,
}

/// Fit `y ≈ Xβ` where `X` is `columns` stacked left to right.
///
/// Callers guarantee every column has `y.len()` rows.
pub fn fit(y: &[f64], columns: &[&[f64]], add_intercept: bool) -> CoreResult<OlsFit> {
    let n = y.len();
    let offset = usize::from(add_intercept);
    let p = columns.len() + offset;

    let x = DMatrix::from_fn(n, p, |i, j| {
        if j < offset {
            1.0
        } else {
            columns[j - offset][i]
        }
    });
    let y = DVector::from_column_slice(y);

    let beta = solve_least_squares(&x, &y)?;

    let residuals = &y - &x * &beta;
    let sse = residuals.norm_squared();
    let dof = n.saturating_sub(p).max(1);
    let sigma2 = sse / dof as f64;

    let xtx = x.transpose() * &x;
    let xtx_inv = match xtx.clone().try_inverse() {
        Some(inv) => inv,
        None => symmetric_pseudo_inverse(xtx),
    };
    let cov = xtx_inv * sigma2;
    let std_errors = cov.diagonal().iter().map(|v| v.max(0.0).sqrt()).collect();

    let mean = y.mean();
    let sst: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
    let r2 = if sst <= SST_EPS { 0.0 } else { 1.0 - sse / sst };

    Ok(OlsFit {
        beta: beta.iter().copied().collect(),
        std_errors,
        sse,
        dof,
        r2,
    })
}

/// Minimum-norm least-squares solution via SVD.
///
/// Singular values below `eps * max(n, p) * σ_max` are treated as zero.
fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> CoreResult<DVector<f64>> {
    let (n, p) = x.shape();
    let svd = x
        .clone()
        .try_svd(true, true, f64::EPSILON, 0)
        .ok_or_else(|| CoreError::Internal("SVD did not converge".into()))?;

    let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let cutoff = f64::EPSILON * n.max(p) as f64 * sigma_max;

    svd.solve(y, cutoff)
        .map_err(|e| CoreError::Internal(format!("least-squares solve failed: {}", e)))
}

/// Moore-Penrose inverse of a symmetric matrix via eigendecomposition.
///
/// `A⁺[i,j] = Σ_{k: |λ_k| > tol} Q[i,k] Q[j,k] / λ_k`
fn symmetric_pseudo_inverse(a: DMatrix<f64>) -> DMatrix<f64> {
    let dim = a.nrows();
    let eigen = a.symmetric_eigen();
    let q = eigen.eigenvectors;
    let lambdas = eigen.eigenvalues;

    let lambda_max = lambdas.iter().fold(0.0_f64, |acc, l| acc.max(l.abs()));
    let tol = PINV_RCOND * lambda_max;

    DMatrix::from_fn(dim, dim, |i, j| {
        lambdas
            .iter()
            .enumerate()
            .filter(|(_, lambda)| lambda.abs() > tol)
            .map(|(k, &lambda)| q[(i, k)] * q[(j, k)] / lambda)
            .sum()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_inverse_of_rank_one() {
        // [[1,1],[1,1]] has pinv [[0.25,0.25],[0.25,0.25]]
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let pinv = symmetric_pseudo_inverse(a);
        for v in pinv.iter() {
            assert!((v - 0.25).abs() < 1e-12, "got {}", v);
        }
    }

    #[test]
    fn test_pseudo_inverse_of_zero_matrix_is_zero() {
        let pinv = symmetric_pseudo_inverse(DMatrix::zeros(3, 3));
        assert!(pinv.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_underdetermined_fit_has_floored_dof() {
        let y = [1.0, 2.0];
        let a = [1.0, 0.0];
        let b = [0.0, 1.0];
        let c = [1.0, 1.0];
        let fit = fit(&y, &[&a, &b, &c], false).unwrap();

        assert_eq!(fit.dof, 1);
        assert!(fit.sse < 1e-18);
        assert_eq!(fit.beta.len(), 3);
    }

    #[test]
    fn test_intercept_recovered() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 + 3.0 * v).collect();
        let fit = fit(&y, &[&x], true).unwrap();

        assert!((fit.beta[0] - 2.0).abs() < 1e-9);
        assert!((fit.beta[1] - 3.0).abs() < 1e-9);
        assert!((fit.r2 - 1.0).abs() < 1e-12);
    }
}
