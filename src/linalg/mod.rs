//! Factorizations, solvers and the QR eigenvalue iteration.
//!
//! Every routine here validates its inputs and returns
//! `Result<_, LinalgError>`. The in-place kernels (`lup_in_place`,
//! `decompose_qr_in_place`, `cholesky_in_place`, ...) work on any
//! [`MatrixMut`](crate::traits::MatrixMut); the wrapper structs
//! ([`LupDecomposition`], [`QrDecomposition`], [`CholeskyDecomposition`])
//! own their factors and expose `solve`/`det`/`inverse`.

pub mod cholesky;
pub mod eigen;
pub mod gauss;
pub mod hessenberg;
pub mod lu;
pub mod qr;
pub mod solve;
pub mod triangular;

pub use cholesky::{cholesky_in_place, decompose_ll, CholeskyDecomposition};
pub use eigen::{eigenvalues_qr, eigenvalues_qr_with, EigenMethod, EigenSettings, QrEigenvalues};
pub use gauss::solve_gauss;
pub use hessenberg::{decompose_hessenberg_qr, decompose_hessenberg_qr_in_place, givens, hessenberg};
pub use lu::{decompose_lup, decompose_lup_in_place, lup_factors, lup_in_place, LupDecomposition};
pub use qr::{
    decompose_qr, decompose_qr_in_place, decompose_qr_with, householder_matrix, householder_vector,
    QrDecomposition, QrStrategy,
};
pub use solve::{solve_ll, solve_lup, solve_qr};
pub use triangular::{
    solve_lower_triangular, solve_reduced_lower_triangular, solve_reduced_upper_triangular,
    solve_transpose_lower_triangular, solve_transpose_upper_triangular, solve_upper_triangular,
};

use thiserror::Error;

use crate::traits::MatrixRef;

/// Errors from linear algebra operations.
///
/// The first group flags an invalid argument (see
/// [`is_invalid_argument`](Self::is_invalid_argument)); the rest are numerical
/// failures detected while factoring or solving.
///
/// ```
/// use lapis::Matrix;
/// use lapis::linalg::LinalgError;
///
/// let singular = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
/// assert_eq!(singular.lup().unwrap_err(), LinalgError::Singular { index: 1 });
///
/// let not_pd = Matrix::from_rows(2, 2, &[1.0_f64, 5.0, 5.0, 1.0]);
/// assert_eq!(
///     not_pd.cholesky().unwrap_err(),
///     LinalgError::NotPositiveDefinite { index: 1 }
/// );
/// ```
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinalgError {
    /// Operand shapes do not agree, as `(rows, cols)`.
    #[error("dimension mismatch: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// QR requires at least as many rows as columns.
    #[error("matrix has more columns than rows ({rows}x{cols})")]
    WideMatrix { rows: usize, cols: usize },

    #[error("matrix is not symmetric")]
    NotSymmetric,

    #[error("matrix is not upper Hessenberg")]
    NotHessenberg,

    #[error("matrix is not triangular")]
    NotTriangular,

    /// A pivot or diagonal entry at `index` is at or below tolerance.
    #[error("matrix is singular: pivot {index} is zero or too small")]
    Singular { index: usize },

    /// The Cholesky diagonal term at `index` is at or below tolerance.
    #[error("matrix is not positive definite (diagonal {index})")]
    NotPositiveDefinite { index: usize },

    #[error("QR iteration did not converge after {iterations} iterations")]
    ConvergenceFailure { iterations: usize },
}

impl LinalgError {
    /// `true` for shape and structure violations by the caller, `false`
    /// for numerical failures.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            LinalgError::DimensionMismatch { .. }
                | LinalgError::NotSquare { .. }
                | LinalgError::WideMatrix { .. }
                | LinalgError::NotSymmetric
                | LinalgError::NotHessenberg
                | LinalgError::NotTriangular
        )
    }
}

#[inline]
pub(crate) fn ensure_square<T>(a: &impl MatrixRef<T>) -> Result<usize, LinalgError> {
    if a.nrows() != a.ncols() {
        return Err(LinalgError::NotSquare {
            rows: a.nrows(),
            cols: a.ncols(),
        });
    }
    Ok(a.nrows())
}

#[inline]
pub(crate) fn ensure_shape<T>(
    a: &impl MatrixRef<T>,
    rows: usize,
    cols: usize,
) -> Result<(), LinalgError> {
    if (a.nrows(), a.ncols()) != (rows, cols) {
        return Err(LinalgError::DimensionMismatch {
            expected: (rows, cols),
            got: (a.nrows(), a.ncols()),
        });
    }
    Ok(())
}

#[inline]
pub(crate) fn ensure_len(len: usize, expected: usize) -> Result<(), LinalgError> {
    if len != expected {
        return Err(LinalgError::DimensionMismatch {
            expected: (expected, 1),
            got: (len, 1),
        });
    }
    Ok(())
}
