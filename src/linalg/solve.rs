//! Solvers built from stored factor matrices, and the `Matrix` convenience
//! methods that tie decompositions and solvers together.

use alloc::vec;

use crate::linalg::triangular::{
    back_substitute, back_substitute_transpose, forward_substitute, forward_substitute_unit,
};
use crate::linalg::{
    ensure_len, ensure_shape, ensure_square, solve_gauss, CholeskyDecomposition, LinalgError,
    LupDecomposition, QrDecomposition,
};
use crate::matrix::Matrix;
use crate::traits::FloatScalar;
use crate::vector::Vector;

/// Solve `A x = b` from out-of-place LUP factors (`P A = L U`).
///
/// Permutes `b` by `P`, forward-substitutes through the unit-diagonal `L`,
/// then back-substitutes through `U`.
///
/// ```
/// use lapis::{Matrix, Vector};
/// use lapis::linalg::{decompose_lup, lup_factors, solve_lup};
///
/// let a = Matrix::from_rows(2, 2, &[4.0_f64, 1.0, 1.0, 3.0]);
/// let (mut l, mut u, mut p) = lup_factors(&a).unwrap();
/// decompose_lup(&a, &mut l, &mut u, &mut p).unwrap();
/// let x = solve_lup(&l, &u, &p, &Vector::from_slice(&[1.0, 2.0])).unwrap();
/// assert!((x[0] - 0.0909).abs() < 1e-4);
/// assert!((x[1] - 0.6364).abs() < 1e-4);
/// ```
pub fn solve_lup<T: FloatScalar>(
    l: &Matrix<T>,
    u: &Matrix<T>,
    p: &Matrix<T>,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    let n = ensure_square(l)?;
    ensure_shape(u, n, n)?;
    ensure_shape(p, n, n)?;
    ensure_len(b.len(), n)?;

    let pb = p.mul_vector(b);
    let mut y = vec![T::zero(); n];
    forward_substitute_unit(l, pb.as_slice(), &mut y);
    let mut x = vec![T::zero(); n];
    back_substitute(u, &y, &mut x)?;
    Ok(Vector::from_vec(x))
}

/// Solve `A x = b` (least squares when `N > M`) from QR factors.
///
/// `Qᵗ b` is formed without materializing `Qᵗ`, then back-substituted
/// through the leading `M x M` block of `R`.
pub fn solve_qr<T: FloatScalar>(
    q: &Matrix<T>,
    r: &Matrix<T>,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    let n = ensure_square(q)?;
    let m = r.ncols();
    ensure_shape(r, n, m)?;
    if n < m {
        return Err(LinalgError::WideMatrix { rows: n, cols: m });
    }
    ensure_len(b.len(), n)?;

    let qtb = q.transpose_mul_vector(b);
    let mut x = vec![T::zero(); m];
    back_substitute(r, &qtb.as_slice()[..m], &mut x)?;
    Ok(Vector::from_vec(x))
}

/// Solve `A x = b` from a Cholesky factor (`A = L Lᵗ`): forward through
/// `L`, back through `Lᵗ` without forming it.
pub fn solve_ll<T: FloatScalar>(l: &Matrix<T>, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
    let n = ensure_square(l)?;
    ensure_len(b.len(), n)?;
    let mut y = vec![T::zero(); n];
    forward_substitute(l, b.as_slice(), &mut y)?;
    let mut x = vec![T::zero(); n];
    back_substitute_transpose(l, &y, &mut x)?;
    Ok(Vector::from_vec(x))
}

// ── Convenience methods ─────────────────────────────────────────────

impl<T: FloatScalar> Matrix<T> {
    /// LUP decomposition with partial pivoting.
    pub fn lup(&self) -> Result<LupDecomposition<T>, LinalgError> {
        LupDecomposition::new(self)
    }

    /// Householder QR decomposition (`N >= M`).
    pub fn qr(&self) -> Result<QrDecomposition<T>, LinalgError> {
        QrDecomposition::new(self)
    }

    /// Cholesky decomposition of a symmetric positive-definite matrix.
    pub fn cholesky(&self) -> Result<CholeskyDecomposition<T>, LinalgError> {
        CholeskyDecomposition::new(self)
    }

    /// Solve `A x = b` via LUP.
    ///
    /// ```
    /// use lapis::{Matrix, Vector};
    ///
    /// let a = Matrix::from_rows(2, 2, &[3.0_f64, 2.0, 1.0, 4.0]);
    /// let x = a.solve(&Vector::from_slice(&[7.0, 9.0])).unwrap();
    /// assert!((x[0] - 1.0).abs() < 1e-12);
    /// assert!((x[1] - 2.0).abs() < 1e-12);
    /// ```
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.lup()?.solve(b)
    }

    /// Solve `A x = b` by Gaussian elimination on copies.
    pub fn solve_gauss(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        solve_gauss(self, b)
    }

    /// Solve `A x = b` (or least squares) via Householder QR.
    pub fn solve_qr(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.qr()?.solve(b)
    }

    /// Solve `A x = b` via Cholesky. `A` must be symmetric positive definite.
    pub fn solve_cholesky(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.cholesky()?.solve(b)
    }

    /// Matrix inverse via LUP.
    ///
    /// ```
    /// use lapis::Matrix;
    /// let a = Matrix::from_rows(2, 2, &[4.0_f64, 7.0, 2.0, 6.0]);
    /// let inv = a.inverse().unwrap();
    /// let id = &a * &inv;
    /// assert!((id[(0, 0)] - 1.0).abs() < 1e-12);
    /// assert!(id[(0, 1)].abs() < 1e-12);
    /// ```
    pub fn inverse(&self) -> Result<Matrix<T>, LinalgError> {
        self.lup()?.inverse()
    }

    /// Determinant via LUP. A singular matrix has determinant zero.
    pub fn det(&self) -> Result<T, LinalgError> {
        match self.lup() {
            Ok(lu) => Ok(lu.det()),
            Err(LinalgError::Singular { .. }) => Ok(T::zero()),
            Err(e) => Err(e),
        }
    }
}
