use alloc::vec;

use crate::linalg::triangular::{back_substitute_transpose, forward_substitute};
use crate::linalg::{ensure_len, ensure_square, LinalgError};
use crate::matrix::Matrix;
use crate::traits::{FloatScalar, MatrixMut};
use crate::vector::Vector;

/// Cholesky decomposition in place: `A = L Lᵗ`.
///
/// Works row by row, reading only the lower triangle of `a`:
///
/// - `L[j,k] = (A[j,k] - Σ_{h<k} L[j,h] L[k,h]) / L[k,k]` for `k < j`
/// - `L[j,j] = sqrt(A[j,j] - Σ_{h<j} L[j,h]²)`
///
/// A diagonal term at or below tolerance before the square root yields
/// [`LinalgError::NotPositiveDefinite`] with its row index. On success the
/// strict upper triangle is zeroed, so `a` holds exactly `L`.
///
/// Symmetry is not checked here; see [`decompose_ll`].
pub fn cholesky_in_place<T: FloatScalar>(a: &mut impl MatrixMut<T>) -> Result<(), LinalgError> {
    let n = ensure_square(&*a)?;

    for j in 0..n {
        for k in 0..j {
            let mut sum = *a.get(j, k);
            for h in 0..k {
                sum = sum - *a.get(j, h) * *a.get(k, h);
            }
            *a.get_mut(j, k) = sum / *a.get(k, k);
        }

        let mut diag = *a.get(j, j);
        for h in 0..j {
            let ljh = *a.get(j, h);
            diag = diag - ljh * ljh;
        }
        if diag <= T::tolerance() {
            return Err(LinalgError::NotPositiveDefinite { index: j });
        }
        *a.get_mut(j, j) = diag.sqrt();
    }

    for i in 0..n {
        for x in a.row_as_mut_slice(i, i + 1) {
            *x = T::zero();
        }
    }

    Ok(())
}

fn ensure_symmetric<T: FloatScalar>(a: &Matrix<T>) -> Result<(), LinalgError> {
    ensure_square(a)?;
    if !a.is_symmetric(T::tolerance()) {
        return Err(LinalgError::NotSymmetric);
    }
    Ok(())
}

/// Out-of-place Cholesky: checks that `a` is square and symmetric, then
/// returns the lower-triangular `L` with `A = L Lᵗ`.
///
/// ```
/// use lapis::Matrix;
/// use lapis::linalg::decompose_ll;
///
/// let a = Matrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 3.0]);
/// let l = decompose_ll(&a).unwrap();
/// assert_eq!(l[(0, 0)], 2.0);
/// assert_eq!(l[(0, 1)], 0.0);
/// assert!((&(&l * &l.transpose()) - &a).max_abs() < 1e-14);
/// ```
pub fn decompose_ll<T: FloatScalar>(a: &Matrix<T>) -> Result<Matrix<T>, LinalgError> {
    ensure_symmetric(a)?;
    let mut l = a.clone();
    cholesky_in_place(&mut l)?;
    Ok(l)
}

/// Cholesky decomposition of a symmetric positive-definite matrix.
///
/// # Example
///
/// ```
/// use lapis::{Matrix, Vector};
///
/// let a = Matrix::from_rows(2, 2, &[4.0_f64, 2.0, 2.0, 3.0]);
/// let chol = a.cholesky().unwrap();
///
/// let x = chol.solve(&Vector::from_slice(&[8.0, 7.0])).unwrap();
/// assert!((x[0] - 1.25).abs() < 1e-12);
/// assert!((x[1] - 1.5).abs() < 1e-12);
/// assert!((chol.det() - 8.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct CholeskyDecomposition<T> {
    l: Matrix<T>,
}

impl<T: FloatScalar> CholeskyDecomposition<T> {
    /// Decompose a symmetric positive-definite matrix.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        Ok(Self { l: decompose_ll(a)? })
    }

    /// Lower-triangular factor, zeros above the diagonal.
    pub fn l(&self) -> &Matrix<T> {
        &self.l
    }

    pub fn into_l(self) -> Matrix<T> {
        self.l
    }

    /// Solve `A x = b`: forward through `L`, then back through `Lᵗ`
    /// without forming the transpose.
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        let n = self.l.nrows();
        ensure_len(b.len(), n)?;
        let mut y = vec![T::zero(); n];
        forward_substitute(&self.l, b.as_slice(), &mut y)?;
        let mut x = vec![T::zero(); n];
        back_substitute_transpose(&self.l, &y, &mut x)?;
        Ok(Vector::from_vec(x))
    }

    /// `det(A) = (Π L[i,i])²`.
    pub fn det(&self) -> T {
        let prod = (0..self.l.nrows()).fold(T::one(), |p, i| p * self.l[(i, i)]);
        prod * prod
    }

    /// `ln det(A) = 2 Σ ln L[i,i]`, which does not overflow for large `N`.
    pub fn ln_det(&self) -> T {
        let two = T::one() + T::one();
        (0..self.l.nrows()).fold(T::zero(), |s, i| s + self.l[(i, i)].ln()) * two
    }

    pub fn inverse(&self) -> Result<Matrix<T>, LinalgError> {
        let n = self.l.nrows();
        let mut inv = Matrix::zeros(n, n);
        for col in 0..n {
            let x = self.solve(&Vector::basis(n, col))?;
            inv.set_col(col, &x);
        }
        Ok(inv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spd_3x3() -> Matrix<f64> {
        Matrix::from_rows(3, 3, &[4.0_f64, 2.0, 1.0, 2.0, 10.0, 3.5, 1.0, 3.5, 4.5])
    }

    fn assert_mat_near(a: &Matrix<f64>, b: &Matrix<f64>, tol: f64) {
        let diff = (a - b).max_abs();
        assert!(diff < tol, "max difference {}", diff);
    }

    #[test]
    fn reconstructs() {
        let a = spd_3x3();
        let l = decompose_ll(&a).unwrap();
        assert!(l.is_lower_triangular(0.0));
        for i in 0..3 {
            assert!(l[(i, i)] > 0.0);
        }
        assert_mat_near(&(&l * &l.transpose()), &a, 1e-12);
    }

    #[test]
    fn in_place_zeroes_upper() {
        let mut a = spd_3x3();
        cholesky_in_place(&mut a).unwrap();
        assert_eq!(a[(0, 1)], 0.0);
        assert_eq!(a[(0, 2)], 0.0);
        assert_eq!(a[(1, 2)], 0.0);
    }

    #[test]
    fn not_positive_definite() {
        let a = Matrix::from_rows(2, 2, &[1.0_f64, 5.0, 5.0, 1.0]);
        assert_eq!(
            decompose_ll(&a).unwrap_err(),
            LinalgError::NotPositiveDefinite { index: 1 }
        );
        let neg = Matrix::from_rows(2, 2, &[-1.0_f64, 0.0, 0.0, 1.0]);
        assert_eq!(
            decompose_ll(&neg).unwrap_err(),
            LinalgError::NotPositiveDefinite { index: 0 }
        );
    }

    #[test]
    fn semidefinite_is_rejected() {
        // Rank one: the second diagonal term is exactly zero.
        let a = Matrix::from_rows(2, 2, &[1.0_f64, 1.0, 1.0, 1.0]);
        assert_eq!(
            decompose_ll(&a).unwrap_err(),
            LinalgError::NotPositiveDefinite { index: 1 }
        );
    }

    #[test]
    fn not_symmetric() {
        let a = Matrix::from_rows(2, 2, &[4.0_f64, 1.0, 2.0, 3.0]);
        assert_eq!(decompose_ll(&a).unwrap_err(), LinalgError::NotSymmetric);
        assert_eq!(
            decompose_ll(&Matrix::<f64>::zeros(2, 3)).unwrap_err(),
            LinalgError::NotSquare { rows: 2, cols: 3 }
        );
    }

    #[test]
    fn solve_det_inverse() {
        let a = spd_3x3();
        let chol = CholeskyDecomposition::new(&a).unwrap();
        let b = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let x = chol.solve(&b).unwrap();
        assert!((&a.mul_vector(&x) - &b).norm() < 1e-12);

        let lu_det = a.lup().unwrap().det();
        assert!((chol.det() - lu_det).abs() < 1e-10);
        assert!((chol.ln_det() - lu_det.ln()).abs() < 1e-12);

        let inv = chol.inverse().unwrap();
        assert_mat_near(&(&a * &inv), &Matrix::eye(3), 1e-12);
    }

    #[test]
    fn identity() {
        let id = Matrix::<f64>::eye(4);
        assert_eq!(decompose_ll(&id).unwrap(), id);
    }
}
