use alloc::vec;
use alloc::vec::Vec;

use crate::linalg::triangular::back_substitute;
use crate::linalg::{ensure_len, ensure_shape, LinalgError};
use crate::matrix::Matrix;
use crate::traits::FloatScalar;
use crate::vector::Vector;

/// How Householder reflectors are applied during QR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QrStrategy {
    /// Materialize each `N x N` reflector `H` and multiply `R <- H R`,
    /// `Q <- Q H`.
    Explicit,
    /// Apply each reflector as two rank-1 updates restricted to the active
    /// rows/columns.
    #[default]
    Implicit,
}

/// Unit Householder vector `w` such that `(I - 2 w wᵗ) x` is a multiple of
/// `e_0`.
///
/// Uses `β = sign(x₀)‖x‖` with `sign(0) = +1` to avoid cancellation, then
/// `z = x + β e_0` and `w = z / ‖z‖`. Returns `None` when `‖x‖` is at or
/// below tolerance: there is nothing to annihilate.
///
/// ```
/// use lapis::linalg::householder_vector;
///
/// let w = householder_vector(&[3.0_f64, 4.0]).unwrap();
/// assert!((w.norm() - 1.0).abs() < 1e-14);
/// assert!(householder_vector(&[0.0_f64, 0.0]).is_none());
/// ```
pub fn householder_vector<T: FloatScalar>(x: &[T]) -> Option<Vector<T>> {
    let norm = x.iter().fold(T::zero(), |acc, &v| acc + v * v).sqrt();
    if x.is_empty() || norm <= T::tolerance() {
        return None;
    }
    let beta = x[0].sign_or_one() * norm;
    let mut z = Vector::from_slice(x);
    z[0] = z[0] + beta;
    let z_norm = z.norm();
    Some(z / z_norm)
}

/// The `n x n` reflector `I - 2 w wᵗ`, with `w` occupying rows/columns
/// `offset..offset + w.len()` and identity elsewhere.
///
/// Panics if the block does not fit.
pub fn householder_matrix<T: FloatScalar>(w: &Vector<T>, n: usize, offset: usize) -> Matrix<T> {
    assert!(
        offset + w.len() <= n,
        "reflector of length {} at offset {} does not fit in {}x{}",
        w.len(),
        offset,
        n,
        n
    );
    let two = T::one() + T::one();
    let mut h = Matrix::eye(n);
    for (a, &wa) in w.iter().enumerate() {
        for (b, &wb) in w.iter().enumerate() {
            h[(offset + a, offset + b)] = h[(offset + a, offset + b)] - two * wa * wb;
        }
    }
    h
}

/// `R <- H R` on rows `j..` and columns `j..`, where `H = I - 2 w wᵗ`.
fn reflect_rows<T: FloatScalar>(r: &mut Matrix<T>, w: &Vector<T>, j: usize) {
    let m = r.ncols();
    let two = T::one() + T::one();
    // t = wᵗ R[j.., j..], accumulated row by row
    let mut t = vec![T::zero(); m - j];
    for (i, &wi) in w.iter().enumerate() {
        for (tc, &x) in t.iter_mut().zip(&r.row_slice(j + i)[j..]) {
            *tc = *tc + wi * x;
        }
    }
    for (i, &wi) in w.iter().enumerate() {
        let scale = two * wi;
        for (x, &tc) in r.row_slice_mut(j + i)[j..].iter_mut().zip(&t) {
            *x = *x - scale * tc;
        }
    }
}

/// `Q <- Q H` on columns `j..`, where `H = I - 2 w wᵗ`.
fn reflect_cols<T: FloatScalar>(q: &mut Matrix<T>, w: &Vector<T>, j: usize) {
    let two = T::one() + T::one();
    for row in 0..q.nrows() {
        let seg = &mut q.row_slice_mut(row)[j..j + w.len()];
        let s = seg
            .iter()
            .zip(w.iter())
            .fold(T::zero(), |acc, (&x, &wi)| acc + x * wi);
        let scale = two * s;
        for (x, &wi) in seg.iter_mut().zip(w.iter()) {
            *x = *x - scale * wi;
        }
    }
}

/// Shared Householder loop. Returns the number of reflectors applied.
fn householder_qr<T: FloatScalar>(
    q: &mut Matrix<T>,
    r: &mut Matrix<T>,
    strategy: QrStrategy,
) -> Result<usize, LinalgError> {
    let (n, m) = r.shape();
    if n < m {
        return Err(LinalgError::WideMatrix { rows: n, cols: m });
    }
    ensure_shape(&*q, n, n)?;
    *q = Matrix::eye(n);

    let mut applied = 0;
    let mut x: Vec<T> = Vec::with_capacity(n);
    for j in 0..m {
        x.clear();
        x.extend((j..n).map(|i| r[(i, j)]));
        let Some(w) = householder_vector(&x) else {
            log::trace!("qr: column {} already zero below row {}, skipping", j, j);
            continue;
        };

        match strategy {
            QrStrategy::Explicit => {
                let h = householder_matrix(&w, n, j);
                *r = &h * &*r;
                *q = &*q * &h;
            }
            QrStrategy::Implicit => {
                reflect_rows(r, &w, j);
                reflect_cols(q, &w, j);
            }
        }
        for i in (j + 1)..n {
            r[(i, j)] = T::zero();
        }
        applied += 1;
    }

    Ok(applied)
}

/// Householder QR in place: `r` holds `A` (`N x M`, `N >= M`) on entry and
/// `R` (upper-trapezoidal) on return; `q` (`N x N`) is overwritten with the
/// orthogonal `Q` such that `A = Q R`.
///
/// Sub-columns that are already zero are skipped, so rank-deficient input
/// yields a (near-)zero diagonal entry in `R` rather than an error.
pub fn decompose_qr_in_place<T: FloatScalar>(
    q: &mut Matrix<T>,
    r: &mut Matrix<T>,
) -> Result<(), LinalgError> {
    householder_qr(q, r, QrStrategy::Implicit).map(|_| ())
}

/// Out-of-place QR: returns `(Q, R)` with `A = Q R`.
///
/// ```
/// use lapis::Matrix;
/// use lapis::linalg::decompose_qr;
///
/// let a = Matrix::from_rows(3, 2, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
/// let (q, r) = decompose_qr(&a).unwrap();
/// assert_eq!(q.shape(), (3, 3));
/// assert_eq!(r.shape(), (3, 2));
/// assert!((&(&q * &r) - &a).max_abs() < 1e-12);
/// assert!(r.is_upper_triangular(0.0));
/// ```
pub fn decompose_qr<T: FloatScalar>(a: &Matrix<T>) -> Result<(Matrix<T>, Matrix<T>), LinalgError> {
    decompose_qr_with(a, QrStrategy::default())
}

/// Out-of-place QR with an explicit reflector strategy.
pub fn decompose_qr_with<T: FloatScalar>(
    a: &Matrix<T>,
    strategy: QrStrategy,
) -> Result<(Matrix<T>, Matrix<T>), LinalgError> {
    let mut q = Matrix::eye(a.nrows());
    let mut r = a.clone();
    householder_qr(&mut q, &mut r, strategy)?;
    Ok((q, r))
}

/// Full QR decomposition `A = Q R` of an `N x M` matrix with `N >= M`.
///
/// # Example
///
/// ```
/// use lapis::{Matrix, Vector};
///
/// // Least-squares fit: y = c0 + c1*x to points (0,1), (1,2), (2,4)
/// let a = Matrix::from_rows(3, 2, &[1.0_f64, 0.0, 1.0, 1.0, 1.0, 2.0]);
/// let b = Vector::from_slice(&[1.0, 2.0, 4.0]);
/// let x = a.qr().unwrap().solve(&b).unwrap();
/// assert!((x[0] - 5.0 / 6.0).abs() < 1e-10);
/// assert!((x[1] - 3.0 / 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct QrDecomposition<T> {
    q: Matrix<T>,
    r: Matrix<T>,
    reflections: usize,
}

impl<T: FloatScalar> QrDecomposition<T> {
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        let mut q = Matrix::eye(a.nrows());
        let mut r = a.clone();
        let reflections = householder_qr(&mut q, &mut r, QrStrategy::Implicit)?;
        Ok(Self { q, r, reflections })
    }

    /// Orthogonal factor (`N x N`).
    pub fn q(&self) -> &Matrix<T> {
        &self.q
    }

    /// Upper-trapezoidal factor (`N x M`).
    pub fn r(&self) -> &Matrix<T> {
        &self.r
    }

    pub fn into_parts(self) -> (Matrix<T>, Matrix<T>) {
        (self.q, self.r)
    }

    /// Solve `A x = b` for square `A`, or the least-squares problem
    /// `min ‖A x - b‖` when `N > M`.
    ///
    /// Computes `Qᵗ b` without forming `Qᵗ`, then back-substitutes through the
    /// leading `M x M` block of `R`.
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        let m = self.r.ncols();
        ensure_len(b.len(), self.q.nrows())?;
        let qtb = self.q.transpose_mul_vector(b);
        let mut x = vec![T::zero(); m];
        back_substitute(&self.r, &qtb.as_slice()[..m], &mut x)?;
        Ok(Vector::from_vec(x))
    }

    /// Determinant of the factored (square) matrix.
    ///
    /// Each reflector contributes a factor of `-1`.
    pub fn det(&self) -> Result<T, LinalgError> {
        let (n, m) = self.r.shape();
        if n != m {
            return Err(LinalgError::NotSquare { rows: n, cols: m });
        }
        let sign = if self.reflections % 2 == 0 {
            T::one()
        } else {
            -T::one()
        };
        Ok((0..n).fold(sign, |d, i| d * self.r[(i, i)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn assert_mat_near(a: &Matrix<f64>, b: &Matrix<f64>, tol: f64) {
        assert_eq!(a.shape(), b.shape());
        let diff = (a - b).max_abs();
        assert!(diff < tol, "max difference {}", diff);
    }

    fn classic() -> Matrix<f64> {
        Matrix::from_rows(
            3,
            3,
            &[12.0, -51.0, 4.0, 6.0, 167.0, -68.0, -4.0, 24.0, -41.0],
        )
    }

    #[test]
    fn householder_zero_first_entry_uses_positive_sign() {
        let w = householder_vector(&[0.0_f64, 3.0, 4.0]).unwrap();
        let h = householder_matrix(&w, 3, 0);
        let hx = h.mul_vector(&Vector::from_slice(&[0.0, 3.0, 4.0]));
        assert!((hx[0] + 5.0).abs() < 1e-12);
        assert!(hx[1].abs() < 1e-12);
        assert!(hx[2].abs() < 1e-12);
    }

    #[test]
    fn householder_matrix_is_orthogonal_and_embedded() {
        let w = householder_vector(&[1.0_f64, 2.0]).unwrap();
        let h = householder_matrix(&w, 4, 1);
        assert_mat_near(&(&h.transpose() * &h), &Matrix::eye(4), 1e-14);
        assert_eq!(h[(0, 0)], 1.0);
        assert_eq!(h[(3, 3)], 1.0);
        assert_eq!(h[(0, 1)], 0.0);
    }

    #[test]
    fn square_reconstruction() {
        let a = classic();
        let (q, r) = decompose_qr(&a).unwrap();
        assert_mat_near(&(&q * &r), &a, TOL);
        assert_mat_near(&(&q.transpose() * &q), &Matrix::eye(3), TOL);
        assert!(r.is_upper_triangular(0.0));
        // |R[0,0]| = ‖first column‖ = 14
        assert!((r[(0, 0)].abs() - 14.0).abs() < TOL);
    }

    #[test]
    fn rectangular_trapezoidal() {
        let a = Matrix::from_rows(4, 3, &[1.0_f64, -1.0, 4.0, 1.0, 4.0, -2.0, 1.0, 4.0, 2.0, 1.0, -1.0, 0.0]);
        let (q, r) = decompose_qr(&a).unwrap();
        assert_eq!(r.shape(), (4, 3));
        assert_mat_near(&(&q * &r), &a, TOL);
        assert_mat_near(&(&q.transpose() * &q), &Matrix::eye(4), TOL);
        for j in 0..3 {
            assert_eq!(r[(3, j)], 0.0);
        }
    }

    #[test]
    fn strategies_agree() {
        let a = classic();
        let (q1, r1) = decompose_qr_with(&a, QrStrategy::Explicit).unwrap();
        let (q2, r2) = decompose_qr_with(&a, QrStrategy::Implicit).unwrap();
        assert_mat_near(&q1, &q2, TOL);
        assert_mat_near(&r1, &r2, 1e-9);
    }

    #[test]
    fn in_place_overwrites() {
        let a = classic();
        let mut q = Matrix::zeros(3, 3);
        let mut r = a.clone();
        decompose_qr_in_place(&mut q, &mut r).unwrap();
        assert_mat_near(&(&q * &r), &a, TOL);
    }

    #[test]
    fn wide_matrix_rejected() {
        let a = Matrix::<f64>::zeros(2, 3);
        assert_eq!(
            decompose_qr(&a).unwrap_err(),
            LinalgError::WideMatrix { rows: 2, cols: 3 }
        );
        let mut q = Matrix::<f64>::eye(2);
        let mut r = Matrix::<f64>::zeros(3, 2);
        assert_eq!(
            decompose_qr_in_place(&mut q, &mut r).unwrap_err(),
            LinalgError::DimensionMismatch {
                expected: (3, 3),
                got: (2, 2)
            }
        );
        let mut r = Matrix::<f64>::zeros(2, 3);
        assert_eq!(
            decompose_qr_in_place(&mut q, &mut r).unwrap_err(),
            LinalgError::WideMatrix { rows: 2, cols: 3 }
        );
    }

    #[test]
    fn zero_column_is_skipped() {
        let a = Matrix::from_rows(3, 2, &[0.0_f64, 1.0, 0.0, 2.0, 0.0, 3.0]);
        let (q, r) = decompose_qr(&a).unwrap();
        assert_mat_near(&(&q * &r), &a, TOL);
        assert_eq!(r[(0, 0)], 0.0);
    }

    #[test]
    fn solve_and_det() {
        let a = Matrix::from_rows(2, 2, &[4.0_f64, 1.0, 1.0, 3.0]);
        let qr = QrDecomposition::new(&a).unwrap();
        let x = qr.solve(&Vector::from_slice(&[1.0, 2.0])).unwrap();
        assert!((x[0] - 1.0 / 11.0).abs() < 1e-12);
        assert!((x[1] - 7.0 / 11.0).abs() < 1e-12);
        assert!((qr.det().unwrap() - 11.0).abs() < 1e-12);

        let det = QrDecomposition::new(&classic()).unwrap().det().unwrap();
        let lu_det = classic().lup().unwrap().det();
        assert!((det - lu_det).abs() < 1e-6 * lu_det.abs());
    }

    #[test]
    fn singular_solve_reports_index() {
        let a = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 4.0]);
        let qr = QrDecomposition::new(&a).unwrap();
        assert!(matches!(
            qr.solve(&Vector::from_slice(&[1.0, 1.0])),
            Err(LinalgError::Singular { index: 1 })
        ));
    }
}
