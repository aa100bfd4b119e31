use crate::linalg::qr::householder_vector;
use crate::linalg::{ensure_shape, ensure_square, LinalgError};
use crate::matrix::Matrix;
use crate::traits::FloatScalar;

/// Givens rotation `(c, s)` with `c = a/g`, `s = b/g`, `g = hypot(a, b)`,
/// so that `[c s; -s c] · [a; b] = [g; 0]`.
///
/// Returns `None` when `b == 0`: the entry is already zero (this includes
/// the fully deflated `a = b = 0` case), and the rotation is skipped.
///
/// ```
/// use lapis::linalg::givens;
///
/// let (c, s) = givens(3.0_f64, 4.0).unwrap();
/// assert!((c - 0.6).abs() < 1e-15);
/// assert!((s - 0.8).abs() < 1e-15);
/// assert!(givens(0.0_f64, 0.0).is_none());
/// ```
pub fn givens<T: FloatScalar>(a: T, b: T) -> Option<(T, T)> {
    if b == T::zero() {
        return None;
    }
    let g = a.hypot(b);
    Some((a / g, b / g))
}

/// QR of an upper Hessenberg matrix by Givens rotations, in place.
///
/// `r` (`N x M`, `N >= M`) holds the Hessenberg input on entry and the upper
/// triangular `R` on return; `q` (`N x N`) is overwritten with `Q` so that
/// `H = Q R`. One rotation per subdiagonal entry, each touching two rows
/// of `R` and two columns of `Q`.
pub fn decompose_hessenberg_qr_in_place<T: FloatScalar>(
    q: &mut Matrix<T>,
    r: &mut Matrix<T>,
) -> Result<(), LinalgError> {
    let (n, m) = r.shape();
    if n < m {
        return Err(LinalgError::WideMatrix { rows: n, cols: m });
    }
    ensure_shape(&*q, n, n)?;
    if !r.is_upper_hessenberg(T::tolerance()) {
        return Err(LinalgError::NotHessenberg);
    }
    *q = Matrix::eye(n);

    for j in 0..m.min(n - 1) {
        let Some((c, s)) = givens(r[(j, j)], r[(j + 1, j)]) else {
            continue;
        };

        // R <- G R on rows j, j+1
        {
            let (top, bottom) = r.two_rows_mut(j, j + 1);
            for (x, y) in top[j..].iter_mut().zip(bottom[j..].iter_mut()) {
                let (a, b) = (*x, *y);
                *x = c * a + s * b;
                *y = c * b - s * a;
            }
            bottom[j] = T::zero();
        }

        // Q <- Q Gᵗ on columns j, j+1
        for row in 0..n {
            let qr = &mut q.row_slice_mut(row)[j..j + 2];
            let (a, b) = (qr[0], qr[1]);
            qr[0] = c * a + s * b;
            qr[1] = c * b - s * a;
        }
    }

    Ok(())
}

/// Out-of-place Hessenberg QR: returns `(Q, R)` with `H = Q R`.
pub fn decompose_hessenberg_qr<T: FloatScalar>(
    h: &Matrix<T>,
) -> Result<(Matrix<T>, Matrix<T>), LinalgError> {
    let mut q = Matrix::eye(h.nrows());
    let mut r = h.clone();
    decompose_hessenberg_qr_in_place(&mut q, &mut r)?;
    Ok((q, r))
}

/// Reduce a square matrix to upper Hessenberg form by Householder
/// similarity transforms.
///
/// Returns `(H, Q)` with `A = Q H Qᵗ`. Symmetric input gives a
/// tridiagonal `H`.
///
/// ```
/// use lapis::Matrix;
/// use lapis::linalg::hessenberg;
///
/// let a = Matrix::from_rows(3, 3, &[4.0_f64, 1.0, -2.0, 1.0, 2.0, 0.0, -2.0, 0.0, 3.0]);
/// let (h, q) = hessenberg(&a).unwrap();
/// assert!(h.is_upper_hessenberg(0.0));
/// let back = &(&q * &h) * &q.transpose();
/// assert!((&back - &a).max_abs() < 1e-12);
/// ```
pub fn hessenberg<T: FloatScalar>(a: &Matrix<T>) -> Result<(Matrix<T>, Matrix<T>), LinalgError> {
    let n = ensure_square(a)?;
    let two = T::one() + T::one();
    let mut h = a.clone();
    let mut q = Matrix::eye(n);

    for k in 0..n.saturating_sub(2) {
        let x: alloc::vec::Vec<T> = ((k + 1)..n).map(|i| h[(i, k)]).collect();
        let Some(w) = householder_vector(&x) else {
            continue;
        };
        let off = k + 1;

        // Left: H <- P H on rows off.., columns k..
        for col in k..n {
            let t = w
                .iter()
                .enumerate()
                .fold(T::zero(), |acc, (i, &wi)| acc + wi * h[(off + i, col)]);
            for (i, &wi) in w.iter().enumerate() {
                h[(off + i, col)] = h[(off + i, col)] - two * wi * t;
            }
        }

        // Right: H <- H P and Q <- Q P on columns off..
        for m in [&mut h, &mut q] {
            for row in 0..n {
                let seg = &mut m.row_slice_mut(row)[off..];
                let s = seg
                    .iter()
                    .zip(w.iter())
                    .fold(T::zero(), |acc, (&x, &wi)| acc + x * wi);
                for (x, &wi) in seg.iter_mut().zip(w.iter()) {
                    *x = *x - two * s * wi;
                }
            }
        }

        for i in (k + 2)..n {
            h[(i, k)] = T::zero();
        }
    }

    Ok((h, q))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn assert_mat_near(a: &Matrix<f64>, b: &Matrix<f64>, tol: f64) {
        let diff = (a - b).max_abs();
        assert!(diff < tol, "max difference {}", diff);
    }

    fn upper_hessenberg() -> Matrix<f64> {
        Matrix::from_rows(
            4,
            4,
            &[
                4.0, 1.0, 2.0, 3.0, //
                3.0, 5.0, 1.0, 2.0, //
                0.0, 2.0, 6.0, 1.0, //
                0.0, 0.0, 1.0, 7.0,
            ],
        )
    }

    #[test]
    fn givens_zeroes_second_entry() {
        let (c, s) = givens(-2.0_f64, 5.0).unwrap();
        let top = c * -2.0 + s * 5.0;
        let bottom = c * 5.0 - s * -2.0;
        assert!((top - 29.0_f64.sqrt()).abs() < 1e-14);
        assert!(bottom.abs() < 1e-14);
        assert!(givens(3.0_f64, 0.0).is_none());
    }

    #[test]
    fn hessenberg_qr_reconstructs() {
        let h = upper_hessenberg();
        let (q, r) = decompose_hessenberg_qr(&h).unwrap();
        assert!(r.is_upper_triangular(0.0));
        assert_mat_near(&(&q * &r), &h, TOL);
        assert_mat_near(&(&q.transpose() * &q), &Matrix::eye(4), TOL);
    }

    #[test]
    fn hessenberg_qr_matches_householder_up_to_signs() {
        let h = upper_hessenberg();
        let (_, r1) = decompose_hessenberg_qr(&h).unwrap();
        let (_, r2) = crate::linalg::decompose_qr(&h).unwrap();
        for i in 0..4 {
            assert!((r1[(i, i)].abs() - r2[(i, i)].abs()).abs() < TOL);
        }
    }

    #[test]
    fn deflated_subdiagonal_is_skipped() {
        let mut h = upper_hessenberg();
        h[(1, 0)] = 0.0;
        let (q, r) = decompose_hessenberg_qr(&h).unwrap();
        assert_mat_near(&(&q * &r), &h, TOL);
        assert_eq!(q[(0, 0)], 1.0);
    }

    #[test]
    fn rejects_non_hessenberg() {
        let mut h = upper_hessenberg();
        h[(3, 0)] = 1.0;
        assert_eq!(
            decompose_hessenberg_qr(&h).unwrap_err(),
            LinalgError::NotHessenberg
        );
    }

    #[test]
    fn rectangular_hessenberg() {
        let h = Matrix::from_rows(3, 2, &[1.0_f64, 2.0, 3.0, 4.0, 0.0, 5.0]);
        let (q, r) = decompose_hessenberg_qr(&h).unwrap();
        assert!(r.is_upper_triangular(0.0));
        assert_mat_near(&(&q * &r), &h, TOL);
    }

    #[test]
    fn reduction_of_symmetric_is_tridiagonal() {
        let a = Matrix::from_rows(
            4,
            4,
            &[
                4.0_f64, 1.0, -2.0, 2.0, //
                1.0, 2.0, 0.0, 1.0, //
                -2.0, 0.0, 3.0, -2.0, //
                2.0, 1.0, -2.0, -1.0,
            ],
        );
        let (h, q) = hessenberg(&a).unwrap();
        assert!(h.is_upper_hessenberg(0.0));
        for i in 0..4 {
            for j in (i + 2)..4 {
                assert!(h[(i, j)].abs() < TOL, "h[({},{})] = {}", i, j, h[(i, j)]);
            }
        }
        assert_mat_near(&(&(&q * &h) * &q.transpose()), &a, TOL);
        assert!((h.trace() - a.trace()).abs() < TOL);
    }
}
