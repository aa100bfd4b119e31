use alloc::vec;

use crate::linalg::triangular::back_substitute;
use crate::linalg::{ensure_len, ensure_square, LinalgError};
use crate::matrix::Matrix;
use crate::traits::FloatScalar;
use crate::vector::Vector;

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
///
/// Works on copies of `a` and `b`; the caller's inputs are never mutated.
/// Independent of the stored decompositions: a direct one-shot solve.
///
/// ```
/// use lapis::{Matrix, Vector};
/// use lapis::linalg::solve_gauss;
///
/// let a = Matrix::from_rows(2, 2, &[4.0_f64, 1.0, 1.0, 3.0]);
/// let x = solve_gauss(&a, &Vector::from_slice(&[1.0, 2.0])).unwrap();
/// assert!((x[0] - 1.0 / 11.0).abs() < 1e-14);
/// assert!((x[1] - 7.0 / 11.0).abs() < 1e-14);
/// ```
pub fn solve_gauss<T: FloatScalar>(a: &Matrix<T>, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
    let n = ensure_square(a)?;
    ensure_len(b.len(), n)?;

    let mut u = a.clone();
    let mut y = b.clone();

    for j in 0..n {
        let mut pivot = j;
        for k in (j + 1)..n {
            if u[(k, j)].abs() > u[(pivot, j)].abs() {
                pivot = k;
            }
        }
        if u[(pivot, j)].abs() <= T::tolerance() {
            return Err(LinalgError::Singular { index: j });
        }
        if pivot != j {
            u.swap_rows(j, pivot);
            y.swap(j, pivot);
        }

        let ujj = u[(j, j)];
        for k in (j + 1)..n {
            let factor = u[(k, j)] / ujj;
            if factor == T::zero() {
                continue;
            }
            u[(k, j)] = T::zero();
            let (row_j, row_k) = u.two_rows_mut(j, k);
            for (x, &p) in row_k[j + 1..].iter_mut().zip(&row_j[j + 1..]) {
                *x = *x - factor * p;
            }
            y[k] = y[k] - factor * y[j];
        }
    }

    let mut x = vec![T::zero(); n];
    back_substitute(&u, y.as_slice(), &mut x)?;
    Ok(Vector::from_vec(x))
}
