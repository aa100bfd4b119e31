use alloc::vec;

use crate::linalg::{ensure_len, ensure_square, LinalgError};
use crate::matrix::Matrix;
use crate::traits::{FloatScalar, MatrixRef};
use crate::vector::Vector;

// ── Slice kernels ───────────────────────────────────────────────────
//
// Each kernel works on the leading `n x n` block of the matrix, where
// `n = b.len()`, and writes the solution into `x` (same length). Only the
// triangle named by the kernel is read.

#[inline]
fn checked_pivot<T: FloatScalar>(d: T, index: usize) -> Result<T, LinalgError> {
    if d.abs() <= T::tolerance() {
        return Err(LinalgError::Singular { index });
    }
    Ok(d)
}

/// Solve `L x = b` by forward substitution.
pub fn forward_substitute<T: FloatScalar>(
    l: &impl MatrixRef<T>,
    b: &[T],
    x: &mut [T],
) -> Result<(), LinalgError> {
    let n = b.len();
    for i in 0..n {
        let mut sum = b[i];
        for (j, &lij) in l.row_as_slice(i, 0)[..i].iter().enumerate() {
            sum = sum - lij * x[j];
        }
        x[i] = sum / checked_pivot(*l.get(i, i), i)?;
    }
    Ok(())
}

/// Solve `L x = b` assuming a unit diagonal: the diagonal is never read and
/// no division happens.
pub fn forward_substitute_unit<T: FloatScalar>(l: &impl MatrixRef<T>, b: &[T], x: &mut [T]) {
    let n = b.len();
    for i in 0..n {
        let mut sum = b[i];
        for (j, &lij) in l.row_as_slice(i, 0)[..i].iter().enumerate() {
            sum = sum - lij * x[j];
        }
        x[i] = sum;
    }
}

/// Solve `U x = b` by back substitution.
pub fn back_substitute<T: FloatScalar>(
    u: &impl MatrixRef<T>,
    b: &[T],
    x: &mut [T],
) -> Result<(), LinalgError> {
    let n = b.len();
    for i in (0..n).rev() {
        let mut sum = b[i];
        let row = &u.row_as_slice(i, i + 1)[..n - i - 1];
        for (k, &uij) in row.iter().enumerate() {
            sum = sum - uij * x[i + 1 + k];
        }
        x[i] = sum / checked_pivot(*u.get(i, i), i)?;
    }
    Ok(())
}

/// Solve `U x = b` assuming a unit diagonal.
pub fn back_substitute_unit<T: FloatScalar>(u: &impl MatrixRef<T>, b: &[T], x: &mut [T]) {
    let n = b.len();
    for i in (0..n).rev() {
        let mut sum = b[i];
        let row = &u.row_as_slice(i, i + 1)[..n - i - 1];
        for (k, &uij) in row.iter().enumerate() {
            sum = sum - uij * x[i + 1 + k];
        }
        x[i] = sum;
    }
}

/// Solve `Lᵗ x = b` reading `L` column-wise, without forming `Lᵗ`.
pub fn back_substitute_transpose<T: FloatScalar>(
    l: &impl MatrixRef<T>,
    b: &[T],
    x: &mut [T],
) -> Result<(), LinalgError> {
    let n = b.len();
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum = sum - *l.get(j, i) * x[j];
        }
        x[i] = sum / checked_pivot(*l.get(i, i), i)?;
    }
    Ok(())
}

/// Solve `Uᵗ x = b` reading `U` column-wise, without forming `Uᵗ`.
pub fn forward_substitute_transpose<T: FloatScalar>(
    u: &impl MatrixRef<T>,
    b: &[T],
    x: &mut [T],
) -> Result<(), LinalgError> {
    let n = b.len();
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum = sum - *u.get(j, i) * x[j];
        }
        x[i] = sum / checked_pivot(*u.get(i, i), i)?;
    }
    Ok(())
}

// ── Matrix-level solvers ────────────────────────────────────────────

type Kernel<T> = fn(&Matrix<T>, &[T], &mut [T]) -> Result<(), LinalgError>;

fn run<T: FloatScalar>(
    a: &Matrix<T>,
    b: &Vector<T>,
    kernel: Kernel<T>,
) -> Result<Vector<T>, LinalgError> {
    let n = ensure_square(a)?;
    ensure_len(b.len(), n)?;
    let mut x = vec![T::zero(); n];
    kernel(a, b.as_slice(), &mut x)?;
    Ok(Vector::from_vec(x))
}

/// Solve `L x = b` for a lower-triangular `L`.
///
/// Only the lower triangle is read. A diagonal entry with magnitude at or
/// below tolerance yields [`LinalgError::Singular`].
///
/// ```
/// use lapis::{Matrix, Vector};
/// use lapis::linalg::solve_lower_triangular;
///
/// let l = Matrix::from_rows(2, 2, &[2.0_f64, 0.0, 1.0, 4.0]);
/// let x = solve_lower_triangular(&l, &Vector::from_slice(&[2.0, 9.0])).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-14);
/// assert!((x[1] - 2.0).abs() < 1e-14);
/// ```
pub fn solve_lower_triangular<T: FloatScalar>(
    l: &Matrix<T>,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    run(l, b, forward_substitute)
}

/// Solve `U x = b` for an upper-triangular `U`.
pub fn solve_upper_triangular<T: FloatScalar>(
    u: &Matrix<T>,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    run(u, b, back_substitute)
}

/// Solve `L x = b` where `L` has an implicit unit diagonal (as produced by
/// LUP). The stored diagonal is ignored.
pub fn solve_reduced_lower_triangular<T: FloatScalar>(
    l: &Matrix<T>,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    run(l, b, |l, b, x| {
        forward_substitute_unit(l, b, x);
        Ok(())
    })
}

/// Solve `U x = b` where `U` has an implicit unit diagonal.
pub fn solve_reduced_upper_triangular<T: FloatScalar>(
    u: &Matrix<T>,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    run(u, b, |u, b, x| {
        back_substitute_unit(u, b, x);
        Ok(())
    })
}

/// Solve `Lᵗ x = b` for a lower-triangular `L` without materializing `Lᵗ`.
pub fn solve_transpose_lower_triangular<T: FloatScalar>(
    l: &Matrix<T>,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    run(l, b, back_substitute_transpose)
}

/// Solve `Uᵗ x = b` for an upper-triangular `U` without materializing `Uᵗ`.
pub fn solve_transpose_upper_triangular<T: FloatScalar>(
    u: &Matrix<T>,
    b: &Vector<T>,
) -> Result<Vector<T>, LinalgError> {
    run(u, b, forward_substitute_transpose)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn assert_near(a: &Vector<f64>, b: &[f64], tol: f64) {
        for (i, (&x, &y)) in a.iter().zip(b.iter()).enumerate() {
            assert!((x - y).abs() < tol, "x[{}] = {}, expected {}", i, x, y);
        }
    }

    fn lower() -> Matrix<f64> {
        Matrix::from_rows(3, 3, &[2.0_f64, 0.0, 0.0, 1.0, 3.0, 0.0, -1.0, 2.0, 4.0])
    }

    #[test]
    fn lower_and_upper() {
        let l = lower();
        let x_true = Vector::from_slice(&[1.0, -2.0, 0.5]);
        let b = l.mul_vector(&x_true);
        assert_near(&solve_lower_triangular(&l, &b).unwrap(), x_true.as_slice(), TOL);

        let u = l.transpose();
        let b = u.mul_vector(&x_true);
        assert_near(&solve_upper_triangular(&u, &b).unwrap(), x_true.as_slice(), TOL);
    }

    #[test]
    fn transpose_variants_match_materialized() {
        let l = lower();
        let b = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let direct = solve_upper_triangular(&l.transpose(), &b).unwrap();
        let implicit = solve_transpose_lower_triangular(&l, &b).unwrap();
        assert_near(&implicit, direct.as_slice(), TOL);

        let u = l.transpose();
        let direct = solve_lower_triangular(&u.transpose(), &b).unwrap();
        let implicit = solve_transpose_upper_triangular(&u, &b).unwrap();
        assert_near(&implicit, direct.as_slice(), TOL);
    }

    #[test]
    fn reduced_ignores_diagonal() {
        // Diagonal holds garbage; the unit diagonal is implied.
        let l = Matrix::from_rows(2, 2, &[9.0_f64, 0.0, 2.0, 9.0]);
        let x = solve_reduced_lower_triangular(&l, &Vector::from_slice(&[1.0, 4.0])).unwrap();
        assert_near(&x, &[1.0, 2.0], TOL);

        let u = Matrix::from_rows(2, 2, &[0.0_f64, 3.0, 0.0, 0.0]);
        let x = solve_reduced_upper_triangular(&u, &Vector::from_slice(&[7.0, 2.0])).unwrap();
        assert_near(&x, &[1.0, 2.0], TOL);
    }

    #[test]
    fn zero_diagonal_is_singular() {
        let u = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 0.0, 0.0]);
        let err = solve_upper_triangular(&u, &Vector::from_slice(&[1.0, 1.0])).unwrap_err();
        assert_eq!(err, LinalgError::Singular { index: 1 });
    }

    #[test]
    fn shape_errors() {
        let a = Matrix::<f64>::zeros(2, 3);
        assert_eq!(
            solve_lower_triangular(&a, &Vector::from_slice(&[1.0, 1.0])).unwrap_err(),
            LinalgError::NotSquare { rows: 2, cols: 3 }
        );
        let l = lower();
        assert!(matches!(
            solve_lower_triangular(&l, &Vector::from_slice(&[1.0, 1.0])),
            Err(LinalgError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn kernels_use_leading_block() {
        // 3x2 upper-trapezoidal R: only the leading 2x2 block is read.
        let r = Matrix::from_rows(3, 2, &[2.0_f64, 1.0, 0.0, 4.0, 0.0, 0.0]);
        let mut x = [0.0_f64; 2];
        back_substitute(&r, &[4.0, 8.0], &mut x).unwrap();
        assert!((x[0] - 1.0).abs() < TOL);
        assert!((x[1] - 2.0).abs() < TOL);
    }
}
