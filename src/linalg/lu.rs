use alloc::vec;
use alloc::vec::Vec;

use crate::linalg::triangular::{back_substitute, forward_substitute_unit};
use crate::linalg::{ensure_len, ensure_shape, ensure_square, LinalgError};
use crate::matrix::Matrix;
use crate::traits::{FloatScalar, MatrixMut, MatrixRef};
use crate::vector::Vector;

/// Row with the largest `|a[k, col]|` for `k >= col`. Strict `>` keeps the
/// first maximum.
fn find_pivot<T: FloatScalar>(a: &impl MatrixRef<T>, col: usize) -> (usize, T) {
    let mut max_row = col;
    let mut max_val = a.get(col, col).abs();
    for row in (col + 1)..a.nrows() {
        let val = a.get(row, col).abs();
        if val > max_val {
            max_val = val;
            max_row = row;
        }
    }
    (max_row, max_val)
}

fn swap_rows_generic<T: FloatScalar>(a: &mut impl MatrixMut<T>, r1: usize, r2: usize, until: usize) {
    for j in 0..until {
        let tmp = *a.get(r1, j);
        *a.get_mut(r1, j) = *a.get(r2, j);
        *a.get_mut(r2, j) = tmp;
    }
}

/// LUP decomposition with partial pivoting, in place.
///
/// On return, `a` holds both factors packed together:
/// - diagonal and above: U
/// - strictly below the diagonal: the multipliers of L (unit diagonal implied)
///
/// `perm` receives the row permutation: row `i` of `PA` is row `perm[i]` of
/// `A`. Returns `true` if the number of row swaps was even.
///
/// Running this on a buffer that already holds packed factors is not
/// supported: it factors the factors.
pub fn lup_in_place<T: FloatScalar>(
    a: &mut impl MatrixMut<T>,
    perm: &mut [usize],
) -> Result<bool, LinalgError> {
    let n = ensure_square(&*a)?;
    ensure_len(perm.len(), n)?;

    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }

    let mut even = true;

    for col in 0..n {
        let (max_row, max_val) = find_pivot(&*a, col);
        if max_val <= T::tolerance() {
            return Err(LinalgError::Singular { index: col });
        }

        if max_row != col {
            log::trace!("lup: column {} pivots on row {}", col, max_row);
            perm.swap(col, max_row);
            swap_rows_generic(a, col, max_row, n);
            even = !even;
        }

        let pivot = *a.get(col, col);
        for row in (col + 1)..n {
            let factor = *a.get(row, col) / pivot;
            *a.get_mut(row, col) = factor;
            if factor == T::zero() {
                continue;
            }
            for j in (col + 1)..n {
                let u = *a.get(col, j);
                let v = a.get_mut(row, j);
                *v = *v - factor * u;
            }
        }
    }

    Ok(even)
}

/// Initial factor matrices for [`decompose_lup`]: `L = I`, `U = A`, `P = I`.
pub fn lup_factors<T: FloatScalar>(
    a: &Matrix<T>,
) -> Result<(Matrix<T>, Matrix<T>, Matrix<T>), LinalgError> {
    let n = ensure_square(a)?;
    Ok((Matrix::eye(n), a.clone(), Matrix::eye(n)))
}

/// Out-of-place LUP decomposition `P A = L U` into caller-provided factors.
///
/// `l`, `u` and `p` must be `N x N`. They are written only on success: a
/// [`LinalgError::Singular`] leaves them as they were. For each
/// pivot column `j` the rows `j` and `pivot` are swapped in `U` and `P`, and
/// only the first `j` columns of those rows in `L`.
///
/// ```
/// use lapis::Matrix;
/// use lapis::linalg::{decompose_lup, lup_factors};
///
/// let a = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// let (mut l, mut u, mut p) = lup_factors(&a).unwrap();
/// decompose_lup(&a, &mut l, &mut u, &mut p).unwrap();
/// let pa = &p * &a;
/// let lu = &l * &u;
/// assert!((&pa - &lu).max_abs() < 1e-14);
/// ```
pub fn decompose_lup<T: FloatScalar>(
    a: &Matrix<T>,
    l: &mut Matrix<T>,
    u: &mut Matrix<T>,
    p: &mut Matrix<T>,
) -> Result<(), LinalgError> {
    let n = ensure_square(a)?;
    ensure_shape(&*l, n, n)?;
    ensure_shape(&*u, n, n)?;
    ensure_shape(&*p, n, n)?;

    let mut lf = Matrix::eye(n);
    let mut uf = a.clone();
    let mut pf = Matrix::eye(n);

    for j in 0..n {
        let (pivot, max_val) = find_pivot(&uf, j);
        if max_val <= T::tolerance() {
            return Err(LinalgError::Singular { index: j });
        }

        if pivot != j {
            log::trace!("lup: column {} pivots on row {}", j, pivot);
            uf.swap_rows(j, pivot);
            pf.swap_rows(j, pivot);
            lf.swap_rows_until(j, pivot, j);
        }

        let ujj = uf[(j, j)];
        for k in (j + 1)..n {
            let factor = uf[(k, j)] / ujj;
            lf[(k, j)] = factor;
            uf[(k, j)] = T::zero();
            let (urow_j, urow_k) = uf.two_rows_mut(j, k);
            for (x, &y) in urow_k[j + 1..].iter_mut().zip(&urow_j[j + 1..]) {
                *x = *x - factor * y;
            }
        }
    }

    *l = lf;
    *u = uf;
    *p = pf;
    Ok(())
}

/// Fused LUP on a working matrix: `lu` is overwritten with the packed
/// factors and `p` with the permutation matrix, so that `P A = L U`.
///
/// Applying it again to its own output is undefined: the second pass
/// factors already-factored data. On [`LinalgError::Singular`] `lu` holds
/// the partially eliminated matrix and `p` is left untouched.
pub fn decompose_lup_in_place<T: FloatScalar>(
    lu: &mut Matrix<T>,
    p: &mut Matrix<T>,
) -> Result<(), LinalgError> {
    let n = ensure_square(&*lu)?;
    ensure_shape(&*p, n, n)?;
    let mut perm = vec![0usize; n];
    lup_in_place(lu, &mut perm)?;
    *p = permutation_matrix(&perm);
    Ok(())
}

fn permutation_matrix<T: FloatScalar>(perm: &[usize]) -> Matrix<T> {
    let n = perm.len();
    let mut p = Matrix::zeros(n, n);
    for (i, &pi) in perm.iter().enumerate() {
        p[(i, pi)] = T::one();
    }
    p
}

/// LUP decomposition of a square matrix with partial pivoting.
///
/// Stores the packed L/U factors and the row permutation.
///
/// # Example
///
/// ```
/// use lapis::{Matrix, Vector};
///
/// let a = Matrix::from_rows(2, 2, &[2.0_f64, 1.0, 5.0, 3.0]);
/// let lu = a.lup().unwrap();
///
/// let x = lu.solve(&Vector::from_slice(&[4.0, 11.0])).unwrap();
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 2.0).abs() < 1e-12);
/// assert!((lu.det() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LupDecomposition<T> {
    lu: Matrix<T>,
    perm: Vec<usize>,
    even: bool,
}

impl<T: FloatScalar> LupDecomposition<T> {
    /// Decompose a square matrix. Returns [`LinalgError::Singular`] if a
    /// pivot column is numerically zero.
    pub fn new(a: &Matrix<T>) -> Result<Self, LinalgError> {
        let n = ensure_square(a)?;
        let mut lu = a.clone();
        let mut perm = vec![0usize; n];
        let even = lup_in_place(&mut lu, &mut perm)?;
        Ok(Self { lu, perm, even })
    }

    /// The packed factor buffer.
    pub fn packed(&self) -> &Matrix<T> {
        &self.lu
    }

    /// Unit lower-triangular factor L.
    pub fn l(&self) -> Matrix<T> {
        let n = self.lu.nrows();
        Matrix::from_fn(n, n, |i, j| match i.cmp(&j) {
            core::cmp::Ordering::Greater => self.lu[(i, j)],
            core::cmp::Ordering::Equal => T::one(),
            core::cmp::Ordering::Less => T::zero(),
        })
    }

    /// Upper-triangular factor U.
    pub fn u(&self) -> Matrix<T> {
        let n = self.lu.nrows();
        Matrix::from_fn(n, n, |i, j| if j >= i { self.lu[(i, j)] } else { T::zero() })
    }

    /// Permutation matrix P with `P A = L U`.
    pub fn p(&self) -> Matrix<T> {
        permutation_matrix(&self.perm)
    }

    /// Row permutation as indices: row `i` of `PA` is row `perm[i]` of `A`.
    pub fn permutation(&self) -> &[usize] {
        &self.perm
    }

    /// Solve `A x = b`.
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        let n = self.lu.nrows();
        ensure_len(b.len(), n)?;
        let pb: Vec<T> = self.perm.iter().map(|&i| b[i]).collect();
        let mut y = vec![T::zero(); n];
        forward_substitute_unit(&self.lu, &pb, &mut y);
        let mut x = vec![T::zero(); n];
        back_substitute(&self.lu, &y, &mut x)?;
        Ok(Vector::from_vec(x))
    }

    /// Determinant: product of U's diagonal, negated for an odd number of
    /// row swaps.
    pub fn det(&self) -> T {
        let sign = if self.even { T::one() } else { -T::one() };
        (0..self.lu.nrows()).fold(sign, |d, i| d * self.lu[(i, i)])
    }

    /// Matrix inverse, one column solve per basis vector.
    pub fn inverse(&self) -> Result<Matrix<T>, LinalgError> {
        let n = self.lu.nrows();
        let mut inv = Matrix::zeros(n, n);
        for col in 0..n {
            let x = self.solve(&Vector::basis(n, col))?;
            inv.set_col(col, &x);
        }
        Ok(inv)
    }
}
