use alloc::vec;
use alloc::vec::Vec;

use super::SparseMatrix;
use crate::linalg::LinalgError;
use crate::matrix::Matrix;
use crate::traits::FloatScalar;
use crate::vector::Vector;

/// Compressed sparse row matrix.
///
/// Row `i` owns the entries `row_ptrs[i]..row_ptrs[i + 1]` of `col_indices`
/// and `values`; column indices are strictly increasing within a row.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T> {
    nrows: usize,
    ncols: usize,
    row_ptrs: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Copy> From<&SparseMatrix<T>> for CsrMatrix<T> {
    fn from(s: &SparseMatrix<T>) -> Self {
        let (nrows, ncols) = s.shape();
        let mut row_ptrs = vec![0; nrows + 1];
        let mut col_indices = Vec::with_capacity(s.nnz());
        for &idx in s.indices() {
            row_ptrs[idx / ncols + 1] += 1;
            col_indices.push(idx % ncols);
        }
        for i in 0..nrows {
            row_ptrs[i + 1] += row_ptrs[i];
        }
        Self {
            nrows,
            ncols,
            row_ptrs,
            col_indices,
            values: s.values().to_vec(),
        }
    }
}

impl<T> CsrMatrix<T> {
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn row_ptrs(&self) -> &[usize] {
        &self.row_ptrs
    }

    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// `(col_indices, values)` of row `i`.
    #[inline]
    fn row(&self, i: usize) -> (&[usize], &[T]) {
        let range = self.row_ptrs[i]..self.row_ptrs[i + 1];
        (&self.col_indices[range.clone()], &self.values[range])
    }
}

impl<T: FloatScalar> CsrMatrix<T> {
    /// Value at `(row, col)`, found by binary search within the row.
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({}, {}) out of bounds for {}x{} sparse matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        let (cols, vals) = self.row(row);
        cols.binary_search(&col)
            .map_or_else(|_| T::zero(), |k| vals[k])
    }

    pub fn to_dense(&self) -> Matrix<T> {
        Matrix::from_fn(self.nrows, self.ncols, |i, j| self.get(i, j))
    }

    /// `A x`. Panics on dimension mismatch.
    pub fn mul_vector(&self, x: &Vector<T>) -> Vector<T> {
        assert_eq!(x.len(), self.ncols, "dimension mismatch");
        Vector::from_fn(self.nrows, |i| {
            let (cols, vals) = self.row(i);
            cols.iter()
                .zip(vals)
                .fold(T::zero(), |acc, (&j, &v)| acc + v * x[j])
        })
    }

    /// `vᵗ A`. Panics on dimension mismatch.
    pub fn vecmul_left(&self, v: &Vector<T>) -> Vector<T> {
        assert_eq!(v.len(), self.nrows, "dimension mismatch");
        let mut out = Vector::zeros(self.ncols);
        for i in 0..self.nrows {
            let vi = v[i];
            let (cols, vals) = self.row(i);
            for (&j, &a) in cols.iter().zip(vals) {
                out[j] = out[j] + vi * a;
            }
        }
        out
    }

    fn check_system(&self, b: &Vector<T>) -> Result<(), LinalgError> {
        if self.nrows != self.ncols {
            return Err(LinalgError::NotSquare {
                rows: self.nrows,
                cols: self.ncols,
            });
        }
        if b.len() != self.nrows {
            return Err(LinalgError::DimensionMismatch {
                expected: (self.nrows, 1),
                got: (b.len(), 1),
            });
        }
        Ok(())
    }

    /// Solve `L x = b` by forward substitution, where `self` is lower
    /// triangular with the diagonal stored last in each row.
    ///
    /// Any entry above the diagonal gives [`LinalgError::NotTriangular`];
    /// a missing or tiny diagonal gives [`LinalgError::Singular`].
    pub fn solve_lower_triangular(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.check_system(b)?;
        let n = self.nrows;
        let mut x = Vector::zeros(n);
        for i in 0..n {
            let (cols, vals) = self.row(i);
            let Some((&last, off)) = cols.split_last() else {
                return Err(LinalgError::Singular { index: i });
            };
            if last > i {
                return Err(LinalgError::NotTriangular);
            }
            let diag = vals[off.len()];
            if last != i || diag.abs() <= T::tolerance() {
                return Err(LinalgError::Singular { index: i });
            }
            let sum = off
                .iter()
                .zip(vals)
                .fold(T::zero(), |acc, (&j, &v)| acc + v * x[j]);
            x[i] = (b[i] - sum) / diag;
        }
        Ok(x)
    }

    /// Solve `U x = b` by back substitution, where `self` is upper
    /// triangular with the diagonal stored first in each row.
    pub fn solve_upper_triangular(&self, b: &Vector<T>) -> Result<Vector<T>, LinalgError> {
        self.check_system(b)?;
        let n = self.nrows;
        let mut x = Vector::zeros(n);
        for i in (0..n).rev() {
            let (cols, vals) = self.row(i);
            let Some((&first, off)) = cols.split_first() else {
                return Err(LinalgError::Singular { index: i });
            };
            if first < i {
                return Err(LinalgError::NotTriangular);
            }
            let diag = vals[0];
            if first != i || diag.abs() <= T::tolerance() {
                return Err(LinalgError::Singular { index: i });
            }
            let sum = off
                .iter()
                .zip(&vals[1..])
                .fold(T::zero(), |acc, (&j, &v)| acc + v * x[j]);
            x[i] = (b[i] - sum) / diag;
        }
        Ok(x)
    }
}
