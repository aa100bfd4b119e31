use alloc::vec;
use alloc::vec::Vec;

use super::SparseMatrix;
use crate::matrix::Matrix;
use crate::traits::FloatScalar;
use crate::vector::Vector;

/// Compressed sparse column matrix.
///
/// Column `j` owns the entries `col_ptrs[j]..col_ptrs[j + 1]` of
/// `row_indices` and `values`; row indices are strictly increasing within a
/// column.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix<T> {
    nrows: usize,
    ncols: usize,
    col_ptrs: Vec<usize>,
    row_indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Copy + Default> From<&SparseMatrix<T>> for CscMatrix<T> {
    fn from(s: &SparseMatrix<T>) -> Self {
        let (nrows, ncols) = s.shape();
        let nnz = s.nnz();

        let mut col_ptrs = vec![0; ncols + 1];
        for &idx in s.indices() {
            col_ptrs[idx % ncols + 1] += 1;
        }
        for j in 0..ncols {
            col_ptrs[j + 1] += col_ptrs[j];
        }

        // Scatter in row-major order, which keeps rows sorted per column.
        let mut next = col_ptrs.clone();
        let mut row_indices = vec![0; nnz];
        let mut values = vec![T::default(); nnz];
        for (&idx, &v) in s.indices().iter().zip(s.values()) {
            let col = idx % ncols;
            let k = next[col];
            row_indices[k] = idx / ncols;
            values[k] = v;
            next[col] += 1;
        }

        Self {
            nrows,
            ncols,
            col_ptrs,
            row_indices,
            values,
        }
    }
}

impl<T> CscMatrix<T> {
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

    pub fn col_ptrs(&self) -> &[usize] {
        &self.col_ptrs
    }

    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    fn col(&self, j: usize) -> (&[usize], &[T]) {
        let range = self.col_ptrs[j]..self.col_ptrs[j + 1];
        (&self.row_indices[range.clone()], &self.values[range])
    }
}

impl<T: FloatScalar> CscMatrix<T> {
    /// Value at `(row, col)`, found by binary search within the column.
    pub fn get(&self, row: usize, col: usize) -> T {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({}, {}) out of bounds for {}x{} sparse matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        let (rows, vals) = self.col(col);
        rows.binary_search(&row)
            .map_or_else(|_| T::zero(), |k| vals[k])
    }

    pub fn to_dense(&self) -> Matrix<T> {
        let mut a = Matrix::zeros(self.nrows, self.ncols);
        for j in 0..self.ncols {
            let (rows, vals) = self.col(j);
            for (&i, &v) in rows.iter().zip(vals) {
                a[(i, j)] = v;
            }
        }
        a
    }

    /// `A x`. Panics on dimension mismatch.
    pub fn mul_vector(&self, x: &Vector<T>) -> Vector<T> {
        assert_eq!(x.len(), self.ncols, "dimension mismatch");
        let mut out = Vector::zeros(self.nrows);
        for j in 0..self.ncols {
            let xj = x[j];
            let (rows, vals) = self.col(j);
            for (&i, &a) in rows.iter().zip(vals) {
                out[i] = out[i] + a * xj;
            }
        }
        out
    }

    /// `vᵗ A`. Panics on dimension mismatch.
    pub fn vecmul_left(&self, v: &Vector<T>) -> Vector<T> {
        assert_eq!(v.len(), self.nrows, "dimension mismatch");
        Vector::from_fn(self.ncols, |j| {
            let (rows, vals) = self.col(j);
            rows.iter()
                .zip(vals)
                .fold(T::zero(), |acc, (&i, &a)| acc + v[i] * a)
        })
    }
}
