//! Sparse matrices.
//!
//! [`SparseMatrix`] is the editable coordinate form: nonzeros sorted by
//! their row-major linear index. Once assembled it converts into the
//! compressed [`CsrMatrix`] or [`CscMatrix`] for products and triangular
//! solves.
//!
//! ```
//! use lapis::Vector;
//! use lapis::sparse::{CsrMatrix, SparseMatrix};
//!
//! let mut s = SparseMatrix::new(3, 3);
//! s.set(0, 0, 2.0_f64);
//! s.set(1, 1, 3.0);
//! s.set(2, 0, 1.0);
//! s.set(2, 2, 4.0);
//! assert_eq!(s.nnz(), 4);
//!
//! let l = CsrMatrix::from(&s);
//! let x = l.solve_lower_triangular(&Vector::from_slice(&[2.0, 3.0, 5.0])).unwrap();
//! assert_eq!(x.as_slice(), &[1.0, 1.0, 1.0]);
//! ```

mod csc;
mod csr;

pub use csc::CscMatrix;
pub use csr::CsrMatrix;

use alloc::vec::Vec;
use core::fmt;

use crate::matrix::Matrix;
use crate::traits::FloatScalar;

/// Sparse matrix in coordinate form.
///
/// Entry `(n, m)` is stored under the linear index `n * ncols + m`;
/// `indices` is strictly increasing and parallel to `values`. Entries of
/// magnitude at or below tolerance are never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix<T> {
    nrows: usize,
    ncols: usize,
    indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: FloatScalar> SparseMatrix<T> {
    /// Empty `nrows x ncols` sparse matrix.
    ///
    /// Panics if either dimension is zero.
    pub fn new(nrows: usize, ncols: usize) -> Self {
        assert!(
            nrows > 0 && ncols > 0,
            "matrix dimensions must be at least 1x1"
        );
        Self {
            nrows,
            ncols,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Keep every entry of `a` whose magnitude exceeds tolerance.
    pub fn from_dense(a: &Matrix<T>) -> Self {
        let mut s = Self::new(a.nrows(), a.ncols());
        for (idx, &v) in a.as_slice().iter().enumerate() {
            if v.abs() > T::tolerance() {
                s.indices.push(idx);
                s.values.push(v);
            }
        }
        s
    }

    pub fn to_dense(&self) -> Matrix<T> {
        let mut a = Matrix::zeros(self.nrows, self.ncols);
        let data = a.as_mut_slice();
        for (&idx, &v) in self.indices.iter().zip(&self.values) {
            data[idx] = v;
        }
        a
    }

    #[inline]
    fn linear_index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.nrows && col < self.ncols,
            "index ({}, {}) out of bounds for {}x{} sparse matrix",
            row,
            col,
            self.nrows,
            self.ncols
        );
        row * self.ncols + col
    }

    /// Position of `(row, col)` in the storage arrays, if stored.
    pub fn find(&self, row: usize, col: usize) -> Option<usize> {
        let idx = self.linear_index(row, col);
        self.indices.binary_search(&idx).ok()
    }

    /// Value at `(row, col)`; zero when not stored.
    pub fn get(&self, row: usize, col: usize) -> T {
        self.find(row, col)
            .map_or_else(T::zero, |k| self.values[k])
    }

    /// Store `value` at `(row, col)`.
    ///
    /// A value at or below tolerance removes any stored entry instead.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let idx = self.linear_index(row, col);
        match self.indices.binary_search(&idx) {
            Ok(k) if value.abs() <= T::tolerance() => {
                self.indices.remove(k);
                self.values.remove(k);
            }
            Ok(k) => self.values[k] = value,
            Err(_) if value.abs() <= T::tolerance() => {}
            Err(k) => {
                self.indices.insert(k, idx);
                self.values.insert(k, value);
            }
        }
    }

    /// Remove the entry at `(row, col)`, returning it if it was stored.
    pub fn remove(&mut self, row: usize, col: usize) -> Option<T> {
        let k = self.find(row, col)?;
        self.indices.remove(k);
        Some(self.values.remove(k))
    }
}

impl<T> SparseMatrix<T> {
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Stored linear indices, strictly increasing.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Stored entries as `(row, col, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> + '_ {
        let ncols = self.ncols;
        self.indices
            .iter()
            .zip(&self.values)
            .map(move |(&idx, v)| (idx / ncols, idx % ncols, v))
    }
}

impl<T: fmt::Display> fmt::Display for SparseMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}x{} sparse, {} stored", self.nrows, self.ncols, self.nnz())?;
        for (row, col, v) in self.iter() {
            write!(f, "({}, {}): ", row, col)?;
            fmt::Display::fmt(v, f)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec;

    #[test]
    fn set_get_remove() {
        let mut s = SparseMatrix::<f64>::new(3, 4);
        assert_eq!(s.nnz(), 0);
        s.set(2, 3, 5.0);
        s.set(0, 1, 1.0);
        s.set(1, 0, -2.0);
        assert_eq!(s.indices(), &[1, 4, 11]);
        assert_eq!(s.values(), &[1.0, -2.0, 5.0]);
        assert_eq!(s.get(2, 3), 5.0);
        assert_eq!(s.get(2, 2), 0.0);
        assert_eq!(s.find(1, 0), Some(1));
        assert_eq!(s.find(1, 1), None);

        s.set(0, 1, 7.0);
        assert_eq!(s.get(0, 1), 7.0);
        assert_eq!(s.nnz(), 3);

        assert_eq!(s.remove(1, 0), Some(-2.0));
        assert_eq!(s.remove(1, 0), None);
        assert_eq!(s.nnz(), 2);
    }

    #[test]
    fn tiny_values_are_not_stored() {
        let mut s = SparseMatrix::<f64>::new(2, 2);
        s.set(0, 0, 1e-16);
        assert_eq!(s.nnz(), 0);
        s.set(1, 1, 3.0);
        s.set(1, 1, 0.0);
        assert_eq!(s.nnz(), 0);
    }

    #[test]
    fn dense_conversion() {
        let a = Matrix::from_rows(2, 3, &[1.0_f64, 0.0, 2.0, 0.0, 0.0, -3.0]);
        let s = SparseMatrix::from_dense(&a);
        assert_eq!(s.nnz(), 3);
        assert_eq!(s.to_dense(), a);
        let entries: Vec<(usize, usize, f64)> = s.iter().map(|(r, c, &v)| (r, c, v)).collect();
        assert_eq!(entries, vec![(0, 0, 1.0), (0, 2, 2.0), (1, 2, -3.0)]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn out_of_range_panics() {
        let s = SparseMatrix::<f64>::new(2, 2);
        s.get(2, 0);
    }

    #[test]
    fn display() {
        let mut s = SparseMatrix::<f64>::new(2, 2);
        s.set(1, 0, 2.5);
        assert_eq!(format!("{}", s), "2x2 sparse, 1 stored\n(1, 0): 2.5\n");
    }
}
