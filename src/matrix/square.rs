use alloc::vec::Vec;

use crate::traits::{FloatScalar, Scalar};
use crate::vector::Vector;

use super::Matrix;

impl<T: Scalar> Matrix<T> {
    /// Sum of diagonal elements.
    ///
    /// ```
    /// use lapis::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(m.trace(), 5.0);
    /// ```
    pub fn trace(&self) -> T {
        (0..self.nrows.min(self.ncols)).fold(T::zero(), |acc, i| acc + self[(i, i)])
    }

    /// Extract the main diagonal.
    pub fn diag(&self) -> Vector<T> {
        let n = self.nrows.min(self.ncols);
        let data: Vec<T> = (0..n).map(|i| self[(i, i)]).collect();
        Vector::from_vec(data)
    }

    /// Create a square diagonal matrix from a vector.
    ///
    /// ```
    /// use lapis::{Matrix, Vector};
    /// let m = Matrix::from_diag(&Vector::from_slice(&[2.0, 3.0]));
    /// assert_eq!(m[(1, 1)], 3.0);
    /// assert_eq!(m[(0, 1)], 0.0);
    /// ```
    pub fn from_diag(v: &Vector<T>) -> Self {
        let n = v.len();
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = v[i];
        }
        m
    }

    /// Whether the matrix is a permutation matrix: square, entries in
    /// `{0, 1}`, exactly one `1` per row and per column.
    pub fn is_permutation(&self) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows;
        let mut col_seen = alloc::vec![false; n];
        for i in 0..n {
            let mut ones = 0;
            for j in 0..n {
                let x = self[(i, j)];
                if x == T::one() {
                    if col_seen[j] {
                        return false;
                    }
                    col_seen[j] = true;
                    ones += 1;
                } else if x != T::zero() {
                    return false;
                }
            }
            if ones != 1 {
                return false;
            }
        }
        true
    }
}

// ── Structural predicates ───────────────────────────────────────────
//
// Entries with magnitude <= tol count as zero.

impl<T: FloatScalar> Matrix<T> {
    /// `|A[i,j] - A[j,i]| <= tol` for all pairs. False for non-square input.
    ///
    /// ```
    /// use lapis::Matrix;
    /// let sym = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0, 3.0]);
    /// assert!(sym.is_symmetric(1e-14));
    /// ```
    pub fn is_symmetric(&self, tol: T) -> bool {
        if !self.is_square() {
            return false;
        }
        let n = self.nrows;
        for i in 0..n {
            for j in (i + 1)..n {
                if (self[(i, j)] - self[(j, i)]).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Every entry strictly below the diagonal is within `tol` of zero.
    pub fn is_upper_triangular(&self, tol: T) -> bool {
        self.lower_band_is_zero(1, tol)
    }

    /// Every entry strictly above the diagonal is within `tol` of zero.
    pub fn is_lower_triangular(&self, tol: T) -> bool {
        for i in 0..self.nrows {
            for j in (i + 1)..self.ncols {
                if self[(i, j)].abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    pub fn is_diagonal(&self, tol: T) -> bool {
        self.is_upper_triangular(tol) && self.is_lower_triangular(tol)
    }

    /// Every entry below the first subdiagonal is within `tol` of zero.
    ///
    /// ```
    /// use lapis::Matrix;
    /// let h = Matrix::from_rows(3, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0, 0.0, 7.0, 8.0]);
    /// assert!(h.is_upper_hessenberg(1e-14));
    /// assert!(!h.is_upper_triangular(1e-14));
    /// ```
    pub fn is_upper_hessenberg(&self, tol: T) -> bool {
        self.lower_band_is_zero(2, tol)
    }

    /// `A[i,j] ~ 0` whenever `i >= j + offset`.
    fn lower_band_is_zero(&self, offset: usize, tol: T) -> bool {
        for i in offset..self.nrows {
            for j in 0..(i + 1 - offset).min(self.ncols) {
                if self[(i, j)].abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-14;

    #[test]
    fn trace_and_diag() {
        let m = Matrix::from_rows(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.trace(), 6.0);
        assert_eq!(m.diag().as_slice(), &[1.0, 5.0]);
    }

    #[test]
    fn symmetric() {
        let a = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.0 + 1e-16, 3.0]);
        assert!(a.is_symmetric(TOL));
        let b = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 2.1, 3.0]);
        assert!(!b.is_symmetric(TOL));
        assert!(!Matrix::<f64>::zeros(2, 3).is_symmetric(TOL));
    }

    #[test]
    fn triangular_predicates() {
        let u = Matrix::from_rows(3, 3, &[1.0_f64, 2.0, 3.0, 0.0, 4.0, 5.0, 0.0, 0.0, 6.0]);
        assert!(u.is_upper_triangular(TOL));
        assert!(!u.is_lower_triangular(TOL));
        assert!(u.transpose().is_lower_triangular(TOL));
        assert!(u.is_upper_hessenberg(TOL));
        assert!(!u.is_diagonal(TOL));
        assert!(Matrix::<f64>::eye(4).is_diagonal(TOL));
    }

    #[test]
    fn tiny_entries_count_as_zero() {
        let u = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 1e-16, 3.0]);
        assert!(u.is_upper_triangular(TOL));
        assert!(!u.is_upper_triangular(0.0));
    }

    #[test]
    fn hessenberg_rejects_second_subdiagonal() {
        let mut h = Matrix::from_fn(4, 4, |i, j| if i <= j + 1 { 1.0 } else { 0.0 });
        assert!(h.is_upper_hessenberg(TOL));
        h[(3, 1)] = 0.5;
        assert!(!h.is_upper_hessenberg(TOL));
    }

    #[test]
    fn permutation() {
        let p = Matrix::from_rows(3, 3, &[0.0_f64, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        assert!(p.is_permutation());
        assert!(Matrix::<f64>::eye(3).is_permutation());
        let dup = Matrix::from_rows(2, 2, &[1.0_f64, 0.0, 1.0, 0.0]);
        assert!(!dup.is_permutation());
        let scaled = Matrix::from_rows(2, 2, &[2.0_f64, 0.0, 0.0, 1.0]);
        assert!(!scaled.is_permutation());
    }
}
