use alloc::vec::Vec;
use core::fmt::{self, Write as _};

use crate::traits::Scalar;
use crate::vector::Vector;

use super::Matrix;

// ── Map ─────────────────────────────────────────────────────────────

impl<T> Matrix<T> {
    /// Apply a function to every element, producing a new matrix.
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> Matrix<U>
    where
        T: Copy,
    {
        Matrix {
            data: self.data.iter().map(|&x| f(x)).collect(),
            nrows: self.nrows,
            ncols: self.ncols,
        }
    }
}

// ── Row / Column manipulation ───────────────────────────────────────

impl<T> Matrix<T> {
    /// Swap two rows in place.
    ///
    /// ```
    /// use lapis::Matrix;
    /// let mut m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// m.swap_rows(0, 1);
    /// assert_eq!(m[(0, 0)], 3.0);
    /// assert_eq!(m[(1, 0)], 1.0);
    /// ```
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        self.swap_rows_until(a, b, self.ncols);
    }

    /// Swap only the first `k` columns of rows `a` and `b`.
    ///
    /// Used by the LUP elimination to permute the already-computed part of L.
    ///
    /// ```
    /// use lapis::Matrix;
    /// let mut m = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// m.swap_rows_until(0, 1, 2);
    /// assert_eq!(m.row_slice(0), &[4.0, 5.0, 3.0]);
    /// assert_eq!(m.row_slice(1), &[1.0, 2.0, 6.0]);
    /// ```
    pub fn swap_rows_until(&mut self, a: usize, b: usize, k: usize) {
        if a == b || k == 0 {
            return;
        }
        let k = k.min(self.ncols);
        let (ra, rb) = self.two_rows_mut(a, b);
        ra[..k].swap_with_slice(&mut rb[..k]);
    }

    /// Swap two columns in place.
    pub fn swap_cols(&mut self, a: usize, b: usize) {
        if a != b {
            for i in 0..self.nrows {
                self.data.swap(i * self.ncols + a, i * self.ncols + b);
            }
        }
    }
}

// ── Row / Column access ─────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    /// Copy row `i` into a `Vector`.
    pub fn row(&self, i: usize) -> Vector<T> {
        Vector::from_slice(self.row_slice(i))
    }

    /// Overwrite row `i`.
    pub fn set_row(&mut self, i: usize, v: &Vector<T>) {
        assert_eq!(v.len(), self.ncols, "vector length mismatch");
        self.row_slice_mut(i).copy_from_slice(v.as_slice());
    }

    /// Copy column `j` into a `Vector`.
    ///
    /// ```
    /// use lapis::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(m.col(1).as_slice(), &[2.0, 4.0]);
    /// ```
    pub fn col(&self, j: usize) -> Vector<T> {
        let data: Vec<T> = (0..self.nrows).map(|i| self[(i, j)]).collect();
        Vector::from_vec(data)
    }

    /// Overwrite column `j`.
    pub fn set_col(&mut self, j: usize, v: &Vector<T>) {
        assert_eq!(v.len(), self.nrows, "vector length mismatch");
        for i in 0..self.nrows {
            self[(i, j)] = v[i];
        }
    }
}

// ── Display ─────────────────────────────────────────────────────────

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision();

        // Measure column widths
        let mut widths: Vec<usize> = alloc::vec![0; self.ncols];
        for j in 0..self.ncols {
            for i in 0..self.nrows {
                let w = WriteCounting::count(|wc| write_cell(wc, &self[(i, j)], precision));
                widths[j] = widths[j].max(w);
            }
        }

        for i in 0..self.nrows {
            write!(f, "│")?;
            for j in 0..self.ncols {
                if j > 0 {
                    write!(f, "  ")?;
                }
                let w = WriteCounting::count(|wc| write_cell(wc, &self[(i, j)], precision));
                for _ in w..widths[j] {
                    f.write_char(' ')?;
                }
                write_cell(f, &self[(i, j)], precision)?;
            }
            write!(f, "│")?;
            if i + 1 < self.nrows {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

fn write_cell<T: fmt::Display>(w: &mut dyn fmt::Write, x: &T, precision: Option<usize>) -> fmt::Result {
    match precision {
        Some(p) => write!(w, "{:.*}", p, x),
        None => write!(w, "{}", x),
    }
}

struct WriteCounting {
    count: usize,
}

impl WriteCounting {
    fn count(f: impl FnOnce(&mut Self) -> fmt::Result) -> usize {
        let mut wc = WriteCounting { count: 0 };
        let _ = f(&mut wc);
        wc.count
    }
}

impl fmt::Write for WriteCounting {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.count += s.chars().count();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn swap_rows() {
        let mut m = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
        m.swap_rows(0, 1);
        assert_eq!(m.as_slice(), &[3.0, 4.0, 1.0, 2.0]);
        m.swap_rows(1, 1);
        assert_eq!(m.as_slice(), &[3.0, 4.0, 1.0, 2.0]);
    }

    #[test]
    fn swap_rows_until_zero_is_noop() {
        let mut m = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
        m.swap_rows_until(0, 1, 0);
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn swap_cols() {
        let mut m = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
        m.swap_cols(0, 1);
        assert_eq!(m.as_slice(), &[2.0, 1.0, 4.0, 3.0]);
    }

    #[test]
    fn row_col() {
        let mut m = Matrix::from_rows(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.row(1).as_slice(), &[4.0, 5.0, 6.0]);
        assert_eq!(m.col(2).as_slice(), &[3.0, 6.0]);
        m.set_row(0, &Vector::from_slice(&[7.0, 8.0, 9.0]));
        m.set_col(0, &Vector::from_slice(&[0.0, 0.0]));
        assert_eq!(m.as_slice(), &[0.0, 8.0, 9.0, 0.0, 5.0, 6.0]);
    }

    #[test]
    fn display_alignment() {
        let m = Matrix::from_rows(2, 2, &[1.0_f64, 100.0, 1000.0, 2.0]);
        let s = format!("{}", m);
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].chars().count(), lines[1].chars().count());
    }

    #[test]
    fn display_precision() {
        let m = Matrix::from_rows(1, 2, &[1.0_f64 / 3.0, 2.0]);
        let s = format!("{:.2}", m);
        assert!(s.contains("0.33"));
        assert!(s.contains("2.00"));
    }
}
