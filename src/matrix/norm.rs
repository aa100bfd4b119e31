use crate::traits::FloatScalar;

use super::Matrix;

impl<T: FloatScalar> Matrix<T> {
    /// Frobenius norm.
    ///
    /// ```
    /// use lapis::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
    /// assert!((m.frobenius_norm() - 30.0_f64.sqrt()).abs() < 1e-12);
    /// ```
    pub fn frobenius_norm(&self) -> T {
        self.data
            .iter()
            .fold(T::zero(), |acc, &x| acc + x * x)
            .sqrt()
    }

    /// Infinity norm (maximum absolute row sum).
    ///
    /// ```
    /// use lapis::Matrix;
    /// let m = Matrix::from_rows(2, 2, &[1.0_f64, -2.0, 3.0, 4.0]);
    /// assert!((m.norm_inf() - 7.0).abs() < 1e-12);
    /// ```
    pub fn norm_inf(&self) -> T {
        (0..self.nrows).fold(T::zero(), |best, i| {
            let row_sum = self
                .row_slice(i)
                .iter()
                .fold(T::zero(), |acc, &x| acc + x.abs());
            best.max(row_sum)
        })
    }

    /// Largest absolute entry.
    pub fn max_abs(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc.max(x.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn norms() {
        let m = Matrix::from_rows(2, 3, &[1.0_f64, -2.0, 2.0, 0.0, 0.0, -4.0]);
        assert!((m.frobenius_norm() - 5.0).abs() < 1e-12);
        assert_eq!(m.norm_inf(), 5.0);
        assert_eq!(m.max_abs(), 4.0);
    }
}
