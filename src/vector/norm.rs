use crate::traits::{FloatScalar, Scalar};

use super::Vector;

impl<T: Scalar> Vector<T> {
    /// Squared L2 norm (dot product with self).
    ///
    /// ```
    /// use lapis::Vector;
    /// let v = Vector::from_slice(&[3.0_f64, 4.0]);
    /// assert_eq!(v.norm_squared(), 25.0);
    /// ```
    pub fn norm_squared(&self) -> T {
        self.dot(self)
    }
}

impl<T: FloatScalar> Vector<T> {
    /// L2 (Euclidean) norm.
    ///
    /// ```
    /// use lapis::Vector;
    /// let v = Vector::from_slice(&[3.0_f64, 4.0]);
    /// assert!((v.norm() - 5.0).abs() < 1e-12);
    /// ```
    pub fn norm(&self) -> T {
        self.norm_squared().sqrt()
    }

    /// L1 norm (sum of absolute values).
    pub fn norm_l1(&self) -> T {
        self.iter().fold(T::zero(), |acc, &x| acc + x.abs())
    }

    /// Infinity norm (largest absolute value).
    pub fn norm_inf(&self) -> T {
        self.iter().fold(T::zero(), |acc, &x| acc.max(x.abs()))
    }

    /// Return a unit vector in the same direction.
    ///
    /// The result is non-finite if the norm is zero.
    pub fn normalize(&self) -> Self {
        self / self.norm()
    }
}
