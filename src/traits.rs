use core::fmt::Debug;
use num_traits::{Float, Num, One, Zero};

/// Trait for types that can be used as vector and matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Trait for floating-point elements, required by every decomposition and
/// solver (`sqrt`, `abs`, `hypot`, ...).
///
/// Covers `f32` and `f64`.
pub trait FloatScalar: Scalar + Float {
    /// Near-zero threshold used for pivoting, convergence and structural
    /// predicates: [`TOLERANCE`](crate::TOLERANCE) cast into `Self`.
    #[inline]
    fn tolerance() -> Self {
        num_traits::cast::<f64, Self>(crate::TOLERANCE).unwrap_or_else(Self::epsilon)
    }

    /// Sign with `sign(0) = +1`, as used by Householder reflectors.
    #[inline]
    fn sign_or_one(self) -> Self {
        if self < Self::zero() {
            -Self::one()
        } else {
            Self::one()
        }
    }
}

impl<T: Scalar + Float> FloatScalar for T {}

/// Read-only access to a matrix-like type.
///
/// Storage is row-major: each row is contiguous, which lets the substitution
/// and factorization kernels work on row slices.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;

    /// Row `row` from column `col_start` to the end, as a contiguous slice.
    fn row_as_slice(&self, row: usize, col_start: usize) -> &[T];
}

/// Mutable access to a matrix-like type.
///
/// Extends `MatrixRef` with mutable element access, enabling
/// in-place algorithms (Cholesky, LUP, ...) to work generically.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;

    /// Mutable row slice from column `col_start` to the end.
    fn row_as_mut_slice(&mut self, row: usize, col_start: usize) -> &mut [T];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_f64() {
        assert_eq!(f64::tolerance(), 1e-14);
    }

    #[test]
    fn tolerance_f32_is_finite() {
        let t = f32::tolerance();
        assert!(t > 0.0 && t < 1e-10);
    }

    #[test]
    fn sign_or_one() {
        assert_eq!((-3.0_f64).sign_or_one(), -1.0);
        assert_eq!(0.0_f64.sign_or_one(), 1.0);
        assert_eq!(2.5_f64.sign_or_one(), 1.0);
    }
}
