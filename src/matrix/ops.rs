use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::traits::Scalar;
use crate::vector::Vector;

use super::Matrix;

// ── Element-wise matrix ∘ matrix ────────────────────────────────────

fn check_same_shape<T>(a: &Matrix<T>, b: &Matrix<T>, sym: &str) {
    assert_eq!(
        (a.nrows, a.ncols),
        (b.nrows, b.ncols),
        "dimension mismatch: {}x{} {} {}x{}",
        a.nrows,
        a.ncols,
        sym,
        b.nrows,
        b.ncols,
    );
}

macro_rules! impl_matrix_binop {
    ($Op:ident, $op:ident, $OpAssign:ident, $op_assign:ident, $sym:literal) => {
        impl<T: Scalar> $Op<&Matrix<T>> for &Matrix<T> {
            type Output = Matrix<T>;
            fn $op(self, rhs: &Matrix<T>) -> Matrix<T> {
                check_same_shape(self, rhs, $sym);
                let data = self
                    .data
                    .iter()
                    .zip(rhs.data.iter())
                    .map(|(&a, &b)| a.$op(b))
                    .collect();
                Matrix {
                    data,
                    nrows: self.nrows,
                    ncols: self.ncols,
                }
            }
        }

        impl<T: Scalar> $Op<&Matrix<T>> for Matrix<T> {
            type Output = Matrix<T>;
            fn $op(mut self, rhs: &Matrix<T>) -> Matrix<T> {
                self.$op_assign(rhs);
                self
            }
        }

        impl<T: Scalar> $Op for Matrix<T> {
            type Output = Matrix<T>;
            fn $op(self, rhs: Matrix<T>) -> Matrix<T> {
                self.$op(&rhs)
            }
        }

        impl<T: Scalar> $OpAssign<&Matrix<T>> for Matrix<T> {
            fn $op_assign(&mut self, rhs: &Matrix<T>) {
                check_same_shape(self, rhs, $sym);
                for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
                    *a = (*a).$op(b);
                }
            }
        }

        impl<T: Scalar> $OpAssign for Matrix<T> {
            fn $op_assign(&mut self, rhs: Matrix<T>) {
                self.$op_assign(&rhs);
            }
        }
    };
}

impl_matrix_binop!(Add, add, AddAssign, add_assign, "+");
impl_matrix_binop!(Sub, sub, SubAssign, sub_assign, "-");

impl<T: Scalar> Neg for Matrix<T> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|x| T::zero() - x)
    }
}

impl<T: Scalar> Neg for &Matrix<T> {
    type Output = Matrix<T>;

    fn neg(self) -> Matrix<T> {
        self.map(|x| T::zero() - x)
    }
}

// ── Matrix multiplication ───────────────────────────────────────────

impl<T: Scalar> Mul<&Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            self.ncols,
            rhs.nrows,
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows,
            self.ncols,
            rhs.nrows,
            rhs.ncols,
        );
        let m = self.nrows;
        let n = self.ncols;
        let p = rhs.ncols;
        let mut data = vec![T::zero(); m * p];
        // i-k-j order keeps both operands streaming along rows.
        for i in 0..m {
            for k in 0..n {
                let a_ik = self.data[i * n + k];
                let out = &mut data[i * p..(i + 1) * p];
                for (o, &b) in out.iter_mut().zip(rhs.row_slice(k)) {
                    *o = *o + a_ik * b;
                }
            }
        }
        Matrix {
            data,
            nrows: m,
            ncols: p,
        }
    }
}

impl<T: Scalar> Mul for Matrix<T> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        &self * &rhs
    }
}

impl<T: Scalar> Mul<&Matrix<T>> for Matrix<T> {
    type Output = Matrix<T>;
    fn mul(self, rhs: &Matrix<T>) -> Matrix<T> {
        &self * rhs
    }
}

impl<T: Scalar> Mul<Matrix<T>> for &Matrix<T> {
    type Output = Matrix<T>;
    fn mul(self, rhs: Matrix<T>) -> Matrix<T> {
        self * &rhs
    }
}

// ── Matrix-vector products ──────────────────────────────────────────

impl<T: Scalar> Mul<&Vector<T>> for &Matrix<T> {
    type Output = Vector<T>;

    /// `A * v`, treating `v` as a column.
    fn mul(self, rhs: &Vector<T>) -> Vector<T> {
        self.mul_vector(rhs)
    }
}

impl<T: Scalar> Mul<&Vector<T>> for Matrix<T> {
    type Output = Vector<T>;
    fn mul(self, rhs: &Vector<T>) -> Vector<T> {
        self.mul_vector(rhs)
    }
}

impl<T: Scalar> Matrix<T> {
    /// `A * v` for an `N x M` matrix and a length-`M` vector.
    ///
    /// ```
    /// use lapis::{Matrix, Vector};
    /// let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let v = Vector::from_slice(&[1.0, 0.0, -1.0]);
    /// assert_eq!(a.mul_vector(&v).as_slice(), &[-2.0, -2.0]);
    /// ```
    pub fn mul_vector(&self, v: &Vector<T>) -> Vector<T> {
        assert_eq!(
            self.ncols,
            v.len(),
            "dimension mismatch: {}x{} * {}",
            self.nrows,
            self.ncols,
            v.len(),
        );
        let data: Vec<T> = (0..self.nrows)
            .map(|i| {
                self.row_slice(i)
                    .iter()
                    .zip(v.iter())
                    .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
            })
            .collect();
        Vector::from_vec(data)
    }

    /// `vᵗ * A` for a length-`N` vector and an `N x M` matrix.
    ///
    /// ```
    /// use lapis::{Matrix, Vector};
    /// let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let v = Vector::from_slice(&[1.0, 1.0]);
    /// assert_eq!(a.vecmul_left(&v).as_slice(), &[5.0, 7.0, 9.0]);
    /// ```
    pub fn vecmul_left(&self, v: &Vector<T>) -> Vector<T> {
        assert_eq!(
            v.len(),
            self.nrows,
            "dimension mismatch: {} * {}x{}",
            v.len(),
            self.nrows,
            self.ncols,
        );
        let mut out = vec![T::zero(); self.ncols];
        for (i, &vi) in v.iter().enumerate() {
            for (o, &a) in out.iter_mut().zip(self.row_slice(i)) {
                *o = *o + vi * a;
            }
        }
        Vector::from_vec(out)
    }

    /// `Aᵗ * v` without materializing the transpose.
    ///
    /// Same result as [`vecmul_left`](Self::vecmul_left).
    pub fn transpose_mul_vector(&self, v: &Vector<T>) -> Vector<T> {
        self.vecmul_left(v)
    }
}

// ── Scalar ops ──────────────────────────────────────────────────────

impl<T: Scalar> Mul<T> for Matrix<T> {
    type Output = Self;

    fn mul(mut self, rhs: T) -> Self {
        self *= rhs;
        self
    }
}

impl<T: Scalar> Mul<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn mul(self, rhs: T) -> Matrix<T> {
        self.map(|x| x * rhs)
    }
}

impl<T: Scalar> MulAssign<T> for Matrix<T> {
    fn mul_assign(&mut self, rhs: T) {
        for x in self.data.iter_mut() {
            *x = *x * rhs;
        }
    }
}

impl<T: Scalar> Div<T> for Matrix<T> {
    type Output = Self;

    fn div(mut self, rhs: T) -> Self {
        self /= rhs;
        self
    }
}

impl<T: Scalar> Div<T> for &Matrix<T> {
    type Output = Matrix<T>;

    fn div(self, rhs: T) -> Matrix<T> {
        self.map(|x| x / rhs)
    }
}

impl<T: Scalar> DivAssign<T> for Matrix<T> {
    fn div_assign(&mut self, rhs: T) {
        for x in self.data.iter_mut() {
            *x = *x / rhs;
        }
    }
}

macro_rules! impl_scalar_mul_matrix {
    ($($t:ty),*) => {
        $(
            impl Mul<Matrix<$t>> for $t {
                type Output = Matrix<$t>;
                fn mul(self, rhs: Matrix<$t>) -> Matrix<$t> {
                    rhs * self
                }
            }

            impl Mul<&Matrix<$t>> for $t {
                type Output = Matrix<$t>;
                fn mul(self, rhs: &Matrix<$t>) -> Matrix<$t> {
                    rhs * self
                }
            }
        )*
    };
}

impl_scalar_mul_matrix!(f32, f64);

impl<T: Scalar> Matrix<T> {
    /// Add `value` to every element.
    pub fn add_scalar(&mut self, value: T) {
        for x in self.data.iter_mut() {
            *x = *x + value;
        }
    }

    /// Subtract `value` from every element.
    pub fn sub_scalar(&mut self, value: T) {
        for x in self.data.iter_mut() {
            *x = *x - value;
        }
    }

    /// `value / a[(i, j)]` for every element.
    pub fn scalar_div(&self, value: T) -> Self {
        self.map(|x| value / x)
    }
}

impl<T: Copy> Matrix<T> {
    /// Transpose: an `N x M` matrix becomes `M x N`.
    ///
    /// ```
    /// use lapis::Matrix;
    /// let a = Matrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let t = a.transpose();
    /// assert_eq!(t.shape(), (3, 2));
    /// assert_eq!(t[(2, 1)], 6.0);
    /// ```
    pub fn transpose(&self) -> Self {
        let n = self.ncols;
        Matrix::from_fn(self.ncols, self.nrows, |i, j| self.data[j * n + i])
    }
}
