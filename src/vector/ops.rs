use alloc::vec::Vec;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::traits::Scalar;

use super::Vector;

// ── Element-wise vector ∘ vector ────────────────────────────────────

fn zip_with<T: Scalar>(a: &Vector<T>, b: &Vector<T>, sym: &str, f: impl Fn(T, T) -> T) -> Vector<T> {
    assert_eq!(
        a.len(),
        b.len(),
        "dimension mismatch: {} {} {}",
        a.len(),
        sym,
        b.len(),
    );
    let data: Vec<T> = a.iter().zip(b.iter()).map(|(&x, &y)| f(x, y)).collect();
    Vector::from_vec(data)
}

fn zip_assign<T: Scalar>(a: &mut Vector<T>, b: &Vector<T>, sym: &str, f: impl Fn(T, T) -> T) {
    assert_eq!(
        a.len(),
        b.len(),
        "dimension mismatch: {} {} {}",
        a.len(),
        sym,
        b.len(),
    );
    for (x, &y) in a.iter_mut().zip(b.iter()) {
        *x = f(*x, y);
    }
}

macro_rules! impl_vector_binop {
    ($Op:ident, $op:ident, $OpAssign:ident, $op_assign:ident, $sym:literal) => {
        impl<T: Scalar> $Op<&Vector<T>> for &Vector<T> {
            type Output = Vector<T>;
            fn $op(self, rhs: &Vector<T>) -> Vector<T> {
                zip_with(self, rhs, $sym, |a, b| a.$op(b))
            }
        }

        impl<T: Scalar> $Op<&Vector<T>> for Vector<T> {
            type Output = Vector<T>;
            fn $op(mut self, rhs: &Vector<T>) -> Vector<T> {
                zip_assign(&mut self, rhs, $sym, |a, b| a.$op(b));
                self
            }
        }

        impl<T: Scalar> $Op for Vector<T> {
            type Output = Vector<T>;
            fn $op(self, rhs: Vector<T>) -> Vector<T> {
                self.$op(&rhs)
            }
        }

        impl<T: Scalar> $OpAssign<&Vector<T>> for Vector<T> {
            fn $op_assign(&mut self, rhs: &Vector<T>) {
                zip_assign(self, rhs, $sym, |a, b| a.$op(b));
            }
        }

        impl<T: Scalar> $OpAssign for Vector<T> {
            fn $op_assign(&mut self, rhs: Vector<T>) {
                zip_assign(self, &rhs, $sym, |a, b| a.$op(b));
            }
        }
    };
}

impl_vector_binop!(Add, add, AddAssign, add_assign, "+");
impl_vector_binop!(Sub, sub, SubAssign, sub_assign, "-");

// ── Scalar ops: vector ∘ scalar ─────────────────────────────────────

impl<T: Scalar> Mul<T> for Vector<T> {
    type Output = Self;

    fn mul(mut self, rhs: T) -> Self {
        self *= rhs;
        self
    }
}

impl<T: Scalar> Mul<T> for &Vector<T> {
    type Output = Vector<T>;

    fn mul(self, rhs: T) -> Vector<T> {
        self.map(|x| x * rhs)
    }
}

impl<T: Scalar> MulAssign<T> for Vector<T> {
    fn mul_assign(&mut self, rhs: T) {
        for x in self.iter_mut() {
            *x = *x * rhs;
        }
    }
}

impl<T: Scalar> Div<T> for Vector<T> {
    type Output = Self;

    fn div(mut self, rhs: T) -> Self {
        self /= rhs;
        self
    }
}

impl<T: Scalar> Div<T> for &Vector<T> {
    type Output = Vector<T>;

    fn div(self, rhs: T) -> Vector<T> {
        self.map(|x| x / rhs)
    }
}

impl<T: Scalar> DivAssign<T> for Vector<T> {
    fn div_assign(&mut self, rhs: T) {
        for x in self.iter_mut() {
            *x = *x / rhs;
        }
    }
}

impl<T: Scalar> Neg for Vector<T> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|x| T::zero() - x)
    }
}

impl<T: Scalar> Neg for &Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Vector<T> {
        self.map(|x| T::zero() - x)
    }
}

// ── scalar * vector (concrete impls) ────────────────────────────────

macro_rules! impl_scalar_mul_vector {
    ($($t:ty),*) => {
        $(
            impl Mul<Vector<$t>> for $t {
                type Output = Vector<$t>;
                fn mul(self, rhs: Vector<$t>) -> Vector<$t> {
                    rhs * self
                }
            }

            impl Mul<&Vector<$t>> for $t {
                type Output = Vector<$t>;
                fn mul(self, rhs: &Vector<$t>) -> Vector<$t> {
                    rhs * self
                }
            }
        )*
    };
}

impl_scalar_mul_vector!(f32, f64);

impl<T: Scalar> Vector<T> {
    /// Add `value` to every element.
    pub fn add_scalar(&mut self, value: T) {
        for x in self.iter_mut() {
            *x = *x + value;
        }
    }

    /// Subtract `value` from every element.
    pub fn sub_scalar(&mut self, value: T) {
        for x in self.iter_mut() {
            *x = *x - value;
        }
    }

    /// `value / v[i]` for every element.
    pub fn scalar_div(&self, value: T) -> Self {
        self.map(|x| value / x)
    }

    /// Element-wise (Hadamard) product.
    ///
    /// ```
    /// use lapis::Vector;
    /// let a = Vector::from_slice(&[1.0, 2.0]);
    /// let b = Vector::from_slice(&[3.0, 4.0]);
    /// assert_eq!(a.element_mul(&b).as_slice(), &[3.0, 8.0]);
    /// ```
    pub fn element_mul(&self, rhs: &Self) -> Self {
        zip_with(self, rhs, "*", |a, b| a * b)
    }

    /// Element-wise quotient.
    pub fn element_div(&self, rhs: &Self) -> Self {
        zip_with(self, rhs, "/", |a, b| a / b)
    }
}
