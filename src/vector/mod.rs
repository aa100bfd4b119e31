mod norm;
mod ops;

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use crate::traits::{MatrixMut, MatrixRef, Scalar};

/// Heap-allocated dense vector of `N >= 1` elements.
///
/// The buffer length always equals the vector size. Implements
/// [`MatrixRef`] / [`MatrixMut`] as a single row.
///
/// # Examples
///
/// ```
/// use lapis::Vector;
///
/// let v = Vector::from_slice(&[1.0_f64, 2.0, 3.0]);
/// assert_eq!(v[0], 1.0);
/// assert_eq!(v.len(), 3);
/// assert!((v.dot(&v) - 14.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T> {
    data: Vec<T>,
}

// ── Constructors ────────────────────────────────────────────────────

impl<T: Scalar> Vector<T> {
    /// Create a zero vector of length `n`.
    ///
    /// Panics if `n == 0`.
    ///
    /// ```
    /// use lapis::Vector;
    /// let v = Vector::<f64>::zeros(4);
    /// assert_eq!(v.len(), 4);
    /// assert_eq!(v[3], 0.0);
    /// ```
    pub fn zeros(n: usize) -> Self {
        Self::fill(n, T::zero())
    }

    /// Create a vector filled with `value`.
    pub fn fill(n: usize, value: T) -> Self {
        assert!(n > 0, "vector size must be at least 1");
        Self {
            data: vec![value; n],
        }
    }

    /// Standard basis vector `e_i` of length `n`.
    ///
    /// ```
    /// use lapis::Vector;
    /// let e = Vector::<f64>::basis(3, 1);
    /// assert_eq!(e.as_slice(), &[0.0, 1.0, 0.0]);
    /// ```
    pub fn basis(n: usize, i: usize) -> Self {
        assert!(i < n, "basis index {} out of range for length {}", i, n);
        let mut v = Self::zeros(n);
        v.data[i] = T::one();
        v
    }

    /// Create a vector from a slice.
    ///
    /// ```
    /// use lapis::Vector;
    /// let v = Vector::from_slice(&[1.0, 2.0, 3.0]);
    /// assert_eq!(v[2], 3.0);
    /// ```
    pub fn from_slice(data: &[T]) -> Self {
        Self::from_vec(data.to_vec())
    }
}

impl<T> Vector<T> {
    /// Create a vector from an owned `Vec`.
    ///
    /// Panics if `data` is empty.
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(!data.is_empty(), "vector size must be at least 1");
        Self { data }
    }

    /// Create a vector by calling `f(i)` for each index.
    ///
    /// ```
    /// use lapis::Vector;
    /// let v = Vector::from_fn(3, |i| (i * i) as f64);
    /// assert_eq!(v[2], 4.0);
    /// ```
    pub fn from_fn(n: usize, f: impl Fn(usize) -> T) -> Self {
        Self::from_vec((0..n).map(f).collect())
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: a vector holds at least one element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Consume the vector, returning its buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Swap elements `a` and `b`.
    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.data.swap(a, b);
    }

    /// Apply a function to every element, producing a new vector.
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> Vector<U>
    where
        T: Copy,
    {
        Vector {
            data: self.data.iter().map(|&x| f(x)).collect(),
        }
    }
}

impl<T: Scalar> Vector<T> {
    /// Dot product.
    ///
    /// ```
    /// use lapis::Vector;
    /// let a = Vector::from_slice(&[1.0, 2.0, 3.0]);
    /// let b = Vector::from_slice(&[4.0, 5.0, 6.0]);
    /// assert_eq!(a.dot(&b), 32.0);
    /// ```
    pub fn dot(&self, rhs: &Self) -> T {
        assert_eq!(
            self.len(),
            rhs.len(),
            "dimension mismatch: {} . {}",
            self.len(),
            rhs.len()
        );
        let mut sum = T::zero();
        for (&a, &b) in self.data.iter().zip(rhs.data.iter()) {
            sum = sum + a * b;
        }
        sum
    }

    /// Sum of all elements.
    pub fn sum(&self) -> T {
        self.data.iter().fold(T::zero(), |acc, &x| acc + x)
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

// ── MatrixRef / MatrixMut ───────────────────────────────────────────

impl<T> MatrixRef<T> for Vector<T> {
    #[inline]
    fn nrows(&self) -> usize {
        1
    }

    #[inline]
    fn ncols(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> &T {
        debug_assert_eq!(row, 0);
        &self.data[col]
    }

    #[inline]
    fn row_as_slice(&self, row: usize, col_start: usize) -> &[T] {
        debug_assert_eq!(row, 0);
        &self.data[col_start..]
    }
}

impl<T> MatrixMut<T> for Vector<T> {
    #[inline]
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T {
        debug_assert_eq!(row, 0);
        &mut self.data[col]
    }

    #[inline]
    fn row_as_mut_slice(&mut self, row: usize, col_start: usize) -> &mut [T] {
        debug_assert_eq!(row, 0);
        &mut self.data[col_start..]
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T> AsRef<[T]> for Vector<T> {
    fn as_ref(&self) -> &[T] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice() {
        let v = Vector::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(v.len(), 3);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[2], 3.0);
    }

    #[test]
    fn zeros() {
        let v = Vector::<f64>::zeros(4);
        assert_eq!(v.len(), 4);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    #[should_panic(expected = "at least 1")]
    fn zero_length_rejected() {
        let _ = Vector::<f64>::zeros(0);
    }

    #[test]
    fn index_mut() {
        let mut v = Vector::<f64>::zeros(3);
        v[1] = 42.0;
        assert_eq!(v[1], 42.0);
    }

    #[test]
    fn basis() {
        let e = Vector::<f64>::basis(4, 2);
        assert_eq!(e.as_slice(), &[0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn dot_product() {
        let a = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let b = Vector::from_slice(&[4.0, 5.0, 6.0]);
        assert_eq!(a.dot(&b), 32.0);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn dot_length_mismatch() {
        let a = Vector::from_slice(&[1.0, 2.0]);
        let b = Vector::from_slice(&[1.0, 2.0, 3.0]);
        let _ = a.dot(&b);
    }

    #[test]
    fn matrix_ref_trait() {
        let v = Vector::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(v.nrows(), 1);
        assert_eq!(v.ncols(), 3);
        assert_eq!(*v.get(0, 1), 2.0);
        assert_eq!(v.row_as_slice(0, 1), &[2.0, 3.0]);
    }
}
