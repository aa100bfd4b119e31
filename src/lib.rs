//! # lapis
//!
//! Dense and sparse linear algebra kernels for real matrices, no-std
//! compatible (requires `alloc`).
//!
//! ## Quick start
//!
//! ```
//! use lapis::{Matrix, Vector};
//!
//! // Solve a linear system Ax = b
//! let a = Matrix::from_rows(3, 3, &[
//!     2.0_f64, 1.0, -1.0,
//!     -3.0, -1.0, 2.0,
//!     -2.0, 1.0, 2.0,
//! ]);
//! let b = Vector::from_slice(&[8.0, -11.0, -3.0]);
//! let x = a.solve(&b).unwrap(); // x = [2, 3, -1]
//! assert!((x[0] - 2.0).abs() < 1e-12);
//! ```
//!
//! ## Modules
//!
//! - [`vector`] and [`matrix`]: heap-allocated, runtime-sized `Vector<T>` and
//!   row-major `Matrix<T>` with arithmetic, structural predicates, norms and
//!   aligned `Display`. Operator shape errors panic with "dimension mismatch".
//!
//! - [`linalg`]: LUP (partial pivoting, packed or separate factors),
//!   Householder QR (explicit or implicit reflectors), Givens QR of Hessenberg
//!   matrices, Cholesky, triangular and Gaussian solvers, and the QR
//!   eigenvalue iteration for symmetric matrices. Every routine returns
//!   `Result<_, LinalgError>`. Convenience methods on `Matrix`:
//!   `a.solve(&b)`, `a.inverse()`, `a.det()`, `a.lup()`, `a.qr()`,
//!   `a.cholesky()`.
//!
//! - [`sparse`]: coordinate-form [`SparseMatrix`] with CSR/CSC conversions,
//!   sparse matrix-vector products and CSR triangular solves.
//!
//! - [`traits`]: element traits and generic matrix access:
//!   - [`Scalar`]: all matrix elements (`Copy + PartialEq + Debug + Num`)
//!   - [`FloatScalar`]: `f32`/`f64`, required by decompositions and solvers
//!   - [`MatrixRef`] / [`MatrixMut`]: row-slice access used by the in-place
//!     kernels
//!
//! ## Logging
//!
//! Kernels report through the [`log`] facade: pivot swaps and skipped
//! reflectors at `trace`, eigenvalue convergence at `debug`, and an
//! eigenvalue iteration that hits its cap at `warn`. Install any logger to
//! see them.
//!
//! ## Cargo features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `std`   | yes     | Hardware FPU via system libm, `std::error::Error` |
//! | `libm`  | no      | Pure-Rust software float fallback for `no_std` |

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod linalg;
pub mod matrix;
pub mod sparse;
pub mod traits;
pub mod vector;

pub use linalg::LinalgError;
pub use matrix::Matrix;
pub use sparse::{CscMatrix, CsrMatrix, SparseMatrix};
pub use traits::{FloatScalar, MatrixMut, MatrixRef, Scalar};
pub use vector::Vector;

/// Near-zero threshold for pivots, diagonals, reflector norms and
/// convergence.
pub const TOLERANCE: f64 = 1e-14;

/// Default cap on QR eigenvalue iterations.
pub const QR_ITER_MAX: usize = 256;
