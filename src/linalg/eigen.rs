use crate::linalg::hessenberg::{decompose_hessenberg_qr_in_place, hessenberg};
use crate::linalg::qr::decompose_qr_in_place;
use crate::linalg::{ensure_square, LinalgError};
use crate::matrix::Matrix;
use crate::traits::FloatScalar;
use crate::vector::Vector;
use crate::{QR_ITER_MAX, TOLERANCE};

/// Which QR factorization drives each eigenvalue iteration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EigenMethod {
    /// Full Householder QR of the iterate on every step.
    #[default]
    Householder,
    /// Reduce to Hessenberg (tridiagonal) form once, then factor each
    /// iterate with Givens rotations.
    Hessenberg,
}

/// Settings for the QR eigenvalue iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenSettings<T> {
    /// Largest absolute entry allowed below the diagonal for the iterate to
    /// count as triangular (default: 1e-14 for `f64`, 1e-6 for `f32`).
    pub tolerance: T,
    /// Iteration cap (default: 256).
    pub max_iter: usize,
    /// Factorization used per step (default: [`EigenMethod::Householder`]).
    pub method: EigenMethod,
}

impl Default for EigenSettings<f64> {
    fn default() -> Self {
        Self {
            tolerance: TOLERANCE,
            max_iter: QR_ITER_MAX,
            method: EigenMethod::Householder,
        }
    }
}

impl Default for EigenSettings<f32> {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            max_iter: QR_ITER_MAX,
            method: EigenMethod::Householder,
        }
    }
}

/// Outcome of the QR eigenvalue iteration.
///
/// `values` is the diagonal of the final iterate, in the order the
/// iteration leaves it (typically decreasing magnitude). When `converged`
/// is `false` the values are the best estimate after `iterations` steps.
#[derive(Debug, Clone, PartialEq)]
pub struct QrEigenvalues<T> {
    pub values: Vector<T>,
    pub iterations: usize,
    pub converged: bool,
}

impl<T> QrEigenvalues<T> {
    /// Keep converged values, report [`LinalgError::ConvergenceFailure`]
    /// otherwise.
    pub fn into_result(self) -> Result<Vector<T>, LinalgError> {
        if self.converged {
            Ok(self.values)
        } else {
            Err(LinalgError::ConvergenceFailure {
                iterations: self.iterations,
            })
        }
    }
}

/// Eigenvalues of a real symmetric matrix by unshifted QR iteration with
/// default settings.
///
/// ```
/// use lapis::Matrix;
/// use lapis::linalg::eigenvalues_qr;
///
/// let a = Matrix::from_rows(2, 2, &[4.0_f64, 1.0, 1.0, 3.0]);
/// let eig = eigenvalues_qr(&a).unwrap();
/// assert!(eig.converged);
/// let s5 = 5.0_f64.sqrt();
/// assert!((eig.values[0] - (7.0 + s5) / 2.0).abs() < 1e-12);
/// assert!((eig.values[1] - (7.0 - s5) / 2.0).abs() < 1e-12);
/// ```
pub fn eigenvalues_qr<T: FloatScalar>(a: &Matrix<T>) -> Result<QrEigenvalues<T>, LinalgError>
where
    EigenSettings<T>: Default,
{
    eigenvalues_qr_with(a, &EigenSettings::default())
}

/// Eigenvalues of a real symmetric matrix by unshifted QR iteration.
///
/// Each step factors the iterate `A_k = Q R` and forms `A_{k+1} = R Q`,
/// a similarity transform. Iteration stops as soon as the iterate is upper
/// triangular within `settings.tolerance`; an input that already is
/// returns after zero steps.
///
/// Hitting `settings.max_iter` is not an error here: the result carries
/// `converged = false` and a warning is logged.
pub fn eigenvalues_qr_with<T: FloatScalar>(
    a: &Matrix<T>,
    settings: &EigenSettings<T>,
) -> Result<QrEigenvalues<T>, LinalgError> {
    let n = ensure_square(a)?;
    if !a.is_symmetric(T::tolerance()) {
        return Err(LinalgError::NotSymmetric);
    }

    let mut iterate = match settings.method {
        EigenMethod::Householder => a.clone(),
        EigenMethod::Hessenberg => hessenberg(a)?.0,
    };
    let mut q = Matrix::eye(n);

    let mut iterations = 0;
    let mut converged = iterate.is_upper_triangular(settings.tolerance);
    while !converged && iterations < settings.max_iter {
        match settings.method {
            EigenMethod::Householder => {
                decompose_qr_in_place(&mut q, &mut iterate)?;
                iterate = &iterate * &q;
            }
            EigenMethod::Hessenberg => {
                decompose_hessenberg_qr_in_place(&mut q, &mut iterate)?;
                iterate = &iterate * &q;
                // R Q stays Hessenberg; clear roundoff below the subdiagonal.
                for i in 2..n {
                    for x in &mut iterate.row_slice_mut(i)[..i - 1] {
                        *x = T::zero();
                    }
                }
            }
        }
        iterations += 1;
        converged = iterate.is_upper_triangular(settings.tolerance);
    }

    if converged {
        log::debug!("QR eigenvalue iteration converged after {} iterations (n = {})", iterations, n);
    } else {
        log::warn!(
            "QR eigenvalue iteration stopped at the cap of {} iterations (n = {})",
            iterations,
            n
        );
    }

    Ok(QrEigenvalues {
        values: iterate.diag(),
        iterations,
        converged,
    })
}
