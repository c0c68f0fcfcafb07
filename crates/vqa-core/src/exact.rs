//! Dense exact diagonalization for small Hamiltonians.
//!
//! Matrices are assembled with `ndarray` and handed to `faer`'s self-adjoint
//! eigenvalue routine, which works on complex Hermitian input directly.
//!
//! Cost is `O(d³)` in the matrix dimension `d = 2^n`, so widths are capped at
//! [`MAX_EXACT_QUBITS`].

use faer::{Mat, Side, c64};
use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{VqaError, VqaResult};

/// Largest register that will be diagonalized densely.
pub const MAX_EXACT_QUBITS: usize = 12;

/// Reject widths above [`MAX_EXACT_QUBITS`].
pub fn check_width(num_qubits: usize) -> VqaResult<()> {
    if num_qubits > MAX_EXACT_QUBITS {
        return Err(VqaError::TooManyQubits {
            num_qubits,
            max: MAX_EXACT_QUBITS,
        });
    }
    Ok(())
}

/// Smallest eigenvalue of a real symmetric matrix.
///
/// Only the lower triangle is read.
pub fn lowest_eigenvalue_symmetric(matrix: &Array2<f64>) -> VqaResult<f64> {
    let n = matrix.nrows();
    let a = Mat::<f64>::from_fn(n, n, |i, j| matrix[[i, j]]);
    let eigenvalues = a
        .as_ref()
        .self_adjoint_eigenvalues(Side::Lower)
        .map_err(|e| VqaError::Eigensolver(format!("{e:?}")))?;
    lowest(eigenvalues)
}

/// Smallest eigenvalue of a complex Hermitian matrix.
///
/// Only the lower triangle is read.
pub fn lowest_eigenvalue_hermitian(matrix: &Array2<Complex64>) -> VqaResult<f64> {
    let n = matrix.nrows();
    let a = Mat::<c64>::from_fn(n, n, |i, j| {
        let z = matrix[[i, j]];
        c64::new(z.re, z.im)
    });
    let eigenvalues = a
        .as_ref()
        .self_adjoint_eigenvalues(Side::Lower)
        .map_err(|e| VqaError::Eigensolver(format!("{e:?}")))?;
    lowest(eigenvalues)
}

fn lowest(eigenvalues: Vec<f64>) -> VqaResult<f64> {
    eigenvalues
        .into_iter()
        .reduce(f64::min)
        .ok_or_else(|| VqaError::Eigensolver("empty matrix has no eigenvalues".into()))
}
