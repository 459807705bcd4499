// src/eigen.rs

//! General (non-symmetric) eigendecomposition and the reference dominant
//! eigenvalue used to validate power iteration.

use log::{debug, info, warn};
use ndarray::{Array2, ArrayView2};

use crate::error::LabError;
use crate::linalg_backends::{BackendEig, ComplexValue, LinAlgBackendProvider};
use crate::matrix::ensure_square;

/// Eigenvalues and right eigenvectors of a real square matrix.
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    /// Eigenvalues in decomposition order (not sorted).
    pub eigenvalues: Vec<ComplexValue>,
    /// Column `i` is the eigenvector paired with `eigenvalues[i]`.
    pub eigenvectors: Array2<ComplexValue>,
}

/// Computes all eigenvalues and right eigenvectors of a square matrix.
///
/// # Errors
/// `InvalidShape` for an empty or non-square matrix; `Backend` if the
/// decomposition fails.
pub fn eigen_decomposition(matrix: ArrayView2<f64>) -> Result<EigenDecomposition, LabError> {
    let n = ensure_square(matrix)?;
    info!("Computing general eigendecomposition of a {}x{} matrix.", n, n);

    let backend = LinAlgBackendProvider::new();
    let out = backend
        .eig(&matrix.to_owned())
        .map_err(|e| LabError::backend("Eigen decomposition failed", e))?;

    debug!("Eigenvalues ({}): {:?}", backend.name(), out.eigenvalues);
    Ok(EigenDecomposition {
        eigenvalues: out.eigenvalues.to_vec(),
        eigenvectors: out.eigenvectors,
    })
}

/// Returns the index of the value with the largest modulus.
/// Ties go to the first maximum encountered.
pub fn index_of_max_modulus(values: &[ComplexValue]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, z) in values.iter().enumerate() {
        let m = z.modulus();
        match best {
            Some((_, best_m)) if m <= best_m => {}
            _ => best = Some((idx, m)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// The dominant eigenvalue of a square matrix: the eigenvalue of maximum
/// absolute magnitude from a general eigendecomposition.
///
/// Only the real part is returned. If the dominant eigenvalue is complex a
/// warning is logged, since power iteration cannot converge to it.
pub fn dominant_eigenvalue(matrix: ArrayView2<f64>) -> Result<f64, LabError> {
    ensure_square(matrix)?;
    let values = LinAlgBackendProvider::new()
        .eigvals(&matrix.to_owned())
        .map_err(|e| LabError::backend("Eigenvalue computation failed", e))?;

    let values = values.to_vec();
    let idx = index_of_max_modulus(&values)
        .ok_or_else(|| LabError::InvalidShape("matrix has no eigenvalues".to_string()))?;
    let dominant = values[idx];
    if !dominant.is_real() {
        warn!(
            "Dominant eigenvalue is complex ({} + {}i); reporting its real part.",
            dominant.re, dominant.im
        );
    }
    Ok(dominant.re)
}
