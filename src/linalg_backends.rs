// src/linalg_backends.rs

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::ThreadSafeStdError;

// --- Trait Definitions ---

/// A complex scalar as returned by a general (non-symmetric) eigensolver.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexValue {
    pub re: f64,
    pub im: f64,
}

impl ComplexValue {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Absolute value |z|.
    pub fn modulus(&self) -> f64 {
        self.re.hypot(self.im)
    }

    pub fn is_real(&self) -> bool {
        self.im == 0.0
    }
}

/// Output of a symmetric eigendecomposition.
#[derive(Debug)]
pub struct EighOutput {
    /// Eigenvalues, typically sorted in ascending order.
    pub eigenvalues: Array1<f64>,
    /// Eigenvectors as columns of the matrix.
    /// eigenvectors.column(i) corresponds to eigenvalues[i].
    pub eigenvectors: Array2<f64>,
}

/// Output of a general eigendecomposition.
#[derive(Debug)]
pub struct EigOutput {
    /// Eigenvalues in decomposition order.
    pub eigenvalues: Array1<ComplexValue>,
    /// Right eigenvectors as columns; column i pairs with eigenvalues[i].
    pub eigenvectors: Array2<ComplexValue>,
}

/// Symmetric eigendecomposition (similar to LAPACK's DSYEV).
/// Implementers read only the upper triangle of `matrix`.
pub trait BackendEigh {
    fn eigh_upper(&self, matrix: &Array2<f64>) -> Result<EighOutput, ThreadSafeStdError>;
}

/// General eigendecomposition of a real square matrix (similar to LAPACK's DGEEV).
pub trait BackendEig {
    fn eigvals(&self, matrix: &Array2<f64>) -> Result<Array1<ComplexValue>, ThreadSafeStdError>;
    fn eig(&self, matrix: &Array2<f64>) -> Result<EigOutput, ThreadSafeStdError>;
}

// --- NdarrayLinAlgBackend Implementation ---
use ndarray_linalg::{c64, Eig as NdLinalgEig, EigVals as NdLinalgEigVals, Eigh as NdLinalgEigh, UPLO};

/// Concrete backend on top of `ndarray-linalg` (LAPACK).
#[derive(Debug, Default, Copy, Clone)]
pub struct NdarrayLinAlgBackend;

fn to_dyn_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> ThreadSafeStdError {
    Box::new(e)
}

fn from_c64(z: &c64) -> ComplexValue {
    ComplexValue::new(z.re, z.im)
}

impl BackendEigh for NdarrayLinAlgBackend {
    fn eigh_upper(&self, matrix: &Array2<f64>) -> Result<EighOutput, ThreadSafeStdError> {
        let (eigenvalues, eigenvectors) = matrix.eigh(UPLO::Upper).map_err(to_dyn_error)?;
        Ok(EighOutput { eigenvalues, eigenvectors })
    }
}

impl BackendEig for NdarrayLinAlgBackend {
    fn eigvals(&self, matrix: &Array2<f64>) -> Result<Array1<ComplexValue>, ThreadSafeStdError> {
        let values = matrix.eigvals().map_err(to_dyn_error)?;
        Ok(values.map(from_c64))
    }

    fn eig(&self, matrix: &Array2<f64>) -> Result<EigOutput, ThreadSafeStdError> {
        let (values, vectors) = matrix.eig().map_err(to_dyn_error)?;
        Ok(EigOutput {
            eigenvalues: values.map(from_c64),
            eigenvectors: vectors.map(from_c64),
        })
    }
}

// --- FaerLinAlgBackend Implementation ---
#[cfg(feature = "backend_faer")]
mod faer_specific_code {
    use super::{BackendEig, BackendEigh, ComplexValue, EigOutput, EighOutput};
    use crate::error::ThreadSafeStdError;
    use faer::{Mat, MatRef};
    use ndarray::{Array1, Array2};

    fn to_dyn_error_faer(msg: String) -> ThreadSafeStdError {
        Box::new(std::io::Error::new(std::io::ErrorKind::Other, msg))
    }

    #[derive(Debug, Default, Copy, Clone)]
    pub struct FaerLinAlgBackend;

    /// Copies an ndarray matrix into an owned faer matrix. Small inputs make
    /// the copy cheaper than juggling memory layouts.
    fn ndarray_to_faer(matrix: &Array2<f64>) -> Mat<f64> {
        Mat::from_fn(matrix.nrows(), matrix.ncols(), |i, j| matrix[[i, j]])
    }

    fn faer_mat_to_ndarray(faer_mat: MatRef<'_, f64>) -> Array2<f64> {
        Array2::from_shape_fn((faer_mat.nrows(), faer_mat.ncols()), |(i, j)| faer_mat[(i, j)])
    }

    fn check_square(matrix: &Array2<f64>) -> Result<(), ThreadSafeStdError> {
        if matrix.nrows() != matrix.ncols() {
            return Err(to_dyn_error_faer(format!(
                "Matrix must be square for eigendecomposition, got {}x{}.",
                matrix.nrows(),
                matrix.ncols()
            )));
        }
        Ok(())
    }

    impl BackendEigh for FaerLinAlgBackend {
        fn eigh_upper(&self, matrix: &Array2<f64>) -> Result<EighOutput, ThreadSafeStdError> {
            check_square(matrix)?;
            if matrix.is_empty() {
                return Ok(EighOutput { eigenvalues: Array1::zeros(0), eigenvectors: Array2::zeros((0, 0)) });
            }
            let faer_mat = ndarray_to_faer(matrix);
            let eig = faer_mat
                .as_ref()
                .self_adjoint_eigen(faer::Side::Upper)
                .map_err(|e| to_dyn_error_faer(format!("Faer self-adjoint eigendecomposition failed: {:?}", e)))?;
            let diag = eig.S().column_vector();
            let eigenvalues = Array1::from_shape_fn(diag.nrows(), |i| diag[i]);
            Ok(EighOutput {
                eigenvalues,
                eigenvectors: faer_mat_to_ndarray(eig.U()),
            })
        }
    }

    impl BackendEig for FaerLinAlgBackend {
        fn eigvals(&self, matrix: &Array2<f64>) -> Result<Array1<ComplexValue>, ThreadSafeStdError> {
            check_square(matrix)?;
            let faer_mat = ndarray_to_faer(matrix);
            let values = faer_mat
                .as_ref()
                .eigenvalues()
                .map_err(|e| to_dyn_error_faer(format!("Faer eigenvalue computation failed: {:?}", e)))?;
            Ok(values.iter().map(|z| ComplexValue::new(z.re, z.im)).collect())
        }

        fn eig(&self, matrix: &Array2<f64>) -> Result<EigOutput, ThreadSafeStdError> {
            check_square(matrix)?;
            let faer_mat = ndarray_to_faer(matrix);
            let eig = faer_mat
                .as_ref()
                .eigen()
                .map_err(|e| to_dyn_error_faer(format!("Faer eigendecomposition failed: {:?}", e)))?;
            let diag = eig.S().column_vector();
            let vectors = eig.U();
            Ok(EigOutput {
                eigenvalues: Array1::from_shape_fn(diag.nrows(), |i| {
                    let z = diag[i];
                    ComplexValue::new(z.re, z.im)
                }),
                eigenvectors: Array2::from_shape_fn((vectors.nrows(), vectors.ncols()), |(i, j)| {
                    let z = vectors[(i, j)];
                    ComplexValue::new(z.re, z.im)
                }),
            })
        }
    }
}

// --- LinAlgBackendProvider Dispatch ---

/// Dispatches to the linear algebra backend selected by compile-time
/// feature flags: `faer` with `backend_faer`, otherwise `ndarray-linalg`.
#[derive(Debug, Default, Copy, Clone)]
pub struct LinAlgBackendProvider;

impl LinAlgBackendProvider {
    pub fn new() -> Self {
        Self
    }

    /// Name of the active backend, for logging.
    pub fn name(&self) -> &'static str {
        #[cfg(feature = "backend_faer")]
        {
            "faer"
        }
        #[cfg(not(feature = "backend_faer"))]
        {
            "ndarray-linalg"
        }
    }
}

impl BackendEigh for LinAlgBackendProvider {
    fn eigh_upper(&self, matrix: &Array2<f64>) -> Result<EighOutput, ThreadSafeStdError> {
        #[cfg(feature = "backend_faer")]
        {
            faer_specific_code::FaerLinAlgBackend.eigh_upper(matrix)
        }
        #[cfg(not(feature = "backend_faer"))]
        {
            NdarrayLinAlgBackend.eigh_upper(matrix)
        }
    }
}

impl BackendEig for LinAlgBackendProvider {
    fn eigvals(&self, matrix: &Array2<f64>) -> Result<Array1<ComplexValue>, ThreadSafeStdError> {
        #[cfg(feature = "backend_faer")]
        {
            faer_specific_code::FaerLinAlgBackend.eigvals(matrix)
        }
        #[cfg(not(feature = "backend_faer"))]
        {
            NdarrayLinAlgBackend.eigvals(matrix)
        }
    }

    fn eig(&self, matrix: &Array2<f64>) -> Result<EigOutput, ThreadSafeStdError> {
        #[cfg(feature = "backend_faer")]
        {
            faer_specific_code::FaerLinAlgBackend.eig(matrix)
        }
        #[cfg(not(feature = "backend_faer"))]
        {
            NdarrayLinAlgBackend.eig(matrix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_eigh_upper_symmetric() {
        let m = array![[2.0, 1.0], [1.0, 2.0]];
        let out = LinAlgBackendProvider::new().eigh_upper(&m).unwrap();
        let mut vals = out.eigenvalues.to_vec();
        vals.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_abs_diff_eq!(vals[0], 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(vals[1], 3.0, epsilon = 1e-10);

        // A v = lambda v for every returned pair
        for (i, lambda) in out.eigenvalues.iter().enumerate() {
            let v = out.eigenvectors.column(i);
            let av = m.dot(&v);
            for k in 0..2 {
                assert_abs_diff_eq!(av[k], lambda * v[k], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_eigvals_rotation_is_complex() {
        // 90 degree rotation: eigenvalues are +i and -i
        let m = array![[0.0, -1.0], [1.0, 0.0]];
        let vals = LinAlgBackendProvider::new().eigvals(&m).unwrap();
        assert_eq!(vals.len(), 2);
        for z in vals.iter() {
            assert_abs_diff_eq!(z.re, 0.0, epsilon = 1e-10);
            assert_abs_diff_eq!(z.im.abs(), 1.0, epsilon = 1e-10);
            assert_abs_diff_eq!(z.modulus(), 1.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_eig_pairs() {
        let m = array![[4.0, 1.0], [2.0, 3.0]];
        let out = LinAlgBackendProvider::new().eig(&m).unwrap();
        for (i, lambda) in out.eigenvalues.iter().enumerate() {
            assert!(lambda.is_real() || lambda.im.abs() < 1e-12);
            let v: Array1<f64> = out.eigenvectors.column(i).map(|z| z.re);
            let av = m.dot(&v);
            for k in 0..2 {
                assert_abs_diff_eq!(av[k], lambda.re * v[k], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_complex_modulus() {
        assert_abs_diff_eq!(ComplexValue::new(3.0, -4.0).modulus(), 5.0, epsilon = 1e-12);
        assert!(ComplexValue::new(1.0, 0.0).is_real());
    }
}
