// Principal component analysis (PCA)

use log::{debug, info, warn};
use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use serde::Serialize;

use crate::error::LabError;
use crate::linalg_backends::{BackendEigh, LinAlgBackendProvider};

/// Principal components of a sample matrix, derived once per call.
///
/// Components are ordered by descending eigenvalue. Eigenvectors are only
/// defined up to sign, and up to rotation within repeated eigenvalues.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PcaResult {
    /// Principal axes as columns. Shape: (n_features, k_components)
    principal_components: Array2<f64>,
    /// Eigenvalues of the sample covariance matrix. Shape: (k_components)
    explained_variance: Array1<f64>,
    /// `explained_variance / sum(all eigenvalues)`. Shape: (k_components)
    explained_variance_ratio: Array1<f64>,
    /// Centered samples projected onto the axes. Shape: (n_samples, k_components)
    projected_data: Array2<f64>,
    /// Per-feature mean of the input. Shape: (n_features)
    mean: Array1<f64>,
}

impl PcaResult {
    pub fn principal_components(&self) -> &Array2<f64> {
        &self.principal_components
    }

    pub fn explained_variance(&self) -> &Array1<f64> {
        &self.explained_variance
    }

    pub fn explained_variance_ratio(&self) -> &Array1<f64> {
        &self.explained_variance_ratio
    }

    pub fn projected_data(&self) -> &Array2<f64> {
        &self.projected_data
    }

    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    pub fn n_components(&self) -> usize {
        self.principal_components.ncols()
    }

    /// Fraction of total variance captured by the first `k` components.
    /// `k` is clamped to the number of components.
    pub fn cumulative_explained_variance(&self, k: usize) -> f64 {
        let k = k.min(self.explained_variance_ratio.len());
        self.explained_variance_ratio.slice(s![..k]).sum()
    }

    /// Keeps only the first `k` components (clamped to the number available).
    /// Ratios stay relative to the total variance of all components.
    pub fn truncated(&self, k: usize) -> PcaResult {
        let k = k.min(self.n_components());
        PcaResult {
            principal_components: self.principal_components.slice(s![.., ..k]).to_owned(),
            explained_variance: self.explained_variance.slice(s![..k]).to_owned(),
            explained_variance_ratio: self.explained_variance_ratio.slice(s![..k]).to_owned(),
            projected_data: self.projected_data.slice(s![.., ..k]).to_owned(),
            mean: self.mean.clone(),
        }
    }

    /// Projects new samples onto the principal axes using the stored mean.
    ///
    /// # Errors
    /// `DimensionMismatch` if `data` does not have `n_features` columns.
    pub fn project(&self, data: ArrayView2<f64>) -> Result<Array2<f64>, LabError> {
        let n_features = self.mean.len();
        if data.ncols() != n_features {
            return Err(LabError::DimensionMismatch {
                expected: n_features,
                actual: data.ncols(),
            });
        }
        let centered = &data - &self.mean;
        Ok(centered.dot(&self.principal_components))
    }
}

/// Runs PCA on a samples × features matrix using the sample covariance
/// matrix (divided by `n_samples - 1`) and a symmetric eigensolver.
///
/// Steps: center each column, form the covariance, eigendecompose it,
/// sort eigenpairs by descending eigenvalue (stable for ties), project the
/// centered data, and normalize the eigenvalues into variance ratios.
///
/// # Errors
/// `InvalidShape` if the matrix is empty, `DegenerateInput` if it has fewer
/// than 2 samples, `Backend` if the eigendecomposition fails.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use matrix_lab::pca::pca;
///
/// let data = array![[2.0, 0.0], [0.0, 2.0], [-2.0, 0.0], [0.0, -2.0]];
/// let result = pca(data.view()).unwrap();
/// assert_eq!(result.projected_data().dim(), (4, 2));
/// ```
pub fn pca(data_matrix: ArrayView2<f64>) -> Result<PcaResult, LabError> {
    let (n_samples, n_features) = data_matrix.dim();

    if n_samples == 0 || n_features == 0 {
        return Err(LabError::InvalidShape(format!(
            "input data_matrix has zero samples or zero features ({}x{})",
            n_samples, n_features
        )));
    }
    if n_samples < 2 {
        return Err(LabError::DegenerateInput(format!(
            "sample covariance needs at least 2 samples, got {}",
            n_samples
        )));
    }

    info!("Running PCA on {} samples x {} features.", n_samples, n_features);

    let mean_vector = data_matrix
        .mean_axis(Axis(0))
        .ok_or_else(|| LabError::InvalidShape("failed to compute mean of the data".to_string()))?;
    let centered = &data_matrix - &mean_vector;

    let mut cov_matrix = centered.t().dot(&centered);
    cov_matrix /= (n_samples - 1) as f64;
    debug!("Covariance matrix:\n{:?}", cov_matrix);

    let eig = LinAlgBackendProvider::new()
        .eigh_upper(&cov_matrix)
        .map_err(|e| LabError::backend("Eigen decomposition of covariance matrix failed", e))?;

    let mut eig_pairs: Vec<(f64, Array1<f64>)> = eig
        .eigenvalues
        .iter()
        .copied()
        .zip(eig.eigenvectors.columns().into_iter().map(|col| col.to_owned()))
        .collect();
    // Vec::sort_by is stable, so equal eigenvalues keep the solver's order.
    eig_pairs.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let mut principal_components = Array2::<f64>::zeros((n_features, eig_pairs.len()));
    let mut explained_variance = Array1::<f64>::zeros(eig_pairs.len());
    for (i, (val, vec)) in eig_pairs.iter().enumerate() {
        explained_variance[i] = *val;
        principal_components.column_mut(i).assign(vec);
    }
    debug!("Sorted eigenvalues: {:?}", explained_variance);

    let projected_data = centered.dot(&principal_components);

    let total_variance = explained_variance.sum();
    let explained_variance_ratio = if total_variance > 0.0 {
        &explained_variance / total_variance
    } else {
        warn!("Total variance is zero; all samples are identical. Reporting zero variance ratios.");
        Array1::zeros(explained_variance.len())
    };

    info!(
        "PCA finished: {} components, explained variance ratio {:?}.",
        principal_components.ncols(),
        explained_variance_ratio
    );

    Ok(PcaResult {
        principal_components,
        explained_variance,
        explained_variance_ratio,
        projected_data,
        mean: mean_vector,
    })
}
