// src/api.rs

//! JSON request/response boundary for the numerical endpoints.
//!
//! Each endpoint takes a JSON object whose `matrix` field holds nested rows of
//! numbers and answers with a JSON object. Failures are reported as a
//! [`LabError`]; [`error_body`] renders one as `{"message": "..."}` and
//! [`ErrorKind`](crate::error::ErrorKind) lets the caller choose a status code.

use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::eigen::eigen_decomposition;
use crate::error::LabError;
use crate::linalg_backends::ComplexValue;
use crate::matrix::{matrix_from_rows, matrix_to_rows};
use crate::pca::pca;
use crate::power_iteration::{
    power_iteration, PowerIterationConfig, SeedVector, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};
use crate::transform::{transform, RotationSpec, TranslationSpec};

/// The endpoints this crate serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Transform,
    PowerMethod,
    Pca,
    ComputeEigen,
}

impl Endpoint {
    pub const ALL: [Endpoint; 4] = [
        Endpoint::Transform,
        Endpoint::PowerMethod,
        Endpoint::Pca,
        Endpoint::ComputeEigen,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Transform => "/transform",
            Endpoint::PowerMethod => "/power-method",
            Endpoint::Pca => "/pca",
            Endpoint::ComputeEigen => "/compute-eigen",
        }
    }

    /// Looks up an endpoint by route. A trailing slash is accepted.
    pub fn from_path(path: &str) -> Option<Endpoint> {
        let trimmed = path.trim_end_matches('/');
        Endpoint::ALL.into_iter().find(|e| e.path() == trimmed)
    }
}

// --- Requests ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransformRequest {
    pub matrix: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub rotation: Option<RotationSpec>,
    #[serde(default)]
    pub translation: Option<TranslationSpec>,
}

fn default_max_iter() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_tol() -> f64 {
    DEFAULT_TOLERANCE
}

#[derive(Debug, Clone, Deserialize)]
pub struct PowerMethodRequest {
    pub matrix: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub initial_vector: Option<Vec<f64>>,
    #[serde(default)]
    pub use_random: bool,
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    #[serde(default = "default_tol")]
    pub tol: f64,
    /// Seeds the random start vector for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PcaRequest {
    pub matrix: Option<Vec<Vec<f64>>>,
    /// Keep only the leading components.
    #[serde(default)]
    pub n_components: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EigenRequest {
    pub matrix: Option<Vec<Vec<f64>>>,
}

// --- Responses ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformResponse {
    pub transformed: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerMethodResponse {
    /// Normalized iterate after each completed iteration.
    pub vectors: Vec<Vec<f64>>,
    /// Rayleigh-quotient estimate after each completed iteration.
    pub eigenvalues: Vec<f64>,
    pub true_max_eigenvalue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PcaResponse {
    /// n_features rows; column `i` is the i-th principal axis.
    pub principal_components: Vec<Vec<f64>>,
    pub explained_variance: Vec<f64>,
    pub explained_variance_ratio: Vec<f64>,
    pub projected_data: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EigenResponse {
    pub eigenvalues: Vec<ComplexValue>,
    /// Rows of the eigenvector matrix; column `i` pairs with `eigenvalues[i]`.
    pub eigenvectors: Vec<Vec<ComplexValue>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

// --- Handlers ---

fn required_matrix(matrix: Option<Vec<Vec<f64>>>) -> Result<crate::matrix::Matrix, LabError> {
    let rows = matrix.ok_or(LabError::MissingInput("matrix"))?;
    matrix_from_rows(&rows)
}

pub fn transform_endpoint(request: TransformRequest) -> Result<TransformResponse, LabError> {
    let matrix = required_matrix(request.matrix)?;
    let rotation = request.rotation.unwrap_or_default();
    let translation = request.translation.unwrap_or_default();
    let transformed = transform(matrix.view(), &rotation, &translation)?;
    Ok(TransformResponse {
        transformed: matrix_to_rows(transformed.view()),
    })
}

pub fn power_method_endpoint(request: PowerMethodRequest) -> Result<PowerMethodResponse, LabError> {
    let matrix = required_matrix(request.matrix)?;

    // A supplied vector is length-checked even when `use_random` overrides it.
    if let Some(v) = &request.initial_vector {
        if matrix.nrows() == matrix.ncols() && v.len() != matrix.nrows() {
            return Err(LabError::DimensionMismatch {
                expected: matrix.nrows(),
                actual: v.len(),
            });
        }
    }
    let seed = match (request.use_random, request.initial_vector) {
        (false, Some(v)) => SeedVector::Provided(v.into()),
        _ => SeedVector::Random,
    };
    debug!("Power method seed: {:?}", seed);

    let config = PowerIterationConfig {
        max_iterations: request.max_iter,
        tolerance: request.tol,
        seed: request.seed,
    };
    let output = power_iteration(matrix.view(), seed, &config)?;
    Ok(PowerMethodResponse {
        vectors: output.trace.vectors(),
        eigenvalues: output.trace.eigenvalues(),
        true_max_eigenvalue: output.true_max_eigenvalue,
    })
}

pub fn pca_endpoint(request: PcaRequest) -> Result<PcaResponse, LabError> {
    let matrix = required_matrix(request.matrix)?;
    let mut result = pca(matrix.view())?;
    if let Some(k) = request.n_components {
        result = result.truncated(k);
    }
    Ok(PcaResponse {
        principal_components: matrix_to_rows(result.principal_components().view()),
        explained_variance: result.explained_variance().to_vec(),
        explained_variance_ratio: result.explained_variance_ratio().to_vec(),
        projected_data: matrix_to_rows(result.projected_data().view()),
    })
}

pub fn compute_eigen_endpoint(request: EigenRequest) -> Result<EigenResponse, LabError> {
    let matrix = required_matrix(request.matrix)?;
    let decomposition = eigen_decomposition(matrix.view())?;
    Ok(EigenResponse {
        eigenvalues: decomposition.eigenvalues,
        eigenvectors: decomposition
            .eigenvectors
            .rows()
            .into_iter()
            .map(|row| row.to_vec())
            .collect(),
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, LabError> {
    serde_json::from_str(body).map_err(|e| LabError::MalformedRequest(e.to_string()))
}

fn encode<T: Serialize>(response: &T) -> Result<String, LabError> {
    serde_json::to_string(response).map_err(|e| LabError::MalformedRequest(e.to_string()))
}

/// Decodes `body`, runs the endpoint and encodes its JSON response.
///
/// # Errors
/// `MalformedRequest` if the body is not a JSON object of the expected form,
/// `MissingInput` if `matrix` is absent, otherwise whatever the endpoint's
/// validation reports.
pub fn handle_json(endpoint: Endpoint, body: &str) -> Result<String, LabError> {
    info!("Handling {} request ({} bytes).", endpoint.path(), body.len());
    match endpoint {
        Endpoint::Transform => encode(&transform_endpoint(decode(body)?)?),
        Endpoint::PowerMethod => encode(&power_method_endpoint(decode(body)?)?),
        Endpoint::Pca => encode(&pca_endpoint(decode(body)?)?),
        Endpoint::ComputeEigen => encode(&compute_eigen_endpoint(decode(body)?)?),
    }
}

/// Renders an error as `{"message": "..."}`.
pub fn error_body(error: &LabError) -> String {
    let body = ErrorResponse {
        message: error.to_string(),
    };
    serde_json::to_string(&body).unwrap_or_else(|_| String::from(r#"{"message":"internal error"}"#))
}
