// src/error.rs

use std::error::Error;

/// A thread-safe wrapper for standard dynamic errors,
/// so they implement `Send` and `Sync`.
pub type ThreadSafeStdError = Box<dyn Error + Send + Sync + 'static>;

/// Errors raised by the numerical core and the request boundary.
///
/// Every validation error is detected before any matrix arithmetic runs.
/// Non-convergence of the power iteration is not an error; a zero
/// matrix-vector product during iteration is reported through
/// [`crate::power_iteration::Termination::Degenerate`] rather than here.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LabError {
    /// The matrix is not square where a square matrix is required, is empty,
    /// or its nested rows do not form a rectangle.
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// Transform dimension outside {2, 3, 4}.
    #[error("Unsupported matrix size {0}x{0}; transforms accept 2x2, 3x3 or 4x4 matrices")]
    UnsupportedSize(usize),

    /// A vector's length does not match the dimension it is applied to.
    #[error("Dimension mismatch: expected length {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The input is well formed but too degenerate for the computation.
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// A required field was absent from the request.
    #[error("Missing input: '{0}' is required")]
    MissingInput(&'static str),

    /// The dense linear-algebra backend failed.
    #[error("Linear algebra backend failed: {0}")]
    Backend(String),

    /// The request body could not be decoded.
    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}

/// Stable tag for each [`LabError`] variant, used by callers that map
/// errors onto transport-level status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidShape,
    UnsupportedSize,
    DimensionMismatch,
    DegenerateInput,
    MissingInput,
    Backend,
    MalformedRequest,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidShape => "invalid_shape",
            ErrorKind::UnsupportedSize => "unsupported_size",
            ErrorKind::DimensionMismatch => "dimension_mismatch",
            ErrorKind::DegenerateInput => "degenerate_input",
            ErrorKind::MissingInput => "missing_input",
            ErrorKind::Backend => "backend",
            ErrorKind::MalformedRequest => "malformed_request",
        }
    }

    /// True for errors caused by the caller's input rather than by the backend.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ErrorKind::Backend)
    }
}

impl LabError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LabError::InvalidShape(_) => ErrorKind::InvalidShape,
            LabError::UnsupportedSize(_) => ErrorKind::UnsupportedSize,
            LabError::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            LabError::DegenerateInput(_) => ErrorKind::DegenerateInput,
            LabError::MissingInput(_) => ErrorKind::MissingInput,
            LabError::Backend(_) => ErrorKind::Backend,
            LabError::MalformedRequest(_) => ErrorKind::MalformedRequest,
        }
    }

    pub(crate) fn backend(context: &str, err: ThreadSafeStdError) -> Self {
        LabError::Backend(format!("{}: {}", context, err))
    }
}
