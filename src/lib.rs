// Small-matrix numerics: transforms, power iteration and PCA

#![doc = include_str!("../README.md")]

pub mod api;
pub mod eigen;
pub mod error;
pub mod linalg_backends;
pub mod matrix;
pub mod pca;
pub mod power_iteration;
pub mod transform;

#[cfg(test)]
mod pca_tests;

pub use api::{error_body, handle_json, Endpoint};
pub use eigen::{dominant_eigenvalue, eigen_decomposition, EigenDecomposition};
pub use error::{ErrorKind, LabError};
pub use linalg_backends::ComplexValue;
pub use matrix::{matrix_from_rows, matrix_to_rows, Matrix, Vector};
pub use pca::{pca, PcaResult};
pub use power_iteration::{
    power_iteration, power_iteration_with_rng, IterationStep, IterationTrace, PowerIterationConfig,
    PowerIterationOutput, SeedVector, Termination,
};
pub use transform::{transform, RotationSpec, TranslationSpec};
