// src/transform.rs

//! Rotation and translation composition for 2×2, 3×3 and 4×4 matrices.
//!
//! Elementary rotations are always composed as `R = R_z · R_y · R_x`
//! (X applied first, Z last). Results are reproducible only if this order
//! is kept.

use log::{debug, info};
use ndarray::{array, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::LabError;
use crate::matrix::{embed_in_identity, ensure_square, top_left_block, Matrix};

/// Matrix sizes the composer accepts.
pub const SUPPORTED_SIZES: [usize; 3] = [2, 3, 4];

/// Rotation angles in degrees, one per axis. Missing fields default to 0.
///
/// At size 2 only `z` is used.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSpec {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationSpec {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The same angles with flipped sign.
    pub fn negated(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Translation offsets along x, y and z. Missing fields default to 0.
///
/// Ignored at size 2.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSpec {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl TranslationSpec {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// 2×2 rotation by `degrees` counter-clockwise.
pub fn rotation_2d(degrees: f64) -> Matrix {
    let (s, c) = degrees.to_radians().sin_cos();
    array![[c, -s], [s, c]]
}

/// 3×3 right-handed rotation about the x axis.
pub fn rotation_x(degrees: f64) -> Matrix {
    let (s, c) = degrees.to_radians().sin_cos();
    array![[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]]
}

/// 3×3 right-handed rotation about the y axis.
pub fn rotation_y(degrees: f64) -> Matrix {
    let (s, c) = degrees.to_radians().sin_cos();
    array![[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]]
}

/// 3×3 right-handed rotation about the z axis.
pub fn rotation_z(degrees: f64) -> Matrix {
    let (s, c) = degrees.to_radians().sin_cos();
    array![[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]
}

/// `R_z · R_y · R_x` as a 3×3 matrix.
pub fn composed_rotation(rotation: &RotationSpec) -> Matrix {
    rotation_z(rotation.z)
        .dot(&rotation_y(rotation.y))
        .dot(&rotation_x(rotation.x))
}

/// `R_z · R_y · R_x` built from 4×4 homogeneous blocks (rotation in the
/// top-left 3×3, identity elsewhere).
pub fn homogeneous_rotation(rotation: &RotationSpec) -> Matrix {
    let rx = embed_in_identity(rotation_x(rotation.x).view(), 4);
    let ry = embed_in_identity(rotation_y(rotation.y).view(), 4);
    let rz = embed_in_identity(rotation_z(rotation.z).view(), 4);
    rz.dot(&ry).dot(&rx)
}

/// 4×4 homogeneous translation: identity with the offsets in the last column.
pub fn translation_matrix(translation: &TranslationSpec) -> Matrix {
    array![
        [1.0, 0.0, 0.0, translation.x],
        [0.0, 1.0, 0.0, translation.y],
        [0.0, 0.0, 1.0, translation.z],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Checks that `matrix` is square with a supported size, returning the size.
pub fn validate_transform_input(matrix: ArrayView2<f64>) -> Result<usize, LabError> {
    let n = ensure_square(matrix)?;
    if !SUPPORTED_SIZES.contains(&n) {
        return Err(LabError::UnsupportedSize(n));
    }
    Ok(n)
}

/// Applies a rotation and a translation to a square matrix.
///
/// * size 2: returns `R(z) · M`; translation is not applied.
/// * size 3: pads `M` to homogeneous 4×4 form, computes `T · R · pad(M)`
///   and returns the top-left 3×3 block.
/// * size 4: returns `T · R · M`.
///
/// # Errors
/// `InvalidShape` if the matrix is empty or not square, `UnsupportedSize`
/// if its size is not 2, 3 or 4. Nothing is computed on error.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use matrix_lab::transform::{transform, RotationSpec, TranslationSpec};
///
/// let m = array![[1.0, 0.0], [0.0, 1.0]];
/// let out = transform(m.view(), &RotationSpec::new(0.0, 0.0, 90.0), &TranslationSpec::default()).unwrap();
/// assert!((out[[1, 0]] - 1.0).abs() < 1e-12);
/// ```
pub fn transform(
    matrix: ArrayView2<f64>,
    rotation: &RotationSpec,
    translation: &TranslationSpec,
) -> Result<Matrix, LabError> {
    let n = validate_transform_input(matrix)?;
    info!(
        "Transforming {}x{} matrix with rotation {:?} and translation {:?}.",
        n, n, rotation, translation
    );

    let transformed = match n {
        2 => {
            if *translation != TranslationSpec::default() {
                debug!("Translation {:?} is not applied to 2x2 matrices.", translation);
            }
            rotation_2d(rotation.z).dot(&matrix)
        }
        3 => {
            let r = homogeneous_rotation(rotation);
            let t = translation_matrix(translation);
            let padded = embed_in_identity(matrix, 4);
            debug!("Composed homogeneous rotation:\n{:?}", r);
            top_left_block(t.dot(&r).dot(&padded).view(), 3)
        }
        4 => {
            let r = homogeneous_rotation(rotation);
            let t = translation_matrix(translation);
            debug!("Composed homogeneous rotation:\n{:?}", r);
            t.dot(&r).dot(&matrix)
        }
        _ => unreachable!("size validated above"),
    };
    Ok(transformed)
}
