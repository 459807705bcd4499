// src/matrix.rs

//! Dense matrix and vector helpers shared by the transform composer, the
//! power-iteration eigensolver and the PCA engine.
//!
//! Matrices are row-major `Array2<f64>` values; on the wire they are nested
//! rows of plain doubles.

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

use crate::error::LabError;

/// A rectangular array of reals with fixed row and column counts.
pub type Matrix = Array2<f64>;

/// A one-dimensional array of reals.
pub type Vector = Array1<f64>;

/// Builds a matrix from nested rows.
///
/// # Errors
/// Returns `InvalidShape` if there are no rows, no columns, or if the rows
/// have differing lengths.
pub fn matrix_from_rows(rows: &[Vec<f64>]) -> Result<Matrix, LabError> {
    let n_rows = rows.len();
    if n_rows == 0 {
        return Err(LabError::InvalidShape("matrix has no rows".to_string()));
    }
    let n_cols = rows[0].len();
    if n_cols == 0 {
        return Err(LabError::InvalidShape("matrix has no columns".to_string()));
    }
    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_cols) {
        return Err(LabError::InvalidShape(format!(
            "matrix must be 2-D: row {} has {} entries but row 0 has {}",
            idx,
            row.len(),
            n_cols
        )));
    }

    let flat: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
    Array2::from_shape_vec((n_rows, n_cols), flat)
        .map_err(|e| LabError::InvalidShape(format!("could not build matrix: {}", e)))
}

/// Converts a matrix back into nested rows.
pub fn matrix_to_rows(matrix: ArrayView2<f64>) -> Vec<Vec<f64>> {
    matrix.rows().into_iter().map(|row| row.to_vec()).collect()
}

/// Checks that `matrix` is non-empty and square, returning its dimension.
pub fn ensure_square(matrix: ArrayView2<f64>) -> Result<usize, LabError> {
    let (n_rows, n_cols) = matrix.dim();
    if n_rows == 0 || n_cols == 0 {
        return Err(LabError::InvalidShape(format!(
            "matrix is empty ({}x{})",
            n_rows, n_cols
        )));
    }
    if n_rows != n_cols {
        return Err(LabError::InvalidShape(format!(
            "matrix must be square, got {}x{}",
            n_rows, n_cols
        )));
    }
    Ok(n_rows)
}

/// Euclidean norm.
pub fn l2_norm(v: ArrayView1<f64>) -> f64 {
    v.dot(&v).sqrt()
}

/// Returns `v / ‖v‖`, or `None` when the norm is zero or not finite.
pub fn normalized(v: ArrayView1<f64>) -> Option<Vector> {
    let norm = l2_norm(v);
    if norm > 0.0 && norm.is_finite() {
        Some(v.mapv(|x| x / norm))
    } else {
        None
    }
}

/// Embeds `block` in the top-left corner of a `size`×`size` identity matrix.
///
/// This is the identity-augmented padding used to lift a 3×3 matrix into
/// homogeneous 4×4 form.
///
/// # Panics
/// Panics if `block` is larger than `size` in either direction.
pub fn embed_in_identity(block: ArrayView2<f64>, size: usize) -> Matrix {
    let (n_rows, n_cols) = block.dim();
    assert!(
        n_rows <= size && n_cols <= size,
        "block {}x{} does not fit in {}x{}",
        n_rows,
        n_cols,
        size,
        size
    );
    let mut out = Array2::eye(size);
    out.slice_mut(s![..n_rows, ..n_cols]).assign(&block);
    out
}

/// Copies the top-left `size`×`size` block.
pub fn top_left_block(matrix: ArrayView2<f64>, size: usize) -> Matrix {
    matrix.slice(s![..size, ..size]).to_owned()
}
