// src/power_iteration.rs

//! Power iteration for the dominant eigenpair of a square matrix.
//!
//! Every completed iteration is recorded in an [`IterationTrace`] so callers
//! can replay how the estimate evolved. Running out of iterations is a normal
//! outcome; compare `trace.len()` with `max_iterations` or inspect
//! [`PowerIterationOutput::termination`].

use log::{debug, info, warn};
use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::eigen::dominant_eigenvalue;
use crate::error::LabError;
use crate::matrix::{ensure_square, l2_norm, normalized, Vector};

/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;
/// Default convergence tolerance on `‖v_next − v‖`.
pub const DEFAULT_TOLERANCE: f64 = 1e-8;

/// Configuration for [`power_iteration`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerIterationConfig {
    /// Maximum number of iterations (matrix-vector products).
    pub max_iterations: usize,
    /// Stop once successive normalized iterates differ by less than this.
    pub tolerance: f64,
    /// Seed for the random start vector. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for PowerIterationConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
            seed: None,
        }
    }
}

/// Where the first iterate comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SeedVector {
    /// A caller-supplied vector; its length must equal the matrix dimension.
    Provided(Vector),
    /// A random unit vector drawn from the configured generator.
    Random,
}

/// One completed iteration: the normalized iterate and its Rayleigh quotient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationStep {
    pub vector: Vector,
    pub eigenvalue: f64,
}

/// Ordered, append-only record of the iterations performed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IterationTrace {
    steps: Vec<IterationStep>,
}

impl IterationTrace {
    fn push(&mut self, vector: Vector, eigenvalue: f64) {
        self.steps.push(IterationStep { vector, eigenvalue });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn last(&self) -> Option<&IterationStep> {
        self.steps.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IterationStep> {
        self.steps.iter()
    }

    pub fn steps(&self) -> &[IterationStep] {
        &self.steps
    }

    /// The normalized iterates, in iteration order.
    pub fn vectors(&self) -> Vec<Vec<f64>> {
        self.steps.iter().map(|s| s.vector.to_vec()).collect()
    }

    /// The Rayleigh-quotient estimates, in iteration order.
    pub fn eigenvalues(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.eigenvalue).collect()
    }
}

impl<'a> IntoIterator for &'a IterationTrace {
    type Item = &'a IterationStep;
    type IntoIter = std::slice::Iter<'a, IterationStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Why the iteration stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Successive iterates moved less than the tolerance.
    Converged,
    /// The iteration cap was reached first.
    MaxIterations,
    /// The matrix mapped the current iterate to the zero vector.
    Degenerate,
}

/// Result of [`power_iteration`].
#[derive(Debug, Clone, PartialEq)]
pub struct PowerIterationOutput {
    pub trace: IterationTrace,
    pub termination: Termination,
    /// Dominant eigenvalue from a full eigendecomposition, for reference.
    pub true_max_eigenvalue: f64,
}

impl PowerIterationOutput {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    /// The last Rayleigh-quotient estimate, if any iteration completed.
    pub fn estimate(&self) -> Option<f64> {
        self.trace.last().map(|s| s.eigenvalue)
    }
}

/// Rayleigh quotient `(vᵀ M v) / (vᵀ v)`.
pub fn rayleigh_quotient(matrix: ArrayView2<f64>, v: ArrayView1<f64>) -> f64 {
    v.dot(&matrix.dot(&v)) / v.dot(&v)
}

/// Draws a unit vector uniformly from the sphere in `n` dimensions
/// (normalized i.i.d. standard normal components).
pub fn random_unit_vector<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vector {
    if n == 0 {
        return Array1::zeros(0);
    }
    loop {
        let candidate: Vector = Array1::from_shape_fn(n, |_| rng.sample(StandardNormal));
        if let Some(unit) = normalized(candidate.view()) {
            return unit;
        }
    }
}

fn validate_seed(n: usize, seed: &SeedVector) -> Result<(), LabError> {
    if let SeedVector::Provided(v) = seed {
        if v.len() != n {
            return Err(LabError::DimensionMismatch { expected: n, actual: v.len() });
        }
    }
    Ok(())
}

/// Runs power iteration with a ChaCha8 generator seeded from
/// `config.seed` (or from entropy when unset).
///
/// # Errors
/// `InvalidShape` for an empty or non-square matrix, `DimensionMismatch` if
/// a provided seed vector has the wrong length, `Backend` if the reference
/// eigenvalue cannot be computed.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use matrix_lab::power_iteration::{power_iteration, PowerIterationConfig, SeedVector};
///
/// let m = array![[2.0, 0.0], [0.0, 1.0]];
/// let out = power_iteration(m.view(), SeedVector::Provided(array![1.0, 1.0]), &PowerIterationConfig::default()).unwrap();
/// assert!(out.trace.len() <= 10);
/// ```
pub fn power_iteration(
    matrix: ArrayView2<f64>,
    seed: SeedVector,
    config: &PowerIterationConfig,
) -> Result<PowerIterationOutput, LabError> {
    let mut rng = match config.seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };
    power_iteration_with_rng(matrix, seed, config, &mut rng)
}

/// Runs power iteration drawing any random start vector from `rng`.
pub fn power_iteration_with_rng<R: Rng + ?Sized>(
    matrix: ArrayView2<f64>,
    seed: SeedVector,
    config: &PowerIterationConfig,
    rng: &mut R,
) -> Result<PowerIterationOutput, LabError> {
    let n = ensure_square(matrix)?;
    validate_seed(n, &seed)?;

    info!(
        "Starting power iteration on {}x{} matrix (max_iterations={}, tolerance={:e}).",
        n, n, config.max_iterations, config.tolerance
    );

    // A zero seed stays as is; the first product is then zero and the
    // trace ends empty.
    let mut v = match seed {
        SeedVector::Provided(v) => normalized(v.view()).unwrap_or(v),
        SeedVector::Random => random_unit_vector(n, rng),
    };

    let mut trace = IterationTrace::default();
    let mut termination = Termination::MaxIterations;

    for iteration in 0..config.max_iterations {
        let w = matrix.dot(&v);
        let w_norm = l2_norm(w.view());
        if w_norm == 0.0 {
            warn!(
                "Matrix-vector product vanished at iteration {}; stopping with {} recorded steps.",
                iteration,
                trace.len()
            );
            termination = Termination::Degenerate;
            break;
        }
        let v_next = w / w_norm;
        let estimate = rayleigh_quotient(matrix, v_next.view());
        let delta = l2_norm((&v_next - &v).view());
        debug!(
            "Iteration {}: eigenvalue estimate {}, step size {:e}",
            iteration, estimate, delta
        );
        trace.push(v_next.clone(), estimate);

        if delta < config.tolerance {
            termination = Termination::Converged;
            break;
        }
        v = v_next;
    }

    if termination == Termination::MaxIterations {
        warn!(
            "Power iteration did not converge within {} iterations.",
            config.max_iterations
        );
    }

    let true_max_eigenvalue = dominant_eigenvalue(matrix)?;
    info!(
        "Power iteration finished after {} steps ({:?}); estimate {:?}, reference {}.",
        trace.len(),
        termination,
        trace.last().map(|s| s.eigenvalue),
        true_max_eigenvalue
    );

    Ok(PowerIterationOutput {
        trace,
        termination,
        true_max_eigenvalue,
    })
}
