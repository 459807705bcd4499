use crate::error::LabError;
use crate::pca::pca;

use approx::assert_abs_diff_eq;
use ndarray::{array, Array2, Axis};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn generate_random_data(n_samples: usize, n_features: usize, seed: u64) -> Array2<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Array2::from_shape_fn((n_samples, n_features), |_| rng.gen_range(-5.0..5.0))
}

fn assert_matrix_close(a: &Array2<f64>, b: &Array2<f64>, eps: f64) {
    assert_eq!(a.dim(), b.dim());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_abs_diff_eq!(x, y, epsilon = eps);
    }
}

#[cfg(test)]
mod pca_engine_tests {
    use super::*;

    #[test]
    fn test_symmetric_cross_has_equal_ratios() {
        let data = array![[2.0, 0.0], [0.0, 2.0], [-2.0, 0.0], [0.0, -2.0]];
        let result = pca(data.view()).unwrap();

        // cov = diag(8/3, 8/3)
        for v in result.explained_variance().iter() {
            assert_abs_diff_eq!(*v, 8.0 / 3.0, epsilon = 1e-10);
        }
        for r in result.explained_variance_ratio().iter() {
            assert_abs_diff_eq!(*r, 0.5, epsilon = 1e-10);
        }
        assert_eq!(result.projected_data().dim(), (4, 2));
    }

    #[test]
    fn test_mean_and_centering() {
        let data = array![[1.0, 10.0], [3.0, 14.0], [5.0, 12.0]];
        let result = pca(data.view()).unwrap();
        assert_abs_diff_eq!(result.mean()[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.mean()[1], 12.0, epsilon = 1e-12);

        // projections of centered data have zero column means
        let col_means = result.projected_data().mean_axis(Axis(0)).unwrap();
        for m in col_means.iter() {
            assert_abs_diff_eq!(*m, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_reconstruction_from_all_components() {
        let data = generate_random_data(25, 4, 1926);
        let result = pca(data.view()).unwrap();

        let centered = &data - result.mean();
        let reconstructed = result.projected_data().dot(&result.principal_components().t());
        assert_matrix_close(&reconstructed, &centered, 1e-9);
    }

    #[test]
    fn test_ratios_sum_to_one_and_descend() {
        for seed in [1u64, 7, 99] {
            let data = generate_random_data(30, 5, seed);
            let result = pca(data.view()).unwrap();

            assert_abs_diff_eq!(result.explained_variance_ratio().sum(), 1.0, epsilon = 1e-10);
            let values = result.explained_variance();
            for pair in values.windows(2) {
                assert!(pair[0] >= pair[1], "eigenvalues not descending: {:?}", values);
            }
        }
    }

    #[test]
    fn test_components_are_orthonormal() {
        let data = generate_random_data(40, 3, 5);
        let result = pca(data.view()).unwrap();
        let v = result.principal_components();
        assert_matrix_close(&v.t().dot(v), &Array2::eye(3), 1e-10);
    }

    #[test]
    fn test_variance_matches_projection_variance() {
        let data = generate_random_data(50, 3, 11);
        let result = pca(data.view()).unwrap();
        let n = data.nrows() as f64;
        for (i, col) in result.projected_data().columns().into_iter().enumerate() {
            let var = col.dot(&col) / (n - 1.0);
            assert_abs_diff_eq!(var, result.explained_variance()[i], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_dominant_axis_on_stretched_data() {
        // points along y = x with small spread across
        let data = array![
            [-3.0, -3.1],
            [-1.0, -0.9],
            [0.0, 0.1],
            [1.0, 0.9],
            [3.0, 3.0],
        ];
        let result = pca(data.view()).unwrap();
        let first = result.principal_components().column(0);
        let inv_sqrt2 = 1.0 / 2f64.sqrt();
        assert_abs_diff_eq!(first[0].abs(), inv_sqrt2, epsilon = 0.05);
        assert_abs_diff_eq!(first[1].abs(), inv_sqrt2, epsilon = 0.05);
        assert!(result.explained_variance_ratio()[0] > 0.99);
    }

    #[test]
    fn test_cumulative_and_truncated() {
        let data = generate_random_data(20, 4, 3);
        let result = pca(data.view()).unwrap();
        let ratios = result.explained_variance_ratio();

        assert_abs_diff_eq!(result.cumulative_explained_variance(0), 0.0);
        assert_abs_diff_eq!(result.cumulative_explained_variance(2), ratios[0] + ratios[1], epsilon = 1e-12);
        assert_abs_diff_eq!(result.cumulative_explained_variance(99), 1.0, epsilon = 1e-10);

        let top2 = result.truncated(2);
        assert_eq!(top2.n_components(), 2);
        assert_eq!(top2.principal_components().dim(), (4, 2));
        assert_eq!(top2.projected_data().dim(), (20, 2));
        assert_abs_diff_eq!(top2.explained_variance_ratio()[1], ratios[1], epsilon = 1e-15);
        assert_eq!(result.truncated(10).n_components(), 4);
    }

    #[test]
    fn test_project_new_samples() {
        let data = generate_random_data(15, 3, 21);
        let result = pca(data.view()).unwrap();

        let again = result.project(data.view()).unwrap();
        assert_matrix_close(&again, result.projected_data(), 1e-10);

        let wrong = Array2::<f64>::zeros((2, 4));
        assert_eq!(
            result.project(wrong.view()).unwrap_err(),
            LabError::DimensionMismatch { expected: 3, actual: 4 }
        );
    }

    #[test]
    fn test_identical_samples_report_zero_ratios() {
        let data = array![[1.0, 2.0, 3.0], [1.0, 2.0, 3.0], [1.0, 2.0, 3.0]];
        let result = pca(data.view()).unwrap();
        for r in result.explained_variance_ratio().iter() {
            assert_eq!(*r, 0.0);
        }
        for p in result.projected_data().iter() {
            assert_abs_diff_eq!(*p, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_more_features_than_samples() {
        let data = generate_random_data(3, 6, 8);
        let result = pca(data.view()).unwrap();
        assert_eq!(result.n_components(), 6);
        assert_abs_diff_eq!(result.explained_variance_ratio().sum(), 1.0, epsilon = 1e-10);
        // rank is at most n_samples - 1
        let tail: f64 = result.explained_variance().iter().skip(2).map(|v| v.abs()).sum();
        assert!(tail < 1e-9, "unexpected variance beyond rank: {}", tail);
    }

    #[test]
    fn test_rejects_empty_and_single_sample() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert!(matches!(pca(empty.view()), Err(LabError::InvalidShape(_))));

        let no_features = Array2::<f64>::zeros((4, 0));
        assert!(matches!(pca(no_features.view()), Err(LabError::InvalidShape(_))));

        let single = array![[1.0, 2.0]];
        assert!(matches!(pca(single.view()), Err(LabError::DegenerateInput(_))));
    }
}
