use approx::assert_abs_diff_eq;
use matrix_lab::api::{
    error_body, handle_json, EigenResponse, Endpoint, ErrorResponse, PcaResponse, PowerMethodResponse,
    TransformResponse,
};
use matrix_lab::{ErrorKind, LabError};

fn call<T: serde::de::DeserializeOwned>(endpoint: Endpoint, body: &str) -> T {
    let response = handle_json(endpoint, body).unwrap();
    serde_json::from_str(&response).unwrap()
}

#[cfg(test)]
mod boundary_tests {
    use super::*;

    #[test]
    fn test_transform_2x2_quarter_turn() {
        let resp: TransformResponse = call(
            Endpoint::Transform,
            r#"{"matrix": [[1, 0], [0, 1]], "rotation": {"z": 90}, "translation": {"x": 4}}"#,
        );
        let expected = [[0.0, -1.0], [1.0, 0.0]];
        for (row, want) in resp.transformed.iter().zip(expected.iter()) {
            for (a, b) in row.iter().zip(want.iter()) {
                assert_abs_diff_eq!(a, b, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_transform_4x4_partial_specs() {
        let resp: TransformResponse = call(
            Endpoint::Transform,
            r#"{"matrix": [[1,0,0,0],[0,1,0,0],[0,0,1,0],[0,0,0,1]], "translation": {"y": -2.5}}"#,
        );
        assert_abs_diff_eq!(resp.transformed[1][3], -2.5, epsilon = 1e-12);
        assert_abs_diff_eq!(resp.transformed[0][0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_power_method_returns_full_trace() {
        let resp: PowerMethodResponse = call(
            Endpoint::PowerMethod,
            r#"{"matrix": [[2, 0], [0, 1]], "initial_vector": [1, 1]}"#,
        );
        assert_eq!(resp.vectors.len(), 10);
        assert_eq!(resp.eigenvalues.len(), 10);
        assert_abs_diff_eq!(resp.eigenvalues[0], 1.8, epsilon = 1e-12);
        assert_abs_diff_eq!(resp.eigenvalues[9], 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(resp.true_max_eigenvalue, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_power_method_random_is_reproducible_with_seed() {
        let body = r#"{"matrix": [[4, 1], [1, 3]], "use_random": true, "max_iter": 25, "tol": 1e-6, "seed": 5}"#;
        let a: PowerMethodResponse = call(Endpoint::PowerMethod, body);
        let b: PowerMethodResponse = call(Endpoint::PowerMethod, body);
        assert_eq!(a, b);
        assert!(!a.vectors.is_empty());
        for v in &a.vectors {
            assert_eq!(v.len(), 2);
        }
    }

    #[test]
    fn test_pca_ratios_and_truncation() {
        let full: PcaResponse = call(Endpoint::Pca, r#"{"matrix": [[2, 0], [0, 2], [-2, 0], [0, -2]]}"#);
        assert_eq!(full.explained_variance_ratio.len(), 2);
        for r in &full.explained_variance_ratio {
            assert_abs_diff_eq!(*r, 0.5, epsilon = 1e-10);
        }
        assert_eq!(full.projected_data.len(), 4);
        assert_eq!(full.principal_components.len(), 2);

        let top: PcaResponse = call(
            Endpoint::Pca,
            r#"{"matrix": [[1, 2, 0], [3, 1, 1], [0, 0, 2], [2, 2, 2]], "n_components": 1}"#,
        );
        assert_eq!(top.explained_variance.len(), 1);
        assert_eq!(top.principal_components.len(), 3);
        assert!(top.principal_components.iter().all(|row| row.len() == 1));
        assert!(top.projected_data.iter().all(|row| row.len() == 1));
    }

    #[test]
    fn test_compute_eigen_complex_pair() {
        let resp: EigenResponse = call(Endpoint::ComputeEigen, r#"{"matrix": [[0, -1], [1, 0]]}"#);
        assert_eq!(resp.eigenvalues.len(), 2);
        for z in &resp.eigenvalues {
            assert_abs_diff_eq!(z.re, 0.0, epsilon = 1e-10);
            assert_abs_diff_eq!(z.im.abs(), 1.0, epsilon = 1e-10);
        }
        assert_eq!(resp.eigenvectors.len(), 2);

        let raw = handle_json(Endpoint::ComputeEigen, r#"{"matrix": [[1]]}"#).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["eigenvalues"][0]["re"], 1.0);
        assert_eq!(value["eigenvalues"][0]["im"], 0.0);
    }

    #[test]
    fn test_error_taxonomy_at_the_boundary() {
        let cases: [(Endpoint, &str, ErrorKind); 7] = [
            (Endpoint::Transform, r#"{"rotation": {"z": 1}}"#, ErrorKind::MissingInput),
            (Endpoint::Transform, r#"{"matrix": [[1,0,0,0,0],[0,1,0,0,0],[0,0,1,0,0],[0,0,0,1,0],[0,0,0,0,1]]}"#, ErrorKind::UnsupportedSize),
            (Endpoint::Transform, r#"{"matrix": [[1, 2], [3]]}"#, ErrorKind::InvalidShape),
            (Endpoint::PowerMethod, r#"{"matrix": [[1, 2], [3, 4]], "initial_vector": [1]}"#, ErrorKind::DimensionMismatch),
            (Endpoint::Pca, r#"{"matrix": [[1, 2]]}"#, ErrorKind::DegenerateInput),
            (Endpoint::ComputeEigen, r#"{"matrix": [[1, 2, 3]]}"#, ErrorKind::InvalidShape),
            (Endpoint::Pca, r#"[1, 2, 3]"#, ErrorKind::MalformedRequest),
        ];
        for (endpoint, body, kind) in cases {
            let err = handle_json(endpoint, body).unwrap_err();
            assert_eq!(err.kind(), kind, "{} {}", endpoint.path(), body);
            assert!(kind.is_client_error());
        }
    }

    #[test]
    fn test_error_body_carries_message() {
        let err = handle_json(Endpoint::Pca, "{}").unwrap_err();
        assert_eq!(err, LabError::MissingInput("matrix"));
        let body: ErrorResponse = serde_json::from_str(&error_body(&err)).unwrap();
        assert_eq!(body.message, "Missing input: 'matrix' is required");
    }
}
