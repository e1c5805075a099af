//! Behavioural tests for the elasticity estimator.

use super::*;

fn children(pairs: &[(&str, &[f64])]) -> OrderedMap<Vec<f64>> {
    pairs.iter().map(|(k, v)| (*k, v.to_vec())).collect()
}

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {} within {}, got {}",
        expected,
        tol,
        actual
    );
}

#[test]
fn test_perfect_single_child_fit() {
    let parent = [1.0, 2.0, 3.0, 4.0];
    let kids = children(&[("a", &[1.0, 2.0, 3.0, 4.0])]);

    let out = estimate(&parent, &kids, EstimateOptions::default()).unwrap();

    assert_close(*out.weights.get("a").unwrap(), 1.0, 1e-12);
    assert_close(out.r2, 1.0, 1e-12);
    assert_eq!(out.n, 4);
    assert!(out.notes.is_none());
}

#[test]
fn test_constant_parent_has_zero_r2() {
    let parent = [1.0, 1.0, 1.0, 1.0];
    let kids = children(&[("a", &[3.0, 1.0, 4.0, 1.5]), ("b", &[0.2, 0.7, 0.1, 0.9])]);

    let out = estimate(&parent, &kids, EstimateOptions::default()).unwrap();

    assert_eq!(out.r2, 0.0);
    assert!(!out.r2.is_nan());
}

#[test]
fn test_negative_coefficient_is_clamped() {
    // y = -0.3 a + 0.8 b exactly
    let a = [1.0, 0.0, 0.0, 1.0];
    let b = [0.0, 1.0, 0.0, 1.0];
    let parent: Vec<f64> = a.iter().zip(&b).map(|(x, z)| -0.3 * x + 0.8 * z).collect();
    let kids = children(&[("a", &a), ("b", &b)]);

    let out = estimate(&parent, &kids, EstimateOptions::default()).unwrap();

    assert_eq!(*out.weights.get("a").unwrap(), 0.0);
    assert_close(*out.weights.get("b").unwrap(), 1.0, 1e-12);
    assert!(out.notes.as_deref().unwrap().contains("Clamped"));

    // Intervals describe the unclamped coefficients
    let ci = out.ci95.unwrap();
    let (lo, hi) = *ci.get("a").unwrap();
    assert_close(lo, -0.3, 1e-9);
    assert_close(hi, -0.3, 1e-9);
}

#[test]
fn test_weights_sum_to_one_when_normalized() {
    let parent = [2.1, 3.9, 6.2, 7.8, 10.1, 12.0];
    let kids = children(&[
        ("signups", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
        ("activation", &[0.5, 0.4, 0.9, 0.8, 1.1, 1.0]),
        ("retention", &[2.0, 1.0, 2.5, 1.5, 3.0, 2.0]),
    ]);

    let out = estimate(&parent, &kids, EstimateOptions::default()).unwrap();

    let total: f64 = out.weights.values().sum();
    assert_close(total, 1.0, 1e-9);
    assert!(out.weights.values().all(|w| *w >= 0.0));
}

#[test]
fn test_keys_preserve_declared_order() {
    let parent = [1.0, 3.0, 2.0, 5.0, 4.0];
    let kids = children(&[
        ("zulu", &[1.0, 2.0, 2.0, 4.0, 3.0]),
        ("alpha", &[0.0, 1.0, 0.0, 1.0, 1.0]),
        ("mike", &[2.0, 2.0, 1.0, 3.0, 3.0]),
    ]);

    let out = estimate(&parent, &kids, EstimateOptions::default()).unwrap();

    let weight_keys: Vec<&str> = out.weights.keys().collect();
    assert_eq!(weight_keys, vec!["zulu", "alpha", "mike"]);
    let ci_keys: Vec<&str> = out.ci95.as_ref().unwrap().keys().collect();
    assert_eq!(ci_keys, weight_keys);

    let json = serde_json::to_string(&out.weights).unwrap();
    let zulu = json.find("zulu").unwrap();
    let alpha = json.find("alpha").unwrap();
    let mike = json.find("mike").unwrap();
    assert!(zulu < alpha && alpha < mike);
}

#[test]
fn test_length_mismatch_rejected() {
    let parent = [1.0, 2.0, 3.0];
    let kids = children(&[("ok", &[1.0, 2.0, 3.0]), ("short", &[1.0, 2.0])]);

    let err = estimate(&parent, &kids, EstimateOptions::default()).unwrap_err();
    assert_eq!(
        err.client_message(),
        "Length mismatch for child 'short': expected 3, got 2"
    );
}

#[test]
fn test_longer_child_also_rejected() {
    let parent = [1.0, 2.0];
    let kids = children(&[("long", &[1.0, 2.0, 3.0])]);

    let err = estimate(&parent, &kids, EstimateOptions::default()).unwrap_err();
    assert!(matches!(err, CoreError::ValidationError { .. }));
}

#[test]
fn test_empty_children_rejected() {
    let err = estimate(&[1.0, 2.0], &OrderedMap::new(), EstimateOptions::default()).unwrap_err();
    assert_eq!(err.client_message(), "children cannot be empty");
}

#[test]
fn test_non_finite_rejected() {
    let kids = children(&[("a", &[1.0, f64::NAN])]);
    let err = estimate(&[1.0, 2.0], &kids, EstimateOptions::default()).unwrap_err();
    assert!(err.client_message().contains("non-finite"));
}

#[test]
fn test_all_zero_weights_fall_back_to_equal_split() {
    let parent = [1.0, 2.0, 3.0];
    let kids = children(&[("a", &[0.0, 0.0, 0.0]), ("b", &[0.0, 0.0, 0.0])]);

    let out = estimate(&parent, &kids, EstimateOptions::default()).unwrap();

    assert_eq!(*out.weights.get("a").unwrap(), 0.5);
    assert_eq!(*out.weights.get("b").unwrap(), 0.5);
    assert_eq!(
        out.notes.as_deref(),
        Some("All weights ~0; using equal weights.")
    );
}

#[test]
fn test_both_notes_joined_with_space() {
    // Single negative coefficient: clamped to 0, then equal split
    let parent = [-1.0, -2.0, -3.0];
    let kids = children(&[("a", &[1.0, 2.0, 3.0])]);

    let out = estimate(&parent, &kids, EstimateOptions::default()).unwrap();

    assert_eq!(*out.weights.get("a").unwrap(), 1.0);
    assert_eq!(
        out.notes.as_deref(),
        Some("Clamped negative weights to 0. All weights ~0; using equal weights.")
    );
}

#[test]
fn test_collinear_children_use_pseudo_inverse() {
    let parent = [2.0, 4.0, 6.0, 8.0];
    let series = [1.0, 2.0, 3.0, 4.0];
    let kids = children(&[("a", &series), ("b", &series)]);

    let out = estimate(&parent, &kids, EstimateOptions::default()).unwrap();

    assert_close(*out.weights.get("a").unwrap(), 0.5, 1e-9);
    assert_close(*out.weights.get("b").unwrap(), 0.5, 1e-9);
    for (lo, hi) in out.ci95.unwrap().values() {
        assert!(lo.is_finite() && hi.is_finite());
    }
}

#[test]
fn test_raw_coefficients_without_normalize() {
    let x = [0.0, 1.0, 2.0, 3.0, 4.0];
    let parent: Vec<f64> = x.iter().map(|v| 2.0 + 3.0 * v).collect();
    let kids = children(&[("x", &x)]);
    let options = EstimateOptions {
        add_intercept: true,
        non_negative: false,
        normalize: false,
        compute_ci: false,
    };

    let out = estimate(&parent, &kids, options).unwrap();

    assert_close(*out.weights.get("x").unwrap(), 3.0, 1e-9);
    assert_eq!(out.weights.len(), 1, "intercept is not a child");
    assert!(out.ci95.is_none());
}

#[test]
fn test_output_serializes_ci_as_pairs() {
    let parent = [1.0, 2.0, 3.0, 4.0];
    let kids = children(&[("a", &[1.0, 2.0, 3.0, 4.0])]);
    let out = estimate(&parent, &kids, EstimateOptions::default()).unwrap();

    let value = serde_json::to_value(&out).unwrap();
    assert!(value["ci95"]["a"].is_array());
    assert_eq!(value["ci95"]["a"].as_array().unwrap().len(), 2);
    assert_eq!(value["n"], 4);
    assert!(value["notes"].is_null());
}
