//! Metric tree workflow - Integration Tests
//!
//! Walks the path a planning session takes:
//! 1. Suggest a North Star for an industry
//! 2. Expand it into a driver tree and lint it
//! 3. Fit edge weights from history with the elasticity estimator
//! 4. Propagate a what-if scenario through the weighted tree
//! 5. Explain the top driver and forecast the North Star

use std::collections::HashMap;

use metric_tree_core::elasticity::{estimate, EstimateOptions};
use metric_tree_core::nsm::suggest_north_star;
use metric_tree_core::playbook::{explain, ExplainRequest};
use metric_tree_core::tree::{
    expand_tree, linreg_forecast, lint_tree, propagate, top_contributors, SeriesPoint,
    DEFAULT_EDGE_WEIGHT,
};
use metric_tree_core::{OrderedMap, Stage};

#[tokio::test]
async fn test_plan_weight_and_explain() {
    println!("\n=== Metric tree planning workflow ===");

    // Test 1: North Star suggestion
    let candidates = suggest_north_star("Streaming media", "video", None);
    assert_eq!(candidates[0].name, "Weekly Active Subscribers (WAS)");
    println!("[PASS] Suggested '{}'", candidates[0].name);

    // Test 2: expansion picks the subscription template; lint only flags ownership
    let mut tree = expand_tree(&candidates[0].name, "Streaming media");
    assert_eq!(tree.nodes.len(), 7);
    let warnings = lint_tree(&tree);
    assert!(warnings.iter().all(|w| w.starts_with("Missing")), "{:?}", warnings);
    println!("[PASS] Expanded {} nodes, {} lint warnings", tree.nodes.len(), warnings.len());

    // Test 3: weights for the three L1 drivers from 12 weeks of history
    let retention: Vec<f64> = (0..12).map(|i| 0.40 + 0.01 * i as f64).collect();
    let minutes: Vec<f64> = (0..12).map(|i| 90.0 + ((i * 7) % 5) as f64).collect();
    let arpu: Vec<f64> = (0..12).map(|i| 11.0 + ((i * 3) % 4) as f64 * 0.5).collect();
    let parent: Vec<f64> = (0..12)
        .map(|i| 3.0 * retention[i] + 0.02 * minutes[i] + 0.5 * arpu[i])
        .collect();
    let children: OrderedMap<Vec<f64>> = [
        ("l1_ret", retention),
        ("l1_eng", minutes),
        ("l1_arpu", arpu),
    ]
    .into_iter()
    .collect();

    let fit = estimate(&parent, &children, EstimateOptions::default()).unwrap();
    let total: f64 = fit.weights.values().sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(fit.r2 > 0.99);
    for edge in tree.edges.iter_mut().filter(|e| e.dst == "ns") {
        edge.weight = fit.weights.get(&edge.src).copied();
    }
    println!("[PASS] Fitted weights {:?}", fit.weights);

    // Test 4: a same-show retention lift reaches the North Star
    let deltas: HashMap<String, f64> = [("l2_same_show".to_string(), 0.10)].into();
    let out = propagate(&tree, &deltas, DEFAULT_EDGE_WEIGHT);
    let expected = 0.10 * DEFAULT_EDGE_WEIGHT * fit.weights.get("l1_ret").copied().unwrap_or(0.0);
    assert!((out.ns_delta - expected).abs() < 1e-12);
    let top = top_contributors(&tree, "ns", &deltas, DEFAULT_EDGE_WEIGHT, 5);
    assert_eq!(top.len(), 1);
    assert!(top[0].path.starts_with("Same-show retention → 7-day Retention"));
    println!("[PASS] NSM delta {:.4}", out.ns_delta);

    // Test 5: explanation and forecast
    let explanation = explain(
        &ExplainRequest {
            node: "7-day Retention".into(),
            parent: Some(tree.north_star.name.clone()),
            ..ExplainRequest::default()
        },
        None,
    )
    .await
    .unwrap();
    assert_eq!(explanation.stage, Stage::Retention);

    let dates = ["2024-01-01", "2024-01-08", "2024-01-15", "2024-01-22", "2024-01-29", "2024-02-05"];
    let history: Vec<SeriesPoint> = dates
        .iter()
        .enumerate()
        .map(|(i, t)| SeriesPoint {
            t: t.to_string(),
            y: 1000.0 + 25.0 * i as f64,
        })
        .collect();
    let forecast = linreg_forecast(&history, 4).unwrap();
    assert!((forecast.slope - 25.0).abs() < 1e-9);
    assert_eq!(forecast.fcst[0].t, "2024-02-12");
    println!("[PASS] Forecast slope {:.1}", forecast.slope);

    println!("=== Workflow complete ===\n");
}
