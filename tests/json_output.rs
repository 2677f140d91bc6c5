//! Serialized shape of evaluation results and configuration.
//!
//! Requires the `serde` feature (enabled by default through `cli`).

#![cfg(feature = "serde")]

use safetraj::{SafeTrajConfig, SafeTrajEvaluator};
use serde_json::Value;

fn evaluate_json(include_trajectory: bool) -> Value {
    let ev = SafeTrajEvaluator::new(SafeTrajConfig::quick()).unwrap();
    let res = ev.evaluate(&[0.5, 1.2, 0.3], include_trajectory).unwrap();
    serde_json::to_value(&res).unwrap()
}

#[test]
fn test_result_keys() {
    let v = evaluate_json(false);
    let obj = v.as_object().unwrap();

    for key in [
        "input",
        "mahalanobis_score",
        "isolation_forest_score",
        "risk_score",
        "risk_label",
        "feature_importance",
    ] {
        assert!(obj.contains_key(key), "missing {key}");
    }
    assert!(!obj.contains_key("trajectory"));

    assert_eq!(v["input"], serde_json::json!([0.5, 1.2, 0.3]));
    assert!(v["risk_score"].is_f64());
}

#[test]
fn test_label_and_importance_shape() {
    let v = evaluate_json(false);

    let label = v["risk_label"].as_str().unwrap();
    assert!([
        "in-distribution & low-risk",
        "borderline / uncertain",
        "high OOD / high-risk",
    ]
    .contains(&label));

    let imp = v["feature_importance"].as_object().unwrap();
    let names: Vec<&str> = imp.keys().map(String::as_str).collect();
    assert_eq!(names.len(), 3);
    for name in ["orientation", "v_lin", "v_rot"] {
        assert!(imp[name].as_f64().unwrap() >= 0.0);
    }
}

#[test]
fn test_trajectory_rows() {
    let v = evaluate_json(true);
    let rows = v["trajectory"].as_array().unwrap();

    assert_eq!(rows.len(), 20);
    for row in rows {
        assert_eq!(row.as_array().unwrap().len(), 3);
    }
    assert_eq!(rows[0], serde_json::json!([0.0, 0.0, 0.5]));
}

#[test]
fn test_result_deserializes() {
    let ev = SafeTrajEvaluator::new(SafeTrajConfig::quick()).unwrap();
    let res = ev.evaluate(&[-1.0, 2.0, 0.5], true).unwrap();
    let text = serde_json::to_string(&res).unwrap();
    let back: safetraj::Evaluation = serde_json::from_str(&text).unwrap();
    assert_eq!(back.risk_label, res.risk_label);
    assert_eq!(back.trajectory.map(|t| t.len()), Some(20));
}

#[test]
fn test_partial_config_uses_defaults() {
    let config: SafeTrajConfig = serde_json::from_str(r#"{ "seed": 0, "num_steps": 5 }"#).unwrap();
    assert_eq!(config.seed, 0);
    assert_eq!(config.num_steps, 5);
    assert_eq!(config.n_train_samples, 800);
    assert_eq!(config.maha_thr, 3.0);
}
