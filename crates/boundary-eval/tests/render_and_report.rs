//! Rendering onto an in-memory SVG, HTML report and YAML persistence.

use boundary_eval::config::{load_yaml, save_yaml};
use boundary_eval::models::{LinearModel, Link};
use boundary_eval::report::html::render_report;
use boundary_eval::report::plots::plot_evaluation;
use boundary_eval::{evaluate, evaluate_and_plot, EvalError, EvaluationConfig};
use ndarray::{array, Array2};
use plotters::prelude::*;

fn samples() -> (Array2<f64>, ndarray::Array1<i32>) {
    let x = array![[-4.0, -1.0], [3.0, 2.0], [-1.0, 5.0], [6.0, -2.0], [0.5, 0.5], [-7.0, -7.0]];
    let y = array![0, 1, 1, 1, 0, 0];
    (x, y)
}

fn small() -> EvaluationConfig {
    EvaluationConfig {
        grid_resolution: 40,
        ..EvaluationConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Figure
// ---------------------------------------------------------------------------

#[test]
fn svg_contains_title_and_legend() {
    let (x, y) = samples();
    let model = LinearModel::new(0.0, vec![1.0, 0.2], Link::Logistic);
    let mut svg = String::new();
    let ev = {
        let root = SVGBackend::with_string(&mut svg, (640, 480)).into_drawing_area();
        evaluate_and_plot(&root, x.view(), y.view(), &model, &small()).unwrap()
    };

    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(&ev.metrics.title()));
    for label in ["True Positive", "False Negative", "True Negative", "False Positive"] {
        assert!(svg.contains(label), "missing legend entry {}", label);
    }
    assert!(svg.contains("x_1"));
    assert!(svg.contains("x_2"));
}

#[test]
fn independent_areas_do_not_interfere() {
    let (x, y) = samples();
    let a = LinearModel::new(0.0, vec![1.0, 0.0], Link::Logistic);
    let b = LinearModel::new(0.0, vec![0.0, 1.0], Link::Logistic);

    let ev_a = evaluate(x.view(), y.view(), &a, &small()).unwrap();
    let ev_b = evaluate(x.view(), y.view(), &b, &small()).unwrap();

    let mut svg_a = String::new();
    let mut svg_b = String::new();
    {
        let root_a = SVGBackend::with_string(&mut svg_a, (400, 300)).into_drawing_area();
        let root_b = SVGBackend::with_string(&mut svg_b, (400, 300)).into_drawing_area();
        plot_evaluation(&root_a, x.view(), &ev_a).unwrap();
        plot_evaluation(&root_b, x.view(), &ev_b).unwrap();
    }
    assert!(svg_a.contains(&ev_a.metrics.title()));
    assert!(svg_b.contains(&ev_b.metrics.title()));
    if ev_a.metrics.title() != ev_b.metrics.title() {
        assert!(!svg_a.contains(&ev_b.metrics.title()));
    }
}

#[test]
fn plotting_rejects_mismatched_features() {
    let (x, y) = samples();
    let model = LinearModel::default();
    let ev = evaluate(x.view(), y.view(), &model, &small()).unwrap();
    let fewer = x.slice(ndarray::s![..3, ..]).to_owned();

    let mut svg = String::new();
    let root = SVGBackend::with_string(&mut svg, (200, 200)).into_drawing_area();
    let err = plot_evaluation(&root, fewer.view(), &ev).unwrap_err();
    assert!(matches!(err, EvalError::ShapeMismatch { .. }));
}

#[test]
fn unbounded_plot_range_is_a_render_error() {
    // Finite samples whose spread overflows to an infinite axis width.
    let x = array![[-1e308, 0.0], [1e308, 0.0], [0.0, 1.0], [1.0, -1.0]];
    let y = array![0, 1, 0, 1];
    let model = LinearModel::new(0.0, vec![1.0, 0.0], Link::Logistic);
    let ev = evaluate(x.view(), y.view(), &model, &small()).unwrap();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (200, 200)).into_drawing_area();
        let err = plot_evaluation(&root, x.view(), &ev).unwrap_err();
        assert!(matches!(err, EvalError::Render(ref msg) if msg.contains("x_1")));
    }
    assert!(!svg.contains("True Positive"));
}

#[test]
fn non_finite_features_fail_before_drawing() {
    let x = array![[0.0, 0.0], [f64::INFINITY, 1.0]];
    let y = array![0, 1];
    let model = LinearModel::default();
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (200, 200)).into_drawing_area();
        let err = evaluate_and_plot(&root, x.view(), y.view(), &model, &small()).unwrap_err();
        assert!(matches!(err, EvalError::NonFiniteFeature { row: 1, column: 0 }));
    }
    assert!(!svg.contains("True Positive"));
}

#[test]
fn failed_evaluation_draws_nothing() {
    let x = array![[0.0, 0.0], [1.0, 1.0]];
    let y = array![0, 3];
    let model = LinearModel::default();
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (200, 200)).into_drawing_area();
        assert!(evaluate_and_plot(&root, x.view(), y.view(), &model, &small()).is_err());
    }
    assert!(!svg.contains("True Positive"));
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[test]
fn report_embeds_figure_metrics_and_config() {
    let (x, y) = samples();
    let model = LinearModel::default();
    let cfg = small();
    let ev = evaluate(x.view(), y.view(), &model, &cfg).unwrap();

    let html = render_report("Decision boundary", &ev, &cfg, "<svg id=\"fig\"></svg>").unwrap();
    assert!(html.contains("<svg id=\"fig\"></svg>"));
    assert!(html.contains("grid_resolution: 40"));
    assert!(html.contains(&format!("{:.4}", ev.metrics.roc_auc)));
    assert!(html.contains("False Negative"));
}

// ---------------------------------------------------------------------------
// Config persistence
// ---------------------------------------------------------------------------

#[test]
fn config_yaml_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eval.yaml");
    let cfg = EvaluationConfig {
        threshold: 0.3,
        grid_bounds: (-5.0, 5.0),
        grid_resolution: 50,
        grid_batch_size: Some(1000),
    };
    save_yaml(&cfg, &path).unwrap();
    let back: EvaluationConfig = load_yaml(&path).unwrap();
    assert_eq!(back, cfg);
}

#[test]
fn model_yaml_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.yaml");
    let model = LinearModel::new(-1.5, vec![0.25, 4.0], Link::Identity);
    save_yaml(&model, &path).unwrap();
    let back: LinearModel = load_yaml(&path).unwrap();
    assert_eq!(back, model);
}

#[test]
fn missing_yaml_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let res: anyhow::Result<EvaluationConfig> = load_yaml(dir.path().join("absent.yaml"));
    let err = res.unwrap_err();
    assert!(err.to_string().contains("absent.yaml"));
}
