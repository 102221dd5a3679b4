//! boundary-eval: evaluation and decision-boundary rendering for binary classifiers.
//!
//! Given a fitted [`Predictor`](models::Predictor), a two-column feature
//! matrix and 0/1 labels, [`evaluate`](evaluate::evaluate) computes accuracy,
//! average precision, ROC AUC and PR AUC, splits the samples into the four
//! confusion categories and scores the predictor over a regular grid of the
//! feature plane. [`plot_evaluation`](report::plots::plot_evaluation) draws
//! the result onto any `plotters` drawing area, and
//! [`render_report`](report::html::render_report) wraps it in an HTML page.
//!
//! Rendering goes through an explicit drawing area owned by the caller, so
//! independent evaluations never share plotting state.
pub mod config;
pub mod confusion;
pub mod error;
pub mod evaluate;
pub mod math;
pub mod metrics;
pub mod models;
pub mod report;
pub mod surface;

pub use config::EvaluationConfig;
pub use error::EvalError;
pub use evaluate::{evaluate, evaluate_and_plot, Evaluation};
pub use metrics::MetricsSummary;
