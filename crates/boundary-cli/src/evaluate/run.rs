use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;

use boundary_eval::models::format_result;
use boundary_eval::report::html::render_report;
use boundary_eval::{evaluate_and_plot, Evaluation};

use crate::evaluate::input::{load_samples, RunConfig};

/// Evaluate the configured model on a sample file and write the figure
/// (and the HTML report when one is configured).
pub fn run_evaluation<P: AsRef<Path>>(samples_path: P, config: &RunConfig) -> Result<Evaluation> {
    let samples = load_samples(&samples_path, &config.feature_columns, &config.label_column)?;

    let mut svg = String::new();
    let evaluation = {
        let root = SVGBackend::with_string(&mut svg, (config.width, config.height)).into_drawing_area();
        evaluate_and_plot(
            &root,
            samples.features.view(),
            samples.labels.view(),
            &config.model,
            &config.evaluation,
        )
        .with_context(|| format!("Evaluation of {} failed", samples_path.as_ref().display()))?
    };

    std::fs::write(&config.output_file, &svg)
        .with_context(|| format!("Failed to write figure: {}", config.output_file))?;
    log::info!("Figure written to {}", config.output_file);

    if let Some(report_file) = &config.report_file {
        let html = render_report("Decision boundary report", &evaluation, &config.evaluation, &svg)?;
        std::fs::write(report_file, html)
            .with_context(|| format!("Failed to write report: {}", report_file))?;
        log::info!("Report written to {}", report_file);
    }

    Ok(evaluation)
}

/// Human readable summary: the model equation and the metrics line.
pub fn summary_lines(config: &RunConfig, evaluation: &Evaluation) -> Vec<String> {
    vec![
        format_result("model", &config.model),
        format!("{:<9} {}", "metrics:", evaluation.metrics.title()),
    ]
}
