use ndarray::{Array1, ArrayView1, ArrayView2};
use plotters::coord::Shift;
use plotters::prelude::{DrawingArea, DrawingBackend};

use crate::config::EvaluationConfig;
use crate::confusion::{binarize, ConfusionPartition};
use crate::error::EvalError;
use crate::metrics::MetricsSummary;
use crate::models::predictor_trait::Predictor;
use crate::report::plots::plot_evaluation;
use crate::surface::{compute_surface, DecisionSurface};

/// Everything computed for one predictor on one labelled sample set.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Predictor scores, one per sample.
    pub probabilities: Array1<f64>,
    pub labels: Vec<bool>,
    pub predicted: Vec<bool>,
    pub partition: ConfusionPartition,
    pub metrics: MetricsSummary,
    pub surface: DecisionSurface,
}

/// Check features and labels before anything is scored.
///
/// Returns the labels as booleans (`1` is the positive class).
pub fn validate_inputs(features: ArrayView2<'_, f64>, labels: ArrayView1<'_, i32>) -> Result<Vec<bool>, EvalError> {
    if features.nrows() == 0 || labels.is_empty() {
        return Err(EvalError::EmptyInput);
    }
    if features.ncols() != 2 {
        return Err(EvalError::ShapeMismatch {
            what: "feature columns",
            expected: 2,
            found: features.ncols(),
        });
    }
    if features.nrows() != labels.len() {
        return Err(EvalError::ShapeMismatch {
            what: "labels",
            expected: features.nrows(),
            found: labels.len(),
        });
    }

    let truth = labels
        .iter()
        .enumerate()
        .map(|(index, &value)| match value {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(EvalError::InvalidLabelValue { index, value }),
        })
        .collect::<Result<Vec<bool>, EvalError>>()?;

    if let Some(((row, column), _)) = features.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(EvalError::NonFiniteFeature { row, column });
    }

    Ok(truth)
}

/// Score a predictor on labelled 2-D samples and over the decision grid.
///
/// # Arguments
///
/// * `features` - `N x 2` feature matrix.
/// * `labels` - `N` ground-truth labels in `{0, 1}`.
/// * `predictor` - The fitted scorer.
/// * `config` - Threshold and grid settings.
///
/// # Returns
///
/// The scores, predictions, confusion partition, metrics and decision
/// surface. Any failure aborts the whole evaluation.
pub fn evaluate<P: Predictor + ?Sized>(
    features: ArrayView2<'_, f64>,
    labels: ArrayView1<'_, i32>,
    predictor: &P,
    config: &EvaluationConfig,
) -> Result<Evaluation, EvalError> {
    let labels = validate_inputs(features, labels)?;
    config.validate()?;

    log::info!(
        "Evaluating {} on {} samples (threshold {})",
        predictor.name(),
        labels.len(),
        config.threshold
    );

    let probabilities = predictor.predict(features).map_err(EvalError::Predictor)?;
    if probabilities.len() != labels.len() {
        return Err(EvalError::ShapeMismatch {
            what: "predictions",
            expected: labels.len(),
            found: probabilities.len(),
        });
    }
    let scores = probabilities.to_vec();
    if let Some(index) = scores.iter().position(|s| !s.is_finite()) {
        return Err(EvalError::NonFiniteScore { index });
    }

    let predicted = binarize(&scores, config.threshold);
    let partition = ConfusionPartition::new(&labels, &predicted)?;
    log::debug!(
        "TP={} FN={} TN={} FP={}",
        partition.true_positive.len(),
        partition.false_negative.len(),
        partition.true_negative.len(),
        partition.false_positive.len()
    );

    let metrics = MetricsSummary::compute(&labels, &scores, &predicted)?;
    log::info!("{}", metrics.title());

    let surface = compute_surface(predictor, config)?;
    log::debug!(
        "Decision surface {}x{} scores in [{:.3}, {:.3}]",
        surface.resolution(),
        surface.resolution(),
        surface.score_range().0,
        surface.score_range().1
    );

    Ok(Evaluation {
        probabilities,
        labels,
        predicted,
        partition,
        metrics,
        surface,
    })
}

/// [`evaluate`] and then draw the result onto `root`.
///
/// Nothing is drawn if the evaluation fails.
pub fn evaluate_and_plot<DB, P>(
    root: &DrawingArea<DB, Shift>,
    features: ArrayView2<'_, f64>,
    labels: ArrayView1<'_, i32>,
    predictor: &P,
    config: &EvaluationConfig,
) -> Result<Evaluation, EvalError>
where
    DB: DrawingBackend,
    P: Predictor + ?Sized,
{
    let evaluation = evaluate(features, labels, predictor, config)?;
    plot_evaluation(root, features, &evaluation)?;
    Ok(evaluation)
}
