//! Threshold-free ranking metrics and accuracy for binary classifiers.
//!
//! The curve construction follows the usual convention: samples are ranked
//! by decreasing score, tied scores form a single operating point, and the
//! cumulative true/false positive counts are read off at the end of every
//! tie group.
use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Receiver operating characteristic, starting at `(0, 0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    /// Score cutoff for each point; the first entry is `+inf`.
    pub thresholds: Vec<f64>,
}

/// Precision-recall operating points ordered by increasing threshold.
///
/// `precision` and `recall` carry one more element than `thresholds`: the
/// final point `(recall = 0, precision = 1)` has no threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecisionRecallCurve {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub thresholds: Vec<f64>,
}

/// The four numbers reported in the figure title.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct MetricsSummary {
    pub accuracy: f64,
    pub average_precision: f64,
    pub roc_auc: f64,
    pub pr_auc: f64,
}

impl MetricsSummary {
    /// Compute all four metrics.
    ///
    /// # Arguments
    ///
    /// * `labels` - Ground truth, `true` for the positive class.
    /// * `scores` - Predictor scores, parallel to `labels`.
    /// * `predicted` - Thresholded predictions, parallel to `labels`.
    ///
    /// `average_precision` and `pr_auc` are computed from the same
    /// precision-recall points but with different integration rules (step
    /// sum vs trapezoid), so they generally differ slightly.
    pub fn compute(labels: &[bool], scores: &[f64], predicted: &[bool]) -> Result<Self, EvalError> {
        let accuracy = accuracy(labels, predicted)?;
        let pr = precision_recall_curve(labels, scores)?;
        let average_precision = average_precision_from_curve(&pr);
        let pr_auc = auc(&pr.recall, &pr.precision)?;
        let roc = roc_curve(labels, scores)?;
        let roc_auc = auc(&roc.fpr, &roc.tpr)?;

        Ok(Self {
            accuracy,
            average_precision,
            roc_auc,
            pr_auc,
        })
    }

    /// `acc=0.50 | avg(prec)=0.50 | rocauc=0.50 | prauc=0.50`
    pub fn title(&self) -> String {
        format!(
            "acc={:.2} | avg(prec)={:.2} | rocauc={:.2} | prauc={:.2}",
            self.accuracy, self.average_precision, self.roc_auc, self.pr_auc
        )
    }
}

fn check_lengths(what: &'static str, expected: usize, found: usize) -> Result<(), EvalError> {
    if expected != found {
        return Err(EvalError::ShapeMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

/// Fraction of samples whose prediction equals the label.
pub fn accuracy(labels: &[bool], predicted: &[bool]) -> Result<f64, EvalError> {
    check_lengths("predicted labels", labels.len(), predicted.len())?;
    if labels.is_empty() {
        return Err(EvalError::EmptyInput);
    }
    let correct = labels
        .iter()
        .zip(predicted)
        .filter(|(y, yhat)| y == yhat)
        .count();
    Ok(correct as f64 / labels.len() as f64)
}

/// Cumulative false and true positive counts at each distinct score,
/// scanning from the highest score down.
///
/// Returns `(fps, tps, thresholds)`, all of the same length.
fn binary_clf_curve(labels: &[bool], scores: &[f64]) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>), EvalError> {
    check_lengths("scores", labels.len(), scores.len())?;
    if labels.is_empty() {
        return Err(EvalError::EmptyInput);
    }
    if let Some(index) = scores.iter().position(|s| !s.is_finite()) {
        return Err(EvalError::NonFiniteScore { index });
    }
    let n_pos = labels.iter().filter(|&&y| y).count();
    if n_pos == 0 || n_pos == labels.len() {
        return Err(EvalError::SingleClass);
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    // Scores are finite here, so total_cmp agrees with the numeric order.
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut fps = Vec::new();
    let mut tps = Vec::new();
    let mut thresholds = Vec::new();
    let (mut tp, mut fp) = (0usize, 0usize);
    for (rank, &idx) in order.iter().enumerate() {
        if labels[idx] {
            tp += 1;
        } else {
            fp += 1;
        }
        let last_of_group = order
            .get(rank + 1)
            .map_or(true, |&next| scores[next] != scores[idx]);
        if last_of_group {
            fps.push(fp as f64);
            tps.push(tp as f64);
            thresholds.push(scores[idx]);
        }
    }

    Ok((fps, tps, thresholds))
}

/// ROC curve over every distinct score.
pub fn roc_curve(labels: &[bool], scores: &[f64]) -> Result<RocCurve, EvalError> {
    let (fps, tps, thresholds) = binary_clf_curve(labels, scores)?;
    let n_neg = fps[fps.len() - 1];
    let n_pos = tps[tps.len() - 1];

    let mut fpr = Vec::with_capacity(fps.len() + 1);
    let mut tpr = Vec::with_capacity(tps.len() + 1);
    let mut ts = Vec::with_capacity(thresholds.len() + 1);
    fpr.push(0.0);
    tpr.push(0.0);
    ts.push(f64::INFINITY);
    for i in 0..fps.len() {
        fpr.push(fps[i] / n_neg);
        tpr.push(tps[i] / n_pos);
        ts.push(thresholds[i]);
    }

    Ok(RocCurve {
        fpr,
        tpr,
        thresholds: ts,
    })
}

/// Area under the ROC curve.
pub fn roc_auc(labels: &[bool], scores: &[f64]) -> Result<f64, EvalError> {
    let roc = roc_curve(labels, scores)?;
    auc(&roc.fpr, &roc.tpr)
}

/// Precision and recall at every distinct score.
pub fn precision_recall_curve(labels: &[bool], scores: &[f64]) -> Result<PrecisionRecallCurve, EvalError> {
    let (fps, tps, thresholds) = binary_clf_curve(labels, scores)?;
    let n_pos = tps[tps.len() - 1];

    // Walk from the lowest threshold (full recall) up to the highest.
    let mut precision = Vec::with_capacity(tps.len() + 1);
    let mut recall = Vec::with_capacity(tps.len() + 1);
    for i in (0..tps.len()).rev() {
        let predicted_pos = tps[i] + fps[i];
        precision.push(if predicted_pos > 0.0 { tps[i] / predicted_pos } else { 0.0 });
        recall.push(tps[i] / n_pos);
    }
    precision.push(1.0);
    recall.push(0.0);

    Ok(PrecisionRecallCurve {
        precision,
        recall,
        thresholds: thresholds.into_iter().rev().collect(),
    })
}

/// Step-wise average precision: `sum_k (R_k - R_{k+1}) * P_k` along a curve
/// ordered by increasing threshold.
fn average_precision_from_curve(curve: &PrecisionRecallCurve) -> f64 {
    curve
        .recall
        .windows(2)
        .zip(&curve.precision)
        .map(|(r, p)| (r[0] - r[1]) * p)
        .sum()
}

/// Precision averaged over the recall increments of each operating point.
pub fn average_precision(labels: &[bool], scores: &[f64]) -> Result<f64, EvalError> {
    let pr = precision_recall_curve(labels, scores)?;
    Ok(average_precision_from_curve(&pr))
}

/// Trapezoidal area under `y(x)`.
///
/// `x` must be monotonic (either direction); a decreasing `x` is integrated
/// in reverse so the area stays positive.
pub fn auc(x: &[f64], y: &[f64]) -> Result<f64, EvalError> {
    check_lengths("curve points", x.len(), y.len())?;
    if x.len() < 2 {
        return Err(EvalError::ShapeMismatch {
            what: "curve points (at least 2 required)",
            expected: 2,
            found: x.len(),
        });
    }

    let increasing = x.windows(2).all(|w| w[1] >= w[0]);
    let decreasing = x.windows(2).all(|w| w[1] <= w[0]);
    let direction = if increasing {
        1.0
    } else if decreasing {
        -1.0
    } else {
        return Err(EvalError::InvalidConfig(
            "x values of a curve must be monotonic to integrate".to_string(),
        ));
    };

    let area: f64 = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum();
    Ok(direction * area)
}
