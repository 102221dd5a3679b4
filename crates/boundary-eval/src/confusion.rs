//! Thresholding and the four-way confusion split of samples.
use serde::Serialize;

use crate::error::EvalError;

/// Predicted class for each score: positive iff `score > threshold`.
///
/// A score equal to the threshold is predicted negative.
pub fn binarize(scores: &[f64], threshold: f64) -> Vec<bool> {
    scores.iter().map(|&p| p > threshold).collect()
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfusionCategory {
    TruePositive,
    FalseNegative,
    TrueNegative,
    FalsePositive,
}

impl ConfusionCategory {
    /// Drawing order of the scatter layers.
    pub const ALL: [ConfusionCategory; 4] = [
        ConfusionCategory::TruePositive,
        ConfusionCategory::FalseNegative,
        ConfusionCategory::TrueNegative,
        ConfusionCategory::FalsePositive,
    ];

    pub fn of(label: bool, predicted: bool) -> Self {
        match (label, predicted) {
            (true, true) => ConfusionCategory::TruePositive,
            (true, false) => ConfusionCategory::FalseNegative,
            (false, false) => ConfusionCategory::TrueNegative,
            (false, true) => ConfusionCategory::FalsePositive,
        }
    }

    /// Legend label.
    pub fn label(&self) -> &'static str {
        match self {
            ConfusionCategory::TruePositive => "True Positive",
            ConfusionCategory::FalseNegative => "False Negative",
            ConfusionCategory::TrueNegative => "True Negative",
            ConfusionCategory::FalsePositive => "False Positive",
        }
    }
}

/// Sample indices grouped by confusion category, each in ascending order.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfusionPartition {
    pub true_positive: Vec<usize>,
    pub false_negative: Vec<usize>,
    pub true_negative: Vec<usize>,
    pub false_positive: Vec<usize>,
}

impl ConfusionPartition {
    pub fn new(labels: &[bool], predicted: &[bool]) -> Result<Self, EvalError> {
        if labels.len() != predicted.len() {
            return Err(EvalError::ShapeMismatch {
                what: "predicted labels",
                expected: labels.len(),
                found: predicted.len(),
            });
        }

        let mut partition = Self::default();
        for (i, (&y, &yhat)) in labels.iter().zip(predicted).enumerate() {
            partition.indices_mut(ConfusionCategory::of(y, yhat)).push(i);
        }
        Ok(partition)
    }

    pub fn indices(&self, category: ConfusionCategory) -> &[usize] {
        match category {
            ConfusionCategory::TruePositive => &self.true_positive,
            ConfusionCategory::FalseNegative => &self.false_negative,
            ConfusionCategory::TrueNegative => &self.true_negative,
            ConfusionCategory::FalsePositive => &self.false_positive,
        }
    }

    fn indices_mut(&mut self, category: ConfusionCategory) -> &mut Vec<usize> {
        match category {
            ConfusionCategory::TruePositive => &mut self.true_positive,
            ConfusionCategory::FalseNegative => &mut self.false_negative,
            ConfusionCategory::TrueNegative => &mut self.true_negative,
            ConfusionCategory::FalsePositive => &mut self.false_positive,
        }
    }

    pub fn count(&self, category: ConfusionCategory) -> usize {
        self.indices(category).len()
    }

    pub fn total(&self) -> usize {
        ConfusionCategory::ALL.iter().map(|&c| self.count(c)).sum()
    }

    /// `(TP + TN) / total`, or `None` when the partition is empty.
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let correct = self.count(ConfusionCategory::TruePositive) + self.count(ConfusionCategory::TrueNegative);
        Some(correct as f64 / total as f64)
    }
}
