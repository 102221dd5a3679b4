use std::error::Error;
use std::fmt;

/// Errors raised while evaluating a predictor or rendering its decision boundary.
#[derive(Debug)]
pub enum EvalError {
    /// No samples were supplied.
    EmptyInput,
    /// Two quantities that must agree in size do not.
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// A ground-truth label outside {0, 1}.
    InvalidLabelValue { index: usize, value: i32 },
    /// A feature value is NaN or infinite.
    NonFiniteFeature { row: usize, column: usize },
    /// The predictor produced NaN or an infinite score.
    NonFiniteScore { index: usize },
    /// Ranking metrics need both classes in the ground truth.
    SingleClass,
    InvalidConfig(String),
    /// The predictor failed; its error is kept as the source.
    Predictor(anyhow::Error),
    Render(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalError::EmptyInput => write!(f, "Cannot evaluate a predictor on zero samples"),
            EvalError::ShapeMismatch {
                what,
                expected,
                found,
            } => write!(f, "Shape mismatch for {}: expected {}, found {}", what, expected, found),
            EvalError::InvalidLabelValue { index, value } => write!(
                f,
                "Label {} at index {} is not a binary label (expected 0 or 1)",
                value, index
            ),
            EvalError::NonFiniteFeature { row, column } => {
                write!(f, "Feature value at row {} column {} is not finite", row, column)
            }
            EvalError::NonFiniteScore { index } => {
                write!(f, "Predictor returned a non-finite score at index {}", index)
            }
            EvalError::SingleClass => write!(
                f,
                "Only one class present in the labels; ROC AUC and precision-recall metrics are not defined"
            ),
            EvalError::InvalidConfig(msg) => write!(f, "Invalid evaluation config: {}", msg),
            EvalError::Predictor(_) => write!(f, "Predictor failed"),
            EvalError::Render(msg) => write!(f, "Failed to render figure: {}", msg),
        }
    }
}

impl Error for EvalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EvalError::Predictor(e) => Some(&**e),
            _ => None,
        }
    }
}
