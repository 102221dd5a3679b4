use itertools_num::linspace;
use ndarray::{s, Array1, Array2};
use rayon::prelude::*;

use crate::config::EvaluationConfig;
use crate::error::EvalError;
use crate::models::predictor_trait::Predictor;

/// Predictor scores over a regular grid of the feature plane.
///
/// `scores[[i, j]]` is the score at `(xs[j], ys[i])`: rows follow the
/// second feature, columns the first.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionSurface {
    pub xs: Array1<f64>,
    pub ys: Array1<f64>,
    pub scores: Array2<f64>,
}

impl DecisionSurface {
    pub fn resolution(&self) -> usize {
        self.xs.len()
    }

    /// `(min, max)` over all grid scores.
    pub fn score_range(&self) -> (f64, f64) {
        self.scores
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// Width and height of a single grid cell.
    pub fn cell_size(&self) -> (f64, f64) {
        let n = self.resolution();
        if n < 2 {
            return (0.0, 0.0);
        }
        (
            (self.xs[n - 1] - self.xs[0]) / (n - 1) as f64,
            (self.ys[n - 1] - self.ys[0]) / (n - 1) as f64,
        )
    }
}

/// Grid axis shared by x and y.
pub fn grid_axis(config: &EvaluationConfig) -> Array1<f64> {
    let (lo, hi) = config.grid_bounds;
    let mut axis: Array1<f64> = linspace(lo, hi, config.grid_resolution).collect();
    let n = axis.len();
    if n > 0 {
        axis[n - 1] = hi;
    }
    axis
}

/// Flatten the grid into an `(n * n) x 2` matrix in row-major order.
///
/// Row `k = i * n + j` holds `(xs[j], ys[i])`.
pub fn grid_points(xs: &Array1<f64>, ys: &Array1<f64>) -> Array2<f64> {
    let mut points = Array2::<f64>::zeros((xs.len() * ys.len(), 2));
    for (i, &y) in ys.iter().enumerate() {
        for (j, &x) in xs.iter().enumerate() {
            let k = i * xs.len() + j;
            points[[k, 0]] = x;
            points[[k, 1]] = y;
        }
    }
    points
}

fn predict_chunk<P: Predictor + ?Sized>(
    predictor: &P,
    points: &Array2<f64>,
    start: usize,
    end: usize,
) -> Result<Array1<f64>, EvalError> {
    let chunk = points.slice(s![start..end, ..]);
    let scores = predictor.predict(chunk).map_err(EvalError::Predictor)?;
    if scores.len() != end - start {
        return Err(EvalError::ShapeMismatch {
            what: "grid predictions",
            expected: end - start,
            found: scores.len(),
        });
    }
    Ok(scores)
}

/// Score the predictor on every grid point.
///
/// Without a batch size the whole grid goes through a single `predict`
/// call. With one, the flattened grid is split into consecutive chunks that
/// are scored in parallel and concatenated back in order.
pub fn compute_surface<P: Predictor + ?Sized>(
    predictor: &P,
    config: &EvaluationConfig,
) -> Result<DecisionSurface, EvalError> {
    config.validate()?;
    let xs = grid_axis(config);
    let ys = xs.clone();
    let n = xs.len();
    let points = grid_points(&xs, &ys);
    let total = points.nrows();

    let flat: Vec<f64> = match config.grid_batch_size {
        Some(batch_size) if batch_size < total => {
            let num_batches = (total + batch_size - 1) / batch_size;
            log::debug!(
                "Scoring {} grid points in {} batches of {}",
                total,
                num_batches,
                batch_size
            );
            let chunks = (0..num_batches)
                .into_par_iter()
                .map(|batch_idx| {
                    let start = batch_idx * batch_size;
                    let end = (start + batch_size).min(total);
                    predict_chunk(predictor, &points, start, end)
                })
                .collect::<Result<Vec<_>, EvalError>>()?;
            chunks.into_iter().flat_map(|c| c.into_iter()).collect()
        }
        _ => {
            log::debug!("Scoring {} grid points in one call", total);
            predict_chunk(predictor, &points, 0, total)?.to_vec()
        }
    };

    if let Some(index) = flat.iter().position(|s| !s.is_finite()) {
        return Err(EvalError::NonFiniteScore { index });
    }

    let found = flat.len();
    let scores = Array2::from_shape_vec((n, n), flat).map_err(|_| EvalError::ShapeMismatch {
        what: "decision surface",
        expected: n * n,
        found,
    })?;

    Ok(DecisionSurface { xs, ys, scores })
}
