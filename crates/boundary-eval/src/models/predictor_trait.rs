use anyhow::Result;
use ndarray::{Array1, ArrayView2};

/// A fitted binary scorer consumed by the evaluator.
///
/// `predict` receives an `N x 2` feature matrix and must return `N` scores,
/// one per row and in row order. Scores are nominally probabilities in
/// `[0, 1]`; anything above the configured threshold counts as positive.
/// Implementations must be `Sync` so grid inference can be split across
/// threads when batching is enabled.
pub trait Predictor: Sync {
    /// Score every row of `x`.
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>>;

    /// Optional human readable name for the predictor
    fn name(&self) -> &str {
        "predictor"
    }
}

impl<P: Predictor + ?Sized> Predictor for &P {
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        (**self).predict(x)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<P: Predictor + ?Sized> Predictor for Box<P> {
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        (**self).predict(x)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Adapts a closure into a [`Predictor`].
pub struct FnPredictor<F> {
    name: String,
    func: F,
}

impl<F> FnPredictor<F>
where
    F: Fn(ArrayView2<'_, f64>) -> Result<Array1<f64>> + Sync,
{
    pub fn new(name: &str, func: F) -> Self {
        Self {
            name: name.to_string(),
            func,
        }
    }
}

impl<F> Predictor for FnPredictor<F>
where
    F: Fn(ArrayView2<'_, f64>) -> Result<Array1<f64>> + Sync,
{
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        (self.func)(x)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
