use std::fmt;

use anyhow::{bail, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::models::predictor_trait::Predictor;

/// How the linear predictor is mapped to a score.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Link {
    Identity,
    #[default]
    Logistic,
}

/// A fitted linear model given by its coefficients.
///
/// The score for a row `x` is `link(intercept + sum_k coefficients[k] * x[k])`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    pub link: Link,
}

impl Default for LinearModel {
    fn default() -> Self {
        Self {
            intercept: 0.0,
            coefficients: vec![1.0, 1.0],
            link: Link::Logistic,
        }
    }
}

impl LinearModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>, link: Link) -> Self {
        Self {
            intercept,
            coefficients,
            link,
        }
    }

    fn decision_function(&self, row: ArrayView1<'_, f64>) -> f64 {
        row.iter()
            .zip(&self.coefficients)
            .fold(self.intercept, |acc, (x, w)| acc + x * w)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Predictor for LinearModel {
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.coefficients.len() {
            bail!(
                "Linear model has {} coefficients but the input has {} columns",
                self.coefficients.len(),
                x.ncols()
            );
        }

        let scores = x
            .rows()
            .into_iter()
            .map(|row| {
                let z = self.decision_function(row);
                match self.link {
                    Link::Identity => z,
                    Link::Logistic => sigmoid(z),
                }
            })
            .collect::<Array1<f64>>();
        Ok(scores)
    }

    fn name(&self) -> &str {
        "linear"
    }
}

/// Renders the model as `y = a + b x_1 + c x_2 + ...` with two decimals.
impl fmt::Display for LinearModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "y = {:.2}", self.intercept)?;
        for (i, w) in self.coefficients.iter().enumerate() {
            write!(f, " + {:.2} x_{}", w, i + 1)?;
        }
        Ok(())
    }
}

/// Prefix the model equation with a label, padded so that several results line up.
///
/// ```
/// use boundary_eval::models::linear::{format_result, Link, LinearModel};
/// let m = LinearModel::new(1.0, vec![2.0, -0.5, 0.25], Link::Identity);
/// assert_eq!(format_result("ols", &m), "ols:      y = 1.00 + 2.00 x_1 + -0.50 x_2 + 0.25 x_3");
/// ```
pub fn format_result(label: &str, model: &LinearModel) -> String {
    format!("{:<9} {}", format!("{}:", label), model)
}
