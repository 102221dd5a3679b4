use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// Parameters of a single evaluation run.
///
/// Defaults: a 0.5 cutoff and a 400 x 400 grid over `[-20, 20]` on both axes.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Scores strictly above this value are predicted positive.
    pub threshold: f64,
    /// `(min, max)` of the decision-surface grid, shared by both axes.
    pub grid_bounds: (f64, f64),
    /// Number of grid points per axis.
    pub grid_resolution: usize,
    /// When set, the grid is scored in chunks of this many points in parallel.
    pub grid_batch_size: Option<usize>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            grid_bounds: (-20.0, 20.0),
            grid_resolution: 400,
            grid_batch_size: None,
        }
    }
}

impl EvaluationConfig {
    pub fn validate(&self) -> Result<(), EvalError> {
        if !self.threshold.is_finite() {
            return Err(EvalError::InvalidConfig(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        let (lo, hi) = self.grid_bounds;
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(EvalError::InvalidConfig(format!(
                "grid_bounds must be finite with min < max, got ({}, {})",
                lo, hi
            )));
        }
        if self.grid_resolution < 2 {
            return Err(EvalError::InvalidConfig(format!(
                "grid_resolution must be at least 2, got {}",
                self.grid_resolution
            )));
        }
        if self.grid_batch_size == Some(0) {
            return Err(EvalError::InvalidConfig(
                "grid_batch_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load any deserializable value from a YAML file.
pub fn load_yaml<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let f = File::open(&path)
        .with_context(|| format!("Failed to open YAML file: {}", path.as_ref().display()))?;
    let value = serde_yaml::from_reader(BufReader::new(f))
        .with_context(|| format!("Failed to parse YAML file: {}", path.as_ref().display()))?;
    Ok(value)
}

/// Write any serializable value to a YAML file, replacing existing content.
pub fn save_yaml<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let f = File::create(&path)
        .with_context(|| format!("Failed to create YAML file: {}", path.as_ref().display()))?;
    serde_yaml::to_writer(BufWriter::new(f), value)
        .with_context(|| format!("Failed to write YAML file: {}", path.as_ref().display()))?;
    Ok(())
}
