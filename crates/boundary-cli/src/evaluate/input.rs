use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use csv::StringRecord;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use boundary_eval::models::LinearModel;
use boundary_eval::EvaluationConfig;

/// Everything `boundary evaluate` needs besides the sample file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub version: String,
    pub evaluation: EvaluationConfig,
    pub model: LinearModel,
    /// The two feature columns, in `(x_1, x_2)` order.
    pub feature_columns: Vec<String>,
    pub label_column: String,
    pub output_file: String,
    pub report_file: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            version: clap::crate_version!().to_string(),
            evaluation: EvaluationConfig::default(),
            model: LinearModel::default(),
            feature_columns: vec!["x1".to_string(), "x2".to_string()],
            label_column: "label".to_string(),
            output_file: String::from("decision_boundary.svg"),
            report_file: None,
            width: 800,
            height: 600,
        }
    }
}

impl RunConfig {
    /// Build the run configuration from an optional YAML file and the
    /// command line. Fields missing from the file keep their defaults;
    /// command line values win over both.
    pub fn from_arguments(config_path: Option<&PathBuf>, matches: &ArgMatches) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_yaml_file(path)?,
            None => RunConfig::default(),
        };

        if let Some(output_file) = matches.get_one::<String>("output_file") {
            config.output_file = output_file.clone();
        }
        if let Some(report_file) = matches.get_one::<String>("report_file") {
            config.report_file = Some(report_file.clone());
        }
        if let Some(width) = matches.get_one::<u32>("width") {
            config.width = *width;
        }
        if let Some(height) = matches.get_one::<u32>("height") {
            config.height = *height;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let partial: serde_yaml::Value = serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        let mut config = RunConfig::default();

        macro_rules! load_or_default {
            ($field:ident) => {
                if let Some(val) = partial.get(stringify!($field)) {
                    match serde_yaml::from_value(val.clone()) {
                        Ok(parsed) => config.$field = parsed,
                        Err(e) => log::warn!(
                            "Config invalid value for '{}' ({}), using default: {:?}",
                            stringify!($field),
                            e,
                            config.$field
                        ),
                    }
                } else {
                    log::debug!(
                        "Config missing field '{}', using default: {:?}",
                        stringify!($field),
                        config.$field
                    );
                }
            };
        }

        macro_rules! load_strict {
            ($field:ident) => {
                if let Some(val) = partial.get(stringify!($field)) {
                    config.$field = serde_yaml::from_value(val.clone()).with_context(|| {
                        format!(
                            "Invalid '{}' block in config file: {}",
                            stringify!($field),
                            path.as_ref().display()
                        )
                    })?;
                }
            };
        }

        // Scoring settings fail loudly; presentation fields fall back.
        load_strict!(evaluation);
        load_strict!(model);
        load_or_default!(feature_columns);
        load_or_default!(label_column);
        load_or_default!(output_file);
        load_or_default!(report_file);
        load_or_default!(width);
        load_or_default!(height);

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.feature_columns.len() != 2 {
            anyhow::bail!(
                "Exactly two feature columns are required, got {:?}",
                self.feature_columns
            );
        }
        if self.model.coefficients.len() != 2 {
            anyhow::bail!(
                "The model needs one coefficient per feature column, got {}",
                self.model.coefficients.len()
            );
        }
        if self.width == 0 || self.height == 0 {
            anyhow::bail!("Figure size must be positive, got {}x{}", self.width, self.height);
        }
        self.evaluation.validate()?;
        Ok(())
    }
}

/// Feature matrix and labels read from a sample table.
#[derive(Debug)]
pub struct Samples {
    pub features: Array2<f64>,
    pub labels: Array1<i32>,
}

pub fn validate_tsv_or_csv_file(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("tsv") | Some("csv") => {}
        _ => anyhow::bail!("File must have a .tsv or .csv extension: {}", path.display()),
    }

    if !path.exists() {
        anyhow::bail!("File does not exist: {}", path.display());
    }

    Ok(())
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn parse_label(value: &str) -> Option<i32> {
    let value = value.trim();
    if let Ok(v) = value.parse::<i32>() {
        return Some(v);
    }
    // Tolerate labels written as floats, e.g. "1.0".
    match value.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v.abs() <= i32::MAX as f64 => Some(v as i32),
        _ => None,
    }
}

/// Read labelled samples from a headed CSV or TSV file.
///
/// The delimiter follows the file extension. Label values are passed
/// through unchanged so the evaluator can reject anything outside `{0, 1}`.
pub fn load_samples<P: AsRef<Path>>(path: P, feature_columns: &[String], label_column: &str) -> Result<Samples> {
    let path = path.as_ref();
    validate_tsv_or_csv_file(path)?;
    let delimiter = match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open sample file: {}", path.display()))?;

    let headers = reader
        .headers()
        .context("Failed to read sample header row")?
        .clone();

    let label_idx = find_column(&headers, label_column)
        .ok_or_else(|| anyhow!("Missing label column '{}'", label_column))?;
    let feature_indices = feature_columns
        .iter()
        .map(|name| find_column(&headers, name).ok_or_else(|| anyhow!("Missing feature column '{}'", name)))
        .collect::<Result<Vec<usize>>>()?;

    let mut features = Vec::new();
    let mut labels = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let raw = record
            .get(label_idx)
            .ok_or_else(|| anyhow!("Missing label value at row {}", row_idx + 1))?;
        let label = parse_label(raw).ok_or_else(|| anyhow!("Invalid label '{}' at row {}", raw, row_idx + 1))?;
        labels.push(label);

        for &idx in &feature_indices {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing feature value at row {}", row_idx + 1))?;
            let parsed = value.trim().parse::<f64>().with_context(|| {
                format!(
                    "Invalid feature '{}' at row {}",
                    headers.get(idx).unwrap_or(""),
                    row_idx + 1
                )
            })?;
            features.push(parsed);
        }
    }

    let n_samples = labels.len();
    let features = Array2::from_shape_vec((n_samples, feature_indices.len()), features)
        .context("Failed to build feature matrix")?;
    log::info!("Loaded {} samples from {}", n_samples, path.display());

    Ok(Samples {
        features,
        labels: Array1::from_vec(labels),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_accept_integral_floats() {
        assert_eq!(parse_label("1"), Some(1));
        assert_eq!(parse_label(" 0.0 "), Some(0));
        assert_eq!(parse_label("2"), Some(2));
        assert_eq!(parse_label("0.5"), None);
        assert_eq!(parse_label("yes"), None);
    }

    #[test]
    fn default_config_is_valid() {
        let cfg = RunConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.output_file, "decision_boundary.svg");
    }

    #[test]
    fn three_feature_columns_are_rejected() {
        let cfg = RunConfig {
            feature_columns: vec!["a".into(), "b".into(), "c".into()],
            ..RunConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
