//! Experiment configuration
//!
//! Every field has a default, so a JSON file only needs the keys it changes.

use crate::boundary::{LabelEncoding, DEFAULT_PLOT_STEP};
use crate::core::{Result, SolverConfig, SweepError};
use crate::data::{LoadOptions, DEFAULT_TEST_FRACTION};
use crate::sweep::DEFAULT_CANDIDATES;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Margin added on both sides of each feature's observed range
pub const DEFAULT_RANGE_MARGIN: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub dataset: PathBuf,
    pub target_column: String,
    pub classes: Vec<String>,
    pub feature_columns: Vec<String>,
    pub test_fraction: f64,
    pub seed: u64,
    pub candidates: Vec<f64>,
    pub range_margin: f64,
    pub plot_step: f64,
    pub label_encoding: LabelEncoding,
    pub output_dir: PathBuf,
    pub solver: SolverConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        let load = LoadOptions::default();
        Self {
            dataset: PathBuf::from("datasets/penguins_classification.csv"),
            target_column: load.target_column,
            classes: load.classes,
            feature_columns: load.feature_columns,
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: 0,
            candidates: DEFAULT_CANDIDATES.to_vec(),
            range_margin: DEFAULT_RANGE_MARGIN,
            plot_step: DEFAULT_PLOT_STEP,
            label_encoding: LabelEncoding::default(),
            output_dir: PathBuf::from("figures"),
            solver: SolverConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Read a JSON config file; missing keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| SweepError::SerializationError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.classes.len() != 2 {
            return Err(SweepError::InvalidParameter(format!(
                "Exactly two classes are required, got {}",
                self.classes.len()
            )));
        }
        if self.feature_columns.len() != 2 {
            return Err(SweepError::InvalidParameter(format!(
                "Exactly two feature columns are required, got {}",
                self.feature_columns.len()
            )));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(SweepError::InvalidParameter(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if self.candidates.is_empty() {
            return Err(SweepError::InvalidParameter(
                "At least one C candidate is required".to_string(),
            ));
        }
        if !self.range_margin.is_finite() || self.range_margin < 0.0 {
            return Err(SweepError::InvalidParameter(format!(
                "range_margin must be finite and non-negative, got {}",
                self.range_margin
            )));
        }
        if !self.plot_step.is_finite() || self.plot_step <= 0.0 {
            return Err(SweepError::InvalidParameter(format!(
                "plot_step must be finite and positive, got {}",
                self.plot_step
            )));
        }
        Ok(())
    }

    /// Column and class selection for the loader
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            target_column: self.target_column.clone(),
            classes: self.classes.clone(),
            feature_columns: self.feature_columns.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ExperimentConfig::default();
        assert_eq!(config.candidates, vec![0.01, 0.1, 1.0, 10.0]);
        assert_eq!(config.test_fraction, 0.25);
        assert_eq!(config.plot_step, 0.02);
        assert_eq!(config.range_margin, 1.0);
        assert_eq!(config.label_encoding, LabelEncoding::Fixed);
        assert_eq!(config.load_options(), LoadOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"seed": 42, "candidates": [0.5, 5.0], "label_encoding": "per-call"}}"#
        )
        .unwrap();

        let config = ExperimentConfig::from_file(file.path()).unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.candidates, vec![0.5, 5.0]);
        assert_eq!(config.label_encoding, LabelEncoding::PerCall);
        assert_eq!(config.target_column, "Species");
        assert_eq!(config.solver, SolverConfig::default());
    }

    #[test]
    fn test_invalid_file_values_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"test_fraction": 1.5}}"#).unwrap();
        assert!(ExperimentConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_validate_requires_two_features() {
        let config = ExperimentConfig {
            feature_columns: vec!["Culmen Length (mm)".to_string()],
            ..ExperimentConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SweepError::InvalidParameter(_))
        ));
    }
}
