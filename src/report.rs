//! Weight records and the feature x candidate comparison table

use crate::core::{Result, SweepError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Learned coefficients of one fitted candidate, keyed by feature name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    /// Column label, e.g. `C: 0.1`
    pub label: String,
    /// Candidate regularization strength
    pub c: f64,
    /// `(feature name, coefficient)` in feature order
    pub weights: Vec<(String, f64)>,
}

impl WeightRecord {
    pub fn new(label: impl Into<String>, c: f64, weights: Vec<(String, f64)>) -> Self {
        Self {
            label: label.into(),
            c,
            weights,
        }
    }

    /// Coefficient of a feature, if present
    pub fn get(&self, feature: &str) -> Option<f64> {
        self.weights
            .iter()
            .find(|(name, _)| name == feature)
            .map(|&(_, w)| w)
    }

    /// L2 norm of the coefficient vector
    pub fn norm(&self) -> f64 {
        self.weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }
}

/// Coefficients of every candidate side by side: rows are features,
/// columns are candidate labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    features: Vec<String>,
    columns: Vec<String>,
    /// `values[feature][column]`
    values: Vec<Vec<f64>>,
}

impl WeightTable {
    /// Concatenate weight records column-wise, in record order
    pub fn from_records(records: &[WeightRecord]) -> Result<Self> {
        let first = records.first().ok_or_else(|| {
            SweepError::InvalidParameter("No weight records to compare".to_string())
        })?;
        let features: Vec<String> = first.weights.iter().map(|(name, _)| name.clone()).collect();

        let mut values = vec![Vec::with_capacity(records.len()); features.len()];
        for record in records {
            let names: Vec<&str> = record.weights.iter().map(|(n, _)| n.as_str()).collect();
            if names != features.iter().map(String::as_str).collect::<Vec<_>>() {
                return Err(SweepError::InvalidDataset(format!(
                    "Weight record {:?} has features {:?}, expected {:?}",
                    record.label, names, features
                )));
            }
            for (row, &(_, w)) in values.iter_mut().zip(&record.weights) {
                row.push(w);
            }
        }

        Ok(Self {
            features,
            columns: records.iter().map(|r| r.label.clone()).collect(),
            values,
        })
    }

    /// `(n_features, n_candidates)`
    pub fn shape(&self) -> (usize, usize) {
        (self.features.len(), self.columns.len())
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Coefficient for a feature under a candidate label
    pub fn get(&self, feature: &str, column: &str) -> Option<f64> {
        let row = self.features.iter().position(|f| f == feature)?;
        let col = self.columns.iter().position(|c| c == column)?;
        Some(self.values[row][col])
    }

    /// All candidates' coefficients for one feature
    pub fn row(&self, index: usize) -> &[f64] {
        &self.values[index]
    }

    /// All features' coefficients for one candidate
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.values.iter().map(|row| row[index]).collect()
    }

    /// Smallest and largest coefficient in the table
    pub fn value_bounds(&self) -> (f64, f64) {
        self.values
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

impl fmt::Display for WeightTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .features
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max("feature".len());
        let col_width = self.columns.iter().map(String::len).max().unwrap_or(0).max(10);

        write!(f, "{:<name_width$}", "feature")?;
        for column in &self.columns {
            write!(f, "  {column:>col_width$}")?;
        }
        writeln!(f)?;
        for (feature, row) in self.features.iter().zip(&self.values) {
            write!(f, "{feature:<name_width$}")?;
            for value in row {
                write!(f, "  {value:>col_width$.4}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
