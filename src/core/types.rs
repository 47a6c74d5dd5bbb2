//! Core type definitions for the sweep

use crate::core::{Dataset, Result, SweepError};
use serde::{Deserialize, Serialize};

/// Prediction result containing the class index and positive-class probability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted class index (0 or 1)
    pub class_index: usize,
    /// Probability of class index 1
    pub probability: f64,
}

impl Prediction {
    /// Create a new prediction
    pub fn new(class_index: usize, probability: f64) -> Self {
        Self {
            class_index,
            probability,
        }
    }

    /// Probability of the predicted class
    pub fn confidence(&self) -> f64 {
        if self.class_index == 1 {
            self.probability
        } else {
            1.0 - self.probability
        }
    }
}

/// One dataset row: dense features and a class index
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// Feature values in column order
    pub features: Vec<f64>,
    /// Index into the dataset's `ClassLabels`
    pub label: usize,
}

impl Sample {
    /// Create a new sample
    pub fn new(features: Vec<f64>, label: usize) -> Self {
        Self { features, label }
    }
}

/// Mapping between class names and class indices
///
/// Names are kept sorted, so index 0 is the lexicographically first class
/// whatever order the names were requested in. Index 1 of a binary problem
/// is the positive class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLabels {
    names: Vec<String>,
}

impl ClassLabels {
    /// Build the mapping from class names, sorting them
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Result<Self> {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() < 2 {
            return Err(SweepError::InvalidParameter(format!(
                "At least two classes are required, got {}",
                names.len()
            )));
        }
        names.sort();
        if let Some(pair) = names.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(SweepError::InvalidParameter(format!(
                "Duplicate class name: {}",
                pair[0]
            )));
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Index of a class name, if known
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Class name for an index
    ///
    /// # Panics
    /// Panics if index >= len()
    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Closed interval used as a plotting bound for one feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Ordered feature name -> range map. The first entry is the x axis,
/// the second the y axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeMap {
    entries: Vec<(String, FeatureRange)>,
}

impl RangeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a feature range, keeping first-insertion order
    pub fn insert(&mut self, name: impl Into<String>, range: FeatureRange) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = range,
            None => self.entries.push((name, range)),
        }
    }

    /// Compute `(min - margin, max + margin)` for every feature over all rows
    pub fn from_dataset<D: Dataset + ?Sized>(dataset: &D, margin: f64) -> Result<Self> {
        if dataset.is_empty() {
            return Err(SweepError::EmptyDataset);
        }
        if !margin.is_finite() || margin < 0.0 {
            return Err(SweepError::InvalidParameter(format!(
                "Range margin must be finite and non-negative, got {margin}"
            )));
        }

        let mut ranges = Self::new();
        for (j, name) in dataset.feature_names().iter().enumerate() {
            let column = dataset.feature_column(j);
            let min = column.iter().fold(f64::INFINITY, |a, &b| a.min(b));
            let max = column.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
            ranges.insert(name.clone(), FeatureRange::new(min - margin, max + margin));
        }
        Ok(ranges)
    }

    pub fn get(&self, name: &str) -> Option<&FeatureRange> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Feature names in map order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureRange)> {
        self.entries.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// The (x, y) entries of a two-feature map
    pub fn axes(&self) -> Result<((&str, FeatureRange), (&str, FeatureRange))> {
        match self.entries.as_slice() {
            [(x_name, x), (y_name, y)] => Ok(((x_name.as_str(), *x), (y_name.as_str(), *y))),
            _ => Err(SweepError::DimensionMismatch {
                expected: 2,
                actual: self.entries.len(),
            }),
        }
    }
}

/// Result of the logistic regression solver
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Coefficients, one per feature
    pub weights: Vec<f64>,
    /// Unpenalized intercept
    pub intercept: f64,
    /// Number of Newton iterations performed
    pub iterations: usize,
    /// Final objective value
    pub objective_value: f64,
    /// Infinity norm of the final gradient
    pub gradient_norm: f64,
}

/// Configuration for the L2-penalized logistic regression solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Inverse regularization strength (smaller is stronger)
    pub c: f64,
    /// Stop when the gradient infinity norm drops below this
    pub tolerance: f64,
    /// Maximum number of Newton iterations
    pub max_iterations: usize,
}

impl SolverConfig {
    /// Check that the configuration can be handed to the solver
    pub fn validate(&self) -> Result<()> {
        if !self.c.is_finite() || self.c <= 0.0 {
            return Err(SweepError::InvalidParameter(format!(
                "C must be finite and positive, got {}",
                self.c
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(SweepError::InvalidParameter(format!(
                "Tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(SweepError::InvalidParameter(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            tolerance: 1e-8,
            max_iterations: 100,
        }
    }
}
