//! High-level pipeline API: standard scaling followed by L2 logistic regression
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use regsweep::api::Pipeline;
//! use regsweep::data::{stratified_split, LoadOptions, TabularDataset};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dataset = TabularDataset::from_path(
//!     "datasets/penguins_classification.csv",
//!     &LoadOptions::default(),
//! )?;
//! let (train, test) = stratified_split(&dataset, 0.25, 0)?;
//!
//! let model = Pipeline::new().with_c(0.1).fit(&train)?;
//! println!("Weights: {:?}", model.coefficients());
//! println!("Accuracy: {:.2}%", model.evaluate(&test) * 100.0);
//! # Ok(())
//! # }
//! ```

use crate::core::{ClassLabels, Classifier, Dataset, Prediction, Result, SolverConfig, Transformer};
use crate::linear::{FittedLogisticRegression, LogisticRegression};
use crate::utils::scaling::StandardScaler;
use crate::utils::validation::validate_binary_labels;
use serde::{Deserialize, Serialize};

/// Unfitted scaler + classifier pipeline, built with the builder pattern.
///
/// `fit` borrows the pipeline and returns a new fitted value, so the same
/// description can be fitted repeatedly without carrying state across fits.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    config: SolverConfig,
}

impl Pipeline {
    /// Create a pipeline with default solver parameters (C = 1)
    pub fn new() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Create a pipeline from an explicit solver configuration
    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Set the inverse regularization strength C
    pub fn with_c(mut self, c: f64) -> Self {
        self.config.c = c;
        self
    }

    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Set maximum number of Newton iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Fit the scaler and the classifier on a training dataset.
    ///
    /// Scaling statistics come from `dataset` only.
    pub fn fit<D: Dataset + ?Sized>(&self, dataset: &D) -> Result<FittedPipeline> {
        self.config.validate()?;
        validate_binary_labels(dataset)?;
        let scaler = StandardScaler::fit(dataset)?;
        let scaled = scaler.transform_dataset(dataset);
        let classifier = LogisticRegression::new(self.config.clone()).fit(&scaled)?;
        Ok(FittedPipeline {
            feature_names: dataset.feature_names().to_vec(),
            scaler,
            classifier,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// A fitted pipeline: scaling then logistic regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPipeline {
    feature_names: Vec<String>,
    scaler: StandardScaler,
    classifier: FittedLogisticRegression,
}

impl FittedPipeline {
    /// Learned coefficients in standardized feature space, one per feature
    pub fn coefficients(&self) -> &[f64] {
        self.classifier.weights()
    }

    /// Coefficients paired with their feature names
    pub fn named_coefficients(&self) -> Vec<(String, f64)> {
        self.feature_names
            .iter()
            .cloned()
            .zip(self.coefficients().iter().copied())
            .collect()
    }

    pub fn intercept(&self) -> f64 {
        self.classifier.intercept()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn classifier(&self) -> &FittedLogisticRegression {
        &self.classifier
    }

    /// Predict every sample of a dataset
    pub fn predict_dataset<D: Dataset + ?Sized>(&self, dataset: &D) -> Vec<Prediction> {
        (0..dataset.len())
            .map(|i| self.predict(&dataset.sample(i).features))
            .collect()
    }

    /// Accuracy on a dataset
    pub fn evaluate<D: Dataset + ?Sized>(&self, dataset: &D) -> f64 {
        self.evaluate_detailed(dataset).accuracy()
    }

    /// Confusion counts against the dataset's labels, see [`EvaluationMetrics`]
    pub fn evaluate_detailed<D: Dataset + ?Sized>(&self, dataset: &D) -> EvaluationMetrics {
        let predicted = self.predict_dataset(dataset).into_iter().map(|p| p.class_index);
        EvaluationMetrics::from_predictions(predicted, &dataset.labels())
    }

    /// Get model information
    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            c: self.classifier.c(),
            coefficients: self.named_coefficients(),
            intercept: self.intercept(),
            iterations: self.classifier.iterations(),
            objective_value: self.classifier.objective_value(),
            means: self.scaler.means(),
            scales: self.scaler.scales(),
        }
    }
}

impl Classifier for FittedPipeline {
    fn n_features(&self) -> usize {
        self.scaler.n_features()
    }

    fn predict(&self, row: &[f64]) -> Prediction {
        self.classifier.predict(&self.scaler.transform_row(row))
    }
}

/// Class index counted as "positive" by [`EvaluationMetrics`]
pub const POSITIVE_CLASS: usize = 1;

/// Confusion counts of a binary classifier
///
/// The positive class is [`POSITIVE_CLASS`], i.e. the second name of the
/// dataset's sorted `ClassLabels` (Chinstrap for the Adelie/Chinstrap pair).
/// It is also the class the logistic decision value favours when positive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl EvaluationMetrics {
    /// Tally predicted class indices against actual ones, pairwise
    pub fn from_predictions(predicted: impl IntoIterator<Item = usize>, actual: &[usize]) -> Self {
        let mut metrics = Self::default();
        for (predicted, &actual) in predicted.into_iter().zip(actual) {
            let count = match (predicted == POSITIVE_CLASS, actual == POSITIVE_CLASS) {
                (true, true) => &mut metrics.true_positives,
                (false, false) => &mut metrics.true_negatives,
                (true, false) => &mut metrics.false_positives,
                (false, true) => &mut metrics.false_negatives,
            };
            *count += 1;
        }
        metrics
    }

    /// Name of the class counted as positive
    pub fn positive_class<'a>(&self, classes: &'a ClassLabels) -> &'a str {
        classes.name(POSITIVE_CLASS)
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positives + self.true_negatives, self.total())
    }

    /// Share of predicted positives that are positive
    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    /// Share of actual positives predicted positive
    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    /// Harmonic mean of precision and recall, as `2TP / (2TP + FP + FN)`
    pub fn f1_score(&self) -> f64 {
        ratio(
            2 * self.true_positives,
            2 * self.true_positives + self.false_positives + self.false_negatives,
        )
    }

    /// Share of actual negatives predicted negative
    pub fn specificity(&self) -> f64 {
        ratio(self.true_negatives, self.true_negatives + self.false_positives)
    }
}

/// `num / den`, or 0 for an empty denominator
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Model information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub c: f64,
    pub coefficients: Vec<(String, f64)>,
    pub intercept: f64,
    pub iterations: usize,
    pub objective_value: f64,
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
}

/// Convenience functions for quick operations
pub mod quick {
    use super::*;
    use crate::data::stratified_split;

    /// Split, fit with the given C and return the model with its test accuracy
    pub fn fit_and_score<D: Dataset + ?Sized>(
        dataset: &D,
        c: f64,
        test_fraction: f64,
        seed: u64,
    ) -> Result<(FittedPipeline, f64)> {
        let (train, test) = stratified_split(dataset, test_fraction, seed)?;
        let model = Pipeline::new().with_c(c).fit(&train)?;
        let accuracy = model.evaluate(&test);
        Ok((model, accuracy))
    }
}
