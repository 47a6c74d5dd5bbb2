//! L2-penalized logistic regression
//!
//! This module ties the Newton solver to a fitted model that implements
//! `Classifier`. Inputs are expected to be preprocessed already; the
//! `api::Pipeline` puts a standard scaler in front of it.

use crate::core::{Classifier, OptimizationResult, Prediction, Result, Sample, SolverConfig};
use crate::solver::{sigmoid, NewtonSolver};
use serde::{Deserialize, Serialize};

/// Unfitted logistic regression estimator
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegression {
    config: SolverConfig,
}

impl LogisticRegression {
    /// Create an estimator with the given solver configuration
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Fit on a slice of samples with class indices 0 and 1
    pub fn fit(&self, samples: &[Sample]) -> Result<FittedLogisticRegression> {
        let solver = NewtonSolver::new(self.config.clone());
        let result = solver.solve(samples)?;
        Ok(FittedLogisticRegression::new(self.config.c, result))
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

/// A fitted logistic regression model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedLogisticRegression {
    c: f64,
    weights: Vec<f64>,
    intercept: f64,
    iterations: usize,
    objective_value: f64,
}

impl FittedLogisticRegression {
    pub(crate) fn new(c: f64, result: OptimizationResult) -> Self {
        Self {
            c,
            weights: result.weights,
            intercept: result.intercept,
            iterations: result.iterations,
            objective_value: result.objective_value,
        }
    }

    /// Raw decision value `w . x + b`
    pub fn decision_function(&self, row: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(row)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }

    /// Coefficients, one per feature
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Inverse regularization strength the model was fitted with
    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }
}

impl Classifier for FittedLogisticRegression {
    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn predict(&self, row: &[f64]) -> Prediction {
        let decision_value = self.decision_function(row);
        // A point exactly on the boundary goes to class 0
        let class_index = usize::from(decision_value > 0.0);
        Prediction::new(class_index, sigmoid(decision_value))
    }
}
