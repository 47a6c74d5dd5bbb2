//! Utility functions for preprocessing and dataset checks

use crate::core::{Dataset, Result, SweepError};

/// Feature scaling utilities
pub mod scaling {
    use super::*;
    use crate::core::Transformer;
    use serde::{Deserialize, Serialize};

    /// Statistics for a single feature
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct FeatureStats {
        pub mean: f64,
        /// Divisor applied after centering (population std, 1 for constant features)
        pub scale: f64,
    }

    /// Standard (Z-score) scaler: `(x - mean) / std`
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct StandardScaler {
        pub feature_stats: Vec<FeatureStats>,
    }

    impl StandardScaler {
        /// Compute per-feature mean and population standard deviation
        pub fn fit<D: Dataset + ?Sized>(dataset: &D) -> Result<Self> {
            if dataset.is_empty() {
                return Err(SweepError::EmptyDataset);
            }

            let n = dataset.len() as f64;
            let feature_stats = (0..dataset.n_features())
                .map(|j| {
                    let values = dataset.feature_column(j);
                    let mean = values.iter().sum::<f64>() / n;
                    let variance = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / n;
                    let std = variance.sqrt();
                    let scale = if std < 1e-12 {
                        log::warn!("Feature {j} is constant; leaving it unscaled");
                        1.0
                    } else {
                        std
                    };
                    FeatureStats { mean, scale }
                })
                .collect();

            Ok(Self { feature_stats })
        }

        pub fn n_features(&self) -> usize {
            self.feature_stats.len()
        }

        pub fn means(&self) -> Vec<f64> {
            self.feature_stats.iter().map(|s| s.mean).collect()
        }

        pub fn scales(&self) -> Vec<f64> {
            self.feature_stats.iter().map(|s| s.scale).collect()
        }
    }

    impl Transformer for StandardScaler {
        fn transform_row(&self, row: &[f64]) -> Vec<f64> {
            row.iter()
                .zip(&self.feature_stats)
                .map(|(&x, stats)| (x - stats.mean) / stats.scale)
                .collect()
        }
    }
}

/// Validation and dataset summary utilities
pub mod validation {
    use super::*;

    /// Number of rows per class index
    pub fn class_counts<D: Dataset + ?Sized>(dataset: &D, n_classes: usize) -> Vec<usize> {
        let mut counts = vec![0; n_classes];
        for label in dataset.labels() {
            if label < n_classes {
                counts[label] += 1;
            }
        }
        counts
    }

    /// Share of rows per class index
    pub fn class_proportions<D: Dataset + ?Sized>(dataset: &D, n_classes: usize) -> Vec<f64> {
        let n = dataset.len();
        class_counts(dataset, n_classes)
            .into_iter()
            .map(|c| if n == 0 { 0.0 } else { c as f64 / n as f64 })
            .collect()
    }

    /// Require labels for exactly two classes, both present
    pub fn validate_binary_labels<D: Dataset + ?Sized>(dataset: &D) -> Result<()> {
        let mut seen = [false; 2];
        for (i, label) in dataset.labels().into_iter().enumerate() {
            if label > 1 {
                return Err(SweepError::InvalidDataset(format!(
                    "Invalid class index {label} at row {i}: labels must be 0 or 1"
                )));
            }
            seen[label] = true;
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(SweepError::InvalidDataset(format!(
                "Training data has no rows of class index {missing}"
            )));
        }
        Ok(())
    }

    /// Ratio of class 1 rows to class 0 rows
    pub fn check_label_balance<D: Dataset + ?Sized>(dataset: &D) -> (usize, usize, f64) {
        let counts = class_counts(dataset, 2);
        let (negative_count, positive_count) = (counts[0], counts[1]);
        let balance_ratio = if negative_count == 0 {
            f64::INFINITY
        } else {
            positive_count as f64 / negative_count as f64
        };
        (positive_count, negative_count, balance_ratio)
    }
}
