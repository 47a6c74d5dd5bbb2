//! Core traits: datasets, transformers and classifiers

use crate::core::{Prediction, Sample};

/// Dataset abstraction over loaded rows and borrowed partitions
pub trait Dataset {
    /// Number of samples in the dataset
    fn len(&self) -> usize;

    /// Number of features per sample
    fn n_features(&self) -> usize {
        self.feature_names().len()
    }

    /// Feature names in column order
    fn feature_names(&self) -> &[String];

    /// Get a single sample by index
    ///
    /// # Panics
    /// Panics if index >= len()
    fn sample(&self, i: usize) -> &Sample;

    /// Class index of every sample, in dataset order
    fn labels(&self) -> Vec<usize> {
        (0..self.len()).map(|i| self.sample(i).label).collect()
    }

    /// All values of one feature column
    fn feature_column(&self, j: usize) -> Vec<f64> {
        (0..self.len()).map(|i| self.sample(i).features[j]).collect()
    }

    /// Check if the dataset is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A fitted, stateless-at-apply-time feature transform
pub trait Transformer {
    /// Transform one feature row
    fn transform_row(&self, row: &[f64]) -> Vec<f64>;

    /// Transform every sample of a dataset, keeping labels
    fn transform_dataset<D: Dataset + ?Sized>(&self, dataset: &D) -> Vec<Sample>
    where
        Self: Sized,
    {
        (0..dataset.len())
            .map(|i| {
                let sample = dataset.sample(i);
                Sample::new(self.transform_row(&sample.features), sample.label)
            })
            .collect()
    }
}

/// A fitted classifier
pub trait Classifier {
    /// Number of features the classifier expects
    fn n_features(&self) -> usize;

    /// Predict a single feature row
    fn predict(&self, row: &[f64]) -> Prediction;

    /// Predict many rows
    fn predict_batch(&self, rows: &[Vec<f64>]) -> Vec<Prediction> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}
