//! CSV dataset loading
//!
//! Reads a comma-separated file with a header row, keeps the rows whose
//! target column holds one of the requested classes and selects the
//! requested numeric feature columns by name.

use crate::core::{ClassLabels, Dataset, Result, Sample, SweepError};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Which columns and classes to pull out of a CSV file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Column holding the class name
    pub target_column: String,
    /// Classes to keep, in the order rows are grouped. Class indices follow
    /// the sorted names, not this order.
    pub classes: Vec<String>,
    /// Numeric feature columns, in feature order
    pub feature_columns: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            target_column: "Species".to_string(),
            classes: vec!["Adelie".to_string(), "Chinstrap".to_string()],
            feature_columns: vec![
                "Culmen Length (mm)".to_string(),
                "Culmen Depth (mm)".to_string(),
            ],
        }
    }
}

/// In-memory dataset of labelled rows
#[derive(Debug, Clone)]
pub struct TabularDataset {
    feature_names: Vec<String>,
    classes: ClassLabels,
    samples: Vec<Sample>,
}

impl TabularDataset {
    /// Load a dataset from a CSV file
    pub fn from_path<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        Self::from_csv(&mut reader, options)
    }

    /// Load a dataset from any reader producing CSV text
    pub fn from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        Self::from_csv(&mut reader, options)
    }

    fn from_csv<R: Read>(reader: &mut csv::Reader<R>, options: &LoadOptions) -> Result<Self> {
        let classes = ClassLabels::new(options.classes.iter().cloned())?;
        if options.feature_columns.is_empty() {
            return Err(SweepError::InvalidParameter(
                "At least one feature column is required".to_string(),
            ));
        }

        let headers = reader.headers()?.clone();
        let column_index = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| SweepError::MissingColumn(name.to_string()))
        };
        let target_index = column_index(&options.target_column)?;
        let feature_indices = options
            .feature_columns
            .iter()
            .map(|name| column_index(name))
            .collect::<Result<Vec<_>>>()?;

        // One bucket per requested class so rows come out grouped in request order
        let mut buckets: Vec<Vec<Sample>> = vec![Vec::new(); options.classes.len()];
        let mut skipped = 0usize;

        for (row, record) in reader.records().enumerate() {
            let record = record?;
            // Header is line 1
            let line = row + 2;
            let label = record.get(target_index).map(str::trim).unwrap_or("");
            let (bucket, class_index) = match options.classes.iter().position(|c| c == label) {
                Some(bucket) => (bucket, classes.index_of(label).unwrap_or(bucket)),
                None => {
                    skipped += 1;
                    continue;
                }
            };

            let features = feature_indices
                .iter()
                .zip(&options.feature_columns)
                .map(|(&col, name)| {
                    let field = record.get(col).map(str::trim).unwrap_or("");
                    field.parse::<f64>().map_err(|_| {
                        SweepError::ParseError(format!(
                            "Invalid value {field:?} for column {name:?} on line {line}"
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            buckets[bucket].push(Sample::new(features, class_index));
        }

        for (name, bucket) in options.classes.iter().zip(&buckets) {
            if bucket.is_empty() {
                return Err(SweepError::MissingClass(name.clone()));
            }
        }

        log::debug!(
            "Loaded {} rows ({} skipped for other classes)",
            buckets.iter().map(Vec::len).sum::<usize>(),
            skipped
        );

        Ok(Self {
            feature_names: options.feature_columns.clone(),
            classes,
            samples: buckets.into_iter().flatten().collect(),
        })
    }

    /// Build a dataset from rows already in memory
    pub fn from_samples(
        feature_names: Vec<String>,
        classes: ClassLabels,
        samples: Vec<Sample>,
    ) -> Result<Self> {
        if samples.is_empty() {
            return Err(SweepError::EmptyDataset);
        }
        for sample in &samples {
            if sample.features.len() != feature_names.len() {
                return Err(SweepError::DimensionMismatch {
                    expected: feature_names.len(),
                    actual: sample.features.len(),
                });
            }
            if sample.label >= classes.len() {
                return Err(SweepError::InvalidDataset(format!(
                    "Class index {} out of range for {} classes",
                    sample.label,
                    classes.len()
                )));
            }
        }
        Ok(Self {
            feature_names,
            classes,
            samples,
        })
    }

    pub fn classes(&self) -> &ClassLabels {
        &self.classes
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

impl Dataset for TabularDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn sample(&self, i: usize) -> &Sample {
        &self.samples[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PENGUINS: &str = "\
Culmen Length (mm),Culmen Depth (mm),Species
39.1,18.7,Adelie
46.5,17.9,Chinstrap
46.1,13.2,Gentoo
39.5,17.4,Adelie
50.0,19.5,Chinstrap
";

    #[test]
    fn test_csv_basic() {
        let dataset =
            TabularDataset::from_reader(Cursor::new(PENGUINS), &LoadOptions::default()).unwrap();

        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.n_features(), 2);
        assert_eq!(
            dataset.feature_names(),
            &["Culmen Length (mm)", "Culmen Depth (mm)"]
        );

        // Adelie rows first, then Chinstrap, original order within a class
        assert_eq!(dataset.labels(), vec![0, 0, 1, 1]);
        assert_eq!(dataset.sample(0).features, vec![39.1, 18.7]);
        assert_eq!(dataset.sample(1).features, vec![39.5, 17.4]);
        assert_eq!(dataset.sample(2).features, vec![46.5, 17.9]);
    }

    #[test]
    fn test_csv_reversed_classes_keep_sorted_indices() {
        let options = LoadOptions {
            classes: vec!["Chinstrap".to_string(), "Adelie".to_string()],
            ..LoadOptions::default()
        };
        let dataset = TabularDataset::from_reader(Cursor::new(PENGUINS), &options).unwrap();

        // Indices follow the sorted names, rows follow the requested order
        assert_eq!(dataset.classes().name(0), "Adelie");
        assert_eq!(dataset.labels(), vec![1, 1, 0, 0]);
        assert_eq!(dataset.sample(0).features, vec![46.5, 17.9]);
        assert_eq!(dataset.sample(2).features, vec![39.1, 18.7]);
    }

    #[test]
    fn test_csv_column_selection() {
        let data = "Island,Culmen Depth (mm),Species,Culmen Length (mm)\n\
                    Torgersen,18.7,Adelie,39.1\n\
                    Dream,17.9,Chinstrap,46.5\n";
        let dataset =
            TabularDataset::from_reader(Cursor::new(data), &LoadOptions::default()).unwrap();
        assert_eq!(dataset.sample(0).features, vec![39.1, 18.7]);
    }

    #[test]
    fn test_csv_missing_column() {
        let data = "Culmen Length (mm),Species\n39.1,Adelie\n46.5,Chinstrap\n";
        let result = TabularDataset::from_reader(Cursor::new(data), &LoadOptions::default());
        match result {
            Err(SweepError::MissingColumn(name)) => assert_eq!(name, "Culmen Depth (mm)"),
            other => panic!("Expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn test_csv_missing_class() {
        let data = "Culmen Length (mm),Culmen Depth (mm),Species\n39.1,18.7,Adelie\n";
        let result = TabularDataset::from_reader(Cursor::new(data), &LoadOptions::default());
        match result {
            Err(SweepError::MissingClass(name)) => assert_eq!(name, "Chinstrap"),
            other => panic!("Expected missing class, got {other:?}"),
        }
    }

    #[test]
    fn test_csv_invalid_value() {
        let data = "Culmen Length (mm),Culmen Depth (mm),Species\n\
                    39.1,abc,Adelie\n46.5,17.9,Chinstrap\n";
        let result = TabularDataset::from_reader(Cursor::new(data), &LoadOptions::default());
        match result {
            Err(SweepError::ParseError(message)) => assert!(message.contains("line 2")),
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let result =
            TabularDataset::from_path("does/not/exist.csv", &LoadOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_from_samples_validation() {
        let classes = ClassLabels::new(["a", "b"]).unwrap();
        let names = vec!["x".to_string(), "y".to_string()];

        let bad_dim = TabularDataset::from_samples(
            names.clone(),
            classes.clone(),
            vec![Sample::new(vec![1.0], 0)],
        );
        assert!(matches!(
            bad_dim,
            Err(SweepError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));

        let bad_label = TabularDataset::from_samples(
            names.clone(),
            classes.clone(),
            vec![Sample::new(vec![1.0, 2.0], 2)],
        );
        assert!(bad_label.is_err());

        let empty = TabularDataset::from_samples(names, classes, vec![]);
        assert!(matches!(empty, Err(SweepError::EmptyDataset)));
    }
}
