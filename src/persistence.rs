//! Sweep report serialization
//!
//! A finished sweep is written as a JSON report so that the weights and
//! accuracies of a run can be inspected later without refitting.

use crate::boundary::LabelEncoding;
use crate::core::{Result, SweepError};
use crate::report::{WeightRecord, WeightTable};
use crate::sweep::SweepOutcome;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable summary of one sweep run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub metadata: ReportMetadata,
    /// One entry per candidate, in sweep order
    pub candidates: Vec<CandidateSummary>,
}

/// Run settings recorded next to the results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Library version used to produce the report
    pub library_version: String,
    /// RFC 3339 creation timestamp (UTC)
    pub created_at: String,
    pub dataset: String,
    pub classes: Vec<String>,
    pub seed: u64,
    pub test_fraction: f64,
    pub step: f64,
    pub encoding: LabelEncoding,
    pub n_train: usize,
    pub n_test: usize,
}

/// Result of one candidate fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub c: f64,
    pub label: String,
    pub weights: Vec<(String, f64)>,
    pub intercept: f64,
    pub iterations: usize,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
}

/// Settings of a run that are not part of the sweep outcome itself
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub dataset: String,
    pub classes: Vec<String>,
    pub seed: u64,
    pub test_fraction: f64,
    pub step: f64,
    pub encoding: LabelEncoding,
    pub n_train: usize,
    pub n_test: usize,
}

impl SweepReport {
    /// Summarize a sweep outcome, stamped with the current time
    pub fn from_outcome(outcome: &SweepOutcome, settings: RunSettings) -> Self {
        let candidates = outcome
            .fits()
            .iter()
            .map(|fit| CandidateSummary {
                c: fit.c,
                label: fit.label.clone(),
                weights: fit.weights.weights.clone(),
                intercept: fit.model.intercept(),
                iterations: fit.model.classifier().iterations(),
                train_accuracy: fit.train_accuracy,
                test_accuracy: fit.test_accuracy,
            })
            .collect();

        Self {
            metadata: ReportMetadata {
                library_version: crate::VERSION.to_string(),
                created_at: chrono::Utc::now().to_rfc3339(),
                dataset: settings.dataset,
                classes: settings.classes,
                seed: settings.seed,
                test_fraction: settings.test_fraction,
                step: settings.step,
                encoding: settings.encoding,
                n_train: settings.n_train,
                n_test: settings.n_test,
            },
            candidates,
        }
    }

    /// Rebuild the feature x candidate weight table
    pub fn weight_table(&self) -> Result<WeightTable> {
        let records: Vec<WeightRecord> = self
            .candidates
            .iter()
            .map(|c| WeightRecord::new(c.label.clone(), c.c, c.weights.clone()))
            .collect();
        WeightTable::from_records(&records)
    }

    /// Save report to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| SweepError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load report from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| SweepError::SerializationError(e.to_string()))
    }

    /// Print report summary
    pub fn print_summary(&self) {
        let meta = &self.metadata;
        println!("=== Regularization Sweep Report ===");
        println!("Dataset: {}", meta.dataset);
        println!("Classes: {}", meta.classes.join(", "));
        println!(
            "Split: {} train / {} test (test fraction {}, seed {})",
            meta.n_train, meta.n_test, meta.test_fraction, meta.seed
        );
        println!("Grid step: {} ({:?} encoding)", meta.step, meta.encoding);
        println!("Library Version: {}", meta.library_version);
        println!("Created: {}", meta.created_at);
        println!();
        for candidate in &self.candidates {
            println!(
                "{:<10} iterations={:<3} intercept={:>9.4} train_acc={:.3} test_acc={:.3}",
                candidate.label,
                candidate.iterations,
                candidate.intercept,
                candidate.train_accuracy,
                candidate.test_accuracy
            );
        }
        if let Ok(table) = self.weight_table() {
            println!();
            print!("{table}");
        }
    }
}
