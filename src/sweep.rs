//! Regularization sweep
//!
//! Fits one fresh pipeline per candidate C, evaluates its decision surface
//! and records its weights. Nothing fitted is shared between candidates.

use crate::api::{FittedPipeline, Pipeline};
use crate::boundary::{evaluate_decision_surface, DecisionSurface, LabelEncoding};
use crate::core::{Dataset, RangeMap, Result, SolverConfig, SweepError};
use crate::report::{WeightRecord, WeightTable};

/// The candidates explored by default
pub const DEFAULT_CANDIDATES: [f64; 4] = [0.01, 0.1, 1.0, 10.0];

/// Column label used for a candidate, e.g. `C: 0.01` or `C: 10`
pub fn candidate_label(c: f64) -> String {
    format!("C: {c}")
}

/// Everything produced for one candidate
#[derive(Debug, Clone)]
pub struct CandidateFit {
    pub c: f64,
    pub label: String,
    pub model: FittedPipeline,
    pub surface: DecisionSurface,
    pub weights: WeightRecord,
    pub train_accuracy: f64,
    pub test_accuracy: f64,
}

/// Ordered results of a sweep, one entry per candidate
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    fits: Vec<CandidateFit>,
}

impl SweepOutcome {
    pub fn fits(&self) -> &[CandidateFit] {
        &self.fits
    }

    pub fn len(&self) -> usize {
        self.fits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fits.is_empty()
    }

    /// Weight records in candidate order
    pub fn weight_records(&self) -> Vec<WeightRecord> {
        self.fits.iter().map(|fit| fit.weights.clone()).collect()
    }

    /// Feature x candidate coefficient table
    pub fn weight_table(&self) -> Result<WeightTable> {
        WeightTable::from_records(&self.weight_records())
    }
}

/// A sweep over an ordered list of C candidates
#[derive(Debug, Clone)]
pub struct RegularizationSweep {
    candidates: Vec<f64>,
    base: SolverConfig,
}

impl RegularizationSweep {
    /// Create a sweep; every candidate must be finite and positive
    pub fn new(candidates: Vec<f64>, base: SolverConfig) -> Result<Self> {
        if candidates.is_empty() {
            return Err(SweepError::InvalidParameter(
                "At least one C candidate is required".to_string(),
            ));
        }
        if let Some(bad) = candidates.iter().find(|c| !c.is_finite() || **c <= 0.0) {
            return Err(SweepError::InvalidParameter(format!(
                "C candidates must be finite and positive, got {bad}"
            )));
        }
        Ok(Self { candidates, base })
    }

    pub fn candidates(&self) -> &[f64] {
        &self.candidates
    }

    /// Fit every candidate on `train`, score it on `train` and `test` and
    /// evaluate its decision surface over `ranges`. The first fit error
    /// aborts the sweep.
    pub fn run<Tr, Te>(
        &self,
        train: &Tr,
        test: &Te,
        ranges: &RangeMap,
        step: f64,
        encoding: LabelEncoding,
    ) -> Result<SweepOutcome>
    where
        Tr: Dataset + ?Sized,
        Te: Dataset + ?Sized,
    {
        let mut fits = Vec::with_capacity(self.candidates.len());

        for &c in &self.candidates {
            let pipeline = Pipeline::with_config(SolverConfig {
                c,
                ..self.base.clone()
            });
            let model = pipeline.fit(train)?;
            let surface = evaluate_decision_surface(&model, ranges, step, encoding)?;

            let label = candidate_label(c);
            let weights = WeightRecord::new(label.clone(), c, model.named_coefficients());
            let train_accuracy = model.evaluate(train);
            let test_accuracy = model.evaluate(test);

            log::info!(
                "{label}: weights={:?} intercept={:.4} iterations={} train_acc={:.3} test_acc={:.3}",
                model.coefficients(),
                model.intercept(),
                model.classifier().iterations(),
                train_accuracy,
                test_accuracy
            );
            if surface.is_uniform() {
                log::warn!("{label}: classifier predicts a single class over the whole grid");
            }

            fits.push(CandidateFit {
                c,
                label,
                model,
                surface,
                weights,
                train_accuracy,
                test_accuracy,
            });
        }

        Ok(SweepOutcome { fits })
    }
}
