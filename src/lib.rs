//! How the L2 regularization strength of a logistic regression changes its
//! decision boundary and its weights
//!
//! A two-class, two-feature tabular dataset is split with stratification,
//! a standard scaler + logistic regression pipeline is fitted for every
//! candidate `C`, and the resulting decision regions and coefficients are
//! compared side by side.

pub mod api;
pub mod boundary;
pub mod config;
pub mod core;
pub mod data;
pub mod linear;
pub mod persistence;
pub mod plot;
pub mod report;
pub mod solver;
pub mod sweep;
pub mod utils;

// Re-export main types for convenience
pub use crate::api::{EvaluationMetrics, FittedPipeline, ModelInfo, Pipeline};
pub use crate::boundary::{evaluate_decision_surface, DecisionSurface, LabelEncoding};
pub use crate::config::ExperimentConfig;
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::{stratified_split, LoadOptions, Partition, TabularDataset};
pub use crate::linear::{FittedLogisticRegression, LogisticRegression};
pub use crate::persistence::SweepReport;
pub use crate::plot::{plot_decision_boundary, BoundaryTarget};
pub use crate::report::{WeightRecord, WeightTable};
pub use crate::sweep::{CandidateFit, RegularizationSweep, SweepOutcome};
pub use crate::utils::scaling::StandardScaler;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
