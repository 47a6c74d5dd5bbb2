//! Data loading and train/test partitioning
//!
//! This module provides the CSV-backed dataset and the stratified splitter
//! that produces borrowed train/test partitions.

pub mod csv;
pub mod split;

pub use self::csv::*;
pub use self::split::*;
