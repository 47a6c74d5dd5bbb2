//! Solver for L2-penalized logistic regression
//!
//! This module implements a damped Newton method (penalized iteratively
//! reweighted least squares). The Newton system is built with `ndarray` and
//! factorized with `faer`.

pub mod newton;

pub use self::newton::*;
