//! Numerical utilities for the OOD scorers.
//!
//! This module provides:
//! - [`linalg`]: mean, empirical covariance and checked inversion
//! - [`stats`]: percentiles and isolation-tree path-length normalisation

pub mod linalg;
pub mod stats;

pub use linalg::{empirical_covariance, inverse_covariance, mean_vector};
pub use stats::{average_path_length, percentile};
