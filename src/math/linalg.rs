//! Linear algebra utilities for the Mahalanobis scorer.
//!
//! Covariance estimation and inversion use nalgebra. The inverse is only
//! formed when the covariance is well conditioned.

use nalgebra::{Matrix3, SymmetricEigen, Vector3};

use crate::error::{SafeTrajError, Result};

/// Smallest accepted ratio between the smallest and largest eigenvalue.
pub const MIN_CONDITION_RATIO: f64 = 1e-12;

/// Column means of a set of 3D points.
///
/// # Errors
///
/// Returns an error if `points` is empty.
pub fn mean_vector(points: &[[f64; 3]]) -> Result<Vector3<f64>> {
    if points.is_empty() {
        return Err(SafeTrajError::too_few_samples(1, 0));
    }

    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + Vector3::from(*p));

    Ok(sum / points.len() as f64)
}

/// Maximum-likelihood covariance (normalised by `n`, not `n - 1`).
///
/// # Errors
///
/// Returns an error if `points` is empty.
pub fn empirical_covariance(points: &[[f64; 3]], mean: &Vector3<f64>) -> Result<Matrix3<f64>> {
    if points.is_empty() {
        return Err(SafeTrajError::too_few_samples(1, 0));
    }

    let scatter = points.iter().fold(Matrix3::zeros(), |acc, p| {
        let d = Vector3::from(*p) - mean;
        acc + d * d.transpose()
    });

    Ok(scatter / points.len() as f64)
}

/// Invert a covariance matrix, rejecting singular or ill-conditioned input.
///
/// # Errors
///
/// Returns [`SafeTrajError::DegenerateCovariance`] if the matrix has a
/// non-positive or relatively negligible eigenvalue, or cannot be inverted.
pub fn inverse_covariance(cov: &Matrix3<f64>) -> Result<Matrix3<f64>> {
    if cov.iter().any(|v| !v.is_finite()) {
        return Err(SafeTrajError::degenerate_covariance(
            "covariance contains non-finite values",
        ));
    }

    let eigen = SymmetricEigen::new(*cov);
    let max_ev = eigen.eigenvalues.max();
    let min_ev = eigen.eigenvalues.min();

    if max_ev <= 0.0 {
        return Err(SafeTrajError::degenerate_covariance(
            "covariance has no positive variance",
        ));
    }
    if min_ev / max_ev < MIN_CONDITION_RATIO {
        return Err(SafeTrajError::degenerate_covariance(format!(
            "eigenvalue ratio {:.3e} below {MIN_CONDITION_RATIO:e}",
            min_ev / max_ev
        )));
    }

    cov.try_inverse()
        .ok_or_else(|| SafeTrajError::degenerate_covariance("matrix is not invertible"))
}
