//! Mahalanobis distance scorer.

use nalgebra::{Matrix3, Vector3};
use tracing::{debug, info};

use crate::command::{Command, COMMAND_DIM};
use crate::error::{SafeTrajError, Result};
use crate::math::linalg::{empirical_covariance, inverse_covariance, mean_vector};

/// Minimum corpus size for a full-rank covariance estimate.
pub const MIN_SAMPLES: usize = COMMAND_DIM + 1;

/// OOD score from the Mahalanobis distance to the training mean.
#[derive(Debug, Clone)]
pub struct MahalanobisScorer {
    mean: Vector3<f64>,
    covariance: Matrix3<f64>,
    precision: Matrix3<f64>,
}

impl MahalanobisScorer {
    /// Fit mean and empirical covariance on `training_data`.
    ///
    /// # Errors
    ///
    /// - [`SafeTrajError::TooFewSamples`] with fewer than [`MIN_SAMPLES`] rows.
    /// - [`SafeTrajError::DegenerateCovariance`] if the covariance is singular
    ///   or too ill-conditioned to invert.
    pub fn fit(training_data: &[[f64; 3]]) -> Result<Self> {
        if training_data.len() < MIN_SAMPLES {
            return Err(SafeTrajError::too_few_samples(
                MIN_SAMPLES,
                training_data.len(),
            ));
        }

        let mean = mean_vector(training_data)?;
        let covariance = empirical_covariance(training_data, &mean)?;
        let precision = inverse_covariance(&covariance)?;

        info!(
            n_samples = training_data.len(),
            mean = ?mean.as_slice(),
            "fitted mahalanobis scorer"
        );

        Ok(Self {
            mean,
            covariance,
            precision,
        })
    }

    /// Square root of `(x - μ)ᵀ Σ⁻¹ (x - μ)`. Non-negative for finite
    /// commands; NaN if any component is not finite.
    #[must_use]
    pub fn score(&self, command: &Command) -> f64 {
        let delta = Vector3::from(command.to_array()) - self.mean;
        let d2 = (delta.transpose() * self.precision * delta)[(0, 0)];
        // Rounding can push d2 a hair below zero at the mean. `clamp` keeps NaN.
        let score = d2.clamp(0.0, f64::INFINITY).sqrt();
        debug!(score, "mahalanobis score");
        score
    }

    /// Fitted mean vector.
    #[must_use]
    pub fn mean(&self) -> [f64; 3] {
        self.mean.into()
    }

    /// Fitted covariance matrix.
    #[must_use]
    pub fn covariance(&self) -> &Matrix3<f64> {
        &self.covariance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_training_data;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_at_mean() {
        let data = generate_training_data(800, 42).unwrap();
        let scorer = MahalanobisScorer::fit(&data).unwrap();
        let at_mean = Command::from(scorer.mean());
        assert_relative_eq!(scorer.score(&at_mean), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_farther_is_larger() {
        let data = generate_training_data(800, 42).unwrap();
        let scorer = MahalanobisScorer::fit(&data).unwrap();

        let near = scorer.score(&Command::new(0.0, 0.9, 0.0));
        let far = scorer.score(&Command::new(0.0, 6.0, 0.0));
        let farther = scorer.score(&Command::new(0.0, 12.0, 0.0));

        assert!(near < 1.0);
        assert!(near < far && far < farther);
    }

    #[test]
    fn test_matches_diagonal_formula() {
        // Axis-aligned corpus: the distance reduces to per-axis z-scores.
        let data = [
            [-1.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, -2.0, 0.0],
            [0.0, 2.0, 0.0],
            [0.0, 0.0, -3.0],
            [0.0, 0.0, 3.0],
        ];
        let scorer = MahalanobisScorer::fit(&data).unwrap();

        // Variances with 1/n normalisation: 2/6, 8/6, 18/6.
        let x = Command::new(1.0, 2.0, 3.0);
        let expected: f64 = (1.0_f64 / (2.0 / 6.0) + 4.0 / (8.0 / 6.0) + 9.0 / (18.0 / 6.0)).sqrt();
        assert_relative_eq!(scorer.score(&x), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_non_finite_command_is_nan() {
        let data = generate_training_data(200, 42).unwrap();
        let scorer = MahalanobisScorer::fit(&data).unwrap();

        assert!(scorer.score(&Command::new(0.0, f64::INFINITY, 0.0)).is_nan());
        assert!(scorer.score(&Command::new(f64::NAN, 1.0, 0.0)).is_nan());
    }

    #[test]
    fn test_too_few_samples() {
        let data = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
        assert_eq!(
            MahalanobisScorer::fit(&data).unwrap_err(),
            SafeTrajError::too_few_samples(4, 2)
        );
    }

    #[test]
    fn test_degenerate_corpus() {
        // All points on a line.
        let data: Vec<[f64; 3]> = (0..10).map(|i| [i as f64, 2.0 * i as f64, 0.0]).collect();
        assert!(matches!(
            MahalanobisScorer::fit(&data),
            Err(SafeTrajError::DegenerateCovariance(_))
        ));
    }
}
