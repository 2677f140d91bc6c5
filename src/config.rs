//! Configuration for the trajectory evaluator.
//!
//! [`SafeTrajConfig`] fixes everything an evaluator needs at construction:
//! the synthetic corpus, the OOD thresholds, the isolation forest and the
//! trajectory resolution. It is never mutated afterwards.
//!
//! # Example
//!
//! ```
//! use safetraj::SafeTrajConfig;
//!
//! let config = SafeTrajConfig::default().with_seed(7).with_num_steps(40);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{SafeTrajError, Result};
use crate::ood::mahalanobis::MIN_SAMPLES;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for [`SafeTrajEvaluator`](crate::SafeTrajEvaluator).
///
/// # Core Parameters
///
/// - `n_train_samples` / `seed`: size and seed of the synthetic corpus.
/// - `maha_thr` / `iso_thr`: label thresholds for the two OOD scores.
/// - `horizon` / `num_steps`: preview length in seconds and pose count.
///
/// When deserialized, missing fields take their default value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SafeTrajConfig {
    // Training data
    /// Number of synthetic commands used to fit both OOD models.
    pub n_train_samples: usize,

    /// Seed for corpus generation.
    pub seed: u64,

    // OOD thresholds
    /// Mahalanobis threshold for the low-risk label.
    /// Scores above `1.7 * maha_thr` are labelled high-risk.
    pub maha_thr: f64,

    /// Isolation forest threshold for the low-risk label.
    /// Scores above `2.0 * iso_thr` are labelled high-risk.
    pub iso_thr: f64,

    /// Expected fraction of the corpus treated as anomalous.
    /// Only used to calibrate the isolation score offset.
    pub contamination: f64,

    // Isolation forest
    /// Number of isolation trees.
    pub n_estimators: usize,

    /// Subsample size per tree (clamped to the corpus size).
    pub max_samples: usize,

    /// Fixed seed for the forest, independent of `seed`.
    pub forest_seed: u64,

    // Trajectory prediction
    /// Prediction horizon in seconds.
    pub horizon: f64,

    /// Number of poses in the predicted trajectory (including `t = 0`).
    pub num_steps: usize,
}

impl Default for SafeTrajConfig {
    fn default() -> Self {
        Self {
            n_train_samples: 800,
            seed: 42,

            maha_thr: 3.0,
            iso_thr: 0.3,
            contamination: 0.05,

            n_estimators: 100,
            max_samples: 256,
            forest_seed: 42,

            horizon: 1.5,
            num_steps: 20,
        }
    }
}

impl SafeTrajConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.n_train_samples < MIN_SAMPLES {
            return Err(SafeTrajError::invalid_config(format!(
                "n_train_samples must be at least {MIN_SAMPLES}, got {}",
                self.n_train_samples
            )));
        }
        if self.num_steps == 0 {
            return Err(SafeTrajError::invalid_config("num_steps must be positive"));
        }
        if !self.horizon.is_finite() || self.horizon < 0.0 {
            return Err(SafeTrajError::invalid_config(
                "horizon must be finite and non-negative",
            ));
        }
        if !(self.maha_thr.is_finite() && self.maha_thr > 0.0) {
            return Err(SafeTrajError::invalid_config("maha_thr must be positive"));
        }
        if !(self.iso_thr.is_finite() && self.iso_thr > 0.0) {
            return Err(SafeTrajError::invalid_config("iso_thr must be positive"));
        }
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(SafeTrajError::invalid_config(
                "contamination must be in (0, 0.5]",
            ));
        }
        if self.n_estimators == 0 {
            return Err(SafeTrajError::invalid_config(
                "n_estimators must be at least 1",
            ));
        }
        if self.max_samples < 2 {
            return Err(SafeTrajError::invalid_config(
                "max_samples must be at least 2",
            ));
        }
        Ok(())
    }

    /// Preset with a smaller corpus and forest for fast start-up.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            n_train_samples: 200,
            n_estimators: 25,
            max_samples: 128,
            ..Self::default()
        }
    }

    /// Set the corpus seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the corpus size.
    #[must_use]
    pub const fn with_n_train_samples(mut self, n: usize) -> Self {
        self.n_train_samples = n;
        self
    }

    /// Set both label thresholds.
    #[must_use]
    pub const fn with_thresholds(mut self, maha_thr: f64, iso_thr: f64) -> Self {
        self.maha_thr = maha_thr;
        self.iso_thr = iso_thr;
        self
    }

    /// Set the isolation forest contamination.
    #[must_use]
    pub const fn with_contamination(mut self, contamination: f64) -> Self {
        self.contamination = contamination;
        self
    }

    /// Set the prediction horizon in seconds.
    #[must_use]
    pub const fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the number of predicted poses.
    #[must_use]
    pub const fn with_num_steps(mut self, num_steps: usize) -> Self {
        self.num_steps = num_steps;
        self
    }
}
