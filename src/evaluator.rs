//! High-level evaluator combining prediction, OOD scoring and risk fusion.
//!
//! # Example
//!
//! ```
//! use safetraj::{SafeTrajConfig, SafeTrajEvaluator};
//!
//! let evaluator = SafeTrajEvaluator::new(SafeTrajConfig::quick())?;
//! let result = evaluator.evaluate(&[0.5, 1.2, 0.3], true)?;
//!
//! assert!(result.trajectory.is_some());
//! println!("{}: {:.3}", result.risk_label, result.risk_score);
//! # Ok::<(), safetraj::SafeTrajError>(())
//! ```

use tracing::{debug, info};

use crate::attribution::{simple_feature_importance, FeatureImportance};
use crate::command::Command;
use crate::config::SafeTrajConfig;
use crate::data::generate_training_data;
use crate::error::Result;
use crate::ood::{IsolationForestParams, IsolationForestScorer, MahalanobisScorer};
use crate::predictor::{Trajectory, TrajectoryPredictor};
use crate::risk::{fuse, RiskLabel, RiskThresholds};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of evaluating one command.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Evaluation {
    /// The evaluated command.
    pub input: Command,
    /// Mahalanobis distance to the training mean.
    pub mahalanobis_score: f64,
    /// Calibrated isolation forest score.
    pub isolation_forest_score: f64,
    /// `0.6 · mahalanobis_score + 0.4 · isolation_forest_score`.
    pub risk_score: f64,
    pub risk_label: RiskLabel,
    pub feature_importance: FeatureImportance,
    /// Present only when requested.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub trajectory: Option<Trajectory>,
}

/// Evaluator owning the fitted OOD models and the trajectory predictor.
///
/// All models are fitted in [`SafeTrajEvaluator::new`]; evaluation only
/// reads them, so a single instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct SafeTrajEvaluator {
    config: SafeTrajConfig,
    predictor: TrajectoryPredictor,
    mahalanobis: MahalanobisScorer,
    isolation: IsolationForestScorer,
    thresholds: RiskThresholds,
}

impl SafeTrajEvaluator {
    /// Generate the training corpus and fit both OOD models.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or either model
    /// cannot be fitted.
    pub fn new(config: SafeTrajConfig) -> Result<Self> {
        config.validate()?;

        let training_data = generate_training_data(config.n_train_samples, config.seed)?;
        let predictor = TrajectoryPredictor::from_config(&config);
        let mahalanobis = MahalanobisScorer::fit(&training_data)?;
        let isolation =
            IsolationForestScorer::fit(&training_data, &IsolationForestParams::from(&config))?;
        let thresholds = RiskThresholds::from(&config);

        info!(
            n_train_samples = config.n_train_samples,
            seed = config.seed,
            horizon = config.horizon,
            num_steps = config.num_steps,
            "evaluator ready"
        );

        Ok(Self {
            config,
            predictor,
            mahalanobis,
            isolation,
            thresholds,
        })
    }

    /// Evaluator with [`SafeTrajConfig::default`].
    ///
    /// # Errors
    ///
    /// See [`SafeTrajEvaluator::new`].
    pub fn with_defaults() -> Result<Self> {
        Self::new(SafeTrajConfig::default())
    }

    /// Evaluate `[orientation, v_lin, v_rot]`.
    ///
    /// The trajectory is always computed; `include_trajectory` only controls
    /// whether it is returned.
    ///
    /// # Errors
    ///
    /// - [`SafeTrajError::DimensionMismatch`](crate::SafeTrajError::DimensionMismatch)
    ///   if `input` does not hold exactly three values.
    /// - [`SafeTrajError::NonFiniteInput`](crate::SafeTrajError::NonFiniteInput)
    ///   if a value is NaN or infinite.
    pub fn evaluate(&self, input: &[f64], include_trajectory: bool) -> Result<Evaluation> {
        let command = Command::from_slice(input)?;
        self.evaluate_command(&command, include_trajectory)
    }

    /// Evaluate a command value.
    ///
    /// # Errors
    ///
    /// Returns [`SafeTrajError::NonFiniteInput`](crate::SafeTrajError::NonFiniteInput)
    /// if a component is NaN or infinite.
    pub fn evaluate_command(
        &self,
        command: &Command,
        include_trajectory: bool,
    ) -> Result<Evaluation> {
        command.ensure_finite()?;

        let trajectory = self.predictor.predict(command);
        let mahalanobis_score = self.mahalanobis.score(command);
        let isolation_forest_score = self.isolation.score(command);
        let feature_importance = simple_feature_importance(command);
        let risk = fuse(mahalanobis_score, isolation_forest_score, &self.thresholds);

        debug!(
            input = ?command.to_array(),
            mahalanobis_score,
            isolation_forest_score,
            risk_score = risk.score,
            label = %risk.label,
            "evaluated command"
        );

        Ok(Evaluation {
            input: *command,
            mahalanobis_score,
            isolation_forest_score,
            risk_score: risk.score,
            risk_label: risk.label,
            feature_importance,
            trajectory: include_trajectory.then_some(trajectory),
        })
    }

    /// Predict only the trajectory for `[orientation, v_lin, v_rot]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `input` does not hold exactly three finite values.
    pub fn get_trajectory(&self, input: &[f64]) -> Result<Trajectory> {
        let command = Command::from_slice(input)?;
        Ok(self.predictor.predict(&command))
    }

    /// Configuration the evaluator was built with.
    #[must_use]
    pub const fn config(&self) -> &SafeTrajConfig {
        &self.config
    }

    /// The fitted Mahalanobis scorer.
    #[must_use]
    pub const fn mahalanobis(&self) -> &MahalanobisScorer {
        &self.mahalanobis
    }

    /// The fitted isolation forest scorer.
    #[must_use]
    pub const fn isolation_forest(&self) -> &IsolationForestScorer {
        &self.isolation
    }
}
