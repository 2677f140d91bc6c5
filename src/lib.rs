//! SafeTraj
//!
//! Safety-aware preview of simple motion commands.
//!
//! Given a command `[orientation, v_lin, v_rot]` this crate predicts a short
//! kinematic trajectory, scores how far the command lies from a synthetic
//! training distribution with two OOD models, and fuses both scores into a
//! risk score and label.
//!
//! # Features
//!
//! - **Trajectory preview**: closed-form constant-velocity integration
//! - **Mahalanobis OOD score**: distance to the corpus mean under its covariance
//! - **Isolation forest OOD score**: how quickly random splits isolate the command
//! - **Risk fusion**: fixed `0.6 / 0.4` blend plus a three-way label
//! - **Feature importance**: normalised input magnitudes (a heuristic only)
//!
//! # Quick Start
//!
//! ```
//! use safetraj::{SafeTrajConfig, SafeTrajEvaluator};
//!
//! let evaluator = SafeTrajEvaluator::new(SafeTrajConfig::quick())?;
//! let result = evaluator.evaluate(&[0.5, 1.2, 0.3], false)?;
//!
//! println!("{} ({:.3})", result.risk_label, result.risk_score);
//! # Ok::<(), safetraj::SafeTrajError>(())
//! ```
//!
//! # Risk Labels
//!
//! | Rule | Label |
//! |------|-------|
//! | `maha < maha_thr` and `iso < iso_thr` | `in-distribution & low-risk` |
//! | `maha > 1.7·maha_thr` or `iso > 2·iso_thr` | `high OOD / high-risk` |
//! | otherwise | `borderline / uncertain` |

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod attribution;
pub mod command;
pub mod config;
pub mod data;
pub mod error;
pub mod evaluator;
pub mod math;
pub mod ood;
pub mod predictor;
pub mod report;
pub mod risk;

// Re-exports for convenient access
pub use attribution::{simple_feature_importance, FeatureImportance};
pub use command::{Command, CommandBounds, COMMAND_DIM, FEATURE_NAMES};
pub use config::SafeTrajConfig;
pub use data::generate_training_data;
pub use error::{Result, SafeTrajError};
pub use evaluator::{Evaluation, SafeTrajEvaluator};
pub use ood::{IsolationForestParams, IsolationForestScorer, MahalanobisScorer};
pub use predictor::{Pose, Trajectory, TrajectoryPredictor};
pub use risk::{fuse, RiskAssessment, RiskLabel, RiskThresholds, Severity};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
