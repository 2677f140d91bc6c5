//! Input-space out-of-distribution scorers.
//!
//! Both scorers are fitted once on the training corpus and are read-only
//! afterwards. Larger scores mean more abnormal input.
//!
//! - [`mahalanobis`]: distance from the corpus mean under its covariance
//! - [`isolation`]: isolation forest, ease of separating a point by random splits

pub mod isolation;
pub mod mahalanobis;

pub use isolation::{IsolationForestParams, IsolationForestScorer};
pub use mahalanobis::MahalanobisScorer;
