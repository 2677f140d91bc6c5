//! Per-feature magnitude "importance".
//!
//! `importance_i = |x_i| / (Σ_j |x_j| + ε)`
//!
//! This is a display heuristic showing relative input magnitudes. It is not
//! derived from either OOD model and says nothing about why a command was
//! scored as it was.

use crate::command::{Command, FEATURE_NAMES};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Added to the denominator so the zero command maps to all-zero weights.
pub const IMPORTANCE_EPS: f64 = 1e-6;

/// Normalised magnitude of each command component.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FeatureImportance {
    pub orientation: f64,
    pub v_lin: f64,
    pub v_rot: f64,
}

impl FeatureImportance {
    /// Weights in feature order.
    #[must_use]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.orientation, self.v_lin, self.v_rot]
    }

    /// `(name, weight)` pairs in feature order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.into_iter().zip(self.to_array())
    }

    /// Sum of all weights; close to 1 for any non-zero command.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.to_array().iter().sum()
    }

    /// Name of the largest weight (first one on ties).
    #[must_use]
    pub fn dominant(&self) -> &'static str {
        self.iter()
            .fold(("", f64::NEG_INFINITY), |best, cur| if cur.1 > best.1 { cur } else { best })
            .0
    }
}

/// Compute the magnitude heuristic for `command`.
#[must_use]
pub fn simple_feature_importance(command: &Command) -> FeatureImportance {
    let abs = command.to_array().map(f64::abs);
    let total = abs.iter().sum::<f64>() + IMPORTANCE_EPS;
    let [orientation, v_lin, v_rot] = abs.map(|v| v / total);

    FeatureImportance {
        orientation,
        v_lin,
        v_rot,
    }
}
