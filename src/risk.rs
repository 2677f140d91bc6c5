//! Risk fusion of the two OOD scores.
//!
//! The risk score is a fixed linear blend, `0.6 · maha + 0.4 · iso`. The
//! label is a hand-written rule over the raw scores, checked in order:
//!
//! 1. both scores under their thresholds → low risk
//! 2. either score far over its threshold → high risk
//! 3. otherwise → borderline

use std::fmt;

use crate::config::SafeTrajConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Weight of the Mahalanobis score in the fused risk.
pub const MAHALANOBIS_WEIGHT: f64 = 0.6;

/// Weight of the isolation forest score in the fused risk.
pub const ISOLATION_WEIGHT: f64 = 0.4;

/// Factor on `maha_thr` above which a command is high risk.
pub const MAHALANOBIS_HIGH_FACTOR: f64 = 1.7;

/// Factor on `iso_thr` above which a command is high risk.
pub const ISOLATION_HIGH_FACTOR: f64 = 2.0;

/// Discrete risk label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RiskLabel {
    #[cfg_attr(feature = "serde", serde(rename = "in-distribution & low-risk"))]
    LowRisk,
    #[cfg_attr(feature = "serde", serde(rename = "borderline / uncertain"))]
    Borderline,
    #[cfg_attr(feature = "serde", serde(rename = "high OOD / high-risk"))]
    HighRisk,
}

impl RiskLabel {
    /// Display string of the label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LowRisk => "in-distribution & low-risk",
            Self::Borderline => "borderline / uncertain",
            Self::HighRisk => "high OOD / high-risk",
        }
    }

    /// Presentation severity of this label.
    #[must_use]
    pub fn severity(&self) -> Severity {
        Severity::from_label(self.as_str())
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Styling hint for a label: error, warning or success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Classify any label string by substring.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label.contains("high-risk") {
            Self::Error
        } else if label.contains("borderline") {
            Self::Warning
        } else {
            Self::Success
        }
    }
}

/// Thresholds for [`fuse`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    pub maha_thr: f64,
    pub iso_thr: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            maha_thr: 3.0,
            iso_thr: 0.3,
        }
    }
}

impl From<&SafeTrajConfig> for RiskThresholds {
    fn from(config: &SafeTrajConfig) -> Self {
        Self {
            maha_thr: config.maha_thr,
            iso_thr: config.iso_thr,
        }
    }
}

/// Fused risk score and its label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskAssessment {
    pub score: f64,
    pub label: RiskLabel,
}

/// Linear blend of the two scores.
#[must_use]
pub fn risk_score(maha_score: f64, iso_score: f64) -> f64 {
    MAHALANOBIS_WEIGHT * maha_score + ISOLATION_WEIGHT * iso_score
}

/// Label from the raw scores; see the module docs for the rule order.
#[must_use]
pub fn risk_label(maha_score: f64, iso_score: f64, thresholds: &RiskThresholds) -> RiskLabel {
    if maha_score < thresholds.maha_thr && iso_score < thresholds.iso_thr {
        return RiskLabel::LowRisk;
    }

    if maha_score > thresholds.maha_thr * MAHALANOBIS_HIGH_FACTOR
        || iso_score > thresholds.iso_thr * ISOLATION_HIGH_FACTOR
    {
        return RiskLabel::HighRisk;
    }

    RiskLabel::Borderline
}

/// Fuse both OOD scores into a risk score and label.
#[must_use]
pub fn fuse(maha_score: f64, iso_score: f64, thresholds: &RiskThresholds) -> RiskAssessment {
    RiskAssessment {
        score: risk_score(maha_score, iso_score),
        label: risk_label(maha_score, iso_score, thresholds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_score_weights() {
        assert_relative_eq!(risk_score(1.0, 0.0), 0.6);
        assert_relative_eq!(risk_score(0.0, 1.0), 0.4);
        assert_relative_eq!(risk_score(2.5, -0.1), 1.46, epsilon = 1e-12);
    }

    #[test]
    fn test_label_rules() {
        let t = RiskThresholds::default();
        assert_eq!(risk_label(1.0, 0.0, &t), RiskLabel::LowRisk);
        assert_eq!(risk_label(3.5, 0.0, &t), RiskLabel::Borderline);
        assert_eq!(risk_label(1.0, 0.4, &t), RiskLabel::Borderline);
        assert_eq!(risk_label(5.2, 0.0, &t), RiskLabel::HighRisk);
        assert_eq!(risk_label(1.0, 0.7, &t), RiskLabel::HighRisk);
        // Exactly on a threshold is not "under" it.
        assert_eq!(risk_label(3.0, 0.0, &t), RiskLabel::Borderline);
    }

    #[test]
    fn test_label_monotone_in_maha() {
        let t = RiskThresholds::default();
        let mut last = RiskLabel::LowRisk;
        let rank = |l: RiskLabel| match l {
            RiskLabel::LowRisk => 0,
            RiskLabel::Borderline => 1,
            RiskLabel::HighRisk => 2,
        };

        for i in 0..=120 {
            let maha = f64::from(i) * 0.05;
            let label = risk_label(maha, 0.1, &t);
            assert!(rank(label) >= rank(last), "label went back at maha={maha}");
            last = label;
        }
        assert_eq!(last, RiskLabel::HighRisk);
    }

    #[test]
    fn test_fuse() {
        let a = fuse(4.0, 0.2, &RiskThresholds::default());
        assert_relative_eq!(a.score, 2.48, epsilon = 1e-12);
        assert_eq!(a.label, RiskLabel::Borderline);
    }

    #[test]
    fn test_severity() {
        assert_eq!(RiskLabel::HighRisk.severity(), Severity::Error);
        assert_eq!(RiskLabel::Borderline.severity(), Severity::Warning);
        assert_eq!(RiskLabel::LowRisk.severity(), Severity::Success);
        assert_eq!(Severity::from_label("anything else"), Severity::Success);
    }

    #[test]
    fn test_display() {
        assert_eq!(RiskLabel::LowRisk.to_string(), "in-distribution & low-risk");
        assert_eq!(RiskLabel::HighRisk.to_string(), "high OOD / high-risk");
    }
}
