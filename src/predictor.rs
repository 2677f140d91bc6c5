//! Closed-form kinematic trajectory preview.
//!
//! A command is integrated under constant linear and rotational velocity:
//!
//! ```text
//! x(t) = v_lin · cos(orientation) · t
//! y(t) = v_lin · sin(orientation) · t
//! θ(t) = orientation + v_rot · t
//! ```
//!
//! The position uses the initial heading only, so the path is a straight
//! ray while θ turns. No acceleration or dynamic limits are modelled.

use crate::command::Command;
use crate::config::SafeTrajConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A planar pose `(x, y, theta)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[f64; 3]", into = "[f64; 3]"))]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Pose {
    #[must_use]
    pub const fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    #[must_use]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.theta]
    }
}

impl From<[f64; 3]> for Pose {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Pose> for [f64; 3] {
    fn from(p: Pose) -> Self {
        p.to_array()
    }
}

/// Predicted poses at evenly spaced times over `[0, horizon]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Trajectory {
    poses: Vec<Pose>,
}

impl Trajectory {
    /// Poses in time order.
    #[must_use]
    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    /// Number of poses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// True if the trajectory has no poses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// First pose (always at `t = 0`).
    #[must_use]
    pub fn first(&self) -> Option<&Pose> {
        self.poses.first()
    }

    /// Last pose (at `t = horizon`).
    #[must_use]
    pub fn last(&self) -> Option<&Pose> {
        self.poses.last()
    }

    /// Rows of `[x, y, theta]`.
    #[must_use]
    pub fn to_rows(&self) -> Vec<[f64; 3]> {
        self.poses.iter().map(Pose::to_array).collect()
    }

    /// Straight-line distance between first and last pose.
    #[must_use]
    pub fn displacement(&self) -> f64 {
        match (self.first(), self.last()) {
            (Some(a), Some(b)) => (b.x - a.x).hypot(b.y - a.y),
            _ => 0.0,
        }
    }
}

/// Constant-velocity, constant-turn-rate trajectory predictor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPredictor {
    /// Prediction horizon in seconds.
    pub horizon: f64,
    /// Number of poses, including `t = 0`.
    pub num_steps: usize,
}

impl Default for TrajectoryPredictor {
    fn default() -> Self {
        Self {
            horizon: 1.5,
            num_steps: 20,
        }
    }
}

impl TrajectoryPredictor {
    #[must_use]
    pub const fn new(horizon: f64, num_steps: usize) -> Self {
        Self { horizon, num_steps }
    }

    /// Predictor using the horizon and resolution of `config`.
    #[must_use]
    pub const fn from_config(config: &SafeTrajConfig) -> Self {
        Self::new(config.horizon, config.num_steps)
    }

    /// Sample times `t_i = i · horizon / (num_steps - 1)`.
    ///
    /// A single step yields `[0.0]`.
    #[must_use]
    pub fn timestamps(&self) -> Vec<f64> {
        match self.num_steps {
            0 => Vec::new(),
            1 => vec![0.0],
            n => {
                let dt = self.horizon / (n - 1) as f64;
                (0..n).map(|i| i as f64 * dt).collect()
            }
        }
    }

    /// Integrate `command` over the horizon.
    #[must_use]
    pub fn predict(&self, command: &Command) -> Trajectory {
        let (sin_o, cos_o) = command.orientation.sin_cos();
        let vx = command.v_lin * cos_o;
        let vy = command.v_lin * sin_o;

        let poses = self
            .timestamps()
            .into_iter()
            .map(|t| Pose::new(vx * t, vy * t, command.orientation + command.v_rot * t))
            .collect();

        Trajectory { poses }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_stationary_command() {
        let traj = TrajectoryPredictor::default().predict(&Command::new(0.0, 0.0, 0.0));
        assert_eq!(traj.len(), 20);
        for pose in traj.poses() {
            assert_eq!(pose.to_array(), [0.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn test_straight_line_along_x() {
        let traj = TrajectoryPredictor::new(1.5, 20).predict(&Command::new(0.0, 1.0, 0.0));
        let first = traj.first().unwrap();
        let last = traj.last().unwrap();

        assert_eq!(first.to_array(), [0.0, 0.0, 0.0]);
        assert_relative_eq!(last.x, 1.5, epsilon = 1e-12);
        assert_relative_eq!(last.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(last.theta, 0.0, epsilon = 1e-12);
        assert_relative_eq!(traj.displacement(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_heading_and_turn_rate() {
        let traj = TrajectoryPredictor::new(2.0, 5).predict(&Command::new(FRAC_PI_2, 0.5, -0.25));
        let last = traj.last().unwrap();

        assert_relative_eq!(last.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(last.y, 1.0, epsilon = 1e-12);
        assert_relative_eq!(last.theta, FRAC_PI_2 - 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_timestamps() {
        let p = TrajectoryPredictor::new(1.5, 4);
        let ts = p.timestamps();
        assert_eq!(ts.len(), 4);
        assert_relative_eq!(ts[1], 0.5);
        assert_relative_eq!(ts[3], 1.5);

        assert_eq!(TrajectoryPredictor::new(1.5, 1).timestamps(), vec![0.0]);
    }

    #[test]
    fn test_rows_match_poses() {
        let traj = TrajectoryPredictor::new(1.0, 3).predict(&Command::new(0.0, 2.0, 1.0));
        let rows = traj.to_rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], [1.0, 0.0, 0.5]);
    }
}
