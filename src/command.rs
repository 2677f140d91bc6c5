//! Motion command type and its admissible ranges.

use std::f64::consts::PI;
use std::ops::RangeInclusive;

use crate::error::{SafeTrajError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of components in a command.
pub const COMMAND_DIM: usize = 3;

/// Component names, in vector order.
pub const FEATURE_NAMES: [&str; COMMAND_DIM] = ["orientation", "v_lin", "v_rot"];

/// A single motion command `[orientation, v_lin, v_rot]`.
///
/// Orientation is in radians, linear velocity in m/s and rotational
/// velocity in rad/s. No range checks are applied on construction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "[f64; 3]", into = "[f64; 3]"))]
pub struct Command {
    /// Heading in radians.
    pub orientation: f64,
    /// Linear velocity (m/s).
    pub v_lin: f64,
    /// Rotational velocity (rad/s).
    pub v_rot: f64,
}

impl Command {
    /// Create a command from its components.
    #[must_use]
    pub const fn new(orientation: f64, v_lin: f64, v_rot: f64) -> Self {
        Self {
            orientation,
            v_lin,
            v_rot,
        }
    }

    /// Build a command from a slice, failing if it does not hold exactly
    /// three finite values.
    ///
    /// # Errors
    ///
    /// - [`SafeTrajError::DimensionMismatch`] on any other length.
    /// - [`SafeTrajError::NonFiniteInput`] if a value is NaN or infinite.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let command = match values {
            &[orientation, v_lin, v_rot] => Self::new(orientation, v_lin, v_rot),
            _ => return Err(SafeTrajError::dimension_mismatch(COMMAND_DIM, values.len())),
        };
        command.ensure_finite()?;
        Ok(command)
    }

    /// Components in feature order.
    #[must_use]
    pub const fn to_array(&self) -> [f64; 3] {
        [self.orientation, self.v_lin, self.v_rot]
    }

    /// True if every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }

    /// Fail on the first NaN or infinite component.
    ///
    /// # Errors
    ///
    /// Returns [`SafeTrajError::NonFiniteInput`] naming the component.
    pub fn ensure_finite(&self) -> Result<()> {
        if self.is_finite() {
            return Ok(());
        }
        let (name, value) = FEATURE_NAMES
            .iter()
            .zip(self.to_array())
            .find(|(_, v)| !v.is_finite())
            .map_or(("command", f64::NAN), |(name, v)| (*name, v));
        Err(SafeTrajError::non_finite_input(format!("{name} = {value}")))
    }
}

impl From<[f64; 3]> for Command {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Command> for [f64; 3] {
    fn from(c: Command) -> Self {
        c.to_array()
    }
}

impl TryFrom<&[f64]> for Command {
    type Error = SafeTrajError;

    fn try_from(values: &[f64]) -> Result<Self> {
        Self::from_slice(values)
    }
}

/// Admissible command space, used to sample the training corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandBounds {
    /// Orientation range (rad).
    pub orientation: RangeInclusive<f64>,
    /// Linear velocity range (m/s).
    pub v_lin: RangeInclusive<f64>,
    /// Rotational velocity range (rad/s).
    pub v_rot: RangeInclusive<f64>,
}

impl Default for CommandBounds {
    fn default() -> Self {
        Self {
            orientation: -PI..=PI,
            v_lin: -1.05..=2.88,
            v_rot: -1.99..=1.99,
        }
    }
}

impl CommandBounds {
    /// Ranges in feature order.
    #[must_use]
    pub fn ranges(&self) -> [&RangeInclusive<f64>; 3] {
        [&self.orientation, &self.v_lin, &self.v_rot]
    }

    /// True if every component of `command` lies inside its range.
    #[must_use]
    pub fn contains(&self, command: &Command) -> bool {
        self.ranges()
            .iter()
            .zip(command.to_array())
            .all(|(range, v)| range.contains(&v))
    }

    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> Command {
        let [o, l, r] = self.ranges().map(|range| 0.5 * (range.start() + range.end()));
        Command::new(o, l, r)
    }
}
