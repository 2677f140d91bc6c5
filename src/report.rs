//! Plain-text rendering of evaluation results.
//!
//! Terminal equivalents of the two demo charts: an x–y trajectory plot with
//! equal axis scaling and a feature-importance bar chart on a fixed `[0, 1]`
//! scale.

use std::fmt::Write as _;

use crate::attribution::FeatureImportance;
use crate::evaluator::Evaluation;
use crate::predictor::Trajectory;

const START_MARK: char = 'S';
const END_MARK: char = 'E';
const POSE_MARK: char = 'o';

/// Plot the x–y path of `trajectory` on a `width` × `height` character grid.
///
/// Both axes share one scale so straight paths keep their heading. The
/// first pose is drawn as `S`, the last as `E`.
#[must_use]
pub fn render_trajectory(trajectory: &Trajectory, width: usize, height: usize) -> String {
    let width = width.max(2);
    let height = height.max(2);
    let poses = trajectory.poses();

    if poses.is_empty() {
        return String::from("(empty trajectory)\n");
    }

    let (x_min, x_max) = min_max(poses.iter().map(|p| p.x));
    let (y_min, y_max) = min_max(poses.iter().map(|p| p.y));
    let x_mid = 0.5 * (x_min + x_max);
    let y_mid = 0.5 * (y_min + y_max);
    let span = (x_max - x_min).max(y_max - y_min).max(1e-9);

    let cell = |x: f64, y: f64| -> (usize, usize) {
        let col = ((x - x_mid) / span + 0.5) * (width - 1) as f64;
        let row = (0.5 - (y - y_mid) / span) * (height - 1) as f64;
        (
            (col.round() as usize).min(width - 1),
            (row.round() as usize).min(height - 1),
        )
    };

    let mut grid = vec![vec![' '; width]; height];
    for pose in poses {
        let (c, r) = cell(pose.x, pose.y);
        grid[r][c] = POSE_MARK;
    }
    if let Some(last) = trajectory.last() {
        let (c, r) = cell(last.x, last.y);
        grid[r][c] = END_MARK;
    }
    if let Some(first) = trajectory.first() {
        let (c, r) = cell(first.x, first.y);
        grid[r][c] = START_MARK;
    }

    let mut out = String::new();
    let border = "-".repeat(width);
    let _ = writeln!(out, "+{border}+");
    for row in grid {
        let line: String = row.into_iter().collect();
        let _ = writeln!(out, "|{line}|");
    }
    let _ = writeln!(out, "+{border}+");
    let _ = writeln!(
        out,
        "x: [{x_min:.3}, {x_max:.3}]  y: [{y_min:.3}, {y_max:.3}]"
    );
    out
}

/// Horizontal bar per feature, `width` cells for a weight of 1.
#[must_use]
pub fn render_feature_importance(importance: &FeatureImportance, width: usize) -> String {
    let width = width.max(1);
    let label_width = importance.iter().map(|(n, _)| n.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (name, weight) in importance.iter() {
        let filled = (weight.clamp(0.0, 1.0) * width as f64).round() as usize;
        let bar = "█".repeat(filled) + &"░".repeat(width - filled);
        let _ = writeln!(out, "{name:<label_width$} {bar} {weight:.3}");
    }
    out
}

/// Per-pose table `t, x, y, theta`.
#[must_use]
pub fn render_pose_table(trajectory: &Trajectory, timestamps: &[f64]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>7} {:>9} {:>9} {:>9}", "t", "x", "y", "theta");
    for (pose, t) in trajectory.poses().iter().zip(timestamps) {
        let _ = writeln!(
            out,
            "{t:>7.3} {:>9.4} {:>9.4} {:>9.4}",
            pose.x, pose.y, pose.theta
        );
    }
    out
}

/// Scores and input as a few lines of text, without the label.
#[must_use]
pub fn render_scores(evaluation: &Evaluation) -> String {
    let [o, l, r] = evaluation.input.to_array();
    let mut out = String::new();
    let _ = writeln!(out, "Mahalanobis score: {:.3}", evaluation.mahalanobis_score);
    let _ = writeln!(
        out,
        "Isolation Forest score: {:.3}",
        evaluation.isolation_forest_score
    );
    let _ = writeln!(out, "Combined risk score: {:.3}", evaluation.risk_score);
    let _ = writeln!(out, "Input: orientation={o:.3} v_lin={l:.3} v_rot={r:.3}");
    out
}

/// Label line followed by [`render_scores`].
#[must_use]
pub fn render_summary(evaluation: &Evaluation) -> String {
    format!(
        "Risk label: {}\n{}",
        evaluation.risk_label,
        render_scores(evaluation)
    )
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}
