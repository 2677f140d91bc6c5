//! Isolation forest scorer.
//!
//! Each tree recursively splits a random subsample of the corpus on a random
//! feature at a random threshold. Points that end up isolated after only a
//! few splits are anomalous. The raw anomaly score is
//!
//! ```text
//! s(x) = 2^(-E[h(x)] / c(ψ))
//! ```
//!
//! where `h(x)` is the path length in one tree and `c(ψ)` the average path
//! length for a subsample of size `ψ`. The returned score subtracts the
//! `(1 - contamination)` quantile of the training scores, so positive values
//! lie outside the expected inlier mass.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::command::{Command, COMMAND_DIM};
use crate::config::SafeTrajConfig;
use crate::error::{SafeTrajError, Result};
use crate::math::stats::{average_path_length, percentile};

/// Parameters for fitting an [`IsolationForestScorer`].
#[derive(Debug, Clone, PartialEq)]
pub struct IsolationForestParams {
    /// Number of trees.
    pub n_estimators: usize,
    /// Subsample size per tree, clamped to the corpus size.
    pub max_samples: usize,
    /// Expected anomalous fraction of the corpus, in `(0, 0.5]`.
    pub contamination: f64,
    /// Seed for subsampling and split selection.
    pub seed: u64,
}

impl Default for IsolationForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_samples: 256,
            contamination: 0.05,
            seed: 42,
        }
    }
}

impl From<&SafeTrajConfig> for IsolationForestParams {
    fn from(config: &SafeTrajConfig) -> Self {
        Self {
            n_estimators: config.n_estimators,
            max_samples: config.max_samples,
            contamination: config.contamination,
            seed: config.forest_seed,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        size: usize,
    },
}

/// One isolation tree stored as a flat node arena; node 0 is the root.
#[derive(Debug, Clone)]
struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    fn build(data: &[[f64; 3]], indices: Vec<usize>, max_depth: usize, rng: &mut StdRng) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow(data, indices, 0, max_depth, rng);
        tree
    }

    fn grow(
        &mut self,
        data: &[[f64; 3]],
        indices: Vec<usize>,
        depth: usize,
        max_depth: usize,
        rng: &mut StdRng,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            size: indices.len(),
        });

        if depth >= max_depth || indices.len() <= 1 {
            return id;
        }

        // Only features that still vary inside this node can split it.
        let candidates: Vec<(usize, f64, f64)> = (0..COMMAND_DIM)
            .filter_map(|f| {
                let (lo, hi) = indices
                    .iter()
                    .map(|&i| data[i][f])
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                        (lo.min(v), hi.max(v))
                    });
                (hi > lo).then_some((f, lo, hi))
            })
            .collect();

        if candidates.is_empty() {
            return id;
        }

        let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
        let threshold = rng.gen_range(lo..hi);
        let (left, right): (Vec<usize>, Vec<usize>) =
            indices.iter().partition(|&&i| data[i][feature] <= threshold);

        let left = self.grow(data, left, depth + 1, max_depth, rng);
        let right = self.grow(data, right, depth + 1, max_depth, rng);
        self.nodes[id] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        id
    }

    /// Depth of the leaf reached by `x`, plus the expected remaining depth
    /// for the points left unseparated in that leaf.
    fn path_length(&self, x: &[f64; 3]) -> f64 {
        let mut node = 0;
        let mut depth = 0usize;
        loop {
            match self.nodes[node] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[feature] <= threshold { left } else { right };
                    depth += 1;
                }
                Node::Leaf { size } => return depth as f64 + average_path_length(size),
            }
        }
    }
}

/// OOD score from an isolation forest; higher means more anomalous.
#[derive(Debug, Clone)]
pub struct IsolationForestScorer {
    trees: Vec<IsolationTree>,
    subsample_size: usize,
    offset: f64,
}

impl IsolationForestScorer {
    /// Fit the forest and calibrate the score offset on `training_data`.
    ///
    /// # Errors
    ///
    /// - [`SafeTrajError::TooFewSamples`] with fewer than two rows.
    /// - [`SafeTrajError::InvalidConfig`] for zero trees, a subsample size
    ///   below two, or contamination outside `(0, 0.5]`.
    pub fn fit(training_data: &[[f64; 3]], params: &IsolationForestParams) -> Result<Self> {
        if training_data.len() < 2 {
            return Err(SafeTrajError::too_few_samples(2, training_data.len()));
        }
        if params.n_estimators == 0 {
            return Err(SafeTrajError::invalid_config("n_estimators must be at least 1"));
        }
        if params.max_samples < 2 {
            return Err(SafeTrajError::invalid_config("max_samples must be at least 2"));
        }
        if !(params.contamination > 0.0 && params.contamination <= 0.5) {
            return Err(SafeTrajError::invalid_config(
                "contamination must be in (0, 0.5]",
            ));
        }

        let n = training_data.len();
        let subsample_size = params.max_samples.min(n);
        let max_depth = (subsample_size as f64).log2().ceil() as usize;

        let mut rng = StdRng::seed_from_u64(params.seed);
        let trees = (0..params.n_estimators)
            .map(|_| {
                let indices = index::sample(&mut rng, n, subsample_size).into_vec();
                IsolationTree::build(training_data, indices, max_depth, &mut rng)
            })
            .collect();

        let mut scorer = Self {
            trees,
            subsample_size,
            offset: 0.0,
        };

        let train_scores: Vec<f64> = training_data
            .iter()
            .map(|row| scorer.raw_score(row))
            .collect();
        scorer.offset = percentile(&train_scores, 100.0 * (1.0 - params.contamination))
            .ok_or_else(|| SafeTrajError::too_few_samples(2, 0))?;

        info!(
            n_estimators = params.n_estimators,
            subsample_size,
            max_depth,
            offset = scorer.offset,
            "fitted isolation forest"
        );

        Ok(scorer)
    }

    /// Calibrated score `s(x) - offset`; positive means more anomalous than
    /// the contamination quantile of the corpus.
    #[must_use]
    pub fn score(&self, command: &Command) -> f64 {
        let score = self.raw_score(&command.to_array()) - self.offset;
        debug!(score, "isolation forest score");
        score
    }

    /// Uncalibrated anomaly score `s(x) ∈ (0, 1]`.
    #[must_use]
    pub fn anomaly_score(&self, command: &Command) -> f64 {
        self.raw_score(&command.to_array())
    }

    /// Threshold subtracted from the raw score.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Number of trees in the forest.
    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    fn raw_score(&self, x: &[f64; 3]) -> f64 {
        let mean_depth = self.trees.iter().map(|t| t.path_length(x)).sum::<f64>()
            / self.trees.len() as f64;
        2f64.powf(-mean_depth / average_path_length(self.subsample_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_training_data;

    fn fitted() -> (Vec<[f64; 3]>, IsolationForestScorer) {
        let data = generate_training_data(800, 42).unwrap();
        let scorer = IsolationForestScorer::fit(&data, &IsolationForestParams::default()).unwrap();
        (data, scorer)
    }

    #[test]
    fn test_outlier_scores_higher() {
        let (_, scorer) = fitted();
        let inlier = scorer.score(&Command::new(0.0, 0.9, 0.0));
        let outlier = scorer.score(&Command::new(3.0, 8.0, 5.0));

        assert!(outlier > inlier);
        assert!(outlier > 0.0);
        assert!(scorer.anomaly_score(&Command::new(3.0, 8.0, 5.0)) <= 1.0);
    }

    #[test]
    fn test_same_seed_same_scores() {
        let (data, a) = fitted();
        let b = IsolationForestScorer::fit(&data, &IsolationForestParams::default()).unwrap();

        for x in [[0.5, 1.2, 0.3], [-2.0, -1.0, 1.5], [0.0, 4.0, 0.0]] {
            let c = Command::from(x);
            assert_eq!(a.score(&c), b.score(&c));
        }
        assert_eq!(a.offset(), b.offset());
    }

    #[test]
    fn test_contamination_calibration() {
        let (data, scorer) = fitted();
        let flagged = data
            .iter()
            .filter(|row| scorer.score(&Command::from(**row)) > 0.0)
            .count();

        // At most the contamination share of the corpus lies above the offset.
        assert!(flagged <= 40, "flagged {flagged} of {}", data.len());
        assert!(flagged > 0);
    }

    #[test]
    fn test_small_corpus_clamps_subsample() {
        let data = generate_training_data(50, 1).unwrap();
        let scorer = IsolationForestScorer::fit(&data, &IsolationForestParams::default()).unwrap();
        assert_eq!(scorer.subsample_size, 50);
        assert_eq!(scorer.n_trees(), 100);
    }

    #[test]
    fn test_identical_points_make_single_leaf() {
        let data = vec![[1.0, 1.0, 1.0]; 8];
        let params = IsolationForestParams {
            n_estimators: 3,
            ..IsolationForestParams::default()
        };
        let scorer = IsolationForestScorer::fit(&data, &params).unwrap();
        assert!(scorer.trees.iter().all(|t| t.nodes.len() == 1));
        assert!(scorer.score(&Command::new(1.0, 1.0, 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_params() {
        let data = generate_training_data(20, 0).unwrap();

        let params = IsolationForestParams {
            contamination: 0.0,
            ..IsolationForestParams::default()
        };
        assert!(IsolationForestScorer::fit(&data, &params).is_err());

        let params = IsolationForestParams {
            n_estimators: 0,
            ..IsolationForestParams::default()
        };
        assert!(IsolationForestScorer::fit(&data, &params).is_err());

        assert!(IsolationForestScorer::fit(&data[..1], &IsolationForestParams::default()).is_err());
    }
}
