//! Synthetic training corpus.
//!
//! Both OOD scorers are fitted on commands sampled uniformly from the
//! admissible command box. The same seed always yields the same corpus.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::command::CommandBounds;
use crate::error::{SafeTrajError, Result};

/// Generate `n_samples` commands uniformly from the default [`CommandBounds`].
///
/// Each row is `[orientation, v_lin, v_rot]`.
///
/// # Errors
///
/// Returns an error if `n_samples` is zero.
pub fn generate_training_data(n_samples: usize, seed: u64) -> Result<Vec<[f64; 3]>> {
    generate_training_data_in(&CommandBounds::default(), n_samples, seed)
}

/// Generate `n_samples` commands uniformly from `bounds`.
///
/// # Errors
///
/// Returns an error if `n_samples` is zero or a range is empty.
pub fn generate_training_data_in(
    bounds: &CommandBounds,
    n_samples: usize,
    seed: u64,
) -> Result<Vec<[f64; 3]>> {
    if n_samples == 0 {
        return Err(SafeTrajError::too_few_samples(1, 0));
    }
    if bounds.ranges().iter().any(|r| r.is_empty()) {
        return Err(SafeTrajError::invalid_config("command bounds must be non-empty"));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let ranges = bounds.ranges();

    let data = (0..n_samples)
        .map(|_| ranges.map(|r| rng.gen_range(r.clone())))
        .collect();

    Ok(data)
}
