//! Dataset storage and seeded resampling.
//!
//! # Core Concepts
//!
//! - **Dataset**: `(X, y)` pairs where `X` is a feature matrix of shape
//!   `(n_samples, n_features)` and `y` is a target vector of shape `(n_samples,)`.
//! - **Permutation**: a reproducible reordering of row indices driven by an
//!   explicit `u64` seed. Every resampling round in the crate goes through
//!   [`permutation`], so identical seeds always produce identical splits.
//!
//! # Example
//!
//! ```rust
//! use polyridge::dataset::{permutation, InMemoryDataset};
//!
//! let x = vec![vec![1.0], vec![2.0], vec![3.0]];
//! let y = vec![0.0, 1.0, 4.0];
//! let dataset = InMemoryDataset::new(x, y).unwrap();
//!
//! let order = permutation(dataset.len(), 7);
//! let shuffled = dataset.select(&order);
//! assert_eq!(shuffled.len(), 3);
//! ```

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub mod memory;
pub use self::memory::InMemoryDataset;

/// Returns a permutation of `0..n` fully determined by `seed`.
pub fn permutation(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);
    indices
}
