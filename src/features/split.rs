//! Seeded, stratified train/test partitioning.

use rand::rngs::StdRng;
use rand::{SeedableRng, seq::SliceRandom};

/// Split parameters. Defaults match the training pipeline contract.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Fraction of rows moved to the test split.
    pub test_ratio: f32,
    /// RNG seed for the per-class shuffles.
    pub seed: u64,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            test_ratio: 0.3,
            seed: 42,
        }
    }
}

/// Partition row indices into (train, test), stratified by class.
///
/// Each class keeps approximately `1 - test_ratio` of its rows in train;
/// classes with at least two rows contribute at least one test row. The
/// same seed always produces the same partition.
pub fn stratified_split(
    y: &[usize],
    options: &SplitOptions,
) -> Result<(Vec<usize>, Vec<usize>), String> {
    if y.is_empty() {
        return Err("Cannot split an empty dataset".to_string());
    }
    if !(0.0..1.0).contains(&options.test_ratio) {
        return Err(format!("Invalid test ratio: {}", options.test_ratio));
    }

    let n_classes = y.iter().copied().max().map(|m| m + 1).unwrap_or(0);
    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (idx, &label) in y.iter().enumerate() {
        by_class[label].push(idx);
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut train = Vec::new();
    let mut test = Vec::new();
    for indices in &mut by_class {
        if indices.is_empty() {
            continue;
        }
        indices.shuffle(&mut rng);
        let mut n_test = (indices.len() as f32 * options.test_ratio).round() as usize;
        if n_test == 0 && indices.len() >= 2 && options.test_ratio > 0.0 {
            n_test = 1;
        }
        if n_test >= indices.len() {
            n_test = indices.len() - 1;
        }
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    if train.is_empty() {
        return Err("Training split is empty".to_string());
    }
    Ok((train, test))
}
