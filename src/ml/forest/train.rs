use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, seq::SliceRandom};

use super::model::{ForestModel, TreeNode};
use crate::ml::TrainDataset;

/// Training hyperparameters for the random forest.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Number of bootstrap trees.
    pub trees: usize,
    /// Maximum tree depth.
    pub max_depth: usize,
    /// Minimum rows per leaf.
    pub min_leaf: usize,
    /// RNG seed for bootstrap sampling and feature subsampling.
    pub seed: u64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            trees: 100,
            max_depth: 12,
            min_leaf: 1,
            seed: 42,
        }
    }
}

/// Train a random forest with gini splits and sqrt-feature subsampling.
pub fn train_forest(
    dataset: &TrainDataset,
    options: &TrainOptions,
) -> Result<ForestModel, String> {
    dataset.validate()?;
    if options.trees == 0 {
        return Err("Forest needs at least one tree".to_string());
    }

    let n = dataset.x.len();
    let n_classes = dataset.classes.len();
    let n_features = dataset.feature_columns.len();
    let features_per_split = (n_features as f32).sqrt().ceil().max(1.0) as usize;

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut trees = Vec::with_capacity(options.trees);
    for _ in 0..options.trees {
        let sample: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
        let tree = grow_tree(
            dataset,
            &sample,
            n_classes,
            features_per_split,
            options,
            0,
            &mut rng,
        );
        trees.push(tree);
    }

    Ok(ForestModel {
        model_version: 1,
        feature_len_f32: n_features,
        classes: dataset.classes.clone(),
        trees,
    })
}

fn grow_tree(
    dataset: &TrainDataset,
    rows: &[usize],
    n_classes: usize,
    features_per_split: usize,
    options: &TrainOptions,
    depth: usize,
    rng: &mut StdRng,
) -> TreeNode {
    let counts = class_counts(dataset, rows, n_classes);
    if depth >= options.max_depth
        || rows.len() <= options.min_leaf
        || counts.iter().filter(|&&c| c > 0).count() <= 1
    {
        return leaf_from_counts(&counts);
    }

    let Some(split) = best_split(dataset, rows, n_classes, features_per_split, rng) else {
        return leaf_from_counts(&counts);
    };

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows.iter().partition(|&&row| {
        dataset.x[row][split.feature_index] <= split.threshold
    });
    if left_rows.is_empty() || right_rows.is_empty() {
        return leaf_from_counts(&counts);
    }

    let left = grow_tree(
        dataset,
        &left_rows,
        n_classes,
        features_per_split,
        options,
        depth + 1,
        rng,
    );
    let right = grow_tree(
        dataset,
        &right_rows,
        n_classes,
        features_per_split,
        options,
        depth + 1,
        rng,
    );
    TreeNode::Split {
        feature_index: split.feature_index as u16,
        threshold: split.threshold,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[derive(Debug, Clone)]
struct BestSplit {
    feature_index: usize,
    threshold: f32,
    impurity: f64,
}

fn best_split(
    dataset: &TrainDataset,
    rows: &[usize],
    n_classes: usize,
    features_per_split: usize,
    rng: &mut StdRng,
) -> Option<BestSplit> {
    let n_features = dataset.feature_columns.len();
    let mut candidates: Vec<usize> = (0..n_features).collect();
    candidates.shuffle(rng);
    candidates.truncate(features_per_split.min(n_features));

    let mut best: Option<BestSplit> = None;
    for feature_index in candidates {
        let Some(split) = best_split_for_feature(dataset, rows, n_classes, feature_index) else {
            continue;
        };
        let better = best
            .as_ref()
            .map(|b| split.impurity < b.impurity)
            .unwrap_or(true);
        if better {
            best = Some(split);
        }
    }
    best
}

fn best_split_for_feature(
    dataset: &TrainDataset,
    rows: &[usize],
    n_classes: usize,
    feature_index: usize,
) -> Option<BestSplit> {
    let mut values: Vec<(f32, usize)> = rows
        .iter()
        .map(|&row| (dataset.x[row][feature_index], dataset.y[row]))
        .collect();
    values.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let total = values.len();
    let mut right_counts = vec![0u32; n_classes];
    for &(_, label) in &values {
        right_counts[label] += 1;
    }
    let mut left_counts = vec![0u32; n_classes];

    let mut best: Option<BestSplit> = None;
    for i in 0..total - 1 {
        let (value, label) = values[i];
        left_counts[label] += 1;
        right_counts[label] -= 1;
        let next_value = values[i + 1].0;
        if next_value <= value {
            continue;
        }
        let left_n = (i + 1) as f64;
        let right_n = (total - i - 1) as f64;
        let impurity = (left_n * gini(&left_counts, left_n)
            + right_n * gini(&right_counts, right_n))
            / total as f64;
        let better = best
            .as_ref()
            .map(|b| impurity < b.impurity)
            .unwrap_or(true);
        if better {
            best = Some(BestSplit {
                feature_index,
                threshold: (value + next_value) * 0.5,
                impurity,
            });
        }
    }
    best
}

fn gini(counts: &[u32], n: f64) -> f64 {
    if n == 0.0 {
        return 0.0;
    }
    let mut sum_sq = 0.0;
    for &c in counts {
        let p = c as f64 / n;
        sum_sq += p * p;
    }
    1.0 - sum_sq
}

fn class_counts(dataset: &TrainDataset, rows: &[usize], n_classes: usize) -> Vec<u32> {
    let mut counts = vec![0u32; n_classes];
    for &row in rows {
        counts[dataset.y[row]] += 1;
    }
    counts
}

fn leaf_from_counts(counts: &[u32]) -> TreeNode {
    let total: u32 = counts.iter().sum();
    let probs = if total == 0 {
        vec![1.0 / counts.len().max(1) as f32; counts.len()]
    } else {
        counts.iter().map(|&c| c as f32 / total as f32).collect()
    };
    TreeNode::Leaf { probs }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_dataset() -> TrainDataset {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..20 {
            let offset = i as f32 * 0.01;
            x.push(vec![0.0 + offset, 1.0]);
            y.push(0);
            x.push(vec![5.0 + offset, 1.0]);
            y.push(1);
        }
        TrainDataset {
            feature_columns: vec!["a".into(), "b".into()],
            classes: vec!["low".into(), "high".into()],
            x,
            y,
        }
    }

    #[test]
    fn learns_a_separable_threshold() {
        let dataset = separable_dataset();
        let options = TrainOptions {
            trees: 15,
            ..TrainOptions::default()
        };
        let model = train_forest(&dataset, &options).unwrap();
        model.validate().unwrap();
        for (row, &label) in dataset.x.iter().zip(dataset.y.iter()) {
            assert_eq!(model.predict_class_index(row), label);
        }
    }

    #[test]
    fn probabilities_sum_to_one() {
        let dataset = separable_dataset();
        let options = TrainOptions {
            trees: 5,
            ..TrainOptions::default()
        };
        let model = train_forest(&dataset, &options).unwrap();
        let proba = model.predict_proba(&[0.1, 1.0]);
        let sum: f32 = proba.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn same_seed_trains_identical_forests() {
        let dataset = separable_dataset();
        let options = TrainOptions {
            trees: 5,
            ..TrainOptions::default()
        };
        let a = train_forest(&dataset, &options).unwrap();
        let b = train_forest(&dataset, &options).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
