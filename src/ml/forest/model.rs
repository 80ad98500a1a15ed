use serde::{Deserialize, Serialize};

use crate::ml::argmax;

/// Node of a serialized decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal split: `feature <= threshold` goes left.
    Split {
        /// Feature index used for the split.
        feature_index: u16,
        /// Threshold in feature units.
        threshold: f32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    /// Leaf carrying the class distribution of its training rows.
    Leaf {
        /// Normalized class probabilities, one per class.
        probs: Vec<f32>,
    },
}

impl TreeNode {
    /// Class distribution at the leaf reached by a feature vector.
    pub fn predict(&self, features: &[f32]) -> &[f32] {
        match self {
            TreeNode::Leaf { probs } => probs,
            TreeNode::Split {
                feature_index,
                threshold,
                left,
                right,
            } => {
                let value = features.get(*feature_index as usize).copied().unwrap_or(0.0);
                if value <= *threshold {
                    left.predict(features)
                } else {
                    right.predict(features)
                }
            }
        }
    }

    fn check(&self, n_classes: usize) -> Result<(), String> {
        match self {
            TreeNode::Leaf { probs } => {
                if probs.len() != n_classes {
                    return Err(format!(
                        "Leaf has {} probabilities but expected {n_classes}",
                        probs.len()
                    ));
                }
                Ok(())
            }
            TreeNode::Split { left, right, .. } => {
                left.check(n_classes)?;
                right.check(n_classes)
            }
        }
    }
}

/// Random forest model: averaged leaf distributions over bootstrap trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    /// Model format version.
    pub model_version: i64,
    /// Number of `f32` values per feature vector.
    pub feature_len_f32: usize,
    /// Ordered list of class labels.
    pub classes: Vec<String>,
    /// Trained trees.
    pub trees: Vec<TreeNode>,
}

impl ForestModel {
    /// Validate structural invariants of the model.
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.len() < 2 {
            return Err("Model must contain at least 2 classes".to_string());
        }
        if self.trees.is_empty() {
            return Err("Model has no trees".to_string());
        }
        for tree in &self.trees {
            tree.check(self.classes.len())?;
        }
        Ok(())
    }

    /// Predict class probabilities by averaging tree leaf distributions.
    pub fn predict_proba(&self, features: &[f32]) -> Vec<f32> {
        let n_classes = self.classes.len();
        let mut sums = vec![0.0f32; n_classes];
        for tree in &self.trees {
            let leaf = tree.predict(features);
            for (sum, &p) in sums.iter_mut().zip(leaf.iter()) {
                *sum += p;
            }
        }
        let n_trees = self.trees.len().max(1) as f32;
        for sum in &mut sums {
            *sum /= n_trees;
        }
        sums
    }

    /// Predict the best class index for a feature vector.
    pub fn predict_class_index(&self, features: &[f32]) -> usize {
        argmax(&self.predict_proba(features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(probs: Vec<f32>) -> TreeNode {
        TreeNode::Leaf { probs }
    }

    fn split_on_first(threshold: f32, left: TreeNode, right: TreeNode) -> TreeNode {
        TreeNode::Split {
            feature_index: 0,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[test]
    fn tree_routes_on_threshold() {
        let tree = split_on_first(0.5, leaf(vec![1.0, 0.0]), leaf(vec![0.0, 1.0]));
        assert_eq!(tree.predict(&[0.5]), &[1.0, 0.0]);
        assert_eq!(tree.predict(&[0.6]), &[0.0, 1.0]);
    }

    #[test]
    fn forest_averages_tree_distributions() {
        let model = ForestModel {
            model_version: 1,
            feature_len_f32: 1,
            classes: vec!["a".into(), "b".into()],
            trees: vec![leaf(vec![1.0, 0.0]), leaf(vec![0.0, 1.0])],
        };
        model.validate().unwrap();
        assert_eq!(model.predict_proba(&[0.0]), vec![0.5, 0.5]);
    }

    #[test]
    fn validate_rejects_mismatched_leaves() {
        let model = ForestModel {
            model_version: 1,
            feature_len_f32: 1,
            classes: vec!["a".into(), "b".into()],
            trees: vec![leaf(vec![1.0])],
        };
        assert!(model.validate().is_err());
    }
}
