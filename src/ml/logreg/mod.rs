//! Multinomial logistic regression classifier.

use serde::{Deserialize, Serialize};

use crate::ml::{argmax, softmax};

mod train;
pub use train::{TrainOptions, train_logreg};

/// Multinomial logistic regression model over tabular feature vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRegModel {
    /// Model format version.
    pub model_version: i64,
    /// Number of `f32` values per feature vector.
    pub feature_len_f32: usize,
    /// Ordered list of class labels.
    pub classes: Vec<String>,
    /// Row-major `classes * feature_len_f32` weights.
    pub weights: Vec<f32>,
    /// Per-class bias.
    pub bias: Vec<f32>,
}

impl LogRegModel {
    /// Validate the model dimensions.
    pub fn validate(&self) -> Result<(), String> {
        let classes = self.classes.len();
        if classes < 2 {
            return Err("Model must contain at least 2 classes".to_string());
        }
        if self.feature_len_f32 == 0 {
            return Err("feature_len_f32 must be positive".to_string());
        }
        if self.weights.len() != classes * self.feature_len_f32 {
            return Err("weights length mismatch".to_string());
        }
        if self.bias.len() != classes {
            return Err("bias length mismatch".to_string());
        }
        Ok(())
    }

    /// Compute class probabilities for a feature vector.
    pub fn predict_proba(&self, features: &[f32]) -> Vec<f32> {
        let classes = self.classes.len();
        let dim = self.feature_len_f32;
        let mut logits = vec![0.0f32; classes];
        for c in 0..classes {
            let base = c * dim;
            let mut sum = self.bias[c];
            for i in 0..dim.min(features.len()) {
                sum += self.weights[base + i] * features[i];
            }
            logits[c] = sum;
        }
        softmax(&logits)
    }

    /// Return the argmax class index for the given feature vector.
    pub fn predict_class_index(&self, features: &[f32]) -> usize {
        argmax(&self.predict_proba(features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_weights_give_uniform_probabilities() {
        let model = LogRegModel {
            model_version: 1,
            feature_len_f32: 3,
            classes: vec!["a".into(), "b".into()],
            weights: vec![0.0; 6],
            bias: vec![0.0; 2],
        };
        model.validate().unwrap();
        let out = model.predict_proba(&[1.0, 2.0, 3.0]);
        let sum: f32 = out.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!((out[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn validate_rejects_bad_shapes() {
        let model = LogRegModel {
            model_version: 1,
            feature_len_f32: 3,
            classes: vec!["a".into(), "b".into()],
            weights: vec![0.0; 5],
            bias: vec![0.0; 2],
        };
        assert!(model.validate().is_err());
    }
}
