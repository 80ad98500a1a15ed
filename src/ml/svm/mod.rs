//! One-vs-rest linear support-vector classifier.

mod train;

pub use train::{TrainOptions, train_svm};

use serde::{Deserialize, Serialize};

use crate::ml::argmax;

/// Platt sigmoid parameters calibrating one class margin to a probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlattParams {
    /// Slope applied to the margin.
    pub a: f32,
    /// Intercept.
    pub b: f32,
}

impl PlattParams {
    /// Calibrated probability for a raw margin.
    pub fn probability(&self, margin: f32) -> f32 {
        1.0 / (1.0 + (self.a * margin + self.b).exp())
    }
}

/// Linear-kernel SVC trained one-vs-rest, with probability estimates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvmModel {
    /// Model format version.
    pub model_version: i64,
    /// Number of `f32` values per feature vector.
    pub feature_len_f32: usize,
    /// Ordered list of class labels.
    pub classes: Vec<String>,
    /// Per-class weights, row-major `classes * feature_len_f32`.
    pub weights: Vec<f32>,
    /// Per-class bias.
    pub bias: Vec<f32>,
    /// Per-class Platt calibration of the margins.
    pub platt: Vec<PlattParams>,
}

impl SvmModel {
    /// Validate the model dimensions.
    pub fn validate(&self) -> Result<(), String> {
        let classes = self.classes.len();
        if classes < 2 {
            return Err("Model must contain at least 2 classes".to_string());
        }
        if self.weights.len() != classes * self.feature_len_f32 {
            return Err("weights length mismatch".to_string());
        }
        if self.bias.len() != classes {
            return Err("bias length mismatch".to_string());
        }
        if self.platt.len() != classes {
            return Err("platt parameter length mismatch".to_string());
        }
        Ok(())
    }

    /// Raw one-vs-rest margins for a feature vector.
    pub fn margins(&self, features: &[f32]) -> Vec<f32> {
        let classes = self.classes.len();
        let dim = self.feature_len_f32;
        let mut out = vec![0.0f32; classes];
        for c in 0..classes {
            let base = c * dim;
            let mut sum = self.bias[c];
            for i in 0..dim.min(features.len()) {
                sum += self.weights[base + i] * features[i];
            }
            out[c] = sum;
        }
        out
    }

    /// Class probabilities: Platt-calibrated margins, normalized across
    /// classes.
    pub fn predict_proba(&self, features: &[f32]) -> Vec<f32> {
        let margins = self.margins(features);
        let mut probs: Vec<f32> = margins
            .iter()
            .zip(self.platt.iter())
            .map(|(&margin, platt)| platt.probability(margin))
            .collect();
        let sum: f32 = probs.iter().sum();
        if sum > 0.0 {
            for p in &mut probs {
                *p /= sum;
            }
        } else {
            let uniform = 1.0 / probs.len().max(1) as f32;
            probs.fill(uniform);
        }
        probs
    }

    /// Predicted class index: argmax raw margin, matching the decision
    /// function rather than the calibrated probabilities.
    pub fn predict_class_index(&self, features: &[f32]) -> usize {
        argmax(&self.margins(features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_model() -> SvmModel {
        SvmModel {
            model_version: 1,
            feature_len_f32: 2,
            classes: vec!["a".into(), "b".into()],
            weights: vec![1.0, 0.0, -1.0, 0.0],
            bias: vec![0.0, 0.0],
            platt: vec![PlattParams { a: -1.0, b: 0.0 }, PlattParams { a: -1.0, b: 0.0 }],
        }
    }

    #[test]
    fn margin_sign_decides_the_class() {
        let model = toy_model();
        model.validate().unwrap();
        assert_eq!(model.predict_class_index(&[2.0, 0.0]), 0);
        assert_eq!(model.predict_class_index(&[-2.0, 0.0]), 1);
    }

    #[test]
    fn probabilities_are_normalized() {
        let model = toy_model();
        let proba = model.predict_proba(&[2.0, 0.0]);
        let sum: f32 = proba.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(proba[0] > proba[1]);
    }
}
