//! Classifier families, trainers, and evaluation metrics.

pub mod forest;
pub mod logreg;
pub mod metrics;
pub mod svm;

use serde::{Deserialize, Serialize};

pub use forest::ForestModel;
pub use logreg::LogRegModel;
pub use svm::SvmModel;

/// In-memory training dataset shared by every trainer.
#[derive(Debug, Clone)]
pub struct TrainDataset {
    /// Ordered feature-column names describing each row of `x`.
    pub feature_columns: Vec<String>,
    /// Ordered class labels; `y` holds indices into this list.
    pub classes: Vec<String>,
    /// Feature matrix, row-major.
    pub x: Vec<Vec<f32>>,
    /// Class indices aligned with `x`.
    pub y: Vec<usize>,
}

impl TrainDataset {
    /// Basic shape checks shared by the trainers.
    pub fn validate(&self) -> Result<(), String> {
        if self.x.is_empty() || self.y.is_empty() {
            return Err("Empty training set".to_string());
        }
        if self.x.len() != self.y.len() {
            return Err("Mismatched training inputs/labels".to_string());
        }
        if self.classes.len() < 2 {
            return Err("Need at least 2 classes".to_string());
        }
        let dim = self.feature_columns.len();
        for row in &self.x {
            if row.len() != dim {
                return Err("Inconsistent feature row length".to_string());
            }
        }
        for &label in &self.y {
            if label >= self.classes.len() {
                return Err(format!("Label index {label} out of range"));
            }
        }
        Ok(())
    }
}

/// Trained classifier of any supported family.
///
/// The artifact store serializes this enum so the inference stage can load
/// whichever family won model selection without knowing it in advance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum Classifier {
    /// Bootstrap random forest.
    RandomForest(ForestModel),
    /// One-vs-rest linear SVC with Platt-calibrated probabilities.
    LinearSvc(SvmModel),
    /// Multinomial logistic regression.
    LogisticRegression(LogRegModel),
}

impl Classifier {
    /// Human-readable family name, used in reports and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Classifier::RandomForest(_) => "Random Forest",
            Classifier::LinearSvc(_) => "SVC",
            Classifier::LogisticRegression(_) => "Logistic Regression",
        }
    }

    /// Ordered class labels the model was trained on.
    pub fn classes(&self) -> &[String] {
        match self {
            Classifier::RandomForest(model) => &model.classes,
            Classifier::LinearSvc(model) => &model.classes,
            Classifier::LogisticRegression(model) => &model.classes,
        }
    }

    /// Validate structural invariants of the wrapped model.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Classifier::RandomForest(model) => model.validate(),
            Classifier::LinearSvc(model) => model.validate(),
            Classifier::LogisticRegression(model) => model.validate(),
        }
    }

    /// Predicted class index for a feature row.
    pub fn predict_class_index(&self, features: &[f32]) -> usize {
        match self {
            Classifier::RandomForest(model) => model.predict_class_index(features),
            Classifier::LinearSvc(model) => model.predict_class_index(features),
            Classifier::LogisticRegression(model) => model.predict_class_index(features),
        }
    }

    /// Class probabilities, `None` for families without probability output.
    ///
    /// All three current families produce probabilities; the option exists so
    /// ROC evaluation can skip a future family that does not.
    pub fn predict_proba(&self, features: &[f32]) -> Option<Vec<f32>> {
        match self {
            Classifier::RandomForest(model) => Some(model.predict_proba(features)),
            Classifier::LinearSvc(model) => Some(model.predict_proba(features)),
            Classifier::LogisticRegression(model) => Some(model.predict_proba(features)),
        }
    }
}

/// Compute a numerically-stable softmax for a set of logits.
pub fn softmax(raw: &[f32]) -> Vec<f32> {
    if raw.is_empty() {
        return Vec::new();
    }
    let max = raw
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, |a, b| a.max(b));
    let mut exps = Vec::with_capacity(raw.len());
    let mut sum = 0.0f32;
    for &v in raw {
        let e = (v - max).exp();
        exps.push(e);
        sum += e;
    }
    if sum == 0.0 {
        return vec![1.0 / raw.len() as f32; raw.len()];
    }
    for v in &mut exps {
        *v /= sum;
    }
    exps
}

/// Index of the largest value.
pub fn argmax(values: &[f32]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f32::NEG_INFINITY;
    for (idx, &v) in values.iter().enumerate() {
        if v > best_val {
            best_val = v;
            best_idx = idx;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_sums_to_one() {
        let out = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = out.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(out[2] > out[1] && out[1] > out[0]);
    }

    #[test]
    fn argmax_picks_largest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[]), 0);
    }

    #[test]
    fn dataset_validation_catches_shape_errors() {
        let dataset = TrainDataset {
            feature_columns: vec!["a".into(), "b".into()],
            classes: vec!["x".into(), "y".into()],
            x: vec![vec![0.0, 1.0], vec![1.0]],
            y: vec![0, 1],
        };
        assert!(dataset.validate().is_err());
    }
}
