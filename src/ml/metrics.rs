//! Evaluation metrics for classification models.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
/// Confusion matrix for a `K`-class classifier.
pub struct ConfusionMatrix {
    /// Number of classes.
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Create an empty `KxK` confusion matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }
}

#[derive(Debug, Clone)]
/// Precision/recall statistics for a single class.
pub struct PerClassStats {
    /// `TP / (TP + FP)`; 0 when the class was never predicted.
    pub precision: f32,
    /// `TP / (TP + FN)`.
    pub recall: f32,
    /// Total number of true examples for the class.
    pub support: u32,
}

/// Compute per-class precision and recall from a confusion matrix.
///
/// Zero-division cases yield 0 rather than an error.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    let k = cm.n_classes;
    let mut stats = Vec::with_capacity(k);
    for class_idx in 0..k {
        let tp = cm.get(class_idx, class_idx) as f32;
        let mut fp = 0f32;
        let mut fn_ = 0f32;
        let mut support = 0u32;
        for j in 0..k {
            let v = cm.get(class_idx, j);
            support = support.saturating_add(v);
            if j != class_idx {
                fn_ += v as f32;
            }
        }
        for i in 0..k {
            if i != class_idx {
                fp += cm.get(i, class_idx) as f32;
            }
        }
        let precision = if tp + fp == 0.0 { 0.0 } else { tp / (tp + fp) };
        let recall = if tp + fn_ == 0.0 { 0.0 } else { tp / (tp + fn_) };
        stats.push(PerClassStats {
            precision,
            recall,
            support,
        });
    }
    stats
}

/// Compute overall accuracy from a confusion matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f32 {
    let mut correct = 0u64;
    let mut total = 0u64;
    for truth in 0..cm.n_classes {
        for predicted in 0..cm.n_classes {
            let v = cm.get(truth, predicted) as u64;
            total += v;
            if truth == predicted {
                correct += v;
            }
        }
    }
    if total == 0 {
        0.0
    } else {
        (correct as f32) / (total as f32)
    }
}

/// Precision averaged across classes, weighted by class support.
pub fn weighted_precision(cm: &ConfusionMatrix) -> f32 {
    let stats = precision_recall_by_class(cm);
    let total: u32 = stats.iter().map(|s| s.support).sum();
    if total == 0 {
        return 0.0;
    }
    stats
        .iter()
        .map(|s| s.precision * s.support as f32)
        .sum::<f32>()
        / total as f32
}

/// One point on a ROC curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocPoint {
    /// False positive rate.
    pub fpr: f32,
    /// True positive rate.
    pub tpr: f32,
}

/// One-vs-rest ROC curve and its area for a single class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocCurve {
    /// Label of the positive class.
    pub class: String,
    /// Curve points from (0,0) to (1,1), threshold descending.
    pub points: Vec<RocPoint>,
    /// Trapezoidal area under the curve.
    pub auc: f32,
}

/// Compute a one-vs-rest ROC curve from probability scores.
///
/// `truths` are the true class indices, `scores` the predicted probability
/// of `positive` per row. Returns `None` when the positive class has no
/// positive or no negative examples (the rates would be undefined).
pub fn roc_curve(
    truths: &[usize],
    scores: &[f32],
    positive: usize,
    class_label: &str,
) -> Option<RocCurve> {
    let n_pos = truths.iter().filter(|&&t| t == positive).count();
    let n_neg = truths.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..truths.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut points = vec![RocPoint { fpr: 0.0, tpr: 0.0 }];
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut idx = 0usize;
    while idx < order.len() {
        // Rows sharing a score move together; emitting per-threshold points
        // keeps the curve correct under ties.
        let threshold = scores[order[idx]];
        while idx < order.len() && scores[order[idx]] == threshold {
            if truths[order[idx]] == positive {
                tp += 1;
            } else {
                fp += 1;
            }
            idx += 1;
        }
        points.push(RocPoint {
            fpr: fp as f32 / n_neg as f32,
            tpr: tp as f32 / n_pos as f32,
        });
    }

    let mut auc = 0.0f32;
    for pair in points.windows(2) {
        let width = pair[1].fpr - pair[0].fpr;
        auc += width * (pair[0].tpr + pair[1].tpr) * 0.5;
    }

    Some(RocCurve {
        class: class_label.to_string(),
        points,
        auc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal_cm() -> ConfusionMatrix {
        let mut cm = ConfusionMatrix::new(3);
        for class in 0..3 {
            for _ in 0..4 {
                cm.add(class, class);
            }
        }
        cm
    }

    #[test]
    fn perfect_predictions_score_one() {
        let cm = diagonal_cm();
        assert_eq!(accuracy(&cm), 1.0);
        assert_eq!(weighted_precision(&cm), 1.0);
    }

    #[test]
    fn weighted_precision_respects_support() {
        // Class 0: 3 true rows, 2 predicted correctly, 1 misread as class 1.
        // Class 1: 1 true row predicted as class 0.
        let mut cm = ConfusionMatrix::new(2);
        cm.add(0, 0);
        cm.add(0, 0);
        cm.add(0, 1);
        cm.add(1, 0);
        let stats = precision_recall_by_class(&cm);
        assert!((stats[0].precision - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(stats[1].precision, 0.0);
        let expected = (2.0 / 3.0 * 3.0) / 4.0;
        assert!((weighted_precision(&cm) - expected).abs() < 1e-6);
    }

    #[test]
    fn never_predicted_class_has_zero_precision() {
        let mut cm = ConfusionMatrix::new(2);
        cm.add(1, 0);
        let stats = precision_recall_by_class(&cm);
        assert_eq!(stats[1].precision, 0.0);
    }

    #[test]
    fn perfectly_separated_scores_have_auc_one() {
        let truths = vec![0, 0, 1, 1];
        let scores = vec![0.9, 0.8, 0.2, 0.1];
        let curve = roc_curve(&truths, &scores, 0, "Normal").unwrap();
        assert!((curve.auc - 1.0).abs() < 1e-6);
        assert_eq!(curve.points.first().unwrap(), &RocPoint { fpr: 0.0, tpr: 0.0 });
        assert_eq!(curve.points.last().unwrap(), &RocPoint { fpr: 1.0, tpr: 1.0 });
    }

    #[test]
    fn inverted_scores_have_auc_zero() {
        let truths = vec![0, 1];
        let scores = vec![0.1, 0.9];
        let curve = roc_curve(&truths, &scores, 0, "Normal").unwrap();
        assert_eq!(curve.auc, 0.0);
    }

    #[test]
    fn single_class_rows_yield_no_curve() {
        let truths = vec![0, 0];
        let scores = vec![0.5, 0.6];
        assert!(roc_curve(&truths, &scores, 0, "Normal").is_none());
        assert!(roc_curve(&truths, &scores, 1, "Moderate").is_none());
    }
}
