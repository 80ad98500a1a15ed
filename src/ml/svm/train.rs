use rand::rngs::StdRng;
use rand::{SeedableRng, seq::SliceRandom};

use super::{PlattParams, SvmModel};
use crate::ml::TrainDataset;

/// Training options for the one-vs-rest linear SVC.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// SGD epochs per binary problem.
    pub epochs: usize,
    /// Learning rate.
    pub learning_rate: f32,
    /// L2 regularization strength.
    pub l2: f32,
    /// RNG seed for sample shuffling.
    pub seed: u64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            epochs: 200,
            learning_rate: 0.01,
            l2: 1e-4,
            seed: 42,
        }
    }
}

/// Train a linear SVC one class versus the rest, then Platt-calibrate each
/// binary margin on the training rows.
pub fn train_svm(dataset: &TrainDataset, options: &TrainOptions) -> Result<SvmModel, String> {
    dataset.validate()?;
    let classes = dataset.classes.len();
    let dim = dataset.feature_columns.len();
    let n = dataset.x.len();

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut weights = vec![0.0f32; classes * dim];
    let mut bias = vec![0.0f32; classes];
    let mut indices: Vec<usize> = (0..n).collect();
    let lr = options.learning_rate;
    let l2 = options.l2.max(0.0);

    for class_idx in 0..classes {
        let base = class_idx * dim;
        for _epoch in 0..options.epochs {
            indices.shuffle(&mut rng);
            for &row_idx in &indices {
                let x = &dataset.x[row_idx];
                let target = if dataset.y[row_idx] == class_idx {
                    1.0f32
                } else {
                    -1.0f32
                };
                let mut margin = bias[class_idx];
                for i in 0..dim {
                    margin += weights[base + i] * x[i];
                }
                if target * margin < 1.0 {
                    for i in 0..dim {
                        weights[base + i] += lr * (target * x[i] - l2 * weights[base + i]);
                    }
                    bias[class_idx] += lr * target;
                } else {
                    for i in 0..dim {
                        weights[base + i] -= lr * l2 * weights[base + i];
                    }
                }
            }
        }
    }

    // Calibrate each binary margin on the training rows.
    let mut platt = Vec::with_capacity(classes);
    for class_idx in 0..classes {
        let base = class_idx * dim;
        let margins: Vec<f32> = dataset
            .x
            .iter()
            .map(|x| {
                let mut m = bias[class_idx];
                for i in 0..dim {
                    m += weights[base + i] * x[i];
                }
                m
            })
            .collect();
        let targets: Vec<bool> = dataset.y.iter().map(|&y| y == class_idx).collect();
        platt.push(fit_platt(&margins, &targets));
    }

    Ok(SvmModel {
        model_version: 1,
        feature_len_f32: dim,
        classes: dataset.classes.clone(),
        weights,
        bias,
        platt,
    })
}

/// Fit sigmoid parameters `p = 1 / (1 + exp(a*margin + b))` by gradient
/// descent on the negative log-likelihood.
fn fit_platt(margins: &[f32], targets: &[bool]) -> PlattParams {
    let mut a = -1.0f32;
    let mut b = 0.0f32;
    let n = margins.len().max(1) as f32;
    let lr = 0.01f32;

    for _iter in 0..500 {
        let mut grad_a = 0.0f32;
        let mut grad_b = 0.0f32;
        for (&margin, &positive) in margins.iter().zip(targets.iter()) {
            let p = 1.0 / (1.0 + (a * margin + b).exp());
            let t = if positive { 1.0 } else { 0.0 };
            // d(nll)/d(a*f+b) = p - t with this sigmoid orientation.
            let diff = p - t;
            grad_a += -diff * margin;
            grad_b += -diff;
        }
        a -= lr * grad_a / n;
        b -= lr * grad_b / n;
    }

    PlattParams { a, b }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable_dataset() -> TrainDataset {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..20 {
            let jitter = (i % 5) as f32 * 0.05;
            x.push(vec![-2.0 - jitter, 1.0]);
            y.push(0);
            x.push(vec![2.0 + jitter, 1.0]);
            y.push(1);
        }
        TrainDataset {
            feature_columns: vec!["a".into(), "b".into()],
            classes: vec!["neg".into(), "pos".into()],
            x,
            y,
        }
    }

    #[test]
    fn separates_two_classes() {
        let dataset = separable_dataset();
        let model = train_svm(&dataset, &TrainOptions::default()).unwrap();
        model.validate().unwrap();
        for (row, &label) in dataset.x.iter().zip(dataset.y.iter()) {
            assert_eq!(model.predict_class_index(row), label);
        }
    }

    #[test]
    fn calibrated_probability_tracks_the_margin() {
        let dataset = separable_dataset();
        let model = train_svm(&dataset, &TrainOptions::default()).unwrap();
        let far_pos = model.predict_proba(&[3.0, 1.0]);
        let far_neg = model.predict_proba(&[-3.0, 1.0]);
        assert!(far_pos[1] > 0.5);
        assert!(far_neg[0] > 0.5);
    }

    #[test]
    fn platt_fit_orients_the_sigmoid() {
        let margins = vec![-2.0, -1.5, 1.5, 2.0];
        let targets = vec![false, false, true, true];
        let platt = fit_platt(&margins, &targets);
        assert!(platt.probability(2.0) > platt.probability(-2.0));
    }

    #[test]
    fn same_seed_is_deterministic() {
        let dataset = separable_dataset();
        let a = train_svm(&dataset, &TrainOptions::default()).unwrap();
        let b = train_svm(&dataset, &TrainOptions::default()).unwrap();
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.bias, b.bias);
    }
}
