use rand::rngs::StdRng;
use rand::{Rng, SeedableRng, seq::SliceRandom};

use super::LogRegModel;
use crate::ml::{TrainDataset, softmax};

/// Training options for multinomial logistic regression.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub epochs: usize,
    pub learning_rate: f32,
    pub l2: f32,
    pub batch_size: usize,
    pub seed: u64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            epochs: 200,
            learning_rate: 0.1,
            l2: 1e-4,
            batch_size: 64,
            seed: 42,
        }
    }
}

/// Train by minibatch SGD on the softmax cross-entropy loss.
pub fn train_logreg(
    dataset: &TrainDataset,
    options: &TrainOptions,
) -> Result<LogRegModel, String> {
    dataset.validate()?;
    let classes = dataset.classes.len();
    let dim = dataset.feature_columns.len();

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut weights = vec![0.0f32; classes * dim];
    let mut bias = vec![0.0f32; classes];
    for w in &mut weights {
        *w = (rng.random::<f32>() - 0.5) * 0.01;
    }

    let mut indices: Vec<usize> = (0..dataset.x.len()).collect();
    let batch_size = options.batch_size.max(1);
    let lr = options.learning_rate;
    let l2 = options.l2.max(0.0);

    for _epoch in 0..options.epochs {
        indices.shuffle(&mut rng);
        for chunk in indices.chunks(batch_size) {
            let mut grad_w = vec![0.0f32; weights.len()];
            let mut grad_b = vec![0.0f32; bias.len()];
            for &idx in chunk {
                let x = &dataset.x[idx];
                let y = dataset.y[idx];
                let mut logits = vec![0.0f32; classes];
                for c in 0..classes {
                    let base = c * dim;
                    let mut sum = bias[c];
                    for i in 0..dim {
                        sum += weights[base + i] * x[i];
                    }
                    logits[c] = sum;
                }
                let probs = softmax(&logits);
                for c in 0..classes {
                    let diff = probs[c] - if c == y { 1.0 } else { 0.0 };
                    let base = c * dim;
                    for i in 0..dim {
                        grad_w[base + i] += diff * x[i];
                    }
                    grad_b[c] += diff;
                }
            }
            let inv = 1.0 / chunk.len() as f32;
            for c in 0..classes {
                let base = c * dim;
                for i in 0..dim {
                    let idx = base + i;
                    let l2_term = l2 * weights[idx];
                    weights[idx] -= lr * (grad_w[idx] * inv + l2_term);
                }
                bias[c] -= lr * grad_b[c] * inv;
            }
        }
    }

    let model = LogRegModel {
        model_version: 1,
        feature_len_f32: dim,
        classes: dataset.classes.clone(),
        weights,
        bias,
    };
    model.validate()?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_class_dataset() -> TrainDataset {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..15 {
            let jitter = (i % 5) as f32 * 0.02;
            x.push(vec![-1.0 - jitter, 0.0]);
            y.push(0);
            x.push(vec![0.0, 1.0 + jitter]);
            y.push(1);
            x.push(vec![1.0 + jitter, 0.0]);
            y.push(2);
        }
        TrainDataset {
            feature_columns: vec!["a".into(), "b".into()],
            classes: vec!["left".into(), "up".into(), "right".into()],
            x,
            y,
        }
    }

    #[test]
    fn fits_three_separable_classes() {
        let dataset = three_class_dataset();
        let model = train_logreg(&dataset, &TrainOptions::default()).unwrap();
        for (row, &label) in dataset.x.iter().zip(dataset.y.iter()) {
            assert_eq!(model.predict_class_index(row), label);
        }
    }

    #[test]
    fn rejects_empty_dataset() {
        let dataset = TrainDataset {
            feature_columns: vec!["a".into()],
            classes: vec!["x".into(), "y".into()],
            x: Vec::new(),
            y: Vec::new(),
        };
        assert!(train_logreg(&dataset, &TrainOptions::default()).is_err());
    }

    #[test]
    fn same_seed_is_deterministic() {
        let dataset = three_class_dataset();
        let a = train_logreg(&dataset, &TrainOptions::default()).unwrap();
        let b = train_logreg(&dataset, &TrainOptions::default()).unwrap();
        assert_eq!(a.weights, b.weights);
        assert_eq!(a.bias, b.bias);
    }
}
