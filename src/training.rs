//! Offline training pipeline: load, encode, split, scale, fit, evaluate,
//! select, persist.
//!
//! The whole stage is a single linear batch job. It lives in the library so
//! the `pipesight-train` binary and the integration tests share one code
//! path.

use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::artifacts::{ArtifactBundle, ArtifactError, ArtifactStore};
use crate::dataset::{self, DatasetError, NUMERICAL_COLUMNS};
use crate::features::{FeatureEncoder, LabelMapping, Scaler, SplitOptions, stratified_split};
use crate::ml::metrics::{ConfusionMatrix, RocCurve, accuracy, roc_curve, weighted_precision};
use crate::ml::{Classifier, TrainDataset, forest, logreg, svm};

/// Configuration for one training run.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Path to the dataset CSV.
    pub dataset_path: PathBuf,
    /// Directory receiving the four artifact files.
    pub artifacts_dir: PathBuf,
    /// Seed shared by the splitter and every trainer.
    pub seed: u64,
    /// Fraction of rows held out for testing.
    pub test_ratio: f32,
    /// Random forest size.
    pub trees: usize,
    /// SGD epochs for the SVC and logistic regression trainers.
    pub epochs: usize,
}

impl TrainingConfig {
    /// Defaults matching the documented pipeline contract.
    pub fn new(dataset_path: PathBuf, artifacts_dir: PathBuf) -> Self {
        Self {
            dataset_path,
            artifacts_dir,
            seed: 42,
            test_ratio: 0.3,
            trees: 100,
            epochs: 200,
        }
    }
}

/// Errors raised by the training stage.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// Dataset could not be loaded.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// Artifacts could not be written.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    /// Preprocessing or model fitting failed.
    #[error("Training pipeline error: {0}")]
    Pipeline(String),
}

/// Evaluation results for one candidate model.
#[derive(Debug, Clone)]
pub struct ModelReport {
    /// Family name ("Random Forest", "SVC", "Logistic Regression").
    pub name: String,
    /// Test-set accuracy.
    pub accuracy: f32,
    /// Test-set precision weighted by class support.
    pub weighted_precision: f32,
    /// Test-set confusion matrix (rows = truth).
    pub confusion: ConfusionMatrix,
    /// One-vs-rest ROC curves per class; `None` when the model has no
    /// probability output, empty entries skipped for degenerate classes.
    pub roc: Option<Vec<RocCurve>>,
}

/// Summary of a completed training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Per-model evaluation, in declaration order.
    pub models: Vec<ModelReport>,
    /// Family name of the selected model.
    pub selected: String,
    /// Ordered class labels.
    pub classes: Vec<String>,
    /// Persisted feature-column order.
    pub feature_columns: Vec<String>,
    /// Rows in the training split.
    pub train_rows: usize,
    /// Rows in the test split.
    pub test_rows: usize,
    /// Directory the artifacts were written to.
    pub artifacts_dir: PathBuf,
}

/// Run the full offline training pipeline and persist the artifacts.
pub fn run_training(config: &TrainingConfig) -> Result<TrainingReport, TrainingError> {
    let records = dataset::load_records(&config.dataset_path)?;
    info!(rows = records.len(), "Dataset loaded");

    let encoder = FeatureEncoder::fit(&records).map_err(TrainingError::Pipeline)?;
    let labels = LabelMapping::fit(&records).map_err(TrainingError::Pipeline)?;
    let feature_columns = encoder.feature_columns();

    let mut x: Vec<Vec<f32>> = Vec::with_capacity(records.len());
    let mut y: Vec<usize> = Vec::with_capacity(records.len());
    for record in &records {
        x.push(encoder.encode_record(record));
        y.push(
            labels
                .encode(&record.condition)
                .map_err(TrainingError::Pipeline)?,
        );
    }

    let split_options = SplitOptions {
        test_ratio: config.test_ratio,
        seed: config.seed,
    };
    let (train_idx, test_idx) =
        stratified_split(&y, &split_options).map_err(TrainingError::Pipeline)?;
    if test_idx.is_empty() {
        return Err(TrainingError::Pipeline(
            "Test split is empty; dataset too small for the requested ratio".to_string(),
        ));
    }
    info!(
        train = train_idx.len(),
        test = test_idx.len(),
        "Stratified split complete"
    );

    let mut train_x: Vec<Vec<f32>> = train_idx.iter().map(|&i| x[i].clone()).collect();
    let train_y: Vec<usize> = train_idx.iter().map(|&i| y[i]).collect();
    let mut test_x: Vec<Vec<f32>> = test_idx.iter().map(|&i| x[i].clone()).collect();
    let test_y: Vec<usize> = test_idx.iter().map(|&i| y[i]).collect();

    // Scaler statistics come from the training split only; the test split
    // and every future inference row reuse the same parameters.
    let numerical: Vec<String> = NUMERICAL_COLUMNS.iter().map(|c| c.to_string()).collect();
    let scaler =
        Scaler::fit(&numerical, &train_x, &feature_columns).map_err(TrainingError::Pipeline)?;
    scaler
        .transform_rows(&mut train_x, &feature_columns)
        .map_err(TrainingError::Pipeline)?;
    scaler
        .transform_rows(&mut test_x, &feature_columns)
        .map_err(TrainingError::Pipeline)?;

    let train = TrainDataset {
        feature_columns: feature_columns.clone(),
        classes: labels.classes.clone(),
        x: train_x,
        y: train_y,
    };

    // All three candidates see the identical encoded/scaled matrix.
    info!(trees = config.trees, "Training random forest");
    let forest_model = forest::train_forest(
        &train,
        &forest::TrainOptions {
            trees: config.trees,
            seed: config.seed,
            ..forest::TrainOptions::default()
        },
    )
    .map_err(TrainingError::Pipeline)?;

    info!(epochs = config.epochs, "Training linear SVC");
    let svm_model = svm::train_svm(
        &train,
        &svm::TrainOptions {
            epochs: config.epochs,
            seed: config.seed,
            ..svm::TrainOptions::default()
        },
    )
    .map_err(TrainingError::Pipeline)?;

    info!(epochs = config.epochs, "Training logistic regression");
    let logreg_model = logreg::train_logreg(
        &train,
        &logreg::TrainOptions {
            epochs: config.epochs,
            seed: config.seed,
            ..logreg::TrainOptions::default()
        },
    )
    .map_err(TrainingError::Pipeline)?;

    let candidates = vec![
        Classifier::RandomForest(forest_model),
        Classifier::LinearSvc(svm_model),
        Classifier::LogisticRegression(logreg_model),
    ];

    let mut reports = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        let report = evaluate(candidate, &test_x, &test_y, &labels.classes);
        info!(
            model = report.name,
            accuracy = report.accuracy,
            precision = report.weighted_precision,
            "Evaluated candidate"
        );
        reports.push(report);
    }

    // Argmax test accuracy; strict comparison means ties fall to the
    // earliest declared candidate (forest, svc, logreg).
    let mut best = 0usize;
    for (idx, report) in reports.iter().enumerate() {
        if report.accuracy > reports[best].accuracy {
            best = idx;
        }
    }
    let selected = reports[best].name.clone();
    info!(
        model = selected,
        accuracy = reports[best].accuracy,
        "Selected best model"
    );

    let model = candidates
        .into_iter()
        .nth(best)
        .ok_or_else(|| TrainingError::Pipeline("Model selection index out of range".to_string()))?;

    let store = ArtifactStore::new(&config.artifacts_dir);
    store.save(&ArtifactBundle {
        model,
        scaler,
        labels: labels.clone(),
        feature_columns: feature_columns.clone(),
    })?;
    info!(dir = %config.artifacts_dir.display(), "Artifacts written");

    Ok(TrainingReport {
        models: reports,
        selected,
        classes: labels.classes,
        feature_columns,
        train_rows: train_idx.len(),
        test_rows: test_idx.len(),
        artifacts_dir: config.artifacts_dir.clone(),
    })
}

/// Evaluate one candidate on the held-out test split.
pub fn evaluate(
    model: &Classifier,
    test_x: &[Vec<f32>],
    test_y: &[usize],
    classes: &[String],
) -> ModelReport {
    let mut confusion = ConfusionMatrix::new(classes.len());
    for (row, &truth) in test_x.iter().zip(test_y.iter()) {
        confusion.add(truth, model.predict_class_index(row));
    }

    let roc = test_x
        .first()
        .and_then(|row| model.predict_proba(row))
        .map(|_| {
            let proba: Vec<Vec<f32>> = test_x
                .iter()
                .map(|row| model.predict_proba(row).unwrap_or_default())
                .collect();
            let mut curves = Vec::new();
            for (class_idx, class) in classes.iter().enumerate() {
                let scores: Vec<f32> = proba
                    .iter()
                    .map(|p| p.get(class_idx).copied().unwrap_or(0.0))
                    .collect();
                if let Some(curve) = roc_curve(test_y, &scores, class_idx, class) {
                    curves.push(curve);
                }
            }
            curves
        });

    ModelReport {
        name: model.name().to_string(),
        accuracy: accuracy(&confusion),
        weighted_precision: weighted_precision(&confusion),
        confusion,
        roc,
    }
}
