//! Persisted training artifacts.
//!
//! Exactly four artifacts, one JSON file each: the selected model, the
//! fitted scaler, the fitted label mapping, and the exact ordered list of
//! feature-column names used at training time. They are written once by the
//! training stage and treated as read-only, versionless singletons by the
//! inference stage.

use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::features::{LabelMapping, Scaler};
use crate::ml::Classifier;

/// Default artifact directory name, relative to the data directory.
pub const ARTIFACTS_DIR_NAME: &str = "artifacts";

/// Serialized model file name.
pub const MODEL_FILE: &str = "condition_model.json";
/// Serialized scaler file name.
pub const SCALER_FILE: &str = "scaler.json";
/// Serialized label mapping file name.
pub const LABEL_MAPPING_FILE: &str = "label_mapping.json";
/// Serialized feature-column order file name.
pub const FEATURE_COLUMNS_FILE: &str = "feature_columns.json";

/// Errors raised while saving or loading artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// A required artifact file does not exist; the consumer must halt.
    #[error("Missing artifact file: {path}")]
    Missing { path: PathBuf },
    /// Filesystem failure while reading or writing an artifact.
    #[error("Failed to access artifact {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// An artifact file exists but does not parse.
    #[error("Failed to parse artifact {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A loaded artifact fails its structural validation.
    #[error("Invalid artifact: {0}")]
    Invalid(String),
}

/// The four artifacts, together.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    /// Selected trained model.
    pub model: Classifier,
    /// Fitted scaler parameters.
    pub scaler: Scaler,
    /// Fitted target label mapping.
    pub labels: LabelMapping,
    /// Exact ordered feature-column names from training.
    pub feature_columns: Vec<String>,
}

/// Reads and writes the artifact files within one directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `dir`. Nothing is touched until save/load.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the artifact files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of one artifact file by name.
    pub fn path_of(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Write all four artifacts, creating the directory if needed.
    pub fn save(&self, bundle: &ArtifactBundle) -> Result<(), ArtifactError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ArtifactError::Io {
            path: self.dir.clone(),
            source,
        })?;
        self.write_json(MODEL_FILE, &bundle.model)?;
        self.write_json(SCALER_FILE, &bundle.scaler)?;
        self.write_json(LABEL_MAPPING_FILE, &bundle.labels)?;
        self.write_json(FEATURE_COLUMNS_FILE, &bundle.feature_columns)?;
        Ok(())
    }

    /// Load all four artifacts, validating the model and scaler.
    ///
    /// Fails with [`ArtifactError::Missing`] on the first absent file; the
    /// caller must halt rather than proceed with defaults.
    pub fn load(&self) -> Result<ArtifactBundle, ArtifactError> {
        let model: Classifier = self.read_json(MODEL_FILE)?;
        let scaler: Scaler = self.read_json(SCALER_FILE)?;
        let labels: LabelMapping = self.read_json(LABEL_MAPPING_FILE)?;
        let feature_columns: Vec<String> = self.read_json(FEATURE_COLUMNS_FILE)?;

        model.validate().map_err(ArtifactError::Invalid)?;
        scaler.validate().map_err(ArtifactError::Invalid)?;
        if feature_columns.is_empty() {
            return Err(ArtifactError::Invalid(
                "feature column list is empty".to_string(),
            ));
        }
        if labels.classes.len() != model.classes().len() {
            return Err(ArtifactError::Invalid(format!(
                "label mapping has {} classes but the model has {}",
                labels.classes.len(),
                model.classes().len()
            )));
        }

        Ok(ArtifactBundle {
            model,
            scaler,
            labels,
            feature_columns,
        })
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<(), ArtifactError> {
        let path = self.path_of(file);
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| ArtifactError::Json {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, bytes).map_err(|source| ArtifactError::Io { path, source })
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T, ArtifactError> {
        let path = self.path_of(file);
        if !path.is_file() {
            return Err(ArtifactError::Missing { path });
        }
        let bytes = std::fs::read(&path).map_err(|source| ArtifactError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Json { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::LogRegModel;
    use tempfile::tempdir;

    fn bundle() -> ArtifactBundle {
        let feature_columns = vec!["a".to_string(), "b".to_string()];
        ArtifactBundle {
            model: Classifier::LogisticRegression(LogRegModel {
                model_version: 1,
                feature_len_f32: 2,
                classes: vec!["Critical".into(), "Normal".into()],
                weights: vec![0.0; 4],
                bias: vec![0.0; 2],
            }),
            scaler: Scaler {
                columns: vec!["a".to_string()],
                means: vec![0.0],
                stds: vec![1.0],
            },
            labels: LabelMapping {
                classes: vec!["Critical".into(), "Normal".into()],
            },
            feature_columns,
        }
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("artifacts"));
        store.save(&bundle()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.feature_columns, vec!["a", "b"]);
        assert_eq!(loaded.labels.classes, vec!["Critical", "Normal"]);
        assert_eq!(loaded.model.name(), "Logistic Regression");
    }

    #[test]
    fn each_missing_file_is_reported_by_path() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.save(&bundle()).unwrap();

        for file in [MODEL_FILE, SCALER_FILE, LABEL_MAPPING_FILE, FEATURE_COLUMNS_FILE] {
            let victim = store.path_of(file);
            std::fs::remove_file(&victim).unwrap();
            match store.load() {
                Err(ArtifactError::Missing { path }) => assert_eq!(path, victim),
                other => panic!("expected Missing for {file}, got {other:?}"),
            }
            store.save(&bundle()).unwrap();
        }
    }

    #[test]
    fn label_model_class_mismatch_is_invalid() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let mut broken = bundle();
        broken.labels.classes.push("Moderate".into());
        store.save(&broken).unwrap();
        assert!(matches!(store.load(), Err(ArtifactError::Invalid(_))));
    }
}
