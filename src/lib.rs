//! Library exports for the training pipeline, artifact store, and egui form.
/// Application directory helpers.
pub mod app_dirs;
/// Tracing/logging setup.
pub mod logging;
/// Pipeline dataset loading.
pub mod dataset;
/// Feature encoding, scaling, and splitting.
pub mod features;
/// Classifiers, trainers, and evaluation metrics.
pub mod ml;
/// Illustrative degradation formula for derived features.
pub mod degradation;
/// Persisted training artifacts.
pub mod artifacts;
/// Offline training orchestration.
pub mod training;
/// Shared egui UI modules.
pub mod egui_app;
