//! Form controller: loads the inference session once, then turns submitted
//! form values into a decoded prediction.

use std::path::Path;

use tracing::info;

use crate::artifacts::{ARTIFACTS_DIR_NAME, ArtifactBundle, ArtifactStore};
use crate::dataset::{self, DATASET_FILE_NAME, NUMERICAL_COLUMNS};
use crate::degradation::{self, DEFAULT_CORROSION_IMPACT_PERCENT};
use crate::egui_app::state::{FormPhase, FormState, PredictionView, StatusTone};

/// Everything loaded at startup. Immutable for the app's lifetime; if any
/// piece is missing the app refuses to start instead of degrading.
#[derive(Debug, Clone)]
pub struct InferenceSession {
    /// Observed material options, in dataset order of first appearance.
    pub materials: Vec<String>,
    /// The four persisted training artifacts.
    pub bundle: ArtifactBundle,
}

impl InferenceSession {
    /// Load the dataset's material options and the artifacts from `data_dir`.
    pub fn load(data_dir: &Path) -> Result<Self, String> {
        let dataset_path = data_dir.join(DATASET_FILE_NAME);
        let records = dataset::load_records(&dataset_path).map_err(|err| err.to_string())?;
        let mut materials = Vec::new();
        for record in &records {
            if !materials.contains(&record.material) {
                materials.push(record.material.clone());
            }
        }

        let store = ArtifactStore::new(data_dir.join(ARTIFACTS_DIR_NAME));
        let bundle = store.load().map_err(|err| err.to_string())?;
        info!(
            materials = materials.len(),
            model = bundle.model.name(),
            "Inference session ready"
        );
        Ok(Self { materials, bundle })
    }
}

/// Drives the form phase machine and holds the latest result.
#[derive(Debug)]
pub struct FormController {
    session: InferenceSession,
    /// Current form inputs.
    pub form: FormState,
    /// Current phase of the submit machine.
    pub phase: FormPhase,
    /// Latest completed prediction, if any.
    pub result: Option<PredictionView>,
}

impl FormController {
    /// Build the controller by loading the session from `data_dir`.
    pub fn load(data_dir: &Path) -> Result<Self, String> {
        Ok(Self {
            session: InferenceSession::load(data_dir)?,
            form: FormState::default(),
            phase: FormPhase::AwaitingInput,
            result: None,
        })
    }

    /// Wrap an already-loaded session, used by tests.
    pub fn with_session(session: InferenceSession) -> Self {
        Self {
            session,
            form: FormState::default(),
            phase: FormPhase::AwaitingInput,
            result: None,
        }
    }

    /// Material options for the combo box.
    pub fn materials(&self) -> &[String] {
        &self.session.materials
    }

    /// Currently selected material label.
    pub fn selected_material(&self) -> &str {
        self.session
            .materials
            .get(self.form.material_index)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Name of the loaded model family, for the status bar.
    pub fn model_name(&self) -> &str {
        self.session.bundle.model.name()
    }

    /// Any input interaction drops the phase back to awaiting input.
    pub fn note_input_changed(&mut self) {
        self.phase = FormPhase::AwaitingInput;
    }

    /// Run one full prediction pass over the current form values.
    ///
    /// Every phase transition happens here, synchronously; the phase field
    /// ends at `DisplayingResult` on success.
    pub fn submit(&mut self) -> Result<(), String> {
        self.phase = FormPhase::ComputingDerivedFeatures;
        let degradation =
            degradation::estimate(self.form.years, self.form.initial_thickness_mm);

        self.phase = FormPhase::BuildingFeatureVector;
        let mut row = self.build_feature_row(&degradation)?;

        self.phase = FormPhase::Scaling;
        let columns = &self.session.bundle.feature_columns;
        self.session
            .bundle
            .scaler
            .transform_row(&mut row, columns)?;

        self.phase = FormPhase::Predicting;
        let bundle = &self.session.bundle;
        let class_index = bundle.model.predict_class_index(&row);
        let condition = bundle.labels.decode(class_index)?.to_string();
        let probabilities = bundle.model.predict_proba(&row).map(|probs| {
            bundle
                .labels
                .classes
                .iter()
                .cloned()
                .zip(probs)
                .collect::<Vec<_>>()
        });

        let tone = StatusTone::for_label(&condition);
        let (headline, detail) = recommendation(&condition);
        info!(condition, "Prediction complete");
        self.result = Some(PredictionView {
            condition,
            tone,
            degradation,
            probabilities,
            headline: headline.to_string(),
            detail: detail.to_string(),
        });
        self.phase = FormPhase::DisplayingResult;
        Ok(())
    }

    /// Build the one-row feature vector over the persisted column order.
    ///
    /// Starts all-zero, fills the eight numericals by name, then sets at
    /// most one material indicator. Selecting the dropped baseline leaves
    /// every indicator at zero, as does a material whose indicator column
    /// was never persisted. Grade indicators always stay zero because the
    /// form does not collect a grade.
    fn build_feature_row(
        &self,
        degradation: &crate::degradation::DegradationEstimate,
    ) -> Result<Vec<f32>, String> {
        let columns = &self.session.bundle.feature_columns;
        let mut row = vec![0.0f32; columns.len()];

        let values = [
            self.form.pipe_size_mm,
            self.form.initial_thickness_mm,
            self.form.max_pressure_psi,
            self.form.temperature_c,
            DEFAULT_CORROSION_IMPACT_PERCENT,
            degradation.thickness_loss_mm,
            degradation.material_loss_percent,
            self.form.years,
        ];
        for (name, value) in NUMERICAL_COLUMNS.iter().zip(values) {
            let idx = columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| format!("Persisted columns are missing {name}"))?;
            row[idx] = value;
        }

        let indicator = format!("Material_{}", self.selected_material());
        if let Some(idx) = columns.iter().position(|c| *c == indicator) {
            row[idx] = 1.0;
        }

        Ok(row)
    }
}

/// Fixed recommendation text keyed by the predicted condition label.
pub fn recommendation(condition: &str) -> (&'static str, &'static str) {
    match condition {
        "Critical" => (
            "Urgent action required. This pipeline segment is in a CRITICAL \
             condition. Immediate inspection and potential replacement or major \
             repair are highly recommended to prevent failure and ensure safety.",
            "Consider scheduling emergency maintenance and re-routing if \
             possible. Further investigation (e.g. in-line inspection, NDT) is \
             crucial.",
        ),
        "Moderate" => (
            "Attention needed. This pipeline segment is in a MODERATE \
             condition. Regular monitoring should be intensified, and a \
             detailed inspection within the next 6-12 months is advised to \
             assess the degradation rate and plan for future maintenance.",
            "Prioritize this segment for upcoming routine inspections. Evaluate \
             whether operational adjustments can mitigate further degradation.",
        ),
        _ => (
            "Good condition. This pipeline segment is in a NORMAL condition. \
             Continue with routine monitoring and scheduled maintenance as per \
             your standard integrity management program.",
            "While currently stable, continuous monitoring and adherence to \
             maintenance schedules are important to prevent future issues.",
        ),
    }
}
