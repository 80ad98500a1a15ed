//! Shared state types for the egui inference form.

use egui::Color32;

use crate::degradation::DegradationEstimate;

/// User-adjustable pipeline parameters, with the form's default values.
#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    /// Pipe size in mm (100-2000, step 50).
    pub pipe_size_mm: f32,
    /// Initial wall thickness in mm (5.0-50.0, step 0.5).
    pub initial_thickness_mm: f32,
    /// Index into the observed material options.
    pub material_index: usize,
    /// Prediction horizon in years (0-30).
    pub years: f32,
    /// Maximum operating pressure in psi (100-3000, step 50).
    pub max_pressure_psi: f32,
    /// Operating temperature in Celsius (-10.0-100.0, step 0.5).
    pub temperature_c: f32,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            pipe_size_mm: 800.0,
            initial_thickness_mm: 15.0,
            material_index: 0,
            years: 10.0,
            max_pressure_psi: 1000.0,
            temperature_c: 25.0,
        }
    }
}

/// Stages of one prediction pass.
///
/// All transitions after `AwaitingInput` run synchronously within a single
/// submit; the phase is observable state, not a scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormPhase {
    /// Waiting for the user to adjust inputs and press predict.
    AwaitingInput,
    /// Computing the derived degradation features.
    ComputingDerivedFeatures,
    /// Building the one-row feature vector over the persisted column order.
    BuildingFeatureVector,
    /// Scaling the numerical columns with the persisted parameters.
    Scaling,
    /// Running the classifier.
    Predicting,
    /// Showing the decoded result.
    DisplayingResult,
}

/// Severity tone attached to a predicted condition label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Normal,
    Moderate,
    Critical,
}

impl StatusTone {
    /// Tone for a condition label; unknown labels render as critical.
    pub fn for_label(label: &str) -> Self {
        match label {
            "Normal" => Self::Normal,
            "Moderate" => Self::Moderate,
            _ => Self::Critical,
        }
    }

    /// Accent color used for the condition text and status badge.
    pub fn color(self) -> Color32 {
        match self {
            Self::Normal => Color32::from_rgb(0x27, 0xae, 0x60),
            Self::Moderate => Color32::from_rgb(0xf3, 0x9c, 0x12),
            Self::Critical => Color32::from_rgb(0xe7, 0x4c, 0x3c),
        }
    }
}

/// A completed prediction, ready to render.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictionView {
    /// Decoded condition label.
    pub condition: String,
    /// Severity tone for the label.
    pub tone: StatusTone,
    /// Derived degradation figures that fed the feature vector.
    pub degradation: DegradationEstimate,
    /// Per-class probabilities in label-mapping order, when available.
    pub probabilities: Option<Vec<(String, f32)>>,
    /// Headline recommendation for the predicted label.
    pub headline: String,
    /// Follow-up recommendation detail.
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_form_contract() {
        let form = FormState::default();
        assert_eq!(form.pipe_size_mm, 800.0);
        assert_eq!(form.initial_thickness_mm, 15.0);
        assert_eq!(form.material_index, 0);
        assert_eq!(form.years, 10.0);
        assert_eq!(form.max_pressure_psi, 1000.0);
        assert_eq!(form.temperature_c, 25.0);
    }

    #[test]
    fn tones_map_from_labels() {
        assert_eq!(StatusTone::for_label("Normal"), StatusTone::Normal);
        assert_eq!(StatusTone::for_label("Moderate"), StatusTone::Moderate);
        assert_eq!(StatusTone::for_label("Critical"), StatusTone::Critical);
        assert_eq!(StatusTone::for_label("???"), StatusTone::Critical);
    }
}
