//! egui renderer for the inference form.

use eframe::egui::{self, Color32, Frame, Margin, RichText, Ui, Vec2};

use crate::egui_app::controller::FormController;
use crate::egui_app::state::FormPhase;

/// Minimum window size for the form layout.
pub const MIN_VIEWPORT_SIZE: Vec2 = Vec2::new(760.0, 520.0);

/// Renders the form UI using the shared controller state.
pub struct PipesightApp {
    controller: FormController,
    visuals_set: bool,
}

impl PipesightApp {
    /// Create the app around an already-loaded controller.
    pub fn new(controller: FormController) -> Self {
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = Color32::from_rgb(12, 12, 12);
        visuals.panel_fill = Color32::from_rgb(16, 16, 16);
        visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(16, 16, 16);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_parameters(&mut self, ui: &mut Ui) {
        ui.heading("Pipeline Parameters");
        ui.label("Adjust the values below to simulate different pipeline scenarios.");
        ui.add_space(8.0);

        let form = &mut self.controller.form;
        let mut changed = false;

        changed |= ui
            .add(
                egui::Slider::new(&mut form.pipe_size_mm, 100.0..=2000.0)
                    .step_by(50.0)
                    .text("Pipe Size (mm)"),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut form.initial_thickness_mm, 5.0..=50.0)
                    .step_by(0.5)
                    .text("Initial Thickness (mm)"),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut form.years, 0.0..=30.0)
                    .step_by(1.0)
                    .text("Years to predict"),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut form.max_pressure_psi, 100.0..=3000.0)
                    .step_by(50.0)
                    .text("Max Pressure (psi)"),
            )
            .changed();
        changed |= ui
            .add(
                egui::Slider::new(&mut form.temperature_c, -10.0..=100.0)
                    .step_by(0.5)
                    .text("Temperature (°C)"),
            )
            .changed();

        ui.add_space(4.0);
        let materials = self.controller.materials().to_vec();
        let mut material_index = self.controller.form.material_index;
        egui::ComboBox::from_label("Material")
            .selected_text(
                materials
                    .get(material_index)
                    .map(String::as_str)
                    .unwrap_or(""),
            )
            .show_ui(ui, |ui| {
                for (index, material) in materials.iter().enumerate() {
                    if ui
                        .selectable_value(&mut material_index, index, material)
                        .changed()
                    {
                        changed = true;
                    }
                }
            });
        self.controller.form.material_index = material_index;

        if changed {
            self.controller.note_input_changed();
        }

        ui.add_space(12.0);
        if ui.button("Predict Pipeline Integrity").clicked() {
            if let Err(err) = self.controller.submit() {
                tracing::error!(error = err, "Prediction failed");
            }
        }
    }

    fn render_result(&mut self, ui: &mut Ui) {
        ui.heading("Pipeline Integrity Prediction");
        ui.add_space(8.0);

        let Some(result) = self.controller.result.clone() else {
            ui.label("Set the pipeline parameters and press predict.");
            return;
        };

        ui.label(RichText::new("Derived Degradation Metrics").strong());
        ui.label(format!(
            "Predicted thickness loss: {:.2} mm",
            result.degradation.thickness_loss_mm
        ));
        ui.label(format!(
            "Predicted material loss: {:.2}%",
            result.degradation.material_loss_percent
        ));
        ui.add_space(12.0);

        Frame::new()
            .fill(Color32::from_rgb(24, 24, 24))
            .inner_margin(Margin::same(12))
            .show(ui, |ui| {
                ui.label(RichText::new("Predicted Condition").strong());
                ui.label(
                    RichText::new(&result.condition)
                        .size(28.0)
                        .color(result.tone.color()),
                );
            });

        if let Some(probabilities) = &result.probabilities {
            ui.add_space(8.0);
            ui.label(RichText::new("Class probabilities").strong());
            for (label, p) in probabilities {
                ui.label(format!("{label}: {:.1}%", p * 100.0));
            }
        }

        ui.add_space(12.0);
        ui.label(RichText::new("Next Steps & Recommendations").strong());
        ui.label(RichText::new(&result.headline).color(result.tone.color()));
        ui.label(&result.detail);
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(Frame::new().fill(Color32::from_rgb(0, 0, 0)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    ui.label(RichText::new(phase_label(self.controller.phase)).color(Color32::WHITE));
                    ui.separator();
                    ui.label(
                        RichText::new(format!("Model: {}", self.controller.model_name()))
                            .color(Color32::WHITE),
                    );
                });
            });
    }
}

fn phase_label(phase: FormPhase) -> &'static str {
    match phase {
        FormPhase::AwaitingInput => "Awaiting input",
        FormPhase::ComputingDerivedFeatures => "Computing derived features",
        FormPhase::BuildingFeatureVector => "Building feature vector",
        FormPhase::Scaling => "Scaling",
        FormPhase::Predicting => "Predicting",
        FormPhase::DisplayingResult => "Showing result",
    }
}

impl eframe::App for PipesightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.render_status(ctx);
        egui::SidePanel::left("parameters")
            .min_width(300.0)
            .show(ctx, |ui| {
                self.render_parameters(ui);
            });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_result(ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_phase_has_a_label() {
        for phase in [
            FormPhase::AwaitingInput,
            FormPhase::ComputingDerivedFeatures,
            FormPhase::BuildingFeatureVector,
            FormPhase::Scaling,
            FormPhase::Predicting,
            FormPhase::DisplayingResult,
        ] {
            assert!(!phase_label(phase).is_empty());
        }
    }
}
