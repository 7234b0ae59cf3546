use eframe::egui::{self, Color32, RichText, Ui};

use super::theme;
use crate::color::QualityPalette;
use crate::data::model::ClassLabel;
use crate::state::Outcome;

// ---------------------------------------------------------------------------
// Result banners
// ---------------------------------------------------------------------------

/// Render the last outcome: the predicted label, then the confidence when the
/// classifier reports one, or an error banner.
pub fn outcome_banners(ui: &mut Ui, outcome: &Outcome, palette: &QualityPalette) {
    match outcome {
        Outcome::Prediction(result) => {
            banner(ui, palette.color_for(&result.label), |ui: &mut Ui| {
                ui.label(
                    RichText::new(prediction_text(&result.label))
                        .strong()
                        .size(18.0)
                        .color(theme::SUCCESS_TEXT),
                );
            });
            if let Some(confidence) = result.confidence {
                ui.add_space(6.0);
                banner(ui, theme::INFO_FILL, |ui: &mut Ui| {
                    ui.label(RichText::new(confidence_text(confidence)).strong());
                });
            }
        }
        Outcome::Failed(message) => {
            banner(ui, theme::ERROR_FILL, |ui: &mut Ui| {
                ui.label(RichText::new(message).strong());
            });
        }
    }
}

fn banner(ui: &mut Ui, fill: Color32, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::default()
        .fill(fill)
        .inner_margin(10.0)
        .corner_radius(8.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            add_contents(ui);
        });
}

pub fn prediction_text(label: &ClassLabel) -> String {
    format!("🍷 Predicted Wine Quality: {label}")
}

pub fn confidence_text(confidence: f64) -> String {
    format!("Prediction Confidence: {confidence:.2}")
}
