use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::QualityPalette;
use crate::data::classifier::Classifier;
use crate::data::loader::Artifacts;
use crate::state::AppState;
use crate::ui::background::Background;
use crate::ui::{form, result, theme};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub const TITLE: &str = "🍷 Wine Quality Prediction App";
pub const ORGANISATION: &str = "EDUNET FOUNDATION BY SAP";
pub const PROMPT: &str = "Enter wine chemical properties to predict quality";
pub const PREDICT_BUTTON: &str = "🔍 Predict Wine Quality";

pub struct WineQualityApp {
    pub state: AppState,
    artifacts: Artifacts,
    background: Background,
    palette: QualityPalette,
}

impl WineQualityApp {
    /// Artifacts and background are loaded before the window opens; this only
    /// wires them into the UI.
    pub fn new(cc: &eframe::CreationContext<'_>, artifacts: Artifacts, background: Background) -> Self {
        // Install image loaders so egui can render the background bytes.
        egui_extras::install_image_loaders(&cc.egui_ctx);
        theme::apply(&cc.egui_ctx);

        let palette = QualityPalette::new(artifacts.classifier.classes());
        Self {
            state: AppState::default(),
            artifacts,
            background,
            palette,
        }
    }

    fn page(&mut self, ui: &mut Ui) {
        ui.heading(RichText::new(TITLE).size(28.0).strong());
        ui.heading(RichText::new(ORGANISATION).size(24.0).strong());
        ui.label(PROMPT);
        ui.separator();
        ui.add_space(6.0);

        if form::measurement_inputs(ui, &mut self.state.measurements) {
            self.state.inputs_changed();
        }

        ui.add_space(12.0);
        let label = RichText::new(PREDICT_BUTTON).strong().color(Color32::WHITE);
        let button = egui::Button::new(label)
            .fill(theme::BUTTON_FILL)
            .min_size(egui::vec2(0.0, 36.0));
        if ui.add(button).clicked() {
            self.state.run_prediction(&self.artifacts);
        }

        if let Some(outcome) = &self.state.outcome {
            ui.add_space(12.0);
            result::outcome_banners(ui, outcome, &self.palette);
        }
    }
}

impl eframe::App for WineQualityApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Central panel: background + centred form card ----
        egui::CentralPanel::default()
            .frame(egui::Frame::default())
            .show(ctx, |ui: &mut Ui| {
                self.background.paint(ui, ctx.screen_rect());

                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui: &mut Ui| {
                        ui.vertical_centered(|ui: &mut Ui| {
                            ui.add_space(24.0);
                            egui::Frame::default()
                                .fill(theme::CARD_FILL)
                                .inner_margin(24.0)
                                .corner_radius(12.0)
                                .show(ui, |ui: &mut Ui| {
                                    ui.set_max_width(theme::CONTENT_WIDTH);
                                    ui.with_layout(
                                        egui::Layout::top_down(egui::Align::Min),
                                        |ui: &mut Ui| self.page(ui),
                                    );
                                });
                            ui.add_space(24.0);
                        });
                    });
            });
    }
}
