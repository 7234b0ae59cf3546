use eframe::egui::{self, Color32};

/// Fill of the predict button.
pub const BUTTON_FILL: Color32 = Color32::from_rgb(0x8B, 0x00, 0x00);

/// Translucent card drawn behind the form so it stays readable over the image.
pub const CARD_FILL: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 150);

/// Near-opaque white behind editable fields (85% alpha, premultiplied).
pub const INPUT_FILL: Color32 = Color32::from_rgba_premultiplied(217, 217, 217, 217);
pub const INPUT_HOVER_FILL: Color32 = Color32::WHITE;
pub const INPUT_TEXT: Color32 = Color32::from_gray(20);

pub const SUCCESS_TEXT: Color32 = Color32::WHITE;
pub const INFO_FILL: Color32 = Color32::from_rgb(0x1C, 0x4E, 0x80);
pub const ERROR_FILL: Color32 = Color32::from_rgb(0x9B, 0x1C, 0x1C);

/// Width of the centred content column.
pub const CONTENT_WIDTH: f32 = 640.0;

/// White labels over the dark card, light input fields with dark text.
pub fn apply(ctx: &egui::Context) {
    ctx.style_mut(|style| {
        let visuals = &mut style.visuals;
        visuals.panel_fill = Color32::TRANSPARENT;
        visuals.extreme_bg_color = INPUT_FILL;
        visuals.widgets.noninteractive.fg_stroke.color = Color32::WHITE;

        // `active` keeps the dark theme's white text: egui draws strong
        // labels and headings in that colour.
        let widgets = &mut visuals.widgets;
        for (state, fill) in [
            (&mut widgets.inactive, INPUT_FILL),
            (&mut widgets.hovered, INPUT_HOVER_FILL),
        ] {
            state.bg_fill = fill;
            state.weak_bg_fill = fill;
            state.fg_stroke.color = INPUT_TEXT;
            state.corner_radius = egui::CornerRadius::same(8);
        }
        widgets.active.fg_stroke.color = Color32::WHITE;
    });
}
