use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::ClassLabel;

// ---------------------------------------------------------------------------
// Color ramp generator
// ---------------------------------------------------------------------------

/// Generates `n` colours running from red (worst) to green (best).
pub fn generate_ramp(n: usize) -> Vec<Color32> {
    match n {
        0 => Vec::new(),
        1 => vec![hsl_to_color32(120.0)],
        _ => (0..n)
            .map(|i| hsl_to_color32((i as f32 / (n - 1) as f32) * 120.0))
            .collect(),
    }
}

fn hsl_to_color32(hue: f32) -> Color32 {
    let hsl = Hsl::new(hue, 0.65, 0.40);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Quality palette: class label → Color32
// ---------------------------------------------------------------------------

/// Colours the predicted label according to its rank among the classifier's
/// classes (classes are stored in ascending order).
#[derive(Debug, Clone)]
pub struct QualityPalette {
    mapping: HashMap<ClassLabel, Color32>,
    default_color: Color32,
}

impl QualityPalette {
    pub fn new(classes: &[ClassLabel]) -> Self {
        let mapping = classes
            .iter()
            .cloned()
            .zip(generate_ramp(classes.len()))
            .collect();
        QualityPalette {
            mapping,
            default_color: Color32::DARK_GREEN,
        }
    }

    pub fn color_for(&self, label: &ClassLabel) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_runs_red_to_green() {
        let ramp = generate_ramp(6);
        assert_eq!(ramp.len(), 6);
        let (first, last) = (ramp[0], ramp[5]);
        assert!(first.r() > first.g());
        assert!(last.g() > last.r());
    }

    #[test]
    fn empty_and_single_ramps() {
        assert!(generate_ramp(0).is_empty());
        assert_eq!(generate_ramp(1).len(), 1);
    }

    #[test]
    fn unknown_label_gets_default() {
        let palette = QualityPalette::new(&[ClassLabel::Integer(3), ClassLabel::Integer(8)]);
        assert_ne!(
            palette.color_for(&ClassLabel::Integer(3)),
            palette.color_for(&ClassLabel::Integer(8))
        );
        assert_eq!(
            palette.color_for(&ClassLabel::Integer(42)),
            Color32::DARK_GREEN
        );
    }
}
