use eframe::egui::{self, RichText, Ui};

use crate::data::model::{Feature, Measurements};

// ---------------------------------------------------------------------------
// Measurement inputs
// ---------------------------------------------------------------------------

/// One numeric field per feature. Returns `true` if any value was edited.
///
/// Fields are unbounded: negative values are passed on as typed.
pub fn measurement_inputs(ui: &mut Ui, measurements: &mut Measurements) -> bool {
    let mut changed = false;

    egui::Grid::new("measurements")
        .num_columns(2)
        .spacing([24.0, 10.0])
        .show(ui, |ui: &mut Ui| {
            for feature in Feature::ALL {
                ui.label(RichText::new(feature.label()).strong());
                let response = ui.add(
                    egui::DragValue::new(measurements.get_mut(feature))
                        .speed(drag_speed(feature))
                        .min_decimals(2)
                        .max_decimals(5),
                );
                changed |= response.changed();
                ui.end_row();
            }
        });

    changed
}

/// Drag step per pixel, sized to each measurement's usual magnitude.
pub fn drag_speed(feature: Feature) -> f64 {
    match feature {
        Feature::FreeSulfurDioxide | Feature::TotalSulfurDioxide => 1.0,
        Feature::FixedAcidity | Feature::ResidualSugar | Feature::Alcohol => 0.1,
        Feature::VolatileAcidity | Feature::CitricAcid | Feature::Ph | Feature::Sulphates => 0.01,
        Feature::Chlorides => 0.001,
        Feature::Density => 0.0001,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sulfur_fields_drag_in_whole_units() {
        assert_eq!(drag_speed(Feature::FreeSulfurDioxide), 1.0);
        assert_eq!(drag_speed(Feature::TotalSulfurDioxide), 1.0);
    }

    #[test]
    fn density_drags_finer_than_its_spread() {
        assert!(drag_speed(Feature::Density) < 0.001);
        assert!(drag_speed(Feature::Chlorides) < drag_speed(Feature::Ph));
    }

    #[test]
    fn speeds_are_not_uniform() {
        let fastest = Feature::ALL.map(drag_speed).into_iter().fold(f64::MIN, f64::max);
        let slowest = Feature::ALL.map(drag_speed).into_iter().fold(f64::MAX, f64::min);
        assert!(fastest / slowest >= 1e4);
    }
}
