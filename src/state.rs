use crate::data::loader::Artifacts;
use crate::data::model::{Measurements, PredictionResult};
use crate::inference;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// What the result area shows after the last button press.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Prediction(PredictionResult),
    /// Inference failed; the message is shown in an error banner.
    Failed(String),
}

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current form values.
    pub measurements: Measurements,

    /// Result of the last prediction, cleared as soon as an input changes.
    pub outcome: Option<Outcome>,
}

impl AppState {
    /// Run the pipeline on the current inputs and store the outcome.
    pub fn run_prediction(&mut self, artifacts: &Artifacts) {
        let outcome = match inference::predict(artifacts, &self.measurements) {
            Ok(result) => {
                log::info!(
                    "Predicted quality {} (confidence {:?})",
                    result.label,
                    result.confidence
                );
                Outcome::Prediction(result)
            }
            Err(e) => {
                log::error!("Prediction failed: {e}");
                Outcome::Failed(format!("Prediction failed: {e}"))
            }
        };
        self.outcome = Some(outcome);
    }

    /// Any edit invalidates the shown result.
    pub fn inputs_changed(&mut self) {
        self.outcome = None;
    }
}
