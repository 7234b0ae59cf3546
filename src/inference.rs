use crate::data::classifier::{argmax, Classifier, LoadedClassifier};
use crate::data::loader::Artifacts;
use crate::data::model::{FeatureRecord, Measurements, PredictionResult, ScaledVector};
use crate::error::InferenceError;

// ---------------------------------------------------------------------------
// Inference pipeline
// ---------------------------------------------------------------------------

/// Run the full pipeline on raw form values: log1p the skewed columns,
/// scale, classify.
pub fn predict(
    artifacts: &Artifacts,
    measurements: &Measurements,
) -> Result<PredictionResult, InferenceError> {
    let record = FeatureRecord::from_measurements(measurements);
    predict_record(artifacts, &record)
}

/// Run the pipeline on an already-preprocessed record.
pub fn predict_record(
    artifacts: &Artifacts,
    record: &FeatureRecord,
) -> Result<PredictionResult, InferenceError> {
    let scaled = scale(artifacts, record)?;

    let result = match &artifacts.classifier {
        LoadedClassifier::WithConfidence(model) => {
            let label = model.predict(&scaled)?;
            let proba = model.predict_proba(&scaled)?;
            let confidence = proba[argmax(&proba)];
            PredictionResult {
                label,
                confidence: Some(confidence),
            }
        }
        LoadedClassifier::LabelOnly(model) => PredictionResult {
            label: model.predict(&scaled)?,
            confidence: None,
        },
    };

    log::debug!(
        "Predicted {} (confidence {:?}) from {scaled:?}",
        result.label,
        result.confidence
    );
    Ok(result)
}

/// Scaling step. Besides the scaler's own column checks this is where a
/// scaler/classifier pair of different widths is caught.
pub fn scale(artifacts: &Artifacts, record: &FeatureRecord) -> Result<ScaledVector, InferenceError> {
    let scaled = artifacts.scaler.transform(record)?;
    let expected = artifacts.classifier.n_features();
    if scaled.len() != expected {
        return Err(InferenceError::WidthMismatch {
            scaled: scaled.len(),
            expected,
        });
    }
    Ok(scaled)
}
