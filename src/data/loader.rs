use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::classifier::{
    Classifier, DecisionTree, LinearModel, LinearSvc, LoadedClassifier, LogisticRegression,
    RandomForest,
};
use super::scaler::StandardScaler;
use crate::error::ArtifactLoadError;

/// Value of the `format` field every artifact carries.
pub const ARTIFACT_FORMAT: &str = "wine-quality-artifact";

/// The only envelope version this build understands.
pub const ARTIFACT_VERSION: u64 = 1;

/// `kind`s accepted by [`load_scaler`].
const SCALER_KINDS: &[&str] = &["standard_scaler"];

/// `kind`s accepted by [`load_classifier`].
const CLASSIFIER_KINDS: &[&str] = &[
    "random_forest",
    "decision_tree",
    "logistic_regression",
    "linear_svc",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// The fitted scaler/classifier pair. Built once at startup and only ever
/// borrowed afterwards.
#[derive(Debug)]
pub struct Artifacts {
    pub scaler: StandardScaler,
    pub classifier: LoadedClassifier,
}

impl Artifacts {
    /// Load both artifacts from disk.
    ///
    /// A pair that disagrees on feature count is still returned; the mismatch
    /// is logged here and reported by the pipeline on first use.
    pub fn load(scaler_path: &Path, classifier_path: &Path) -> Result<Self, ArtifactLoadError> {
        let scaler = load_scaler(scaler_path)?;
        let classifier = load_classifier(classifier_path)?;

        if scaler.n_features() != classifier.n_features() {
            log::warn!(
                "Scaler {} was fitted on {} columns but classifier {} expects {}",
                scaler_path.display(),
                scaler.n_features(),
                classifier_path.display(),
                classifier.n_features()
            );
        }

        Ok(Artifacts { scaler, classifier })
    }
}

/// Load a fitted standard scaler.
///
/// Expected layout:
///
/// ```json
/// {
///   "format": "wine-quality-artifact",
///   "version": 1,
///   "kind": "standard_scaler",
///   "feature_names": ["fixed acidity", ...],
///   "mean": [8.32, ...],
///   "scale": [1.74, ...]
/// }
/// ```
pub fn load_scaler(path: &Path) -> Result<StandardScaler, ArtifactLoadError> {
    let artifact: ScalerArtifact = read_artifact(path, SCALER_KINDS)?;
    let ScalerArtifact::StandardScaler(scaler) = artifact;
    scaler.validate().map_err(|reason| invalid(path, reason))?;

    log::info!(
        "Loaded standard scaler from {} ({} columns)",
        path.display(),
        scaler.n_features()
    );
    Ok(scaler)
}

/// Load a fitted classifier and decide, once, whether it can report
/// class probabilities.
///
/// Supported `kind`s: `random_forest`, `decision_tree`, `logistic_regression`
/// (all with confidence) and `linear_svc` (label only).
pub fn load_classifier(path: &Path) -> Result<LoadedClassifier, ArtifactLoadError> {
    let artifact: ClassifierArtifact = read_artifact(path, CLASSIFIER_KINDS)?;

    let classifier = match artifact {
        ClassifierArtifact::RandomForest(m) => {
            m.validate().map_err(|reason| invalid(path, reason))?;
            LoadedClassifier::WithConfidence(Box::new(m))
        }
        ClassifierArtifact::DecisionTree(m) => {
            m.validate().map_err(|reason| invalid(path, reason))?;
            LoadedClassifier::WithConfidence(Box::new(m))
        }
        ClassifierArtifact::LogisticRegression(m) => {
            m.validate().map_err(|reason| invalid(path, reason))?;
            LoadedClassifier::WithConfidence(Box::new(LogisticRegression(m)))
        }
        ClassifierArtifact::LinearSvc(m) => {
            m.validate().map_err(|reason| invalid(path, reason))?;
            LoadedClassifier::LabelOnly(Box::new(LinearSvc(m)))
        }
    };

    log::info!(
        "Loaded {} classifier from {} ({} features, {} classes, confidence: {})",
        classifier.kind(),
        path.display(),
        classifier.n_features(),
        classifier.classes().len(),
        classifier.supports_confidence()
    );
    Ok(classifier)
}

// ---------------------------------------------------------------------------
// Artifact payloads
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ScalerArtifact {
    StandardScaler(StandardScaler),
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ClassifierArtifact {
    RandomForest(RandomForest),
    DecisionTree(DecisionTree),
    LogisticRegression(LinearModel),
    LinearSvc(LinearModel),
}

// ---------------------------------------------------------------------------
// Envelope handling
// ---------------------------------------------------------------------------

/// Read the file, check the envelope and `kind`, then decode the typed payload.
fn read_artifact<T: DeserializeOwned>(
    path: &Path,
    kinds: &[&str],
) -> Result<T, ArtifactLoadError> {
    let bytes = std::fs::read(path).map_err(|e| ArtifactLoadError::from_io(path, e))?;
    let root: JsonValue = serde_json::from_slice(&bytes).map_err(|source| corrupt(path, source))?;
    check_envelope(path, &root)?;
    check_kind(path, &root, kinds)?;

    serde_json::from_value(root).map_err(|source| corrupt(path, source))
}

fn check_envelope(path: &Path, root: &JsonValue) -> Result<(), ArtifactLoadError> {
    let format = root.get("format").and_then(JsonValue::as_str);
    if format != Some(ARTIFACT_FORMAT) {
        return Err(ArtifactLoadError::UnknownFormat {
            path: path.to_path_buf(),
        });
    }

    let version = root
        .get("version")
        .and_then(JsonValue::as_u64)
        .ok_or_else(|| invalid(path, "missing or non-integer 'version'".to_string()))?;
    if version != ARTIFACT_VERSION {
        return Err(ArtifactLoadError::IncompatibleVersion {
            path: path.to_path_buf(),
            found: version,
            supported: ARTIFACT_VERSION,
        });
    }
    Ok(())
}

/// A well-formed artifact of a kind this loader does not handle is `Invalid`,
/// not `Corrupt`.
fn check_kind(path: &Path, root: &JsonValue, kinds: &[&str]) -> Result<(), ArtifactLoadError> {
    let kind = root
        .get("kind")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| invalid(path, "missing or non-string 'kind'".to_string()))?;
    if kinds.contains(&kind) {
        Ok(())
    } else {
        Err(invalid(path, format!("unsupported artifact kind '{kind}'")))
    }
}

fn corrupt(path: &Path, source: serde_json::Error) -> ArtifactLoadError {
    ArtifactLoadError::Corrupt {
        path: path.to_path_buf(),
        source,
    }
}

fn invalid(path: &Path, reason: String) -> ArtifactLoadError {
    ArtifactLoadError::Invalid {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Deref;
    use std::path::PathBuf;

    use super::*;
    use crate::data::model::ClassLabel;

    fn shipped(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("artifacts").join(name)
    }

    /// Per-process temp file holding an artifact; removed again on drop.
    struct TempArtifact(PathBuf);

    impl Deref for TempArtifact {
        type Target = Path;

        fn deref(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for TempArtifact {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn temp_artifact(name: &str, contents: &str) -> TempArtifact {
        let path = std::env::temp_dir().join(format!(
            "wine-quality-{}-{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        TempArtifact(path)
    }

    #[test]
    fn loads_shipped_pair() {
        let artifacts =
            Artifacts::load(&shipped("scaler.json"), &shipped("classifier.json")).unwrap();
        assert_eq!(artifacts.scaler.n_features(), 11);
        assert_eq!(artifacts.scaler.feature_names[0], "fixed acidity");
        assert_eq!(artifacts.classifier.kind(), "random_forest");
        assert!(artifacts.classifier.supports_confidence());
        assert_eq!(
            artifacts.classifier.classes(),
            &[3, 4, 5, 6, 7, 8].map(ClassLabel::Integer)
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_scaler(Path::new("/definitely/not/here/scaler.json")).unwrap_err();
        assert!(err.is_not_found(), "got {err:?}");
        assert_eq!(err.path(), Path::new("/definitely/not/here/scaler.json"));
    }

    #[test]
    fn garbage_is_corrupt() {
        let path = temp_artifact("garbage", "\u{0}\u{1}not json");
        let err = load_classifier(&path).unwrap_err();
        assert!(matches!(err, ArtifactLoadError::Corrupt { .. }), "got {err:?}");
    }

    #[test]
    fn foreign_json_is_unknown_format() {
        let path = temp_artifact("foreign", r#"{"coef": [1, 2, 3]}"#);
        let err = load_scaler(&path).unwrap_err();
        assert!(matches!(err, ArtifactLoadError::UnknownFormat { .. }), "got {err:?}");
    }

    #[test]
    fn newer_version_is_incompatible() {
        let path = temp_artifact(
            "v2",
            r#"{"format": "wine-quality-artifact", "version": 2, "kind": "standard_scaler",
                "feature_names": ["pH"], "mean": [3.0], "scale": [1.0]}"#,
        );
        let err = load_scaler(&path).unwrap_err();
        assert!(
            matches!(
                err,
                ArtifactLoadError::IncompatibleVersion {
                    found: 2,
                    supported: 1,
                    ..
                }
            ),
            "got {err:?}"
        );
    }

    #[test]
    fn wrong_field_types_are_corrupt() {
        let path = temp_artifact(
            "badtypes",
            r#"{"format": "wine-quality-artifact", "version": 1, "kind": "standard_scaler",
                "feature_names": ["pH"], "mean": "three", "scale": [1.0]}"#,
        );
        let err = load_scaler(&path).unwrap_err();
        assert!(matches!(err, ArtifactLoadError::Corrupt { .. }), "got {err:?}");
    }

    #[test]
    fn inconsistent_scaler_is_invalid() {
        let path = temp_artifact(
            "short-scale",
            r#"{"format": "wine-quality-artifact", "version": 1, "kind": "standard_scaler",
                "feature_names": ["pH", "alcohol"], "mean": [3.0, 10.0], "scale": [1.0]}"#,
        );
        let err = load_scaler(&path).unwrap_err();
        assert!(matches!(err, ArtifactLoadError::Invalid { .. }), "got {err:?}");
    }

    #[test]
    fn unknown_kind_is_invalid() {
        let path = temp_artifact(
            "kmeans",
            r#"{"format": "wine-quality-artifact", "version": 1, "kind": "k_means",
                "n_features": 1, "classes": [0, 1]}"#,
        );
        let err = load_classifier(&path).unwrap_err();
        match err {
            ArtifactLoadError::Invalid { reason, .. } => {
                assert_eq!(reason, "unsupported artifact kind 'k_means'")
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn linear_svc_loads_as_label_only() {
        let path = temp_artifact(
            "svc",
            r#"{"format": "wine-quality-artifact", "version": 1, "kind": "linear_svc",
                "n_features": 2, "classes": ["low", "high"],
                "coef": [[0.5, -0.25]], "intercept": [0.1]}"#,
        );
        let classifier = load_classifier(&path).unwrap();
        assert!(!classifier.supports_confidence());
        assert_eq!(classifier.kind(), "linear_svc");
    }

    #[test]
    fn decision_tree_loads_with_confidence() {
        let path = temp_artifact(
            "tree",
            r#"{"format": "wine-quality-artifact", "version": 1, "kind": "decision_tree",
                "n_features": 1, "classes": [0, 1],
                "children_left": [1, -1, -1], "children_right": [2, -1, -1],
                "feature": [0, -2, -2], "threshold": [0.0, -2.0, -2.0],
                "value": [[2, 2], [2, 0], [0, 2]]}"#,
        );
        let classifier = load_classifier(&path).unwrap();
        assert!(classifier.supports_confidence());
        assert_eq!(classifier.kind(), "decision_tree");
    }

    #[test]
    fn temp_artifacts_are_removed_on_drop() {
        let path = {
            let artifact = temp_artifact("scratch", "{}");
            assert!(artifact.exists());
            artifact.to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn scaler_file_is_not_a_classifier() {
        let err = load_classifier(&shipped("scaler.json")).unwrap_err();
        match err {
            ArtifactLoadError::Invalid { reason, .. } => {
                assert_eq!(reason, "unsupported artifact kind 'standard_scaler'")
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn missing_kind_is_invalid() {
        let path = temp_artifact(
            "no-kind",
            r#"{"format": "wine-quality-artifact", "version": 1,
                "feature_names": ["pH"], "mean": [3.0], "scale": [1.0]}"#,
        );
        let err = load_scaler(&path).unwrap_err();
        assert!(matches!(err, ArtifactLoadError::Invalid { .. }), "got {err:?}");
    }

    #[test]
    fn negative_leaf_values_are_invalid() {
        let path = temp_artifact(
            "negative-leaf",
            r#"{"format": "wine-quality-artifact", "version": 1, "kind": "decision_tree",
                "n_features": 1, "classes": [0, 1],
                "children_left": [-1], "children_right": [-1],
                "feature": [-2], "threshold": [-2.0],
                "value": [[-1.0, 2.0]]}"#,
        );
        let err = load_classifier(&path).unwrap_err();
        assert!(matches!(err, ArtifactLoadError::Invalid { .. }), "got {err:?}");
    }

    #[test]
    fn empty_forest_leaf_is_invalid() {
        let path = temp_artifact(
            "empty-leaf",
            r#"{"format": "wine-quality-artifact", "version": 1, "kind": "random_forest",
                "n_features": 1, "classes": [0, 1],
                "estimators": [{
                    "children_left": [1, -1, -1], "children_right": [2, -1, -1],
                    "feature": [0, -2, -2], "threshold": [0.0, -2.0, -2.0],
                    "value": [[2, 0], [2, 0], [0, 0]]
                }]}"#,
        );
        let err = load_classifier(&path).unwrap_err();
        match err {
            ArtifactLoadError::Invalid { reason, .. } => assert!(reason.contains("leaf 2"), "{reason}"),
            other => panic!("expected Invalid, got {other:?}"),
        }
    }
}
