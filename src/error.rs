use std::path::{Path, PathBuf};

use thiserror::Error;

// ---------------------------------------------------------------------------
// Artifact loading errors (startup-fatal)
// ---------------------------------------------------------------------------

/// Failure to turn an artifact file on disk into an in-memory model.
#[derive(Debug, Error)]
pub enum ArtifactLoadError {
    #[error("artifact file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read artifact {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact {} could not be deserialized", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} is not a wine-quality artifact", path.display())]
    UnknownFormat { path: PathBuf },

    #[error(
        "artifact {} has format version {found}, this build reads version {supported}",
        path.display()
    )]
    IncompatibleVersion {
        path: PathBuf,
        found: u64,
        supported: u64,
    },

    #[error("artifact {} is inconsistent: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl ArtifactLoadError {
    /// Map an I/O failure, keeping "file missing" apart from everything else.
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactLoadError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactLoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ArtifactLoadError::NotFound { .. })
    }

    /// What to tell the operator when startup stops on this error.
    pub fn startup_hint(&self) -> String {
        if self.is_not_found() {
            format!(
                "{} is missing; run `generate_artifacts` or point `scaler_path`/`classifier_path` in wine_quality.json at the fitted files",
                self.path().display()
            )
        } else {
            format!("cannot start without {}: {self}", self.path().display())
        }
    }

    /// Path of the artifact that failed to load.
    pub fn path(&self) -> &Path {
        match self {
            ArtifactLoadError::NotFound { path }
            | ArtifactLoadError::Io { path, .. }
            | ArtifactLoadError::Corrupt { path, .. }
            | ArtifactLoadError::UnknownFormat { path }
            | ArtifactLoadError::IncompatibleVersion { path, .. }
            | ArtifactLoadError::Invalid { path, .. } => path,
        }
    }
}

// ---------------------------------------------------------------------------
// Inference errors (recoverable, shown in the UI)
// ---------------------------------------------------------------------------

/// The feature record and the loaded artifacts disagree on shape or content.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("feature columns do not match the scaler (missing: {missing:?}, unexpected: {unexpected:?})")]
    ColumnMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("column '{column}' is not a finite number")]
    NonFinite { column: String },

    #[error("scaler produces {scaled} features but the classifier expects {expected}")]
    WidthMismatch { scaled: usize, expected: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = ArtifactLoadError::from_io(
            Path::new("nope.json"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(err.is_not_found());
        assert_eq!(err.path(), Path::new("nope.json"));
        assert_eq!(err.to_string(), "artifact file not found: nope.json");
    }

    #[test]
    fn other_io_errors_stay_io() {
        let err = ArtifactLoadError::from_io(
            Path::new("locked.json"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(!err.is_not_found());
        assert!(matches!(err, ArtifactLoadError::Io { .. }));
    }

    #[test]
    fn startup_hint_points_missing_files_at_the_generator() {
        let missing = ArtifactLoadError::from_io(
            Path::new("artifacts/scaler.json"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        let hint = missing.startup_hint();
        assert!(hint.starts_with("artifacts/scaler.json is missing"));
        assert!(hint.contains("generate_artifacts"));

        let invalid = ArtifactLoadError::Invalid {
            path: PathBuf::from("artifacts/classifier.json"),
            reason: "random forest has no estimators".to_string(),
        };
        let hint = invalid.startup_hint();
        assert!(hint.starts_with("cannot start without artifacts/classifier.json"));
        assert!(!hint.contains("generate_artifacts"));
    }

    #[test]
    fn width_mismatch_message_names_both_sides() {
        let err = InferenceError::WidthMismatch {
            scaled: 11,
            expected: 10,
        };
        assert_eq!(
            err.to_string(),
            "scaler produces 11 features but the classifier expects 10"
        );
    }
}
