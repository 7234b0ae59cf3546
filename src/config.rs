use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Optional settings file, read from the working directory.
pub const CONFIG_FILE: &str = "wine_quality.json";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field has a default, so the file may list only
/// what it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Fitted scaler artifact.
    pub scaler_path: PathBuf,
    /// Fitted classifier artifact.
    pub classifier_path: PathBuf,
    /// Image drawn behind the form (PNG or JPEG).
    pub background_path: PathBuf,
    pub window_title: String,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scaler_path: PathBuf::from("artifacts/scaler.json"),
            classifier_path: PathBuf::from("artifacts/classifier.json"),
            background_path: PathBuf::from("assets/background.png"),
            window_title: "Wine Quality Prediction".to_string(),
            window_size: [760.0, 900.0],
        }
    }
}

impl AppConfig {
    /// Read [`CONFIG_FILE`] if it exists, otherwise fall back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No {} found, using default settings", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }
}
