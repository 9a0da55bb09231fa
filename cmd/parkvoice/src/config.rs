//! Application configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```yaml
//! model_path: models/parkinsons_model.json
//! scaler_path: models/scaler.json
//! addr: 127.0.0.1:8080
//! analysis:
//!   pitch:
//!     ceiling: 500
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parkvoice_phonation::AnalysisConfig;
use serde::{Deserialize, Serialize};

/// Default upload cap for the web form.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Classifier artifact (JSON).
    pub model_path: PathBuf,
    /// Scaler artifact (JSON).
    pub scaler_path: PathBuf,
    /// Listen address for `serve`; a leading `:` binds all interfaces.
    pub addr: String,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: usize,
    /// Feature extraction parameters; must match the trained model.
    pub analysis: AnalysisConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("parkinsons_model.json"),
            scaler_path: PathBuf::from("scaler.json"),
            addr: ":7860".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Config {
    /// Reads a YAML config file, or returns the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Parses YAML and validates the analysis parameters.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(content)?;
        cfg.analysis.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::load(None).unwrap();
        assert_eq!(cfg.model_path, PathBuf::from("parkinsons_model.json"));
        assert_eq!(cfg.scaler_path, PathBuf::from("scaler.json"));
        assert_eq!(cfg.addr, ":7860");
        assert_eq!(cfg.analysis.min_duration, 0.5);
    }

    #[test]
    fn test_partial_yaml() {
        let cfg = Config::from_yaml(
            r#"
model_path: models/rf.json
analysis:
  mfcc:
    num_coefficients: 13
    time_step: 0.01
  pitch:
    ceiling: 500
"#,
        )
        .unwrap();
        assert_eq!(cfg.model_path, PathBuf::from("models/rf.json"));
        assert_eq!(cfg.scaler_path, PathBuf::from("scaler.json"));
        assert_eq!(cfg.analysis.pitch.ceiling, 500.0);
        assert_eq!(cfg.analysis.pitch.floor, 75.0);
        assert_eq!(cfg.analysis.mfcc.window_length, 0.025);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_analysis_is_rejected_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parkvoice.yaml");
        std::fs::write(&path, "analysis:\n  pitch:\n    floor: 0\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("invalid config"), "{chain}");
        assert!(chain.contains("pitch.floor must be > 0"), "{chain}");
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Some(Path::new("/no/such/parkvoice.yaml"))).unwrap_err();
        assert!(err.to_string().contains("/no/such/parkvoice.yaml"));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parkvoice.yaml");
        std::fs::write(&path, "addr: 127.0.0.1:9000\nmax_upload_bytes: 1024\n").unwrap();
        let cfg = Config::load(Some(&path)).unwrap();
        assert_eq!(cfg.addr, "127.0.0.1:9000");
        assert_eq!(cfg.max_upload_bytes, 1024);
    }
}
