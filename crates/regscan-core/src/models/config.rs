//! Configuration structures for the scan pipeline.

use serde::{Deserialize, Serialize};

use crate::ocr::crop::CropConfig;
use crate::vehicle::policy::ScanPolicy;

/// Main configuration for the regscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegscanConfig {
    /// Disambiguation policy.
    pub policy: ScanPolicy,

    /// OCR engine selection and endpoints.
    pub ocr: OcrSettings,

    /// Plate-region pre-crop.
    pub crop: CropSettings,

    /// Motor registry access.
    pub registry: RegistrySettings,
}

/// Which OCR engine to drive, and how to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Engine to use.
    pub engine: EngineKind,

    /// Base URL of the OCR worker service.
    pub worker_url: String,

    /// API key for the cloud vision engine.
    pub vision_api_key: Option<String>,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            engine: EngineKind::Worker,
            worker_url: "http://localhost:8000".to_string(),
            vision_api_key: None,
        }
    }
}

/// Available OCR engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// The embedded OCR worker service (engine A).
    #[default]
    Worker,
    /// The cloud text-detection API (engine B).
    Vision,
}

/// Plate-region pre-crop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CropSettings {
    /// Whether to attempt the pre-crop at all.
    pub enabled: bool,

    /// Edge-detection thresholds.
    pub detector: CropConfig,
}

impl Default for CropSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            detector: CropConfig::default(),
        }
    }
}

/// Motor registry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Registry base URL.
    pub base_url: String,

    /// API token; falls back to the MOTORAPI_KEY environment variable.
    pub api_token: Option<String>,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            base_url: "https://v1.motorapi.dk".to_string(),
            api_token: None,
        }
    }
}

impl RegscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = RegscanConfig::default();
        config.save(&path).unwrap();

        let loaded = RegscanConfig::from_file(&path).unwrap();
        assert_eq!(loaded.ocr.worker_url, config.ocr.worker_url);
        assert_eq!(loaded.policy, config.policy);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: RegscanConfig =
            serde_json::from_str(r#"{"ocr":{"engine":"vision"}}"#).unwrap();
        assert_eq!(config.ocr.engine, EngineKind::Vision);
        assert!(config.crop.enabled);
    }
}
