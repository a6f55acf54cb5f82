//! YAML configuration file support.
//!
//! One file describes where the model lives, how it may be decoded and which
//! slider readings the demo binary recommends for.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "field-station"
//!
//! artifact:
//!   path: "models/best_model_random_forest.bin"
//!   strategies: ["binary", "utf8-json", "latin1-json", "raw-bytes-json"]
//!   max_bytes: 268435456
//!
//! demo:
//!   inputs:
//!     nitrogen: 90
//!     phosphorous: 42
//!     potassium: 43
//!     temperature: 20.5
//!     humidity: 82.0
//!     ph: 6.5
//!     rainfall: 203.0
//! ```

use std::fs;
use std::path::Path;

use artifact::{ArtifactConfig, ArtifactError};
use recommend::SliderInputs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

impl From<ArtifactError> for ConfigLoadError {
    fn from(value: ArtifactError) -> Self {
        ConfigLoadError::Validation(format!("artifact: {value}"))
    }
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    /// Configuration format version
    #[serde(default = "default_version")]
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    /// Model artifact location and decode chain
    #[serde(default)]
    pub artifact: ArtifactConfig,

    #[serde(default)]
    pub demo: DemoYamlConfig,
}

impl AppConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: AppConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.artifact.validate()?;
        self.demo.validate()?;

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            name: None,
            artifact: ArtifactConfig::default(),
            demo: DemoYamlConfig::default(),
        }
    }
}

/// Readings the demo binary feeds through the pipeline. Unset sliders use
/// their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemoYamlConfig {
    #[serde(default)]
    pub inputs: SliderInputs,
}

impl DemoYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        let readings = [
            ("nitrogen", self.inputs.nitrogen),
            ("phosphorous", self.inputs.phosphorous),
            ("potassium", self.inputs.potassium),
            ("temperature", self.inputs.temperature),
            ("humidity", self.inputs.humidity),
            ("ph", self.inputs.ph),
            ("rainfall", self.inputs.rainfall),
        ];
        for (key, value) in readings {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(ConfigLoadError::Validation(format!(
                    "demo.inputs.{key} must be a finite number"
                )));
            }
        }
        Ok(())
    }
}

fn default_version() -> String {
    "1.0".to_string()
}
