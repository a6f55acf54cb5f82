//! Loader configuration.
//!
//! ```rust
//! use artifact::{ArtifactConfig, DecodeStrategy};
//!
//! let config = ArtifactConfig {
//!     strategies: vec![DecodeStrategy::Binary, DecodeStrategy::Utf8Json],
//!     ..ArtifactConfig::for_path("models/forest.bin")
//! };
//! assert!(config.validate().is_ok());
//! ```
use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;
use crate::strategy::DecodeStrategy;

/// Artifact location used when nothing is configured.
pub const DEFAULT_ARTIFACT_PATH: &str = "best_model_random_forest.bin";

/// Largest artifact accepted by default (256 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 256 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Path of the serialized model, relative to the working directory.
    pub path: PathBuf,

    /// Decode strategies in the order they are tried.
    ///
    /// Default: [`DecodeStrategy::DEFAULT_CHAIN`]
    pub strategies: Vec<DecodeStrategy>,

    /// Reject artifacts larger than this many bytes before decoding.
    pub max_bytes: Option<u64>,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            strategies: DecodeStrategy::DEFAULT_CHAIN.to_vec(),
            max_bytes: Some(DEFAULT_MAX_BYTES),
        }
    }
}

impl ArtifactConfig {
    /// Default configuration pointed at `path`.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.path.as_os_str().is_empty() {
            return Err(ArtifactError::InvalidConfig("artifact path is empty".into()));
        }
        if self.strategies.is_empty() {
            return Err(ArtifactError::InvalidConfig(
                "at least one decode strategy is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for strategy in &self.strategies {
            if !seen.insert(strategy) {
                return Err(ArtifactError::InvalidConfig(format!(
                    "decode strategy {strategy} listed twice"
                )));
            }
        }
        if self.max_bytes == Some(0) {
            return Err(ArtifactError::InvalidConfig(
                "max_bytes must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
