//! Crop model artifact loading
//!
//! This crate turns a model file on disk into something that can predict. The
//! file comes out of an external training job, and we've been bitten by its
//! format drifting (binary vs JSON exports, legacy text encodings, text fields
//! dumped as raw bytes), so loading walks an ordered chain of
//! [`DecodeStrategy`]s and keeps the first one that produces a valid artifact.
//!
//! ## What happens on load
//!
//! - The path is checked up front: missing files fail fast with
//!   [`ArtifactError::NotFound`], oversized ones with [`ArtifactError::TooLarge`].
//! - Each strategy re-reads the file, decodes, and validates the tree arrays.
//!   A failure is logged as a warning and the next strategy runs.
//! - `latin1-json` only runs directly after a UTF-8 decoding failure.
//! - A success through `raw-bytes-json` is flagged as best effort: text
//!   metadata may have been mangled, and we say so loudly instead of guessing.
//! - If nothing works you get [`ArtifactError::Exhausted`] with every attempt.
//!
//! ## Example
//!
//! ```no_run
//! use artifact::load;
//!
//! let loaded = load("best_model_random_forest.bin").expect("model must load at startup");
//! println!("decoded via {}", loaded.strategy());
//! ```
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

mod config;
mod error;
mod forest;
mod model;
mod strategy;

pub use crate::config::{ArtifactConfig, DEFAULT_ARTIFACT_PATH, DEFAULT_MAX_BYTES};
pub use crate::error::{ArtifactError, FailureKind, ModelError, StrategyFailure};
pub use crate::forest::{
    ModelArtifact, ModelMetadata, RandomForest, TreeArrays, FORMAT_VERSION, TREE_LEAF,
};
pub use crate::model::{Classifier, LoadedModel};
pub use crate::strategy::{encode_binary, DecodeStrategy, BINARY_MAGIC};

/// Load the artifact at `path` with the default strategy chain.
pub fn load(path: impl AsRef<Path>) -> Result<LoadedModel, ArtifactError> {
    load_with_config(&ArtifactConfig::for_path(path.as_ref()))
}

/// Load an artifact according to `cfg`.
pub fn load_with_config(cfg: &ArtifactConfig) -> Result<LoadedModel, ArtifactError> {
    cfg.validate()?;
    let path = cfg.path.as_path();
    check_file(path, cfg.max_bytes)?;

    let start = Instant::now();
    let mut failures: Vec<StrategyFailure> = Vec::new();

    for &strategy in &cfg.strategies {
        if !strategy.applies(&failures) {
            debug!(path = %path.display(), %strategy, "artifact_strategy_skipped");
            continue;
        }

        match attempt(strategy, path) {
            Ok(forest) => {
                let elapsed_micros = start.elapsed().as_micros();
                let metadata = forest.metadata().clone();
                if strategy.is_best_effort() {
                    warn!(
                        path = %path.display(),
                        %strategy,
                        algorithm = %metadata.algorithm,
                        "artifact_loaded_best_effort: text fields may not match the producer's"
                    );
                } else {
                    info!(
                        path = %path.display(),
                        %strategy,
                        n_trees = metadata.n_trees,
                        n_classes = metadata.n_classes,
                        failed_attempts = failures.len(),
                        elapsed_micros,
                        "artifact_loaded"
                    );
                }
                return Ok(LoadedModel::new(
                    Arc::new(forest),
                    metadata,
                    strategy,
                    path,
                    failures,
                ));
            }
            Err(failure) => {
                warn!(
                    path = %path.display(),
                    %strategy,
                    kind = %failure.kind,
                    error = %failure.message,
                    "artifact_strategy_failed"
                );
                failures.push(failure);
            }
        }
    }

    error!(
        path = %path.display(),
        attempts = failures.len(),
        elapsed_micros = start.elapsed().as_micros(),
        "artifact_load_exhausted"
    );
    Err(ArtifactError::Exhausted {
        path: path.to_path_buf(),
        attempts: failures,
    })
}

fn check_file(path: &Path, max_bytes: Option<u64>) -> Result<(), ArtifactError> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ArtifactError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if !meta.is_file() {
        return Err(ArtifactError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        });
    }
    if let Some(limit) = max_bytes {
        if meta.len() > limit {
            return Err(ArtifactError::TooLarge {
                path: path.to_path_buf(),
                size: meta.len(),
                limit,
            });
        }
    }
    Ok(())
}

/// One isolated attempt: fresh read, decode, validate.
fn attempt(strategy: DecodeStrategy, path: &Path) -> Result<RandomForest, StrategyFailure> {
    let bytes = fs::read(path)
        .map_err(|err| StrategyFailure::new(strategy, FailureKind::Io, err.to_string()))?;
    let artifact = strategy
        .decode(&bytes)
        .map_err(|(kind, message)| StrategyFailure::new(strategy, kind, message))?;
    RandomForest::from_artifact(artifact)
        .map_err(|message| StrategyFailure::new(strategy, FailureKind::Invalid, message))
}
