//! Error types produced by the artifact crate.
//!
//! Loading distinguishes three layers of failure:
//!
//! | Error | Layer | Description |
//! |-------|-------|-------------|
//! | [`StrategyFailure`] | per attempt | One decode strategy could not produce a valid artifact |
//! | [`ArtifactError`] | per load | The artifact could not be loaded at all (terminal) |
//! | [`ModelError`] | per prediction | A loaded model rejected a batch |
//!
//! Strategy failures are collected and logged but never returned on their own;
//! they surface only inside [`ArtifactError::Exhausted`] once every strategy
//! has been tried.
use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::strategy::DecodeStrategy;

/// Terminal failure to load a model artifact.
///
/// Callers at process start are expected to abort on any variant: there is no
/// degraded mode without a model.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArtifactError {
    /// Nothing exists at the configured path.
    #[error("model artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but exceeds [`ArtifactConfig::max_bytes`](crate::ArtifactConfig::max_bytes).
    #[error("model artifact {} is {size} bytes, limit is {limit}", .path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    /// The loader configuration itself is unusable.
    #[error("invalid artifact config: {0}")]
    InvalidConfig(String),

    /// The file could not be inspected before decoding started.
    #[error("io error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Every applicable decode strategy failed.
    #[error("all decode strategies failed for {}: {}", .path.display(), summarize(.attempts))]
    Exhausted {
        path: PathBuf,
        attempts: Vec<StrategyFailure>,
    },
}

impl ArtifactError {
    /// Strategy failures recorded before the loader gave up. Empty for
    /// variants raised before any strategy ran.
    pub fn attempts(&self) -> &[StrategyFailure] {
        match self {
            ArtifactError::Exhausted { attempts, .. } => attempts,
            _ => &[],
        }
    }
}

fn summarize(attempts: &[StrategyFailure]) -> String {
    if attempts.is_empty() {
        return "no strategy applied".to_string();
    }
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Coarse classification of why a strategy failed.
///
/// [`FailureKind::Encoding`] is the only kind that unlocks the legacy
/// single-byte retry ([`DecodeStrategy::Latin1Json`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The file could not be read for this attempt.
    Io,
    /// The bytes are not valid text in the assumed encoding.
    Encoding,
    /// The bytes are not well-formed for the decoder (truncated, bad magic, bad token).
    Syntax,
    /// Well-formed input whose shape does not match the artifact schema.
    Schema,
    /// The artifact decoded but failed structural validation.
    Invalid,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Io => "io",
            FailureKind::Encoding => "encoding",
            FailureKind::Syntax => "syntax",
            FailureKind::Schema => "schema",
            FailureKind::Invalid => "invalid",
        };
        f.write_str(label)
    }
}

/// One failed decode attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{strategy} failed ({kind}): {message}")]
pub struct StrategyFailure {
    pub strategy: DecodeStrategy,
    pub kind: FailureKind,
    pub message: String,
}

impl StrategyFailure {
    pub(crate) fn new(strategy: DecodeStrategy, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            strategy,
            kind,
            message: message.into(),
        }
    }
}

/// Failure raised by a [`Classifier`](crate::Classifier) for a single call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// A row does not have the width the model was trained on.
    #[error("expected {expected} features per row, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    /// A row contains NaN or an infinity.
    #[error("non-finite value in row {row}, feature {feature}")]
    NonFinite { row: usize, feature: usize },

    /// Any other evaluation failure.
    #[error("model evaluation failed: {0}")]
    Evaluation(String),
}
