use artifact::ModelError;
use thiserror::Error;

/// Per-request inference failure. Always recoverable: the caller renders it
/// and keeps serving.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PredictError {
    #[error("model rejected the input: {0}")]
    Model(#[from] ModelError),

    #[error("model returned no prediction")]
    EmptyOutput,

    #[error("model panicked: {0}")]
    Panicked(String),
}
