use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ndarray::ArrayView2;

use crate::error::{ModelError, StrategyFailure};
use crate::forest::ModelMetadata;
use crate::strategy::DecodeStrategy;

/// Anything that maps a batch of feature rows to one class id per row.
///
/// Implementations must be read-only: a single instance is shared across
/// every request for the lifetime of the process.
pub trait Classifier: Send + Sync {
    /// Width of the rows the model accepts.
    fn n_features(&self) -> usize;

    /// Predict one class id for each row of `batch` (rows × features).
    fn predict(&self, batch: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError>;
}

/// A model plus the provenance of how it was decoded.
#[derive(Clone)]
pub struct LoadedModel {
    model: Arc<dyn Classifier>,
    metadata: ModelMetadata,
    strategy: DecodeStrategy,
    path: PathBuf,
    failed_attempts: Vec<StrategyFailure>,
}

impl LoadedModel {
    pub fn new(
        model: Arc<dyn Classifier>,
        metadata: ModelMetadata,
        strategy: DecodeStrategy,
        path: impl Into<PathBuf>,
        failed_attempts: Vec<StrategyFailure>,
    ) -> Self {
        Self {
            model,
            metadata,
            strategy,
            path: path.into(),
            failed_attempts,
        }
    }

    /// Shared handle to the classifier.
    pub fn classifier(&self) -> Arc<dyn Classifier> {
        Arc::clone(&self.model)
    }

    pub fn model(&self) -> &dyn Classifier {
        self.model.as_ref()
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// The strategy that produced this model.
    pub fn strategy(&self) -> DecodeStrategy {
        self.strategy
    }

    /// True when the model only decoded through the lossy last-resort path;
    /// its text metadata may not match what the producer wrote.
    pub fn is_best_effort(&self) -> bool {
        self.strategy.is_best_effort()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Strategies that failed before [`strategy`](Self::strategy) succeeded.
    pub fn failed_attempts(&self) -> &[StrategyFailure] {
        &self.failed_attempts
    }
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("metadata", &self.metadata)
            .field("strategy", &self.strategy)
            .field("path", &self.path)
            .field("failed_attempts", &self.failed_attempts)
            .finish_non_exhaustive()
    }
}
