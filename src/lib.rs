//! Workspace umbrella crate for the crop recommender.
//!
//! This crate stitches artifact loading and single-row recommendation together
//! so callers (the HTTP server, the demo binary, tests) go through one entry
//! point and one metrics hook.

pub mod config;

pub use artifact::{
    encode_binary, load, load_with_config, ArtifactConfig, ArtifactError, Classifier,
    DecodeStrategy, FailureKind, LoadedModel, ModelArtifact, ModelError, ModelMetadata,
    RandomForest, StrategyFailure, TreeArrays, BINARY_MAGIC, DEFAULT_ARTIFACT_PATH,
    DEFAULT_MAX_BYTES, FORMAT_VERSION, TREE_LEAF,
};
pub use recommend::{
    predict, recommend, resolve, FeatureVector, Parameter, PredictError, Recommendation,
    SliderGroup, SliderInputs, SliderSpec, SummaryRow, SummaryTable, CROP_LABELS,
    FEATURE_COUNT, SLIDERS, UNKNOWN_CROP,
};

pub use crate::config::{AppConfig, ConfigLoadError};

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

/// Errors surfaced by the pipeline entry points.
#[derive(Debug)]
pub enum PipelineError {
    /// Startup failure: the model could not be loaded.
    Artifact(ArtifactError),
    /// Startup failure: the model decoded but does not take the slider vector.
    IncompatibleModel {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
    /// Per-request failure: the model could not produce a prediction.
    Predict(PredictError),
}

impl PipelineError {
    /// Whether the process can keep serving after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PipelineError::Predict(_))
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Artifact(err) => write!(f, "failed to load model: {err}"),
            PipelineError::IncompatibleModel {
                path,
                expected,
                found,
            } => write!(
                f,
                "model at {} expects {found} features per row, inputs provide {expected}",
                path.display()
            ),
            PipelineError::Predict(err) => write!(f, "prediction failed: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Artifact(err) => Some(err),
            PipelineError::IncompatibleModel { .. } => None,
            PipelineError::Predict(err) => Some(err),
        }
    }
}

impl From<ArtifactError> for PipelineError {
    fn from(value: ArtifactError) -> Self {
        PipelineError::Artifact(value)
    }
}

impl From<PredictError> for PipelineError {
    fn from(value: PredictError) -> Self {
        PipelineError::Predict(value)
    }
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_load(&self, latency: Duration, result: Result<DecodeStrategy, &ArtifactError>);
    fn record_prediction(&self, latency: Duration, result: Result<i64, &PredictError>);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record_load(self, result: Result<DecodeStrategy, &ArtifactError>) {
        self.recorder.record_load(self.start.elapsed(), result);
    }

    fn record_prediction(self, result: Result<i64, &PredictError>) {
        self.recorder.record_prediction(self.start.elapsed(), result);
    }
}

/// Load the model once at startup. Any error here is terminal for the caller.
///
/// A model that decodes but is not [`FEATURE_COUNT`] wide is rejected here;
/// it could never answer a request.
pub fn load_model(cfg: &ArtifactConfig) -> Result<LoadedModel, PipelineError> {
    let span = MetricsSpan::start();
    let result = load_with_config(cfg);
    if let Some(span) = span {
        span.record_load(result.as_ref().map(LoadedModel::strategy));
    }
    let model = result?;
    let found = model.model().n_features();
    if found != FEATURE_COUNT {
        return Err(PipelineError::IncompatibleModel {
            path: model.path().to_path_buf(),
            expected: FEATURE_COUNT,
            found,
        });
    }
    Ok(model)
}

/// Assemble slider readings into a feature vector and run one recommendation.
pub fn run_recommendation(
    model: &dyn Classifier,
    inputs: &SliderInputs,
) -> Result<Recommendation, PipelineError> {
    recommend_features(model, FeatureVector::from_inputs(inputs))
}

/// Run one recommendation over an already assembled feature vector.
pub fn recommend_features(
    model: &dyn Classifier,
    features: FeatureVector,
) -> Result<Recommendation, PipelineError> {
    let span = MetricsSpan::start();
    let result = recommend(model, features);
    if let Some(span) = span {
        span.record_prediction(result.as_ref().map(|rec| rec.class_index));
    }
    Ok(result?)
}
