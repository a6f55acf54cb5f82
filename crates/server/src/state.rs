use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use croprec::{Classifier, DecodeStrategy, LoadedModel};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Model loaded once at startup, read-only afterwards
    model: LoadedModel,

    /// Prometheus render handle, present when metrics are enabled
    metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// Load the configured artifact and build the state. Fails if the model
    /// cannot be loaded; there is no serving without one.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let model = croprec::load_model(&config.artifact).map_err(ServerError::Startup)?;
        Ok(Self::with_model(config, model))
    }

    /// Build state around an already loaded model.
    pub fn with_model(config: ServerConfig, model: LoadedModel) -> Self {
        Self {
            config: Arc::new(config),
            model,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.model.model()
    }

    pub fn model(&self) -> &LoadedModel {
        &self.model
    }

    pub fn metrics_handle(&self) -> Option<&PrometheusHandle> {
        self.metrics.as_ref()
    }

    pub fn model_status(&self) -> ModelStatus {
        let metadata = self.model.metadata();
        ModelStatus {
            path: self.model.path().display().to_string(),
            strategy: self.model.strategy(),
            best_effort: self.model.is_best_effort(),
            failed_attempts: self
                .model
                .failed_attempts()
                .iter()
                .map(ToString::to_string)
                .collect(),
            algorithm: metadata.algorithm.clone(),
            n_trees: metadata.n_trees,
            n_classes: metadata.n_classes,
        }
    }
}

/// Model provenance for readiness probes
#[derive(Debug, Serialize)]
pub struct ModelStatus {
    pub path: String,
    pub strategy: DecodeStrategy,
    pub best_effort: bool,
    pub failed_attempts: Vec<String>,
    pub algorithm: String,
    pub n_trees: usize,
    pub n_classes: usize,
}
