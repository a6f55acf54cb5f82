//! Prometheus metrics
//!
//! Pipeline timings reach the `metrics` facade through
//! [`croprec::PipelineMetrics`]; HTTP timings are recorded by the logging
//! middleware. Both are rendered at `GET /metrics`.

use croprec::{ArtifactError, DecodeStrategy, PipelineMetrics, PredictError};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Duration;

pub const ARTIFACT_LOADS_TOTAL: &str = "croprec_artifact_loads_total";
pub const ARTIFACT_LOAD_SECONDS: &str = "croprec_artifact_load_seconds";
pub const PREDICTIONS_TOTAL: &str = "croprec_predictions_total";
pub const PREDICTION_SECONDS: &str = "croprec_prediction_seconds";
pub const HTTP_REQUESTS_TOTAL: &str = "croprec_http_requests_total";
pub const HTTP_REQUEST_SECONDS: &str = "croprec_http_request_seconds";

/// Forwards pipeline events to the global `metrics` recorder.
#[derive(Debug, Default)]
pub struct PrometheusPipelineMetrics;

impl PipelineMetrics for PrometheusPipelineMetrics {
    fn record_load(&self, latency: Duration, result: Result<DecodeStrategy, &ArtifactError>) {
        let (outcome, strategy) = match result {
            Ok(strategy) => ("success", strategy.name()),
            Err(_) => ("failure", "none"),
        };
        counter!(ARTIFACT_LOADS_TOTAL, "outcome" => outcome, "strategy" => strategy).increment(1);
        histogram!(ARTIFACT_LOAD_SECONDS).record(latency.as_secs_f64());
    }

    fn record_prediction(&self, latency: Duration, result: Result<i64, &PredictError>) {
        let outcome = if result.is_ok() { "success" } else { "failure" };
        counter!(PREDICTIONS_TOTAL, "outcome" => outcome).increment(1);
        histogram!(PREDICTION_SECONDS).record(latency.as_secs_f64());
    }
}

/// Install the process-wide Prometheus recorder and hook the pipeline into it.
/// Call once, before the model is loaded.
pub fn install() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    croprec::set_pipeline_metrics(Some(Arc::new(PrometheusPipelineMetrics)));
    Ok(handle)
}

pub fn record_request(method: &str, status: u16, latency: Duration) {
    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(HTTP_REQUEST_SECONDS, "method" => method.to_string()).record(latency.as_secs_f64());
}
