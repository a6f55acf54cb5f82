use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use croprec::{PipelineError, PredictError};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The model could not be loaded or cannot take slider input; the server
    /// must not start.
    #[error("Startup failed: {0}")]
    Startup(#[source] PipelineError),

    /// One request's prediction failed. The server keeps serving.
    #[error("Prediction failed: {0}")]
    Prediction(#[source] PredictError),

    #[error("Not found")]
    NotFound,
}

impl ServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Prediction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Startup(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::Startup(_) => "MODEL_UNAVAILABLE",
            ServerError::Prediction(_) => "PREDICTION_FAILED",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl From<PipelineError> for ServerError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Predict(inner) => ServerError::Prediction(inner),
            other => ServerError::Startup(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code().to_string();
        let message = self.to_string();

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
