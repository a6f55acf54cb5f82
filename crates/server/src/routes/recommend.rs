use crate::error::ServerResult;
use crate::render::{self, Outcome};
use crate::state::ServerState;
use axum::extract::State;
use axum::response::Html;
use axum::{Form, Json};
use croprec::{FeatureVector, PipelineError, SliderInputs, SummaryTable};
use serde::Serialize;
use std::sync::Arc;

/// JSON recommendation response
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub crop: String,
    pub class_index: i64,
    pub summary: SummaryTable,
}

/// `GET /`: the form with every slider at its default.
pub async fn form_page(State(state): State<Arc<ServerState>>) -> Html<String> {
    Html(render::page(state.model(), &FeatureVector::defaults(), None))
}

/// `POST /recommend`: re-render the form with the submitted values plus the
/// result. A failed prediction shows an error box; the page still renders.
pub async fn recommend_form(
    State(state): State<Arc<ServerState>>,
    Form(inputs): Form<SliderInputs>,
) -> Html<String> {
    let features = FeatureVector::from_inputs(&inputs);
    let html = match croprec::recommend_features(state.classifier(), features) {
        Ok(rec) => render::page(state.model(), &features, Some(Outcome::Recommended(&rec))),
        Err(err) => {
            let message = match &err {
                PipelineError::Predict(inner) => inner.to_string(),
                other => other.to_string(),
            };
            render::page(state.model(), &features, Some(Outcome::Failed(&message)))
        }
    };
    Html(html)
}

/// `POST /api/v1/recommend`
pub async fn recommend_api(
    State(state): State<Arc<ServerState>>,
    Json(inputs): Json<SliderInputs>,
) -> ServerResult<Json<RecommendResponse>> {
    let rec = croprec::run_recommendation(state.classifier(), &inputs)?;
    Ok(Json(RecommendResponse {
        crop: rec.crop.to_string(),
        class_index: rec.class_index,
        summary: rec.summary,
    }))
}
