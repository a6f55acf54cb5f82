//! Router-level tests for the form, the JSON API and the probes.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use axum::Router;
use croprec::{
    Classifier, DecodeStrategy, LoadedModel, ModelArtifact, ModelError, ModelMetadata,
    TreeArrays, FEATURE_COUNT, FORMAT_VERSION, TREE_LEAF,
};
use http_body_util::BodyExt;
use ndarray::ArrayView2;
use serde_json::Value;
use server::{build_router, ServerConfig, ServerError, ServerState};
use tower::ServiceExt;

/// Maize when rainfall <= 100 mm, Rice otherwise.
fn rainfall_artifact() -> ModelArtifact {
    ModelArtifact {
        format_version: FORMAT_VERSION,
        algorithm: "RandomForestClassifier".into(),
        producer: Some("api-test".into()),
        feature_names: ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        classes: vec![11, 20],
        trees: vec![TreeArrays {
            children_left: vec![1, TREE_LEAF, TREE_LEAF],
            children_right: vec![2, TREE_LEAF, TREE_LEAF],
            feature: vec![6, -2, -2],
            threshold: vec![100.0, -2.0, -2.0],
            value: vec![vec![4.0, 6.0], vec![4.0, 0.0], vec![0.0, 6.0]],
        }],
    }
}

struct Broken;

impl Classifier for Broken {
    fn n_features(&self) -> usize {
        FEATURE_COUNT
    }

    fn predict(&self, _batch: ArrayView2<'_, f64>) -> Result<Vec<i64>, ModelError> {
        Err(ModelError::Evaluation("tree walk diverged".into()))
    }
}

fn stub_metadata() -> ModelMetadata {
    ModelMetadata {
        algorithm: "Stub".into(),
        producer: None,
        feature_names: Vec::new(),
        n_trees: 0,
        n_classes: 0,
    }
}

fn forest_app() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forest.bin");
    std::fs::write(&path, croprec::encode_binary(&rainfall_artifact()).unwrap()).unwrap();

    let mut config = ServerConfig::default();
    config.artifact.path = path;
    let state = ServerState::new(config).unwrap();
    (dir, build_router(Arc::new(state)))
}

fn broken_app() -> Router {
    let model = LoadedModel::new(
        Arc::new(Broken),
        stub_metadata(),
        DecodeStrategy::Binary,
        "broken.bin",
        Vec::new(),
    );
    build_router(Arc::new(ServerState::with_model(
        ServerConfig::default(),
        model,
    )))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/recommend")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/recommend")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn form_page_renders_defaults_without_result() {
    let (_dir, app) = forest_app();
    let (status, html) = send(app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>Smart Crop Recommender</title>"));
    assert_eq!(html.matches("type=\"range\"").count(), FEATURE_COUNT);
    assert!(html.contains("name=\"rainfall\""));
    assert!(html.contains("Get Crop Recommendation"));
    assert!(html.contains("Sustainable Agriculture Insights"));
    assert!(!html.contains("recommend-box\">"));
}

#[tokio::test]
async fn form_submission_shows_crop_and_summary() {
    let (_dir, app) = forest_app();
    let (status, html) = send(
        app,
        post_form("nitrogen=90&phosphorous=42&potassium=43&temperature=20.5&humidity=82&ph=6.5&rainfall=80"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Recommended Crop: <span class=\"crop\">Maize</span>"));
    assert!(html.contains("<td>Nitrogen (N)</td><td>90 ppm</td>"));
    assert!(html.contains("<td>Temperature</td><td>20.5 °C</td>"));
    assert!(html.contains("<td>Humidity</td><td>82.0%</td>"));
    assert!(html.contains("<td>pH Level</td><td>6.5</td>"));
    assert!(html.contains("<td>Rainfall</td><td>80.0 mm</td>"));
    // Sliders keep the submitted position.
    assert!(html.contains("name=\"nitrogen\" min=\"0\" max=\"150\" step=\"1\" value=\"90\""));
}

#[tokio::test]
async fn missing_fields_fall_back_to_defaults() {
    let (_dir, app) = forest_app();
    let (status, html) = send(app, post_form("")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(">Rice</span>"));
    assert!(html.contains("<td>Rainfall</td><td>150.0 mm</td>"));
}

#[tokio::test]
async fn failed_prediction_still_renders_the_form() {
    let (status, html) = send(broken_app(), post_form("rainfall=80")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("error-box"));
    assert!(html.contains("tree walk diverged"));
    assert_eq!(html.matches("type=\"range\"").count(), FEATURE_COUNT);
    assert!(!html.contains("Recommended Crop"));
}

#[tokio::test]
async fn json_api_returns_crop_and_summary() {
    let (_dir, app) = forest_app();
    let (status, body) = send(app, post_json(r#"{"rainfall": 80, "nitrogen": 500}"#)).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["crop"], "Maize");
    assert_eq!(json["class_index"], 11);
    let summary = json["summary"].as_array().unwrap();
    assert_eq!(summary.len(), FEATURE_COUNT);
    assert_eq!(summary[0]["parameter"], "Nitrogen (N)");
    // Clamped to the slider maximum.
    assert_eq!(summary[0]["value"], "150 ppm");
}

#[tokio::test]
async fn json_api_maps_prediction_failure_to_422() {
    let (status, body) = send(broken_app(), post_json("{}")).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"]["code"], "PREDICTION_FAILED");
    assert!(json["error"]["message"]
        .as_str()
        .unwrap()
        .contains("tree walk diverged"));
}

#[tokio::test]
async fn readiness_reports_decode_strategy() {
    let (_dir, app) = forest_app();
    let (status, body) = send(app, get("/ready")).await;

    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ready");
    assert_eq!(json["components"]["model"], "ready");
    assert_eq!(json["model"]["strategy"], "binary");
    assert_eq!(json["model"]["best_effort"], false);
    assert_eq!(json["model"]["n_classes"], 2);
}

#[tokio::test]
async fn health_is_always_up() {
    let (status, body) = send(broken_app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn unknown_route_is_404_envelope() {
    let (status, body) = send(broken_app(), get("/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn request_id_is_echoed() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = broken_app().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn metrics_route_respects_toggle() {
    let model = LoadedModel::new(
        Arc::new(Broken),
        stub_metadata(),
        DecodeStrategy::Binary,
        "broken.bin",
        Vec::new(),
    );
    let config = ServerConfig {
        metrics_enabled: false,
        ..ServerConfig::default()
    };
    let app = build_router(Arc::new(ServerState::with_model(config, model)));
    let (status, _) = send(app, get("/metrics")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_route_serves_prometheus_text() {
    let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .build_recorder()
        .handle();
    let model = LoadedModel::new(
        Arc::new(Broken),
        stub_metadata(),
        DecodeStrategy::Binary,
        "broken.bin",
        Vec::new(),
    );
    let state = ServerState::with_model(ServerConfig::default(), model).with_metrics(handle);
    let response = build_router(Arc::new(state))
        .oneshot(get("/metrics"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
}

#[test]
fn missing_artifact_aborts_startup() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ServerConfig::default();
    config.artifact.path = dir.path().join("absent.bin");

    let err = match ServerState::new(config) {
        Ok(_) => panic!("state built without a model"),
        Err(err) => err,
    };
    assert!(matches!(err, ServerError::Startup(_)));
    assert!(err.to_string().contains("absent.bin"));
}

#[test]
fn model_with_wrong_input_width_aborts_startup() {
    let narrow = ModelArtifact {
        feature_names: vec!["N".into(), "P".into(), "K".into()],
        trees: vec![TreeArrays {
            feature: vec![0, -2, -2],
            ..rainfall_artifact().trees.remove(0)
        }],
        ..rainfall_artifact()
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("narrow.json");
    std::fs::write(&path, serde_json::to_vec(&narrow).unwrap()).unwrap();
    let mut config = ServerConfig::default();
    config.artifact.path = path;

    let err = match ServerState::new(config) {
        Ok(_) => panic!("state built around a model that cannot take slider input"),
        Err(err) => err,
    };
    assert!(matches!(err, ServerError::Startup(_)));
    assert!(err.to_string().contains("expects 3 features"));
}
