use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use hypertension_api::application::ml::{LoadState, ModelLifecycle, PredictionService};
use hypertension_api::domain::ports::ModelHandle;
use hypertension_api::infrastructure::ml::LogisticPipeline;
use hypertension_api::interfaces::http::{AppState, router};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Only `age` and `oldpeak` carry weight: z = (age - 50) / 10 + 0.5 * oldpeak
fn artifact() -> Value {
    let mut mean = vec![0.0; 13];
    let mut scale = vec![1.0; 13];
    let mut coefficients = vec![0.0; 13];
    mean[0] = 50.0;
    scale[0] = 10.0;
    coefficients[0] = 1.0;
    coefficients[9] = 0.5;

    json!({
        "model_type": "Logistic Regression Pipeline",
        "feature_names": [
            "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach",
            "exang", "oldpeak", "slope", "ca", "thal"
        ],
        "scaler": { "mean": mean, "scale": scale },
        "coefficients": coefficients,
        "intercept": 0.0
    })
}

fn write_artifact(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{}_{}.json", name, std::process::id()));
    std::fs::write(&path, artifact().to_string()).unwrap();
    path
}

fn patient(age: f64, oldpeak: f64) -> Value {
    json!({
        "age": age, "sex": 1, "cp": 3, "trestbps": 140, "chol": 250, "fbs": 0,
        "restecg": 1, "thalach": 150, "exang": 0, "oldpeak": oldpeak, "slope": 1,
        "ca": 0, "thal": 3
    })
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

async fn call(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_artifact_from_disk_serves_predictions() {
    let path = write_artifact("hypertension_pipeline_it");
    let mut lifecycle = ModelLifecycle::new();
    let model = lifecycle
        .load_with(|| Ok(Arc::new(LogisticPipeline::load(&path)?) as ModelHandle))
        .unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(lifecycle.state(), LoadState::Ready);

    let app = router(
        AppState::new(PredictionService::new(model), None),
        Duration::from_secs(5),
    );

    let (status, info) = call(
        app.clone(),
        Request::builder().uri("/model-info").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(info["model_type"], "Logistic Regression Pipeline");
    assert_eq!(info["num_features"], 13);
    assert_eq!(info["features"][12], "thal");

    // z = 1.5 + 1.0
    let (status, body) = call(app.clone(), post("/predict", &patient(65.0, 2.0))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], 1);
    let probability = body["probability"].as_f64().unwrap();
    assert!((probability - sigmoid(2.5)).abs() < 1e-12);
    assert_eq!(body["confidence"], "High");

    // z = -0.5 and z = 0.0
    let batch = json!([patient(45.0, 0.0), patient(50.0, 0.0)]);
    let (status, body) = call(app, post("/predict-batch", &batch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_patients"], 2);
    assert_eq!(body["predictions"][0]["prediction"], 0);
    assert_eq!(body["predictions"][0]["confidence"], "Medium");
    assert_eq!(body["predictions"][1]["probability"], 0.5);
    assert_eq!(body["predictions"][1]["confidence"], "Low");
}

#[test]
fn test_invalid_artifact_fails_lifecycle() {
    let mut broken = artifact();
    broken["coefficients"] = json!([1.0, 2.0]);
    let path = std::env::temp_dir().join(format!(
        "hypertension_pipeline_broken_{}.json",
        std::process::id()
    ));
    std::fs::write(&path, broken.to_string()).unwrap();

    let mut lifecycle = ModelLifecycle::new();
    let result = lifecycle.load_with(|| Ok(Arc::new(LogisticPipeline::load(&path)?) as ModelHandle));
    std::fs::remove_file(&path).ok();

    assert!(result.is_err());
    assert_eq!(lifecycle.state(), LoadState::Failed);
}
