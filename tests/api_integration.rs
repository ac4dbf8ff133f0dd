use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use futures_util::stream;
use hypertension_api::application::ml::PredictionService;
use hypertension_api::infrastructure::MockClassifier;
use hypertension_api::infrastructure::observability::Metrics;
use hypertension_api::interfaces::http::{AppState, router};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn patient() -> Value {
    json!({
        "age": 65, "sex": 1, "cp": 3, "trestbps": 140, "chol": 250, "fbs": 0,
        "restecg": 1, "thalach": 150, "exang": 0, "oldpeak": 2.0, "slope": 1,
        "ca": 0, "thal": 3
    })
}

fn app_with(mock: Option<Arc<MockClassifier>>, metrics: Option<Metrics>) -> Router {
    let service = match mock {
        Some(model) => PredictionService::new(model),
        None => PredictionService::unloaded(),
    };
    router(AppState::new(service, metrics), Duration::from_secs(5))
}

fn ready_app() -> (Arc<MockClassifier>, Router) {
    let mock = Arc::new(MockClassifier::constant(1, 0.82));
    (mock.clone(), app_with(Some(mock), None))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn post(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    post(app, uri, body.to_string()).await
}

#[tokio::test]
async fn test_health_before_and_after_load() {
    let (status, body) = get(app_with(None, None), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "model_loaded": false}));

    let (_, app) = ready_app();
    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "model_loaded": true}));
}

#[tokio::test]
async fn test_root_describes_api() {
    let (status, body) = get(app_with(None, None), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Hypertension Prediction API");
    assert_eq!(body["health"], "/health");
}

#[tokio::test]
async fn test_model_info() {
    let (_, app) = ready_app();
    let (status, body) = get(app, "/model-info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_type"], "Mock Classifier");
    assert_eq!(body["num_features"], 13);
    assert_eq!(body["features"].as_array().unwrap().len(), 13);
    assert_eq!(body["features"][9], "oldpeak");
    assert_eq!(body["target_classes"], json!([0, 1]));
    assert_eq!(
        body["target_description"],
        json!({"0": "No hypertension", "1": "Hypertension"})
    );
}

#[tokio::test]
async fn test_model_info_not_ready() {
    let (status, body) = get(app_with(None, None), "/model-info").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "model_not_ready");
    assert_eq!(body["detail"], "Model not loaded");
}

#[tokio::test]
async fn test_predict_end_to_end() {
    let (mock, app) = ready_app();
    let (status, body) = post_json(app, "/predict", &patient()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"prediction": 1, "probability": 0.82, "confidence": "High"})
    );
    assert_eq!(mock.predict_calls(), 1);
}

#[tokio::test]
async fn test_predict_missing_field_never_reaches_model() {
    let (mock, app) = ready_app();
    let mut record = patient();
    record.as_object_mut().unwrap().remove("cp");

    let (status, body) = post_json(app, "/predict", &record).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["violations"][0]["field"], "cp");
    assert_eq!(body["violations"][0]["reason"]["kind"], "missing");
    assert_eq!(mock.predict_calls(), 0);
}

#[tokio::test]
async fn test_predict_age_bounds() {
    let (_, app) = ready_app();
    let mut record = patient();

    record["age"] = json!(150);
    let (status, body) = post_json(app.clone(), "/predict", &record).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["violations"][0]["field"], "age");
    assert_eq!(body["violations"][0]["reason"]["max"], 120.0);

    record["age"] = json!(120);
    let (status, _) = post_json(app, "/predict", &record).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_predict_not_ready() {
    let (status, body) = post_json(app_with(None, None), "/predict", &patient()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "model_not_ready");
}

#[tokio::test]
async fn test_predict_inference_failure_does_not_leak_internals() {
    let mock = Arc::new(MockClassifier::failing("X has 13 features, expecting 14"));
    let app = app_with(Some(mock), None);

    let (status, body) = post_json(app, "/predict", &patient()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "inference_error");
    assert!(!body["detail"].as_str().unwrap().contains("expecting 14"));
}

#[tokio::test]
async fn test_predict_malformed_json() {
    let (mock, app) = ready_app();
    let (status, body) = post(app, "/predict", "{\"age\": ".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_body");
    assert_eq!(mock.predict_calls(), 0);
}

#[tokio::test]
async fn test_predict_batch_assigns_patient_ids_in_order() {
    let (mock, app) = ready_app();
    let records: Vec<Value> = (0..7).map(|_| patient()).collect();

    let (status, body) = post_json(app, "/predict-batch", &json!(records)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_patients"], 7);
    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 7);
    for (i, item) in predictions.iter().enumerate() {
        assert_eq!(item["patient_id"], i);
        assert_eq!(item["prediction"], 1);
        assert_eq!(item["confidence"], "High");
    }
    assert_eq!(mock.predict_calls(), 1);
}

#[tokio::test]
async fn test_predict_batch_at_cap() {
    let (_, app) = ready_app();
    let records: Vec<Value> = (0..100).map(|_| patient()).collect();
    let (status, body) = post_json(app, "/predict-batch", &json!(records)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_patients"], 100);
    assert_eq!(body["predictions"][99]["patient_id"], 99);
}

#[tokio::test]
async fn test_predict_batch_too_large() {
    let (mock, app) = ready_app();
    let records: Vec<Value> = (0..101).map(|_| patient()).collect();

    let (status, body) = post_json(app, "/predict-batch", &json!(records)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "batch_too_large");
    assert_eq!(
        body["detail"],
        "Batch size too large. Maximum 100 predictions allowed."
    );
    assert_eq!(mock.predict_calls(), 0);
}

#[tokio::test]
async fn test_predict_batch_row_violation() {
    let (mock, app) = ready_app();
    let mut bad = patient();
    bad["thal"] = json!(7);
    let records = json!([patient(), patient(), bad]);

    let (status, body) = post_json(app, "/predict-batch", &records).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["violations"][0]["row"], 2);
    assert_eq!(body["violations"][0]["field"], "thal");
    assert_eq!(mock.predict_calls(), 0);
}

#[tokio::test]
async fn test_predict_batch_requires_array() {
    let (_, app) = ready_app();
    let (status, body) = post_json(app, "/predict-batch", &patient()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["violations"][0]["reason"]["kind"], "not_an_array");
}

#[tokio::test]
async fn test_predict_batch_not_ready() {
    let (status, body) =
        post_json(app_with(None, None), "/predict-batch", &json!([patient()])).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "model_not_ready");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let mock = Arc::new(MockClassifier::constant(0, 0.45));
    let app = app_with(Some(mock), Some(Metrics::new().unwrap()));

    let (status, body) = post_json(app.clone(), "/predict", &patient()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["confidence"], "Low");

    let mut record = patient();
    record["chol"] = json!(601);
    let (status, _) = post_json(app.clone(), "/predict", &record).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let text = String::from_utf8(
        to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec(),
    )
    .unwrap();

    assert!(text.contains("hypertension_model_loaded 1"));
    assert!(text.contains(r#"hypertension_requests_total{endpoint="predict",outcome="ok"} 1"#));
    assert!(text.contains(
        r#"hypertension_requests_total{endpoint="predict",outcome="validation_error"} 1"#
    ));
    assert!(text.contains(r#"hypertension_confidence_total{band="Low"} 1"#));
}

async fn metrics_text(app: Router) -> String {
    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_failed_requests_are_timed() {
    let app = app_with(
        Some(Arc::new(MockClassifier::failing("numeric overflow"))),
        Some(Metrics::new().unwrap()),
    );

    let mut record = patient();
    record["age"] = json!(150);
    let (status, _) = post_json(app.clone(), "/predict", &record).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = post_json(app.clone(), "/predict-batch", &json!([patient()])).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let text = metrics_text(app).await;
    assert!(text.contains(r#"hypertension_inference_latency_seconds_count{endpoint="predict"} 1"#));
    assert!(text.contains(
        r#"hypertension_inference_latency_seconds_count{endpoint="predict_batch"} 1"#
    ));
}

#[tokio::test]
async fn test_stalled_body_times_out_with_error_envelope() {
    let (mock, _) = ready_app();
    let state = AppState::new(PredictionService::new(mock.clone()), Some(Metrics::new().unwrap()));
    let app = router(state, Duration::from_millis(200));

    let stalled = stream::pending::<Result<Vec<u8>, std::io::Error>>();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from_stream(stalled))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "timeout");
    assert_eq!(body["detail"], "Request timed out");
    assert_eq!(mock.predict_calls(), 0);

    let text = metrics_text(app).await;
    assert!(text.contains(r#"hypertension_requests_total{endpoint="predict",outcome="timeout"} 1"#));
}

#[tokio::test]
async fn test_metrics_disabled() {
    let response = app_with(None, None)
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_concurrent_requests_share_one_model() {
    tokio_test::block_on(async {
        let (mock, app) = ready_app();
        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..20 {
            let app = app.clone();
            tasks.spawn(async move { post_json(app, "/predict", &patient()).await });
        }

        while let Some(result) = tasks.join_next().await {
            let (status, body) = result.unwrap();
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["prediction"], 1);
        }
        assert_eq!(mock.predict_calls(), 20);
    });
}
