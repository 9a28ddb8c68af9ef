//! End-to-end tests for the dashboard API router

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sithwash::api::{create_router, AppState};
use sithwash::{AppConfig, ModelSchema, ScoringTelemetry, SithEngine};
use std::sync::Arc;
use tower::ServiceExt;

fn test_state() -> Arc<AppState> {
    let engine = SithEngine::new(Arc::new(ModelSchema::builtin().expect("builtin schema")));
    let telemetry = Arc::new(ScoringTelemetry::new());
    Arc::new(AppState::new(engine, AppConfig::default(), telemetry))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

#[tokio::test]
async fn test_health_on_root_and_v1() {
    let state = test_state();

    for uri in ["/health", "/v1/health"] {
        let (status, body) = send(create_router(state.clone()), get(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["status"], "healthy");
        assert_eq!(body["data"]["featureCount"], 20);
        assert!(body["latencyMs"].is_number());
        assert!(body["timestamp"].is_number());
    }
}

#[tokio::test]
async fn test_predict_high_risk_record() {
    let request = post_json(
        "/v1/predict",
        json!({
            "totalERC20Tnxs": 250,
            "erc20UniqRecAddr": 45,
            "maxValueReceived": 50000,
            "avgValueReceived": 850
        }),
    );
    let (status, body) = send(create_router(test_state()), request).await;

    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["isFraud"], true);
    assert_eq!(data["confidence"], "high");
    assert_eq!(data["riskScore"], 86);
    assert_eq!(data["topFeatures"].as_array().map(Vec::len), Some(5));
    assert_eq!(
        data["reasoning"][0],
        "🚨 HIGH FRAUD RISK: Multiple suspicious patterns detected"
    );
}

#[tokio::test]
async fn test_predict_rejects_malformed_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/predict")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let (status, body) = send(create_router(test_state()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "API_BAD_REQUEST");
}

#[tokio::test]
async fn test_analyze_returns_cached_transaction() {
    let state = test_state();
    let (status, body) = send(
        create_router(state.clone()),
        post_json("/v1/analyze", json!({ "totalERC20Tnxs": 80 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let transaction = &body["data"]["transaction"];
    assert_eq!(transaction["type"], "incoming");
    assert_eq!(transaction["status"], "confirmed");
    assert_eq!(transaction["features"]["sentTnx"], 0.0);
    assert_eq!(transaction["mlPrediction"], body["data"]["mlPrediction"]);

    let id = transaction["id"].as_str().expect("id").to_string();
    let (status, body) = send(
        create_router(state),
        get(&format!("/v1/transactions/{}", id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());
}

#[tokio::test]
async fn test_transactions_batch_and_detail() {
    let state = test_state();
    let (status, body) = send(
        create_router(state.clone()),
        get("/v1/transactions?count=12"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["count"], 12);
    let transactions = body["data"]["transactions"].as_array().expect("array");
    assert_eq!(transactions.len(), 12);

    for tx in transactions {
        let flagged = tx["mlPrediction"]["isFraud"].as_bool().expect("bool");
        assert_eq!(tx.get("flaggedReason").is_some(), flagged);
    }

    let id = transactions[0]["id"].as_str().expect("id").to_string();
    let (status, _) = send(create_router(state.clone()), get(&format!("/v1/transactions/{}", id))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, stats) = send(create_router(state), get("/v1/stats")).await;
    assert_eq!(stats["data"]["telemetry"]["totalAnalyzed"], 12);
    assert_eq!(stats["data"]["cache"]["entries"], 12);
}

#[tokio::test]
async fn test_repeated_batches_keep_cache_bounded() {
    let engine = SithEngine::new(Arc::new(ModelSchema::builtin().expect("builtin schema")));
    let config = AppConfig {
        cache_max_entries: 600,
        ..AppConfig::default()
    };
    let state = Arc::new(AppState::new(engine, config, Arc::new(ScoringTelemetry::new())));

    for _ in 0..4 {
        let (status, _) = send(
            create_router(state.clone()),
            get("/v1/transactions?count=500"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, stats) = send(create_router(state), get("/v1/stats")).await;
    assert_eq!(stats["data"]["telemetry"]["totalAnalyzed"], 2000);
    assert_eq!(stats["data"]["cache"]["entries"], 600);
    assert_eq!(stats["data"]["cache"]["maxEntries"], 600);
}

#[tokio::test]
async fn test_transactions_count_bounds() {
    let state = test_state();
    for uri in ["/v1/transactions?count=0", "/v1/transactions?count=501", "/v1/transactions?count=abc"] {
        let (status, body) = send(create_router(state.clone()), get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["error"]["code"], "API_BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_real_world_patterns() {
    let (status, body) = send(create_router(test_state()), get("/v1/transactions/real-world")).await;

    assert_eq!(status, StatusCode::OK);
    let transactions = body["data"]["transactions"].as_array().expect("array");
    assert_eq!(transactions.len(), 3);
    assert!(transactions[0]["id"].as_str().expect("id").starts_with("real_1_"));
    assert_eq!(transactions[0]["riskLevel"], "critical");
}

#[tokio::test]
async fn test_unknown_transaction_is_not_found() {
    let (status, body) = send(create_router(test_state()), get("/v1/transactions/0xdeadbeef")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "API_NOT_FOUND");
}

#[tokio::test]
async fn test_sample_and_model_endpoints() {
    let state = test_state();

    let (status, body) = send(create_router(state.clone()), get("/v1/sample?fraudulent=true")).await;
    assert_eq!(status, StatusCode::OK);
    let tnxs = body["data"]["totalERC20Tnxs"].as_f64().expect("number");
    assert!((150.0..450.0).contains(&tnxs));

    let (status, body) = send(create_router(state), get("/v1/model")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["modelType"], "RandomForestClassifier");
    assert_eq!(body["data"]["features"].as_array().map(Vec::len), Some(20));
    assert_eq!(body["data"]["features"][0]["mapped"], false);
    assert_eq!(body["data"]["issues"].as_array().map(Vec::len), Some(0));
}
