//! HTTP 接口测试（内存存储，直接驱动 Router）

mod common;

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wallet_ledger::{
    api,
    app_state::AppState,
    config::Config,
    domain::{MinorUnits, WalletId},
    repository::{RepoError, RepoResult, WalletRepository},
};

/// 存储不可达
struct DownStore;

#[async_trait]
impl WalletRepository for DownStore {
    async fn create(&self) -> RepoResult<WalletId> {
        Err(RepoError::Store(anyhow!("connection refused")))
    }
    async fn get_balance(&self, _: WalletId) -> RepoResult<MinorUnits> {
        Err(RepoError::Store(anyhow!("connection refused")))
    }
    async fn adjust_balance(&self, _: WalletId, _: MinorUnits) -> RepoResult<MinorUnits> {
        Err(RepoError::Store(anyhow!("connection refused")))
    }
    async fn ping(&self) -> RepoResult<()> {
        Err(RepoError::Store(anyhow!("connection refused")))
    }
}

fn down_app() -> Router {
    let config = Arc::new(Config::from_env().unwrap());
    let state = AppState::with_repository(Arc::new(DownStore), None, config);
    api::routes(Arc::new(state))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let trace_id = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, trace_id, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn create_wallet(app: &Router) -> String {
    let (status, _, body) = send(
        app,
        Request::builder()
            .method("POST")
            .uri("/api/v1/wallets")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["walletId"].as_str().unwrap().to_string()
}

fn transaction(wallet_id: &str, operation_type: &str, amount: Value) -> Request<Body> {
    post_json(
        "/api/v1/wallet",
        json!({
            "walletId": wallet_id,
            "operationType": operation_type,
            "amount": amount,
        }),
    )
}

#[tokio::test]
async fn test_wallet_lifecycle_over_http() {
    let app = common::memory_app();
    let wallet_id = create_wallet(&app).await;

    let (status, _, body) = send(&app, get(&format!("/api/v1/wallets/{wallet_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["walletId"], wallet_id.as_str());
    assert_eq!(body["data"]["balance"], "0.00");

    let (status, _, body) = send(&app, transaction(&wallet_id, "DEPOSIT", json!(100))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["balance"], "100.00");

    let (status, _, body) = send(&app, transaction(&wallet_id, "WITHDRAW", json!("30.25"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["balance"], "69.75");

    let (status, _, body) = send(&app, transaction(&wallet_id, "WITHDRAW", json!(1000))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "insufficient_balance");

    let (_, _, body) = send(&app, get(&format!("/api/v1/wallets/{wallet_id}"))).await;
    assert_eq!(body["data"]["balance"], "69.75");
}

#[tokio::test]
async fn test_legacy_wallet_id_alias() {
    let app = common::memory_app();
    let wallet_id = create_wallet(&app).await;

    let req = post_json(
        "/api/v1/wallet",
        json!({ "valletId": wallet_id, "operationType": "DEPOSIT", "amount": "0.01" }),
    );
    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["balance"], "0.01");
}

#[tokio::test]
async fn test_malformed_wallet_id_is_bad_request() {
    let app = common::memory_app();

    let (status, _, body) = send(&app, get("/api/v1/wallets/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "incorrect wallet uuid");
    assert!(body["trace_id"].is_string());
}

#[tokio::test]
async fn test_unknown_wallet_is_not_found() {
    let app = common::memory_app();
    let missing = uuid::Uuid::new_v4().to_string();

    let (status, _, body) = send(&app, get(&format!("/api/v1/wallets/{missing}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "wallet_not_found");

    let (status, _, _) = send(&app, transaction(&missing, "DEPOSIT", json!(5))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_amounts_are_rejected() {
    let app = common::memory_app();
    let wallet_id = create_wallet(&app).await;

    for amount in [json!(0), json!(-10), json!("0.001"), json!("12.345")] {
        let (status, _, body) = send(&app, transaction(&wallet_id, "DEPOSIT", amount)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_amount");
    }

    let (_, _, body) = send(&app, get(&format!("/api/v1/wallets/{wallet_id}"))).await;
    assert_eq!(body["data"]["balance"], "0.00");
}

#[tokio::test]
async fn test_unsupported_operation_is_rejected() {
    let app = common::memory_app();
    let wallet_id = create_wallet(&app).await;

    let (status, _, body) = send(&app, transaction(&wallet_id, "TRANSFER", json!(10))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "unsupported_operation");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = common::memory_app();

    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/wallet")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");

    let (status, _, _) = send(
        &app,
        post_json("/api/v1/wallet", json!({ "walletId": "x", "operationType": "DEPOSIT", "amount": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_trace_id_is_echoed() {
    let app = common::memory_app();

    let req = Request::builder()
        .uri("/api/v1/wallets/not-a-uuid")
        .header("X-Trace-Id", "trace-abc")
        .body(Body::empty())
        .unwrap();
    let (_, trace_id, body) = send(&app, req).await;
    assert_eq!(trace_id.as_deref(), Some("trace-abc"));
    assert_eq!(body["trace_id"], "trace-abc");

    let (_, trace_id, _) = send(&app, get("/healthz")).await;
    assert!(trace_id.is_some());
}

#[tokio::test]
async fn test_healthz_with_memory_store() {
    let app = common::memory_app();

    let (status, _, body) = send(&app, get("/healthz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_deposit_past_balance_limit_is_rejected() {
    let app = common::memory_app();
    let wallet_id = create_wallet(&app).await;

    let (status, _, _) = send(&app, transaction(&wallet_id, "DEPOSIT", json!("0.05"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = send(
        &app,
        transaction(&wallet_id, "DEPOSIT", json!("92233720368547758.07")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "balance_limit_exceeded");

    let (_, _, body) = send(&app, get(&format!("/api/v1/wallets/{wallet_id}"))).await;
    assert_eq!(body["data"]["balance"], "0.05");
}

#[tokio::test]
async fn test_unknown_route_carries_trace_id() {
    let app = common::memory_app();

    let req = Request::builder()
        .uri("/api/v1/nope")
        .header("X-Trace-Id", "trace-404")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["trace_id"], "trace-404");
}

#[tokio::test]
async fn test_healthz_reports_unavailable_store() {
    let app = down_app();

    let req = Request::builder()
        .uri("/healthz")
        .header("X-Trace-Id", "trace-503")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
    assert_eq!(body["trace_id"], "trace-503");
}

#[tokio::test]
async fn test_store_failure_is_opaque_over_http() {
    let app = down_app();

    let (status, _, body) = send(
        &app,
        transaction(&uuid::Uuid::new_v4().to_string(), "DEPOSIT", json!(1)),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "wallet service transaction error");
}
