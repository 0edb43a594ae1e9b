use std::{sync::Arc, time::Instant};

use axum::{
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method},
    middleware::from_fn,
    response::Response,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    api::middleware::{trace_id_middleware, TraceId},
    app_state::AppState,
};

pub mod middleware;
pub mod response; // 统一响应格式
pub mod wallet_api;

pub fn routes(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-trace-id")])
        .expose_headers([HeaderName::from_static("x-trace-id")]);

    Router::new()
        .route("/healthz", get(wallet_api::healthz))
        .route("/api/v1/wallets", post(wallet_api::create_wallet))
        .route(
            "/api/v1/wallets/:wallet_id",
            get(wallet_api::get_wallet_balance),
        )
        // 兼容旧客户端的单数路径
        .route("/api/v1/wallet", post(wallet_api::apply_transaction))
        .fallback(wallet_api::route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(trace_id_middleware))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|req: &Request| {
                            let trace_id = req
                                .extensions()
                                .get::<TraceId>()
                                .map(|t| t.0.as_str())
                                .unwrap_or("-");
                            tracing::info_span!(
                                "http_request",
                                method = %req.method(),
                                path = %req.uri().path(),
                                trace_id = %trace_id,
                            )
                        })
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(from_fn(add_response_time_header))
                .layer(cors),
        )
        .with_state(state)
}

async fn add_response_time_header(req: Request, next: axum::middleware::Next) -> Response {
    let start = Instant::now();
    let mut resp = next.run(req).await;
    let elapsed_ms = start.elapsed().as_millis().to_string();
    resp.headers_mut().insert(
        "x-response-time",
        HeaderValue::from_str(&format!("{}ms", elapsed_ms))
            .unwrap_or(HeaderValue::from_static("0ms")),
    );
    resp
}
