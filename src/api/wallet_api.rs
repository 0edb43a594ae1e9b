//! 钱包账本 API
//!
//! 只负责请求解析与金额换算，余额规则全部在服务层

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{
        middleware::TraceId,
        response::{created_response, success_response, ApiResponse},
    },
    app_state::AppState,
    domain::{to_minor_units, TransactionRequest, Wallet},
    error::AppError,
    service::RequestContext,
};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 请求/响应模型
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransactionRequest {
    /// 钱包ID（兼容旧客户端的 valletId 拼写）
    #[serde(alias = "valletId")]
    pub wallet_id: Uuid,
    /// DEPOSIT / WITHDRAW
    pub operation_type: String,
    /// 主单位金额，最多两位小数
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletResponse {
    pub wallet_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalanceResponse {
    pub wallet_id: Uuid,
    pub balance: Decimal,
}

impl From<Wallet> for WalletBalanceResponse {
    fn from(wallet: Wallet) -> Self {
        Self {
            wallet_id: wallet.id,
            balance: wallet.balance_decimal(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub checked_at: DateTime<Utc>,
}

/// 最小交易金额：0.01
fn min_amount() -> Decimal {
    Decimal::new(1, 2)
}

fn request_context(trace_id: Option<Extension<TraceId>>) -> RequestContext {
    match trace_id {
        Some(Extension(TraceId(id))) => RequestContext::new(id),
        None => RequestContext::background(),
    }
}

/// 主单位金额 → 最小单位，拒绝小于 0.01 或超过两位小数的金额
pub fn parse_amount(amount: Decimal) -> Result<i64, AppError> {
    if amount < min_amount() {
        return Err(AppError::invalid_amount("amount must be at least 0.01"));
    }
    to_minor_units(amount)
        .ok_or_else(|| AppError::invalid_amount("amount must have at most 2 decimal places"))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 处理器
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// POST /api/v1/wallets
pub async fn create_wallet(
    State(st): State<Arc<AppState>>,
    trace_id: Option<Extension<TraceId>>,
) -> Result<(StatusCode, Json<ApiResponse<CreateWalletResponse>>), AppError> {
    let ctx = request_context(trace_id);
    let wallet_id = st
        .wallets
        .create(&ctx)
        .await
        .map_err(|e| AppError::from(e).with_trace_id(&ctx.trace_id))?;

    created_response(CreateWalletResponse { wallet_id })
}

/// GET /api/v1/wallets/:wallet_id
pub async fn get_wallet_balance(
    State(st): State<Arc<AppState>>,
    trace_id: Option<Extension<TraceId>>,
    Path(wallet_id): Path<String>,
) -> Result<Json<ApiResponse<WalletBalanceResponse>>, AppError> {
    let ctx = request_context(trace_id);
    let wallet_id = Uuid::parse_str(&wallet_id)
        .map_err(|_| AppError::bad_request("incorrect wallet uuid").with_trace_id(&ctx.trace_id))?;

    let wallet = st
        .wallets
        .get_balance(&ctx, wallet_id)
        .await
        .map_err(|e| AppError::from(e).with_trace_id(&ctx.trace_id))?;

    success_response(wallet.into())
}

/// POST /api/v1/wallet
pub async fn apply_transaction(
    State(st): State<Arc<AppState>>,
    trace_id: Option<Extension<TraceId>>,
    payload: Result<Json<WalletTransactionRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<WalletBalanceResponse>>, AppError> {
    let ctx = request_context(trace_id);
    let Json(body) = payload.map_err(|e| AppError::from(e).with_trace_id(&ctx.trace_id))?;

    let amount = parse_amount(body.amount).map_err(|e| e.with_trace_id(&ctx.trace_id))?;
    let req = TransactionRequest {
        wallet_id: body.wallet_id,
        operation_type: body.operation_type,
        amount,
    };

    let wallet = st
        .wallets
        .apply(&ctx, &req)
        .await
        .map_err(|e| AppError::from(e).with_trace_id(&ctx.trace_id))?;

    success_response(wallet.into())
}

/// GET /healthz
pub async fn healthz(
    State(st): State<Arc<AppState>>,
    trace_id: Option<Extension<TraceId>>,
) -> Result<Json<ApiResponse<HealthResponse>>, AppError> {
    if !st.wallets.is_healthy().await {
        let ctx = request_context(trace_id);
        return Err(AppError::service_unavailable("store unavailable").with_trace_id(ctx.trace_id));
    }
    success_response(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        checked_at: Utc::now(),
    })
}

/// 未匹配的路由
pub async fn route_not_found(trace_id: Option<Extension<TraceId>>) -> AppError {
    let ctx = request_context(trace_id);
    AppError::not_found("route not found").with_trace_id(ctx.trace_id)
}
