use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::service::LedgerError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppErrorCode {
    // HTTP 基础错误码
    BadRequest,
    NotFound,
    Internal,
    ServiceUnavailable,

    // 业务错误码
    WalletNotFound,
    InsufficientBalance,
    BalanceLimitExceeded,
    InvalidAmount,
    UnsupportedOperation,
}

impl AppErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppErrorCode::BadRequest => "bad_request",
            AppErrorCode::NotFound => "not_found",
            AppErrorCode::Internal => "internal",
            AppErrorCode::ServiceUnavailable => "service_unavailable",
            AppErrorCode::WalletNotFound => "wallet_not_found",
            AppErrorCode::InsufficientBalance => "insufficient_balance",
            AppErrorCode::BalanceLimitExceeded => "balance_limit_exceeded",
            AppErrorCode::InvalidAmount => "invalid_amount",
            AppErrorCode::UnsupportedOperation => "unsupported_operation",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub code: AppErrorCode,
    pub message: String,
    pub status: StatusCode,
    pub trace_id: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<&'a str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code.as_str(),
            message: &self.message,
            trace_id: self.trace_id.as_deref(),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    fn new(code: AppErrorCode, status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            code,
            message: msg.into(),
            status,
            trace_id: None,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(AppErrorCode::BadRequest, StatusCode::BAD_REQUEST, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(AppErrorCode::NotFound, StatusCode::NOT_FOUND, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            AppErrorCode::Internal,
            StatusCode::INTERNAL_SERVER_ERROR,
            msg,
        )
    }

    pub fn service_unavailable(msg: impl Into<String>) -> Self {
        Self::new(
            AppErrorCode::ServiceUnavailable,
            StatusCode::SERVICE_UNAVAILABLE,
            msg,
        )
    }

    /// 设置追踪ID
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    // 业务错误辅助函数
    pub fn wallet_not_found(msg: impl Into<String>) -> Self {
        Self::new(AppErrorCode::WalletNotFound, StatusCode::NOT_FOUND, msg)
    }

    pub fn insufficient_balance(msg: impl Into<String>) -> Self {
        Self::new(
            AppErrorCode::InsufficientBalance,
            StatusCode::UNPROCESSABLE_ENTITY,
            msg,
        )
    }

    pub fn balance_limit_exceeded(msg: impl Into<String>) -> Self {
        Self::new(
            AppErrorCode::BalanceLimitExceeded,
            StatusCode::UNPROCESSABLE_ENTITY,
            msg,
        )
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::new(AppErrorCode::InvalidAmount, StatusCode::BAD_REQUEST, msg)
    }

    pub fn unsupported_operation(msg: impl Into<String>) -> Self {
        Self::new(
            AppErrorCode::UnsupportedOperation,
            StatusCode::BAD_REQUEST,
            msg,
        )
    }
}

// 账本错误 → HTTP：业务错误精确映射，基础设施错误只暴露通用信息
impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(_) => Self::wallet_not_found("wallet not found"),
            LedgerError::InsufficientFunds(_) => Self::insufficient_balance("insufficient funds"),
            LedgerError::BalanceLimitExceeded(_) => Self::balance_limit_exceeded(err.to_string()),
            LedgerError::InvalidAmount(_) => Self::invalid_amount(err.to_string()),
            LedgerError::UnsupportedOperation(_) => Self::unsupported_operation(err.to_string()),
            LedgerError::CreationFailed
            | LedgerError::LookupFailed
            | LedgerError::TransactionFailed => Self::internal(err.to_string()),
        }
    }
}

// 从 JSON 请求体解析错误转换
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request JSON: {}", rejection.body_text()))
    }
}
