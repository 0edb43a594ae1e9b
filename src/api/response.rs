//! 统一 API 响应格式
//!
//! 所有 API 接口应使用统一的响应格式：{ code, message, data }

use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::error::AppError;

/// 统一成功响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
}

/// 错误响应格式由 AppError 实现：{ code: "error_code", message: "error_message", trace_id?: "trace_id" }

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            message: "success".to_string(),
            data,
        }
    }
}

/// 辅助函数：将数据包装为统一响应格式
pub fn success_response<T: Serialize>(data: T) -> Result<Json<ApiResponse<T>>, AppError> {
    Ok(Json(ApiResponse::success(data)))
}

/// 辅助函数：201 Created + 统一响应格式
pub fn created_response<T: Serialize>(
    data: T,
) -> Result<(StatusCode, Json<ApiResponse<T>>), AppError> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}
