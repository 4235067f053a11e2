//! 统一错误处理
//!
//! 应用错误类型来自 `shared::error`，这里补充：
//! - [`RepoError`] → [`AppError`] 转换
//! - axum 提取器拒绝 (JSON body / query string) → 400
//!
//! # 错误响应
//!
//! ```json
//! { "code": 7, "message": "title is required", "details": { "field": "title" } }
//! ```

use axum::Json;
use axum::extract::Query;
use axum::extract::rejection::{JsonRejection, QueryRejection};

use crate::db::repository::RepoError;

pub use shared::error::{AppError, AppResult, ErrorCode};

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(id) => AppError::ticket_not_found(&id),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Unwrap a JSON body, mapping any rejection to `InvalidRequest`
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AppError::invalid_request(format!("Invalid JSON body: {}", e.body_text())))
}

/// Unwrap a query string, mapping any rejection to `InvalidRequest`
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> AppResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|e| AppError::invalid_request(format!("Invalid query string: {}", e.body_text())))
}
