//! Error type and the JSON error body

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Serializes directly as the error body every non-2xx response carries:
///
/// ```json
/// { "code": 7, "message": "title is required", "details": { "field": "title" } }
/// ```
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    /// Field-level context, e.g. `{"field": "requesterEmail"}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// Name of the offending field, if this is a field-level error
    pub fn field(&self) -> Option<&str> {
        self.details.as_ref()?.get("field")?.as_str()
    }

    // ==================== Convenience constructors ====================

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Validation error naming the offending field
    pub fn invalid_field(field: &str, msg: impl Into<String>) -> Self {
        Self::validation(msg).with_detail("field", field)
    }

    pub fn required(field: &str) -> Self {
        Self::with_message(ErrorCode::RequiredField, format!("{field} is required"))
            .with_detail("field", field)
    }

    pub fn too_long(field: &str, max_len: usize) -> Self {
        Self::with_message(
            ErrorCode::ValueOutOfRange,
            format!("{field} is too long (max {max_len} characters)"),
        )
        .with_detail("field", field)
        .with_detail("maxLength", max_len)
    }

    pub fn invalid_email(field: &str) -> Self {
        Self::with_message(
            ErrorCode::InvalidEmail,
            format!("{field} must be a valid email address"),
        )
        .with_detail("field", field)
    }

    pub fn ticket_not_found(id: &str) -> Self {
        Self::with_message(ErrorCode::TicketNotFound, format!("Ticket {id} not found"))
            .with_detail("id", id)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    pub fn is_not_found(&self) -> bool {
        self.http_status() == StatusCode::NOT_FOUND
    }

    pub fn is_validation(&self) -> bool {
        self.http_status() == StatusCode::BAD_REQUEST
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();

        // System errors are logged with their cause; the caller only sees the generic message
        if self.code.is_system() {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
            return (status, Json(AppError::new(self.code))).into_response();
        }

        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::NotFound);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Resource not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_field_detail() {
        let err = AppError::required("title");
        assert_eq!(err.field(), Some("title"));
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert!(err.is_validation());

        let err = AppError::invalid_email("requesterEmail");
        assert_eq!(err.code, ErrorCode::InvalidEmail);
        assert_eq!(err.field(), Some("requesterEmail"));
    }

    #[test]
    fn test_error_body_shape() {
        let json = serde_json::to_value(AppError::invalid_field("assignedTo", "assignedTo must not be blank")).unwrap();
        assert_eq!(json["code"], 2);
        assert_eq!(json["message"], "assignedTo must not be blank");
        assert_eq!(json["details"]["field"], "assignedTo");

        let json = serde_json::to_value(AppError::internal("boom")).unwrap();
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_error_body_parses_back() {
        let err: AppError =
            serde_json::from_str(r#"{"code":4001,"message":"Ticket x not found"}"#).unwrap();
        assert_eq!(err.code, ErrorCode::TicketNotFound);
        assert!(err.is_not_found());
        assert!(err.field().is_none());
    }
}
