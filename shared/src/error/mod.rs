//! Unified error system
//!
//! - [`ErrorCode`]: Standardized error codes, serialized as `u16`
//! - [`AppError`]: Error type with code, message and details; doubles as the
//!   JSON error body
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Ticket errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::NotFound);
//! assert_eq!(err.http_status().as_u16(), 404);
//!
//! let err = AppError::validation("title must not be empty").with_detail("field", "title");
//! assert_eq!(err.field(), Some("title"));
//! ```

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
