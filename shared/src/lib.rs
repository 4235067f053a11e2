//! Shared types for the support ticket tracker
//!
//! Types used by both `ticket-server` and `ticket-client`: the ticket model
//! and its DTOs, the real-time event envelope, the unified error body and
//! small time/id helpers.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use http;
pub use message::{ClientCommand, TicketEvent};
pub use serde::{Deserialize, Serialize};
