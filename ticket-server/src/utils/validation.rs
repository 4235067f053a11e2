//! Input validation helpers
//!
//! Explicit checks run at the service boundary. Every failure names the
//! offending field in the error details.

use shared::models::{TicketCreate, TicketUpdate};
use validator::ValidateEmail;

use crate::utils::{AppError, AppResult};

// ── Text length limits ──────────────────────────────────────────────

pub const MAX_TITLE_LEN: usize = 200;

pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Assignee identifiers (free text: a name or a handle)
pub const MAX_ASSIGNEE_LEN: usize = 200;

// ── Field helpers ───────────────────────────────────────────────────

/// Trim a required string and check it is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::required(field));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::too_long(field, max_len));
    }
    Ok(trimmed.to_string())
}

/// Trim an email address and check its syntax.
pub fn validate_email(value: &str, field: &str) -> AppResult<String> {
    let email = validate_required_text(value, field, MAX_EMAIL_LEN)?;
    if !email.validate_email() {
        return Err(AppError::invalid_email(field));
    }
    Ok(email)
}

// ── Payloads ────────────────────────────────────────────────────────

/// Validate and normalize a create payload.
pub fn validate_ticket_create(input: TicketCreate) -> AppResult<TicketCreate> {
    Ok(TicketCreate {
        title: validate_required_text(&input.title, "title", MAX_TITLE_LEN)?,
        description: validate_required_text(
            &input.description,
            "description",
            MAX_DESCRIPTION_LEN,
        )?,
        priority: input.priority,
        requester_email: validate_email(&input.requester_email, "requesterEmail")?,
    })
}

/// Validate and normalize an update patch.
///
/// Status and priority are already constrained by deserialization; only the
/// free-text assignee needs checking.
pub fn validate_ticket_update(patch: TicketUpdate) -> AppResult<TicketUpdate> {
    let assigned_to = match patch.assigned_to {
        Some(assignee) => Some(validate_required_text(
            &assignee,
            "assignedTo",
            MAX_ASSIGNEE_LEN,
        )?),
        None => None,
    };
    Ok(TicketUpdate {
        assigned_to,
        ..patch
    })
}
