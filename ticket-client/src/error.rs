//! Client error types

use shared::{AppError, ErrorCode};
use thiserror::Error;

/// User-facing operations, each with the message shown when it fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateTicket,
    LoadTickets,
    SearchTickets,
    LoadTicket,
    UpdateTicket,
    UpdateStatus,
    UpdatePriority,
    AssignTicket,
    DeleteTicket,
    LoadStats,
}

impl Operation {
    /// pt-BR failure message
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::CreateTicket => "Erro ao criar ticket",
            Self::LoadTickets => "Erro ao carregar tickets",
            Self::SearchTickets => "Erro ao buscar tickets",
            Self::LoadTicket => "Erro ao carregar ticket",
            Self::UpdateTicket => "Erro ao atualizar ticket",
            Self::UpdateStatus => "Erro ao atualizar status",
            Self::UpdatePriority => "Erro ao atualizar prioridade",
            Self::AssignTicket => "Erro ao atribuir responsável",
            Self::DeleteTicket => "Erro ao excluir ticket",
            Self::LoadStats => "Erro ao carregar estatísticas",
        }
    }
}

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound { code: ErrorCode, message: String },

    /// Validation error, with the offending field when the server named one
    #[error("Validation error: {message}")]
    Validation {
        code: ErrorCode,
        message: String,
        field: Option<String>,
    },

    /// Server-side failure (5xx or unexpected status)
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// WebSocket connect/send failure, or the channel is closed
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Map a non-2xx status and its decoded error body
    pub fn from_response(status: http::StatusCode, body: AppError) -> Self {
        match status.as_u16() {
            404 => Self::NotFound {
                code: body.code,
                message: body.message,
            },
            400 | 422 => Self::Validation {
                field: body.field().map(str::to_string),
                code: body.code,
                message: body.message,
            },
            status => Self::Server {
                status,
                message: body.message,
            },
        }
    }

    /// Field named by a validation failure
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Localized message for a failed `op`
    ///
    /// Validation failures show the server's own message; everything else
    /// shows the fixed pt-BR message for the operation.
    pub fn display_message(&self, op: Operation) -> String {
        match self {
            Self::Validation { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => op.failure_message().to_string(),
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WebSocket(e.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
