//! 实时通道消息类型定义
//!
//! 这些类型在 ticket-server 和 clients 之间共享。每个 WebSocket 文本帧
//! 都是一个 JSON 信封：
//!
//! ```json
//! { "event": "ticketCreated", "data": { ... } }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Ticket, TicketDeleted};

/// Event names as they appear on the wire
pub mod names {
    pub const TICKET_CREATED: &str = "ticketCreated";
    pub const TICKET_UPDATED: &str = "ticketUpdated";
    pub const TICKET_DELETED: &str = "ticketDeleted";
    pub const JOIN_ROOM: &str = "joinRoom";
    pub const LEAVE_ROOM: &str = "leaveRoom";
}

/// 服务器 -> 客户端 推送事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum TicketEvent {
    TicketCreated(Ticket),
    TicketUpdated(Ticket),
    TicketDeleted(TicketDeleted),
}

impl TicketEvent {
    pub fn deleted(id: impl Into<String>) -> Self {
        Self::TicketDeleted(TicketDeleted { id: id.into() })
    }

    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::TicketCreated(_) => names::TICKET_CREATED,
            Self::TicketUpdated(_) => names::TICKET_UPDATED,
            Self::TicketDeleted(_) => names::TICKET_DELETED,
        }
    }

    /// Id of the ticket the event refers to
    pub fn ticket_id(&self) -> &str {
        match self {
            Self::TicketCreated(t) | Self::TicketUpdated(t) => &t.id,
            Self::TicketDeleted(d) => &d.id,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl fmt::Display for TicketEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.ticket_id())
    }
}

/// 客户端 -> 服务器 控制消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientCommand {
    JoinRoom(String),
    LeaveRoom(String),
}

impl ClientCommand {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deleted_event_envelope() {
        let json = TicketEvent::deleted("t1").to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["event"], "ticketDeleted");
        assert_eq!(value["data"]["id"], "t1");
    }

    #[test]
    fn test_client_command_envelope() {
        let cmd = ClientCommand::from_json(r#"{"event":"joinRoom","data":"a@b.com"}"#).unwrap();
        assert_eq!(cmd, ClientCommand::JoinRoom("a@b.com".to_string()));

        let json = ClientCommand::LeaveRoom("a@b.com".to_string()).to_json().unwrap();
        assert_eq!(json, r#"{"event":"leaveRoom","data":"a@b.com"}"#);
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        assert!(TicketEvent::from_json(r#"{"event":"ticketArchived","data":{}}"#).is_err());
        assert!(ClientCommand::from_json(r#"{"event":"ping"}"#).is_err());
    }
}
