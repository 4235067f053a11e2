//! Ticket Client - 工单追踪客户端
//!
//! - [`TicketApi`]: REST 接口的类型化封装
//! - [`RealtimeClient`]: WebSocket 实时事件
//! - [`TicketCache`]: 管理端 / 提交者视图的本地工单列表
//! - [`display`]: pt-BR 显示文本

pub mod cache;
pub mod config;
pub mod display;
pub mod error;
pub mod http;
pub mod realtime;

pub use cache::{CacheState, CacheView, TicketCache};
pub use config::ClientConfig;
pub use display::{StatsView, priority_label, status_label};
pub use error::{ClientError, ClientResult, Operation};
pub use http::{HealthStatus, TicketApi};
pub use realtime::RealtimeClient;

// Re-export shared types for convenience
pub use shared::message::TicketEvent;
pub use shared::models::{
    Ticket, TicketCreate, TicketFilter, TicketPriority, TicketStats, TicketStatus, TicketUpdate,
};
