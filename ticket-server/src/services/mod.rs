//! 服务层 - 服务器核心服务
//!
//! # 服务列表
//!
//! - [`TicketService`] - 工单业务逻辑 (校验、历史记录、事件通知)
//! - [`HttpService`] - HTTP 服务器和路由
//! - [`changes`] - 更新补丁 → 字段写入 + 历史条目

pub mod changes;
pub mod http_server;
pub mod ticket_service;

pub use http_server::HttpService;
pub use ticket_service::TicketService;
