//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`tickets`] - 工单接口
//! - [`ws`] - 实时推送 (WebSocket)

pub mod health;
pub mod tickets;
pub mod ws;

pub use crate::utils::AppResult;
