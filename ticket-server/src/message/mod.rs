//! 实时事件推送
//!
//! - [`Broadcaster`] - 观察者注册表，负责全局/房间广播
//! - [`websocket`] - `/ws` 端点，把广播器的事件写入 WebSocket

pub mod broadcaster;
pub mod websocket;

pub use broadcaster::{Broadcaster, Subscription};
