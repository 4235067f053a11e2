//! 实时推送路由

use axum::{Router, routing::get};

use crate::core::ServerState;
use crate::message::websocket::handle_ws;

pub fn router() -> Router<ServerState> {
    Router::new().route("/ws", get(handle_ws))
}
