//! Ticket API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /tickets | POST | 创建工单 (201) |
//! | /tickets | GET | 列表 + 过滤 (`status`, `priority`, `requesterEmail`, `assignedTo`, `search`) |
//! | /tickets/stats | GET | 统计 |
//! | /tickets/by-email/{email} | GET | 按提交人邮箱查询 |
//! | /tickets/{id} | GET | 单个工单 |
//! | /tickets/{id} | PATCH | 更新状态/优先级/指派 |
//! | /tickets/{id} | DELETE | 删除 (204) |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/tickets", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/stats", get(handler::stats))
        .route("/by-email/{email}", get(handler::list_by_email))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .patch(handler::update)
                .delete(handler::delete),
        )
}
