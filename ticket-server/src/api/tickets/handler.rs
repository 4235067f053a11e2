//! Ticket API Handlers

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::models::{Ticket, TicketCreate, TicketFilter, TicketStats, TicketUpdate};

use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::error::{json_body, query_params};

/// POST /tickets - 创建工单
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<TicketCreate>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Ticket>)> {
    let ticket = state.tickets.create(json_body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /tickets - 获取工单列表
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<TicketFilter>, QueryRejection>,
) -> AppResult<Json<Vec<Ticket>>> {
    let filter = query_params(query)?;
    Ok(Json(state.tickets.list(&filter).await?))
}

/// GET /tickets/stats - 统计
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<TicketStats>> {
    Ok(Json(state.tickets.stats().await?))
}

/// GET /tickets/by-email/{email} - 按提交人查询
pub async fn list_by_email(
    State(state): State<ServerState>,
    Path(email): Path<String>,
) -> AppResult<Json<Vec<Ticket>>> {
    Ok(Json(state.tickets.list_by_requester(&email).await?))
}

/// GET /tickets/{id} - 获取单个工单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Ticket>> {
    Ok(Json(state.tickets.get(&id).await?))
}

/// PATCH /tickets/{id} - 更新工单
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<TicketUpdate>, JsonRejection>,
) -> AppResult<Json<Ticket>> {
    let ticket = state.tickets.update(&id, json_body(payload)?).await?;
    Ok(Json(ticket))
}

/// DELETE /tickets/{id} - 删除工单
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.tickets.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
