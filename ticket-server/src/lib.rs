//! Ticket Server - 工单追踪后端
//!
//! # 架构概述
//!
//! - **HTTP API** (`api`): 工单 REST 接口、健康检查、WebSocket 端点
//! - **服务层** (`services`): 校验、历史记录派生、变更通知
//! - **数据库** (`db`): SurrealDB 存储 (内存或 RocksDB)
//! - **实时推送** (`message`): 观察者注册表 + 房间广播
//!
//! # 模块结构
//!
//! ```text
//! ticket-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── services/      # 工单服务、HTTP 服务
//! ├── db/            # 数据库层
//! ├── message/       # 事件广播、WebSocket
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod message;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, Server, ServerState};
pub use message::Broadcaster;
pub use services::{HttpService, TicketService};
pub use services::http_server::build_app;
pub use utils::{AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 设置环境: 初始化日志
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    init_logger_with_file(
        &config.log_level,
        config.log_json,
        config.log_dir.as_deref(),
    )
}

pub fn print_banner() {
    println!(
        r#"
  _____ _      _        _
 |_   _(_) ___| | _____| |_ ___
   | | | |/ __| |/ / _ \ __/ __|
   | | | | (__|   <  __/ |_\__ \
   |_| |_|\___|_|\_\___|\__|___/
    "#
    );
}
