use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::TicketRepository;
use crate::db::seed::seed_sample_data;
use crate::message::Broadcaster;
use crate::services::TicketService;
use crate::utils::AppResult;

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段都是浅拷贝 (内部 Arc)，在 handler 之间 clone 成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | Surreal<Any> | SurrealDB 连接 |
/// | tickets | TicketService | 工单服务 |
/// | broadcaster | Broadcaster | 实时事件广播 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Any>,
    pub tickets: TicketService,
    pub broadcaster: Broadcaster,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Any>) -> Self {
        let broadcaster = Broadcaster::new();
        let tickets = TicketService::new(TicketRepository::new(db.clone()), broadcaster.clone());
        Self {
            config,
            db,
            tickets,
            broadcaster,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据库连接 + schema
    /// 2. 各服务 (TicketService, Broadcaster)
    /// 3. 示例数据 (`SEED_SAMPLE_DATA=true` 且表为空)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db_service = DbService::connect(config).await?;
        let state = Self::new(config.clone(), db_service.db);

        if config.seed_sample_data {
            seed_sample_data(state.tickets.repository()).await?;
        }

        Ok(state)
    }
}
