use ticket_server::{Config, Server, ServerState, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 加载 .env (可选) 和配置
    dotenv::dotenv().ok();
    let config = Config::from_env();

    // 2. 初始化日志
    setup_environment(&config)?;

    print_banner();
    tracing::info!(environment = %config.environment, "Ticket server starting...");

    // 3. 初始化服务器状态 (数据库、schema、示例数据)
    let state = ServerState::initialize(&config).await?;

    // 4. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
