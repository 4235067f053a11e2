//! Server Implementation
//!
//! HTTP 服务器启动和管理

use tokio_util::sync::CancellationToken;

use crate::core::{Config, ServerState};
use crate::services::HttpService;
use crate::utils::AppResult;

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
    shutdown: CancellationToken,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
            shutdown: CancellationToken::new(),
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
            shutdown: CancellationToken::new(),
        }
    }

    /// Cancelling this token stops `run()` the same way Ctrl-C does
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Serve until Ctrl-C or the shutdown token is cancelled
    pub async fn run(&self) -> AppResult<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let token = self.shutdown.clone();
        let shutdown = async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = token.cancelled() => {}
            }
            tracing::info!("Shutting down...");
        };

        HttpService::new(state).start_server(shutdown).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_returns_after_shutdown_token() {
        let config = Config {
            http_port: 0,
            shutdown_timeout_ms: 100,
            ..Config::in_memory()
        };
        let server = Server::new(config);
        let token = server.shutdown_token();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            token.cancel();
        });

        tokio::time::timeout(Duration::from_secs(5), server.run())
            .await
            .expect("server did not stop")
            .unwrap();
    }
}
