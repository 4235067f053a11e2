//! 实时客户端
//!
//! 连接服务器 `/ws`，把收到的 JSON 帧解码为 [`TicketEvent`]，
//! 通过本地 broadcast 通道分发给任意数量的订阅者。
//!
//! ```text
//! WebSocket ──▶ session task ──▶ broadcast::Sender<TicketEvent> ──┬──▶ subscriber
//!     ▲                                                            └──▶ TicketCache (forward_to)
//!     └── joinRoom / leaveRoom (mpsc)
//! ```
//!
//! 无法解码的帧记录日志后跳过。落后的订阅者会丢失部分事件，缓存规则对此容忍。

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use shared::message::{ClientCommand, TicketEvent};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::cache::TicketCache;
use crate::config::DEFAULT_EVENT_CAPACITY;
use crate::{ClientConfig, ClientError, ClientResult};

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

#[derive(Debug)]
pub struct RealtimeClient {
    commands: mpsc::UnboundedSender<ClientCommand>,
    events: broadcast::Sender<TicketEvent>,
    /// Cancelled by `close()` or when the session ends
    shutdown: CancellationToken,
    session: Option<JoinHandle<()>>,
}

impl RealtimeClient {
    /// Connect to a `ws://` / `wss://` endpoint
    pub async fn connect(url: &str) -> ClientResult<Self> {
        Self::connect_with_capacity(url, DEFAULT_EVENT_CAPACITY).await
    }

    pub async fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let url = config.realtime_url()?;
        Self::connect_with_capacity(&url, config.event_capacity).await
    }

    async fn connect_with_capacity(url: &str, capacity: usize) -> ClientResult<Self> {
        let (ws, _response) = tokio_tungstenite::connect_async(url).await?;
        tracing::info!(url = %url, "Realtime channel connected");

        let (commands, command_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(capacity.max(1));
        let shutdown = CancellationToken::new();

        let session = tokio::spawn(run_session(
            ws,
            command_rx,
            events.clone(),
            shutdown.clone(),
        ));

        Ok(Self {
            commands,
            events,
            shutdown,
            session: Some(session),
        })
    }

    /// Receive every event decoded after this call
    pub fn subscribe(&self) -> broadcast::Receiver<TicketEvent> {
        self.events.subscribe()
    }

    pub fn join_room(&self, room: &str) -> ClientResult<()> {
        self.send_command(ClientCommand::JoinRoom(room.to_string()))
    }

    pub fn leave_room(&self, room: &str) -> ClientResult<()> {
        self.send_command(ClientCommand::LeaveRoom(room.to_string()))
    }

    fn send_command(&self, command: ClientCommand) -> ClientResult<()> {
        if self.shutdown.is_cancelled() {
            return Err(ClientError::WebSocket("connection closed".to_string()));
        }
        self.commands
            .send(command)
            .map_err(|_| ClientError::WebSocket("connection closed".to_string()))
    }

    /// Apply every subsequent event to `cache` until the channel closes
    pub fn forward_to(&self, cache: Arc<TicketCache>) -> JoinHandle<()> {
        let mut rx = self.subscribe();
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    result = rx.recv() => match result {
                        Ok(event) => {
                            cache.apply(&event);
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Cache forwarder lagged, events skipped");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = shutdown.cancelled() => break,
                }
            }
        })
    }

    /// False once the server closed the socket or `close()` was called
    pub fn is_connected(&self) -> bool {
        !self.shutdown.is_cancelled()
    }

    /// Close the socket and wait for the session task to finish
    pub async fn close(mut self) {
        self.shutdown.cancel();
        if let Some(session) = self.session.take()
            && let Err(e) = session.await
        {
            tracing::warn!(error = %e, "Realtime session task failed");
        }
    }
}

impl Drop for RealtimeClient {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn run_session(
    ws: WsStream,
    mut commands: mpsc::UnboundedReceiver<ClientCommand>,
    events: broadcast::Sender<TicketEvent>,
    shutdown: CancellationToken,
) {
    let (mut sink, mut stream) = ws.split();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = sink.close().await;
                break;
            }

            Some(command) = commands.recv() => {
                let json = match command.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to encode client command");
                        continue;
                    }
                };
                if let Err(e) = sink.send(Message::Text(json)).await {
                    tracing::warn!(error = %e, "Failed to send client command, disconnecting");
                    break;
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => match TicketEvent::from_json(&text) {
                        Ok(event) => {
                            tracing::debug!(event = %event, "Realtime event received");
                            // No local subscribers is not an error
                            let _ = events.send(event);
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, frame = %text, "Skipping undecodable frame");
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("Realtime channel closed by server");
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Realtime receive error");
                        break;
                    }
                    // Ping/Pong are answered by tungstenite
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    shutdown.cancel();
}
