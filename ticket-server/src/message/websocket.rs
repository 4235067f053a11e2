//! WebSocket endpoint - 实时工单事件推送
//!
//! GET /ws
//!
//! 协议:
//! - Server → Client: TicketEvent (ticketCreated, ticketUpdated, ticketDeleted)
//! - Client → Server: ClientCommand (joinRoom, leaveRoom)

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use shared::message::{ClientCommand, TicketEvent};
use tokio::time::Duration;

use super::broadcaster::{Broadcaster, Subscription};
use crate::core::ServerState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

/// GET /ws
pub async fn handle_ws(State(state): State<ServerState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let broadcaster = state.broadcaster.clone();
    ws.on_upgrade(move |socket| ws_session(socket, broadcaster))
}

async fn ws_session(socket: WebSocket, broadcaster: Broadcaster) {
    let (mut sink, mut stream) = socket.split();
    let Subscription { id, mut events } = broadcaster.connect();

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }

            event = events.recv() => {
                match event {
                    Some(event) => {
                        if send_event(&mut sink, &event).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => match ClientCommand::from_json(text.as_str()) {
                        Ok(ClientCommand::JoinRoom(room)) => {
                            broadcaster.join_room(&id, &room);
                        }
                        Ok(ClientCommand::LeaveRoom(room)) => {
                            broadcaster.leave_room(&id, &room);
                        }
                        Err(e) => {
                            tracing::debug!(observer_id = %id, error = %e, "Ignoring unknown client message");
                        }
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(observer_id = %id, error = %e, "WebSocket receive error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    broadcaster.disconnect(&id);
}

async fn send_event<S>(sink: &mut S, event: &TicketEvent) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = event.to_json().map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
