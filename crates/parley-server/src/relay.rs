//! WebSocket relay: one `user_message` in, one `bot_response` out.

use crate::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        ConnectInfo, Extension, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use parley_responder::Responder;
use parley_types::{
    format_timestamp, BotResponse, ClientEvent, Exchange, ServerEvent, UserMessage,
};
use std::{collections::HashMap, net::SocketAddr, sync::Arc};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Outbound frames buffered per connection before the reader loop waits.
const OUTBOUND_BUFFER: usize = 32;

/// Largest inbound WebSocket message accepted on `/ws` (1 MB). Larger
/// messages fail the connection at the transport layer.
pub const MAX_FRAME_BYTES: usize = 1_000_000;

/// Sent when a reply event cannot be serialized.
const SERIALIZE_FAILED_FRAME: &str =
    r#"{"event":"error","data":{"message":"failed to encode reply"}}"#;

/// Bookkeeping for one live connection.
#[derive(Debug, Clone)]
pub struct ConnectionInfo {
    pub remote_addr: SocketAddr,
    pub connected_at: DateTime<Utc>,
}

/// Tracks live relay connections.
///
/// The registry holds no per-conversation state; it exists for lifecycle
/// logging and the connection count reported by `/health`.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    connections: Arc<RwLock<HashMap<Uuid, ConnectionInfo>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new connection and returns its id.
    pub async fn register(&self, remote_addr: SocketAddr) -> Uuid {
        let id = Uuid::new_v4();
        let info = ConnectionInfo {
            remote_addr,
            connected_at: Utc::now(),
        };
        self.connections.write().await.insert(id, info);
        id
    }

    /// Removes a connection, returning its bookkeeping if it was registered.
    pub async fn remove(&self, id: Uuid) -> Option<ConnectionInfo> {
        self.connections.write().await.remove(&id)
    }

    pub async fn get(&self, id: Uuid) -> Option<ConnectionInfo> {
        self.connections.read().await.get(&id).cloned()
    }

    /// Number of live connections.
    pub async fn count(&self) -> usize {
        self.connections.read().await.len()
    }
}

/// Handles one inbound text frame and builds the single reply event.
///
/// Valid `user_message` frames are answered with a `bot_response` stamped at
/// the time the reply is produced. Rejected frames are answered with an
/// `error` event.
pub fn handle_frame(responder: &dyn Responder, connection_id: Uuid, frame: &str) -> ServerEvent {
    match ClientEvent::parse(frame) {
        Ok(ClientEvent::UserMessage(UserMessage { message })) => {
            let inbound = Exchange::from_user(message);
            let reply = responder.respond(inbound.text());
            let outbound = Exchange::from_bot(reply);

            tracing::debug!(
                connection_id = %connection_id,
                user = inbound.text(),
                bot = outbound.text(),
                received_at = %format_timestamp(inbound.timestamp()),
                replied_at = %format_timestamp(outbound.timestamp()),
                "relayed exchange"
            );

            ServerEvent::BotResponse(BotResponse::from(&outbound))
        }
        Err(e) => {
            tracing::warn!(
                connection_id = %connection_id,
                "rejected inbound frame: {}",
                e
            );
            ServerEvent::rejected(&e)
        }
    }
}

/// WebSocket handler: `GET /ws`.
pub async fn ws_handler(
    Extension(state): Extension<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.max_message_size(MAX_FRAME_BYTES)
        .on_upgrade(move |socket| handle_socket(socket, state, addr))
}

/// Serializes an event into the text frame sent to the client.
///
/// Falls back to a fixed `error` frame so every inbound frame still gets
/// exactly one reply.
pub fn encode_event(event: &ServerEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|e| {
        tracing::error!("failed to serialize relay event: {}", e);
        SERIALIZE_FAILED_FRAME.to_string()
    })
}

/// Queues an event for the connection's writer task.
///
/// Returns `false` once the writer has gone away.
async fn send_event(tx: &mpsc::Sender<String>, event: &ServerEvent) -> bool {
    tx.send(encode_event(event)).await.is_ok()
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, remote_addr: SocketAddr) {
    let connection_id = state.connections.register(remote_addr).await;
    tracing::info!(
        connection_id = %connection_id,
        remote_addr = %remote_addr,
        "client connected"
    );

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<String>(OUTBOUND_BUFFER);

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = receiver.next().await {
        let msg = match frame {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(connection_id = %connection_id, "websocket read error: {}", e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                let event = handle_frame(state.responder.as_ref(), connection_id, text.as_str());
                if !send_event(&tx, &event).await {
                    break;
                }
            }
            Message::Binary(_) => {
                tracing::debug!(connection_id = %connection_id, "ignoring binary frame");
            }
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    // Let queued replies flush before the writer half is dropped.
    drop(tx);
    if let Err(e) = send_task.await {
        tracing::error!(connection_id = %connection_id, "relay writer task failed: {}", e);
    }

    let connected_for = state
        .connections
        .remove(connection_id)
        .await
        .map(|info| (Utc::now() - info.connected_at).num_milliseconds());
    tracing::info!(
        connection_id = %connection_id,
        remote_addr = %remote_addr,
        connected_ms = connected_for.unwrap_or_default(),
        "client disconnected"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_responder::{KeywordResponder, FALLBACK, GREETING};
    use std::net::{IpAddr, Ipv4Addr};

    fn addr() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 40_000)
    }

    #[test]
    fn user_message_gets_bot_response() {
        let responder = KeywordResponder::default();
        let before = Utc::now();
        let event = handle_frame(
            &responder,
            Uuid::new_v4(),
            r#"{"event":"user_message","data":{"message":"hello"}}"#,
        );

        match event {
            ServerEvent::BotResponse(reply) => {
                assert_eq!(reply.message, GREETING);
                let ts = DateTime::parse_from_rfc3339(&reply.timestamp).expect("rfc3339");
                assert!(ts.timestamp_millis() >= before.timestamp_millis());
            }
            other => panic!("expected bot_response, got {other:?}"),
        }
    }

    #[test]
    fn missing_message_gets_error_event() {
        let responder = KeywordResponder::default();
        let event = handle_frame(
            &responder,
            Uuid::new_v4(),
            r#"{"event":"user_message","data":{"text":"hello"}}"#,
        );
        assert!(matches!(event, ServerEvent::Error(_)), "got {event:?}");
    }

    #[test]
    fn empty_message_gets_fallback() {
        let responder = KeywordResponder::default();
        let event = handle_frame(
            &responder,
            Uuid::new_v4(),
            r#"{"event":"user_message","data":{"message":""}}"#,
        );
        match event {
            ServerEvent::BotResponse(reply) => assert_eq!(reply.message, FALLBACK),
            other => panic!("expected bot_response, got {other:?}"),
        }
    }

    #[test]
    fn encoded_reply_round_trips() {
        let event = handle_frame(
            &KeywordResponder::default(),
            Uuid::new_v4(),
            r#"{"event":"user_message","data":{"message":"bye"}}"#,
        );
        let decoded: ServerEvent =
            serde_json::from_str(&encode_event(&event)).expect("encoded frame is json");
        assert_eq!(decoded, event);
    }

    #[test]
    fn serialize_fallback_is_an_error_event() {
        let decoded: ServerEvent =
            serde_json::from_str(SERIALIZE_FAILED_FRAME).expect("fallback frame is json");
        assert!(matches!(decoded, ServerEvent::Error(_)), "got {decoded:?}");
    }

    #[test]
    fn long_message_gets_bot_response() {
        let message = format!("hello {}", "please tell me more ".repeat(250));
        assert!(message.len() > 5_000);
        let frame = serde_json::json!({
            "event": "user_message",
            "data": { "message": message }
        })
        .to_string();

        match handle_frame(&KeywordResponder::default(), Uuid::new_v4(), &frame) {
            ServerEvent::BotResponse(reply) => assert_eq!(reply.message, GREETING),
            other => panic!("expected bot_response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn registry_tracks_connections() {
        let registry = ConnectionRegistry::new();
        let a = registry.register(addr()).await;
        let b = registry.register(addr()).await;
        assert_ne!(a, b);
        assert_eq!(registry.count().await, 2);
        assert_eq!(registry.get(a).await.map(|i| i.remote_addr), Some(addr()));

        assert!(registry.remove(a).await.is_some());
        assert!(registry.remove(a).await.is_none());
        assert_eq!(registry.count().await, 1);
    }
}
