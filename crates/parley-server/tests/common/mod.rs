//! Shared harness for relay integration tests.

#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use parley_server::{app, AppState};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{
    connect_async, tungstenite::protocol::Message, MaybeTlsStream, WebSocketStream,
};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Serves `state` on an ephemeral local port.
pub async fn spawn_server(state: AppState) -> SocketAddr {
    let app = app(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    addr
}

pub async fn connect(addr: SocketAddr) -> WsClient {
    let (ws_stream, _) = connect_async(format!("ws://{}/ws", addr))
        .await
        .expect("failed to connect");
    ws_stream
}

pub async fn send_user_message(ws: &mut WsClient, message: &str) {
    let frame = json!({ "event": "user_message", "data": { "message": message } });
    ws.send(Message::Text(frame.to_string().into()))
        .await
        .expect("failed to send user_message");
}

/// Reads the next text frame as JSON, failing after two seconds.
pub async fn next_event(ws: &mut WsClient) -> Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("connection closed")
            .expect("websocket error");
        match msg {
            Message::Text(text) => return serde_json::from_str(&text).expect("json frame"),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

/// Asserts that no frame arrives within `wait`.
pub async fn assert_silent(ws: &mut WsClient, wait: Duration) {
    if let Ok(Some(frame)) = tokio::time::timeout(wait, ws.next()).await {
        panic!("unexpected frame: {frame:?}");
    }
}
