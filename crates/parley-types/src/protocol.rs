//! Relay wire protocol.
//!
//! Every WebSocket text frame is a JSON object naming an `event` and carrying
//! its payload under `data`:
//!
//! ```json
//! {"event":"user_message","data":{"message":"hello"}}
//! {"event":"bot_response","data":{"message":"Hello!","timestamp":"2026-10-17T09:30:00.000Z"}}
//! ```

use crate::exchange::{format_timestamp, Exchange};
use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use thiserror::Error;

/// Events a client may send to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// A transcribed or typed utterance.
    UserMessage(UserMessage),
}

/// Payload of a `user_message` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMessage {
    pub message: String,
}

/// Events the relay sends back to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// The responder's reply to one `user_message`.
    BotResponse(BotResponse),
    /// An inbound frame was rejected.
    Error(ErrorPayload),
}

/// Payload of a `bot_response` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotResponse {
    pub message: String,
    /// ISO-8601 UTC time at which the response was produced.
    pub timestamp: String,
}

impl From<&Exchange> for BotResponse {
    fn from(exchange: &Exchange) -> Self {
        Self {
            message: exchange.text().to_string(),
            timestamp: format_timestamp(exchange.timestamp()),
        }
    }
}

/// Payload of an `error` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

/// Reasons an inbound frame is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The frame is not well-formed JSON.
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// The frame is JSON but not a known event with a valid payload.
    #[error("invalid event: {0}")]
    InvalidEvent(String),
}

impl ClientEvent {
    /// Parses and validates one inbound text frame.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Malformed`] for invalid JSON,
    /// and [`ProtocolError::InvalidEvent`] for an unknown event or a missing
    /// or mistyped `message`. Any string `message`, of any length, is valid.
    pub fn parse(frame: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(frame).map_err(|e| match e.classify() {
            Category::Data => ProtocolError::InvalidEvent(e.to_string()),
            Category::Io | Category::Syntax | Category::Eof => {
                ProtocolError::Malformed(e.to_string())
            }
        })
    }
}

impl ServerEvent {
    /// Builds the error event reported for a rejected frame.
    pub fn rejected(err: &ProtocolError) -> Self {
        Self::Error(ErrorPayload {
            message: err.to_string(),
        })
    }
}
