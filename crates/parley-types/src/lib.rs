//! Shared types for the Parley voice chat relay.
//!
//! This crate holds the wire protocol spoken over the relay WebSocket, the
//! ephemeral [`Exchange`] record, and the protocol error type. Both the
//! server and its tests depend on it so the frame shapes live in one place.

pub mod exchange;
pub mod protocol;

pub use exchange::{format_timestamp, Exchange, Sender};
pub use protocol::{
    BotResponse, ClientEvent, ErrorPayload, ProtocolError, ServerEvent, UserMessage,
};
