//! The ephemeral message record passed through one relay round trip.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Which side of the conversation produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The connected client (transcribed speech or typed text).
    User,
    /// The server-side responder.
    Bot,
}

impl Sender {
    /// Returns the string label for this sender.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in either direction: `(sender, text, timestamp)`.
///
/// Exchanges are immutable once built and are never persisted; they live for
/// one relay round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    sender: Sender,
    text: String,
    timestamp: DateTime<Utc>,
}

impl Exchange {
    /// Builds an exchange stamped with an explicit time.
    pub fn new(sender: Sender, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp,
        }
    }

    /// Builds a user exchange stamped with the current time.
    pub fn from_user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text, Utc::now())
    }

    /// Builds a bot exchange stamped with the current time.
    pub fn from_bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text, Utc::now())
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Formats a timestamp as ISO-8601 UTC with millisecond precision and a `Z`
/// suffix, e.g. `2026-10-17T09:30:00.123Z`.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
