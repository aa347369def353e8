//! Keyword responder for the Parley voice chat relay.
//!
//! Maps a single utterance to a single reply using a static, ordered table
//! of keyword rules. The first rule whose trigger matches the lowercased
//! utterance wins; when nothing matches the fixed [`FALLBACK`] is returned.
//! Responding never fails and always yields a non-empty string.

pub mod replies;
pub mod rules;

pub use replies::{FALLBACK, FAREWELL, FUN_FACTS, GREETING};
pub use rules::{Reply, Rule, RuleTable, Trigger};

/// Produces a reply for one utterance.
///
/// Implementations must be total: every input, including the empty string,
/// maps to a non-empty reply.
pub trait Responder: Send + Sync {
    fn respond(&self, utterance: &str) -> String;
}

/// The production responder backed by [`RuleTable::standard`].
#[derive(Debug, Clone)]
pub struct KeywordResponder {
    table: RuleTable,
}

impl KeywordResponder {
    pub fn new(table: RuleTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }
}

impl Default for KeywordResponder {
    fn default() -> Self {
        Self::new(RuleTable::standard())
    }
}

impl Responder for KeywordResponder {
    fn respond(&self, utterance: &str) -> String {
        self.table.respond(utterance)
    }
}

/// Responds to `utterance` with the standard rule table.
pub fn respond(utterance: &str) -> String {
    RuleTable::standard().respond(utterance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_responder_uses_standard_table() {
        let responder = KeywordResponder::default();
        assert_eq!(responder.respond("hey there"), GREETING);
        assert_eq!(responder.table().len(), RuleTable::standard().len());
    }

    #[test]
    fn responder_is_object_safe() {
        let responder: Box<dyn Responder> = Box::new(KeywordResponder::default());
        assert_eq!(responder.respond("nothing to see"), FALLBACK);
    }
}
