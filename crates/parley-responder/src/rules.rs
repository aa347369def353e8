//! The ordered keyword rule table.
//!
//! A [`Rule`] pairs a [`Trigger`] (substring predicate over the lowercased
//! utterance) with a [`Reply`]. Tables are evaluated top to bottom and the
//! first matching rule wins, so earlier rules shadow later ones: an
//! utterance containing both `hello` and `bye` gets the greeting, and so does
//! anything containing `hi` as a fragment (`something`, `this`).

use crate::replies;
use rand::seq::SliceRandom;
use std::borrow::Cow;

/// Substring predicate over lowercased text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Matches when any of the substrings is present.
    Any(&'static [&'static str]),
    /// Matches only when every substring is present.
    All(&'static [&'static str]),
}

impl Trigger {
    /// Tests already-lowercased `text` against this trigger.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::Any(needles) => needles.iter().any(|n| text.contains(n)),
            Self::All(needles) => needles.iter().all(|n| text.contains(n)),
        }
    }
}

/// How a matched rule produces its reply.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    /// A constant string.
    Fixed(&'static str),
    /// Computed on every call (current time, current date).
    Generated(fn() -> String),
    /// A uniformly random pick, drawn fresh on every call.
    OneOf(&'static [&'static str]),
}

impl Reply {
    pub fn render(&self) -> String {
        match self {
            Self::Fixed(text) => (*text).to_string(),
            Self::Generated(generate) => generate(),
            Self::OneOf(choices) => choices
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(replies::FALLBACK)
                .to_string(),
        }
    }
}

/// One `(trigger, reply)` entry, labelled for logging.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    name: &'static str,
    trigger: Trigger,
    reply: Reply,
}

impl Rule {
    pub const fn new(name: &'static str, trigger: Trigger, reply: Reply) -> Self {
        Self {
            name,
            trigger,
            reply,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    pub fn reply(&self) -> Reply {
        self.reply
    }
}

const STANDARD_RULES: &[Rule] = &[
    Rule::new(
        "greeting",
        Trigger::Any(&["hello", "hi", "hey"]),
        Reply::Fixed(replies::GREETING),
    ),
    Rule::new(
        "time",
        Trigger::Any(&["time"]),
        Reply::Generated(replies::current_time),
    ),
    Rule::new(
        "date",
        Trigger::Any(&["date", "today"]),
        Reply::Generated(replies::current_date),
    ),
    Rule::new(
        "weather",
        Trigger::Any(&["weather"]),
        Reply::Fixed(replies::WEATHER),
    ),
    Rule::new(
        "capital_india",
        Trigger::Any(&["capital of india", "capital india"]),
        Reply::Fixed(replies::CAPITAL_INDIA),
    ),
    Rule::new(
        "capital_usa",
        Trigger::Any(&["capital of usa", "capital america"]),
        Reply::Fixed(replies::CAPITAL_USA),
    ),
    Rule::new(
        "capital_france",
        Trigger::Any(&["capital of france"]),
        Reply::Fixed(replies::CAPITAL_FRANCE),
    ),
    Rule::new(
        "capital_japan",
        Trigger::Any(&["capital of japan"]),
        Reply::Fixed(replies::CAPITAL_JAPAN),
    ),
    Rule::new(
        "capital_uk",
        Trigger::Any(&["capital of uk", "capital britain"]),
        Reply::Fixed(replies::CAPITAL_UK),
    ),
    Rule::new(
        "two_plus_two",
        Trigger::Any(&["2 + 2", "2+2"]),
        Reply::Fixed(replies::TWO_PLUS_TWO),
    ),
    Rule::new(
        "math_help",
        Trigger::All(&["what is", "+"]),
        Reply::Fixed(replies::MATH_HELP),
    ),
    Rule::new(
        "speed_of_light",
        Trigger::Any(&["speed of light"]),
        Reply::Fixed(replies::SPEED_OF_LIGHT),
    ),
    Rule::new(
        "planets",
        Trigger::Any(&["planets in solar system"]),
        Reply::Fixed(replies::PLANETS),
    ),
    Rule::new(
        "javascript",
        Trigger::Any(&["what is javascript", "javascript"]),
        Reply::Fixed(replies::JAVASCRIPT),
    ),
    Rule::new(
        "ai",
        Trigger::Any(&["what is ai", "artificial intelligence"]),
        Reply::Fixed(replies::AI),
    ),
    Rule::new(
        "identity",
        Trigger::Any(&["who are you", "what are you"]),
        Reply::Fixed(replies::IDENTITY),
    ),
    Rule::new(
        "wellbeing",
        Trigger::Any(&["how are you"]),
        Reply::Fixed(replies::WELLBEING),
    ),
    Rule::new(
        "fun_fact",
        Trigger::Any(&["fun fact", "tell me something interesting"]),
        Reply::OneOf(&replies::FUN_FACTS),
    ),
    Rule::new(
        "farewell",
        Trigger::Any(&["bye", "goodbye", "see you"]),
        Reply::Fixed(replies::FAREWELL),
    ),
];

/// An ordered list of rules with a fixed fallback.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Cow<'static, [Rule]>,
}

impl RuleTable {
    /// The built-in chatbot table.
    pub fn standard() -> Self {
        Self {
            rules: Cow::Borrowed(STANDARD_RULES),
        }
    }

    /// Builds a table from caller-supplied rules, evaluated in the given order.
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        Self {
            rules: Cow::Owned(rules),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the first rule matching `utterance`, compared case-insensitively.
    pub fn find(&self, utterance: &str) -> Option<&Rule> {
        let text = utterance.to_lowercase();
        self.rules.iter().find(|rule| rule.trigger.matches(&text))
    }

    /// Replies to `utterance`, falling back to [`replies::FALLBACK`].
    pub fn respond(&self, utterance: &str) -> String {
        match self.find(utterance) {
            Some(rule) => {
                tracing::debug!(rule = rule.name(), "responder rule matched");
                rule.reply.render()
            }
            None => {
                tracing::debug!("no responder rule matched, using fallback");
                replies::FALLBACK.to_string()
            }
        }
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}
