//! Canned reply text and the generators for the few dynamic replies.

use chrono::Local;

pub const GREETING: &str = "Hello! How can I help you today?";

pub const WEATHER: &str =
    "I don't have access to real-time weather data, but you can check your local weather app!";

pub const CAPITAL_INDIA: &str = "The capital of India is New Delhi.";
pub const CAPITAL_USA: &str = "The capital of the United States is Washington, D.C.";
pub const CAPITAL_FRANCE: &str = "The capital of France is Paris.";
pub const CAPITAL_JAPAN: &str = "The capital of Japan is Tokyo.";
pub const CAPITAL_UK: &str = "The capital of the United Kingdom is London.";

pub const TWO_PLUS_TWO: &str = "2 + 2 equals 4.";
pub const MATH_HELP: &str = "I can do basic math! Try asking me simple addition problems.";

pub const SPEED_OF_LIGHT: &str =
    "The speed of light is approximately 299,792,458 meters per second.";
pub const PLANETS: &str = "There are 8 planets in our solar system: Mercury, Venus, Earth, Mars, Jupiter, Saturn, Uranus, and Neptune.";

pub const JAVASCRIPT: &str =
    "JavaScript is a programming language commonly used for web development.";
pub const AI: &str = "AI stands for Artificial Intelligence - it's technology that enables machines to simulate human intelligence.";

pub const IDENTITY: &str =
    "I'm an AI voice chatbot! I can answer questions and have conversations with you.";
pub const WELLBEING: &str = "I'm doing great! Thanks for asking. How are you doing today?";

pub const FUN_FACTS: [&str; 5] = [
    "Did you know that honey never spoils? Archaeologists have found pots of honey in ancient Egyptian tombs that are over 3,000 years old!",
    "Bananas are berries, but strawberries aren't!",
    "A group of flamingos is called a 'flamboyance'.",
    "The shortest war in history lasted only 38-45 minutes between Britain and Zanzibar in 1896.",
    "Octopuses have three hearts and blue blood!",
];

pub const FAREWELL: &str = "Goodbye! Have a great day!";

pub const FALLBACK: &str = "I'm sorry, I didn't quite understand that. You can ask me about capitals, basic math, science facts, or just chat with me!";

/// `en-US` style wall-clock time, e.g. `3:04:05 PM`.
const TIME_FORMAT: &str = "%-I:%M:%S %p";

/// `en-US` style calendar date, e.g. `10/17/2026`.
const DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Current local time, e.g. `The current time is 3:04:05 PM`.
pub fn current_time() -> String {
    format!("The current time is {}", Local::now().format(TIME_FORMAT))
}

/// Current local date, e.g. `Today is 10/17/2026`.
pub fn current_date() -> String {
    format!("Today is {}", Local::now().format(DATE_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn current_time_is_twelve_hour_clock() {
        let reply = current_time();
        let clock = reply
            .strip_prefix("The current time is ")
            .expect("time prefix");
        assert!(clock.ends_with(" AM") || clock.ends_with(" PM"), "{clock}");
        NaiveTime::parse_from_str(clock, "%I:%M:%S %p").expect("parsable time");
    }

    #[test]
    fn current_date_is_month_day_year() {
        let reply = current_date();
        let date = reply.strip_prefix("Today is ").expect("date prefix");
        NaiveDate::parse_from_str(date, "%m/%d/%Y").expect("parsable date");
        assert!(!date.starts_with('0'), "month is not zero padded: {date}");
    }

    #[test]
    fn fun_facts_are_distinct() {
        for (i, a) in FUN_FACTS.iter().enumerate() {
            for b in &FUN_FACTS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
