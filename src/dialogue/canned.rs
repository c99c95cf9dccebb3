//! Canned conversational responses
//!
//! Fixed replies for small talk plus a handful of time questions whose answer
//! is computed when asked.

use chrono::{DateTime, Local, TimeZone};

/// Value attached to a canned trigger
#[derive(Debug, Clone, Copy)]
pub enum CannedValue {
    /// Fixed reply
    Literal(&'static str),
    /// Reply computed at call time
    Computed(fn() -> String),
}

impl CannedValue {
    /// Produce the reply text
    pub fn render(&self) -> String {
        match self {
            CannedValue::Literal(text) => (*text).to_string(),
            CannedValue::Computed(f) => f(),
        }
    }

    /// Whether the reply changes between calls
    pub fn is_computed(&self) -> bool {
        matches!(self, CannedValue::Computed(_))
    }
}

/// One trigger phrase and its reply
#[derive(Debug, Clone, Copy)]
pub struct CannedEntry {
    pub trigger: &'static str,
    pub value: CannedValue,
}

const TIME_TRIGGERS: [&str; 4] = [
    "what time is it",
    "time",
    "what is the current time",
    "what is the time right now",
];

const LITERAL_RESPONSES: [(&str, &str); 8] = [
    ("hello", "Hi there!"),
    ("hi", "Hello!"),
    ("how are you", "All good!"),
    ("what's up", "Not much, how about you?"),
    ("goodbye", "See you later!"),
    ("bye", "Take care!"),
    ("what can you do", "I mainly answer factual questions."),
    ("who are you", "I am an AI chatbot for answering factual questions."),
];

/// Format a timestamp the way time questions are answered
pub fn format_time<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("It's %H:%M on %A, %B %d.").to_string()
}

fn current_time() -> String {
    format_time(&Local::now())
}

/// Static table of canned responses
#[derive(Debug, Clone)]
pub struct CannedResponder {
    entries: Vec<CannedEntry>,
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl CannedResponder {
    /// Build the default table
    pub fn new() -> Self {
        let mut entries: Vec<CannedEntry> = LITERAL_RESPONSES
            .iter()
            .map(|&(trigger, reply)| CannedEntry {
                trigger,
                value: CannedValue::Literal(reply),
            })
            .collect();

        entries.extend(TIME_TRIGGERS.iter().map(|&trigger| CannedEntry {
            trigger,
            value: CannedValue::Computed(current_time),
        }));

        Self { entries }
    }

    /// Find the entry whose trigger equals the whole question (case-insensitive)
    pub fn find(&self, question: &str) -> Option<&CannedEntry> {
        let normalized = question.trim().to_lowercase();
        self.entries.iter().find(|entry| entry.trigger == normalized)
    }

    /// Resolve a question to its canned reply, if any
    pub fn resolve(&self, question: &str) -> Option<String> {
        self.find(question).map(|entry| entry.value.render())
    }

    /// Whether the question is one of the time triggers
    pub fn is_time_question(&self, question: &str) -> bool {
        self.find(question)
            .map(|entry| entry.value.is_computed())
            .unwrap_or(false)
    }

    /// All trigger phrases
    pub fn triggers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.trigger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    #[test]
    fn test_literal_match_is_case_insensitive() {
        let responder = CannedResponder::new();
        assert_eq!(responder.resolve("Hello"), Some("Hi there!".to_string()));
        assert_eq!(responder.resolve("  WHO ARE YOU "), Some("I am an AI chatbot for answering factual questions.".to_string()));
    }

    #[test]
    fn test_no_substring_matching() {
        let responder = CannedResponder::new();
        assert_eq!(responder.resolve("hello there"), None);
        assert_eq!(responder.resolve("what time is it in tokyo"), None);
    }

    #[test]
    fn test_time_triggers_are_computed() {
        let responder = CannedResponder::new();
        for trigger in TIME_TRIGGERS {
            assert!(responder.is_time_question(trigger));
            assert!(responder.resolve(trigger).unwrap().starts_with("It's "));
        }
        assert!(!responder.is_time_question("hello"));
    }

    #[test]
    fn test_format_time() {
        let at = Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(9, 7, 0)
                .unwrap(),
        );
        assert_eq!(format_time(&at), "It's 09:07 on Tuesday, March 05.");
    }

    #[test]
    fn test_table_size() {
        assert_eq!(CannedResponder::new().triggers().count(), 12);
    }
}
