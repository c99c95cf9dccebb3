//! Resolution result types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reply for input that looks like noise
pub const GIBBERISH_MESSAGE: &str = "That seems like gibberish. Please provide a clearer question.";

/// Reply for a weather question without a city
pub const MISSING_CITY_MESSAGE: &str = "Please specify a city to check the weather.";

/// Reply when every provider came back empty
pub const NOT_FOUND_MESSAGE: &str = "Sorry, I couldn't find an answer.";

/// Pipeline stage that produced the answer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerSource {
    Gibberish,
    Pronunciation,
    Cache,
    Weather,
    Canned,
    /// Named external provider
    Provider(String),
    /// All providers exhausted
    NotFound,
}

impl AnswerSource {
    /// Short label for display and stats
    pub fn label(&self) -> &str {
        match self {
            AnswerSource::Gibberish => "gibberish",
            AnswerSource::Pronunciation => "pronunciation",
            AnswerSource::Cache => "cache",
            AnswerSource::Weather => "weather",
            AnswerSource::Canned => "canned",
            AnswerSource::Provider(name) => name,
            AnswerSource::NotFound => "not-found",
        }
    }
}

impl fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What happened to the answer on the way out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Persistence {
    /// Not a cacheable answer
    Skipped,
    /// Written to the response store
    Stored,
    /// Cacheable but the store write failed
    Failed(String),
}

/// Answer plus where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub answer: String,
    pub source: AnswerSource,
    pub persistence: Persistence,
}

impl Resolution {
    /// Answer that is not written to the store
    pub fn transient(answer: impl Into<String>, source: AnswerSource) -> Self {
        Self {
            answer: answer.into(),
            source,
            persistence: Persistence::Skipped,
        }
    }

    pub fn was_stored(&self) -> bool {
        self.persistence == Persistence::Stored
    }

    /// Store failure message, if the write was attempted and failed
    pub fn persistence_error(&self) -> Option<&str> {
        match &self.persistence {
            Persistence::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Outcome of a manual answer correction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correction {
    /// Answer written
    Stored,
    /// An answer already exists and overwrite was not confirmed
    Exists(String),
    /// Question belongs to a category that is never stored
    Excluded,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_labels() {
        assert_eq!(AnswerSource::Cache.to_string(), "cache");
        assert_eq!(AnswerSource::Provider("wikipedia".to_string()).to_string(), "wikipedia");
        assert_eq!(AnswerSource::NotFound.label(), "not-found");
    }

    #[test]
    fn test_transient_resolution() {
        let resolution = Resolution::transient(NOT_FOUND_MESSAGE, AnswerSource::NotFound);
        assert!(!resolution.was_stored());
        assert!(resolution.persistence_error().is_none());
    }
}
