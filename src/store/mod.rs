//! Persistent answer cache
//!
//! Maps normalized questions to answers and flushes to disk on every change.

pub mod codec;
pub mod response_store;

pub use response_store::{ResponseStore, StoreSnapshot};

/// Normalize a question into its cache key: trimmed and lowercased
pub fn normalize_question(question: &str) -> String {
    question.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_question() {
        assert_eq!(normalize_question("  Who Is Ada Lovelace?\n"), "who is ada lovelace?");
        assert_eq!(normalize_question(""), "");
    }
}
