//! SerpAPI organic web search
//!
//! Builds an answer out of result snippets, sentence by sentence, until the
//! text ends on a full stop.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::http::{endpoint, json_body};
use super::KnowledgeProvider;
use crate::cli::config::WebSearchConfig;
use crate::errors::{AskError, Result};

const NAME: &str = "serpapi";

/// Primary web search provider
#[derive(Debug, Clone)]
pub struct SerpApiSearch {
    client: Client,
    config: WebSearchConfig,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    snippet: Option<String>,
}

impl SerpApiSearch {
    pub fn new(client: Client, config: WebSearchConfig) -> Self {
        Self { client, config }
    }
}

/// Split after `.`, `!` or `?` when followed by one or more spaces
pub fn split_sentences(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?') && bytes.get(i + 1) == Some(&b' ') {
            parts.push(&text[start..=i]);
            let mut next = i + 1;
            while next < bytes.len() && bytes[next] == b' ' {
                next += 1;
            }
            start = next;
            i = next;
            continue;
        }
        i += 1;
    }

    parts.push(&text[start..]);
    parts
}

/// Append each snippet's sentences up to its first one ending in `.`
fn scan_snippets(snippets: &[String], answer: &mut String, stop_when_closed: bool) {
    for snippet in snippets {
        for sentence in split_sentences(snippet) {
            let sentence = sentence.trim();
            answer.push_str(sentence);
            answer.push(' ');
            if sentence.ends_with('.') {
                break;
            }
        }
        if stop_when_closed && answer.trim().ends_with('.') {
            break;
        }
    }
}

/// Accumulate an answer from ranked snippets.
///
/// The first pass takes, from every snippet, the sentences up to its first
/// full stop. If the result still does not end with `.`, a second pass over
/// the same snippets keeps appending until it does.
pub fn accumulate_snippets(snippets: &[String]) -> Option<String> {
    let mut answer = String::new();
    scan_snippets(snippets, &mut answer, false);

    if !answer.trim().ends_with('.') {
        scan_snippets(snippets, &mut answer, true);
    }

    let answer = answer.trim();
    if answer.is_empty() {
        None
    } else {
        Some(answer.to_string())
    }
}

#[async_trait]
impl KnowledgeProvider for SerpApiSearch {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch(&self, query: &str) -> Result<Option<String>> {
        let api_key = match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key,
            _ => {
                debug!("serpapi key not configured, skipping");
                return Ok(None);
            }
        };

        let url = endpoint(NAME, &self.config.base_url, &["search.json"])?;
        let num = self.config.num_results.to_string();
        let response = self
            .client
            .get(url)
            .query(&[("q", query), ("api_key", api_key), ("num", num.as_str())])
            .send()
            .await?;

        let body: SearchResponse = json_body(NAME, response).await?;
        if let Some(error) = body.error {
            return Err(AskError::provider(NAME, error));
        }

        let snippets: Vec<String> = body
            .organic_results
            .into_iter()
            .filter_map(|result| result.snippet)
            .collect();

        Ok(accumulate_snippets(&snippets))
    }
}
