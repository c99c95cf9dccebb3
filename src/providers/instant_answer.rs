//! DuckDuckGo instant answers, the last resort before giving up

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::http::json_body;
use super::KnowledgeProvider;
use crate::cli::config::InstantAnswerConfig;
use crate::errors::{AskError, Result};

const NAME: &str = "duckduckgo";

/// Fallback search provider
#[derive(Debug, Clone)]
pub struct DuckDuckGoAnswer {
    client: Client,
    config: InstantAnswerConfig,
}

#[derive(Debug, Deserialize)]
struct InstantAnswerResponse {
    #[serde(rename = "Abstract", default)]
    abstract_text: String,
}

impl DuckDuckGoAnswer {
    pub fn new(client: Client, config: InstantAnswerConfig) -> Self {
        Self { client, config }
    }
}

/// First two `". "`-separated sentences of an abstract, closed with a period
pub fn first_two_sentences(text: &str) -> String {
    let pieces: Vec<&str> = text.split(". ").collect();
    if pieces.len() > 1 {
        let mut answer = pieces[..2].join(". ");
        if !answer.ends_with('.') {
            answer.push('.');
        }
        answer
    } else {
        pieces[0].to_string()
    }
}

#[async_trait]
impl KnowledgeProvider for DuckDuckGoAnswer {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch(&self, query: &str) -> Result<Option<String>> {
        let url = Url::parse(&self.config.base_url)
            .map_err(|e| AskError::provider(NAME, format!("invalid base url: {}", e)))?;

        let response = self
            .client
            .get(url)
            .query(&[("q", query), ("format", "json")])
            .send()
            .await?;

        let body: InstantAnswerResponse = json_body(NAME, response).await?;
        let abstract_text = body.abstract_text.trim();
        if abstract_text.is_empty() {
            return Ok(None);
        }

        Ok(Some(first_two_sentences(abstract_text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_to_two_sentences() {
        assert_eq!(
            first_two_sentences("Paris is a city. It is in France. It has a tower."),
            "Paris is a city. It is in France."
        );
    }

    #[test]
    fn test_two_sentences_not_double_closed() {
        assert_eq!(
            first_two_sentences("Paris is a city. It is in France."),
            "Paris is a city. It is in France."
        );
    }

    #[test]
    fn test_single_sentence_returned_as_is() {
        assert_eq!(first_two_sentences("A lone fact"), "A lone fact");
    }

    #[test]
    fn test_response_without_abstract() {
        let parsed: InstantAnswerResponse = serde_json::from_str(r#"{"Heading":"x"}"#).unwrap();
        assert!(parsed.abstract_text.is_empty());
    }
}
