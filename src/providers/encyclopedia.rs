//! Wikipedia page summaries
//!
//! Endpoint: GET {base_url}/api/rest_v1/page/summary/{title}

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::http::{endpoint, json_body};
use super::KnowledgeProvider;
use crate::cli::config::EncyclopediaConfig;
use crate::errors::Result;

const NAME: &str = "wikipedia";

/// Summary lookup against the Wikipedia REST API
#[derive(Debug, Clone)]
pub struct WikipediaSummary {
    client: Client,
    config: EncyclopediaConfig,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    extract: String,
}

impl WikipediaSummary {
    pub fn new(client: Client, config: EncyclopediaConfig) -> Self {
        Self { client, config }
    }
}

/// Page title for a free-text query
pub fn page_title(query: &str) -> String {
    query.trim().replace(' ', "_")
}

/// Keep the first `max` pieces of a `". "`-split summary.
///
/// A closing period is added only when pieces were dropped; an untouched
/// summary keeps its own ending.
pub fn limit_sentences(summary: &str, max: usize) -> String {
    let pieces: Vec<&str> = summary.split(". ").collect();
    let kept = pieces[..pieces.len().min(max)].join(". ");
    if pieces.len() > max {
        format!("{}.", kept)
    } else {
        kept
    }
}

#[async_trait]
impl KnowledgeProvider for WikipediaSummary {
    fn name(&self) -> &str {
        NAME
    }

    async fn fetch(&self, query: &str) -> Result<Option<String>> {
        let title = page_title(query);
        if title.is_empty() {
            return Ok(None);
        }

        let url = endpoint(
            NAME,
            &self.config.base_url,
            &["api", "rest_v1", "page", "summary", &title],
        )?;
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(title = %title, "no wikipedia page");
            return Ok(None);
        }

        let summary: SummaryResponse = json_body(NAME, response).await?;
        if summary.kind.ends_with("not_found") || summary.extract.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(limit_sentences(
            summary.extract.trim(),
            self.config.max_sentences,
        )))
    }
}
