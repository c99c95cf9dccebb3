//! External knowledge providers
//!
//! Each provider answers a free-text query with a short text or nothing.
//! Providers report transport and parse failures as errors; the
//! [`ProviderChain`] is what collapses those into "no answer".

pub mod chain;
pub mod encyclopedia;
pub mod http;
pub mod instant_answer;
pub mod retry;
pub mod weather;
pub mod web_search;

use async_trait::async_trait;
use std::sync::Arc;

use crate::cli::config::ProvidersConfig;
use crate::errors::Result;

pub use chain::{ProviderChain, ProviderHit};
pub use encyclopedia::WikipediaSummary;
pub use instant_answer::DuckDuckGoAnswer;
pub use retry::RetryManager;
pub use weather::{WeatherApi, WeatherProvider, WeatherReport};
pub use web_search::SerpApiSearch;

/// A source of short factual answers
#[async_trait]
pub trait KnowledgeProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// Look up an answer; `Ok(None)` means the source has nothing for the query
    async fn fetch(&self, query: &str) -> Result<Option<String>>;
}

/// Build the default provider order: encyclopedia, primary search, fallback search.
///
/// Disabled providers are left out.
pub fn default_providers(config: &ProvidersConfig) -> Result<Vec<Arc<dyn KnowledgeProvider>>> {
    let client = http::build_client(config)?;
    let mut providers: Vec<Arc<dyn KnowledgeProvider>> = Vec::new();

    if config.encyclopedia.enabled {
        providers.push(Arc::new(WikipediaSummary::new(
            client.clone(),
            config.encyclopedia.clone(),
        )));
    }
    if config.web_search.enabled {
        providers.push(Arc::new(SerpApiSearch::new(
            client.clone(),
            config.web_search.clone(),
        )));
    }
    if config.instant_answer.enabled {
        providers.push(Arc::new(DuckDuckGoAnswer::new(
            client,
            config.instant_answer.clone(),
        )));
    }

    Ok(providers)
}
