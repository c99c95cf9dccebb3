//! Ordered provider fallback
//!
//! Every call is bounded by a timeout and the retry manager. Errors and
//! timeouts are logged and treated exactly like "no answer", so the chain
//! always moves on to the next provider.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::retry::RetryManager;
use super::KnowledgeProvider;
use crate::cli::config::ProvidersConfig;
use crate::errors::{AskError, Result};

/// First answer found along the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderHit {
    pub provider: String,
    pub answer: String,
}

/// Providers queried in priority order
#[derive(Clone)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn KnowledgeProvider>>,
    timeout: Duration,
    retry: RetryManager,
}

impl ProviderChain {
    /// Create a chain with explicit timeout and retry policy
    pub fn new(
        providers: Vec<Arc<dyn KnowledgeProvider>>,
        timeout: Duration,
        retry: RetryManager,
    ) -> Self {
        Self {
            providers,
            timeout,
            retry,
        }
    }

    /// Create a chain using the timeout and retry settings from config
    pub fn from_config(providers: Vec<Arc<dyn KnowledgeProvider>>, config: &ProvidersConfig) -> Self {
        Self::new(
            providers,
            config.timeout(),
            RetryManager::with_config(config.max_retries, config.retry_base_delay_ms),
        )
    }

    /// Ask each provider in turn; the first non-empty answer wins
    pub async fn first_answer(&self, query: &str) -> Option<ProviderHit> {
        for provider in &self.providers {
            let name = provider.name().to_string();
            let answer = guarded(&name, self.timeout, &self.retry, || provider.fetch(query))
                .await
                .flatten()
                .filter(|answer| !answer.trim().is_empty());

            match answer {
                Some(answer) => {
                    info!(provider = %name, "provider answered");
                    return Some(ProviderHit {
                        provider: name,
                        answer,
                    });
                }
                None => debug!(provider = %name, "provider had no answer"),
            }
        }

        None
    }

    /// Provider names in query order
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Per-call timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Retry policy shared by all calls
    pub fn retry(&self) -> &RetryManager {
        &self.retry
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Run a provider call under timeout and retry; any failure becomes `None`
pub async fn guarded<F, Fut, T>(
    name: &str,
    timeout: Duration,
    retry: &RetryManager,
    mut call: F,
) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let outcome = retry
        .execute_with_retry(|| {
            let fut = call();
            async move {
                match tokio::time::timeout(timeout, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(AskError::Timeout {
                        duration_ms: timeout.as_millis() as u64,
                    }),
                }
            }
        })
        .await;

    match outcome {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(provider = %name, error = %e, "provider call failed");
            None
        }
    }
}
