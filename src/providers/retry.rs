//! Retry manager with exponential backoff
//!
//! Bounded retries for provider calls:
//! - `max_retries` extra attempts after the first (default 1)
//! - Delay doubles per attempt, capped, with ±25% jitter

use crate::errors::{AskError, Result};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// Base delay for exponential backoff
const BASE_DELAY_MS: u64 = 250;

/// Maximum delay cap (4 seconds)
const MAX_DELAY_MS: u64 = 4000;

/// Retry manager with exponential backoff
#[derive(Debug, Clone)]
pub struct RetryManager {
    /// Retries allowed after the first attempt
    max_retries: u32,

    /// Base delay in milliseconds
    base_delay_ms: u64,

    /// Maximum delay cap in milliseconds
    max_delay_ms: u64,

    /// Enable jitter
    enable_jitter: bool,
}

impl Default for RetryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryManager {
    /// Create new retry manager with default settings
    pub fn new() -> Self {
        Self::with_config(DEFAULT_MAX_RETRIES, BASE_DELAY_MS)
    }

    /// Create retry manager with custom settings
    pub fn with_config(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            max_delay_ms: MAX_DELAY_MS,
            enable_jitter: true,
        }
    }

    /// Manager that never retries
    pub fn disabled() -> Self {
        Self::with_config(0, 0)
    }

    /// Execute operation, retrying transient failures
    pub async fn execute_with_retry<F, Fut, T>(&self, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !self.is_retryable(&e) || attempt >= self.max_retries {
                        return Err(e);
                    }

                    attempt += 1;
                    let delay = self.calculate_delay(attempt - 1);
                    debug!(attempt, delay_ms = delay.as_millis() as u64, error = %e, "retrying provider call");
                    sleep(delay).await;
                }
            }
        }
    }

    /// Calculate delay for given attempt number
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let exponential_delay = self.base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
        let delay_ms = exponential_delay.min(self.max_delay_ms);

        let final_delay = if self.enable_jitter && delay_ms > 0 {
            let jitter = (delay_ms / 4) as i64;
            let random_jitter = (rand::random::<f64>() * 2.0 - 1.0) * jitter as f64;
            ((delay_ms as i64) + random_jitter as i64).max(0) as u64
        } else {
            delay_ms
        };

        Duration::from_millis(final_delay)
    }

    /// Transient failures are worth another attempt; malformed data is not
    fn is_retryable(&self, error: &AskError) -> bool {
        match error {
            AskError::Timeout { .. } => true,
            AskError::HttpError(_) => true,
            AskError::ProviderError { .. } => true,
            AskError::IoError(_) => true,

            AskError::JsonParseError(_) => false,
            AskError::SerializationError(_) => false,
            AskError::ConfigError(_) => false,
            AskError::StoreError { .. } => false,

            _ => false,
        }
    }

    /// Get max retries
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }
}
