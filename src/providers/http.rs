//! Shared HTTP client for providers

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::cli::config::ProvidersConfig;
use crate::errors::{AskError, Result};

/// Build the client every provider shares
pub fn build_client(config: &ProvidersConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(AskError::HttpError)
}

/// Parse `base_url` and append path segments to it
pub fn endpoint(provider: &str, base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| AskError::provider(provider, format!("invalid base url {}: {}", base_url, e)))?;

    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| AskError::provider(provider, format!("base url cannot hold a path: {}", base_url)))?;
        path.pop_if_empty();
        path.extend(segments);
    }

    Ok(url)
}

/// Fail on non-success status, otherwise decode the JSON body
pub async fn json_body<T: DeserializeOwned>(provider: &str, response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(AskError::provider(provider, format!("HTTP {}", status)));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| AskError::JsonParseError(format!("{} returned a malformed body: {}", provider, e)))
}
