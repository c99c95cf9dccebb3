//! Current weather conditions from weatherapi.com
//!
//! Endpoint: GET {base_url}/v1/current.json?key=..&q={city}&aqi=no

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::http::endpoint;
use crate::cli::config::WeatherConfig;
use crate::errors::{AskError, Result};

const NAME: &str = "weatherapi";

/// What the weather source said about a city
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherReport {
    /// Current temperature (Celsius) and condition text
    Conditions { temp_c: f64, condition: String },
    /// Source reported an error for the city
    NotFound,
}

impl WeatherReport {
    /// Sentence returned to the user
    pub fn render(&self, city: &str) -> String {
        match self {
            WeatherReport::Conditions { temp_c, condition } => {
                format!("The temperature in {} is {}°C with {}.", city, temp_c, condition)
            }
            WeatherReport::NotFound => not_found_message(city),
        }
    }
}

/// Reply when no weather data could be obtained for a city
pub fn not_found_message(city: &str) -> String {
    format!("Sorry, I couldn't find weather data for {}.", city)
}

/// Source of current weather by city
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// Current conditions for a city
    async fn current(&self, city: &str) -> Result<WeatherReport>;
}

/// weatherapi.com client
#[derive(Debug, Clone)]
pub struct WeatherApi {
    client: Client,
    config: WeatherConfig,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    current: Option<Current>,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

impl WeatherApi {
    pub fn new(client: Client, config: WeatherConfig) -> Self {
        Self { client, config }
    }
}

fn report_from(body: CurrentResponse) -> Result<WeatherReport> {
    if body.error.is_some() {
        return Ok(WeatherReport::NotFound);
    }

    match body.current {
        Some(current) => Ok(WeatherReport::Conditions {
            temp_c: current.temp_c,
            condition: current.condition.text,
        }),
        None => Err(AskError::JsonParseError(format!(
            "{} response has neither error nor current conditions",
            NAME
        ))),
    }
}

#[async_trait]
impl WeatherProvider for WeatherApi {
    fn name(&self) -> &str {
        NAME
    }

    async fn current(&self, city: &str) -> Result<WeatherReport> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AskError::ConfigError("weather api key not configured".to_string()))?;

        let url = endpoint(NAME, &self.config.base_url, &["v1", "current.json"])?;
        let response = self
            .client
            .get(url)
            .query(&[("key", api_key), ("q", city), ("aqi", "no")])
            .send()
            .await?;

        // Unknown cities come back as HTTP 400 with an error object, so the
        // body is read regardless of status.
        let body: CurrentResponse = response
            .json()
            .await
            .map_err(|e| AskError::JsonParseError(format!("{} returned a malformed body: {}", NAME, e)))?;

        report_from(body)
    }
}
