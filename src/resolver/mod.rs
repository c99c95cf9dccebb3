//! Answer resolution pipeline
//!
//! Stages run strictly in order and the first one with an answer ends the
//! pipeline:
//!
//! 1. gibberish check
//! 2. pronunciation request
//! 3. response store (cache)
//! 4. weather keyword
//! 5. canned responses
//! 6. provider chain, persisted on success
//!
//! Gibberish and pronunciation run before the cache so neither can produce a
//! cache hit. Weather, pronunciation and time answers are never stored.

pub mod types;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::dialogue::{
    extract_weather_city, is_gibberish, is_pronunciation_request, pronunciation_target,
    CannedResponder, WeatherQuery,
};
use crate::errors::Result;
use crate::providers::chain::guarded;
use crate::providers::weather::not_found_message;
use crate::providers::{ProviderChain, WeatherProvider};
use crate::store::{normalize_question, ResponseStore};

pub use types::{
    AnswerSource, Correction, Persistence, Resolution, GIBBERISH_MESSAGE, MISSING_CITY_MESSAGE,
    NOT_FOUND_MESSAGE,
};

/// Orchestrates local checks, the cache and external providers
pub struct AnswerResolver {
    store: Arc<ResponseStore>,
    canned: CannedResponder,
    chain: ProviderChain,
    weather: Arc<dyn WeatherProvider>,
}

impl AnswerResolver {
    /// Create a resolver with the default canned table
    pub fn new(
        store: Arc<ResponseStore>,
        chain: ProviderChain,
        weather: Arc<dyn WeatherProvider>,
    ) -> Self {
        Self {
            store,
            canned: CannedResponder::new(),
            chain,
            weather,
        }
    }

    /// Replace the canned table
    pub fn with_canned(mut self, canned: CannedResponder) -> Self {
        self.canned = canned;
        self
    }

    /// Resolve a question to an answer. Never fails: every stage degrades to
    /// the next one or to a fixed reply.
    pub async fn resolve(&self, question: &str) -> Resolution {
        let normalized = normalize_question(question);

        if is_gibberish(&normalized) {
            debug!("rejected as gibberish");
            return Resolution::transient(GIBBERISH_MESSAGE, AnswerSource::Gibberish);
        }

        if is_pronunciation_request(&normalized) {
            let word = pronunciation_target(&normalized);
            return Resolution::transient(
                format!("The pronunciation of {} is...{}", word, word),
                AnswerSource::Pronunciation,
            );
        }

        if let Some(answer) = self.store.lookup(&normalized) {
            debug!("cache hit");
            return Resolution::transient(answer, AnswerSource::Cache);
        }

        match extract_weather_city(&normalized) {
            WeatherQuery::City(city) => {
                let answer = self.weather_answer(&city).await;
                return Resolution::transient(answer, AnswerSource::Weather);
            }
            WeatherQuery::MissingCity => {
                return Resolution::transient(MISSING_CITY_MESSAGE, AnswerSource::Weather);
            }
            WeatherQuery::NotWeather => {}
        }

        if let Some(answer) = self.canned.resolve(&normalized) {
            return Resolution::transient(answer, AnswerSource::Canned);
        }

        match self.chain.first_answer(question.trim()).await {
            Some(hit) => self.persist(&normalized, hit.answer, AnswerSource::Provider(hit.provider)),
            None => Resolution::transient(NOT_FOUND_MESSAGE, AnswerSource::NotFound),
        }
    }

    /// Store a user-supplied answer for a question.
    ///
    /// An existing answer is only replaced when `overwrite` is set.
    pub fn correct(&self, question: &str, answer: &str, overwrite: bool) -> Result<Correction> {
        if self.is_persistence_excluded(question) {
            return Ok(Correction::Excluded);
        }

        if !overwrite {
            if let Some(existing) = self.store.lookup(question) {
                return Ok(Correction::Exists(existing));
            }
        }

        self.store.upsert(question, answer)?;
        Ok(Correction::Stored)
    }

    /// Weather, pronunciation and time questions are never stored
    pub fn is_persistence_excluded(&self, question: &str) -> bool {
        let normalized = normalize_question(question);
        normalized.contains("weather")
            || is_pronunciation_request(&normalized)
            || self.canned.is_time_question(&normalized)
    }

    /// Shared response store
    pub fn store(&self) -> &Arc<ResponseStore> {
        &self.store
    }

    /// Provider chain
    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    async fn weather_answer(&self, city: &str) -> String {
        let name = self.weather.name().to_string();
        let report = guarded(&name, self.chain.timeout(), self.chain.retry(), || {
            self.weather.current(city)
        })
        .await;

        match report {
            Some(report) => report.render(city),
            None => not_found_message(city),
        }
    }

    fn persist(&self, normalized: &str, answer: String, source: AnswerSource) -> Resolution {
        match self.store.upsert(normalized, &answer) {
            Ok(snapshot) => Resolution {
                answer: snapshot.get(normalized).cloned().unwrap_or(answer),
                source,
                persistence: Persistence::Stored,
            },
            Err(e) => {
                warn!(error = %e, "could not persist answer");
                Resolution {
                    answer: answer.trim().to_string(),
                    source,
                    persistence: Persistence::Failed(e.to_string()),
                }
            }
        }
    }
}
