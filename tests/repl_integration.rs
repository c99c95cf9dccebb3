//! Interactive loop tests
//!
//! Drives `ReplSession::handle_input` directly; no terminal needed.

use askbuddy::cli::Verbosity;
use askbuddy::errors::Result;
use askbuddy::providers::{
    KnowledgeProvider, ProviderChain, RetryManager, WeatherProvider, WeatherReport,
};
use askbuddy::repl::{
    commands::{is_command, Command, CommandHandler},
    ReplSession,
};
use askbuddy::resolver::AnswerResolver;
use askbuddy::speech::{ListenError, Listener};
use askbuddy::store::ResponseStore;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct Encyclopedia;

#[async_trait]
impl KnowledgeProvider for Encyclopedia {
    fn name(&self) -> &str {
        "wikipedia"
    }

    async fn fetch(&self, query: &str) -> Result<Option<String>> {
        Ok(Some(format!("Summary of {}.", query)))
    }
}

struct ClearSkies;

#[async_trait]
impl WeatherProvider for ClearSkies {
    fn name(&self) -> &str {
        "weatherapi"
    }

    async fn current(&self, _city: &str) -> Result<WeatherReport> {
        Ok(WeatherReport::Conditions {
            temp_c: 21.5,
            condition: "Sunny".to_string(),
        })
    }
}

/// Listener that hears one fixed phrase or nothing
struct Heard(Option<&'static str>);

#[async_trait]
impl Listener for Heard {
    async fn listen(&self) -> std::result::Result<String, ListenError> {
        self.0.map(str::to_string).ok_or(ListenError::NoSpeech)
    }
}

fn session(dir: &TempDir) -> ReplSession {
    let store = Arc::new(ResponseStore::open(dir.path().join("responses.txt")).unwrap());
    let chain = ProviderChain::new(
        vec![Arc::new(Encyclopedia)],
        Duration::from_secs(1),
        RetryManager::disabled(),
    );
    let resolver = Arc::new(AnswerResolver::new(store, chain, Arc::new(ClearSkies)));
    ReplSession::new(resolver, None)
        .unwrap()
        .with_verbosity(Verbosity::Quiet)
}

#[test]
fn test_command_detection() {
    assert!(is_command("/store 3"));
    assert!(!is_command("what is /dev/null"));

    let handler = CommandHandler::new();
    assert_eq!(handler.parse("/store 3"), Command::Store { limit: Some(3) });
    assert_eq!(handler.parse("/SPEAK off"), Command::Speak { enable: false });
}

#[tokio::test]
async fn test_questions_and_commands_in_one_session() {
    let dir = TempDir::new().unwrap();
    let mut repl = session(&dir);

    assert!(repl.handle_input("what is rust").await.unwrap());
    assert!(repl.handle_input("/status").await.unwrap());
    assert!(repl.handle_input("/store").await.unwrap());
    assert!(repl.handle_input("/bogus").await.unwrap());
    assert!(!repl.handle_input("quit").await.unwrap());

    let stats = repl.telemetry().get_stats();
    assert_eq!(stats.questions, 1);
    assert_eq!(stats.provider_answers, 1);
    assert_eq!(stats.stored, 1);
}

#[tokio::test]
async fn test_repeat_question_hits_cache() {
    let dir = TempDir::new().unwrap();
    let mut repl = session(&dir);

    repl.handle_input("what is rust").await.unwrap();
    repl.handle_input("What is Rust").await.unwrap();

    let stats = repl.telemetry().get_stats();
    assert_eq!(stats.questions, 2);
    assert_eq!(stats.cache_hits, 1);
    assert_eq!(repl.last_question(), Some("What is Rust"));
}

#[tokio::test]
async fn test_correcting_a_weather_answer_is_refused() {
    let dir = TempDir::new().unwrap();
    let mut repl = session(&dir);

    repl.handle_input("weather in lisbon").await.unwrap();
    repl.handle_input("/correct It is raining.").await.unwrap();

    assert!(!dir.path().join("responses.txt").exists());
}

#[tokio::test]
async fn test_listen_asks_the_heard_question() {
    let dir = TempDir::new().unwrap();
    let mut repl = session(&dir).with_listener(Some(Arc::new(Heard(Some("hello"))) as Arc<dyn Listener>));

    repl.handle_input("/listen").await.unwrap();
    assert_eq!(repl.last_question(), Some("hello"));
}

#[tokio::test]
async fn test_listen_with_no_speech_asks_nothing() {
    let dir = TempDir::new().unwrap();
    let mut repl = session(&dir).with_listener(Some(Arc::new(Heard(None)) as Arc<dyn Listener>));

    repl.handle_input("/listen").await.unwrap();
    assert!(repl.last_question().is_none());
    assert_eq!(repl.telemetry().get_stats().questions, 0);
}
