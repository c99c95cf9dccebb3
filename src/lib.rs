//! AskBuddy v0.3.0 - Terminal question answering
//!
//! Answers factual questions from a local response store, canned replies, a
//! weather lookup and a chain of knowledge providers. Provider answers are
//! remembered for next time.
//!
//! # Architecture
//!
//! - **store**: line-oriented response store with atomic rewrites
//! - **dialogue**: local checks (gibberish, pronunciation, weather, canned)
//! - **providers**: Wikipedia, SerpAPI, DuckDuckGo and weather clients
//! - **resolver**: the ordered answer pipeline
//! - **repl / speech**: interactive loop with optional voice

pub mod errors;
pub use errors::{AskError, Result};

pub mod cli;
pub mod dialogue;
pub mod providers;
pub mod resolver;
pub mod store;
pub mod telemetry;

// Interactive surface
pub mod repl;
pub mod speech;
