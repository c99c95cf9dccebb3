//! Spoken questions
//!
//! Speech recognition is delegated to an external command that prints the
//! recognized text on stdout.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

/// Why no question was heard. Callers treat every variant as "ask again".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenError {
    #[error("no speech detected")]
    NoSpeech,

    #[error("could not understand the audio")]
    Unrecognized,

    #[error("speech recognition service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("listening timed out")]
    TimedOut,
}

/// Speech-to-text backend
#[async_trait]
pub trait Listener: Send + Sync {
    /// Block until a question is heard or listening fails
    async fn listen(&self) -> std::result::Result<String, ListenError>;
}

/// Listener that runs a recognition command
#[derive(Debug, Clone)]
pub struct CommandListener {
    command: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandListener {
    pub fn new(command: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            args,
            timeout,
        }
    }
}

#[async_trait]
impl Listener for CommandListener {
    async fn listen(&self) -> std::result::Result<String, ListenError> {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let output = match timeout(self.timeout, cmd.output()).await {
            Err(_) => return Err(ListenError::TimedOut),
            Ok(Err(e)) => return Err(ListenError::ServiceUnavailable(e.to_string())),
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            return Err(ListenError::Unrecognized);
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            Err(ListenError::NoSpeech)
        } else {
            Ok(text)
        }
    }
}
