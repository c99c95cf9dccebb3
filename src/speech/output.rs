//! Spoken answers
//!
//! Speech runs as its own tokio task. The caller keeps a [`SpeechHandle`] to
//! ask whether speech is still playing and to stop it.

use std::process::Stdio;

use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Handle to one utterance in progress
#[derive(Debug, Default)]
pub struct SpeechHandle {
    task: Option<JoinHandle<()>>,
}

impl SpeechHandle {
    /// Handle for nothing being spoken
    pub fn idle() -> Self {
        Self { task: None }
    }

    fn spawned(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    /// Whether the utterance is still playing
    pub fn is_speaking(&self) -> bool {
        self.task
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Stop speaking. The TTS process is killed with its task.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("speech cancelled");
        }
    }

    /// Wait for the utterance to finish on its own
    pub async fn wait(mut self) {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

/// Text-to-speech backend
pub trait Speaker: Send + Sync {
    /// Start speaking `text` in the background. Must be called inside a tokio runtime.
    fn speak(&self, text: &str) -> SpeechHandle;
}

/// Speaker used when speech is disabled
#[derive(Debug, Clone, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&self, _text: &str) -> SpeechHandle {
        SpeechHandle::idle()
    }
}

/// Speaks by running an external TTS command with the text as last argument
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    command: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str) -> SpeechHandle {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let command = self.command.clone();
        let task = tokio::spawn(async move {
            match cmd.status().await {
                Ok(status) if !status.success() => {
                    warn!(command = %command, %status, "speech command failed");
                }
                Err(e) => warn!(command = %command, error = %e, "could not start speech command"),
                Ok(_) => {}
            }
        });

        SpeechHandle::spawned(task)
    }
}
