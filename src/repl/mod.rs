//! Interactive question loop
//!
//! Reads questions with rustyline, resolves them, prints and optionally
//! speaks the answer. Slash commands cover status, the store, corrections
//! and voice control.

pub mod commands;
pub mod display;
pub mod input;

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::cli::Verbosity;
use crate::repl::commands::{is_command, is_exit_word, Command, CommandHandler};
pub use crate::repl::display::DisplayManager;
use crate::repl::input::InputHandler;
use crate::resolver::{AnswerResolver, Correction, Resolution};
use crate::speech::{ListenError, Listener, SilentSpeaker, Speaker, SpeechHandle};
use crate::telemetry::TelemetryCollector;

/// File name of the question history under the home directory
pub const HISTORY_FILE: &str = ".askbuddy_history";

/// Default history location
pub fn default_history_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(HISTORY_FILE))
}

/// REPL session coordinator
pub struct ReplSession {
    input_handler: InputHandler,
    command_handler: CommandHandler,
    display_manager: DisplayManager,
    resolver: Arc<AnswerResolver>,
    telemetry: TelemetryCollector,
    speaker: Arc<dyn Speaker>,
    listener: Option<Arc<dyn Listener>>,
    speak_enabled: bool,
    speech: SpeechHandle,
    last_question: Option<String>,
    verbosity: Verbosity,
}

impl ReplSession {
    /// Create new REPL session
    pub fn new(resolver: Arc<AnswerResolver>, history_path: Option<PathBuf>) -> Result<Self> {
        let input_handler = match history_path {
            Some(path) => InputHandler::with_history(path)?,
            None => InputHandler::new()?,
        };

        Ok(ReplSession {
            input_handler,
            command_handler: CommandHandler::new(),
            display_manager: DisplayManager::new(),
            resolver,
            telemetry: TelemetryCollector::new(),
            speaker: Arc::new(SilentSpeaker),
            listener: None,
            speak_enabled: false,
            speech: SpeechHandle::idle(),
            last_question: None,
            verbosity: Verbosity::Normal,
        })
    }

    /// Speak answers with this backend; `enabled` sets the initial state
    pub fn with_speaker(mut self, speaker: Arc<dyn Speaker>, enabled: bool) -> Self {
        self.speaker = speaker;
        self.speak_enabled = enabled;
        self
    }

    /// Accept spoken questions through `/listen`
    pub fn with_listener(mut self, listener: Option<Arc<dyn Listener>>) -> Self {
        self.listener = listener;
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self.display_manager = DisplayManager::new().with_progress(verbosity.show_progress());
        self
    }

    /// Show welcome banner
    pub fn show_welcome(&self, version: &str) {
        let store = self.resolver.store();
        self.display_manager
            .show_banner(version, &store.path().display().to_string(), store.len());
    }

    /// Run until the user exits
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let input = match self.input_handler.read_line() {
                Ok(Some(input)) => input,
                Ok(None) => break,
                Err(e) => {
                    if e.to_string().contains("Interrupted") {
                        self.display_manager.show_info("Use /exit or Ctrl-D to quit");
                        continue;
                    }
                    return Err(e);
                }
            };

            if !self.handle_input(&input).await? {
                break;
            }
        }

        self.shutdown()
    }

    /// Handle one line of input
    ///
    /// Returns true if session should continue, false to exit
    pub async fn handle_input(&mut self, input: &str) -> Result<bool> {
        if input.trim().is_empty() {
            return Ok(true);
        }

        if is_exit_word(input) {
            return Ok(false);
        }

        if is_command(input) {
            let command = self.command_handler.parse(input);
            return self.execute(command).await;
        }

        self.ask(input).await;
        Ok(true)
    }

    /// Resolve a question, print it and speak it when enabled
    pub async fn ask(&mut self, question: &str) -> Resolution {
        self.speech.cancel();

        self.display_manager.start_resolving(question.trim());
        let started = Instant::now();
        let resolution = self.resolver.resolve(question).await;
        let elapsed = started.elapsed();

        self.telemetry.record(&resolution, elapsed);
        self.display_manager.show_answer(
            &resolution,
            self.verbosity.show_source(),
            elapsed.as_millis() as u64,
        );
        debug!(source = %resolution.source, ms = elapsed.as_millis() as u64, "question answered");

        if self.speak_enabled {
            self.speech = self.speaker.speak(&resolution.answer);
        }
        self.last_question = Some(question.trim().to_string());
        resolution
    }

    async fn execute(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Help => self.command_handler.show_help(),
            Command::Exit => return Ok(false),
            Command::Status => {
                let stats = self.telemetry.get_stats();
                self.display_manager.show_status(
                    &stats,
                    self.resolver.store().len(),
                    self.telemetry.elapsed(),
                );
            }
            Command::Store { limit } => {
                let entries = self.resolver.store().entries();
                self.display_manager.show_store(&entries, limit.or(Some(20)));
            }
            Command::Correct { answer } => self.correct_last(answer)?,
            Command::Stop => {
                if self.speech.is_speaking() {
                    self.speech.cancel();
                    self.display_manager.show_info("Stopped speaking.");
                } else {
                    self.display_manager.show_info("Nothing is being spoken.");
                }
            }
            Command::Speak { enable } => {
                self.speak_enabled = enable;
                if !enable {
                    self.speech.cancel();
                }
                let status = if enable { "enabled" } else { "disabled" };
                self.display_manager.show_info(&format!("Spoken answers {}", status));
            }
            Command::Listen => self.listen().await,
            Command::Clear => self.display_manager.clear_screen()?,
            Command::Unknown { input } => self.command_handler.show_unknown(&input),
        }
        Ok(true)
    }

    /// Replace the stored answer for the last question
    fn correct_last(&mut self, answer: Option<String>) -> Result<()> {
        let Some(question) = self.last_question.clone() else {
            self.display_manager.show_warning("Ask a question before correcting its answer.");
            return Ok(());
        };

        let answer = match answer {
            Some(answer) => answer,
            None => match self.input_handler.prompt_line("Better answer: ")? {
                Some(answer) if !answer.is_empty() => answer,
                _ => {
                    self.display_manager.show_info("Correction cancelled.");
                    return Ok(());
                }
            },
        };

        let outcome = match self.resolver.correct(&question, &answer, false) {
            Ok(Correction::Exists(previous)) => {
                self.display_manager
                    .show_info(&format!("Current answer: {}", previous));
                if !self
                    .input_handler
                    .confirm("An answer already exists. Overwrite it? (yes/no): ")?
                {
                    self.display_manager.show_info("Kept the existing answer.");
                    return Ok(());
                }
                self.resolver.correct(&question, &answer, true)
            }
            other => other,
        };

        match outcome {
            Ok(Correction::Stored) => {
                info!(question = %question, "answer corrected");
                self.display_manager.show_success("Answer saved.");
            }
            Ok(Correction::Excluded) => self
                .display_manager
                .show_warning("Answers to this kind of question are not stored."),
            Ok(Correction::Exists(_)) => {}
            Err(e) => self
                .display_manager
                .show_error(&format!("Could not save the answer: {}", e)),
        }
        Ok(())
    }

    /// Take one spoken question and answer it
    async fn listen(&mut self) {
        let Some(listener) = self.listener.clone() else {
            self.display_manager
                .show_warning("No speech recognizer configured (speech.listen_command).");
            return;
        };

        self.speech.cancel();
        self.display_manager.show_info("Listening...");
        match listener.listen().await {
            Ok(question) => {
                println!("You said: {}", question);
                self.ask(&question).await;
            }
            Err(ListenError::NoSpeech) | Err(ListenError::TimedOut) => {
                self.display_manager.show_info("No question heard.")
            }
            Err(e) => self.display_manager.show_warning(&e.to_string()),
        }
    }

    /// Question of the most recent answer
    pub fn last_question(&self) -> Option<&str> {
        self.last_question.as_deref()
    }

    pub fn is_speaking(&self) -> bool {
        self.speech.is_speaking()
    }

    pub fn telemetry(&self) -> &TelemetryCollector {
        &self.telemetry
    }

    fn shutdown(&mut self) -> Result<()> {
        self.speech.cancel();
        self.display_manager.finish_current();
        self.input_handler.save_history()?;
        println!("Goodbye!");
        Ok(())
    }
}
