//! Voice collaborators: speaking answers and listening for questions

pub mod input;
pub mod output;

use std::sync::Arc;
use std::time::Duration;

pub use input::{CommandListener, ListenError, Listener};
pub use output::{CommandSpeaker, SilentSpeaker, SpeechHandle, Speaker};

use crate::cli::config::SpeechConfig;

/// Speaker for the configured TTS command, or a silent one when disabled
pub fn speaker_from_config(config: &SpeechConfig) -> Arc<dyn Speaker> {
    if config.enabled && !config.command.trim().is_empty() {
        Arc::new(CommandSpeaker::new(config.command.clone(), config.args.clone()))
    } else {
        Arc::new(SilentSpeaker)
    }
}

/// Listener for the configured recognition command, if any
pub fn listener_from_config(config: &SpeechConfig) -> Option<Arc<dyn Listener>> {
    config
        .listen_command
        .as_ref()
        .filter(|command| !command.trim().is_empty())
        .map(|command| {
            Arc::new(CommandListener::new(
                command.clone(),
                config.listen_args.clone(),
                Duration::from_secs(config.listen_timeout_secs),
            )) as Arc<dyn Listener>
        })
}
