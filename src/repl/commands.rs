//! Built-in REPL commands
//!
//! Anything starting with `/` is a command; everything else is a question.

use colored::*;

/// REPL command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Status,
    Store { limit: Option<usize> },
    /// Replace the answer to the last question; prompt for it when absent
    Correct { answer: Option<String> },
    Stop,
    Speak { enable: bool },
    Listen,
    Clear,
    Unknown { input: String },
}

/// Parser for REPL commands
#[derive(Debug, Default)]
pub struct CommandHandler;

impl CommandHandler {
    /// Create new command handler
    pub fn new() -> Self {
        CommandHandler
    }

    /// Parse input string into a command
    pub fn parse(&self, input: &str) -> Command {
        let trimmed = input.trim();

        let Some(body) = trimmed.strip_prefix('/') else {
            return Command::Unknown { input: input.to_string() };
        };

        let mut parts = body.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default().to_lowercase();
        let rest = parts.next().map(str::trim).filter(|rest| !rest.is_empty());

        match name.as_str() {
            "help" | "h" => Command::Help,
            "exit" | "quit" | "q" => Command::Exit,
            "status" => Command::Status,
            "store" => Command::Store {
                limit: rest.and_then(|s| s.parse().ok()),
            },
            "correct" => Command::Correct {
                answer: rest.map(str::to_string),
            },
            "stop" => Command::Stop,
            "speak" => {
                let enable = rest
                    .map(|s| matches!(s.to_lowercase().as_str(), "on" | "1" | "true"))
                    .unwrap_or(true);
                Command::Speak { enable }
            }
            "listen" => Command::Listen,
            "clear" | "cls" => Command::Clear,
            _ => Command::Unknown { input: input.to_string() },
        }
    }

    /// Display help information
    pub fn show_help(&self) {
        println!("\n{}", "Available Commands:".bold().cyan());
        println!("{}", "=".repeat(60).cyan());

        let commands = [
            ("/help, /h", "Show this help message"),
            ("/status", "Show session statistics"),
            ("/store [n]", "List stored answers (first n)"),
            ("/correct [answer]", "Replace the answer to the last question"),
            ("/stop", "Stop speaking"),
            ("/speak [on|off]", "Toggle spoken answers"),
            ("/listen", "Ask a question by voice"),
            ("/clear, /cls", "Clear screen"),
            ("/exit, /quit, /q", "Exit"),
        ];

        for (cmd, desc) in commands {
            println!("  {:<20} {}", cmd.green(), desc);
        }

        println!("\n{}", "Usage:".bold());
        println!("  - Type your question directly (no / prefix)");
        println!("  - Use {} for question history", "UP/DOWN arrows".cyan());
        println!("  - Type {} or press {} to quit", "exit".cyan(), "Ctrl-D".cyan());
        println!();
    }

    /// Report a command that did not parse
    pub fn show_unknown(&self, input: &str) {
        println!("{}", format!("Unknown command: {}", input.trim()).red());
        println!("Type {} for available commands", "/help".cyan());
    }
}

/// Check if input is a command (starts with /)
pub fn is_command(input: &str) -> bool {
    input.trim().starts_with('/')
}

/// Bare words that end the session
pub fn is_exit_word(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "exit" | "quit")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_command() {
        assert!(is_command("/help"));
        assert!(is_command(" /help"));
        assert!(!is_command("help"));
        assert!(!is_command("what is rust"));
    }

    #[test]
    fn test_is_exit_word() {
        assert!(is_exit_word("exit"));
        assert!(is_exit_word(" Quit "));
        assert!(!is_exit_word("exit the matrix"));
    }

    #[test]
    fn test_parse_help_and_exit() {
        let handler = CommandHandler::new();
        assert_eq!(handler.parse("/help"), Command::Help);
        assert_eq!(handler.parse("/h"), Command::Help);
        assert_eq!(handler.parse("/exit"), Command::Exit);
        assert_eq!(handler.parse("/quit"), Command::Exit);
        assert_eq!(handler.parse("/q"), Command::Exit);
    }

    #[test]
    fn test_parse_store() {
        let handler = CommandHandler::new();
        assert_eq!(handler.parse("/store"), Command::Store { limit: None });
        assert_eq!(handler.parse("/store 5"), Command::Store { limit: Some(5) });
        assert_eq!(handler.parse("/store lots"), Command::Store { limit: None });
    }

    #[test]
    fn test_parse_correct_keeps_full_answer() {
        let handler = CommandHandler::new();
        assert_eq!(handler.parse("/correct"), Command::Correct { answer: None });
        assert_eq!(
            handler.parse("/correct  Paris is the capital of France. "),
            Command::Correct {
                answer: Some("Paris is the capital of France.".to_string())
            }
        );
    }

    #[test]
    fn test_parse_speak() {
        let handler = CommandHandler::new();
        assert_eq!(handler.parse("/speak"), Command::Speak { enable: true });
        assert_eq!(handler.parse("/speak on"), Command::Speak { enable: true });
        assert_eq!(handler.parse("/speak off"), Command::Speak { enable: false });
    }

    #[test]
    fn test_parse_simple_commands() {
        let handler = CommandHandler::new();
        assert_eq!(handler.parse("/status"), Command::Status);
        assert_eq!(handler.parse("/stop"), Command::Stop);
        assert_eq!(handler.parse("/listen"), Command::Listen);
        assert_eq!(handler.parse("/clear"), Command::Clear);
        assert_eq!(handler.parse("/cls"), Command::Clear);
    }

    #[test]
    fn test_parse_unknown() {
        let handler = CommandHandler::new();
        match handler.parse("/unknown") {
            Command::Unknown { input } => assert!(input.contains("unknown")),
            other => panic!("Expected Unknown command, got {:?}", other),
        }
        assert!(matches!(handler.parse("/"), Command::Unknown { .. }));
        assert!(matches!(handler.parse("what is rust"), Command::Unknown { .. }));
    }
}
