//! Display manager for the question loop
//!
//! Spinner while a question resolves, colored answers and status output.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

use crate::resolver::{Persistence, Resolution};
use crate::store::StoreSnapshot;
use crate::telemetry::ResolutionStats;

/// Display manager for REPL UI
pub struct DisplayManager {
    current_bar: Option<ProgressBar>,
    update_interval: Duration,
    show_progress: bool,
}

impl DisplayManager {
    /// Create new display manager
    pub fn new() -> Self {
        DisplayManager {
            current_bar: None,
            update_interval: Duration::from_millis(100),
            show_progress: true,
        }
    }

    /// Enable or disable the resolving spinner
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, store_path: &str, entries: usize) {
        let width = 64;
        let title = format!("  AskBuddy {} - Ask me anything", version);
        let info = format!("  Store: {} ({} answers known)", store_path, entries);

        println!("\n{}", "=".repeat(width).cyan());
        println!("{}", title.bold().cyan());
        println!("{}", info.dimmed());
        println!("{}\n", "=".repeat(width).cyan());
        println!(
            "Type your question (or {} for commands, {} to quit)\n",
            "/help".green(),
            "/exit".green()
        );
    }

    /// Start the spinner shown while a question resolves
    pub fn start_resolving(&mut self, question: &str) {
        self.finish_current();
        if !self.show_progress {
            return;
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} Looking up: {msg}") {
            pb.set_style(style);
        }
        pb.set_message(question.to_string());
        pb.enable_steady_tick(self.update_interval);
        self.current_bar = Some(pb);
    }

    /// Finish current spinner
    pub fn finish_current(&mut self) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
    }

    /// Print an answer, optionally with where it came from
    pub fn show_answer(&mut self, resolution: &Resolution, show_source: bool, duration_ms: u64) {
        self.finish_current();

        println!("{} {}", "Answer:".green().bold(), resolution.answer);
        if show_source {
            let stored = match resolution.persistence {
                Persistence::Stored => " | saved",
                _ => "",
            };
            println!(
                "{}",
                format!("  (source: {}{} | {}ms)", resolution.source, stored, duration_ms).dimmed()
            );
        }
        if let Some(reason) = resolution.persistence_error() {
            self.show_warning(&format!("Answer could not be saved: {}", reason));
        }
    }

    /// Display error message
    pub fn show_error(&self, error: &str) {
        println!("{} {}", "Error:".red().bold(), error.red());
    }

    /// Display warning message
    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
    }

    /// Display info message
    pub fn show_info(&self, info: &str) {
        println!("{} {}", "Info:".cyan(), info);
    }

    /// Display success message
    pub fn show_success(&self, message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Show session statistics
    pub fn show_status(&self, stats: &ResolutionStats, store_entries: usize, elapsed: Duration) {
        self.show_section("Session Status:");
        println!("  {:<20} {}s", "Duration:", elapsed.as_secs());
        println!("  {:<20} {}", "Questions:", stats.questions);
        println!(
            "  {:<20} {} ({:.0}%)",
            "Cache hits:",
            stats.cache_hits,
            stats.cache_hit_rate() * 100.0
        );
        println!("  {:<20} {}", "Provider answers:", stats.provider_answers);
        println!("  {:<20} {}", "Not found:", stats.not_found);
        println!("  {:<20} {}", "Saved answers:", stats.stored);
        if stats.store_failures > 0 {
            println!("  {:<20} {}", "Save failures:", stats.store_failures.to_string().red());
        }
        println!("  {:<20} {:.0}ms", "Average time:", stats.average_duration_ms());
        println!("  {:<20} {}", "Known answers:", store_entries);

        if !stats.by_source.is_empty() {
            println!("\n  {}", "By source:".bold());
            for (source, count) in &stats.by_source {
                println!("    {:<18} {}", source.cyan(), count);
            }
        }
        println!();
    }

    /// List stored entries
    pub fn show_store(&self, entries: &StoreSnapshot, limit: Option<usize>) {
        if entries.is_empty() {
            println!("{}", "No stored answers yet.".yellow());
            return;
        }

        let shown = limit.unwrap_or(entries.len()).min(entries.len());
        self.show_section(&format!("Stored answers ({} of {}):", shown, entries.len()));
        for (index, (question, answer)) in entries.iter().take(shown).enumerate() {
            println!("  {}. {}", (index + 1).to_string().cyan(), question.bold());
            println!("     {}", answer.dimmed());
        }
        println!();
    }

    /// Show section header
    pub fn show_section(&self, title: &str) {
        println!("\n{}", title.bold().cyan());
        println!("{}", "=".repeat(60).cyan());
    }

    /// Clear screen
    pub fn clear_screen(&self) -> io::Result<()> {
        print!("\x1B[2J\x1B[1;1H");
        io::stdout().flush()
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::AnswerSource;

    #[test]
    fn test_display_manager_creation() {
        let manager = DisplayManager::new();
        assert!(manager.current_bar.is_none());
        assert_eq!(manager.update_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_start_and_finish_resolving() {
        let mut manager = DisplayManager::new();
        manager.start_resolving("what is rust");
        assert!(manager.current_bar.is_some());

        manager.finish_current();
        assert!(manager.current_bar.is_none());
    }

    #[test]
    fn test_no_spinner_when_progress_disabled() {
        let mut manager = DisplayManager::new().with_progress(false);
        manager.start_resolving("what is rust");
        assert!(manager.current_bar.is_none());
    }

    #[test]
    fn test_show_answer_clears_spinner() {
        let mut manager = DisplayManager::new();
        manager.start_resolving("hello");
        manager.show_answer(&Resolution::transient("Hi there!", AnswerSource::Canned), true, 3);
        assert!(manager.current_bar.is_none());
    }

    #[test]
    fn test_show_store() {
        let manager = DisplayManager::new();
        let mut entries = StoreSnapshot::new();
        manager.show_store(&entries, None);

        entries.insert("q".to_string(), "a".to_string());
        manager.show_store(&entries, Some(10));
    }
}
