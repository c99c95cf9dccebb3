//! AskBuddy - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use askbuddy::{
    cli::{Args, Commands, Config, Verbosity},
    providers::{self, http, ProviderChain, WeatherApi},
    repl::{default_history_path, DisplayManager, ReplSession},
    resolver::AnswerResolver,
    speech::{listener_from_config, speaker_from_config},
    store::ResponseStore,
    telemetry::init_logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    args.validate().map_err(anyhow::Error::msg)?;

    let mut config = Config::load(args.config.clone()).context("Failed to load configuration")?;
    if let Some(store) = &args.store {
        config.store.path = store.display().to_string();
    }
    if args.speak {
        config.speech.enabled = true;
    }

    let verbosity = effective_verbosity(&args, &config);
    init_logging(verbosity);
    if !config.telemetry.color_output {
        colored::control::set_override(false);
    }

    match &args.command {
        Some(Commands::Start) => run_repl(&config, verbosity).await?,
        Some(Commands::Store { limit }) => list_store(&config, *limit)?,
        Some(Commands::Config) => show_config(&config, args.config.as_deref())?,
        None => {
            if let Some(question) = &args.question {
                answer_once(&config, verbosity, question).await?;
            } else {
                println!("AskBuddy v{} - Ask me anything", env!("CARGO_PKG_VERSION"));
                println!("\nUsage:");
                println!("  askbuddy <question>       Answer a single question");
                println!("  askbuddy start            Interactive question loop");
                println!("  askbuddy store            List stored answers");
                println!("  askbuddy config           Show configuration");
                println!("\nExample:");
                println!("  askbuddy \"What is the capital of France?\"");
                println!();
            }
        }
    }

    Ok(())
}

/// Flags win; without any, the configured default applies
fn effective_verbosity(args: &Args, config: &Config) -> Verbosity {
    let from_flags = args.verbosity();
    if from_flags != Verbosity::Normal {
        return from_flags;
    }
    Verbosity::from_name(&config.telemetry.default_verbosity).unwrap_or(Verbosity::Normal)
}

/// Wire the store, providers and weather lookup into a resolver
fn build_resolver(config: &Config) -> Result<AnswerResolver> {
    let store_path = config.store_path();
    let store = ResponseStore::open(&store_path)
        .with_context(|| format!("Failed to open response store {}", store_path.display()))?;
    info!(path = %store_path.display(), entries = store.len(), "response store loaded");

    let knowledge = providers::default_providers(&config.providers)?;
    let chain = ProviderChain::from_config(knowledge, &config.providers);
    debug!(providers = ?chain.provider_names(), "provider chain ready");

    let client = http::build_client(&config.providers)?;
    let weather = WeatherApi::new(client, config.providers.weather.clone());

    Ok(AnswerResolver::new(Arc::new(store), chain, Arc::new(weather)))
}

async fn answer_once(config: &Config, verbosity: Verbosity, question: &str) -> Result<()> {
    let resolver = build_resolver(config)?;
    let mut display = DisplayManager::new().with_progress(verbosity.show_progress());

    display.start_resolving(question.trim());
    let started = Instant::now();
    let resolution = resolver.resolve(question).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if verbosity == Verbosity::Quiet {
        display.finish_current();
        println!("{}", resolution.answer);
    } else {
        display.show_answer(&resolution, verbosity.show_source(), elapsed_ms);
    }

    if config.speech.enabled {
        speaker_from_config(&config.speech)
            .speak(&resolution.answer)
            .wait()
            .await;
    }

    Ok(())
}

async fn run_repl(config: &Config, verbosity: Verbosity) -> Result<()> {
    let resolver = Arc::new(build_resolver(config)?);

    let mut session = ReplSession::new(resolver, default_history_path())?
        .with_verbosity(verbosity)
        .with_speaker(speaker_from_config(&config.speech), config.speech.enabled)
        .with_listener(listener_from_config(&config.speech));

    session.show_welcome(env!("CARGO_PKG_VERSION"));
    session.run().await
}

fn list_store(config: &Config, limit: Option<usize>) -> Result<()> {
    let store_path = config.store_path();
    let store = ResponseStore::open(&store_path)
        .with_context(|| format!("Failed to open response store {}", store_path.display()))?;

    println!("{} {}", "Store:".bold(), store_path.display());
    DisplayManager::new().show_store(&store.entries(), limit);
    Ok(())
}

fn show_config(config: &Config, explicit_path: Option<&Path>) -> Result<()> {
    println!("{}", "AskBuddy Configuration".bold().cyan());
    let source = match explicit_path {
        Some(path) => Some(path.to_path_buf()),
        None => Config::default_path().filter(|path| path.exists()),
    };
    match source {
        Some(path) => println!("{}", format!("# loaded from {}", path.display()).dimmed()),
        None => println!("{}", "# built-in defaults".dimmed()),
    }
    println!();

    let rendered = config.redacted().to_toml().context("Failed to render configuration")?;
    println!("{}", rendered);
    Ok(())
}
