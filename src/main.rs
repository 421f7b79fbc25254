//! Anuvad - Neural Machine Translation Workflow
//!
//! Entry point for the anuvad CLI, which translates between English, Hindi
//! and Marathi using pretrained seq2seq models with English-pivot routing,
//! transliteration for romanized input, and BLEU/TER/METEOR evaluation.

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use anuvad::cli::{Args, Commands};
use anuvad::config::Config;
use anuvad::lang::Language;
use anuvad::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load config.toml from current directory first
            if std::path::Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    let mut workflow = Workflow::new(config);

    // Execute command
    match args.command {
        Commands::Translate {
            text,
            from,
            to,
            transliterate,
            reference,
            compare,
        } => {
            let source = Language::parse(&from)?;
            let target = Language::parse(&to)?;
            info!("Translating {} -> {}", source, target);

            workflow
                .translate(&text, source, target, transliterate, reference, compare)
                .await?;
        }
        Commands::Evaluate { input, output } => {
            // The batch evaluator exits 1 on missing arguments rather than
            // relying on clap's own error code.
            let (input, output) = match (input, output) {
                (Some(input), Some(output)) => (input, output),
                _ => {
                    eprintln!("Usage: anuvad evaluate <input.csv> <output.csv>");
                    std::process::exit(1);
                }
            };

            info!("Evaluating {} -> {}", input.display(), output.display());
            workflow.run_evaluation(&input, &output).await?;
        }
        Commands::Results { file } => {
            workflow.show_results(file)?;
        }
        Commands::History { limit } => {
            workflow.show_history(limit)?;
        }
        Commands::Models => {
            workflow.list_models()?;
        }
    }

    Ok(())
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let anuvad_dir = std::env::current_dir()?.join(".anuvad");
    let log_dir = anuvad_dir.join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "anuvad.log");
    let (non_blocking_file, _guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(_guard);

    // Determine log level
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Create console layer
    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false);

    // Create file layer
    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false); // No ANSI colors in file

    // Setup layered subscriber
    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer);

    // Initialize the subscriber
    subscriber
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
