//! loanform CLI - Main Entry Point

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use loanform_cli::commands::{cases, checksum, generate, scenarios, validate};
use loanform_cli::output;
use loanform_e2e::SuiteConfig;

/// loanform - identity number checksums, form validation and the E2E suite
#[derive(Parser)]
#[command(name = "loanform")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Suite configuration file
    #[arg(long, default_value = "loanform-e2e.toml", env = "LOANFORM_CONFIG", global = true)]
    config: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the check digit of a digit string
    Checksum(checksum::ChecksumArgs),

    /// Check candidates against a field's rules
    Validate(validate::ValidateArgs),

    /// Generate a valid applicant
    Generate(generate::GenerateArgs),

    /// Show the built-in field tables
    Cases(cases::CasesArgs),

    /// List, export or run the browser scenarios
    #[command(subcommand)]
    Scenarios(scenarios::ScenarioCommands),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Checksum(args) => checksum::execute(args, cli.format)?,
        Commands::Validate(args) => validate::execute(args, cli.format)?,
        Commands::Generate(args) => generate::execute(args, cli.format)?,
        Commands::Cases(args) => cases::execute(args, cli.format)?,
        Commands::Scenarios(cmd) => {
            debug!("Using suite config {}", cli.config.display());
            let config = SuiteConfig::load(&cli.config)
                .with_context(|| format!("loading {}", cli.config.display()))?;
            scenarios::execute(cmd, config, cli.format).await?
        }
        Commands::Version => {
            println!("loanform v{}", loanform_common::VERSION);
        }
    }

    Ok(())
}
