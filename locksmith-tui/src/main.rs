//! Locksmith CLI entry point
//!
//! Runs the interactive strength meter by default, with headless `check`
//! and `validate` commands for scripting.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use locksmith_core::{HttpAnalysisClient, LocksmithConfig};
use locksmith_tui::{check_password, export_structured_data, render_summary, run_tui};
use locksmith_utils::{init_logging, LoggerConfig};
use std::io::BufRead;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "locksmith")]
#[command(version)]
#[command(about = "Live password strength analysis in the terminal")]
#[command(long_about = "Type a password and see its strength update as you go. Scoring is done by a separate analysis service; Locksmith only debounces input, talks to the service and presents the result.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, global = true, env = "LOCKSMITH_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Analysis service endpoint
    #[arg(long, global = true, env = "LOCKSMITH_ENDPOINT", value_name = "URL")]
    endpoint: Option<String>,

    /// Quiet period before a request is sent (milliseconds)
    #[arg(long, global = true, value_name = "MS")]
    debounce_ms: Option<u64>,

    /// Per-request timeout (seconds); 0 disables it
    #[arg(long, global = true, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Log level: debug, info, warning, error or critical
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write logs to this file. The interactive screen only logs when one is set.
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive strength meter (default)
    Run,
    /// Analyze one password and print the result
    Check {
        /// Password to analyze; read from stdin when omitted
        password: Option<String>,
        /// Print a text summary instead of JSON
        #[arg(long)]
        summary: bool,
    },
    /// Validate configuration and print the effective settings
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = effective_config(&cli)?;
    setup_logging(&cli, &config)?;
    run_main_logic(&cli, &config).await
}

async fn run_main_logic(cli: &Cli, config: &LocksmithConfig) -> Result<()> {
    match &cli.command {
        None | Some(Commands::Run) => run_tui(config).await,
        Some(Commands::Check { password, summary }) => {
            check(config, password.as_deref(), *summary).await
        }
        Some(Commands::Validate) => validate_configuration(config),
    }
}

/// Config file layered under command line flags
fn effective_config(cli: &Cli) -> Result<LocksmithConfig> {
    let mut config = LocksmithConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(endpoint) = &cli.endpoint {
        config.service.endpoint.clone_from(endpoint);
    }
    if let Some(debounce_ms) = cli.debounce_ms {
        config.orchestrator.debounce_ms = debounce_ms;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.service.request_timeout_secs = Some(timeout_secs);
    }
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if let Some(file) = &cli.log_file {
        config.logging.file = Some(file.clone());
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn setup_logging(cli: &Cli, config: &LocksmithConfig) -> Result<()> {
    let interactive = matches!(cli.command, None | Some(Commands::Run));
    // stderr would draw over the interactive screen
    if interactive && config.logging.file.is_none() {
        return Ok(());
    }

    init_logging(LoggerConfig {
        level: config.log_level()?,
        log_file: config.logging.file.clone(),
        ..LoggerConfig::default()
    })?;
    Ok(())
}

async fn check(config: &LocksmithConfig, password: Option<&str>, summary: bool) -> Result<()> {
    let password = match password {
        Some(password) => password.to_string(),
        None => read_password_from_stdin()?,
    };

    let client = HttpAnalysisClient::from_config(&config.service)?;
    let result = check_password(&client, &password).await?;

    if summary {
        print!("{}", render_summary(&result));
    } else {
        println!("{}", export_structured_data(&result)?);
    }
    Ok(())
}

fn read_password_from_stdin() -> Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn validate_configuration(config: &LocksmithConfig) -> Result<()> {
    println!("✅ Configuration is valid");
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
