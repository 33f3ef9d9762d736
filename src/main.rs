//! Lumen-Sweep main entry point
//!
//! This is the command-line interface for the Lumen-Sweep site auditor.

use anyhow::Context;
use clap::Parser;
use lumen_sweep::audit::AuditCommand;
use lumen_sweep::config::load_config_with_hash;
use lumen_sweep::dispatch::{run_sweep, SweepOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Lumen-Sweep: audit every page of a website with Lighthouse
///
/// Lumen-Sweep crawls a site from a starting URL, runs Lighthouse against
/// each page it finds, and writes one HTML report. It exits with status 1
/// when any audit fails.
#[derive(Parser, Debug)]
#[command(name = "lumen-sweep")]
#[command(version)]
#[command(about = "Crawl a website and audit every page with Lighthouse", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "URL")]
    url: Url,

    /// Path to the JSON configuration file (also passed to Lighthouse)
    #[arg(short, long, value_name = "CONFIG")]
    config: PathBuf,

    /// Where to write the HTML report
    #[arg(short, long, default_value = "result.html")]
    output: PathBuf,

    /// Program used to run audits
    #[arg(long, default_value = "lighthouse")]
    audit_command: PathBuf,

    /// Extra argument placed before the URL when running the audit program (repeatable)
    #[arg(long = "audit-arg", value_name = "ARG", allow_hyphen_values = true)]
    audit_args: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Configuration problems are fatal before any crawling starts
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let config_path = cli
        .config
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", cli.config.display()))?;

    let options = SweepOptions {
        seed: cli.url,
        config_path,
        output_path: cli.output,
        audit_command: AuditCommand::new(cli.audit_command).with_leading_args(cli.audit_args),
    };

    let verdict = run_sweep(&config, options).await.context("Sweep failed")?;

    Ok(ExitCode::from(verdict.exit_code() as u8))
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lumen_sweep=info,warn"),
            1 => EnvFilter::new("lumen_sweep=debug,info"),
            2 => EnvFilter::new("lumen_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}
