// src/main.rs
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use url_poller::{
    config::{self, PollerConfig},
    endpoints,
    poller::{exit_code, Poller},
    report::{self, ConsoleReporter},
};

/// Check a set of HTTP(S) endpoints once and report their status.
///
/// The exit code is the number of endpoints that are neither up nor
/// redirecting.
#[derive(Debug, Parser)]
#[command(name = "url-poller", version)]
struct Cli {
    /// Endpoint file: a JSON/YAML list of {"url", "caption"} objects or a
    /// name-to-URL map. Without it a built-in sample set is checked.
    input: Option<PathBuf>,

    /// Settings file (JSON, YAML or TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Maximum number of checks in flight
    #[arg(short = 'w', long)]
    max_workers: Option<usize>,

    /// Directory for the JSON results snapshot
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Only print one line per endpoint
    #[arg(long)]
    no_details: bool,

    /// Skip writing the JSON results snapshot
    #[arg(long)]
    no_save: bool,
}

impl Cli {
    fn apply(&self, config: &mut PollerConfig) {
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(max_workers) = self.max_workers {
            config.max_workers = max_workers;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if self.no_details {
            config.show_details = false;
        }
        if self.no_save {
            config.save_snapshot = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("url_poller=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_ref())?;
    cli.apply(&mut config);
    config.validate()?;

    let endpoints = match &cli.input {
        Some(path) => {
            info!("Loading endpoints from: {}", path.display());
            endpoints::load_endpoints(path).await?
        }
        None => endpoints::sample_endpoints(),
    };

    let poller = Poller::new(&config)?;

    println!("Starting URL polling...");
    println!(
        "Checking {} URLs with {} concurrent workers",
        endpoints.len(),
        poller.max_workers()
    );

    let results = poller.poll_all(endpoints).await;

    ConsoleReporter::new(config.show_details).print(&results)?;

    if config.save_snapshot {
        let path = report::write_snapshot(&config.output_dir, &results).await?;
        println!("\nResults saved to: {}", path.display());
    }

    Ok(ExitCode::from(exit_code(&results)))
}
