//! urlshort: path → URL redirect service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ http server ──▶ source #1 ──miss──▶ source #2 ──miss──▶ ... ──▶ fallback
//!                                        │hit                │hit                      (Hello)
//!     ◀── 302/308 + Location ────────────┴───────────────────┘
//! ```
//!
//! Sources come from `--config <toml>` and any number of `--path <file>`
//! flags, tried in that order. With neither flag, `config.yaml` is loaded.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use urlshort::config::{self, ServerConfig};
use urlshort::http::{default_fallback, HttpServer};
use urlshort::lifecycle::{shutdown_signal, start};
use urlshort::observability::logging;

/// Rules file used when no source is named on the command line.
const DEFAULT_RULES_PATH: &str = "config.yaml";

#[derive(Parser)]
#[command(name = "urlshort")]
#[command(about = "Redirect request paths to URLs from YAML, JSON or store sources", long_about = None)]
struct Cli {
    /// Server configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rule source, selected by extension (.yaml, .yml, .json, .db, .redb). Repeatable.
    /// Defaults to `config.yaml` when neither --config nor --path is given.
    #[arg(short, long)]
    path: Vec<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("urlshort: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability.log_filter);
    tracing::info!("urlshort v{} starting", env!("CARGO_PKG_VERSION"));

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

/// Merge the config file and command line flags into one validated config.
fn load(cli: &Cli) -> Result<ServerConfig, config::ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ServerConfig::default(),
    };

    for path in &cli.path {
        config.sources.push(config::source_from_path(path)?);
    }
    if cli.config.is_none() && cli.path.is_empty() {
        config
            .sources
            .push(config::source_from_path(Path::new(DEFAULT_RULES_PATH))?);
    }
    if let Some(bind) = &cli.bind {
        config.listener.bind_address = bind.clone();
    }

    config::validate_config(&config).map_err(config::ConfigError::Validation)?;
    Ok(config)
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        sources = config.sources.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let chain = start(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(&config, chain, default_fallback());
    server.run(listener, shutdown_signal()).await?;
    Ok(())
}
