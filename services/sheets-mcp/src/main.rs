//! Google Sheets MCP server
//!
//! Single-binary Rust service that:
//! 1. Loads Nango connection settings from a TOML file and/or `NANGO_*` env vars
//! 2. Obtains a Google access token from the Nango broker
//! 3. Speaks MCP (JSON-RPC over stdio), one tool per Sheets v4 operation
//! 4. Logs JSON to stderr; stdout carries protocol messages only

mod config;
mod diagnostics;
mod error;
mod protocol;
mod server;
mod tools;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::server::Server;

#[derive(Parser, Debug)]
#[command(name = "sheets-mcp", version, about = "Google Sheets v4 MCP server backed by Nango")]
struct Args {
    /// Path to a TOML config file (falls back to CONFIG_PATH)
    #[arg(long)]
    config: Option<String>,

    /// Transport to serve on; only stdio is supported
    #[arg(long, default_value = "stdio")]
    transport: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is the protocol channel, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();
    if args.transport != "stdio" {
        bail!("unsupported transport: {} (only stdio is available)", args.transport);
    }

    info!("starting sheets-mcp");

    let config_path = Config::resolve_path(args.config.as_deref(), |key| std::env::var(key).ok());
    let config = Config::load(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("failed to load config from {}", path.display()),
        None => "failed to load config from environment".to_string(),
    })?;

    info!(
        api_base_url = %config.sheets.api_base_url,
        timeout_secs = config.sheets.timeout_secs,
        config_file = ?config_path,
        "configuration loaded"
    );

    let server = Arc::new(Server::from_config(&config)?);
    server.warm_up().await;

    info!(transport = "stdio", "serving MCP requests");
    server::serve(
        server,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await?;

    info!("stdin closed, shutting down");
    Ok(())
}
