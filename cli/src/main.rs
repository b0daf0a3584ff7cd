//! CLI entrypoint for the Opsgenie MCP server
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use opsgenie_mcp_application::{AlertToolExecutor, ServerConfig};
use opsgenie_mcp_domain::TransportKind;
use opsgenie_mcp_infrastructure::{
    ConfigLoader, HttpState, JsonSchemaToolConverter, McpServer, OpsgenieClient, serve_http,
    serve_stdio,
};
use opsgenie_mcp_presentation::{Cli, missing_api_key_usage};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let _log_guard = init_logging(&cli)?;

    let file_config = if cli.no_config {
        ConfigLoader::load_without_files()
    } else {
        ConfigLoader::load(cli.config.as_deref())
    }
    .context("Failed to load configuration")?;
    let config = cli.apply_overrides(file_config.into_server_config());

    // stdio has no request headers to carry a key, so one must exist up front
    if config.transport == TransportKind::Stdio && config.default_api_key.is_none() {
        eprintln!("{}", missing_api_key_usage());
        std::process::exit(1);
    }

    info!(
        transport = %config.transport,
        api_base = %config.api_base,
        "Starting Opsgenie MCP server"
    );

    // === Dependency Injection ===
    let server = Arc::new(build_server(&config)?);

    let cancellation = CancellationToken::new();
    tokio::spawn(shutdown_on_ctrl_c(cancellation.clone()));

    match config.transport {
        TransportKind::Stdio => {
            serve_stdio(&server, config.stdio_credential_scope(), cancellation).await?;
        }
        TransportKind::Http => {
            let state = HttpState::new(server, config.default_api_key.clone());
            serve_http(state, config.port, cancellation).await?;
        }
    }

    Ok(())
}

fn build_server(config: &ServerConfig) -> Result<McpServer> {
    let client = OpsgenieClient::from_config(config).context("Failed to build Opsgenie client")?;
    let executor = Arc::new(AlertToolExecutor::new(Arc::new(client)));
    Ok(McpServer::new(executor, Arc::new(JsonSchemaToolConverter)))
}

/// Initialize logging based on verbosity level.
///
/// Logs never go to stdout, which carries the stdio transport.
fn init_logging(cli: &Cli) -> Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    let (writer, guard) = match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(cli.log_file.is_none())
        .with_writer(writer)
        .init();

    Ok(guard)
}

async fn shutdown_on_ctrl_c(cancellation: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Received Ctrl-C, shutting down");
            cancellation.cancel();
        }
        Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
    }
}
