//! CLI command definitions

use clap::{Parser, ValueEnum};
use opsgenie_mcp_application::ServerConfig;
use opsgenie_mcp_domain::TransportKind;
use std::path::PathBuf;

/// Transport selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportArg {
    /// JSON-RPC over stdin/stdout
    Stdio,
    /// Streamable HTTP on `/mcp`
    Http,
}

impl From<TransportArg> for TransportKind {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Stdio => TransportKind::Stdio,
            TransportArg::Http => TransportKind::Http,
        }
    }
}

/// CLI arguments for opsgenie-mcp-server
#[derive(Parser, Debug)]
#[command(name = "opsgenie-mcp-server")]
#[command(author, version, about = "Opsgenie MCP Server with multiple transport options")]
#[command(long_about = r#"
Exposes Opsgenie alert operations (list, create, acknowledge, close, notes,
logs, details) as MCP tools.

Configuration files are loaded from (in priority order):
1. --config <path>        Explicit config file
2. ./opsgenie-mcp.toml    Project-level config
3. ~/.config/opsgenie-mcp/config.toml   Global config

Environment variables OPSGENIE_MCP_* override files; CLI flags override both.

Example:
  opsgenie-mcp-server --api-key <key>
  opsgenie-mcp-server --transport http --port 3000
"#)]
pub struct Cli {
    /// Transport type
    #[arg(short, long, value_enum)]
    pub transport: Option<TransportArg>,

    /// Port number for HTTP transport
    #[arg(short, long, value_name = "NUMBER", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Opsgenie API key
    #[arg(short = 'a', long, value_name = "KEY", env = "OPSGENIE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Opsgenie API base URL
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Timeout in seconds for Opsgenie requests
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Apply the flags that were given over the merged configuration
    pub fn apply_overrides(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(transport) = self.transport {
            config = config.with_transport(transport.into());
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(api_base) = &self.api_base {
            config = config.with_api_base(api_base.clone());
        }
        if self.timeout.is_some() {
            config = config.with_timeout_seconds(self.timeout);
        }
        if let Some(key) = &self.api_key
            && !key.trim().is_empty()
        {
            config = config.with_default_api_key(Some(key.clone()));
        }
        config
    }
}

/// Usage text printed when stdio is selected without any credential
pub fn missing_api_key_usage() -> &'static str {
    "Error: Opsgenie API key is required for stdio transport.\n\
     Provide it via:\n  \
     --api-key <key>              CLI argument\n  \
     OPSGENIE_API_KEY=<key>      Environment variable"
}
