//! Configuration file loading for opsgenie-mcp
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `OPSGENIE_MCP_*` and `OPSGENIE_API_KEY`
//! 2. `--config <path>` specified file
//! 3. Project root: `./opsgenie-mcp.toml`
//! 4. Global: `~/.config/opsgenie-mcp/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{ConfigValidationError, FileConfig};
pub use loader::{API_KEY_ENV, ConfigLoadError, ConfigLoader, ConfigSources, ENV_PREFIX};
