//! Configuration file loader with multi-source merging

use super::file_config::{ConfigValidationError, FileConfig};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix of the environment variables that override file settings
pub const ENV_PREFIX: &str = "OPSGENIE_MCP_";

/// Conventional variable carrying the process default credential
pub const API_KEY_ENV: &str = "OPSGENIE_API_KEY";

const PROJECT_FILE: &str = "opsgenie-mcp.toml";
const APP_DIR: &str = "opsgenie-mcp";

/// Errors raised while assembling the configuration
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error(transparent)]
    Figment(#[from] Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(#[from] ConfigValidationError),
}

/// Config files taking part in a load, lowest priority first
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub global: Option<PathBuf>,
    pub project: Option<PathBuf>,
    pub explicit: Option<PathBuf>,
}

impl ConfigSources {
    /// The files present on this machine plus an optional `--config` path
    pub fn discover(config_path: Option<&Path>) -> Self {
        Self {
            global: ConfigLoader::global_config_path().filter(|p| p.exists()),
            project: ConfigLoader::project_config_path(),
            explicit: config_path.map(Path::to_path_buf),
        }
    }
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `OPSGENIE_MCP_*`, plus `OPSGENIE_API_KEY` for `api_key`
    /// 2. Explicit config path (if provided)
    /// 3. Project: `./opsgenie-mcp.toml`
    /// 4. Global: `~/.config/opsgenie-mcp/config.toml`
    /// 5. Default values
    ///
    /// CLI flags are applied over the result by the caller.
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigLoadError> {
        Self::load_from(&ConfigSources::discover(config_path), true)
    }

    /// Defaults plus environment, skipping every file (for --no-config)
    pub fn load_without_files() -> Result<FileConfig, ConfigLoadError> {
        Self::load_from(&ConfigSources::default(), true)
    }

    /// Merge the given sources, optionally followed by the environment
    pub fn load_from(sources: &ConfigSources, with_env: bool) -> Result<FileConfig, ConfigLoadError> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [&sources.global, &sources.project].into_iter().flatten() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = &sources.explicit {
            if !path.exists() {
                return Err(ConfigLoadError::NotFound(path.clone()));
            }
            figment = figment.merge(Toml::file(path));
        }

        if with_env {
            figment = figment
                .merge(Env::raw().only(&[API_KEY_ENV]).map(|_| "api_key".into()))
                .merge(Env::prefixed(ENV_PREFIX));
        }

        let config: FileConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the global config file path
    ///
    /// Returns `$XDG_CONFIG_HOME/opsgenie-mcp/config.toml` if set, otherwise
    /// the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_FILE);
        path.exists().then_some(path)
    }

    /// Print the config file locations being used (for debugging)
    ///
    /// Written to stderr: stdout belongs to the stdio transport.
    pub fn print_config_sources(config_path: Option<&Path>) {
        eprintln!("Configuration sources (in priority order):");
        eprintln!("  [     ] CLI flags");
        eprintln!("  [     ] Environment: {}* and {}", ENV_PREFIX, API_KEY_ENV);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            eprintln!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        match Self::project_config_path() {
            Some(path) => eprintln!("  [FOUND] Project: {}", path.display()),
            None => eprintln!("  [     ] Project: ./{}", PROJECT_FILE),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "" };
            eprintln!("  [{:<5}] Global:  {}", mark, path.display());
        }

        eprintln!("  [     ] Default: built-in defaults");
    }
}
