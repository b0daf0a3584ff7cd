//! Presentation layer for opsgenie-mcp
//!
//! This crate contains the command-line definition of the server binary.

pub mod cli;

// Re-export commonly used types
pub use cli::commands::{Cli, TransportArg, missing_api_key_usage};
