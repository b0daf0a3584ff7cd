//! Domain layer for opsgenie-mcp
//!
//! This crate contains the core types of the Opsgenie MCP server: the alert
//! records exchanged with the Opsgenie REST API, the tool definitions exposed
//! to agents, argument validation, and credential resolution.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Alert
//!
//! The incident record tracked by Opsgenie. Alerts move through
//! `open → acked → closed` and are addressed by one of three identifiers
//! (see [`IdentifierType`]).
//!
//! ## Tool
//!
//! A named, schema-validated operation callable by an agent. Every tool is a
//! [`ToolDefinition`]; invocations are [`ToolCall`]s checked by a
//! [`ToolValidator`] before anything touches the network.
//!
//! ## Credential
//!
//! An opaque Opsgenie API key, resolved per call from an ordered list of
//! candidate sources (see [`resolve_credential`]).

pub mod alert;
pub mod config;
pub mod credential;
pub mod tool;

// Re-export commonly used types
pub use alert::{
    entities::{
        AcceptedResponse, AddDetailsPayload, AddNotePayload, Alert, AlertActionPayload, AlertLog,
        AlertNote, CreateAlertPayload, ListAlertsParams, ListEntriesParams, Page, Paging,
        Recipient,
    },
    value_objects::{
        IdentifierType, PageDirection, Priority, RecipientType, SearchIdentifierType, SortOrder,
    },
};
pub use config::TransportKind;
pub use credential::{ApiKey, CredentialScope, CredentialSource, ResolvedCredential, resolve_credential};
pub use tool::{
    DefaultToolValidator, ParamType, RiskLevel, ToolCall, ToolDefinition, ToolError,
    ToolParameter, ToolResult, ToolResultMetadata, ToolSpec, ToolValidator, ValidationError,
};
