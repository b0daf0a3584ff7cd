//! Opsgenie REST API adapter

pub mod client;

pub use client::{ClientError, OpsgenieClient};
