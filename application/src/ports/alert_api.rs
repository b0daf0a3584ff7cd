//! Alert API port
//!
//! Defines the interface for talking to the Opsgenie Alert API. One method
//! per supported operation; each issues exactly one HTTP call.

use async_trait::async_trait;
use opsgenie_mcp_domain::{
    AcceptedResponse, AddDetailsPayload, AddNotePayload, Alert, AlertActionPayload, AlertLog,
    AlertNote, ApiKey, CreateAlertPayload, IdentifierType, ListAlertsParams, ListEntriesParams,
    Page,
};
use thiserror::Error;

/// Fallback message used when an error response carries no readable message
pub fn http_error_message(status: u16) -> String {
    format!("HTTP error! status: {}", status)
}

/// The single failure shape of every Opsgenie call.
///
/// `status` is the HTTP status code, or 0 when no response was received
/// (DNS, connection, timeout).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Opsgenie API Error ({status}): {message}")]
pub struct RemoteError {
    pub status: u16,
    pub message: String,
}

impl RemoteError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Error for a non-2xx response. A missing server message falls back to
    /// the generic HTTP error text.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| http_error_message(status));
        Self { status, message }
    }

    /// Error for a request that never got a response
    pub fn network(cause: impl std::fmt::Display) -> Self {
        Self {
            status: 0,
            message: format!("Network error: {}", cause),
        }
    }

    pub fn is_network(&self) -> bool {
        self.status == 0
    }
}

/// An alert addressed by one of its identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRef {
    pub identifier: String,
    pub identifier_type: IdentifierType,
}

impl AlertRef {
    pub fn new(identifier: impl Into<String>, identifier_type: IdentifierType) -> Self {
        Self {
            identifier: identifier.into(),
            identifier_type,
        }
    }

    /// Address an alert by its internal id
    pub fn id(identifier: impl Into<String>) -> Self {
        Self::new(identifier, IdentifierType::Id)
    }
}

/// Port for the Opsgenie Alert API
///
/// `key` is the credential for this call only. `None` sends the request
/// without an authorization header and lets Opsgenie reject it.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait AlertApiPort: Send + Sync {
    /// `GET /v2/alerts`
    async fn list_alerts(
        &self,
        key: Option<&ApiKey>,
        params: &ListAlertsParams,
    ) -> Result<Page<Alert>, RemoteError>;

    /// `POST /v2/alerts`
    async fn create_alert(
        &self,
        key: Option<&ApiKey>,
        payload: &CreateAlertPayload,
    ) -> Result<AcceptedResponse, RemoteError>;

    /// `POST /v2/alerts/{id}/acknowledge`
    async fn acknowledge_alert(
        &self,
        key: Option<&ApiKey>,
        alert: &AlertRef,
        payload: &AlertActionPayload,
    ) -> Result<AcceptedResponse, RemoteError>;

    /// `POST /v2/alerts/{id}/close`
    async fn close_alert(
        &self,
        key: Option<&ApiKey>,
        alert: &AlertRef,
        payload: &AlertActionPayload,
    ) -> Result<AcceptedResponse, RemoteError>;

    /// `GET /v2/alerts/{id}/notes`
    async fn list_alert_notes(
        &self,
        key: Option<&ApiKey>,
        alert: &AlertRef,
        params: &ListEntriesParams,
    ) -> Result<Page<AlertNote>, RemoteError>;

    /// `POST /v2/alerts/{id}/notes`
    async fn add_note(
        &self,
        key: Option<&ApiKey>,
        alert: &AlertRef,
        payload: &AddNotePayload,
    ) -> Result<AcceptedResponse, RemoteError>;

    /// `GET /v2/alerts/{id}/logs`
    async fn list_alert_logs(
        &self,
        key: Option<&ApiKey>,
        alert: &AlertRef,
        params: &ListEntriesParams,
    ) -> Result<Page<AlertLog>, RemoteError>;

    /// `POST /v2/alerts/{id}/details`
    async fn add_details(
        &self,
        key: Option<&ApiKey>,
        alert: &AlertRef,
        payload: &AddDetailsPayload,
    ) -> Result<AcceptedResponse, RemoteError>;
}
