//! reqwest adapter for the Opsgenie Alert API.
//!
//! Each [`AlertApiPort`] method issues exactly one HTTP call:
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | list alerts | GET | `/v2/alerts` |
//! | create alert | POST | `/v2/alerts` |
//! | acknowledge | POST | `/v2/alerts/{id}/acknowledge` |
//! | close | POST | `/v2/alerts/{id}/close` |
//! | list notes | GET | `/v2/alerts/{id}/notes` |
//! | add note | POST | `/v2/alerts/{id}/notes` |
//! | list logs | GET | `/v2/alerts/{id}/logs` |
//! | add details | POST | `/v2/alerts/{id}/details` |
//!
//! Alert-scoped calls carry `identifierType` as a query parameter. Every
//! failure, HTTP or network, comes back as a [`RemoteError`].

use async_trait::async_trait;
use opsgenie_mcp_application::ServerConfig;
use opsgenie_mcp_application::ports::alert_api::{AlertApiPort, AlertRef, RemoteError};
use opsgenie_mcp_domain::{
    AcceptedResponse, AddDetailsPayload, AddNotePayload, Alert, AlertActionPayload, AlertLog,
    AlertNote, ApiKey, CreateAlertPayload, ListAlertsParams, ListEntriesParams, Page,
};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

const USER_AGENT: &str = concat!("opsgenie-mcp-server/", env!("CARGO_PKG_VERSION"));

/// Errors constructing an [`OpsgenieClient`]
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid Opsgenie API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Opsgenie Alert API client
#[derive(Debug, Clone)]
pub struct OpsgenieClient {
    http: Client,
    base: Url,
}

impl OpsgenieClient {
    /// Create a client for the given API base URL.
    ///
    /// `timeout` bounds each whole request; `None` keeps reqwest's default.
    pub fn new(api_base: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: api_base.to_string(),
            reason,
        };
        let base = Url::parse(api_base).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".to_string()));
        }

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base,
        })
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self, ClientError> {
        Self::new(&config.api_base, config.timeout)
    }

    /// `{base}/v2/alerts/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["v2", "alerts"]).extend(segments);
        }
        url
    }

    fn alert_endpoint(&self, alert: &AlertRef, action: &str) -> Url {
        self.endpoint(&[alert.identifier.as_str(), action])
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        mut url: Url,
        query: Vec<(String, String)>,
        body: Option<Value>,
        key: Option<&ApiKey>,
    ) -> Result<T, RemoteError> {
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        debug!(method = %method, path = url.path(), "Opsgenie request");

        let mut request = self.http.request(method, url);
        if let Some(key) = key {
            request = request.header(AUTHORIZATION, format!("GenieKey {}", key.expose()));
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(RemoteError::network)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(RemoteError::network)?;
        trace!(status = status.as_u16(), bytes = bytes.len(), "Opsgenie response");

        if !status.is_success() {
            return Err(RemoteError::from_status(
                status.as_u16(),
                error_message(&bytes),
            ));
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            RemoteError::new(status.as_u16(), format!("Invalid response body: {}", e))
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: Vec<(String, String)>,
        key: Option<&ApiKey>,
    ) -> Result<T, RemoteError> {
        self.request(Method::GET, url, query, None, key).await
    }

    async fn post<P: Serialize>(
        &self,
        url: Url,
        query: Vec<(String, String)>,
        payload: &P,
        key: Option<&ApiKey>,
    ) -> Result<AcceptedResponse, RemoteError> {
        let body = serde_json::to_value(payload)
            .map_err(|e| RemoteError::new(0, format!("Failed to encode request body: {}", e)))?;
        self.request(Method::POST, url, query, Some(body), key).await
    }
}

/// `message` field of a JSON error body, if any
fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Flatten serialized parameters into query pairs.
///
/// Unset values are skipped and arrays are comma-joined.
fn query_pairs(params: &impl Serialize) -> Vec<(String, String)> {
    let Ok(Value::Object(map)) = serde_json::to_value(params) else {
        return Vec::new();
    };
    map.into_iter()
        .filter_map(|(name, value)| query_value(&value).map(|v| (name, v)))
        .collect()
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(query_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

fn identifier_type_pair(alert: &AlertRef) -> (String, String) {
    (
        "identifierType".to_string(),
        alert.identifier_type.as_str().to_string(),
    )
}

#[async_trait]
impl AlertApiPort for OpsgenieClient {
    async fn list_alerts(
        &self,
        key: Option<&ApiKey>,
        params: &ListAlertsParams,
    ) -> Result<Page<Alert>, RemoteError> {
        self.get(self.endpoint(&[]), query_pairs(params), key).await
    }

    async fn create_alert(
        &self,
        key: Option<&ApiKey>,
        payload: &CreateAlertPayload,
    ) -> Result<AcceptedResponse, RemoteError> {
        self.post(self.endpoint(&[]), Vec::new(), payload, key).await
    }

    async fn acknowledge_alert(
        &self,
        key: Option<&ApiKey>,
        alert: &AlertRef,
        payload: &AlertActionPayload,
    ) -> Result<AcceptedResponse, RemoteError> {
        let url = self.alert_endpoint(alert, "acknowledge");
        self.post(url, vec![identifier_type_pair(alert)], payload, key)
            .await
    }

    async fn close_alert(
        &self,
        key: Option<&ApiKey>,
        alert: &AlertRef,
        payload: &AlertActionPayload,
    ) -> Result<AcceptedResponse, RemoteError> {
        let url = self.alert_endpoint(alert, "close");
        self.post(url, vec![identifier_type_pair(alert)], payload, key)
            .await
    }

    async fn list_alert_notes(
        &self,
        key: Option<&ApiKey>,
        alert: &AlertRef,
        params: &ListEntriesParams,
    ) -> Result<Page<AlertNote>, RemoteError> {
        let mut query = query_pairs(params);
        query.push(identifier_type_pair(alert));
        self.get(self.alert_endpoint(alert, "notes"), query, key).await
    }

    async fn add_note(
        &self,
        key: Option<&ApiKey>,
        alert: &AlertRef,
        payload: &AddNotePayload,
    ) -> Result<AcceptedResponse, RemoteError> {
        let url = self.alert_endpoint(alert, "notes");
        self.post(url, vec![identifier_type_pair(alert)], payload, key)
            .await
    }

    async fn list_alert_logs(
        &self,
        key: Option<&ApiKey>,
        alert: &AlertRef,
        params: &ListEntriesParams,
    ) -> Result<Page<AlertLog>, RemoteError> {
        let mut query = query_pairs(params);
        query.push(identifier_type_pair(alert));
        self.get(self.alert_endpoint(alert, "logs"), query, key).await
    }

    async fn add_details(
        &self,
        key: Option<&ApiKey>,
        alert: &AlertRef,
        payload: &AddDetailsPayload,
    ) -> Result<AcceptedResponse, RemoteError> {
        let url = self.alert_endpoint(alert, "details");
        self.post(url, vec![identifier_type_pair(alert)], payload, key)
            .await
    }
}
