//! Alert domain entities

use super::value_objects::{
    PageDirection, Priority, RecipientType, SearchIdentifierType, SortOrder,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A responder or visibility target of an alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    #[serde(rename = "type")]
    pub recipient_type: RecipientType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Integration that created an alert
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Integration {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub integration_type: String,
}

/// Acknowledge/close statistics of an alert
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertReport {
    pub ack_time: Option<u64>,
    pub close_time: Option<u64>,
    pub acknowledged_by: Option<String>,
    pub closed_by: Option<String>,
}

/// An alert as returned by `GET /v2/alerts`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    #[serde(default)]
    pub tiny_id: String,
    pub alias: Option<String>,
    pub message: String,
    /// `open`, `acked` or `closed`
    pub status: String,
    #[serde(default)]
    pub acknowledged: bool,
    #[serde(default)]
    pub is_seen: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub snoozed: bool,
    pub snoozed_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub count: u64,
    pub last_occurred_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub source: Option<String>,
    pub owner: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub responders: Vec<Recipient>,
    pub integration: Option<Integration>,
    pub report: Option<AlertReport>,
    #[serde(default)]
    pub actions: Vec<String>,
    pub entity: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

/// A note attached to an alert
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertNote {
    pub note: String,
    #[serde(default)]
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

/// An activity log entry of an alert
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertLog {
    pub log: String,
    #[serde(rename = "type", default)]
    pub log_type: String,
    #[serde(default)]
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

/// Paging cursors returned alongside list results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paging {
    pub next: Option<String>,
    pub prev: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
}

/// A page of list results (`{"data": [...], "paging": {...}}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self { data, paging: None }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

/// The asynchronous acknowledgment Opsgenie returns for mutating calls.
///
/// `request_id` correlates with the request status endpoint; the mutation
/// itself is applied later by Opsgenie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedResponse {
    pub result: String,
    #[serde(default)]
    pub took: f64,
    pub request_id: String,
}

// ==================== Request shapes ====================

/// Common fields of every alert action (acknowledge, close, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertActionPayload {
    /// Display name of the request owner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Body of `POST /v2/alerts`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertPayload {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responders: Option<Vec<Recipient>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_to: Option<Vec<Recipient>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(flatten)]
    pub action: AlertActionPayload,
}

/// Body of `POST /v2/alerts/{id}/notes`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddNotePayload {
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Body of `POST /v2/alerts/{id}/details`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddDetailsPayload {
    pub details: BTreeMap<String, String>,
    #[serde(flatten)]
    pub action: AlertActionPayload,
}

/// Query parameters of `GET /v2/alerts`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAlertsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_identifier_type: Option<SearchIdentifierType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

/// Query parameters of the alert notes and logs listings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListEntriesParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<PageDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_page_deserializes_api_shape() {
        let json = serde_json::json!({
            "data": [{
                "id": "70413a06-38d6-4c85-92b8-5ebc900d42e2",
                "tinyId": "1791",
                "alias": "event_573",
                "message": "Our servers are in danger",
                "status": "closed",
                "acknowledged": false,
                "isSeen": true,
                "tags": ["OverwriteQuietHours", "Critical"],
                "snoozed": true,
                "snoozedUntil": "2017-04-03T20:32:35.143Z",
                "count": 79,
                "lastOccurredAt": "2017-04-03T20:05:50.894Z",
                "createdAt": "2017-03-21T20:32:52.353Z",
                "updatedAt": "2017-04-03T20:32:57.301Z",
                "source": "Isengard",
                "owner": "morpheus@opsgenie.com",
                "priority": "P5",
                "responders": [{"type": "team", "id": "8418d193-2dab-4490-b331-8c02cdd196b7"}],
                "integration": {"id": "4513b7ea", "name": "Security", "type": "API"},
                "report": {"ackTime": 15702, "closeTime": 60503, "acknowledgedBy": "agent"}
            }],
            "paging": {"next": "https://api.opsgenie.com/v2/alerts?offset=20", "first": "https://api.opsgenie.com/v2/alerts?offset=0"}
        });

        let page: Page<Alert> = serde_json::from_value(json).unwrap();
        assert_eq!(page.len(), 1);
        let alert = &page.data[0];
        assert_eq!(alert.tiny_id, "1791");
        assert_eq!(alert.priority, Priority::P5);
        assert_eq!(alert.responders[0].recipient_type, RecipientType::Team);
        assert_eq!(alert.report.as_ref().unwrap().ack_time, Some(15702));
        assert!(page.paging.unwrap().next.is_some());
    }

    #[test]
    fn page_without_paging_defaults_to_none() {
        let page: Page<AlertNote> = serde_json::from_value(serde_json::json!({"data": []})).unwrap();
        assert!(page.is_empty());
        assert!(page.paging.is_none());
    }

    #[test]
    fn accepted_response_uses_camel_case() {
        let accepted: AcceptedResponse = serde_json::from_value(serde_json::json!({
            "result": "Request will be processed",
            "took": 0.302,
            "requestId": "43a29c5c-3dbf-4fa4-9c26-f4f71023e120"
        }))
        .unwrap();
        assert_eq!(accepted.request_id, "43a29c5c-3dbf-4fa4-9c26-f4f71023e120");
    }

    #[test]
    fn create_payload_flattens_action_fields_and_omits_unset() {
        let payload = CreateAlertPayload {
            message: "disk full".to_string(),
            visible_to: Some(vec![Recipient {
                recipient_type: RecipientType::User,
                id: None,
                name: Some("ops".to_string()),
            }]),
            priority: Some(Priority::P1),
            action: AlertActionPayload {
                user: Some("bot".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["message"], "disk full");
        assert_eq!(json["visibleTo"][0]["type"], "user");
        assert_eq!(json["priority"], "P1");
        assert_eq!(json["user"], "bot");
        assert!(json.get("alias").is_none());
        assert!(json.get("note").is_none());
    }
}
