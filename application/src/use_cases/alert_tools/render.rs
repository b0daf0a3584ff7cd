//! Human-readable tool output.

use crate::ports::alert_api::RemoteError;
use chrono::{DateTime, SecondsFormat, Utc};
use opsgenie_mcp_domain::{AcceptedResponse, Alert, AlertLog, AlertNote, Page, ValidationError};

/// What a mutating call accomplished, used as the confirmation headline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    AlertCreated,
    AlertAcknowledged,
    AlertClosed,
    NoteAdded,
    DetailsAdded,
}

impl Mutation {
    pub fn subject(&self) -> &'static str {
        match self {
            Mutation::AlertCreated => "Alert created",
            Mutation::AlertAcknowledged => "Alert acknowledged",
            Mutation::AlertClosed => "Alert closed",
            Mutation::NoteAdded => "Note added",
            Mutation::DetailsAdded => "Details added",
        }
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn listing<T>(
    page: &Page<T>,
    noun: &str,
    empty: &str,
    item: impl Fn(&T) -> String,
) -> String {
    if page.is_empty() {
        return empty.to_string();
    }
    let items: Vec<String> = page.data.iter().map(item).collect();
    format!("Found {} {}:\n\n{}", page.len(), noun, items.join("\n\n"))
}

pub fn render_alerts(page: &Page<Alert>) -> String {
    listing(page, "alerts", "No alerts found.", |alert| {
        format!(
            "• {} ({})\n  Status: {} | Priority: {}\n  Created: {}",
            alert.message,
            alert.id,
            alert.status,
            alert.priority,
            timestamp(&alert.created_at)
        )
    })
}

pub fn render_notes(page: &Page<AlertNote>) -> String {
    listing(page, "notes", "No notes found for this alert.", |note| {
        format!(
            "• {}\n  By: {} at {}",
            note.note,
            note.owner,
            timestamp(&note.created_at)
        )
    })
}

pub fn render_logs(page: &Page<AlertLog>) -> String {
    listing(page, "log entries", "No log entries found for this alert.", |log| {
        format!(
            "• [{}] {}\n  By: {} at {}",
            log.log_type,
            log.log,
            log.owner,
            timestamp(&log.created_at)
        )
    })
}

pub fn render_accepted(mutation: Mutation, response: &AcceptedResponse) -> String {
    format!(
        "{} successfully!\nRequest ID: {}\nResult: {}",
        mutation.subject(),
        response.request_id,
        response.result
    )
}

pub fn render_remote_error(error: &RemoteError) -> String {
    error.to_string()
}

pub fn render_invalid_arguments(tool_name: &str, constraint: &dyn std::fmt::Display) -> String {
    format!("Invalid arguments for {}: {}", tool_name, constraint)
}

pub fn render_validation_error(tool_name: &str, error: &ValidationError) -> String {
    render_invalid_arguments(tool_name, error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(message: &str, id: &str) -> Alert {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "message": message,
            "status": "open",
            "priority": "P2",
            "createdAt": "2024-01-15T10:30:00.123Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_render_alerts() {
        let page = Page::new(vec![alert("CPU high", "a-1"), alert("Disk full", "a-2")]);
        let text = render_alerts(&page);
        assert_eq!(
            text,
            "Found 2 alerts:\n\n\
             • CPU high (a-1)\n  Status: open | Priority: P2\n  Created: 2024-01-15T10:30:00.123Z\n\n\
             • Disk full (a-2)\n  Status: open | Priority: P2\n  Created: 2024-01-15T10:30:00.123Z"
        );
    }

    #[test]
    fn test_empty_listings_say_none_found() {
        assert_eq!(render_alerts(&Page::new(vec![])), "No alerts found.");
        assert_eq!(render_notes(&Page::new(vec![])), "No notes found for this alert.");
        assert_eq!(render_logs(&Page::new(vec![])), "No log entries found for this alert.");
    }

    #[test]
    fn test_render_notes_and_logs() {
        let note: AlertNote = serde_json::from_value(serde_json::json!({
            "note": "Rebooted db-1",
            "owner": "alice@example.com",
            "createdAt": "2024-01-15T10:30:00Z"
        }))
        .unwrap();
        assert_eq!(
            render_notes(&Page::new(vec![note])),
            "Found 1 notes:\n\n• Rebooted db-1\n  By: alice@example.com at 2024-01-15T10:30:00.000Z"
        );

        let log: AlertLog = serde_json::from_value(serde_json::json!({
            "log": "Alert acknowledged via web",
            "type": "system",
            "owner": "bob@example.com",
            "createdAt": "2024-01-15T10:31:00.500Z"
        }))
        .unwrap();
        assert!(render_logs(&Page::new(vec![log])).contains("• [system] Alert acknowledged via web"));
    }

    #[test]
    fn test_render_accepted() {
        let response = AcceptedResponse {
            result: "Request will be processed".to_string(),
            took: 0.1,
            request_id: "req-1".to_string(),
        };
        assert_eq!(
            render_accepted(Mutation::NoteAdded, &response),
            "Note added successfully!\nRequest ID: req-1\nResult: Request will be processed"
        );
    }

    #[test]
    fn test_render_errors() {
        assert_eq!(
            render_remote_error(&RemoteError::new(401, "Could not authenticate")),
            "Opsgenie API Error (401): Could not authenticate"
        );
        let err = ValidationError::MissingParameter {
            param: "message".to_string(),
        };
        assert_eq!(
            render_validation_error("opsgenie_create_alert", &err),
            "Invalid arguments for opsgenie_create_alert: missing required parameter 'message'"
        );
    }
}
