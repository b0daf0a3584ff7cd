//! Declarations of the eight Opsgenie alert tools.

use opsgenie_mcp_domain::{
    IdentifierType, PageDirection, ParamType, Priority, RecipientType, RiskLevel,
    SearchIdentifierType, SortOrder, ToolDefinition, ToolParameter, ToolSpec,
};

/// Name of the credential argument every tool accepts
pub const API_KEY_PARAM: &str = "apiKey";

/// The tools this server exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertTool {
    ListAlerts,
    CreateAlert,
    AcknowledgeAlert,
    CloseAlert,
    ListAlertNotes,
    AddNote,
    ListAlertLogs,
    AddDetails,
}

impl AlertTool {
    /// All tools in the order they are advertised
    pub const ALL: [AlertTool; 8] = [
        AlertTool::ListAlerts,
        AlertTool::CreateAlert,
        AlertTool::AcknowledgeAlert,
        AlertTool::CloseAlert,
        AlertTool::ListAlertNotes,
        AlertTool::AddNote,
        AlertTool::ListAlertLogs,
        AlertTool::AddDetails,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AlertTool::ListAlerts => "opsgenie_list_alerts",
            AlertTool::CreateAlert => "opsgenie_create_alert",
            AlertTool::AcknowledgeAlert => "opsgenie_acknowledge_alert",
            AlertTool::CloseAlert => "opsgenie_close_alert",
            AlertTool::ListAlertNotes => "opsgenie_list_alert_notes",
            AlertTool::AddNote => "opsgenie_add_note",
            AlertTool::ListAlertLogs => "opsgenie_list_alert_logs",
            AlertTool::AddDetails => "opsgenie_add_details",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    pub fn definition(&self) -> ToolDefinition {
        match self {
            AlertTool::ListAlerts => list_alerts_definition(),
            AlertTool::CreateAlert => create_alert_definition(),
            AlertTool::AcknowledgeAlert => alert_action_definition(
                self.name(),
                "Acknowledge an alert in Opsgenie",
            ),
            AlertTool::CloseAlert => {
                alert_action_definition(self.name(), "Close an alert in Opsgenie")
            }
            AlertTool::ListAlertNotes => {
                alert_entries_definition(self.name(), "List notes for an alert in Opsgenie")
            }
            AlertTool::AddNote => add_note_definition(),
            AlertTool::ListAlertLogs => {
                alert_entries_definition(self.name(), "List logs for an alert in Opsgenie")
            }
            AlertTool::AddDetails => add_details_definition(),
        }
    }
}

impl std::fmt::Display for AlertTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Spec holding every alert tool
pub fn alert_tool_spec() -> ToolSpec {
    AlertTool::ALL
        .iter()
        .fold(ToolSpec::new(), |spec, tool| spec.register(tool.definition()))
}

// -- Shared parameters ---

fn api_key() -> ToolParameter {
    ToolParameter::new(API_KEY_PARAM, "Opsgenie API key", true).as_credential()
}

fn identifier() -> ToolParameter {
    ToolParameter::new("identifier", "Alert identifier (id, tiny id, or alias)", true)
}

fn identifier_type() -> ToolParameter {
    ToolParameter::new("identifierType", "Type of identifier", false)
        .with_allowed_values(&IdentifierType::ALL)
}

fn optional_string(name: &str, description: &str) -> ToolParameter {
    ToolParameter::new(name, description, false)
}

fn user() -> ToolParameter {
    optional_string("user", "Display name of the request owner")
}

fn source() -> ToolParameter {
    optional_string("source", "Source field")
}

fn recipients(name: &str, description: &str) -> ToolParameter {
    let recipient = vec![
        ToolParameter::new("type", "Recipient type", true)
            .with_allowed_values(&RecipientType::ALL),
        optional_string("id", "Recipient id"),
        optional_string("name", "Recipient name"),
    ];
    ToolParameter::new(name, description, false)
        .with_type(ParamType::array_of(ParamType::Object(recipient)))
}

fn string_list(name: &str, description: &str) -> ToolParameter {
    ToolParameter::new(name, description, false).with_type(ParamType::array_of(ParamType::String))
}

fn offset(description: &str) -> ToolParameter {
    ToolParameter::new("offset", description, false)
        .with_type(ParamType::Integer)
        .with_minimum(0)
}

fn order(description: &str) -> ToolParameter {
    ToolParameter::new("order", description, false).with_allowed_values(&SortOrder::ALL)
}

// -- Tool definitions ---

fn list_alerts_definition() -> ToolDefinition {
    ToolDefinition::new(
        AlertTool::ListAlerts.name(),
        "List alerts from Opsgenie",
        RiskLevel::Low,
    )
    .with_parameter(api_key())
    .with_parameter(optional_string(
        "query",
        "Search query to apply while filtering the alerts",
    ))
    .with_parameter(optional_string(
        "searchIdentifier",
        "Identifier of the saved search query",
    ))
    .with_parameter(
        ToolParameter::new(
            "searchIdentifierType",
            "Identifier type of the saved search query",
            false,
        )
        .with_allowed_values(&SearchIdentifierType::ALL),
    )
    .with_parameter(offset("Start index of the result set (for pagination)"))
    .with_parameter(
        ToolParameter::new(
            "limit",
            "Maximum number of items to provide in the result",
            false,
        )
        .with_type(ParamType::Integer)
        .with_minimum(1)
        .with_maximum(100),
    )
    .with_parameter(optional_string(
        "sort",
        "Name of the field that result set will be sorted by",
    ))
    .with_parameter(order("Sorting order of the result set"))
}

fn create_alert_definition() -> ToolDefinition {
    ToolDefinition::new(
        AlertTool::CreateAlert.name(),
        "Create a new alert in Opsgenie",
        RiskLevel::High,
    )
    .with_parameter(api_key())
    .with_parameter(ToolParameter::new("message", "Message of the alert", true))
    .with_parameter(optional_string(
        "alias",
        "Client-defined identifier of the alert",
    ))
    .with_parameter(optional_string(
        "description",
        "Description field of the alert",
    ))
    .with_parameter(recipients(
        "responders",
        "Responders that the alert will be routed to",
    ))
    .with_parameter(recipients(
        "visibleTo",
        "Teams and users that the alert will become visible to",
    ))
    .with_parameter(string_list(
        "actions",
        "Custom actions that will be available for the alert",
    ))
    .with_parameter(string_list("tags", "Tags of the alert"))
    .with_parameter(
        ToolParameter::new(
            "details",
            "Map of key-value pairs to use as custom properties",
            false,
        )
        .with_type(ParamType::StringMap),
    )
    .with_parameter(optional_string("entity", "Entity field of the alert"))
    .with_parameter(
        ToolParameter::new("priority", "Priority level of the alert", false)
            .with_allowed_values(&Priority::ALL),
    )
    .with_parameter(user())
    .with_parameter(optional_string(
        "note",
        "Additional note that will be added while creating the alert",
    ))
    .with_parameter(optional_string("source", "Source field of the alert"))
}

/// Acknowledge and close share one argument shape
fn alert_action_definition(name: &str, description: &str) -> ToolDefinition {
    ToolDefinition::new(name, description, RiskLevel::High)
        .with_parameter(api_key())
        .with_parameter(identifier())
        .with_parameter(identifier_type())
        .with_parameter(user())
        .with_parameter(optional_string("note", "Additional note"))
        .with_parameter(source())
}

/// Note and log listings share one argument shape
fn alert_entries_definition(name: &str, description: &str) -> ToolDefinition {
    ToolDefinition::new(name, description, RiskLevel::Low)
        .with_parameter(api_key())
        .with_parameter(identifier())
        .with_parameter(identifier_type())
        .with_parameter(offset("Start index of the result set"))
        .with_parameter(
            ToolParameter::new("direction", "Page direction", false)
                .with_allowed_values(&PageDirection::ALL),
        )
        .with_parameter(
            ToolParameter::new("limit", "Maximum number of items to provide", false)
                .with_type(ParamType::Integer)
                .with_minimum(1),
        )
        .with_parameter(order("Sorting order"))
}

fn add_note_definition() -> ToolDefinition {
    ToolDefinition::new(
        AlertTool::AddNote.name(),
        "Add a note to an alert in Opsgenie",
        RiskLevel::High,
    )
    .with_parameter(api_key())
    .with_parameter(identifier())
    .with_parameter(identifier_type())
    .with_parameter(ToolParameter::new("note", "Note to add to the alert", true))
    .with_parameter(user())
    .with_parameter(source())
}

fn add_details_definition() -> ToolDefinition {
    ToolDefinition::new(
        AlertTool::AddDetails.name(),
        "Add custom details to an alert in Opsgenie",
        RiskLevel::High,
    )
    .with_parameter(api_key())
    .with_parameter(identifier())
    .with_parameter(identifier_type())
    .with_parameter(
        ToolParameter::new(
            "details",
            "Key-value pairs to add as custom properties",
            true,
        )
        .with_type(ParamType::StringMap),
    )
    .with_parameter(user())
    .with_parameter(optional_string("note", "Additional note"))
    .with_parameter(source())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_contains_every_tool_in_order() {
        let spec = alert_tool_spec();
        let names: Vec<&str> = spec.names().collect();
        assert_eq!(
            names,
            vec![
                "opsgenie_list_alerts",
                "opsgenie_create_alert",
                "opsgenie_acknowledge_alert",
                "opsgenie_close_alert",
                "opsgenie_list_alert_notes",
                "opsgenie_add_note",
                "opsgenie_list_alert_logs",
                "opsgenie_add_details",
            ]
        );
    }

    #[test]
    fn test_every_tool_requires_api_key() {
        for tool in alert_tool_spec().all() {
            let key = tool.parameter(API_KEY_PARAM).unwrap();
            assert!(key.required, "{} must require apiKey", tool.name);
            assert!(key.credential);
        }
    }

    #[test]
    fn test_name_round_trip() {
        for tool in AlertTool::ALL {
            assert_eq!(AlertTool::from_name(tool.name()), Some(tool));
        }
        assert!(AlertTool::from_name("opsgenie_delete_alert").is_none());
    }

    #[test]
    fn test_risk_levels() {
        let spec = alert_tool_spec();
        let read_only: Vec<&str> = spec.read_only_tools().map(|t| t.name.as_str()).collect();
        assert_eq!(
            read_only,
            vec![
                "opsgenie_list_alerts",
                "opsgenie_list_alert_notes",
                "opsgenie_list_alert_logs"
            ]
        );
    }

    #[test]
    fn test_limit_bounds() {
        let list = AlertTool::ListAlerts.definition();
        let limit = list.parameter("limit").unwrap();
        assert_eq!((limit.minimum, limit.maximum), (Some(1), Some(100)));

        let notes = AlertTool::ListAlertNotes.definition();
        let limit = notes.parameter("limit").unwrap();
        assert_eq!((limit.minimum, limit.maximum), (Some(1), None));
    }

    #[test]
    fn test_required_fields() {
        let required = |tool: AlertTool| -> Vec<String> {
            tool.definition()
                .parameters
                .into_iter()
                .filter(|p| p.required)
                .map(|p| p.name)
                .collect()
        };
        assert_eq!(required(AlertTool::CreateAlert), vec!["apiKey", "message"]);
        assert_eq!(required(AlertTool::AddNote), vec!["apiKey", "identifier", "note"]);
        assert_eq!(
            required(AlertTool::AddDetails),
            vec!["apiKey", "identifier", "details"]
        );
        assert_eq!(required(AlertTool::CloseAlert), vec!["apiKey", "identifier"]);
    }
}
