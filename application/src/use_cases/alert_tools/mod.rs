//! Alert tools use case.
//!
//! Executes one alert tool call end to end:
//!
//! 1. Look up the [`ToolDefinition`] by name
//! 2. Validate the arguments (nothing is sent on failure)
//! 3. Resolve the credential for this call from the [`CredentialScope`]
//! 4. Issue the Opsgenie call through [`AlertApiPort`]
//! 5. Render the page or acknowledgment, or the error, as tool text
//!
//! Every outcome is a [`ToolResult`]; no error escapes as a fault.

pub mod definitions;
pub mod render;

use crate::ports::alert_api::{AlertApiPort, AlertRef, RemoteError};
use crate::ports::tool_executor::ToolExecutorPort;
use async_trait::async_trait;
use definitions::{API_KEY_PARAM, AlertTool, alert_tool_spec};
use opsgenie_mcp_domain::tool::value_objects::ToolResultMetadata;
use opsgenie_mcp_domain::{
    AddDetailsPayload, AddNotePayload, AlertActionPayload, ApiKey, CreateAlertPayload,
    CredentialScope, DefaultToolValidator, IdentifierType, ListAlertsParams, ListEntriesParams,
    ToolCall, ToolError, ToolResult, ToolSpec, ToolValidator,
};
use render::Mutation;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a validated call did not produce a rendered success
#[derive(Error, Debug)]
enum CallError {
    #[error("{0}")]
    Arguments(#[from] serde_json::Error),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Rendered success of a single call
struct Rendered {
    text: String,
    metadata: ToolResultMetadata,
}

impl Rendered {
    fn listing(text: String, item_count: usize) -> Self {
        Self {
            text,
            metadata: ToolResultMetadata {
                item_count: Some(item_count),
                ..Default::default()
            },
        }
    }

    fn accepted(mutation: Mutation, response: &opsgenie_mcp_domain::AcceptedResponse) -> Self {
        Self {
            text: render::render_accepted(mutation, response),
            metadata: ToolResultMetadata {
                request_id: Some(response.request_id.clone()),
                ..Default::default()
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlertTarget {
    identifier: String,
    #[serde(default)]
    identifier_type: IdentifierType,
}

impl From<AlertTarget> for AlertRef {
    fn from(target: AlertTarget) -> Self {
        AlertRef::new(target.identifier, target.identifier_type)
    }
}

/// Arguments of an alert-scoped tool: the target plus an operation payload
#[derive(Deserialize)]
struct TargetedArgs<T> {
    #[serde(flatten)]
    target: AlertTarget,
    #[serde(flatten)]
    payload: T,
}

impl<T: DeserializeOwned> TargetedArgs<T> {
    fn decode(call: &ToolCall) -> Result<(AlertRef, T), serde_json::Error> {
        let args: Self = call.decode()?;
        Ok((args.target.into(), args.payload))
    }
}

/// Executor for the Opsgenie alert tools
pub struct AlertToolExecutor {
    api: Arc<dyn AlertApiPort>,
    spec: ToolSpec,
}

impl AlertToolExecutor {
    pub fn new(api: Arc<dyn AlertApiPort>) -> Self {
        Self {
            api,
            spec: alert_tool_spec(),
        }
    }

    async fn dispatch(
        &self,
        tool: AlertTool,
        call: &ToolCall,
        key: Option<&ApiKey>,
    ) -> Result<Rendered, CallError> {
        let api = self.api.as_ref();
        let rendered = match tool {
            AlertTool::ListAlerts => {
                let params: ListAlertsParams = call.decode()?;
                let page = api.list_alerts(key, &params).await?;
                Rendered::listing(render::render_alerts(&page), page.len())
            }
            AlertTool::CreateAlert => {
                let payload: CreateAlertPayload = call.decode()?;
                let response = api.create_alert(key, &payload).await?;
                Rendered::accepted(Mutation::AlertCreated, &response)
            }
            AlertTool::AcknowledgeAlert => {
                let (alert, payload) = TargetedArgs::<AlertActionPayload>::decode(call)?;
                let response = api.acknowledge_alert(key, &alert, &payload).await?;
                Rendered::accepted(Mutation::AlertAcknowledged, &response)
            }
            AlertTool::CloseAlert => {
                let (alert, payload) = TargetedArgs::<AlertActionPayload>::decode(call)?;
                let response = api.close_alert(key, &alert, &payload).await?;
                Rendered::accepted(Mutation::AlertClosed, &response)
            }
            AlertTool::ListAlertNotes => {
                let (alert, params) = TargetedArgs::<ListEntriesParams>::decode(call)?;
                let page = api.list_alert_notes(key, &alert, &params).await?;
                Rendered::listing(render::render_notes(&page), page.len())
            }
            AlertTool::AddNote => {
                let (alert, payload) = TargetedArgs::<AddNotePayload>::decode(call)?;
                let response = api.add_note(key, &alert, &payload).await?;
                Rendered::accepted(Mutation::NoteAdded, &response)
            }
            AlertTool::ListAlertLogs => {
                let (alert, params) = TargetedArgs::<ListEntriesParams>::decode(call)?;
                let page = api.list_alert_logs(key, &alert, &params).await?;
                Rendered::listing(render::render_logs(&page), page.len())
            }
            AlertTool::AddDetails => {
                let (alert, payload) = TargetedArgs::<AddDetailsPayload>::decode(call)?;
                let response = api.add_details(key, &alert, &payload).await?;
                Rendered::accepted(Mutation::DetailsAdded, &response)
            }
        };
        Ok(rendered)
    }
}

#[async_trait]
impl ToolExecutorPort for AlertToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall, scope: &CredentialScope) -> ToolResult {
        let start = Instant::now();
        let tool_name = call.tool_name.as_str();

        let (Some(definition), Some(tool)) = (self.spec.get(tool_name), AlertTool::from_name(tool_name))
        else {
            warn!("Unknown tool requested: {}", tool_name);
            return ToolResult::failure(tool_name, ToolError::not_found(tool_name));
        };

        let validator =
            DefaultToolValidator::new().with_credential_supplied(scope.supplies_credential());
        if let Err(e) = validator.validate(call, definition) {
            warn!(tool = tool_name, param = e.param(), "Rejected tool arguments: {}", e);
            return ToolResult::failure(
                tool_name,
                ToolError::invalid_argument(render::render_validation_error(tool_name, &e)),
            )
            .with_duration(start.elapsed().as_millis() as u64);
        }

        let credential = scope.resolve(call.get_string(API_KEY_PARAM));
        match &credential {
            Some(resolved) => debug!(tool = tool_name, source = %resolved.source, "Resolved Opsgenie credential"),
            None => debug!(tool = tool_name, "No credential resolved, calling Opsgenie without one"),
        }

        info!("Executing tool: {}", tool_name);
        let outcome = self
            .dispatch(tool, call, credential.as_ref().map(|c| &c.key))
            .await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(rendered) => {
                debug!(tool = tool_name, duration_ms, "Tool succeeded");
                ToolResult::success(tool_name, rendered.text)
                    .with_metadata(rendered.metadata)
                    .with_duration(duration_ms)
            }
            Err(CallError::Remote(e)) => {
                warn!(tool = tool_name, status = e.status, "Opsgenie call failed: {}", e.message);
                ToolResult::failure(tool_name, ToolError::remote(render::render_remote_error(&e)))
                    .with_metadata(ToolResultMetadata {
                        status: Some(e.status),
                        ..Default::default()
                    })
                    .with_duration(duration_ms)
            }
            Err(CallError::Arguments(e)) => {
                warn!(tool = tool_name, "Could not decode tool arguments: {}", e);
                ToolResult::failure(
                    tool_name,
                    ToolError::invalid_argument(render::render_invalid_arguments(tool_name, &e)),
                )
                .with_duration(duration_ms)
            }
        }
    }
}
