//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] that produces the MCP tool
//! descriptor advertised by `tools/list`.

use opsgenie_mcp_application::ports::tool_schema::ToolSchemaPort;
use opsgenie_mcp_domain::{ParamType, ToolDefinition, ToolParameter};
use serde_json::{Map, Value, json};

/// Default implementation producing MCP tool descriptors.
///
/// Handles param_type → JSON Schema mapping:
/// - scalar types → `"string"`, `"integer"`, `"number"`, `"boolean"`
/// - `Array(item)` → `"array"` with `items`
/// - `StringMap` → `"object"` with string `additionalProperties`
/// - `Object(fields)` → nested `"object"` with its own `properties` / `required`
///
/// The risk level becomes the `readOnlyHint` annotation.
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        json!({
            "name": tool.name,
            "description": tool.description,
            "inputSchema": object_schema(&tool.parameters),
            "annotations": {
                "readOnlyHint": tool.is_read_only(),
            }
        })
    }
}

fn object_schema(params: &[ToolParameter]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in params {
        let mut prop = type_schema(&param.param_type);
        prop.insert("description".to_string(), json!(param.description));
        if !param.allowed_values.is_empty() {
            prop.insert("enum".to_string(), json!(param.allowed_values));
        }
        if let Some(minimum) = param.minimum {
            prop.insert("minimum".to_string(), json!(minimum));
        }
        if let Some(maximum) = param.maximum {
            prop.insert("maximum".to_string(), json!(maximum));
        }
        properties.insert(param.name.clone(), Value::Object(prop));

        if param.required {
            required.push(json!(param.name));
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn type_schema(param_type: &ParamType) -> Map<String, Value> {
    match param_type {
        ParamType::Array(item) => {
            let mut schema = Map::new();
            schema.insert("type".to_string(), json!("array"));
            schema.insert("items".to_string(), Value::Object(type_schema(item)));
            schema
        }
        ParamType::StringMap => {
            let mut schema = Map::new();
            schema.insert("type".to_string(), json!("object"));
            schema.insert("additionalProperties".to_string(), json!({"type": "string"}));
            schema
        }
        ParamType::Object(fields) => match object_schema(fields) {
            Value::Object(schema) => schema,
            _ => Map::new(),
        },
        scalar => {
            let mut schema = Map::new();
            schema.insert("type".to_string(), json!(scalar.json_type()));
            schema
        }
    }
}
