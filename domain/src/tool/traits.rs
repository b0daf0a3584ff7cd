//! Tool domain traits
//!
//! Contains pure domain logic for checking tool arguments against their
//! declared shape. The async ToolExecutorPort is defined in the application
//! layer (ports).

use super::entities::{ParamType, ToolCall, ToolDefinition, ToolParameter};
use serde_json::Value;
use thiserror::Error;

/// A tool argument that failed its declared constraint.
///
/// `param` is the argument path, e.g. `limit` or `responders[0].type`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required parameter '{param}'")]
    MissingParameter { param: String },

    #[error("parameter '{param}' must be of type {expected}")]
    InvalidType { param: String, expected: &'static str },

    #[error("parameter '{param}' must be one of [{allowed}], got '{value}'")]
    NotAllowed {
        param: String,
        value: String,
        allowed: String,
    },

    #[error("parameter '{param}' must be >= {minimum}, got {value}")]
    BelowMinimum {
        param: String,
        minimum: i64,
        value: f64,
    },

    #[error("parameter '{param}' must be <= {maximum}, got {value}")]
    AboveMaximum {
        param: String,
        maximum: i64,
        value: f64,
    },
}

impl ValidationError {
    /// Path of the offending argument
    pub fn param(&self) -> &str {
        match self {
            ValidationError::MissingParameter { param }
            | ValidationError::InvalidType { param, .. }
            | ValidationError::NotAllowed { param, .. }
            | ValidationError::BelowMinimum { param, .. }
            | ValidationError::AboveMaximum { param, .. } => param,
        }
    }
}

/// Validator for tool calls
///
/// This is a pure domain trait that validates tool calls
/// against their definitions without any I/O operations.
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition)
    -> Result<(), ValidationError>;
}

/// Default implementation of ToolValidator.
///
/// Checks presence of required arguments, then checks each declared value's
/// JSON type, allowed value set and numeric bounds, descending into arrays
/// and nested objects. Undeclared argument names are ignored. A `null`
/// argument counts as absent.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator {
    credential_supplied: bool,
}

impl DefaultToolValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waive the required check on credential parameters when the transport
    /// already provides a key.
    pub fn with_credential_supplied(mut self, supplied: bool) -> Self {
        self.credential_supplied = supplied;
        self
    }

    fn is_required(&self, param: &ToolParameter) -> bool {
        param.required && !(param.credential && self.credential_supplied)
    }

    fn check_fields(
        &self,
        prefix: &str,
        params: &[ToolParameter],
        mut fields: Vec<(&String, &Value)>,
    ) -> Result<(), ValidationError> {
        for param in params {
            let present = fields
                .iter()
                .any(|(name, value)| *name == &param.name && !value.is_null());
            if !present && self.is_required(param) {
                return Err(ValidationError::MissingParameter {
                    param: join_path(prefix, &param.name),
                });
            }
        }

        // Sorted so the reported argument is stable across runs
        fields.sort_by(|a, b| a.0.cmp(b.0));

        for (name, value) in fields {
            let Some(param) = params.iter().find(|p| &p.name == name) else {
                continue;
            };
            if value.is_null() {
                continue;
            }
            self.check_value(&join_path(prefix, name), param, &param.param_type, value)?;
        }

        Ok(())
    }

    fn check_value(
        &self,
        path: &str,
        param: &ToolParameter,
        param_type: &ParamType,
        value: &Value,
    ) -> Result<(), ValidationError> {
        let invalid_type = || ValidationError::InvalidType {
            param: path.to_string(),
            expected: param_type.json_type(),
        };

        match param_type {
            ParamType::String => {
                let s = value.as_str().ok_or_else(invalid_type)?;
                if !param.allowed_values.is_empty() && !param.allowed_values.iter().any(|v| v == s)
                {
                    return Err(ValidationError::NotAllowed {
                        param: path.to_string(),
                        value: s.to_string(),
                        allowed: param.allowed_values.join(", "),
                    });
                }
            }
            ParamType::Integer => {
                // `20.0` is the same JSON number as `20`
                let n = value
                    .as_f64()
                    .filter(|n| value.is_i64() || value.is_u64() || n.fract() == 0.0)
                    .ok_or_else(invalid_type)?;
                check_bounds(path, param, n)?;
            }
            ParamType::Number => {
                let n = value.as_f64().ok_or_else(invalid_type)?;
                check_bounds(path, param, n)?;
            }
            ParamType::Boolean => {
                value.as_bool().ok_or_else(invalid_type)?;
            }
            ParamType::Array(item_type) => {
                let items = value.as_array().ok_or_else(invalid_type)?;
                for (i, item) in items.iter().enumerate() {
                    self.check_value(&format!("{}[{}]", path, i), param, item_type, item)?;
                }
            }
            ParamType::StringMap => {
                let map = value.as_object().ok_or_else(invalid_type)?;
                for (key, entry) in map {
                    if !entry.is_string() {
                        return Err(ValidationError::InvalidType {
                            param: join_path(path, key),
                            expected: "string",
                        });
                    }
                }
            }
            ParamType::Object(fields) => {
                let map = value.as_object().ok_or_else(invalid_type)?;
                self.check_fields(path, fields, map.iter().collect())?;
            }
        }

        Ok(())
    }
}

impl ToolValidator for DefaultToolValidator {
    fn validate(
        &self,
        call: &ToolCall,
        definition: &ToolDefinition,
    ) -> Result<(), ValidationError> {
        self.check_fields("", &definition.parameters, call.arguments.iter().collect())
    }
}

fn check_bounds(path: &str, param: &ToolParameter, n: f64) -> Result<(), ValidationError> {
    if let Some(minimum) = param.minimum
        && n < minimum as f64
    {
        return Err(ValidationError::BelowMinimum {
            param: path.to_string(),
            minimum,
            value: n,
        });
    }
    if let Some(maximum) = param.maximum
        && n > maximum as f64
    {
        return Err(ValidationError::AboveMaximum {
            param: path.to_string(),
            maximum,
            value: n,
        });
    }
    Ok(())
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
