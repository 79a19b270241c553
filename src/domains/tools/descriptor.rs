//! Tool descriptors - the declared, data-only shape of a tool.
//!
//! A descriptor carries the name, description, ordered parameter list and
//! return type of a tool. It is rendered to an MCP [`Tool`] for discovery
//! and used by the registry to validate incoming arguments before the
//! implementation is called.

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::ToolError;

/// Key under which a tool's return value is wrapped in structured output.
pub const RESULT_KEY: &str = "result";

/// JSON value types a parameter or return value may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Number,
    Integer,
    Boolean,
}

impl ValueType {
    /// JSON Schema type name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }

    /// Check whether a JSON value conforms to this type.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Reject strings that are empty or only whitespace.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub non_blank: bool,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, ty: ValueType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty,
            description: Some(description.into()),
            non_blank: false,
        }
    }

    /// Require at least one non-whitespace character.
    pub fn non_blank(mut self) -> Self {
        self.non_blank = true;
        self
    }
}

/// Immutable description of a registered tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
    pub returns: ValueType,
}

impl ToolDescriptor {
    /// Start a descriptor with no parameters returning `returns`.
    pub fn new(name: impl Into<String>, description: impl Into<String>, returns: ValueType) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            returns,
        }
    }

    /// Append a parameter. Order is preserved in the rendered schema.
    pub fn param(
        self,
        name: impl Into<String>,
        ty: ValueType,
        description: impl Into<String>,
    ) -> Self {
        self.with_param(ParameterSpec::new(name, ty, description))
    }

    /// Append a fully specified parameter.
    pub fn with_param(mut self, param: ParameterSpec) -> Self {
        self.parameters.push(param);
        self
    }

    /// JSON Schema for the tool's arguments.
    ///
    /// Every declared parameter is required and no other property is allowed.
    pub fn input_schema(&self) -> JsonObject {
        let mut properties = Map::new();
        for param in &self.parameters {
            let mut property = Map::new();
            property.insert("type".into(), json!(param.ty.as_str()));
            if let Some(description) = &param.description {
                property.insert("description".into(), json!(description));
            }
            if param.non_blank {
                property.insert("minLength".into(), json!(1));
                property.insert("pattern".into(), json!(r"\S"));
            }
            properties.insert(param.name.clone(), Value::Object(property));
        }

        let required: Vec<&str> = self.parameters.iter().map(|p| p.name.as_str()).collect();

        let mut schema = Map::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(properties));
        schema.insert("required".into(), json!(required));
        schema.insert("additionalProperties".into(), json!(false));
        schema
    }

    /// JSON Schema for the structured output (`{ "result": <returns> }`).
    pub fn output_schema(&self) -> JsonObject {
        let mut schema = Map::new();
        schema.insert("type".into(), json!("object"));
        schema.insert(
            "properties".into(),
            json!({ RESULT_KEY: { "type": self.returns.as_str() } }),
        );
        schema.insert("required".into(), json!([RESULT_KEY]));
        schema
    }

    /// Create a Tool model for this descriptor (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.clone().into(),
            description: Some(self.description.clone().into()),
            input_schema: Arc::new(self.input_schema()),
            annotations: None,
            output_schema: Some(Arc::new(self.output_schema())),
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Validate call arguments against the declared parameters.
    ///
    /// Missing arguments are treated as an empty object. Fails on missing
    /// parameters, unexpected parameters, and type mismatches.
    pub fn validate_arguments(&self, arguments: Option<&JsonObject>) -> Result<(), ToolError> {
        let empty = Map::new();
        let arguments = arguments.unwrap_or(&empty);

        for param in &self.parameters {
            match arguments.get(&param.name) {
                None => {
                    return Err(ToolError::invalid_arguments(format!(
                        "missing required parameter '{}'",
                        param.name
                    )));
                }
                Some(value) if !param.ty.matches(value) => {
                    return Err(ToolError::invalid_arguments(format!(
                        "parameter '{}' must be of type {}",
                        param.name,
                        param.ty.as_str()
                    )));
                }
                Some(Value::String(text)) if param.non_blank && text.trim().is_empty() => {
                    return Err(ToolError::invalid_arguments(format!(
                        "parameter '{}' must not be blank",
                        param.name
                    )));
                }
                Some(_) => {}
            }
        }

        if let Some(unexpected) = arguments
            .keys()
            .find(|key| !self.parameters.iter().any(|p| &p.name == *key))
        {
            return Err(ToolError::invalid_arguments(format!(
                "unexpected parameter '{}'",
                unexpected
            )));
        }

        Ok(())
    }
}
