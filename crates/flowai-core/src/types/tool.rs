//! Tool/function calling types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tool definition as exposed to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tool name (unique key within a catalog)
    pub name: String,
    /// Description of what the tool does
    #[serde(default)]
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "parameterSchema")]
    pub parameter_schema: Value,
}

impl ToolDescriptor {
    /// Create a new tool definition with an empty object schema
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameter_schema: serde_json::json!({ "type": "object", "properties": {} }),
        }
    }

    /// Set the parameter schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.parameter_schema = schema;
        self
    }

    /// Normalized catalog entry in the `{type: "function", function: {...}}` shape
    pub fn to_function_tool(&self) -> FunctionTool {
        FunctionTool {
            kind: "function".to_string(),
            function: FunctionSpec {
                name: self.name.clone(),
                description: self.description.clone(),
                parameters: self.parameter_schema.clone(),
            },
        }
    }
}

/// Normalized tool catalog entry sent to function-calling models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTool {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A tool invocation extracted from a model reply
///
/// Immutable once decoded; tool results refer back to it by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    /// Identifier, unique within one assistant message
    pub id: String,
    /// Name of the tool being called
    pub name: String,
    /// Arguments as JSON object text
    #[serde(rename = "argumentsJson")]
    pub arguments_json: String,
}

impl ToolCallRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments_json: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments_json: arguments_json.into(),
        }
    }

    /// Build a record from already-parsed arguments
    pub fn from_arguments(id: impl Into<String>, name: impl Into<String>, arguments: &Map<String, Value>) -> Self {
        // Serializing a Map<String, Value> cannot fail
        let arguments_json = serde_json::to_string(arguments).unwrap_or_else(|_| "{}".to_string());
        Self::new(id, name, arguments_json)
    }

    /// Parse the arguments text, requiring a JSON object
    pub fn arguments(&self) -> Result<Map<String, Value>, serde_json::Error> {
        serde_json::from_str(&self.arguments_json)
    }

    /// Get an argument as a string
    pub fn get_arg_str(&self, key: &str) -> Option<String> {
        self.arguments()
            .ok()?
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}

/// Result of executing one tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this is responding to
    #[serde(rename = "toolCallId")]
    pub tool_call_id: String,
    /// The tool payload as JSON text
    #[serde(rename = "contentJson")]
    pub content_json: String,
    /// Whether the tool reported success
    pub success: bool,
}

impl ToolResult {
    pub fn new(tool_call_id: impl Into<String>, content_json: impl Into<String>, success: bool) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            content_json: content_json.into(),
            success,
        }
    }

    /// Build a failed result carrying `{status: "error", message}`
    pub fn error(tool_call_id: impl Into<String>, message: impl Into<String>) -> Self {
        let payload = serde_json::json!({
            "status": "error",
            "message": message.into(),
        });
        Self::new(tool_call_id, payload.to_string(), false)
    }

    /// Parse the payload back into JSON
    pub fn payload(&self) -> Option<Value> {
        serde_json::from_str(&self.content_json).ok()
    }
}

/// Whether the model may invoke tools on a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolPolicy {
    /// Let the model decide whether to use tools
    #[default]
    #[serde(rename = "auto")]
    Auto,
    /// Never invoke tools, answer in prose
    #[serde(rename = "none")]
    Disabled,
}

impl ToolPolicy {
    /// Wire value of the `tool_choice` request field
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolPolicy::Auto => "auto",
            ToolPolicy::Disabled => "none",
        }
    }
}
