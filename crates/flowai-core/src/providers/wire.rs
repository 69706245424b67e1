//! Mapping between flowai types and endpoint JSON
//!
//! The OpenAI chat-completions shape is shared by the OpenAI-compatible and
//! LM Studio adapters; Ollama only needs the flattened prompt.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::decode::markers;
use crate::types::{FunctionTool, Message, MessageRole, ToolCallRecord, ToolDescriptor, Transcript};

use super::error::{ProviderError, ProviderResult};

// ============================================================================
// Request types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub(crate) struct WireFunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct WireToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: WireFunctionCall,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct WireMessage {
    pub role: &'static str,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub messages: Vec<WireMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<FunctionTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'static str>,
}

fn role_str(role: MessageRole) -> &'static str {
    match role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
        MessageRole::Tool => "tool",
    }
}

/// Convert a message to the chat-completions shape
pub(crate) fn to_wire_message(msg: &Message) -> WireMessage {
    let tool_calls = msg.tool_calls().map(|calls| {
        calls
            .iter()
            .map(|call| WireToolCall {
                id: call.id.clone(),
                kind: "function",
                function: WireFunctionCall {
                    name: call.name.clone(),
                    arguments: call.arguments_json.clone(),
                },
            })
            .collect()
    });

    WireMessage {
        role: role_str(msg.role()),
        content: msg.content().to_string(),
        tool_calls,
        tool_call_id: msg.tool_call_id().map(str::to_string),
    }
}

/// Convert a transcript, optionally preceded by a synthetic system message
pub(crate) fn to_wire_messages(transcript: &Transcript, preamble: Option<String>) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(transcript.len() + 1);
    if let Some(system) = preamble {
        messages.push(WireMessage {
            role: "system",
            content: system,
            tool_calls: None,
            tool_call_id: None,
        });
    }
    messages.extend(transcript.iter().map(to_wire_message));
    messages
}

// ============================================================================
// Synthetic tool prompt
// ============================================================================

/// System message describing `tools` for models without native tool calling
pub(crate) fn tool_prompt(tools: &[ToolDescriptor]) -> String {
    let descriptions = tools
        .iter()
        .map(|tool| {
            let params = serde_json::to_string_pretty(&tool.parameter_schema)
                .unwrap_or_else(|_| tool.parameter_schema.to_string());
            format!("- {}: {}\n  Parameters: {}", tool.name, tool.description, params)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You have access to the following tools:\n{}\n\nIMPORTANT: You must use the appropriate tool to answer questions. \
         Do not provide information from your training data. When you need to use a tool, respond ONLY with: {}",
        descriptions,
        markers::render_call("{tool_name}", "{json_arguments}"),
    )
}

/// Flatten a transcript into a `Role: content` prompt
pub(crate) fn flatten_prompt(transcript: &Transcript, preamble: Option<String>) -> String {
    let mut prompt = String::new();
    if let Some(system) = preamble {
        prompt.push_str(&format!("System: {}\n", system));
    }
    for msg in transcript {
        let label = match msg.role() {
            MessageRole::System => "System",
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
            MessageRole::Tool => "Tool",
        };
        prompt.push_str(&format!("{}: {}\n", label, msg.content()));
    }
    prompt
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    #[serde(default)]
    id: Option<String>,
    function: ResponseFunctionCall,
}

#[derive(Debug, Deserialize)]
struct ResponseFunctionCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

/// Synthesized tool-call id
pub(crate) fn new_call_id() -> String {
    format!("call_{}", Uuid::new_v4().simple())
}

/// Extract content and structured tool calls from a chat-completions body
pub(crate) fn parse_chat_response(provider: &str, body: Value) -> ProviderResult<(String, Vec<ToolCallRecord>)> {
    let response: ChatResponse = serde_json::from_value(body)?;
    let message = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::invalid_response(provider, "no choices in response"))?
        .message;

    let tool_calls = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| {
            // Some servers send arguments as an object instead of a string
            let arguments_json = match call.function.arguments {
                Value::String(text) => text,
                Value::Null => "{}".to_string(),
                other => other.to_string(),
            };
            ToolCallRecord::new(
                call.id.filter(|id| !id.is_empty()).unwrap_or_else(new_call_id),
                call.function.name,
                arguments_json,
            )
        })
        .collect();

    Ok((message.content.unwrap_or_default(), tool_calls))
}

/// Turn a non-success status into `ProviderError::ApiError`
pub(crate) async fn check_status(provider: &str, response: reqwest::Response) -> ProviderResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ProviderError::api_error(provider, status.as_u16(), message))
}
