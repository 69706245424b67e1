//! JSON-RPC client for the tool server
//!
//! JSON-RPC 2.0 over HTTP POST to `{base_url}/mcp`. The server issues a
//! session id in the `mcp-session-id` header of the `initialize` response;
//! the client echoes it on every later call.
//!
//! Responses may be plain JSON or a `text/event-stream` body, in which case
//! the last `data:` line carries the envelope.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::logging::SharedLogger;
use crate::types::ToolDescriptor;

/// Response header carrying the server-issued session id
pub const SESSION_HEADER: &str = "mcp-session-id";
/// Request header older servers read the session id from
pub const LEGACY_SESSION_HEADER: &str = "x-session-id";

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const CLIENT_NAME: &str = "flow-ai-chat";

const ACCEPT: &str = "application/json, text/event-stream";
const INITIALIZE_TIMEOUT: Duration = Duration::from_secs(10);
const CALL_TIMEOUT: Duration = Duration::from_secs(30);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur during RPC operations
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type RpcResult<T> = Result<T, RpcError>;

/// JSON-RPC client bound to one tool server
///
/// The session id is written once, by the first successful `initialize`,
/// and kept for the lifetime of the client.
pub struct RpcClient {
    base_url: String,
    http: reqwest::Client,
    session_id: RwLock<Option<String>>,
    request_id: AtomicU64,
    logger: SharedLogger,
}

impl RpcClient {
    /// Create a new RPC client
    pub fn new(base_url: impl Into<String>, logger: SharedLogger) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            session_id: RwLock::new(None),
            request_id: AtomicU64::new(1),
            logger,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/mcp", self.base_url)
    }

    /// Session id issued by the server, if one was established
    pub fn session_id(&self) -> Option<String> {
        self.session_id.read().clone()
    }

    fn envelope(&self, method: &str, params: Value) -> Value {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        })
    }

    /// Perform `initialize` and capture the session id from the response header
    async fn initialize(&self) -> RpcResult<Option<String>> {
        let request = self.envelope(
            "initialize",
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {
                    "name": CLIENT_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                },
            }),
        );

        let response = self
            .http
            .post(self.endpoint())
            .header(reqwest::header::ACCEPT, ACCEPT)
            .timeout(INITIALIZE_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RpcError::Status { status: status.as_u16(), body });
        }

        Ok(response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string))
    }

    /// Establish a session if none exists yet; failures are logged, not raised
    async fn ensure_session(&self) {
        if self.session_id.read().is_some() {
            return;
        }

        match self.initialize().await {
            Ok(Some(id)) => {
                self.logger.info(&format!("[RpcClient] Initialized session: {}", id));
                let mut slot = self.session_id.write();
                if slot.is_none() {
                    *slot = Some(id);
                }
            }
            Ok(None) => self.logger.warn("[RpcClient] No session id in initialize response"),
            Err(e) => self.logger.warn(&format!("[RpcClient] Failed to initialize session: {}", e)),
        }
    }

    /// Make a JSON-RPC request
    pub async fn call<P: Serialize, R: DeserializeOwned>(&self, method: &str, params: P) -> RpcResult<R> {
        self.ensure_session().await;

        let request = self.envelope(method, serde_json::to_value(params)?);
        let mut builder = self
            .http
            .post(self.endpoint())
            .header(reqwest::header::ACCEPT, ACCEPT)
            .timeout(timeout_for(method))
            .json(&request);
        if let Some(session) = self.session_id() {
            builder = builder
                .header(SESSION_HEADER, session.as_str())
                .header(LEGACY_SESSION_HEADER, session.as_str());
        }

        self.logger.debug(&format!("[RpcClient] Sending request: method={}", method));
        let response = builder.send().await.map_err(|e| {
            self.logger.error(&format!("[RpcClient] Request failed: method={}: {}", method, e));
            RpcError::Http(e)
        })?;

        let status = response.status();
        let is_event_stream = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/event-stream"));
        let body = response.text().await?;

        if !status.is_success() {
            self.logger.error(&format!("[RpcClient] {} returned status {}", method, status));
            return Err(RpcError::Status { status: status.as_u16(), body });
        }

        let envelope = parse_body(&body, is_event_stream)?;
        parse_response(envelope)
    }

    /// List all available tools (`tools/list`)
    pub async fn list_tools(&self) -> RpcResult<Vec<McpTool>> {
        #[derive(Deserialize)]
        struct Response {
            #[serde(default)]
            tools: Vec<McpTool>,
        }

        let result: Response = self.call("tools/list", json!({})).await?;
        Ok(result.tools)
    }

    /// Call a tool (`tools/call`)
    pub async fn call_tool(&self, name: &str, arguments: Value) -> RpcResult<McpToolResult> {
        #[derive(Serialize)]
        struct Params<'a> {
            name: &'a str,
            arguments: Value,
        }

        self.call("tools/call", Params { name, arguments }).await
    }

    /// `GET {base_url}/health` answers 200
    pub async fn health_check(&self) -> bool {
        let result = self
            .http
            .get(format!("{}/health", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await;

        match result {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                self.logger.debug(&format!("[RpcClient] Health check failed: {}", e));
                false
            }
        }
    }

    /// Poll the health endpoint until it answers or `max_attempts` run out
    pub async fn wait_until_ready(&self, max_attempts: u32, interval: Duration) -> bool {
        for attempt in 1..=max_attempts {
            if self.health_check().await {
                return true;
            }
            if attempt < max_attempts {
                tokio::time::sleep(interval).await;
            }
        }
        false
    }
}

/// Extract the JSON-RPC envelope from a response body
fn parse_body(body: &str, is_event_stream: bool) -> RpcResult<Value> {
    let trimmed = body.trim_start();
    if is_event_stream || trimmed.starts_with("event:") || trimmed.starts_with("data:") {
        let data = body
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .map(str::trim)
            .filter(|data| !data.is_empty())
            .last()
            .ok_or_else(|| RpcError::InvalidResponse("event stream without data".to_string()))?;
        return Ok(serde_json::from_str(data)?);
    }
    Ok(serde_json::from_str(body)?)
}

fn parse_response<R: DeserializeOwned>(response: Value) -> RpcResult<R> {
    // Check for error
    if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or(-1);
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error")
            .to_string();
        return Err(RpcError::Rpc { code, message });
    }

    // Extract result
    let result = response
        .get("result")
        .ok_or_else(|| RpcError::InvalidResponse("Missing result field".to_string()))?;

    serde_json::from_value(result.clone()).map_err(|e| e.into())
}

// ==================== MCP TOOL TYPES ====================

/// Tool description as listed by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpTool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "inputSchema")]
    pub input_schema: Value,
}

impl McpTool {
    /// Map to a catalog entry, defaulting a missing schema to an empty object
    pub fn to_descriptor(&self) -> ToolDescriptor {
        let schema = if self.input_schema.is_null() {
            json!({})
        } else {
            self.input_schema.clone()
        };
        ToolDescriptor::new(self.name.clone(), self.description.clone()).with_schema(schema)
    }
}

/// Tool call result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McpToolResult {
    #[serde(default)]
    pub content: Vec<McpToolContent>,
    #[serde(default, rename = "isError")]
    pub is_error: bool,
}

/// Tool content part; non-text parts carry no `text`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpToolContent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl McpToolContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text.into()),
        }
    }
}

impl McpToolResult {
    /// Text of the first content item
    pub fn first_text(&self) -> Option<&str> {
        self.content.first()?.text.as_deref()
    }

    /// Parse the first content item's text as JSON
    ///
    /// `Ok(None)` when the result has no text content.
    pub fn parse_json<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.first_text().map(serde_json::from_str).transpose()
    }
}

/// Request timeout by method; discovery gets the short one
fn timeout_for(method: &str) -> Duration {
    match method {
        "tools/list" => DISCOVERY_TIMEOUT,
        _ => CALL_TIMEOUT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use std::sync::Arc;

    #[test]
    fn test_client_creation() {
        let client = RpcClient::new("http://localhost:8000/", Arc::new(NoOpLogger::new()));
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.endpoint(), "http://localhost:8000/mcp");
        assert!(client.session_id().is_none());
    }

    #[test]
    fn test_discovery_has_shorter_timeout() {
        assert_eq!(timeout_for("tools/list"), DISCOVERY_TIMEOUT);
        assert_eq!(timeout_for("tools/call"), CALL_TIMEOUT);
        assert!(timeout_for("tools/list") < timeout_for("tools/call"));
    }

    #[test]
    fn test_request_ids_increase() {
        let client = RpcClient::new("http://localhost:8000", Arc::new(NoOpLogger::new()));
        let first = client.envelope("tools/list", json!({}));
        let second = client.envelope("tools/list", json!({}));
        assert_eq!(first["jsonrpc"], "2.0");
        assert_eq!(first["id"], 1);
        assert_eq!(second["id"], 2);
    }

    #[test]
    fn test_parse_event_stream_takes_last_data_line() {
        let body = "event: message\ndata: {\"jsonrpc\":\"2.0\",\"id\":1,\"result\":{\"a\":1}}\n\ndata: {\"jsonrpc\":\"2.0\",\"id\":2,\"result\":{\"a\":2}}\n\n";
        let value = parse_body(body, true).unwrap();
        assert_eq!(value["result"]["a"], 2);

        assert!(matches!(parse_body("event: ping\n\n", true), Err(RpcError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_response_error_object() {
        let err = parse_response::<Value>(json!({
            "jsonrpc": "2.0", "id": 1,
            "error": { "code": -32601, "message": "Method not found" }
        }))
        .unwrap_err();
        assert!(matches!(err, RpcError::Rpc { code: -32601, .. }));

        let missing = parse_response::<Value>(json!({ "jsonrpc": "2.0", "id": 1 })).unwrap_err();
        assert!(matches!(missing, RpcError::InvalidResponse(_)));
    }

    #[test]
    fn test_mcp_tool_to_descriptor() {
        let tool: McpTool = serde_json::from_value(json!({
            "name": "check_order_status",
            "description": "Check the status of an order",
            "inputSchema": { "type": "object", "required": ["po_number"] }
        }))
        .unwrap();
        let descriptor = tool.to_descriptor();
        assert_eq!(descriptor.name, "check_order_status");
        assert_eq!(descriptor.parameter_schema["required"][0], "po_number");

        let bare: McpTool = serde_json::from_value(json!({ "name": "ping" })).unwrap();
        assert_eq!(bare.to_descriptor().parameter_schema, json!({}));
    }

    #[test]
    fn test_mcp_tool_result_parse_json() {
        let result = McpToolResult {
            content: vec![McpToolContent::text(r#"{"status": "success"}"#)],
            is_error: false,
        };
        let data: Option<Value> = result.parse_json().unwrap();
        assert_eq!(data.unwrap()["status"], "success");

        let empty = McpToolResult::default();
        assert!(empty.parse_json::<Value>().unwrap().is_none());
    }
}
