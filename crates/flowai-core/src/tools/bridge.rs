//! Tool execution backends
//!
//! `ToolBridge` talks to the remote tool server and degrades to the built-in
//! catalog/executor when the server is unreachable. `OfflineTools` only uses
//! the built-in executor.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::logging::SharedLogger;
use crate::rpc::{RpcClient, RpcError};
use crate::types::{ToolCallRecord, ToolDescriptor, ToolResult};

use super::fallback;

/// Payload `status` values that count as success
pub const SUCCESS_STATUSES: [&str; 3] = ["success", "queued", "sent"];

/// Whether a tool payload reports success
pub fn is_success(payload: &Value) -> bool {
    payload
        .get("status")
        .and_then(Value::as_str)
        .is_some_and(|status| SUCCESS_STATUSES.contains(&status))
}

/// Anything that can discover and run tools
#[async_trait]
pub trait ToolBackend: Send + Sync {
    /// Current tool catalog; never fails
    async fn list_tools(&self) -> Vec<ToolDescriptor>;

    /// Run one tool and return its JSON payload; never fails
    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Value;

    /// Execute a decoded call
    ///
    /// Arguments that are not a JSON object yield a failed result without
    /// running the tool.
    async fn execute(&self, call: &ToolCallRecord) -> ToolResult {
        let arguments = match call.arguments() {
            Ok(arguments) => arguments,
            Err(e) => return ToolResult::error(call.id.clone(), format!("Invalid tool arguments: {}", e)),
        };

        let payload = self.call_tool(&call.name, arguments).await;
        ToolResult::new(call.id.clone(), payload.to_string(), is_success(&payload))
    }

    /// Execute calls one after another, in order
    async fn execute_all(&self, calls: &[ToolCallRecord]) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.execute(call).await);
        }
        results
    }
}

/// Bridge to the remote tool server
pub struct ToolBridge {
    client: RpcClient,
    logger: SharedLogger,
}

impl ToolBridge {
    /// Create a bridge for the server at `base_url`
    pub fn new(base_url: impl Into<String>, logger: SharedLogger) -> Self {
        Self {
            client: RpcClient::new(base_url, logger.clone()),
            logger,
        }
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    pub fn session_id(&self) -> Option<String> {
        self.client.session_id()
    }

    pub async fn health_check(&self) -> bool {
        self.client.health_check().await
    }

    pub async fn wait_until_ready(&self, max_attempts: u32, interval: Duration) -> bool {
        self.client.wait_until_ready(max_attempts, interval).await
    }
}

#[async_trait]
impl ToolBackend for ToolBridge {
    async fn list_tools(&self) -> Vec<ToolDescriptor> {
        match self.client.list_tools().await {
            Ok(tools) => {
                self.logger.info(&format!("[ToolBridge] Retrieved {} tools from tool server", tools.len()));
                tools.iter().map(|t| t.to_descriptor()).collect()
            }
            Err(e) => {
                self.logger.warn(&format!(
                    "[ToolBridge] Failed to fetch tools from tool server: {}. Using built-in tools.",
                    e
                ));
                fallback::catalog()
            }
        }
    }

    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Value {
        self.logger.info(&format!(
            "[ToolBridge] Calling tool: {} with args: {}",
            name,
            Value::Object(arguments.clone())
        ));

        match self.client.call_tool(name, Value::Object(arguments.clone())).await {
            Ok(result) => match result.parse_json::<Value>() {
                Ok(Some(payload)) => payload,
                Ok(None) => Value::Object(Map::new()),
                Err(e) => {
                    self.logger.error(&format!(
                        "[ToolBridge] Unparseable result from {}: {}. Using built-in executor.",
                        name, e
                    ));
                    fallback::execute(name, &arguments)
                }
            },
            // The server answered and refused: a tool failure, not an outage
            Err(RpcError::Rpc { code, message }) => {
                self.logger.warn(&format!("[ToolBridge] Tool server rejected {} ({}): {}", name, code, message));
                rejected(name, message)
            }
            Err(RpcError::InvalidResponse(message)) => {
                self.logger.warn(&format!("[ToolBridge] Invalid response for {}: {}", name, message));
                rejected(name, message)
            }
            Err(e) => {
                self.logger.error(&format!("[ToolBridge] Tool call failed: {}. Using built-in executor.", e));
                fallback::execute(name, &arguments)
            }
        }
    }
}

fn rejected(name: &str, message: String) -> Value {
    json!({
        "status": "error",
        "result_type": name,
        "message": message,
    })
}

/// Built-in tools only, no network
#[derive(Default)]
pub struct OfflineTools;

impl OfflineTools {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolBackend for OfflineTools {
    async fn list_tools(&self) -> Vec<ToolDescriptor> {
        fallback::catalog()
    }

    async fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> Value {
        fallback::execute(name, &arguments)
    }
}
