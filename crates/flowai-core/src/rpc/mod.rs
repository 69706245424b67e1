//! JSON-RPC transport to the tool server
//!
//! Tool-server methods used:
//!
//! - `initialize`: opens a session, id returned in the `mcp-session-id` header
//! - `tools/list`: tool discovery
//! - `tools/call`: tool execution
//!
//! ```rust,ignore
//! let client = RpcClient::new("http://localhost:8000", logger);
//! let tools = client.list_tools().await?;
//! let result = client.call_tool("check_order_status", json!({ "po_number": "PO-1" })).await?;
//! ```

mod client;

pub use client::{RpcClient, RpcError, RpcResult};
pub use client::{McpTool, McpToolContent, McpToolResult};
pub use client::{CLIENT_NAME, LEGACY_SESSION_HEADER, PROTOCOL_VERSION, SESSION_HEADER};
