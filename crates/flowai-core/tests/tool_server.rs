//! JSON-RPC tool server behavior against a mock HTTP server

use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Map};

use flowai_core::rpc::{LEGACY_SESSION_HEADER, SESSION_HEADER};
use flowai_core::{NoOpLogger, RpcClient, RpcError, SharedLogger, ToolBackend, ToolBridge, ToolCallRecord};

fn logger() -> SharedLogger {
    Arc::new(NoOpLogger::new())
}

fn method(name: &str) -> Matcher {
    Matcher::PartialJson(json!({ "jsonrpc": "2.0", "method": name }))
}

async fn mock_initialize(server: &mut ServerGuard, session: &str) -> mockito::Mock {
    server
        .mock("POST", "/mcp")
        .match_body(method("initialize"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header(SESSION_HEADER, session)
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":{"protocolVersion":"2024-11-05","capabilities":{}}}"#)
        .create_async()
        .await
}

#[tokio::test]
async fn test_session_is_captured_once_and_echoed() {
    let mut server = Server::new_async().await;
    let init = mock_initialize(&mut server, "sess-42").await.expect(1);
    let list = server
        .mock("POST", "/mcp")
        .match_body(method("tools/list"))
        .match_header(SESSION_HEADER, "sess-42")
        .match_header(LEGACY_SESSION_HEADER, "sess-42")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "jsonrpc": "2.0",
                "id": 2,
                "result": {
                    "tools": [
                        {
                            "name": "get_product_details",
                            "description": "Look up a product",
                            "inputSchema": { "type": "object", "properties": { "query": { "type": "string" } } }
                        },
                        { "name": "ping" }
                    ]
                }
            })
            .to_string(),
        )
        .expect(2)
        .create_async()
        .await;

    let bridge = ToolBridge::new(server.url(), logger());
    let first = bridge.list_tools().await;
    let second = bridge.list_tools().await;

    assert_eq!(bridge.session_id().as_deref(), Some("sess-42"));
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].name, "get_product_details");
    assert_eq!(first[0].description, "Look up a product");
    assert_eq!(first[0].parameter_schema["properties"]["query"]["type"], "string");
    assert_eq!(first[1].name, "ping");
    assert_eq!(first[1].description, "");

    init.assert_async().await;
    list.assert_async().await;
}

#[tokio::test]
async fn test_initialize_is_retried_while_no_session() {
    let mut server = Server::new_async().await;
    let init = server
        .mock("POST", "/mcp")
        .match_body(method("initialize"))
        .with_status(200)
        .with_body(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#)
        .expect(2)
        .create_async()
        .await;
    server
        .mock("POST", "/mcp")
        .match_body(method("tools/list"))
        .with_status(200)
        .with_body(r#"{"jsonrpc":"2.0","id":2,"result":{"tools":[]}}"#)
        .create_async()
        .await;

    let client = RpcClient::new(server.url(), logger());
    assert!(client.list_tools().await.unwrap().is_empty());
    assert!(client.list_tools().await.unwrap().is_empty());

    assert!(client.session_id().is_none());
    init.assert_async().await;
}

#[tokio::test]
async fn test_tool_call_reads_event_stream_text() {
    let mut server = Server::new_async().await;
    mock_initialize(&mut server, "sess-1").await;
    let payload = json!({ "status": "success", "result_type": "order_status", "data": { "po_number": "PO-9" } });
    let envelope = json!({
        "jsonrpc": "2.0",
        "id": 2,
        "result": { "content": [ { "type": "text", "text": payload.to_string() } ], "isError": false }
    });
    server
        .mock("POST", "/mcp")
        .match_body(Matcher::PartialJson(json!({
            "method": "tools/call",
            "params": { "name": "check_order_status", "arguments": { "po_number": "PO-9" } }
        })))
        .with_status(200)
        .with_header("content-type", "text/event-stream")
        .with_body(format!("event: message\ndata: {}\n\n", envelope))
        .create_async()
        .await;

    let bridge = ToolBridge::new(server.url(), logger());
    let result = bridge
        .execute(&ToolCallRecord::new("call_1", "check_order_status", r#"{"po_number":"PO-9"}"#))
        .await;

    assert!(result.success);
    assert_eq!(result.tool_call_id, "call_1");
    assert_eq!(result.payload().unwrap(), payload);
}

#[tokio::test]
async fn test_arguments_reach_server_unchanged() {
    let mut server = Server::new_async().await;
    mock_initialize(&mut server, "sess-1").await;
    let call = server
        .mock("POST", "/mcp")
        .match_body(Matcher::AllOf(vec![
            method("tools/call"),
            Matcher::Regex(r#""arguments":\{"po_number":"PO-1","amount":123456789012345678901234567890\}"#.to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"jsonrpc":"2.0","id":2,"result":{"content":[{"type":"text","text":"{\"status\":\"success\"}"}]}}"#)
        .create_async()
        .await;

    let bridge = ToolBridge::new(server.url(), logger());
    let result = bridge
        .execute(&ToolCallRecord::new(
            "call_1",
            "check_order_status",
            r#"{"po_number":"PO-1","amount":123456789012345678901234567890}"#,
        ))
        .await;

    assert!(result.success);
    call.assert_async().await;
}

#[tokio::test]
async fn test_empty_content_yields_empty_object() {
    let mut server = Server::new_async().await;
    mock_initialize(&mut server, "sess-1").await;
    server
        .mock("POST", "/mcp")
        .match_body(method("tools/call"))
        .with_status(200)
        .with_body(r#"{"jsonrpc":"2.0","id":2,"result":{"content":[]}}"#)
        .create_async()
        .await;

    let bridge = ToolBridge::new(server.url(), logger());
    let value = bridge.call_tool("ping", Map::new()).await;

    assert_eq!(value, json!({}));
}

#[tokio::test]
async fn test_server_error_falls_back_to_builtin_executor() {
    let mut server = Server::new_async().await;
    mock_initialize(&mut server, "sess-1").await;
    server
        .mock("POST", "/mcp")
        .match_body(method("tools/call"))
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let bridge = ToolBridge::new(server.url(), logger());
    let result = bridge
        .execute(&ToolCallRecord::new("call_1", "get_product_details", r#"{"query":"cable"}"#))
        .await;

    assert!(result.success);
    let payload = result.payload().unwrap();
    assert_eq!(payload["data"]["sku"], "CB-500");
}

#[tokio::test]
async fn test_rejected_call_is_a_failure_not_a_fallback() {
    let mut server = Server::new_async().await;
    mock_initialize(&mut server, "sess-1").await;
    server
        .mock("POST", "/mcp")
        .match_body(method("tools/call"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"jsonrpc":"2.0","id":2,"error":{"code":-32602,"message":"Invalid params: query too short"}}"#)
        .create_async()
        .await;

    let bridge = ToolBridge::new(server.url(), logger());
    let result = bridge
        .execute(&ToolCallRecord::new("call_1", "get_product_details", r#"{"query":"switch"}"#))
        .await;

    assert!(!result.success);
    let payload = result.payload().unwrap();
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["message"], "Invalid params: query too short");
    assert!(payload.get("data").is_none());
}

#[tokio::test]
async fn test_missing_result_is_a_failure() {
    let mut server = Server::new_async().await;
    mock_initialize(&mut server, "sess-1").await;
    server
        .mock("POST", "/mcp")
        .match_body(method("tools/call"))
        .with_status(200)
        .with_body(r#"{"jsonrpc":"2.0","id":2}"#)
        .create_async()
        .await;

    let bridge = ToolBridge::new(server.url(), logger());
    let result = bridge
        .execute(&ToolCallRecord::new("call_1", "check_order_status", r#"{"po_number":"PO-1"}"#))
        .await;

    assert!(!result.success);
    assert_eq!(result.payload().unwrap()["result_type"], "check_order_status");
}

#[tokio::test]
async fn test_rpc_error_object_is_surfaced() {
    let mut server = Server::new_async().await;
    mock_initialize(&mut server, "sess-1").await;
    server
        .mock("POST", "/mcp")
        .match_body(method("tools/list"))
        .with_status(200)
        .with_body(r#"{"jsonrpc":"2.0","id":2,"error":{"code":-32601,"message":"Method not found"}}"#)
        .create_async()
        .await;

    let client = RpcClient::new(server.url(), logger());
    let err = client.list_tools().await.unwrap_err();

    match err {
        RpcError::Rpc { code, message } => {
            assert_eq!(code, -32601);
            assert_eq!(message, "Method not found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_health_check() {
    let mut server = Server::new_async().await;
    let health = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .create_async()
        .await;

    let bridge = ToolBridge::new(server.url(), logger());
    assert!(bridge.health_check().await);
    assert!(bridge.wait_until_ready(2, Duration::from_millis(10)).await);
    health.assert_async().await;

    let down = ToolBridge::new("http://127.0.0.1:9", logger());
    assert!(!down.wait_until_ready(2, Duration::from_millis(10)).await);
}
