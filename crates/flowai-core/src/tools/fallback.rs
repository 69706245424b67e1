//! Built-in tool catalog and executor used when the tool server is unreachable
//!
//! Results are deterministic: anything that would be random on a real server
//! (message ids, order states) is derived from the PO number.

use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::types::ToolDescriptor;

pub const GET_PRODUCT_DETAILS: &str = "get_product_details";
pub const SEND_EXPEDITE_EMAIL: &str = "send_expedite_email";
pub const CHECK_ORDER_STATUS: &str = "check_order_status";

const ORDER_STATES: [&str; 4] = ["processing", "shipped", "delivered", "delayed"];
const LAST_UPDATED: &str = "2025-11-03";
const ESTIMATED_DELIVERY: &str = "2025-11-10";

struct Product {
    key: &'static str,
    name: &'static str,
    sku: &'static str,
    description: &'static str,
    price: f64,
    stock: u32,
    category: &'static str,
}

static PRODUCTS: [Product; 3] = [
    Product {
        key: "switch",
        name: "Network Switch",
        sku: "SW-1000",
        description: "24-port Gigabit Ethernet switch",
        price: 299.99,
        stock: 15,
        category: "Networking",
    },
    Product {
        key: "router",
        name: "Wireless Router",
        sku: "RT-2000",
        description: "Dual-band WiFi 6 router",
        price: 149.99,
        stock: 8,
        category: "Networking",
    },
    Product {
        key: "cable",
        name: "Ethernet Cable",
        sku: "CB-500",
        description: "Cat6 Ethernet cable, 10ft",
        price: 12.99,
        stock: 50,
        category: "Cabling",
    },
];

fn meta() -> Value {
    json!({ "version": "1.0.0", "locale": "en" })
}

/// The three tools offered while offline
pub fn catalog() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(GET_PRODUCT_DETAILS, "Get detailed information about a product").with_schema(json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Product name or identifier to search for" }
            },
            "required": ["query"]
        })),
        ToolDescriptor::new(SEND_EXPEDITE_EMAIL, "Send expedite request email to supplier").with_schema(json!({
            "type": "object",
            "properties": {
                "supplier_email": { "type": "string" },
                "po_number": { "type": "string" },
                "items": { "type": "array" },
                "expected_ship_date": { "type": "string" },
                "requester_name": { "type": "string" },
                "requester_email": { "type": "string" }
            },
            "required": ["supplier_email", "po_number", "requester_name", "requester_email"]
        })),
        ToolDescriptor::new(CHECK_ORDER_STATUS, "Check the status of an order").with_schema(json!({
            "type": "object",
            "properties": {
                "po_number": { "type": "string" }
            },
            "required": ["po_number"]
        })),
    ]
}

/// Run `name` locally
pub fn execute(name: &str, arguments: &Map<String, Value>) -> Value {
    match name {
        GET_PRODUCT_DETAILS => product_details(arguments),
        SEND_EXPEDITE_EMAIL => expedite_email(arguments),
        CHECK_ORDER_STATUS => order_status(arguments),
        other => json!({
            "status": "error",
            "result_type": other,
            "message": "Tool not available",
        }),
    }
}

fn str_arg<'a>(arguments: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    arguments.get(key).and_then(Value::as_str)
}

/// Stable bytes for a PO number
fn po_digest(po_number: &str) -> [u8; 16] {
    *Uuid::new_v5(&Uuid::NAMESPACE_OID, po_number.as_bytes()).as_bytes()
}

fn product_details(arguments: &Map<String, Value>) -> Value {
    let query = str_arg(arguments, "query").unwrap_or_default().to_lowercase();

    let found = PRODUCTS
        .iter()
        .find(|p| query.contains(p.key) || p.name.to_lowercase().contains(&query));

    match found {
        Some(product) => json!({
            "status": "success",
            "result_type": "product_details",
            "data": {
                "name": product.name,
                "sku": product.sku,
                "description": product.description,
                "price": product.price,
                "stock": product.stock,
                "category": product.category,
            },
            "result_summary": format!("Found product: {} (SKU: {})", product.name, product.sku),
            "meta": meta(),
        }),
        None => json!({
            "status": "not_found",
            "result_type": "product_details",
            "data": { "query": query },
            "result_summary": format!("No product found matching: {}", query),
            "meta": meta(),
        }),
    }
}

fn expedite_email(arguments: &Map<String, Value>) -> Value {
    let po_number = str_arg(arguments, "po_number").unwrap_or("Unknown");
    let ship_date = str_arg(arguments, "expected_ship_date");
    let items = arguments
        .get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let digest = po_digest(po_number);
    let message_id = format!(
        "EXP-{:02X}{:02X}{:02X}{:02X}",
        digest[0], digest[1], digest[2], digest[3]
    );

    let lines = items
        .iter()
        .map(|item| {
            let name = item.get("name").and_then(Value::as_str).unwrap_or("Unknown");
            let quantity = item.get("quantity").cloned().unwrap_or(json!(1));
            format!("- {} x{}", name, quantity)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        "Dear Supplier,\n\nWe kindly request expediting the shipment for PO {}.\nRequested ship date: {}.\n\nLine items:\n{}",
        po_number,
        ship_date.unwrap_or("ASAP"),
        lines
    );

    json!({
        "status": "queued",
        "result_type": "expedite_email",
        "message_id": message_id,
        "data": {
            "supplier_email": arguments.get("supplier_email"),
            "po_number": arguments.get("po_number"),
            "items": items,
            "expected_ship_date": ship_date,
        },
        "preview": {
            "subject": format!("EXPEDITE REQUEST - PO {}", po_number),
            "body": body,
        },
        "result_summary": format!("Expedite request queued for PO {}", po_number),
        "meta": meta(),
    })
}

fn order_status(arguments: &Map<String, Value>) -> Value {
    let po_number = str_arg(arguments, "po_number").unwrap_or("Unknown");
    let status = ORDER_STATES[po_digest(po_number)[0] as usize % ORDER_STATES.len()];
    let estimated_delivery = (status != "delivered").then_some(ESTIMATED_DELIVERY);

    json!({
        "status": "success",
        "result_type": "order_status",
        "data": {
            "po_number": po_number,
            "status": status,
            "last_updated": LAST_UPDATED,
            "estimated_delivery": estimated_delivery,
        },
        "result_summary": format!("Order {} status: {}", po_number, status),
        "meta": meta(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("arguments must be an object"),
        }
    }

    #[test]
    fn test_catalog_has_three_tools() {
        let names: Vec<_> = catalog().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec![GET_PRODUCT_DETAILS, SEND_EXPEDITE_EMAIL, CHECK_ORDER_STATUS]);
    }

    #[test]
    fn test_product_lookup() {
        let result = execute(GET_PRODUCT_DETAILS, &args(json!({ "query": "Switch" })));
        assert_eq!(result["status"], "success");
        assert_eq!(result["data"]["name"], "Network Switch");
        assert_eq!(result["data"]["sku"], "SW-1000");
        assert_eq!(result["result_summary"], "Found product: Network Switch (SKU: SW-1000)");

        let by_name = execute(GET_PRODUCT_DETAILS, &args(json!({ "query": "wireless" })));
        assert_eq!(by_name["data"]["sku"], "RT-2000");

        let missing = execute(GET_PRODUCT_DETAILS, &args(json!({ "query": "printer" })));
        assert_eq!(missing["status"], "not_found");
        assert_eq!(missing["data"]["query"], "printer");
    }

    #[test]
    fn test_expedite_email_is_deterministic() {
        let arguments = args(json!({
            "supplier_email": "orders@supplier.example",
            "po_number": "PO-42",
            "items": [{ "name": "Network Switch", "quantity": 2 }, { "name": "Ethernet Cable" }],
        }));
        let first = execute(SEND_EXPEDITE_EMAIL, &arguments);
        let second = execute(SEND_EXPEDITE_EMAIL, &arguments);

        assert_eq!(first["status"], "queued");
        assert_eq!(first["message_id"], second["message_id"]);
        let id = first["message_id"].as_str().unwrap();
        assert!(id.starts_with("EXP-") && id.len() == 12);
        assert_eq!(first["preview"]["subject"], "EXPEDITE REQUEST - PO PO-42");
        let body = first["preview"]["body"].as_str().unwrap();
        assert!(body.contains("Requested ship date: ASAP."));
        assert!(body.ends_with("- Network Switch x2\n- Ethernet Cable x1"));
    }

    #[test]
    fn test_order_status_is_deterministic() {
        let first = execute(CHECK_ORDER_STATUS, &args(json!({ "po_number": "PO-1" })));
        let second = execute(CHECK_ORDER_STATUS, &args(json!({ "po_number": "PO-1" })));
        assert_eq!(first, second);
        assert_eq!(first["status"], "success");

        let status = first["data"]["status"].as_str().unwrap();
        assert!(ORDER_STATES.contains(&status));
        assert_eq!(first["data"]["estimated_delivery"].is_null(), status == "delivered");
    }

    #[test]
    fn test_unknown_tool() {
        let result = execute("foo_bar", &Map::new());
        assert_eq!(result["status"], "error");
        assert_eq!(result["result_type"], "foo_bar");
        assert_eq!(result["message"], "Tool not available");
    }
}
