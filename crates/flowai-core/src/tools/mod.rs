//! Tool discovery and execution
//!
//! ```text
//! ┌──────────────┐  tools/list, tools/call  ┌──────────────┐
//! │  ToolBridge  │ ───────────────────────▶ │ Tool server  │
//! └──────┬───────┘        (JSON-RPC)        └──────────────┘
//!        │ unreachable / unparseable
//!        ▼
//! ┌──────────────┐
//! │   fallback   │  3 built-in tools, deterministic results
//! └──────────────┘
//! ```

mod bridge;
pub mod fallback;

pub use bridge::{is_success, OfflineTools, ToolBackend, ToolBridge, SUCCESS_STATUSES};
