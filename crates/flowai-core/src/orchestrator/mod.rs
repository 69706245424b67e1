//! Tool orchestration
//!
//! Composes an `LlmAdapter`, the tool-call decoder and a `ToolBackend` into
//! the bounded completion / tool-execution loop. Owns no network code.

mod context;
mod engine;
mod outcome;

pub use context::{LoopState, RequestContext};
pub use engine::{Orchestrator, MAX_TOOL_CHAIN};
pub use outcome::OrchestrationOutcome;
