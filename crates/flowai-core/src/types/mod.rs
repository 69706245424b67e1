//! Core types for chat orchestration
//!
//! This module contains the shared records passed between the LLM adapters,
//! the tool-call decoder, the tool bridge and the orchestrator.

mod message;
mod model;
mod tool;

pub use message::{Message, MessageRole, Transcript, TranscriptError};
pub use model::CompletionOptions;
pub use tool::{FunctionSpec, FunctionTool, ToolCallRecord, ToolDescriptor, ToolPolicy, ToolResult};
