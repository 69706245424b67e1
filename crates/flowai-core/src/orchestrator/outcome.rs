//! Result of one orchestration call

use serde::Serialize;

use super::LoopState;
use crate::types::{ToolResult, Transcript};

#[derive(Debug, Clone, Serialize)]
pub struct OrchestrationOutcome {
    /// The user-facing answer
    pub content: String,
    /// Every tool result gathered, across all rounds
    pub tool_results: Vec<ToolResult>,
    pub final_response: bool,
    /// Tool-execution rounds performed (at most the chain limit)
    pub rounds: u32,
    /// Working transcript: the input, each tool round, and the final answer
    #[serde(skip)]
    pub transcript: Transcript,
    /// States the loop passed through, ending in `Done`
    #[serde(skip)]
    pub states: Vec<LoopState>,
}

impl OrchestrationOutcome {
    pub fn used_tools(&self) -> bool {
        !self.tool_results.is_empty()
    }

    pub fn failed_results(&self) -> impl Iterator<Item = &ToolResult> {
        self.tool_results.iter().filter(|r| !r.success)
    }
}
