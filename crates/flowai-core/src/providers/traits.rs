//! Adapter trait definition

use async_trait::async_trait;

use crate::types::{CompletionOptions, ToolCallRecord, ToolDescriptor, ToolPolicy, Transcript};
use super::error::ProviderResult;

/// Raw reply of one completion call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// Assistant text, empty when the model only called tools
    pub content: String,
    /// Structured tool calls reported by the endpoint (empty if none)
    pub tool_calls: Vec<ToolCallRecord>,
}

impl Completion {
    /// A text-only reply
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// A reply carrying structured tool calls
    pub fn with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCallRecord>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Uniform interface to a language-model HTTP endpoint
///
/// Each endpoint dialect (OpenAI-compatible, LM Studio, Ollama) implements
/// this trait; only the request/response field mapping differs.
#[async_trait]
pub trait LlmAdapter: Send + Sync {
    /// Get the adapter name (e.g., "openai-compatible", "ollama")
    fn name(&self) -> &str;

    /// Run one completion over `transcript`
    ///
    /// `tools` are declared natively or injected as a synthetic system message,
    /// depending on the dialect. `ToolPolicy::Disabled` suppresses any tool use.
    /// Fails with a transport error on HTTP failure or non-success status; never retries.
    async fn complete(
        &self,
        transcript: &Transcript,
        options: &CompletionOptions,
        tools: &[ToolDescriptor],
        policy: ToolPolicy,
    ) -> ProviderResult<Completion>;

    /// List model identifiers, falling back to a built-in list on failure
    async fn models(&self) -> Vec<String>;
}
