//! Multi-turn chat on top of the orchestrator
//!
//! The session transcript only ever holds system, user and final assistant
//! messages; tool rounds live in each turn's `OrchestrationOutcome`.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::orchestrator::{OrchestrationOutcome, Orchestrator};
use crate::prompts::PromptStore;
use crate::types::{Message, MessageRole, ToolResult, Transcript};

pub struct ChatSession {
    orchestrator: Arc<Orchestrator>,
    prompts: Option<Arc<dyn PromptStore>>,
    transcript: Transcript,
    tools_enabled: bool,
    last_tool_results: Vec<ToolResult>,
}

impl ChatSession {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            orchestrator,
            prompts: None,
            transcript: Transcript::new(),
            tools_enabled: true,
            last_tool_results: Vec::new(),
        }
    }

    pub fn with_prompts(mut self, prompts: Arc<dyn PromptStore>) -> Self {
        self.prompts = Some(prompts);
        self
    }

    /// Turn tool use on or off for later turns
    pub fn set_tools_enabled(&mut self, enabled: bool) {
        self.tools_enabled = enabled;
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Tool results of the most recent successful turn
    pub fn last_tool_results(&self) -> &[ToolResult] {
        &self.last_tool_results
    }

    /// Reset the conversation to the template `prompt_id` as system message
    pub fn start(&mut self, prompt_id: &str) -> Result<()> {
        let template = self
            .prompts
            .as_ref()
            .and_then(|store| store.get(prompt_id))
            .ok_or_else(|| Error::PromptNotFound(prompt_id.to_string()))?;

        self.clear();
        self.transcript.push(Message::system(template.content));
        Ok(())
    }

    /// Reset the conversation to a literal system message
    pub fn start_with_system(&mut self, content: impl Into<String>) {
        self.clear();
        self.transcript.push(Message::system(content));
    }

    /// Send a user message and return the answer
    ///
    /// On error the session transcript is left as it was.
    pub async fn send(&mut self, text: impl Into<String>) -> Result<OrchestrationOutcome> {
        let mut candidate = self.transcript.clone();
        candidate.push(Message::user(text));
        self.run_turn(candidate).await
    }

    /// Drop the last answer and ask the last user message again
    ///
    /// Returns `Ok(None)` when there is no user message to re-ask.
    pub async fn regenerate_last(&mut self) -> Result<Option<OrchestrationOutcome>> {
        let Some(user_index) = self
            .transcript
            .iter()
            .rposition(|m| m.role() == MessageRole::User)
        else {
            return Ok(None);
        };

        let mut candidate = self.transcript.clone();
        candidate.truncate(user_index + 1);
        self.run_turn(candidate).await.map(Some)
    }

    /// Forget every message
    pub fn clear(&mut self) {
        self.transcript = Transcript::new();
        self.last_tool_results.clear();
    }

    async fn run_turn(&mut self, candidate: Transcript) -> Result<OrchestrationOutcome> {
        let outcome = if self.tools_enabled {
            self.orchestrator.run(&candidate, None).await?
        } else {
            self.orchestrator.complete_plain(&candidate).await?
        };

        let mut committed = candidate;
        committed.push(Message::assistant(outcome.content.clone()));
        self.transcript = committed;
        self.last_tool_results = outcome.tool_results.clone();
        Ok(outcome)
    }
}
