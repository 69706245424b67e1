//! Mock adapter for testing
//!
//! Provides deterministic, scriptable replies without network dependencies.
//! Every call is captured so tests can assert on what the orchestrator sent.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::{ProviderError, ProviderResult};
use super::traits::{Completion, LlmAdapter};
use crate::logging::SharedLogger;
use crate::types::{CompletionOptions, MessageRole, ToolDescriptor, ToolPolicy, Transcript};

/// What the mock answers once its script is exhausted
#[derive(Debug, Clone, Default)]
pub enum MockMode {
    /// Echo back the last user message
    #[default]
    Echo,
    /// Return a fixed response
    Fixed(String),
    /// Fail every call with a transport-style error
    Error(String),
}

/// One scripted reply
#[derive(Debug, Clone)]
pub enum MockReply {
    Completion(Completion),
    Error(String),
}

impl From<Completion> for MockReply {
    fn from(completion: Completion) -> Self {
        MockReply::Completion(completion)
    }
}

/// A captured `complete` call
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub transcript: Transcript,
    pub options: CompletionOptions,
    pub tools: Vec<ToolDescriptor>,
    pub policy: ToolPolicy,
}

/// Mock LLM adapter for testing
pub struct MockAdapter {
    mode: MockMode,
    script: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<MockRequest>>,
    models: Vec<String>,
    logger: SharedLogger,
}

impl MockAdapter {
    /// Create an echo adapter
    pub fn new(logger: SharedLogger) -> Self {
        Self::with_mode(MockMode::Echo, logger)
    }

    pub fn with_mode(mode: MockMode, logger: SharedLogger) -> Self {
        Self {
            mode,
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            models: vec!["mock-model".to_string()],
            logger,
        }
    }

    /// Create a fixed response adapter
    pub fn fixed(response: impl Into<String>, logger: SharedLogger) -> Self {
        Self::with_mode(MockMode::Fixed(response.into()), logger)
    }

    /// Create an error-producing adapter
    pub fn error(message: impl Into<String>, logger: SharedLogger) -> Self {
        Self::with_mode(MockMode::Error(message.into()), logger)
    }

    /// Create an adapter that plays `replies` in order, then echoes
    pub fn scripted<I, R>(replies: I, logger: SharedLogger) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<MockReply>,
    {
        let adapter = Self::new(logger);
        adapter.script.lock().extend(replies.into_iter().map(Into::into));
        adapter
    }

    /// Queue another reply
    pub fn push_reply(&self, reply: impl Into<MockReply>) {
        self.script.lock().push_back(reply.into());
    }

    /// Set the list returned by `models()`
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// All captured calls, oldest first
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn last_user_message(transcript: &Transcript) -> String {
        transcript
            .iter()
            .rev()
            .find(|m| m.role() == MessageRole::User && !m.content().is_empty())
            .map(|m| m.content().to_string())
            .unwrap_or_else(|| "Hello from MockAdapter!".to_string())
    }
}

#[async_trait]
impl LlmAdapter for MockAdapter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        transcript: &Transcript,
        options: &CompletionOptions,
        tools: &[ToolDescriptor],
        policy: ToolPolicy,
    ) -> ProviderResult<Completion> {
        self.requests.lock().push(MockRequest {
            transcript: transcript.clone(),
            options: options.clone(),
            tools: tools.to_vec(),
            policy,
        });

        let scripted = self.script.lock().pop_front();
        match scripted {
            Some(MockReply::Completion(completion)) => {
                self.logger.debug(&format!(
                    "MockAdapter: scripted reply, {} tool calls",
                    completion.tool_calls.len()
                ));
                Ok(completion)
            }
            Some(MockReply::Error(message)) => Err(ProviderError::Other(format!("Mock error: {}", message))),
            None => match &self.mode {
                MockMode::Echo => {
                    let user_msg = Self::last_user_message(transcript);
                    self.logger.debug(&format!("MockAdapter: Echo mode, echoing: {}", user_msg));
                    Ok(Completion::text(format!("Echo: {}", user_msg)))
                }
                MockMode::Fixed(response) => Ok(Completion::text(response.clone())),
                MockMode::Error(message) => Err(ProviderError::Other(format!("Mock error: {}", message))),
            },
        }
    }

    async fn models(&self) -> Vec<String> {
        self.models.clone()
    }
}
