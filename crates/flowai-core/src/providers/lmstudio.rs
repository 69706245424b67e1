//! LM Studio local-server adapter
//!
//! OpenAI-shaped endpoints, but tools are described in a synthetic leading
//! system message instead of being declared natively.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::logging::SharedLogger;
use crate::types::{CompletionOptions, ToolDescriptor, ToolPolicy, Transcript};

use super::error::ProviderResult;
use super::traits::{Completion, LlmAdapter};
use super::wire::{self, ChatRequest};
use super::MODEL_LIST_TIMEOUT;

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);

/// Model name used when none is configured
pub const DEFAULT_MODEL: &str = "local-model";

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

pub struct LmStudioAdapter {
    endpoint: String,
    http: reqwest::Client,
    logger: SharedLogger,
}

impl LmStudioAdapter {
    pub fn new(endpoint: impl Into<String>, logger: SharedLogger) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            logger,
        }
    }

    fn build_request(
        &self,
        transcript: &Transcript,
        options: &CompletionOptions,
        tools: &[ToolDescriptor],
        policy: ToolPolicy,
    ) -> ChatRequest {
        let preamble = match policy {
            ToolPolicy::Auto if !tools.is_empty() => Some(wire::tool_prompt(tools)),
            _ => None,
        };
        let model = if options.model.is_empty() {
            DEFAULT_MODEL.to_string()
        } else {
            options.model.clone()
        };

        ChatRequest {
            model,
            messages: wire::to_wire_messages(transcript, preamble),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            stream: false,
            tools: None,
            tool_choice: None,
        }
    }
}

#[async_trait]
impl LlmAdapter for LmStudioAdapter {
    fn name(&self) -> &str {
        "lmstudio"
    }

    async fn complete(
        &self,
        transcript: &Transcript,
        options: &CompletionOptions,
        tools: &[ToolDescriptor],
        policy: ToolPolicy,
    ) -> ProviderResult<Completion> {
        let request = self.build_request(transcript, options, tools, policy);
        self.logger.debug(&format!(
            "[LmStudio] POST /v1/chat/completions model={} messages={}",
            request.model,
            request.messages.len()
        ));

        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.endpoint))
            .timeout(COMPLETION_TIMEOUT)
            .json(&request)
            .send()
            .await?;
        let body: Value = wire::check_status(self.name(), response).await?.json().await?;
        let (content, tool_calls) = wire::parse_chat_response(self.name(), body)?;

        Ok(Completion::with_tool_calls(content, tool_calls))
    }

    async fn models(&self) -> Vec<String> {
        let result = async {
            let response = self
                .http
                .get(format!("{}/v1/models", self.endpoint))
                .timeout(MODEL_LIST_TIMEOUT)
                .send()
                .await?;
            let list: ModelList = wire::check_status(self.name(), response).await?.json().await?;
            ProviderResult::Ok(list.data.into_iter().map(|m| m.id).collect::<Vec<_>>())
        }
        .await;

        match result {
            Ok(models) => models,
            Err(e) => {
                self.logger.warn(&format!("[LmStudio] Model listing failed, using default: {}", e));
                vec![DEFAULT_MODEL.to_string()]
            }
        }
    }
}
