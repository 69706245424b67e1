//! OpenAI-compatible chat-completions adapter
//!
//! Declares tools natively (`tools` + `tool_choice`) and reads structured
//! `tool_calls` from the reply.

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

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);
const FALLBACK_MODELS: [&str; 3] = ["gpt-3.5-turbo", "gpt-4", "gemma-2b"];

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// Adapter for endpoints that speak `/v1/chat/completions` with native tools
pub struct OpenAiCompatibleAdapter {
    endpoint: String,
    api_key: Option<String>,
    http: reqwest::Client,
    logger: SharedLogger,
}

impl OpenAiCompatibleAdapter {
    /// `endpoint` is `scheme://host:port` without a trailing slash
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>, logger: SharedLogger) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            http: reqwest::Client::new(),
            logger,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(
        &self,
        transcript: &Transcript,
        options: &CompletionOptions,
        tools: &[ToolDescriptor],
        policy: ToolPolicy,
    ) -> ChatRequest {
        let (tools, tool_choice) = if tools.is_empty() {
            (None, None)
        } else {
            (
                Some(tools.iter().map(ToolDescriptor::to_function_tool).collect()),
                Some(policy.as_str()),
            )
        };

        ChatRequest {
            model: options.model.clone(),
            messages: wire::to_wire_messages(transcript, None),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            stream: false,
            tools,
            tool_choice,
        }
    }
}

#[async_trait]
impl LlmAdapter for OpenAiCompatibleAdapter {
    fn name(&self) -> &str {
        "openai-compatible"
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
            "[OpenAiCompatible] POST /v1/chat/completions model={} messages={} tools={} tool_choice={}",
            request.model,
            request.messages.len(),
            tools.len(),
            policy.as_str(),
        ));

        let mut builder = self
            .http
            .post(format!("{}/v1/chat/completions", self.endpoint))
            .timeout(COMPLETION_TIMEOUT)
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = wire::check_status(self.name(), builder.send().await?).await?;
        let body: Value = response.json().await?;
        let (content, tool_calls) = wire::parse_chat_response(self.name(), body)?;

        self.logger.debug(&format!(
            "[OpenAiCompatible] Reply: {} chars, {} tool calls",
            content.len(),
            tool_calls.len()
        ));
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
                self.logger.warn(&format!("[OpenAiCompatible] Model listing failed, using defaults: {}", e));
                FALLBACK_MODELS.iter().map(|m| m.to_string()).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::types::Message;
    use std::sync::Arc;

    fn adapter() -> OpenAiCompatibleAdapter {
        OpenAiCompatibleAdapter::new("http://localhost:1234/", None, Arc::new(NoOpLogger::new()))
    }

    fn transcript() -> Transcript {
        let mut t = Transcript::new();
        t.push(Message::user("Find the switch"));
        t
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        assert_eq!(adapter().endpoint(), "http://localhost:1234");
    }

    #[test]
    fn test_request_declares_tools_natively() {
        let tools = vec![ToolDescriptor::new("get_product_details", "Get product details")];
        let options = CompletionOptions::new("gpt-4");

        let request = serde_json::to_value(adapter().build_request(&transcript(), &options, &tools, ToolPolicy::Auto)).unwrap();
        assert_eq!(request["tools"][0]["function"]["name"], "get_product_details");
        assert_eq!(request["tool_choice"], "auto");
        assert_eq!(request["messages"].as_array().unwrap().len(), 1);
        assert_eq!(request["stream"], false);

        let disabled = serde_json::to_value(adapter().build_request(&transcript(), &options, &tools, ToolPolicy::Disabled)).unwrap();
        assert_eq!(disabled["tool_choice"], "none");
    }

    #[test]
    fn test_request_without_tools_omits_tool_fields() {
        let options = CompletionOptions::new("gpt-4");
        let request = serde_json::to_value(adapter().build_request(&transcript(), &options, &[], ToolPolicy::Auto)).unwrap();
        assert!(request.get("tools").is_none());
        assert!(request.get("tool_choice").is_none());
    }

    #[tokio::test]
    async fn test_models_fallback_when_unreachable() {
        let adapter = OpenAiCompatibleAdapter::new("http://127.0.0.1:9", None, Arc::new(NoOpLogger::new()));
        assert_eq!(adapter.models().await, vec!["gpt-3.5-turbo", "gpt-4", "gemma-2b"]);
    }
}
