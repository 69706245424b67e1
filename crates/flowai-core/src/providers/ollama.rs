//! Ollama adapter
//!
//! Uses the non-streaming `/api/generate` endpoint with the transcript
//! flattened into a single prompt.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::logging::SharedLogger;
use crate::types::{CompletionOptions, ToolDescriptor, ToolPolicy, Transcript};

use super::error::ProviderResult;
use super::traits::{Completion, LlmAdapter};
use super::wire;
use super::MODEL_LIST_TIMEOUT;

const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);
const FALLBACK_MODELS: [&str; 3] = ["llama2", "codellama", "mistral"];

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagList {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

pub struct OllamaAdapter {
    endpoint: String,
    http: reqwest::Client,
    logger: SharedLogger,
}

impl OllamaAdapter {
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
    ) -> GenerateRequest {
        let preamble = match policy {
            ToolPolicy::Auto if !tools.is_empty() => Some(wire::tool_prompt(tools)),
            _ => None,
        };

        GenerateRequest {
            model: options.model.clone(),
            prompt: wire::flatten_prompt(transcript, preamble),
            stream: false,
            options: GenerateOptions {
                temperature: options.temperature,
                num_predict: options.max_tokens,
            },
        }
    }
}

#[async_trait]
impl LlmAdapter for OllamaAdapter {
    fn name(&self) -> &str {
        "ollama"
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
            "[Ollama] POST /api/generate model={} prompt_len={}",
            request.model,
            request.prompt.len()
        ));

        let response = self
            .http
            .post(format!("{}/api/generate", self.endpoint))
            .timeout(COMPLETION_TIMEOUT)
            .json(&request)
            .send()
            .await?;
        let body: GenerateResponse = wire::check_status(self.name(), response).await?.json().await?;

        Ok(Completion::text(body.response))
    }

    async fn models(&self) -> Vec<String> {
        let result = async {
            let response = self
                .http
                .get(format!("{}/api/tags", self.endpoint))
                .timeout(MODEL_LIST_TIMEOUT)
                .send()
                .await?;
            let tags: TagList = wire::check_status(self.name(), response).await?.json().await?;
            ProviderResult::Ok(tags.models.into_iter().map(|m| m.name).collect::<Vec<_>>())
        }
        .await;

        match result {
            Ok(models) => models,
            Err(e) => {
                self.logger.warn(&format!("[Ollama] Model listing failed, using defaults: {}", e));
                FALLBACK_MODELS.iter().map(|m| m.to_string()).collect()
            }
        }
    }
}
