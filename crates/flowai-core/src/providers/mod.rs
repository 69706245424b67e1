//! LLM adapter implementations
//!
//! One adapter per endpoint dialect, all behind the `LlmAdapter` trait:
//!
//! - `OpenAiCompatibleAdapter`: native `tools` / `tool_choice`
//! - `LmStudioAdapter`: OpenAI-shaped endpoints, tools described in a system message
//! - `OllamaAdapter`: `/api/generate` with a flattened prompt
//!
//! `LlmClient` is the configured variant, selected from `Settings::api_flavor`
//! by `create_client`. The `MockAdapter` is kept for testing purposes.

mod traits;
mod error;
mod wire;
mod openai;
mod lmstudio;
mod ollama;
mod mock;

use std::time::Duration;

use async_trait::async_trait;

// Core traits and types
pub use traits::{Completion, LlmAdapter};
pub use error::{ProviderError, ProviderResult};

pub use openai::OpenAiCompatibleAdapter;
pub use lmstudio::{LmStudioAdapter, DEFAULT_MODEL as LMSTUDIO_DEFAULT_MODEL};
pub use ollama::OllamaAdapter;

// Mock adapter for testing
pub use mock::{MockAdapter, MockMode, MockReply, MockRequest};

pub(crate) use wire::new_call_id;

use crate::config::{ApiFlavor, Settings};
use crate::logging::SharedLogger;
use crate::secrets::SecretStore;
use crate::types::{CompletionOptions, ToolDescriptor, ToolPolicy, Transcript};

/// Timeout for model-list discovery
pub(crate) const MODEL_LIST_TIMEOUT: Duration = Duration::from_secs(10);

/// The adapter selected by configuration
pub enum LlmClient {
    OpenAiCompatible(OpenAiCompatibleAdapter),
    LmStudio(LmStudioAdapter),
    Ollama(OllamaAdapter),
}

impl LlmClient {
    pub fn flavor(&self) -> ApiFlavor {
        match self {
            LlmClient::OpenAiCompatible(_) => ApiFlavor::OpenAiCompatible,
            LlmClient::LmStudio(_) => ApiFlavor::LmStudio,
            LlmClient::Ollama(_) => ApiFlavor::Ollama,
        }
    }

    fn adapter(&self) -> &dyn LlmAdapter {
        match self {
            LlmClient::OpenAiCompatible(a) => a,
            LlmClient::LmStudio(a) => a,
            LlmClient::Ollama(a) => a,
        }
    }
}

#[async_trait]
impl LlmAdapter for LlmClient {
    fn name(&self) -> &str {
        self.adapter().name()
    }

    async fn complete(
        &self,
        transcript: &Transcript,
        options: &CompletionOptions,
        tools: &[ToolDescriptor],
        policy: ToolPolicy,
    ) -> ProviderResult<Completion> {
        self.adapter().complete(transcript, options, tools, policy).await
    }

    async fn models(&self) -> Vec<String> {
        self.adapter().models().await
    }
}

/// Create the client for the configured API flavor
///
/// The OpenAI-compatible bearer key comes from `settings.api_key`, or from
/// `secrets` under the `openai` key when the settings carry none.
pub fn create_client(settings: &Settings, secrets: &dyn SecretStore, logger: SharedLogger) -> LlmClient {
    let endpoint = settings.llm_endpoint();
    logger.info(&format!("Creating {} client for {}", settings.api_flavor, endpoint));

    match settings.api_flavor {
        ApiFlavor::OpenAiCompatible => {
            let api_key = settings.api_key.clone().or_else(|| secrets.get("openai"));
            LlmClient::OpenAiCompatible(OpenAiCompatibleAdapter::new(endpoint, api_key, logger))
        }
        ApiFlavor::LmStudio => LlmClient::LmStudio(LmStudioAdapter::new(endpoint, logger)),
        ApiFlavor::Ollama => LlmClient::Ollama(OllamaAdapter::new(endpoint, logger)),
    }
}

/// List all supported API flavors
pub fn supported_flavors() -> Vec<&'static str> {
    ApiFlavor::ALL.iter().map(ApiFlavor::as_str).collect()
}
