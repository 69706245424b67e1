//! FlowAI Core
//!
//! Tool-orchestration engine for LLM chat. A conversation turn runs through:
//!
//! - `providers`: one `LlmAdapter` per endpoint dialect (OpenAI-compatible, LM Studio, Ollama)
//! - `decode`: structured, delimited-marker and embedded-JSON tool calls normalized to `ToolCallRecord`
//! - `tools`: the JSON-RPC tool bridge with its offline fallback catalog
//! - `orchestrator`: the bounded completion / tool-execution loop
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use flowai_core::{create_client, EnvSecretStore, Orchestrator, Settings, ToolBridge, Transcript, Message};
//!
//! let settings = Settings::default();
//! let llm = create_client(&settings, &EnvSecretStore::new(), logger.clone());
//! let tools = ToolBridge::new(&settings.mcp_base_url, logger.clone());
//! let orchestrator = Orchestrator::new(Arc::new(llm), Arc::new(tools), settings.completion_options(), logger);
//!
//! let mut transcript = Transcript::new();
//! transcript.push(Message::user("Find the network switch"));
//! let outcome = orchestrator.run(&transcript, None).await?;
//! println!("{}", outcome.content);
//! ```

pub mod types;
pub mod secrets;
pub mod logging;
pub mod config;
pub mod providers;
pub mod decode;
pub mod rpc;
pub mod tools;
pub mod orchestrator;
pub mod prompts;
pub mod session;
mod error;

pub use error::{Error, ErrorKind, Result};

// Re-export commonly used types
pub use types::{
    CompletionOptions, Message, MessageRole, ToolCallRecord, ToolDescriptor, ToolPolicy, ToolResult,
    Transcript, TranscriptError,
};

pub use secrets::{EnvSecretStore, MemorySecretStore, SecretStore};

pub use logging::{ConsoleLogger, FileLogger, LogLevel, Logger, NoOpLogger, SharedLogger};

pub use config::{ApiFlavor, ConfigError, FileSettingsProvider, EnvSettingsProvider, Settings, SettingsProvider};

pub use providers::{create_client, Completion, LlmAdapter, LlmClient, ProviderError};

pub use decode::{decode, Decoded, DecodeError};

pub use rpc::{RpcClient, RpcError};

pub use tools::{OfflineTools, ToolBackend, ToolBridge};

pub use orchestrator::{OrchestrationOutcome, Orchestrator, MAX_TOOL_CHAIN};

pub use prompts::{MemoryPromptStore, PromptStore, PromptTemplate};

pub use session::ChatSession;
