//! Crate-level error type

use thiserror::Error;

use crate::config::ConfigError;
use crate::decode::DecodeError;
use crate::providers::ProviderError;
use crate::rpc::RpcError;
use crate::types::TranscriptError;

/// Coarse classification callers match on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network/HTTP failure talking to the LLM or the tool server
    Transport,
    /// Malformed tool-call or transcript data
    Decode,
    /// A tool ran but reported failure
    ToolFailure,
    /// Settings or prompt lookup problem
    Config,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("LLM endpoint error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Tool server error: {0}")]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Invalid transcript: {0}")]
    Transcript(#[from] TranscriptError),

    #[error("Tool {name} failed: {payload}")]
    ToolFailure { name: String, payload: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Prompt not found: {0}")]
    PromptNotFound(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Provider(_) | Error::Rpc(_) => ErrorKind::Transport,
            Error::Decode(_) | Error::Transcript(_) => ErrorKind::Decode,
            Error::ToolFailure { .. } => ErrorKind::ToolFailure,
            Error::Config(_) | Error::PromptNotFound(_) => ErrorKind::Config,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }
}

pub type Result<T> = std::result::Result<T, Error>;
