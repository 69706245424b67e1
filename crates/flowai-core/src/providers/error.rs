//! Errors raised by LLM adapters

use thiserror::Error;

/// Longest endpoint error body kept in `ApiError::message`
const MAX_ERROR_BODY: usize = 512;

#[derive(Error, Debug)]
pub enum ProviderError {
    /// Endpoint answered with a non-2xx status
    #[error("{provider} returned {status}: {message}")]
    ApiError {
        provider: String,
        status: u16,
        message: String,
    },

    /// Connection refused, timeout, or body read failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Body parsed but lacked the fields the dialect requires
    #[error("Unexpected response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },

    /// Scripted failure from the mock adapter
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Build an `ApiError`, clipping long bodies (HTML error pages and the like)
    pub fn api_error(provider: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        let mut message = body.into();
        if message.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            message.truncate(cut);
            message.push_str("...");
        }
        Self::ApiError {
            provider: provider.into(),
            status,
            message,
        }
    }

    pub fn invalid_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_bodies_are_clipped() {
        let err = ProviderError::api_error("ollama", 502, "é".repeat(600));
        match err {
            ProviderError::ApiError { status, message, .. } => {
                assert_eq!(status, 502);
                assert!(message.ends_with("..."));
                assert!(message.len() <= MAX_ERROR_BODY + 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let short = ProviderError::api_error("openai-compatible", 401, "bad key");
        assert_eq!(short.to_string(), "openai-compatible returned 401: bad key");
    }
}
