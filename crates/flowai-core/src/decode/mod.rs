//! Tool-call decoding
//!
//! Normalizes the three ways a model can ask for a tool into
//! `ToolCallRecord`s, in strict priority order:
//!
//! 1. Structured `tool_calls` reported by the endpoint, used verbatim
//! 2. The delimited marker grammar (see [`markers`]); the call consumes the whole turn
//! 3. A `{"tool": ..., "arguments": {...}}` object embedded in the text
//!
//! Decoding never fails; a malformed candidate is reported in
//! [`Decoded::ignored`] and treated as "no call".

pub mod markers;
mod embedded;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::providers::{new_call_id, Completion};
use crate::types::ToolCallRecord;

pub use embedded::{find_call as find_embedded_call, EmbeddedMatch};
pub use markers::{match_call as match_marker_call, render_call, MarkerCall};

/// Why a tool-call candidate was discarded
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("tool-call JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tool-call arguments are not a JSON object")]
    NotAnObject,

    #[error("JSON object is not a {{tool, arguments}} call")]
    NotACall,
}

/// Where the decoded calls came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallSource {
    None,
    Structured,
    Markers,
    Embedded,
}

/// A completion with its tool calls normalized
#[derive(Debug)]
pub struct Decoded {
    pub content: String,
    pub tool_calls: Vec<ToolCallRecord>,
    pub source: CallSource,
    /// Candidates that looked like calls but failed to parse
    pub ignored: Vec<DecodeError>,
}

impl Decoded {
    fn plain(content: String, ignored: Vec<DecodeError>) -> Self {
        Self {
            content,
            tool_calls: Vec::new(),
            source: CallSource::None,
            ignored,
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

fn parse_arguments(text: &str) -> Result<Map<String, Value>, DecodeError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        _ => Err(DecodeError::NotAnObject),
    }
}

/// Decode a completion into content plus tool calls
pub fn decode(completion: Completion) -> Decoded {
    let Completion { content, tool_calls } = completion;

    if !tool_calls.is_empty() {
        return Decoded {
            content,
            tool_calls,
            source: CallSource::Structured,
            ignored: Vec::new(),
        };
    }

    let mut ignored = Vec::new();

    if let Some(call) = markers::match_call(&content) {
        match parse_arguments(call.arguments) {
            Ok(arguments) => {
                let record = ToolCallRecord::from_arguments(new_call_id(), call.name, &arguments);
                return Decoded {
                    content: String::new(),
                    tool_calls: vec![record],
                    source: CallSource::Markers,
                    ignored,
                };
            }
            Err(e) => ignored.push(e),
        }
    }

    match embedded::find_call(&content) {
        Ok(Some(found)) => Decoded {
            content: found.remaining,
            tool_calls: vec![ToolCallRecord::from_arguments(new_call_id(), found.name, &found.arguments)],
            source: CallSource::Embedded,
            ignored,
        },
        Ok(None) => Decoded::plain(content, ignored),
        Err(e) => {
            ignored.push(e);
            Decoded::plain(content, ignored)
        }
    }
}
