//! `{"tool": NAME, "arguments": {...}}` objects embedded in prose

use serde::Deserialize;
use serde_json::{Map, Value};

use super::DecodeError;

#[derive(Debug, Deserialize)]
struct EmbeddedCall {
    tool: String,
    arguments: Map<String, Value>,
}

/// A call found inside free text
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedMatch {
    pub name: String,
    pub arguments: Map<String, Value>,
    /// The text with the JSON span removed
    pub remaining: String,
}

/// Parse the span from the first `{` to the last `}` of the trimmed text
///
/// `Ok(None)` when there is no such span.
pub fn find_call(content: &str) -> Result<Option<EmbeddedMatch>, DecodeError> {
    let content = content.trim();
    let (Some(start), Some(last)) = (content.find('{'), content.rfind('}')) else {
        return Ok(None);
    };
    if last < start {
        return Ok(None);
    }
    let end = last + 1;

    let value: Value = serde_json::from_str(&content[start..end])?;
    let call: EmbeddedCall = serde_json::from_value(value).map_err(|_| DecodeError::NotACall)?;

    let mut remaining = String::with_capacity(content.len() - (end - start));
    remaining.push_str(&content[..start]);
    remaining.push_str(&content[end..]);

    Ok(Some(EmbeddedMatch {
        name: call.tool,
        arguments: call.arguments,
        remaining,
    }))
}
