//! Chat message and transcript types

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tool::{ToolCallRecord, ToolResult};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::Tool => write!(f, "tool"),
        }
    }
}

/// Structural violations of the message/transcript invariants
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("toolCallId is only allowed on tool messages")]
    UnexpectedToolCallId,

    #[error("tool message is missing toolCallId")]
    MissingToolCallId,

    #[error("toolCalls are only allowed on assistant messages")]
    UnexpectedToolCalls,

    #[error("duplicate tool call id in one assistant message: {0}")]
    DuplicateToolCallId(String),

    #[error("tool result {0} does not answer a call of the preceding assistant message")]
    UnmatchedToolResult(String),
}

/// A chat message
///
/// `tool_call_id` is present iff the role is `tool`; `tool_calls` only ever
/// appears on assistant messages that triggered tool use. Both rules are
/// checked on construction and when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMessage", into = "RawMessage")]
pub struct Message {
    role: MessageRole,
    content: String,
    tool_calls: Option<Vec<ToolCallRecord>>,
    tool_call_id: Option<String>,
}

impl Message {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::System, content)
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(MessageRole::Assistant, content)
    }

    /// Create an assistant message that triggered tool use
    pub fn assistant_with_tool_calls(
        content: impl Into<String>,
        tool_calls: Vec<ToolCallRecord>,
    ) -> Result<Self, TranscriptError> {
        Self::from_parts(MessageRole::Assistant, content.into(), Some(tool_calls), None)
    }

    /// Create a tool message answering `tool_call_id`
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Tool,
            content: content.into(),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Build a message from its parts, enforcing the role invariants
    pub fn from_parts(
        role: MessageRole,
        content: String,
        tool_calls: Option<Vec<ToolCallRecord>>,
        tool_call_id: Option<String>,
    ) -> Result<Self, TranscriptError> {
        let tool_calls = tool_calls.filter(|calls| !calls.is_empty());

        match role {
            MessageRole::Tool => {
                if tool_call_id.is_none() {
                    return Err(TranscriptError::MissingToolCallId);
                }
                if tool_calls.is_some() {
                    return Err(TranscriptError::UnexpectedToolCalls);
                }
            }
            MessageRole::Assistant => {
                if tool_call_id.is_some() {
                    return Err(TranscriptError::UnexpectedToolCallId);
                }
            }
            MessageRole::System | MessageRole::User => {
                if tool_call_id.is_some() {
                    return Err(TranscriptError::UnexpectedToolCallId);
                }
                if tool_calls.is_some() {
                    return Err(TranscriptError::UnexpectedToolCalls);
                }
            }
        }

        if let Some(calls) = &tool_calls {
            let mut seen = HashSet::new();
            for call in calls {
                if !seen.insert(call.id.as_str()) {
                    return Err(TranscriptError::DuplicateToolCallId(call.id.clone()));
                }
            }
        }

        Ok(Self {
            role,
            content,
            tool_calls,
            tool_call_id,
        })
    }

    fn plain(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn role(&self) -> MessageRole {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Tool calls carried by an assistant message, if any
    pub fn tool_calls(&self) -> Option<&[ToolCallRecord]> {
        self.tool_calls.as_deref()
    }

    /// The call this tool message answers
    pub fn tool_call_id(&self) -> Option<&str> {
        self.tool_call_id.as_deref()
    }
}

/// Wire shape of a message, validated into [`Message`] at the parse boundary
#[derive(Clone, Serialize, Deserialize)]
struct RawMessage {
    role: MessageRole,
    #[serde(default)]
    content: String,
    #[serde(rename = "toolCalls", default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ToolCallRecord>>,
    #[serde(rename = "toolCallId", default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl TryFrom<RawMessage> for Message {
    type Error = TranscriptError;

    fn try_from(raw: RawMessage) -> Result<Self, Self::Error> {
        Message::from_parts(raw.role, raw.content, raw.tool_calls, raw.tool_call_id)
    }
}

impl From<Message> for RawMessage {
    fn from(message: Message) -> Self {
        Self {
            role: message.role,
            content: message.content,
            tool_calls: message.tool_calls,
            tool_call_id: message.tool_call_id,
        }
    }
}

/// Ordered, append-only sequence of messages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Append one tool round: the assistant message carrying `calls`, then one
    /// tool message per result in the given order
    ///
    /// Every result must answer one of `calls`; nothing is appended otherwise.
    pub fn record_round(
        &mut self,
        content: impl Into<String>,
        calls: Vec<ToolCallRecord>,
        results: &[ToolResult],
    ) -> Result<(), TranscriptError> {
        for result in results {
            if !calls.iter().any(|c| c.id == result.tool_call_id) {
                return Err(TranscriptError::UnmatchedToolResult(result.tool_call_id.clone()));
            }
        }

        let assistant = Message::assistant_with_tool_calls(content, calls)?;
        self.messages.push(assistant);
        for result in results {
            self.messages
                .push(Message::tool(result.tool_call_id.clone(), result.content_json.clone()));
        }
        Ok(())
    }

    /// Check that every tool message answers exactly one call of the
    /// assistant message immediately preceding its block of tool messages
    pub fn validate(&self) -> Result<(), TranscriptError> {
        let mut open_calls: Option<HashSet<&str>> = None;

        for message in &self.messages {
            match message.role() {
                MessageRole::Assistant => {
                    open_calls = message
                        .tool_calls()
                        .map(|calls| calls.iter().map(|c| c.id.as_str()).collect());
                }
                MessageRole::Tool => {
                    let id = message.tool_call_id().unwrap_or_default();
                    let answered = open_calls.as_ref().map_or(false, |ids| ids.contains(id));
                    if !answered {
                        return Err(TranscriptError::UnmatchedToolResult(id.to_string()));
                    }
                }
                MessageRole::System | MessageRole::User => open_calls = None,
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Drop every message after the first `len`
    pub fn truncate(&mut self, len: usize) {
        self.messages.truncate(len);
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

impl From<Vec<Message>> for Transcript {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(id: &str) -> ToolCallRecord {
        ToolCallRecord::new(id, "check_order_status", r#"{"po_number":"PO-1"}"#)
    }

    #[test]
    fn test_message_creation() {
        let sys = Message::system("You are helpful");
        assert_eq!(sys.role(), MessageRole::System);
        assert_eq!(sys.content(), "You are helpful");
        assert!(sys.tool_call_id().is_none());

        let tool = Message::tool("call_1", "{}");
        assert_eq!(tool.role(), MessageRole::Tool);
        assert_eq!(tool.tool_call_id(), Some("call_1"));
    }

    #[test]
    fn test_role_invariants() {
        assert_eq!(
            Message::from_parts(MessageRole::Tool, String::new(), None, None),
            Err(TranscriptError::MissingToolCallId)
        );
        assert_eq!(
            Message::from_parts(MessageRole::User, String::new(), None, Some("x".into())),
            Err(TranscriptError::UnexpectedToolCallId)
        );
        assert_eq!(
            Message::from_parts(MessageRole::System, String::new(), Some(vec![call("a")]), None),
            Err(TranscriptError::UnexpectedToolCalls)
        );
        assert_eq!(
            Message::assistant_with_tool_calls("", vec![call("a"), call("a")]),
            Err(TranscriptError::DuplicateToolCallId("a".into()))
        );
    }

    #[test]
    fn test_empty_tool_calls_are_dropped() {
        let msg = Message::assistant_with_tool_calls("hi", vec![]).unwrap();
        assert!(msg.tool_calls().is_none());
    }

    #[test]
    fn test_deserialize_rejects_tool_message_without_id() {
        let err = serde_json::from_str::<Message>(r#"{"role":"tool","content":"{}"}"#);
        assert!(err.is_err());

        let ok: Message =
            serde_json::from_str(r#"{"role":"tool","content":"{}","toolCallId":"c1"}"#).unwrap();
        assert_eq!(ok.tool_call_id(), Some("c1"));
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::user("Hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"content\":\"Hello\""));
        assert!(!json.contains("toolCallId"));
    }

    #[test]
    fn test_record_round_appends_in_order() {
        let mut transcript = Transcript::from(vec![Message::user("status of PO-1 and PO-2?")]);
        let results = vec![
            ToolResult::new("c1", "{\"status\":\"success\"}", true),
            ToolResult::new("c2", "{\"status\":\"error\"}", false),
        ];
        transcript
            .record_round("", vec![call("c1"), call("c2")], &results)
            .unwrap();

        assert_eq!(transcript.len(), 4);
        assert_eq!(transcript.messages()[1].tool_calls().map(|c| c.len()), Some(2));
        assert_eq!(transcript.messages()[2].tool_call_id(), Some("c1"));
        assert_eq!(transcript.messages()[3].tool_call_id(), Some("c2"));
        assert!(transcript.validate().is_ok());
    }

    #[test]
    fn test_record_round_rejects_unknown_result() {
        let mut transcript = Transcript::new();
        let results = vec![ToolResult::new("other", "{}", true)];
        let err = transcript.record_round("", vec![call("c1")], &results);
        assert_eq!(err, Err(TranscriptError::UnmatchedToolResult("other".into())));
        assert!(transcript.is_empty());
    }

    #[test]
    fn test_validate_detects_orphan_tool_message() {
        let transcript = Transcript::from(vec![
            Message::assistant_with_tool_calls("", vec![call("c1")]).unwrap(),
            Message::user("interrupting"),
            Message::tool("c1", "{}"),
        ]);
        assert!(transcript.validate().is_err());
    }

    #[test]
    fn test_into_messages_keeps_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::system("be brief"));
        transcript.push(Message::user("hi"));

        let messages = transcript.clone().into_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role(), MessageRole::System);
        assert_eq!(messages[1].content(), "hi");
        assert_eq!(Transcript::from(messages), transcript);
    }
}
