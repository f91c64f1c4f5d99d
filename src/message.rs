//! Chat message model.
//!
//! Messages are tagged by role so that retention logic can branch on
//! message kind exhaustively at compile time. Content is opaque to this
//! crate beyond equality; tool call arguments are carried as raw JSON.

use serde::{Deserialize, Serialize};

/// A single tool invocation requested by an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned identifier, echoed by the matching tool result.
    pub id: String,
    /// Name of the tool to invoke.
    pub name: String,
    /// Arguments as raw JSON.
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Create a tool call with the given id, name and JSON arguments.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// A chat message, tagged by role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ChatMessage {
    /// Standing instructions for the model.
    System { content: String },
    /// End-user input.
    User { content: String },
    /// Model output, optionally carrying tool call requests.
    Assistant {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    /// The outcome of a single tool call, answering an assistant request.
    ToolResult { id: String, content: String },
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
        }
    }

    /// Create an assistant message with no tool calls.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Create an assistant message carrying tool call requests.
    pub fn assistant_with_tool_calls(
        content: impl Into<String>,
        tool_calls: Vec<ToolCall>,
    ) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls,
        }
    }

    /// Create a tool result answering the tool call with the given id.
    pub fn tool_result(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            id: id.into(),
            content: content.into(),
        }
    }

    /// Whether this is a system message.
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System { .. })
    }

    /// Whether this is a tool result message.
    pub fn is_tool_result(&self) -> bool {
        matches!(self, Self::ToolResult { .. })
    }

    /// Whether this message carries tool call requests that expect results.
    pub fn has_tool_calls(&self) -> bool {
        matches!(self, Self::Assistant { tool_calls, .. } if !tool_calls.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        assert!(ChatMessage::system("s").is_system());
        assert!(!ChatMessage::user("u").is_system());
        assert!(ChatMessage::tool_result("c1", "ok").is_tool_result());
        assert!(!ChatMessage::assistant("a").is_tool_result());
    }

    #[test]
    fn test_has_tool_calls_requires_nonempty_requests() {
        assert!(!ChatMessage::assistant("plain answer").has_tool_calls());

        let call = ToolCall::new("c1", "read_file", serde_json::json!({"path": "src/lib.rs"}));
        assert!(ChatMessage::assistant_with_tool_calls("", vec![call]).has_tool_calls());
    }

    #[test]
    fn test_system_equality_is_by_content() {
        assert_eq!(ChatMessage::system("a"), ChatMessage::system("a"));
        assert_ne!(ChatMessage::system("a"), ChatMessage::system("b"));
    }
}
