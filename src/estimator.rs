//! Fast token estimation without external dependencies.
//!
//! Uses character-based heuristics optimized for code-heavy content.
//! The 3.4 chars/token ratio accounts for code's higher symbol density
//! compared to natural language prose (~4.0 chars/token).

use crate::message::{ChatMessage, ToolCall};

/// Characters per token ratio, optimized for code-heavy content.
/// Natural language is typically ~4.0, code is ~3.0-3.5.
const CHARS_PER_TOKEN: f32 = 3.4;

/// Overhead tokens per message for role and formatting.
const MESSAGE_OVERHEAD: usize = 4;

/// Estimate token count for a text string.
#[inline]
pub fn estimate_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    (text.len() as f32 / CHARS_PER_TOKEN).ceil() as usize
}

/// Trait for pluggable token estimation.
///
/// Estimates must be deterministic and side-effect free. The sequence
/// figure and the per-message figures are assumed consistent: the window
/// maintains its running total by subtracting per-message estimates from
/// an initial sequence estimate, so an implementation whose sequence
/// figure is not the sum of its per-message figures may over- or
/// under-evict. The default [`estimate_messages`](TokenEstimator::estimate_messages)
/// keeps the two consistent by construction.
pub trait TokenEstimator: Send + Sync {
    /// Estimate the token count of a single message.
    fn estimate_message(&self, message: &ChatMessage) -> usize;

    /// Estimate the token count of a sequence of messages.
    fn estimate_messages(&self, messages: &[ChatMessage]) -> usize {
        messages.iter().map(|m| self.estimate_message(m)).sum()
    }
}

/// Character-ratio estimator for when exact token counts are not required.
///
/// Tool calls are charged for their name and JSON arguments; tool results
/// for their call id and content.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenEstimator;

impl TokenEstimator for HeuristicTokenEstimator {
    fn estimate_message(&self, message: &ChatMessage) -> usize {
        let content_tokens = match message {
            ChatMessage::System { content } | ChatMessage::User { content } => {
                estimate_tokens(content)
            }
            ChatMessage::Assistant {
                content,
                tool_calls,
            } => {
                estimate_tokens(content)
                    + tool_calls
                        .iter()
                        .map(estimate_tool_call_tokens)
                        .sum::<usize>()
            }
            ChatMessage::ToolResult { id, content } => {
                estimate_tokens(id) + estimate_tokens(content)
            }
        };
        content_tokens + MESSAGE_OVERHEAD
    }
}

fn estimate_tool_call_tokens(tool_call: &ToolCall) -> usize {
    estimate_tokens(&tool_call.name) + estimate_tokens(&tool_call.arguments.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_empty() {
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn test_estimate_tokens_short() {
        // "hello" = 5 chars / 3.4 = 1.47 -> ceil = 2
        assert_eq!(estimate_tokens("hello"), 2);
    }

    #[test]
    fn test_estimate_tokens_longer() {
        // 340 chars should be ~100 tokens
        let text = "a".repeat(340);
        assert_eq!(estimate_tokens(&text), 100);
    }

    #[test]
    fn test_message_overhead_applied() {
        let estimator = HeuristicTokenEstimator;
        // "hello" estimates to 2 tokens + 4 overhead
        assert_eq!(estimator.estimate_message(&ChatMessage::user("hello")), 6);
        // Empty content still pays the per-message overhead
        assert_eq!(estimator.estimate_message(&ChatMessage::user("")), 4);
    }

    #[test]
    fn test_tool_call_arguments_are_charged() {
        let estimator = HeuristicTokenEstimator;
        let plain = estimator.estimate_message(&ChatMessage::assistant("ok"));
        let with_call = estimator.estimate_message(&ChatMessage::assistant_with_tool_calls(
            "ok",
            vec![crate::message::ToolCall::new(
                "c1",
                "read_file",
                serde_json::json!({"path": "src/main.rs"}),
            )],
        ));
        assert!(with_call > plain);
    }

    #[test]
    fn test_sequence_estimate_is_sum_of_messages() {
        let estimator = HeuristicTokenEstimator;
        let messages = vec![
            ChatMessage::user("Hello"),
            ChatMessage::assistant("Hi there!"),
            ChatMessage::tool_result("c1", "done"),
        ];
        let sum: usize = messages
            .iter()
            .map(|m| estimator.estimate_message(m))
            .sum();
        assert_eq!(estimator.estimate_messages(&messages), sum);
    }
}
