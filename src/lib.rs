//! Token-bounded chat memory for building LLM powered applications.
//!
//! This crate keeps a conversation's message history inside a fixed token
//! budget. [`TokenWindowMemory`] operates as a sliding window: it retains
//! as many of the most recent messages as fit into the budget and evicts
//! the oldest ones when a new message no longer fits. Messages are
//! indivisible, so one that does not fit is evicted completely rather
//! than truncated.
//!
//! Two message kinds get special treatment. A system message, once added,
//! is retained at the front of the window and survives normal eviction;
//! adding a system message with identical content is ignored, while one
//! with different content replaces it. When an assistant message carrying
//! tool call requests is evicted, the tool results answering it are
//! evicted as well, since providers reject tool results without their
//! originating call.
//!
//! State lives in a pluggable [`MessageStore`]; token accounting goes
//! through a pluggable [`TokenEstimator`]. Defaults for both are provided.
//!
//! # Example
//! ```ignore
//! use chat_window::{ChatMemory, ChatMessage, HeuristicTokenEstimator, TokenWindowMemory};
//!
//! let memory = TokenWindowMemory::builder()
//!     .id("user-42")
//!     .max_tokens(4096)
//!     .estimator(HeuristicTokenEstimator)
//!     .build()?;
//!
//! memory.add(ChatMessage::system("You are a helpful assistant."))?;
//! memory.add(ChatMessage::user("What does this error mean?"))?;
//!
//! for message in memory.messages()? {
//!     println!("{message:?}");
//! }
//! ```

mod estimator;
mod message;
mod store;
mod token_window;
mod traits;

pub use estimator::{estimate_tokens, HeuristicTokenEstimator, TokenEstimator};
pub use message::{ChatMessage, ToolCall};
pub use store::{InMemoryMessageStore, MessageStore, SingleSlotStore};
pub use token_window::{TokenWindowMemory, TokenWindowMemoryBuilder, DEFAULT_ID};
pub use traits::{ChatMemory, MemoryError};
