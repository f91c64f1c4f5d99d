//! Core trait for chat memory implementations.

use crate::message::ChatMessage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Invalid memory configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Message store error: {0}")]
    Store(Box<dyn std::error::Error + Send + Sync>),
}

/// Trait for chat memories backing an LLM conversation.
///
/// A chat memory decides which messages of a conversation remain visible
/// to the model, and in what order. Implementations keep their state in a
/// [`MessageStore`](crate::MessageStore) and rebuild it on every
/// call rather than caching it, so the store stays the single source of
/// truth even when it is mutated externally.
pub trait ChatMemory: Send + Sync {
    /// Identifier of the conversation this memory manages.
    fn id(&self) -> &str;

    /// Append a message, applying the memory's retention policy.
    fn add(&self, message: ChatMessage) -> Result<(), MemoryError>;

    /// The currently retained messages, oldest first.
    fn messages(&self) -> Result<Vec<ChatMessage>, MemoryError>;

    /// Drop all stored state for this conversation.
    fn clear(&self) -> Result<(), MemoryError>;
}
