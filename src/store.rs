//! Message store abstraction and in-memory implementations.
//!
//! The store is the source of truth for a conversation's message
//! sequence. Memories load from it on every operation and write back full
//! replacements, so persistence, sharing and any per-conversation
//! serialization live behind this trait rather than inside the memory.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::message::ChatMessage;
use crate::traits::MemoryError;

/// Keyed persistence for conversation message sequences.
///
/// `update_messages` has full-replace semantics; there is no partial
/// update contract. A store shared across concurrent callers must provide
/// any per-id mutual exclusion itself: the memory issues independent load
/// and store calls and assumes at most one in-flight operation per id
/// otherwise. Failures from custom implementations surface as
/// [`MemoryError::Store`] and are propagated to the caller unmodified.
pub trait MessageStore: Send + Sync {
    /// The stored sequence for `id`, oldest first. Empty for unknown ids.
    fn get_messages(&self, id: &str) -> Result<Vec<ChatMessage>, MemoryError>;

    /// Replace the stored sequence for `id`.
    fn update_messages(&self, id: &str, messages: Vec<ChatMessage>) -> Result<(), MemoryError>;

    /// Remove all stored state for `id`. Safe to call when nothing is stored.
    fn delete_messages(&self, id: &str) -> Result<(), MemoryError>;
}

/// Map-backed store holding one sequence per conversation id.
///
/// Process-local; nothing survives a restart. Suitable for sharing one
/// store across several memories with distinct ids.
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    slots: Mutex<HashMap<String, Vec<ChatMessage>>>,
}

impl InMemoryMessageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageStore for InMemoryMessageStore {
    fn get_messages(&self, id: &str) -> Result<Vec<ChatMessage>, MemoryError> {
        let slots = self.slots.lock().unwrap();
        Ok(slots.get(id).cloned().unwrap_or_default())
    }

    fn update_messages(&self, id: &str, messages: Vec<ChatMessage>) -> Result<(), MemoryError> {
        let mut slots = self.slots.lock().unwrap();
        slots.insert(id.to_string(), messages);
        Ok(())
    }

    fn delete_messages(&self, id: &str) -> Result<(), MemoryError> {
        let mut slots = self.slots.lock().unwrap();
        slots.remove(id);
        Ok(())
    }
}

/// Single-slot store holding exactly one sequence.
///
/// This is the default store a memory is built with when the caller does
/// not supply one. It is private to that memory and scoped to its id, so
/// the id argument carries no information and is ignored.
#[derive(Debug, Default)]
pub struct SingleSlotStore {
    messages: Mutex<Vec<ChatMessage>>,
}

impl SingleSlotStore {
    /// Create an empty single-slot store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageStore for SingleSlotStore {
    fn get_messages(&self, _id: &str) -> Result<Vec<ChatMessage>, MemoryError> {
        Ok(self.messages.lock().unwrap().clone())
    }

    fn update_messages(&self, _id: &str, messages: Vec<ChatMessage>) -> Result<(), MemoryError> {
        *self.messages.lock().unwrap() = messages;
        Ok(())
    }

    fn delete_messages(&self, _id: &str) -> Result<(), MemoryError> {
        self.messages.lock().unwrap().clear();
        Ok(())
    }
}
