//! Sliding token window over a stored conversation.
//!
//! [`TokenWindowMemory`] retains as many of the most recent messages as
//! fit into a fixed token budget. Messages are indivisible: one that no
//! longer fits is evicted whole, oldest first. A system message at the
//! front of the window is skipped by eviction and only replaced by adding
//! a different one. An assistant message evicted while it still carries
//! tool call requests drags the tool results answering it out of the
//! window in the same pass.
//!
//! # Example
//! ```ignore
//! use chat_window::{ChatMemory, ChatMessage, HeuristicTokenEstimator, TokenWindowMemory};
//!
//! let memory = TokenWindowMemory::with_max_tokens(4096, HeuristicTokenEstimator)?;
//! memory.add(ChatMessage::system("You are a helpful assistant."))?;
//! memory.add(ChatMessage::user("Hello"))?;
//! let window = memory.messages()?;
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use crate::estimator::TokenEstimator;
use crate::message::ChatMessage;
use crate::store::{MessageStore, SingleSlotStore};
use crate::traits::{ChatMemory, MemoryError};

/// Conversation id used when none is configured.
pub const DEFAULT_ID: &str = "default";

/// Chat memory that keeps a conversation within a fixed token budget.
///
/// The memory holds no message state of its own: every operation loads
/// the sequence from its [`MessageStore`], applies the budget, and writes
/// back (on [`add`](ChatMemory::add)) or returns the result (on
/// [`messages`](ChatMemory::messages)). The budget is also applied on
/// read, so an externally mutated store or a lowered budget is reconciled
/// without a write.
pub struct TokenWindowMemory {
    id: String,
    max_tokens: usize,
    estimator: Arc<dyn TokenEstimator>,
    store: Arc<dyn MessageStore>,
}

impl TokenWindowMemory {
    /// Start building a memory.
    pub fn builder() -> TokenWindowMemoryBuilder {
        TokenWindowMemoryBuilder::default()
    }

    /// Memory with the given budget and estimator, the default id, and a
    /// private single-slot store.
    pub fn with_max_tokens(
        max_tokens: usize,
        estimator: impl TokenEstimator + 'static,
    ) -> Result<Self, MemoryError> {
        Self::builder()
            .max_tokens(max_tokens)
            .estimator(estimator)
            .build()
    }

    /// The token budget this window enforces.
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }
}

impl ChatMemory for TokenWindowMemory {
    fn id(&self) -> &str {
        &self.id
    }

    fn add(&self, message: ChatMessage) -> Result<(), MemoryError> {
        let mut messages: VecDeque<ChatMessage> = self.store.get_messages(&self.id)?.into();

        if message.is_system() {
            if let Some(index) = messages.iter().position(ChatMessage::is_system) {
                if messages[index] == message {
                    // Same system message already present: nothing to store.
                    return Ok(());
                }
                // A differing system message replaces the previous one.
                messages.remove(index);
            }
        }

        messages.push_back(message);
        enforce_token_budget(&mut messages, self.max_tokens, self.estimator.as_ref());
        self.store.update_messages(&self.id, messages.into())
    }

    fn messages(&self) -> Result<Vec<ChatMessage>, MemoryError> {
        let mut messages: VecDeque<ChatMessage> = self.store.get_messages(&self.id)?.into();
        enforce_token_budget(&mut messages, self.max_tokens, self.estimator.as_ref());
        Ok(messages.into())
    }

    fn clear(&self) -> Result<(), MemoryError> {
        self.store.delete_messages(&self.id)
    }
}

/// Builder for [`TokenWindowMemory`].
///
/// `max_tokens` and `estimator` are required; `id` defaults to
/// [`DEFAULT_ID`] and `store` to a private [`SingleSlotStore`].
#[derive(Default)]
pub struct TokenWindowMemoryBuilder {
    id: Option<String>,
    max_tokens: Option<usize>,
    estimator: Option<Arc<dyn TokenEstimator>>,
    store: Option<Arc<dyn MessageStore>>,
}

impl TokenWindowMemoryBuilder {
    /// Set the conversation id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the token budget. Must be greater than zero.
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the token estimator.
    pub fn estimator(mut self, estimator: impl TokenEstimator + 'static) -> Self {
        self.estimator = Some(Arc::new(estimator));
        self
    }

    /// Set the message store.
    pub fn store(mut self, store: impl MessageStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set an already shared message store (useful when several memories
    /// with distinct ids share one store).
    pub fn store_arc(mut self, store: Arc<dyn MessageStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the memory, validating its configuration.
    pub fn build(self) -> Result<TokenWindowMemory, MemoryError> {
        let max_tokens = match self.max_tokens {
            Some(max_tokens) if max_tokens > 0 => max_tokens,
            Some(_) => {
                return Err(MemoryError::InvalidConfiguration(
                    "max_tokens must be greater than zero".into(),
                ))
            }
            None => {
                return Err(MemoryError::InvalidConfiguration(
                    "max_tokens is required".into(),
                ))
            }
        };
        let estimator = self.estimator.ok_or_else(|| {
            MemoryError::InvalidConfiguration("a token estimator is required".into())
        })?;

        Ok(TokenWindowMemory {
            id: self.id.unwrap_or_else(|| DEFAULT_ID.to_string()),
            max_tokens,
            estimator,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(SingleSlotStore::new())),
        })
    }
}

/// Evict messages until the sequence fits `max_tokens`.
///
/// Eviction removes from the front of the window, skipping a leading
/// system message. A lone system message is retained even over budget:
/// messages are indivisible, so the loop stops rather than empty the
/// window. The running total is seeded from the sequence estimate and
/// maintained by subtracting each evicted message's own estimate.
///
/// When an evicted assistant message still carries tool call requests,
/// the tool results immediately following it are evicted in the same
/// pass. Some providers (e.g. OpenAI) reject requests containing tool
/// results whose originating tool call is missing. The cascade stops at
/// the first message of any other kind.
fn enforce_token_budget(
    messages: &mut VecDeque<ChatMessage>,
    max_tokens: usize,
    estimator: &dyn TokenEstimator,
) {
    if messages.is_empty() {
        return;
    }

    let mut total_tokens = estimator.estimate_messages(messages.make_contiguous());
    while total_tokens > max_tokens && !messages.is_empty() {
        let mut evict_index = 0;
        if messages[0].is_system() {
            if messages.len() == 1 {
                // A lone system message is retained as-is.
                return;
            }
            evict_index = 1;
        }

        let Some(evicted) = messages.remove(evict_index) else {
            break;
        };
        let evicted_tokens = estimator.estimate_message(&evicted);
        total_tokens = total_tokens.saturating_sub(evicted_tokens);
        tracing::trace!(
            "Evicting message ({} tokens) to satisfy the token budget: {:?}",
            evicted_tokens,
            evicted
        );

        if evicted.has_tool_calls() {
            while messages
                .get(evict_index)
                .is_some_and(ChatMessage::is_tool_result)
            {
                let Some(orphan) = messages.remove(evict_index) else {
                    break;
                };
                let orphan_tokens = estimator.estimate_message(&orphan);
                total_tokens = total_tokens.saturating_sub(orphan_tokens);
                tracing::trace!("Evicting orphaned tool result: {:?}", orphan);
            }
        }
    }
}
