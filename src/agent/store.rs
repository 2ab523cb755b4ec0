//! Conversation store
//!
//! Durable per-conversation message logs keyed by an opaque identifier.
//! The store is the sole source of truth for what has been said so far.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::core::Message;

/// Process-wide map from conversation id to its ordered message log.
///
/// Logs are created implicitly on first append and removed explicitly by
/// `clear`. Entries are never reordered or mutated after append. Safe
/// under concurrent access from multiple in-flight conversations; one
/// active turn per conversation id is the expected usage pattern.
#[derive(Debug, Default)]
pub struct ConversationStore {
    logs: RwLock<HashMap<String, Vec<Message>>>,
}

impl ConversationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message to the end of a conversation's log,
    /// creating the log if absent
    pub fn append(&self, conversation_id: &str, message: Message) {
        let mut logs = self.logs.write().expect("conversation store poisoned");
        logs.entry(conversation_id.to_string())
            .or_default()
            .push(message);
    }

    /// Full ordered log for a conversation; empty if the id is unknown
    pub fn history(&self, conversation_id: &str) -> Vec<Message> {
        let logs = self.logs.read().expect("conversation store poisoned");
        logs.get(conversation_id).cloned().unwrap_or_default()
    }

    /// Number of messages in a conversation
    pub fn len(&self, conversation_id: &str) -> usize {
        let logs = self.logs.read().expect("conversation store poisoned");
        logs.get(conversation_id).map_or(0, Vec::len)
    }

    /// Whether a conversation has no messages
    pub fn is_empty(&self, conversation_id: &str) -> bool {
        self.len(conversation_id) == 0
    }

    /// Remove a conversation's log entirely; no-op for unknown ids
    pub fn clear(&self, conversation_id: &str) {
        let mut logs = self.logs.write().expect("conversation store poisoned");
        logs.remove(conversation_id);
    }

    /// Wipe every conversation
    pub fn clear_all(&self) {
        let mut logs = self.logs.write().expect("conversation store poisoned");
        logs.clear();
    }
}
