use std::collections::HashMap;

use tracing::info;

use epiwatch_core::{ChatIdentity, Destination};

use crate::error::{RegistryError, Result};

/// In-memory mapping of authorized chats to their delivery topics.
///
/// Keys are unique; insertion order is irrelevant. `None` as a topic routes
/// to the chat's general section.
#[derive(Debug, Default, Clone)]
pub struct DestinationRegistry {
    entries: HashMap<ChatIdentity, Option<i64>>,
}

impl DestinationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Authorize a chat, or re-route an already authorized one.
    ///
    /// Idempotent upsert — the stored topic is always overwritten, so a
    /// re-authorization changes routing (last write wins).
    pub fn authorize(&mut self, chat: ChatIdentity, topic_id: Option<i64>) {
        info!(chat = %chat, topic = ?topic_id, "chat authorized");
        self.entries.insert(chat, topic_id);
    }

    /// Change the topic of an already authorized chat.
    ///
    /// Fails with `NotAuthorized` (registry unchanged) when the chat was
    /// never authorized.
    pub fn set_topic(&mut self, chat: &ChatIdentity, topic_id: Option<i64>) -> Result<()> {
        match self.entries.get_mut(chat) {
            Some(slot) => {
                *slot = topic_id;
                info!(chat = %chat, topic = ?topic_id, "topic updated");
                Ok(())
            }
            None => Err(RegistryError::NotAuthorized {
                chat: chat.to_string(),
            }),
        }
    }

    pub fn is_authorized(&self, chat: &ChatIdentity) -> bool {
        self.entries.contains_key(chat)
    }

    /// Topic of an authorized chat; `None` both for "general section" and
    /// for an unknown chat — check [`Self::is_authorized`] first when the
    /// distinction matters.
    pub fn topic_of(&self, chat: &ChatIdentity) -> Option<i64> {
        self.entries.get(chat).copied().flatten()
    }

    /// Point-in-time copy of all destinations, safe to iterate during a
    /// delivery run while the registry keeps mutating.
    pub fn snapshot(&self) -> Vec<Destination> {
        self.entries
            .iter()
            .map(|(chat, topic_id)| Destination {
                chat: chat.clone(),
                topic_id: *topic_id,
            })
            .collect()
    }
}
