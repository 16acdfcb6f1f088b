//! Owned registry service with an explicit load/save lifecycle.
//!
//! One of these is created at startup and shared (`Arc`) by the command
//! handlers and the scheduled delivery task. All mutation goes through the
//! inner mutex, so delivery snapshots never observe a half-written record.

use std::sync::Mutex;

use tracing::error;

use epiwatch_core::{ChatIdentity, Destination};

use crate::error::Result;
use crate::registry::DestinationRegistry;
use crate::store::RegistryStore;

pub struct RegistryService {
    inner: Mutex<DestinationRegistry>,
    store: RegistryStore,
}

impl RegistryService {
    /// Load the registry from `store`; a failed load starts empty so the
    /// bot still comes up (the file is not rewritten until a mutation).
    pub fn open(store: RegistryStore) -> Self {
        let registry = match store.load() {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, "registry load failed, starting empty");
                DestinationRegistry::new()
            }
        };
        Self {
            inner: Mutex::new(registry),
            store,
        }
    }

    /// Upsert an authorization and persist.
    pub fn authorize(&self, chat: ChatIdentity, topic_id: Option<i64>) {
        let mut reg = self.lock();
        reg.authorize(chat, topic_id);
        self.save_locked(&reg);
    }

    /// Re-route an authorized chat and persist. `NotAuthorized` leaves both
    /// memory and storage untouched.
    pub fn set_topic(&self, chat: &ChatIdentity, topic_id: Option<i64>) -> Result<()> {
        let mut reg = self.lock();
        reg.set_topic(chat, topic_id)?;
        self.save_locked(&reg);
        Ok(())
    }

    pub fn is_authorized(&self, chat: &ChatIdentity) -> bool {
        self.lock().is_authorized(chat)
    }

    pub fn topic_of(&self, chat: &ChatIdentity) -> Option<i64> {
        self.lock().topic_of(chat)
    }

    /// Point-in-time copy for a delivery run.
    pub fn snapshot(&self) -> Vec<Destination> {
        self.lock().snapshot()
    }

    /// Persist the current state — called once more at graceful shutdown.
    pub fn save(&self) {
        let reg = self.lock();
        self.save_locked(&reg);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DestinationRegistry> {
        // A poisoned lock only means a panic mid-read; the map itself is
        // still consistent, every mutation is a single insert.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Save failures are logged, never propagated: in-memory state remains
    /// authoritative and the next successful save reconciles the file.
    fn save_locked(&self, registry: &DestinationRegistry) {
        if let Err(e) = self.store.save(registry) {
            error!(error = %e, "registry save failed, keeping in-memory state");
        }
    }
}
