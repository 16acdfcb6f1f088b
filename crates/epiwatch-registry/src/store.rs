//! JSON file persistence for the registry.
//!
//! The file is a JSON array. Current shape:
//! `[{"chatId": <string|int>, "topicId": <int|null>}, ...]`; legacy shape:
//! `[<string|int>, ...]`. Both are accepted on read, resolved once at load
//! into an explicit union; the writer always emits the current shape, so a
//! legacy file upgrades on the first save.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use epiwatch_core::ChatIdentity;

use crate::error::Result;
use crate::registry::DestinationRegistry;

/// One record of the current on-disk shape.
#[derive(Debug, Serialize, Deserialize)]
struct CurrentEntry {
    #[serde(rename = "chatId")]
    chat_id: ChatIdentity,
    #[serde(rename = "topicId")]
    topic_id: Option<i64>,
}

/// Either on-disk shape, decided per record at deserialization time.
///
/// `Current` must come first: a bare object would otherwise never be tried
/// against the record shape.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Current(CurrentEntry),
    Legacy(ChatIdentity),
}

/// Reads and writes the registry storage file.
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the registry from storage.
    ///
    /// A missing file yields an empty registry, not an error. Legacy
    /// entries gain `topic_id = None` in memory; the file itself is left
    /// untouched until the next save.
    pub fn load(&self) -> Result<DestinationRegistry> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no storage file, starting with empty registry");
            return Ok(DestinationRegistry::new());
        }

        let data = fs::read_to_string(&self.path)?;
        let entries: Vec<StoredEntry> = serde_json::from_str(&data)?;

        let mut registry = DestinationRegistry::new();
        let mut upgraded = 0usize;
        for entry in entries {
            match entry {
                StoredEntry::Current(e) => registry.authorize(e.chat_id, e.topic_id),
                StoredEntry::Legacy(chat) => {
                    upgraded += 1;
                    registry.authorize(chat, None);
                }
            }
        }

        if upgraded > 0 {
            info!(count = upgraded, "upgraded legacy entries (topic = general)");
        }
        info!(count = registry.len(), "registry loaded");
        Ok(registry)
    }

    /// Persist the registry in the current shape.
    pub fn save(&self, registry: &DestinationRegistry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries: Vec<CurrentEntry> = registry
            .snapshot()
            .into_iter()
            .map(|d| CurrentEntry {
                chat_id: d.chat,
                topic_id: d.topic_id,
            })
            .collect();

        let data = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, data)?;
        debug!(count = entries.len(), path = %self.path.display(), "registry saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> RegistryStore {
        let path = std::env::temp_dir().join(format!(
            "epiwatch-store-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        RegistryStore::new(path)
    }

    #[test]
    fn missing_file_loads_empty_registry() {
        let store = temp_store("missing");
        let registry = store.load().unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn legacy_shape_upgrades_losslessly() {
        let store = temp_store("legacy");
        fs::write(store.path(), r#"[-100123, "-100456"]"#).unwrap();

        let registry = store.load().unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.is_authorized(&ChatIdentity::Int(-100123)));
        assert!(registry.is_authorized(&ChatIdentity::Str("-100456".into())));
        assert_eq!(registry.topic_of(&ChatIdentity::Int(-100123)), None);
    }

    #[test]
    fn save_after_legacy_load_emits_current_shape() {
        let store = temp_store("upgrade");
        fs::write(store.path(), r#"[-1, -2]"#).unwrap();

        let registry = store.load().unwrap();
        store.save(&registry).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 2);
        for record in &parsed {
            assert!(record.get("chatId").is_some());
            assert!(record.get("topicId").is_some());
            assert!(record["topicId"].is_null());
        }

        // Idempotent after one load/save cycle (record order is free).
        let reloaded = store.load().unwrap();
        store.save(&reloaded).unwrap();
        let raw2 = fs::read_to_string(store.path()).unwrap();
        let mut a: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        let mut b: Vec<serde_json::Value> = serde_json::from_str(&raw2).unwrap();
        a.sort_by_key(|v| v["chatId"].to_string());
        b.sort_by_key(|v| v["chatId"].to_string());
        assert_eq!(a, b);
    }

    #[test]
    fn current_shape_round_trips() {
        let store = temp_store("roundtrip");
        let mut registry = DestinationRegistry::new();
        registry.authorize(ChatIdentity::Int(-100123), Some(17));
        registry.authorize(ChatIdentity::Str("legacy".into()), None);
        store.save(&registry).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.topic_of(&ChatIdentity::Int(-100123)), Some(17));
        assert!(reloaded.is_authorized(&ChatIdentity::Str("legacy".into())));
    }

    #[test]
    fn mixed_shapes_in_one_file_are_accepted() {
        let store = temp_store("mixed");
        fs::write(
            store.path(),
            r#"[-1, {"chatId": -2, "topicId": 9}]"#,
        )
        .unwrap();

        let registry = store.load().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.topic_of(&ChatIdentity::Int(-2)), Some(9));
        assert_eq!(registry.topic_of(&ChatIdentity::Int(-1)), None);
    }
}
