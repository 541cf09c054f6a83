//! Saved API key labels.
//!
//! Entries live as a JSON array in the `etl_api_keys_v1` slot of a
//! [`KeyValueStore`]. The list is read once when the store is opened and
//! written back after every mutation. Keys are kept in plain text.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::kv::KeyValueStore;
use crate::error::{CliError, StorageError};

pub const KEYS_SLOT: &str = "etl_api_keys_v1";
pub const DEFAULT_PROVIDER: &str = "custom";
pub const PROVIDERS: [&str; 4] = ["custom", "openai", "newsapi", "googlemaps"];

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyEntry {
    pub id: String,
    pub label: String,
    pub provider: String,
    pub key: String,
    pub created_at: DateTime<Utc>,
}

impl ApiKeyEntry {
    pub fn masked_key(&self) -> String {
        masked(&self.key)
    }
}

/// `********` for short keys, otherwise the first and last four characters.
pub fn masked(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "********".to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", head, tail)
}

fn new_id(now: DateTime<Utc>) -> String {
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    let stamp = now.timestamp_nanos_opt().unwrap_or_default();
    format!("{:x}{:04x}", stamp, seq & 0xffff)
}

pub struct KeyStore {
    store: Box<dyn KeyValueStore>,
    entries: Vec<ApiKeyEntry>,
}

impl KeyStore {
    /// Read the slot. An unreadable or corrupt slot starts an empty list.
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let entries = match Self::read(store.as_ref()) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Starting with an empty key list: {}", e);
                Vec::new()
            }
        };

        Self { store, entries }
    }

    fn read(store: &dyn KeyValueStore) -> Result<Vec<ApiKeyEntry>, StorageError> {
        match store.get(KEYS_SLOT)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StorageError::CorruptSlot {
                slot: KEYS_SLOT.to_string(),
                message: e.to_string(),
            }),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&self) -> crate::Result<()> {
        let raw = serde_json::to_string(&self.entries).map_err(|e| StorageError::CorruptSlot {
            slot: KEYS_SLOT.to_string(),
            message: e.to_string(),
        })?;
        self.store.set(KEYS_SLOT, &raw)?;
        Ok(())
    }

    /// Newest first.
    pub fn list(&self) -> &[ApiKeyEntry] {
        &self.entries
    }

    pub fn find(&self, id: &str) -> Option<&ApiKeyEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Validate and prepend a new entry. `provider` defaults to `custom`.
    pub fn add(&mut self, label: &str, provider: Option<&str>, key: &str) -> crate::Result<ApiKeyEntry> {
        let label = label.trim();
        let key = key.trim();
        let provider = provider.map(str::trim).unwrap_or(DEFAULT_PROVIDER);

        if label.is_empty() {
            return Err(CliError::InvalidArguments("Label cannot be empty".to_string()).into());
        }
        if key.is_empty() {
            return Err(CliError::InvalidArguments("Key cannot be empty".to_string()).into());
        }
        if !PROVIDERS.contains(&provider) {
            return Err(CliError::InvalidArguments(format!(
                "Unknown provider '{}': expected one of {}",
                provider,
                PROVIDERS.join(", ")
            ))
            .into());
        }

        let now = Utc::now();
        let entry = ApiKeyEntry {
            id: new_id(now),
            label: label.to_string(),
            provider: provider.to_string(),
            key: key.to_string(),
            created_at: now,
        };

        self.entries.insert(0, entry.clone());
        self.persist()?;
        log::info!("Saved key '{}' ({})", entry.label, entry.provider);
        Ok(entry)
    }

    pub fn remove(&mut self, id: &str) -> crate::Result<ApiKeyEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| CliError::KeyNotFound { id: id.to_string() })?;

        let removed = self.entries.remove(index);
        self.persist()?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::storage::kv::{FileStore, MemoryStore};
    use tempfile::tempdir;

    #[test]
    fn test_masking() {
        assert_eq!(masked(""), "********");
        assert_eq!(masked("12345678"), "********");
        assert_eq!(masked("sk-abcdefgh1234"), "sk-a****1234");
        assert_eq!(masked("ключ-секретный"), "ключ****тный");
    }

    #[test]
    fn test_add_prepends_and_trims() {
        let mut keys = KeyStore::open(Box::new(MemoryStore::new()));
        keys.add("  Maps ", Some("googlemaps"), " AIzaSyExample0001 ")
            .expect("first add");
        let second = keys.add("News", None, "newskey-123456").expect("second add");

        let list = keys.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], second);
        assert_eq!(list[0].provider, "custom");
        assert_eq!(list[1].label, "Maps");
        assert_eq!(list[1].key, "AIzaSyExample0001");
        assert_ne!(list[0].id, list[1].id);
    }

    #[test]
    fn test_add_rejects_blank_and_unknown_provider() {
        let mut keys = KeyStore::open(Box::new(MemoryStore::new()));
        assert!(matches!(
            keys.add("   ", None, "secret-value"),
            Err(AppError::Cli(CliError::InvalidArguments(_)))
        ));
        assert!(keys.add("label", None, "  ").is_err());
        assert!(keys.add("label", Some("aws"), "secret-value").is_err());
        assert!(keys.list().is_empty());
    }

    #[test]
    fn test_remove_unknown_id() {
        let mut keys = KeyStore::open(Box::new(MemoryStore::new()));
        let err = keys.remove("nope").expect_err("should fail");
        assert!(matches!(err, AppError::Cli(CliError::KeyNotFound { .. })));
    }

    #[test]
    fn test_entries_survive_reopen() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let id = {
            let mut keys = KeyStore::open(Box::new(FileStore::new(temp_dir.path())));
            keys.add("OpenAI", Some("openai"), "sk-live-abcdef123456")
                .expect("add")
                .id
        };

        let raw = std::fs::read_to_string(temp_dir.path().join("etl_api_keys_v1.json"))
            .expect("slot file");
        assert!(raw.contains("\"createdAt\""));

        let mut keys = KeyStore::open(Box::new(FileStore::new(temp_dir.path())));
        assert_eq!(keys.find(&id).map(|e| e.label.as_str()), Some("OpenAI"));

        keys.remove(&id).expect("remove");
        let keys = KeyStore::open(Box::new(FileStore::new(temp_dir.path())));
        assert!(keys.list().is_empty());
    }

    #[test]
    fn test_corrupt_slot_starts_empty() {
        let store = MemoryStore::new();
        store.set(KEYS_SLOT, "{not json").expect("write");

        let keys = KeyStore::open(Box::new(store));
        assert!(keys.list().is_empty());
    }

    #[test]
    fn test_reads_browser_shaped_entries() {
        let store = MemoryStore::new();
        store
            .set(
                KEYS_SLOT,
                r#"[{"id":"a1","label":"Maps","provider":"googlemaps","key":"k","createdAt":"2024-05-01T10:00:00.000Z"}]"#,
            )
            .expect("write");

        let keys = KeyStore::open(Box::new(store));
        assert_eq!(keys.list()[0].provider, "googlemaps");
        assert_eq!(keys.list()[0].masked_key(), "********");
    }
}
