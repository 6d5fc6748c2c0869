//! Transient scope of the storage bridge
//!
//! Holds the entries of one upload attempt: the encoded file, the raw
//! extraction response and the edited field snapshot. Values are
//! serialized to JSON text on write and parsed on read; a missing or
//! malformed entry reads as absence, never as an error.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use invio_common::Result;

/// In-memory string-keyed store with JSON-text values.
///
/// Cheap to clone; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct TransientStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl TransientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize and store a value under `key`, replacing any prior entry.
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let text = serde_json::to_string(value)?;
        self.entries.write().await.insert(key.to_string(), text);
        Ok(())
    }

    /// Read and parse the value under `key`.
    ///
    /// Missing and malformed entries both read as `None`; malformed text
    /// is logged and discarded.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let text = self.entries.read().await.get(key).cloned()?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Discarding malformed transient entry");
                None
            }
        }
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn remove(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    /// Drop every entry of the current attempt.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
