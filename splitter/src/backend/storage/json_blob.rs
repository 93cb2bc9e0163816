//! Typed access to a single JSON blob in a key-value store.
//!
//! Reads fail open: a missing, unreadable or malformed blob loads as `None`
//! and is logged, never returned as an error. Writes propagate failures.

use anyhow::Result;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

use super::traits::KeyValueStore;

pub struct JsonBlob<T> {
    store: Arc<dyn KeyValueStore>,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for JsonBlob<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key,
            _marker: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> JsonBlob<T> {
    pub fn new(store: Arc<dyn KeyValueStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    /// Load and decode the blob; any failure reads as "nothing stored"
    pub fn load(&self) -> Option<T> {
        let raw = match self.store.get(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read '{}', treating it as empty: {}", self.key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!("Loaded '{}' ({} bytes)", self.key, raw.len());
                Some(value)
            }
            Err(e) => {
                warn!("Stored '{}' is corrupt, treating it as empty: {}", self.key, e);
                None
            }
        }
    }

    /// Encode and overwrite the blob
    pub fn save(&self, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(self.key, &raw)?;
        debug!("Saved '{}' ({} bytes)", self.key, raw.len());
        Ok(())
    }

    /// Remove the blob; true if one existed
    pub fn clear(&self) -> Result<bool> {
        self.store.remove(self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::memory::MemoryStore;

    #[test]
    fn test_missing_blob_loads_none() {
        let blob: JsonBlob<Vec<u32>> = JsonBlob::new(Arc::new(MemoryStore::new()), "numbers");
        assert!(blob.load().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let blob: JsonBlob<Vec<u32>> = JsonBlob::new(Arc::new(MemoryStore::new()), "numbers");
        blob.save(&vec![3, 1, 2]).unwrap();
        assert_eq!(blob.load(), Some(vec![3, 1, 2]));
    }

    #[test]
    fn test_corrupt_blob_loads_none() {
        let store = MemoryStore::new();
        store.set("numbers", "{not json").unwrap();
        let blob: JsonBlob<Vec<u32>> = JsonBlob::new(Arc::new(store), "numbers");
        assert!(blob.load().is_none());
    }

    #[test]
    fn test_wrong_shape_loads_none() {
        let store = MemoryStore::new();
        store.set("numbers", r#"{"a":1}"#).unwrap();
        let blob: JsonBlob<Vec<u32>> = JsonBlob::new(Arc::new(store), "numbers");
        assert!(blob.load().is_none());
    }

    #[test]
    fn test_clear() {
        let blob: JsonBlob<bool> = JsonBlob::new(Arc::new(MemoryStore::new()), "flag");
        blob.save(&true).unwrap();
        assert!(blob.clear().unwrap());
        assert!(blob.load().is_none());
        assert!(!blob.clear().unwrap());
    }
}
