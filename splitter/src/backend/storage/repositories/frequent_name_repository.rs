//! The frequent-name registry, stored pre-sorted as one JSON array.

use anyhow::Result;
use shared::FrequentDiner;
use std::sync::Arc;

use crate::backend::storage::json_blob::JsonBlob;
use crate::backend::storage::traits::KeyValueStore;

pub const FREQUENT_DINERS_KEY: &str = "frequent-diners";

#[derive(Clone)]
pub struct FrequentNameRepository {
    registry: JsonBlob<Vec<FrequentDiner>>,
}

impl FrequentNameRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            registry: JsonBlob::new(store, FREQUENT_DINERS_KEY),
        }
    }

    /// Registry entries in stored order; empty if missing or corrupt
    pub fn list_entries(&self) -> Vec<FrequentDiner> {
        self.registry.load().unwrap_or_default()
    }

    pub fn save_entries(&self, entries: &[FrequentDiner]) -> Result<()> {
        self.registry.save(&entries.to_vec())
    }
}
