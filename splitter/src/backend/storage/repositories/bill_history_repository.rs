//! Completed bills, stored newest first as one JSON array.

use anyhow::Result;
use shared::SavedBill;
use std::sync::Arc;

use crate::backend::storage::json_blob::JsonBlob;
use crate::backend::storage::traits::KeyValueStore;

pub const BILLS_KEY: &str = "bills";

#[derive(Clone)]
pub struct BillHistoryRepository {
    bills: JsonBlob<Vec<SavedBill>>,
}

impl BillHistoryRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            bills: JsonBlob::new(store, BILLS_KEY),
        }
    }

    /// All stored bills; empty if the history is missing or corrupt
    pub fn list_bills(&self) -> Vec<SavedBill> {
        self.bills.load().unwrap_or_default()
    }

    /// Overwrite the whole history
    pub fn save_bills(&self, bills: &[SavedBill]) -> Result<()> {
        self.bills.save(&bills.to_vec())
    }
}
