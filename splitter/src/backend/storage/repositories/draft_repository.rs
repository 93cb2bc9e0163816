//! The in-progress bill, rewritten on every change.

use anyhow::Result;
use log::debug;
use shared::BillDraft;
use std::sync::Arc;

use crate::backend::storage::json_blob::JsonBlob;
use crate::backend::storage::traits::KeyValueStore;

pub const CURRENT_BILL_KEY: &str = "current-bill";

#[derive(Clone)]
pub struct DraftRepository {
    draft: JsonBlob<BillDraft>,
}

impl DraftRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            draft: JsonBlob::new(store, CURRENT_BILL_KEY),
        }
    }

    /// The stored draft, or a fresh one at the setup step
    pub fn load_draft(&self) -> BillDraft {
        self.draft.load().unwrap_or_default()
    }

    pub fn save_draft(&self, draft: &BillDraft) -> Result<()> {
        self.draft.save(draft)
    }

    pub fn clear_draft(&self) -> Result<()> {
        if self.draft.clear()? {
            debug!("Cleared in-progress bill");
        }
        Ok(())
    }
}
