//! Bill record builder and history store.
//!
//! Finalizing a bill snapshots its diners and items into a `SavedBill` and
//! prepends it to the history, which keeps only the most recent bills.
//! Recording the diners' names as frequent is a separate step, taken by the
//! caller after `finalize` succeeds.

use anyhow::Result;
use chrono::Utc;
use log::{info, warn};
use shared::{Diner, DivisionMode, Item, SavedBill};

use crate::backend::storage::BillHistoryRepository;

/// Number of bills kept in history
pub const MAX_SAVED_BILLS: usize = 20;

#[derive(Clone)]
pub struct BillHistoryService {
    repository: BillHistoryRepository,
}

impl BillHistoryService {
    pub fn new(repository: BillHistoryRepository) -> Self {
        Self { repository }
    }

    /// Snapshot a bill into history, newest first.
    ///
    /// Diners and items are copied, so later edits to the live bill never
    /// reach the saved record. There is no deduplication: callers must
    /// finalize a bill session only once.
    pub fn finalize(
        &self,
        diners: &[Diner],
        items: &[Item],
        service_percent: f64,
        currency: &str,
        grand_total: f64,
        division_mode: DivisionMode,
    ) -> Result<SavedBill> {
        let bill = SavedBill {
            id: uuid::Uuid::new_v4().to_string(),
            date: Utc::now().to_rfc3339(),
            diners: diners.to_vec(),
            items: items.to_vec(),
            service_percent,
            currency: currency.to_string(),
            total: grand_total,
            division_mode,
        };

        let mut bills = self.repository.list_bills();
        bills.insert(0, bill.clone());
        if bills.len() > MAX_SAVED_BILLS {
            let evicted = bills.len() - MAX_SAVED_BILLS;
            bills.truncate(MAX_SAVED_BILLS);
            info!("History full, evicted {} oldest bills", evicted);
        }
        self.repository.save_bills(&bills)?;

        info!(
            "Saved bill {} with {} diners and {} items, total {:.2} {}",
            bill.id,
            bill.diners.len(),
            bill.items.len(),
            bill.total,
            bill.currency
        );
        Ok(bill)
    }

    /// All saved bills, newest first
    pub fn list_bills(&self) -> Vec<SavedBill> {
        self.repository.list_bills()
    }

    pub fn get_bill(&self, bill_id: &str) -> Option<SavedBill> {
        self.repository
            .list_bills()
            .into_iter()
            .find(|bill| bill.id == bill_id)
    }

    /// Remove a bill from history
    /// Returns true if the bill was found and deleted
    pub fn delete_bill(&self, bill_id: &str) -> Result<bool> {
        let mut bills = self.repository.list_bills();
        let before = bills.len();
        bills.retain(|bill| bill.id != bill_id);

        if bills.len() == before {
            warn!("Bill not found for deletion: {}", bill_id);
            return Ok(false);
        }

        self.repository.save_bills(&bills)?;
        info!("Deleted bill {}", bill_id);
        Ok(true)
    }
}
