//! Plain-text bill summary for sharing through a chat app.
//!
//! The text uses `*bold*` markers understood by common messengers and is
//! one-way: nothing parses it back.

use log::debug;
use shared::{BillSummary, SavedBill};

use crate::backend::domain::money::format_currency;
use crate::backend::domain::split_service::SplitService;

const APP_TITLE: &str = "Bill Splitter";
const RULE: &str = "─────────────────";

#[derive(Clone, Default)]
pub struct ShareService {
    split_service: SplitService,
}

impl ShareService {
    pub fn new() -> Self {
        Self {
            split_service: SplitService::new(),
        }
    }

    /// Share text for a computed summary
    pub fn share_text(&self, summary: &BillSummary, currency: &str) -> String {
        let mut text = String::new();
        text.push_str(&format!("*{}*\n\n", APP_TITLE));
        text.push_str("*Bill summary:*\n");
        text.push_str(RULE);
        text.push('\n');

        for line in &summary.per_diner {
            let status = if line.diner.paid { "Paid" } else { "Pending" };
            text.push_str(&format!(
                "[{}] {}: {}\n",
                status,
                line.diner.name,
                format_currency(line.total, currency)
            ));
        }

        text.push_str(RULE);
        text.push('\n');
        text.push_str(&format!(
            "*Table total: {}*\n",
            format_currency(summary.grand_total, currency)
        ));
        text.push_str(&format!(
            "Paid: {}/{}",
            summary.paid_count(),
            summary.per_diner.len()
        ));

        debug!("Built share text for {} diners", summary.per_diner.len());
        text
    }

    /// Share text for a bill from history, recomputed from its snapshot
    pub fn saved_bill_text(&self, bill: &SavedBill) -> String {
        let summary = self.split_service.compute_summaries(
            &bill.diners,
            &bill.items,
            bill.service_percent,
            bill.division_mode,
        );
        self.share_text(&summary, &bill.currency)
    }
}
