//! Turn domain results into display-ready response DTOs.

use shared::{
    AppSettings, BillDraft, BillDraftResponse, BillSummary, BillSummaryResponse, DinerSummary,
    DivisionMode, FormattedDinerSummary,
};

use crate::backend::domain::money::format_currency;

pub struct SummaryMapper;

impl SummaryMapper {
    pub fn to_formatted_diner(line: &DinerSummary, currency: &str) -> FormattedDinerSummary {
        FormattedDinerSummary {
            diner_id: line.diner.id.clone(),
            name: line.diner.name.clone(),
            paid: line.diner.paid,
            subtotal: format_currency(line.subtotal, currency),
            service: format_currency(line.service, currency),
            total: format_currency(line.total, currency),
        }
    }

    pub fn to_summary_response(
        summary: BillSummary,
        settings: &AppSettings,
        division_mode: DivisionMode,
    ) -> BillSummaryResponse {
        let formatted_diners = summary
            .per_diner
            .iter()
            .map(|line| Self::to_formatted_diner(line, &settings.currency))
            .collect();
        let formatted_grand_total = format_currency(summary.grand_total, &settings.currency);
        let paid_count = summary.paid_count();

        BillSummaryResponse {
            summary,
            formatted_diners,
            formatted_grand_total,
            service_percent: settings.service_percent,
            currency: settings.currency.clone(),
            division_mode,
            paid_count,
        }
    }
}

pub struct DraftMapper;

impl DraftMapper {
    pub fn to_draft_response(draft: BillDraft, items_total: f64, currency: &str) -> BillDraftResponse {
        BillDraftResponse {
            draft,
            formatted_items_total: format_currency(items_total, currency),
        }
    }
}
