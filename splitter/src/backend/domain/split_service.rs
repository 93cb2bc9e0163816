//! Split allocation engine.
//!
//! Given the diners, the items and a service percentage, works out what each
//! diner owes. Two division modes are supported:
//!
//! - **Consumption**: each item is charged to its assignees. A shared item's
//!   price is divided among them; a per-person item charges every assignee
//!   the full price.
//! - **Equal**: the real cost of the whole table is divided evenly, ignoring
//!   assignments.
//!
//! The engine is pure. It only reads the slices it is given and returns
//! owned results, in the order of the `diners` slice. There is no failure
//! path: degenerate input (no diners, no items, items nobody is assigned to)
//! just produces zeros.

use log::debug;
use shared::{BillSummary, Diner, DinerSummary, DivisionMode, Item};

/// Service computing per-diner breakdowns
#[derive(Debug, Clone, Default)]
pub struct SplitService;

impl SplitService {
    pub fn new() -> Self {
        Self
    }

    /// Compute every diner's subtotal, service charge and total.
    ///
    /// `service_percent` is applied as given; range checks belong to the
    /// settings layer.
    pub fn compute_summaries(
        &self,
        diners: &[Diner],
        items: &[Item],
        service_percent: f64,
        mode: DivisionMode,
    ) -> BillSummary {
        let subtotals: Vec<f64> = match mode {
            DivisionMode::Consumption => diners
                .iter()
                .map(|diner| {
                    items
                        .iter()
                        .fold(0.0, |acc, item| acc + diner_share(item, diner, diners))
                })
                .collect(),
            DivisionMode::Equal => {
                if diners.is_empty() {
                    Vec::new()
                } else {
                    let per_capita = table_total(items, diners) / diners.len() as f64;
                    vec![per_capita; diners.len()]
                }
            }
        };

        let per_diner: Vec<DinerSummary> = diners
            .iter()
            .zip(subtotals)
            .map(|(diner, subtotal)| {
                let service = subtotal * service_percent / 100.0;
                DinerSummary {
                    diner: diner.clone(),
                    subtotal,
                    service,
                    total: subtotal + service,
                }
            })
            .collect();

        let grand_total = per_diner.iter().fold(0.0, |acc, s| acc + s.total);

        debug!(
            "Split {} items across {} diners ({} mode, {}% service): grand total {:.2}",
            items.len(),
            diners.len(),
            mode,
            service_percent,
            grand_total
        );

        BillSummary {
            per_diner,
            grand_total,
        }
    }
}

/// Diners an item is charged to, resolved against the current diner list.
///
/// `Everyone` means every diner present right now. Explicit ids that no
/// longer name a current diner are ignored.
pub fn effective_assignees<'a>(item: &Item, diners: &'a [Diner]) -> Vec<&'a Diner> {
    diners
        .iter()
        .filter(|diner| item.assigned_to.includes(&diner.id))
        .collect()
}

/// What a single item costs one diner under consumption mode
pub fn diner_share(item: &Item, diner: &Diner, diners: &[Diner]) -> f64 {
    let assignees = effective_assignees(item, diners);
    if !assignees.iter().any(|a| a.id == diner.id) {
        return 0.0;
    }
    if item.is_shared {
        item.price / assignees.len() as f64
    } else {
        item.price
    }
}

/// Real aggregate cost of an item: its price when shared, its price times
/// the number of assignees otherwise. Unassigned items cost nothing.
pub fn item_contribution(item: &Item, diners: &[Diner]) -> f64 {
    let assignee_count = effective_assignees(item, diners).len();
    if assignee_count == 0 {
        0.0
    } else if item.is_shared {
        item.price
    } else {
        item.price * assignee_count as f64
    }
}

/// Real cost of the whole table before service
pub fn table_total(items: &[Item], diners: &[Diner]) -> f64 {
    // Folded from +0.0: an empty f64 sum is -0.0
    items
        .iter()
        .fold(0.0, |acc, item| acc + item_contribution(item, diners))
}
