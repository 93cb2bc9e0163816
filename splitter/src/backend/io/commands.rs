//! Commands exposed to front ends.
//!
//! Each command takes the shared application state and a request DTO, calls
//! into the domain services and hands back a response DTO. Failures come
//! back as plain messages: rejected user actions are logged as warnings,
//! anything else as errors.

use log::{error, info, warn};
use shared::{
    AddDinerRequest, AddItemRequest, BillDraftResponse, BillHistoryResponse, BillRequest,
    BillSummaryResponse, CurrencyInfo, DeleteBillResponse, DinerRequest, DinerResponse,
    FinalizeBillResponse, ItemRequest, ItemResponse, NameListResponse, RenameDinerRequest,
    SavedBill, SetDivisionModeRequest, SetStepRequest, SettingsResponse, SuggestNamesRequest,
    TopNamesRequest, UpdateItemRequest, UpdateSettingsRequest,
};

use crate::backend::domain::money::{self, parse_price};
use crate::backend::domain::{DinerError, ItemError};
use crate::backend::io::mappers::{DraftMapper, SummaryMapper};
use crate::backend::AppState;

/// Log a failed command and turn it into the message shown to the user
fn command_error(action: &str, e: anyhow::Error) -> String {
    if e.downcast_ref::<DinerError>().is_some() || e.downcast_ref::<ItemError>().is_some() {
        warn!("Rejected {}: {}", action, e);
    } else {
        error!("Failed to {}: {:#}", action, e);
    }
    e.to_string()
}

fn draft_response(state: &AppState) -> BillDraftResponse {
    let settings = state.settings_service.get_settings();
    DraftMapper::to_draft_response(
        state.draft_service.load(),
        state.draft_service.items_total(),
        &settings.currency,
    )
}

// ---------------------------------------------------------------------------
// Current bill
// ---------------------------------------------------------------------------

pub fn get_current_bill(state: &AppState) -> Result<BillDraftResponse, String> {
    Ok(draft_response(state))
}

pub fn start_new_bill(state: &AppState) -> Result<BillDraftResponse, String> {
    info!("Starting a new bill");
    state
        .draft_service
        .start_new()
        .map_err(|e| command_error("start a new bill", e))?;
    Ok(draft_response(state))
}

pub fn add_diner(state: &AppState, request: AddDinerRequest) -> Result<DinerResponse, String> {
    info!("Adding diner: {:?}", request);
    let diner = state
        .draft_service
        .add_diner(&request.name)
        .map_err(|e| command_error("add diner", e))?;

    Ok(DinerResponse {
        success_message: format!("{} joined the table", diner.name),
        diner,
    })
}

pub fn rename_diner(state: &AppState, request: RenameDinerRequest) -> Result<DinerResponse, String> {
    info!("Renaming diner: {:?}", request);
    let diner = state
        .draft_service
        .rename_diner(&request.diner_id, &request.name)
        .map_err(|e| command_error("rename diner", e))?;

    Ok(DinerResponse {
        success_message: format!("Diner renamed to {}", diner.name),
        diner,
    })
}

pub fn remove_diner(state: &AppState, request: DinerRequest) -> Result<DinerResponse, String> {
    info!("Removing diner {}", request.diner_id);
    let diner = state
        .draft_service
        .remove_diner(&request.diner_id)
        .map_err(|e| command_error("remove diner", e))?;

    Ok(DinerResponse {
        success_message: format!("{} left the table", diner.name),
        diner,
    })
}

pub fn toggle_diner_paid(state: &AppState, request: DinerRequest) -> Result<DinerResponse, String> {
    let paid = state
        .draft_service
        .toggle_paid(&request.diner_id)
        .map_err(|e| command_error("update payment status", e))?;

    let diner = state
        .draft_service
        .load()
        .diners
        .into_iter()
        .find(|d| d.id == request.diner_id)
        .ok_or_else(|| {
            command_error(
                "update payment status",
                DinerError::NotFound(request.diner_id.clone()).into(),
            )
        })?;

    Ok(DinerResponse {
        success_message: format!(
            "{} is now {}",
            diner.name,
            if paid { "paid" } else { "pending" }
        ),
        diner,
    })
}

pub fn add_item(state: &AppState, request: AddItemRequest) -> Result<ItemResponse, String> {
    info!("Adding item: {:?}", request);
    let price = parse_price(&request.price_input);
    let item = state
        .draft_service
        .add_item(&request.name, price, request.assigned_to, request.is_shared)
        .map_err(|e| command_error("add item", e))?;

    Ok(ItemResponse {
        success_message: format!("{} added to the bill", item.name),
        item,
    })
}

pub fn update_item(state: &AppState, request: UpdateItemRequest) -> Result<ItemResponse, String> {
    info!("Updating item: {:?}", request);
    let price = parse_price(&request.price_input);
    let item = state
        .draft_service
        .update_item(
            &request.item_id,
            &request.name,
            price,
            request.assigned_to,
            request.is_shared,
        )
        .map_err(|e| command_error("update item", e))?;

    Ok(ItemResponse {
        success_message: format!("{} updated", item.name),
        item,
    })
}

pub fn remove_item(state: &AppState, request: ItemRequest) -> Result<ItemResponse, String> {
    info!("Removing item {}", request.item_id);
    let item = state
        .draft_service
        .remove_item(&request.item_id)
        .map_err(|e| command_error("remove item", e))?;

    Ok(ItemResponse {
        success_message: format!("{} removed from the bill", item.name),
        item,
    })
}

pub fn set_division_mode(
    state: &AppState,
    request: SetDivisionModeRequest,
) -> Result<BillDraftResponse, String> {
    state
        .draft_service
        .set_division_mode(request.division_mode)
        .map_err(|e| command_error("change division mode", e))?;
    Ok(draft_response(state))
}

pub fn set_step(state: &AppState, request: SetStepRequest) -> Result<BillDraftResponse, String> {
    state
        .draft_service
        .set_step(request.step)
        .map_err(|e| command_error("change step", e))?;
    Ok(draft_response(state))
}

/// Per-diner breakdown of the current bill with the configured service
pub fn get_bill_summary(state: &AppState) -> Result<BillSummaryResponse, String> {
    let draft = state.draft_service.load();
    let settings = state.settings_service.get_settings();

    let summary = state.split_service.compute_summaries(
        &draft.diners,
        &draft.items,
        f64::from(settings.service_percent),
        draft.division_mode,
    );

    Ok(SummaryMapper::to_summary_response(
        summary,
        &settings,
        draft.division_mode,
    ))
}

/// Save the current bill to history, remember its diners' names and start
/// over with an empty bill.
///
/// Once the bill is in history the command reports success even if a later
/// bookkeeping step fails, so a retry cannot save it twice.
pub fn finalize_bill(state: &AppState) -> Result<FinalizeBillResponse, String> {
    let draft = state.draft_service.load();
    if draft.diners.is_empty() {
        warn!("Rejected finalize: no diners at the table");
        return Err("Add at least one diner before finishing the bill".to_string());
    }

    let settings = state.settings_service.get_settings();
    let summary = state.split_service.compute_summaries(
        &draft.diners,
        &draft.items,
        f64::from(settings.service_percent),
        draft.division_mode,
    );

    let bill = state
        .bill_history_service
        .finalize(
            &draft.diners,
            &draft.items,
            f64::from(settings.service_percent),
            &settings.currency,
            summary.grand_total,
            draft.division_mode,
        )
        .map_err(|e| command_error("save bill", e))?;

    if let Err(e) = state
        .frequent_name_service
        .record_usage(&draft.diner_names())
    {
        error!("Bill {} saved but names were not recorded: {:#}", bill.id, e);
    }
    if let Err(e) = state.draft_service.clear() {
        error!("Bill {} saved but the current bill was not cleared: {:#}", bill.id, e);
    }

    let share_text = state.share_service.share_text(&summary, &settings.currency);
    info!("Finalized bill {}", bill.id);

    Ok(FinalizeBillResponse {
        success_message: format!(
            "Bill saved: {}",
            money::format_currency(bill.total, &bill.currency)
        ),
        bill,
        share_text,
    })
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

pub fn get_bill_history(state: &AppState) -> Result<BillHistoryResponse, String> {
    Ok(BillHistoryResponse {
        bills: state.bill_history_service.list_bills(),
    })
}

pub fn get_saved_bill(state: &AppState, request: BillRequest) -> Result<SavedBill, String> {
    state
        .bill_history_service
        .get_bill(&request.bill_id)
        .ok_or_else(|| {
            warn!("Saved bill not found: {}", request.bill_id);
            format!("Bill not found: {}", request.bill_id)
        })
}

pub fn get_saved_bill_share_text(state: &AppState, request: BillRequest) -> Result<String, String> {
    let bill = get_saved_bill(state, request)?;
    Ok(state.share_service.saved_bill_text(&bill))
}

pub fn delete_bill(state: &AppState, request: BillRequest) -> Result<DeleteBillResponse, String> {
    info!("Deleting bill {}", request.bill_id);
    let deleted = state
        .bill_history_service
        .delete_bill(&request.bill_id)
        .map_err(|e| command_error("delete bill", e))?;

    let success_message = if deleted {
        "Bill deleted".to_string()
    } else {
        format!("Bill not found: {}", request.bill_id)
    };
    Ok(DeleteBillResponse {
        deleted,
        success_message,
    })
}

// ---------------------------------------------------------------------------
// Frequent names
// ---------------------------------------------------------------------------

pub fn suggest_names(state: &AppState, request: SuggestNamesRequest) -> Result<NameListResponse, String> {
    Ok(NameListResponse {
        names: state
            .frequent_name_service
            .suggest(&request.query, &request.exclude),
    })
}

pub fn get_top_names(state: &AppState, request: TopNamesRequest) -> Result<NameListResponse, String> {
    Ok(NameListResponse {
        names: state
            .frequent_name_service
            .top_ranked(request.limit, &request.exclude),
    })
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

pub fn get_settings(state: &AppState) -> Result<SettingsResponse, String> {
    Ok(SettingsResponse {
        settings: state.settings_service.get_settings(),
        success_message: String::new(),
    })
}

pub fn update_settings(
    state: &AppState,
    request: UpdateSettingsRequest,
) -> Result<SettingsResponse, String> {
    info!("Updating settings: {:?}", request);
    let settings = state
        .settings_service
        .update_settings(request)
        .map_err(|e| command_error("update settings", e))?;

    Ok(SettingsResponse {
        settings,
        success_message: "Settings saved".to_string(),
    })
}

pub fn toggle_theme(state: &AppState) -> Result<SettingsResponse, String> {
    let theme = state
        .settings_service
        .toggle_theme()
        .map_err(|e| command_error("switch theme", e))?;

    Ok(SettingsResponse {
        settings: state.settings_service.get_settings(),
        success_message: format!("Switched to {} theme", theme),
    })
}

pub fn get_supported_currencies() -> Vec<CurrencyInfo> {
    money::supported_currencies()
}

pub fn has_seen_onboarding(state: &AppState) -> bool {
    state.settings_service.has_seen_onboarding()
}

pub fn complete_onboarding(state: &AppState) -> Result<(), String> {
    state
        .settings_service
        .mark_onboarding_seen()
        .map_err(|e| command_error("save onboarding status", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::initialize_backend;
    use crate::backend::storage::test_utils::memory_store;
    use shared::{Assignment, BillStep, DivisionMode};

    fn create_test_state() -> AppState {
        initialize_backend(memory_store())
    }

    fn add(state: &AppState, name: &str) -> String {
        add_diner(state, AddDinerRequest { name: name.to_string() })
            .unwrap()
            .diner
            .id
    }

    #[test]
    fn test_duplicate_diner_is_rejected_with_message() {
        let state = create_test_state();
        add(&state, "Ana");

        let err = add_diner(&state, AddDinerRequest { name: "ANA".to_string() }).unwrap_err();
        assert_eq!(err, "ANA is already at the table");
    }

    #[test]
    fn test_add_item_parses_typed_price() {
        let state = create_test_state();
        add(&state, "Ana");

        let response = add_item(
            &state,
            AddItemRequest {
                name: "Cafe".to_string(),
                price_input: "$1,250.50".to_string(),
                assigned_to: Assignment::Everyone,
                is_shared: true,
            },
        )
        .unwrap();
        assert_eq!(response.item.price, 1250.5);

        let garbage = add_item(
            &state,
            AddItemRequest {
                name: "Mystery".to_string(),
                price_input: "lots".to_string(),
                assigned_to: Assignment::Everyone,
                is_shared: true,
            },
        )
        .unwrap();
        assert_eq!(garbage.item.price, 0.0);
    }

    #[test]
    fn test_update_item_parses_price_and_rejects_bad_input() {
        let state = create_test_state();
        let ana = add(&state, "Ana");
        add(&state, "Beto");
        let item = add_item(
            &state,
            AddItemRequest {
                name: "Cafe".to_string(),
                price_input: "2".to_string(),
                assigned_to: Assignment::Everyone,
                is_shared: true,
            },
        )
        .unwrap()
        .item;

        let request = |name: &str, price_input: &str| UpdateItemRequest {
            item_id: item.id.clone(),
            name: name.to_string(),
            price_input: price_input.to_string(),
            assigned_to: Assignment::explicit([ana.clone()]),
            is_shared: false,
        };

        let response = update_item(&state, request("Cafe con leche", "$1,250.50")).unwrap();
        assert_eq!(response.success_message, "Cafe con leche updated");
        assert_eq!(response.item.price, 1250.5);
        assert_eq!(response.item.assigned_to, Assignment::explicit([ana.clone()]));
        assert!(!response.item.is_shared);

        let response = update_item(&state, request("Cafe con leche", "10abc")).unwrap();
        assert_eq!(response.item.price, 10.0);

        let err = update_item(&state, request("  ", "3")).unwrap_err();
        assert_eq!(err, "Item name cannot be empty");

        let err = update_item(&state, request("Cafe", "-3")).unwrap_err();
        assert_eq!(err, "Price cannot be negative");

        let mut unknown = request("Cafe", "3");
        unknown.item_id = "missing".to_string();
        let err = update_item(&state, unknown).unwrap_err();
        assert_eq!(err, "Item not found: missing");

        // Rejected updates leave the stored item alone
        let stored = get_current_bill(&state).unwrap().draft.items;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Cafe con leche");
        assert_eq!(stored[0].price, 10.0);
    }

    #[test]
    fn test_summary_end_to_end() {
        let state = create_test_state();
        add(&state, "Ana");
        add(&state, "Beto");
        add_item(
            &state,
            AddItemRequest {
                name: "Pizza".to_string(),
                price_input: "100".to_string(),
                assigned_to: Assignment::Everyone,
                is_shared: true,
            },
        )
        .unwrap();

        let response = get_bill_summary(&state).unwrap();
        assert_eq!(response.service_percent, 10);
        assert_eq!(response.formatted_grand_total, "110.00 CUP");
        for line in &response.formatted_diners {
            assert_eq!(line.subtotal, "50.00 CUP");
            assert_eq!(line.service, "5.00 CUP");
            assert_eq!(line.total, "55.00 CUP");
        }
    }

    #[test]
    fn test_toggle_paid_reports_new_status() {
        let state = create_test_state();
        let ana = add(&state, "Ana");

        let response = toggle_diner_paid(&state, DinerRequest { diner_id: ana.clone() }).unwrap();
        assert!(response.diner.paid);
        assert_eq!(response.success_message, "Ana is now paid");

        assert!(toggle_diner_paid(&state, DinerRequest { diner_id: "nobody".to_string() }).is_err());
    }

    #[test]
    fn test_finalize_saves_records_names_and_clears() {
        let state = create_test_state();
        let ana = add(&state, "Ana");
        add(&state, "Beto");
        add_item(
            &state,
            AddItemRequest {
                name: "Pizza".to_string(),
                price_input: "100".to_string(),
                assigned_to: Assignment::Everyone,
                is_shared: true,
            },
        )
        .unwrap();
        toggle_diner_paid(&state, DinerRequest { diner_id: ana }).unwrap();
        set_step(&state, SetStepRequest { step: BillStep::Summary }).unwrap();

        let response = finalize_bill(&state).unwrap();
        assert_eq!(response.bill.total, 110.0);
        assert_eq!(response.success_message, "Bill saved: 110.00 CUP");
        assert!(response.share_text.contains("[Paid] Ana: 55.00 CUP"));
        assert!(response.share_text.ends_with("Paid: 1/2"));

        let history = get_bill_history(&state).unwrap();
        assert_eq!(history.bills, vec![response.bill.clone()]);

        let top = get_top_names(&state, TopNamesRequest { limit: 5, exclude: vec![] }).unwrap();
        assert_eq!(top.names, vec!["Ana".to_string(), "Beto".to_string()]);

        let draft = get_current_bill(&state).unwrap().draft;
        assert!(draft.is_empty());
        assert_eq!(draft.step, BillStep::Setup);
    }

    #[test]
    fn test_finalize_rejects_empty_table() {
        let state = create_test_state();
        assert!(finalize_bill(&state).is_err());
        assert!(get_bill_history(&state).unwrap().bills.is_empty());
    }

    #[test]
    fn test_names_recorded_only_on_finalize() {
        let state = create_test_state();
        add(&state, "Ana");

        let top = get_top_names(&state, TopNamesRequest { limit: 5, exclude: vec![] }).unwrap();
        assert!(top.names.is_empty());
    }

    #[test]
    fn test_equal_mode_summary() {
        let state = create_test_state();
        let ana = add(&state, "Ana");
        add(&state, "Beto");
        add_item(
            &state,
            AddItemRequest {
                name: "Steak".to_string(),
                price_input: "30".to_string(),
                assigned_to: Assignment::explicit([ana]),
                is_shared: true,
            },
        )
        .unwrap();
        update_settings(
            &state,
            UpdateSettingsRequest {
                service_percent: Some(0),
                ..Default::default()
            },
        )
        .unwrap();
        set_division_mode(&state, SetDivisionModeRequest { division_mode: DivisionMode::Equal })
            .unwrap();

        let response = get_bill_summary(&state).unwrap();
        assert_eq!(response.division_mode, DivisionMode::Equal);
        assert!(response.formatted_diners.iter().all(|l| l.total == "15.00 CUP"));
    }

    #[test]
    fn test_saved_bill_lookup_and_delete() {
        let state = create_test_state();
        add(&state, "Ana");
        let bill = finalize_bill(&state).unwrap().bill;

        let request = BillRequest { bill_id: bill.id.clone() };
        assert_eq!(get_saved_bill(&state, request.clone()).unwrap(), bill);
        assert!(get_saved_bill_share_text(&state, request.clone())
            .unwrap()
            .contains("[Pending] Ana: 0.00 CUP"));

        assert!(delete_bill(&state, request.clone()).unwrap().deleted);
        assert!(!delete_bill(&state, request.clone()).unwrap().deleted);
        assert!(get_saved_bill(&state, request).is_err());
    }

    #[test]
    fn test_settings_commands() {
        let state = create_test_state();
        let response = update_settings(
            &state,
            UpdateSettingsRequest {
                service_percent: Some(400),
                currency: Some("USD".to_string()),
                theme: None,
            },
        )
        .unwrap();
        assert_eq!(response.settings.service_percent, 100);
        assert_eq!(response.settings.currency, "USD");

        let toggled = toggle_theme(&state).unwrap();
        assert_eq!(toggled.success_message, "Switched to dark theme");

        assert!(!has_seen_onboarding(&state));
        complete_onboarding(&state).unwrap();
        assert!(has_seen_onboarding(&state));
        assert_eq!(get_supported_currencies().len(), 2);
    }
}
