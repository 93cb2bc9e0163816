//! End-to-end bill sessions driven through the command layer.

use std::sync::Arc;

use bill_splitter::backend::io;
use bill_splitter::backend::storage::MemoryStore;
use bill_splitter::{initialize_backend, initialize_file_backend, AppState};
use shared::{
    AddDinerRequest, AddItemRequest, Assignment, BillRequest, DinerRequest, SuggestNamesRequest,
    TopNamesRequest, UpdateSettingsRequest,
};
use tempfile::TempDir;

fn memory_state() -> AppState {
    initialize_backend(Arc::new(MemoryStore::new()))
}

fn add_diner(state: &AppState, name: &str) -> String {
    io::add_diner(state, AddDinerRequest { name: name.to_string() })
        .unwrap()
        .diner
        .id
}

fn add_item(state: &AppState, name: &str, price: &str, assigned_to: Assignment, is_shared: bool) {
    io::add_item(
        state,
        AddItemRequest {
            name: name.to_string(),
            price_input: price.to_string(),
            assigned_to,
            is_shared,
        },
    )
    .unwrap();
}

/// Run a whole session with the given diners sharing one item
fn finish_bill(state: &AppState, names: &[&str], price: &str) {
    for name in names {
        add_diner(state, name);
    }
    add_item(state, "Dinner", price, Assignment::Everyone, true);
    io::finalize_bill(state).unwrap();
}

fn top_names(state: &AppState) -> Vec<String> {
    io::get_top_names(state, TopNamesRequest { limit: 10, exclude: vec![] })
        .unwrap()
        .names
}

#[test]
fn two_diners_share_one_item_with_service() {
    let state = memory_state();
    let ana = add_diner(&state, "Ana");
    add_diner(&state, "Beto");
    add_item(&state, "Parrillada", "100", Assignment::Everyone, true);
    io::toggle_diner_paid(&state, DinerRequest { diner_id: ana }).unwrap();

    let summary = io::get_bill_summary(&state).unwrap();
    for line in &summary.summary.per_diner {
        assert!((line.subtotal - 50.0).abs() < 1e-9);
        assert!((line.service - 5.0).abs() < 1e-9);
        assert!((line.total - 55.0).abs() < 1e-9);
    }
    assert!((summary.summary.grand_total - 110.0).abs() < 1e-9);

    let finalized = io::finalize_bill(&state).unwrap();
    assert_eq!(
        finalized.share_text,
        "*Bill Splitter*\n\n*Bill summary:*\n─────────────────\n\
         [Paid] Ana: 55.00 CUP\n[Pending] Beto: 55.00 CUP\n─────────────────\n\
         *Table total: 110.00 CUP*\nPaid: 1/2"
    );
}

#[test]
fn item_for_everyone_follows_the_table() {
    let state = memory_state();
    for name in ["Ana", "Beto", "Carla"] {
        add_diner(&state, name);
    }
    io::update_settings(
        &state,
        UpdateSettingsRequest {
            service_percent: Some(0),
            ..Default::default()
        },
    )
    .unwrap();
    add_item(&state, "Paella", "90", Assignment::Everyone, true);

    let summary = io::get_bill_summary(&state).unwrap();
    assert!(summary.formatted_diners.iter().all(|l| l.subtotal == "30.00 CUP"));

    add_diner(&state, "Dani");
    let summary = io::get_bill_summary(&state).unwrap();
    assert!(summary.formatted_diners.iter().all(|l| l.subtotal == "22.50 CUP"));
}

#[test]
fn shared_and_per_person_items_differ() {
    let state = memory_state();
    let ana = add_diner(&state, "Ana");
    let beto = add_diner(&state, "Beto");
    add_diner(&state, "Carla");
    io::update_settings(
        &state,
        UpdateSettingsRequest {
            service_percent: Some(0),
            currency: Some("USD".to_string()),
            theme: None,
        },
    )
    .unwrap();

    add_item(&state, "Beer", "10", Assignment::explicit([ana.clone(), beto.clone()]), false);
    let totals: Vec<String> = io::get_bill_summary(&state)
        .unwrap()
        .formatted_diners
        .into_iter()
        .map(|l| l.total)
        .collect();
    assert_eq!(totals, vec!["$10.00", "$10.00", "$0.00"]);

    io::start_new_bill(&state).unwrap();
    let ana = add_diner(&state, "Ana");
    let beto = add_diner(&state, "Beto");
    add_diner(&state, "Carla");
    add_item(&state, "Nachos", "10", Assignment::explicit([ana, beto]), true);
    let totals: Vec<String> = io::get_bill_summary(&state)
        .unwrap()
        .formatted_diners
        .into_iter()
        .map(|l| l.total)
        .collect();
    assert_eq!(totals, vec!["$5.00", "$5.00", "$0.00"]);
}

#[test]
fn frequent_names_rank_by_use() {
    let state = memory_state();
    finish_bill(&state, &["Ana"], "10");
    finish_bill(&state, &["Ana"], "10");
    finish_bill(&state, &["Beto"], "10");

    assert_eq!(top_names(&state), vec!["Ana".to_string(), "Beto".to_string()]);
}

#[test]
fn suggestions_skip_people_already_seated() {
    let state = memory_state();
    finish_bill(&state, &["Ana", "Mariana", "Juan"], "30");

    let names = io::suggest_names(
        &state,
        SuggestNamesRequest {
            query: "an".to_string(),
            exclude: vec!["Ana".to_string()],
        },
    )
    .unwrap()
    .names;
    assert!(!names.iter().any(|n| n == "Ana"));
    assert_eq!(names, vec!["Mariana".to_string(), "Juan".to_string()]);
}

#[test]
fn history_keeps_the_twenty_newest_bills() {
    let state = memory_state();
    for i in 1..=25 {
        finish_bill(&state, &["Ana"], &i.to_string());
    }

    let bills = io::get_bill_history(&state).unwrap().bills;
    assert_eq!(bills.len(), 20);

    // 10% service on top of prices 25 down to 6
    let totals: Vec<f64> = bills.iter().map(|b| b.total).collect();
    let expected: Vec<f64> = (6..=25).rev().map(|p| p as f64 * 1.1).collect();
    for (total, want) in totals.iter().zip(&expected) {
        assert!((total - want).abs() < 1e-9);
    }
}

#[test]
fn saved_bill_ignores_later_edits() {
    let state = memory_state();
    finish_bill(&state, &["Ana", "Beto"], "50");
    let saved = io::get_bill_history(&state).unwrap().bills[0].clone();

    // The next session reuses the names but is a different bill
    add_diner(&state, "Ana");
    add_item(&state, "Coffee", "3", Assignment::Everyone, true);

    let reloaded = io::get_saved_bill(&state, BillRequest { bill_id: saved.id.clone() }).unwrap();
    assert_eq!(reloaded, saved);
    assert_eq!(reloaded.diners.len(), 2);
}

#[test]
fn session_survives_a_restart() {
    let dir = TempDir::new().unwrap();

    {
        let state = initialize_file_backend(Some(dir.path())).unwrap();
        add_diner(&state, "Ana");
        add_diner(&state, "Beto");
        add_item(&state, "Pizza", "24", Assignment::Everyone, true);
    }

    let state = initialize_file_backend(Some(dir.path())).unwrap();
    let draft = io::get_current_bill(&state).unwrap();
    assert_eq!(draft.draft.diner_names(), vec!["Ana".to_string(), "Beto".to_string()]);
    assert_eq!(draft.formatted_items_total, "24.00 CUP");

    io::finalize_bill(&state).unwrap();
    let restarted = initialize_file_backend(Some(dir.path())).unwrap();
    assert_eq!(io::get_bill_history(&restarted).unwrap().bills.len(), 1);
    assert_eq!(top_names(&restarted), vec!["Ana".to_string(), "Beto".to_string()]);
    assert!(io::get_current_bill(&restarted).unwrap().draft.is_empty());
}
