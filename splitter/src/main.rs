mod cli;

use anyhow::{anyhow, Result};
use bill_splitter::backend::domain::money::format_currency;
use bill_splitter::backend::io;
use bill_splitter::backend::{initialize_file_backend, AppState};
use chrono::Local;
use clap::Parser;
use log::{debug, info};
use shared::{
    AddDinerRequest, AddItemRequest, Assignment, BillRequest, BillStep, DinerRequest,
    ItemRequest, RenameDinerRequest, SavedBill, SetDivisionModeRequest, SetStepRequest,
    SuggestNamesRequest, TopNamesRequest, UpdateItemRequest, UpdateSettingsRequest,
};
use tracing_subscriber::EnvFilter;

use crate::cli::{
    Cli, Command, DinerCommand, HistoryCommand, ItemCommand, NamesCommand, SettingsCommand,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let state = initialize_file_backend(cli.data_dir.as_deref())?;
    if !io::has_seen_onboarding(&state) {
        eprintln!("Welcome! Add diners with `diner add`, items with `item add`, then run `summary`.");
        io::complete_onboarding(&state).map_err(anyhow::Error::msg)?;
    }

    run(&state, cli.command)
}

/// Logs go to stderr so command output stays clean; `RUST_LOG` overrides
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(state: &AppState, command: Command) -> Result<()> {
    debug!("Running {:?}", command);
    match command {
        Command::Diner { action } => run_diner(state, action),
        Command::Item { action } => run_item(state, action),
        Command::Mode { mode } => {
            let response = io::set_division_mode(
                state,
                SetDivisionModeRequest {
                    division_mode: mode.into(),
                },
            )
            .map_err(anyhow::Error::msg)?;
            println!("Division mode: {}", response.draft.division_mode);
            Ok(())
        }
        Command::Summary => {
            io::set_step(state, SetStepRequest { step: BillStep::Summary })
                .map_err(anyhow::Error::msg)?;
            print_summary(state)
        }
        Command::Share => {
            let response = io::finalize_bill(state).map_err(anyhow::Error::msg)?;
            info!("{}", response.success_message);
            println!("{}", response.share_text);
            Ok(())
        }
        Command::New => {
            io::start_new_bill(state).map_err(anyhow::Error::msg)?;
            println!("Started a new bill");
            Ok(())
        }
        Command::History { action } => run_history(state, action),
        Command::Names { action } => run_names(state, action),
        Command::Settings { action } => run_settings(state, action),
    }
}

fn run_diner(state: &AppState, action: DinerCommand) -> Result<()> {
    let response = match action {
        DinerCommand::Add { name } => {
            io::add_diner(state, AddDinerRequest { name }).map_err(anyhow::Error::msg)?
        }
        DinerCommand::Rename { diner, new_name } => {
            let diner_id = resolve_diner(state, &diner)?;
            io::rename_diner(
                state,
                RenameDinerRequest {
                    diner_id,
                    name: new_name,
                },
            )
            .map_err(anyhow::Error::msg)?
        }
        DinerCommand::Remove { diner } => {
            let diner_id = resolve_diner(state, &diner)?;
            io::remove_diner(state, DinerRequest { diner_id }).map_err(anyhow::Error::msg)?
        }
        DinerCommand::Paid { diner } => {
            let diner_id = resolve_diner(state, &diner)?;
            io::toggle_diner_paid(state, DinerRequest { diner_id }).map_err(anyhow::Error::msg)?
        }
    };
    println!("{}", response.success_message);
    Ok(())
}

fn run_item(state: &AppState, action: ItemCommand) -> Result<()> {
    let response = match action {
        ItemCommand::Add {
            name,
            price,
            diners,
            each,
        } => {
            let assigned_to = if diners.is_empty() {
                Assignment::Everyone
            } else {
                let ids = diners
                    .iter()
                    .map(|d| resolve_diner(state, d))
                    .collect::<Result<Vec<_>>>()?;
                Assignment::Explicit(ids)
            };
            io::add_item(
                state,
                AddItemRequest {
                    name,
                    price_input: price,
                    assigned_to,
                    is_shared: !each,
                },
            )
            .map_err(anyhow::Error::msg)?
        }
        ItemCommand::Update {
            item,
            name,
            price,
            diners,
            everyone,
            each,
            shared,
        } => {
            let item_id = resolve_item(state, &item)?;
            let current = io::get_current_bill(state)
                .map_err(anyhow::Error::msg)?
                .draft
                .items
                .into_iter()
                .find(|i| i.id == item_id)
                .ok_or_else(|| anyhow!("No item named {} on the bill", item))?;

            let assigned_to = if everyone {
                Assignment::Everyone
            } else if diners.is_empty() {
                current.assigned_to
            } else {
                let ids = diners
                    .iter()
                    .map(|d| resolve_diner(state, d))
                    .collect::<Result<Vec<_>>>()?;
                Assignment::Explicit(ids)
            };
            let is_shared = match (each, shared) {
                (true, _) => false,
                (_, true) => true,
                _ => current.is_shared,
            };

            io::update_item(
                state,
                UpdateItemRequest {
                    item_id,
                    name: name.unwrap_or(current.name),
                    price_input: price.unwrap_or_else(|| current.price.to_string()),
                    assigned_to,
                    is_shared,
                },
            )
            .map_err(anyhow::Error::msg)?
        }
        ItemCommand::Remove { item } => {
            let item_id = resolve_item(state, &item)?;
            io::remove_item(state, ItemRequest { item_id }).map_err(anyhow::Error::msg)?
        }
    };
    println!("{}", response.success_message);
    Ok(())
}

fn run_history(state: &AppState, action: HistoryCommand) -> Result<()> {
    match action {
        HistoryCommand::List => {
            let history = io::get_bill_history(state).map_err(anyhow::Error::msg)?;
            if history.bills.is_empty() {
                println!("No saved bills yet");
            }
            for bill in &history.bills {
                println!(
                    "{}  {}  {}/{} paid  {}",
                    bill.id,
                    format_bill_date(bill),
                    bill.paid_diners().count(),
                    bill.diners.len(),
                    format_currency(bill.total, &bill.currency)
                );
            }
        }
        HistoryCommand::Show { bill_id } => {
            let request = BillRequest { bill_id };
            let bill = io::get_saved_bill(state, request.clone()).map_err(anyhow::Error::msg)?;
            println!(
                "{}  ({} mode, {}% service)",
                format_bill_date(&bill),
                bill.division_mode,
                bill.service_percent
            );
            for item in &bill.items {
                println!("  {}  {}", item.name, format_currency(item.price, &bill.currency));
            }
            println!();
            let text = io::get_saved_bill_share_text(state, request).map_err(anyhow::Error::msg)?;
            println!("{}", text);
        }
        HistoryCommand::Delete { bill_id } => {
            let response =
                io::delete_bill(state, BillRequest { bill_id }).map_err(anyhow::Error::msg)?;
            println!("{}", response.success_message);
        }
    }
    Ok(())
}

fn run_names(state: &AppState, action: NamesCommand) -> Result<()> {
    let at_table = io::get_current_bill(state)
        .map_err(anyhow::Error::msg)?
        .draft
        .diner_names();

    let response = match action {
        NamesCommand::Suggest { query } => io::suggest_names(
            state,
            SuggestNamesRequest {
                query,
                exclude: at_table,
            },
        ),
        NamesCommand::Top { limit } => io::get_top_names(
            state,
            TopNamesRequest {
                limit,
                exclude: at_table,
            },
        ),
    }
    .map_err(anyhow::Error::msg)?;

    for name in response.names {
        println!("{}", name);
    }
    Ok(())
}

fn run_settings(state: &AppState, action: SettingsCommand) -> Result<()> {
    let response = match action {
        SettingsCommand::Show => io::get_settings(state),
        SettingsCommand::Set {
            service,
            currency,
            theme,
        } => io::update_settings(
            state,
            UpdateSettingsRequest {
                service_percent: service,
                currency,
                theme: theme.map(Into::into),
            },
        ),
        SettingsCommand::ToggleTheme => io::toggle_theme(state),
    }
    .map_err(anyhow::Error::msg)?;

    if !response.success_message.is_empty() {
        println!("{}", response.success_message);
    }
    let settings = response.settings;
    println!("Service:  {}%", settings.service_percent);
    println!("Currency: {}", settings.currency);
    println!("Theme:    {}", settings.theme);
    Ok(())
}

fn print_summary(state: &AppState) -> Result<()> {
    let draft = io::get_current_bill(state).map_err(anyhow::Error::msg)?;
    let response = io::get_bill_summary(state).map_err(anyhow::Error::msg)?;

    println!(
        "{} mode, {}% service, items {}",
        response.division_mode, response.service_percent, draft.formatted_items_total
    );
    for item in &draft.draft.items {
        let who = match &item.assigned_to {
            Assignment::Everyone => "everyone".to_string(),
            Assignment::Explicit(ids) => draft
                .draft
                .diners
                .iter()
                .filter(|d| ids.contains(&d.id))
                .map(|d| d.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        };
        let split = if item.is_shared { "shared" } else { "each" };
        println!(
            "  {}  {} {} ({})",
            item.name,
            format_currency(item.price, &response.currency),
            split,
            who
        );
    }
    println!();
    for line in &response.formatted_diners {
        let status = if line.paid { "paid" } else { "pending" };
        println!(
            "  {:<16} {:>14} + {:>12} = {:>14}  [{}]",
            line.name, line.subtotal, line.service, line.total, status
        );
    }
    println!(
        "Total: {}  ({}/{} paid)",
        response.formatted_grand_total,
        response.paid_count,
        response.formatted_diners.len()
    );
    Ok(())
}

fn format_bill_date(bill: &SavedBill) -> String {
    bill.date_time()
        .map(|d| d.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| bill.date.clone())
}

/// Find a diner of the current bill by id or by name, ignoring case
fn resolve_diner(state: &AppState, key: &str) -> Result<String> {
    let draft = io::get_current_bill(state).map_err(anyhow::Error::msg)?.draft;
    let wanted = key.trim().to_lowercase();
    draft
        .diners
        .iter()
        .find(|d| d.id == key || d.name.to_lowercase() == wanted)
        .map(|d| d.id.clone())
        .ok_or_else(|| anyhow!("No diner named {} at the table", key))
}

/// Find an item of the current bill by id or by name, ignoring case
fn resolve_item(state: &AppState, key: &str) -> Result<String> {
    let draft = io::get_current_bill(state).map_err(anyhow::Error::msg)?.draft;
    let wanted = key.trim().to_lowercase();
    draft
        .items
        .iter()
        .find(|i| i.id == key || i.name.to_lowercase() == wanted)
        .map(|i| i.id.clone())
        .ok_or_else(|| anyhow!("No item named {} on the bill", key))
}
