//! The bill currently being entered.
//!
//! Every change is a full read of the stored draft, an in-memory edit and a
//! full rewrite. Validation failures come back as `DinerError` / `ItemError`
//! wrapped in `anyhow::Error`, so callers can downcast when they need to tell
//! a rejected action from a storage failure.
//!
//! ## Rules
//!
//! - Diner names are trimmed and unique at the table, ignoring case
//! - Removing a diner also drops them from every explicit item assignment
//! - An item needs a name, a non-negative price and at least one assignee
//! - Explicit assignees must be current diners; picking every diner is
//!   stored as "everyone" so the item follows later table changes

use anyhow::Result;
use log::{debug, info, warn};
use shared::{Assignment, BillDraft, BillStep, Diner, DivisionMode, Item};

use crate::backend::domain::errors::{DinerError, ItemError};
use crate::backend::domain::split_service;
use crate::backend::storage::DraftRepository;

#[derive(Clone)]
pub struct DraftService {
    repository: DraftRepository,
}

impl DraftService {
    pub fn new(repository: DraftRepository) -> Self {
        Self { repository }
    }

    /// Current draft; a fresh one at the setup step when none is stored
    pub fn load(&self) -> BillDraft {
        self.repository.load_draft()
    }

    /// Throw away the current draft and start over
    pub fn start_new(&self) -> Result<BillDraft> {
        self.repository.clear_draft()?;
        info!("Started a new bill");
        Ok(BillDraft::default())
    }

    pub fn add_diner(&self, name: &str) -> Result<Diner> {
        let mut draft = self.load();
        let name = validate_diner_name(name, &draft.diners, None)?;

        let diner = Diner::new(name);
        draft.diners.push(diner.clone());
        self.repository.save_draft(&draft)?;

        info!("Added diner {} ({})", diner.name, diner.id);
        Ok(diner)
    }

    pub fn rename_diner(&self, diner_id: &str, name: &str) -> Result<Diner> {
        let mut draft = self.load();
        let name = validate_diner_name(name, &draft.diners, Some(diner_id))?;

        let diner = draft
            .diners
            .iter_mut()
            .find(|d| d.id == diner_id)
            .ok_or_else(|| DinerError::NotFound(diner_id.to_string()))?;
        let previous = std::mem::replace(&mut diner.name, name);
        let renamed = diner.clone();
        self.repository.save_draft(&draft)?;

        info!("Renamed diner {} to {}", previous, renamed.name);
        Ok(renamed)
    }

    /// Remove a diner and forget them in every item they were assigned to
    pub fn remove_diner(&self, diner_id: &str) -> Result<Diner> {
        let mut draft = self.load();
        let position = draft
            .diners
            .iter()
            .position(|d| d.id == diner_id)
            .ok_or_else(|| DinerError::NotFound(diner_id.to_string()))?;
        let removed = draft.diners.remove(position);

        let mut orphaned = 0;
        for item in draft.items.iter_mut() {
            if let Assignment::Explicit(ids) = &mut item.assigned_to {
                ids.retain(|id| id != diner_id);
                if ids.is_empty() {
                    orphaned += 1;
                }
            }
        }
        if orphaned > 0 {
            warn!(
                "{} items have no diner left after removing {}; they count for nothing",
                orphaned, removed.name
            );
        }

        self.repository.save_draft(&draft)?;
        info!("Removed diner {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    /// Flip a diner's paid flag, returning the new status
    pub fn toggle_paid(&self, diner_id: &str) -> Result<bool> {
        let mut draft = self.load();
        let diner = draft
            .diners
            .iter_mut()
            .find(|d| d.id == diner_id)
            .ok_or_else(|| DinerError::NotFound(diner_id.to_string()))?;
        diner.paid = !diner.paid;
        let paid = diner.paid;
        let name = diner.name.clone();
        self.repository.save_draft(&draft)?;

        info!("{} marked as {}", name, if paid { "paid" } else { "pending" });
        Ok(paid)
    }

    pub fn add_item(
        &self,
        name: &str,
        price: f64,
        assigned_to: Assignment,
        is_shared: bool,
    ) -> Result<Item> {
        let mut draft = self.load();
        let name = validate_item_name(name)?;
        validate_price(price)?;
        let assigned_to = normalize_assignment(assigned_to, &draft.diners)?;

        let item = Item::new(name, price, assigned_to, is_shared);
        draft.items.push(item.clone());
        self.repository.save_draft(&draft)?;

        info!("Added item {} at {:.2} ({})", item.name, item.price, item.id);
        Ok(item)
    }

    pub fn update_item(
        &self,
        item_id: &str,
        name: &str,
        price: f64,
        assigned_to: Assignment,
        is_shared: bool,
    ) -> Result<Item> {
        let mut draft = self.load();
        let name = validate_item_name(name)?;
        validate_price(price)?;
        let assigned_to = normalize_assignment(assigned_to, &draft.diners)?;

        let item = draft
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| ItemError::NotFound(item_id.to_string()))?;
        item.name = name;
        item.price = price;
        item.assigned_to = assigned_to;
        item.is_shared = is_shared;
        let updated = item.clone();
        self.repository.save_draft(&draft)?;

        info!("Updated item {} ({})", updated.name, updated.id);
        Ok(updated)
    }

    pub fn remove_item(&self, item_id: &str) -> Result<Item> {
        let mut draft = self.load();
        let position = draft
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| ItemError::NotFound(item_id.to_string()))?;
        let removed = draft.items.remove(position);
        self.repository.save_draft(&draft)?;

        info!("Removed item {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    pub fn set_step(&self, step: BillStep) -> Result<()> {
        let mut draft = self.load();
        draft.step = step;
        self.repository.save_draft(&draft)?;
        debug!("Bill step set to {:?}", step);
        Ok(())
    }

    pub fn set_division_mode(&self, mode: DivisionMode) -> Result<()> {
        let mut draft = self.load();
        draft.division_mode = mode;
        self.repository.save_draft(&draft)?;
        info!("Division mode set to {}", mode);
        Ok(())
    }

    /// Real cost of every item on the bill, before service
    pub fn items_total(&self) -> f64 {
        let draft = self.load();
        split_service::table_total(&draft.items, &draft.diners)
    }

    /// Drop the stored draft once its bill has been finalized
    pub fn clear(&self) -> Result<()> {
        self.repository.clear_draft()
    }
}

fn validate_diner_name(
    name: &str,
    diners: &[Diner],
    except_id: Option<&str>,
) -> Result<String, DinerError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DinerError::EmptyName);
    }

    let key = trimmed.to_lowercase();
    let taken = diners
        .iter()
        .filter(|d| Some(d.id.as_str()) != except_id)
        .any(|d| d.name.trim().to_lowercase() == key);
    if taken {
        return Err(DinerError::DuplicateName(trimmed.to_string()));
    }

    Ok(trimmed.to_string())
}

fn validate_item_name(name: &str) -> Result<String, ItemError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ItemError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: f64) -> Result<(), ItemError> {
    if !price.is_finite() {
        return Err(ItemError::InvalidPrice);
    }
    if price < 0.0 {
        return Err(ItemError::NegativePrice);
    }
    Ok(())
}

/// Check an assignment against the table and store it in canonical form
fn normalize_assignment(assigned_to: Assignment, diners: &[Diner]) -> Result<Assignment, ItemError> {
    let ids = match assigned_to {
        Assignment::Everyone => return Ok(Assignment::Everyone),
        Assignment::Explicit(ids) => ids,
    };

    let mut unique: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    if unique.is_empty() {
        return Err(ItemError::NoAssignees);
    }
    if let Some(unknown) = unique.iter().find(|id| !diners.iter().any(|d| &d.id == *id)) {
        return Err(ItemError::UnknownDiner(unknown.clone()));
    }

    if unique.len() == diners.len() {
        Ok(Assignment::Everyone)
    } else {
        Ok(Assignment::Explicit(unique))
    }
}
