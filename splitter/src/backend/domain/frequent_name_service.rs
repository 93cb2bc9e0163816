//! Frequent-name ranking engine.
//!
//! Keeps a registry of diner names used on finalized bills, ranked by how
//! often they were used. The registry is stored already sorted (most used
//! first) so queries just walk it in order.

use anyhow::Result;
use chrono::Utc;
use log::{debug, info};
use shared::FrequentDiner;

use crate::backend::storage::FrequentNameRepository;

/// Registry size; the least used names fall off past this
pub const MAX_FREQUENT_DINERS: usize = 30;
/// Maximum number of autocomplete suggestions
pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Clone)]
pub struct FrequentNameService {
    repository: FrequentNameRepository,
}

impl FrequentNameService {
    pub fn new(repository: FrequentNameRepository) -> Self {
        Self { repository }
    }

    /// Count one use of each name and persist the re-ranked registry
    pub fn record_usage<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let registry = apply_usage(self.repository.list_entries(), names, &now);
        self.repository.save_entries(&registry)?;
        info!("Recorded usage of {} names, registry holds {}", names.len(), registry.len());
        Ok(())
    }

    /// Up to five known names containing `query`, most used first.
    /// A blank query suggests nothing.
    pub fn suggest(&self, query: &str, exclude: &[String]) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let suggestions: Vec<String> = self
            .repository
            .list_entries()
            .into_iter()
            .filter(|entry| entry.name.to_lowercase().contains(&needle))
            .filter(|entry| !is_excluded(&entry.name, exclude))
            .take(MAX_SUGGESTIONS)
            .map(|entry| entry.name)
            .collect();

        debug!("Suggestions for '{}': {:?}", needle, suggestions);
        suggestions
    }

    /// The `limit` most used names not already in `exclude`
    pub fn top_ranked(&self, limit: usize, exclude: &[String]) -> Vec<String> {
        self.repository
            .list_entries()
            .into_iter()
            .filter(|entry| !is_excluded(&entry.name, exclude))
            .take(limit)
            .map(|entry| entry.name)
            .collect()
    }

    /// Full registry in ranked order
    pub fn list_entries(&self) -> Vec<FrequentDiner> {
        self.repository.list_entries()
    }
}

fn is_excluded(name: &str, exclude: &[String]) -> bool {
    let name = name.to_lowercase();
    exclude.iter().any(|e| e.trim().to_lowercase() == name)
}

/// Fold a batch of names into the registry, then re-rank and cap it.
///
/// Names match case-insensitively; the latest casing wins. The sort is
/// stable, so equally used names keep their relative order.
fn apply_usage<S: AsRef<str>>(
    mut registry: Vec<FrequentDiner>,
    names: &[S],
    now: &str,
) -> Vec<FrequentDiner> {
    for name in names {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();

        match registry.iter_mut().find(|entry| entry.name.to_lowercase() == key) {
            Some(entry) => {
                entry.count = entry.count.saturating_add(1);
                entry.last_used = now.to_string();
                entry.name = trimmed.to_string();
            }
            None => registry.push(FrequentDiner {
                name: trimmed.to_string(),
                count: 1,
                last_used: now.to_string(),
            }),
        }
    }

    registry.sort_by(|a, b| b.count.cmp(&a.count));
    registry.truncate(MAX_FREQUENT_DINERS);
    registry
}
