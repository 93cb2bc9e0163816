//! # Storage Module
//!
//! Handles all data persistence for the bill splitter.
//!
//! Everything is persisted through the [`KeyValueStore`] port: one blob per
//! key, fully rewritten on every change. Repositories wrap a single key
//! each and decode it into the shared types. Two stores are provided:
//!
//! - **FileConnection**: one JSON file per key in a data directory
//! - **MemoryStore**: a process-local map for tests and throwaway sessions
//!
//! Reads fail open. A missing or corrupt blob loads as the empty/default
//! value and is only logged, so a damaged file never blocks the app.

pub mod file;
pub mod json_blob;
pub mod memory;
pub mod repositories;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

pub use file::FileConnection;
pub use json_blob::JsonBlob;
pub use memory::MemoryStore;
pub use repositories::{
    BillHistoryRepository, DraftRepository, FrequentNameRepository, SettingsRepository,
};
pub use traits::KeyValueStore;
