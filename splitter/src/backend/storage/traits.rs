//! # Storage Traits
//!
//! This module defines the storage abstraction that lets different
//! backends be used interchangeably by the repositories.

use anyhow::Result;

/// Trait defining the key-value port every repository persists through
///
/// Each key holds one opaque string blob. Writes overwrite the whole blob;
/// there are no transactions, so concurrent writers to the same key race
/// and the last write wins.
pub trait KeyValueStore: Send + Sync {
    /// Read the blob stored under `key`, `None` if it was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous blob
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the blob under `key`
    /// Returns true if something was removed
    fn remove(&self, key: &str) -> Result<bool>;
}
