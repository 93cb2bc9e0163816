/// Test utilities for consistent, self-cleaning storage fixtures
///
/// The temporary directory lives as long as the `TestEnvironment`, so test
/// data is removed even when a test panics.
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use super::file::FileConnection;
use super::memory::MemoryStore;
use super::traits::KeyValueStore;

/// RAII test environment around a file-backed store
pub struct TestEnvironment {
    /// Kept alive so the directory is only removed on drop
    _temp_dir: TempDir,
    pub connection: FileConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = FileConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::new(self.connection.clone())
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if std::env::var("BILL_SPLITTER_DEBUG_TESTS").is_ok() {
            println!("Cleaning up test environment: {:?}", self.base_path);
        }
    }
}

/// Fresh in-memory store for tests that do not care about files
pub fn memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryStore::new())
}
