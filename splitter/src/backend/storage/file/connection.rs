//! # File Connection
//!
//! Key-value store backed by one JSON file per key inside a data directory.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── store_manifest.yaml
//! ├── settings.json
//! ├── bills.json
//! ├── frequent-diners.json
//! ├── current-bill.json
//! └── onboarding-completed.json
//! ```
//!
//! Writes go to a temp file that is then renamed over the target.

use anyhow::{anyhow, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use super::manifest::StoreManifestRepository;
use crate::backend::storage::traits::KeyValueStore;

const DATA_DIRECTORY_NAME: &str = "bill-splitter";

/// FileConnection manages the data directory and maps keys to files
#[derive(Clone)]
pub struct FileConnection {
    base_directory: PathBuf,
}

impl FileConnection {
    /// Open a store rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        let connection = Self {
            base_directory: base_path,
        };
        StoreManifestRepository::new(connection.clone()).ensure_manifest()?;
        Ok(connection)
    }

    /// Open the store in the platform data directory
    pub fn new_default() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not determine the platform data directory"))?;
        Self::new(data_dir.join(DATA_DIRECTORY_NAME))
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Get the file path holding the blob for `key`
    pub fn path_for_key(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.base_directory.join(format!("{}.json", key)))
    }
}

/// Keys become file names, so only a safe character set is accepted
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(anyhow!("Invalid storage key '{}'", key))
    }
}

/// Write `contents` to `path` through a temp file and a rename
pub(crate) fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

impl KeyValueStore for FileConnection {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for_key(key)?;
        if !path.exists() {
            debug!("No blob stored for key '{}'", key);
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)?;
        Ok(Some(contents))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for_key(key)?;
        write_atomically(&path, value)?;
        debug!("Saved blob for key '{}' to {:?}", key, path);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let path = self.path_for_key(key)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        debug!("Removed blob for key '{}'", key);
        Ok(true)
    }
}
