//! # Store Manifest
//!
//! A small YAML file at the root of the data directory that marks it as a
//! bill-splitter store and records the on-disk format version.
//!
//! ## YAML Format
//!
//! ```yaml
//! data_format_version: "1.0"
//! created_at: "2025-01-21T19:30:00Z"
//! updated_at: "2025-01-21T19:35:00Z"
//! ```

use anyhow::Result;
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::connection::{write_atomically, FileConnection};

pub const CURRENT_DATA_FORMAT_VERSION: &str = "1.0";
const MANIFEST_FILE_NAME: &str = "store_manifest.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreManifest {
    /// Data format version for future migrations
    pub data_format_version: String,
    /// When the store was first created
    pub created_at: String,
    /// When the manifest was last rewritten
    pub updated_at: String,
}

impl Default for StoreManifest {
    fn default() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            data_format_version: CURRENT_DATA_FORMAT_VERSION.to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

#[derive(Clone)]
pub struct StoreManifestRepository {
    connection: FileConnection,
}

impl StoreManifestRepository {
    pub fn new(connection: FileConnection) -> Self {
        Self { connection }
    }

    fn manifest_path(&self) -> PathBuf {
        self.connection.base_directory().join(MANIFEST_FILE_NAME)
    }

    /// Load the manifest, writing a fresh one when it is missing or unreadable
    pub fn ensure_manifest(&self) -> Result<StoreManifest> {
        let path = self.manifest_path();

        if path.exists() {
            let loaded = fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|yaml| serde_yaml::from_str::<StoreManifest>(&yaml).map_err(Into::into));
            match loaded {
                Ok(manifest) => {
                    if manifest.data_format_version != CURRENT_DATA_FORMAT_VERSION {
                        warn!(
                            "Store at {:?} uses data format {}, expected {}",
                            self.connection.base_directory(),
                            manifest.data_format_version,
                            CURRENT_DATA_FORMAT_VERSION
                        );
                    }
                    debug!("Loaded store manifest from {:?}", path);
                    return Ok(manifest);
                }
                Err(e) => warn!("Store manifest at {:?} is unreadable ({}), rewriting it", path, e),
            }
        }

        let manifest = StoreManifest::default();
        self.save(&manifest)?;
        info!("Created store manifest at {:?}", path);
        Ok(manifest)
    }

    /// Rewrite the manifest, bumping `updated_at`
    pub fn save(&self, manifest: &StoreManifest) -> Result<()> {
        let mut updated = manifest.clone();
        updated.updated_at = Utc::now().to_rfc3339();
        let yaml = serde_yaml::to_string(&updated)?;
        write_atomically(&self.manifest_path(), &yaml)?;
        debug!("Saved store manifest to {:?}", self.manifest_path());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::test_utils::TestEnvironment;

    #[test]
    fn test_opening_store_creates_manifest() {
        let env = TestEnvironment::new().unwrap();
        let path = env.base_directory().join(MANIFEST_FILE_NAME);
        assert!(path.exists());

        let manifest = StoreManifestRepository::new(env.connection.clone())
            .ensure_manifest()
            .unwrap();
        assert_eq!(manifest.data_format_version, CURRENT_DATA_FORMAT_VERSION);
        assert!(!manifest.created_at.is_empty());
    }

    #[test]
    fn test_manifest_survives_reopen() {
        let env = TestEnvironment::new().unwrap();
        let repo = StoreManifestRepository::new(env.connection.clone());
        let first = repo.ensure_manifest().unwrap();

        let reopened = FileConnection::new(env.base_directory()).unwrap();
        let second = StoreManifestRepository::new(reopened).ensure_manifest().unwrap();
        assert_eq!(first.created_at, second.created_at);
    }

    #[test]
    fn test_corrupt_manifest_is_rewritten() {
        let env = TestEnvironment::new().unwrap();
        let path = env.base_directory().join(MANIFEST_FILE_NAME);
        fs::write(&path, ":: not yaml [").unwrap();

        let manifest = StoreManifestRepository::new(env.connection.clone())
            .ensure_manifest()
            .unwrap();
        assert_eq!(manifest.data_format_version, CURRENT_DATA_FORMAT_VERSION);

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("data_format_version"));
    }
}
