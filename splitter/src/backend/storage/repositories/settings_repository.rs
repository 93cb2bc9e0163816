//! Settings and the onboarding flag, each stored as its own blob.

use anyhow::Result;
use log::info;
use shared::AppSettings;
use std::sync::Arc;

use crate::backend::storage::json_blob::JsonBlob;
use crate::backend::storage::traits::KeyValueStore;

pub const SETTINGS_KEY: &str = "settings";
pub const ONBOARDING_KEY: &str = "onboarding-completed";

#[derive(Clone)]
pub struct SettingsRepository {
    settings: JsonBlob<AppSettings>,
    onboarding: JsonBlob<bool>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            settings: JsonBlob::new(Arc::clone(&store), SETTINGS_KEY),
            onboarding: JsonBlob::new(store, ONBOARDING_KEY),
        }
    }

    /// Stored settings, or the defaults when nothing usable is stored
    pub fn get_settings(&self) -> AppSettings {
        self.settings.load().unwrap_or_default()
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        self.settings.save(settings)
    }

    pub fn has_seen_onboarding(&self) -> bool {
        self.onboarding.load().unwrap_or(false)
    }

    pub fn mark_onboarding_seen(&self) -> Result<()> {
        if self.has_seen_onboarding() {
            return Ok(());
        }
        self.onboarding.save(&true)?;
        info!("Onboarding marked as seen");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::memory::MemoryStore;
    use shared::Theme;

    #[test]
    fn test_defaults_when_nothing_stored() {
        let repo = SettingsRepository::new(Arc::new(MemoryStore::new()));
        assert_eq!(repo.get_settings(), AppSettings::default());
    }

    #[test]
    fn test_defaults_when_corrupt() {
        let store = MemoryStore::new();
        store.set(SETTINGS_KEY, "][").unwrap();
        let repo = SettingsRepository::new(Arc::new(store));
        assert_eq!(repo.get_settings(), AppSettings::default());
    }

    #[test]
    fn test_fractional_service_percent_keeps_currency_and_theme() {
        let store = MemoryStore::new();
        store
            .set(SETTINGS_KEY, r#"{"servicePercent":12.5,"currency":"USD","theme":"dark"}"#)
            .unwrap();
        let repo = SettingsRepository::new(Arc::new(store));

        let settings = repo.get_settings();
        assert_eq!(settings.service_percent, 13);
        assert_eq!(settings.currency, "USD");
        assert_eq!(settings.theme, Theme::Dark);
    }

    #[test]
    fn test_save_and_reload() {
        let repo = SettingsRepository::new(Arc::new(MemoryStore::new()));
        let settings = AppSettings {
            service_percent: 15,
            currency: "USD".to_string(),
            theme: Theme::Dark,
        };
        repo.save_settings(&settings).unwrap();
        assert_eq!(repo.get_settings(), settings);
    }

    #[test]
    fn test_onboarding_flag() {
        let repo = SettingsRepository::new(Arc::new(MemoryStore::new()));
        assert!(!repo.has_seen_onboarding());
        repo.mark_onboarding_seen().unwrap();
        repo.mark_onboarding_seen().unwrap();
        assert!(repo.has_seen_onboarding());
    }
}
