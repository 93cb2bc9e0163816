//! Application settings: service percentage, currency and theme.

use anyhow::Result;
use log::{info, warn};
use shared::{AppSettings, Theme, UpdateSettingsRequest};

use crate::backend::domain::money;
use crate::backend::storage::SettingsRepository;

#[derive(Clone)]
pub struct SettingsService {
    repository: SettingsRepository,
}

impl SettingsService {
    pub fn new(repository: SettingsRepository) -> Self {
        Self { repository }
    }

    /// Stored settings merged over the defaults
    pub fn get_settings(&self) -> AppSettings {
        self.repository.get_settings()
    }

    /// Apply the fields present in the request and persist the result.
    ///
    /// The service percentage is clamped to 0..=100. Currencies outside the
    /// supported table are kept, and display with the fallback symbol.
    pub fn update_settings(&self, request: UpdateSettingsRequest) -> Result<AppSettings> {
        let mut settings = self.repository.get_settings();

        if let Some(percent) = request.service_percent {
            let clamped = percent.min(AppSettings::MAX_SERVICE_PERCENT);
            if clamped != percent {
                warn!("Service percent {} out of range, clamped to {}", percent, clamped);
            }
            settings.service_percent = clamped;
        }

        if let Some(currency) = request.currency {
            let code = currency.trim().to_uppercase();
            if !code.is_empty() {
                if !money::is_supported_currency(&code) {
                    warn!("Unsupported currency {}, amounts will use {}", code, money::FALLBACK_SYMBOL);
                }
                settings.currency = code;
            }
        }

        if let Some(theme) = request.theme {
            settings.theme = theme;
        }

        self.repository.save_settings(&settings)?;
        info!(
            "Settings updated: {}% service, {}, {} theme",
            settings.service_percent, settings.currency, settings.theme
        );
        Ok(settings)
    }

    pub fn toggle_theme(&self) -> Result<Theme> {
        let mut settings = self.repository.get_settings();
        settings.theme = settings.theme.toggled();
        self.repository.save_settings(&settings)?;
        info!("Theme switched to {}", settings.theme);
        Ok(settings.theme)
    }

    pub fn has_seen_onboarding(&self) -> bool {
        self.repository.has_seen_onboarding()
    }

    pub fn mark_onboarding_seen(&self) -> Result<()> {
        self.repository.mark_onboarding_seen()
    }
}
