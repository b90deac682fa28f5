use super::SettingsRepositoryTrait;
use crate::errors::Result;
use crate::recommendations::RecommendationConfig;
use crate::settings::{Settings, SettingsUpdate, TaxSettings};
use log::{debug, warn};
use std::sync::Arc;

pub trait SettingsServiceTrait: Send + Sync {
    fn get_settings(&self) -> Result<Settings>;

    /// Validates the merged settings before anything is saved.
    fn update_settings(&self, update: &SettingsUpdate) -> Result<Settings>;

    fn get_tax_settings(&self) -> Result<TaxSettings>;

    fn get_recommendation_config(&self) -> Result<RecommendationConfig>;
}

pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        Self {
            settings_repository,
        }
    }
}

impl SettingsServiceTrait for SettingsService {
    fn get_settings(&self) -> Result<Settings> {
        match self.settings_repository.get_settings()? {
            Some(settings) => {
                if let Err(e) = settings.validate() {
                    warn!("Stored settings are invalid ({}); using defaults", e);
                    return Ok(Settings::default());
                }
                Ok(settings)
            }
            None => {
                debug!("No stored settings; using defaults");
                Ok(Settings::default())
            }
        }
    }

    fn update_settings(&self, update: &SettingsUpdate) -> Result<Settings> {
        let mut settings = self.get_settings()?;
        if let Some(tax) = &update.tax {
            settings.tax = tax.clone();
        }
        if let Some(recommendations) = &update.recommendations {
            settings.recommendations = recommendations.clone();
        }
        settings.validate()?;
        self.settings_repository.save_settings(&settings)?;
        Ok(settings)
    }

    fn get_tax_settings(&self) -> Result<TaxSettings> {
        Ok(self.get_settings()?.tax)
    }

    fn get_recommendation_config(&self) -> Result<RecommendationConfig> {
        Ok(self.get_settings()?.recommendations)
    }
}
