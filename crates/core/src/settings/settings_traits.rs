//! Repository traits for settings.

use crate::errors::Result;
use crate::settings::Settings;

/// Repository trait for persisted settings.
pub trait SettingsRepositoryTrait: Send + Sync {
    /// Returns `None` when nothing has been stored yet.
    fn get_settings(&self) -> Result<Option<Settings>>;

    fn save_settings(&self, settings: &Settings) -> Result<()>;
}
