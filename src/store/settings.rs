use serde::{Deserialize, Serialize};
use tracing::warn;

use super::medium::StorageMedium;

pub const SETTINGS_KEY: &str = "settings";

/// User configuration. Persisted wholesale under a single key; callers merge
/// changes in memory and commit full objects.
///
/// Every field carries its own serde default so a payload written by an older
/// version acquires defaults for the fields it is missing on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Glasses per day that count as a met goal.
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
    /// Volume of one logged glass in milliliters.
    #[serde(default = "default_glass_size", rename = "glassSize")]
    pub glass_size_ml: u32,
    #[serde(default)]
    pub reminder_enabled: bool,
    /// Minutes between reminder notifications.
    #[serde(default = "default_reminder_interval", rename = "reminderInterval")]
    pub reminder_interval_minutes: u32,
}

fn default_daily_goal() -> u32 {
    8
}
fn default_glass_size() -> u32 {
    250
}
fn default_reminder_interval() -> u32 {
    60
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            daily_goal: default_daily_goal(),
            glass_size_ml: default_glass_size(),
            reminder_enabled: false,
            reminder_interval_minutes: default_reminder_interval(),
        }
    }
}

/// Read/write access to the persisted [Settings].
pub struct SettingsStore<M> {
    medium: M,
}

impl<M: StorageMedium> SettingsStore<M> {
    pub fn new(medium: M) -> Self {
        Self { medium }
    }

    /// Returns the persisted settings merged over defaults. A missing key, an
    /// unavailable medium and an unreadable payload all resolve to defaults.
    pub fn read(&self) -> Settings {
        let Some(raw) = self.medium.get(SETTINGS_KEY) else {
            return Settings::default();
        };
        match serde_json::from_str(&raw) {
            Ok(v) => v,
            Err(e) => {
                warn!("Stored settings are not valid json, falling back to defaults: {e}");
                Settings::default()
            }
        }
    }

    /// Replaces the persisted settings wholesale. Range and preset checks are
    /// a caller concern, this layer stores what it is given.
    pub fn write(&self, settings: &Settings) {
        match serde_json::to_string(settings) {
            Ok(v) => self.medium.set(SETTINGS_KEY, &v),
            Err(e) => warn!("Failed to serialize settings: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::store::medium::{MemoryMedium, StorageMedium};

    use super::{Settings, SettingsStore, SETTINGS_KEY};

    #[test]
    fn defaults_when_nothing_persisted() {
        let store = SettingsStore::new(MemoryMedium::new());

        let settings = store.read();
        assert_eq!(
            settings,
            Settings {
                daily_goal: 8,
                glass_size_ml: 250,
                reminder_enabled: false,
                reminder_interval_minutes: 60,
            }
        );
    }

    #[test]
    fn written_settings_read_back_exactly() {
        let store = SettingsStore::new(MemoryMedium::new());

        let settings = Settings {
            daily_goal: 10,
            glass_size_ml: 500,
            reminder_enabled: true,
            reminder_interval_minutes: 30,
        };
        store.write(&settings);

        assert_eq!(store.read(), settings);
    }

    #[test]
    fn persisted_field_names_match_the_storage_layout() {
        let medium = MemoryMedium::new();
        let store = SettingsStore::new(medium.clone());

        store.write(&Settings::default());

        let raw = medium.get(SETTINGS_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["dailyGoal"], 8);
        assert_eq!(value["glassSize"], 250);
        assert_eq!(value["reminderEnabled"], false);
        assert_eq!(value["reminderInterval"], 60);
    }

    #[test]
    fn missing_fields_acquire_defaults() {
        let medium = MemoryMedium::new();
        medium.set(SETTINGS_KEY, "{\"dailyGoal\":12}");
        let store = SettingsStore::new(medium);

        let settings = store.read();
        assert_eq!(settings.daily_goal, 12);
        assert_eq!(settings.glass_size_ml, 250);
        assert_eq!(settings.reminder_interval_minutes, 60);
    }

    #[test]
    fn corrupt_payload_degrades_to_defaults() {
        let medium = MemoryMedium::new();
        medium.set(SETTINGS_KEY, "{\"dailyGoal\":");
        let store = SettingsStore::new(medium);

        assert_eq!(store.read(), Settings::default());
    }
}
