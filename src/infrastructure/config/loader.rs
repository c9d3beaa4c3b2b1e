use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::paths::config_dir;
use super::settings::UserSettings;

/// Load a YAML file from disk
pub fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)?;
    let value: T = serde_yaml::from_str(&content)?;
    Ok(value)
}

/// Save a value to a YAML file
pub fn save_yaml<T: Serialize>(path: impl AsRef<Path>, value: &T) -> anyhow::Result<()> {
    let content = serde_yaml::to_string(value)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load user settings from settings.yaml in user config directory
/// Returns default settings if file doesn't exist or is invalid
pub fn load_user_settings() -> UserSettings {
    load_settings_from(&settings_file_path())
}

fn load_settings_from(path: &Path) -> UserSettings {
    if path.exists() {
        match load_yaml::<UserSettings>(path) {
            Ok(settings) => {
                tracing::info!("Loaded user settings from {:?}", path);
                return settings;
            }
            Err(e) => {
                tracing::warn!("Failed to parse settings.yaml: {}, using defaults", e);
            }
        }
    } else {
        tracing::debug!("No settings.yaml found, using defaults");
    }

    UserSettings::default()
}

/// Save user settings to settings.yaml in user config directory
pub fn save_user_settings(settings: &UserSettings) -> anyhow::Result<()> {
    ensure_config_dir()?;
    let settings_path = settings_file_path();
    save_yaml(&settings_path, settings)?;
    tracing::info!("Saved user settings to {:?}", settings_path);
    Ok(())
}

/// Ensure user config directory exists
pub fn ensure_config_dir() -> std::io::Result<()> {
    let dir = config_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(())
}

/// Get the path to user settings file (for display purposes)
pub fn settings_file_path() -> PathBuf {
    config_dir().join("settings.yaml")
}
