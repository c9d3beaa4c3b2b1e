pub mod loader;
pub mod paths;
mod settings;

pub use settings::{LayoutPreset, UserSettings};

use std::sync::OnceLock;

static SETTINGS: OnceLock<UserSettings> = OnceLock::new();

/// Initialize configuration system (called at startup)
pub fn init() {
    SETTINGS.get_or_init(loader::load_user_settings);
    tracing::info!("Configuration initialized");
}

/// Get current user settings
pub fn settings() -> &'static UserSettings {
    SETTINGS.get().expect("Config not initialized")
}
