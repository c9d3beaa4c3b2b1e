use std::path::PathBuf;

/// Get platform-specific configuration directory
pub fn config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fangji")
    }

    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Library/Application Support/fangji")
    }

    #[cfg(target_os = "linux")]
    {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fangji")
    }
}

pub fn default_sqlite_path() -> PathBuf {
    config_dir().join("prescriptions.db")
}

/// Default archive directory for rendered receipt files.
pub fn default_receipt_dir() -> PathBuf {
    config_dir().join("receipts")
}

pub fn log_dir() -> PathBuf {
    config_dir().join("logs")
}
