use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::infrastructure::config::paths;

/// User settings stored in settings.yaml in user config directory.
/// All fields are optional - missing values use defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Doctor name stamped onto new records when not given explicitly
    pub default_doctor: String,

    /// Doctor contact phone printed on receipts
    pub default_phone: String,

    /// Usage directions applied to new records when not given explicitly
    pub default_usage: String,

    /// Whether `suggest` serves completion terms
    pub completion_enabled: bool,

    /// Clinic header line; dropped from receipts while empty
    pub clinic_name: String,

    /// Receipt title line
    pub receipt_title: String,

    /// Receipt font size in points (6-12)
    pub font_size: u32,

    /// Line spacing factor (0.6-1.2)
    pub line_spacing: f64,

    /// Blank-space factor applied to the page height estimate (1.3-2.5)
    pub safety_margin: f64,

    /// Page margin in cm (0.1-0.5)
    pub margin_cm: f64,

    /// Database file path; platform default when empty
    pub database_path: String,

    /// Receipt archive directory; platform default when empty
    pub receipt_dir: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            default_doctor: String::new(),
            default_phone: String::new(),
            default_usage: "水煎服，每日一剂，分早晚两次服用".to_string(),
            completion_enabled: true,
            clinic_name: String::new(),
            receipt_title: "中医干预中药处方".to_string(),
            font_size: 9,
            line_spacing: 0.85,
            safety_margin: 1.5,
            margin_cm: 0.2,
            database_path: String::new(),
            receipt_dir: String::new(),
        }
    }
}

/// Named layout presets trading print density against readability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPreset {
    /// Smallest font, tightest spacing, least paper
    Minimal,
    /// The defaults
    Standard,
    /// Larger font and looser spacing
    Loose,
}

impl LayoutPreset {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "minimal" => Some(LayoutPreset::Minimal),
            "standard" => Some(LayoutPreset::Standard),
            "loose" => Some(LayoutPreset::Loose),
            _ => None,
        }
    }
}

impl UserSettings {
    /// Database path with the platform default applied.
    pub fn effective_database_path(&self) -> PathBuf {
        if self.database_path.trim().is_empty() {
            paths::default_sqlite_path()
        } else {
            PathBuf::from(self.database_path.trim())
        }
    }

    /// Receipt archive directory with the platform default applied.
    pub fn effective_receipt_dir(&self) -> PathBuf {
        if self.receipt_dir.trim().is_empty() {
            paths::default_receipt_dir()
        } else {
            PathBuf::from(self.receipt_dir.trim())
        }
    }

    /// Overwrites the four layout fields from a preset.
    pub fn apply_preset(&mut self, preset: LayoutPreset) {
        let (font_size, line_spacing, safety_margin, margin_cm) = match preset {
            LayoutPreset::Minimal => (7, 0.70, 1.8, 0.15),
            LayoutPreset::Standard => (9, 0.85, 1.5, 0.20),
            LayoutPreset::Loose => (10, 1.00, 1.3, 0.25),
        };
        self.font_size = font_size;
        self.line_spacing = line_spacing;
        self.safety_margin = safety_margin;
        self.margin_cm = margin_cm;
    }

    /// Sets one field by its settings.yaml key, validating ranges.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), DomainError> {
        match key {
            "default_doctor" => self.default_doctor = value.to_string(),
            "default_phone" => self.default_phone = value.to_string(),
            "default_usage" => self.default_usage = value.to_string(),
            "clinic_name" => self.clinic_name = value.to_string(),
            "receipt_title" => self.receipt_title = value.to_string(),
            "database_path" => self.database_path = value.to_string(),
            "receipt_dir" => self.receipt_dir = value.to_string(),
            "completion_enabled" => self.completion_enabled = parse_bool(key, value)?,
            "font_size" => self.font_size = parse_in_range(key, value, 6, 12)?,
            "line_spacing" => self.line_spacing = parse_in_range(key, value, 0.6, 1.2)?,
            "safety_margin" => self.safety_margin = parse_in_range(key, value, 1.3, 2.5)?,
            "margin_cm" => self.margin_cm = parse_in_range(key, value, 0.1, 0.5)?,
            _ => {
                return Err(DomainError::Config(format!("unknown setting: {}", key)));
            }
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, DomainError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(DomainError::Config(format!(
            "{} expects true or false, got {:?}",
            key, value
        ))),
    }
}

fn parse_in_range<T>(key: &str, value: &str, min: T, max: T) -> Result<T, DomainError>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display + Copy,
{
    let parsed: T = value
        .parse()
        .map_err(|_| DomainError::Config(format!("{} expects a number, got {:?}", key, value)))?;
    if parsed < min || parsed > max {
        return Err(DomainError::Config(format!(
            "{} must be between {} and {}",
            key, min, max
        )));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = UserSettings::default();
        assert_eq!(settings.font_size, 9);
        assert_eq!(settings.line_spacing, 0.85);
        assert_eq!(settings.safety_margin, 1.5);
        assert_eq!(settings.margin_cm, 0.2);
        assert!(settings.completion_enabled);
        assert!(settings.default_usage.starts_with("水煎服"));
    }

    #[test]
    fn test_apply_preset_minimal() {
        let mut settings = UserSettings::default();
        settings.apply_preset(LayoutPreset::Minimal);
        assert_eq!(settings.font_size, 7);
        assert_eq!(settings.line_spacing, 0.70);
        assert_eq!(settings.safety_margin, 1.8);
        assert_eq!(settings.margin_cm, 0.15);
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(LayoutPreset::parse("LOOSE"), Some(LayoutPreset::Loose));
        assert_eq!(LayoutPreset::parse("dense"), None);
    }

    #[test]
    fn test_set_validates_ranges() {
        let mut settings = UserSettings::default();
        assert!(settings.set("font_size", "13").is_err());
        assert!(settings.set("font_size", "abc").is_err());
        assert!(settings.set("line_spacing", "0.3").is_err());
        assert!(settings.set("font_size", "10").is_ok());
        assert_eq!(settings.font_size, 10);
    }

    #[test]
    fn test_set_bool_and_strings() {
        let mut settings = UserSettings::default();
        settings.set("completion_enabled", "off").unwrap();
        assert!(!settings.completion_enabled);
        settings.set("default_doctor", "李医生").unwrap();
        assert_eq!(settings.default_doctor, "李医生");
        assert!(settings.set("completion_enabled", "maybe").is_err());
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let mut settings = UserSettings::default();
        assert!(matches!(
            settings.set("paper_width", "58"),
            Err(DomainError::Config(msg)) if msg.contains("paper_width")
        ));
    }

    #[test]
    fn test_effective_paths_fall_back_to_platform_defaults() {
        let settings = UserSettings::default();
        assert_eq!(
            settings.effective_database_path(),
            paths::default_sqlite_path()
        );

        let mut custom = UserSettings::default();
        custom.database_path = "/tmp/rx.db".to_string();
        assert_eq!(custom.effective_database_path(), PathBuf::from("/tmp/rx.db"));
    }

    #[test]
    fn test_yaml_roundtrip_with_missing_fields() {
        let yaml = "default_doctor: 王医生\nfont_size: 11\n";
        let settings: UserSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.default_doctor, "王医生");
        assert_eq!(settings.font_size, 11);
        // Everything else falls back
        assert_eq!(settings.line_spacing, 0.85);

        let dumped = serde_yaml::to_string(&settings).unwrap();
        let reparsed: UserSettings = serde_yaml::from_str(&dumped).unwrap();
        assert_eq!(reparsed.font_size, 11);
    }
}
