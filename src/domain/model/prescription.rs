use chrono::Local;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::domain::error::DomainError;

/// Timestamp format shared by the database and receipt output.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Prescription entity - one recorded herbal prescription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: String,
    pub patient_name: String,
    pub gender: String,
    pub age: String,
    pub phone: String,
    /// 中医辨证 free-text diagnosis
    pub diagnosis: String,
    /// Herb list, one entry per line
    pub herbs: String,
    /// Usage directions (用法)
    pub usage: String,
    pub doctor: String,
    pub doctor_phone: String,
    pub created_at: String,
    /// Set when a receipt was last sent to a printer
    pub printed_at: Option<String>,
}

impl Prescription {
    pub fn new(patient_name: String, herbs: String) -> Self {
        Self {
            id: Ulid::new().to_string(),
            patient_name,
            gender: "男".to_string(),
            age: String::new(),
            phone: String::new(),
            diagnosis: String::new(),
            herbs,
            usage: String::new(),
            doctor: String::new(),
            doctor_phone: String::new(),
            created_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            printed_at: None,
        }
    }

    /// Checks the fields every stored record must carry.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.patient_name.trim().is_empty() {
            return Err(DomainError::Validation("患者姓名不能为空".to_string()));
        }
        if self.herb_lines().next().is_none() {
            return Err(DomainError::Validation("处方内容不能为空".to_string()));
        }
        Ok(())
    }

    /// Trimmed, non-blank herb lines in entry order.
    pub fn herb_lines(&self) -> impl Iterator<Item = &str> {
        self.herbs
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    /// Herb list flattened to a single line, truncated for list views.
    pub fn summary(&self) -> String {
        let flat = self.herbs.replace('\n', " ");
        let flat = flat.trim();
        if flat.chars().count() > 30 {
            let head: String = flat.chars().take(30).collect();
            format!("{}...", head)
        } else {
            flat.to_string()
        }
    }

    /// Creation date at day precision.
    pub fn created_day(&self) -> &str {
        self.created_at.get(..10).unwrap_or(&self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Prescription {
        let mut rx = Prescription::new("张三".to_string(), "当归10克\n白芍15克".to_string());
        rx.diagnosis = "气血两虚".to_string();
        rx
    }

    #[test]
    fn test_new_stamps_id_and_time() {
        let rx = sample();
        assert_eq!(rx.id.len(), 26);
        assert_eq!(rx.created_at.len(), 19);
        assert!(rx.printed_at.is_none());
        assert_eq!(rx.gender, "男");
    }

    #[test]
    fn test_validate_requires_patient_name() {
        let mut rx = sample();
        rx.patient_name = "   ".to_string();
        assert!(matches!(
            rx.validate(),
            Err(DomainError::Validation(msg)) if msg.contains("姓名")
        ));
    }

    #[test]
    fn test_validate_requires_herbs() {
        let mut rx = sample();
        rx.herbs = "\n  \n".to_string();
        assert!(rx.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_complete_record() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_herb_lines_skips_blanks() {
        let mut rx = sample();
        rx.herbs = "  当归10克  \n\n白芍15克\n   \n甘草6克".to_string();
        let lines: Vec<&str> = rx.herb_lines().collect();
        assert_eq!(lines, vec!["当归10克", "白芍15克", "甘草6克"]);
    }

    #[test]
    fn test_summary_truncates_at_thirty_chars() {
        let mut rx = sample();
        rx.herbs = "药".repeat(40);
        let summary = rx.summary();
        assert_eq!(summary.chars().count(), 33);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_summary_flattens_lines() {
        let rx = sample();
        assert_eq!(rx.summary(), "当归10克 白芍15克");
    }

    #[test]
    fn test_created_day() {
        let mut rx = sample();
        rx.created_at = "2024-03-15 09:30:00".to_string();
        assert_eq!(rx.created_day(), "2024-03-15");
    }
}
