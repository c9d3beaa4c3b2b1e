use std::io::Write;
use std::path::Path;

use crate::domain::error::DomainError;
use crate::domain::model::Prescription;
use crate::domain::repository::{PrescriptionRepository, Result};

/// Byte-order mark so spreadsheet tools detect UTF-8 in the CSV.
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

const CSV_HEADER: [&str; 10] = [
    "姓名",
    "性别",
    "年龄",
    "电话",
    "中医辨证",
    "处方",
    "用法",
    "医生",
    "医生电话",
    "日期",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

pub struct ExportService<R: PrescriptionRepository> {
    repo: R,
}

impl<R: PrescriptionRepository> ExportService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Writes every record to `path`, newest first. Returns the record
    /// count; an empty record set is refused rather than written.
    pub fn export(&self, path: &Path, format: ExportFormat) -> Result<usize> {
        let records = self.repo.find_all()?;
        if records.is_empty() {
            return Err(DomainError::Validation("没有数据可导出".to_string()));
        }

        let bytes = match format {
            ExportFormat::Csv => csv_bytes(&records)?,
            ExportFormat::Json => serde_json::to_vec_pretty(&records)?,
        };
        std::fs::write(path, bytes)?;

        tracing::info!(
            count = records.len(),
            path = %path.display(),
            "Exported records"
        );
        Ok(records.len())
    }
}

/// CSV in the spreadsheet-friendly shape: BOM, quoted fields, no id column.
fn csv_bytes(records: &[Prescription]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(&mut buf);

    writer.write_record(CSV_HEADER)?;
    for rx in records {
        writer.write_record([
            rx.patient_name.as_str(),
            rx.gender.as_str(),
            rx.age.as_str(),
            rx.phone.as_str(),
            rx.diagnosis.as_str(),
            rx.herbs.as_str(),
            rx.usage.as_str(),
            rx.doctor.as_str(),
            rx.doctor_phone.as_str(),
            rx.created_at.as_str(),
        ])?;
    }
    writer.flush()?;
    drop(writer);

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::{
        init_test_database, SqlitePrescriptionRepository,
    };

    fn service_with_records(count: usize) -> ExportService<SqlitePrescriptionRepository> {
        let repo = SqlitePrescriptionRepository::new(init_test_database());
        for i in 0..count {
            let mut rx = Prescription::new(format!("患者{}", i), "当归10克\n白芍15克".to_string());
            rx.created_at = format!("2024-01-{:02} 08:00:00", i + 1);
            repo.save(&rx).unwrap();
        }
        ExportService::new(repo)
    }

    #[test]
    fn test_export_refuses_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let result = service_with_records(0).export(&dir.path().join("out.csv"), ExportFormat::Csv);
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_csv_has_bom_header_and_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let count = service_with_records(2).export(&path, ExportFormat::Csv).unwrap();
        assert_eq!(count, 2);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], UTF8_BOM);

        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(text.starts_with(
            "\"姓名\",\"性别\",\"年龄\",\"电话\",\"中医辨证\",\"处方\",\"用法\",\"医生\",\"医生电话\",\"日期\""
        ));

        // Newest first: 患者1 was created later
        let mut reader = csv::ReaderBuilder::new().from_reader(&bytes[3..]);
        let names: Vec<String> = reader
            .records()
            .map(|record| record.unwrap().get(0).unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["患者1", "患者0"]);
    }

    #[test]
    fn test_csv_keeps_multiline_herbs_in_one_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        service_with_records(1).export(&path, ExportFormat::Csv).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let mut reader = csv::ReaderBuilder::new().from_reader(&bytes[3..]);
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.get(5).unwrap(), "当归10克\n白芍15克");
    }

    #[test]
    fn test_json_export_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        service_with_records(3).export(&path, ExportFormat::Json).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let records: Vec<Prescription> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].patient_name, "患者2");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(ExportFormat::parse("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::parse("xlsx"), None);
    }
}
