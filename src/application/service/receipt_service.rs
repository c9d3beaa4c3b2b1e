use std::path::PathBuf;

use chrono::Local;

use crate::domain::model::Prescription;
use crate::domain::receipt::{self, ReceiptProfile};
use crate::domain::repository::{PrescriptionRepository, Result};
use crate::infrastructure::printing;

pub struct ReceiptService<R: PrescriptionRepository> {
    repo: R,
    profile: ReceiptProfile,
    receipt_dir: PathBuf,
}

impl<R: PrescriptionRepository> ReceiptService<R> {
    pub fn new(repo: R, profile: ReceiptProfile, receipt_dir: PathBuf) -> Self {
        Self {
            repo,
            profile,
            receipt_dir,
        }
    }

    /// Receipt text for a prescription, without touching disk.
    pub fn render(&self, prescription: &Prescription) -> String {
        receipt::render(prescription, &self.profile)
    }

    /// Estimated single-page height in cm under the current layout.
    pub fn estimate_height_cm(&self, prescription: &Prescription) -> f64 {
        receipt::estimate_height_cm(prescription, &self.profile)
    }

    /// Renders the receipt and writes it into the archive directory.
    /// Returns the file path.
    pub fn archive(&self, prescription: &Prescription) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.receipt_dir)?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = sanitize_filename(&format!("处方_{}_{}.txt", prescription.patient_name, stamp));
        let path = self.receipt_dir.join(filename);

        std::fs::write(&path, self.render(prescription))?;
        tracing::info!(path = %path.display(), "Archived receipt");
        Ok(path)
    }

    /// Archives the receipt and sends it to the spooler, stamping the
    /// record as printed once dispatch succeeds.
    pub fn print(&self, prescription: &Prescription, printer: Option<&str>) -> Result<PathBuf> {
        let path = self.archive(prescription)?;

        printing::print_file(&path, printer)?;
        let printed_at = Local::now()
            .format(crate::domain::model::TIMESTAMP_FORMAT)
            .to_string();
        self.repo.mark_printed(&prescription.id, &printed_at)?;

        tracing::info!(
            id = %prescription.id,
            printer = printer.unwrap_or("(default)"),
            "Dispatched receipt to printer"
        );
        Ok(path)
    }
}

/// Replaces characters that are unsafe in filenames.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
