use crate::domain::error::DomainError;
use crate::domain::model::Prescription;
use crate::domain::repository::{PrescriptionRepository, Result};

pub struct PrescriptionService<R: PrescriptionRepository> {
    repo: R,
}

impl<R: PrescriptionRepository> PrescriptionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and persists a new record.
    pub fn create(&self, prescription: Prescription) -> Result<Prescription> {
        prescription.validate()?;
        self.repo.save(&prescription)?;
        tracing::info!(
            id = %prescription.id,
            patient = %prescription.patient_name,
            "Saved prescription"
        );
        Ok(prescription)
    }

    pub fn get(&self, id: &str) -> Result<Prescription> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| DomainError::NotFound(id.to_string()))
    }

    pub fn get_all(&self) -> Result<Vec<Prescription>> {
        self.repo.find_all()
    }

    /// Substring search on patient name; a blank pattern lists everything.
    pub fn search(&self, pattern: &str) -> Result<Vec<Prescription>> {
        self.repo.search_by_patient(pattern.trim())
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.get(id)?;
        self.repo.delete(id)?;
        tracing::info!(id, "Deleted prescription");
        Ok(())
    }
}
