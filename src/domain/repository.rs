use crate::domain::error::DomainError;
use crate::domain::model::Prescription;

pub type Result<T> = std::result::Result<T, DomainError>;

/// Repository trait for Prescription entity
pub trait PrescriptionRepository: Send + Sync {
    fn find_by_id(&self, id: &str) -> Result<Option<Prescription>>;
    /// All records, newest first.
    fn find_all(&self) -> Result<Vec<Prescription>>;
    /// Records whose patient name contains `fragment`, newest first.
    fn search_by_patient(&self, fragment: &str) -> Result<Vec<Prescription>>;
    fn save(&self, prescription: &Prescription) -> Result<()>;
    fn mark_printed(&self, id: &str, printed_at: &str) -> Result<()>;
    fn delete(&self, id: &str) -> Result<()>;
}

// Implement PrescriptionRepository for Box<dyn PrescriptionRepository> to allow dynamic dispatch
impl PrescriptionRepository for Box<dyn PrescriptionRepository> {
    fn find_by_id(&self, id: &str) -> Result<Option<Prescription>> {
        (**self).find_by_id(id)
    }

    fn find_all(&self) -> Result<Vec<Prescription>> {
        (**self).find_all()
    }

    fn search_by_patient(&self, fragment: &str) -> Result<Vec<Prescription>> {
        (**self).search_by_patient(fragment)
    }

    fn save(&self, prescription: &Prescription) -> Result<()> {
        (**self).save(prescription)
    }

    fn mark_printed(&self, id: &str, printed_at: &str) -> Result<()> {
        (**self).mark_printed(id, printed_at)
    }

    fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id)
    }
}
