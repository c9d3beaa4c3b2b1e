mod export_service;
mod lexicon_service;
mod prescription_service;
mod receipt_service;

pub use export_service::{ExportFormat, ExportService};
pub use lexicon_service::LexiconService;
pub use prescription_service::PrescriptionService;
pub use receipt_service::ReceiptService;
