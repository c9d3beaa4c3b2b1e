use crate::application::service::{
    ExportService, LexiconService, PrescriptionService, ReceiptService,
};
use crate::domain::receipt::ReceiptProfile;
use crate::domain::repository::PrescriptionRepository;
use crate::infrastructure::config::UserSettings;

/// Type alias for the dynamic repository type
pub type DynPrescriptionRepository = Box<dyn PrescriptionRepository>;

pub struct CliState {
    pub prescriptions: PrescriptionService<DynPrescriptionRepository>,
    pub lexicon: LexiconService<DynPrescriptionRepository>,
    pub export: ExportService<DynPrescriptionRepository>,
    pub receipts: ReceiptService<DynPrescriptionRepository>,
    pub settings: UserSettings,
}

impl CliState {
    pub fn new(
        prescription_repo: DynPrescriptionRepository,
        lexicon_repo: DynPrescriptionRepository,
        export_repo: DynPrescriptionRepository,
        receipt_repo: DynPrescriptionRepository,
        settings: UserSettings,
    ) -> Self {
        let profile = ReceiptProfile {
            clinic_name: settings.clinic_name.clone(),
            title: settings.receipt_title.clone(),
            font_size: settings.font_size,
            line_spacing: settings.line_spacing,
            safety_margin: settings.safety_margin,
            margin_cm: settings.margin_cm,
        };
        let receipt_dir = settings.effective_receipt_dir();

        Self {
            prescriptions: PrescriptionService::new(prescription_repo),
            lexicon: LexiconService::new(lexicon_repo),
            export: ExportService::new(export_repo),
            receipts: ReceiptService::new(receipt_repo, profile, receipt_dir),
            settings,
        }
    }
}
