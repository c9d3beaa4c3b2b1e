use crate::domain::lexicon::Lexicon;
use crate::domain::repository::{PrescriptionRepository, Result};

pub struct LexiconService<R: PrescriptionRepository> {
    repo: R,
}

impl<R: PrescriptionRepository> LexiconService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Mines the completion lexicon from every stored record.
    pub fn build(&self) -> Result<Lexicon> {
        let records = self.repo.find_all()?;
        let lexicon = Lexicon::build(&records);
        tracing::debug!(
            records = records.len(),
            terms = lexicon.vocabulary_len(),
            "Built completion lexicon"
        );
        Ok(lexicon)
    }
}
