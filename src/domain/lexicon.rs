//! Completion lexicon mined from stored prescriptions.
//!
//! Every save enriches the record set, so suggestion quality follows actual
//! prescribing habits instead of a shipped dictionary. Terms are ranked by
//! how often they occur, ties broken lexicographically for stable output.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::domain::model::Prescription;

const HERB_CAP: usize = 100;
const DIAGNOSIS_CAP: usize = 50;
const FORMULA_CAP: usize = 30;
const USAGE_CAP: usize = 20;

/// Cap applied to filtered suggestion output.
pub const FILTER_CAP: usize = 50;

/// Herb terms kept after dose stripping must fall in this length range.
const HERB_TERM_CHARS: std::ops::RangeInclusive<usize> = 2..=6;

/// Whole herb lines at least this long are kept as formula suggestions.
const FORMULA_MIN_CHARS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Herbs,
    Diagnoses,
    Formulas,
    Usages,
    All,
}

impl Category {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "herbs" => Some(Category::Herbs),
            "diagnoses" => Some(Category::Diagnoses),
            "formulas" => Some(Category::Formulas),
            "usages" => Some(Category::Usages),
            "all" => Some(Category::All),
            _ => None,
        }
    }
}

/// Frequency-ranked suggestion lists, one per completion category.
#[derive(Debug, Default)]
pub struct Lexicon {
    herbs: Vec<String>,
    diagnoses: Vec<String>,
    formulas: Vec<String>,
    usages: Vec<String>,
    all: Vec<String>,
}

impl Lexicon {
    /// Mines suggestion lists from the full record set.
    pub fn build(records: &[Prescription]) -> Self {
        let mut herb_counts: HashMap<String, usize> = HashMap::new();
        let mut diagnosis_counts: HashMap<String, usize> = HashMap::new();
        let mut formula_counts: HashMap<String, usize> = HashMap::new();
        let mut usage_counts: HashMap<String, usize> = HashMap::new();

        for rx in records {
            for word in split_diagnosis(&rx.diagnosis) {
                *diagnosis_counts.entry(word).or_insert(0) += 1;
            }

            for line in rx.herb_lines() {
                for part in herb_part_splitter().split(line) {
                    let term = strip_dose(part);
                    if HERB_TERM_CHARS.contains(&term.chars().count()) {
                        *herb_counts.entry(term).or_insert(0) += 1;
                    }
                }
                if line.chars().count() >= FORMULA_MIN_CHARS {
                    *formula_counts.entry(line.to_string()).or_insert(0) += 1;
                }
            }

            let usage = rx.usage.trim();
            if !usage.is_empty() {
                *usage_counts.entry(usage.to_string()).or_insert(0) += 1;
            }
        }

        // Union of herb, diagnosis and usage terms; formulas are whole
        // lines and would drown out the mixed list
        let mut all: Vec<String> = herb_counts
            .keys()
            .chain(diagnosis_counts.keys())
            .chain(usage_counts.keys())
            .cloned()
            .collect();
        all.sort();
        all.dedup();

        Lexicon {
            herbs: top_terms(&herb_counts, HERB_CAP),
            diagnoses: top_terms(&diagnosis_counts, DIAGNOSIS_CAP),
            formulas: top_terms(&formula_counts, FORMULA_CAP),
            usages: top_terms(&usage_counts, USAGE_CAP),
            all,
        }
    }

    /// The ranked list for one category.
    pub fn terms(&self, category: Category) -> &[String] {
        match category {
            Category::Herbs => &self.herbs,
            Category::Diagnoses => &self.diagnoses,
            Category::Formulas => &self.formulas,
            Category::Usages => &self.usages,
            Category::All => &self.all,
        }
    }

    /// Case-insensitive substring filter over one category, capped for display.
    pub fn filter(&self, category: Category, fragment: &str) -> Vec<String> {
        let needle = fragment.trim().to_lowercase();
        let source = self.terms(category);
        if needle.is_empty() {
            return source.iter().take(FILTER_CAP).cloned().collect();
        }
        source
            .iter()
            .filter(|term| term.to_lowercase().contains(&needle))
            .take(FILTER_CAP)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty() && self.formulas.is_empty()
    }

    /// Total distinct terms in the mixed list.
    pub fn vocabulary_len(&self) -> usize {
        self.all.len()
    }
}

/// Splits diagnosis text on CJK and ASCII punctuation, keeping words of
/// at least two characters.
fn split_diagnosis(text: &str) -> Vec<String> {
    diagnosis_splitter()
        .split(text)
        .map(str::trim)
        .filter(|word| word.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Strips dose suffixes from a herb part: digits onward, then a unit
/// character onward ("当归10克" and "田七 15g" both yield the bare name).
fn strip_dose(part: &str) -> String {
    let part = part.trim();
    let without_digits = digit_tail().replace(part, "");
    let without_unit = unit_tail().replace(&without_digits, "");
    without_unit.trim().to_string()
}

fn top_terms(counts: &HashMap<String, usize>, cap: usize) -> Vec<String> {
    let mut entries: Vec<(&String, usize)> = counts.iter().map(|(w, c)| (w, *c)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
        .into_iter()
        .take(cap)
        .map(|(word, _)| word.clone())
        .collect()
}

fn diagnosis_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[，,。、；：:\s\[\]【】]+").expect("valid regex"))
}

fn herb_part_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[，,、\s]+").expect("valid regex"))
}

fn digit_tail() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+.*$").expect("valid regex"))
}

fn unit_tail() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[克g粒片包钱两升].*$").expect("valid regex"))
}
