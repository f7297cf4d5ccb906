//! Heuristic field extraction for job postings.
//!
//! Four components, all best-effort — a parse failure degrades to a
//! null/empty/default field, never an error:
//! - [`normalize_posted_date`] — relative/absolute date text to calendar dates
//! - [`SalaryExtractor`] — annualized min/max/currency from free text
//! - [`SkillExtractor`] — dictionary skill spotting with negation suppression
//! - [`SeniorityClassifier`] — priority-ordered tier classification
//!
//! The dictionaries live in [`tables`] and are injected at construction.

pub mod dates;
pub mod salary;
pub mod seniority;
pub mod skills;
pub mod tables;

pub use dates::normalize_posted_date;
pub use salary::{SalaryExtractor, SalaryInfo};
pub use seniority::SeniorityClassifier;
pub use skills::SkillExtractor;

/// The full extractor bundle applied to every harvested posting.
#[derive(Default)]
pub struct Extractors {
    pub salary: SalaryExtractor,
    pub skills: SkillExtractor,
    pub seniority: SeniorityClassifier,
}

/// Slice `text` around `span`, extended `before`/`after` bytes on each side
/// and clamped to char boundaries (descriptions contain `€` and other
/// multi-byte text).
pub(crate) fn context_window(text: &str, span: (usize, usize), before: usize, after: usize) -> &str {
    let mut lo = span.0.saturating_sub(before);
    while lo > 0 && !text.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = span.1.saturating_add(after).min(text.len());
    while hi < text.len() && !text.is_char_boundary(hi) {
        hi += 1;
    }
    &text[lo..hi]
}
