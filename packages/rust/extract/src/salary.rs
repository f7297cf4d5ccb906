//! Salary extraction: layered numeric parsing with currency detection,
//! period annualization, and false-positive suppression.
//!
//! Free text mixes salary figures with unrelated numbers (years, headcounts,
//! IDs), so candidates are vetted against context: ignore terms reject
//! counts, `k` suffixes and currency adjacency accept outright, and bare
//! numbers must sit near a salary hint to survive.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::context_window;
use crate::tables::{
    CURRENCY_MARKERS, CURRENCY_SYMBOLS, DEFAULT_CURRENCY, SALARY_HINT_TERMS, SALARY_IGNORE_TERMS,
    SALARY_PERIODS,
};

/// Lookahead window (bytes) for ignore terms and period keywords.
const LOOKAHEAD: usize = 30;

/// Context window (bytes, each side) for salary-hint terms.
const HINT_WINDOW: usize = 50;

/// Adjacency window (bytes, each side) for currency symbols.
const CURRENCY_ADJACENCY: usize = 5;

/// Annualized sanity band; values outside are years, IDs, or noise.
const SANE_MIN: i64 = 15_000;
const SANE_MAX: i64 = 500_000;

// ---------------------------------------------------------------------------
// Regex patterns (compiled once)
// ---------------------------------------------------------------------------

/// `<int> <sep> <int>k` ranges: "80k - 100k", "€80k – €100k", "70 to 90k".
static RANGE_WITH_K_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*k?\s*(?:-|–|—|to)\s*[€£$]?\s*(\d+)\s*k\b")
        .expect("range-with-k regex")
});

/// Bare `<int> <sep> <int>` ranges; grouped-digit alternative first so
/// "60,000" is not captured as "60".
static BARE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(\d{1,3}(?:[ \u{a0},.]\d{3})+|\d+)\s*(?:-|–|—|to)\s*[€£$]?\s*(\d{1,3}(?:[ \u{a0},.]\d{3})+|\d+)",
    )
    .expect("bare range regex")
});

/// Standalone numbers with optional digit grouping and `k` suffix.
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,3}(?:[ \u{a0},.]\d{3})+|\d+)\s*(k\b)?").expect("number regex")
});

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Extracted salary figures, annualized to yearly amounts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SalaryInfo {
    /// Smallest surviving figure.
    pub min: Option<i64>,
    /// Largest surviving figure; equals `min` when only one survives.
    pub max: Option<i64>,
    /// Detected currency code; `None` only for blank input.
    pub currency: Option<String>,
}

/// A number awaiting vetting, with the span of the match that produced it.
struct Candidate {
    value: i64,
    k_suffixed: bool,
    span: (usize, usize),
}

/// Multi-strategy salary extractor.
pub struct SalaryExtractor {
    ignore_terms: Vec<String>,
    hint_terms: Vec<String>,
}

impl Default for SalaryExtractor {
    fn default() -> Self {
        Self::new(SALARY_IGNORE_TERMS, SALARY_HINT_TERMS)
    }
}

impl SalaryExtractor {
    /// Build an extractor with custom ignore/hint term tables.
    pub fn new(ignore_terms: &[&str], hint_terms: &[&str]) -> Self {
        Self {
            ignore_terms: ignore_terms.iter().map(|t| t.to_lowercase()).collect(),
            hint_terms: hint_terms.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    /// Extract an annualized salary range from free text.
    ///
    /// Strategies run in order — k-suffixed ranges, bare ranges gated on a
    /// period keyword, then single numbers — and the first strategy whose
    /// pattern matches at all settles the outcome: candidates it rejects do
    /// not fall through to later strategies. Currency detection always runs,
    /// so a text with no surviving figure still reports its currency.
    pub fn extract(&self, text: &str) -> SalaryInfo {
        if text.trim().is_empty() {
            return SalaryInfo::default();
        }

        let currency = detect_currency(text);
        let survivors = self
            .range_with_suffix(text)
            .or_else(|| self.bare_range(text))
            .unwrap_or_else(|| self.singles(text));

        let min = survivors.iter().min().copied();
        let max = survivors.iter().max().copied();
        if min.is_some() {
            debug!(?min, ?max, currency, "salary figures extracted");
        }
        SalaryInfo {
            min,
            max,
            currency: Some(currency.to_string()),
        }
    }

    /// Strategy: `<int> <sep> <int>k` ranges, both bounds ×1000.
    /// Returns `None` when the pattern matched nowhere.
    fn range_with_suffix(&self, text: &str) -> Option<Vec<i64>> {
        let mut matched = false;
        let mut survivors = Vec::new();
        for caps in RANGE_WITH_K_RE.captures_iter(text) {
            matched = true;
            let span = match_span(&caps);
            let multiplier = detect_period(&lookahead(text, span)).unwrap_or(1);
            for idx in [1, 2] {
                let Some(value) = parse_grouped_number(&caps[idx]) else {
                    continue;
                };
                let candidate = Candidate {
                    value: value.saturating_mul(1000),
                    k_suffixed: true,
                    span,
                };
                if let Some(v) = self.vet(text, &candidate, multiplier) {
                    survivors.push(v);
                }
            }
        }
        matched.then_some(survivors)
    }

    /// Strategy: bare ranges, accepted only with a trailing period keyword.
    /// Returns `None` when the pattern matched nowhere.
    fn bare_range(&self, text: &str) -> Option<Vec<i64>> {
        let mut matched = false;
        let mut survivors = Vec::new();
        for caps in BARE_RANGE_RE.captures_iter(text) {
            matched = true;
            let span = match_span(&caps);
            let Some(multiplier) = detect_period(&lookahead(text, span)) else {
                continue;
            };
            for idx in [1, 2] {
                let Some(value) = parse_grouped_number(&caps[idx]) else {
                    continue;
                };
                let candidate = Candidate {
                    value,
                    k_suffixed: false,
                    span,
                };
                if let Some(v) = self.vet(text, &candidate, multiplier) {
                    survivors.push(v);
                }
            }
        }
        matched.then_some(survivors)
    }

    /// Strategy: every standalone number, `k` expanded to ×1000.
    fn singles(&self, text: &str) -> Vec<i64> {
        let mut survivors = Vec::new();
        for caps in NUMBER_RE.captures_iter(text) {
            let num = caps.get(1).expect("number group");
            let end = caps.get(2).map_or(num.end(), |k| k.end());
            let span = (num.start(), end);
            let Some(mut value) = parse_grouped_number(num.as_str()) else {
                continue;
            };
            let k_suffixed = caps.get(2).is_some();
            if k_suffixed {
                value = value.saturating_mul(1000);
            }
            let multiplier = detect_period(&lookahead(text, span)).unwrap_or(1);
            let candidate = Candidate {
                value,
                k_suffixed,
                span,
            };
            if let Some(v) = self.vet(text, &candidate, multiplier) {
                survivors.push(v);
            }
        }
        survivors
    }

    /// Per-candidate acceptance: ignore terms reject, `k`/currency adjacency
    /// accepts outright, otherwise a salary hint must appear nearby; the
    /// annualized value must land inside the sanity band.
    fn vet(&self, text: &str, candidate: &Candidate, multiplier: i64) -> Option<i64> {
        let ahead = lookahead(text, candidate.span);
        if self.ignore_terms.iter().any(|t| ahead.contains(t.as_str())) {
            return None;
        }

        let confident = candidate.k_suffixed || currency_adjacent(text, candidate.span);
        if !confident {
            let around =
                context_window(text, candidate.span, HINT_WINDOW, HINT_WINDOW).to_lowercase();
            if !self.hint_terms.iter().any(|t| around.contains(t.as_str())) {
                return None;
            }
        }

        let annualized = candidate.value.saturating_mul(multiplier);
        (SANE_MIN..=SANE_MAX)
            .contains(&annualized)
            .then_some(annualized)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Detect the posting currency by marker priority.
fn detect_currency(text: &str) -> &'static str {
    for (code, markers) in CURRENCY_MARKERS {
        if markers.iter().any(|m| text.contains(m)) {
            return code;
        }
    }
    DEFAULT_CURRENCY
}

/// Span of a whole regex match.
fn match_span(caps: &regex::Captures<'_>) -> (usize, usize) {
    let whole = caps.get(0).expect("whole match");
    (whole.start(), whole.end())
}

/// Lowercased lookahead window after a match.
fn lookahead(text: &str, span: (usize, usize)) -> String {
    context_window(text, (span.1, span.1), 0, LOOKAHEAD).to_lowercase()
}

/// Earliest period keyword in the window decides the multiplier.
fn detect_period(window: &str) -> Option<i64> {
    SALARY_PERIODS
        .iter()
        .filter_map(|(term, mult)| window.find(term).map(|pos| (pos, *mult)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, mult)| mult)
}

/// Is a currency symbol adjacent to the candidate?
fn currency_adjacent(text: &str, span: (usize, usize)) -> bool {
    let window = context_window(text, span, CURRENCY_ADJACENCY, CURRENCY_ADJACENCY);
    CURRENCY_SYMBOLS.iter().any(|s| window.contains(s))
}

/// Parse digits with grouping separators stripped.
fn parse_grouped_number(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}
