//! Skill spotting: dictionary keyword matching with negation-aware
//! context suppression.

use std::collections::BTreeSet;

use regex::Regex;

use crate::context_window;
use crate::tables::{NEGATION_PHRASES, SKILL_KEYWORDS};

/// Context window (bytes, each side) inspected for negation phrases.
const NEGATION_WINDOW: usize = 50;

/// A compiled dictionary entry.
struct SkillPattern {
    tag: String,
    regex: Regex,
}

/// Dictionary-based skill extractor.
pub struct SkillExtractor {
    patterns: Vec<SkillPattern>,
    negations: Vec<String>,
}

impl Default for SkillExtractor {
    fn default() -> Self {
        Self::new(SKILL_KEYWORDS, NEGATION_PHRASES)
    }
}

impl SkillExtractor {
    /// Build an extractor from a skill dictionary and a negation phrase table.
    pub fn new(keywords: &[&str], negations: &[&str]) -> Self {
        let patterns = keywords
            .iter()
            .map(|entry| SkillPattern {
                tag: (*entry).to_string(),
                regex: compile_entry(entry),
            })
            .collect();
        Self {
            patterns,
            negations: negations.iter().map(|n| n.to_lowercase()).collect(),
        }
    }

    /// Extract the set of skills mentioned affirmatively in `text`.
    ///
    /// Each dictionary entry is checked occurrence by occurrence: an
    /// occurrence with a negation phrase in its context window is
    /// suppressed, and checking stops at the first surviving occurrence.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        for pattern in &self.patterns {
            for m in pattern.regex.find_iter(text) {
                if self.negated(text, (m.start(), m.end())) {
                    continue;
                }
                found.insert(pattern.tag.clone());
                break;
            }
        }
        found
    }

    /// Check the ±50-byte window around a match for negation phrases. The
    /// window is clipped at sentence boundaries so a negation in the next
    /// sentence ("... and Go. No experience with Java ...") does not
    /// suppress this one.
    fn negated(&self, text: &str, span: (usize, usize)) -> bool {
        let before = context_window(text, (span.0, span.0), NEGATION_WINDOW, 0);
        let before = match before.rfind(sentence_boundary) {
            Some(pos) => &before[pos + 1..],
            None => before,
        };
        let after = context_window(text, (span.1, span.1), 0, NEGATION_WINDOW);
        let after = match after.find(sentence_boundary) {
            Some(pos) => &after[..pos],
            None => after,
        };

        let before = before.to_lowercase();
        let after = after.to_lowercase();
        self.negations
            .iter()
            .any(|n| before.contains(n.as_str()) || after.contains(n.as_str()))
    }
}

fn sentence_boundary(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | ';' | '\n')
}

/// Each side of an entry that starts or ends in a word character gets a
/// `\b` anchor; a punctuation side matches as a plain substring (`C++`
/// anchors on the left only, `.NET Core` on the right only).
fn compile_entry(entry: &str) -> Regex {
    let escaped = regex::escape(entry);
    let lead = entry.chars().next().is_some_and(word_char);
    let tail = entry.chars().last().is_some_and(word_char);
    let pattern = match (lead, tail) {
        (true, true) => format!(r"(?i)\b{escaped}\b"),
        (true, false) => format!(r"(?i)\b{escaped}"),
        (false, true) => format!(r"(?i){escaped}\b"),
        (false, false) => format!(r"(?i){escaped}"),
    };
    Regex::new(&pattern).expect("skill pattern")
}

fn word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
