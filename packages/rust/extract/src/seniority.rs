//! Seniority classification: priority-ordered keyword tiers over
//! title, then description.

use jobsift_shared::Seniority;
use regex::Regex;

use crate::tables::SENIORITY_TIERS;

/// Priority-ordered seniority classifier.
///
/// Tier order is an explicit property of the table, not an artifact of map
/// iteration: when a text matches several tiers, the earliest tier wins.
pub struct SeniorityClassifier {
    tiers: Vec<(Seniority, Vec<Regex>)>,
}

impl Default for SeniorityClassifier {
    fn default() -> Self {
        Self::new(SENIORITY_TIERS)
    }
}

impl SeniorityClassifier {
    /// Build a classifier from an ordered tier table. Entries are regex
    /// fragments; a leading word boundary is always added, a trailing one
    /// only when the fragment ends in a word character (so `sr\.` still
    /// matches "Sr. Engineer").
    pub fn new(tiers: &[(Seniority, &[&str])]) -> Self {
        let tiers = tiers
            .iter()
            .map(|(tier, fragments)| {
                let compiled = fragments.iter().map(|f| compile_fragment(f)).collect();
                (*tier, compiled)
            })
            .collect();
        Self { tiers }
    }

    /// Classify a posting. The title is checked through every tier in
    /// priority order before the description is consulted at all, so a
    /// senior title wins over a description that mentions juniors.
    pub fn classify(&self, title: &str, description: &str) -> Seniority {
        self.classify_text(title)
            .or_else(|| self.classify_text(description))
            .unwrap_or(Seniority::NotSpecified)
    }

    fn classify_text(&self, text: &str) -> Option<Seniority> {
        if text.is_empty() {
            return None;
        }
        for (tier, patterns) in &self.tiers {
            if patterns.iter().any(|re| re.is_match(text)) {
                return Some(*tier);
            }
        }
        None
    }
}

fn compile_fragment(fragment: &str) -> Regex {
    let tail_is_word = fragment
        .chars()
        .last()
        .is_some_and(|c| c.is_alphanumeric() || c == '_');
    let pattern = if tail_is_word {
        format!(r"(?i)\b{fragment}\b")
    } else {
        format!(r"(?i)\b{fragment}")
    };
    Regex::new(&pattern).expect("seniority pattern")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> SeniorityClassifier {
        SeniorityClassifier::default()
    }

    #[test]
    fn title_wins_over_description() {
        let tier = classifier().classify(
            "Senior Backend Engineer",
            "You will mentor junior developers day to day",
        );
        assert_eq!(tier, Seniority::Senior);
    }

    #[test]
    fn lead_outranks_senior_in_the_same_title() {
        let tier = classifier().classify("Senior Engineering Manager", "");
        assert_eq!(tier, Seniority::Lead);
    }

    #[test]
    fn abbreviations_match() {
        assert_eq!(
            classifier().classify("Sr. Platform Engineer", ""),
            Seniority::Senior
        );
        assert_eq!(classifier().classify("Jr. Data Analyst", ""), Seniority::Junior);
    }

    #[test]
    fn seniority_the_word_is_not_senior() {
        let tier = classifier().classify(
            "Backend Engineer",
            "We value seniority in tenure decisions",
        );
        assert_eq!(tier, Seniority::NotSpecified);
    }

    #[test]
    fn description_is_the_fallback() {
        let tier = classifier().classify(
            "Software Engineer",
            "This is an entry level position with full training",
        );
        assert_eq!(tier, Seniority::Junior);
    }

    #[test]
    fn junior_outranks_mid_level_on_ties() {
        let tier = classifier().classify("Junior or Mid-Level Engineer", "");
        assert_eq!(tier, Seniority::Junior);
    }

    #[test]
    fn staff_engineer_is_lead() {
        assert_eq!(
            classifier().classify("Staff Engineer, Infrastructure", ""),
            Seniority::Lead
        );
    }

    #[test]
    fn unmatched_titles_are_not_specified() {
        assert_eq!(
            classifier().classify("Software Engineer", "Great team, great product"),
            Seniority::NotSpecified
        );
    }
}
