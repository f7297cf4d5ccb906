//! Core domain types for jobsift postings.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::JobsiftError;

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// External feed a posting was harvested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// The python.org jobs board — fixed feed, no query parameters.
    #[serde(rename = "Python.org")]
    PythonOrg,
    /// The LinkedIn guest jobs API — parameterized by keyword and region.
    #[serde(rename = "LinkedIn")]
    LinkedIn,
}

impl Source {
    /// Stable label used in storage rows and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PythonOrg => "Python.org",
            Self::LinkedIn => "LinkedIn",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Source {
    type Err = JobsiftError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Python.org" => Ok(Self::PythonOrg),
            "LinkedIn" => Ok(Self::LinkedIn),
            other => Err(JobsiftError::validation(format!(
                "unknown source label: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Seniority
// ---------------------------------------------------------------------------

/// Seniority tier assigned by the classifier.
///
/// Variant order mirrors classification priority: when a title matches
/// several tiers, the earliest listed tier wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seniority {
    Lead,
    Senior,
    Junior,
    #[serde(rename = "Mid-Level")]
    MidLevel,
    #[serde(rename = "Not Specified")]
    NotSpecified,
}

impl Seniority {
    /// Stable label used in storage rows and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => "Lead",
            Self::Senior => "Senior",
            Self::Junior => "Junior",
            Self::MidLevel => "Mid-Level",
            Self::NotSpecified => "Not Specified",
        }
    }
}

impl std::fmt::Display for Seniority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Seniority {
    type Err = JobsiftError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Lead" => Ok(Self::Lead),
            "Senior" => Ok(Self::Senior),
            "Junior" => Ok(Self::Junior),
            "Mid-Level" => Ok(Self::MidLevel),
            "Not Specified" => Ok(Self::NotSpecified),
            other => Err(JobsiftError::validation(format!(
                "unknown seniority label: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// JobPosting
// ---------------------------------------------------------------------------

/// A structured job posting — the persisted unit, exactly one per canonical URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    /// Canonical posting URL (query string and fragment stripped); the identity key.
    pub url: String,
    /// Posting title as listed on the source.
    pub title: String,
    /// Hiring company; `"Unknown"` when the source omits it.
    pub company: String,
    /// Free-text location; `"Remote"` when the source omits it.
    pub location: String,
    /// Feed the posting was harvested from.
    pub source: Source,
    /// Absolute posting date; `None` when the raw date text could not be resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<NaiveDate>,
    /// Full description text; empty when no detail page was available.
    #[serde(default)]
    pub description: String,
    /// Canonical skill tags spotted in the posting text.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub skills: BTreeSet<String>,
    /// Classified seniority tier.
    pub seniority: Seniority,
    /// Annualized salary lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<i64>,
    /// Annualized salary upper bound; equals `salary_min` when a single figure was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<i64>,
    /// ISO currency code; present iff at least one salary figure was extracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// First-ingestion timestamp; survives re-scrapes unchanged.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_label_roundtrip() {
        for source in [Source::PythonOrg, Source::LinkedIn] {
            let parsed: Source = source.as_str().parse().expect("parse source");
            assert_eq!(parsed, source);
        }
        assert!("Craigslist".parse::<Source>().is_err());
    }

    #[test]
    fn seniority_label_roundtrip() {
        for tier in [
            Seniority::Lead,
            Seniority::Senior,
            Seniority::Junior,
            Seniority::MidLevel,
            Seniority::NotSpecified,
        ] {
            let parsed: Seniority = tier.as_str().parse().expect("parse seniority");
            assert_eq!(parsed, tier);
        }
        assert_eq!(Seniority::MidLevel.to_string(), "Mid-Level");
    }

    #[test]
    fn posting_serialization_omits_empty_fields() {
        let posting = JobPosting {
            url: "https://example.com/jobs/1".into(),
            title: "Backend Engineer".into(),
            company: "Acme".into(),
            location: "Remote".into(),
            source: Source::LinkedIn,
            posted_at: None,
            description: String::new(),
            skills: BTreeSet::new(),
            seniority: Seniority::NotSpecified,
            salary_min: None,
            salary_max: None,
            currency: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&posting).expect("serialize");
        assert!(!json.contains("posted_at"));
        assert!(!json.contains("salary_min"));
        assert!(!json.contains("skills"));
        assert!(json.contains("\"source\":\"LinkedIn\""));
        assert!(json.contains("\"seniority\":\"Not Specified\""));

        let parsed: JobPosting = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed.url, posting.url);
        assert_eq!(parsed.seniority, Seniority::NotSpecified);
    }
}
