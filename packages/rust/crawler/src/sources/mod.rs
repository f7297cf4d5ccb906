//! Source-specific listing and detail parsers.
//!
//! Each source turns fetched HTML into [`RawPosting`]s: the fields exactly as
//! scraped, before date normalization and field extraction. Entries missing a
//! title or a usable URL are dropped and counted, never stored.

pub mod linkedin;
pub mod python_org;

use url::Url;

/// One listing entry as scraped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPosting {
    pub title: String,
    /// Hiring company; `"Unknown"` when the listing omits it.
    pub company: String,
    /// Free-text location; `"Remote"` when the listing omits it.
    pub location: String,
    /// Canonical posting URL (query string and fragment stripped).
    pub url: String,
    /// Date text as shown on the listing (`"3 days ago"`, an ISO attribute, ...).
    pub raw_date: Option<String>,
}

/// A parsed listing page.
#[derive(Debug, Default)]
pub struct Listing {
    pub postings: Vec<RawPosting>,
    /// Entries dropped for missing required fields.
    pub skipped: usize,
}

/// Resolve `href` against `base` and strip query string and fragment, so
/// tracked variants of the same posting land on one storage row.
pub fn canonical_url(href: &str, base: &Url) -> Option<String> {
    let mut resolved = base.join(href).ok()?;
    resolved.set_query(None);
    resolved.set_fragment(None);
    Some(resolved.to_string())
}

/// Collapse whitespace runs into single spaces and trim the ends.
pub(crate) fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_url_strips_tracking_noise() {
        let base = Url::parse("https://www.linkedin.com/jobs/search").unwrap();
        let url = canonical_url(
            "https://www.linkedin.com/jobs/view/rust-dev-at-acme-1001?refId=abc&trackingId=def#apply",
            &base,
        )
        .expect("canonical url");
        assert_eq!(url, "https://www.linkedin.com/jobs/view/rust-dev-at-acme-1001");
    }

    #[test]
    fn canonical_url_resolves_relative_hrefs() {
        let base = Url::parse("https://www.python.org/jobs/").unwrap();
        let url = canonical_url("/jobs/7001/", &base).expect("canonical url");
        assert_eq!(url, "https://www.python.org/jobs/7001/");
    }

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  Acme\n   Corp \t B.V. "), "Acme Corp B.V.");
    }
}
