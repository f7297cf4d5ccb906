//! Parser for the LinkedIn guest jobs API.
//!
//! Two endpoints, both returning HTML fragments without authentication:
//! a paginated listing of job cards parameterized by keyword, region and
//! offset, and a per-posting detail page addressed by numeric job id.

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use jobsift_shared::{JobsiftError, Result};

use super::{Listing, RawPosting, canonical_url, clean_text};

/// Build a listing page URL for one keyword/region pair at `start` offset.
pub fn listing_url(base: &str, keyword: &str, region: &str, start: u32) -> Result<Url> {
    let mut url = Url::parse(base)
        .map_err(|e| JobsiftError::config(format!("invalid listing endpoint {base}: {e}")))?;
    url.query_pairs_mut()
        .append_pair("keywords", keyword)
        .append_pair("location", region)
        .append_pair("start", &start.to_string());
    Ok(url)
}

/// Build the detail page URL for a numeric job id.
pub fn detail_url(base: &str, id: &str) -> Result<Url> {
    Url::parse(&format!("{}/{id}", base.trim_end_matches('/')))
        .map_err(|e| JobsiftError::config(format!("invalid detail endpoint {base}: {e}")))
}

/// Pull the numeric job id out of a posting URL.
///
/// Posting URLs end in a slug like `senior-rust-engineer-at-acme-3948271530`;
/// the id is the trailing dash-separated token when it is all digits. Bare
/// numeric slugs (`/jobs/view/3948271530`) also qualify.
pub fn derive_detail_id(url: &str) -> Option<String> {
    let slug = url.split("view/").nth(1)?.trim_end_matches('/');
    let id = slug.rsplit('-').next()?;
    (!id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())).then(|| id.to_string())
}

/// Parse one listing page of job cards into raw postings.
pub fn parse_listing(html: &str, base: &Url) -> Listing {
    let doc = Html::parse_document(html);
    let card_sel = Selector::parse("li").unwrap();
    let link_sel = Selector::parse("a.base-card__full-link").unwrap();
    let title_sel = Selector::parse("h3.base-search-card__title").unwrap();
    let company_sel = Selector::parse("h4.base-search-card__subtitle a").unwrap();
    let location_sel = Selector::parse("span.job-search-card__location").unwrap();
    let time_sel = Selector::parse("time").unwrap();

    let mut listing = Listing::default();

    for card in doc.select(&card_sel) {
        let url = card
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| canonical_url(href, base));
        let title = card
            .select(&title_sel)
            .next()
            .map(|el| clean_text(&el.text().collect::<String>()))
            .unwrap_or_default();

        let Some(url) = url else {
            listing.skipped += 1;
            continue;
        };
        if title.is_empty() {
            debug!(%url, "dropping job card without a title");
            listing.skipped += 1;
            continue;
        }

        let company = card
            .select(&company_sel)
            .next()
            .map(|el| clean_text(&el.text().collect::<String>()))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        let location = card
            .select(&location_sel)
            .next()
            .map(|el| clean_text(&el.text().collect::<String>()))
            .filter(|loc| !loc.is_empty())
            .unwrap_or_else(|| "Remote".to_string());

        let raw_date = card.select(&time_sel).next().map(|time| {
            time.value()
                .attr("datetime")
                .map(str::to_string)
                .unwrap_or_else(|| clean_text(&time.text().collect::<String>()))
        });

        listing.postings.push(RawPosting {
            title,
            company,
            location,
            url,
            raw_date,
        });
    }

    listing
}

/// Extract the description text from a detail page.
///
/// Returns `None` when the description container is absent, which the
/// caller treats as an empty description rather than a failure.
pub fn parse_detail(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let markup_sel = Selector::parse("div.show-more-less-html__markup").unwrap();
    let markup = doc.select(&markup_sel).next()?;
    let text = clean_text(&markup.text().collect::<String>());
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <ul class="jobs-search__results-list">
          <li>
            <div class="base-card">
              <a class="base-card__full-link"
                 href="https://www.linkedin.com/jobs/view/senior-rust-engineer-at-acme-1001?refId=abc&trackingId=def">
                Senior Rust Engineer
              </a>
              <div class="base-search-card__info">
                <h3 class="base-search-card__title">Senior Rust Engineer</h3>
                <h4 class="base-search-card__subtitle">
                  <a href="https://www.linkedin.com/company/acme">Acme Corp</a>
                </h4>
                <div class="base-search-card__metadata">
                  <span class="job-search-card__location">Berlin, Germany</span>
                  <time class="job-search-card__listdate" datetime="2024-06-08">5 days ago</time>
                </div>
              </div>
            </div>
          </li>
          <li>
            <div class="base-card">
              <a class="base-card__full-link"
                 href="https://www.linkedin.com/jobs/view/1002">cardlink</a>
              <div class="base-search-card__info">
                <h3 class="base-search-card__title">Data Engineer</h3>
                <div class="base-search-card__metadata">
                  <time>2 weeks ago</time>
                </div>
              </div>
            </div>
          </li>
          <li>
            <div class="base-card">
              <div class="base-search-card__info">
                <h3 class="base-search-card__title">Card without a link</h3>
              </div>
            </div>
          </li>
        </ul>"#;

    fn base() -> Url {
        Url::parse("https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search")
            .unwrap()
    }

    #[test]
    fn listing_url_carries_keyword_region_and_offset() {
        let url = listing_url(
            "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search",
            "Python",
            "United States",
            25,
        )
        .expect("listing url");
        assert_eq!(
            url.as_str(),
            "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search\
             ?keywords=Python&location=United+States&start=25"
        );
    }

    #[test]
    fn parses_cards_and_strips_tracking_params() {
        let listing = parse_listing(LISTING, &base());
        assert_eq!(listing.postings.len(), 2);
        assert_eq!(listing.skipped, 1);

        let first = &listing.postings[0];
        assert_eq!(first.title, "Senior Rust Engineer");
        assert_eq!(first.company, "Acme Corp");
        assert_eq!(first.location, "Berlin, Germany");
        assert_eq!(
            first.url,
            "https://www.linkedin.com/jobs/view/senior-rust-engineer-at-acme-1001"
        );
        assert_eq!(first.raw_date.as_deref(), Some("2024-06-08"));
    }

    #[test]
    fn sparse_cards_fall_back_to_defaults() {
        let listing = parse_listing(LISTING, &base());
        let second = &listing.postings[1];
        assert_eq!(second.company, "Unknown");
        assert_eq!(second.location, "Remote");
        assert_eq!(second.raw_date.as_deref(), Some("2 weeks ago"));
    }

    #[test]
    fn detail_id_comes_from_the_trailing_slug_token() {
        assert_eq!(
            derive_detail_id("https://www.linkedin.com/jobs/view/senior-rust-engineer-at-acme-1001"),
            Some("1001".to_string())
        );
        assert_eq!(
            derive_detail_id("https://www.linkedin.com/jobs/view/3948271530/"),
            Some("3948271530".to_string())
        );
        assert_eq!(
            derive_detail_id("https://www.linkedin.com/jobs/view/unnumbered-slug"),
            None
        );
        assert_eq!(derive_detail_id("https://example.com/jobs/1001"), None);
    }

    #[test]
    fn detail_page_text_is_collapsed() {
        let html = r#"
            <section class="show-more-less-html">
              <div class="show-more-less-html__markup">
                <p>We are hiring a senior engineer.</p>
                <p>Salary:   €90k - €110k per year.</p>
                <ul><li>Experience with Rust and Kubernetes.</li></ul>
              </div>
            </section>"#;
        let text = parse_detail(html).expect("description");
        assert_eq!(
            text,
            "We are hiring a senior engineer. Salary: €90k - €110k per year. \
             Experience with Rust and Kubernetes."
        );
    }

    #[test]
    fn detail_without_markup_container_is_none() {
        assert_eq!(parse_detail("<html><body><p>Gone.</p></body></html>"), None);
    }
}
