//! Parser for the python.org jobs board listing.
//!
//! The board is a fixed feed: one HTML page, no query parameters and no
//! detail endpoint, so everything we store comes from the listing itself.

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::{Listing, RawPosting, canonical_url, clean_text};

/// Parse the jobs board listing into raw postings.
pub fn parse_listing(html: &str, base: &Url) -> Listing {
    let doc = Html::parse_document(html);
    let job_sel = Selector::parse("ol.list-recent-jobs li").unwrap();
    let link_sel = Selector::parse("span.listing-company-name a").unwrap();
    let company_sel = Selector::parse("span.listing-company-name").unwrap();
    let location_sel = Selector::parse("span.listing-location").unwrap();
    let time_sel = Selector::parse("time").unwrap();

    let mut listing = Listing::default();

    for job in doc.select(&job_sel) {
        let Some(link) = job.select(&link_sel).next() else {
            listing.skipped += 1;
            continue;
        };
        let title = clean_text(&link.text().collect::<String>());
        let Some(url) = link.value().attr("href").and_then(|href| canonical_url(href, base))
        else {
            listing.skipped += 1;
            continue;
        };
        if title.is_empty() {
            debug!(%url, "dropping listing entry without a title");
            listing.skipped += 1;
            continue;
        }

        // The company name is the bare text after the <br> inside the
        // company span, so only direct text nodes count.
        let company = job
            .select(&company_sel)
            .next()
            .map(|span| {
                span.children()
                    .filter_map(|node| node.value().as_text())
                    .map(|text| &**text)
                    .collect::<String>()
            })
            .map(|raw| clean_text(&raw))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        let location = job
            .select(&location_sel)
            .next()
            .map(|span| clean_text(&span.text().collect::<String>()))
            .filter(|loc| !loc.is_empty())
            .unwrap_or_else(|| "Remote".to_string());

        let raw_date = job.select(&time_sel).next().map(|time| {
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

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"<html><body>
        <ol class="list-recent-jobs listing-company-list">
          <li>
            <h2 class="listing-company">
              <span class="listing-company-name">
                <a href="/jobs/7001/">Senior Python Engineer</a><br>
                Dedalus HealthCare
              </span>
              <span class="listing-location">
                <a href="/jobs/location/amsterdam/">Amsterdam, Netherlands</a>
              </span>
            </h2>
            <span class="listing-posted">Posted:
              <time datetime="2024-06-10">10 June 2024</time>
            </span>
          </li>
          <li>
            <h2 class="listing-company">
              <span class="listing-company-name">
                <a href="/jobs/7002/">Django Developer</a><br>
              </span>
            </h2>
            <span class="listing-posted">Posted: <time>yesterday</time></span>
          </li>
          <li>
            <h2 class="listing-company">
              <span class="listing-company-name">No link here</span>
            </h2>
          </li>
        </ol>
    </body></html>"#;

    fn base() -> Url {
        Url::parse("https://www.python.org/jobs/").unwrap()
    }

    #[test]
    fn parses_complete_entries() {
        let listing = parse_listing(LISTING, &base());
        assert_eq!(listing.postings.len(), 2);
        assert_eq!(listing.skipped, 1);

        let first = &listing.postings[0];
        assert_eq!(first.title, "Senior Python Engineer");
        assert_eq!(first.company, "Dedalus HealthCare");
        assert_eq!(first.location, "Amsterdam, Netherlands");
        assert_eq!(first.url, "https://www.python.org/jobs/7001/");
        assert_eq!(first.raw_date.as_deref(), Some("2024-06-10"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let listing = parse_listing(LISTING, &base());
        let second = &listing.postings[1];
        assert_eq!(second.company, "Unknown");
        assert_eq!(second.location, "Remote");
        // No datetime attribute, so the visible text is captured as-is.
        assert_eq!(second.raw_date.as_deref(), Some("yesterday"));
    }

    #[test]
    fn empty_page_yields_empty_listing() {
        let listing = parse_listing("<html><body><p>No jobs.</p></body></html>", &base());
        assert!(listing.postings.is_empty());
        assert_eq!(listing.skipped, 0);
    }
}
