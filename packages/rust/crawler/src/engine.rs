//! Sequential, rate-limited harvest engine.
//!
//! A *scrape* covers one keyword/region pair: the fixed python.org feed plus
//! the paginated LinkedIn guest listing, with one detail fetch per LinkedIn
//! card. A *sweep* scrapes the fixed feed once, then every pair of the
//! configured keyword and region lists in order. Requests are never issued
//! in parallel; the per-request delay keeps the sources happy.

use std::time::{Duration, Instant};

use chrono::{NaiveDate, Utc};
use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

use jobsift_extract::{Extractors, normalize_posted_date};
use jobsift_shared::{CrawlConfig, JobPosting, JobsiftError, Result, Source, SweepConfig};
use jobsift_storage::Storage;

use crate::sources::{RawPosting, linkedin, python_org};

/// User-Agent string for harvest requests.
const USER_AGENT: &str = concat!("jobsift/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Summary of a completed scrape of one keyword/region pair.
#[derive(Debug, Clone)]
pub struct HarvestReport {
    /// Keyword the LinkedIn listing was queried with.
    pub keyword: String,
    /// Region the LinkedIn listing was queried with.
    pub region: String,
    /// Number of postings upserted.
    pub stored: usize,
    /// Number of listing entries dropped for missing required fields.
    pub skipped: usize,
    /// Errors encountered (URL, error message).
    pub errors: Vec<(String, String)>,
    /// Total duration of the scrape.
    pub duration: Duration,
}

/// Summary of a full sweep across the keyword × region matrix.
#[derive(Debug, Clone)]
pub struct SweepReport {
    /// Keyword/region pairs that completed, in execution order.
    pub completed: Vec<(String, String)>,
    /// Total postings upserted across all pairs.
    pub stored: usize,
    /// Total listing entries dropped across all pairs.
    pub skipped: usize,
    /// Errors encountered across all pairs (URL, error message).
    pub errors: Vec<(String, String)>,
    /// Total duration of the sweep.
    pub duration: Duration,
}

/// Progress callback for reporting harvest status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a posting has been stored.
    fn posting_stored(&self, title: &str, stored: usize);
    /// Called when a sweep finishes one keyword/region pair.
    fn pair_done(&self, keyword: &str, region: &str, stored: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn posting_stored(&self, _title: &str, _stored: usize) {}
    fn pair_done(&self, _keyword: &str, _region: &str, _stored: usize) {}
}

/// Running totals for one scrape.
#[derive(Default)]
struct ScrapeTally {
    stored: usize,
    skipped: usize,
    errors: Vec<(String, String)>,
}

// ---------------------------------------------------------------------------
// Harvester
// ---------------------------------------------------------------------------

/// Sequential harvester feeding extracted postings into storage.
pub struct Harvester {
    config: CrawlConfig,
    client: Client,
    extractors: Extractors,
}

impl Harvester {
    /// Create a new harvester with the given configuration.
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| JobsiftError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            extractors: Extractors::default(),
        })
    }

    /// Scrape both sources for one keyword/region pair, upserting into `storage`.
    ///
    /// Fetch and parse problems are recorded in the report, not returned as
    /// errors; a posting whose detail page fails still gets stored with an
    /// empty description.
    #[instrument(skip_all, fields(keyword = %keyword, region = %region))]
    pub async fn run_targeted(
        &self,
        keyword: &str,
        region: &str,
        storage: &Storage,
        progress: &dyn ProgressReporter,
    ) -> Result<HarvestReport> {
        let start = Instant::now();
        let mut tally = ScrapeTally::default();

        info!(
            rate_limit_ms = self.config.rate_limit_ms,
            listing_pages = self.config.listing_pages,
            "starting scrape"
        );

        progress.phase("Scraping python.org jobs");
        self.harvest_python_org(storage, &mut tally, progress).await;

        progress.phase("Scraping LinkedIn listings");
        self.harvest_linkedin(keyword, region, storage, &mut tally, progress)
            .await;

        let report = HarvestReport {
            keyword: keyword.to_string(),
            region: region.to_string(),
            stored: tally.stored,
            skipped: tally.skipped,
            errors: tally.errors,
            duration: start.elapsed(),
        };

        info!(
            stored = report.stored,
            skipped = report.skipped,
            errors = report.errors.len(),
            duration_ms = report.duration.as_millis(),
            "scrape completed"
        );

        Ok(report)
    }

    /// Sweep the full keyword × region matrix sequentially.
    ///
    /// The fixed python.org feed is not keyword-addressable, so one pass at
    /// the start covers every pair; LinkedIn is then queried once per pair.
    /// A failing fetch is recorded and the sweep moves on; the `completed`
    /// manifest lists pairs in execution order.
    #[instrument(skip_all, fields(keywords = sweep.keywords.len(), regions = sweep.regions.len()))]
    pub async fn run_sweep(
        &self,
        sweep: &SweepConfig,
        storage: &Storage,
        progress: &dyn ProgressReporter,
    ) -> Result<SweepReport> {
        let start = Instant::now();
        let mut tally = ScrapeTally::default();
        let mut completed = Vec::new();

        info!("starting sweep");

        progress.phase("Scraping python.org jobs");
        self.harvest_python_org(storage, &mut tally, progress).await;

        for keyword in &sweep.keywords {
            for region in &sweep.regions {
                let before = tally.stored;
                progress.phase(&format!("Scraping LinkedIn: {keyword} / {region}"));
                self.harvest_linkedin(keyword, region, storage, &mut tally, progress)
                    .await;
                progress.pair_done(keyword, region, tally.stored - before);
                completed.push((keyword.clone(), region.clone()));
            }
        }

        let report = SweepReport {
            completed,
            stored: tally.stored,
            skipped: tally.skipped,
            errors: tally.errors,
            duration: start.elapsed(),
        };

        info!(
            pairs = report.completed.len(),
            stored = report.stored,
            errors = report.errors.len(),
            duration_ms = report.duration.as_millis(),
            "sweep completed"
        );

        Ok(report)
    }

    /// Scrape the fixed python.org feed. Keyword and region do not apply;
    /// the feed is a single unparameterized page with no detail endpoint.
    async fn harvest_python_org(
        &self,
        storage: &Storage,
        tally: &mut ScrapeTally,
        progress: &dyn ProgressReporter,
    ) {
        let today = Utc::now().date_naive();
        let base = match Url::parse(&self.config.python_org_url) {
            Ok(url) => url,
            Err(e) => {
                tally
                    .errors
                    .push((self.config.python_org_url.clone(), e.to_string()));
                return;
            }
        };

        let body = match self.fetch_text(base.as_str()).await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "python.org listing fetch failed");
                tally
                    .errors
                    .push((self.config.python_org_url.clone(), e.to_string()));
                return;
            }
        };

        let listing = python_org::parse_listing(&body, &base);
        debug!(
            postings = listing.postings.len(),
            skipped = listing.skipped,
            "parsed python.org listing"
        );
        tally.skipped += listing.skipped;

        for raw in listing.postings {
            let posting = self.assemble(raw, Source::PythonOrg, String::new(), today);
            self.store(storage, posting, tally, progress).await;
        }
    }

    /// Scrape the paginated LinkedIn guest listing, fetching one detail page
    /// per card. Pagination stops at the configured page ceiling or at the
    /// first page with no entries at all.
    async fn harvest_linkedin(
        &self,
        keyword: &str,
        region: &str,
        storage: &Storage,
        tally: &mut ScrapeTally,
        progress: &dyn ProgressReporter,
    ) {
        // Relative listing dates resolve against the moment this job's
        // fetches begin, not against whenever a row gets written.
        let today = Utc::now().date_naive();
        for page in 0..self.config.listing_pages {
            let offset = page * self.config.listing_page_size;
            let url = match linkedin::listing_url(
                &self.config.linkedin_listing_url,
                keyword,
                region,
                offset,
            ) {
                Ok(url) => url,
                Err(e) => {
                    tally
                        .errors
                        .push((self.config.linkedin_listing_url.clone(), e.to_string()));
                    return;
                }
            };

            let body = match self.fetch_text(url.as_str()).await {
                Ok(body) => body,
                Err(e) => {
                    warn!(page, error = %e, "listing page fetch failed");
                    tally.errors.push((url.to_string(), e.to_string()));
                    continue;
                }
            };

            let listing = linkedin::parse_listing(&body, &url);
            debug!(
                page,
                postings = listing.postings.len(),
                skipped = listing.skipped,
                "parsed listing page"
            );
            tally.skipped += listing.skipped;

            if listing.postings.is_empty() && listing.skipped == 0 {
                debug!(page, "empty listing page, stopping pagination");
                break;
            }

            for raw in listing.postings {
                let description = self.fetch_detail(&raw.url, tally).await;
                let posting = self.assemble(raw, Source::LinkedIn, description, today);
                self.store(storage, posting, tally, progress).await;
            }
        }
    }

    /// Fetch and parse the detail page for a posting URL.
    ///
    /// Failures degrade to an empty description so the listing entry is
    /// still stored; the error lands in the tally.
    async fn fetch_detail(&self, posting_url: &str, tally: &mut ScrapeTally) -> String {
        let Some(id) = linkedin::derive_detail_id(posting_url) else {
            debug!(url = posting_url, "no numeric job id, skipping detail fetch");
            return String::new();
        };

        let detail = match linkedin::detail_url(&self.config.linkedin_detail_url, &id) {
            Ok(url) => url,
            Err(e) => {
                tally
                    .errors
                    .push((self.config.linkedin_detail_url.clone(), e.to_string()));
                return String::new();
            }
        };

        match self.fetch_text(detail.as_str()).await {
            Ok(body) => linkedin::parse_detail(&body).unwrap_or_default(),
            Err(e) => {
                warn!(url = %detail, error = %e, "detail fetch failed");
                tally.errors.push((detail.to_string(), e.to_string()));
                String::new()
            }
        }
    }

    /// Run the extractors over a raw listing entry and build the posting.
    fn assemble(
        &self,
        raw: RawPosting,
        source: Source,
        description: String,
        today: NaiveDate,
    ) -> JobPosting {
        let posted_at = normalize_posted_date(raw.raw_date.as_deref(), today);
        let haystack = format!("{}\n{}", raw.title, description);

        let salary = self.extractors.salary.extract(&haystack);
        let skills = self.extractors.skills.extract(&haystack);
        let seniority = self.extractors.seniority.classify(&raw.title, &description);

        JobPosting {
            url: raw.url,
            title: raw.title,
            company: raw.company,
            location: raw.location,
            source,
            posted_at,
            description,
            skills,
            seniority,
            salary_min: salary.min,
            salary_max: salary.max,
            // A detected symbol without a surviving figure is noise.
            currency: if salary.min.is_some() { salary.currency } else { None },
            created_at: Utc::now(),
        }
    }

    async fn store(
        &self,
        storage: &Storage,
        posting: JobPosting,
        tally: &mut ScrapeTally,
        progress: &dyn ProgressReporter,
    ) {
        match storage.upsert(&posting).await {
            Ok(()) => {
                tally.stored += 1;
                progress.posting_stored(&posting.title, tally.stored);
            }
            Err(e) => {
                warn!(url = %posting.url, error = %e, "failed to store posting");
                tally.errors.push((posting.url.clone(), e.to_string()));
            }
        }
    }

    /// Fetch a URL as text, sleeping the configured delay first.
    async fn fetch_text(&self, url: &str) -> Result<String> {
        if self.config.rate_limit_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.rate_limit_ms)).await;
        }

        debug!(%url, "fetching");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| JobsiftError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(JobsiftError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| JobsiftError::Network(format!("{url}: body read failed: {e}")))
    }
}

#[cfg(test)]
mod harvester_tests {
    use super::*;
    use jobsift_shared::Seniority;
    use uuid::Uuid;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PYTHON_ORG_PAGE: &str = r#"<html><body>
        <ol class="list-recent-jobs">
          <li>
            <h2 class="listing-company">
              <span class="listing-company-name">
                <a href="/jobs/7001/">Senior Python Engineer</a><br>
                Dedalus HealthCare
              </span>
              <span class="listing-location"><a href="/loc">Amsterdam, Netherlands</a></span>
            </h2>
            <span class="listing-posted">Posted: <time datetime="2024-06-10">10 June 2024</time></span>
          </li>
        </ol>
    </body></html>"#;

    const EMPTY_PYTHON_ORG_PAGE: &str =
        r#"<html><body><ol class="list-recent-jobs"></ol></body></html>"#;

    const LINKEDIN_LISTING: &str = r##"
        <ul class="jobs-search__results-list">
          <li>
            <div class="base-card">
              <a class="base-card__full-link"
                 href="https://www.linkedin.com/jobs/view/senior-rust-engineer-at-acme-1001?refId=abc">link</a>
              <div class="base-search-card__info">
                <h3 class="base-search-card__title">Senior Rust Engineer</h3>
                <h4 class="base-search-card__subtitle"><a href="#">Acme Corp</a></h4>
                <div class="base-search-card__metadata">
                  <span class="job-search-card__location">Berlin, Germany</span>
                  <time datetime="2024-06-08">5 days ago</time>
                </div>
              </div>
            </div>
          </li>
        </ul>"##;

    const LINKEDIN_DETAIL: &str = r#"
        <section class="show-more-less-html">
          <div class="show-more-less-html__markup">
            <p>We are hiring a senior engineer.</p>
            <p>Salary: €90k - €110k per year.</p>
            <p>Experience with Rust and Kubernetes.</p>
          </div>
        </section>"#;

    fn test_config(server_uri: &str) -> CrawlConfig {
        CrawlConfig {
            timeout_secs: 5,
            rate_limit_ms: 0,
            listing_page_size: 25,
            listing_pages: 2,
            python_org_url: format!("{server_uri}/jobs/"),
            linkedin_listing_url: format!("{server_uri}/li/search"),
            linkedin_detail_url: format!("{server_uri}/li/detail"),
        }
    }

    async fn test_storage() -> Storage {
        let tmp = std::env::temp_dir().join(format!("jobsift_harvest_{}.db", Uuid::now_v7()));
        Storage::open(&tmp).await.expect("open test db")
    }

    async fn mount_empty_tail_pages(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/li/search"))
            .and(query_param("start", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<ul></ul>"))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn targeted_scrape_stores_both_sources() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PYTHON_ORG_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/li/search"))
            .and(query_param("keywords", "Rust"))
            .and(query_param("start", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LINKEDIN_LISTING))
            .mount(&server)
            .await;
        mount_empty_tail_pages(&server).await;
        Mock::given(method("GET"))
            .and(path("/li/detail/1001"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LINKEDIN_DETAIL))
            .mount(&server)
            .await;

        let storage = test_storage().await;
        let harvester = Harvester::new(test_config(&server.uri())).expect("harvester");
        let report = harvester
            .run_targeted("Rust", "Europe", &storage, &SilentProgress)
            .await
            .expect("scrape");

        assert_eq!(report.stored, 2);
        assert_eq!(report.skipped, 0);
        assert!(report.errors.is_empty());
        assert_eq!(storage.count().await.unwrap(), 2);

        let li = storage
            .get("https://www.linkedin.com/jobs/view/senior-rust-engineer-at-acme-1001")
            .await
            .unwrap()
            .expect("linkedin posting");
        assert_eq!(li.source, Source::LinkedIn);
        assert_eq!(li.company, "Acme Corp");
        assert!(li.description.contains("hiring a senior engineer"));
        assert_eq!(li.posted_at, NaiveDate::from_ymd_opt(2024, 6, 8));
        assert_eq!(li.salary_min, Some(90_000));
        assert_eq!(li.salary_max, Some(110_000));
        assert_eq!(li.currency.as_deref(), Some("EUR"));
        assert!(li.skills.contains("Rust"));
        assert!(li.skills.contains("Kubernetes"));
        assert_eq!(li.seniority, Seniority::Senior);

        let py = storage
            .get(&format!("{}/jobs/7001/", server.uri()))
            .await
            .unwrap()
            .expect("python.org posting");
        assert_eq!(py.source, Source::PythonOrg);
        assert_eq!(py.company, "Dedalus HealthCare");
        assert_eq!(py.posted_at, NaiveDate::from_ymd_opt(2024, 6, 10));
        assert!(py.description.is_empty());
        // Without a salary figure there is no currency either.
        assert!(py.currency.is_none());
        assert!(py.skills.contains("Python"));
    }

    #[tokio::test]
    async fn sweep_covers_matrix_and_dedupes_shared_urls() {
        let server = MockServer::start().await;
        // The fixed feed is fetched exactly once per sweep, not once per pair.
        Mock::given(method("GET"))
            .and(path("/jobs/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PYTHON_ORG_PAGE))
            .expect(1)
            .mount(&server)
            .await;
        // The same posting shows up for both keywords, under different
        // tracking parameters. Each pair gets exactly one first-page job.
        for (keyword, ref_id) in [("Python", "A"), ("Rust", "B")] {
            let card = LINKEDIN_LISTING.replace("refId=abc", &format!("refId={ref_id}"));
            Mock::given(method("GET"))
                .and(path("/li/search"))
                .and(query_param("keywords", keyword))
                .and(query_param("start", "0"))
                .respond_with(ResponseTemplate::new(200).set_body_string(card))
                .expect(1)
                .mount(&server)
                .await;
        }
        mount_empty_tail_pages(&server).await;
        Mock::given(method("GET"))
            .and(path("/li/detail/1001"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LINKEDIN_DETAIL))
            .mount(&server)
            .await;

        let storage = test_storage().await;
        let harvester = Harvester::new(test_config(&server.uri())).expect("harvester");
        let sweep = SweepConfig {
            keywords: vec!["Python".into(), "Rust".into()],
            regions: vec!["Europe".into()],
        };
        let report = harvester
            .run_sweep(&sweep, &storage, &SilentProgress)
            .await
            .expect("sweep");

        assert_eq!(
            report.completed,
            vec![
                ("Python".to_string(), "Europe".to_string()),
                ("Rust".to_string(), "Europe".to_string()),
            ]
        );
        assert_eq!(report.stored, 2);
        assert!(report.errors.is_empty());
        // Both upserts landed on the same canonical URL.
        assert_eq!(storage.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn detail_failure_keeps_provisional_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PYTHON_ORG_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/li/search"))
            .and(query_param("start", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LINKEDIN_LISTING))
            .mount(&server)
            .await;
        mount_empty_tail_pages(&server).await;
        Mock::given(method("GET"))
            .and(path("/li/detail/1001"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let storage = test_storage().await;
        let harvester = Harvester::new(test_config(&server.uri())).expect("harvester");
        let report = harvester
            .run_targeted("Rust", "Europe", &storage, &SilentProgress)
            .await
            .expect("scrape");

        assert_eq!(report.stored, 1);
        assert_eq!(report.errors.len(), 1);

        let li = storage
            .get("https://www.linkedin.com/jobs/view/senior-rust-engineer-at-acme-1001")
            .await
            .unwrap()
            .expect("provisional posting");
        assert!(li.description.is_empty());
        // Listing-level fields still made it in.
        assert_eq!(li.posted_at, NaiveDate::from_ymd_opt(2024, 6, 8));
        assert_eq!(li.seniority, Seniority::Senior);
    }

    #[tokio::test]
    async fn listing_fetch_failure_is_reported_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(PYTHON_ORG_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/li/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let storage = test_storage().await;
        let harvester = Harvester::new(test_config(&server.uri())).expect("harvester");
        let report = harvester
            .run_targeted("Rust", "Europe", &storage, &SilentProgress)
            .await
            .expect("scrape");

        // The python.org posting survives; both listing pages errored.
        assert_eq!(report.stored, 1);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(storage.count().await.unwrap(), 1);
    }
}
