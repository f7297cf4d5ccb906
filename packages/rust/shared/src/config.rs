//! Application configuration for jobsift.
//!
//! User config lives at `~/.jobsift/jobsift.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{JobsiftError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "jobsift.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".jobsift";

/// Default database file name inside the config directory.
const DB_FILE_NAME: &str = "jobsift.db";

// ---------------------------------------------------------------------------
// Config structs (matching jobsift.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Crawl politeness and source endpoints.
    #[serde(default)]
    pub crawl: CrawlPoliciesConfig,

    /// Bulk sweep matrix.
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Record retention policy.
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Storage location.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// `[crawl]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlPoliciesConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Minimum ms between consecutive requests (politeness delay).
    #[serde(default = "default_rate_limit")]
    pub rate_limit_ms: u64,

    /// Listing page stride (results per listing request).
    #[serde(default = "default_listing_page_size")]
    pub listing_page_size: u32,

    /// Listing page count ceiling per job.
    #[serde(default = "default_listing_pages")]
    pub listing_pages: u32,

    /// Python.org jobs board listing URL.
    #[serde(default = "default_python_org_url")]
    pub python_org_url: String,

    /// LinkedIn guest listing endpoint (keyword/location/start appended).
    #[serde(default = "default_linkedin_listing_url")]
    pub linkedin_listing_url: String,

    /// LinkedIn guest detail endpoint (job id appended).
    #[serde(default = "default_linkedin_detail_url")]
    pub linkedin_detail_url: String,
}

impl Default for CrawlPoliciesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            rate_limit_ms: default_rate_limit(),
            listing_page_size: default_listing_page_size(),
            listing_pages: default_listing_pages(),
            python_org_url: default_python_org_url(),
            linkedin_listing_url: default_linkedin_listing_url(),
            linkedin_detail_url: default_linkedin_detail_url(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_rate_limit() -> u64 {
    500
}
fn default_listing_page_size() -> u32 {
    25
}
fn default_listing_pages() -> u32 {
    5
}
fn default_python_org_url() -> String {
    "https://www.python.org/jobs/".into()
}
fn default_linkedin_listing_url() -> String {
    "https://www.linkedin.com/jobs-guest/jobs/api/seeMoreJobPostings/search".into()
}
fn default_linkedin_detail_url() -> String {
    "https://www.linkedin.com/jobs-guest/jobs/api/jobPosting".into()
}

/// `[sweep]` section — the bulk-mode keyword×region matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Technology keywords swept against the parameterized source.
    #[serde(default = "default_sweep_keywords")]
    pub keywords: Vec<String>,

    /// Regions paired with every keyword.
    #[serde(default = "default_sweep_regions")]
    pub regions: Vec<String>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            keywords: default_sweep_keywords(),
            regions: default_sweep_regions(),
        }
    }
}

fn default_sweep_keywords() -> Vec<String> {
    ["Python", "JavaScript", "TypeScript", "Java", "Go", "Rust"]
        .map(String::from)
        .to_vec()
}
fn default_sweep_regions() -> Vec<String> {
    ["Europe", "United States", "Remote"].map(String::from).to_vec()
}

/// `[retention]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Postings older than this many days are swept by eviction.
    #[serde(default = "default_retention_days")]
    pub days: u32,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            days: default_retention_days(),
        }
    }
}

fn default_retention_days() -> u32 {
    30
}

/// `[storage]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file path; empty means `~/.jobsift/jobsift.db`.
    #[serde(default)]
    pub db_path: String,
}

// ---------------------------------------------------------------------------
// Crawl config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime crawl configuration — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Minimum ms between consecutive requests.
    pub rate_limit_ms: u64,
    /// Listing page stride.
    pub listing_page_size: u32,
    /// Listing page count ceiling.
    pub listing_pages: u32,
    /// Python.org jobs board listing URL.
    pub python_org_url: String,
    /// LinkedIn guest listing endpoint.
    pub linkedin_listing_url: String,
    /// LinkedIn guest detail endpoint.
    pub linkedin_detail_url: String,
}

impl From<&AppConfig> for CrawlConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.crawl.timeout_secs,
            rate_limit_ms: config.crawl.rate_limit_ms,
            listing_page_size: config.crawl.listing_page_size,
            listing_pages: config.crawl.listing_pages,
            python_org_url: config.crawl.python_org_url.clone(),
            linkedin_listing_url: config.crawl.linkedin_listing_url.clone(),
            linkedin_detail_url: config.crawl.linkedin_detail_url.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.jobsift/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| JobsiftError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.jobsift/jobsift.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| JobsiftError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| JobsiftError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| JobsiftError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| JobsiftError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| JobsiftError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Resolve the database file path: explicit `[storage].db_path` wins,
/// otherwise `~/.jobsift/jobsift.db`.
pub fn resolve_db_path(config: &AppConfig) -> Result<PathBuf> {
    if config.storage.db_path.is_empty() {
        Ok(config_dir()?.join(DB_FILE_NAME))
    } else {
        Ok(PathBuf::from(&config.storage.db_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("rate_limit_ms"));
        assert!(toml_str.contains("keywords"));
        assert!(toml_str.contains("python.org"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.crawl.listing_page_size, 25);
        assert_eq!(parsed.crawl.listing_pages, 5);
        assert_eq!(parsed.retention.days, 30);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[sweep]
keywords = ["Python"]
regions = ["Berlin"]
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.sweep.keywords, vec!["Python"]);
        assert_eq!(config.sweep.regions, vec!["Berlin"]);
        assert_eq!(config.crawl.timeout_secs, 30);
        assert_eq!(config.retention.days, 30);
    }

    #[test]
    fn crawl_config_from_app_config() {
        let app = AppConfig::default();
        let crawl = CrawlConfig::from(&app);
        assert_eq!(crawl.listing_page_size, 25);
        assert_eq!(crawl.rate_limit_ms, 500);
        assert!(crawl.linkedin_listing_url.contains("seeMoreJobPostings"));
    }

    #[test]
    fn explicit_db_path_wins() {
        let mut config = AppConfig::default();
        config.storage.db_path = "/tmp/jobsift-test.db".into();
        let path = resolve_db_path(&config).expect("resolve");
        assert_eq!(path, PathBuf::from("/tmp/jobsift-test.db"));
    }
}
