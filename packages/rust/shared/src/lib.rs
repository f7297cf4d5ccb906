//! Shared types, error model, and configuration for jobsift.
//!
//! This crate is the foundation depended on by all other jobsift crates.
//! It provides:
//! - [`JobsiftError`] — the unified error type
//! - Domain types ([`JobPosting`], [`Source`], [`Seniority`])
//! - Configuration ([`AppConfig`], [`CrawlConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CrawlConfig, CrawlPoliciesConfig, RetentionConfig, StorageConfig, SweepConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from, resolve_db_path,
};
pub use error::{JobsiftError, Result};
pub use types::{JobPosting, Seniority, Source};
