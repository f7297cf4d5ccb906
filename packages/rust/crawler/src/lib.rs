//! Harvest engine and source-specific listing parsers.
//!
//! This crate provides:
//! - [`sources`] — Listing and detail parsers for the python.org jobs board
//!   and the LinkedIn guest API
//! - [`engine`] — Sequential, rate-limited harvester that runs the
//!   extractors and upserts postings through the storage layer

pub mod engine;
pub mod sources;

pub use engine::{Harvester, HarvestReport, ProgressReporter, SilentProgress, SweepReport};
pub use sources::{Listing, RawPosting, canonical_url};
