//! Papertrawl Harvest - listing harvest orchestration.
//!
//! This crate provides the harvesting engine: it enumerates paper entries
//! from a proceedings listing page, fetches each entry's detail page through
//! a bounded pool of concurrent workers to extract the abstract, and persists
//! enriched records incrementally with an at-most-once-per-key guarantee that
//! holds across repeated runs against the same store.
//!
//! # Features
//!
//! - Concurrent detail-page fetching with a fixed in-flight cap
//! - Incremental persistence: each record is durable as soon as it completes
//! - Resume-safe: already-persisted entries are skipped at enumeration
//! - Per-entry failures degrade to empty-field records, never abort the run
//! - Progress events through a pluggable reporter
//!
//! # Example
//!
//! ```rust,ignore
//! use papertrawl_harvest::{HarvestOrchestrator, HttpFetcher};
//! use papertrawl_store::RecordStore;
//! use std::sync::Arc;
//!
//! let fetcher = Arc::new(HttpFetcher::new(&config.http)?);
//! let store = RecordStore::new(&config.harvest.output);
//! let orchestrator = HarvestOrchestrator::new(fetcher, store, &config.harvest);
//!
//! let summary = orchestrator.run().await?;
//! println!("persisted {} new records", summary.persisted);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod enumerate;
pub mod error;
pub mod fetcher;
pub mod orchestrator;
#[allow(missing_docs)]
pub mod parser;
pub mod persist;
pub mod pool;
pub mod progress;

// Re-export commonly used types
pub use enumerate::{enumerate, EnumerationStats};
pub use error::{HarvestError, Result};
pub use fetcher::{FetchError, FetchResult, Fetcher, HttpFetcher};
pub use orchestrator::{HarvestOrchestrator, HarvestSummary};
pub use parser::{parse_detail, ListingEntry, ListingParser};
pub use persist::IncrementalPersister;
pub use pool::DetailFetchPool;
pub use progress::{HarvestEvent, ProgressReporter, SilentReporter, TracingReporter};
