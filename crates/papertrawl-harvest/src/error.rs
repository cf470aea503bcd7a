//! Harvester error types.
//!
//! Only orchestrator-level fatal conditions live here. Per-entry failures
//! (detail fetch errors, parse misses, malformed listing fragments) are
//! degraded to empty-field records or drop counts and never propagate.

use crate::fetcher::FetchError;
use papertrawl_store::StoreError;
use thiserror::Error;

/// Fatal errors that abort a harvest run.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The listing page could not be fetched. Nothing can be harvested
    /// without it.
    #[error("failed to fetch listing page {url}: {source}")]
    ListingFetch {
        /// Listing page URL
        url: String,
        /// Underlying transport failure
        source: FetchError,
    },

    /// The record store failed to read at startup or to accept a write.
    #[error("record store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for harvest operations.
pub type Result<T> = std::result::Result<T, HarvestError>;
