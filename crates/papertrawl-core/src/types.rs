//! Shared domain types for the papertrawl harvester.
//!
//! This module defines the listing-entry types that flow from enumeration
//! through enrichment. The persisted `Record` lives in `papertrawl-store`.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype for entry keys with validation.
///
/// The key is the paper title as it appears in the listing; it is the
/// identity used for deduplication against the record store. Keys must be
/// non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey(String);

impl EntryKey {
    /// Create a new `EntryKey` from a string.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    /// Returns error if the key is empty after trimming.
    pub fn new(key: impl Into<String>) -> Result<Self, CoreError> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(CoreError::Validation(
                "entry key must be non-empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, returning the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata available for an entry without fetching its detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFields {
    /// Comma-joined author names as listed on the index page
    pub authors: String,
    /// Number of listed authors
    pub author_count: u32,
    /// Absolute URL of the paper PDF, empty if none was listed
    pub pdf_link: String,
    /// Absolute URL of the supplementary material PDF, empty if none
    pub supp_link: String,
}

/// One listing-page item before enrichment.
///
/// Created by the enumerator, consumed by the detail fetch pool, and
/// discarded once converted into a `Record`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDescriptor {
    /// Deduplication identity (the paper title)
    pub key: EntryKey,
    /// 1-based position in the source listing; used only for final report
    /// ordering, never for completion or write order
    pub ordinal: usize,
    /// Detail-page URL; `None` skips enrichment and leaves the abstract empty
    pub locator: Option<String>,
    /// Metadata extracted from the listing itself
    pub fields: EntryFields,
}
