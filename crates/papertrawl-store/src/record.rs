//! The persisted record type.

use papertrawl_core::EntryDescriptor;
use serde::{Deserialize, Serialize};

/// One enriched, persisted paper entry.
///
/// Field order here is the on-disk column order; changing it changes the
/// store schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Paper title; the deduplication key
    pub title: String,
    /// Comma-joined author names
    pub authors: String,
    /// Number of listed authors
    pub author_count: u32,
    /// Abstract text fetched from the detail page; empty when enrichment
    /// was skipped or failed
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Absolute URL of the paper PDF, empty if none
    pub pdf_link: String,
    /// Absolute URL of the supplementary material, empty if none
    pub supp_link: String,
    /// Detail-page URL the abstract was fetched from, empty if none
    pub paper_url: String,
}

impl Record {
    /// Build a record from a descriptor and the (possibly empty) abstract
    /// produced by enrichment.
    #[must_use]
    pub fn from_descriptor(descriptor: &EntryDescriptor, abstract_text: String) -> Self {
        Self {
            title: descriptor.key.as_str().to_string(),
            authors: descriptor.fields.authors.clone(),
            author_count: descriptor.fields.author_count,
            abstract_text,
            pdf_link: descriptor.fields.pdf_link.clone(),
            supp_link: descriptor.fields.supp_link.clone(),
            paper_url: descriptor.locator.clone().unwrap_or_default(),
        }
    }
}
