//! Listing enumeration: raw markup to deduplicated entry descriptors.

use crate::parser::ListingParser;
use papertrawl_core::{EntryDescriptor, EntryFields, EntryKey};
use std::collections::HashSet;

/// Counts gathered while enumerating one listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationStats {
    /// Entries present in the listing markup
    pub listed: usize,
    /// Entries skipped because their key was already seen (persisted in a
    /// prior run, or queued earlier in this one)
    pub skipped: usize,
    /// Fragments dropped because no key could be derived from them
    pub parse_dropped: usize,
}

/// Turn a listing page into descriptors for entries not yet seen.
///
/// Ordinals are positional: they count every listed fragment, including ones
/// that end up skipped or dropped, so an entry's ordinal is stable across
/// runs regardless of how much of the listing is already persisted.
#[must_use]
pub fn enumerate(
    parser: &ListingParser,
    listing_html: &str,
    seen: &HashSet<String>,
) -> (Vec<EntryDescriptor>, EnumerationStats) {
    let parsed = parser.parse_listing(listing_html);

    let mut stats = EnumerationStats {
        listed: parsed.len(),
        ..EnumerationStats::default()
    };
    let mut queued: HashSet<String> = HashSet::new();
    let mut descriptors = Vec::new();

    for (index, entry) in parsed.into_iter().enumerate() {
        let ordinal = index + 1;

        let Some(entry) = entry else {
            stats.parse_dropped += 1;
            tracing::warn!(ordinal, "dropping malformed listing fragment");
            continue;
        };

        let key = match EntryKey::new(&entry.title) {
            Ok(key) => key,
            Err(_) => {
                stats.parse_dropped += 1;
                tracing::warn!(ordinal, "dropping listing fragment with empty title");
                continue;
            }
        };

        if seen.contains(key.as_str()) || queued.contains(key.as_str()) {
            stats.skipped += 1;
            tracing::debug!(ordinal, key = %key, "skipping already-seen entry");
            continue;
        }
        queued.insert(key.as_str().to_string());

        let author_count = u32::try_from(entry.authors.len()).unwrap_or(u32::MAX);
        descriptors.push(EntryDescriptor {
            key,
            ordinal,
            locator: entry.paper_url,
            fields: EntryFields {
                authors: entry.authors.join(", "),
                author_count,
                pdf_link: entry.pdf_link,
                supp_link: entry.supp_link,
            },
        });
    }

    (descriptors, stats)
}
