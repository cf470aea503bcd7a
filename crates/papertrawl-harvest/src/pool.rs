//! Bounded-concurrency enrichment of entry descriptors.

use crate::fetcher::Fetcher;
use crate::parser;
use futures::stream::{FuturesUnordered, StreamExt};
use papertrawl_core::EntryDescriptor;
use papertrawl_store::Record;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Fixed-width pool that fetches each descriptor's detail page and extracts
/// the abstract.
///
/// At most `width` fetches are in flight at once. Completion order is
/// arbitrary; results are delivered through a callback as they land, never
/// in bulk, because write order is completion order by design.
///
/// Enrichment failure for one entry degrades that entry to an empty
/// abstract and never aborts the pool or its siblings. The pool does not
/// retry; retry policy belongs to the fetcher.
pub struct DetailFetchPool<F> {
    fetcher: Arc<F>,
    width: usize,
}

impl<F: Fetcher> DetailFetchPool<F> {
    /// Create a pool over the given fetcher. A width of zero is clamped to
    /// one; the drain loop requires at least one in-flight slot.
    #[must_use]
    pub fn new(fetcher: Arc<F>, width: usize) -> Self {
        Self {
            fetcher,
            width: width.max(1),
        }
    }

    /// Enrich every descriptor, invoking `on_complete` exactly once per
    /// descriptor as it completes. Returns the number of entries whose
    /// detail fetch failed (and were degraded to empty abstracts).
    ///
    /// The callback must tolerate interleaving with any in-flight worker;
    /// it routes to the incremental persister's serialized section.
    pub async fn enrich_all<C>(&self, descriptors: Vec<EntryDescriptor>, on_complete: C) -> usize
    where
        C: Fn(EntryDescriptor, Record) + Send + Sync,
    {
        let failures = AtomicUsize::new(0);
        let mut in_flight = FuturesUnordered::new();

        for descriptor in descriptors {
            in_flight.push(self.enrich_one(descriptor, &failures));

            // Respect the width cap before admitting more work
            while in_flight.len() >= self.width {
                if let Some((descriptor, record)) = in_flight.next().await {
                    on_complete(descriptor, record);
                }
            }
        }

        // Drain the tail
        while let Some((descriptor, record)) = in_flight.next().await {
            on_complete(descriptor, record);
        }

        failures.load(Ordering::Relaxed)
    }

    async fn enrich_one(
        &self,
        descriptor: EntryDescriptor,
        failures: &AtomicUsize,
    ) -> (EntryDescriptor, Record) {
        let abstract_text = match &descriptor.locator {
            // No detail page: synthesize immediately, no network call
            None => String::new(),
            Some(url) => match self.fetcher.fetch(url).await {
                Ok(body) => parser::parse_detail(&body),
                Err(e) => {
                    failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        key = %descriptor.key,
                        url = %url,
                        error = %e,
                        "detail fetch failed, keeping entry with empty abstract"
                    );
                    String::new()
                }
            },
        };

        let record = Record::from_descriptor(&descriptor, abstract_text);
        (descriptor, record)
    }
}
