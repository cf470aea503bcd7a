//! Harvest orchestration: load existing keys, enumerate, dispatch, collect.

use crate::enumerate::enumerate;
use crate::error::{HarvestError, Result};
use crate::fetcher::Fetcher;
use crate::parser::ListingParser;
use crate::persist::IncrementalPersister;
use crate::pool::DetailFetchPool;
use crate::progress::{HarvestEvent, ProgressReporter, SilentReporter};
use papertrawl_core::HarvestSection;
use papertrawl_store::{Record, RecordStore, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Final accounting for one harvest run.
///
/// The record store is the source of truth for what was durably written;
/// this summary is best-effort reporting and is not reconciled with the
/// store on abnormal termination.
#[derive(Debug, Default)]
pub struct HarvestSummary {
    /// Entries present in the listing markup
    pub listed: usize,
    /// New descriptors dispatched for enrichment
    pub enumerated: usize,
    /// Entries skipped as already persisted or duplicated in the listing
    pub skipped: usize,
    /// Fragments dropped as unparseable
    pub parse_dropped: usize,
    /// Entries whose detail fetch failed (persisted with empty abstracts)
    pub enrichment_failed: usize,
    /// Records newly written to the store in this run
    pub persisted: usize,
    /// Completed records in listing order, regardless of completion order
    pub records: Vec<Record>,
}

/// Coordinates a complete harvest run.
///
/// The run is sequential except for the enrichment phase: load existing
/// keys, fetch and enumerate the listing, dispatch descriptors to the
/// bounded fetch pool, persist results as they land, then reassemble the
/// completed records in listing order once every dispatched descriptor has
/// reported back.
pub struct HarvestOrchestrator<F> {
    fetcher: Arc<F>,
    parser: ListingParser,
    store: RecordStore,
    listing_url: String,
    width: usize,
}

impl<F: Fetcher> HarvestOrchestrator<F> {
    /// Create an orchestrator from the harvest configuration section.
    #[must_use]
    pub fn new(fetcher: Arc<F>, store: RecordStore, harvest: &HarvestSection) -> Self {
        Self {
            fetcher,
            parser: ListingParser::new(&harvest.base_url),
            store,
            listing_url: harvest.listing_url.clone(),
            width: harvest.workers,
        }
    }

    /// Override the enrichment pool width.
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Run the harvest silently.
    ///
    /// # Errors
    /// Fails only on fatal conditions: the listing page cannot be fetched,
    /// or the record store cannot be read at startup or written during the
    /// run. Per-entry failures degrade and are reported in the summary.
    pub async fn run(&self) -> Result<HarvestSummary> {
        self.run_with_progress(&SilentReporter).await
    }

    /// Run the harvest, emitting progress events through `reporter`.
    pub async fn run_with_progress<R: ProgressReporter>(
        &self,
        reporter: &R,
    ) -> Result<HarvestSummary> {
        // Resuming safely is impossible without knowing what already
        // exists, so an unreadable store is fatal. A missing store is the
        // normal first run.
        let existing = self.store.load_existing_keys()?;
        reporter.report(HarvestEvent::ExistingRecordsFound {
            count: existing.len(),
        });

        let listing_html = self.fetcher.fetch(&self.listing_url).await.map_err(|e| {
            HarvestError::ListingFetch {
                url: self.listing_url.clone(),
                source: e,
            }
        })?;

        let (descriptors, stats) = enumerate(&self.parser, &listing_html, &existing);
        let total = descriptors.len();
        reporter.report(HarvestEvent::EntriesEnumerated {
            listed: stats.listed,
            new: total,
            skipped: stats.skipped,
            parse_dropped: stats.parse_dropped,
        });

        let mut summary = HarvestSummary {
            listed: stats.listed,
            enumerated: total,
            skipped: stats.skipped,
            parse_dropped: stats.parse_dropped,
            ..HarvestSummary::default()
        };

        if descriptors.is_empty() {
            tracing::info!("no new entries to harvest");
            reporter.report(HarvestEvent::Completed { summary: &summary });
            return Ok(summary);
        }

        // Slot arena sized to the dispatched batch: each completion lands in
        // its own slot, so listing order survives arbitrary completion order.
        let slot_index: HashMap<usize, usize> = descriptors
            .iter()
            .enumerate()
            .map(|(slot, descriptor)| (descriptor.ordinal, slot))
            .collect();
        let slots: Mutex<Vec<Option<Record>>> = Mutex::new(vec![None; total]);

        let persister = IncrementalPersister::new(self.store.clone(), existing);
        let persisted = AtomicUsize::new(0);
        let completed = AtomicUsize::new(0);
        let first_store_error: Mutex<Option<StoreError>> = Mutex::new(None);

        // Progress roughly every 5% of the batch, at least every 50 items
        let report_interval = std::cmp::max(total / 20, 50);

        let pool = DetailFetchPool::new(Arc::clone(&self.fetcher), self.width);
        let enrichment_failed = pool
            .enrich_all(descriptors, |descriptor, record| {
                match persister.persist(&record) {
                    Ok(true) => {
                        persisted.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(false) => {
                        tracing::debug!(key = %record.title, "key already written, skipping append");
                    }
                    Err(e) => {
                        tracing::error!(key = %record.title, error = %e, "failed to persist record");
                        let mut first_error =
                            first_store_error.lock().expect("error slot lock poisoned");
                        first_error.get_or_insert(e);
                    }
                }

                if let Some(&slot) = slot_index.get(&descriptor.ordinal) {
                    slots.lock().expect("slot arena lock poisoned")[slot] = Some(record);
                }

                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                if done % report_interval == 0 || done == total {
                    reporter.report(HarvestEvent::Progress {
                        completed: done,
                        total,
                    });
                }
            })
            .await;

        // An unwritable store is fatal even though the run was allowed to
        // drain: the operator must know the on-disk state stopped advancing.
        if let Some(err) = first_store_error
            .into_inner()
            .expect("error slot lock poisoned")
        {
            return Err(err.into());
        }

        summary.enrichment_failed = enrichment_failed;
        summary.persisted = persisted.load(Ordering::Relaxed);
        summary.records = slots
            .into_inner()
            .expect("slot arena lock poisoned")
            .into_iter()
            .flatten()
            .collect();

        reporter.report(HarvestEvent::Completed { summary: &summary });
        Ok(summary)
    }
}
