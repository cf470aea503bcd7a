//! Progress reporting for harvest runs.
//!
//! A trait-based abstraction so the CLI, tests, and any future surface can
//! observe a run without the orchestrator knowing how events are rendered.

use crate::orchestrator::HarvestSummary;

/// Events emitted during a harvest run.
#[derive(Debug, Clone)]
pub enum HarvestEvent<'a> {
    /// Keys loaded from the existing store at startup.
    ExistingRecordsFound {
        /// Number of already-persisted keys
        count: usize,
    },

    /// The listing was enumerated.
    EntriesEnumerated {
        /// Entries present in the listing
        listed: usize,
        /// New descriptors queued for enrichment
        new: usize,
        /// Entries skipped as already seen
        skipped: usize,
        /// Fragments dropped as unparseable
        parse_dropped: usize,
    },

    /// Periodic completion progress during the parallel phase.
    Progress {
        /// Descriptors completed so far
        completed: usize,
        /// Descriptors dispatched in total
        total: usize,
    },

    /// The run finished; all dispatched descriptors have completed.
    Completed {
        /// Final summary
        summary: &'a HarvestSummary,
    },
}

/// Trait for reporting harvest progress.
///
/// The default implementation ignores every event, which is the right mode
/// for library use.
pub trait ProgressReporter: Send + Sync {
    /// Called when a harvest event occurs.
    fn report(&self, event: HarvestEvent<'_>) {
        let _ = event;
    }
}

/// A no-op reporter that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}

/// A reporter that logs events through the `tracing` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, event: HarvestEvent<'_>) {
        match event {
            HarvestEvent::ExistingRecordsFound { count } => {
                tracing::info!(count, "loaded existing record keys");
            }
            HarvestEvent::EntriesEnumerated {
                listed,
                new,
                skipped,
                parse_dropped,
            } => {
                tracing::info!(listed, new, skipped, parse_dropped, "listing enumerated");
            }
            HarvestEvent::Progress { completed, total } => {
                tracing::info!(completed, total, "enrichment progress");
            }
            HarvestEvent::Completed { summary } => {
                tracing::info!(
                    enumerated = summary.enumerated,
                    persisted = summary.persisted,
                    enrichment_failed = summary.enrichment_failed,
                    "harvest completed"
                );
            }
        }
    }
}
