//! Incremental, at-most-once persistence of completed records.

use papertrawl_store::{Record, RecordStore, StoreError};
use std::collections::HashSet;
use std::sync::Mutex;

/// The single point enforcing "write each key at most once".
///
/// All pool workers funnel completed records through [`persist`]. One mutex
/// guards the pair (seen-key set, store append) as a single critical
/// section; splitting them would open a race between "check if key seen"
/// and "mark key seen". No other component touches either resource.
///
/// [`persist`]: IncrementalPersister::persist
pub struct IncrementalPersister {
    inner: Mutex<Inner>,
}

struct Inner {
    store: RecordStore,
    seen: HashSet<String>,
}

impl IncrementalPersister {
    /// Create a persister over the store, seeded with the keys it already
    /// holds.
    #[must_use]
    pub fn new(store: RecordStore, seen: HashSet<String>) -> Self {
        Self {
            inner: Mutex::new(Inner { store, seen }),
        }
    }

    /// Persist a completed record unless its key was already written or is
    /// in flight in this run.
    ///
    /// Returns `true` if the record was newly written, `false` for an
    /// already-seen key (a no-op, not an error).
    ///
    /// # Errors
    /// Returns [`StoreError`] when the append fails; the key is then left
    /// unmarked so a later attempt could still write it.
    pub fn persist(&self, record: &Record) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().expect("persister lock poisoned");

        if inner.seen.contains(&record.title) {
            return Ok(false);
        }

        inner.store.append(std::slice::from_ref(record))?;
        inner.seen.insert(record.title.clone());
        Ok(true)
    }

    /// Number of distinct keys persisted or seeded so far.
    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.inner.lock().expect("persister lock poisoned").seen.len()
    }
}
