//! Memoizing record store.
//!
//! Loading the dataset on every filter change would be wasteful (though not
//! incorrect, since records are immutable). The store caches each loaded
//! table keyed by source identity — canonical path plus file modification
//! time and length — and invalidates when the identity changes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use chapter_map_record_models::Record;

use crate::{IngestError, load_path};

/// Captures the data state of a source file at load time.
///
/// A changed modification time or length indicates the source was rewritten
/// and the cached table is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceFingerprint {
    modified: SystemTime,
    len: u64,
}

impl SourceFingerprint {
    fn of(path: &Path) -> Result<Self, IngestError> {
        let metadata = std::fs::metadata(path)?;
        Ok(Self {
            modified: metadata.modified()?,
            len: metadata.len(),
        })
    }
}

/// One cached table with the fingerprint it was loaded under.
struct CachedTable {
    fingerprint: SourceFingerprint,
    records: Arc<Vec<Record>>,
    coercions: u64,
}

/// Memoizing cache of loaded occurrence tables.
///
/// Tables are shared via [`Arc`], so concurrent consumers can filter and
/// aggregate the same base table without copying it. The store itself is
/// safe to share across threads.
#[derive(Default)]
pub struct RecordStore {
    cache: Mutex<HashMap<PathBuf, CachedTable>>,
}

impl RecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table for `path`, loading it only if it has not been
    /// loaded before or its source identity changed since.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or fails ingestion.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<Vec<Record>>, IngestError> {
        let canonical = path.canonicalize()?;
        let fingerprint = SourceFingerprint::of(&canonical)?;

        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(cached) = cache.get(&canonical)
            && cached.fingerprint == fingerprint
        {
            log::debug!("Record store cache hit for {}", canonical.display());
            return Ok(Arc::clone(&cached.records));
        }

        let outcome = load_path(&canonical)?;
        let records = Arc::new(outcome.records);
        cache.insert(
            canonical,
            CachedTable {
                fingerprint,
                records: Arc::clone(&records),
                coercions: outcome.coercions,
            },
        );
        Ok(records)
    }

    /// Returns the coercion count observed when the cached table for `path`
    /// was loaded, if the table is cached.
    #[must_use]
    pub fn coercions(&self, path: &Path) -> Option<u64> {
        let canonical = path.canonicalize().ok()?;
        let cache = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        cache.get(&canonical).map(|cached| cached.coercions)
    }

    /// Drops the cached table for `path`, forcing the next
    /// [`Self::get_or_load`] to re-read the source.
    pub fn invalidate(&self, path: &Path) {
        if let Ok(canonical) = path.canonicalize() {
            let mut cache = self
                .cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            cache.remove(&canonical);
        }
    }

    /// Drops every cached table.
    pub fn clear(&self) {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        cache.clear();
    }
}
