//! Per-month load cache with modification-time revalidation

use crate::extract::{MonthTables, OnlineUnitList};
use crate::error::DashboardError;
use crate::resolver::MonthlyFile;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::info;

/// Everything loaded from one monthly workbook
#[derive(Debug)]
pub struct MonthData {
    pub file: MonthlyFile,
    pub tables: MonthTables,
    /// Kept separate so a missing log sheet only degrades the units panel
    pub online_units: Result<OnlineUnitList, DashboardError>,
}

/// Cache of loaded months keyed by lower-cased month name.
///
/// Entries are immutable `Arc`s and are only ever replaced whole. A lookup
/// re-stats the cached file and drops the entry when the file changed or
/// vanished. A newer file under a different name is not noticed while the
/// cached one is unchanged; call [`ResolutionCache::invalidate`] or bypass
/// the cache for that.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: RwLock<HashMap<String, Arc<MonthData>>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a still-valid entry for `month`
    pub fn get(&self, month: &str) -> Option<Arc<MonthData>> {
        let key = cache_key(month);
        let hit = {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            entries.get(&key).cloned()
        }?;

        if hit.file.is_stale() {
            info!(month, file = %hit.file.file_name, "cached workbook changed on disk");
            let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
            // Only drop the entry we inspected; another render may already
            // have replaced it
            if entries.get(&key).is_some_and(|current| Arc::ptr_eq(current, &hit)) {
                entries.remove(&key);
            }
            return None;
        }
        Some(hit)
    }

    /// Store (or replace) the entry for `month`
    pub fn insert(&self, month: &str, data: Arc<MonthData>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(cache_key(month), data);
    }

    pub fn invalidate(&self, month: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(&cache_key(month));
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn cache_key(month: &str) -> String {
    month.trim().to_lowercase()
}
