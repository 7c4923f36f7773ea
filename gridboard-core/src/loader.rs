//! Resolve, read and extract a month in one step

use crate::cache::{MonthData, ResolutionCache};
use crate::day::MonthSource;
use crate::error::DashboardResult;
use crate::extract::SheetExtractor;
use crate::reader;
use crate::resolver::FileResolver;
use std::sync::Arc;
use tracing::{debug, warn};

/// Loads months through a `FileResolver` and a `SheetExtractor`, with an
/// optional shared cache
#[derive(Debug, Clone)]
pub struct MonthLoader {
    resolver: FileResolver,
    extractor: SheetExtractor,
    cache: Option<Arc<ResolutionCache>>,
}

impl MonthLoader {
    pub fn new(resolver: FileResolver, extractor: SheetExtractor) -> Self {
        Self {
            resolver,
            extractor,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<ResolutionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn resolver(&self) -> &FileResolver {
        &self.resolver
    }

    pub fn cache(&self) -> Option<&Arc<ResolutionCache>> {
        self.cache.as_ref()
    }

    /// Load `month` ignoring any cached entry; the fresh result still
    /// replaces the cache entry
    pub fn load_fresh(&self, month: &str) -> DashboardResult<Arc<MonthData>> {
        let file = self.resolver.resolve(month)?;
        let workbook = reader::read_workbook(&file.path)?;
        let tables = self.extractor.tables_from_workbook(&workbook)?;

        let online_units = self.extractor.online_units_from_workbook(&workbook);
        if let Err(e) = &online_units {
            warn!(month, error = %e, "online units unavailable");
        }

        let data = Arc::new(MonthData {
            file,
            tables,
            online_units,
        });
        if let Some(cache) = &self.cache {
            cache.insert(month, Arc::clone(&data));
        }
        Ok(data)
    }
}

impl MonthSource for MonthLoader {
    fn load_month(&self, month: &str) -> DashboardResult<Arc<MonthData>> {
        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(month)) {
            debug!(month, file = %hit.file.file_name, "cache hit");
            return Ok(hit);
        }
        self.load_fresh(month)
    }
}
