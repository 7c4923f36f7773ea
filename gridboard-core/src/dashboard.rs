//! One render pass over the extraction layer
//!
//! A snapshot holds every panel as its own `Result`, so a missing prior
//! month or log sheet only blanks the panel that needed it.

use crate::cache::{MonthData, ResolutionCache};
use crate::clock::{Clock, SystemClock};
use crate::config::DashboardConfig;
use crate::day::{DayRecord, DayResolver, MonthSource, latest_reading_hour, month_name};
use crate::error::DashboardResult;
use crate::extract::{OnlineUnitList, SheetExtractor};
use crate::loader::MonthLoader;
use crate::resolver::FileResolver;
use crate::table::Reading;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{info, warn};

/// Current-day panel
#[derive(Debug)]
pub struct CurrentDayView {
    pub record: DayRecord,
    /// Today's demand blanked after the current hour; unmasked for past days
    pub demand_masked: Vec<Reading>,
    pub latest_demand_hour: Option<usize>,
    pub latest_frequency_hour: Option<usize>,
}

/// Panels that exist once the current month loaded
#[derive(Debug)]
pub struct MonthPanels {
    pub data: Arc<MonthData>,
    pub today: DashboardResult<CurrentDayView>,
}

impl MonthPanels {
    pub fn online_units(&self) -> Result<&OnlineUnitList, &crate::error::DashboardError> {
        self.data.online_units.as_ref()
    }
}

/// Result of one render
#[derive(Debug)]
pub struct DashboardSnapshot {
    pub now: DateTime<Tz>,
    pub date: NaiveDate,
    pub month: String,
    pub panels: DashboardResult<MonthPanels>,
}

pub struct Dashboard {
    loader: MonthLoader,
    clock: Box<dyn Clock>,
}

impl Dashboard {
    pub fn new(loader: MonthLoader, clock: Box<dyn Clock>) -> Self {
        Self { loader, clock }
    }

    /// Wire resolver, extractor, cache and clock from a configuration
    pub fn from_config(config: &DashboardConfig) -> DashboardResult<Self> {
        config.validate()?;
        let resolver = FileResolver::with_extensions(&config.data_dir, &config.extensions);
        let extractor = SheetExtractor::new(config.layout.clone(), config.zero_policy);
        let mut loader = MonthLoader::new(resolver, extractor);
        if config.cache {
            loader = loader.with_cache(Arc::new(ResolutionCache::new()));
        }
        Ok(Self::new(loader, Box::new(SystemClock::new(config.tz()?))))
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn loader(&self) -> &MonthLoader {
        &self.loader
    }

    /// Render for the clock's current date
    pub fn render(&self) -> DashboardSnapshot {
        let now = self.clock.now();
        self.render_at(now, now.date_naive())
    }

    /// Render for an explicit reference date, masking against `now` only
    /// when the date is today
    pub fn render_for(&self, date: NaiveDate) -> DashboardSnapshot {
        self.render_at(self.clock.now(), date)
    }

    fn render_at(&self, now: DateTime<Tz>, date: NaiveDate) -> DashboardSnapshot {
        let month = month_name(date);
        let panels = self.loader.load_month(&month).map(|data| {
            let today = self.current_day(&data, now, date);
            MonthPanels { data, today }
        });

        match &panels {
            Ok(p) => info!(%date, file = %p.data.file.file_name, "rendered dashboard"),
            Err(e) => warn!(%date, month = %month, error = %e, "month unavailable"),
        }

        DashboardSnapshot {
            now,
            date,
            month,
            panels,
        }
    }

    fn current_day(
        &self,
        data: &MonthData,
        now: DateTime<Tz>,
        date: NaiveDate,
    ) -> DashboardResult<CurrentDayView> {
        let record = DayResolver::new(&self.loader).resolve_day(date, &data.tables)?;
        let demand_masked = if date == now.date_naive() {
            record.demand_until(&now)
        } else {
            record.demand.clone()
        };
        let latest_demand_hour = latest_reading_hour(&demand_masked);
        let latest_frequency_hour = latest_reading_hour(&record.frequency);

        Ok(CurrentDayView {
            record,
            demand_masked,
            latest_demand_hour,
            latest_frequency_hour,
        })
    }
}
