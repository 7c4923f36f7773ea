//! Current-day and previous-day resolution

use crate::cache::MonthData;
use crate::error::{DashboardError, DashboardResult};
use crate::extract::MonthTables;
use crate::table::Reading;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike};
use std::sync::Arc;
use tracing::{debug, warn};

/// Anything that can produce a month's data by month name
pub trait MonthSource {
    fn load_month(&self, month: &str) -> DashboardResult<Arc<MonthData>>;
}

/// Full English month name, as used in workbook file names
pub fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string()
}

/// One day's readings plus the previous day's demand for comparison
#[derive(Debug)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub frequency: Vec<Reading>,
    pub demand: Vec<Reading>,
    pub previous_date: NaiveDate,
    /// `Err(PreviousDayUnavailable)` when the prior month has no usable file
    pub previous_demand: DashboardResult<Vec<Reading>>,
}

impl DayRecord {
    /// Demand for today with hours after `now` blanked
    pub fn demand_until<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<Reading> {
        mask_after_hour(&self.demand, now.hour())
    }
}

/// Resolves day slices against the current month's tables
pub struct DayResolver<'a> {
    source: &'a dyn MonthSource,
}

impl<'a> DayResolver<'a> {
    pub fn new(source: &'a dyn MonthSource) -> Self {
        Self { source }
    }

    /// Build the record for `date` from the current month's tables.
    ///
    /// Today's slice comes from `current`. The previous day reuses `current`
    /// when it falls in the same month; on the 1st the prior month is loaded
    /// through the source and a failure there only marks the previous day
    /// unavailable.
    pub fn resolve_day(&self, date: NaiveDate, current: &MonthTables) -> DashboardResult<DayRecord> {
        let frequency = current.frequency.day(date.day())?.to_vec();
        let demand = current.demand.day(date.day())?.to_vec();

        let previous_date = date
            .pred_opt()
            .ok_or_else(|| DashboardError::Internal(format!("no day before {}", date)))?;

        let previous_demand = if same_month(previous_date, date) {
            current
                .demand
                .day(previous_date.day())
                .map(<[Reading]>::to_vec)
        } else {
            let month = month_name(previous_date);
            debug!(%previous_date, month = %month, "previous day is in the prior month");
            self.source
                .load_month(&month)
                .and_then(|data| {
                    let row = data.tables.demand.day(previous_date.day())?.to_vec();
                    Ok(row)
                })
                .map_err(|e| {
                    warn!(%previous_date, error = %e, "previous day unavailable");
                    DashboardError::PreviousDayUnavailable {
                        date: previous_date,
                        source: Box::new(e),
                    }
                })
        };

        Ok(DayRecord {
            date,
            frequency,
            demand,
            previous_date,
            previous_demand,
        })
    }
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Blank every hour after `hour`; the reading for `hour` itself stays.
pub fn mask_after_hour(series: &[Reading], hour: u32) -> Vec<Reading> {
    let keep = hour as usize + 1;
    series
        .iter()
        .enumerate()
        .map(|(idx, reading)| {
            if idx < keep {
                reading.clone()
            } else {
                Reading::Missing
            }
        })
        .collect()
}

/// Hour index of the last numeric reading, the point a chart highlights
pub fn latest_reading_hour(series: &[Reading]) -> Option<usize> {
    series.iter().rposition(|r| r.as_value().is_some())
}
