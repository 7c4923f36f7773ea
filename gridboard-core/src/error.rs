//! Error taxonomy for the extraction layer
//!
//! Every variant is recoverable at the panel level: the dashboard keeps the
//! error in place of the panel it would have produced and renders the rest.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("no spreadsheet for {month} in {}", .dir.display())]
    NotFound { month: String, dir: PathBuf },

    #[error("malformed sheet in {}: {reason}", .path.display())]
    MalformedSheet { path: PathBuf, reason: String },

    #[error("previous day {date} unavailable: {source}")]
    PreviousDayUnavailable {
        date: NaiveDate,
        #[source]
        source: Box<DashboardError>,
    },

    #[error("day {day} is outside the 1..={rows} rows of the table")]
    DayOutOfRange { day: u32, rows: usize },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open workbook {}: {source}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    /// A value the library built itself broke its own shape rules
    #[error("internal error: {0}")]
    Internal(String),
}

impl DashboardError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DashboardError::MalformedSheet {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DashboardError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the "no file for this month" case, which callers usually
    /// render as a warning rather than an error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DashboardError::NotFound { .. })
    }
}
