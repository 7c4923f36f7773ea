//! gridboard-core: extraction layer for the grid operations dashboard
//!
//! Finds the current monthly workbook, slices the hourly frequency and
//! demand tables out of its fixed template, derives the online unit list
//! from the switching log and lines today up against yesterday.

pub mod cache;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod day;
pub mod error;
pub mod extract;
pub mod layout;
pub mod loader;
pub mod reader;
pub mod resolver;
pub mod table;

pub use cache::{MonthData, ResolutionCache};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::DashboardConfig;
pub use dashboard::{CurrentDayView, Dashboard, DashboardSnapshot, MonthPanels};
pub use day::{DayRecord, DayResolver, MonthSource, latest_reading_hour, mask_after_hour, month_name};
pub use error::{DashboardError, DashboardResult};
pub use extract::{MonthTables, OnlineUnitList, SheetExtractor};
pub use layout::SheetLayout;
pub use loader::MonthLoader;
pub use resolver::{FileResolver, MonthlyFile};
pub use table::{HourlyTable, Reading, ZeroPolicy, hour_labels, round2};
