//! Configuration system for the dashboard

use crate::clock::DEFAULT_TIME_ZONE;
use crate::error::{DashboardError, DashboardResult};
use crate::layout::SheetLayout;
use crate::resolver::DEFAULT_EXTENSIONS;
use crate::table::ZeroPolicy;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory scanned for monthly workbooks
    pub data_dir: PathBuf,
    /// Recognized spreadsheet extensions, without the dot
    pub extensions: Vec<String>,
    /// IANA zone of the control center, used for "today" and the current hour
    pub time_zone: String,
    pub zero_policy: ZeroPolicy,
    /// Seconds between re-renders in watch mode
    pub refresh_interval_secs: u64,
    /// Reuse loaded months until their file changes
    pub cache: bool,
    pub layout: SheetLayout,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            zero_policy: ZeroPolicy::default(),
            refresh_interval_secs: 60,
            cache: true,
            layout: SheetLayout::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> DashboardResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| DashboardError::io(path, e))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> DashboardResult<Self> {
        toml::from_str(content).map_err(|e| DashboardError::Config(e.to_string()))
    }

    /// Parsed time zone
    pub fn tz(&self) -> DashboardResult<Tz> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|_| DashboardError::Config(format!("unknown time zone '{}'", self.time_zone)))
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Validate the configuration before the first render
    pub fn validate(&self) -> DashboardResult<()> {
        self.tz()?;
        if self.extensions.iter().all(|e| e.trim().is_empty()) {
            return Err(DashboardError::Config(
                "at least one spreadsheet extension is required".to_string(),
            ));
        }
        if self.refresh_interval_secs == 0 {
            return Err(DashboardError::Config(
                "refresh_interval_secs must be greater than zero".to_string(),
            ));
        }
        self.layout.validate().map_err(DashboardError::Config)
    }
}
