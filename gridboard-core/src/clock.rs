//! Injected "now" in the control center's time zone

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Time zone of the control center when none is configured
pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::Asia::Manila;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Tz>;
}

/// Wall clock converted to a fixed regional zone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_ZONE)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Tz>,
}

impl FixedClock {
    pub fn new(now: DateTime<Tz>) -> Self {
        Self { now }
    }

    /// Interpret a local wall-clock time in `tz`. Ambiguous times take the
    /// earlier instant; times skipped by a DST jump return `None`.
    pub fn at_local(tz: Tz, local: NaiveDateTime) -> Option<Self> {
        tz.from_local_datetime(&local).earliest().map(Self::new)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.now
    }
}
