//! Workbook fixtures following the v1 PCC template

#![allow(dead_code)]

use gridboard_core::layout::GEN_SWITCHING_LOGS;
use rust_xlsxwriter::Workbook;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

pub type LogRow = [Option<&'static str>; 7];

/// Contents of one monthly workbook
pub struct MonthFixture {
    /// Added to every demand cell (day * 100 + hour)
    pub demand_base: f64,
    /// Hours (0-based) of day 1 whose demand is written as 0
    pub zero_demand_hours: Vec<u16>,
    /// Switching log rows; `None` omits the log sheet entirely
    pub log: Option<Vec<LogRow>>,
    /// Days written; later rows of both blocks are left blank
    pub days: u32,
}

impl Default for MonthFixture {
    fn default() -> Self {
        Self {
            demand_base: 0.0,
            zero_demand_hours: Vec::new(),
            log: Some(default_log()),
            days: 31,
        }
    }
}

pub fn default_log() -> Vec<LogRow> {
    vec![
        [Some("UNIT"), Some("CAPACITY"), Some("TIME"), Some("OFF"), Some("TRIP"), Some("REMARKS"), Some("OUTAGE")],
        [Some("GEN-1"), None, None, None, None, None, None],
        [Some("GEN-2"), None, None, Some("x"), None, None, None],
        [Some("GEN-3"), None, Some("x"), None, None, None, None],
        [Some("GEN-4"), None, Some("x"), None, Some("y"), None, None],
        [Some("GEN-5"), Some("12MW"), None, None, None, Some("derated"), None],
        [Some("GEN-6"), None, None, None, None, None, Some("planned")],
    ]
}

/// Frequency written for (day, hour); four decimals so rounding shows
pub fn frequency_at(day: u32, hour: u16) -> f64 {
    59.9 + day as f64 * 0.001 + hour as f64 * 0.0001 + 0.00004
}

pub fn demand_at(fixture: &MonthFixture, day: u32, hour: u16) -> f64 {
    fixture.demand_base + (day * 100) as f64 + hour as f64
}

/// Write a workbook at `path`
pub fn write_month(path: &Path, fixture: &MonthFixture) -> anyhow::Result<()> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("DAILY")?;
    sheet.write_string(0, 0, "PALAWAN GRID HOURLY REPORT")?;
    sheet.write_string(1, 2, "0000H")?;
    for day in 1..=31u32 {
        sheet.write_number(1 + day, 1, day as f64)?;
        sheet.write_number(33 + day, 1, day as f64)?;
        if day > fixture.days {
            continue;
        }
        for hour in 0..24u16 {
            sheet.write_number(1 + day, 2 + hour, frequency_at(day, hour))?;
            let demand = if day == 1 && fixture.zero_demand_hours.contains(&hour) {
                0.0
            } else {
                demand_at(fixture, day, hour)
            };
            sheet.write_number(33 + day, 2 + hour, demand)?;
        }
    }
    // Keeps the used range past both blocks when later days are blank
    sheet.write_string(65, 26, "END")?;

    if let Some(rows) = &fixture.log {
        let log = workbook.add_worksheet();
        log.set_name(GEN_SWITCHING_LOGS)?;
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if let Some(value) = value {
                    log.write_string(r as u32, c as u16, *value)?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

/// Write a workbook and stamp its modification time `age_secs` in the past
pub fn write_month_aged(
    dir: &Path,
    name: &str,
    fixture: &MonthFixture,
    age_secs: u64,
) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    write_month(&path, fixture)?;
    set_age(&path, age_secs)?;
    Ok(path)
}

pub fn set_age(path: &Path, age_secs: u64) -> anyhow::Result<()> {
    let when = SystemTime::now() - Duration::from_secs(age_secs);
    File::options().write(true).open(path)?.set_modified(when)?;
    Ok(())
}
