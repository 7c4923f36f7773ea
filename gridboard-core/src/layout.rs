//! Template layout descriptor
//!
//! The monthly workbook is an unstructured sheet; the readings live at fixed
//! offsets. Those offsets are data, so a template change only means a new
//! layout in the configuration file.

use serde::{Deserialize, Serialize};

/// Number of hour columns in every table (`0000H` .. `2300H`)
pub const HOURS_PER_DAY: usize = 24;

/// Rows reserved per month, one per possible calendar day
pub const DAYS_PER_TABLE: usize = 31;

/// Name of the switching log sheet in the current template
pub const GEN_SWITCHING_LOGS: &str = "GEN SWITCHING LOGS";

/// Positions of the reading blocks and the switching log (all 0-based)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// Template revision this descriptor matches
    pub version: u32,
    /// Sheet holding the readings; `None` means the first sheet
    pub data_sheet: Option<String>,
    /// First row of the frequency block
    pub frequency_row: u32,
    /// First row of the demand block
    pub demand_row: u32,
    /// Rows per block
    pub rows: usize,
    /// First hour column shared by both blocks
    pub first_column: u32,
    /// Columns per block
    pub columns: usize,
    /// Sheet holding the generator switching log
    pub log_sheet: String,
    /// Column holding the unit name in the log
    pub unit_column: u32,
    /// Columns whose joint emptiness marks a unit online
    pub flag_columns: Vec<u32>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::v1()
    }
}

impl SheetLayout {
    /// First PCC template revision: frequency C3:Z33, demand C35:Z65
    pub fn v1() -> Self {
        Self {
            version: 1,
            data_sheet: None,
            frequency_row: 2,
            demand_row: 34,
            rows: DAYS_PER_TABLE,
            first_column: 2,
            columns: HOURS_PER_DAY,
            log_sheet: GEN_SWITCHING_LOGS.to_string(),
            unit_column: 0,
            flag_columns: vec![3, 4, 6],
        }
    }

    /// Inclusive last column of both blocks, `None` past the sheet address space
    pub fn last_column(&self) -> Option<u32> {
        band_end(self.first_column, self.columns)
    }

    /// Inclusive last row of the lower block, `None` past the sheet address space
    pub fn last_row(&self) -> Option<u32> {
        band_end(self.frequency_row.max(self.demand_row), self.rows)
    }

    /// Rows and columns a data sheet must span to hold both blocks
    pub fn extent(&self) -> Option<(u32, u32)> {
        let rows = self.last_row()?.checked_add(1)?;
        let cols = self.last_column()?.checked_add(1)?;
        Some((rows, cols))
    }

    /// Check the descriptor is usable before any workbook is touched
    pub fn validate(&self) -> Result<(), String> {
        if self.columns != HOURS_PER_DAY {
            return Err(format!(
                "layout v{} has {} hour columns, expected {}",
                self.version, self.columns, HOURS_PER_DAY
            ));
        }
        if self.rows != DAYS_PER_TABLE {
            return Err(format!(
                "layout v{} has {} day rows, expected {}",
                self.version, self.rows, DAYS_PER_TABLE
            ));
        }
        if self.extent().is_none() {
            return Err(format!(
                "layout v{} places its blocks past the last addressable cell",
                self.version
            ));
        }
        let (upper, lower) = if self.frequency_row <= self.demand_row {
            (self.frequency_row, self.demand_row)
        } else {
            (self.demand_row, self.frequency_row)
        };
        // extent() bounds the lower block, so the upper one cannot overflow
        if upper + self.rows as u32 > lower {
            return Err(format!(
                "layout v{}: frequency and demand blocks overlap",
                self.version
            ));
        }
        if self.flag_columns.is_empty() {
            return Err(format!("layout v{} has no flag columns", self.version));
        }
        if self.log_sheet.trim().is_empty() {
            return Err(format!("layout v{} has an empty log sheet name", self.version));
        }
        Ok(())
    }
}

fn band_end(start: u32, len: usize) -> Option<u32> {
    let span = u32::try_from(len).ok()?.checked_sub(1)?;
    start.checked_add(span)
}
