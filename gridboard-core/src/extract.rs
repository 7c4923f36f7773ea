//! Fixed-offset extraction of reading tables and the online unit list

use crate::error::{DashboardError, DashboardResult};
use crate::layout::SheetLayout;
use crate::reader::{self, Sheet, Workbook};
use crate::resolver::MonthlyFile;
use crate::table::{HourlyTable, Reading, ZeroPolicy};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Frequency and demand tables of one month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTables {
    pub frequency: HourlyTable,
    pub demand: HourlyTable,
}

/// Units currently online, in switching-log order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OnlineUnitList(pub Vec<String>);

impl OnlineUnitList {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Slices the template's fixed bands out of a monthly workbook
#[derive(Debug, Clone, Default)]
pub struct SheetExtractor {
    layout: SheetLayout,
    zeros: ZeroPolicy,
}

impl SheetExtractor {
    pub fn new(layout: SheetLayout, zeros: ZeroPolicy) -> Self {
        Self { layout, zeros }
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    pub fn zero_policy(&self) -> ZeroPolicy {
        self.zeros
    }

    /// Read the frequency and demand tables from a monthly file
    pub fn extract_tables(&self, file: &MonthlyFile) -> DashboardResult<MonthTables> {
        let workbook = reader::read_workbook(&file.path)?;
        self.tables_from_workbook(&workbook)
    }

    /// Read the online unit list from a monthly file
    pub fn extract_online_units(&self, file: &MonthlyFile) -> DashboardResult<OnlineUnitList> {
        let workbook = reader::read_workbook(&file.path)?;
        self.online_units_from_workbook(&workbook)
    }

    pub fn tables_from_workbook(&self, workbook: &Workbook) -> DashboardResult<MonthTables> {
        let sheet = match &self.layout.data_sheet {
            Some(name) => workbook.get_sheet(name).ok_or_else(|| {
                DashboardError::malformed(&workbook.path, format!("sheet '{}' not found", name))
            })?,
            None => workbook
                .first_sheet()
                .ok_or_else(|| DashboardError::malformed(&workbook.path, "workbook has no sheets"))?,
        };
        self.tables_from_sheet(sheet, &workbook.path)
    }

    /// Slice both blocks out of the data sheet
    pub fn tables_from_sheet(&self, sheet: &Sheet, path: &Path) -> DashboardResult<MonthTables> {
        let layout = &self.layout;
        let (need_rows, need_cols) = layout.extent().ok_or_else(|| {
            DashboardError::malformed(
                path,
                format!("layout v{} lies past the last addressable cell", layout.version),
            )
        })?;

        if sheet.height() < need_rows || sheet.width() < need_cols {
            return Err(DashboardError::malformed(
                path,
                format!(
                    "sheet '{}' spans {}x{} cells, layout v{} needs {}x{}",
                    sheet.name,
                    sheet.height(),
                    sheet.width(),
                    layout.version,
                    need_rows,
                    need_cols
                ),
            ));
        }

        let frequency = self.block(sheet, layout.frequency_row, need_cols)?;
        let demand = self.block(sheet, layout.demand_row, need_cols)?;

        debug!(sheet = %sheet.name, rows = layout.rows, "extracted reading tables");

        Ok(MonthTables { frequency, demand })
    }

    /// `end_col` comes from `SheetLayout::extent`, which also bounds every block row
    fn block(&self, sheet: &Sheet, first_row: u32, end_col: u32) -> DashboardResult<HourlyTable> {
        let layout = &self.layout;
        let rows = (first_row..first_row + layout.rows as u32)
            .map(|row| {
                (layout.first_column..end_col)
                    .map(|col| Reading::from_cell(sheet.value(row, col), self.zeros))
                    .collect::<Vec<_>>()
            })
            .collect();
        HourlyTable::new(rows)
    }

    pub fn online_units_from_workbook(&self, workbook: &Workbook) -> DashboardResult<OnlineUnitList> {
        let sheet = workbook.get_sheet(&self.layout.log_sheet).ok_or_else(|| {
            DashboardError::malformed(
                &workbook.path,
                format!("sheet '{}' not found", self.layout.log_sheet),
            )
        })?;
        Ok(self.online_units_from_sheet(sheet))
    }

    /// A log row marks a unit online when every flag column is empty.
    /// Rows without a unit name are blank log lines and are skipped.
    pub fn online_units_from_sheet(&self, sheet: &Sheet) -> OnlineUnitList {
        let layout = &self.layout;
        let units = (0..sheet.height())
            .filter(|&row| {
                layout
                    .flag_columns
                    .iter()
                    .all(|&col| sheet.value(row, col).is_empty())
            })
            .map(|row| sheet.value(row, layout.unit_column))
            .filter(|name| !name.is_empty())
            .map(|name| name.to_display_string())
            .collect::<Vec<_>>();

        debug!(sheet = %sheet.name, online = units.len(), "derived online units");

        OnlineUnitList(units)
    }
}
