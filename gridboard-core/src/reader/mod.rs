//! Excel file reader using calamine

use crate::error::{DashboardError, DashboardResult};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use std::path::Path;
use tracing::debug;

pub mod workbook;

pub use workbook::{Cell, CellValue, Sheet, Workbook};

/// Read a workbook from a file path
pub fn read_workbook<P: AsRef<Path>>(path: P) -> DashboardResult<Workbook> {
    let path = path.as_ref();
    let mut excel: Sheets<_> =
        open_workbook_auto(path).map_err(|source| DashboardError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;

    let sheet_names = excel.sheet_names();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in &sheet_names {
        // Chart sheets and other non-grid sheets have no range; keep them
        // as empty sheets so names and order still line up
        let sheet = match excel.worksheet_range(sheet_name) {
            Ok(range) => parse_sheet(sheet_name, &range),
            Err(e) => {
                debug!(sheet = %sheet_name, error = %e, "sheet has no cell range");
                Sheet::new(sheet_name.as_str())
            }
        };
        sheets.push(sheet);
    }

    debug!(path = %path.display(), sheets = sheets.len(), "workbook read");

    Ok(Workbook {
        path: path.to_path_buf(),
        sheets,
    })
}

fn parse_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let mut sheet = Sheet::new(name);

    // calamine ranges start at the first used cell; shift back to absolute
    // sheet coordinates
    let (row_offset, col_offset) = match range.start() {
        Some(start) => start,
        None => return sheet,
    };

    for (rel_row, rel_col, data) in range.used_cells() {
        let value = parse_cell_value(data);
        if value.is_empty() {
            continue;
        }
        sheet.set(
            row_offset + rel_row as u32,
            col_offset + rel_col as u32,
            value,
        );
    }

    // Formatted but blank trailing cells still count towards the extent
    if let Some((end_row, end_col)) = range.end() {
        let (rows, cols) = sheet.used_range.unwrap_or((0, 0));
        sheet.used_range = Some((rows.max(end_row + 1), cols.max(end_col + 1)));
    }

    sheet
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_value() {
        assert_eq!(parse_cell_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(parse_cell_value(&Data::Float(59.98)), CellValue::Number(59.98));
        assert_eq!(
            parse_cell_value(&Data::String("GEN-1".into())),
            CellValue::Text("GEN-1".into())
        );
        assert_eq!(parse_cell_value(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn test_parse_sheet_keeps_absolute_positions() {
        let mut range: Range<Data> = Range::new((2, 3), (4, 5));
        range.set_value((2, 3), Data::Float(1.5));
        range.set_value((4, 5), Data::String("end".into()));

        let sheet = parse_sheet("Data", &range);
        assert_eq!(sheet.value(2, 3), &CellValue::Number(1.5));
        assert_eq!(sheet.value(4, 5), &CellValue::Text("end".into()));
        assert!(sheet.value(0, 0).is_empty());
        assert_eq!(sheet.used_range, Some((5, 6)));
    }

    #[test]
    fn test_missing_file_is_workbook_error() {
        let err = read_workbook("/nonexistent/June.xlsx").unwrap_err();
        assert!(matches!(err, DashboardError::Workbook { .. }));
    }
}
