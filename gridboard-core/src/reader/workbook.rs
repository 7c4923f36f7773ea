//! Workbook data structures

use std::collections::HashMap;
use std::path::PathBuf;

/// Represents a complete workbook
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub path: PathBuf,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Get the first sheet in workbook order
    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    /// Get all sheet names
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Represents a worksheet as an untyped grid addressed by absolute
/// (row, col), 0-based. No header row is assumed.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    pub cells: HashMap<(u32, u32), Cell>,
    pub used_range: Option<(u32, u32)>, // (rows, cols)
}

static EMPTY: CellValue = CellValue::Empty;

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: HashMap::new(),
            used_range: None,
        }
    }

    /// Build a sheet from row-major values; `None` leaves the cell empty
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Option<CellValue>>>) -> Self {
        let mut sheet = Sheet::new(name);
        for (r, row) in rows.into_iter().enumerate() {
            for (c, value) in row.into_iter().enumerate() {
                if let Some(value) = value {
                    sheet.set(r as u32, c as u32, value);
                }
            }
        }
        sheet
    }

    /// Store a value and grow the used range to cover it
    pub fn set(&mut self, row: u32, col: u32, value: CellValue) {
        let (rows, cols) = self.used_range.unwrap_or((0, 0));
        self.used_range = Some((rows.max(row + 1), cols.max(col + 1)));
        self.cells.insert((row, col), Cell { row, col, value });
    }

    /// Get a cell at the given position
    pub fn get_cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Value at the given position, `Empty` when nothing is stored there
    pub fn value(&self, row: u32, col: u32) -> &CellValue {
        self.get_cell(row, col).map(|c| &c.value).unwrap_or(&EMPTY)
    }

    /// Number of rows covered by the used range
    pub fn height(&self) -> u32 {
        self.used_range.map(|(rows, _)| rows).unwrap_or(0)
    }

    /// Number of columns covered by the used range
    pub fn width(&self) -> u32 {
        self.used_range.map(|(_, cols)| cols).unwrap_or(0)
    }
}

/// Represents a single cell
#[derive(Debug, Clone)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
    pub value: CellValue,
}

/// Cell value types
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    Error(String),
}

impl CellValue {
    /// Check if the cell is empty. Zero-length text counts as empty, the way
    /// a spreadsheet shows it.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Get the numeric value if this is a number cell
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Render the cell the way it reads in the sheet
    pub fn to_display_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Error(e) => e.clone(),
        }
    }
}
