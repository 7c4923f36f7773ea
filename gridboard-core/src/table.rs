//! Hourly reading tables

use crate::error::{DashboardError, DashboardResult};
use crate::layout::HOURS_PER_DAY;
use crate::reader::CellValue;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Column labels `0000H` .. `2300H`
pub fn hour_labels() -> &'static [String] {
    static LABELS: OnceLock<Vec<String>> = OnceLock::new();
    LABELS.get_or_init(|| (0..HOURS_PER_DAY).map(|h| format!("{:02}00H", h)).collect())
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    (value * 100.0).round() / 100.0
}

/// How a raw zero reading is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroPolicy {
    /// Zero means "no reading yet" and becomes `Reading::Missing`
    #[default]
    Missing,
    /// Zero is a legitimate reading
    Valid,
}

/// A single table cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reading {
    Value(f64),
    Text(String),
    Missing,
}

impl Reading {
    /// Convert a raw sheet cell: numbers are rounded, anything else passes
    /// through as text
    pub fn from_cell(cell: &CellValue, zeros: ZeroPolicy) -> Self {
        match cell {
            CellValue::Number(n) if n.is_nan() => Reading::Missing,
            CellValue::Number(n) => {
                let rounded = round2(*n);
                if zeros == ZeroPolicy::Missing && rounded == 0.0 {
                    Reading::Missing
                } else {
                    Reading::Value(rounded)
                }
            }
            other if other.is_empty() => Reading::Missing,
            other => Reading::Text(other.to_display_string()),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Reading::Missing)
    }

    pub fn as_value(&self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(*v),
            _ => None,
        }
    }
}

/// A 31 x 24 grid of readings, one row per day of the month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyTable {
    rows: Vec<Vec<Reading>>,
}

impl HourlyTable {
    /// Build a table; every row must hold exactly 24 readings
    pub fn new(rows: Vec<Vec<Reading>>) -> DashboardResult<Self> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != HOURS_PER_DAY)
        {
            return Err(DashboardError::Internal(format!(
                "table row {} has {} columns, expected {}",
                idx + 1,
                row.len(),
                HOURS_PER_DAY
            )));
        }
        Ok(Self { rows })
    }

    pub fn columns(&self) -> &'static [String] {
        hour_labels()
    }

    pub fn rows(&self) -> &[Vec<Reading>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Readings for a calendar day (1-based)
    pub fn day(&self, day: u32) -> DashboardResult<&[Reading]> {
        let out_of_range = DashboardError::DayOutOfRange {
            day,
            rows: self.rows.len(),
        };
        if day == 0 {
            return Err(out_of_range);
        }
        self.rows
            .get(day as usize - 1)
            .map(Vec::as_slice)
            .ok_or(out_of_range)
    }
}
