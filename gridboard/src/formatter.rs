//! Output formatters for dashboard snapshots

use crate::View;
use anyhow::Result;
use colored::*;
use gridboard_core::{
    CurrentDayView, DashboardError, DashboardSnapshot, HourlyTable, MonthPanels, Reading,
    hour_labels,
};
use serde_json::{Value, json};

const CELL_WIDTH: usize = 8;
/// Hours per printed line in the day view
const HOURS_PER_LINE: usize = 12;

/// Print a snapshot in human-readable format with colors
pub fn print_human(snapshot: &DashboardSnapshot, view: View) {
    println!("{}", "IGSOD PCC Dashboard".bold());
    println!(
        "{} {}",
        snapshot.date.format("%Y-%m-%d").to_string().cyan().bold(),
        format!("(as of {})", snapshot.now.format("%H:%M %Z")).bright_black()
    );

    let panels = match &snapshot.panels {
        Ok(panels) => panels,
        Err(e) => {
            print_unavailable(&snapshot.month, e);
            return;
        }
    };
    println!("{} {}", "Source:".bold(), panels.data.file.file_name);
    println!();

    if view.shows(View::Units) {
        print_units(panels);
    }
    if view.shows(View::Today) {
        print_today(snapshot, panels);
    }
    if view.shows(View::Month) {
        print_month(snapshot, panels);
    }
}

fn print_unavailable(month: &str, error: &DashboardError) {
    if error.is_not_found() {
        println!("{} No Excel file found for {}", "WARN".yellow().bold(), month);
    } else {
        println!("{} {}", "ERROR".red().bold(), error);
    }
}

fn print_units(panels: &MonthPanels) {
    println!("{}", "Online Units".bold().underline());
    match panels.online_units() {
        Ok(units) if units.is_empty() => println!("  {}", "(none)".bright_black()),
        Ok(units) => {
            for unit in units.iter() {
                println!("  {}", unit.green());
            }
        }
        Err(e) => println!("  {} {}", "WARN".yellow().bold(), e),
    }
    println!();
}

fn print_today(snapshot: &DashboardSnapshot, panels: &MonthPanels) {
    let date = snapshot.date.format("%Y-%m-%d");
    let today = match &panels.today {
        Ok(today) => today,
        Err(e) => {
            println!("{} {}", "ERROR".red().bold(), e);
            println!();
            return;
        }
    };

    println!("{}", format!("Demand (MW) - {}", date).bold().underline());
    print_series("Today", &today.demand_masked, today.latest_demand_hour);
    print_previous(today);

    println!("{}", format!("Frequency (Hz) - {}", date).bold().underline());
    print_series("Today", &today.record.frequency, today.latest_frequency_hour);
}

fn print_previous(today: &CurrentDayView) {
    match &today.record.previous_demand {
        Ok(previous) => print_series("Previous", previous, None),
        Err(e) => println!("  {} {}\n", "WARN".yellow().bold(), e),
    }
}

/// Print a 24-hour series as label/value line pairs, highlighting the
/// latest reading
fn print_series(title: &str, series: &[Reading], latest: Option<usize>) {
    println!("  {}", title.bright_black());
    let labels = hour_labels();
    for start in (0..series.len()).step_by(HOURS_PER_LINE) {
        let end = (start + HOURS_PER_LINE).min(series.len());

        let header: String = labels[start..end]
            .iter()
            .map(|l| format!("{:>width$}", l, width = CELL_WIDTH))
            .collect();
        println!("  {}", header.bright_black());

        let values: String = (start..end)
            .map(|hour| {
                let cell = format!("{:>width$}", reading_text(&series[hour]), width = CELL_WIDTH);
                if Some(hour) == latest {
                    cell.green().bold().to_string()
                } else {
                    cell
                }
            })
            .collect();
        println!("  {}", values);
    }
    println!();
}

fn print_month(snapshot: &DashboardSnapshot, panels: &MonthPanels) {
    let tables = &panels.data.tables;
    println!(
        "{}",
        format!("Full Month - {} - Demand", snapshot.month)
            .bold()
            .underline()
    );
    print_table(&tables.demand);
    println!(
        "{}",
        format!("Full Month - {} - Frequency", snapshot.month)
            .bold()
            .underline()
    );
    print_table(&tables.frequency);
}

fn print_table(table: &HourlyTable) {
    let header: String = table
        .columns()
        .iter()
        .map(|l| format!("{:>width$}", l, width = CELL_WIDTH))
        .collect();
    println!("{:>4}{}", "Day".bright_black(), header.bright_black());

    for (idx, row) in table.rows().iter().enumerate() {
        let cells: String = row
            .iter()
            .map(|r| format!("{:>width$}", reading_text(r), width = CELL_WIDTH))
            .collect();
        println!("{:>4}{}", idx + 1, cells);
    }
    println!();
}

fn reading_text(reading: &Reading) -> String {
    match reading {
        Reading::Value(v) => format!("{:.2}", v),
        Reading::Text(s) => s.clone(),
        Reading::Missing => "-".to_string(),
    }
}

/// Print a snapshot in JSON format
pub fn print_json(snapshot: &DashboardSnapshot, view: View) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&snapshot_json(snapshot, view))?);
    Ok(())
}

fn snapshot_json(snapshot: &DashboardSnapshot, view: View) -> Value {
    let mut output = json!({
        "date": snapshot.date.to_string(),
        "month": snapshot.month,
        "now": snapshot.now.to_rfc3339(),
    });

    let panels = match &snapshot.panels {
        Ok(panels) => panels,
        Err(e) => {
            output["error"] = error_json(e);
            return output;
        }
    };
    output["file"] = json!(panels.data.file.file_name);

    if view.shows(View::Units) {
        output["online_units"] = match panels.online_units() {
            Ok(units) => json!(units),
            Err(e) => error_json(e),
        };
    }

    if view.shows(View::Today) {
        output["today"] = match &panels.today {
            Ok(today) => json!({
                "demand": today.demand_masked,
                "frequency": today.record.frequency,
                "latest_demand_hour": today.latest_demand_hour,
                "latest_frequency_hour": today.latest_frequency_hour,
                "previous_date": today.record.previous_date.to_string(),
                "previous_demand": match &today.record.previous_demand {
                    Ok(previous) => json!(previous),
                    Err(e) => error_json(e),
                },
            }),
            Err(e) => error_json(e),
        };
    }

    if view.shows(View::Month) {
        let tables = &panels.data.tables;
        output["month_tables"] = json!({
            "columns": hour_labels(),
            "demand": tables.demand.rows(),
            "frequency": tables.frequency.rows(),
        });
    }

    output
}

fn error_json(error: &DashboardError) -> Value {
    let kind = match error {
        DashboardError::NotFound { .. } => "not_found",
        DashboardError::MalformedSheet { .. } => "malformed_sheet",
        DashboardError::PreviousDayUnavailable { .. } => "previous_day_unavailable",
        DashboardError::DayOutOfRange { .. } => "day_out_of_range",
        DashboardError::Io { .. } => "io",
        DashboardError::Workbook { .. } => "workbook",
        DashboardError::Config(_) => "config",
        DashboardError::Internal(_) => "internal",
    };
    json!({ "error": kind, "message": error.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use gridboard_core::{DayRecord, MonthData, MonthTables, MonthlyFile, OnlineUnitList};
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::SystemTime;

    fn snapshot(previous: Result<Vec<Reading>, DashboardError>) -> DashboardSnapshot {
        let table = HourlyTable::new(vec![vec![Reading::Value(60.0); 24]; 31]).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut demand = vec![Reading::Value(42.0); 24];
        demand[10..].fill(Reading::Missing);
        let data = MonthData {
            file: MonthlyFile {
                file_name: "March.xlsx".into(),
                path: PathBuf::from("March.xlsx"),
                modified: SystemTime::UNIX_EPOCH,
            },
            tables: MonthTables {
                frequency: table.clone(),
                demand: table,
            },
            online_units: Ok(OnlineUnitList(vec!["GEN-1".into()])),
        };
        DashboardSnapshot {
            now: chrono_tz::Asia::Manila
                .with_ymd_and_hms(2024, 3, 1, 9, 30, 0)
                .unwrap(),
            date,
            month: "March".into(),
            panels: Ok(MonthPanels {
                data: Arc::new(data),
                today: Ok(CurrentDayView {
                    record: DayRecord {
                        date,
                        frequency: vec![Reading::Value(60.0); 24],
                        demand: demand.clone(),
                        previous_date: date.pred_opt().unwrap(),
                        previous_demand: previous,
                    },
                    demand_masked: demand,
                    latest_demand_hour: Some(9),
                    latest_frequency_hour: Some(23),
                }),
            }),
        }
    }

    #[test]
    fn test_json_panels() {
        let unavailable = DashboardError::PreviousDayUnavailable {
            date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            source: Box::new(DashboardError::NotFound {
                month: "February".into(),
                dir: PathBuf::from("."),
            }),
        };
        let output = snapshot_json(&snapshot(Err(unavailable)), View::All);

        assert_eq!(output["file"], "March.xlsx");
        assert_eq!(output["online_units"], json!(["GEN-1"]));
        assert_eq!(output["today"]["demand"][9], 42.0);
        assert!(output["today"]["demand"][10].is_null());
        assert_eq!(output["today"]["latest_demand_hour"], 9);
        assert_eq!(
            output["today"]["previous_demand"]["error"],
            "previous_day_unavailable"
        );
        assert_eq!(output["month_tables"]["columns"][23], "2300H");
        assert_eq!(output["month_tables"]["demand"].as_array().unwrap().len(), 31);
    }

    #[test]
    fn test_json_view_filter() {
        let output = snapshot_json(&snapshot(Ok(vec![Reading::Value(1.0); 24])), View::Units);
        assert!(output.get("online_units").is_some());
        assert!(output.get("today").is_none());
        assert!(output.get("month_tables").is_none());
    }

    #[test]
    fn test_json_missing_month() {
        let snapshot = DashboardSnapshot {
            panels: Err(DashboardError::NotFound {
                month: "March".into(),
                dir: PathBuf::from("."),
            }),
            ..snapshot(Ok(Vec::new()))
        };
        let output = snapshot_json(&snapshot, View::All);
        assert_eq!(output["error"]["error"], "not_found");
        assert!(output.get("file").is_none());
    }

    #[test]
    fn test_reading_text() {
        assert_eq!(reading_text(&Reading::Value(59.9)), "59.90");
        assert_eq!(reading_text(&Reading::Missing), "-");
        assert_eq!(reading_text(&Reading::Text("TRIP".into())), "TRIP");
    }

    #[test]
    fn test_error_kinds() {
        let internal = DashboardError::Internal("table row 1 has 23 columns, expected 24".into());
        assert_eq!(error_json(&internal)["error"], "internal");
        assert_eq!(error_json(&DashboardError::Config("bad".into()))["error"], "config");
    }
}
