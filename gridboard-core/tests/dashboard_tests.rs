mod common;

use chrono::NaiveDate;
use chrono_tz::Asia::Manila;
use common::{MonthFixture, write_month_aged};
use gridboard_core::{Dashboard, DashboardConfig, DashboardError, FixedClock, Reading};
use std::path::Path;
use tempfile::TempDir;

fn dashboard_at(dir: &Path, y: i32, m: u32, d: u32, hour: u32) -> Dashboard {
    let config = DashboardConfig {
        data_dir: dir.to_path_buf(),
        ..DashboardConfig::default()
    };
    let local = NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(hour, 30, 0)
        .unwrap();
    Dashboard::from_config(&config)
        .unwrap()
        .with_clock(Box::new(FixedClock::at_local(Manila, local).unwrap()))
}

#[test]
fn test_first_of_month_without_prior_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_month_aged(dir.path(), "March_2024.xlsx", &MonthFixture::default(), 60)?;

    let snapshot = dashboard_at(dir.path(), 2024, 3, 1, 9).render();
    assert_eq!(snapshot.month, "March");

    let panels = snapshot.panels?;
    assert_eq!(panels.online_units().map(|u| u.len()).ok(), Some(3));

    let today = panels.today?;
    assert_eq!(today.record.demand[0], Reading::Value(100.0));
    match &today.record.previous_demand {
        Err(DashboardError::PreviousDayUnavailable { date, .. }) => {
            assert_eq!(*date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        }
        other => panic!("expected PreviousDayUnavailable, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_first_of_month_reads_prior_file() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_month_aged(dir.path(), "March_2024.xlsx", &MonthFixture::default(), 60)?;
    let february = MonthFixture {
        demand_base: 40_000.0,
        days: 29,
        ..MonthFixture::default()
    };
    write_month_aged(dir.path(), "February_2024.xlsx", &february, 60)?;

    let snapshot = dashboard_at(dir.path(), 2024, 3, 1, 9).render();
    let today = snapshot.panels?.today?;
    let previous = today.record.previous_demand?;
    assert_eq!(previous[0], Reading::Value(42_900.0));
    assert_eq!(previous[23], Reading::Value(42_923.0));
    Ok(())
}

#[test]
fn test_mid_month_masks_future_hours() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_month_aged(dir.path(), "June.xlsx", &MonthFixture::default(), 60)?;

    let snapshot = dashboard_at(dir.path(), 2024, 6, 15, 9).render();
    let today = snapshot.panels?.today?;

    assert_eq!(today.record.previous_demand?[0], Reading::Value(1400.0));
    assert!(today.demand_masked[..=9].iter().all(|r| !r.is_missing()));
    assert!(today.demand_masked[10..].iter().all(Reading::is_missing));
    assert_eq!(today.latest_demand_hour, Some(9));
    assert_eq!(today.latest_frequency_hour, Some(23));
    // The raw record is never masked
    assert_eq!(today.record.demand[23], Reading::Value(1523.0));
    Ok(())
}

#[test]
fn test_past_date_is_not_masked() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_month_aged(dir.path(), "June.xlsx", &MonthFixture::default(), 60)?;

    let dashboard = dashboard_at(dir.path(), 2024, 6, 15, 9);
    let snapshot = dashboard.render_for(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
    let today = snapshot.panels?.today?;
    assert_eq!(today.demand_masked, today.record.demand);
    assert_eq!(today.latest_demand_hour, Some(23));
    Ok(())
}

#[test]
fn test_missing_month_is_an_absent_panel() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_month_aged(dir.path(), "May.xlsx", &MonthFixture::default(), 60)?;

    let snapshot = dashboard_at(dir.path(), 2024, 6, 15, 9).render();
    match snapshot.panels {
        Err(e) => assert!(e.is_not_found()),
        Ok(_) => panic!("June has no workbook"),
    }
    Ok(())
}

#[test]
fn test_missing_log_only_degrades_units_panel() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let fixture = MonthFixture {
        log: None,
        ..MonthFixture::default()
    };
    write_month_aged(dir.path(), "June.xlsx", &fixture, 60)?;

    let snapshot = dashboard_at(dir.path(), 2024, 6, 15, 9).render();
    let panels = snapshot.panels?;
    assert!(panels.online_units().is_err());
    assert!(panels.today.is_ok());
    Ok(())
}

#[test]
fn test_unaddressable_layout_is_rejected_before_render() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_month_aged(dir.path(), "June.xlsx", &MonthFixture::default(), 60)?;

    let mut config = DashboardConfig::from_toml("[layout]\ndemand_row = 4294967290")?;
    config.data_dir = dir.path().to_path_buf();
    match Dashboard::from_config(&config) {
        Err(DashboardError::Config(reason)) => assert!(reason.contains("addressable")),
        Err(other) => panic!("expected a configuration error, got {other:?}"),
        Ok(_) => panic!("layout past the sheet bounds was accepted"),
    }
    Ok(())
}
