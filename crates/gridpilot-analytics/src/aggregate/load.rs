//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "System demand and load forecast summaries."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use serde::Serialize;

use super::{extremes, mean};
use crate::{
    errors::{AnalyticsError, Result},
    model::{LoadForecastRecord, LoadRecord},
    series::{Table, Timestamp},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemandSummary {
    pub current_demand_mw: f64,
    pub interval_start: Timestamp,
    pub interval_end: Timestamp,
    pub data_points: usize,
    pub min_demand_mw: f64,
    pub max_demand_mw: f64,
    pub avg_demand_mw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub interval_start: Timestamp,
    pub interval_end: Timestamp,
    pub load_forecast_mw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadForecastSummary {
    pub forecasts: Vec<ForecastPoint>,
    pub peak_forecast_mw: f64,
    pub min_forecast_mw: f64,
    pub avg_forecast_mw: f64,
    pub data_points: usize,
}

/// Rows for the system-wide TAC area, or every row when none carry it.
pub fn total_area_load(table: &Table<LoadRecord>, area: &str) -> Table<LoadRecord> {
    table.filter_or_all(|row| row.tac_area.as_deref() == Some(area))
}

/// Forecast rows for the system-wide TAC area, or every row when none carry it.
pub fn total_area_forecast(table: &Table<LoadForecastRecord>, area: &str) -> Table<LoadForecastRecord> {
    table.filter_or_all(|row| row.tac_area.as_deref() == Some(area))
}

pub fn summarize_demand(table: &Table<LoadRecord>) -> Result<DemandSummary> {
    let rows = table.require_rows()?;
    let latest = table
        .last()
        .ok_or_else(|| AnalyticsError::empty(table.name()))?;
    let (min, max) = extremes(rows.iter().map(|r| r.load))
        .ok_or_else(|| AnalyticsError::empty(table.name()))?;
    let avg = mean(rows.iter().map(|r| r.load)).unwrap_or(0.0);

    Ok(DemandSummary {
        current_demand_mw: latest.load,
        interval_start: latest.interval_start,
        interval_end: latest.interval_end,
        data_points: rows.len(),
        min_demand_mw: min,
        max_demand_mw: max,
        avg_demand_mw: avg,
    })
}

/// Summarise a forecast restricted to `area` (falling back to all rows).
pub fn summarize_load_forecast(
    table: &Table<LoadForecastRecord>,
    area: &str,
) -> Result<LoadForecastSummary> {
    table.require_rows()?;
    let total = total_area_forecast(table, area);
    let rows = total.rows();
    let (min, max) = extremes(rows.iter().map(|r| r.load_forecast))
        .ok_or_else(|| AnalyticsError::empty(table.name()))?;

    Ok(LoadForecastSummary {
        forecasts: rows
            .iter()
            .map(|r| ForecastPoint {
                interval_start: r.interval_start,
                interval_end: r.interval_end,
                load_forecast_mw: r.load_forecast,
            })
            .collect(),
        peak_forecast_mw: max,
        min_forecast_mw: min,
        avg_forecast_mw: mean(rows.iter().map(|r| r.load_forecast)).unwrap_or(0.0),
        data_points: rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::test_support::{at_hour, plus_hour};

    fn forecast(hour: u32, area: &str, mw: f64) -> LoadForecastRecord {
        LoadForecastRecord {
            interval_start: at_hour(hour),
            interval_end: plus_hour(at_hour(hour)),
            tac_area: Some(area.into()),
            load_forecast: mw,
        }
    }

    #[test]
    fn forecast_is_restricted_to_total_area() {
        let table = Table::new(
            "load_forecast",
            vec![
                forecast(0, "CA ISO-TAC", 22000.0),
                forecast(0, "PGE-TAC", 9000.0),
                forecast(1, "CA ISO-TAC", 21000.0),
                forecast(1, "PGE-TAC", 8500.0),
            ],
        );
        let summary = summarize_load_forecast(&table, "CA ISO-TAC").unwrap();
        assert_eq!(summary.data_points, 2);
        assert_eq!(summary.peak_forecast_mw, 22000.0);
        assert_eq!(summary.min_forecast_mw, 21000.0);
        assert_eq!(summary.avg_forecast_mw, 21500.0);
    }

    #[test]
    fn forecast_falls_back_to_every_row() {
        let table = Table::new(
            "load_forecast",
            vec![forecast(0, "PGE-TAC", 9000.0), forecast(0, "SCE-TAC", 11000.0)],
        );
        let summary = summarize_load_forecast(&table, "CA ISO-TAC").unwrap();
        assert_eq!(summary.data_points, 2);
        assert_eq!(summary.peak_forecast_mw, 11000.0);
    }

    #[test]
    fn demand_reports_latest_and_window_stats() {
        let table = Table::new(
            "load",
            [25000.0, 27000.0, 26000.0]
                .iter()
                .enumerate()
                .map(|(h, mw)| LoadRecord {
                    interval_start: at_hour(17 + h as u32),
                    interval_end: plus_hour(at_hour(17 + h as u32)),
                    tac_area: None,
                    load: *mw,
                })
                .collect(),
        );
        let summary = summarize_demand(&table).unwrap();
        assert_eq!(summary.current_demand_mw, 26000.0);
        assert_eq!(summary.max_demand_mw, 27000.0);
        assert_eq!(summary.min_demand_mw, 25000.0);
        assert_eq!(summary.avg_demand_mw, 26000.0);
        assert_eq!(summary.data_points, 3);
    }
}
