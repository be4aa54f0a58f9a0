//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "File-backed market and weather data sources."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
//! JSON and JSONL fixture readers.
//!
//! Each dataset lives in `<dir>/<dataset>.json` (an array of rows) or
//! `<dir>/<dataset>.jsonl` (one row per line). A dataset with no file is an
//! empty table, which the tools report as `NoData`. Market-run variants carry
//! the run as a suffix, e.g. `lmp_day_ahead_hourly.json` or `as_prices_dam.json`.

use std::{
    fs,
    io::BufRead,
    path::{Path, PathBuf},
};

use chrono::{Days, NaiveDate};
use gridpilot_logging::{gp_debug, ToolLogContext};
use serde::de::DeserializeOwned;

use crate::{
    errors::{AnalyticsError, Result},
    model::{
        AsPriceRecord, CurtailmentRecord, FuelMixRecord, GridStatus, LmpRecord,
        LoadForecastRecord, LoadRecord, OutageRecord, RenewableRecord, ShadowPriceRecord,
        StorageRecord, TemperatureReading, TieFlowRecord,
    },
    query::{
        AsMarket, DataQuery, DateSelector, LmpMarket, LoadForecastType, RenewableForecastType,
        ShadowPriceMarket,
    },
    series::{Stamped, Table},
    source::{InMemoryWeather, MarketDataSource, WeatherSource},
};

pub const GRID_STATUS_FILE: &str = "grid_status.json";
pub const WEATHER_FILE: &str = "weather.json";

pub fn load_rows_from_json<R: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<R>> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| parse_failure(path, None, err))
}

pub fn load_rows_from_jsonl<R: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<R>> {
    let path = path.as_ref();
    let file = fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(serde_json::from_str(&line).map_err(|err| parse_failure(path, Some(index + 1), err))?);
    }
    Ok(rows)
}

fn parse_failure(path: &Path, line: Option<usize>, err: serde_json::Error) -> AnalyticsError {
    match line {
        Some(line) => AnalyticsError::Source(format!("{}:{line}: {err}", path.display())),
        None => AnalyticsError::Source(format!("{}: {err}", path.display())),
    }
}

/// Reads market datasets from a fixture directory.
#[derive(Debug, Clone)]
pub struct FileMarketDataSource {
    root: PathBuf,
}

impl FileMarketDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_dataset<R: DeserializeOwned>(&self, dataset: &str) -> Result<Vec<R>> {
        let json = self.root.join(format!("{dataset}.json"));
        let jsonl = self.root.join(format!("{dataset}.jsonl"));
        let rows = if json.is_file() {
            load_rows_from_json(&json)?
        } else if jsonl.is_file() {
            load_rows_from_jsonl(&jsonl)?
        } else {
            gp_debug!(
                context = ToolLogContext::new().with_series(dataset),
                "no fixture file for dataset under {}",
                self.root.display()
            );
            Vec::new()
        };
        Ok(rows)
    }

    fn stamped<R: DeserializeOwned + Stamped>(
        &self,
        dataset: &str,
        table: &str,
        query: &DataQuery,
    ) -> Result<Table<R>> {
        let rows = self.read_dataset(dataset)?;
        Ok(Table::new(table, select_dates(rows, query)))
    }
}

/// Keep the rows whose local start date falls in the queried range.
///
/// `latest` and `today` resolve to the most recent date present; an explicit
/// date selects `[date, end)` with `end` defaulting to the following day.
pub fn select_dates<R: Stamped>(rows: Vec<R>, query: &DataQuery) -> Vec<R> {
    let local_date = |row: &R| row.interval_start().date_naive();
    let from = match query.date {
        DateSelector::Date(date) => date,
        DateSelector::Latest | DateSelector::Today => match rows.iter().map(local_date).max() {
            Some(date) => date,
            None => return rows,
        },
    };
    let until = match (query.date, query.end) {
        (DateSelector::Date(_), Some(end)) => end,
        _ => next_day(from),
    };
    rows.into_iter()
        .filter(|row| {
            let date = local_date(row);
            date >= from && date < until
        })
        .collect()
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX)
}

impl MarketDataSource for FileMarketDataSource {
    fn load(&self, query: &DataQuery) -> Result<Table<LoadRecord>> {
        self.stamped("load", "load", query)
    }

    fn load_hourly(&self, query: &DataQuery) -> Result<Table<LoadRecord>> {
        self.stamped("load_hourly", "load_hourly", query)
    }

    fn load_forecast(
        &self,
        query: &DataQuery,
        forecast_type: LoadForecastType,
    ) -> Result<Table<LoadForecastRecord>> {
        self.stamped(&format!("load_forecast_{forecast_type}"), "load_forecast", query)
    }

    fn fuel_mix(&self, query: &DataQuery) -> Result<Table<FuelMixRecord>> {
        self.stamped("fuel_mix", "fuel_mix", query)
    }

    fn renewables(
        &self,
        query: &DataQuery,
        forecast_type: RenewableForecastType,
    ) -> Result<Table<RenewableRecord>> {
        self.stamped(&format!("renewables_{forecast_type}"), "renewables", query)
    }

    fn storage(&self, query: &DataQuery) -> Result<Table<StorageRecord>> {
        self.stamped("storage", "storage", query)
    }

    fn curtailment(&self, query: &DataQuery) -> Result<Table<CurtailmentRecord>> {
        self.stamped("curtailment", "curtailment", query)
    }

    fn tie_flows(&self, query: &DataQuery) -> Result<Table<TieFlowRecord>> {
        self.stamped("tie_flows", "tie_flows", query)
    }

    fn as_prices(&self, query: &DataQuery, market: AsMarket) -> Result<Table<AsPriceRecord>> {
        let dataset = format!("as_prices_{}", market.as_ref().to_ascii_lowercase());
        self.stamped(&dataset, "as_prices", query)
    }

    fn shadow_prices(
        &self,
        query: &DataQuery,
        market: ShadowPriceMarket,
    ) -> Result<Table<ShadowPriceRecord>> {
        let dataset = format!("shadow_prices_{}", market.as_ref().to_ascii_lowercase());
        self.stamped(&dataset, "shadow_prices", query)
    }

    fn outages(&self, report_date: NaiveDate) -> Result<Table<OutageRecord>> {
        let rows: Vec<OutageRecord> = self.read_dataset("outages")?;
        let rows = rows
            .into_iter()
            .filter(|row| row.report_date == report_date)
            .collect();
        Ok(Table::new("outages", rows))
    }

    fn grid_status(&self) -> Result<GridStatus> {
        let path = self.root.join(GRID_STATUS_FILE);
        if !path.is_file() {
            return Err(AnalyticsError::empty("grid_status"));
        }
        let data = fs::read_to_string(&path)?;
        serde_json::from_str(&data).map_err(|err| parse_failure(&path, None, err))
    }

    fn lmp(
        &self,
        query: &DataQuery,
        market: LmpMarket,
        locations: &[String],
    ) -> Result<Table<LmpRecord>> {
        let dataset = format!("lmp_{}", market.as_ref().to_ascii_lowercase());
        let rows: Vec<LmpRecord> = self.read_dataset(&dataset)?;
        let rows = rows
            .into_iter()
            .filter(|row| locations.iter().any(|loc| loc == &row.location))
            .collect();
        Ok(Table::new("lmp", select_dates(rows, query)))
    }
}

/// Reads hourly temperatures from `weather.json` in a fixture directory.
#[derive(Debug, Clone)]
pub struct FileWeatherSource {
    root: PathBuf,
}

impl FileWeatherSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl WeatherSource for FileWeatherSource {
    fn hourly_temperature(
        &self,
        location: &str,
        date: NaiveDate,
    ) -> Result<Vec<TemperatureReading>> {
        let path = self.root.join(WEATHER_FILE);
        if !path.is_file() {
            return Ok(Vec::new());
        }
        let readings = load_rows_from_json(&path)?;
        InMemoryWeather { readings }.hourly_temperature(location, date)
    }
}
