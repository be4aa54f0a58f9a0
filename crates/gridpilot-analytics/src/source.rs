//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Market and weather data source seams."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
//! Collaborator traits the tools pull their tables from.
//!
//! Implementations do all of the I/O; the engine only ever sees the returned
//! tables. [`InMemoryMarketData`] serves fixtures and ignores the query.

use chrono::NaiveDate;

use crate::{
    errors::{AnalyticsError, Result},
    model::{
        AsPriceRecord, CurtailmentRecord, FuelMixRecord, GridStatus, LmpRecord,
        LoadForecastRecord, LoadRecord, OutageRecord, RenewableRecord, ShadowPriceRecord,
        StorageRecord, TemperatureReading, TieFlowRecord,
    },
    query::{
        AsMarket, DataQuery, LmpMarket, LoadForecastType, RenewableForecastType,
        ShadowPriceMarket,
    },
    series::Table,
};

pub trait MarketDataSource {
    /// Real-time system load at the native (five minute) resolution.
    fn load(&self, query: &DataQuery) -> Result<Table<LoadRecord>>;
    /// Hourly settled load, per TAC area.
    fn load_hourly(&self, query: &DataQuery) -> Result<Table<LoadRecord>>;
    fn load_forecast(
        &self,
        query: &DataQuery,
        forecast_type: LoadForecastType,
    ) -> Result<Table<LoadForecastRecord>>;
    fn fuel_mix(&self, query: &DataQuery) -> Result<Table<FuelMixRecord>>;
    fn renewables(
        &self,
        query: &DataQuery,
        forecast_type: RenewableForecastType,
    ) -> Result<Table<RenewableRecord>>;
    fn storage(&self, query: &DataQuery) -> Result<Table<StorageRecord>>;
    fn curtailment(&self, query: &DataQuery) -> Result<Table<CurtailmentRecord>>;
    fn tie_flows(&self, query: &DataQuery) -> Result<Table<TieFlowRecord>>;
    fn as_prices(&self, query: &DataQuery, market: AsMarket) -> Result<Table<AsPriceRecord>>;
    fn shadow_prices(
        &self,
        query: &DataQuery,
        market: ShadowPriceMarket,
    ) -> Result<Table<ShadowPriceRecord>>;
    /// Generator outage report published for `report_date`.
    fn outages(&self, report_date: NaiveDate) -> Result<Table<OutageRecord>>;
    fn grid_status(&self) -> Result<GridStatus>;
    /// LMPs from one market run, restricted to the given pricing nodes.
    fn lmp(
        &self,
        query: &DataQuery,
        market: LmpMarket,
        locations: &[String],
    ) -> Result<Table<LmpRecord>>;
}

pub trait WeatherSource {
    /// Hourly temperatures for a named place on one local date, in hour order.
    fn hourly_temperature(&self, location: &str, date: NaiveDate)
        -> Result<Vec<TemperatureReading>>;
}

/// Fixture-backed source used by tests and demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketData {
    pub load: Vec<LoadRecord>,
    pub load_hourly: Vec<LoadRecord>,
    pub load_forecast: Vec<LoadForecastRecord>,
    pub fuel_mix: Vec<FuelMixRecord>,
    pub renewables: Vec<RenewableRecord>,
    pub storage: Vec<StorageRecord>,
    pub curtailment: Vec<CurtailmentRecord>,
    pub tie_flows: Vec<TieFlowRecord>,
    pub as_prices: Vec<AsPriceRecord>,
    pub shadow_prices: Vec<ShadowPriceRecord>,
    pub outages: Vec<OutageRecord>,
    pub grid_status: Option<GridStatus>,
    /// Real-time prices.
    pub lmp: Vec<LmpRecord>,
    pub lmp_day_ahead: Vec<LmpRecord>,
}

impl MarketDataSource for InMemoryMarketData {
    fn load(&self, _query: &DataQuery) -> Result<Table<LoadRecord>> {
        Ok(Table::new("load", self.load.clone()))
    }

    fn load_hourly(&self, _query: &DataQuery) -> Result<Table<LoadRecord>> {
        Ok(Table::new("load_hourly", self.load_hourly.clone()))
    }

    fn load_forecast(
        &self,
        _query: &DataQuery,
        _forecast_type: LoadForecastType,
    ) -> Result<Table<LoadForecastRecord>> {
        Ok(Table::new("load_forecast", self.load_forecast.clone()))
    }

    fn fuel_mix(&self, _query: &DataQuery) -> Result<Table<FuelMixRecord>> {
        Ok(Table::new("fuel_mix", self.fuel_mix.clone()))
    }

    fn renewables(
        &self,
        _query: &DataQuery,
        _forecast_type: RenewableForecastType,
    ) -> Result<Table<RenewableRecord>> {
        Ok(Table::new("renewables", self.renewables.clone()))
    }

    fn storage(&self, _query: &DataQuery) -> Result<Table<StorageRecord>> {
        Ok(Table::new("storage", self.storage.clone()))
    }

    fn curtailment(&self, _query: &DataQuery) -> Result<Table<CurtailmentRecord>> {
        Ok(Table::new("curtailment", self.curtailment.clone()))
    }

    fn tie_flows(&self, _query: &DataQuery) -> Result<Table<TieFlowRecord>> {
        Ok(Table::new("tie_flows", self.tie_flows.clone()))
    }

    fn as_prices(&self, _query: &DataQuery, _market: AsMarket) -> Result<Table<AsPriceRecord>> {
        Ok(Table::new("as_prices", self.as_prices.clone()))
    }

    fn shadow_prices(
        &self,
        _query: &DataQuery,
        _market: ShadowPriceMarket,
    ) -> Result<Table<ShadowPriceRecord>> {
        Ok(Table::new("shadow_prices", self.shadow_prices.clone()))
    }

    fn outages(&self, report_date: NaiveDate) -> Result<Table<OutageRecord>> {
        let rows = self
            .outages
            .iter()
            .filter(|row| row.report_date == report_date)
            .cloned()
            .collect();
        Ok(Table::new("outages", rows))
    }

    fn grid_status(&self) -> Result<GridStatus> {
        self.grid_status
            .clone()
            .ok_or_else(|| AnalyticsError::empty("grid_status"))
    }

    fn lmp(
        &self,
        _query: &DataQuery,
        market: LmpMarket,
        locations: &[String],
    ) -> Result<Table<LmpRecord>> {
        let prices = match market {
            LmpMarket::DayAheadHourly => &self.lmp_day_ahead,
            LmpMarket::RealTime5Min => &self.lmp,
        };
        let rows = prices
            .iter()
            .filter(|row| locations.iter().any(|loc| loc == &row.location))
            .cloned()
            .collect();
        Ok(Table::new("lmp", rows))
    }
}

/// Weather fixture: readings for any place and date.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWeather {
    pub readings: Vec<TemperatureReading>,
}

impl WeatherSource for InMemoryWeather {
    fn hourly_temperature(
        &self,
        location: &str,
        date: NaiveDate,
    ) -> Result<Vec<TemperatureReading>> {
        let mut rows: Vec<TemperatureReading> = self
            .readings
            .iter()
            .filter(|r| r.location.eq_ignore_ascii_case(location) && r.time.date() == date)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.time);
        Ok(rows)
    }
}
