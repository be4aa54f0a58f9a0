//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Raw market telemetry records delivered by data sources."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
//! Row types for each market dataset.
//!
//! Field names are snake_case; the published column headers (`Interval Start`,
//! `Load Forecast`, `TAC Area Name`, ...) are accepted as aliases so exported
//! market files can be read without a renaming pass.

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::series::{Stamped, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadRecord {
    #[serde(alias = "Interval Start")]
    pub interval_start: Timestamp,
    #[serde(alias = "Interval End")]
    pub interval_end: Timestamp,
    #[serde(default, alias = "TAC Area Name")]
    pub tac_area: Option<String>,
    #[serde(alias = "Load")]
    pub load: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadForecastRecord {
    #[serde(alias = "Interval Start")]
    pub interval_start: Timestamp,
    #[serde(alias = "Interval End")]
    pub interval_end: Timestamp,
    #[serde(default, alias = "TAC Area Name")]
    pub tac_area: Option<String>,
    #[serde(alias = "Load Forecast")]
    pub load_forecast: f64,
}

/// One fuel mix interval. Fuel columns vary between publications, so they
/// are kept as an ordered map; a null or missing fuel counts as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelMixRecord {
    #[serde(alias = "Interval Start")]
    pub interval_start: Timestamp,
    #[serde(alias = "Interval End")]
    pub interval_end: Timestamp,
    #[serde(alias = "fuels")]
    pub generation_mw: IndexMap<String, Option<f64>>,
}

impl FuelMixRecord {
    pub fn fuel_mw(&self, fuel: &str) -> f64 {
        self.generation_mw.get(fuel).copied().flatten().unwrap_or(0.0)
    }

    pub fn solar_mw(&self) -> Option<f64> {
        self.generation_mw.get("Solar").copied().flatten()
    }

    pub fn wind_mw(&self) -> Option<f64> {
        self.generation_mw.get("Wind").copied().flatten()
    }
}

/// Solar and wind output, either actuals or one of the forecast products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenewableRecord {
    #[serde(alias = "Interval Start")]
    pub interval_start: Timestamp,
    #[serde(alias = "Interval End")]
    pub interval_end: Timestamp,
    #[serde(default, alias = "Location")]
    pub location: Option<String>,
    #[serde(default, alias = "Solar", alias = "Solar MW")]
    pub solar_mw: Option<f64>,
    #[serde(default, alias = "Wind", alias = "Wind MW")]
    pub wind_mw: Option<f64>,
}

/// Battery supply; negative while charging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageRecord {
    #[serde(alias = "Interval Start")]
    pub interval_start: Timestamp,
    #[serde(alias = "Interval End")]
    pub interval_end: Timestamp,
    #[serde(alias = "Supply")]
    pub supply_mw: f64,
    #[serde(default, alias = "Stand-alone Batteries")]
    pub stand_alone_mw: Option<f64>,
    #[serde(default, alias = "Hybrid Batteries")]
    pub hybrid_mw: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurtailmentRecord {
    #[serde(alias = "Interval Start")]
    pub interval_start: Timestamp,
    #[serde(alias = "Interval End")]
    pub interval_end: Timestamp,
    #[serde(alias = "Fuel Type")]
    pub fuel_type: String,
    #[serde(default, alias = "Curtailment Reason")]
    pub curtailment_reason: Option<String>,
    #[serde(default, alias = "Curtailment MW")]
    pub curtailment_mw: Option<f64>,
    #[serde(default, alias = "Curtailment MWH")]
    pub curtailment_mwh: Option<f64>,
}

/// Interchange on one intertie; negative is an import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieFlowRecord {
    #[serde(alias = "Interval Start")]
    pub interval_start: Timestamp,
    #[serde(alias = "Interval End")]
    pub interval_end: Timestamp,
    #[serde(alias = "Interface ID")]
    pub interface_id: String,
    #[serde(default, alias = "Tie Name")]
    pub tie_name: String,
    #[serde(default, alias = "From BAA")]
    pub from_baa: String,
    #[serde(default, alias = "To BAA")]
    pub to_baa: String,
    #[serde(alias = "MW")]
    pub mw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsPriceRecord {
    #[serde(alias = "Interval Start")]
    pub interval_start: Timestamp,
    #[serde(alias = "Interval End")]
    pub interval_end: Timestamp,
    #[serde(alias = "Region")]
    pub region: String,
    #[serde(default, alias = "Regulation Up")]
    pub regulation_up: Option<f64>,
    #[serde(default, alias = "Regulation Down")]
    pub regulation_down: Option<f64>,
    #[serde(default, alias = "Spinning Reserves")]
    pub spinning_reserves: Option<f64>,
    #[serde(default, alias = "Non-Spinning Reserves")]
    pub non_spinning_reserves: Option<f64>,
    #[serde(default, alias = "Regulation Mileage Up")]
    pub regulation_mileage_up: Option<f64>,
    #[serde(default, alias = "Regulation Mileage Down")]
    pub regulation_mileage_down: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowPriceRecord {
    #[serde(alias = "Interval Start")]
    pub interval_start: Timestamp,
    #[serde(alias = "Interval End")]
    pub interval_end: Timestamp,
    #[serde(alias = "Location")]
    pub location: String,
    #[serde(alias = "Price")]
    pub price: f64,
    #[serde(default, alias = "Constraint Cause")]
    pub constraint_cause: Option<String>,
}

/// Curtailed or non-operational generator report entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutageRecord {
    #[serde(alias = "Publish Time", alias = "Report Date")]
    pub report_date: NaiveDate,
    #[serde(alias = "Resource Name")]
    pub resource_name: String,
    #[serde(default, alias = "Resource ID")]
    pub resource_id: String,
    #[serde(default, alias = "Outage Type")]
    pub outage_type: Option<String>,
    #[serde(default, alias = "Nature of Work")]
    pub nature_of_work: Option<String>,
    #[serde(default, alias = "Curtailment MW")]
    pub curtailment_mw: Option<f64>,
    #[serde(default, alias = "Resource PMAX MW")]
    pub pmax_mw: Option<f64>,
    #[serde(default, alias = "Curtailment Start Time")]
    pub start_time: Option<Timestamp>,
    #[serde(default, alias = "Curtailment End Time")]
    pub end_time: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LmpRecord {
    #[serde(alias = "Interval Start")]
    pub interval_start: Timestamp,
    #[serde(alias = "Interval End")]
    pub interval_end: Timestamp,
    #[serde(alias = "Location")]
    pub location: String,
    #[serde(alias = "LMP")]
    pub lmp: f64,
    #[serde(default, alias = "Energy")]
    pub energy: Option<f64>,
    #[serde(default, alias = "Congestion")]
    pub congestion: Option<f64>,
    #[serde(default, alias = "Loss")]
    pub loss: Option<f64>,
}

/// Operator-published system condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridStatus {
    pub status: String,
    pub time: Timestamp,
    #[serde(default)]
    pub reserves: Option<f64>,
}

/// Hourly temperature observation or forecast for a named place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub location: String,
    pub time: NaiveDateTime,
    pub temperature_c: f64,
}

macro_rules! impl_stamped {
    ($($record:ty),+ $(,)?) => {
        $(
            impl Stamped for $record {
                fn interval_start(&self) -> Timestamp {
                    self.interval_start
                }

                fn interval_end(&self) -> Timestamp {
                    self.interval_end
                }
            }
        )+
    };
}

impl_stamped!(
    LoadRecord,
    LoadForecastRecord,
    FuelMixRecord,
    RenewableRecord,
    StorageRecord,
    CurtailmentRecord,
    TieFlowRecord,
    AsPriceRecord,
    ShadowPriceRecord,
    LmpRecord,
);
