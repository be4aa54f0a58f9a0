//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Hub LMP views: real-time snapshot and day-ahead outlook."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use indexmap::IndexMap;
use serde::Serialize;

use super::load::{summarize_load_forecast, LoadForecastSummary};
use crate::{
    errors::{AnalyticsError, Result},
    model::{FuelMixRecord, LmpRecord, LoadForecastRecord, LoadRecord},
    net_demand::{net_demand, RenewableOutput},
    series::{Table, Timestamp},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubPrice {
    pub location: String,
    pub interval_start: Timestamp,
    pub lmp: f64,
    pub energy: Option<f64>,
    pub congestion: Option<f64>,
    pub loss: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub interval_start: Timestamp,
    pub system_load_mw: f64,
    pub solar_mw: f64,
    pub wind_mw: f64,
    pub net_load_mw: f64,
    pub hub_prices: Vec<HubPrice>,
}

/// System load forecast next to the hourly day-ahead prices at each hub.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayAheadOutlook {
    pub locations_queried: Vec<String>,
    pub load_forecast: LoadForecastSummary,
    /// Hourly prices keyed by node id, in request order.
    pub day_ahead_lmp: IndexMap<String, Vec<HubPrice>>,
}

impl From<&LmpRecord> for HubPrice {
    fn from(row: &LmpRecord) -> Self {
        HubPrice {
            location: row.location.clone(),
            interval_start: row.interval_start,
            lmp: row.lmp,
            energy: row.energy,
            congestion: row.congestion,
            loss: row.loss,
        }
    }
}

/// Pair the forecast for `tac_area` with day-ahead prices. Requested nodes
/// without a price row are left out of `day_ahead_lmp`.
pub fn day_ahead_outlook(
    forecast: &Table<LoadForecastRecord>,
    day_ahead: &Table<LmpRecord>,
    locations: &[String],
    tac_area: &str,
) -> Result<DayAheadOutlook> {
    let load_forecast = summarize_load_forecast(forecast, tac_area)?;
    day_ahead.require_rows()?;

    let mut day_ahead_lmp = IndexMap::new();
    for location in locations {
        let mut prices: Vec<HubPrice> = day_ahead
            .rows()
            .iter()
            .filter(|row| &row.location == location)
            .map(HubPrice::from)
            .collect();
        if prices.is_empty() {
            continue;
        }
        prices.sort_by_key(|price| price.interval_start);
        day_ahead_lmp.insert(location.clone(), prices);
    }

    Ok(DayAheadOutlook {
        locations_queried: locations.to_vec(),
        load_forecast,
        day_ahead_lmp,
    })
}

/// Latest load, renewables and per-hub price. Hubs without a price row are
/// left out of `hub_prices`.
pub fn market_snapshot(
    load: &Table<LoadRecord>,
    fuel_mix: &Table<FuelMixRecord>,
    lmp: &Table<LmpRecord>,
    hubs: &[String],
) -> Result<MarketSnapshot> {
    load.require_rows()?;
    fuel_mix.require_rows()?;
    lmp.require_rows()?;
    let latest_load = load.last().ok_or_else(|| AnalyticsError::empty(load.name()))?;
    let latest_mix = fuel_mix
        .last()
        .ok_or_else(|| AnalyticsError::empty(fuel_mix.name()))?;

    let output = RenewableOutput {
        solar_mw: latest_mix.solar_mw(),
        wind_mw: latest_mix.wind_mw(),
    };

    let hub_prices = hubs
        .iter()
        .filter_map(|hub| {
            lmp.rows()
                .iter()
                .filter(|row| &row.location == hub)
                .max_by_key(|row| row.interval_start)
        })
        .map(HubPrice::from)
        .collect();

    Ok(MarketSnapshot {
        interval_start: latest_load.interval_start,
        system_load_mw: latest_load.load,
        solar_mw: output.solar_mw.unwrap_or(0.0),
        wind_mw: output.wind_mw.unwrap_or(0.0),
        net_load_mw: net_demand(latest_load.load, output),
        hub_prices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::test_support::{at_hour, plus_hour};

    fn price(hour: u32, hub: &str, lmp: f64) -> LmpRecord {
        LmpRecord {
            interval_start: at_hour(hour),
            interval_end: plus_hour(at_hour(hour)),
            location: hub.into(),
            lmp,
            energy: Some(lmp - 5.0),
            congestion: Some(4.0),
            loss: Some(1.0),
        }
    }

    #[test]
    fn snapshot_combines_load_mix_and_hubs() {
        let load = Table::new(
            "load",
            vec![LoadRecord {
                interval_start: at_hour(18),
                interval_end: plus_hour(at_hour(18)),
                tac_area: None,
                load: 30000.0,
            }],
        );
        let fuel_mix = Table::new(
            "fuel_mix",
            vec![FuelMixRecord {
                interval_start: at_hour(18),
                interval_end: plus_hour(at_hour(18)),
                generation_mw: [("Solar".to_owned(), Some(1500.0)), ("Natural Gas".to_owned(), Some(14000.0))]
                    .into_iter()
                    .collect(),
            }],
        );
        let lmp = Table::new(
            "lmp",
            vec![
                price(17, "TH_NP15_GEN-APND", 61.0),
                price(18, "TH_NP15_GEN-APND", 75.0),
                price(18, "TH_SP15_GEN-APND", 82.0),
            ],
        );
        let hubs = vec![
            "TH_NP15_GEN-APND".to_owned(),
            "TH_SP15_GEN-APND".to_owned(),
            "TH_ZP26_GEN-APND".to_owned(),
        ];
        let snapshot = market_snapshot(&load, &fuel_mix, &lmp, &hubs).unwrap();
        assert_eq!(snapshot.net_load_mw, 28500.0);
        assert_eq!(snapshot.wind_mw, 0.0);
        assert_eq!(snapshot.hub_prices.len(), 2);
        assert_eq!(snapshot.hub_prices[0].lmp, 75.0);
        assert_eq!(snapshot.hub_prices[1].location, "TH_SP15_GEN-APND");
    }

    fn forecast(hour: u32, area: &str, mw: f64) -> LoadForecastRecord {
        LoadForecastRecord {
            interval_start: at_hour(hour),
            interval_end: plus_hour(at_hour(hour)),
            tac_area: Some(area.into()),
            load_forecast: mw,
        }
    }

    #[test]
    fn outlook_groups_hourly_prices_by_node() {
        let forecasts = Table::new(
            "load_forecast",
            vec![
                forecast(17, "CA ISO-TAC", 31000.0),
                forecast(18, "CA ISO-TAC", 33000.0),
                forecast(18, "PGE-TAC", 12000.0),
            ],
        );
        let prices = Table::new(
            "lmp",
            vec![
                price(18, "TH_SP15_GEN-APND", 88.0),
                price(17, "TH_SP15_GEN-APND", 64.0),
                price(17, "TH_NP15_GEN-APND", 58.0),
            ],
        );
        let locations = vec![
            "TH_NP15_GEN-APND".to_owned(),
            "TH_SP15_GEN-APND".to_owned(),
            "TH_ZP26_GEN-APND".to_owned(),
        ];
        let outlook = day_ahead_outlook(&forecasts, &prices, &locations, "CA ISO-TAC").unwrap();
        assert_eq!(outlook.locations_queried.len(), 3);
        assert_eq!(outlook.load_forecast.peak_forecast_mw, 33000.0);
        assert_eq!(outlook.load_forecast.data_points, 2);
        let hubs: Vec<&str> = outlook.day_ahead_lmp.keys().map(String::as_str).collect();
        assert_eq!(hubs, vec!["TH_NP15_GEN-APND", "TH_SP15_GEN-APND"]);
        let sp15 = &outlook.day_ahead_lmp["TH_SP15_GEN-APND"];
        assert_eq!(sp15[0].lmp, 64.0);
        assert_eq!(sp15[1].lmp, 88.0);
    }

    #[test]
    fn outlook_without_prices_is_no_data() {
        let forecasts = Table::new("load_forecast", vec![forecast(1, "CA ISO-TAC", 20000.0)]);
        let err = day_ahead_outlook(&forecasts, &Table::new("lmp", Vec::new()), &[], "CA ISO-TAC")
            .unwrap_err();
        assert!(err.is_no_data());
    }
}
