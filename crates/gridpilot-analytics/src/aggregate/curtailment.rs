//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Renewable curtailment totals by fuel and reason."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use indexmap::IndexMap;
use serde::Serialize;

use crate::{errors::Result, model::CurtailmentRecord, series::Table};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurtailmentSummary {
    pub solar_curtailment_mwh: f64,
    pub wind_curtailment_mwh: f64,
    /// Solar plus wind; other fuels appear only in `curtailment_by_fuel`.
    pub total_curtailment_mwh: f64,
    pub solar_max_curtailment_mw: f64,
    pub wind_max_curtailment_mw: f64,
    pub curtailment_by_fuel: IndexMap<String, f64>,
    pub curtailment_by_reason: IndexMap<String, f64>,
}

pub fn summarize_curtailment(table: &Table<CurtailmentRecord>) -> Result<CurtailmentSummary> {
    let rows = table.require_rows()?;

    let mut by_fuel: IndexMap<String, f64> = IndexMap::new();
    let mut by_reason: IndexMap<String, f64> = IndexMap::new();
    let mut max_mw: IndexMap<&str, f64> = IndexMap::new();
    for row in rows {
        let mwh = row.curtailment_mwh.unwrap_or(0.0);
        *by_fuel.entry(row.fuel_type.clone()).or_default() += mwh;
        if let Some(reason) = &row.curtailment_reason {
            *by_reason.entry(reason.clone()).or_default() += mwh;
        }
        let mw = row.curtailment_mw.unwrap_or(0.0);
        let slot = max_mw.entry(row.fuel_type.as_str()).or_insert(mw);
        *slot = slot.max(mw);
    }

    let fuel_total = |fuel: &str| by_fuel.get(fuel).copied().unwrap_or(0.0);
    let fuel_max = |fuel: &str| max_mw.get(fuel).copied().unwrap_or(0.0);

    let solar_mwh = fuel_total("Solar");
    let wind_mwh = fuel_total("Wind");

    Ok(CurtailmentSummary {
        solar_curtailment_mwh: solar_mwh,
        wind_curtailment_mwh: wind_mwh,
        total_curtailment_mwh: solar_mwh + wind_mwh,
        solar_max_curtailment_mw: fuel_max("Solar"),
        wind_max_curtailment_mw: fuel_max("Wind"),
        curtailment_by_fuel: by_fuel,
        curtailment_by_reason: by_reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::test_support::{at_hour, plus_hour};

    fn row(hour: u32, fuel: &str, reason: Option<&str>, mw: Option<f64>, mwh: Option<f64>) -> CurtailmentRecord {
        CurtailmentRecord {
            interval_start: at_hour(hour),
            interval_end: plus_hour(at_hour(hour)),
            fuel_type: fuel.into(),
            curtailment_reason: reason.map(Into::into),
            curtailment_mw: mw,
            curtailment_mwh: mwh,
        }
    }

    #[test]
    fn totals_split_by_fuel_and_reason() {
        let table = Table::new(
            "curtailment",
            vec![
                row(11, "Solar", Some("Economic"), Some(1200.0), Some(100.0)),
                row(12, "Solar", Some("Local"), Some(1800.0), Some(150.0)),
                row(12, "Wind", Some("Economic"), Some(300.0), Some(25.0)),
                row(13, "Solar", None, None, Some(5.0)),
            ],
        );
        let summary = summarize_curtailment(&table).unwrap();
        assert_eq!(summary.solar_curtailment_mwh, 255.0);
        assert_eq!(summary.wind_curtailment_mwh, 25.0);
        assert_eq!(summary.total_curtailment_mwh, 280.0);
        assert_eq!(summary.solar_max_curtailment_mw, 1800.0);
        assert_eq!(summary.wind_max_curtailment_mw, 300.0);
        assert_eq!(summary.curtailment_by_reason["Economic"], 125.0);
        assert_eq!(summary.curtailment_by_reason["Local"], 150.0);
        assert_eq!(summary.curtailment_by_reason.len(), 2);
    }

    #[test]
    fn total_excludes_other_fuels() {
        let table = Table::new(
            "curtailment",
            vec![
                row(12, "Solar", Some("Economic"), None, Some(100.0)),
                row(12, "Wind", Some("Economic"), None, Some(50.0)),
                row(12, "Geothermal", Some("Economic"), None, Some(30.0)),
            ],
        );
        let summary = summarize_curtailment(&table).unwrap();
        assert_eq!(summary.total_curtailment_mwh, 150.0);
        assert_eq!(summary.curtailment_by_fuel["Geothermal"], 30.0);
        assert_eq!(summary.curtailment_by_reason["Economic"], 180.0);
    }

    #[test]
    fn missing_wind_counts_as_zero() {
        let table = Table::new(
            "curtailment",
            vec![row(12, "Solar", Some("Economic"), None, Some(10.0))],
        );
        let summary = summarize_curtailment(&table).unwrap();
        assert_eq!(summary.total_curtailment_mwh, 10.0);
        assert_eq!(summary.wind_curtailment_mwh, 0.0);
        assert_eq!(summary.wind_max_curtailment_mw, 0.0);
    }

    #[test]
    fn empty_table_is_no_data() {
        let err = summarize_curtailment(&Table::new("curtailment", Vec::new())).unwrap_err();
        assert!(err.is_no_data());
    }
}
