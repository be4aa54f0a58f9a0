//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Ancillary service prices per region."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use indexmap::IndexMap;
use serde::Serialize;

use super::latest_interval;
use crate::{
    errors::Result,
    model::AsPriceRecord,
    series::{Table, Timestamp},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RegionPrices {
    pub regulation_up: f64,
    pub regulation_down: f64,
    pub spinning_reserves: f64,
    pub non_spinning_reserves: f64,
    pub regulation_mileage_up: f64,
    pub regulation_mileage_down: f64,
}

impl From<&AsPriceRecord> for RegionPrices {
    fn from(row: &AsPriceRecord) -> Self {
        Self {
            regulation_up: row.regulation_up.unwrap_or(0.0),
            regulation_down: row.regulation_down.unwrap_or(0.0),
            spinning_reserves: row.spinning_reserves.unwrap_or(0.0),
            non_spinning_reserves: row.non_spinning_reserves.unwrap_or(0.0),
            regulation_mileage_up: row.regulation_mileage_up.unwrap_or(0.0),
            regulation_mileage_down: row.regulation_mileage_down.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsPriceSummary {
    pub interval_start: Timestamp,
    pub prices_by_region: IndexMap<String, RegionPrices>,
}

/// Prices for the latest interval; a repeated region keeps its last row.
pub fn summarize_as_prices(table: &Table<AsPriceRecord>) -> Result<AsPriceSummary> {
    let (interval_start, rows) = latest_interval(table)?;
    let prices_by_region = rows
        .into_iter()
        .map(|row| (row.region.clone(), RegionPrices::from(row)))
        .collect();
    Ok(AsPriceSummary {
        interval_start,
        prices_by_region,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::test_support::{at_hour, plus_hour};

    fn price(hour: u32, region: &str, reg_up: Option<f64>) -> AsPriceRecord {
        AsPriceRecord {
            interval_start: at_hour(hour),
            interval_end: plus_hour(at_hour(hour)),
            region: region.into(),
            regulation_up: reg_up,
            regulation_down: Some(4.5),
            spinning_reserves: Some(7.25),
            non_spinning_reserves: None,
            regulation_mileage_up: None,
            regulation_mileage_down: None,
        }
    }

    #[test]
    fn latest_interval_per_region() {
        let table = Table::new(
            "as_prices",
            vec![
                price(16, "AS_CAISO_EXP", Some(9.0)),
                price(17, "AS_CAISO_EXP", Some(12.0)),
                price(17, "AS_SP26_EXP", None),
            ],
        );
        let summary = summarize_as_prices(&table).unwrap();
        assert_eq!(summary.interval_start, at_hour(17));
        assert_eq!(summary.prices_by_region.len(), 2);
        assert_eq!(summary.prices_by_region["AS_CAISO_EXP"].regulation_up, 12.0);
        let sp26 = summary.prices_by_region["AS_SP26_EXP"];
        assert_eq!(sp26.regulation_up, 0.0);
        assert_eq!(sp26.non_spinning_reserves, 0.0);
        assert_eq!(sp26.spinning_reserves, 7.25);
    }
}
