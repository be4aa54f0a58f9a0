//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Battery storage state and daily extremes."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use serde::Serialize;

use super::extremes;
use crate::{
    errors::{AnalyticsError, Result},
    model::StorageRecord,
    series::{Table, Timestamp},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageStatus {
    Charging,
    Discharging,
    Idle,
}

impl StorageStatus {
    /// Positive supply is discharging, negative is charging.
    pub fn of(supply_mw: f64) -> Self {
        if supply_mw > 0.0 {
            StorageStatus::Discharging
        } else if supply_mw < 0.0 {
            StorageStatus::Charging
        } else {
            StorageStatus::Idle
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageSummary {
    pub interval_start: Timestamp,
    pub interval_end: Timestamp,
    pub total_batteries_mw: f64,
    pub stand_alone_batteries_mw: f64,
    pub hybrid_batteries_mw: f64,
    pub status: StorageStatus,
    /// Highest supply in the window.
    pub daily_max_discharge_mw: f64,
    /// Lowest supply in the window, negative while charging.
    pub daily_max_charge_mw: f64,
}

pub fn summarize_storage(table: &Table<StorageRecord>) -> Result<StorageSummary> {
    let rows = table.require_rows()?;
    let latest = table
        .last()
        .ok_or_else(|| AnalyticsError::empty(table.name()))?;
    let (min_supply, max_supply) = extremes(rows.iter().map(|r| r.supply_mw))
        .ok_or_else(|| AnalyticsError::empty(table.name()))?;

    Ok(StorageSummary {
        interval_start: latest.interval_start,
        interval_end: latest.interval_end,
        total_batteries_mw: latest.supply_mw,
        stand_alone_batteries_mw: latest.stand_alone_mw.unwrap_or(0.0),
        hybrid_batteries_mw: latest.hybrid_mw.unwrap_or(0.0),
        status: StorageStatus::of(latest.supply_mw),
        daily_max_discharge_mw: max_supply,
        daily_max_charge_mw: min_supply,
    })
}
