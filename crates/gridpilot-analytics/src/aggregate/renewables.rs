//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Latest solar and wind output snapshot."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use serde::Serialize;

use crate::{
    errors::{AnalyticsError, Result},
    model::RenewableRecord,
    series::{Table, Timestamp},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenewableSnapshot {
    pub interval_start: Timestamp,
    pub interval_end: Timestamp,
    pub solar_mw: f64,
    pub wind_mw: f64,
}

/// Latest system-wide row; rows for other locations are used only when no
/// row carries `location`.
pub fn renewable_snapshot(table: &Table<RenewableRecord>, location: &str) -> Result<RenewableSnapshot> {
    table.require_rows()?;
    let system = table.filter_or_all(|row| row.location.as_deref() == Some(location));
    let latest = system
        .last()
        .ok_or_else(|| AnalyticsError::empty(table.name()))?;
    Ok(RenewableSnapshot {
        interval_start: latest.interval_start,
        interval_end: latest.interval_end,
        solar_mw: latest.solar_mw.unwrap_or(0.0),
        wind_mw: latest.wind_mw.unwrap_or(0.0),
    })
}
