//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Generation by fuel and renewable share."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    deviation::round_to,
    errors::{AnalyticsError, Result},
    model::FuelMixRecord,
    series::{Table, Timestamp},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelMixSummary {
    pub interval_start: Timestamp,
    pub interval_end: Timestamp,
    pub generation_mw: IndexMap<String, f64>,
    pub percentages: IndexMap<String, f64>,
    pub total_generation_mw: f64,
    pub renewables_total_mw: f64,
    pub renewables_percentage: f64,
}

fn share(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        round_to(part / total * 100.0, 1)
    } else {
        0.0
    }
}

/// Summarise the latest fuel mix row. Every fuel reported anywhere in the
/// table is listed; fuels missing from the latest row show as zero.
pub fn summarize_fuel_mix(
    table: &Table<FuelMixRecord>,
    renewable_sources: &[String],
) -> Result<FuelMixSummary> {
    table.require_rows()?;
    let latest = table
        .last()
        .ok_or_else(|| AnalyticsError::empty(table.name()))?;

    let mut generation_mw: IndexMap<String, f64> = IndexMap::new();
    for row in table.rows() {
        for fuel in row.generation_mw.keys() {
            if !generation_mw.contains_key(fuel) {
                generation_mw.insert(fuel.clone(), latest.fuel_mw(fuel));
            }
        }
    }

    let total: f64 = generation_mw.values().sum();
    let renewables: f64 = renewable_sources
        .iter()
        .map(|fuel| generation_mw.get(fuel).copied().unwrap_or(0.0))
        .sum();
    let percentages = generation_mw
        .iter()
        .map(|(fuel, mw)| (fuel.clone(), share(*mw, total)))
        .collect();

    Ok(FuelMixSummary {
        interval_start: latest.interval_start,
        interval_end: latest.interval_end,
        generation_mw,
        percentages,
        total_generation_mw: total,
        renewables_total_mw: renewables,
        renewables_percentage: share(renewables, total),
    })
}
