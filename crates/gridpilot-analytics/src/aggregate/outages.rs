//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Generator outage report totals."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use indexmap::IndexMap;
use serde::Serialize;

use crate::{
    errors::Result,
    model::OutageRecord,
    series::{Table, Timestamp},
};

const UNKNOWN_OUTAGE_TYPE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutageEntry {
    pub resource_name: String,
    pub resource_id: String,
    pub outage_type: Option<String>,
    pub nature_of_work: Option<String>,
    pub curtailment_mw: f64,
    pub pmax_mw: f64,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutageSummary {
    pub total_curtailed_mw: f64,
    pub outages_by_type: IndexMap<String, f64>,
    /// Count over the whole report, before truncation.
    pub outage_count: usize,
    pub outages: Vec<OutageEntry>,
}

/// Summarise an outage report, listing at most `limit` entries.
pub fn summarize_outages(table: &Table<OutageRecord>, limit: usize) -> Result<OutageSummary> {
    let rows = table.require_rows()?;

    let mut by_type: IndexMap<String, f64> = IndexMap::new();
    for row in rows {
        let key = row
            .outage_type
            .clone()
            .unwrap_or_else(|| UNKNOWN_OUTAGE_TYPE.to_owned());
        *by_type.entry(key).or_default() += row.curtailment_mw.unwrap_or(0.0);
    }

    let outages = rows
        .iter()
        .take(limit)
        .map(|row| OutageEntry {
            resource_name: row.resource_name.clone(),
            resource_id: row.resource_id.clone(),
            outage_type: row.outage_type.clone(),
            nature_of_work: row.nature_of_work.clone(),
            curtailment_mw: row.curtailment_mw.unwrap_or(0.0),
            pmax_mw: row.pmax_mw.unwrap_or(0.0),
            start_time: row.start_time,
            end_time: row.end_time,
        })
        .collect();

    Ok(OutageSummary {
        total_curtailed_mw: rows.iter().filter_map(|r| r.curtailment_mw).sum(),
        outages_by_type: by_type,
        outage_count: rows.len(),
        outages,
    })
}
