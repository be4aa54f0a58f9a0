//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Intertie flow snapshot and net interchange."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
//! Tie flows: negative MW is an import, positive an export.

use serde::Serialize;

use super::latest_interval;
use crate::{
    errors::Result,
    model::TieFlowRecord,
    series::{Table, Timestamp},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDirection {
    Import,
    Export,
}

impl FlowDirection {
    pub fn of(mw: f64) -> Self {
        if mw < 0.0 {
            FlowDirection::Import
        } else {
            FlowDirection::Export
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NetDirection {
    NetImport,
    NetExport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceFlow {
    pub interface_id: String,
    pub tie_name: String,
    pub from_baa: String,
    pub to_baa: String,
    pub flow_mw: f64,
    pub direction: FlowDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TieFlowSummary {
    pub interval_start: Timestamp,
    pub net_interchange_mw: f64,
    pub net_direction: NetDirection,
    pub interfaces: Vec<InterfaceFlow>,
}

/// Summarise the most recent interval only.
pub fn summarize_tie_flows(table: &Table<TieFlowRecord>) -> Result<TieFlowSummary> {
    let (interval_start, rows) = latest_interval(table)?;

    let interfaces: Vec<InterfaceFlow> = rows
        .into_iter()
        .map(|row| InterfaceFlow {
            interface_id: row.interface_id.clone(),
            tie_name: row.tie_name.clone(),
            from_baa: row.from_baa.clone(),
            to_baa: row.to_baa.clone(),
            flow_mw: row.mw,
            direction: FlowDirection::of(row.mw),
        })
        .collect();
    let net: f64 = interfaces.iter().map(|i| i.flow_mw).sum();

    Ok(TieFlowSummary {
        interval_start,
        net_interchange_mw: net,
        net_direction: if net < 0.0 {
            NetDirection::NetImport
        } else {
            NetDirection::NetExport
        },
        interfaces,
    })
}
