//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Reducers from raw market tables to headline metrics."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
//! Aggregators.
//!
//! Each reducer takes one raw [`Table`], fails with `NoData` when the table is
//! empty, and otherwise treats missing optional columns as zero.

pub mod ancillary;
pub mod curtailment;
pub mod fuel_mix;
pub mod lmp;
pub mod load;
pub mod outages;
pub mod renewables;
pub mod shadow_prices;
pub mod storage;
pub mod tie_flows;

pub use ancillary::{summarize_as_prices, AsPriceSummary, RegionPrices};
pub use curtailment::{summarize_curtailment, CurtailmentSummary};
pub use fuel_mix::{summarize_fuel_mix, FuelMixSummary};
pub use lmp::{day_ahead_outlook, market_snapshot, DayAheadOutlook, HubPrice, MarketSnapshot};
pub use load::{summarize_demand, summarize_load_forecast, DemandSummary, LoadForecastSummary};
pub use outages::{summarize_outages, OutageEntry, OutageSummary};
pub use renewables::{renewable_snapshot, RenewableSnapshot};
pub use shadow_prices::{summarize_shadow_prices, BindingConstraint, ShadowPriceSummary};
pub use storage::{summarize_storage, StorageStatus, StorageSummary};
pub use tie_flows::{summarize_tie_flows, FlowDirection, InterfaceFlow, TieFlowSummary};

use crate::{
    errors::Result,
    series::{Stamped, Table, Timestamp},
};

/// Rows of the most recent interval start, in delivery order.
pub(crate) fn latest_interval<R: Stamped>(table: &Table<R>) -> Result<(Timestamp, Vec<&R>)> {
    table.require_rows()?;
    let latest = table
        .latest_start()
        .ok_or_else(|| crate::errors::AnalyticsError::empty(table.name()))?;
    Ok((latest, table.rows_at(latest).collect()))
}

pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// `(min, max)` of a non-empty iterator.
pub(crate) fn extremes(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
