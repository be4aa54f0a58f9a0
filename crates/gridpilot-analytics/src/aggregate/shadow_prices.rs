//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Binding transmission constraints and congestion cost."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use serde::Serialize;

use super::latest_interval;
use crate::{
    errors::Result,
    model::ShadowPriceRecord,
    series::{Table, Timestamp},
};

const UNKNOWN_CAUSE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingConstraint {
    pub location: String,
    pub shadow_price: f64,
    pub constraint_cause: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShadowPriceSummary {
    pub interval_start: Timestamp,
    pub binding_constraints_count: usize,
    pub binding_constraints: Vec<BindingConstraint>,
    /// Sum over binding constraints only.
    pub total_congestion_cost: f64,
}

/// A constraint binds when its shadow price is non-zero.
pub fn summarize_shadow_prices(table: &Table<ShadowPriceRecord>) -> Result<ShadowPriceSummary> {
    let (interval_start, rows) = latest_interval(table)?;
    let binding: Vec<BindingConstraint> = rows
        .into_iter()
        .filter(|row| row.price != 0.0)
        .map(|row| BindingConstraint {
            location: row.location.clone(),
            shadow_price: row.price,
            constraint_cause: row
                .constraint_cause
                .clone()
                .unwrap_or_else(|| UNKNOWN_CAUSE.to_owned()),
        })
        .collect();

    Ok(ShadowPriceSummary {
        interval_start,
        binding_constraints_count: binding.len(),
        total_congestion_cost: binding.iter().map(|c| c.shadow_price).sum(),
        binding_constraints: binding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::test_support::{at_hour, plus_hour};

    fn constraint(hour: u32, location: &str, price: f64, cause: Option<&str>) -> ShadowPriceRecord {
        ShadowPriceRecord {
            interval_start: at_hour(hour),
            interval_end: plus_hour(at_hour(hour)),
            location: location.into(),
            price,
            constraint_cause: cause.map(Into::into),
        }
    }

    #[test]
    fn only_binding_prices_count() {
        let table = Table::new(
            "shadow_prices",
            vec![
                constraint(18, "PATH15_S-N", 99.0, Some("Thermal")),
                constraint(19, "PATH15_S-N", 42.5, Some("Thermal")),
                constraint(19, "PATH26_N-S", 0.0, Some("Thermal")),
                constraint(19, "7820_TL230S_OVERLOAD_NG", -12.5, None),
            ],
        );
        let summary = summarize_shadow_prices(&table).unwrap();
        assert_eq!(summary.interval_start, at_hour(19));
        assert_eq!(summary.binding_constraints_count, 2);
        assert_eq!(summary.total_congestion_cost, 30.0);
        assert_eq!(summary.binding_constraints[1].constraint_cause, "Unknown");
    }

    #[test]
    fn no_binding_constraints_is_still_a_result() {
        let table = Table::new(
            "shadow_prices",
            vec![constraint(5, "PATH15_S-N", 0.0, None)],
        );
        let summary = summarize_shadow_prices(&table).unwrap();
        assert_eq!(summary.binding_constraints_count, 0);
        assert_eq!(summary.total_congestion_cost, 0.0);
    }
}
