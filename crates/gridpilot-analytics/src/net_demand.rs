//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Net demand and duck-curve phase classification."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use chrono::Timelike;
use serde::Serialize;

use crate::{
    align::AlignedRow,
    errors::{AnalyticsError, Result},
    series::Timestamp,
};

/// Position on the daily net-demand curve, by local hour of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuckCurvePhase {
    /// `[06:00, 10:00)`
    MorningRamp,
    /// `[10:00, 16:00)`
    Belly,
    /// `[16:00, 21:00)`
    EveningRamp,
    /// `[21:00, 06:00)`
    Overnight,
}

impl DuckCurvePhase {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=9 => DuckCurvePhase::MorningRamp,
            10..=15 => DuckCurvePhase::Belly,
            16..=20 => DuckCurvePhase::EveningRamp,
            _ => DuckCurvePhase::Overnight,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DuckCurvePhase::MorningRamp => "morning_ramp",
            DuckCurvePhase::Belly => "belly",
            DuckCurvePhase::EveningRamp => "evening_ramp",
            DuckCurvePhase::Overnight => "overnight",
        }
    }
}

/// Renewable output for one interval. `None` means unreported, which is
/// normal for solar at night, and counts as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenewableOutput {
    pub solar_mw: Option<f64>,
    pub wind_mw: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetDemandPoint {
    pub interval_start: Timestamp,
    pub interval_end: Timestamp,
    pub load_mw: f64,
    pub solar_mw: f64,
    pub wind_mw: f64,
    pub net_demand_mw: f64,
    pub phase: DuckCurvePhase,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetDemandProfile {
    pub points: Vec<NetDemandPoint>,
    pub daily_net_peak_mw: f64,
    pub daily_net_min_mw: f64,
    /// Local hour of the first interval reaching the peak.
    pub net_peak_hour: u32,
}

/// Latest interval plus the extremes of the supplied window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetDemandSnapshot {
    pub interval_start: Timestamp,
    pub interval_end: Timestamp,
    pub current_demand_mw: f64,
    pub solar_mw: f64,
    pub wind_mw: f64,
    pub net_demand_mw: f64,
    pub duck_curve_position: DuckCurvePhase,
    pub daily_net_peak_mw: f64,
    pub daily_net_min_mw: f64,
    pub net_peak_hour: u32,
}

pub fn net_demand(load_mw: f64, output: RenewableOutput) -> f64 {
    load_mw - output.solar_mw.unwrap_or(0.0) - output.wind_mw.unwrap_or(0.0)
}

pub fn compute_profile(rows: &[AlignedRow<(f64, RenewableOutput)>]) -> Result<NetDemandProfile> {
    if rows.is_empty() {
        return Err(AnalyticsError::empty("net_demand"));
    }

    let points: Vec<NetDemandPoint> = rows
        .iter()
        .map(|row| {
            let (load_mw, output) = row.values;
            NetDemandPoint {
                interval_start: row.start,
                interval_end: row.end,
                load_mw,
                solar_mw: output.solar_mw.unwrap_or(0.0),
                wind_mw: output.wind_mw.unwrap_or(0.0),
                net_demand_mw: net_demand(load_mw, output),
                phase: DuckCurvePhase::from_hour(row.start.hour()),
            }
        })
        .collect();

    let mut peak = &points[0];
    let mut min = points[0].net_demand_mw;
    for point in &points[1..] {
        // strict comparison keeps the first occurrence on ties
        if point.net_demand_mw > peak.net_demand_mw {
            peak = point;
        }
        min = min.min(point.net_demand_mw);
    }

    Ok(NetDemandProfile {
        daily_net_peak_mw: peak.net_demand_mw,
        daily_net_min_mw: min,
        net_peak_hour: peak.interval_start.hour(),
        points,
    })
}

impl NetDemandProfile {
    pub fn latest(&self) -> Option<NetDemandSnapshot> {
        let last = self.points.last()?;
        Some(NetDemandSnapshot {
            interval_start: last.interval_start,
            interval_end: last.interval_end,
            current_demand_mw: last.load_mw,
            solar_mw: last.solar_mw,
            wind_mw: last.wind_mw,
            net_demand_mw: last.net_demand_mw,
            duck_curve_position: last.phase,
            daily_net_peak_mw: self.daily_net_peak_mw,
            daily_net_min_mw: self.daily_net_min_mw,
            net_peak_hour: self.net_peak_hour,
        })
    }
}
