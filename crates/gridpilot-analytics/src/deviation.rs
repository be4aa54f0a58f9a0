//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Actual versus forecast load deviation and driver attribution."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
//! Load deviation analysis.
//!
//! Every aligned `(actual, forecast)` row yields a [`DeviationRecord`]. The
//! batch is summarised, partitioned into morning, midday and evening windows,
//! and run through [`DRIVER_RULES`], an ordered decision table where every
//! rule that fires contributes a hypothesis.

use chrono::{Datelike, Timelike, Weekday};
use gridpilot_common::{
    config::{
        DEFAULT_DRIVER_WINDOW_THRESHOLD_MW, DEFAULT_MIDDAY_THRESHOLD_MW,
        DEFAULT_SIGNIFICANCE_THRESHOLD_MW,
    },
    PolicyConfig,
};
use serde::Serialize;

use crate::{
    align::AlignedRow,
    errors::{AnalyticsError, Result},
    series::Timestamp,
};

/// Magnitudes the analysis classifies against, in MW.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviationThresholds {
    /// A row is significant when `|deviation|` is strictly above this.
    pub significance_mw: f64,
    /// Morning/evening window mean magnitude for the temperature rule.
    pub window_mw: f64,
    /// Midday window mean magnitude for the behind-the-meter solar rule.
    pub midday_mw: f64,
}

impl Default for DeviationThresholds {
    fn default() -> Self {
        Self {
            significance_mw: DEFAULT_SIGNIFICANCE_THRESHOLD_MW,
            window_mw: DEFAULT_DRIVER_WINDOW_THRESHOLD_MW,
            midday_mw: DEFAULT_MIDDAY_THRESHOLD_MW,
        }
    }
}

impl From<&PolicyConfig> for DeviationThresholds {
    fn from(policy: &PolicyConfig) -> Self {
        Self {
            significance_mw: policy.significance_threshold_mw,
            window_mw: policy.driver_window_threshold_mw,
            midday_mw: policy.midday_threshold_mw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviationRecord {
    pub hour_ending: u32,
    pub interval_start: Timestamp,
    pub da_forecast_mw: f64,
    pub rt_actual_mw: f64,
    pub deviation_mw: f64,
    /// `None` when the forecast is zero.
    pub deviation_pct: Option<f64>,
    pub significant: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    #[serde(rename = "actual above forecast")]
    ActualAboveForecast,
    #[serde(rename = "actual below forecast")]
    ActualBelowForecast,
}

impl Direction {
    pub fn from_mean(mean: f64) -> Self {
        if mean > 0.0 {
            Direction::ActualAboveForecast
        } else {
            Direction::ActualBelowForecast
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviationSummary {
    pub mean_deviation_mw: f64,
    pub max_deviation_mw: f64,
    pub min_deviation_mw: f64,
    pub hours_analyzed: usize,
    pub hours_with_significant_deviation: usize,
    pub overall_direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverKind {
    Temperature,
    BehindTheMeterSolar,
    Calendar,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverHypothesis {
    pub driver: DriverKind,
    pub detail: &'static str,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowPattern {
    pub morning_avg_deviation_mw: f64,
    pub midday_avg_deviation_mw: f64,
    pub evening_avg_deviation_mw: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverAnalysis {
    pub likely_drivers: Vec<DriverHypothesis>,
    pub pattern: WindowPattern,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviationAnalysis {
    pub deviations: Vec<DeviationRecord>,
    pub summary: DeviationSummary,
    pub driver_analysis: DriverAnalysis,
}

/// Inputs the driver rules are evaluated against. Window means are unrounded.
#[derive(Debug, Clone, Copy)]
pub struct DriverContext {
    pub mean_mw: f64,
    pub morning_mw: f64,
    pub midday_mw: f64,
    pub evening_mw: f64,
    pub first_start: Timestamp,
    pub thresholds: DeviationThresholds,
}

pub struct DriverRule {
    pub kind: DriverKind,
    pub applies: fn(&DriverContext) -> bool,
    pub build: fn(&DriverContext) -> DriverHypothesis,
}

pub const DRIVER_RULES: [DriverRule; 3] = [
    DriverRule {
        kind: DriverKind::Temperature,
        applies: temperature_applies,
        build: temperature_hypothesis,
    },
    DriverRule {
        kind: DriverKind::BehindTheMeterSolar,
        applies: btm_solar_applies,
        build: btm_solar_hypothesis,
    },
    DriverRule {
        kind: DriverKind::Calendar,
        applies: weekend_applies,
        build: weekend_hypothesis,
    },
];

const UNKNOWN_DRIVER: DriverHypothesis = DriverHypothesis {
    driver: DriverKind::Unknown,
    detail: "Pattern does not match typical drivers",
    confidence: Confidence::Low,
};

fn temperature_applies(ctx: &DriverContext) -> bool {
    let limit = ctx.thresholds.window_mw;
    (ctx.morning_mw < -limit && ctx.evening_mw < -limit)
        || (ctx.morning_mw > limit && ctx.evening_mw > limit)
}

fn temperature_hypothesis(ctx: &DriverContext) -> DriverHypothesis {
    let detail = if ctx.mean_mw < 0.0 {
        "Load running below forecast - likely warmer than expected (reduced heating)"
    } else {
        "Load running above forecast - likely colder than expected (increased heating)"
    };
    DriverHypothesis {
        driver: DriverKind::Temperature,
        detail,
        confidence: Confidence::High,
    }
}

fn btm_solar_applies(ctx: &DriverContext) -> bool {
    ctx.midday_mw.abs() > ctx.thresholds.midday_mw && ctx.morning_mw.abs() < ctx.thresholds.window_mw
}

fn btm_solar_hypothesis(_: &DriverContext) -> DriverHypothesis {
    DriverHypothesis {
        driver: DriverKind::BehindTheMeterSolar,
        detail: "Midday deviation suggests BTM solar generation different than forecast",
        confidence: Confidence::Medium,
    }
}

fn weekend_applies(ctx: &DriverContext) -> bool {
    matches!(ctx.first_start.weekday(), Weekday::Sat | Weekday::Sun)
}

fn weekend_hypothesis(_: &DriverContext) -> DriverHypothesis {
    DriverHypothesis {
        driver: DriverKind::Calendar,
        detail: "Weekend - reduced commercial/industrial load",
        confidence: Confidence::High,
    }
}

/// Evaluate every rule in order; falls back to a single low-confidence
/// `unknown` hypothesis.
pub fn attribute_drivers(ctx: &DriverContext) -> Vec<DriverHypothesis> {
    let mut drivers: Vec<DriverHypothesis> = DRIVER_RULES
        .iter()
        .filter(|rule| (rule.applies)(ctx))
        .map(|rule| (rule.build)(ctx))
        .collect();
    if drivers.is_empty() {
        drivers.push(UNKNOWN_DRIVER);
    }
    drivers
}

/// Round half to even at `places` decimals, never returning `-0.0`.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round_ties_even() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

pub fn deviation_record(
    start: Timestamp,
    actual_mw: f64,
    forecast_mw: f64,
    thresholds: &DeviationThresholds,
) -> DeviationRecord {
    let deviation_mw = actual_mw - forecast_mw;
    let deviation_pct = (forecast_mw != 0.0).then(|| round_to(deviation_mw / forecast_mw * 100.0, 2));
    DeviationRecord {
        hour_ending: start.hour() + 1,
        interval_start: start,
        da_forecast_mw: forecast_mw,
        rt_actual_mw: actual_mw,
        deviation_mw,
        deviation_pct,
        significant: deviation_mw.abs() > thresholds.significance_mw,
    }
}

fn window_mean(records: &[DeviationRecord], hours: std::ops::Range<u32>) -> f64 {
    let (sum, count) = records
        .iter()
        .filter(|r| hours.contains(&r.interval_start.hour()))
        .fold((0.0, 0usize), |(sum, count), r| (sum + r.deviation_mw, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Analyse aligned `(actual, forecast)` rows.
pub fn analyze(
    rows: &[AlignedRow<(f64, f64)>],
    thresholds: &DeviationThresholds,
) -> Result<DeviationAnalysis> {
    let first = rows.first().ok_or_else(|| AnalyticsError::empty("load_deviation"))?;

    let deviations: Vec<DeviationRecord> = rows
        .iter()
        .map(|row| {
            let (actual, forecast) = row.values;
            deviation_record(row.start, actual, forecast, thresholds)
        })
        .collect();

    let count = deviations.len();
    let mean = deviations.iter().map(|d| d.deviation_mw).sum::<f64>() / count as f64;
    let max = deviations
        .iter()
        .map(|d| d.deviation_mw)
        .fold(f64::NEG_INFINITY, f64::max);
    let min = deviations
        .iter()
        .map(|d| d.deviation_mw)
        .fold(f64::INFINITY, f64::min);

    let ctx = DriverContext {
        mean_mw: mean,
        morning_mw: window_mean(&deviations, 6..10),
        midday_mw: window_mean(&deviations, 10..16),
        evening_mw: window_mean(&deviations, 16..21),
        first_start: first.start,
        thresholds: *thresholds,
    };

    let summary = DeviationSummary {
        mean_deviation_mw: round_to(mean, 1),
        max_deviation_mw: round_to(max, 1),
        min_deviation_mw: round_to(min, 1),
        hours_analyzed: count,
        hours_with_significant_deviation: deviations.iter().filter(|d| d.significant).count(),
        overall_direction: Direction::from_mean(mean),
    };

    let driver_analysis = DriverAnalysis {
        likely_drivers: attribute_drivers(&ctx),
        pattern: WindowPattern {
            morning_avg_deviation_mw: round_to(ctx.morning_mw, 0),
            midday_avg_deviation_mw: round_to(ctx.midday_mw, 0),
            evening_avg_deviation_mw: round_to(ctx.evening_mw, 0),
        },
    };

    Ok(DeviationAnalysis {
        deviations,
        summary,
        driver_analysis,
    })
}
