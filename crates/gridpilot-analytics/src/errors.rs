//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Error taxonomy for the analytics engine."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Why a `NoData` error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoDataReason {
    /// One or more inputs had no rows at all.
    Empty,
    /// All inputs had rows but no interval start was shared by every input.
    NoOverlap,
}

impl NoDataReason {
    pub fn message(&self) -> &'static str {
        match self {
            NoDataReason::Empty => "No data available",
            NoDataReason::NoOverlap => "No overlapping intervals between series",
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("{}", .reason.message())]
    NoData {
        series: Vec<String>,
        reason: NoDataReason,
    },
    #[error("series '{series}' is malformed at row {index}: {detail}")]
    MalformedSeries {
        series: String,
        index: usize,
        detail: String,
    },
    #[error("Invalid {parameter}: {value}")]
    UnknownFuelOrForecastType {
        parameter: &'static str,
        value: String,
    },
    #[error("Invalid date: {0} (expected latest, today, or YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("Unknown node: {0}. Try NP15, SP15, or ZP26.")]
    UnknownNode(String),
    #[error("data source error: {0}")]
    Source(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

impl AnalyticsError {
    /// An input table or series had no rows.
    pub fn empty(series: impl Into<String>) -> Self {
        AnalyticsError::NoData {
            series: vec![series.into()],
            reason: NoDataReason::Empty,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, AnalyticsError::NoData { .. })
    }

    /// Series names attached to the error, if any.
    pub fn series(&self) -> Vec<String> {
        match self {
            AnalyticsError::NoData { series, .. } => series.clone(),
            AnalyticsError::MalformedSeries { series, .. } => vec![series.clone()],
            _ => Vec::new(),
        }
    }
}
