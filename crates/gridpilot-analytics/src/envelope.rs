//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Uniform success and error envelopes returned by every tool."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
//! Result formatting.
//!
//! A tool returns either a [`ToolPayload`] (request echo, metrics, and a
//! generation timestamp) or a [`ToolError`] (message, kind, offending series,
//! and the same request echo). [`format_response`] flattens either side into
//! one JSON object.

use chrono::{DateTime, Utc};
use gridpilot_logging::ToolOutcome;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::AnalyticsError;

/// Parameters a tool was invoked with, echoed into every response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(flatten)]
    pub options: IndexMap<&'static str, String>,
}

impl RequestParams {
    pub fn new(date: impl Into<String>, end: Option<&str>) -> Self {
        Self {
            date: Some(date.into()),
            end: end.map(str::to_owned),
            options: IndexMap::new(),
        }
    }

    pub fn with_option(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.options.insert(key, value.into());
        self
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NoData,
    MalformedSeries,
    UnknownFuelOrForecastType,
    InvalidDate,
    UnknownNode,
    SourceUnavailable,
    Internal,
}

impl ErrorKind {
    pub fn outcome(&self) -> ToolOutcome {
        match self {
            ErrorKind::NoData => ToolOutcome::NoData,
            _ => ToolOutcome::Fault,
        }
    }
}

impl From<&AnalyticsError> for ErrorKind {
    fn from(err: &AnalyticsError) -> Self {
        match err {
            AnalyticsError::NoData { .. } => ErrorKind::NoData,
            AnalyticsError::MalformedSeries { .. } => ErrorKind::MalformedSeries,
            AnalyticsError::UnknownFuelOrForecastType { .. } => ErrorKind::UnknownFuelOrForecastType,
            AnalyticsError::InvalidDate(_) => ErrorKind::InvalidDate,
            AnalyticsError::UnknownNode(_) => ErrorKind::UnknownNode,
            AnalyticsError::Source(_) | AnalyticsError::Io(_) => ErrorKind::SourceUnavailable,
            AnalyticsError::SerializationFailed(_) => ErrorKind::Internal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolError {
    pub error: String,
    pub kind: ErrorKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<String>,
    #[serde(flatten)]
    pub request: RequestParams,
}

impl ToolError {
    pub fn new(err: &AnalyticsError, request: RequestParams) -> Self {
        Self {
            error: err.to_string(),
            kind: ErrorKind::from(err),
            series: err.series(),
            request,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolPayload<T> {
    #[serde(flatten)]
    pub request: RequestParams,
    #[serde(flatten)]
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> ToolPayload<T> {
    pub fn new(request: RequestParams, data: T) -> Self {
        Self {
            request,
            data,
            timestamp: Utc::now(),
        }
    }
}

pub type ToolResult<T> = std::result::Result<ToolPayload<T>, ToolError>;

/// Flatten a tool result into a single JSON object. Never fails: a payload
/// that cannot be serialised becomes an `internal` error envelope.
pub fn format_response<T: Serialize>(result: &ToolResult<T>) -> Value {
    let rendered = match result {
        Ok(payload) => serde_json::to_value(payload),
        Err(error) => serde_json::to_value(error),
    };
    rendered.unwrap_or_else(|err| {
        let mut fallback = json!({
            "error": format!("failed to render response: {err}"),
            "kind": "internal",
        });
        let request = match result {
            Ok(payload) => &payload.request,
            Err(error) => &error.request,
        };
        if let (Some(map), Ok(Value::Object(echo))) =
            (fallback.as_object_mut(), serde_json::to_value(request))
        {
            map.extend(echo);
        }
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NoDataReason;

    #[derive(Serialize)]
    struct Metrics {
        net_demand_mw: f64,
    }

    #[test]
    fn success_flattens_request_and_data() {
        let payload = ToolPayload::new(RequestParams::new("latest", None), Metrics { net_demand_mw: 3500.0 });
        let value = format_response(&Ok(payload));
        assert_eq!(value["date"], "latest");
        assert_eq!(value["net_demand_mw"], 3500.0);
        assert!(value.get("end").is_none());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn error_echoes_every_parameter() {
        let err = AnalyticsError::UnknownFuelOrForecastType {
            parameter: "forecast_type",
            value: "week_ahead".into(),
        };
        let request = RequestParams::new("today", Some("2024-05-02"))
            .with_option("forecast_type", "week_ahead");
        let value = format_response::<Metrics>(&Err(ToolError::new(&err, request)));
        assert_eq!(value["error"], "Invalid forecast_type: week_ahead");
        assert_eq!(value["kind"], "unknown_fuel_or_forecast_type");
        assert_eq!(value["date"], "today");
        assert_eq!(value["end"], "2024-05-02");
        assert_eq!(value["forecast_type"], "week_ahead");
        assert!(value.get("series").is_none());
    }

    #[test]
    fn no_data_names_series() {
        let err = AnalyticsError::NoData {
            series: vec!["load".into(), "fuel_mix".into()],
            reason: NoDataReason::NoOverlap,
        };
        let tool_error = ToolError::new(&err, RequestParams::new("2024-05-01", None));
        assert_eq!(tool_error.kind.outcome(), ToolOutcome::NoData);
        let value = format_response::<Metrics>(&Err(tool_error));
        assert_eq!(value["series"], json!(["load", "fuel_mix"]));
        assert_eq!(value["kind"], "no_data");
    }
}
