//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Grid telemetry analytics: alignment, net demand, deviation, aggregation."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
//! Stateless analytics over balancing-authority telemetry.
//!
//! Tables come from an injected [`MarketDataSource`]; series are aligned on
//! interval start, reduced by the analytics modules, and every public tool in
//! [`tools`] returns a JSON-ready envelope instead of failing.

pub mod aggregate;
pub mod align;
pub mod api;
pub mod deviation;
pub mod envelope;
pub mod errors;
pub mod io;
pub mod model;
pub mod net_demand;
pub mod query;
pub mod reports;
pub mod series;
pub mod source;
pub mod tools;
pub mod weather;

pub use align::{align2, align3, AlignedRow};
pub use deviation::{analyze, DeviationAnalysis, DeviationThresholds};
pub use envelope::{format_response, ErrorKind, RequestParams, ToolError, ToolPayload, ToolResult};
pub use errors::{AnalyticsError, NoDataReason, Result};
pub use io::{FileMarketDataSource, FileWeatherSource};
pub use net_demand::{compute_profile, DuckCurvePhase, NetDemandProfile, NetDemandSnapshot};
pub use query::{DataQuery, DateSelector};
pub use reports::{ReportExporter, ToolReport};
pub use series::{Interval, Series, Table, Timestamp};
pub use source::{InMemoryMarketData, InMemoryWeather, MarketDataSource, WeatherSource};
pub use tools::{GridTool, GridTools, ToolArgs, WeatherTools};
