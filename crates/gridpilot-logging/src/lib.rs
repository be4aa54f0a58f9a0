//! ---
//! gp_section: "03-logging"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Structured logging context and tool lifecycle events."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
#![warn(missing_docs)]

use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

pub mod macros;

/// Install a debug-level subscriber that writes through the test harness, so
/// tool events show up next to a failing test. A no-op once any global
/// subscriber is set; binaries use `gridpilot_common::init_tracing` instead.
pub fn init() {
    let _ = Registry::default()
        .with(EnvFilter::from_default_env().add_directive(Level::DEBUG.into()))
        .with(subscriber_fmt::layer().with_test_writer())
        .try_init();
}

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct ToolLogContext<'a> {
    /// Tool (public operation) the event belongs to.
    pub tool: Option<&'a str>,
    /// Date selector the tool was invoked with.
    pub date: Option<&'a str>,
    /// Market or forecast variant, when the tool takes one.
    pub market: Option<&'a str>,
    /// Dataset or series the event concerns.
    pub series: Option<&'a str>,
}

impl<'a> ToolLogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the tool name.
    pub fn with_tool(mut self, tool: &'a str) -> Self {
        self.tool = Some(tool);
        self
    }

    /// Attach the requested date selector.
    pub fn with_date(mut self, date: &'a str) -> Self {
        self.date = Some(date);
        self
    }

    /// Attach a market or forecast variant.
    pub fn with_market(mut self, market: &'a str) -> Self {
        self.market = Some(market);
        self
    }

    /// Attach a series name.
    pub fn with_series(mut self, series: &'a str) -> Self {
        self.series = Some(series);
        self
    }
}

/// Outcome of a tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    /// A full payload was produced.
    Success,
    /// The input was empty or had no overlap; reported to the caller.
    NoData,
    /// The upstream data broke its contract or the request was invalid.
    Fault,
}

impl ToolOutcome {
    /// Stable label attached to the `outcome` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolOutcome::Success => "success",
            ToolOutcome::NoData => "no_data",
            ToolOutcome::Fault => "fault",
        }
    }

    /// Level the outcome is logged at by [`log_tool_event`].
    pub fn level(&self) -> Level {
        match self {
            ToolOutcome::Success => Level::DEBUG,
            ToolOutcome::NoData => Level::INFO,
            ToolOutcome::Fault => Level::WARN,
        }
    }
}

macro_rules! emit_tool_event {
    ($level:expr, $ctx:expr, $event:expr, $outcome:expr, $message:expr) => {
        tracing::event!(
            $level,
            event = $event,
            outcome = $outcome.as_str(),
            tool = $ctx.tool.unwrap_or(""),
            date = $ctx.date.unwrap_or(""),
            market = $ctx.market.unwrap_or(""),
            series = $ctx.series.unwrap_or(""),
            message = %$message
        )
    };
}

/// Emit a standardized tool event with its outcome.
pub fn log_tool_event(
    context: Option<&ToolLogContext<'_>>,
    event: &str,
    message: &str,
    outcome: ToolOutcome,
) {
    let default_ctx = ToolLogContext::default();
    let ctx = context.unwrap_or(&default_ctx);
    // `tracing::event!` needs a constant level, hence one arm per outcome.
    match outcome {
        ToolOutcome::Success => emit_tool_event!(Level::DEBUG, ctx, event, outcome, message),
        ToolOutcome::NoData => emit_tool_event!(Level::INFO, ctx, event, outcome, message),
        ToolOutcome::Fault => emit_tool_event!(Level::WARN, ctx, event, outcome, message),
    }
}
