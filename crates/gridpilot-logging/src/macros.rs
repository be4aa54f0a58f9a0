//! ---
//! gp_section: "03-logging"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Context-enriched logging macros."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
/// Emit an informational log enriched with tool context.
#[macro_export]
macro_rules! gp_info {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::INFO,
            tool = ctx.tool.unwrap_or(""),
            date = ctx.date.unwrap_or(""),
            market = ctx.market.unwrap_or(""),
            series = ctx.series.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        $crate::gp_info!(context = $crate::ToolLogContext::default(), $($arg)+)
    }};
}

/// Emit a debug log enriched with tool context.
#[macro_export]
macro_rules! gp_debug {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::DEBUG,
            tool = ctx.tool.unwrap_or(""),
            date = ctx.date.unwrap_or(""),
            market = ctx.market.unwrap_or(""),
            series = ctx.series.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        $crate::gp_debug!(context = $crate::ToolLogContext::default(), $($arg)+)
    }};
}

/// Emit a warning log enriched with tool context.
#[macro_export]
macro_rules! gp_warn {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::WARN,
            tool = ctx.tool.unwrap_or(""),
            date = ctx.date.unwrap_or(""),
            market = ctx.market.unwrap_or(""),
            series = ctx.series.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        $crate::gp_warn!(context = $crate::ToolLogContext::default(), $($arg)+)
    }};
}

/// Emit an error log enriched with tool context.
#[macro_export]
macro_rules! gp_error {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::ERROR,
            tool = ctx.tool.unwrap_or(""),
            date = ctx.date.unwrap_or(""),
            market = ctx.market.unwrap_or(""),
            series = ctx.series.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        $crate::gp_error!(context = $crate::ToolLogContext::default(), $($arg)+)
    }};
}
