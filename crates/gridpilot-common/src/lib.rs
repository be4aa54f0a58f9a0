//! ---
//! gp_section: "01-core-functionality"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Shared primitives for the analytics workspace."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
//! Shared primitives for the GridPilot workspace.
//! This crate exposes configuration loading, the tunable analysis policy,
//! and tracing initialisation consumed by the engine and its binaries.

pub mod config;
pub mod logging;

pub use config::{AppConfig, DataConfig, LoadedAppConfig, LoggingConfig, PolicyConfig};
pub use logging::{init_tracing, LogFormat};
