//! ---
//! gp_section: "05-external-interfaces"
//! gp_subsection: "binary"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "CLI printing grid and weather tool envelopes as JSON."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use std::{
    net::{SocketAddr, TcpListener as StdTcpListener},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use gridpilot_analytics::{
    api, envelope::format_response, FileMarketDataSource, FileWeatherSource, GridTool, GridTools,
    ReportExporter, ToolArgs, ToolReport, WeatherTools,
};
use gridpilot_common::{init_tracing, AppConfig};
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::{debug, info};

const DEFAULT_CONFIG_PATH: &str = "configs/gridpilot.toml";
const DEFAULT_BIND: &str = "127.0.0.1:8088";

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Grid telemetry analytics from fixture data",
    long_about = None
)]
struct Cli {
    /// Configuration file; `GRIDPILOT_CONFIG` takes precedence when set.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding market and weather fixtures.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Also write `<tool>.json` into this directory.
    #[arg(long, global = true)]
    out: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Args)]
struct DateArgs {
    /// `latest`, `today`, or YYYY-MM-DD.
    #[arg(long)]
    date: Option<String>,
    /// Exclusive end date for range queries.
    #[arg(long)]
    end: Option<String>,
}

impl DateArgs {
    fn into_tool_args(self) -> ToolArgs {
        ToolArgs {
            date: self.date,
            end: self.end,
            ..ToolArgs::default()
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Current system demand with window statistics")]
    Demand(DateArgs),
    #[command(about = "Load forecast for the system-wide TAC area")]
    LoadForecast {
        #[command(flatten)]
        dates: DateArgs,
        #[arg(long)]
        forecast_type: Option<String>,
    },
    #[command(about = "Generation by fuel for the latest interval")]
    SupplyMix(DateArgs),
    #[command(about = "Latest solar and wind output")]
    RenewableGeneration {
        #[command(flatten)]
        dates: DateArgs,
        #[arg(long)]
        forecast_type: Option<String>,
    },
    #[command(about = "Battery charge and discharge state")]
    Storage(DateArgs),
    #[command(about = "Load minus solar and wind with duck-curve position")]
    NetDemand(DateArgs),
    #[command(about = "Actual load against the day-ahead forecast")]
    LoadDeviation(DateArgs),
    #[command(about = "Curtailed renewable energy by fuel and reason")]
    Curtailment(DateArgs),
    #[command(about = "Intertie imports and exports")]
    TieFlows(DateArgs),
    #[command(about = "Ancillary service prices by region")]
    AsPrices {
        #[command(flatten)]
        dates: DateArgs,
        #[arg(long)]
        market: Option<String>,
    },
    #[command(about = "Binding transmission constraints")]
    ShadowPrices {
        #[command(flatten)]
        dates: DateArgs,
        #[arg(long)]
        market: Option<String>,
    },
    #[command(about = "Generator outage report (defaults to yesterday)")]
    Outages {
        #[arg(long)]
        date: Option<String>,
    },
    #[command(about = "Operator-published grid condition")]
    GridStatus,
    #[command(about = "Load, renewables, and trading hub prices")]
    MarketSnapshot {
        #[arg(long)]
        date: Option<String>,
        /// Comma separated hubs, e.g. NP15,SP15.
        #[arg(long)]
        hubs: Option<String>,
    },
    #[command(about = "Operator load forecast with day-ahead hub prices")]
    Forecasts {
        #[arg(long)]
        date: Option<String>,
        /// Comma separated hubs or node ids; defaults to NP15,SP15.
        #[arg(long)]
        locations: Option<String>,
    },
    #[command(about = "Weather locations that drive price at a pricing node")]
    WeatherLocations {
        /// NP15, SP15, ZP26, or a full hub id.
        node: String,
    },
    #[command(about = "Daily temperature summary for a location")]
    TemperatureSummary {
        #[arg(long)]
        location: String,
        #[arg(long)]
        date: String,
    },
    #[command(about = "Serve every tool over HTTP until interrupted")]
    Serve {
        #[arg(long, default_value = DEFAULT_BIND)]
        bind: SocketAddr,
    },
}

/// A parsed tool command reduced to the call it stands for.
enum Invocation {
    Grid(GridTool, ToolArgs),
    WeatherLocations { node: String },
    TemperatureSummary { location: String, date: String },
}

impl Invocation {
    /// `None` for commands that do not run a single tool.
    fn from_command(command: Commands) -> Option<Self> {
        let grid = |tool, args| Some(Invocation::Grid(tool, args));
        match command {
            Commands::Demand(dates) => grid(GridTool::Demand, dates.into_tool_args()),
            Commands::LoadForecast {
                dates,
                forecast_type,
            } => grid(
                GridTool::LoadForecast,
                ToolArgs {
                    forecast_type,
                    ..dates.into_tool_args()
                },
            ),
            Commands::SupplyMix(dates) => grid(GridTool::SupplyMix, dates.into_tool_args()),
            Commands::RenewableGeneration {
                dates,
                forecast_type,
            } => grid(
                GridTool::RenewableGeneration,
                ToolArgs {
                    forecast_type,
                    ..dates.into_tool_args()
                },
            ),
            Commands::Storage(dates) => grid(GridTool::Storage, dates.into_tool_args()),
            Commands::NetDemand(dates) => grid(GridTool::NetDemand, dates.into_tool_args()),
            Commands::LoadDeviation(dates) => grid(GridTool::LoadDeviation, dates.into_tool_args()),
            Commands::Curtailment(dates) => grid(GridTool::Curtailment, dates.into_tool_args()),
            Commands::TieFlows(dates) => grid(GridTool::TieFlows, dates.into_tool_args()),
            Commands::AsPrices { dates, market } => grid(
                GridTool::AsPrices,
                ToolArgs {
                    market,
                    ..dates.into_tool_args()
                },
            ),
            Commands::ShadowPrices { dates, market } => grid(
                GridTool::ShadowPrices,
                ToolArgs {
                    market,
                    ..dates.into_tool_args()
                },
            ),
            Commands::Outages { date } => grid(
                GridTool::Outages,
                ToolArgs {
                    date,
                    ..ToolArgs::default()
                },
            ),
            Commands::GridStatus => grid(GridTool::GridStatus, ToolArgs::default()),
            Commands::MarketSnapshot { date, hubs } => grid(
                GridTool::MarketSnapshot,
                ToolArgs {
                    date,
                    hubs,
                    ..ToolArgs::default()
                },
            ),
            Commands::Forecasts { date, locations } => grid(
                GridTool::Forecasts,
                ToolArgs {
                    date,
                    hubs: locations,
                    ..ToolArgs::default()
                },
            ),
            Commands::WeatherLocations { node } => Some(Invocation::WeatherLocations { node }),
            Commands::TemperatureSummary { location, date } => {
                Some(Invocation::TemperatureSummary { location, date })
            }
            Commands::Serve { .. } => None,
        }
    }
}

fn load_config(explicit: Option<&PathBuf>) -> Result<AppConfig> {
    let candidates: Vec<PathBuf> = match explicit {
        Some(path) => {
            if !path.is_file() {
                bail!("config file {} does not exist", path.display());
            }
            vec![path.clone()]
        }
        None => vec![PathBuf::from(DEFAULT_CONFIG_PATH)],
    };
    let loaded = AppConfig::load_with_source(&candidates)?;
    if let Some(source) = &loaded.source {
        debug!(config_path = %source.display(), "configuration loaded");
    }
    Ok(loaded.config)
}

fn run(invocation: Invocation, config: &AppConfig, data_dir: PathBuf) -> (String, Value) {
    match invocation {
        Invocation::Grid(tool, args) => {
            let grid = GridTools::new(FileMarketDataSource::new(data_dir), config.policy.clone());
            (tool.to_string(), grid.dispatch(tool, &args))
        }
        Invocation::WeatherLocations { node } => {
            let weather = WeatherTools::new(FileWeatherSource::new(data_dir));
            (
                "weather_locations".to_owned(),
                format_response(&weather.weather_locations(&node)),
            )
        }
        Invocation::TemperatureSummary { location, date } => {
            let weather = WeatherTools::new(FileWeatherSource::new(data_dir));
            (
                "temperature_summary".to_owned(),
                format_response(&weather.temperature_summary(&location, &date)),
            )
        }
    }
}

async fn serve(config: &AppConfig, data_dir: PathBuf, addr: SocketAddr) -> Result<()> {
    let router = api::router(
        GridTools::new(FileMarketDataSource::new(&data_dir), config.policy.clone()),
        WeatherTools::new(FileWeatherSource::new(&data_dir)),
    );
    let listener =
        StdTcpListener::bind(addr).with_context(|| format!("failed to bind listener {addr}"))?;
    listener
        .set_nonblocking(true)
        .context("failed to configure listener as non-blocking")?;
    let listener = TcpListener::from_std(listener).context("failed to create tokio listener")?;

    info!(address = %addr, data_dir = %data_dir.display(), "serving grid tools");
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("http server exited with error")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    init_tracing("gridpilotctl", &config.logging)?;

    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.directory.clone());
    if let Commands::Serve { bind } = cli.command {
        let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
        return runtime.block_on(serve(&config, data_dir, bind));
    }
    let Some(invocation) = Invocation::from_command(cli.command) else {
        bail!("command does not run a tool");
    };
    let (tool, response) = run(invocation, &config, data_dir);

    let rendered = serde_json::to_string_pretty(&response).context("rendering tool response")?;
    println!("{rendered}");

    if let Some(out) = &cli.out {
        let reports = [ToolReport::new(tool, response)];
        ReportExporter::new(&reports)
            .export_all(out)
            .with_context(|| format!("writing report to {}", out.display()))?;
    }
    Ok(())
}
