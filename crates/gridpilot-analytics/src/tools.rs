//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Public grid and weather tools with never-failing envelopes."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
//! Tool facade.
//!
//! Every public method is a boundary: it parses its arguments, pulls tables
//! from the injected source, runs the analytics, and returns a
//! [`ToolResult`]. Failures are converted into a [`ToolError`] echoing the
//! request and logged with their outcome.

use chrono::{Days, NaiveDate, Utc};
use chrono_tz::Tz;
use gridpilot_common::PolicyConfig;
use gridpilot_logging::{gp_warn, log_tool_event, ToolLogContext, ToolOutcome};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{
    aggregate::{
        load::{total_area_forecast, total_area_load},
        day_ahead_outlook, market_snapshot, renewable_snapshot, summarize_as_prices,
        summarize_curtailment, summarize_demand, summarize_fuel_mix, summarize_load_forecast,
        summarize_outages, summarize_shadow_prices, summarize_storage, summarize_tie_flows,
        AsPriceSummary, CurtailmentSummary, DayAheadOutlook, DemandSummary, FuelMixSummary,
        LoadForecastSummary, MarketSnapshot, OutageSummary, RenewableSnapshot,
        ShadowPriceSummary, StorageSummary, TieFlowSummary,
    },
    align::align2,
    deviation::{analyze, DeviationAnalysis, DeviationThresholds},
    envelope::{format_response, RequestParams, ToolError, ToolPayload, ToolResult},
    errors::{AnalyticsError, Result},
    model::GridStatus,
    net_demand::{compute_profile, NetDemandSnapshot, RenewableOutput},
    query::{
        parse_param, AsMarket, DataQuery, DateSelector, LmpMarket, LoadForecastType,
        RenewableForecastType, ShadowPriceMarket,
    },
    source::{MarketDataSource, WeatherSource},
    weather::{
        resolve_hub_id, summarize_temperature, weather_locations_for_node, NodeWeatherProfile,
        TemperatureSummary,
    },
};

/// Selector used when a snapshot tool is called without a date.
pub const DEFAULT_SNAPSHOT_DATE: &str = "latest";
/// Selector used when a day-profile tool is called without a date.
pub const DEFAULT_DAY_DATE: &str = "today";

const DEFAULT_LOAD_FORECAST_TYPE: &str = "day_ahead";
const DEFAULT_RENEWABLE_FORECAST_TYPE: &str = "actual";
const DEFAULT_MARKET: &str = "DAM";
const DEFAULT_FORECAST_HUBS: [&str; 2] = ["NP15", "SP15"];

/// Market-data tools addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum GridTool {
    Demand,
    LoadForecast,
    SupplyMix,
    RenewableGeneration,
    Storage,
    NetDemand,
    LoadDeviation,
    Curtailment,
    TieFlows,
    AsPrices,
    ShadowPrices,
    Outages,
    GridStatus,
    MarketSnapshot,
    Forecasts,
}

/// Loosely typed tool arguments as they arrive from a CLI or query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolArgs {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub forecast_type: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
    /// Comma separated hub names or node ids.
    #[serde(default)]
    pub hubs: Option<String>,
}

impl ToolArgs {
    fn hub_list(&self) -> Option<Vec<String>> {
        self.hubs.as_deref().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|hub| !hub.is_empty())
                .map(str::to_owned)
                .collect()
        })
    }
}

fn render<T: Serialize>(result: ToolResult<T>) -> Value {
    format_response(&result)
}

/// Run `compute`, wrapping its outcome in an envelope and logging it.
fn run_tool<T>(
    tool: &'static str,
    request: RequestParams,
    compute: impl FnOnce() -> Result<T>,
) -> ToolResult<T> {
    let outcome = compute();
    let ctx = ToolLogContext::new()
        .with_tool(tool)
        .with_date(request.date.as_deref().unwrap_or(""))
        .with_market(
            request
                .option("market")
                .or_else(|| request.option("forecast_type"))
                .unwrap_or(""),
        );
    match outcome {
        Ok(data) => {
            log_tool_event(Some(&ctx), "tool.completed", "payload ready", ToolOutcome::Success);
            Ok(ToolPayload::new(request, data))
        }
        Err(err) => {
            let kind_outcome = crate::envelope::ErrorKind::from(&err).outcome();
            log_tool_event(Some(&ctx), "tool.failed", &err.to_string(), kind_outcome);
            Err(ToolError::new(&err, request))
        }
    }
}

/// Grid analytics over an injected market data source.
#[derive(Debug, Clone)]
pub struct GridTools<S> {
    source: S,
    policy: PolicyConfig,
    market_tz: Tz,
}

impl<S: MarketDataSource> GridTools<S> {
    pub fn new(source: S, policy: PolicyConfig) -> Self {
        let market_tz = policy.timezone().unwrap_or_else(|err| {
            gp_warn!("{err}; report dates fall back to America/Los_Angeles");
            chrono_tz::America::Los_Angeles
        });
        Self {
            source,
            policy,
            market_tz,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Dispatch a named tool and render its envelope.
    pub fn dispatch(&self, tool: GridTool, args: &ToolArgs) -> Value {
        let date = args.date.as_deref();
        let end = args.end.as_deref();
        match tool {
            GridTool::Demand => render(self.demand(date, end)),
            GridTool::LoadForecast => {
                render(self.load_forecast(date, end, args.forecast_type.as_deref()))
            }
            GridTool::SupplyMix => render(self.supply_mix(date, end)),
            GridTool::RenewableGeneration => {
                render(self.renewable_generation(date, end, args.forecast_type.as_deref()))
            }
            GridTool::Storage => render(self.storage(date, end)),
            GridTool::NetDemand => render(self.net_demand(date, end)),
            GridTool::LoadDeviation => render(self.load_deviation(date, end)),
            GridTool::Curtailment => render(self.curtailment(date, end)),
            GridTool::TieFlows => render(self.tie_flows(date, end)),
            GridTool::AsPrices => render(self.as_prices(date, end, args.market.as_deref())),
            GridTool::ShadowPrices => {
                render(self.shadow_prices(date, end, args.market.as_deref()))
            }
            GridTool::Outages => render(self.outages(date)),
            GridTool::GridStatus => render(self.grid_status()),
            GridTool::MarketSnapshot => render(self.market_snapshot(date, args.hub_list())),
            GridTool::Forecasts => render(self.forecasts(date, args.hub_list())),
        }
    }

    /// Latest real-time demand with window statistics.
    pub fn demand(&self, date: Option<&str>, end: Option<&str>) -> ToolResult<DemandSummary> {
        let date = date.unwrap_or(DEFAULT_SNAPSHOT_DATE);
        run_tool("demand", RequestParams::new(date, end), || {
            let query = DataQuery::parse(date, end)?;
            summarize_demand(&self.source.load(&query)?)
        })
    }

    pub fn load_forecast(
        &self,
        date: Option<&str>,
        end: Option<&str>,
        forecast_type: Option<&str>,
    ) -> ToolResult<LoadForecastSummary> {
        let date = date.unwrap_or(DEFAULT_DAY_DATE);
        let forecast_type = forecast_type.unwrap_or(DEFAULT_LOAD_FORECAST_TYPE);
        let request = RequestParams::new(date, end).with_option("forecast_type", forecast_type);
        run_tool("load_forecast", request, || {
            let kind: LoadForecastType = parse_param("forecast_type", forecast_type)?;
            let query = DataQuery::parse(date, end)?;
            let table = self.source.load_forecast(&query, kind)?;
            summarize_load_forecast(&table, &self.policy.total_tac_area)
        })
    }

    /// Generation by fuel for the latest interval.
    pub fn supply_mix(&self, date: Option<&str>, end: Option<&str>) -> ToolResult<FuelMixSummary> {
        let date = date.unwrap_or(DEFAULT_SNAPSHOT_DATE);
        run_tool("supply_mix", RequestParams::new(date, end), || {
            let query = DataQuery::parse(date, end)?;
            summarize_fuel_mix(&self.source.fuel_mix(&query)?, &self.policy.renewable_sources)
        })
    }

    pub fn renewable_generation(
        &self,
        date: Option<&str>,
        end: Option<&str>,
        forecast_type: Option<&str>,
    ) -> ToolResult<RenewableSnapshot> {
        let date = date.unwrap_or(DEFAULT_SNAPSHOT_DATE);
        let forecast_type = forecast_type.unwrap_or(DEFAULT_RENEWABLE_FORECAST_TYPE);
        let request = RequestParams::new(date, end).with_option("forecast_type", forecast_type);
        run_tool("renewable_generation", request, || {
            let kind: RenewableForecastType = parse_param("forecast_type", forecast_type)?;
            let query = DataQuery::parse(date, end)?;
            let table = self.source.renewables(&query, kind)?;
            renewable_snapshot(&table, &self.policy.system_location)
        })
    }

    /// Battery state; negative supply is charging.
    pub fn storage(&self, date: Option<&str>, end: Option<&str>) -> ToolResult<StorageSummary> {
        let date = date.unwrap_or(DEFAULT_SNAPSHOT_DATE);
        run_tool("storage", RequestParams::new(date, end), || {
            let query = DataQuery::parse(date, end)?;
            summarize_storage(&self.source.storage(&query)?)
        })
    }

    /// Load minus solar and wind, with duck-curve position and daily extremes.
    pub fn net_demand(&self, date: Option<&str>, end: Option<&str>) -> ToolResult<NetDemandSnapshot> {
        let date = date.unwrap_or(DEFAULT_SNAPSHOT_DATE);
        run_tool("net_demand", RequestParams::new(date, end), || {
            let query = DataQuery::parse(date, end)?;
            let load = self.source.load(&query)?.to_series(|row| row.load);
            let renewables = self.source.fuel_mix(&query)?.to_series(|row| RenewableOutput {
                solar_mw: row.solar_mw(),
                wind_mw: row.wind_mw(),
            });
            let rows = align2(&load, &renewables)?;
            compute_profile(&rows)?
                .latest()
                .ok_or_else(|| AnalyticsError::empty("net_demand"))
        })
    }

    /// Hourly actual load against the day-ahead forecast, with driver attribution.
    pub fn load_deviation(
        &self,
        date: Option<&str>,
        end: Option<&str>,
    ) -> ToolResult<DeviationAnalysis> {
        let date = date.unwrap_or(DEFAULT_DAY_DATE);
        run_tool("load_deviation", RequestParams::new(date, end), || {
            let query = DataQuery::parse(date, end)?;
            let area = &self.policy.total_tac_area;
            let actual = total_area_load(&self.source.load_hourly(&query)?, area);
            let forecast = total_area_forecast(
                &self.source.load_forecast(&query, LoadForecastType::DayAhead)?,
                area,
            );
            let rows = align2(
                &actual.to_series(|row| row.load),
                &forecast.to_series(|row| row.load_forecast),
            )?;
            analyze(&rows, &DeviationThresholds::from(&self.policy))
        })
    }

    pub fn curtailment(
        &self,
        date: Option<&str>,
        end: Option<&str>,
    ) -> ToolResult<CurtailmentSummary> {
        let date = date.unwrap_or(DEFAULT_SNAPSHOT_DATE);
        run_tool("curtailment", RequestParams::new(date, end), || {
            let query = DataQuery::parse(date, end)?;
            summarize_curtailment(&self.source.curtailment(&query)?)
        })
    }

    /// Intertie flows for the latest interval; negative is an import.
    pub fn tie_flows(&self, date: Option<&str>, end: Option<&str>) -> ToolResult<TieFlowSummary> {
        let date = date.unwrap_or(DEFAULT_SNAPSHOT_DATE);
        run_tool("tie_flows", RequestParams::new(date, end), || {
            let query = DataQuery::parse(date, end)?;
            summarize_tie_flows(&self.source.tie_flows(&query)?)
        })
    }

    pub fn as_prices(
        &self,
        date: Option<&str>,
        end: Option<&str>,
        market: Option<&str>,
    ) -> ToolResult<AsPriceSummary> {
        let date = date.unwrap_or(DEFAULT_DAY_DATE);
        let market = market.unwrap_or(DEFAULT_MARKET);
        let request = RequestParams::new(date, end).with_option("market", market);
        run_tool("as_prices", request, || {
            let market: AsMarket = parse_param("market", market)?;
            let query = DataQuery::parse(date, end)?;
            summarize_as_prices(&self.source.as_prices(&query, market)?)
        })
    }

    pub fn shadow_prices(
        &self,
        date: Option<&str>,
        end: Option<&str>,
        market: Option<&str>,
    ) -> ToolResult<ShadowPriceSummary> {
        let date = date.unwrap_or(DEFAULT_SNAPSHOT_DATE);
        let market = market.unwrap_or(DEFAULT_MARKET);
        let request = RequestParams::new(date, end).with_option("market", market);
        run_tool("shadow_prices", request, || {
            let market: ShadowPriceMarket = parse_param("market", market)?;
            let query = DataQuery::parse(date, end)?;
            summarize_shadow_prices(&self.source.shadow_prices(&query, market)?)
        })
    }

    /// Outage report; defaults to yesterday in the market time zone, the
    /// most recent report normally published.
    pub fn outages(&self, date: Option<&str>) -> ToolResult<OutageSummary> {
        let today = Utc::now().with_timezone(&self.market_tz).date_naive();
        let selector = date.map(str::parse::<DateSelector>);
        let report_date = match selector {
            None | Some(Ok(DateSelector::Latest)) => Ok(previous_day(today)),
            Some(Ok(DateSelector::Today)) => Ok(today),
            Some(Ok(DateSelector::Date(explicit))) => Ok(explicit),
            Some(Err(err)) => Err(err),
        };
        let resolved = report_date
            .as_ref()
            .ok()
            .map(|day| day.format("%Y-%m-%d").to_string());
        let mut request = RequestParams::new(
            date.map(str::to_owned).or_else(|| resolved.clone()).unwrap_or_default(),
            None,
        );
        if let Some(day) = resolved {
            request = request.with_option("report_date", day);
        }
        run_tool("outages", request, || {
            let table = self.source.outages(report_date?)?;
            summarize_outages(&table, self.policy.outage_list_limit)
        })
    }

    pub fn grid_status(&self) -> ToolResult<GridStatus> {
        run_tool("grid_status", RequestParams::default(), || self.source.grid_status())
    }

    /// Latest load, renewables and hub prices. `hubs` accepts shorthand
    /// (`NP15`) or node ids and defaults to the configured hubs.
    pub fn market_snapshot(
        &self,
        date: Option<&str>,
        hubs: Option<Vec<String>>,
    ) -> ToolResult<MarketSnapshot> {
        let date = date.unwrap_or(DEFAULT_SNAPSHOT_DATE);
        let hubs: Vec<String> = hubs
            .unwrap_or_else(|| self.policy.lmp_hubs.clone())
            .iter()
            .map(|hub| resolve_hub_id(hub))
            .collect();
        let request = RequestParams::new(date, None).with_option("hubs", hubs.join(","));
        run_tool("market_snapshot", request, || {
            let query = DataQuery::parse(date, None)?;
            let load = self.source.load(&query)?;
            let fuel_mix = self.source.fuel_mix(&query)?;
            let lmp = self.source.lmp(&query, LmpMarket::RealTime5Min, &hubs)?;
            market_snapshot(&load, &fuel_mix, &lmp, &hubs)
        })
    }

    /// Operator load forecast with hourly day-ahead prices. `locations`
    /// accepts shorthand or node ids and defaults to NP15 and SP15.
    pub fn forecasts(
        &self,
        date: Option<&str>,
        locations: Option<Vec<String>>,
    ) -> ToolResult<DayAheadOutlook> {
        let date = date.unwrap_or(DEFAULT_DAY_DATE);
        let locations: Vec<String> = match locations {
            Some(requested) => requested.iter().map(|loc| resolve_hub_id(loc)).collect(),
            None => DEFAULT_FORECAST_HUBS.iter().map(|loc| resolve_hub_id(loc)).collect(),
        };
        let request = RequestParams::new(date, None).with_option("locations", locations.join(","));
        run_tool("forecasts", request, || {
            let query = DataQuery::parse(date, None)?;
            let forecast = self.source.load_forecast(&query, LoadForecastType::DayAhead)?;
            let prices = self.source.lmp(&query, LmpMarket::DayAheadHourly, &locations)?;
            day_ahead_outlook(&forecast, &prices, &locations, &self.policy.total_tac_area)
        })
    }
}

fn previous_day(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(1)).unwrap_or(date)
}

/// Weather tools over an injected weather source.
#[derive(Debug, Clone)]
pub struct WeatherTools<W> {
    source: W,
}

impl<W: WeatherSource> WeatherTools<W> {
    pub fn new(source: W) -> Self {
        Self { source }
    }

    /// Weighted weather locations relevant to a pricing node.
    pub fn weather_locations(&self, node: &str) -> ToolResult<NodeWeatherProfile> {
        let request = RequestParams::default().with_option("node", node);
        run_tool("weather_locations", request, || weather_locations_for_node(node))
    }

    pub fn temperature_summary(
        &self,
        location: &str,
        date: &str,
    ) -> ToolResult<TemperatureSummary> {
        let request = RequestParams::new(date, None).with_option("location", location);
        run_tool("temperature_summary", request, || {
            let day = crate::query::parse_date(date.trim())?;
            let readings = self.source.hourly_temperature(location, day)?;
            summarize_temperature(&readings)
        })
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;
    use crate::{
        model::{FuelMixRecord, LoadRecord},
        series::test_support::{at_hour, plus_hour},
        source::{InMemoryMarketData, InMemoryWeather},
    };

    fn tools(source: InMemoryMarketData) -> GridTools<InMemoryMarketData> {
        GridTools::new(source, PolicyConfig::default())
    }

    #[test]
    fn tool_names_parse_back() {
        for tool in GridTool::iter() {
            assert_eq!(tool.as_ref().parse::<GridTool>().unwrap(), tool);
        }
        assert_eq!(GridTool::AsPrices.to_string(), "as_prices");
    }

    #[test]
    fn empty_fuel_mix_echoes_date() {
        let value = tools(InMemoryMarketData::default())
            .dispatch(GridTool::SupplyMix, &ToolArgs {
                date: Some("2024-05-01".into()),
                ..ToolArgs::default()
            });
        assert_eq!(value["error"], "No data available");
        assert_eq!(value["date"], "2024-05-01");
    }

    #[test]
    fn bad_forecast_type_is_reported() {
        let err = tools(InMemoryMarketData::default())
            .load_forecast(None, None, Some("week_ahead"))
            .unwrap_err();
        assert_eq!(err.error, "Invalid forecast_type: week_ahead");
        assert_eq!(err.request.date.as_deref(), Some("today"));
        assert_eq!(err.request.option("forecast_type"), Some("week_ahead"));
    }

    #[test]
    fn bad_date_is_an_error_envelope() {
        let err = tools(InMemoryMarketData::default())
            .tie_flows(Some("yesterday-ish"), None)
            .unwrap_err();
        assert_eq!(err.kind, crate::envelope::ErrorKind::InvalidDate);
        assert_eq!(err.request.date.as_deref(), Some("yesterday-ish"));
    }

    #[test]
    fn net_demand_joins_load_and_fuel_mix() {
        let source = InMemoryMarketData {
            load: vec![LoadRecord {
                interval_start: at_hour(12),
                interval_end: plus_hour(at_hour(12)),
                tac_area: None,
                load: 12000.0,
            }],
            fuel_mix: vec![FuelMixRecord {
                interval_start: at_hour(12),
                interval_end: plus_hour(at_hour(12)),
                generation_mw: [("Solar".to_owned(), Some(8000.0)), ("Wind".to_owned(), Some(500.0))]
                    .into_iter()
                    .collect(),
            }],
            ..InMemoryMarketData::default()
        };
        let payload = tools(source).net_demand(None, None).unwrap();
        assert_eq!(payload.data.net_demand_mw, 3500.0);
        assert_eq!(payload.request.date.as_deref(), Some("latest"));
        let value = format_response(&Ok(payload));
        assert_eq!(value["duck_curve_position"], "belly");
    }

    #[test]
    fn outages_default_to_a_resolved_date() {
        let err = tools(InMemoryMarketData::default()).outages(None).unwrap_err();
        let echoed = err.request.date.clone().unwrap();
        assert!(NaiveDate::parse_from_str(&echoed, "%Y-%m-%d").is_ok());
        assert_eq!(err.request.option("report_date"), Some(echoed.as_str()));
        assert_eq!(err.kind, crate::envelope::ErrorKind::NoData);
    }

    #[test]
    fn outages_echo_the_selector_as_given() {
        let grid = tools(InMemoryMarketData::default());
        let value = format_response(&grid.outages(Some("latest")));
        assert_eq!(value["date"], "latest");
        let report_date = value["report_date"].as_str().unwrap();
        assert!(NaiveDate::parse_from_str(report_date, "%Y-%m-%d").is_ok());

        let err = grid.outages(Some("2024-13-40")).unwrap_err();
        assert_eq!(err.request.date.as_deref(), Some("2024-13-40"));
        assert_eq!(err.request.option("report_date"), None);
    }

    #[test]
    fn missing_grid_status_has_no_date() {
        let value = tools(InMemoryMarketData::default()).dispatch(GridTool::GridStatus, &ToolArgs::default());
        assert_eq!(value["kind"], "no_data");
        assert!(value.get("date").is_none());
    }

    #[test]
    fn hub_shorthand_is_resolved_in_echo() {
        let err = tools(InMemoryMarketData::default())
            .market_snapshot(None, Some(vec!["np15".into(), "sp15".into()]))
            .unwrap_err();
        assert_eq!(err.request.option("hubs"), Some("TH_NP15_GEN-APND,TH_SP15_GEN-APND"));
    }

    #[test]
    fn forecasts_default_to_np15_and_sp15() {
        let err = tools(InMemoryMarketData::default()).forecasts(None, None).unwrap_err();
        assert_eq!(err.request.date.as_deref(), Some("today"));
        assert_eq!(
            err.request.option("locations"),
            Some("TH_NP15_GEN-APND,TH_SP15_GEN-APND")
        );
        assert_eq!(err.kind, crate::envelope::ErrorKind::NoData);
    }

    #[test]
    fn weather_tools_wrap_errors() {
        let weather = WeatherTools::new(InMemoryWeather::default());
        let err = weather.weather_locations("PATH15").unwrap_err();
        assert_eq!(err.kind, crate::envelope::ErrorKind::UnknownNode);
        assert_eq!(err.request.option("node"), Some("PATH15"));

        let err = weather.temperature_summary("Fresno, CA", "2024-07-10").unwrap_err();
        assert_eq!(err.kind, crate::envelope::ErrorKind::NoData);
        assert_eq!(weather.weather_locations("ZP26").unwrap().data.zone, "ZP26");
    }
}
