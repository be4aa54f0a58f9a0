//! ---
//! gp_section: "15-testing-qa"
//! gp_subsection: "integration-tests"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Tools driven from fixture directories on disk."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use std::fs;

use gridpilot_analytics::{
    FileMarketDataSource, FileWeatherSource, GridTool, GridTools, ReportExporter, ToolArgs,
    ToolReport, WeatherTools,
};
use gridpilot_common::PolicyConfig;
use serde_json::{json, Value};
use tempfile::TempDir;

const TIE_FLOWS: &str = r#"[
    {"Interval Start": "2024-04-30T20:00:00-07:00", "Interval End": "2024-04-30T21:00:00-07:00", "Interface ID": "MALIN500", "MW": 1200.0},
    {"Interval Start": "2024-05-01T13:00:00-07:00", "Interval End": "2024-05-01T14:00:00-07:00", "Interface ID": "MALIN500", "Tie Name": "Malin", "MW": -2500.0},
    {"Interval Start": "2024-05-01T14:00:00-07:00", "Interval End": "2024-05-01T15:00:00-07:00", "Interface ID": "MALIN500", "Tie Name": "Malin", "MW": -2200.0},
    {"Interval Start": "2024-05-01T14:00:00-07:00", "Interval End": "2024-05-01T15:00:00-07:00", "Interface ID": "PALOVRDE", "Tie Name": "Palo Verde", "MW": -800.0}
]"#;

const OUTAGES: &str = r#"{"Report Date": "2024-05-01", "Resource Name": "DIABLO_7_UNIT 1", "Outage Type": "Forced", "Curtailment MW": 1100.0}
{"Report Date": "2024-05-01", "Resource Name": "ALAMIT_7_UNIT 3", "Curtailment MW": 320.0}
{"Report Date": "2024-04-30", "Resource Name": "MOSSLD_2_PSP1", "Outage Type": "Planned", "Curtailment MW": 500.0}
"#;

const WEATHER: &str = r#"[
    {"location": "Fresno, CA", "time": "2024-07-10T12:00:00", "temperature_c": 36.5},
    {"location": "Fresno, CA", "time": "2024-07-10T06:00:00", "temperature_c": 22.0},
    {"location": "Fresno, CA", "time": "2024-07-10T18:00:00", "temperature_c": 39.0},
    {"location": "Sacramento, CA", "time": "2024-07-10T12:00:00", "temperature_c": 33.0}
]"#;

fn fixtures() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tie_flows.json"), TIE_FLOWS).unwrap();
    fs::write(dir.path().join("outages.jsonl"), OUTAGES).unwrap();
    fs::write(dir.path().join("weather.json"), WEATHER).unwrap();
    fs::write(
        dir.path().join("grid_status.json"),
        r#"{"status": "Normal", "time": "2024-05-01T14:05:00-07:00", "reserves": 4200.0}"#,
    )
    .unwrap();
    dir
}

fn grid(dir: &TempDir) -> GridTools<FileMarketDataSource> {
    gridpilot_logging::init();
    GridTools::new(FileMarketDataSource::new(dir.path()), PolicyConfig::default())
}

#[test]
fn latest_tie_flows_come_from_the_last_interval() {
    let dir = fixtures();
    let value = grid(&dir).dispatch(GridTool::TieFlows, &ToolArgs::default());
    assert_eq!(value["net_interchange_mw"], -3000.0);
    assert_eq!(value["net_direction"], "net_import");
    assert_eq!(value["interfaces"].as_array().unwrap().len(), 2);
    assert_eq!(value["interfaces"][1]["tie_name"], "Palo Verde");
}

#[test]
fn explicit_date_restricts_rows() {
    let dir = fixtures();
    let args = ToolArgs {
        date: Some("2024-04-30".to_owned()),
        ..ToolArgs::default()
    };
    let value = grid(&dir).dispatch(GridTool::TieFlows, &args);
    assert_eq!(value["net_interchange_mw"], 1200.0);
    assert_eq!(value["net_direction"], "net_export");
    assert_eq!(value["date"], "2024-04-30");
}

#[test]
fn outages_group_missing_type_as_unknown() {
    let dir = fixtures();
    let summary = grid(&dir).outages(Some("2024-05-01")).unwrap();
    assert_eq!(summary.data.outage_count, 2);
    assert_eq!(summary.data.total_curtailed_mw, 1420.0);
    assert_eq!(summary.data.outages_by_type.get("Unknown"), Some(&320.0));
    assert_eq!(summary.data.outages_by_type.get("Forced"), Some(&1100.0));
    assert_eq!(summary.request.date.as_deref(), Some("2024-05-01"));
}

#[test]
fn grid_status_is_passed_through() {
    let dir = fixtures();
    let value = grid(&dir).dispatch(GridTool::GridStatus, &ToolArgs::default());
    assert_eq!(value["status"], "Normal");
    assert_eq!(value["reserves"], 4200.0);
}

#[test]
fn corrupt_fixture_is_a_source_error() {
    let dir = fixtures();
    fs::write(dir.path().join("storage.json"), "{not json").unwrap();
    let value = grid(&dir).dispatch(GridTool::Storage, &ToolArgs::default());
    assert_eq!(value["kind"], "source_unavailable");
    assert!(value["error"].as_str().unwrap().contains("storage.json"));
}

#[test]
fn temperature_summary_reads_weather_file() {
    let dir = fixtures();
    let weather = WeatherTools::new(FileWeatherSource::new(dir.path()));
    let summary = weather.temperature_summary("fresno, ca", "2024-07-10").unwrap();
    assert_eq!(summary.data.max_temp, 39.0);
    assert_eq!(summary.data.min_temp, 22.0);
    assert_eq!(summary.data.noon_temp, Some(36.5));
    assert_eq!(summary.data.evening_peak_temp_1800, Some(39.0));
    assert_eq!(summary.request.option("location"), Some("fresno, ca"));
}

#[test]
fn reports_capture_success_and_error_envelopes() {
    let dir = fixtures();
    let tools = grid(&dir);
    let reports = vec![
        ToolReport::new("tie_flows", tools.dispatch(GridTool::TieFlows, &ToolArgs::default())),
        ToolReport::new("supply_mix", tools.dispatch(GridTool::SupplyMix, &ToolArgs::default())),
    ];
    let out = dir.path().join("reports");
    ReportExporter::new(&reports).export_all(&out).unwrap();

    let saved: Value =
        serde_json::from_str(&fs::read_to_string(out.join("supply_mix.json")).unwrap()).unwrap();
    assert_eq!(saved["response"]["error"], "No data available");
    assert_eq!(saved["response"]["series"], json!(["fuel_mix"]));
}
