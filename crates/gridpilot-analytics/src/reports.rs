//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Writes rendered tool responses to disk as JSON reports."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::errors::Result;

/// One rendered tool response, success or error envelope alike.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolReport {
    pub tool: String,
    pub response: Value,
}

impl ToolReport {
    pub fn new(tool: impl Into<String>, response: Value) -> Self {
        Self {
            tool: tool.into(),
            response,
        }
    }

    pub fn is_error(&self) -> bool {
        self.response.get("error").is_some()
    }
}

#[derive(Debug)]
pub struct ReportExporter<'a> {
    generated_at: DateTime<Utc>,
    reports: &'a [ToolReport],
}

impl<'a> ReportExporter<'a> {
    pub fn new(reports: &'a [ToolReport]) -> Self {
        Self {
            generated_at: Utc::now(),
            reports,
        }
    }

    /// Write `<tool>.json` for each report and return the written paths.
    pub fn export_all(&self, output_dir: &Path) -> Result<Vec<PathBuf>> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }

        let generated_at = self.generated_at.to_rfc3339();
        let mut written = Vec::with_capacity(self.reports.len());
        for report in self.reports {
            let path = output_dir.join(format!("{}.json", report.tool));
            write_json(&path, &ReportEnvelope::new(&generated_at, report))?;
            written.push(path);
        }

        info!("{} reports exported to {}", written.len(), output_dir.display());
        Ok(written)
    }
}

#[derive(Debug, Serialize)]
struct ReportEnvelope<'a> {
    generated_at: &'a str,
    tool: &'a str,
    response: &'a Value,
}

impl<'a> ReportEnvelope<'a> {
    fn new(generated_at: &'a str, report: &'a ToolReport) -> Self {
        Self {
            generated_at,
            tool: &report.tool,
            response: &report.response,
        }
    }
}

fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let serialized = serde_json::to_string_pretty(value)?;
    fs::write(path, serialized)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn writes_one_file_per_tool() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("reports");
        let reports = vec![
            ToolReport::new("tie_flows", json!({"date": "latest", "net_interchange_mw": -3000.0})),
            ToolReport::new("supply_mix", json!({"error": "No data available", "date": "latest"})),
        ];
        let written = ReportExporter::new(&reports).export_all(&out).unwrap();
        assert_eq!(written.len(), 2);
        assert!(!reports[0].is_error());
        assert!(reports[1].is_error());

        let raw = fs::read_to_string(out.join("tie_flows.json")).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["tool"], "tie_flows");
        assert_eq!(value["response"]["net_interchange_mw"], -3000.0);
        assert!(value["generated_at"].is_string());
    }
}
