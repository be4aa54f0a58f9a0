//! ---
//! gp_section: "01-core-functionality"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Configuration loading and analysis policy."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::LogFormat;

/// Deviation magnitude above which an hour is flagged significant (MW, exclusive).
pub const DEFAULT_SIGNIFICANCE_THRESHOLD_MW: f64 = 2000.0;
/// Window-mean magnitude used by the temperature and solar driver rules (MW).
pub const DEFAULT_DRIVER_WINDOW_THRESHOLD_MW: f64 = 500.0;
/// Midday window-mean magnitude used by the behind-the-meter solar rule (MW).
pub const DEFAULT_MIDDAY_THRESHOLD_MW: f64 = 1500.0;
/// Number of outage entries echoed back in an outage report.
pub const DEFAULT_OUTAGE_LIST_LIMIT: usize = 20;

fn default_significance_threshold() -> f64 {
    DEFAULT_SIGNIFICANCE_THRESHOLD_MW
}

fn default_driver_window_threshold() -> f64 {
    DEFAULT_DRIVER_WINDOW_THRESHOLD_MW
}

fn default_midday_threshold() -> f64 {
    DEFAULT_MIDDAY_THRESHOLD_MW
}

fn default_outage_list_limit() -> usize {
    DEFAULT_OUTAGE_LIST_LIMIT
}

fn default_total_tac_area() -> String {
    "CA ISO-TAC".to_owned()
}

fn default_system_location() -> String {
    "CAISO".to_owned()
}

fn default_renewable_sources() -> Vec<String> {
    ["Solar", "Wind", "Small Hydro", "Biogas", "Biomass", "Geothermal"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn default_market_timezone() -> String {
    "America/Los_Angeles".to_owned()
}

fn default_lmp_hubs() -> Vec<String> {
    vec!["TH_NP15_GEN-APND".to_owned(), "TH_SP15_GEN-APND".to_owned()]
}

fn default_data_directory() -> PathBuf {
    PathBuf::from("data")
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

/// Primary configuration object for GridPilot tools and binaries.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &'static str = "GRIDPILOT_CONFIG";

    /// Load configuration from disk, respecting the `GRIDPILOT_CONFIG` override.
    ///
    /// Unlike a daemon, the tools run fine on defaults, so a missing file
    /// yields [`AppConfig::default`] instead of an error.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the effective source path, if any.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            let path = candidate.as_ref();
            if path.exists() {
                let config = Self::from_path(path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path.to_path_buf()),
                });
            }
        }

        debug!("no configuration file found, using defaults");
        Ok(LoadedAppConfig {
            config: AppConfig::default(),
            source: None,
        })
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse::<AppConfig>()
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.policy.validate()
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
    /// Also write JSON logs to a daily rolling file under `directory`.
    #[serde(default)]
    pub rolling_file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
            rolling_file: false,
        }
    }
}

/// Location of file-backed market and weather fixtures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_directory")]
    pub directory: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            directory: default_data_directory(),
        }
    }
}

/// Tunable analysis policy.
///
/// The MW thresholds have no physical derivation; they are heuristics kept
/// stable so driver attributions stay comparable between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfig {
    #[serde(default = "default_significance_threshold")]
    pub significance_threshold_mw: f64,
    #[serde(default = "default_driver_window_threshold")]
    pub driver_window_threshold_mw: f64,
    #[serde(default = "default_midday_threshold")]
    pub midday_threshold_mw: f64,
    #[serde(default = "default_outage_list_limit")]
    pub outage_list_limit: usize,
    /// TAC area name carrying the system-wide total in load tables.
    #[serde(default = "default_total_tac_area")]
    pub total_tac_area: String,
    /// Location name carrying the system-wide total in renewable tables.
    #[serde(default = "default_system_location")]
    pub system_location: String,
    #[serde(default = "default_renewable_sources")]
    pub renewable_sources: Vec<String>,
    #[serde(default = "default_lmp_hubs")]
    pub lmp_hubs: Vec<String>,
    /// IANA zone the market publishes in; used to pick default report dates.
    #[serde(default = "default_market_timezone")]
    pub market_timezone: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            significance_threshold_mw: default_significance_threshold(),
            driver_window_threshold_mw: default_driver_window_threshold(),
            midday_threshold_mw: default_midday_threshold(),
            outage_list_limit: default_outage_list_limit(),
            total_tac_area: default_total_tac_area(),
            system_location: default_system_location(),
            renewable_sources: default_renewable_sources(),
            lmp_hubs: default_lmp_hubs(),
            market_timezone: default_market_timezone(),
        }
    }
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("significance_threshold_mw", self.significance_threshold_mw),
            ("driver_window_threshold_mw", self.driver_window_threshold_mw),
            ("midday_threshold_mw", self.midday_threshold_mw),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(anyhow!("policy.{} must be a positive number", name));
            }
        }
        if self.renewable_sources.is_empty() {
            return Err(anyhow!("policy.renewable_sources cannot be empty"));
        }
        self.timezone()?;
        Ok(())
    }

    /// Parsed [`PolicyConfig::market_timezone`].
    pub fn timezone(&self) -> Result<Tz> {
        self.market_timezone
            .parse::<Tz>()
            .map_err(|err| anyhow!("policy.market_timezone is invalid: {}", err))
    }

    pub fn is_renewable(&self, fuel: &str) -> bool {
        self.renewable_sources.iter().any(|source| source == fuel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_policy() {
        let policy = PolicyConfig::default();
        assert_eq!(policy.significance_threshold_mw, 2000.0);
        assert_eq!(policy.driver_window_threshold_mw, 500.0);
        assert_eq!(policy.midday_threshold_mw, 1500.0);
        assert_eq!(policy.outage_list_limit, 20);
        assert!(policy.is_renewable("Geothermal"));
        assert!(!policy.is_renewable("Natural Gas"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: AppConfig = r#"
            [policy]
            significance_threshold_mw = 1500.0

            [data]
            directory = "fixtures/caiso"
        "#
        .parse()
        .unwrap();
        assert_eq!(config.policy.significance_threshold_mw, 1500.0);
        assert_eq!(config.policy.midday_threshold_mw, 1500.0);
        assert_eq!(config.data.directory, PathBuf::from("fixtures/caiso"));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn rejects_non_positive_thresholds() {
        let err = "[policy]\ndriver_window_threshold_mw = 0.0\n"
            .parse::<AppConfig>()
            .unwrap_err();
        assert!(format!("{err:#}").contains("driver_window_threshold_mw"));
    }

    #[test]
    fn rejects_empty_renewable_list() {
        let err = "[policy]\nrenewable_sources = []\n"
            .parse::<AppConfig>()
            .unwrap_err();
        assert!(format!("{err:#}").contains("renewable_sources"));
    }

    #[test]
    fn rejects_unknown_timezone() {
        let err = "[policy]\nmarket_timezone = \"Mars/Olympus\"\n"
            .parse::<AppConfig>()
            .unwrap_err();
        assert!(format!("{err:#}").contains("market_timezone"));
        assert_eq!(
            PolicyConfig::default().timezone().unwrap(),
            chrono_tz::America::Los_Angeles
        );
    }

    #[test]
    fn first_existing_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let present = dir.path().join("gridpilot.toml");
        fs::write(&present, "[policy]\noutage_list_limit = 5\n").unwrap();

        let loaded = AppConfig::load_with_source(&[missing, present.clone()]).unwrap();
        assert_eq!(loaded.source.as_deref(), Some(present.as_path()));
        assert_eq!(loaded.config.policy.outage_list_limit, 5);
    }

    #[test]
    fn no_candidates_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppConfig::load_with_source(&[dir.path().join("nope.toml")]).unwrap();
        assert!(loaded.source.is_none());
        assert_eq!(loaded.config.policy, PolicyConfig::default());
    }
}
