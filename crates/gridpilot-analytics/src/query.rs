//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Date selectors and enumerated tool parameters."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::errors::{AnalyticsError, Result};

/// Which slice of a dataset a tool asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSelector {
    Latest,
    Today,
    Date(NaiveDate),
}

impl DateSelector {
    pub fn explicit(&self) -> Option<NaiveDate> {
        match self {
            DateSelector::Date(date) => Some(*date),
            DateSelector::Latest | DateSelector::Today => None,
        }
    }
}

impl FromStr for DateSelector {
    type Err = AnalyticsError;

    fn from_str(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("latest") {
            return Ok(DateSelector::Latest);
        }
        if trimmed.eq_ignore_ascii_case("today") {
            return Ok(DateSelector::Today);
        }
        parse_date(trimmed).map(DateSelector::Date)
    }
}

impl fmt::Display for DateSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateSelector::Latest => f.write_str("latest"),
            DateSelector::Today => f.write_str("today"),
            DateSelector::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Date selection handed to every [`crate::source::MarketDataSource`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataQuery {
    pub date: DateSelector,
    pub end: Option<NaiveDate>,
}

impl DataQuery {
    pub fn new(date: DateSelector) -> Self {
        Self { date, end: None }
    }

    pub fn latest() -> Self {
        Self::new(DateSelector::Latest)
    }

    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Parse the raw tool arguments.
    pub fn parse(date: &str, end: Option<&str>) -> Result<Self> {
        let date = date.parse::<DateSelector>()?;
        let end = end.map(|raw| parse_date(raw.trim())).transpose()?;
        Ok(Self { date, end })
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AnalyticsError::InvalidDate(value.to_owned()))
}

/// Parse an enumerated tool parameter, reporting the rejected value.
pub fn parse_param<T: FromStr>(parameter: &'static str, value: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|_| AnalyticsError::UnknownFuelOrForecastType {
            parameter,
            value: value.to_owned(),
        })
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr, EnumIter,
)]
pub enum LoadForecastType {
    #[strum(serialize = "day_ahead")]
    #[serde(rename = "day_ahead")]
    DayAhead,
    #[strum(serialize = "hour_ahead_15min")]
    #[serde(rename = "hour_ahead_15min")]
    HourAhead15Min,
    #[strum(serialize = "hour_ahead_5min")]
    #[serde(rename = "hour_ahead_5min")]
    HourAhead5Min,
    #[strum(serialize = "two_day_ahead")]
    #[serde(rename = "two_day_ahead")]
    TwoDayAhead,
    #[strum(serialize = "seven_day_ahead")]
    #[serde(rename = "seven_day_ahead")]
    SevenDayAhead,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RenewableForecastType {
    Actual,
    DayAhead,
    Hasp,
    Rtpd,
    Rtd,
}

/// Ancillary service market run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AsMarket {
    Dam,
    Hasp,
}

/// Market run a nomogram/branch shadow price was published for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ShadowPriceMarket {
    Dam,
    Hasp,
    Rtm,
}

/// Market run an LMP was settled in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr, EnumIter,
)]
pub enum LmpMarket {
    #[strum(serialize = "DAY_AHEAD_HOURLY")]
    #[serde(rename = "DAY_AHEAD_HOURLY")]
    DayAheadHourly,
    #[strum(serialize = "REAL_TIME_5_MIN")]
    #[serde(rename = "REAL_TIME_5_MIN")]
    RealTime5Min,
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn selectors_parse_keywords_and_dates() {
        assert_eq!("latest".parse::<DateSelector>().unwrap(), DateSelector::Latest);
        assert_eq!("Today".parse::<DateSelector>().unwrap(), DateSelector::Today);
        let explicit = "2024-05-01".parse::<DateSelector>().unwrap();
        assert_eq!(explicit.to_string(), "2024-05-01");
        assert_eq!(explicit.explicit(), NaiveDate::from_ymd_opt(2024, 5, 1));
    }

    #[test]
    fn bad_date_is_reported_verbatim() {
        let err = "05/01/2024".parse::<DateSelector>().unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidDate(ref v) if v == "05/01/2024"));
        assert!(DataQuery::parse("latest", Some("tomorrow")).is_err());
    }

    #[test]
    fn query_parses_end() {
        let query = DataQuery::parse("2024-05-01", Some("2024-05-03")).unwrap();
        assert_eq!(query.end, NaiveDate::from_ymd_opt(2024, 5, 3));
    }

    #[test]
    fn forecast_types_round_trip_through_labels() {
        for kind in LoadForecastType::iter() {
            let parsed: LoadForecastType = parse_param("forecast_type", kind.as_ref()).unwrap();
            assert_eq!(parsed, kind);
        }
        assert_eq!(LoadForecastType::HourAhead15Min.to_string(), "hour_ahead_15min");
        assert_eq!(RenewableForecastType::DayAhead.to_string(), "day_ahead");
        assert_eq!(ShadowPriceMarket::Rtm.to_string(), "RTM");
        assert_eq!(LmpMarket::DayAheadHourly.as_ref(), "DAY_AHEAD_HOURLY");
        assert_eq!("REAL_TIME_5_MIN".parse::<LmpMarket>().unwrap(), LmpMarket::RealTime5Min);
    }

    #[test]
    fn unknown_parameter_names_the_value() {
        let err = parse_param::<AsMarket>("market", "RTM").unwrap_err();
        assert_eq!(err.to_string(), "Invalid market: RTM");
        let err = parse_param::<LoadForecastType>("forecast_type", "week_ahead").unwrap_err();
        assert_eq!(err.to_string(), "Invalid forecast_type: week_ahead");
    }
}
