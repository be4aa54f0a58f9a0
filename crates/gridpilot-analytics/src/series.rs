//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Interval, series, and raw table containers."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
//! Time-indexed containers.
//!
//! A [`Series`] holds one measured quantity and must be sorted and unique on
//! interval start; the aligner checks this before joining. A [`Table`] holds
//! raw rows that may share a start (one row per interface, region, fuel...)
//! and is only ever reduced or filtered into a series.

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};

use crate::errors::{AnalyticsError, Result};

/// Market timestamps keep the offset they were published with.
pub type Timestamp = DateTime<FixedOffset>;

/// Half-open `[start, end)` interval carrying a measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval<T> {
    pub start: Timestamp,
    pub end: Timestamp,
    pub value: T,
}

impl<T> Interval<T> {
    pub fn new(start: Timestamp, end: Timestamp, value: T) -> Self {
        Self { start, end, value }
    }

    /// Local hour of day of the interval start.
    pub fn hour(&self) -> u32 {
        self.start.hour()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series<T> {
    name: String,
    intervals: Vec<Interval<T>>,
}

impl<T> Series<T> {
    pub fn new(name: impl Into<String>, intervals: Vec<Interval<T>>) -> Self {
        Self {
            name: name.into(),
            intervals,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn intervals(&self) -> &[Interval<T>] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn last(&self) -> Option<&Interval<T>> {
        self.intervals.last()
    }

    /// Check `start < end` on every interval and strictly ascending starts.
    pub fn validate(&self) -> Result<()> {
        let mut previous: Option<&Timestamp> = None;
        for (index, interval) in self.intervals.iter().enumerate() {
            if interval.start >= interval.end {
                return Err(self.malformed(
                    index,
                    format!(
                        "interval start {} is not before end {}",
                        interval.start.to_rfc3339(),
                        interval.end.to_rfc3339()
                    ),
                ));
            }
            if let Some(prev) = previous {
                if interval.start == *prev {
                    return Err(self.malformed(
                        index,
                        format!("duplicate interval start {}", interval.start.to_rfc3339()),
                    ));
                }
                if interval.start < *prev {
                    return Err(self.malformed(
                        index,
                        format!(
                            "interval start {} precedes {}",
                            interval.start.to_rfc3339(),
                            prev.to_rfc3339()
                        ),
                    ));
                }
            }
            previous = Some(&interval.start);
        }
        Ok(())
    }

    fn malformed(&self, index: usize, detail: String) -> AnalyticsError {
        AnalyticsError::MalformedSeries {
            series: self.name.clone(),
            index,
            detail,
        }
    }
}

/// Rows that carry their own interval bounds.
pub trait Stamped {
    fn interval_start(&self) -> Timestamp;
    fn interval_end(&self) -> Timestamp;
}

/// A named batch of raw rows as delivered by a data source.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R> {
    name: String,
    rows: Vec<R>,
}

impl<R> Table<R> {
    pub fn new(name: impl Into<String>, rows: Vec<R>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Last row in delivery order.
    pub fn last(&self) -> Option<&R> {
        self.rows.last()
    }

    /// Fail with `NoData` when the table has no rows.
    pub fn require_rows(&self) -> Result<&[R]> {
        if self.rows.is_empty() {
            return Err(AnalyticsError::empty(self.name.clone()));
        }
        Ok(&self.rows)
    }

    /// Keep matching rows; falls back to the whole table when nothing matches.
    pub fn filter_or_all(&self, predicate: impl Fn(&R) -> bool) -> Table<R>
    where
        R: Clone,
    {
        let selected: Vec<R> = self.rows.iter().filter(|r| predicate(r)).cloned().collect();
        if selected.is_empty() {
            return self.clone();
        }
        Table::new(self.name.clone(), selected)
    }
}

impl<R: Stamped> Table<R> {
    /// Greatest interval start present in the table.
    pub fn latest_start(&self) -> Option<Timestamp> {
        self.rows.iter().map(Stamped::interval_start).max()
    }

    /// Rows sharing the given interval start, in delivery order.
    pub fn rows_at(&self, start: Timestamp) -> impl Iterator<Item = &R> + '_ {
        self.rows
            .iter()
            .filter(move |row| row.interval_start() == start)
    }

    /// Project the rows into a series keeping delivery order.
    pub fn to_series<T>(&self, value: impl Fn(&R) -> T) -> Series<T> {
        let intervals = self
            .rows
            .iter()
            .map(|row| Interval::new(row.interval_start(), row.interval_end(), value(row)))
            .collect();
        Series::new(self.name.clone(), intervals)
    }
}
