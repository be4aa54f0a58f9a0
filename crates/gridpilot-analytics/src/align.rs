//! ---
//! gp_section: "08-grid-analytics"
//! gp_subsection: "module"
//! gp_type: "source"
//! gp_scope: "code"
//! gp_description: "Inner join of time-indexed series on interval start."
//! gp_version: "v0.1.0"
//! gp_owner: "grid-analytics"
//! ---
//! Series alignment.
//!
//! Rows are joined on exact equality of the interval start instant. No zone
//! conversion happens here: two timestamps written with different offsets
//! join when they denote the same instant.

use std::cmp::Ordering;

use gridpilot_logging::{gp_warn, ToolLogContext};
use serde::Serialize;

use crate::{
    errors::{AnalyticsError, NoDataReason, Result},
    series::{Series, Timestamp},
};

/// Values from every joined series sharing one interval start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedRow<V> {
    pub start: Timestamp,
    /// End of the first series' interval.
    pub end: Timestamp,
    pub values: V,
}

/// Join two series; rows missing from either side are dropped.
pub fn align2<A: Clone, B: Clone>(a: &Series<A>, b: &Series<B>) -> Result<Vec<AlignedRow<(A, B)>>> {
    check_inputs(&[(a.name(), a.is_empty()), (b.name(), b.is_empty())])?;
    validated(a)?;
    validated(b)?;

    let rows = merge_join(a, b, |left, right| (left.clone(), right.clone()));
    finish(rows, &[a.name(), b.name()])
}

/// Join three series, e.g. load with solar and wind.
pub fn align3<A: Clone, B: Clone, C: Clone>(
    a: &Series<A>,
    b: &Series<B>,
    c: &Series<C>,
) -> Result<Vec<AlignedRow<(A, B, C)>>> {
    check_inputs(&[
        (a.name(), a.is_empty()),
        (b.name(), b.is_empty()),
        (c.name(), c.is_empty()),
    ])?;
    validated(a)?;
    validated(b)?;
    validated(c)?;

    let ab = merge_join(a, b, |left, right| (left.clone(), right.clone()));
    let ab = Series::new(
        a.name(),
        ab.into_iter()
            .map(|row| crate::series::Interval::new(row.start, row.end, row.values))
            .collect(),
    );
    let rows = merge_join(&ab, c, |(left, middle), right| {
        (left.clone(), middle.clone(), right.clone())
    });
    finish(rows, &[a.name(), b.name(), c.name()])
}

fn check_inputs(inputs: &[(&str, bool)]) -> Result<()> {
    let empty: Vec<String> = inputs
        .iter()
        .filter(|(_, is_empty)| *is_empty)
        .map(|(name, _)| (*name).to_owned())
        .collect();
    if empty.is_empty() {
        return Ok(());
    }
    Err(AnalyticsError::NoData {
        series: empty,
        reason: NoDataReason::Empty,
    })
}

fn validated<T>(series: &Series<T>) -> Result<()> {
    if let Err(err) = series.validate() {
        gp_warn!(
            context = ToolLogContext::new().with_series(series.name()),
            "upstream series violates ordering contract: {err}"
        );
        return Err(err);
    }
    Ok(())
}

/// Two-pointer merge over start instants; both inputs are sorted and unique.
fn merge_join<A, B, V>(
    a: &Series<A>,
    b: &Series<B>,
    combine: impl Fn(&A, &B) -> V,
) -> Vec<AlignedRow<V>> {
    let (left, right) = (a.intervals(), b.intervals());
    let mut rows = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].start.cmp(&right[j].start) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                rows.push(AlignedRow {
                    start: left[i].start,
                    end: left[i].end,
                    values: combine(&left[i].value, &right[j].value),
                });
                i += 1;
                j += 1;
            }
        }
    }
    rows
}

fn finish<V>(rows: Vec<AlignedRow<V>>, names: &[&str]) -> Result<Vec<AlignedRow<V>>> {
    if rows.is_empty() {
        return Err(AnalyticsError::NoData {
            series: names.iter().map(|name| (*name).to_owned()).collect(),
            reason: NoDataReason::NoOverlap,
        });
    }
    Ok(rows)
}
