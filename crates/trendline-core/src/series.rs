// File: crates/trendline-core/src/series.rs
// Summary: Point/record model and the sorted, in-place replaceable Series.
// Notes:
// - Records are the loose input contract (timestamp + named numeric fields);
//   Points are what the chart plots. Conversion picks the configured field,
//   falls back to `price`, and drops anything without a finite value.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field read when no `y_key` is configured.
pub const DEFAULT_Y_KEY: &str = "value";
/// Secondary field consulted when the configured one is missing.
pub const FALLBACK_Y_KEY: &str = "price";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Point {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Timestamp as epoch milliseconds.
    #[inline]
    pub fn millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

/// One input sample: a timestamp plus arbitrary named fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(alias = "date")]
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl Record {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self { timestamp, fields: BTreeMap::new() }
    }

    /// Builder-style numeric field setter.
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.fields.insert(key.into(), serde_json::Value::from(value));
        self
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.fields
            .get(key)
            .and_then(serde_json::Value::as_f64)
            .filter(|v| v.is_finite())
    }

    /// Value under `key`, or under `price` when `key` is absent or not numeric.
    pub fn value_for(&self, key: &str) -> Option<f64> {
        self.number(key).or_else(|| self.number(FALLBACK_Y_KEY))
    }

    pub fn to_point(&self, key: &str) -> Option<Point> {
        self.value_for(key).map(|v| Point::new(self.timestamp, v))
    }
}

/// Result of converting records: usable points plus how many were dropped.
#[derive(Clone, Debug, Default)]
pub struct Conversion {
    pub points: Vec<Point>,
    pub skipped: usize,
}

pub fn convert_records(records: &[Record], key: &str) -> Conversion {
    let mut out = Conversion { points: Vec::with_capacity(records.len()), skipped: 0 };
    for r in records {
        match r.to_point(key) {
            Some(p) => out.points.push(p),
            None => out.skipped += 1,
        }
    }
    out
}

/// Points sorted ascending by timestamp.
#[derive(Clone, Debug, Default)]
pub struct Series {
    points: Vec<Point>,
}

impl Series {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(mut points: Vec<Point>) -> Self {
        points.retain(|p| p.value.is_finite());
        points.sort_by_key(|p| p.timestamp);
        Self { points }
    }

    /// Replace the contents while keeping this series (and its buffer).
    pub fn replace(&mut self, points: impl IntoIterator<Item = Point>) {
        self.points.clear();
        self.points.extend(points.into_iter().filter(|p| p.value.is_finite()));
        // stable: equal timestamps keep input order
        self.points.sort_by_key(|p| p.timestamp);
    }

    pub fn points(&self) -> &[Point] { &self.points }
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }
    pub fn first(&self) -> Option<&Point> { self.points.first() }
    pub fn last(&self) -> Option<&Point> { self.points.last() }

    /// Latest timestamp, i.e. the anchor of every lookback preset.
    pub fn latest(&self) -> Option<DateTime<Utc>> {
        self.points.last().map(|p| p.timestamp)
    }

    /// `(earliest, latest)` timestamps.
    pub fn extent(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.points.first()?.timestamp, self.points.last()?.timestamp))
    }

    /// Points whose timestamp lies in `[start, end]` (inclusive).
    pub fn within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> &[Point] {
        let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
        let a = self.points.partition_point(|p| p.timestamp < lo);
        let b = self.points.partition_point(|p| p.timestamp <= hi);
        &self.points[a..b.max(a)]
    }

    /// Min/max value over a slice of points.
    pub fn value_range(points: &[Point]) -> Option<(f64, f64)> {
        let mut it = points.iter();
        let first = it.next()?;
        let init = (first.value, first.value);
        Some(it.fold(init, |(lo, hi), p| (lo.min(p.value), hi.max(p.value))))
    }
}
