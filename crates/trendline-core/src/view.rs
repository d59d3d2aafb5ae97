// File: crates/trendline-core/src/view.rs
// View state: visible time window, value domain and the helpers for presets, pan and autoscale.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::preset::{RangePreset, MS_PER_DAY};
use crate::series::{Point, Series};

/// Relative padding applied above and below the visible value range.
pub const VALUE_PAD_RATIO: f64 = 0.02;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ViewWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window used while there is no data: the first day of the epoch.
    pub fn placeholder() -> Self {
        let start = DateTime::<Utc>::default();
        Self::new(start, start + Duration::milliseconds(MS_PER_DAY))
    }

    /// Resolve the window a preset selects. `None` for an empty series.
    pub fn from_preset(preset: RangePreset, series: &Series) -> Option<Self> {
        let latest = series.latest()?;
        match preset.lookback_ms() {
            Some(ms) => Some(Self::new(latest - Duration::milliseconds(ms), latest)),
            None => series.extent().map(|(a, b)| Self::new(a, b)),
        }
    }

    pub fn span_ms(&self) -> i64 {
        self.end.timestamp_millis() - self.start.timestamp_millis()
    }

    /// Shift both edges by `ms` (negative moves earlier). `None` when either
    /// edge would leave the representable range.
    pub fn shifted(&self, ms: i64) -> Option<Self> {
        let d = Duration::try_milliseconds(ms)?;
        Some(Self::new(self.start.checked_add_signed(d)?, self.end.checked_add_signed(d)?))
    }

    /// Pan by a pixel delta over a plot of `plot_width` pixels. Dragging right
    /// (positive `dx`) moves the window earlier. Offsets truncate to whole
    /// milliseconds; nothing clamps the result to the data extent, only to
    /// the instants chrono can represent.
    pub fn pan_by_pixels(&self, dx: f64, plot_width: f64) -> Self {
        let plot_w = plot_width.max(1.0);
        let wanted = -(dx / plot_w * self.span_ms() as f64).trunc();
        let (lo, hi) = pan_bounds_ms();
        let earliest = (lo - self.start.timestamp_millis()).min(0);
        let latest = (hi - self.end.timestamp_millis()).max(0);
        let ms = if wanted.is_nan() { 0 } else { wanted.clamp(earliest as f64, latest as f64) as i64 };
        if ms as f64 != wanted {
            debug!(dx, wanted, applied = ms, "pan offset saturated");
        }
        self.shifted(ms).unwrap_or(*self)
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t >= self.start && t <= self.end
    }
}

/// Instants a panned window may reach. A year of slack at each end keeps
/// calendar tick stepping inside chrono's range.
fn pan_bounds_ms() -> (i64, i64) {
    let slack = 366 * MS_PER_DAY;
    (
        DateTime::<Utc>::MIN_UTC.timestamp_millis() + slack,
        DateTime::<Utc>::MAX_UTC.timestamp_millis() - slack,
    )
}

/// Value axis bounds; `max >= min` always holds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueDomain {
    pub min: f64,
    pub max: f64,
}

impl ValueDomain {
    /// Pads `[lo, hi]` by 2% of its range (zero pad for a flat range).
    pub fn padded(lo: f64, hi: f64) -> Self {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let pad = (hi - lo) * VALUE_PAD_RATIO;
        Self { min: lo - pad, max: hi + pad }
    }

    /// Domain used when there is nothing to plot.
    pub fn unit() -> Self {
        Self { min: 0.0, max: 1.0 }
    }

    pub fn span(&self) -> f64 { self.max - self.min }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    Gain,
    Loss,
}

impl Trend {
    /// Gain when the last value is at least the first.
    pub fn between(first: f64, last: f64) -> Self {
        if last >= first { Trend::Gain } else { Trend::Loss }
    }

    pub fn of(points: &[Point]) -> Self {
        match (points.first(), points.last()) {
            (Some(a), Some(b)) => Self::between(a.value, b.value),
            _ => Trend::Gain,
        }
    }
}

/// Points used to derive value bounds and trend: those inside `window`, or
/// the whole series if the window holds none.
pub fn visible_points<'a>(series: &'a Series, window: &ViewWindow) -> &'a [Point] {
    let visible = series.within(window.start, window.end);
    if visible.is_empty() { series.points() } else { visible }
}

/// Padded value domain and trend for the current window.
pub fn autoscale_visible(series: &Series, window: &ViewWindow) -> (ValueDomain, Trend) {
    let pts = visible_points(series, window);
    match Series::value_range(pts) {
        Some((lo, hi)) => (ValueDomain::padded(lo, hi), Trend::of(pts)),
        None => (ValueDomain::unit(), Trend::Gain),
    }
}
