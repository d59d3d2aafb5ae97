// File: crates/trendline-core/src/scale.rs
// Summary: Time (X) and value (Y) scale transforms plus "nice" tick generation.
// Notes:
// - Linear ticks pick steps of 1, 2 or 5 times a power of ten.
// - Time ticks pick the closest calendar interval (seconds .. years) to
//   span / count and align to it in UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

/// Zero-width time domains are widened to this span before mapping.
pub const MIN_TIME_SPAN_MS: i64 = 3_600_000;

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

const SECOND: i64 = 1_000;
const MINUTE: i64 = 60 * SECOND;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Vertical value scale mapping a value domain onto `[range.0, range.1]` pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub d0: f64,
    pub d1: f64,
    pub r0: f64,
    pub r1: f64,
}

impl LinearScale {
    /// A zero-span domain is widened by 0.5 on each side so the midpoint maps
    /// to the middle of the range. Large magnitudes widen by a few ulps
    /// instead, since ±0.5 would round away.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (mut d0, mut d1) = domain;
        if (d1 - d0).abs() < 1e-12 && d0.is_finite() {
            let mid = d0;
            let half = 0.5f64.max(mid.abs() * f64::EPSILON * 4.0);
            d0 = mid - half;
            d1 = mid + half;
        }
        Self { d0, d1, r0: range.0, r1: range.1 }
    }

    #[inline]
    pub fn to_px(&self, v: f64) -> f64 {
        self.r0 + (v - self.d0) / (self.d1 - self.d0) * (self.r1 - self.r0)
    }

    #[inline]
    pub fn from_px(&self, px: f64) -> f64 {
        let span = self.r1 - self.r0;
        if span.abs() < 1e-12 { return self.d0; }
        self.d0 + (px - self.r0) / span * (self.d1 - self.d0)
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.d0, self.d1, count)
    }

    pub fn tick_step(&self, count: usize) -> f64 {
        tick_step(self.d0, self.d1, count as f64)
    }

    /// Extend the domain outward to round tick values.
    pub fn nice(mut self, count: usize) -> Self {
        let (d0, d1) = nice(self.d0, self.d1, count as f64);
        self.d0 = d0;
        self.d1 = d1;
        self
    }
}

/// Horizontal time scale mapping a time domain onto `[range.0, range.1]` pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScale {
    pub start_ms: i64,
    pub end_ms: i64,
    pub r0: f64,
    pub r1: f64,
}

impl TimeScale {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, range: (f64, f64)) -> Self {
        let (mut s, mut e) = (start.timestamp_millis(), end.timestamp_millis());
        if s == e {
            s -= MIN_TIME_SPAN_MS / 2;
            e += MIN_TIME_SPAN_MS / 2;
        }
        Self { start_ms: s, end_ms: e, r0: range.0, r1: range.1 }
    }

    #[inline]
    pub fn ms_to_px(&self, ms: i64) -> f64 {
        let span = (self.end_ms - self.start_ms) as f64;
        self.r0 + (ms - self.start_ms) as f64 / span * (self.r1 - self.r0)
    }

    #[inline]
    pub fn to_px(&self, t: DateTime<Utc>) -> f64 {
        self.ms_to_px(t.timestamp_millis())
    }

    pub fn from_px(&self, px: f64) -> DateTime<Utc> {
        let span = self.r1 - self.r0;
        let frac = if span.abs() < 1e-12 { 0.0 } else { (px - self.r0) / span };
        let ms = self.start_ms as f64 + frac * (self.end_ms - self.start_ms) as f64;
        from_ms(ms.trunc() as i64)
    }

    pub fn ticks(&self, count: usize) -> Vec<DateTime<Utc>> {
        time_ticks(self.start_ms, self.end_ms, count)
    }
}

pub(crate) fn from_ms(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
}

// ---- linear ticks ------------------------------------------------------------

/// JavaScript-style rounding (halves toward +inf).
#[inline]
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn tick_spec(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    let (mut i1, mut i2, inc);
    if power < 0.0 {
        let k = 10f64.powf(-power) / factor;
        i1 = round_half_up(start * k);
        i2 = round_half_up(stop * k);
        if i1 / k < start { i1 += 1.0; }
        if i2 / k > stop { i2 -= 1.0; }
        inc = -k;
    } else {
        let k = 10f64.powf(power) * factor;
        i1 = round_half_up(start / k);
        i2 = round_half_up(stop / k);
        if i1 * k < start { i1 += 1.0; }
        if i2 * k > stop { i2 -= 1.0; }
        inc = k;
    }
    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    (i1, i2, inc)
}

/// Roughly `count` round values spanning `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() { return Vec::new(); }
    if start == stop { return vec![start]; }
    let reverse = stop < start;
    let (a, b) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, inc) = tick_spec(a, b, count as f64);
    if !(i2 >= i1) || !inc.is_finite() { return Vec::new(); }
    let n = (i2 - i1 + 1.0) as usize;
    let mut out: Vec<f64> = (0..n)
        .map(|i| {
            let k = i1 + i as f64;
            if inc < 0.0 { k / -inc } else { k * inc }
        })
        .collect();
    if reverse { out.reverse(); }
    out
}

/// Signed increment; negative values encode `1 / -inc` for sub-unit steps.
pub fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    tick_spec(start, stop, count).2
}

pub fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let reverse = stop < start;
    let inc = if reverse { tick_increment(stop, start, count) } else { tick_increment(start, stop, count) };
    let step = if inc < 0.0 { 1.0 / -inc } else { inc };
    if reverse { -step } else { step }
}

/// Round a domain outward until its ends land on tick values.
pub fn nice(start: f64, stop: f64, count: f64) -> (f64, f64) {
    let reverse = stop < start;
    let (mut a, mut b) = if reverse { (stop, start) } else { (start, stop) };
    let mut prestep = f64::NAN;
    for _ in 0..10 {
        let step = tick_increment(a, b, count);
        if step == prestep {
            break;
        } else if step > 0.0 {
            a = (a / step).floor() * step;
            b = (b / step).ceil() * step;
        } else if step < 0.0 {
            a = (a * step).ceil() / step;
            b = (b * step).floor() / step;
        } else {
            break;
        }
        prestep = step;
    }
    if reverse { (b, a) } else { (a, b) }
}

// ---- time ticks --------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

const TICK_INTERVALS: [(TimeUnit, i64, i64); 18] = [
    (TimeUnit::Second, 1, SECOND),
    (TimeUnit::Second, 5, 5 * SECOND),
    (TimeUnit::Second, 15, 15 * SECOND),
    (TimeUnit::Second, 30, 30 * SECOND),
    (TimeUnit::Minute, 1, MINUTE),
    (TimeUnit::Minute, 5, 5 * MINUTE),
    (TimeUnit::Minute, 15, 15 * MINUTE),
    (TimeUnit::Minute, 30, 30 * MINUTE),
    (TimeUnit::Hour, 1, HOUR),
    (TimeUnit::Hour, 3, 3 * HOUR),
    (TimeUnit::Hour, 6, 6 * HOUR),
    (TimeUnit::Hour, 12, 12 * HOUR),
    (TimeUnit::Day, 1, DAY),
    (TimeUnit::Day, 2, 2 * DAY),
    (TimeUnit::Week, 1, WEEK),
    (TimeUnit::Month, 1, MONTH),
    (TimeUnit::Month, 3, 3 * MONTH),
    (TimeUnit::Year, 1, YEAR),
];

/// Calendar interval (unit, step) whose length is closest to `span / count`.
pub fn tick_interval(start_ms: i64, stop_ms: i64, count: usize) -> (TimeUnit, i64) {
    let target = (stop_ms - start_ms).abs() as f64 / count.max(1) as f64;
    let i = TICK_INTERVALS.partition_point(|&(_, _, d)| (d as f64) <= target);
    if i == TICK_INTERVALS.len() {
        let step = tick_step(start_ms as f64 / YEAR as f64, stop_ms as f64 / YEAR as f64, count as f64);
        return (TimeUnit::Year, (step.floor() as i64).max(1));
    }
    if i == 0 {
        let step = tick_step(start_ms as f64, stop_ms as f64, count as f64);
        return (TimeUnit::Millisecond, (step.floor() as i64).max(1));
    }
    let (_, _, below) = TICK_INTERVALS[i - 1];
    let (_, _, above) = TICK_INTERVALS[i];
    let pick = if target / (below as f64) < (above as f64) / target { i - 1 } else { i };
    let (unit, step, _) = TICK_INTERVALS[pick];
    (unit, step)
}

/// Tick instants inside `[start_ms, stop_ms]`, aligned to the chosen interval.
pub fn time_ticks(start_ms: i64, stop_ms: i64, count: usize) -> Vec<DateTime<Utc>> {
    if count == 0 { return Vec::new(); }
    let (lo, hi) = if start_ms <= stop_ms { (start_ms, stop_ms) } else { (stop_ms, start_ms) };
    let (unit, step) = tick_interval(lo, hi, count);
    let ms = match unit {
        TimeUnit::Millisecond => fixed_ticks(lo, hi, step),
        TimeUnit::Second => fixed_ticks(lo, hi, step * SECOND),
        TimeUnit::Minute => fixed_ticks(lo, hi, step * MINUTE),
        TimeUnit::Hour => fixed_ticks(lo, hi, step * HOUR),
        TimeUnit::Day => day_ticks(lo, hi, step),
        TimeUnit::Week => week_ticks(lo, hi),
        TimeUnit::Month => month_ticks(lo, hi, step),
        TimeUnit::Year => year_ticks(lo, hi, step),
    };
    let mut out: Vec<DateTime<Utc>> = ms.into_iter().map(from_ms).collect();
    if start_ms > stop_ms { out.reverse(); }
    out
}

/// Multiples of `every` milliseconds since the epoch.
fn fixed_ticks(lo: i64, hi: i64, every: i64) -> Vec<i64> {
    let every = every.max(1);
    let mut t = lo.div_euclid(every) * every;
    if t < lo { t += every; }
    let mut out = Vec::new();
    while t <= hi {
        out.push(t);
        t += every;
    }
    out
}

fn date_ms(d: NaiveDate) -> i64 {
    d.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}

/// First midnight at or after `ms`.
fn ceil_day(ms: i64) -> NaiveDate {
    let d = from_ms(ms).date_naive();
    if date_ms(d) < ms { d + Duration::days(1) } else { d }
}

fn day_ticks(lo: i64, hi: i64, step: i64) -> Vec<i64> {
    let mut d = ceil_day(lo);
    let mut out = Vec::new();
    while date_ms(d) <= hi {
        if (d.day0() as i64) % step == 0 {
            out.push(date_ms(d));
        }
        d += Duration::days(1);
    }
    out
}

/// Sundays at midnight.
fn week_ticks(lo: i64, hi: i64) -> Vec<i64> {
    let mut d = ceil_day(lo);
    let offset = (7 - d.weekday().num_days_from_sunday() as i64) % 7;
    d += Duration::days(offset);
    let mut out = Vec::new();
    while date_ms(d) <= hi {
        out.push(date_ms(d));
        d += Duration::days(7);
    }
    out
}

fn month_ticks(lo: i64, hi: i64, step: i64) -> Vec<i64> {
    let start = from_ms(lo).date_naive();
    let (mut y, mut m0) = (start.year(), start.month0() as i64);
    let mut out = Vec::new();
    loop {
        let Some(d) = NaiveDate::from_ymd_opt(y, m0 as u32 + 1, 1) else { break };
        let t = date_ms(d);
        if t > hi { break; }
        if t >= lo && m0 % step == 0 {
            out.push(t);
        }
        m0 += 1;
        if m0 == 12 {
            m0 = 0;
            y += 1;
        }
    }
    out
}

fn year_ticks(lo: i64, hi: i64, step: i64) -> Vec<i64> {
    let mut y = from_ms(lo).year();
    let mut out = Vec::new();
    while let Some(d) = NaiveDate::from_ymd_opt(y, 1, 1) {
        let t = date_ms(d);
        if t > hi { break; }
        if t >= lo && (y as i64).rem_euclid(step) == 0 {
            out.push(t);
        }
        y += 1;
    }
    out
}
