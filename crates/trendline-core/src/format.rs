// File: crates/trendline-core/src/format.rs
// Summary: Tick label formatting for the time and value axes.

use chrono::{DateTime, Utc};

use crate::preset::MS_PER_DAY;

/// Label style for time ticks, chosen from the visible window span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeLabel {
    /// `14:30`, for windows shorter than a day.
    Clock,
    /// `Apr 14 14:30`, for windows shorter than 30 days.
    DayClock,
    /// `Apr 14`, otherwise.
    Day,
}

impl TimeLabel {
    /// Lower bounds are exclusive: exactly one day already uses `DayClock`.
    pub fn for_span(span_ms: i64) -> Self {
        if span_ms < MS_PER_DAY {
            TimeLabel::Clock
        } else if span_ms < 30 * MS_PER_DAY {
            TimeLabel::DayClock
        } else {
            TimeLabel::Day
        }
    }

    pub const fn pattern(self) -> &'static str {
        match self {
            TimeLabel::Clock => "%H:%M",
            TimeLabel::DayClock => "%b %d %H:%M",
            TimeLabel::Day => "%b %d",
        }
    }

    pub fn format(self, t: DateTime<Utc>) -> String {
        t.format(self.pattern()).to_string()
    }
}

/// Decimal places needed to tell apart values `step` apart.
pub fn precision_for_step(step: f64) -> usize {
    let step = step.abs();
    if !step.is_finite() || step == 0.0 {
        return 0;
    }
    // nudge so 0.1 and friends don't fall to the wrong exponent
    let exp = (step.log10() + 1e-9).floor();
    if exp >= 0.0 { 0 } else { (-exp) as usize }
}

/// Fixed-precision number with thousands separators and a typographic minus.
pub fn format_grouped(v: f64, precision: usize) -> String {
    let s = format!("{:.*}", precision, v.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };
    let mut grouped = String::with_capacity(s.len() + int_part.len() / 3 + 1);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(f) = frac_part {
        grouped.push('.');
        grouped.push_str(f);
    }
    let is_zero = s.chars().all(|c| c == '0' || c == '.');
    if v < 0.0 && !is_zero {
        format!("\u{2212}{grouped}")
    } else {
        grouped
    }
}

/// Formats every tick of one value axis with a shared precision.
#[derive(Clone, Copy, Debug)]
pub struct ValueFormatter {
    precision: usize,
}

impl ValueFormatter {
    pub fn for_step(step: f64) -> Self {
        Self { precision: precision_for_step(step) }
    }

    pub fn precision(&self) -> usize { self.precision }

    pub fn format(&self, v: f64) -> String {
        format_grouped(v, self.precision)
    }
}
