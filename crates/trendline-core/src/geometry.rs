// File: crates/trendline-core/src/geometry.rs
// Summary: Lightweight geometry helpers for pixel math.

use crate::types::{Margin, Size};

/// Plot rectangle inside the surface margins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotRect {
    pub const fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }
    pub fn inset(size: Size, margin: &Margin) -> Self {
        Self::from_ltrb(
            margin.left,
            margin.top,
            size.width - margin.right,
            size.height - margin.bottom,
        )
    }
    pub fn width(&self) -> f64 { self.right - self.left }
    pub fn height(&self) -> f64 { self.bottom - self.top }
}

/// Format a coordinate the way SVG path data is written: at most three
/// decimals, trailing zeros trimmed.
pub fn fmt_coord(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let s = format!("{rounded:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}
