// File: crates/trendline-core/src/types.rs
// Summary: Shared types and constants (sizes, margins).

use serde::{Deserialize, Serialize};

/// Fallback surface width when neither config nor container provide one.
pub const WIDTH: f64 = 600.0;
/// Default surface height in pixels.
pub const HEIGHT: f64 = 300.0;

/// Space reserved around the plot area for axes, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }
    /// Same inset on every side.
    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }
    /// Total horizontal inset (left + right).
    pub fn hsum(&self) -> f64 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub fn vsum(&self) -> f64 { self.top + self.bottom }

    pub(crate) fn is_valid(&self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self::new(20.0, 20.0, 40.0, 50.0)
    }
}

/// Surface size in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
