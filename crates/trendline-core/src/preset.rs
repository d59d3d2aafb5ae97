// File: crates/trendline-core/src/preset.rs
// Summary: Named lookback presets (1D/1W/1M/6M/1Y/Max) and their window policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChartError;

pub const MS_PER_DAY: i64 = 86_400_000;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangePreset {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[default]
    Max,
}

impl RangePreset {
    /// Button order.
    pub const ALL: [RangePreset; 6] = [
        RangePreset::OneDay,
        RangePreset::OneWeek,
        RangePreset::OneMonth,
        RangePreset::SixMonths,
        RangePreset::OneYear,
        RangePreset::Max,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RangePreset::OneDay => "1D",
            RangePreset::OneWeek => "1W",
            RangePreset::OneMonth => "1M",
            RangePreset::SixMonths => "6M",
            RangePreset::OneYear => "1Y",
            RangePreset::Max => "Max",
        }
    }

    /// Fixed lookback from the latest sample; `None` means the full extent.
    /// Not calendar-aware: a month is 30 days, a year 365.
    pub const fn lookback_ms(self) -> Option<i64> {
        match self {
            RangePreset::OneDay => Some(MS_PER_DAY),
            RangePreset::OneWeek => Some(7 * MS_PER_DAY),
            RangePreset::OneMonth => Some(30 * MS_PER_DAY),
            RangePreset::SixMonths => Some(180 * MS_PER_DAY),
            RangePreset::OneYear => Some(365 * MS_PER_DAY),
            RangePreset::Max => None,
        }
    }
}

impl fmt::Display for RangePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RangePreset {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangePreset::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ChartError::Configuration(format!("unknown range preset '{s}'")))
    }
}
