// File: crates/trendline-core/src/config.rs
// Summary: Chart configuration with serde defaults, JSON loading and validation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::series::DEFAULT_Y_KEY;
use crate::theme::{self, Theme};
use crate::types::{Margin, HEIGHT};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    /// Fixed surface width; when unset the container's width is used.
    pub width: Option<f64>,
    /// Fixed surface height; defaults to 300.
    pub height: Option<f64>,
    pub margin: Margin,
    /// Record field to plot; defaults to `value` (with `price` as fallback).
    pub y_key: Option<String>,
    /// Re-render when the host reports a viewport resize.
    pub resize_on_window: bool,
    pub show_timeframe_controls: bool,
    /// Theme name, see [`theme::find`].
    pub theme: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            margin: Margin::default(),
            y_key: None,
            resize_on_window: false,
            show_timeframe_controls: true,
            theme: "light".to_string(),
        }
    }
}

impl ChartConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: ChartConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn y_key(&self) -> &str {
        self.y_key.as_deref().unwrap_or(DEFAULT_Y_KEY)
    }

    pub fn theme(&self) -> Theme {
        theme::find(&self.theme)
    }

    pub fn resolved_height(&self) -> f64 {
        self.height.unwrap_or(HEIGHT)
    }

    /// Reject sizes and margins that leave no room to plot.
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [("width", self.width), ("height", self.height)] {
            if let Some(v) = v {
                if !v.is_finite() || v <= 0.0 {
                    return Err(ChartError::Configuration(format!("{name} must be positive, got {v}")));
                }
            }
        }
        if !self.margin.is_valid() {
            return Err(ChartError::Configuration(format!(
                "margins must be finite and non-negative: {:?}",
                self.margin
            )));
        }
        if let Some(w) = self.width {
            self.check_plot_width(w)?;
        }
        if self.resolved_height() <= self.margin.vsum() {
            return Err(ChartError::Configuration(format!(
                "height {} leaves no plot area with margins top {} / bottom {}",
                self.resolved_height(),
                self.margin.top,
                self.margin.bottom
            )));
        }
        Ok(())
    }

    pub(crate) fn check_plot_width(&self, width: f64) -> Result<()> {
        if width <= self.margin.hsum() {
            return Err(ChartError::Configuration(format!(
                "width {width} leaves no plot area with margins left {} / right {}",
                self.margin.left, self.margin.right
            )));
        }
        Ok(())
    }
}
