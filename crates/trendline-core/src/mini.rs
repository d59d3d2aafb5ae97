// File: crates/trendline-core/src/mini.rs
// Summary: Axis-free sparkline coloured by lifetime trend.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::container::Container;
use crate::error::{ChartError, Result};
use crate::geometry::{fmt_coord, PlotRect};
use crate::scale::{LinearScale, TimeScale};
use crate::scene::Document;
use crate::series::{convert_records, Record, Series, FALLBACK_Y_KEY};
use crate::theme::Theme;
use crate::types::{Margin, Size};
use crate::view::Trend;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MiniConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    pub y_key: String,
    pub stroke_width: f64,
}

impl Default for MiniConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 40.0,
            margin: Margin::uniform(2.0),
            y_key: FALLBACK_Y_KEY.to_string(),
            stroke_width: 1.5,
        }
    }
}

impl MiniConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.width > self.margin.hsum() && self.height > self.margin.vsum()) || !self.margin.is_valid() {
            return Err(ChartError::Configuration(format!(
                "mini chart {}x{} leaves no plot area with margins {:?}",
                self.width, self.height, self.margin
            )));
        }
        Ok(())
    }
}

/// Sparkline state. Every [`MiniChart::draw`] rebuilds the document from scratch.
#[derive(Clone, Debug)]
pub struct MiniChart {
    config: MiniConfig,
    theme: Theme,
    doc: Document,
    trend: Option<Trend>,
}

impl MiniChart {
    pub fn new(config: MiniConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, theme: Theme::default(), doc: Document::new(), trend: None })
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Replace the container's content with a sparkline of `records`.
    pub fn draw<C: Container + ?Sized>(&mut self, container: &mut C, records: &[Record]) -> Result<()> {
        if !container.is_attached() {
            return Err(ChartError::RenderTargetUnavailable("container is not attached".into()));
        }
        let conv = convert_records(records, &self.config.y_key);
        if conv.skipped > 0 {
            debug!(skipped = conv.skipped, "mini chart skipped records");
        }
        let series = Series::from_points(conv.points);

        container.clear();
        self.doc.clear();
        let root = self.doc.root();
        let svg = self.doc.append_new(root, "svg");
        self.doc.set_attr(svg, "xmlns", "http://www.w3.org/2000/svg");
        self.doc.set_attr(svg, "width", fmt_coord(self.config.width));
        self.doc.set_attr(svg, "height", fmt_coord(self.config.height));

        self.trend = None;
        if let Some(d) = self.line_path(&series) {
            let trend = Trend::of(series.points());
            let path = self.doc.append_new(svg, "path");
            self.doc.set_attr(path, "fill", "none");
            self.doc.set_attr(path, "stroke", self.theme.trend_color(trend).to_hex());
            self.doc.set_attr(path, "stroke-width", fmt_coord(self.config.stroke_width));
            self.doc.set_attr(path, "d", d);
            self.trend = Some(trend);
        }
        container.present(&self.doc);
        Ok(())
    }

    /// Trend of the last drawn data; `None` after drawing an empty series.
    pub fn trend(&self) -> Option<Trend> { self.trend }
    pub fn document(&self) -> &Document { &self.doc }
    pub fn config(&self) -> &MiniConfig { &self.config }

    fn line_path(&self, series: &Series) -> Option<String> {
        let (t0, t1) = series.extent()?;
        let (lo, hi) = Series::value_range(series.points())?;
        let plot = PlotRect::inset(Size::new(self.config.width, self.config.height), &self.config.margin);
        let xs = TimeScale::new(t0, t1, (plot.left, plot.right));
        let ys = LinearScale::new((lo, hi), (plot.bottom, plot.top)).nice(10);

        let mut d = String::new();
        for (i, p) in series.points().iter().enumerate() {
            d.push(if i == 0 { 'M' } else { 'L' });
            d.push_str(&fmt_coord(xs.to_px(p.timestamp)));
            d.push(',');
            d.push_str(&fmt_coord(ys.to_px(p.value)));
        }
        if series.len() == 1 {
            d.push('Z');
        }
        Some(d)
    }
}
