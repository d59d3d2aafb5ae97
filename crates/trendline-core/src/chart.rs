// File: crates/trendline-core/src/chart.rs
// Summary: Interactive time-series line chart: construction, render passes, presets,
// drag-to-pan, live updates and teardown over a retained document.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::axis::{Axis, Tick};
use crate::config::ChartConfig;
use crate::container::Container;
use crate::error::{ChartError, Result};
use crate::format::{TimeLabel, ValueFormatter};
use crate::geometry::{fmt_coord, PlotRect};
use crate::grid::render_grid;
use crate::preset::RangePreset;
use crate::scale::{LinearScale, TimeScale};
use crate::scene::{Document, NodeId};
use crate::series::{convert_records, Record, Series};
use crate::store::SeriesStore;
use crate::theme::{Color, Theme};
use crate::types::{Size, WIDTH};
use crate::view::{autoscale_visible, Trend, ValueDomain, ViewWindow};

/// Number of value-axis ticks and gridlines.
pub const Y_TICKS: usize = 6;

/// Time-axis tick count for a surface width.
pub fn x_tick_count(width: f64) -> usize {
    if width < 400.0 { 3 } else { 6 }
}

/// Host input, dispatched one at a time in arrival order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChartEvent {
    PresetClicked(RangePreset),
    DragStart { x: f64 },
    DragMove { x: f64 },
    DragEnd,
    Resize,
}

/// Nodes created once at build time and only updated afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceNodes {
    pub svg: NodeId,
    pub x_axis: NodeId,
    pub y_axis: NodeId,
    pub grid: NodeId,
    pub line_group: NodeId,
    pub line: NodeId,
    pub clip_rect: NodeId,
    pub drag_rect: NodeId,
    /// Timeframe buttons in [`RangePreset::ALL`] order, when controls are shown.
    pub buttons: Option<[NodeId; 6]>,
}

#[derive(Clone, Copy, Debug)]
enum Lifecycle {
    Uninitialized,
    Built(SurfaceNodes),
}

/// Where the current window came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowSource {
    /// No data yet; the first non-empty update resolves the preset.
    Placeholder,
    Preset,
    Pan,
}

#[derive(Clone, Copy, Debug)]
struct DragAnchor {
    x: f64,
    window: ViewWindow,
}

pub struct TimeSeriesChart<C: Container> {
    container: C,
    config: ChartConfig,
    theme: Theme,
    series: Series,
    preset: RangePreset,
    window: ViewWindow,
    window_source: WindowSource,
    value_domain: ValueDomain,
    trend: Trend,
    size: Size,
    drag: Option<DragAnchor>,
    doc: Document,
    lifecycle: Lifecycle,
}

impl<C: Container> TimeSeriesChart<C> {
    /// Validate inputs, take over `container` and run the first render pass.
    pub fn create(container: C, initial: &[Record], config: ChartConfig) -> Result<Self> {
        config.validate()?;
        if !container.is_attached() {
            return Err(ChartError::RenderTargetUnavailable("container is not attached".into()));
        }
        let series = load_series(initial, config.y_key())?;
        let theme = config.theme();
        let mut chart = Self {
            container,
            config,
            theme,
            series,
            preset: RangePreset::Max,
            window: ViewWindow::placeholder(),
            window_source: WindowSource::Placeholder,
            value_domain: ValueDomain::unit(),
            trend: Trend::Gain,
            size: Size::new(0.0, 0.0),
            drag: None,
            doc: Document::new(),
            lifecycle: Lifecycle::Uninitialized,
        };
        chart.render()?;
        Ok(chart)
    }

    /// Full pass: re-measure, re-resolve the window from the active preset and
    /// redraw everything. Cancels an in-progress drag.
    pub fn render(&mut self) -> Result<()> {
        self.size = self.resolve_size()?;
        if self.drag.take().is_some() {
            debug!("render pass cancelled an active drag");
        }
        let nodes = match self.lifecycle {
            Lifecycle::Built(nodes) => nodes,
            Lifecycle::Uninitialized => {
                let nodes = self.build();
                self.lifecycle = Lifecycle::Built(nodes);
                nodes
            }
        };
        self.layout(&nodes);

        match ViewWindow::from_preset(self.preset, &self.series) {
            Some(w) => {
                self.window = w;
                self.window_source = WindowSource::Preset;
            }
            None => {
                self.window = ViewWindow::placeholder();
                self.window_source = WindowSource::Placeholder;
            }
        }
        debug!(
            preset = %self.preset,
            width = self.size.width,
            height = self.size.height,
            points = self.series.len(),
            "render pass"
        );
        self.refresh_x_axis(&nodes);
        self.refresh_values(&nodes);
        self.container.present(&self.doc);
        Ok(())
    }

    /// Swap in fresh data without touching the preset or the visible window.
    pub fn update(&mut self, records: &[Record]) -> Result<()> {
        let points = convert(records, self.config.y_key())?;
        self.series.replace(points);
        if self.window_source == WindowSource::Placeholder {
            if let Some(w) = ViewWindow::from_preset(self.preset, &self.series) {
                self.window = w;
                self.window_source = WindowSource::Preset;
            }
        }
        if let Lifecycle::Built(nodes) = self.lifecycle {
            self.refresh_values(&nodes);
            self.refresh_x_axis(&nodes);
            self.container.present(&self.doc);
        }
        Ok(())
    }

    /// Pull the latest records for `key` from `store` and apply them as an update.
    /// Returns `false` when the store does not know the key.
    pub fn refresh_from<S: SeriesStore + ?Sized>(&mut self, store: &S, key: &str) -> Result<bool> {
        match store.records(key) {
            Some(records) => {
                self.update(&records)?;
                Ok(true)
            }
            None => {
                debug!(key, "store has no records for key");
                Ok(false)
            }
        }
    }

    pub fn select_preset(&mut self, preset: RangePreset) -> Result<()> {
        info!(preset = %preset, "timeframe selected");
        self.preset = preset;
        self.render()
    }

    pub fn handle_drag_start(&mut self, x: f64) {
        self.drag = Some(DragAnchor { x, window: self.window });
    }

    /// Shift the window by the pixel distance since drag start. Only attributes
    /// and tick children change.
    pub fn handle_drag_move(&mut self, x: f64) {
        let Some(anchor) = self.drag else {
            debug!(x, "drag move without drag start ignored");
            return;
        };
        let Lifecycle::Built(nodes) = self.lifecycle else { return };
        self.window = anchor.window.pan_by_pixels(x - anchor.x, self.plot_rect().width());
        self.window_source = WindowSource::Pan;
        self.refresh_x_axis(&nodes);
        self.refresh_values(&nodes);
        self.container.present(&self.doc);
    }

    pub fn handle_drag_end(&mut self) {
        self.drag = None;
    }

    /// Viewport resize: a full pass when `resize_on_window` is set, else nothing.
    pub fn handle_resize(&mut self) -> Result<()> {
        if !self.config.resize_on_window {
            return Ok(());
        }
        self.render()
    }

    pub fn dispatch(&mut self, event: ChartEvent) -> Result<()> {
        match event {
            ChartEvent::PresetClicked(p) => self.select_preset(p)?,
            ChartEvent::DragStart { x } => self.handle_drag_start(x),
            ChartEvent::DragMove { x } => self.handle_drag_move(x),
            ChartEvent::DragEnd => self.handle_drag_end(),
            ChartEvent::Resize => self.handle_resize()?,
        }
        Ok(())
    }

    /// Detach listeners, clear the container and hand it back.
    pub fn destroy(mut self) -> C {
        if self.config.resize_on_window {
            self.container.unsubscribe_resize();
        }
        self.doc.clear();
        self.container.clear();
        self.container
    }

    // ---- inspection ---------------------------------------------------------

    pub fn preset(&self) -> RangePreset { self.preset }
    pub fn window(&self) -> ViewWindow { self.window }
    pub fn window_source(&self) -> WindowSource { self.window_source }
    pub fn x_domain(&self) -> (DateTime<Utc>, DateTime<Utc>) { (self.window.start, self.window.end) }
    pub fn value_domain(&self) -> ValueDomain { self.value_domain }
    pub fn trend(&self) -> Trend { self.trend }
    pub fn trend_color(&self) -> Color { self.theme.trend_color(self.trend) }
    pub fn size(&self) -> Size { self.size }
    pub fn series(&self) -> &Series { &self.series }
    pub fn config(&self) -> &ChartConfig { &self.config }
    pub fn theme(&self) -> &Theme { &self.theme }
    pub fn document(&self) -> &Document { &self.doc }
    pub fn container(&self) -> &C { &self.container }
    pub fn container_mut(&mut self) -> &mut C { &mut self.container }
    pub fn is_dragging(&self) -> bool { self.drag.is_some() }

    pub fn surface(&self) -> Option<SurfaceNodes> {
        match self.lifecycle {
            Lifecycle::Built(nodes) => Some(nodes),
            Lifecycle::Uninitialized => None,
        }
    }

    pub fn plot_rect(&self) -> PlotRect {
        PlotRect::inset(self.size, &self.config.margin)
    }

    /// Presets whose button currently carries the `active` class.
    pub fn active_presets(&self) -> Vec<RangePreset> {
        let Some(buttons) = self.surface().and_then(|n| n.buttons) else { return Vec::new() };
        RangePreset::ALL
            .into_iter()
            .zip(buttons)
            .filter(|(_, id)| self.doc.has_class(*id, "active"))
            .map(|(p, _)| p)
            .collect()
    }

    /// Markup of the `<svg>` element alone.
    pub fn to_svg(&self) -> String {
        self.surface().map(|n| self.doc.markup_of(n.svg)).unwrap_or_default()
    }

    pub fn x_scale(&self) -> TimeScale {
        let plot = self.plot_rect();
        TimeScale::new(self.window.start, self.window.end, (plot.left, plot.right))
    }

    pub fn y_scale(&self) -> LinearScale {
        let plot = self.plot_rect();
        LinearScale::new((self.value_domain.min, self.value_domain.max), (plot.bottom, plot.top))
    }

    pub fn x_ticks(&self) -> Vec<Tick> {
        let xs = self.x_scale();
        let label = TimeLabel::for_span(self.window.span_ms());
        xs.ticks(x_tick_count(self.size.width))
            .into_iter()
            .map(|t| Tick { position: xs.to_px(t), label: label.format(t) })
            .collect()
    }

    pub fn y_ticks(&self) -> Vec<Tick> {
        let ys = self.y_scale();
        let fmt = ValueFormatter::for_step(ys.tick_step(Y_TICKS));
        ys.ticks(Y_TICKS)
            .into_iter()
            .map(|v| Tick { position: ys.to_px(v), label: fmt.format(v) })
            .collect()
    }

    /// Path data through every point of the series (clipping hides what lies
    /// outside the window).
    pub fn line_path(&self) -> String {
        let (xs, ys) = (self.x_scale(), self.y_scale());
        let pts = self.series.points();
        let mut d = String::with_capacity(pts.len() * 16);
        for (i, p) in pts.iter().enumerate() {
            d.push(if i == 0 { 'M' } else { 'L' });
            d.push_str(&fmt_coord(xs.to_px(p.timestamp)));
            d.push(',');
            d.push_str(&fmt_coord(ys.to_px(p.value)));
        }
        if pts.len() == 1 {
            d.push('Z');
        }
        d
    }

    // ---- internals ----------------------------------------------------------

    fn resolve_size(&self) -> Result<Size> {
        let measured = self
            .container
            .client_width()
            .ok_or_else(|| ChartError::RenderTargetUnavailable("container is not attached".into()))?;
        let width = self
            .config
            .width
            .or(Some(measured).filter(|w| w.is_finite() && *w > 0.0))
            .unwrap_or(WIDTH);
        self.config.check_plot_width(width)?;
        Ok(Size::new(width, self.config.resolved_height()))
    }

    /// One-time construction of the surface and controls.
    fn build(&mut self) -> SurfaceNodes {
        self.container.clear();
        self.doc.clear();
        let doc = &mut self.doc;
        let root = doc.root();

        let svg = doc.append_new(root, "svg");
        doc.set_attr(svg, "class", "portfolio-graph");
        doc.set_attr(svg, "xmlns", "http://www.w3.org/2000/svg");

        let x_axis = doc.append_new(svg, "g");
        doc.set_attr(x_axis, "class", "x-axis");
        let y_axis = doc.append_new(svg, "g");
        doc.set_attr(y_axis, "class", "y-axis");
        let grid = doc.append_new(svg, "g");
        doc.set_attr(grid, "class", "y-grid");
        let line_group = doc.append_new(svg, "g");
        doc.set_attr(line_group, "class", "line-group");
        doc.set_attr(line_group, "clip-path", "url(#clip)");
        let line = doc.append_new(line_group, "path");
        doc.set_attr(line, "fill", "none");

        let clip = doc.append_new(svg, "clipPath");
        doc.set_attr(clip, "id", "clip");
        let clip_rect = doc.append_new(clip, "rect");

        let drag_rect = doc.append_new(svg, "rect");
        doc.set_attr(drag_rect, "class", "drag-capture");
        doc.set_attr(drag_rect, "fill", "transparent");
        doc.set_attr(drag_rect, "style", "cursor: move;");

        let buttons = self.config.show_timeframe_controls.then(|| {
            let toggles = doc.append_new(root, "div");
            doc.set_attr(toggles, "class", "timeframe-toggles");
            RangePreset::ALL.map(|p| {
                let b = doc.append_new(toggles, "button");
                doc.set_attr(b, "class", "timeframe-btn");
                doc.set_attr(b, "data-range", p.label());
                doc.set_text(b, p.label());
                b
            })
        });

        if self.config.resize_on_window {
            self.container.subscribe_resize();
        }

        SurfaceNodes { svg, x_axis, y_axis, grid, line_group, line, clip_rect, drag_rect, buttons }
    }

    /// Size-dependent attributes and button state.
    fn layout(&mut self, nodes: &SurfaceNodes) {
        let Size { width, height } = self.size;
        let plot = self.plot_rect();
        let margin = self.config.margin;
        let doc = &mut self.doc;

        doc.set_attr(nodes.svg, "width", fmt_coord(width));
        doc.set_attr(nodes.svg, "height", fmt_coord(height));
        doc.set_attr(nodes.x_axis, "transform", format!("translate(0,{})", fmt_coord(height - margin.bottom)));
        doc.set_attr(nodes.y_axis, "transform", format!("translate({},0)", fmt_coord(margin.left)));
        doc.set_attr(nodes.grid, "transform", format!("translate({},0)", fmt_coord(margin.left)));
        for rect in [nodes.clip_rect, nodes.drag_rect] {
            doc.set_attr(rect, "x", fmt_coord(plot.left));
            doc.set_attr(rect, "y", fmt_coord(plot.top));
            doc.set_attr(rect, "width", fmt_coord(plot.width()));
            doc.set_attr(rect, "height", fmt_coord(plot.height()));
        }
        if let Some(buttons) = nodes.buttons {
            for (p, id) in RangePreset::ALL.into_iter().zip(buttons) {
                if p == self.preset {
                    doc.add_class(id, "active");
                } else {
                    doc.remove_class(id, "active");
                }
            }
        }
    }

    fn refresh_x_axis(&mut self, nodes: &SurfaceNodes) {
        let ticks = self.x_ticks();
        let xs = self.x_scale();
        let axis = Axis { font_size: self.theme.font_size, ..Axis::bottom() };
        axis.render(&mut self.doc, nodes.x_axis, &ticks, (xs.r0, xs.r1));
    }

    /// Value domain, trend, y-axis, gridlines and the line for the current window.
    fn refresh_values(&mut self, nodes: &SurfaceNodes) {
        let (domain, trend) = autoscale_visible(&self.series, &self.window);
        self.value_domain = domain;
        self.trend = trend;

        let ticks = self.y_ticks();
        let ys = self.y_scale();
        let axis = Axis { font_size: self.theme.font_size, ..Axis::left() }.without_domain();
        axis.render(&mut self.doc, nodes.y_axis, &ticks, (ys.r0, ys.r1));

        // grid group sits at the plot's left edge; ticks keep their y offsets
        let positions: Vec<f64> = ticks.iter().map(|t| t.position).collect();
        let plot_width = self.plot_rect().width();
        render_grid(&mut self.doc, nodes.grid, &positions, plot_width, &self.theme);

        let d = self.line_path();
        let stroke = self.theme.trend_color(trend).to_hex();
        let width = fmt_coord(self.theme.line_width);
        let doc = &mut self.doc;
        if d.is_empty() {
            doc.remove_attr(nodes.line, "d");
        } else {
            doc.set_attr(nodes.line, "d", d);
        }
        doc.set_attr(nodes.line, "stroke", stroke);
        doc.set_attr(nodes.line, "stroke-width", width);
    }
}

/// Convert records for an update; a non-empty batch with nothing usable is an error.
fn convert(records: &[Record], key: &str) -> Result<Vec<crate::series::Point>> {
    let conv = convert_records(records, key);
    if !records.is_empty() && conv.points.is_empty() {
        return Err(ChartError::InvalidSeries(format!(
            "none of {} records has a numeric '{key}' or 'price' field",
            records.len()
        )));
    }
    if conv.skipped > 0 {
        warn!(skipped = conv.skipped, kept = conv.points.len(), "dropped records without a numeric value");
    }
    Ok(conv.points)
}

fn load_series(records: &[Record], key: &str) -> Result<Series> {
    convert(records, key).map(Series::from_points)
}
