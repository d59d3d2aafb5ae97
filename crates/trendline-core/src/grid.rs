// File: crates/trendline-core/src/grid.rs
// Summary: Horizontal gridlines drawn as a label-less left axis spanning the plot.

use crate::axis::{Axis, Tick};
use crate::scene::{Document, NodeId};
use crate::theme::Theme;

/// Redraw gridlines at `positions` (pixel y offsets) across `plot_width`.
/// The group is expected to be translated to the plot's left edge.
pub fn render_grid(doc: &mut Document, group: NodeId, positions: &[f64], plot_width: f64, theme: &Theme) {
    let ticks: Vec<Tick> = positions
        .iter()
        .map(|&position| Tick { position, label: String::new() })
        .collect();
    let axis = Axis::left().tick_size(-plot_width).without_domain();
    axis.render(doc, group, &ticks, (0.0, 0.0));
    for line in doc.select_tag(group, "line") {
        doc.set_attr(line, "stroke", theme.grid.to_hex());
        doc.set_attr(line, "stroke-opacity", theme.grid_opacity.to_string());
    }
}
