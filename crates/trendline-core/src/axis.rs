// File: crates/trendline-core/src/axis.rs
// Summary: Axis model (orientation, tick sizes) and its rendering into a document group.

use crate::geometry::fmt_coord;
use crate::scene::{Document, NodeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orient {
    Bottom,
    Left,
}

/// A positioned tick and its label.
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Pixel offset along the axis.
    pub position: f64,
    pub label: String,
}

#[derive(Clone, Copy, Debug)]
pub struct Axis {
    pub orient: Orient,
    pub tick_size_inner: f64,
    pub tick_size_outer: f64,
    pub padding: f64,
    pub show_domain: bool,
    pub font_size: f64,
}

impl Axis {
    fn new(orient: Orient) -> Self {
        Self {
            orient,
            tick_size_inner: 6.0,
            tick_size_outer: 6.0,
            padding: 3.0,
            show_domain: true,
            font_size: 10.0,
        }
    }

    pub fn bottom() -> Self { Self::new(Orient::Bottom) }
    pub fn left() -> Self { Self::new(Orient::Left) }

    /// Sets inner and outer tick size (negative sizes draw into the plot).
    pub fn tick_size(mut self, size: f64) -> Self {
        self.tick_size_inner = size;
        self.tick_size_outer = size;
        self
    }

    pub fn without_domain(mut self) -> Self {
        self.show_domain = false;
        self
    }

    fn k(&self) -> f64 {
        match self.orient {
            Orient::Bottom => 1.0,
            Orient::Left => -1.0,
        }
    }

    fn domain_path(&self, range: (f64, f64)) -> String {
        let k = self.k();
        let outer = fmt_coord(k * self.tick_size_outer);
        let (r0, r1) = (fmt_coord(range.0), fmt_coord(range.1));
        match self.orient {
            Orient::Bottom => format!("M{r0},{outer}V0H{r1}V{outer}"),
            Orient::Left => format!("M{outer},{r0}H0V{r1}H{outer}"),
        }
    }

    /// Rebuild the tick children of `group`. The group node itself is kept and
    /// only its attributes change.
    pub fn render(&self, doc: &mut Document, group: NodeId, ticks: &[Tick], range: (f64, f64)) {
        doc.remove_children(group);
        doc.set_attr(group, "fill", "none");
        doc.set_attr(group, "font-size", fmt_coord(self.font_size));
        doc.set_attr(group, "font-family", "sans-serif");
        doc.set_attr(
            group,
            "text-anchor",
            match self.orient {
                Orient::Bottom => "middle",
                Orient::Left => "end",
            },
        );

        if self.show_domain {
            let domain = doc.append_new(group, "path");
            doc.set_attr(domain, "class", "domain");
            doc.set_attr(domain, "stroke", "currentColor");
            doc.set_attr(domain, "d", self.domain_path(range));
        }

        let k = self.k();
        let spacing = self.tick_size_inner.max(0.0) + self.padding;
        for t in ticks {
            let g = doc.append_new(group, "g");
            doc.set_attr(g, "class", "tick");
            doc.set_attr(g, "opacity", "1");
            let line = doc.append_new(g, "line");
            doc.set_attr(line, "stroke", "currentColor");
            let text = doc.append_new(g, "text");
            doc.set_attr(text, "fill", "currentColor");
            let pos = fmt_coord(t.position);
            match self.orient {
                Orient::Bottom => {
                    doc.set_attr(g, "transform", format!("translate({pos},0)"));
                    doc.set_attr(line, "y2", fmt_coord(k * self.tick_size_inner));
                    doc.set_attr(text, "y", fmt_coord(k * spacing));
                    doc.set_attr(text, "dy", "0.71em");
                }
                Orient::Left => {
                    doc.set_attr(g, "transform", format!("translate(0,{pos})"));
                    doc.set_attr(line, "x2", fmt_coord(k * self.tick_size_inner));
                    doc.set_attr(text, "x", fmt_coord(k * spacing));
                    doc.set_attr(text, "dy", "0.32em");
                }
            }
            doc.set_text(text, t.label.clone());
        }
    }
}
