// File: crates/trendline-core/src/container.rs
// Summary: Host container seam the chart owns and draws into.

use crate::scene::Document;

/// Element the chart fully owns: it is cleared at construction and receives
/// the chart's document after every pass.
pub trait Container {
    /// Laid-out width in pixels. `None` when the container is detached;
    /// `Some(0.0)` when attached but not measured yet.
    fn client_width(&self) -> Option<f64>;

    fn is_attached(&self) -> bool {
        self.client_width().is_some()
    }

    /// Drop any prior content.
    fn clear(&mut self);

    /// Show the chart's current state.
    fn present(&mut self, doc: &Document);

    /// Start forwarding viewport resizes to the chart.
    fn subscribe_resize(&mut self) {}

    fn unsubscribe_resize(&mut self) {}
}

/// In-memory container used by tests, benches and the demo.
#[derive(Clone, Debug, Default)]
pub struct MemoryContainer {
    width: Option<f64>,
    pub markup: String,
    pub presents: usize,
    pub clears: usize,
    pub resize_subscribed: bool,
}

impl MemoryContainer {
    /// An attached container of the given width.
    pub fn new(width: f64) -> Self {
        Self { width: Some(width), ..Self::default() }
    }

    pub fn detached() -> Self {
        Self::default()
    }

    /// Pre-existing content, replaced when a chart is created.
    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = markup.into();
        self
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = Some(width);
    }
}

impl Container for MemoryContainer {
    fn client_width(&self) -> Option<f64> { self.width }

    fn clear(&mut self) {
        self.markup.clear();
        self.clears += 1;
    }

    fn present(&mut self, doc: &Document) {
        self.markup = doc.to_markup();
        self.presents += 1;
    }

    fn subscribe_resize(&mut self) { self.resize_subscribed = true; }
    fn unsubscribe_resize(&mut self) { self.resize_subscribed = false; }
}
