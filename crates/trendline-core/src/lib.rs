// File: crates/trendline-core/src/lib.rs
// Summary: Core library entry point; exports the chart component and its building blocks.

pub mod error;
pub mod types;
pub mod geometry;
pub mod series;
pub mod preset;
pub mod view;
pub mod scale;
pub mod format;
pub mod scene;
pub mod svg;
pub mod theme;
pub mod axis;
pub mod grid;
pub mod config;
pub mod container;
pub mod store;
pub mod chart;
pub mod mini;

pub use chart::{ChartEvent, SurfaceNodes, TimeSeriesChart, WindowSource};
pub use config::ChartConfig;
pub use container::{Container, MemoryContainer};
pub use error::{ChartError, Result};
pub use mini::{MiniChart, MiniConfig};
pub use preset::RangePreset;
pub use scene::{Document, NodeId};
pub use series::{Point, Record, Series};
pub use store::{MemoryStore, SeriesStore};
pub use theme::Theme;
pub use types::{Margin, Size};
pub use view::{Trend, ValueDomain, ViewWindow};
