// File: crates/trendline-core/src/error.rs
// Summary: Error taxonomy for chart construction, configuration and data loading.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    /// Input data could not produce a single plottable point.
    #[error("invalid series: {0}")]
    InvalidSeries(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    /// The host container is detached or cannot be measured.
    #[error("render target unavailable: {0}")]
    RenderTargetUnavailable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;
