// File: crates/trendline-demo/src/main.rs
// Summary: Demo loads a price CSV (or synthesises one), drives the chart through a preset
// and an optional drag, and writes SVG/PNG output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trendline_core::{
    ChartConfig, ChartEvent, MemoryContainer, MiniChart, MiniConfig, RangePreset, Record, TimeSeriesChart,
};
use trendline_render_skia::{RasterOptions, SkiaRenderer};

#[derive(Debug, Parser)]
#[command(name = "trendline-demo", about = "Render a time-series chart to SVG and PNG")]
struct Args {
    /// CSV with a time column and one or more numeric columns. Synthetic data when omitted.
    input: Option<PathBuf>,

    /// Chart configuration (JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Column to plot (matched against lowercased CSV headers). Overrides the config.
    #[arg(short = 'y', long)]
    y_key: Option<String>,

    /// Timeframe: 1D, 1W, 1M, 6M, 1Y or Max.
    #[arg(short, long, default_value = "Max")]
    preset: RangePreset,

    /// Horizontal drag in pixels applied after the preset (positive pans earlier).
    #[arg(long, allow_hyphen_values = true)]
    drag: Option<f64>,

    /// Width the host container reports.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Output directory.
    #[arg(short, long, default_value = "target/out")]
    out: PathBuf,

    /// Also write a sparkline of the same data.
    #[arg(long)]
    mini: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(p) => ChartConfig::from_path(p).with_context(|| format!("failed to load config '{}'", p.display()))?,
        None => ChartConfig::default(),
    };

    let records = match &args.input {
        Some(path) => {
            let path = resolve_path(path)?;
            info!(path = %path.display(), "using input file");
            load_records_csv(&path).with_context(|| format!("failed to load CSV '{}'", path.display()))?
        }
        None => synthetic_records(365),
    };
    info!(records = records.len(), "loaded records");
    if records.is_empty() {
        anyhow::bail!("no records loaded; check headers/delimiter.");
    }
    config.y_key = resolve_y_key(args.y_key.as_deref(), &config, &records);
    info!(y_key = config.y_key(), "plotting column");

    let mut chart = TimeSeriesChart::create(MemoryContainer::new(args.width), &records, config)?;
    chart.dispatch(ChartEvent::PresetClicked(args.preset))?;
    if let Some(dx) = args.drag {
        let x0 = chart.plot_rect().left + chart.plot_rect().width() / 2.0;
        for ev in [ChartEvent::DragStart { x: x0 }, ChartEvent::DragMove { x: x0 + dx }, ChartEvent::DragEnd] {
            chart.dispatch(ev)?;
        }
    }
    let (start, end) = chart.x_domain();
    let domain = chart.value_domain();
    info!(
        %start,
        %end,
        min = domain.min,
        max = domain.max,
        trend = ?chart.trend(),
        "visible window"
    );

    let stem = format!("chart_{}", chart.preset().label().to_lowercase());
    let svg_path = args.out.join(format!("{stem}.svg"));
    chart.document().write_svg(&svg_path)?;
    info!(path = %svg_path.display(), "wrote svg");

    let renderer = SkiaRenderer::new(*chart.theme());
    let png_path = args.out.join(format!("{stem}.png"));
    renderer.render_to_png(chart.document(), &RasterOptions::default(), &png_path)?;
    info!(path = %png_path.display(), "wrote png");

    if args.mini {
        let mut mini = MiniChart::new(MiniConfig { y_key: chart.config().y_key().to_string(), ..MiniConfig::default() })?;
        let mut host = MemoryContainer::new(100.0);
        mini.draw(&mut host, &records)?;
        let mini_path = args.out.join("mini.svg");
        mini.document().write_svg(&mini_path)?;
        info!(path = %mini_path.display(), trend = ?mini.trend(), "wrote sparkline");
    }

    let container = chart.destroy();
    info!(presents = container.presents, "done");
    Ok(())
}

/// Column to plot: the flag, then the config, then `close` for price CSVs that
/// carry neither `value` nor `price`.
fn resolve_y_key(flag: Option<&str>, config: &ChartConfig, records: &[Record]) -> Option<String> {
    if let Some(k) = flag {
        return Some(k.trim().to_lowercase());
    }
    if config.y_key.is_some() {
        return config.y_key.clone();
    }
    let has = |k: &str| records.iter().any(|r| r.value_for(k).is_some());
    (!has("value") && !has("price") && has("close")).then(|| "close".to_string())
}

/// Resolve path, trying .csv/.cvs swap if needed.
fn resolve_path(p: &Path) -> Result<PathBuf> {
    if p.exists() {
        return Ok(p.to_path_buf());
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            warn!(path = %alt.display(), "extension swapped between .csv/.cvs");
            return Ok(alt);
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => alt.set_extension("csv"),
        "csv" => alt.set_extension("cvs"),
        _ => return None,
    };
    Some(alt)
}

/// Load a CSV into records: one time column plus every numeric column keyed by
/// its lowercased header.
fn load_records_csv(path: &Path) -> Result<Vec<Record>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect::<Vec<_>>();
    info!(?headers, "csv headers");

    let i_time = headers
        .iter()
        .position(|h| ["time", "timestamp", "open_time", "date", "datetime"].contains(&h.as_str()))
        .context("no time column (time/timestamp/open_time/date/datetime)")?;

    let mut out = Vec::new();
    let mut skipped = 0usize;
    for rec in rdr.records() {
        let rec = rec?;
        let Some(ts) = rec.get(i_time).and_then(parse_time) else {
            skipped += 1;
            continue;
        };
        let mut r = Record::new(ts);
        for (i, field) in rec.iter().enumerate() {
            if i == i_time {
                continue;
            }
            if let Ok(v) = field.trim().parse::<f64>() {
                r = r.with(headers[i].clone(), v);
            }
        }
        out.push(r);
    }
    if skipped > 0 {
        warn!(skipped, "rows with unparseable time skipped");
    }
    Ok(out)
}

/// Epoch seconds or milliseconds, RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`.
fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        // epoch ms vs sec
        let ms = if n > 10_i64.pow(12) { n } else { n * 1000 };
        return Utc.timestamp_millis_opt(ms).single();
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(t.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}

/// Daily random-walk-ish closes ending today.
fn synthetic_records(days: i64) -> Vec<Record> {
    let end = Utc::now();
    (0..days)
        .map(|i| {
            let x = i as f64;
            let v = 100.0 + (x * 0.07).sin() * 12.0 + (x * 0.31).cos() * 3.0 + x * 0.05;
            Record::new(end - Duration::days(days - 1 - i)).with("value", v)
        })
        .collect()
}
