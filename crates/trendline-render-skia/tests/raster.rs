// File: crates/trendline-render-skia/tests/raster.rs
// Purpose: PNG and RGBA output of a rendered chart document.

use chrono::{Duration, TimeZone, Utc};
use trendline_core::{ChartConfig, MemoryContainer, Record, TimeSeriesChart};
use trendline_render_skia::{RasterOptions, SkiaRenderer};

fn chart(values: &[f64]) -> TimeSeriesChart<MemoryContainer> {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let data: Vec<Record> = values
        .iter()
        .enumerate()
        .map(|(i, v)| Record::new(t0 + Duration::days(i as i64)).with("value", *v))
        .collect();
    TimeSeriesChart::create(MemoryContainer::new(400.0), &data, ChartConfig::default()).expect("create chart")
}

fn no_text() -> RasterOptions {
    RasterOptions { draw_text: false, ..RasterOptions::default() }
}

#[test]
fn render_smoke_png() {
    let ch = chart(&[1.0, 3.0, 2.0, 4.0]);
    let renderer = SkiaRenderer::new(*ch.theme());
    let out = std::path::PathBuf::from("target/test_out/smoke.png");
    renderer.render_to_png(ch.document(), &RasterOptions::default(), &out).expect("render should succeed");
    let meta = std::fs::metadata(&out).expect("output exists");
    assert!(meta.len() > 0, "png should be non-empty");

    let bytes = renderer.render_to_png_bytes(ch.document(), &no_text()).expect("render bytes");
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "should be PNG header");
    let img = image::load_from_memory(&bytes).expect("decode png").to_rgba8();
    assert_eq!((img.width(), img.height()), (400, 300));
}

#[test]
fn render_rgba8_buffer() {
    let ch = chart(&[1.0, 4.0]);
    let renderer = SkiaRenderer::new(*ch.theme());
    let (px, w, h, stride) = renderer.render_to_rgba8(ch.document(), &no_text()).expect("rgba render");
    assert_eq!((w, h), (400, 300));
    assert_eq!(w as usize * h as usize * 4, px.len());
    assert_eq!(stride, (w as usize) * 4);
    // opaque white background in the top-left corner
    assert_eq!(&px[0..4], &[255, 255, 255, 255]);
}

#[test]
fn rising_line_is_drawn_in_gain_colour() {
    let ch = chart(&[1.0, 4.0]);
    let renderer = SkiaRenderer::new(*ch.theme());
    let (px, w, _h, stride) = renderer.render_to_rgba8(ch.document(), &no_text()).expect("rgba render");
    let greenish = px.chunks_exact(4).filter(|p| p[1] > 120 && p[0] < 90 && p[2] < 110).count();
    assert!(greenish > 50, "expected gain-coloured stroke pixels, found {greenish} (w={w}, stride={stride})");
}

#[test]
fn scale_multiplies_surface() {
    let ch = chart(&[2.0, 1.0]);
    let renderer = SkiaRenderer::new(*ch.theme());
    let opts = RasterOptions { scale: 2.0, ..no_text() };
    let (_, w, h, _) = renderer.render_to_rgba8(ch.document(), &opts).expect("rgba render");
    assert_eq!((w, h), (800, 600));
}

#[test]
fn empty_document_is_an_error() {
    let renderer = SkiaRenderer::new(trendline_core::Theme::default());
    let doc = trendline_core::Document::new();
    assert!(renderer.render_to_png_bytes(&doc, &RasterOptions::default()).is_err());
}
