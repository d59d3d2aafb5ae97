// File: crates/trendline-render-skia/src/lib.rs
// Summary: Headless rasteriser for chart documents using Skia CPU raster surfaces.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use skia_safe as skia;
use tracing::debug;
use trendline_core::scene::{Document, NodeId};
use trendline_core::theme::{Color, Theme};

pub mod text;

pub use text::{Anchor, TextShaper};

pub struct RasterOptions {
    /// Device pixels per document pixel.
    pub scale: f32,
    /// Overrides the theme background.
    pub background: Option<Color>,
    /// Skip labels, e.g. for pixel comparisons that must not depend on installed fonts.
    pub draw_text: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self { scale: 1.0, background: None, draw_text: true }
    }
}

/// Inherited presentation attributes.
#[derive(Clone, Copy, Debug)]
struct Style {
    fill: Option<Color>,
    stroke: Option<Color>,
    stroke_width: f32,
    stroke_opacity: f32,
    opacity: f32,
    font_size: f32,
    anchor: Anchor,
}

impl Style {
    fn root(theme: &Theme) -> Self {
        Self {
            fill: Some(Color::rgb(0, 0, 0)),
            stroke: None,
            stroke_width: 1.0,
            stroke_opacity: 1.0,
            opacity: 1.0,
            font_size: theme.font_size as f32,
            anchor: Anchor::Start,
        }
    }
}

pub struct SkiaRenderer {
    theme: Theme,
    shaper: TextShaper,
}

impl SkiaRenderer {
    pub fn new(theme: Theme) -> Self {
        Self { theme, shaper: TextShaper::new() }
    }

    /// Encode the document's `<svg>` surface as PNG.
    pub fn render_to_png_bytes(&self, doc: &Document, opts: &RasterOptions) -> Result<Vec<u8>> {
        let (svg, w, h) = self.surface_size(doc, opts)?;
        let mut surface = skia::surfaces::raster_n32_premul((w, h))
            .ok_or_else(|| anyhow!("failed to create raster surface"))?;
        self.paint(surface.canvas(), doc, svg, opts);

        let image = surface.image_snapshot();
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow!("encode PNG failed"))?;
        Ok(data.as_bytes().to_vec())
    }

    pub fn render_to_png(&self, doc: &Document, opts: &RasterOptions, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.render_to_png_bytes(doc, opts)?;
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Unpremultiplied RGBA pixels plus `(width, height, row_bytes)`.
    pub fn render_to_rgba8(&self, doc: &Document, opts: &RasterOptions) -> Result<(Vec<u8>, i32, i32, usize)> {
        let (svg, w, h) = self.surface_size(doc, opts)?;
        let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None::<skia::ColorSpace>);
        let mut surface =
            skia::surfaces::raster(&info, info.min_row_bytes(), None).ok_or_else(|| anyhow!("failed to create raster surface"))?;
        self.paint(surface.canvas(), doc, svg, opts);

        let row_bytes = info.min_row_bytes();
        let mut px = vec![0u8; row_bytes * h as usize];
        if !surface.read_pixels(&info, &mut px, row_bytes, (0, 0)) {
            bail!("reading {w}x{h} pixels back from the surface failed");
        }
        Ok((px, w, h, row_bytes))
    }

    fn surface_size(&self, doc: &Document, opts: &RasterOptions) -> Result<(NodeId, i32, i32)> {
        let svg = doc
            .select_tag(doc.root(), "svg")
            .first()
            .copied()
            .context("document has no <svg> element")?;
        let dim = |name: &str| -> Result<f32> {
            doc.attr(svg, name)
                .and_then(|v| v.parse::<f32>().ok())
                .filter(|v| *v > 0.0)
                .with_context(|| format!("<svg> is missing a positive {name}"))
        };
        let scale = if opts.scale > 0.0 { opts.scale } else { 1.0 };
        let w = (dim("width")? * scale).ceil() as i32;
        let h = (dim("height")? * scale).ceil() as i32;
        Ok((svg, w, h))
    }

    fn paint(&self, canvas: &skia::Canvas, doc: &Document, svg: NodeId, opts: &RasterOptions) {
        canvas.clear(to_skia(opts.background.unwrap_or(self.theme.background), 1.0));
        canvas.save();
        canvas.scale((opts.scale.max(f32::EPSILON), opts.scale.max(f32::EPSILON)));
        let clips = collect_clips(doc, svg);
        let style = Style::root(&self.theme);
        for &c in doc.children(svg) {
            self.draw_node(canvas, doc, c, style, &clips, opts);
        }
        canvas.restore();
    }

    fn draw_node(
        &self,
        canvas: &skia::Canvas,
        doc: &Document,
        id: NodeId,
        inherited: Style,
        clips: &HashMap<String, skia::Rect>,
        opts: &RasterOptions,
    ) {
        let Some(node) = doc.node(id) else { return };
        let style = self.resolve_style(doc, id, inherited);
        let num = |name: &str| doc.attr(id, name).and_then(|v| v.parse::<f32>().ok()).unwrap_or(0.0);

        match node.tag {
            "g" => {
                canvas.save();
                if let Some((dx, dy)) = doc.attr(id, "transform").and_then(parse_translate) {
                    canvas.translate((dx, dy));
                }
                if let Some(rect) = doc.attr(id, "clip-path").and_then(clip_ref).and_then(|r| clips.get(r)) {
                    canvas.clip_rect(rect, skia::ClipOp::Intersect, true);
                }
                for &c in node.children() {
                    self.draw_node(canvas, doc, c, style, clips, opts);
                }
                canvas.restore();
            }
            "rect" => {
                let rect = skia::Rect::from_xywh(num("x"), num("y"), num("width"), num("height"));
                if let Some(p) = fill_paint(&style) {
                    canvas.draw_rect(rect, &p);
                }
                if let Some(p) = stroke_paint(&style) {
                    canvas.draw_rect(rect, &p);
                }
            }
            "line" => {
                if let Some(p) = stroke_paint(&style) {
                    canvas.draw_line((num("x1"), num("y1")), (num("x2"), num("y2")), &p);
                }
            }
            "path" => {
                let Some(path) = doc.attr(id, "d").and_then(|d| skia::Path::from_svg(d)) else { return };
                if let Some(p) = fill_paint(&style) {
                    canvas.draw_path(&path, &p);
                }
                if let Some(p) = stroke_paint(&style) {
                    canvas.draw_path(&path, &p);
                }
            }
            "text" => {
                let (Some(label), Some(fill)) = (node.text(), style.fill) else { return };
                if !opts.draw_text {
                    return;
                }
                let dy = doc.attr(id, "dy").and_then(parse_em).unwrap_or(0.0) * style.font_size;
                self.shaper.draw(
                    canvas,
                    label,
                    num("x"),
                    num("y") + dy,
                    style.font_size,
                    to_skia(fill, style.opacity),
                    style.anchor,
                );
            }
            "clipPath" => {}
            other => debug!(tag = other, "rasteriser skips unsupported element"),
        }
    }

    fn resolve_style(&self, doc: &Document, id: NodeId, mut s: Style) -> Style {
        let color = |v: &str| -> Option<Color> {
            match v {
                "none" | "transparent" => None,
                "currentColor" => Some(self.theme.axis),
                other => Color::parse(other),
            }
        };
        let f = |name: &str| doc.attr(id, name).and_then(|v| v.parse::<f32>().ok());
        if let Some(v) = doc.attr(id, "fill") {
            s.fill = color(v);
        }
        if let Some(v) = doc.attr(id, "stroke") {
            s.stroke = color(v);
        }
        if let Some(v) = f("stroke-width") {
            s.stroke_width = v;
        }
        if let Some(v) = f("stroke-opacity") {
            s.stroke_opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = f("opacity") {
            s.opacity *= v.clamp(0.0, 1.0);
        }
        if let Some(v) = f("font-size") {
            s.font_size = v;
        }
        if let Some(v) = doc.attr(id, "text-anchor") {
            s.anchor = Anchor::parse(v);
        }
        s
    }
}

fn to_skia(c: Color, opacity: f32) -> skia::Color {
    let a = (c.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    skia::Color::from_argb(a, c.r, c.g, c.b)
}

fn fill_paint(s: &Style) -> Option<skia::Paint> {
    let c = s.fill?;
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint.set_color(to_skia(c, s.opacity));
    Some(paint)
}

fn stroke_paint(s: &Style) -> Option<skia::Paint> {
    let c = s.stroke?;
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(s.stroke_width);
    paint.set_color(to_skia(c, s.opacity * s.stroke_opacity));
    Some(paint)
}

/// `clipPath` ids mapped to the rect they contain.
fn collect_clips(doc: &Document, svg: NodeId) -> HashMap<String, skia::Rect> {
    let mut out = HashMap::new();
    for clip in doc.select_tag(svg, "clipPath") {
        let (Some(name), Some(&rect)) = (doc.attr(clip, "id"), doc.children(clip).first()) else { continue };
        let num = |n: &str| doc.attr(rect, n).and_then(|v| v.parse::<f32>().ok()).unwrap_or(0.0);
        out.insert(name.to_string(), skia::Rect::from_xywh(num("x"), num("y"), num("width"), num("height")));
    }
    out
}

/// `translate(x,y)` or `translate(x)`.
fn parse_translate(s: &str) -> Option<(f32, f32)> {
    let inner = s.trim().strip_prefix("translate(")?.strip_suffix(')')?;
    let mut parts = inner.split(|c: char| c == ',' || c.is_whitespace()).filter(|p| !p.is_empty());
    let x = parts.next()?.parse().ok()?;
    let y = parts.next().map(str::parse::<f32>).transpose().ok()?.unwrap_or(0.0);
    Some((x, y))
}

/// `url(#id)` -> `id`.
fn clip_ref(s: &str) -> Option<&str> {
    s.trim().strip_prefix("url(#")?.strip_suffix(')')
}

fn parse_em(s: &str) -> Option<f32> {
    s.trim().strip_suffix("em")?.parse().ok()
}
