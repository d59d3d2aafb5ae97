// File: crates/trendline-core/src/theme.rs
// Summary: Light/Dark theming for chart colors and strokes.

use crate::view::Trend;

/// Straight (non-premultiplied) RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `#rrggbb` (alpha is carried separately as an opacity attribute).
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rgb`, `#rrggbb` or one of the few named colors the chart emits.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "grey" | "gray" => return Some(Color::rgb(128, 128, 128)),
            "black" => return Some(Color::rgb(0, 0, 0)),
            "white" => return Some(Color::rgb(255, 255, 255)),
            _ => {}
        }
        let hex = s.strip_prefix('#')?;
        let digit = |i: usize, n: usize| u8::from_str_radix(hex.get(i..i + n)?, 16).ok();
        match hex.len() {
            6 => Some(Color::rgb(digit(0, 2)?, digit(2, 2)?, digit(4, 2)?)),
            3 => Some(Color::rgb(digit(0, 1)? * 17, digit(1, 1)? * 17, digit(2, 1)? * 17)),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Color,
    /// Axis ticks and labels (`currentColor`).
    pub axis: Color,
    pub grid: Color,
    pub grid_opacity: f64,
    pub gain: Color,
    pub loss: Color,
    pub line_width: f64,
    pub font_size: f64,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: Color::rgb(255, 255, 255),
            axis: Color::rgb(0, 0, 0),
            grid: Color::rgb(128, 128, 128), // grey
            grid_opacity: 0.2,
            gain: Color::rgb(0x28, 0xa7, 0x45),
            loss: Color::rgb(0xdc, 0x35, 0x45),
            line_width: 3.0,
            font_size: 10.0,
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: Color::rgb(18, 18, 20),
            axis: Color::rgb(210, 210, 220),
            grid: Color::rgb(128, 128, 128),
            grid_opacity: 0.2,
            gain: Color::rgb(40, 200, 120),
            loss: Color::rgb(220, 80, 80),
            line_width: 3.0,
            font_size: 10.0,
        }
    }

    pub fn trend_color(&self, trend: Trend) -> Color {
        match trend {
            Trend::Gain => self.gain,
            Trend::Loss => self.loss,
        }
    }
}

impl Default for Theme {
    fn default() -> Self { Theme::light() }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    presets()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .unwrap_or_else(Theme::light)
}
