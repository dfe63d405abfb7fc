//! Text blocks and their layout within a panel

use serde::{Deserialize, Serialize};

use super::TextRenderer;
use crate::color::Color;
use crate::constants::render::{
    AUTO_FIT_STEP, DEFAULT_FONT_SIZE, FONT_SCALE_DIVISOR, TOP_OR_BOTTOM_MARGIN_PERCENT,
};
use crate::types::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontStyle {
    Impact,
    #[default]
    Modern,
}

impl FontStyle {
    /// fontconfig family used for this style
    pub fn family_name(&self) -> &'static str {
        match self {
            FontStyle::Impact => "Impact",
            FontStyle::Modern => "Monospace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Size relative to a 75 unit tall panel
    pub size: f32,
    pub color: Color,
    pub style: FontStyle,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            size: DEFAULT_FONT_SIZE,
            color: Color::WHITE,
            style: FontStyle::default(),
        }
    }
}

impl Font {
    /// Pixel size of this font on a panel `panel_height` pixels tall
    pub fn scaled_px(&self, panel_height: u32) -> f32 {
        (panel_height as f32 * self.size / FONT_SCALE_DIVISOR).floor()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextPosition {
    Top,
    #[default]
    Centered,
    Bottom,
}

impl std::str::FromStr for TextPosition {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(TextPosition::Top),
            "centered" | "center" => Ok(TextPosition::Centered),
            "bottom" => Ok(TextPosition::Bottom),
            other => Err(anyhow::anyhow!("Unknown text position '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderableText {
    pub text: String,
    pub font: Font,
    pub position: TextPosition,
}

impl RenderableText {
    pub fn new(text: impl Into<String>, size: f32) -> Self {
        Self {
            text: text.into(),
            font: Font { size, ..Font::default() },
            position: TextPosition::default(),
        }
    }

    pub fn with_position(mut self, position: TextPosition) -> Self {
        self.position = position;
        self
    }

    /// Lines that get drawn; blank lines are dropped
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split(['\n', '\r']).filter(|line| !line.is_empty())
    }

    /// Width of the widest line and the summed line heights
    pub fn extent(&self, renderer: &dyn TextRenderer, panel_height: u32) -> (u32, u32) {
        let px = self.font.scaled_px(panel_height);
        self.lines().fold((0, 0), |(width, height), line| {
            let (line_width, line_height) = renderer.line_extent(line, self.font.style, px);
            (width.max(line_width), height + line_height)
        })
    }

    /// Shrink the font in fixed steps until the block fits the panel
    ///
    /// Width is fitted first, then height. The size never grows and never
    /// drops below zero. Non-finite or non-positive sizes are left alone, as
    /// are sizes too large for a step to change.
    pub fn auto_fit(&mut self, renderer: &dyn TextRenderer, width: u32, height: u32) {
        if !self.font.size.is_finite() || self.font.size <= 0.0 {
            return;
        }
        let mut extent = self.extent(renderer, height);
        while extent.0 > width && self.shrink() {
            extent = self.extent(renderer, height);
        }
        while extent.1 > height && self.shrink() {
            extent = self.extent(renderer, height);
        }
    }

    /// One auto-fit step; false once the size stops changing
    fn shrink(&mut self) -> bool {
        let next = (self.font.size - AUTO_FIT_STEP).max(0.0);
        if next == self.font.size {
            return false;
        }
        self.font.size = next;
        true
    }

    /// Top-left corner of the text block on a `width` x `height` panel
    pub fn origin(&self, renderer: &dyn TextRenderer, width: u32, height: u32) -> Point {
        let (text_width, text_height) = self.extent(renderer, height);
        let x = (width as i32 - text_width as i32) / 2;
        let margin = (height as f32 * TOP_OR_BOTTOM_MARGIN_PERCENT / 100.0) as i32;
        let y = match self.position {
            TextPosition::Top => margin,
            TextPosition::Centered => (height as i32 - text_height as i32) / 2,
            TextPosition::Bottom => height as i32 - text_height as i32 - margin,
        };
        Point::new(x, y)
    }

    /// Draw every line left-aligned from the block origin
    pub fn draw(&self, renderer: &dyn TextRenderer, canvas: &mut image::RgbaImage) {
        let (width, height) = canvas.dimensions();
        let px = self.font.scaled_px(height);
        if px <= 0.0 {
            return;
        }
        let origin = self.origin(renderer, width, height);
        let mut y = origin.y;
        for line in self.lines() {
            renderer.draw_line(canvas, line, self.font.style, px, origin.x, y, self.font.color);
            y += renderer.line_extent(line, self.font.style, px).1 as i32;
        }
    }
}
