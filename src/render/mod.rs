//! Screen composition: backgrounds, overlays and auto-fitted text
//!
//! A [`ScreenText`] is what one display shows. It holds one [`side::SidePanel`] per
//! team side when the sides are shown split, or a single merged panel.

pub mod background;
pub mod font;
pub mod font_discovery;
pub mod overlay;
pub mod screen;
pub mod side;
pub mod text;

use image::RgbaImage;

use crate::color::Color;

pub use font::FontBook;
pub use overlay::{Overlay, OverlayPosition};
pub use screen::ScreenText;
pub use text::{FontStyle, RenderableText, TextPosition};

/// Measures and draws single lines of text
pub trait TextRenderer {
    /// Width and height of `line` at a pixel size of `px`
    fn line_extent(&self, line: &str, style: FontStyle, px: f32) -> (u32, u32);

    /// Draw `line` with its top-left corner at (`x`, `y`)
    fn draw_line(
        &self,
        canvas: &mut RgbaImage,
        line: &str,
        style: FontStyle,
        px: f32,
        x: i32,
        y: i32,
        color: Color,
    );
}
