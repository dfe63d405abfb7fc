//! Translucent single-color overlays (logos, watermarks)

use image::RgbaImage;

use super::background::scale_to_fit;
use crate::color::Color;
use crate::constants::render::OVERLAY_MARGIN_PERCENT;
use crate::types::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPosition {
    #[default]
    Centered,
    BottomLeft,
}

#[derive(Debug, Clone)]
pub struct Overlay {
    pub image: RgbaImage,
    /// Fraction (0.0..=1.0) of the panel the overlay may occupy in each direction
    pub screen_percentage: f64,
    /// Upper bound on per-pixel alpha
    pub alpha: u8,
    pub position: OverlayPosition,
}

impl Overlay {
    pub fn new(image: RgbaImage, screen_percentage: f64, alpha: u8, position: OverlayPosition) -> Self {
        Self {
            image,
            screen_percentage: screen_percentage.clamp(0.0, 1.0),
            alpha,
            position,
        }
    }

    /// Scaled, recolored and alpha-capped bitmap for a `width` x `height` panel
    pub fn prepare(&self, width: u32, height: u32, color: Color) -> RgbaImage {
        let bound_width = (width as f64 * self.screen_percentage) as u32;
        let bound_height = (height as f64 * self.screen_percentage) as u32;
        let mut scaled = scale_to_fit(&self.image, bound_width, bound_height);
        for pixel in scaled.pixels_mut() {
            let alpha = pixel.0[3].min(self.alpha);
            *pixel = color.to_rgba(alpha);
        }
        scaled
    }

    /// Top-left corner of a prepared overlay of the given size
    pub fn origin(&self, width: u32, height: u32, overlay_width: u32, overlay_height: u32) -> Point {
        match self.position {
            OverlayPosition::Centered => Point::new(
                (width as i32 - overlay_width as i32) / 2,
                (height as i32 - overlay_height as i32) / 2,
            ),
            OverlayPosition::BottomLeft => {
                let margin = (height as f32 * OVERLAY_MARGIN_PERCENT / 100.0) as i32;
                Point::new(margin, height as i32 - overlay_height as i32 - margin)
            }
        }
    }

    /// Alpha-blend the overlay onto `canvas` in `color`
    pub fn draw(&self, canvas: &mut RgbaImage, color: Color) {
        let (width, height) = canvas.dimensions();
        let prepared = self.prepare(width, height, color);
        let origin = self.origin(width, height, prepared.width(), prepared.height());
        image::imageops::overlay(canvas, &prepared, origin.x as i64, origin.y as i64);
    }
}
