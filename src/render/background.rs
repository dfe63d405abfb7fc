//! Background bitmaps

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::color::Color;
use crate::constants::render::ERROR_SQUARES_HIGH;

pub fn solid(width: u32, height: u32, color: Color) -> RgbaImage {
    RgbaImage::from_pixel(width, height, color.to_rgba(255))
}

/// Red and white checkerboard shown when no presenter display exists
pub fn error_image(width: u32, height: u32) -> RgbaImage {
    let square = (height / ERROR_SQUARES_HIGH).max(1);
    RgbaImage::from_fn(width, height, |x, y| {
        let x_toggle = (x / square) & 1 == 1;
        let y_toggle = (y / square) & 1 == 1;
        if x_toggle ^ y_toggle {
            Color::WHITE.to_rgba(255)
        } else {
            Color::RED.to_rgba(255)
        }
    })
}

/// Largest size with the image's aspect ratio that fits inside the bounds
///
/// A bounds box wider than the image matches heights, otherwise widths match.
pub fn aspect_fit_size(image_width: u32, image_height: u32, bound_width: u32, bound_height: u32) -> (u32, u32) {
    if image_width == 0 || image_height == 0 || bound_width == 0 || bound_height == 0 {
        return (0, 0);
    }
    let image_ratio = image_width as f64 / image_height as f64;
    let bound_ratio = bound_width as f64 / bound_height as f64;
    if bound_ratio > image_ratio {
        ((bound_height as f64 * image_ratio) as u32, bound_height)
    } else {
        (bound_width, (bound_width as f64 / image_ratio) as u32)
    }
}

/// Scale `image` to fit the bounds, keeping its aspect ratio
pub fn scale_to_fit(image: &RgbaImage, bound_width: u32, bound_height: u32) -> RgbaImage {
    let (width, height) = aspect_fit_size(image.width(), image.height(), bound_width, bound_height);
    if width == 0 || height == 0 {
        return RgbaImage::new(0, 0);
    }
    imageops::resize(image, width, height, FilterType::Triangle)
}
