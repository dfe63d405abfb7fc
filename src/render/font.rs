//! TrueType font rendering using fontdue (pure Rust)

use anyhow::{Context, Result};
use fontdue::{Font, FontSettings};
use image::RgbaImage;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::text::FontStyle;
use super::TextRenderer;
use crate::color::Color;

/// Single font face rasterized with fontdue
#[derive(Debug)]
pub struct FontRenderer {
    font: Font,
}

impl FontRenderer {
    /// Load a TrueType font from a file path
    pub fn from_path(path: PathBuf) -> Result<Self> {
        debug!(path = %path.display(), "Attempting to load font from path");

        let font_data = fs::read(&path)
            .with_context(|| format!("Failed to read font file: {}", path.display()))?;

        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| anyhow::anyhow!("Failed to parse font: {}", e))?;

        info!(path = %path.display(), "Successfully loaded font from path");
        Ok(Self { font })
    }

    /// Load font from a font name (family or fullname) via fontconfig
    pub fn from_font_name(font_name: &str) -> Result<Self> {
        let font_path = super::font_discovery::find_font_path(font_name)
            .with_context(|| format!("Failed to resolve font '{}'", font_name))?;

        debug!(font_name = %font_name, resolved_path = %font_path.display(), "Resolved font name to path via fontconfig");
        Self::from_path(font_path)
    }

    /// Try to find and load a common system font
    pub fn from_system_font() -> Result<Self> {
        // Compile-time font path first (set by packaged builds via FONT_PATH)
        const FONT_PATH: Option<&str> = option_env!("FONT_PATH");
        if let Some(font_path) = FONT_PATH {
            if let Ok(renderer) = Self::from_path(PathBuf::from(font_path)) {
                return Ok(renderer);
            }
            warn!(font_path = %font_path, "Failed to load FONT_PATH, trying fontconfig");
        }

        if let Ok(renderer) = Self::from_font_name("Sans") {
            return Ok(renderer);
        }

        // Last resort for systems without fontconfig data
        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
            "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
        ];

        for path in &font_paths {
            if let Ok(renderer) = Self::from_path(PathBuf::from(path)) {
                info!(path = %path, "Loaded font from hardcoded path");
                return Ok(renderer);
            }
        }

        Err(anyhow::anyhow!(
            "Could not find any system fonts. Tried FONT_PATH ({:?}), fontconfig, and hardcoded paths: {:?}",
            FONT_PATH,
            font_paths
        ))
    }

    fn line_height(&self, px: f32) -> u32 {
        match self.font.horizontal_line_metrics(px) {
            Some(metrics) => metrics.new_line_size.ceil() as u32,
            None => px.ceil() as u32,
        }
    }

    fn ascent(&self, px: f32) -> f32 {
        self.font
            .horizontal_line_metrics(px)
            .map(|m| m.ascent)
            .unwrap_or(px)
    }

    pub fn line_extent(&self, line: &str, px: f32) -> (u32, u32) {
        if px <= 0.0 {
            return (0, 0);
        }
        let width: f32 = line
            .chars()
            .map(|ch| self.font.metrics(ch, px).advance_width)
            .sum();
        (width.ceil() as u32, self.line_height(px))
    }

    /// Blend `line` onto `canvas` with its top-left corner at (`x`, `y`)
    pub fn draw_line(&self, canvas: &mut RgbaImage, line: &str, px: f32, x: i32, y: i32, color: Color) {
        if px <= 0.0 {
            return;
        }
        let baseline = y as f32 + self.ascent(px);
        let mut pen_x = x as f32;

        for ch in line.chars() {
            let (metrics, bitmap) = self.font.rasterize(ch, px);
            // Glyph top sits (height + ymin) above the baseline
            let glyph_top = (baseline - (metrics.height as i32 + metrics.ymin) as f32).round() as i32;
            let glyph_left = pen_x.round() as i32 + metrics.xmin;

            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let px_x = glyph_left + gx as i32;
                    let px_y = glyph_top + gy as i32;
                    if px_x < 0 || px_y < 0 || px_x >= canvas.width() as i32 || px_y >= canvas.height() as i32 {
                        continue;
                    }

                    let coverage = bitmap[gy * metrics.width + gx] as f32 / 255.0;
                    if coverage > 0.0 {
                        let pixel = canvas.get_pixel_mut(px_x as u32, px_y as u32);
                        let blend = |dst: u8, src: u8| {
                            (src as f32 * coverage + dst as f32 * (1.0 - coverage)).round() as u8
                        };
                        pixel.0 = [
                            blend(pixel.0[0], color.red),
                            blend(pixel.0[1], color.green),
                            blend(pixel.0[2], color.blue),
                            pixel.0[3].max((coverage * 255.0) as u8),
                        ];
                    }
                }
            }
            pen_x += metrics.advance_width;
        }
    }
}

/// One loaded face per [`FontStyle`]
///
/// Styles whose family is not installed share the system fallback face.
pub struct FontBook {
    faces: HashMap<FontStyle, FontRenderer>,
    fallback: FontRenderer,
}

impl FontBook {
    pub fn load() -> Result<Self> {
        let fallback = FontRenderer::from_system_font().context("No usable system font")?;
        let mut faces = HashMap::new();
        for style in [FontStyle::Impact, FontStyle::Modern] {
            match FontRenderer::from_font_name(style.family_name()) {
                Ok(face) => {
                    faces.insert(style, face);
                }
                Err(e) => {
                    warn!(style = ?style, error = %e, "Font style unavailable, using fallback face");
                }
            }
        }
        Ok(Self { faces, fallback })
    }

    fn face(&self, style: FontStyle) -> &FontRenderer {
        self.faces.get(&style).unwrap_or(&self.fallback)
    }
}

impl TextRenderer for FontBook {
    fn line_extent(&self, line: &str, style: FontStyle, px: f32) -> (u32, u32) {
        self.face(style).line_extent(line, px)
    }

    fn draw_line(
        &self,
        canvas: &mut RgbaImage,
        line: &str,
        style: FontStyle,
        px: f32,
        x: i32,
        y: i32,
        color: Color,
    ) {
        self.face(style).draw_line(canvas, line, px, x, y, color);
    }
}
