//! Presenter output: what each configured display shows, written to PNG

use anyhow::{Context, Result};
use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::color::Color;
use crate::config::{DisplayInfo, TeamConfig};
use crate::constants::render::{DEFAULT_FONT_SIZE, PREVIEW_HEIGHT, PREVIEW_WIDTH};
use crate::render::{Overlay, RenderableText, ScreenText, TextPosition, TextRenderer};
use crate::types::ScreenSide;

/// Content pushed to the presenter displays
#[derive(Debug, Clone)]
pub struct PresenterContent {
    pub text: Option<String>,
    /// Blocks drawn after `text`
    pub extra_text: Vec<String>,
    pub clear_text: bool,
    pub font_size: f32,
    pub position: TextPosition,
    /// Sides the content is aimed at
    pub target: ScreenSide,
    pub background: Option<Color>,
    pub image: Option<RgbaImage>,
    pub image_is_scaled: bool,
    pub overlay: Option<Overlay>,
    pub auto_fit: bool,
    pub blackout: bool,
}

impl Default for PresenterContent {
    fn default() -> Self {
        Self {
            text: None,
            extra_text: Vec::new(),
            clear_text: false,
            font_size: DEFAULT_FONT_SIZE,
            position: TextPosition::default(),
            target: ScreenSide::all_side(),
            background: None,
            image: None,
            image_is_scaled: false,
            overlay: None,
            auto_fit: true,
            blackout: false,
        }
    }
}

/// Build the operator preview for `side` with `content` applied
pub fn build_preview(side: ScreenSide, teams: &TeamConfig, content: &PresenterContent) -> ScreenText {
    let mut preview = ScreenText::preview("", side, PREVIEW_WIDTH, PREVIEW_HEIGHT, teams);
    if content.blackout {
        preview.blackout();
        return preview;
    }

    let target = content.target;
    preview.autosplit_display(&target);
    if let Some(color) = content.background {
        preview.set_background(color, &target);
    }
    if let Some(image) = &content.image {
        preview.set_image(image, content.image_is_scaled, &target);
    }
    if content.clear_text {
        preview.reset_all_text(&target);
    }
    if let Some(text) = &content.text {
        preview.set_text(&text.replace("\\n", "\n"), content.font_size, &target);
    }
    for extra in &content.extra_text {
        let block = RenderableText::new(extra.replace("\\n", "\n"), content.font_size).with_position(content.position);
        preview.add_text(&block, &target);
    }
    preview.set_text_position(content.position, &target);
    preview.set_background_overlay(content.overlay.as_ref(), &target);
    preview.set_auto_fit(content.auto_fit, &target);
    preview
}

/// Render what `record` presents; None for control-only displays
pub fn compose(
    record: &DisplayInfo,
    teams: &TeamConfig,
    content: &PresenterContent,
    renderer: &dyn TextRenderer,
) -> Option<RgbaImage> {
    if record.side.is_control_only() {
        debug!(id = record.id, "Display only hosts the control window, nothing to present");
        return None;
    }
    let preview = build_preview(record.side, teams, content);
    let width = record.dimensions.width.max(1) as u32;
    let height = record.dimensions.height.max(1) as u32;
    let mut presenter = ScreenText::presenter(&preview, width, height);
    Some(presenter.render(renderer))
}

/// Compose every presenting display into `out_dir/display-<id>.png`
pub fn write_all(
    displays: &[DisplayInfo],
    teams: &TeamConfig,
    content: &PresenterContent,
    renderer: &dyn TextRenderer,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let mut written = Vec::new();
    for record in displays {
        let Some(image) = compose(record, teams, content, renderer) else {
            continue;
        };
        let path = out_dir.join(format!("display-{}.png", record.id));
        image
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(id = record.id, side = %record.side, path = %path.display(), "Wrote display image");
        written.push(path);
    }
    Ok(written)
}
