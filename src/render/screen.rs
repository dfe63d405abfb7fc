//! Everything one display shows, split across its team sides

use image::RgbaImage;
use tracing::debug;

use super::overlay::Overlay;
use super::side::SidePanel;
use super::text::{RenderableText, TextPosition};
use super::TextRenderer;
use crate::color::Color;
use crate::config::team::TeamConfig;
use crate::constants::render::ERROR_MESSAGE;
use crate::types::ScreenSide;

/// A display's content: a single merged panel or one panel per team side
///
/// Panels are laid out left to right with equal widths. A screen whose side
/// carries a single team (or only the error flag) always has one panel.
#[derive(Debug, Clone)]
pub struct ScreenText {
    side: ScreenSide,
    width: u32,
    height: u32,
    panels: Vec<SidePanel>,
}

impl ScreenText {
    /// Screen for the operator's preview of `side`
    ///
    /// Sides with several teams start split, each panel on its team's color.
    pub fn preview(initial_text: &str, side: ScreenSide, width: u32, height: u32, teams: &TeamConfig) -> Self {
        let mut logical = side.components();
        if logical.is_empty() {
            logical.push(side);
        }
        let panel_width = width / logical.len() as u32;
        let panels = logical
            .iter()
            .map(|part| {
                let text = if part.error { ERROR_MESSAGE } else { initial_text };
                let color = teams
                    .team_color_for_side(part)
                    .first()
                    .copied()
                    .unwrap_or(Color::BLACK);
                SidePanel::new(text, *part, panel_width, height, color)
            })
            .collect();
        Self { side, width, height, panels }
    }

    /// Presenter copy of `preview`: same content, the display's own size
    pub fn presenter(preview: &ScreenText, width: u32, height: u32) -> Self {
        let panel_width = width / preview.panels.len().max(1) as u32;
        let panels = preview
            .panels
            .iter()
            .map(|panel| SidePanel::copy_for(panel, panel_width, height))
            .collect();
        Self {
            side: preview.side,
            width,
            height,
            panels,
        }
    }

    #[cfg(test)]
    pub fn side(&self) -> ScreenSide {
        self.side
    }

    #[cfg(test)]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[cfg(test)]
    pub fn panels(&self) -> &[SidePanel] {
        &self.panels
    }

    /// Sides a split screen shows one panel for
    fn logical_sides(&self) -> Vec<ScreenSide> {
        let parts = self.side.components();
        if parts.is_empty() { vec![self.side] } else { parts }
    }

    #[cfg(test)]
    pub fn is_split(&self) -> bool {
        self.panels.len() > 1
    }

    /// Merge or split so that an update aimed at `target` lands sensibly
    ///
    /// When `target` covers every side of this screen one full-width panel
    /// shows it; otherwise each side gets its own panel.
    pub fn autosplit_display(&mut self, target: &ScreenSide) {
        let covers_all = self.logical_sides().iter().all(|side| target.covers(side));
        if covers_all {
            self.single_display();
        } else {
            self.split_display();
        }
    }

    /// Collapse to one full-width panel carrying the first panel's content
    pub fn single_display(&mut self) {
        if self.panels.len() == 1 {
            return;
        }
        debug!(side = %self.side, "Merging screen into a single panel");
        let mut merged = SidePanel::copy_for(&self.panels[0], self.width, self.height);
        merged.set_side(self.side);
        self.panels = vec![merged];
    }

    /// Expand to one equal-width panel per side, each copying the current content
    pub fn split_display(&mut self) {
        let logical = self.logical_sides();
        if self.panels.len() == logical.len() {
            return;
        }
        debug!(side = %self.side, panels = logical.len(), "Splitting screen into side panels");
        let panel_width = self.width / logical.len() as u32;
        let source = self.panels[0].clone();
        self.panels = logical
            .into_iter()
            .map(|side| {
                let mut panel = SidePanel::copy_for(&source, panel_width, self.height);
                panel.set_side(side);
                panel
            })
            .collect();
    }

    pub fn set_text(&mut self, text: &str, font_size: f32, side: &ScreenSide) {
        for panel in &mut self.panels {
            panel.set_text(text, font_size, side);
        }
    }

    pub fn add_text(&mut self, text: &RenderableText, side: &ScreenSide) {
        for panel in &mut self.panels {
            panel.add_text(text.clone(), side);
        }
    }

    pub fn reset_all_text(&mut self, side: &ScreenSide) {
        for panel in &mut self.panels {
            panel.reset_all_text(side);
        }
    }

    pub fn set_text_position(&mut self, position: TextPosition, side: &ScreenSide) {
        for panel in &mut self.panels {
            panel.set_text_position(position, side);
        }
    }

    pub fn set_auto_fit(&mut self, auto_fit: bool, side: &ScreenSide) {
        for panel in &mut self.panels {
            panel.set_auto_fit(auto_fit, side);
        }
    }

    pub fn set_background(&mut self, color: Color, side: &ScreenSide) {
        for panel in &mut self.panels {
            panel.set_background(color, side);
        }
    }

    /// Reset each panel matching `side` to its team's color
    #[cfg(test)]
    pub fn set_default_background(&mut self, teams: &TeamConfig, side: &ScreenSide) {
        for panel in &mut self.panels {
            if let Some(color) = teams.team_color_for_side(&panel.side()).first() {
                panel.set_background(*color, side);
            }
        }
    }

    pub fn set_image(&mut self, image: &RgbaImage, is_scaled: bool, side: &ScreenSide) {
        for panel in &mut self.panels {
            panel.set_image(image.clone(), is_scaled, side);
        }
    }

    pub fn set_background_overlay(&mut self, overlay: Option<&Overlay>, side: &ScreenSide) {
        for panel in &mut self.panels {
            panel.set_background_overlay(overlay.cloned(), side);
        }
    }

    pub fn blackout(&mut self) {
        for panel in &mut self.panels {
            panel.blackout();
        }
    }

    /// Mirror `source` panel by panel, adopting its split layout
    #[cfg(test)]
    pub fn set_all(&mut self, source: &ScreenText) {
        if source.panels.len() == 1 {
            self.single_display();
        } else {
            self.split_display();
        }
        if self.panels.len() != source.panels.len() {
            // Different side layouts: every panel takes the first source panel
            for panel in &mut self.panels {
                panel.set_all(&source.panels[0]);
            }
            return;
        }
        for (panel, source_panel) in self.panels.iter_mut().zip(&source.panels) {
            panel.set_all(source_panel);
        }
    }

    /// Compose all panels left to right
    pub fn render(&mut self, renderer: &dyn TextRenderer) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(self.width, self.height, Color::BLACK.to_rgba(255));
        let mut x = 0i64;
        for panel in &mut self.panels {
            let image = panel.render(renderer);
            image::imageops::replace(&mut canvas, &image, x, 0);
            x += image.width() as i64;
        }
        canvas
    }
}
