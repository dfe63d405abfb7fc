//! One team side's panel: background, optional overlay and text blocks

use image::RgbaImage;

use super::background::{self, scale_to_fit};
use super::overlay::Overlay;
use super::text::{RenderableText, TextPosition};
use super::TextRenderer;
use crate::color::Color;
use crate::types::ScreenSide;

/// Content of a single side, rendered at a fixed size
///
/// The side-targeted setters only apply when the target shares a team side
/// (home, away or extra) with this panel, so one call can address a whole
/// screen and each panel picks up what concerns it.
#[derive(Debug, Clone)]
pub struct SidePanel {
    side: ScreenSide,
    width: u32,
    height: u32,
    texts: Vec<RenderableText>,
    /// Set while the background is a plain color; None for pictures
    background_color: Option<Color>,
    image: RgbaImage,
    image_is_scaled: bool,
    overlay: Option<Overlay>,
    auto_fit: bool,
}

impl SidePanel {
    /// Fresh panel showing `initial_text` on `background`
    ///
    /// Error sides ignore `background` and show the checkerboard with black text.
    pub fn new(initial_text: &str, side: ScreenSide, width: u32, height: u32, background: Color) -> Self {
        let mut panel = Self {
            side,
            width,
            height,
            texts: vec![RenderableText::new(initial_text, crate::constants::render::DEFAULT_FONT_SIZE)],
            background_color: None,
            image: RgbaImage::new(0, 0),
            image_is_scaled: false,
            overlay: None,
            auto_fit: true,
        };
        if side.error {
            panel.image = background::error_image(width, height);
            panel.texts[0].font.color = Color::BLACK;
        } else {
            panel.set_background_color(background);
        }
        panel
    }

    /// Copy of `source` laid out for a different size
    pub fn copy_for(source: &SidePanel, width: u32, height: u32) -> Self {
        let mut panel = source.clone();
        panel.width = width;
        panel.height = height;
        panel.refresh_background();
        panel
    }

    #[cfg(test)]
    pub fn side(&self) -> ScreenSide {
        self.side
    }

    /// Change the side this panel answers to, keeping its content
    pub fn set_side(&mut self, side: ScreenSide) {
        self.side = side;
    }

    #[cfg(test)]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[cfg(test)]
    pub fn texts(&self) -> &[RenderableText] {
        &self.texts
    }

    #[cfg(test)]
    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    #[cfg(test)]
    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    #[cfg(test)]
    pub fn auto_fit(&self) -> bool {
        self.auto_fit
    }

    /// True when `side` shares home, away or extra with this panel
    pub fn is_side(&self, side: &ScreenSide) -> bool {
        self.side.overlaps(side)
    }

    /// Regenerate generated backgrounds after a size change; pictures are kept
    fn refresh_background(&mut self) {
        if let Some(color) = self.background_color {
            self.initialize_for_color(color);
        } else if self.side.error {
            self.image = background::error_image(self.width, self.height);
        }
    }

    fn initialize_for_color(&mut self, color: Color) {
        self.image_is_scaled = false;
        self.image = background::solid(self.width, self.height, color);
        let font_color = color.contrast_color();
        for text in &mut self.texts {
            text.font.color = font_color;
        }
    }

    fn set_background_color(&mut self, color: Color) {
        self.background_color = Some(color);
        self.initialize_for_color(color);
    }

    /// Font color for new text on the current background
    fn font_color(&self) -> Color {
        match self.background_color {
            Some(color) => color.contrast_color(),
            None => Color::WHITE,
        }
    }

    /// Replace all text with a single block
    pub fn set_text(&mut self, text: &str, font_size: f32, side: &ScreenSide) {
        if !self.is_side(side) {
            return;
        }
        let mut renderable = RenderableText::new(text, font_size);
        renderable.font.color = self.font_color();
        self.texts = vec![renderable];
    }

    /// Append a block in the text color of the current background
    pub fn add_text(&mut self, mut text: RenderableText, side: &ScreenSide) {
        if self.is_side(side) {
            text.font.color = self.font_color();
            self.texts.push(text);
        }
    }

    pub fn reset_all_text(&mut self, side: &ScreenSide) {
        if self.is_side(side) {
            self.texts.clear();
        }
    }

    pub fn set_auto_fit(&mut self, auto_fit: bool, side: &ScreenSide) {
        if self.is_side(side) {
            self.auto_fit = auto_fit;
        }
    }

    /// Move every text block to `position`
    pub fn set_text_position(&mut self, position: TextPosition, side: &ScreenSide) {
        if self.is_side(side) {
            for text in &mut self.texts {
                text.position = position;
            }
        }
    }

    pub fn set_background(&mut self, color: Color, side: &ScreenSide) {
        if self.is_side(side) {
            self.set_background_color(color);
        }
    }

    /// Show a picture instead of a color; `is_scaled` aspect-fits it to the panel
    pub fn set_image(&mut self, image: RgbaImage, is_scaled: bool, side: &ScreenSide) {
        if self.is_side(side) {
            self.background_color = None;
            self.image = image;
            self.image_is_scaled = is_scaled;
        }
    }

    pub fn set_background_overlay(&mut self, overlay: Option<Overlay>, side: &ScreenSide) {
        if self.is_side(side) {
            self.overlay = overlay;
        }
    }

    /// Black background with nothing on it
    pub fn blackout(&mut self) {
        self.texts.clear();
        self.overlay = None;
        self.set_background_color(Color::BLACK);
    }

    /// Take over the content of `source`, keeping this panel's side and size
    #[cfg(test)]
    pub fn set_all(&mut self, source: &SidePanel) {
        let own_side = self.side;
        self.set_image(source.image.clone(), source.image_is_scaled, &own_side);
        match source.background_color {
            Some(color) => self.set_background_color(color),
            None => self.background_color = None,
        }
        self.texts = source.texts.clone();
        self.overlay = source.overlay.clone();
        self.auto_fit = source.auto_fit;
    }

    fn render_background(&self) -> RgbaImage {
        let mut canvas = background::solid(self.width, self.height, Color::BLACK);
        if self.image_is_scaled {
            let scaled = scale_to_fit(&self.image, self.width, self.height);
            let x = (self.width as i64 - scaled.width() as i64) / 2;
            let y = (self.height as i64 - scaled.height() as i64) / 2;
            image::imageops::overlay(&mut canvas, &scaled, x, y);
        } else {
            image::imageops::overlay(&mut canvas, &self.image, 0, 0);
        }
        canvas
    }

    /// Compose the panel; auto-fit shrinks stored font sizes as a side effect
    pub fn render(&mut self, renderer: &dyn TextRenderer) -> RgbaImage {
        let mut canvas = self.render_background();

        if let Some(overlay) = &self.overlay {
            overlay.draw(&mut canvas, self.font_color());
        }

        for text in &mut self.texts {
            if self.auto_fit {
                text.auto_fit(renderer, self.width, self.height);
            }
            text.draw(renderer, &mut canvas);
        }
        canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::overlay::OverlayPosition;
    use crate::render::testing::BlockRenderer;

    fn home_panel() -> SidePanel {
        SidePanel::new("Home", ScreenSide::home_side(), 200, 150, Color::BLUE)
    }

    #[test]
    fn test_new_uses_team_color() {
        let panel = home_panel();
        assert_eq!(panel.background_color(), Some(Color::BLUE));
        assert_eq!(panel.texts()[0].text, "Home");
        assert_eq!(panel.texts()[0].font.color, Color::WHITE);
        assert_eq!(panel.texts()[0].font.size, 10.0);
    }

    #[test]
    fn test_error_panel() {
        let mut panel = SidePanel::new("NO SCREENS FOUND!", ScreenSide::error_side(), 160, 80, Color::BLUE);
        assert_eq!(panel.background_color(), None);
        assert_eq!(panel.texts()[0].font.color, Color::BLACK);

        panel.set_text("ignored", 10.0, &ScreenSide::all_side());
        assert_eq!(panel.texts()[0].text, "NO SCREENS FOUND!");
        let image = panel.render(&BlockRenderer);
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_mutators_respect_side() {
        let mut panel = home_panel();
        panel.set_text("Away text", 5.0, &ScreenSide::away_side());
        assert_eq!(panel.texts()[0].text, "Home");

        panel.set_text("21", 5.0, &ScreenSide::all_side());
        assert_eq!(panel.texts().len(), 1);
        assert_eq!(panel.texts()[0].text, "21");
        assert_eq!(panel.texts()[0].font.size, 5.0);

        panel.add_text(RenderableText::new("extra", 3.0), &ScreenSide::home_side());
        assert_eq!(panel.texts().len(), 2);

        panel.reset_all_text(&ScreenSide::control_side());
        assert_eq!(panel.texts().len(), 2);
        panel.reset_all_text(&ScreenSide::home_side());
        assert!(panel.texts().is_empty());

        panel.set_auto_fit(false, &ScreenSide::away_side());
        assert!(panel.auto_fit());
        panel.set_auto_fit(false, &ScreenSide::home_side());
        assert!(!panel.auto_fit());

        panel.add_text(RenderableText::new("a", 3.0), &ScreenSide::home_side());
        panel.add_text(RenderableText::new("b", 3.0), &ScreenSide::home_side());
        panel.set_text_position(TextPosition::Bottom, &ScreenSide::away_side());
        assert_eq!(panel.texts()[0].position, TextPosition::Centered);
        panel.set_text_position(TextPosition::Bottom, &ScreenSide::home_side());
        assert!(panel.texts().iter().all(|t| t.position == TextPosition::Bottom));
    }

    #[test]
    fn test_background_switches_font_color() {
        let mut panel = home_panel();
        panel.set_background(Color::WHITE, &ScreenSide::home_side());
        assert_eq!(panel.texts()[0].font.color, Color::BLACK);

        panel.set_text("new", 10.0, &ScreenSide::home_side());
        assert_eq!(panel.texts()[0].font.color, Color::BLACK);
        panel.add_text(RenderableText::new("more", 10.0), &ScreenSide::home_side());
        assert_eq!(panel.texts()[1].font.color, Color::BLACK);

        panel.set_image(RgbaImage::new(4, 4), false, &ScreenSide::home_side());
        assert_eq!(panel.background_color(), None);
        panel.set_text("on picture", 10.0, &ScreenSide::home_side());
        assert_eq!(panel.texts()[0].font.color, Color::WHITE);
    }

    #[test]
    fn test_blackout() {
        let mut panel = home_panel();
        panel.set_background_overlay(
            Some(Overlay::new(RgbaImage::new(2, 2), 0.5, 255, OverlayPosition::Centered)),
            &ScreenSide::home_side(),
        );
        panel.blackout();

        assert!(panel.texts().is_empty());
        assert!(!panel.has_overlay());
        let image = panel.render(&BlockRenderer);
        assert!(image.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }

    #[test]
    fn test_set_all_keeps_own_side() {
        let mut away = SidePanel::new("Away", ScreenSide::away_side(), 100, 150, Color::RED);
        let mut home = home_panel();
        home.set_text("Score", 8.0, &ScreenSide::home_side());

        away.set_all(&home);
        assert_eq!(away.side(), ScreenSide::away_side());
        assert_eq!(away.size(), (100, 150));
        assert_eq!(away.background_color(), Some(Color::BLUE));
        assert_eq!(away.texts()[0].text, "Score");
        assert_eq!(away.render(&BlockRenderer).dimensions(), (100, 150));
    }

    #[test]
    fn test_copy_for_resizes_color_background() {
        let preview = home_panel();
        let mut presenter = SidePanel::copy_for(&preview, 400, 300);
        assert_eq!(presenter.size(), (400, 300));
        assert_eq!(presenter.texts(), preview.texts());
        let image = presenter.render(&BlockRenderer);
        assert_eq!(image.dimensions(), (400, 300));
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_scaled_image_is_letterboxed() {
        let mut panel = home_panel();
        panel.reset_all_text(&ScreenSide::home_side());
        panel.set_image(background::solid(10, 10, Color::GREEN), true, &ScreenSide::home_side());

        let image = panel.render(&BlockRenderer);
        // 150x150 square centered on 200x150
        assert_eq!(image.get_pixel(10, 75).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(100, 75).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_render_auto_fits_text() {
        let mut panel = home_panel();
        panel.set_text("a very long scoreboard line", 10.0, &ScreenSide::home_side());
        panel.render(&BlockRenderer);
        assert!(panel.texts()[0].font.size < 10.0);
        assert!(panel.texts()[0].extent(&BlockRenderer, 150).0 <= 200);

        panel.set_text("a very long scoreboard line", 10.0, &ScreenSide::home_side());
        panel.set_auto_fit(false, &ScreenSide::home_side());
        panel.render(&BlockRenderer);
        assert_eq!(panel.texts()[0].font.size, 10.0);
    }
}
