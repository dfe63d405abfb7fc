//! Constants shared across modules, grouped by the concern that owns them

/// Configuration file locations
pub mod config {
    /// Directory under the platform config dir (e.g. ~/.config/scoreboard-display)
    pub const APP_DIR: &str = "scoreboard-display";

    /// Display layout and role assignments
    pub const DISPLAYS_FILE: &str = "displays.json";

    /// Team types and colors
    pub const TEAMS_FILE: &str = "teams.json";

    /// Tagged image catalog
    pub const IMAGE_LIBRARY_FILE: &str = "image_library.json";
}

/// Display reconciliation defaults
pub mod display {
    /// Window width used for windowed mode when none has been configured
    pub const DEFAULT_WINDOW_WIDTH: i32 = 1024;

    /// Window height used for windowed mode when none has been configured
    pub const DEFAULT_WINDOW_HEIGHT: i32 = 768;
}

/// Text and image composition constants
pub mod render {
    /// Font sizes are expressed relative to a 75 unit tall screen
    pub const FONT_SCALE_DIVISOR: f32 = 75.0;

    /// Font size for freshly created text
    pub const DEFAULT_FONT_SIZE: f32 = 10.0;

    /// Amount the font size shrinks per auto-fit iteration
    pub const AUTO_FIT_STEP: f32 = 0.5;

    /// Margin above top text and below bottom text, as a percentage of height
    pub const TOP_OR_BOTTOM_MARGIN_PERCENT: f32 = 2.0;

    /// Margin around a bottom-left overlay, as a percentage of height
    pub const OVERLAY_MARGIN_PERCENT: f32 = 2.0;

    /// Number of checkerboard squares stacked vertically on the error image
    pub const ERROR_SQUARES_HIGH: u32 = 8;

    /// Size of the operator preview a presenter screen is copied from
    pub const PREVIEW_WIDTH: u32 = 640;
    pub const PREVIEW_HEIGHT: u32 = 480;

    /// Text shown on a side that has no usable display
    pub const ERROR_MESSAGE: &str = "NO SCREENS FOUND!";
}

/// Polling periods for the watch loop
pub mod timing {
    /// How often displays are re-detected (milliseconds)
    pub const DISPLAY_REFRESH_MS: u64 = 1000;

    /// How often the image library root is rescanned (seconds)
    pub const LIBRARY_SCAN_SECS: u64 = 5 * 60;
}

/// Image library constants
pub mod library {
    /// File extensions picked up when scanning the library root (lowercase)
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];
}
