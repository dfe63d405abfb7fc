//! Command line interface

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::color::Color;
use crate::config::TeamType;
use crate::constants::timing;
use crate::render::TextPosition;
use crate::types::{Point, ScreenSide};

/// Scoreboard display manager: detects presenter displays, composes what
/// each one shows and maintains the image library
#[derive(Parser, Debug)]
#[command(name = "scoreboard-display", version)]
pub struct CommandArgs {
    /// Skip the update check
    #[arg(short = 'n', long, global = true)]
    pub noupdate: bool,

    /// Delete saved configuration before starting
    #[arg(short = 'r', long, global = true)]
    pub resetconfig: bool,

    /// Configuration directory (default: platform config dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Position of the operator control window, as X,Y
    #[arg(long, global = true, value_name = "X,Y")]
    pub control_at: Option<Point>,

    #[command(subcommand)]
    pub command: Command,
}

impl CommandArgs {
    pub fn auto_update(&self) -> bool {
        !self.noupdate
    }

    pub fn reset_config(&self) -> bool {
        self.resetconfig
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconcile displays and print the display table
    Detect,

    /// Assign roles to a display, e.g. `set-side 1 home,away`
    SetSide {
        index: usize,
        roles: ScreenSide,
    },

    /// Change the id of a display
    SetId { index: usize, id: i32 },

    /// Swap the presentation order of two displays
    Swap { a: usize, b: usize },

    /// Configure windowed mode (emulated displays)
    Windowed(WindowedArgs),

    /// Set a team's color, e.g. `team-color away #AA0000`
    TeamColor { team: TeamType, color: Color },

    /// Compose every presenter display and write one PNG per display
    Render(RenderArgs),

    /// Image library maintenance
    Library {
        #[command(subcommand)]
        action: LibraryCommand,
    },

    /// Keep re-detecting displays and rescanning the library until interrupted
    Watch {
        #[arg(long, default_value_t = timing::DISPLAY_REFRESH_MS)]
        refresh_ms: u64,

        #[arg(long, default_value_t = timing::LIBRARY_SCAN_SECS)]
        scan_secs: u64,
    },
}

#[derive(Args, Debug)]
pub struct WindowedArgs {
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,

    #[arg(long)]
    pub disable: bool,

    /// Number of emulated displays
    #[arg(long)]
    pub count: Option<i32>,

    #[arg(long)]
    pub width: Option<i32>,

    #[arg(long)]
    pub height: Option<i32>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Directory receiving display-<id>.png files
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,

    /// Text to show; `\n` separates lines
    #[arg(long)]
    pub text: Option<String>,

    /// Further text block drawn after the main text; may be repeated
    #[arg(long = "add-text", value_name = "TEXT")]
    pub add_text: Vec<String>,

    /// Remove the initial text block
    #[arg(long, conflicts_with = "text")]
    pub no_text: bool,

    /// Font size relative to a 75 unit tall screen
    #[arg(long, default_value_t = crate::constants::render::DEFAULT_FONT_SIZE)]
    pub font_size: f32,

    /// Text placement: top, centered or bottom
    #[arg(long, default_value = "centered")]
    pub position: TextPosition,

    /// Sides the content is aimed at, e.g. `home` or `all`
    #[arg(long, default_value = "all")]
    pub side: ScreenSide,

    /// Solid background color
    #[arg(long, conflicts_with = "image")]
    pub background: Option<Color>,

    /// Background picture
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Aspect-fit the background picture instead of drawing it at full size
    #[arg(long, requires = "image")]
    pub scaled: bool,

    /// Overlay picture (logo), recolored to the text color
    #[arg(long)]
    pub overlay: Option<PathBuf>,

    /// Fraction of the screen the overlay may cover
    #[arg(long, default_value_t = 0.5)]
    pub overlay_fraction: f64,

    /// Maximum overlay opacity (0-255)
    #[arg(long, default_value_t = 255)]
    pub overlay_alpha: u8,

    /// Put the overlay in the bottom-left corner instead of the center
    #[arg(long)]
    pub overlay_corner: bool,

    /// Draw text at its configured size even if it overflows
    #[arg(long)]
    pub no_auto_fit: bool,

    /// Black out every display
    #[arg(long)]
    pub blackout: bool,
}

#[derive(Subcommand, Debug)]
pub enum LibraryCommand {
    /// Search tags and names; an empty query lists everything
    Search {
        #[arg(default_value = "")]
        query: String,
    },

    /// List stored file paths
    List,

    /// List all tags
    Tags {
        /// Include image names
        #[arg(long)]
        names: bool,
    },

    /// Add an image
    Add {
        path: PathBuf,

        #[arg(long)]
        name: String,

        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// Remove the image stored at exactly this path
    Remove { path: PathBuf },

    /// Repoint the image stored at exactly FROM to TO
    Move { from: PathBuf, to: PathBuf },

    /// Forget every image and the library root
    Clear,

    /// Show or change the library root
    Root {
        path: Option<PathBuf>,

        /// Only change the root; relative images move with it
        #[arg(long, requires = "path")]
        keep_paths: bool,

        /// Make every path absolute and drop the root
        #[arg(long, conflicts_with = "path")]
        remove: bool,
    },

    /// Pick up added, moved and removed files under the root
    Scan {
        #[arg(long)]
        delete_missing: bool,
    },
}
