//! Flat-file persistence for display, team and image library state
//!
//! Each concern lives in its own JSON file under the config directory.
//! Loading never fails: a missing file yields the default state and a
//! corrupt one is logged and replaced by the default in memory (the file on
//! disk is left alone until the next explicit save).

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::config::display::DisplayConfigState;
use crate::config::team::TeamConfigState;
use crate::constants::config;
use crate::library::ImageLibraryState;

/// Storage used by the configuration owners
pub trait Persistence {
    fn load_displays(&self) -> DisplayConfigState;
    fn save_displays(&self, state: &DisplayConfigState) -> Result<()>;

    fn load_teams(&self) -> TeamConfigState;
    fn save_teams(&self, state: &TeamConfigState) -> Result<()>;

    fn load_image_library(&self) -> ImageLibraryState;
    fn save_image_library(&self, state: &ImageLibraryState) -> Result<()>;
}

/// JSON files in a single directory
#[derive(Debug, Clone)]
pub struct FilePersistence {
    dir: PathBuf,
}

impl FilePersistence {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Platform config directory, e.g. ~/.config/scoreboard-display
    pub fn default_dir() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(config::APP_DIR);
        path
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Delete every persisted file so the next load starts from defaults
    pub fn reset(&self) -> Result<()> {
        for file in [config::DISPLAYS_FILE, config::TEAMS_FILE, config::IMAGE_LIBRARY_FILE] {
            let path = self.dir.join(file);
            if path.exists() {
                fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove config file {}", path.display()))?;
                info!(path = %path.display(), "Removed config file");
            }
        }
        Ok(())
    }

    fn load<T: DeserializeOwned + Default>(&self, file: &str) -> T {
        let path = self.dir.join(file);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Config file not readable, using defaults");
                return T::default();
            }
        };

        match serde_json::from_str::<T>(&contents) {
            Ok(value) => value,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create config directory: {}", self.dir.display()))?;
        let path = self.dir.join(file);
        let contents = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize {}", file))?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file to {}", path.display()))?;
        debug!(path = %path.display(), "Saved config file");
        Ok(())
    }
}

impl Persistence for FilePersistence {
    fn load_displays(&self) -> DisplayConfigState {
        self.load(config::DISPLAYS_FILE)
    }

    fn save_displays(&self, state: &DisplayConfigState) -> Result<()> {
        self.save(config::DISPLAYS_FILE, state)
    }

    fn load_teams(&self) -> TeamConfigState {
        self.load(config::TEAMS_FILE)
    }

    fn save_teams(&self, state: &TeamConfigState) -> Result<()> {
        self.save(config::TEAMS_FILE, state)
    }

    fn load_image_library(&self) -> ImageLibraryState {
        self.load(config::IMAGE_LIBRARY_FILE)
    }

    fn save_image_library(&self, state: &ImageLibraryState) -> Result<()> {
        self.save(config::IMAGE_LIBRARY_FILE, state)
    }
}
