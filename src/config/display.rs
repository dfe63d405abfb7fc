//! Display configuration and reconciliation
//!
//! Maps the displays detected at runtime onto persisted logical roles. The
//! saved layout is reused as long as the number of displays is unchanged, so
//! roles the operator assigned survive restarts. When the count changes the
//! list is rebuilt with default roles.

use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::{debug, error, info, warn};

use crate::constants::display::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use crate::persistence::Persistence;
use crate::types::{Point, Rect, ScreenSide};

/// Source of monitor geometry and the control window location
pub trait DisplayEnvironment {
    /// Re-query the environment before a reconciliation pass
    fn refresh(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn screen_count(&self) -> usize;

    /// Geometry of screen `index`, `index < screen_count()`
    fn screen_geometry(&self, index: usize) -> Rect;

    /// Top-left corner of the operator window, if one exists yet
    fn main_window_position(&self) -> Option<Point>;
}

/// One physical monitor or emulated window
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayInfo {
    /// Stable identifier, independent of list position
    pub id: i32,
    pub dimensions: Rect,
    pub side: ScreenSide,
}

/// Persisted display layout. List order is presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfigState {
    pub windowed_mode: bool,
    pub window_count: i32,
    pub window_size: Rect,
    pub displays: Vec<DisplayInfo>,
}

/// Owner of the process-wide display configuration
pub struct DisplayConfig {
    state: DisplayConfigState,
    dirty: bool,
    persistence: Rc<dyn Persistence>,
    environment: Box<dyn DisplayEnvironment>,
}

impl DisplayConfig {
    /// Load the saved layout and reconcile it against the environment
    pub fn new(persistence: Rc<dyn Persistence>, environment: Box<dyn DisplayEnvironment>) -> Self {
        let mut config = Self {
            state: DisplayConfigState::default(),
            dirty: false,
            persistence,
            environment,
        };
        config.detect_displays();
        config
    }

    /// Reload the persisted layout, reconcile it and save the result
    ///
    /// Unsaved in-memory edits are discarded by the reload.
    pub fn detect_displays(&mut self) {
        if let Err(e) = self.environment.refresh() {
            error!(error = ?e, "Failed to refresh display environment, using last known screens");
        }

        self.state = self.persistence.load_displays();
        if self.state.window_size.width == 0 {
            self.state.window_size = Rect::new(0, 0, DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT);
        }

        if self.state.windowed_mode {
            self.reconcile_windows();
        } else {
            self.reconcile_monitors();
        }

        if self.state.displays.iter().any(|d| d.side.error) {
            warn!("Only one display detected, presenter output will overlap the control window");
        }

        self.save_settings();
    }

    fn reconcile_monitors(&mut self) {
        let screen_count = self.environment.screen_count();
        if screen_count == self.state.displays.len() {
            debug!(count = screen_count, "Screen count did not change, using saved config");
            return;
        }

        info!(
            from = self.state.displays.len(),
            to = screen_count,
            "Screen count changed, reconfiguring displays"
        );
        self.state.displays.clear();
        let main_window = self.environment.main_window_position();
        let mut set_home = true;

        for index in 0..screen_count {
            let dimensions = self.environment.screen_geometry(index);
            let is_primary = match main_window {
                Some(position) => dimensions.contains(position),
                // No control window yet: guess the first screen
                None => index == 0,
            };

            let mut side = ScreenSide::none_side();
            if is_primary {
                side.control = true;
                if screen_count == 1 {
                    side.error = true;
                }
            } else if set_home {
                side.home = true;
                set_home = false;
            } else {
                side.away = true;
            }

            debug!(index = index, geometry = %dimensions, side = %side, "Assigned default display role");
            self.state.displays.push(DisplayInfo {
                id: index as i32,
                dimensions,
                side,
            });
        }
    }

    fn reconcile_windows(&mut self) {
        let window_count = self.state.window_count.max(0) as usize;
        if window_count == self.state.displays.len() {
            debug!(count = window_count, "Window count did not change, using saved config");
            return;
        }

        info!(
            from = self.state.displays.len(),
            to = window_count,
            "Window count changed, reconfiguring windowed displays"
        );
        let window_size = self.state.window_size;
        self.state.displays = (0..window_count)
            .map(|index| {
                let side = if index == 0 {
                    ScreenSide { control: true, home: true, ..ScreenSide::default() }
                } else {
                    ScreenSide::away_side()
                };
                DisplayInfo {
                    id: index as i32,
                    dimensions: window_size,
                    side,
                }
            })
            .collect();
    }

    /// True if no control window exists yet, or if it sits inside `display`
    pub fn is_primary_display(&self, display: &DisplayInfo) -> bool {
        match self.environment.main_window_position() {
            None => true,
            Some(position) => display.dimensions.contains(position),
        }
    }

    pub fn number_of_displays(&self) -> usize {
        self.state.displays.len()
    }

    pub fn display_details(&self, index: usize) -> DisplayInfo {
        self.check_index(index);
        self.state.displays[index].clone()
    }

    pub fn displays(&self) -> &[DisplayInfo] {
        &self.state.displays
    }

    /// First display showing any of the team content in `side`
    pub fn display_for_side(&self, side: &ScreenSide) -> Option<usize> {
        self.state.displays.iter().position(|d| d.side.overlaps(side))
    }

    /// First display hosting the control window
    pub fn primary_display(&self) -> Option<usize> {
        self.state.displays.iter().position(|d| d.side.control)
    }

    /// Replace the role of display `index`; false if it already had `side`
    pub fn set_side(&mut self, index: usize, side: ScreenSide) -> bool {
        self.check_index(index);
        let display = &mut self.state.displays[index];
        if display.side == side {
            return false;
        }
        display.side = side;
        self.dirty = true;
        true
    }

    /// Replace the id of display `index`; false if it already had `id`
    pub fn set_display_id(&mut self, index: usize, id: i32) -> bool {
        self.check_index(index);
        let display = &mut self.state.displays[index];
        if display.id == id {
            return false;
        }
        display.id = id;
        self.dirty = true;
        true
    }

    /// Swap presentation order of two displays; ids travel with the records
    pub fn swap_displays(&mut self, a: usize, b: usize) -> bool {
        self.check_index(a);
        self.check_index(b);
        if a == b {
            return false;
        }
        self.state.displays.swap(a, b);
        self.dirty = true;
        true
    }

    pub fn windowed_mode(&self) -> bool {
        self.state.windowed_mode
    }

    pub fn window_count(&self) -> i32 {
        self.state.window_count
    }

    pub fn window_size(&self) -> Rect {
        self.state.window_size
    }

    pub fn set_windowed_mode(&mut self, enabled: bool) -> bool {
        Self::update(&mut self.state.windowed_mode, enabled, &mut self.dirty)
    }

    pub fn set_window_count(&mut self, count: i32) -> bool {
        Self::update(&mut self.state.window_count, count, &mut self.dirty)
    }

    pub fn set_window_width(&mut self, width: i32) -> bool {
        Self::update(&mut self.state.window_size.width, width, &mut self.dirty)
    }

    pub fn set_window_height(&mut self, height: i32) -> bool {
        Self::update(&mut self.state.window_size.height, height, &mut self.dirty)
    }

    fn update<T: PartialEq>(field: &mut T, value: T, dirty: &mut bool) -> bool {
        if *field == value {
            return false;
        }
        *field = value;
        *dirty = true;
        true
    }

    /// True when there are edits that `save_settings` has not written
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn state(&self) -> &DisplayConfigState {
        &self.state
    }

    /// Persist the current state; failures are logged, memory stays authoritative
    pub fn save_settings(&mut self) {
        if let Err(e) = self.persistence.save_displays(&self.state) {
            error!(error = ?e, "Failed to save display configuration");
        }
        self.dirty = false;
    }

    fn check_index(&self, index: usize) {
        assert!(
            index < self.state.displays.len(),
            "display index {} out of range (have {} displays)",
            index,
            self.state.displays.len()
        );
    }
}
