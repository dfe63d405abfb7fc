use anyhow::{Context, Result};
use tracing::{debug, warn};
use x11rb::connection::Connection;
use x11rb::protocol::randr::ConnectionExt as RandrExt;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

use crate::config::DisplayEnvironment;
use crate::types::{Point, Rect};

/// Monitor layout of the X11 display named by `$DISPLAY`
pub struct X11Environment {
    conn: RustConnection,
    root: Window,
    screens: Vec<Rect>,
    main_window: Option<Point>,
}

impl X11Environment {
    /// Connect and take an initial monitor snapshot
    ///
    /// `main_window` is where the operator's control window sits, if known.
    pub fn connect(main_window: Option<Point>) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(None).context("Failed to connect to X11 server")?;
        let root = conn.setup().roots[screen_num].root;
        let mut env = Self {
            conn,
            root,
            screens: Vec::new(),
            main_window,
        };
        env.refresh()?;
        Ok(env)
    }

    fn query_monitors(&self) -> Result<Vec<Rect>> {
        let reply = self
            .conn
            .randr_get_monitors(self.root, true)
            .context("Failed to query RandR monitors")?
            .reply()
            .context("Failed to get reply for RandR monitors query")?;

        let monitors = reply
            .monitors
            .iter()
            .map(|m| {
                (
                    m.primary,
                    Rect::new(m.x as i32, m.y as i32, m.width as i32, m.height as i32),
                )
            })
            .collect();
        Ok(primary_first(monitors))
    }

    fn root_geometry(&self) -> Result<Rect> {
        let geometry = self
            .conn
            .get_geometry(self.root)
            .context(format!("Failed to query geometry for root window {}", self.root))?
            .reply()
            .context("Failed to get root window geometry reply")?;
        Ok(Rect::new(
            geometry.x as i32,
            geometry.y as i32,
            geometry.width as i32,
            geometry.height as i32,
        ))
    }
}

/// Stable reorder putting the RandR primary monitor first
fn primary_first(mut monitors: Vec<(bool, Rect)>) -> Vec<Rect> {
    monitors.sort_by_key(|(primary, _)| !primary);
    monitors.into_iter().map(|(_, rect)| rect).collect()
}

impl DisplayEnvironment for X11Environment {
    fn refresh(&mut self) -> Result<()> {
        let mut screens = match self.query_monitors() {
            Ok(screens) => screens,
            Err(e) => {
                warn!(error = ?e, "RandR unavailable, falling back to root window geometry");
                Vec::new()
            }
        };
        if screens.is_empty() {
            screens.push(self.root_geometry()?);
        }
        debug!(count = screens.len(), "Enumerated X11 monitors");
        self.screens = screens;
        Ok(())
    }

    fn screen_count(&self) -> usize {
        self.screens.len()
    }

    fn screen_geometry(&self, index: usize) -> Rect {
        self.screens[index]
    }

    fn main_window_position(&self) -> Option<Point> {
        self.main_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_first_is_stable() {
        let a = Rect::new(0, 0, 1024, 768);
        let b = Rect::new(1024, 0, 1920, 1080);
        let c = Rect::new(2944, 0, 640, 480);

        assert_eq!(primary_first(vec![(false, a), (true, b), (false, c)]), vec![b, a, c]);
        assert_eq!(primary_first(vec![(false, a), (false, c)]), vec![a, c]);
        assert!(primary_first(Vec::new()).is_empty());
    }
}
