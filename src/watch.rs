//! Polling loop that keeps displays and the image library current
//!
//! Replaces the toolkit timers: display detection runs every refresh period
//! and the library rescan every scan period. Neither runs at startup.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::DisplayConfig;
use crate::constants::timing;
use crate::library::{ImageLibrary, LibraryUpdateResults};

/// Longest sleep between stop-flag checks
const MAX_SLEEP: Duration = Duration::from_millis(100);

/// Fixed-period timer driven by explicit instants
#[derive(Debug, Clone)]
pub struct PeriodicTask {
    period: Duration,
    next_due: Instant,
}

impl PeriodicTask {
    /// First firing is one full period after `now`
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            next_due: now + period,
        }
    }

    /// True (and rescheduled) when the task is due at `now`
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.period;
        true
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    pub refresh: Duration,
    pub scan: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            refresh: Duration::from_millis(timing::DISPLAY_REFRESH_MS),
            scan: Duration::from_secs(timing::LIBRARY_SCAN_SECS),
        }
    }
}

/// Rescan the library root without dropping missing images
pub fn scan_library(library: &mut ImageLibrary) -> LibraryUpdateResults {
    let results = library.detect_library_changes(false);
    if results.is_empty() {
        debug!("Library scan found no changes");
    } else {
        info!(summary = %results.summary(), "Library scan complete");
        library.save_library();
    }
    results
}

fn refresh_displays(displays: &mut DisplayConfig) {
    let before = displays.number_of_displays();
    displays.detect_displays();
    let after = displays.number_of_displays();
    if before != after {
        info!(from = before, to = after, "Display count changed");
    }
}

/// Run until `stop` is set
pub fn run(
    displays: &mut DisplayConfig,
    library: &mut ImageLibrary,
    options: WatchOptions,
    stop: &AtomicBool,
) {
    let start = Instant::now();
    let mut refresh = PeriodicTask::new(options.refresh, start);
    let mut scan = PeriodicTask::new(options.scan, start);
    info!(
        refresh_ms = options.refresh.as_millis() as u64,
        scan_secs = options.scan.as_secs(),
        "Watching displays and image library"
    );

    while !stop.load(Ordering::Relaxed) {
        let now = Instant::now();
        if refresh.poll(now) {
            refresh_displays(displays);
        }
        if scan.poll(now) {
            scan_library(library);
        }

        let now = Instant::now();
        let wait = refresh
            .time_until_due(now)
            .min(scan.time_until_due(now))
            .min(MAX_SLEEP);
        thread::sleep(wait);
    }
    info!("Stop requested, leaving watch loop");
}
