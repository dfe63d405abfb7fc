//! Configuration management for scoreboard-display
//!
//! This module provides two configuration owners:
//! - **display**: detected monitors and the logical role each one plays
//! - **team**: team types and colors

pub mod display;
pub mod team;

pub use display::{DisplayConfig, DisplayEnvironment, DisplayInfo};
pub use team::{TeamConfig, TeamType};
