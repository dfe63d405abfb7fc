//! Geometry and screen-side types shared by the config and render modules

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Screen-space point (e.g. the top-left corner of the control window)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl FromStr for Point {
    type Err = anyhow::Error;

    /// Parses `X,Y`, e.g. `10,20`
    fn from_str(s: &str) -> Result<Self> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("Expected X,Y but got '{}'", s))?;
        let x = x.trim().parse::<i32>().map_err(|e| anyhow!("Invalid x coordinate '{}': {}", x, e))?;
        let y = y.trim().parse::<i32>().map_err(|e| anyhow!("Invalid y coordinate '{}': {}", y, e))?;
        Ok(Point::new(x, y))
    }
}

/// Rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Half-open containment: the right and bottom edges are outside
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// Logical role(s) held by a display or a rendered panel
///
/// Flags are not mutually exclusive: a single monitor in windowed mode is
/// both `control` and `home`. Equality compares every flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSide {
    /// Hosts the operator UI
    pub control: bool,
    pub home: bool,
    pub away: bool,
    pub extra: bool,
    /// Degenerate setup with no usable presenter output
    pub error: bool,
}

impl ScreenSide {
    pub fn home_side() -> Self {
        Self { home: true, ..Self::default() }
    }

    pub fn away_side() -> Self {
        Self { away: true, ..Self::default() }
    }

    pub fn extra_side() -> Self {
        Self { extra: true, ..Self::default() }
    }

    pub fn all_side() -> Self {
        Self { home: true, away: true, extra: true, ..Self::default() }
    }

    pub fn none_side() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn control_side() -> Self {
        Self { control: true, ..Self::default() }
    }

    pub fn error_side() -> Self {
        Self { error: true, ..Self::default() }
    }

    /// True when both sides show the same team content (home, away or extra)
    pub fn overlaps(&self, other: &ScreenSide) -> bool {
        (self.home && other.home) || (self.away && other.away) || (self.extra && other.extra)
    }

    /// True when every team flag set on `other` is also set here
    pub fn covers(&self, other: &ScreenSide) -> bool {
        (!other.home || self.home) && (!other.away || self.away) && (!other.extra || self.extra)
    }

    pub fn union(&self, other: &ScreenSide) -> ScreenSide {
        ScreenSide {
            control: self.control || other.control,
            home: self.home || other.home,
            away: self.away || other.away,
            extra: self.extra || other.extra,
            error: self.error || other.error,
        }
    }

    /// True when the side carries nothing a presenter could show
    pub fn is_control_only(&self) -> bool {
        !self.home && !self.away && !self.extra && !self.error
    }

    /// Split into single-flag presentable sides (home, away, extra, error)
    pub fn components(&self) -> Vec<ScreenSide> {
        let mut parts = Vec::new();
        if self.home {
            parts.push(Self::home_side());
        }
        if self.away {
            parts.push(Self::away_side());
        }
        if self.extra {
            parts.push(Self::extra_side());
        }
        if self.error {
            parts.push(Self::error_side());
        }
        parts
    }

    fn flag_names(&self) -> Vec<&'static str> {
        [
            (self.control, "control"),
            (self.home, "home"),
            (self.away, "away"),
            (self.extra, "extra"),
            (self.error, "error"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }
}

impl fmt::Display for ScreenSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.flag_names();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join("+"))
        }
    }
}

impl FromStr for ScreenSide {
    type Err = anyhow::Error;

    /// Parses a comma or plus separated role list, e.g. `control,home` or `all`
    fn from_str(s: &str) -> Result<Self> {
        let mut side = ScreenSide::none_side();
        for part in s.split([',', '+']).map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_ascii_lowercase().as_str() {
                "control" => side.control = true,
                "home" => side.home = true,
                "away" => side.away = true,
                "extra" => side.extra = true,
                "error" => side.error = true,
                "all" => side = side.union(&ScreenSide::all_side()),
                "none" => {}
                other => return Err(anyhow!("Unknown screen side '{}'", other)),
            }
        }
        Ok(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let rect = Rect::new(0, 0, 1024, 768);
        assert!(rect.contains(Point::new(0, 0)));
        assert!(rect.contains(Point::new(1023, 767)));
        assert!(!rect.contains(Point::new(1024, 10)));
        assert!(!rect.contains(Point::new(10, 768)));
        assert!(!rect.contains(Point::new(-1, 10)));
    }

    #[test]
    fn test_parse_point() {
        assert_eq!("10,-20".parse::<Point>().unwrap(), Point::new(10, -20));
        assert_eq!(" 5 , 6 ".parse::<Point>().unwrap(), Point::new(5, 6));
        assert!("10".parse::<Point>().is_err());
        assert!("a,b".parse::<Point>().is_err());
    }

    #[test]
    fn test_overlaps_ignores_control_and_error() {
        let control_home = ScreenSide { control: true, home: true, ..Default::default() };
        assert!(control_home.overlaps(&ScreenSide::home_side()));
        assert!(!control_home.overlaps(&ScreenSide::away_side()));
        assert!(!ScreenSide::error_side().overlaps(&ScreenSide::error_side()));
        assert!(ScreenSide::all_side().overlaps(&ScreenSide::extra_side()));
    }

    #[test]
    fn test_covers() {
        assert!(ScreenSide::all_side().covers(&ScreenSide::home_side()));
        assert!(!ScreenSide::home_side().covers(&ScreenSide::away_side()));
        assert!(ScreenSide::home_side().covers(&ScreenSide::home_side()));
    }

    #[test]
    fn test_parse_and_display() {
        let side: ScreenSide = "control,home".parse().unwrap();
        assert!(side.control && side.home && !side.away);
        assert_eq!(side.to_string(), "control+home");

        let all: ScreenSide = "all".parse().unwrap();
        assert_eq!(all, ScreenSide::all_side());
        assert_eq!(ScreenSide::none_side().to_string(), "none");

        assert!("left".parse::<ScreenSide>().is_err());
    }

    #[test]
    fn test_components() {
        let side = ScreenSide { control: true, home: true, away: true, ..Default::default() };
        assert_eq!(side.components(), vec![ScreenSide::home_side(), ScreenSide::away_side()]);
        assert!(ScreenSide::control_side().components().is_empty());
        assert!(ScreenSide::control_side().is_control_only());
    }
}
