#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod config;
pub mod i18n;
pub mod item;

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use config::GardenConfig;
pub use i18n::Translations;
pub use item::{Item, Tool, ToolKind};

/// Pixel size of one tile in the source spritesheets.
pub const SMALLEST_TILE_SIZE: i32 = 16;

/// Scale factor between sprite pixels and world pixels.
pub const PIXEL_ZOOM: i32 = 4;

/// Pixel size of one tile in world space.
pub const TILE_SIZE: i32 = SMALLEST_TILE_SIZE * PIXEL_ZOOM;

/// Number of days in one season.
pub const DAYS_PER_SEASON: u32 = 28;

/// Tile coordinates inside a location.
///
/// Ordering is row-major (`y`, then `x`) so that iteration over a
/// `BTreeMap<TilePos, _>` walks the map top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePos {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl TilePos {
    /// Origin tile; beds drawn here use the neutral sprite.
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Construct a tile position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Tile shifted by the given offset.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl PartialOrd for TilePos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TilePos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned pixel rectangle in a spritesheet or on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Construct a rectangle.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// In-game day counter (day 0 is the first day of spring, year 1).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GameDay(pub u32);

impl GameDay {
    /// First day in any timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` days.
    pub fn advance(self, delta: u32) -> Self {
        Self(self.0 + delta)
    }

    /// Day within the current season, starting at 1.
    pub fn day_of_season(self) -> u32 {
        self.0 % DAYS_PER_SEASON + 1
    }

    /// Whether this is the last day of a season (when the breakage sweep runs).
    pub fn is_season_end(self) -> bool {
        self.day_of_season() == DAYS_PER_SEASON
    }
}
