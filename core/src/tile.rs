//! Tile grid constants and the informational tile catalogue.
//!
//! The tile grid drives map validation and external renderers; the
//! simulation itself acts on the explicit entity lists in [`crate::map`],
//! not on tile kinds.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Vec2};

/// Number of tile columns in the playfield grid.
pub const GRID_COLUMNS: u32 = 16;
/// Number of tile rows in the playfield grid.
pub const GRID_ROWS: u32 = 9;
/// Side length of a single tile, in pixels.
pub const TILE_SIZE: f32 = 80.0;
/// Playfield width in pixels.
pub const ARENA_WIDTH: f32 = GRID_COLUMNS as f32 * TILE_SIZE;
/// Playfield height in pixels.
pub const ARENA_HEIGHT: f32 = GRID_ROWS as f32 * TILE_SIZE;

/// The kind of terrain or interactable occupying a single tile.
///
/// This catalogue only informs validation and rendering; the entities that
/// actually drive simulation (barriers, hazards, traps, teleporters, jump
/// pads) are tracked separately with floating-point positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Open, walkable ground.
    Floor,
    /// An impassable wall.
    Wall,
    /// A low wall, visually distinct from `Wall` but equally impassable.
    HalfWall,
    /// Ground marked as carrying a damage-over-time hazard.
    HazardDamage,
    /// Ground marked as carrying a slow hazard.
    HazardSlow,
    /// Ground marked as carrying an EMP hazard.
    HazardEmp,
    /// Ground marked as carrying a pressure-plate trap.
    TrapPressure,
    /// Ground marked as carrying a timed trap.
    TrapTimed,
    /// Ground marked as a teleporter pad.
    Teleporter,
    /// Ground marked as a jump pad.
    JumpPad,
}

impl TileKind {
    /// Reports whether a player body can walk across a tile of this kind.
    #[must_use]
    pub const fn walkable(self) -> bool {
        !matches!(self, Self::Wall | Self::HalfWall)
    }
}

/// Reports whether a grid coordinate lies within the playfield.
#[must_use]
pub fn grid_in_bounds(column: i32, row: i32) -> bool {
    column >= 0 && row >= 0 && (column as u32) < GRID_COLUMNS && (row as u32) < GRID_ROWS
}

/// Converts a pixel coordinate to the grid cell containing it.
///
/// The result may lie outside the playfield; callers should check
/// [`grid_in_bounds`] before indexing a tile grid with it.
#[must_use]
pub fn pixel_to_grid(x: f32, y: f32) -> (i32, i32) {
    ((x / TILE_SIZE).floor() as i32, (y / TILE_SIZE).floor() as i32)
}

/// Converts a grid cell to its covering pixel rectangle.
#[must_use]
pub fn grid_to_pixel_rect(column: u32, row: u32) -> Rect {
    Rect::from_origin_size(
        Vec2::new(column as f32 * TILE_SIZE, row as f32 * TILE_SIZE),
        Vec2::new(TILE_SIZE, TILE_SIZE),
    )
}

/// Converts a grid cell to the pixel coordinate of its center.
#[must_use]
pub fn grid_to_pixel_center(column: u32, row: u32) -> Vec2 {
    Vec2::new(
        column as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        row as f32 * TILE_SIZE + TILE_SIZE / 2.0,
    )
}
