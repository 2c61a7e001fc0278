#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the arena simulation: geometry, map
//! schema, validation, and the types the tick-driven subsystems and
//! events are built from.

pub mod effects;
pub mod error;
pub mod events;
pub mod geometry;
pub mod ids;
pub mod map;
pub mod tile;
pub mod validate;

pub use effects::{aggregate, EffectState, ZoneEffect, ZoneEffectKind};
pub use error::ConfigError;
pub use events::Event;
pub use geometry::{circle_rect_overlap, distance, Rect, Vec2};
pub use ids::{BarrierId, HazardId, JumpPadId, PlayerId, SpawnPointId, TeleporterId, TrapId};
pub use map::{
    BarrierConfig, BarrierKind, CardinalDirection, HazardConfig, HazardKind, JumpDirection,
    JumpPadConfig, MapConfig, MapMetadata, SpawnPointConfig, TeleporterConfig, TrapConfig,
    TrapEffectKind, TrapKind,
};
pub use tile::{
    grid_in_bounds, grid_to_pixel_center, grid_to_pixel_rect, pixel_to_grid, TileKind,
    ARENA_HEIGHT, ARENA_WIDTH, GRID_COLUMNS, GRID_ROWS, TILE_SIZE,
};
pub use validate::{validate, ValidationReport};
