//! Read-only views into an [`Arena`], independent of mutating calls.
//!
//! Mirrors the small-free-function query style used elsewhere in this
//! workspace rather than exposing getters directly on `Arena`, keeping the
//! coordinator's own surface limited to the operations the specification
//! actually calls out.

use arena_core::{BarrierId, EffectState, HazardId, PlayerId, TileKind, TrapId, Vec2};
use arena_system_barriers::{Barrier, DamageState};
use arena_system_traps::TrapState;

use crate::Arena;

/// Looks up a barrier's live state by id.
#[must_use]
pub fn barrier(arena: &Arena, id: BarrierId) -> Option<&Barrier> {
    arena.barriers.barrier(id)
}

/// Every barrier id currently active (not yet destroyed).
#[must_use]
pub fn active_barrier_ids(arena: &Arena) -> Vec<BarrierId> {
    arena.barriers.active_barriers().map(Barrier::id).collect()
}

/// A barrier's coarse health bucket, if it exists.
#[must_use]
pub fn barrier_damage_state(arena: &Arena, id: BarrierId) -> Option<DamageState> {
    arena.barriers.barrier(id).map(Barrier::damage_state)
}

/// Every hazard id currently tracked, map-authored or dynamically spawned.
#[must_use]
pub fn active_hazard_ids(arena: &Arena) -> Vec<HazardId> {
    arena.hazards.active_hazards().collect()
}

/// A trap's current state-machine position, if it exists.
#[must_use]
pub fn trap_state(arena: &Arena, id: TrapId) -> Option<TrapState> {
    arena.traps.state(id)
}

/// The tile kind at a grid coordinate.
#[must_use]
pub fn tile_at(arena: &Arena, column: u32, row: u32) -> Option<TileKind> {
    arena.tile_map.get_tile(column, row)
}

/// A player's current aggregated zone effect state.
#[must_use]
pub fn effect_state(arena: &Arena, player: PlayerId) -> EffectState {
    arena.zone_stack.aggregate(player)
}

/// In dynamic spawning mode, the number of currently active hazards and
/// traps the spawn manager has created. `None` in authoritative mode.
#[must_use]
pub fn dynamic_spawn_counts(arena: &Arena) -> Option<(usize, usize)> {
    arena
        .dynamic_spawn
        .as_ref()
        .map(|manager| (manager.active_hazard_count(), manager.active_trap_count()))
}

/// Pixel center of a grid coordinate, as known to the arena's tile map.
#[must_use]
pub fn grid_to_pixel_center(arena: &Arena, column: u32, row: u32) -> Vec2 {
    arena.tile_map.grid_to_pixel_center(column, row)
}
