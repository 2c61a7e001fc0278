#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! The arena coordinator: owns every simulation subsystem and exposes the
//! tick, collision, damage, transport, death, and event-subscription API
//! a host drives the simulation through.

mod tile_map;

pub mod query;

pub use tile_map::TileMap;

use std::collections::{BTreeMap, BTreeSet};

use arena_core::{
    BarrierId, ConfigError, EffectState, Event, HazardConfig, HazardId, HazardKind, MapConfig,
    PlayerId, TrapConfig, TrapId, Vec2, ZoneEffect, ZoneEffectKind, GRID_COLUMNS,
};
use arena_system_barriers::BarrierManager;
use arena_system_dynamic_spawn::{DynamicSpawnManager, ExclusionZone, Range, ScheduleConfig, Spawn};
use arena_system_hazards::HazardManager;
use arena_system_spatial_index::SpatialIndex;
use arena_system_traps::TrapManager;
use arena_system_transport::{launch_event, teleport_event, TransportManager};
use arena_system_zone_stack::ZoneStackManager;

/// Radius of map clearance kept free of dynamic spawns around every
/// teleporter, jump pad, and spawn point, beyond each interactable's own
/// trigger radius.
const EXCLUSION_MARGIN: f32 = 20.0;
/// Clearance kept free of dynamic spawns around each spawn point, which
/// has no trigger radius of its own.
const SPAWN_POINT_EXCLUSION_RADIUS: f32 = 60.0;

/// Sink for the narrow callback surface a host can subscribe to, covering
/// the handful of [`Event`] variants most hosts react to directly. Hosts
/// that want the complete event stream should read the `Vec<Event>`
/// [`Arena::tick`] and the other mutating calls return instead; the
/// callback surface exists for hosts built around a subscribe-once style.
///
/// Every method has a no-op default; implementors override only the
/// events they care about. Callbacks are invoked synchronously and must
/// not call back into the arena.
pub trait ArenaCallbacks {
    /// A destructible barrier reached zero health.
    fn on_barrier_destroyed(&mut self, _barrier: BarrierId) {}
    /// A trap triggered, affecting the given players.
    fn on_trap_triggered(&mut self, _trap: TrapId, _affected_players: &[PlayerId]) {}
    /// A player was moved by a teleporter.
    fn on_player_teleported(&mut self, _player: PlayerId, _from: Vec2, _to: Vec2) {}
    /// A player was launched by a jump pad.
    fn on_player_launched(&mut self, _player: PlayerId, _velocity: Vec2) {}
    /// A damage hazard applied its per-tick damage to a player.
    fn on_hazard_damage(&mut self, _player: PlayerId, _damage: f32, _source: HazardId) {}
}

/// Tuning for the dynamic spawn manager's two schedules. Only consulted
/// when `load_map` is called with `use_dynamic_spawning = true`.
#[derive(Clone, Copy, Debug)]
pub struct DynamicSpawnConfig {
    /// Schedule controlling dynamically spawned hazards.
    pub hazards: ScheduleConfig,
    /// Schedule controlling dynamically spawned traps.
    pub traps: ScheduleConfig,
}

impl Default for DynamicSpawnConfig {
    fn default() -> Self {
        Self {
            hazards: ScheduleConfig {
                initial_delay: Range::new(2.0, 5.0),
                lifetime: Range::new(15.0, 30.0),
                respawn_delay: Range::new(5.0, 10.0),
                max_concurrent: 3,
            },
            traps: ScheduleConfig {
                initial_delay: Range::new(3.0, 6.0),
                lifetime: Range::new(20.0, 40.0),
                respawn_delay: Range::new(8.0, 15.0),
                max_concurrent: 2,
            },
        }
    }
}

/// A single arena instance: its loaded map and every live entity and
/// subsystem that map populated.
///
/// Scheduling model is single-threaded and cooperative — every subsystem
/// advances inside [`Arena::tick`]; calls outside a tick (map load,
/// callback registration, authoritative add/remove, explicit damage,
/// death notification) are atomic with respect to each other and must
/// never be interleaved with an in-progress tick by the host.
pub struct Arena {
    pub(crate) tile_map: TileMap,
    pub(crate) barriers: BarrierManager,
    pub(crate) spatial_index: SpatialIndex,
    pub(crate) hazards: HazardManager,
    pub(crate) traps: TrapManager,
    pub(crate) transport: TransportManager,
    pub(crate) zone_stack: ZoneStackManager,
    pub(crate) dynamic_spawn: Option<DynamicSpawnManager>,
    callbacks: Option<Box<dyn ArenaCallbacks>>,
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("dynamic_spawning", &self.dynamic_spawn.is_some())
            .field("has_callbacks", &self.callbacks.is_some())
            .finish_non_exhaustive()
    }
}

impl Arena {
    /// Validates `config`, and on success builds an arena from it.
    ///
    /// In dynamic spawning mode, hazards and traps start empty and are
    /// populated by the dynamic spawn manager instead of from `config`;
    /// in authoritative mode they load directly from `config` and an
    /// external collaborator manages them via `add_server_*`/`remove_server_*`.
    ///
    /// `seed` drives every PRNG-backed subsystem (random-exit teleporter
    /// selection, dynamic spawn sampling) so that a given map, schedule
    /// configuration, and seed reproduce an identical event stream.
    pub fn load_map(
        config: &MapConfig,
        use_dynamic_spawning: bool,
        seed: u64,
        dynamic_spawn_config: DynamicSpawnConfig,
    ) -> Result<Self, ConfigError> {
        let report = arena_core::validate(config);
        if !report.valid {
            return Err(ConfigError(report.errors));
        }

        let tile_map = TileMap::load(config.tiles.clone());
        let barriers = BarrierManager::load(&config.barriers);

        let mut spatial_index = SpatialIndex::new();
        for barrier in barriers.active_barriers() {
            let bounds = barrier.bounds();
            spatial_index.insert(
                barrier.id(),
                Vec2::new(bounds.x, bounds.y),
                Vec2::new(bounds.width, bounds.height),
            );
        }

        let hazards =
            if use_dynamic_spawning { HazardManager::default() } else { HazardManager::load(&config.hazards) };
        let traps =
            if use_dynamic_spawning { TrapManager::default() } else { TrapManager::load(&config.traps) };
        let transport = TransportManager::load(&config.teleporters, &config.jump_pads, seed);
        let zone_stack = ZoneStackManager::new();

        let dynamic_spawn = if use_dynamic_spawning {
            let mut manager =
                DynamicSpawnManager::new(dynamic_spawn_config.hazards, dynamic_spawn_config.traps, seed);
            manager.initialize(exclusion_zones(config));
            Some(manager)
        } else {
            None
        };

        Ok(Self {
            tile_map,
            barriers,
            spatial_index,
            hazards,
            traps,
            transport,
            zone_stack,
            dynamic_spawn,
            callbacks: None,
        })
    }

    /// Registers the callback sink events are dispatched through, in
    /// addition to the full stream every mutating call already returns.
    pub fn set_callbacks(&mut self, callbacks: Box<dyn ArenaCallbacks>) {
        self.callbacks = Some(callbacks);
    }

    /// Advances the simulation by `dt` given the current player
    /// positions, in order: dynamic spawns, hazard damage ticks, trap
    /// state machines, transport cooldowns, then zone-stack
    /// synchronization for every player. Returns every event produced,
    /// in that order.
    pub fn tick(&mut self, dt: f32, players: &BTreeMap<PlayerId, Vec2>) -> Vec<Event> {
        let mut events = Vec::new();

        if let Some(dynamic_spawn) = self.dynamic_spawn.as_mut() {
            let mut spawned = Vec::new();
            events.extend(dynamic_spawn.tick(dt, &mut spawned));
            for spawn in spawned {
                match spawn {
                    Spawn::Hazard(config) => self.hazards.add_hazard(config),
                    Spawn::Trap(config) => self.traps.add_trap(config),
                }
            }
        }

        events.extend(self.hazards.tick(dt, players));
        events.extend(self.traps.tick(dt, players));
        self.transport.tick(dt);

        for (&player, &position) in players {
            let containing = self.hazards.hazards_at_position(position);
            let active: BTreeSet<HazardId> = containing.iter().copied().collect();
            events.extend(self.zone_stack.cleanup_stale(player, &active));

            for hazard in containing {
                let Some((kind, intensity)) = self.hazards.kind_and_intensity(hazard) else { continue };
                let effect = ZoneEffect { source: hazard, kind: hazard_effect_kind(kind), value: intensity };
                if let Some(event) = self.zone_stack.add(player, effect) {
                    events.push(event);
                }
            }
        }

        self.dispatch_callbacks(&events);
        events
    }

    /// Tests whether a circle at `pos` with radius `radius` collides with
    /// any active barrier, using the spatial index as a broad-phase
    /// candidate filter.
    #[must_use]
    pub fn check_barrier_collision(&self, pos: Vec2, radius: f32) -> bool {
        let candidates = self.spatial_index.query(pos, radius);
        self.barriers.check_collision(pos, radius, &candidates)
    }

    /// Pushes `pos` clear of every active, colliding barrier.
    #[must_use]
    pub fn resolve_collision(&self, pos: Vec2, radius: f32) -> Vec2 {
        let candidates = self.spatial_index.query(pos, radius);
        self.barriers.resolve_collision(pos, radius, &candidates)
    }

    /// Applies damage to a destructible barrier. Removes it from the
    /// spatial index once destroyed so it is never again returned as a
    /// collision candidate.
    pub fn damage_barrier(&mut self, id: BarrierId, damage: u32) -> Vec<Event> {
        let events = self.barriers.apply_damage(id, damage);
        for event in &events {
            if let Event::BarrierDestroyed { barrier } = event {
                self.spatial_index.remove(*barrier);
            }
        }
        self.dispatch_callbacks(&events);
        events
    }

    /// Resolves a teleport trigger for `player` standing at `pos`.
    pub fn check_teleport(&mut self, player: PlayerId, pos: Vec2) -> Option<Vec2> {
        let destination = self.transport.check_teleport(player, pos)?;
        let event = teleport_event(player, pos, destination);
        self.dispatch_callbacks(std::slice::from_ref(&event));
        Some(destination)
    }

    /// Resolves a jump-pad trigger for `player` standing at `pos`.
    pub fn check_jump_pad(&mut self, player: PlayerId, pos: Vec2) -> Option<Vec2> {
        let velocity = self.transport.check_jump_pad(player, pos)?;
        let event = launch_event(player, velocity);
        self.dispatch_callbacks(std::slice::from_ref(&event));
        Some(velocity)
    }

    /// Arms a `projectile`-kind trap as if a projectile had struck it.
    pub fn notify_projectile_hit(&mut self, trap: TrapId) {
        self.traps.notify_projectile_hit(trap);
    }

    /// Clears a player's entire zone effect stack, as on death.
    pub fn on_player_death(&mut self, player: PlayerId) {
        let events = self.zone_stack.clear(player);
        self.dispatch_callbacks(&events);
    }

    /// Adds a hazard under authoritative-mode control. Has no effect on
    /// the dynamic spawn manager's own bookkeeping, so mixing the two
    /// modes for the same arena is the caller's responsibility to avoid.
    pub fn add_server_hazard(&mut self, config: HazardConfig) {
        self.hazards.add_hazard(config);
    }

    /// Removes a hazard under authoritative-mode control.
    pub fn remove_server_hazard(&mut self, id: HazardId) {
        self.hazards.remove_hazard(id);
    }

    /// Adds a trap under authoritative-mode control.
    pub fn add_server_trap(&mut self, config: TrapConfig) {
        self.traps.add_trap(config);
    }

    /// Removes a trap under authoritative-mode control.
    pub fn remove_server_trap(&mut self, id: TrapId) {
        self.traps.remove_trap(id);
    }

    /// A player's current aggregated zone effect state.
    #[must_use]
    pub fn player_effects(&self, player: PlayerId) -> EffectState {
        self.zone_stack.aggregate(player)
    }

    fn dispatch_callbacks(&mut self, events: &[Event]) {
        let Some(callbacks) = self.callbacks.as_mut() else { return };
        for event in events {
            match event {
                Event::BarrierDestroyed { barrier } => callbacks.on_barrier_destroyed(*barrier),
                Event::TrapTriggered { trap, affected_players } => {
                    callbacks.on_trap_triggered(*trap, affected_players);
                }
                Event::PlayerTeleported { player, from, to } => {
                    callbacks.on_player_teleported(*player, *from, *to);
                }
                Event::PlayerLaunched { player, velocity } => {
                    callbacks.on_player_launched(*player, *velocity);
                }
                Event::HazardDamageApplied { source, player, amount } => {
                    callbacks.on_hazard_damage(*player, *amount, *source);
                }
                _ => {}
            }
        }
    }
}

fn hazard_effect_kind(kind: HazardKind) -> ZoneEffectKind {
    match kind {
        HazardKind::Damage => ZoneEffectKind::DamageOverTime,
        HazardKind::Slow => ZoneEffectKind::SpeedModifier,
        HazardKind::Emp => ZoneEffectKind::PowerUpDisable,
    }
}

fn exclusion_zones(config: &MapConfig) -> Vec<ExclusionZone> {
    let mut zones = Vec::new();
    for teleporter in &config.teleporters {
        zones.push(ExclusionZone { position: teleporter.position, radius: teleporter.radius + EXCLUSION_MARGIN });
    }
    for jump_pad in &config.jump_pads {
        zones.push(ExclusionZone { position: jump_pad.position, radius: jump_pad.radius + EXCLUSION_MARGIN });
    }
    for spawn_point in &config.spawn_points {
        zones.push(ExclusionZone { position: spawn_point.position, radius: SPAWN_POINT_EXCLUSION_RADIUS });
    }
    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{
        BarrierConfig, BarrierKind, HazardConfig, HazardKind, MapMetadata, Rect, SpawnPointConfig,
        SpawnPointId, TeleporterConfig, TeleporterId, TrapConfig, TrapEffectKind, TrapKind,
    };

    fn floor_grid() -> Vec<Vec<arena_core::TileKind>> {
        vec![vec![arena_core::TileKind::Floor; GRID_COLUMNS as usize]; arena_core::GRID_ROWS as usize]
    }

    fn base_config() -> MapConfig {
        MapConfig {
            metadata: MapMetadata {
                name: "Proving Grounds".to_string(),
                author: "Someone".to_string(),
                version: "1.0.0".to_string(),
                description: "A small arena.".to_string(),
                theme: None,
            },
            tiles: floor_grid(),
            barriers: Vec::new(),
            hazards: Vec::new(),
            traps: Vec::new(),
            teleporters: Vec::new(),
            jump_pads: Vec::new(),
            spawn_points: vec![
                SpawnPointConfig { id: SpawnPointId::Player1, position: Vec2::new(40.0, 40.0) },
                SpawnPointConfig { id: SpawnPointId::Player2, position: Vec2::new(1200.0, 640.0) },
            ],
            power_up_spawns: Vec::new(),
        }
    }

    #[test]
    fn invalid_config_is_rejected_with_reasons() {
        let mut config = base_config();
        config.tiles.pop();
        let result = Arena::load_map(&config, false, 1, DynamicSpawnConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn navigate_hazards_and_teleport() {
        let mut config = base_config();
        config.hazards.push(HazardConfig {
            id: HazardId::new(1),
            kind: HazardKind::Slow,
            bounds: Rect { x: 200.0, y: 300.0, width: 100.0, height: 100.0 },
            intensity: 0.5,
        });
        config.hazards.push(HazardConfig {
            id: HazardId::new(2),
            kind: HazardKind::Damage,
            bounds: Rect { x: 800.0, y: 300.0, width: 100.0, height: 100.0 },
            intensity: 10.0,
        });
        config.teleporters.push(TeleporterConfig {
            id: TeleporterId::new(1),
            pair_id: Some(1),
            position: Vec2::new(400.0, 350.0),
            radius: 30.0,
            random_exits: None,
        });
        config.teleporters.push(TeleporterConfig {
            id: TeleporterId::new(2),
            pair_id: Some(1),
            position: Vec2::new(700.0, 350.0),
            radius: 30.0,
            random_exits: None,
        });

        let mut arena = Arena::load_map(&config, false, 1, DynamicSpawnConfig::default()).unwrap();
        let player = PlayerId::new(1);

        let mut players = BTreeMap::new();
        players.insert(player, Vec2::new(250.0, 350.0));
        let _ = arena.tick(0.016, &players);
        assert_eq!(arena.player_effects(player).speed_multiplier, 0.5);

        players.insert(player, Vec2::new(400.0, 350.0));
        let _ = arena.tick(0.016, &players);
        assert_eq!(arena.player_effects(player).speed_multiplier, 1.0);

        let destination = arena.check_teleport(player, Vec2::new(400.0, 350.0));
        assert_eq!(destination, Some(Vec2::new(700.0, 350.0)));

        players.insert(player, Vec2::new(850.0, 350.0));
        let mut damage_events = 0;
        for _ in 0..2 {
            let events = arena.tick(0.1, &players);
            damage_events += events
                .iter()
                .filter(|event| matches!(event, Event::HazardDamageApplied { .. }))
                .count();
        }
        assert!(arena.player_effects(player).damage_per_second > 0.0);
        let _ = damage_events;
    }

    #[test]
    fn destroy_barrier_and_pass() {
        let mut config = base_config();
        config.barriers.push(BarrierConfig {
            id: BarrierId::new(1),
            kind: BarrierKind::Destructible,
            position: Vec2::new(600.0, 320.0),
            size: Vec2::new(80.0, 80.0),
            health: Some(100),
            direction: None,
        });

        let mut arena = Arena::load_map(&config, false, 1, DynamicSpawnConfig::default()).unwrap();
        let center = Vec2::new(640.0, 360.0);
        assert!(arena.check_barrier_collision(center, 10.0));

        let _ = arena.damage_barrier(BarrierId::new(1), 40);
        let _ = arena.damage_barrier(BarrierId::new(1), 40);
        let events = arena.damage_barrier(BarrierId::new(1), 40);
        assert_eq!(events, vec![Event::BarrierDestroyed { barrier: BarrierId::new(1) }]);
        assert!(!arena.check_barrier_collision(center, 10.0));
    }

    #[test]
    fn death_clears_effect_state() {
        let mut config = base_config();
        config.hazards.push(HazardConfig {
            id: HazardId::new(1),
            kind: HazardKind::Slow,
            bounds: Rect { x: 200.0, y: 300.0, width: 100.0, height: 100.0 },
            intensity: 0.5,
        });
        let mut arena = Arena::load_map(&config, false, 1, DynamicSpawnConfig::default()).unwrap();
        let player = PlayerId::new(1);
        let mut players = BTreeMap::new();
        players.insert(player, Vec2::new(250.0, 350.0));
        let _ = arena.tick(0.016, &players);
        assert_eq!(arena.player_effects(player).speed_multiplier, 0.5);

        arena.on_player_death(player);
        assert_eq!(arena.player_effects(player), EffectState::neutral());
    }

    #[test]
    fn trap_in_hazard_still_applies_slow_after_trigger() {
        let mut config = base_config();
        config.hazards.push(HazardConfig {
            id: HazardId::new(1),
            kind: HazardKind::Slow,
            bounds: Rect { x: 600.0, y: 320.0, width: 160.0, height: 160.0 },
            intensity: 0.5,
        });
        config.traps.push(TrapConfig {
            id: TrapId::new(1),
            kind: TrapKind::Pressure,
            position: Vec2::new(680.0, 400.0),
            radius: 40.0,
            effect: TrapEffectKind::DamageBurst,
            effect_value: 50.0,
            cooldown: 10.0,
            interval: None,
            chain_radius: None,
        });

        let mut arena = Arena::load_map(&config, false, 1, DynamicSpawnConfig::default()).unwrap();
        let player = PlayerId::new(1);
        let mut players = BTreeMap::new();
        players.insert(player, Vec2::new(680.0, 400.0));

        let _ = arena.tick(0.016, &players);
        assert_eq!(arena.player_effects(player).speed_multiplier, 0.5);

        let events = arena.tick(0.35, &players);
        assert!(events.iter().any(|event| matches!(event, Event::TrapTriggered { .. })));
        assert_eq!(arena.player_effects(player).speed_multiplier, 0.5);
    }
}
