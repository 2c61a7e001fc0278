#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Offline-mode hazard and trap spawning.
//!
//! Used only when no server authority injects hazards and traps directly;
//! in that "dynamic spawning" regime this manager schedules random spawns
//! and expirations within a fixed set of spawn zones, honoring exclusion
//! zones and a minimum separation from other spawned entities.

use arena_core::{
    Event, HazardConfig, HazardId, HazardKind, Rect, TrapConfig, TrapEffectKind, TrapId, TrapKind,
    Vec2,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Minimum distance, in pixels, a freshly sampled spawn position must keep
/// from every exclusion zone and every other currently spawned entity.
const MIN_SEPARATION: f32 = 60.0;
/// Sampling attempts allowed per spawn cycle before giving up and waiting
/// for the next cycle.
const MAX_SAMPLE_ATTEMPTS: u32 = 20;
/// First id handed out to a dynamically spawned entity. Chosen well above
/// any plausible map-authored id range so the two never collide.
const DYNAMIC_ID_BASE: u32 = 1_000_000;

/// The five fixed rectangles dynamic spawns are sampled from: the four
/// playfield quadrants and a vertical mid-band, each inset from the
/// corners where transport interactables typically sit.
#[must_use]
pub fn spawn_zones() -> [Rect; 5] {
    [
        Rect { x: 80.0, y: 80.0, width: 480.0, height: 240.0 },
        Rect { x: 720.0, y: 80.0, width: 480.0, height: 240.0 },
        Rect { x: 80.0, y: 400.0, width: 480.0, height: 240.0 },
        Rect { x: 720.0, y: 400.0, width: 480.0, height: 240.0 },
        Rect { x: 560.0, y: 80.0, width: 160.0, height: 560.0 },
    ]
}

/// A sampled min/max range a schedule draws uniform values from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    /// Inclusive lower bound.
    pub min: f32,
    /// Exclusive-ish upper bound (per `rand`'s half-open sampling).
    pub max: f32,
}

impl Range {
    /// Creates a range, clamping an inverted bound to a zero-width range
    /// at `min` rather than panicking.
    #[must_use]
    pub fn new(min: f32, max: f32) -> Self {
        if max > min {
            Self { min, max }
        } else {
            Self { min, max: min }
        }
    }

    fn sample(self, rng: &mut ChaCha8Rng) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

/// Tuning for one of the two dynamic spawn schedules (hazards or traps).
#[derive(Clone, Copy, Debug)]
pub struct ScheduleConfig {
    /// Range the first spawn's delay is sampled from.
    pub initial_delay: Range,
    /// Range a spawned entity's lifetime is sampled from.
    pub lifetime: Range,
    /// Range the delay until the next spawn attempt is sampled from.
    pub respawn_delay: Range,
    /// Maximum number of entities from this schedule allowed to be active
    /// at once.
    pub max_concurrent: usize,
}

/// A static obstacle or zone a spawn must keep clear of: teleporters,
/// jump pads, and spawn points, each inflated by its own radius.
#[derive(Clone, Copy, Debug)]
pub struct ExclusionZone {
    /// Center of the zone to avoid.
    pub position: Vec2,
    /// Radius to keep clear of `position`.
    pub radius: f32,
}

struct Spawned<Id> {
    id: Id,
    position: Vec2,
    remaining_lifetime: f32,
}

/// Owns the hazard and trap spawn schedules and the entities they've
/// created.
pub struct DynamicSpawnManager {
    hazard_schedule: ScheduleConfig,
    trap_schedule: ScheduleConfig,
    exclusion_zones: Vec<ExclusionZone>,
    active_hazards: Vec<Spawned<HazardId>>,
    active_traps: Vec<Spawned<TrapId>>,
    next_hazard_spawn: f32,
    next_trap_spawn: f32,
    next_id: u32,
    rng: ChaCha8Rng,
}

impl std::fmt::Debug for DynamicSpawnManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicSpawnManager")
            .field("active_hazard_count", &self.active_hazards.len())
            .field("active_trap_count", &self.active_traps.len())
            .finish_non_exhaustive()
    }
}

/// A freshly spawned hazard or trap, returned to the coordinator so it can
/// register the entity with the corresponding manager.
pub enum Spawn {
    /// A newly spawned hazard.
    Hazard(HazardConfig),
    /// A newly spawned trap.
    Trap(TrapConfig),
}

impl DynamicSpawnManager {
    /// Builds a manager with the given schedules, seeded deterministically.
    #[must_use]
    pub fn new(hazard_schedule: ScheduleConfig, trap_schedule: ScheduleConfig, seed: u64) -> Self {
        Self {
            hazard_schedule,
            trap_schedule,
            exclusion_zones: Vec::new(),
            active_hazards: Vec::new(),
            active_traps: Vec::new(),
            next_hazard_spawn: 0.0,
            next_trap_spawn: 0.0,
            next_id: DYNAMIC_ID_BASE,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seeds both schedules' first spawn delay and records the exclusion
    /// zones spawns must keep clear of. Must be called once before the
    /// first [`DynamicSpawnManager::tick`].
    pub fn initialize(&mut self, exclusion_zones: Vec<ExclusionZone>) {
        self.exclusion_zones = exclusion_zones;
        self.next_hazard_spawn = self.hazard_schedule.initial_delay.sample(&mut self.rng);
        self.next_trap_spawn = self.trap_schedule.initial_delay.sample(&mut self.rng);
    }

    /// Advances expirations and spawn schedules by `dt`, returning every
    /// expiration event followed by every spawn produced this tick. Newly
    /// spawned entities are also returned via `out_spawns` so the
    /// coordinator can hand them to the hazard and trap managers.
    pub fn tick(&mut self, dt: f32, out_spawns: &mut Vec<Spawn>) -> Vec<Event> {
        let mut events = Vec::new();

        self.active_hazards.retain_mut(|spawn| {
            spawn.remaining_lifetime -= dt;
            let expired = spawn.remaining_lifetime <= 0.0;
            if expired {
                events.push(Event::HazardExpired { hazard: spawn.id });
            }
            !expired
        });
        self.active_traps.retain_mut(|spawn| {
            spawn.remaining_lifetime -= dt;
            let expired = spawn.remaining_lifetime <= 0.0;
            if expired {
                events.push(Event::TrapExpired { trap: spawn.id });
            }
            !expired
        });

        self.next_hazard_spawn -= dt;
        if self.next_hazard_spawn <= 0.0 {
            if self.active_hazards.len() < self.hazard_schedule.max_concurrent {
                if let Some((hazard, position)) = self.sample_hazard() {
                    let lifetime = self.hazard_schedule.lifetime.sample(&mut self.rng);
                    self.active_hazards.push(Spawned { id: hazard.id, position, remaining_lifetime: lifetime });
                    events.push(Event::HazardSpawned { hazard: hazard.id });
                    out_spawns.push(Spawn::Hazard(hazard));
                } else {
                    log::debug!("dynamic spawn: no valid hazard position found after {MAX_SAMPLE_ATTEMPTS} tries");
                }
            }
            self.next_hazard_spawn = self.hazard_schedule.respawn_delay.sample(&mut self.rng);
        }

        self.next_trap_spawn -= dt;
        if self.next_trap_spawn <= 0.0 {
            if self.active_traps.len() < self.trap_schedule.max_concurrent {
                if let Some((trap, position)) = self.sample_trap() {
                    let lifetime = self.trap_schedule.lifetime.sample(&mut self.rng);
                    self.active_traps.push(Spawned { id: trap.id, position, remaining_lifetime: lifetime });
                    events.push(Event::TrapSpawned { trap: trap.id });
                    out_spawns.push(Spawn::Trap(trap));
                } else {
                    log::debug!("dynamic spawn: no valid trap position found after {MAX_SAMPLE_ATTEMPTS} tries");
                }
            }
            self.next_trap_spawn = self.trap_schedule.respawn_delay.sample(&mut self.rng);
        }

        events
    }

    /// Number of hazards currently alive from this schedule.
    #[must_use]
    pub fn active_hazard_count(&self) -> usize {
        self.active_hazards.len()
    }

    /// Number of traps currently alive from this schedule.
    #[must_use]
    pub fn active_trap_count(&self) -> usize {
        self.active_traps.len()
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn sample_free_position(&mut self) -> Option<Vec2> {
        let zones = spawn_zones();
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let zone_index = self.rng.gen_range(0..zones.len());
            let zone = zones[zone_index];
            let candidate = Vec2::new(
                self.rng.gen_range(zone.left()..zone.right()),
                self.rng.gen_range(zone.top()..zone.bottom()),
            );
            if self.is_far_enough(candidate) {
                return Some(candidate);
            }
        }
        None
    }

    fn is_far_enough(&self, candidate: Vec2) -> bool {
        let clear_of_exclusions = self
            .exclusion_zones
            .iter()
            .all(|zone| arena_core::distance(candidate, zone.position) > zone.radius);
        let clear_of_hazards = self
            .active_hazards
            .iter()
            .all(|spawn| arena_core::distance(candidate, spawn.position) > MIN_SEPARATION);
        let clear_of_traps = self
            .active_traps
            .iter()
            .all(|spawn| arena_core::distance(candidate, spawn.position) > MIN_SEPARATION);
        clear_of_exclusions && clear_of_hazards && clear_of_traps
    }

    fn sample_hazard(&mut self) -> Option<(HazardConfig, Vec2)> {
        let position = self.sample_free_position()?;
        let kind = weighted_hazard_kind(&mut self.rng);
        let intensity = match kind {
            HazardKind::Slow => Range::new(0.25, 0.75).sample(&mut self.rng),
            HazardKind::Damage => Range::new(5.0, 25.0).sample(&mut self.rng),
            HazardKind::Emp => 1.0,
        };
        let id = HazardId::new(self.allocate_id());
        Some((
            HazardConfig {
                id,
                kind,
                bounds: Rect::from_origin_size(
                    Vec2::new(position.x - 40.0, position.y - 40.0),
                    Vec2::new(80.0, 80.0),
                ),
                intensity,
            },
            position,
        ))
    }

    fn sample_trap(&mut self) -> Option<(TrapConfig, Vec2)> {
        let position = self.sample_free_position()?;
        let (effect, effect_value) = match self.rng.gen_range(0..3) {
            0 => (TrapEffectKind::DamageBurst, Range::new(30.0, 60.0).sample(&mut self.rng)),
            1 => (TrapEffectKind::Knockback, Range::new(150.0, 250.0).sample(&mut self.rng)),
            _ => (TrapEffectKind::Stun, Range::new(0.3, 0.7).sample(&mut self.rng)),
        };
        let radius = Range::new(35.0, 50.0).sample(&mut self.rng);
        let cooldown = Range::new(8.0, 15.0).sample(&mut self.rng);
        let id = TrapId::new(self.allocate_id());
        Some((
            TrapConfig {
                id,
                kind: TrapKind::Pressure,
                position,
                radius,
                effect,
                effect_value,
                cooldown,
                interval: None,
                chain_radius: None,
            },
            position,
        ))
    }
}

fn weighted_hazard_kind(rng: &mut ChaCha8Rng) -> HazardKind {
    match rng.gen_range(0..4) {
        0 | 1 => HazardKind::Slow,
        2 => HazardKind::Damage,
        _ => HazardKind::Emp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tight_schedule(max_concurrent: usize) -> ScheduleConfig {
        ScheduleConfig {
            initial_delay: Range::new(0.0, 0.0),
            lifetime: Range::new(0.1, 0.1),
            respawn_delay: Range::new(0.0, 0.0),
            max_concurrent,
        }
    }

    #[test]
    fn spawns_never_exceed_max_concurrent() {
        let mut manager = DynamicSpawnManager::new(tight_schedule(2), tight_schedule(2), 42);
        manager.initialize(Vec::new());

        let mut total_spawn_events = 0;
        for _ in 0..100 {
            let mut spawns = Vec::new();
            let events = manager.tick(0.1, &mut spawns);
            total_spawn_events += events
                .iter()
                .filter(|event| matches!(event, Event::HazardSpawned { .. }))
                .count();
            assert!(manager.active_hazard_count() <= 2);
            assert!(manager.active_trap_count() <= 2);
        }
        assert!(total_spawn_events >= 1);
    }

    #[test]
    fn exclusion_zone_is_honored() {
        let mut manager = DynamicSpawnManager::new(tight_schedule(1), tight_schedule(0), 7);
        let zones = spawn_zones();
        let everything_but_one_corner: Vec<ExclusionZone> = zones
            .iter()
            .skip(1)
            .map(|zone| ExclusionZone { position: zone.center(), radius: 1000.0 })
            .collect();
        manager.initialize(everything_but_one_corner);

        let mut spawns = Vec::new();
        let _ = manager.tick(0.0, &mut spawns);
        if let Some(Spawn::Hazard(hazard)) = spawns.first() {
            assert!(zones[0].overlaps(&hazard.bounds) || zones[0].contains_point(hazard.bounds.center()));
        }
    }

    #[test]
    fn hazard_expires_after_lifetime() {
        let mut manager = DynamicSpawnManager::new(tight_schedule(1), tight_schedule(0), 3);
        manager.initialize(Vec::new());
        let mut spawns = Vec::new();
        let events = manager.tick(0.0, &mut spawns);
        assert!(events.iter().any(|e| matches!(e, Event::HazardSpawned { .. })));

        let events = manager.tick(0.2, &mut spawns);
        assert!(events.iter().any(|e| matches!(e, Event::HazardExpired { .. })));
        assert_eq!(manager.active_hazard_count(), 0);
    }
}
