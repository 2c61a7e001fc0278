#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Hazard zone containment and damage-tick accounting.
//!
//! The manager only tracks which players stand inside which hazards and
//! emits damage events at a fixed one-second cadence; it does not combine
//! overlapping hazard effects into a single speed multiplier or damage
//! rate itself — that aggregation is the zone effect stack's job
//! (`arena-system-zone-stack`), fed from [`HazardManager::hazards_at_position`].

use std::collections::{BTreeMap, BTreeSet};

use arena_core::{Event, HazardConfig, HazardId, HazardKind, PlayerId, Rect, Vec2};

const DAMAGE_TICK_SECONDS: f32 = 1.0;

/// A single hazard zone's live simulation state.
#[derive(Clone, Debug)]
struct Hazard {
    id: HazardId,
    kind: HazardKind,
    bounds: Rect,
    intensity: f32,
    damage_accumulators: BTreeMap<PlayerId, f32>,
}

/// Owns every hazard zone, map-authored or dynamically spawned, and
/// accounts for player containment and damage ticks.
#[derive(Debug, Default)]
pub struct HazardManager {
    hazards: BTreeMap<HazardId, Hazard>,
}

impl HazardManager {
    /// Builds a manager from a map's hazard configuration.
    #[must_use]
    pub fn load(configs: &[HazardConfig]) -> Self {
        let mut manager = Self::default();
        for config in configs {
            manager.add_hazard(config.clone());
        }
        manager
    }

    /// Adds a hazard zone, map-authored or dynamically spawned, without
    /// disturbing any other hazard's state.
    pub fn add_hazard(&mut self, config: HazardConfig) {
        self.hazards.insert(
            config.id,
            Hazard {
                id: config.id,
                kind: config.kind,
                bounds: config.bounds,
                intensity: config.intensity,
                damage_accumulators: BTreeMap::new(),
            },
        );
    }

    /// Removes a hazard zone. Unknown ids are a no-op.
    pub fn remove_hazard(&mut self, id: HazardId) {
        if self.hazards.remove(&id).is_none() {
            log::debug!("remove_hazard: unknown hazard {id:?}");
        }
    }

    /// Reports whether `id` is currently tracked.
    #[must_use]
    pub fn contains(&self, id: HazardId) -> bool {
        self.hazards.contains_key(&id)
    }

    /// Iterates every hazard currently tracked.
    pub fn active_hazards(&self) -> impl Iterator<Item = HazardId> + '_ {
        self.hazards.keys().copied()
    }

    /// The kind and intensity of a tracked hazard, if it exists.
    #[must_use]
    pub fn kind_and_intensity(&self, id: HazardId) -> Option<(HazardKind, f32)> {
        self.hazards.get(&id).map(|hazard| (hazard.kind, hazard.intensity))
    }

    /// Returns every hazard whose bounds contain `position`.
    ///
    /// Consumed by the coordinator once per player per tick to feed the
    /// zone effect stack.
    #[must_use]
    pub fn hazards_at_position(&self, position: Vec2) -> Vec<HazardId> {
        self.hazards
            .values()
            .filter(|hazard| hazard.bounds.contains_point(position))
            .map(|hazard| hazard.id)
            .collect()
    }

    /// Advances damage-hazard accumulators for the given player positions
    /// and emits a [`Event::HazardDamageApplied`] for every accumulator
    /// that crosses a one-second boundary.
    ///
    /// Players who leave a hazard's bounds have that hazard's accumulator
    /// reset to zero rather than paused, so partial exposure below one
    /// second of combined presence never silently carries over to a later,
    /// unrelated visit.
    pub fn tick(&mut self, dt: f32, players: &BTreeMap<PlayerId, Vec2>) -> Vec<Event> {
        let mut events = Vec::new();
        for hazard in self.hazards.values_mut() {
            if hazard.kind != HazardKind::Damage {
                continue;
            }

            let inside: BTreeSet<PlayerId> = players
                .iter()
                .filter(|(_, pos)| hazard.bounds.contains_point(**pos))
                .map(|(id, _)| *id)
                .collect();

            hazard.damage_accumulators.retain(|player, _| inside.contains(player));

            for player in &inside {
                let accumulator = hazard.damage_accumulators.entry(*player).or_insert(0.0);
                *accumulator += dt;
                while *accumulator >= DAMAGE_TICK_SECONDS {
                    *accumulator -= DAMAGE_TICK_SECONDS;
                    events.push(Event::HazardDamageApplied {
                        source: hazard.id,
                        player: *player,
                        amount: hazard.intensity,
                    });
                }
            }
        }
        events
    }
}
