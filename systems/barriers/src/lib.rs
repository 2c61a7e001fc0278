#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Barrier lifetimes, collision, and damage resolution.
//!
//! The manager answers two collision questions for its caller: whether a
//! circle overlaps any active barrier among a candidate set
//! ([`BarrierManager::check_collision`]), and where that circle ends up
//! once pushed clear of every overlap
//! ([`BarrierManager::resolve_collision`]). Candidates are expected to come
//! from a spatial index query; the manager itself does no broad-phase
//! filtering.

use std::collections::BTreeMap;

use arena_core::{BarrierConfig, BarrierId, BarrierKind, CardinalDirection, Event, Rect, Vec2};

const RESOLVE_ITERATION_CAP: u32 = 8;

/// Coarse health bucket derived from `health / max_health`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageState {
    /// At least 67% health remaining.
    Intact,
    /// At least 34% health remaining.
    Cracked,
    /// Health remaining, but less than 34%.
    Damaged,
    /// No health remaining; the barrier no longer collides.
    Destroyed,
}

fn damage_state(health: u32, max_health: u32) -> DamageState {
    if max_health == 0 {
        return DamageState::Destroyed;
    }
    let ratio = f64::from(health) / f64::from(max_health);
    if ratio >= 0.67 {
        DamageState::Intact
    } else if ratio >= 0.34 {
        DamageState::Cracked
    } else if ratio > 0.0 {
        DamageState::Damaged
    } else {
        DamageState::Destroyed
    }
}

/// A single barrier's live simulation state.
#[derive(Clone, Debug)]
pub struct Barrier {
    id: BarrierId,
    kind: BarrierKind,
    bounds: Rect,
    health: u32,
    max_health: u32,
    damage_state: DamageState,
    direction: Option<CardinalDirection>,
    active: bool,
}

impl Barrier {
    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> BarrierId {
        self.id
    }

    /// Archetype of this barrier.
    #[must_use]
    pub fn kind(&self) -> BarrierKind {
        self.kind
    }

    /// Current footprint.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Remaining hit points. Always `0` for non-destructible kinds.
    #[must_use]
    pub fn health(&self) -> u32 {
        self.health
    }

    /// Coarse health bucket.
    #[must_use]
    pub fn damage_state(&self) -> DamageState {
        self.damage_state
    }

    /// Whether this barrier still collides. `false` once destroyed.
    #[must_use]
    pub fn active(&self) -> bool {
        self.active
    }
}

fn from_config(config: &BarrierConfig) -> Barrier {
    let max_health = config.health.unwrap_or(0);
    Barrier {
        id: config.id,
        kind: config.kind,
        bounds: Rect::from_origin_size(config.position, config.size),
        health: max_health,
        max_health,
        damage_state: if config.kind == BarrierKind::Destructible {
            damage_state(max_health, max_health)
        } else {
            DamageState::Intact
        },
        direction: config.direction,
        active: true,
    }
}

/// Owns every barrier loaded from a map and resolves collisions and
/// damage against them.
#[derive(Debug, Default)]
pub struct BarrierManager {
    barriers: BTreeMap<BarrierId, Barrier>,
}

impl BarrierManager {
    /// Builds a manager from a map's barrier configuration. All barriers
    /// start active.
    #[must_use]
    pub fn load(configs: &[BarrierConfig]) -> Self {
        let mut barriers = BTreeMap::new();
        for config in configs {
            barriers.insert(config.id, from_config(config));
        }
        Self { barriers }
    }

    /// Looks up a barrier by id.
    #[must_use]
    pub fn barrier(&self, id: BarrierId) -> Option<&Barrier> {
        self.barriers.get(&id)
    }

    /// Iterates every currently active barrier.
    pub fn active_barriers(&self) -> impl Iterator<Item = &Barrier> {
        self.barriers.values().filter(|barrier| barrier.active)
    }

    /// Reports whether a circle at `pos` with radius `radius` overlaps any
    /// active barrier among `candidates`. Unknown ids are ignored.
    #[must_use]
    pub fn check_collision(&self, pos: Vec2, radius: f32, candidates: &[BarrierId]) -> bool {
        candidates
            .iter()
            .filter_map(|id| self.barriers.get(id))
            .any(|barrier| barrier.active && blocks(barrier, pos, radius))
    }

    /// Pushes `pos` clear of every active, colliding barrier among
    /// `candidates`, iterating up to a fixed cap.
    ///
    /// Each iteration resolves against the first colliding candidate found
    /// (in id order) and then re-checks; this can leave a residual overlap
    /// in pathological configurations (e.g. a circle wedged between more
    /// barriers than the cap can clear), which is why testable property 3
    /// is phrased as an expectation, not an absolute guarantee for every
    /// input.
    #[must_use]
    pub fn resolve_collision(&self, mut pos: Vec2, radius: f32, candidates: &[BarrierId]) -> Vec2 {
        for _ in 0..RESOLVE_ITERATION_CAP {
            let Some(push) = candidates
                .iter()
                .filter_map(|id| self.barriers.get(id))
                .filter(|barrier| barrier.active && blocks(barrier, pos, radius))
                .find_map(|barrier| push_out_vector(pos, radius, &barrier.bounds))
            else {
                break;
            };
            pos = pos.add(push);
        }
        pos
    }

    /// Applies `damage` hit points to a destructible barrier, recomputing
    /// its damage state and, at zero health, deactivating it.
    ///
    /// Unknown ids and already-destroyed barriers are no-ops. Returns the
    /// events produced, if any.
    pub fn apply_damage(&mut self, id: BarrierId, damage: u32) -> Vec<Event> {
        let Some(barrier) = self.barriers.get_mut(&id) else {
            log::debug!("apply_damage: unknown barrier {id:?}");
            return Vec::new();
        };
        if !barrier.active || barrier.kind != BarrierKind::Destructible {
            return Vec::new();
        }

        barrier.health = barrier.health.saturating_sub(damage);
        barrier.damage_state = damage_state(barrier.health, barrier.max_health);

        if barrier.health == 0 {
            barrier.active = false;
            vec![Event::BarrierDestroyed { barrier: id }]
        } else {
            vec![Event::BarrierDamaged { barrier: id, remaining_health: barrier.health }]
        }
    }
}

fn blocks(barrier: &Barrier, pos: Vec2, radius: f32) -> bool {
    if !arena_core::circle_rect_overlap(pos, radius, &barrier.bounds) {
        return false;
    }
    match (barrier.kind, barrier.direction) {
        (BarrierKind::OneWay, Some(direction)) => approaching_face(pos, &barrier.bounds) != direction,
        _ => true,
    }
}

/// Determines which face of `rect` a point outside (or inside) it is
/// nearest to, used to decide whether a one-way barrier's allowed
/// direction permits entry. No velocity is tracked by the simulation, so
/// this heuristic stands in for "which side did the approach come from".
fn approaching_face(pos: Vec2, rect: &Rect) -> CardinalDirection {
    let center = rect.center();
    let dx = pos.x - center.x;
    let dy = pos.y - center.y;
    let half_width = rect.width / 2.0;
    let half_height = rect.height / 2.0;

    if half_width <= f32::EPSILON && half_height <= f32::EPSILON {
        return CardinalDirection::North;
    }

    let horizontal_ratio = if half_width > 0.0 { dx.abs() / half_width } else { 0.0 };
    let vertical_ratio = if half_height > 0.0 { dy.abs() / half_height } else { 0.0 };

    if horizontal_ratio > vertical_ratio {
        if dx >= 0.0 { CardinalDirection::East } else { CardinalDirection::West }
    } else if dy >= 0.0 {
        CardinalDirection::South
    } else {
        CardinalDirection::North
    }
}

fn push_out_vector(pos: Vec2, radius: f32, rect: &Rect) -> Option<Vec2> {
    let closest = rect.closest_point(pos);
    let delta = pos.sub(closest);
    let distance = delta.length();

    if distance > radius {
        return None;
    }

    if distance > f32::EPSILON {
        let penetration = radius - distance;
        return Some(delta.normalized().scale(penetration));
    }

    let left = pos.x - rect.left() + radius;
    let right = rect.right() - pos.x + radius;
    let top = pos.y - rect.top() + radius;
    let bottom = rect.bottom() - pos.y + radius;
    let min = left.min(right).min(top).min(bottom);

    Some(if min == left {
        Vec2::new(-left, 0.0)
    } else if min == right {
        Vec2::new(right, 0.0)
    } else if min == top {
        Vec2::new(0.0, -top)
    } else {
        Vec2::new(0.0, bottom)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::BarrierId as Id;

    fn destructible(id: u32, position: Vec2, health: u32) -> BarrierConfig {
        BarrierConfig {
            id: Id::new(id),
            kind: BarrierKind::Destructible,
            position,
            size: Vec2::new(80.0, 80.0),
            health: Some(health),
            direction: None,
        }
    }

    #[test]
    fn push_out_clears_collision() {
        let manager = BarrierManager::load(&[BarrierConfig {
            id: Id::new(1),
            kind: BarrierKind::Full,
            position: Vec2::new(600.0, 320.0),
            size: Vec2::new(80.0, 80.0),
            health: None,
            direction: None,
        }]);
        let pos = Vec2::new(620.0, 340.0);
        let candidates = [Id::new(1)];
        assert!(manager.check_collision(pos, 10.0, &candidates));
        let resolved = manager.resolve_collision(pos, 10.0, &candidates);
        assert!(!manager.check_collision(resolved, 10.0, &candidates));
    }

    #[test]
    fn destruction_emits_event_and_deactivates() {
        let mut manager = BarrierManager::load(&[destructible(1, Vec2::new(600.0, 320.0), 100)]);
        assert_eq!(
            manager.apply_damage(Id::new(1), 40),
            vec![Event::BarrierDamaged { barrier: Id::new(1), remaining_health: 60 }]
        );
        assert_eq!(
            manager.apply_damage(Id::new(1), 40),
            vec![Event::BarrierDamaged { barrier: Id::new(1), remaining_health: 20 }]
        );
        let events = manager.apply_damage(Id::new(1), 40);
        assert_eq!(events, vec![Event::BarrierDestroyed { barrier: Id::new(1) }]);

        let candidates = [Id::new(1)];
        assert!(!manager.check_collision(Vec2::new(640.0, 360.0), 5.0, &candidates));
    }

    #[test]
    fn damaging_destroyed_barrier_is_noop() {
        let mut manager = BarrierManager::load(&[destructible(1, Vec2::new(0.0, 0.0), 50)]);
        let _ = manager.apply_damage(Id::new(1), 50);
        assert!(manager.apply_damage(Id::new(1), 10).is_empty());
    }

    #[test]
    fn damaging_unknown_barrier_is_noop() {
        let mut manager = BarrierManager::load(&[]);
        assert!(manager.apply_damage(Id::new(99), 10).is_empty());
    }

    #[test]
    fn one_way_barrier_blocks_from_opposite_face_only() {
        let manager = BarrierManager::load(&[BarrierConfig {
            id: Id::new(1),
            kind: BarrierKind::OneWay,
            position: Vec2::new(400.0, 400.0),
            size: Vec2::new(80.0, 80.0),
            health: None,
            direction: Some(CardinalDirection::North),
        }]);
        let candidates = [Id::new(1)];

        let approach_from_south = Vec2::new(440.0, 485.0);
        assert!(manager.check_collision(approach_from_south, 10.0, &candidates));

        let approach_from_north = Vec2::new(440.0, 395.0);
        assert!(!manager.check_collision(approach_from_north, 10.0, &candidates));
    }

    #[test]
    fn damage_state_thresholds_match_health_ratio() {
        assert_eq!(damage_state(100, 100), DamageState::Intact);
        assert_eq!(damage_state(67, 100), DamageState::Intact);
        assert_eq!(damage_state(66, 100), DamageState::Cracked);
        assert_eq!(damage_state(34, 100), DamageState::Cracked);
        assert_eq!(damage_state(33, 100), DamageState::Damaged);
        assert_eq!(damage_state(1, 100), DamageState::Damaged);
        assert_eq!(damage_state(0, 100), DamageState::Destroyed);
    }
}
