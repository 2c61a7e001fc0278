#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-trap state machines: armed → warning → triggered → cooldown.
//!
//! Timers count down against the `dt` passed to [`TrapManager::tick`]
//! rather than against an absolute deadline, matching the countdown style
//! used by every other subsystem in this workspace.

use std::collections::BTreeMap;

use arena_core::{distance, Event, PlayerId, TrapConfig, TrapEffectKind, TrapId, TrapKind, Vec2};

/// Fixed telegraph window between a trap arming and triggering.
pub const WARNING_WINDOW_SECONDS: f32 = 0.3;

/// A trap's position in its armed → warning → triggered → cooldown cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrapState {
    /// Waiting for its arm condition.
    Armed,
    /// Telegraphing an imminent trigger.
    Warning,
    /// Applying its effect this tick.
    Triggered,
    /// Recovering before it can arm again.
    Cooldown,
}

#[derive(Clone, Debug)]
struct Trap {
    id: TrapId,
    kind: TrapKind,
    position: Vec2,
    radius: f32,
    effect: TrapEffectKind,
    effect_value: f32,
    cooldown: f32,
    interval: Option<f32>,
    chain_radius: Option<f32>,
    state: TrapState,
    cooldown_remaining: f32,
    warning_remaining: f32,
    timed_accumulator: f32,
}

fn from_config(config: &TrapConfig) -> Trap {
    Trap {
        id: config.id,
        kind: config.kind,
        position: config.position,
        radius: config.radius,
        effect: config.effect,
        effect_value: config.effect_value,
        cooldown: config.cooldown,
        interval: config.interval,
        chain_radius: config.chain_radius,
        state: TrapState::Armed,
        cooldown_remaining: 0.0,
        warning_remaining: 0.0,
        timed_accumulator: 0.0,
    }
}

/// Owns every trap, map-authored or dynamically spawned, and advances
/// their state machines each tick.
#[derive(Debug, Default)]
pub struct TrapManager {
    traps: BTreeMap<TrapId, Trap>,
}

impl TrapManager {
    /// Builds a manager from a map's trap configuration. All traps start
    /// armed.
    #[must_use]
    pub fn load(configs: &[TrapConfig]) -> Self {
        let mut traps = BTreeMap::new();
        for config in configs {
            traps.insert(config.id, from_config(config));
        }
        Self { traps }
    }

    /// Adds a trap, map-authored or dynamically spawned, starting armed.
    pub fn add_trap(&mut self, config: TrapConfig) {
        self.traps.insert(config.id, from_config(&config));
    }

    /// Removes a trap. Unknown ids are a no-op.
    pub fn remove_trap(&mut self, id: TrapId) {
        if self.traps.remove(&id).is_none() {
            log::debug!("remove_trap: unknown trap {id:?}");
        }
    }

    /// Reports whether `id` is currently tracked.
    #[must_use]
    pub fn contains(&self, id: TrapId) -> bool {
        self.traps.contains_key(&id)
    }

    /// Iterates every tracked trap id.
    pub fn trap_ids(&self) -> impl Iterator<Item = TrapId> + '_ {
        self.traps.keys().copied()
    }

    /// The current state of a tracked trap, if it exists.
    #[must_use]
    pub fn state(&self, id: TrapId) -> Option<TrapState> {
        self.traps.get(&id).map(|trap| trap.state)
    }

    /// Arms a `projectile` trap immediately, as if a projectile had struck
    /// it. A no-op for unknown ids, non-projectile traps, or traps not
    /// currently armed — a trap in `cooldown` never re-enters `warning`
    /// from this call either.
    pub fn notify_projectile_hit(&mut self, id: TrapId) {
        let Some(trap) = self.traps.get_mut(&id) else {
            log::debug!("notify_projectile_hit: unknown trap {id:?}");
            return;
        };
        if trap.kind == TrapKind::Projectile && trap.state == TrapState::Armed {
            trap.state = TrapState::Warning;
            trap.warning_remaining = WARNING_WINDOW_SECONDS;
        }
    }

    /// Advances every trap's state machine by `dt`, given the current
    /// player positions, and returns the events produced.
    ///
    /// Traps are processed in id order, so concurrent triggers within the
    /// same tick are serialized deterministically.
    pub fn tick(&mut self, dt: f32, players: &BTreeMap<PlayerId, Vec2>) -> Vec<Event> {
        let mut events = Vec::new();
        let ids: Vec<TrapId> = self.traps.keys().copied().collect();

        for id in ids {
            let trap = self.traps.get_mut(&id).expect("id came from this map's own keys");
            match trap.state {
                TrapState::Cooldown => {
                    trap.cooldown_remaining -= dt;
                    if trap.cooldown_remaining <= 0.0 {
                        trap.state = TrapState::Armed;
                        trap.cooldown_remaining = 0.0;
                    }
                }
                TrapState::Armed => arm_if_triggered(trap, dt, players),
                TrapState::Warning => {
                    trap.warning_remaining -= dt;
                    if trap.warning_remaining <= 0.0 {
                        fire(trap, players, &mut events);
                    }
                }
                TrapState::Triggered => {
                    trap.state = TrapState::Cooldown;
                    trap.cooldown_remaining = trap.cooldown;
                }
            }
        }

        events
    }
}

fn arm_if_triggered(trap: &mut Trap, dt: f32, players: &BTreeMap<PlayerId, Vec2>) {
    match trap.kind {
        TrapKind::Pressure => {
            let any_player_within_radius = players
                .values()
                .any(|position| distance(*position, trap.position) <= trap.radius);
            if any_player_within_radius {
                trap.state = TrapState::Warning;
                trap.warning_remaining = WARNING_WINDOW_SECONDS;
            }
        }
        TrapKind::Timed => {
            let Some(interval) = trap.interval else {
                log::debug!("timed trap {:?} has no interval configured", trap.id);
                return;
            };
            trap.timed_accumulator += dt;
            if trap.timed_accumulator >= interval {
                trap.timed_accumulator -= interval;
                trap.state = TrapState::Warning;
                trap.warning_remaining = WARNING_WINDOW_SECONDS;
            }
        }
        TrapKind::Projectile => {}
    }
}

fn fire(trap: &mut Trap, players: &BTreeMap<PlayerId, Vec2>, events: &mut Vec<Event>) {
    let mut affected: Vec<PlayerId> = players
        .iter()
        .filter(|(_, position)| {
            distance(**position, trap.position) <= trap.radius
                || trap.chain_radius.is_some_and(|chain| distance(**position, trap.position) <= chain)
        })
        .map(|(player, _)| *player)
        .collect();
    affected.sort_by_key(PlayerId::get);

    events.push(Event::TrapTriggered { trap: trap.id, affected_players: affected.clone() });
    for player in affected {
        events.push(Event::TrapEffectApplied {
            trap: trap.id,
            player,
            effect: trap.effect,
            value: trap.effect_value,
        });
    }

    trap.state = TrapState::Cooldown;
    trap.cooldown_remaining = trap.cooldown;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressure_trap(id: u32, position: Vec2, radius: f32, cooldown: f32) -> TrapConfig {
        TrapConfig {
            id: TrapId::new(id),
            kind: TrapKind::Pressure,
            position,
            radius,
            effect: TrapEffectKind::DamageBurst,
            effect_value: 50.0,
            cooldown,
            interval: None,
            chain_radius: None,
        }
    }

    #[test]
    fn pressure_trap_arms_and_triggers_after_warning_window() {
        let mut manager = TrapManager::load(&[pressure_trap(1, Vec2::new(680.0, 400.0), 40.0, 10.0)]);
        let mut players = BTreeMap::new();
        players.insert(PlayerId::new(1), Vec2::new(680.0, 400.0));

        let events = manager.tick(0.05, &players);
        assert!(events.is_empty());
        assert_eq!(manager.state(TrapId::new(1)), Some(TrapState::Warning));

        let events = manager.tick(0.35, &players);
        assert_eq!(
            events,
            vec![
                Event::TrapTriggered { trap: TrapId::new(1), affected_players: vec![PlayerId::new(1)] },
                Event::TrapEffectApplied {
                    trap: TrapId::new(1),
                    player: PlayerId::new(1),
                    effect: TrapEffectKind::DamageBurst,
                    value: 50.0,
                },
            ]
        );
        assert_eq!(manager.state(TrapId::new(1)), Some(TrapState::Cooldown));
    }

    #[test]
    fn trap_does_not_retrigger_during_cooldown() {
        let mut manager = TrapManager::load(&[pressure_trap(1, Vec2::new(680.0, 400.0), 40.0, 10.0)]);
        let mut players = BTreeMap::new();
        players.insert(PlayerId::new(1), Vec2::new(680.0, 400.0));

        let _ = manager.tick(0.4, &players);
        assert_eq!(manager.state(TrapId::new(1)), Some(TrapState::Cooldown));

        let events = manager.tick(5.0, &players);
        assert!(events.is_empty());
        assert_eq!(manager.state(TrapId::new(1)), Some(TrapState::Cooldown));

        let events = manager.tick(5.0, &players);
        assert!(events.is_empty());
        assert_eq!(manager.state(TrapId::new(1)), Some(TrapState::Armed));
    }

    #[test]
    fn trap_still_triggers_if_player_leaves_during_warning() {
        let mut manager = TrapManager::load(&[pressure_trap(1, Vec2::new(680.0, 400.0), 40.0, 10.0)]);
        let mut players = BTreeMap::new();
        players.insert(PlayerId::new(1), Vec2::new(680.0, 400.0));
        let _ = manager.tick(0.05, &players);

        players.insert(PlayerId::new(1), Vec2::new(10.0, 10.0));
        let events = manager.tick(0.35, &players);
        assert_eq!(
            events,
            vec![Event::TrapTriggered { trap: TrapId::new(1), affected_players: Vec::new() }]
        );
    }

    #[test]
    fn projectile_trap_only_arms_via_explicit_notification() {
        let mut manager = TrapManager::load(&[TrapConfig {
            id: TrapId::new(1),
            kind: TrapKind::Projectile,
            position: Vec2::new(400.0, 400.0),
            radius: 20.0,
            effect: TrapEffectKind::Knockback,
            effect_value: 200.0,
            cooldown: 10.0,
            interval: None,
            chain_radius: None,
        }]);
        let players = BTreeMap::new();

        let _ = manager.tick(5.0, &players);
        assert_eq!(manager.state(TrapId::new(1)), Some(TrapState::Armed));

        manager.notify_projectile_hit(TrapId::new(1));
        assert_eq!(manager.state(TrapId::new(1)), Some(TrapState::Warning));
    }
}
