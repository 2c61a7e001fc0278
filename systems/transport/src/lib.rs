#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Teleporter pairing and jump-pad launch vectors, with per-player
//! cooldowns on both interactable kinds.

use std::collections::BTreeMap;

use arena_core::{Event, JumpPadConfig, JumpPadId, PlayerId, TeleporterConfig, TeleporterId, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default per-player teleporter cooldown, in seconds.
pub const TELEPORTER_COOLDOWN_SECONDS: f32 = 1.5;
/// Default per-player jump-pad cooldown, in seconds.
pub const JUMP_PAD_COOLDOWN_SECONDS: f32 = 1.0;

#[derive(Clone, Debug)]
struct Teleporter {
    id: TeleporterId,
    pair_id: Option<u32>,
    position: Vec2,
    radius: f32,
    random_exits: Vec<Vec2>,
    cooldowns: BTreeMap<PlayerId, f32>,
}

#[derive(Clone, Debug)]
struct JumpPad {
    id: JumpPadId,
    position: Vec2,
    radius: f32,
    velocity: Vec2,
    cooldowns: BTreeMap<PlayerId, f32>,
}

/// Owns every teleporter and jump pad and resolves trigger queries against
/// them.
pub struct TransportManager {
    teleporters: BTreeMap<TeleporterId, Teleporter>,
    jump_pads: BTreeMap<JumpPadId, JumpPad>,
    rng: ChaCha8Rng,
}

impl std::fmt::Debug for TransportManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportManager")
            .field("teleporters", &self.teleporters)
            .field("jump_pads", &self.jump_pads)
            .finish_non_exhaustive()
    }
}

impl TransportManager {
    /// Builds a manager from a map's teleporter and jump pad
    /// configuration, seeding its internal PRNG deterministically so that
    /// a given seed always produces the same sequence of random-exit
    /// choices.
    #[must_use]
    pub fn load(teleporters: &[TeleporterConfig], jump_pads: &[JumpPadConfig], seed: u64) -> Self {
        let teleporters = teleporters
            .iter()
            .map(|config| {
                (
                    config.id,
                    Teleporter {
                        id: config.id,
                        pair_id: config.pair_id,
                        position: config.position,
                        radius: config.radius,
                        random_exits: config.random_exits.clone().unwrap_or_default(),
                        cooldowns: BTreeMap::new(),
                    },
                )
            })
            .collect();
        let jump_pads = jump_pads
            .iter()
            .map(|config| {
                (
                    config.id,
                    JumpPad {
                        id: config.id,
                        position: config.position,
                        radius: config.radius,
                        velocity: config.direction.unit_vector().scale(config.force),
                        cooldowns: BTreeMap::new(),
                    },
                )
            })
            .collect();
        Self { teleporters, jump_pads, rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Counts every per-player cooldown down by `dt`, floored at zero.
    pub fn tick(&mut self, dt: f32) {
        for teleporter in self.teleporters.values_mut() {
            for remaining in teleporter.cooldowns.values_mut() {
                *remaining = (*remaining - dt).max(0.0);
            }
        }
        for pad in self.jump_pads.values_mut() {
            for remaining in pad.cooldowns.values_mut() {
                *remaining = (*remaining - dt).max(0.0);
            }
        }
    }

    /// Resolves a teleport trigger for `player` standing at `pos`.
    ///
    /// Returns `None` silently if no teleporter's radius contains `pos` or
    /// the player's cooldown on the matching teleporter is still active.
    /// On success, sets the cooldown for `player` on the source teleporter
    /// and, for a paired teleporter, on the destination teleporter too.
    pub fn check_teleport(&mut self, player: PlayerId, pos: Vec2) -> Option<Vec2> {
        let source_id = self
            .teleporters
            .values()
            .find(|teleporter| {
                arena_core::distance(pos, teleporter.position) <= teleporter.radius
                    && teleporter.cooldowns.get(&player).copied().unwrap_or(0.0) <= 0.0
            })?
            .id;

        let (pair_id, random_exits) = {
            let source = &self.teleporters[&source_id];
            (source.pair_id, source.random_exits.clone())
        };

        let destination = if random_exits.is_empty() {
            pair_id.and_then(|pair_id| {
                self.teleporters
                    .values()
                    .find(|candidate| candidate.id != source_id && candidate.pair_id == Some(pair_id))
                    .map(|partner| partner.position)
            })
        } else {
            let index = self.rng.gen_range(0..random_exits.len());
            Some(random_exits[index])
        }?;

        if let Some(source) = self.teleporters.get_mut(&source_id) {
            let _ = source.cooldowns.insert(player, TELEPORTER_COOLDOWN_SECONDS);
        }
        if let Some(pair_id) = pair_id {
            if let Some(partner) = self
                .teleporters
                .values_mut()
                .find(|candidate| candidate.id != source_id && candidate.pair_id == Some(pair_id))
            {
                let _ = partner.cooldowns.insert(player, TELEPORTER_COOLDOWN_SECONDS);
            }
        }

        Some(destination)
    }

    /// Resolves a jump-pad trigger for `player` standing at `pos`.
    ///
    /// Returns `None` silently if no pad's radius contains `pos` or the
    /// player's cooldown on that pad is still active. On success, returns
    /// a velocity of magnitude `pad.force` and sets the player's cooldown
    /// on that pad.
    pub fn check_jump_pad(&mut self, player: PlayerId, pos: Vec2) -> Option<Vec2> {
        let pad_id = self
            .jump_pads
            .values()
            .find(|pad| {
                arena_core::distance(pos, pad.position) <= pad.radius
                    && pad.cooldowns.get(&player).copied().unwrap_or(0.0) <= 0.0
            })?
            .id;
        let pad = self.jump_pads.get_mut(&pad_id)?;
        let _ = pad.cooldowns.insert(player, JUMP_PAD_COOLDOWN_SECONDS);
        Some(pad.velocity)
    }
}

/// Builds the events a coordinator should emit for a resolved transport
/// trigger, given the inputs already consumed by [`TransportManager`].
#[must_use]
pub fn teleport_event(player: PlayerId, from: Vec2, to: Vec2) -> Event {
    Event::PlayerTeleported { player, from, to }
}

/// Builds the event a coordinator should emit for a resolved jump-pad
/// trigger.
#[must_use]
pub fn launch_event(player: PlayerId, velocity: Vec2) -> Event {
    Event::PlayerLaunched { player, velocity }
}
