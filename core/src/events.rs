//! The event stream emitted by a tick of the simulation.

use serde::{Deserialize, Serialize};

use crate::effects::ZoneEffectKind;
use crate::geometry::Vec2;
use crate::ids::{BarrierId, HazardId, PlayerId, TrapId};
use crate::map::TrapEffectKind;

/// Something that happened during a single call to `tick`.
///
/// Events are emitted in the order the subsystems that produced them ran:
/// barriers, then hazards, then traps, then transport, then the zone
/// effect stack. Within a subsystem, events are emitted in a stable order
/// (entity id order, or arrival order for player-driven triggers).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A destructible barrier's health reached zero.
    BarrierDestroyed {
        /// The barrier that was destroyed.
        barrier: BarrierId,
    },
    /// A barrier absorbed damage without being destroyed.
    BarrierDamaged {
        /// The barrier that was damaged.
        barrier: BarrierId,
        /// Remaining health after the hit.
        remaining_health: u32,
    },
    /// A trap transitioned from `Warning` into `Triggered`.
    TrapTriggered {
        /// The trap that triggered.
        trap: TrapId,
        /// Players caught within the trap's trigger or chain radius.
        affected_players: Vec<PlayerId>,
    },
    /// A triggered trap applied its effect to a specific player.
    TrapEffectApplied {
        /// The trap responsible for the effect.
        trap: TrapId,
        /// The player affected.
        player: PlayerId,
        /// The kind of effect applied.
        effect: TrapEffectKind,
        /// Magnitude of the effect applied.
        value: f32,
    },
    /// A player was moved by a teleporter.
    PlayerTeleported {
        /// The player teleported.
        player: PlayerId,
        /// Position the player teleported from.
        from: Vec2,
        /// Position the player teleported to.
        to: Vec2,
    },
    /// A player was launched by a jump pad.
    PlayerLaunched {
        /// The player launched.
        player: PlayerId,
        /// The launch velocity imparted.
        velocity: Vec2,
    },
    /// A zone effect began applying to a player.
    EffectAdded {
        /// The zone contributing the effect.
        source: HazardId,
        /// The player now affected.
        player: PlayerId,
        /// The kind of effect added.
        kind: ZoneEffectKind,
    },
    /// A zone effect already applying to a player changed magnitude.
    EffectModified {
        /// The zone contributing the effect.
        source: HazardId,
        /// The player affected.
        player: PlayerId,
        /// The kind of effect modified.
        kind: ZoneEffectKind,
    },
    /// A zone effect stopped applying to a player.
    EffectRemoved {
        /// The zone no longer contributing the effect.
        source: HazardId,
        /// The player no longer affected.
        player: PlayerId,
        /// The kind of effect removed.
        kind: ZoneEffectKind,
    },
    /// A damage zone applied its per-tick damage to a player.
    HazardDamageApplied {
        /// The hazard responsible.
        source: HazardId,
        /// The player damaged.
        player: PlayerId,
        /// Damage applied this tick.
        amount: f32,
    },
    /// A dynamically spawned hazard entered play.
    HazardSpawned {
        /// The newly spawned hazard.
        hazard: HazardId,
    },
    /// A dynamically spawned hazard's lifetime elapsed.
    HazardExpired {
        /// The hazard that expired.
        hazard: HazardId,
    },
    /// A dynamically spawned trap entered play.
    TrapSpawned {
        /// The newly spawned trap.
        trap: TrapId,
    },
    /// A dynamically spawned trap's lifetime elapsed.
    TrapExpired {
        /// The trap that expired.
        trap: TrapId,
    },
}
