//! Map configuration schema: the data shape a host loads at startup or at
//! rematch. See [`crate::validate::validate`] for the acceptance checks.

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Vec2};
use crate::ids::{BarrierId, HazardId, JumpPadId, SpawnPointId, TeleporterId, TrapId};
use crate::tile::TileKind;

/// One of the four cardinal directions, used by one-way barriers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardinalDirection {
    /// North (toward decreasing Y).
    North,
    /// South (toward increasing Y).
    South,
    /// East (toward increasing X).
    East,
    /// West (toward decreasing X).
    West,
}

impl CardinalDirection {
    /// The direction directly opposite this one.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }
}

/// One of the eight directions a jump pad can launch a player toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JumpDirection {
    /// Toward decreasing Y.
    North,
    /// Toward increasing Y.
    South,
    /// Toward increasing X.
    East,
    /// Toward decreasing X.
    West,
    /// Toward decreasing Y and increasing X.
    NorthEast,
    /// Toward decreasing Y and decreasing X.
    NorthWest,
    /// Toward increasing Y and increasing X.
    SouthEast,
    /// Toward increasing Y and decreasing X.
    SouthWest,
}

impl JumpDirection {
    /// The unit vector a launch along this direction points toward.
    #[must_use]
    pub fn unit_vector(self) -> Vec2 {
        let diagonal = std::f32::consts::FRAC_1_SQRT_2;
        match self {
            Self::North => Vec2::new(0.0, -1.0),
            Self::South => Vec2::new(0.0, 1.0),
            Self::East => Vec2::new(1.0, 0.0),
            Self::West => Vec2::new(-1.0, 0.0),
            Self::NorthEast => Vec2::new(diagonal, -diagonal),
            Self::NorthWest => Vec2::new(-diagonal, -diagonal),
            Self::SouthEast => Vec2::new(diagonal, diagonal),
            Self::SouthWest => Vec2::new(-diagonal, diagonal),
        }
    }
}

/// Barrier archetypes understood by the barrier manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarrierKind {
    /// Always blocks. Indestructible.
    Full,
    /// Visually low, but simulated identically to `Full` for movement.
    Half,
    /// Carries hit points and can be destroyed.
    Destructible,
    /// Blocks approach from one face only.
    OneWay,
}

/// Hazard zone archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    /// Deals damage over time while a player remains inside.
    Damage,
    /// Multiplies player movement speed while a player remains inside.
    Slow,
    /// Disables power-ups while a player remains inside.
    Emp,
}

/// Trap archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrapKind {
    /// Arms when a player enters its radius.
    Pressure,
    /// Arms on a fixed cadence regardless of player position.
    Timed,
    /// Arms only in response to an explicit projectile-hit notification.
    Projectile,
}

/// The effect a triggered trap applies to affected players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrapEffectKind {
    /// A one-time burst of damage.
    DamageBurst,
    /// An impulse away from the trap center.
    Knockback,
    /// A temporary loss of control.
    Stun,
}

/// A rectangular static obstacle as authored in a map configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarrierConfig {
    /// Stable identifier for this barrier.
    pub id: BarrierId,
    /// Archetype controlling collision and damage behavior.
    pub kind: BarrierKind,
    /// Top-left corner of the barrier's footprint, in pixels.
    pub position: Vec2,
    /// Width and height of the barrier's footprint, in pixels.
    pub size: Vec2,
    /// Starting hit points. Required when `kind == Destructible`, and must
    /// lie in `[50, 200]`.
    pub health: Option<u32>,
    /// The face a one-way barrier allows entry from. Required when
    /// `kind == OneWay`.
    pub direction: Option<CardinalDirection>,
}

/// A rectangular hazard zone as authored in a map configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HazardConfig {
    /// Stable identifier for this hazard.
    pub id: HazardId,
    /// Archetype controlling the effect applied to contained players.
    pub kind: HazardKind,
    /// Rectangular footprint of the zone.
    pub bounds: Rect,
    /// Effect strength: HP/s for `Damage` (`[5, 25]`), a speed multiplier
    /// for `Slow` (`[0.25, 0.75]`), or `1.0` for `Emp`.
    pub intensity: f32,
}

/// A point trap as authored in a map configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrapConfig {
    /// Stable identifier for this trap.
    pub id: TrapId,
    /// Archetype controlling how the trap arms.
    pub kind: TrapKind,
    /// Center of the trap's trigger radius.
    pub position: Vec2,
    /// Trigger radius, in pixels.
    pub radius: f32,
    /// The effect applied to affected players on trigger.
    pub effect: TrapEffectKind,
    /// Magnitude of the effect: HP for `DamageBurst`, impulse magnitude for
    /// `Knockback`, or stun duration in seconds for `Stun`.
    pub effect_value: f32,
    /// Seconds the trap spends in `cooldown` after triggering. Must lie in
    /// `[5, 30]`.
    pub cooldown: f32,
    /// Seconds between automatic arm cycles. Required when
    /// `kind == Timed`, and must lie in `[5, 30]`.
    pub interval: Option<f32>,
    /// When present, players within this radius of the trap are also
    /// affected on trigger (used for trap chains), in addition to those
    /// within `radius`.
    pub chain_radius: Option<f32>,
}

/// A teleporter pad as authored in a map configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeleporterConfig {
    /// Stable identifier for this pad.
    pub id: TeleporterId,
    /// Groups this pad with its partner. `None` only makes sense alongside
    /// a non-empty `random_exits`.
    pub pair_id: Option<u32>,
    /// Center of the pad's trigger radius.
    pub position: Vec2,
    /// Trigger radius, in pixels.
    pub radius: f32,
    /// When non-empty, this pad is unpaired: triggering it teleports the
    /// player to one of these positions, chosen uniformly at random,
    /// instead of to a paired partner.
    pub random_exits: Option<Vec<Vec2>>,
}

/// A jump pad as authored in a map configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JumpPadConfig {
    /// Stable identifier for this pad.
    pub id: JumpPadId,
    /// Center of the pad's trigger radius.
    pub position: Vec2,
    /// Trigger radius, in pixels.
    pub radius: f32,
    /// Direction a launch from this pad points toward.
    pub direction: JumpDirection,
    /// Magnitude of the launch velocity.
    pub force: f32,
}

/// A player spawn point as authored in a map configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnPointConfig {
    /// Which competitor this spawn point belongs to.
    pub id: SpawnPointId,
    /// Pixel position of the spawn point. Must sit on a floor tile.
    pub position: Vec2,
}

/// Authorial metadata describing a map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapMetadata {
    /// Display name. Must be 3 to 50 characters.
    pub name: String,
    /// Author credit. Must be non-empty.
    pub author: String,
    /// Semantic-looking version string matching `\d+\.\d+\.\d+`.
    pub version: String,
    /// Flavor description. At most 200 characters.
    pub description: String,
    /// Optional cosmetic theme tag, not validated.
    pub theme: Option<String>,
}

/// A complete map configuration as loaded by a host.
///
/// `tiles` is stored as a nested `Vec` rather than a fixed-size array so
/// that malformed input (wrong row or column counts) can be rejected by the
/// validator instead of panicking during deserialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Authorial metadata.
    pub metadata: MapMetadata,
    /// Row-major tile grid. Must be exactly `GRID_ROWS` rows of
    /// `GRID_COLUMNS` columns each.
    pub tiles: Vec<Vec<TileKind>>,
    /// Static barrier obstacles.
    pub barriers: Vec<BarrierConfig>,
    /// Map-authored hazard zones.
    pub hazards: Vec<HazardConfig>,
    /// Map-authored traps.
    pub traps: Vec<TrapConfig>,
    /// Teleporter pads.
    pub teleporters: Vec<TeleporterConfig>,
    /// Jump pads.
    pub jump_pads: Vec<JumpPadConfig>,
    /// The two competitor spawn points.
    pub spawn_points: Vec<SpawnPointConfig>,
    /// Candidate positions for power-up spawns (consumed by an external
    /// collaborator; the simulation core does not interpret these).
    pub power_up_spawns: Vec<Vec2>,
}
