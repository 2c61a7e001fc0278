//! Opaque entity identifiers used throughout the arena simulation.

use serde::{Deserialize, Serialize};

/// Identifies one of the two competitors in an arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Creates a player identifier from a raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value backing this identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Canonical identifier for one of the two map-defined spawn points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnPointId {
    /// The first competitor's spawn point.
    Player1,
    /// The second competitor's spawn point.
    Player2,
}

/// Identifies a barrier entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BarrierId(pub u32);

impl BarrierId {
    /// Creates a barrier identifier from a raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value backing this identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Identifies a hazard zone entity, whether map-authored or dynamically spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HazardId(pub u32);

impl HazardId {
    /// Creates a hazard identifier from a raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value backing this identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Identifies a trap entity, whether map-authored or dynamically spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrapId(pub u32);

impl TrapId {
    /// Creates a trap identifier from a raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value backing this identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Identifies a teleporter pad. Paired teleporters share a `pair_id`, not
/// this identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeleporterId(pub u32);

impl TeleporterId {
    /// Creates a teleporter identifier from a raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value backing this identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Identifies a jump pad entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JumpPadId(pub u32);

impl JumpPadId {
    /// Creates a jump pad identifier from a raw value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value backing this identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}
