//! Zone effects and the per-player effect stack they accumulate into.

use serde::{Deserialize, Serialize};

use crate::ids::HazardId;

/// The category of effect a zone applies to a player standing inside it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ZoneEffectKind {
    /// Multiplies movement speed.
    SpeedModifier,
    /// Deals damage per second.
    DamageOverTime,
    /// Disables power-up pickup and use.
    PowerUpDisable,
}

/// One zone's contribution to a player's effect stack.
///
/// `source` reuses [`HazardId`] for both map-authored and dynamically
/// spawned hazard zones, since both populate the same stack the same way.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneEffect {
    /// The hazard zone contributing this effect.
    pub source: HazardId,
    /// The kind of effect contributed.
    pub kind: ZoneEffectKind,
    /// Effect magnitude: a speed multiplier, HP/s, or ignored for
    /// `PowerUpDisable`.
    pub value: f32,
}

/// The aggregated result of every active [`ZoneEffect`] touching a player.
///
/// Aggregation rules: `SpeedModifier` entries multiply together,
/// `DamageOverTime` entries sum, and `PowerUpDisable` is true if any
/// contributing zone sets it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectState {
    /// Combined movement speed multiplier. `1.0` when no zone applies.
    pub speed_multiplier: f32,
    /// Combined damage per second from all active damage zones.
    pub damage_per_second: f32,
    /// True if any active zone disables power-ups.
    pub power_ups_disabled: bool,
    /// The raw contributions the multiplier and rate above were computed
    /// from, keyed by contributing zone.
    pub active_effects: Vec<ZoneEffect>,
}

impl EffectState {
    /// An effect state with no active zones: full speed, no damage, power
    /// ups enabled.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            speed_multiplier: 1.0,
            damage_per_second: 0.0,
            power_ups_disabled: false,
            active_effects: Vec::new(),
        }
    }
}

/// Recomputes an [`EffectState`] from the zones a player currently stands
/// in, keyed by zone source so a zone contributes at most once.
#[must_use]
pub fn aggregate(effects: &[ZoneEffect]) -> EffectState {
    let mut state = EffectState::neutral();
    for effect in effects {
        match effect.kind {
            ZoneEffectKind::SpeedModifier => state.speed_multiplier *= effect.value,
            ZoneEffectKind::DamageOverTime => state.damage_per_second += effect.value,
            ZoneEffectKind::PowerUpDisable => state.power_ups_disabled = true,
        }
    }
    state.active_effects = effects.to_vec();
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_modifiers_multiply() {
        let effects = vec![
            ZoneEffect { source: HazardId::new(1), kind: ZoneEffectKind::SpeedModifier, value: 0.5 },
            ZoneEffect { source: HazardId::new(2), kind: ZoneEffectKind::SpeedModifier, value: 0.5 },
        ];
        assert_eq!(aggregate(&effects).speed_multiplier, 0.25);
    }

    #[test]
    fn damage_over_time_sums() {
        let effects = vec![
            ZoneEffect { source: HazardId::new(1), kind: ZoneEffectKind::DamageOverTime, value: 10.0 },
            ZoneEffect { source: HazardId::new(2), kind: ZoneEffectKind::DamageOverTime, value: 5.0 },
        ];
        assert_eq!(aggregate(&effects).damage_per_second, 15.0);
    }

    #[test]
    fn power_up_disable_is_boolean_or() {
        let effects = vec![ZoneEffect {
            source: HazardId::new(1),
            kind: ZoneEffectKind::PowerUpDisable,
            value: 0.0,
        }];
        assert!(aggregate(&effects).power_ups_disabled);
        assert!(!aggregate(&[]).power_ups_disabled);
    }

    #[test]
    fn neutral_state_has_no_active_effects() {
        let state = aggregate(&[]);
        assert_eq!(state.speed_multiplier, 1.0);
        assert!(state.active_effects.is_empty());
    }
}
