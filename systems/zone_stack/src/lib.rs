#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-player zone effect stacks and their aggregation into an
//! [`EffectState`].
//!
//! Each player owns at most one [`ZoneEffect`] per contributing source id;
//! re-adding a source updates its entry in place rather than duplicating
//! it, satisfying invariant 10 of the simulation's data model.

use std::collections::{BTreeMap, BTreeSet};

use arena_core::{aggregate as aggregate_effects, EffectState, Event, HazardId, PlayerId, ZoneEffect};

/// Owns every player's zone effect stack.
#[derive(Debug, Default)]
pub struct ZoneStackManager {
    stacks: BTreeMap<PlayerId, BTreeMap<HazardId, ZoneEffect>>,
}

impl ZoneStackManager {
    /// Creates a manager with no players tracked yet. Players are added
    /// implicitly on first [`ZoneStackManager::add`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `effect` in `player`'s stack, keyed by
    /// `effect.source`. Returns the event produced: [`Event::EffectAdded`]
    /// for a new source, [`Event::EffectModified`] when an existing
    /// source's value changed, or `None` when the value is unchanged.
    pub fn add(&mut self, player: PlayerId, effect: ZoneEffect) -> Option<Event> {
        let stack = self.stacks.entry(player).or_default();
        match stack.insert(effect.source, effect) {
            None => Some(Event::EffectAdded { source: effect.source, player, kind: effect.kind }),
            Some(previous) if previous.value != effect.value || previous.kind != effect.kind => {
                Some(Event::EffectModified { source: effect.source, player, kind: effect.kind })
            }
            Some(_) => None,
        }
    }

    /// Removes `source` from `player`'s stack, if present. Returns
    /// [`Event::EffectRemoved`] when an entry was actually removed.
    pub fn remove(&mut self, player: PlayerId, source: HazardId) -> Option<Event> {
        let stack = self.stacks.get_mut(&player)?;
        let removed = stack.remove(&source)?;
        Some(Event::EffectRemoved { source, player, kind: removed.kind })
    }

    /// Removes every entry in `player`'s stack whose source is not in
    /// `active_sources`, used each tick to drop effects for zones the
    /// player has since exited.
    pub fn cleanup_stale(&mut self, player: PlayerId, active_sources: &BTreeSet<HazardId>) -> Vec<Event> {
        let Some(stack) = self.stacks.get_mut(&player) else {
            return Vec::new();
        };
        let stale: Vec<HazardId> = stack
            .keys()
            .filter(|source| !active_sources.contains(source))
            .copied()
            .collect();
        stale
            .into_iter()
            .filter_map(|source| {
                let removed = stack.remove(&source)?;
                Some(Event::EffectRemoved { source, player, kind: removed.kind })
            })
            .collect()
    }

    /// Aggregates `player`'s current stack into an [`EffectState`]. A
    /// player with no stack (or an empty one) aggregates to the neutral
    /// state.
    #[must_use]
    pub fn aggregate(&self, player: PlayerId) -> EffectState {
        match self.stacks.get(&player) {
            Some(stack) => {
                let effects: Vec<ZoneEffect> = stack.values().copied().collect();
                aggregate_effects(&effects)
            }
            None => EffectState::neutral(),
        }
    }

    /// Clears `player`'s entire stack, as on death. Returns
    /// [`Event::EffectRemoved`] for every entry that was cleared.
    pub fn clear(&mut self, player: PlayerId) -> Vec<Event> {
        let Some(stack) = self.stacks.remove(&player) else {
            return Vec::new();
        };
        stack
            .into_values()
            .map(|effect| Event::EffectRemoved { source: effect.source, player, kind: effect.kind })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::ZoneEffectKind;

    fn slow(source: u32, value: f32) -> ZoneEffect {
        ZoneEffect { source: HazardId::new(source), kind: ZoneEffectKind::SpeedModifier, value }
    }

    #[test]
    fn add_reports_new_then_modified_then_unchanged() {
        let mut stack = ZoneStackManager::new();
        let player = PlayerId::new(1);
        assert!(matches!(stack.add(player, slow(1, 0.5)), Some(Event::EffectAdded { .. })));
        assert!(matches!(stack.add(player, slow(1, 0.4)), Some(Event::EffectModified { .. })));
        assert_eq!(stack.add(player, slow(1, 0.4)), None);
    }

    #[test]
    fn re_adding_same_source_updates_in_place_not_duplicates() {
        let mut stack = ZoneStackManager::new();
        let player = PlayerId::new(1);
        let _ = stack.add(player, slow(1, 0.5));
        let _ = stack.add(player, slow(1, 0.25));
        assert_eq!(stack.aggregate(player).speed_multiplier, 0.25);
    }

    #[test]
    fn cleanup_stale_drops_exited_zones() {
        let mut stack = ZoneStackManager::new();
        let player = PlayerId::new(1);
        let _ = stack.add(player, slow(1, 0.5));
        let _ = stack.add(player, slow(2, 0.5));

        let mut active = BTreeSet::new();
        active.insert(HazardId::new(1));
        let events = stack.cleanup_stale(player, &active);
        assert_eq!(events.len(), 1);
        assert_eq!(stack.aggregate(player).speed_multiplier, 0.5);
    }

    #[test]
    fn clear_resets_to_neutral() {
        let mut stack = ZoneStackManager::new();
        let player = PlayerId::new(1);
        let _ = stack.add(player, slow(1, 0.5));
        let events = stack.clear(player);
        assert_eq!(events.len(), 1);
        assert_eq!(stack.aggregate(player), EffectState::neutral());
    }

    #[test]
    fn untouched_player_aggregates_neutral() {
        let stack = ZoneStackManager::new();
        assert_eq!(stack.aggregate(PlayerId::new(99)), EffectState::neutral());
    }
}
