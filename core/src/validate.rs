//! Map configuration acceptance checks.
//!
//! Validation never panics or short-circuits: every violation is collected
//! so a host can present the complete list to whoever authored the map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::map::{BarrierKind, HazardKind, MapConfig, TrapKind};
use crate::tile::{grid_in_bounds, TileKind, GRID_COLUMNS, GRID_ROWS};

const NAME_LEN: std::ops::RangeInclusive<usize> = 3..=50;
const DESCRIPTION_MAX_LEN: usize = 200;
const DESTRUCTIBLE_HEALTH_RANGE: std::ops::RangeInclusive<u32> = 50..=200;
const DAMAGE_INTENSITY_RANGE: std::ops::RangeInclusive<f32> = 5.0..=25.0;
const SLOW_INTENSITY_RANGE: std::ops::RangeInclusive<f32> = 0.25..=0.75;
const EMP_INTENSITY: f32 = 1.0;
const TRAP_COOLDOWN_RANGE: std::ops::RangeInclusive<f32> = 5.0..=30.0;
const TRAP_INTERVAL_RANGE: std::ops::RangeInclusive<f32> = 5.0..=30.0;

/// The result of validating a [`MapConfig`].
///
/// Never constructed by throwing: callers inspect `valid` and, if false,
/// report `errors` back to whoever authored the map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when no violations were found.
    pub valid: bool,
    /// Human-readable descriptions of every violation found.
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self { valid: errors.is_empty(), errors }
    }
}

/// Checks a map configuration against every structural and semantic
/// invariant and returns the complete list of violations, if any.
#[must_use]
pub fn validate(config: &MapConfig) -> ValidationReport {
    let mut errors = Vec::new();

    validate_metadata(config, &mut errors);
    validate_tiles(config, &mut errors);
    validate_spawn_points(config, &mut errors);
    validate_barriers(config, &mut errors);
    validate_hazards(config, &mut errors);
    validate_traps(config, &mut errors);
    validate_teleporters(config, &mut errors);

    ValidationReport::from_errors(errors)
}

fn validate_metadata(config: &MapConfig, errors: &mut Vec<String>) {
    let metadata = &config.metadata;
    if !NAME_LEN.contains(&metadata.name.chars().count()) {
        errors.push(format!(
            "metadata.name must be 3..50 characters, got {}",
            metadata.name.chars().count()
        ));
    }
    if metadata.author.trim().is_empty() {
        errors.push("metadata.author must be non-empty".to_string());
    }
    if !is_semver_like(&metadata.version) {
        errors.push(format!(
            "metadata.version must match d+.d+.d+, got {:?}",
            metadata.version
        ));
    }
    if metadata.description.chars().count() > DESCRIPTION_MAX_LEN {
        errors.push(format!(
            "metadata.description must be at most {DESCRIPTION_MAX_LEN} characters, got {}",
            metadata.description.chars().count()
        ));
    }
}

fn is_semver_like(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3 && parts.iter().all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
}

fn validate_tiles(config: &MapConfig, errors: &mut Vec<String>) {
    if config.tiles.len() != GRID_ROWS as usize {
        errors.push(format!(
            "tiles must have exactly {GRID_ROWS} rows, got {}",
            config.tiles.len()
        ));
        return;
    }
    for (row_index, row) in config.tiles.iter().enumerate() {
        if row.len() != GRID_COLUMNS as usize {
            errors.push(format!(
                "tiles row {row_index} must have exactly {GRID_COLUMNS} columns, got {}",
                row.len()
            ));
        }
    }
}

fn validate_spawn_points(config: &MapConfig, errors: &mut Vec<String>) {
    use crate::ids::SpawnPointId;

    let player1 = config.spawn_points.iter().find(|p| p.id == SpawnPointId::Player1);
    let player2 = config.spawn_points.iter().find(|p| p.id == SpawnPointId::Player2);

    for (label, spawn) in [("player1", player1), ("player2", player2)] {
        match spawn {
            None => errors.push(format!("spawn point {label} is missing")),
            Some(spawn) => {
                let (column, row) = crate::tile::pixel_to_grid(spawn.position.x, spawn.position.y);
                if !grid_in_bounds(column, row) {
                    errors.push(format!("spawn point {label} lies outside the tile grid"));
                } else if !on_floor(config, column, row) {
                    errors.push(format!("spawn point {label} does not sit on a floor tile"));
                }
            }
        }
    }
}

fn on_floor(config: &MapConfig, column: i32, row: i32) -> bool {
    config
        .tiles
        .get(row as usize)
        .and_then(|r| r.get(column as usize))
        .is_some_and(|kind| *kind == TileKind::Floor)
}

fn validate_barriers(config: &MapConfig, errors: &mut Vec<String>) {
    for barrier in &config.barriers {
        match barrier.kind {
            BarrierKind::Destructible => match barrier.health {
                Some(health) if DESTRUCTIBLE_HEALTH_RANGE.contains(&health) => {}
                Some(health) => errors.push(format!(
                    "barrier {:?} health {health} out of range [50, 200]",
                    barrier.id
                )),
                None => errors.push(format!(
                    "barrier {:?} is destructible but has no health",
                    barrier.id
                )),
            },
            BarrierKind::OneWay => {
                if barrier.direction.is_none() {
                    errors.push(format!("barrier {:?} is one-way but has no direction", barrier.id));
                }
            }
            BarrierKind::Full | BarrierKind::Half => {}
        }
    }

    for (i, a) in config.barriers.iter().enumerate() {
        let rect_a = crate::geometry::Rect::from_origin_size(a.position, a.size);
        for b in config.barriers.iter().skip(i + 1) {
            let rect_b = crate::geometry::Rect::from_origin_size(b.position, b.size);
            if rect_a.overlaps(&rect_b) {
                errors.push(format!("barriers {:?} and {:?} overlap", a.id, b.id));
            }
        }
    }
}

fn validate_hazards(config: &MapConfig, errors: &mut Vec<String>) {
    for hazard in &config.hazards {
        let range = match hazard.kind {
            HazardKind::Damage => DAMAGE_INTENSITY_RANGE,
            HazardKind::Slow => SLOW_INTENSITY_RANGE,
            HazardKind::Emp => {
                if (hazard.intensity - EMP_INTENSITY).abs() > f32::EPSILON {
                    errors.push(format!(
                        "hazard {:?} is emp but intensity {} != {EMP_INTENSITY}",
                        hazard.id, hazard.intensity
                    ));
                }
                continue;
            }
        };
        if !range.contains(&hazard.intensity) {
            errors.push(format!(
                "hazard {:?} intensity {} out of range [{}, {}]",
                hazard.id,
                hazard.intensity,
                range.start(),
                range.end()
            ));
        }
    }
}

fn validate_traps(config: &MapConfig, errors: &mut Vec<String>) {
    for trap in &config.traps {
        if !TRAP_COOLDOWN_RANGE.contains(&trap.cooldown) {
            errors.push(format!(
                "trap {:?} cooldown {} out of range [5, 30]",
                trap.id, trap.cooldown
            ));
        }
        match (trap.kind, trap.interval) {
            (TrapKind::Timed, Some(interval)) if !TRAP_INTERVAL_RANGE.contains(&interval) => {
                errors.push(format!(
                    "trap {:?} interval {interval} out of range [5, 30]",
                    trap.id
                ));
            }
            (TrapKind::Timed, None) => {
                errors.push(format!("trap {:?} is timed but has no interval", trap.id));
            }
            _ => {}
        }
    }
}

fn validate_teleporters(config: &MapConfig, errors: &mut Vec<String>) {
    let mut pair_counts: HashMap<u32, u32> = HashMap::new();
    for teleporter in &config.teleporters {
        let is_random_exit = teleporter
            .random_exits
            .as_ref()
            .is_some_and(|exits| !exits.is_empty());
        if is_random_exit {
            continue;
        }
        match teleporter.pair_id {
            Some(pair_id) => *pair_counts.entry(pair_id).or_insert(0) += 1,
            None => errors.push(format!(
                "teleporter {:?} has no pair_id and no random_exits",
                teleporter.id
            )),
        }
    }
    for (pair_id, count) in pair_counts {
        if count != 2 {
            errors.push(format!("teleporter pair {pair_id} has {count} pads, expected 2"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Vec2};
    use crate::ids::{BarrierId, HazardId, SpawnPointId, TeleporterId, TrapId};
    use crate::map::{
        BarrierConfig, HazardConfig, MapMetadata, SpawnPointConfig, TeleporterConfig, TrapConfig,
        TrapEffectKind,
    };

    fn floor_grid() -> Vec<Vec<TileKind>> {
        vec![vec![TileKind::Floor; GRID_COLUMNS as usize]; GRID_ROWS as usize]
    }

    fn minimal_config() -> MapConfig {
        MapConfig {
            metadata: MapMetadata {
                name: "Proving Grounds".to_string(),
                author: "Someone".to_string(),
                version: "1.0.0".to_string(),
                description: "A small arena.".to_string(),
                theme: None,
            },
            tiles: floor_grid(),
            barriers: Vec::new(),
            hazards: Vec::new(),
            traps: Vec::new(),
            teleporters: Vec::new(),
            jump_pads: Vec::new(),
            spawn_points: vec![
                SpawnPointConfig { id: SpawnPointId::Player1, position: Vec2::new(40.0, 40.0) },
                SpawnPointConfig { id: SpawnPointId::Player2, position: Vec2::new(1200.0, 640.0) },
            ],
            power_up_spawns: Vec::new(),
        }
    }

    #[test]
    fn minimal_config_is_valid() {
        let report = validate(&minimal_config());
        assert!(report.valid, "{:?}", report.errors);
    }

    #[test]
    fn wrong_tile_row_count_is_rejected() {
        let mut config = minimal_config();
        config.tiles.pop();
        let report = validate(&config);
        assert!(!report.valid);
    }

    #[test]
    fn missing_spawn_point_is_rejected() {
        let mut config = minimal_config();
        config.spawn_points.retain(|p| p.id != SpawnPointId::Player2);
        let report = validate(&config);
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("player2")));
    }

    #[test]
    fn overlapping_barriers_are_rejected() {
        let mut config = minimal_config();
        config.barriers.push(BarrierConfig {
            id: BarrierId::new(1),
            kind: BarrierKind::Full,
            position: Vec2::new(100.0, 100.0),
            size: Vec2::new(80.0, 80.0),
            health: None,
            direction: None,
        });
        config.barriers.push(BarrierConfig {
            id: BarrierId::new(2),
            kind: BarrierKind::Full,
            position: Vec2::new(150.0, 100.0),
            size: Vec2::new(80.0, 80.0),
            health: None,
            direction: None,
        });
        let report = validate(&config);
        assert!(!report.valid);
    }

    #[test]
    fn destructible_health_out_of_range_is_rejected() {
        let mut config = minimal_config();
        config.barriers.push(BarrierConfig {
            id: BarrierId::new(1),
            kind: BarrierKind::Destructible,
            position: Vec2::new(100.0, 100.0),
            size: Vec2::new(80.0, 80.0),
            health: Some(10),
            direction: None,
        });
        let report = validate(&config);
        assert!(!report.valid);
    }

    #[test]
    fn teleporter_pair_missing_partner_is_rejected() {
        let mut config = minimal_config();
        config.teleporters.push(TeleporterConfig {
            id: TeleporterId::new(1),
            pair_id: Some(5),
            position: Vec2::new(400.0, 350.0),
            radius: 30.0,
            random_exits: None,
        });
        let report = validate(&config);
        assert!(!report.valid);
    }

    #[test]
    fn unpaired_random_exit_teleporter_is_accepted() {
        let mut config = minimal_config();
        config.teleporters.push(TeleporterConfig {
            id: TeleporterId::new(1),
            pair_id: None,
            position: Vec2::new(400.0, 350.0),
            radius: 30.0,
            random_exits: Some(vec![Vec2::new(100.0, 100.0), Vec2::new(900.0, 600.0)]),
        });
        let report = validate(&config);
        assert!(report.valid, "{:?}", report.errors);
    }

    #[test]
    fn timed_trap_without_interval_is_rejected() {
        let mut config = minimal_config();
        config.traps.push(TrapConfig {
            id: TrapId::new(1),
            kind: TrapKind::Timed,
            position: Vec2::new(400.0, 350.0),
            radius: 40.0,
            effect: TrapEffectKind::DamageBurst,
            effect_value: 30.0,
            cooldown: 10.0,
            interval: None,
            chain_radius: None,
        });
        let report = validate(&config);
        assert!(!report.valid);
    }

    #[test]
    fn hazard_intensity_out_of_range_is_rejected() {
        let mut config = minimal_config();
        config.hazards.push(HazardConfig {
            id: HazardId::new(1),
            kind: HazardKind::Slow,
            bounds: Rect::from_origin_size(Vec2::new(200.0, 300.0), Vec2::new(100.0, 100.0)),
            intensity: 0.9,
        });
        let report = validate(&config);
        assert!(!report.valid);
    }
}
