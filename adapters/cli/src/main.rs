#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless runner: loads a map configuration, validates it, and drives a
//! fixed number of simulation ticks while printing the events produced.
//!
//! Carries no rendering or networking of its own — an actual host embeds
//! `arena-world` directly and drives ticks from its own game loop; this
//! binary exists to exercise a map file end to end from the command line.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use arena_core::{MapConfig, PlayerId, SpawnPointId, Vec2};
use arena_world::{Arena, DynamicSpawnConfig};
use clap::Parser;

/// Loads a map configuration and runs the arena simulation for a fixed
/// number of ticks, printing every event emitted.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to a JSON map configuration file.
    map: PathBuf,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Fixed timestep applied to every tick, in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Seed driving every PRNG-backed subsystem.
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Spawn hazards and traps dynamically instead of loading them from
    /// the map file.
    #[arg(long)]
    dynamic_spawn: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let raw = fs::read_to_string(&cli.map)
        .with_context(|| format!("reading map file {}", cli.map.display()))?;
    let config: MapConfig = serde_json::from_str(&raw)
        .with_context(|| format!("parsing map file {}", cli.map.display()))?;

    let report = arena_core::validate(&config);
    if !report.valid {
        for (index, reason) in report.errors.iter().enumerate() {
            eprintln!("{}. {reason}", index + 1);
        }
        anyhow::bail!("map configuration failed validation");
    }

    let mut arena = Arena::load_map(&config, cli.dynamic_spawn, cli.seed, DynamicSpawnConfig::default())
        .context("loading validated map into arena")?;

    let players = spawn_positions(&config);

    for tick in 0..cli.ticks {
        let events = arena.tick(cli.dt, &players);
        for event in events {
            println!("tick {tick}: {event:?}");
        }
    }

    Ok(())
}

fn spawn_positions(config: &MapConfig) -> BTreeMap<PlayerId, Vec2> {
    let mut players = BTreeMap::new();
    for spawn_point in &config.spawn_points {
        let player = match spawn_point.id {
            SpawnPointId::Player1 => PlayerId::new(1),
            SpawnPointId::Player2 => PlayerId::new(2),
        };
        let _ = players.insert(player, spawn_point.position);
    }
    players
}
