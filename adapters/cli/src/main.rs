#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a tile merge game without a renderer.
//!
//! Merge presentation completes instantly: every move is followed by a
//! settle command, since there is no animator to acknowledge it.

mod board;
mod config;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tilemerge_core::{Command, Direction, Event};
use tilemerge_world::{self as world, query, World};

use crate::{board::format_board, config::AppConfig, script::parse_moves};

const AUTOPLAY_SALT: u64 = 0x9e37_79b9_7f4a_7c15;
const DEFAULT_AUTOPLAY_MOVES: usize = 1_000;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Play a sliding tile merge game from a move script or on autoplay"
)]
struct Cli {
    /// Optional TOML file with game settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of rows and columns (overrides the config file)
    #[arg(long, value_name = "N")]
    size: Option<u32>,

    /// Seed for spawning and autoplay (overrides the config file)
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Moves to play, e.g. "LLUR" or "wasd"
    #[arg(long, value_name = "SCRIPT", conflicts_with = "autoplay")]
    moves: Option<String>,

    /// Number of random moves to play when no script is given
    #[arg(long, value_name = "COUNT")]
    autoplay: Option<usize>,

    /// Log filter, e.g. "info", "debug"
    #[arg(long, default_value = "info")]
    log: String,
}

/// Entry point for the tile merge command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log.as_str())).init();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(size) = cli.size {
        config.grid_size = size;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    config.validate().context("invalid settings")?;

    let plan = match &cli.moves {
        Some(script) => parse_moves(script).context("failed to parse move script")?,
        None => autoplay_plan(
            config.seed,
            cli.autoplay.unwrap_or(DEFAULT_AUTOPLAY_MOVES),
        ),
    };

    let mut world = World::new(config.world_config());
    let mut events = Vec::new();
    world::apply(&mut world, Command::NewGame, &mut events);
    log_events(&events);

    let mut merges = 0_usize;
    for direction in plan {
        if query::is_game_over(&world) {
            break;
        }
        events.clear();
        world::apply(&mut world, Command::Move { direction }, &mut events);
        world::apply(&mut world, Command::SettleAnimations, &mut events);
        merges += events
            .iter()
            .filter(|event| matches!(event, Event::TilesMerged { .. }))
            .count();
        log_events(&events);
    }

    print!("{}", format_board(&world));
    println!(
        "moves: {}, merges: {}, highest tile: {}, game over: {}",
        query::moves_made(&world),
        merges,
        query::highest_value(&world).map_or(0, |value| value.get()),
        if query::is_game_over(&world) { "yes" } else { "no" }
    );
    info!("finished after {} moves", query::moves_made(&world));
    Ok(())
}

fn autoplay_plan(seed: u64, count: usize) -> Vec<Direction> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ AUTOPLAY_SALT);
    (0..count)
        .filter_map(|_| Direction::ALL.choose(&mut rng).copied())
        .collect()
}

fn log_events(events: &[Event]) {
    for event in events {
        debug!("{event:?}");
    }
}
