#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state management for the tile merge engine.
//!
//! The world owns the tile set between moves. It is mutated only through
//! [`apply`], which replaces the tile set with the snapshot produced by the
//! pure systems and reports every change as an [`Event`]. Merge presentation
//! is a two-phase commit: a move leaves merged tiles pending, and the host
//! confirms each presentation with [`Command::CompleteAnimation`] or
//! [`Command::SettleAnimations`].

use std::collections::{HashMap, HashSet};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tilemerge_core::{
    Command, Direction, Event, GridPositions, GridSize, LoadError, MergeState, MoveRejection,
    Tile, TileId, TileIdAllocator, TilePlacement, DEFAULT_GRID_SIZE,
};
use tilemerge_system_movement::MoveResolver;
use tilemerge_system_spawning::{self as spawning, Spawner, OPENING_TILE_COUNT};
use tilemerge_system_terminal::is_terminal;

const DEFAULT_RNG_SEED: u64 = 0x2048_c0ff_ee15_600d;

/// Configuration parameters required to construct the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    grid_size: GridSize,
    rng_seed: u64,
    spawning: spawning::Config,
    opening_tiles: usize,
}

impl Config {
    /// Creates a configuration for a grid of the provided size and spawn seed.
    #[must_use]
    pub fn new(grid_size: GridSize, rng_seed: u64) -> Self {
        Self {
            grid_size,
            rng_seed,
            spawning: spawning::Config::default(),
            opening_tiles: OPENING_TILE_COUNT,
        }
    }

    /// Overrides the probability that a spawned tile carries a four.
    #[must_use]
    pub fn with_four_probability(mut self, four_probability: f64) -> Self {
        self.spawning = spawning::Config::new(four_probability);
        self
    }

    /// Overrides how many tiles a new game starts with.
    #[must_use]
    pub fn with_opening_tiles(mut self, opening_tiles: usize) -> Self {
        self.opening_tiles = opening_tiles;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE, DEFAULT_RNG_SEED)
    }
}

/// Represents the authoritative board state.
#[derive(Debug)]
pub struct World {
    positions: GridPositions,
    tiles: Vec<Tile>,
    ids: TileIdAllocator,
    rng: ChaCha8Rng,
    resolver: MoveResolver,
    spawner: Spawner,
    opening_tiles: usize,
    game_over: bool,
    moves_made: u64,
}

impl World {
    /// Creates a world with an empty board.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            positions: GridPositions::compute(config.grid_size),
            tiles: Vec::new(),
            ids: TileIdAllocator::new(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            resolver: MoveResolver,
            spawner: Spawner::new(config.spawning),
            opening_tiles: config.opening_tiles,
            game_over: false,
            moves_made: 0,
        }
    }

    fn reset_board(&mut self) {
        self.tiles.clear();
        self.game_over = false;
        self.moves_made = 0;
    }

    fn settled_tiles(&self) -> Vec<Tile> {
        self.tiles
            .iter()
            .copied()
            .filter(|tile| !tile.is_pending_removal())
            .collect()
    }

    fn refresh_game_over(&mut self, out_events: &mut Vec<Event>) {
        let settled = self.settled_tiles();
        if is_terminal(&settled, self.positions.size()) {
            self.game_over = true;
            log::info!("no moves remain after {} moves", self.moves_made);
            out_events.push(Event::GameOver);
        }
    }

    fn settle_all(&mut self, out_events: &mut Vec<Event>) {
        for tile in &mut self.tiles {
            if tile.merge_state == MergeState::PendingMergeGrowth {
                tile.merge_state = MergeState::Idle;
                out_events.push(Event::TileSettled { tile: tile.id });
            }
        }

        let (removed, kept): (Vec<Tile>, Vec<Tile>) = self
            .tiles
            .drain(..)
            .partition(|tile| tile.is_pending_removal());
        self.tiles = kept;
        for tile in removed {
            out_events.push(Event::TileRemoved { tile: tile.id });
        }
    }

    fn complete_animation(&mut self, tile_id: TileId, out_events: &mut Vec<Event>) {
        let Some(index) = self.tiles.iter().position(|tile| tile.id == tile_id) else {
            return;
        };

        match self.tiles[index].merge_state {
            MergeState::Idle => {}
            MergeState::PendingMergeGrowth => {
                self.tiles[index].merge_state = MergeState::Idle;
                out_events.push(Event::TileSettled { tile: tile_id });
            }
            MergeState::PendingRemoval => {
                let removed = self.tiles.remove(index);
                out_events.push(Event::TileRemoved { tile: removed.id });

                let survivor = self.tiles.iter_mut().find(|tile| {
                    tile.cell == removed.cell && tile.merge_state == MergeState::PendingMergeGrowth
                });
                if let Some(survivor) = survivor {
                    survivor.merge_state = MergeState::Idle;
                    out_events.push(Event::TileSettled { tile: survivor.id });
                }
            }
        }
    }

    fn load(&mut self, placements: Vec<TilePlacement>, out_events: &mut Vec<Event>) {
        let mut seen = HashSet::with_capacity(placements.len());
        for placement in &placements {
            if !self.positions.contains(placement.cell) {
                out_events.push(Event::LoadRejected {
                    reason: LoadError::OutOfBounds,
                });
                return;
            }
            if !seen.insert(placement.cell) {
                out_events.push(Event::LoadRejected {
                    reason: LoadError::DuplicateCell,
                });
                return;
            }
        }

        self.reset_board();
        for placement in placements {
            self.tiles
                .push(Tile::new(self.ids.allocate(), placement.value, placement.cell));
        }
        out_events.push(Event::TilesLoaded {
            count: self.tiles.len(),
        });
        self.refresh_game_over(out_events);
    }

    fn play(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        self.settle_all(out_events);

        if self.game_over {
            out_events.push(Event::MoveRejected {
                direction,
                reason: MoveRejection::GameOver,
            });
            return;
        }

        let result = self.resolver.resolve(&self.tiles, direction, &self.positions);
        if !result.any_tile_moved() {
            log::debug!("{direction:?} left the board unchanged");
            out_events.push(Event::BoardUnchanged { direction });
            return;
        }

        let previous: HashMap<TileId, _> =
            self.tiles.iter().map(|tile| (tile.id, tile.cell)).collect();
        for tile in result.tiles() {
            if let Some(&from) = previous.get(&tile.id) {
                if from != tile.cell {
                    out_events.push(Event::TileMoved {
                        tile: tile.id,
                        from,
                        to: tile.cell,
                    });
                }
            }
        }
        for merge in result.merges() {
            out_events.push(Event::TilesMerged {
                survivor: merge.survivor,
                consumed: merge.consumed,
                cell: merge.cell,
                value: merge.value,
            });
        }
        log::debug!(
            "{direction:?} resolved with {} merge(s)",
            result.merges().len()
        );

        self.tiles = result.into_tiles();
        self.moves_made = self.moves_made.saturating_add(1);

        let occupied: Vec<_> = self.tiles.iter().map(|tile| tile.cell).collect();
        if let Some(tile) =
            self.spawner
                .spawn(&occupied, &self.positions, &mut self.ids, &mut self.rng)
        {
            self.tiles.push(tile);
            out_events.push(Event::TileSpawned {
                tile: tile.id,
                cell: tile.cell,
                value: tile.value,
            });
        }

        self.refresh_game_over(out_events);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { size } => {
            world.positions = GridPositions::compute(size);
            world.reset_board();
            out_events.push(Event::GridConfigured { size });
        }
        Command::NewGame => {
            world.reset_board();
            out_events.push(Event::GameStarted);
            let opening = world.spawner.spawn_opening(
                world.opening_tiles,
                &world.positions,
                &mut world.ids,
                &mut world.rng,
            );
            for tile in &opening {
                out_events.push(Event::TileSpawned {
                    tile: tile.id,
                    cell: tile.cell,
                    value: tile.value,
                });
            }
            world.tiles = opening;
            log::info!(
                "new game on a {0}x{0} grid with {1} tile(s)",
                world.positions.size().get(),
                world.tiles.len()
            );
            world.refresh_game_over(out_events);
        }
        Command::LoadTiles { tiles } => world.load(tiles, out_events),
        Command::Move { direction } => world.play(direction, out_events),
        Command::CompleteAnimation { tile } => world.complete_animation(tile, out_events),
        Command::SettleAnimations => world.settle_all(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use tilemerge_core::{GridCell, GridPositions, GridSize, MergeState, Tile, TileId, TileValue};

    /// Every tile on the board, including tiles awaiting merge presentation.
    #[must_use]
    pub fn tiles(world: &World) -> &[Tile] {
        &world.tiles
    }

    /// Tiles that remain once pending removals are acknowledged.
    #[must_use]
    pub fn settled_tiles(world: &World) -> Vec<Tile> {
        world.settled_tiles()
    }

    /// Settled tile occupying the provided cell, if any.
    #[must_use]
    pub fn tile_at(world: &World, cell: GridCell) -> Option<Tile> {
        world
            .tiles
            .iter()
            .copied()
            .find(|tile| tile.cell == cell && !tile.is_pending_removal())
    }

    /// Provides read-only access to the grid's cell universe.
    #[must_use]
    pub fn grid_positions(world: &World) -> &GridPositions {
        &world.positions
    }

    /// Dimension of the configured grid.
    #[must_use]
    pub fn grid_size(world: &World) -> GridSize {
        world.positions.size()
    }

    /// Reports whether the board reached a terminal state.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// Number of moves that changed the board since the game started.
    #[must_use]
    pub fn moves_made(world: &World) -> u64 {
        world.moves_made
    }

    /// Tiles whose merge presentation has not completed yet.
    #[must_use]
    pub fn pending_animations(world: &World) -> Vec<(TileId, MergeState)> {
        world
            .tiles
            .iter()
            .filter(|tile| tile.merge_state != MergeState::Idle)
            .map(|tile| (tile.id, tile.merge_state))
            .collect()
    }

    /// Largest value among the settled tiles.
    #[must_use]
    pub fn highest_value(world: &World) -> Option<TileValue> {
        world
            .tiles
            .iter()
            .filter(|tile| !tile.is_pending_removal())
            .map(|tile| tile.value)
            .max()
    }
}
