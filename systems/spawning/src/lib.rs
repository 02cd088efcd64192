#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system responsible for placing new tiles on free cells.
//!
//! This is the only stochastic part of the engine. Callers supply the random
//! number generator, so seeding it makes every spawn reproducible.

use rand::{
    seq::{index, SliceRandom},
    Rng,
};
use tilemerge_core::{GridCell, GridPositions, Tile, TileIdAllocator, TileValue};

const DEFAULT_FOUR_PROBABILITY: f64 = 0.1;

/// Number of tiles placed when a game starts.
pub const OPENING_TILE_COUNT: usize = 2;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    four_probability: f64,
}

impl Config {
    /// Creates a configuration where new tiles show a four with the provided
    /// probability and a two otherwise.
    ///
    /// Probabilities outside `[0, 1]` are clamped; a non-finite value falls
    /// back to the default of one in ten.
    #[must_use]
    pub fn new(four_probability: f64) -> Self {
        let four_probability = if four_probability.is_finite() {
            four_probability.clamp(0.0, 1.0)
        } else {
            DEFAULT_FOUR_PROBABILITY
        };
        Self { four_probability }
    }

    /// Probability that a spawned tile carries a four.
    #[must_use]
    pub const fn four_probability(&self) -> f64 {
        self.four_probability
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            four_probability: DEFAULT_FOUR_PROBABILITY,
        }
    }
}

/// Pure system that places new tiles on unoccupied cells.
#[derive(Debug, Default)]
pub struct Spawner {
    config: Config,
}

impl Spawner {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Places one tile on a uniformly chosen cell that is not occupied.
    ///
    /// Returns `None` when every cell of the grid is occupied; no identifier
    /// is consumed in that case.
    pub fn spawn<R>(
        &self,
        occupied: &[GridCell],
        positions: &GridPositions,
        ids: &mut TileIdAllocator,
        rng: &mut R,
    ) -> Option<Tile>
    where
        R: Rng + ?Sized,
    {
        let free: Vec<GridCell> = positions
            .iter()
            .filter(|cell| !occupied.contains(cell))
            .collect();
        let cell = *free.choose(rng)?;
        let value = self.next_value(rng);
        Some(Tile::new(ids.allocate(), value, cell))
    }

    /// Places up to `count` tiles on distinct cells of an empty grid.
    pub fn spawn_opening<R>(
        &self,
        count: usize,
        positions: &GridPositions,
        ids: &mut TileIdAllocator,
        rng: &mut R,
    ) -> Vec<Tile>
    where
        R: Rng + ?Sized,
    {
        let amount = count.min(positions.len());
        let chosen = index::sample(rng, positions.len(), amount);
        chosen
            .into_iter()
            .map(|index| {
                let cell = positions.cells()[index];
                Tile::new(ids.allocate(), self.next_value(rng), cell)
            })
            .collect()
    }

    fn next_value<R>(&self, rng: &mut R) -> TileValue
    where
        R: Rng + ?Sized,
    {
        if rng.gen_bool(self.config.four_probability) {
            TileValue::FOUR
        } else {
            TileValue::TWO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_clamps_probability() {
        assert_eq!(Config::new(1.5).four_probability(), 1.0);
        assert_eq!(Config::new(-0.5).four_probability(), 0.0);
        assert_eq!(
            Config::new(f64::NAN).four_probability(),
            DEFAULT_FOUR_PROBABILITY
        );
    }
}
