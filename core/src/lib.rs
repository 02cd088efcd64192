#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the tile merge engine.
//!
//! This crate defines the data model and the message surface that connects
//! adapters, the authoritative world, and the pure systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what changed. Systems never hold state between calls: they
//! receive tile snapshots and answer with new snapshots.

use serde::{Deserialize, Serialize};

/// Grid dimension used when no other size is configured.
pub const DEFAULT_GRID_SIZE: GridSize = GridSize::new(4);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the grid with a square grid of the provided dimension.
    ConfigureGrid {
        /// Number of rows and columns in the new grid.
        size: GridSize,
    },
    /// Clears the board and places the opening tiles.
    NewGame,
    /// Replaces the board with the provided tile placements.
    LoadTiles {
        /// Cells and values of the tiles to place.
        tiles: Vec<TilePlacement>,
    },
    /// Slides every tile toward the provided edge.
    Move {
        /// Edge the tiles travel toward.
        direction: Direction,
    },
    /// Signals that the presentation of a pending merge finished for a tile.
    CompleteAnimation {
        /// Tile whose merge presentation completed.
        tile: TileId,
    },
    /// Completes every pending merge presentation at once.
    SettleAnimations,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid was rebuilt with a new dimension.
    GridConfigured {
        /// Dimension of the rebuilt grid.
        size: GridSize,
    },
    /// Announces that a fresh game began.
    GameStarted,
    /// Confirms that a tile was added to the board.
    TileSpawned {
        /// Identifier assigned to the new tile.
        tile: TileId,
        /// Cell the tile occupies.
        cell: GridCell,
        /// Value carried by the tile.
        value: TileValue,
    },
    /// Confirms that a board was loaded from explicit placements.
    TilesLoaded {
        /// Number of tiles placed.
        count: usize,
    },
    /// Reports that a load request was rejected.
    LoadRejected {
        /// Specific reason the load failed.
        reason: LoadError,
    },
    /// Confirms that a tile slid between two cells.
    TileMoved {
        /// Identifier of the tile that moved.
        tile: TileId,
        /// Cell the tile occupied before the move.
        from: GridCell,
        /// Cell the tile occupies after the move.
        to: GridCell,
    },
    /// Confirms that two equal tiles combined into one.
    TilesMerged {
        /// Tile that absorbed the other and doubled.
        survivor: TileId,
        /// Tile that slid into the survivor and awaits removal.
        consumed: TileId,
        /// Cell shared by both tiles after the merge.
        cell: GridCell,
        /// Value of the survivor after doubling.
        value: TileValue,
    },
    /// Reports that a move left every tile in place.
    BoardUnchanged {
        /// Direction of the move that had no effect.
        direction: Direction,
    },
    /// Reports that a move request was rejected.
    MoveRejected {
        /// Direction of the rejected move.
        direction: Direction,
        /// Specific reason the move was rejected.
        reason: MoveRejection,
    },
    /// Confirms that a consumed tile left the board.
    TileRemoved {
        /// Identifier of the removed tile.
        tile: TileId,
    },
    /// Confirms that a tile returned to the idle merge state.
    TileSettled {
        /// Identifier of the settled tile.
        tile: TileId,
    },
    /// Announces that no move remains on the board.
    GameOver,
}

/// Reasons a move request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The board already reached a terminal state.
    GameOver,
}

/// Reasons a load request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadError {
    /// A placement lies outside the configured grid.
    OutOfBounds,
    /// Two placements share the same cell.
    DuplicateCell,
}

/// Cardinal directions a move can slide tiles toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward row zero.
    Up,
    /// Toward the last row.
    Down,
    /// Toward column zero.
    Left,
    /// Toward the last column.
    Right,
}

impl Direction {
    /// Every direction in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Unique identifier assigned to a tile for its whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u64);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Hands out tile identifiers that are never reused.
#[derive(Clone, Debug, Default)]
pub struct TileIdAllocator {
    next: u64,
}

impl TileIdAllocator {
    /// Creates an allocator whose first identifier is zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Returns a fresh identifier.
    pub fn allocate(&mut self) -> TileId {
        let id = TileId::new(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Error returned when a number is not a valid tile value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("tile value {0} is not a power of two greater than one")]
pub struct InvalidTileValue(pub u64);

/// Numeric face of a tile; always a power of two no smaller than two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct TileValue(u64);

impl TileValue {
    /// Value of the most common spawned tile.
    pub const TWO: TileValue = TileValue(2);
    /// Value of the rarer spawned tile.
    pub const FOUR: TileValue = TileValue(4);

    /// Wraps the provided number when it is a power of two of at least two.
    #[must_use]
    pub const fn new(value: u64) -> Option<Self> {
        if value >= 2 && value.is_power_of_two() {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Retrieves the numeric value.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Value produced when two tiles of this value merge.
    ///
    /// Saturates at the largest representable power of two.
    #[must_use]
    pub const fn doubled(self) -> Self {
        if self.0 > u64::MAX / 2 {
            self
        } else {
            Self(self.0 * 2)
        }
    }
}

impl TryFrom<u64> for TileValue {
    type Error = InvalidTileValue;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidTileValue(value))
    }
}

impl From<TileValue> for u64 {
    fn from(value: TileValue) -> Self {
        value.0
    }
}

/// Logical cell of the grid expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    row: u32,
    column: u32,
}

impl GridCell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Number of rows and columns of the square grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridSize(u32);

impl GridSize {
    /// Creates a new grid dimension wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying dimension.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Number of cells in the whole grid.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        (self.0 as usize) * (self.0 as usize)
    }

    /// Index of the last row and column, or `None` for an empty grid.
    #[must_use]
    pub const fn last_index(&self) -> Option<u32> {
        self.0.checked_sub(1)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: GridCell) -> bool {
        cell.row < self.0 && cell.column < self.0
    }
}

/// Ordered universe of every cell in a square grid.
///
/// Cells are stored row-major: row zero left to right, then row one, and so
/// on. The order carries no meaning for consumers but keeps lookups
/// reproducible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridPositions {
    size: GridSize,
    cells: Vec<GridCell>,
}

impl GridPositions {
    /// Computes every cell of a grid with the provided dimension.
    #[must_use]
    pub fn compute(size: GridSize) -> Self {
        let cells = (0..size.get())
            .flat_map(|row| (0..size.get()).map(move |column| GridCell::new(row, column)))
            .collect();
        Self { size, cells }
    }

    /// Dimension the positions were computed for.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Iterator over the cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = GridCell> + '_ {
        self.cells.iter().copied()
    }

    /// Number of cells in the universe.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the universe holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Looks up the cell with exactly the provided coordinates.
    #[must_use]
    pub fn find(&self, row: u32, column: u32) -> Option<GridCell> {
        self.cells
            .iter()
            .copied()
            .find(|cell| cell.row() == row && cell.column() == column)
    }

    /// Reports whether the cell belongs to the universe.
    #[must_use]
    pub fn contains(&self, cell: GridCell) -> bool {
        self.cells.contains(&cell)
    }
}

/// Merge presentation state of a tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MergeState {
    /// No merge is pending for the tile.
    #[default]
    Idle,
    /// The tile absorbed another tile and doubled during the latest move.
    PendingMergeGrowth,
    /// The tile slid into another tile and leaves once its arrival is acknowledged.
    PendingRemoval,
}

/// A single numbered tile occupying one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Identifier that stays with the tile until it is removed.
    pub id: TileId,
    /// Numeric face of the tile.
    pub value: TileValue,
    /// Cell the tile occupies.
    pub cell: GridCell,
    /// Pending merge presentation, if any.
    pub merge_state: MergeState,
}

impl Tile {
    /// Creates an idle tile.
    #[must_use]
    pub const fn new(id: TileId, value: TileValue, cell: GridCell) -> Self {
        Self {
            id,
            value,
            cell,
            merge_state: MergeState::Idle,
        }
    }

    /// Reports whether the tile is waiting to be removed after a merge.
    #[must_use]
    pub fn is_pending_removal(&self) -> bool {
        self.merge_state == MergeState::PendingRemoval
    }
}

/// Requested cell and value for a tile loaded onto the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePlacement {
    /// Cell the tile should occupy.
    pub cell: GridCell,
    /// Value the tile should carry.
    pub value: TileValue,
}

impl TilePlacement {
    /// Creates a new placement.
    #[must_use]
    pub const fn new(cell: GridCell, value: TileValue) -> Self {
        Self { cell, value }
    }
}

/// Record of a single merge completed during a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MergeRecord {
    /// Tile that absorbed the other and doubled.
    pub survivor: TileId,
    /// Tile that slid into the survivor.
    pub consumed: TileId,
    /// Cell shared by both tiles after the move.
    pub cell: GridCell,
    /// Value of the survivor after doubling.
    pub value: TileValue,
}

/// Outcome of resolving one move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveResult {
    tiles: Vec<Tile>,
    any_tile_moved: bool,
    merges: Vec<MergeRecord>,
}

impl MoveResult {
    /// Bundles a resolved tile set with its movement flag and merges.
    #[must_use]
    pub fn new(tiles: Vec<Tile>, any_tile_moved: bool, merges: Vec<MergeRecord>) -> Self {
        Self {
            tiles,
            any_tile_moved,
            merges,
        }
    }

    /// Every resolved tile, including tiles awaiting merge presentation.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Reports whether at least one tile changed cell.
    #[must_use]
    pub const fn any_tile_moved(&self) -> bool {
        self.any_tile_moved
    }

    /// Merges completed during the move.
    #[must_use]
    pub fn merges(&self) -> &[MergeRecord] {
        &self.merges
    }

    /// Tiles that are growing or awaiting removal.
    pub fn pending_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles
            .iter()
            .filter(|tile| tile.merge_state != MergeState::Idle)
    }

    /// Tiles that remain on the board once removals are acknowledged.
    pub fn settled_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|tile| !tile.is_pending_removal())
    }

    /// Consumes the result, yielding the resolved tiles.
    #[must_use]
    pub fn into_tiles(self) -> Vec<Tile> {
        self.tiles
    }
}
