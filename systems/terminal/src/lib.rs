#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal state detection for settled boards.
//!
//! A board with any empty cell is never terminal, even when no tile could
//! actually slide into that cell. Full boards are terminal only when no two
//! orthogonally adjacent tiles share a value.

use tilemerge_core::{GridCell, GridSize, Tile, TileValue};

/// Reports whether no move remains for the provided settled tiles.
///
/// Tiles awaiting removal after a merge must be dropped by the caller first.
#[must_use]
pub fn is_terminal(tiles: &[Tile], size: GridSize) -> bool {
    if tiles.len() < size.cell_count() {
        return false;
    }

    let projection = Projection::new(tiles, size);
    !projection.has_adjacent_pair()
}

/// Dense row-major projection of tile values onto the grid.
#[derive(Debug)]
struct Projection {
    values: Vec<Option<TileValue>>,
    size: u32,
}

impl Projection {
    fn new(tiles: &[Tile], size: GridSize) -> Self {
        let mut projection = Self {
            values: vec![None; size.cell_count()],
            size: size.get(),
        };
        for tile in tiles {
            if let Some(index) = projection.index(tile.cell) {
                projection.values[index] = Some(tile.value);
            }
        }
        projection
    }

    /// Scans every cell against its right and bottom neighbours.
    ///
    /// An empty cell counts as a pair since a tile could slide into it.
    fn has_adjacent_pair(&self) -> bool {
        for row in 0..self.size {
            for column in 0..self.size {
                let current = self.value(GridCell::new(row, column));
                if current.is_none() {
                    return true;
                }
                if column + 1 < self.size && self.value(GridCell::new(row, column + 1)) == current {
                    return true;
                }
                if row + 1 < self.size && self.value(GridCell::new(row + 1, column)) == current {
                    return true;
                }
            }
        }
        false
    }

    fn value(&self, cell: GridCell) -> Option<TileValue> {
        self.index(cell)
            .and_then(|index| self.values.get(index).copied().flatten())
    }

    fn index(&self, cell: GridCell) -> Option<usize> {
        if cell.row() < self.size && cell.column() < self.size {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.size).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemerge_core::TileId;

    #[test]
    fn projection_ignores_cells_outside_the_grid() {
        let tile = Tile::new(TileId::new(0), TileValue::TWO, GridCell::new(5, 0));
        let projection = Projection::new(&[tile], GridSize::new(2));
        assert!(projection.values.iter().all(Option::is_none));
    }

    #[test]
    fn empty_grid_of_size_zero_is_terminal() {
        assert!(is_terminal(&[], GridSize::new(0)));
    }
}
