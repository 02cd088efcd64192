#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that slides and merges tiles for one move.
//!
//! Tiles are resolved starting from the destination edge and working inward,
//! so the landing cell of every tile depends only on tiles that already have
//! their final cell. A tile that slid into another during the pass cannot be
//! merged into again, which limits every tile to one merge per move.

use tilemerge_core::{
    Direction, GridCell, GridPositions, MergeRecord, MergeState, MoveResult, Tile,
};

/// Pure system that resolves a directional move against a tile snapshot.
#[derive(Debug, Default)]
pub struct MoveResolver;

impl MoveResolver {
    /// Resolves a move of every tile toward the edge named by `direction`.
    ///
    /// Tiles still awaiting removal from an earlier move are dropped before
    /// resolution and every surviving tile starts the move idle, so the
    /// returned merge states describe only this move. Cells the grid cannot
    /// provide leave the affected tile where it was.
    #[must_use]
    pub fn resolve(
        &self,
        tiles: &[Tile],
        direction: Direction,
        positions: &GridPositions,
    ) -> MoveResult {
        let ordered = resolution_order(tiles, direction);
        let mut resolved: Vec<Tile> = Vec::with_capacity(ordered.len());
        let mut merges = Vec::new();

        for (index, tile) in ordered.iter().enumerate() {
            let front = find_front(&resolved, &ordered[index + 1..], tile.cell, direction);

            let Some(front) = front else {
                let cell = edge_cell(tile.cell, direction, positions).unwrap_or(tile.cell);
                resolved.push(Tile { cell, ..*tile });
                continue;
            };

            if let Some(survivor_index) = front.mergeable_with(tile) {
                let survivor = &mut resolved[survivor_index];
                survivor.value = survivor.value.doubled();
                survivor.merge_state = MergeState::PendingMergeGrowth;
                merges.push(MergeRecord {
                    survivor: survivor.id,
                    consumed: tile.id,
                    cell: survivor.cell,
                    value: survivor.value,
                });
                resolved.push(Tile {
                    cell: front.tile.cell,
                    merge_state: MergeState::PendingRemoval,
                    ..*tile
                });
                continue;
            }

            let cell = behind(front.tile.cell, direction, positions).unwrap_or(tile.cell);
            resolved.push(Tile { cell, ..*tile });
        }

        let any_tile_moved = resolved.iter().zip(ordered.iter()).any(|(after, before)| {
            debug_assert_eq!(after.id, before.id);
            after.cell != before.cell
        });

        MoveResult::new(resolved, any_tile_moved, merges)
    }
}

/// Obstacle found ahead of a tile along its direction of travel.
#[derive(Clone, Copy, Debug)]
struct Front {
    tile: Tile,
    resolved_index: Option<usize>,
}

impl Front {
    /// Index of the resolved tile the mover may merge into.
    ///
    /// Tiles that are not resolved yet have no landing cell and therefore
    /// act only as obstacles.
    fn mergeable_with(&self, mover: &Tile) -> Option<usize> {
        if self.tile.value != mover.value || self.tile.is_pending_removal() {
            return None;
        }
        self.resolved_index
    }
}

/// Copies the tiles into the order in which they must be resolved.
fn resolution_order(tiles: &[Tile], direction: Direction) -> Vec<Tile> {
    let mut ordered: Vec<Tile> = tiles
        .iter()
        .filter(|tile| !tile.is_pending_removal())
        .map(|tile| Tile {
            merge_state: MergeState::Idle,
            ..*tile
        })
        .collect();

    match direction {
        Direction::Up => ordered.sort_by_key(|tile| tile.cell.row()),
        Direction::Down => ordered.sort_by(|a, b| b.cell.row().cmp(&a.cell.row())),
        Direction::Left => ordered.sort_by_key(|tile| tile.cell.column()),
        Direction::Right => ordered.sort_by(|a, b| b.cell.column().cmp(&a.cell.column())),
    }
    ordered
}

/// Finds the closest tile between `origin` and the destination edge.
///
/// Resolved tiles are searched at their landing cells and precede the
/// unresolved ones; the last match wins because resolved tiles on the same
/// line are appended in order of increasing distance from the edge.
fn find_front(
    resolved: &[Tile],
    unresolved: &[Tile],
    origin: GridCell,
    direction: Direction,
) -> Option<Front> {
    let resolved_candidates = resolved
        .iter()
        .enumerate()
        .map(|(index, tile)| (Some(index), tile));
    let unresolved_candidates = unresolved.iter().map(|tile| (None, tile));

    resolved_candidates
        .chain(unresolved_candidates)
        .filter(|(_, tile)| lies_ahead(tile.cell, origin, direction))
        .last()
        .map(|(resolved_index, tile)| Front {
            tile: *tile,
            resolved_index,
        })
}

fn lies_ahead(candidate: GridCell, origin: GridCell, direction: Direction) -> bool {
    match direction {
        Direction::Up => candidate.column() == origin.column() && candidate.row() < origin.row(),
        Direction::Down => candidate.column() == origin.column() && candidate.row() > origin.row(),
        Direction::Left => candidate.row() == origin.row() && candidate.column() < origin.column(),
        Direction::Right => {
            candidate.row() == origin.row() && candidate.column() > origin.column()
        }
    }
}

/// Cell on the destination edge sharing the tile's row or column.
///
/// Returns `None` when the tile already sits on the edge or the grid cannot
/// provide the cell.
fn edge_cell(cell: GridCell, direction: Direction, positions: &GridPositions) -> Option<GridCell> {
    let last = positions.size().last_index()?;
    match direction {
        Direction::Up if cell.row() != 0 => positions.find(0, cell.column()),
        Direction::Down if cell.row() != last => positions.find(last, cell.column()),
        Direction::Left if cell.column() != 0 => positions.find(cell.row(), 0),
        Direction::Right if cell.column() != last => positions.find(cell.row(), last),
        _ => None,
    }
}

/// Cell one step back from `front` against the direction of travel.
fn behind(front: GridCell, direction: Direction, positions: &GridPositions) -> Option<GridCell> {
    match direction {
        Direction::Up => positions.find(front.row().checked_add(1)?, front.column()),
        Direction::Down => positions.find(front.row().checked_sub(1)?, front.column()),
        Direction::Left => positions.find(front.row(), front.column().checked_add(1)?),
        Direction::Right => positions.find(front.row(), front.column().checked_sub(1)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemerge_core::{GridSize, TileId, TileValue};

    fn tile(id: u64, value: u64, row: u32, column: u32) -> Tile {
        Tile::new(
            TileId::new(id),
            TileValue::new(value).expect("valid tile value"),
            GridCell::new(row, column),
        )
    }

    #[test]
    fn resolution_order_starts_at_destination_edge() {
        let tiles = [tile(0, 2, 1, 0), tile(1, 2, 3, 0), tile(2, 2, 0, 0)];
        let rows = |direction| -> Vec<u32> {
            resolution_order(&tiles, direction)
                .iter()
                .map(|tile| tile.cell.row())
                .collect()
        };
        assert_eq!(rows(Direction::Up), vec![0, 1, 3]);
        assert_eq!(rows(Direction::Down), vec![3, 1, 0]);
    }

    #[test]
    fn find_front_prefers_the_closest_resolved_tile() {
        let resolved = [tile(0, 2, 0, 0), tile(1, 4, 0, 1)];
        let front = find_front(&resolved, &[], GridCell::new(0, 3), Direction::Left)
            .expect("front tile");
        assert_eq!(front.tile.id, TileId::new(1));
        assert_eq!(front.resolved_index, Some(1));
    }

    #[test]
    fn behind_fails_outside_the_grid() {
        let positions = GridPositions::compute(GridSize::new(4));
        assert_eq!(
            behind(GridCell::new(0, 0), Direction::Down, &positions),
            None
        );
        assert_eq!(
            behind(GridCell::new(3, 3), Direction::Up, &positions),
            None
        );
        assert_eq!(
            behind(GridCell::new(2, 0), Direction::Left, &positions),
            Some(GridCell::new(2, 1))
        );
    }

    #[test]
    fn edge_cell_is_none_when_already_on_edge() {
        let positions = GridPositions::compute(GridSize::new(4));
        assert_eq!(
            edge_cell(GridCell::new(3, 1), Direction::Down, &positions),
            None
        );
        assert_eq!(
            edge_cell(GridCell::new(1, 1), Direction::Right, &positions),
            Some(GridCell::new(1, 3))
        );
    }
}
