//! Plain-text dump of the settled board.

use std::fmt::Write as _;

use tilemerge_core::GridCell;
use tilemerge_world::{query, World};

const EMPTY_CELL: &str = ".";

/// Formats the settled tiles as right-aligned rows of values.
pub(crate) fn format_board(world: &World) -> String {
    let size = query::grid_size(world).get();
    let width = query::highest_value(world)
        .map_or(1, |value| value.get().to_string().len())
        .max(EMPTY_CELL.len());

    let mut output = String::new();
    for row in 0..size {
        let line: Vec<String> = (0..size)
            .map(|column| {
                let label = query::tile_at(world, GridCell::new(row, column))
                    .map_or_else(|| EMPTY_CELL.to_owned(), |tile| tile.value.get().to_string());
                format!("{label:>width$}")
            })
            .collect();
        let _ = writeln!(output, "{}", line.join(" "));
    }
    output
}
