use tilemerge_core::{
    Command, Direction, Event, GridCell, GridSize, LoadError, MergeState, MoveRejection,
    TileId, TilePlacement, TileValue,
};
use tilemerge_world::{self as world, query, Config, World};

fn placement(row: u32, column: u32, value: u64) -> TilePlacement {
    TilePlacement::new(
        GridCell::new(row, column),
        TileValue::new(value).expect("valid tile value"),
    )
}

fn loaded(placements: Vec<TilePlacement>) -> World {
    let mut world = World::new(Config::new(GridSize::new(4), 11));
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::LoadTiles { tiles: placements },
        &mut events,
    );
    assert!(
        matches!(events.first(), Some(Event::TilesLoaded { .. })),
        "unexpected load events: {events:?}"
    );
    world
}

fn checkerboard() -> Vec<TilePlacement> {
    let mut placements = Vec::new();
    for row in 0..4 {
        for column in 0..4 {
            let value = if (row + column) % 2 == 0 { 2 } else { 4 };
            placements.push(placement(row, column, value));
        }
    }
    placements
}

#[test]
fn new_game_places_two_opening_tiles() {
    let mut world = World::default();
    let mut events = Vec::new();
    world::apply(&mut world, Command::NewGame, &mut events);

    assert_eq!(events.first(), Some(&Event::GameStarted));
    let spawned = events
        .iter()
        .filter(|event| matches!(event, Event::TileSpawned { .. }))
        .count();
    assert_eq!(spawned, 2);
    assert_eq!(query::tiles(&world).len(), 2);
    assert!(!query::is_game_over(&world));
}

#[test]
fn move_reports_merges_moves_and_spawn() {
    let mut world = loaded(vec![
        placement(0, 0, 2),
        placement(0, 1, 2),
        placement(0, 3, 4),
    ]);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Move {
            direction: Direction::Left,
        },
        &mut events,
    );

    let merges: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::TilesMerged { cell, value, .. } => Some((*cell, value.get())),
            _ => None,
        })
        .collect();
    assert_eq!(merges, vec![(GridCell::new(0, 0), 4)]);

    let moved = events
        .iter()
        .filter(|event| matches!(event, Event::TileMoved { .. }))
        .count();
    assert_eq!(moved, 2, "consumed tile and trailing four both move");

    assert!(matches!(events.last(), Some(Event::TileSpawned { .. })));
    assert_eq!(query::tiles(&world).len(), 4);
    assert_eq!(query::settled_tiles(&world).len(), 3);
    assert_eq!(query::moves_made(&world), 1);
    assert_eq!(
        query::tile_at(&world, GridCell::new(0, 1)).map(|tile| tile.value.get()),
        Some(4)
    );
}

#[test]
fn completing_removal_settles_the_survivor() {
    let mut world = loaded(vec![placement(2, 0, 8), placement(2, 3, 8)]);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Move {
            direction: Direction::Right,
        },
        &mut events,
    );

    let (survivor, consumed) = events
        .iter()
        .find_map(|event| match event {
            Event::TilesMerged {
                survivor, consumed, ..
            } => Some((*survivor, *consumed)),
            _ => None,
        })
        .expect("merge event");
    assert_eq!(query::pending_animations(&world).len(), 2);

    events.clear();
    world::apply(
        &mut world,
        Command::CompleteAnimation { tile: consumed },
        &mut events,
    );

    assert_eq!(
        events,
        vec![
            Event::TileRemoved { tile: consumed },
            Event::TileSettled { tile: survivor },
        ]
    );
    assert!(query::pending_animations(&world).is_empty());
    assert_eq!(query::highest_value(&world).map(|value| value.get()), Some(16));
}

#[test]
fn completing_growth_only_idles_the_survivor() {
    let mut world = loaded(vec![placement(0, 2, 2), placement(3, 2, 2)]);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Move {
            direction: Direction::Up,
        },
        &mut events,
    );
    let survivor = events
        .iter()
        .find_map(|event| match event {
            Event::TilesMerged { survivor, .. } => Some(*survivor),
            _ => None,
        })
        .expect("merge event");

    events.clear();
    world::apply(
        &mut world,
        Command::CompleteAnimation { tile: survivor },
        &mut events,
    );

    assert_eq!(events, vec![Event::TileSettled { tile: survivor }]);
    let pending = query::pending_animations(&world);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].1, MergeState::PendingRemoval);
}

#[test]
fn completing_unknown_tile_has_no_effect() {
    let mut world = loaded(vec![placement(0, 0, 2), placement(3, 3, 4)]);
    let before = query::tiles(&world).to_vec();
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::CompleteAnimation {
            tile: TileId::new(9_999),
        },
        &mut events,
    );

    assert!(events.is_empty(), "unexpected events: {events:?}");
    assert_eq!(query::tiles(&world), before.as_slice());
}

#[test]
fn completing_idle_tile_has_no_effect() {
    let mut world = loaded(vec![placement(0, 0, 2), placement(3, 3, 4)]);
    let before = query::tiles(&world).to_vec();
    let idle = before[0].id;
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::CompleteAnimation { tile: idle },
        &mut events,
    );

    assert!(events.is_empty(), "unexpected events: {events:?}");
    assert_eq!(query::tiles(&world), before.as_slice());
}

#[test]
fn next_move_settles_leftover_animations_first() {
    let mut world = loaded(vec![placement(1, 0, 4), placement(1, 1, 4)]);
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Move {
            direction: Direction::Left,
        },
        &mut events,
    );

    events.clear();
    world::apply(
        &mut world,
        Command::Move {
            direction: Direction::Right,
        },
        &mut events,
    );

    assert!(matches!(events.first(), Some(Event::TileSettled { .. })));
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::TileRemoved { .. })));
    assert!(query::tiles(&world)
        .iter()
        .all(|tile| tile.merge_state != MergeState::PendingRemoval));
}

#[test]
fn blocked_move_leaves_board_untouched() {
    let mut world = loaded(vec![placement(3, 0, 2), placement(3, 1, 4)]);
    let before = query::tiles(&world).to_vec();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Move {
            direction: Direction::Down,
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::BoardUnchanged {
            direction: Direction::Down
        }]
    );
    assert_eq!(query::tiles(&world), before.as_slice());
    assert_eq!(query::moves_made(&world), 0);
}

#[test]
fn terminal_board_rejects_moves() {
    let mut world = World::default();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::LoadTiles {
            tiles: checkerboard(),
        },
        &mut events,
    );
    assert_eq!(events.last(), Some(&Event::GameOver));
    assert!(query::is_game_over(&world));

    events.clear();
    world::apply(
        &mut world,
        Command::Move {
            direction: Direction::Up,
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            direction: Direction::Up,
            reason: MoveRejection::GameOver,
        }]
    );
}

#[test]
fn load_rejects_invalid_placements() {
    let mut world = World::default();
    let mut events = Vec::new();

    world::apply(
        &mut world,
        Command::LoadTiles {
            tiles: vec![placement(4, 0, 2)],
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::LoadTiles {
            tiles: vec![placement(1, 1, 2), placement(1, 1, 4)],
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![
            Event::LoadRejected {
                reason: LoadError::OutOfBounds
            },
            Event::LoadRejected {
                reason: LoadError::DuplicateCell
            },
        ]
    );
    assert!(query::tiles(&world).is_empty());
}

#[test]
fn configuring_grid_resets_the_board() {
    let mut world = World::default();
    let mut events = Vec::new();
    world::apply(&mut world, Command::NewGame, &mut events);

    events.clear();
    world::apply(
        &mut world,
        Command::ConfigureGrid {
            size: GridSize::new(5),
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::GridConfigured {
            size: GridSize::new(5)
        }]
    );
    assert!(query::tiles(&world).is_empty());
    assert_eq!(query::grid_positions(&world).len(), 25);
    assert_eq!(query::grid_size(&world), GridSize::new(5));
}

#[test]
fn tile_identifiers_survive_across_games() {
    let mut world = World::default();
    let mut events = Vec::new();
    world::apply(&mut world, Command::NewGame, &mut events);
    let first: Vec<_> = query::tiles(&world).iter().map(|tile| tile.id).collect();

    world::apply(&mut world, Command::NewGame, &mut events);
    let second: Vec<_> = query::tiles(&world).iter().map(|tile| tile.id).collect();

    assert!(second.iter().all(|id| !first.contains(id)));
}

#[test]
fn small_grid_eventually_runs_out_of_moves() {
    let mut world = World::new(Config::new(GridSize::new(2), 5));
    let mut events = Vec::new();
    world::apply(&mut world, Command::NewGame, &mut events);

    for direction in Direction::ALL.into_iter().cycle().take(10_000) {
        if query::is_game_over(&world) {
            break;
        }
        world::apply(&mut world, Command::Move { direction }, &mut events);
        world::apply(&mut world, Command::SettleAnimations, &mut events);
    }

    assert!(query::is_game_over(&world));
    assert_eq!(query::settled_tiles(&world).len(), 4);
}
