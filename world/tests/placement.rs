use grid_defence_core::{GridError, NextHop, TileCoord};
use grid_defence_world::PathEngine;

fn engine(width: u32, height: u32, spawn: TileCoord, goal: TileCoord) -> PathEngine {
    PathEngine::new(width, height, spawn, goal).expect("valid geometry")
}

fn assert_every_open_tile_routes_to_goal(engine: &PathEngine) {
    for y in 0..engine.height() {
        for x in 0..engine.width() {
            let tile = TileCoord::new(x, y);
            if engine.is_blocked(tile).expect("in bounds") {
                continue;
            }

            let path = engine
                .path_to_goal(tile)
                .unwrap_or_else(|error| panic!("open tile {tile} lost its route: {error}"));
            assert_eq!(path.last(), Some(&engine.goal()));
        }
    }
}

#[test]
fn solvability_survives_arbitrary_build_and_remove_sequences() {
    let mut engine = engine(8, 6, TileCoord::new(0, 0), TileCoord::new(7, 5));

    let attempts = [
        TileCoord::new(3, 0),
        TileCoord::new(3, 1),
        TileCoord::new(3, 2),
        TileCoord::new(3, 3),
        TileCoord::new(3, 4),
        TileCoord::new(3, 5),
        TileCoord::new(5, 5),
        TileCoord::new(5, 4),
        TileCoord::new(1, 2),
        TileCoord::new(6, 1),
    ];

    for tile in attempts {
        let _ = engine.try_build(tile).expect("in bounds");
        assert_every_open_tile_routes_to_goal(&engine);
    }

    for tile in [TileCoord::new(3, 2), TileCoord::new(5, 5)] {
        let _ = engine.remove_obstruction(tile).expect("in bounds");
        assert_every_open_tile_routes_to_goal(&engine);
    }
}

#[test]
fn sealing_the_grid_off_is_rejected() {
    // A full vertical wall would cut the left half from the goal; exactly
    // one of the six column tiles must be refused.
    let mut engine = engine(8, 6, TileCoord::new(0, 0), TileCoord::new(7, 5));
    let mut rejected = 0;

    for y in 0..6 {
        if !engine.try_build(TileCoord::new(3, y)).expect("in bounds") {
            rejected += 1;
        }
    }

    assert_eq!(rejected, 1, "only the sealing tile should be refused");
    assert_every_open_tile_routes_to_goal(&engine);
}

#[test]
fn rejection_leaves_every_obstruction_bit_untouched() {
    let spawn = TileCoord::new(0, 0);
    let goal = TileCoord::new(4, 4);
    let mut engine = engine(5, 5, spawn, goal);
    let tower = TileCoord::new(2, 2);
    assert_eq!(engine.try_build(tower), Ok(true));

    let snapshot: Vec<bool> = (0..5)
        .flat_map(|y| (0..5).map(move |x| TileCoord::new(x, y)))
        .map(|tile| engine.is_blocked(tile).expect("in bounds"))
        .collect();

    for _ in 0..2 {
        assert_eq!(engine.try_build(spawn), Ok(false));
        assert_eq!(engine.try_build(goal), Ok(false));
        assert_eq!(engine.try_build(tower), Ok(false));
    }

    let after: Vec<bool> = (0..5)
        .flat_map(|y| (0..5).map(move |x| TileCoord::new(x, y)))
        .map(|tile| engine.is_blocked(tile).expect("in bounds"))
        .collect();
    assert_eq!(snapshot, after, "rejected placements must not mutate");
}

#[test]
fn single_tile_corridor_cannot_be_sealed() {
    let mut engine = engine(1, 5, TileCoord::new(0, 0), TileCoord::new(0, 4));

    for y in 1..4 {
        assert_eq!(
            engine.try_build(TileCoord::new(0, y)),
            Ok(false),
            "blocking the only corridor tile at row {y} must be refused",
        );
    }

    assert_every_open_tile_routes_to_goal(&engine);
}

#[test]
fn removal_restores_connectivity() {
    let mut engine = engine(5, 5, TileCoord::new(0, 2), TileCoord::new(4, 2));

    // Wall off most of the middle column, then widen the detour again.
    for y in [0, 1, 3, 4] {
        assert_eq!(engine.try_build(TileCoord::new(2, y)), Ok(true));
    }
    let narrow_cost = engine.cost_to_goal(TileCoord::new(0, 0)).expect("open");

    assert_eq!(engine.remove_obstruction(TileCoord::new(2, 0)), Ok(true));
    let widened_cost = engine.cost_to_goal(TileCoord::new(0, 0)).expect("open");

    assert!(widened_cost <= narrow_cost);
    assert_every_open_tile_routes_to_goal(&engine);

    assert_eq!(engine.remove_obstruction(TileCoord::new(2, 0)), Ok(false));
}

#[test]
fn committed_placement_updates_movement_queries_immediately() {
    let mut engine = engine(3, 3, TileCoord::new(0, 0), TileCoord::new(2, 2));

    assert_eq!(
        engine.next_step(TileCoord::new(1, 1)),
        Ok(NextHop::Step(TileCoord::new(2, 2)))
    );

    assert_eq!(engine.try_build(TileCoord::new(1, 1)), Ok(true));
    assert_eq!(
        engine.next_step(TileCoord::new(1, 1)),
        Err(GridError::Unreachable {
            coord: TileCoord::new(1, 1)
        })
    );
    assert_every_open_tile_routes_to_goal(&engine);
}
