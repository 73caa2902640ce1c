//! Mutual-exclusion discipline for sharing one engine across callers.
//!
//! The engine itself is synchronous; when several connections drive
//! placements concurrently, access to the single grid-plus-field pair must
//! be serialized so a movement query never reads a tree computed from a
//! different obstruction state. [`SharedEngine`] keeps the expensive scratch
//! simulation outside the lock: it snapshots the grid, simulates on the
//! private copy, then commits under the lock if no other mutation landed in
//! between.

use std::sync::{Arc, Mutex, MutexGuard};

use grid_defence_core::{EffectKind, GridError, NextHop, TileCoord};

use crate::{navigation::FlowField, PathEngine};

/// Clonable handle that serializes access to a single [`PathEngine`].
#[derive(Clone, Debug)]
pub struct SharedEngine {
    inner: Arc<Mutex<PathEngine>>,
}

impl SharedEngine {
    /// Wraps the engine for shared use.
    #[must_use]
    pub fn new(engine: PathEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Attempts a tower placement, simulating outside the lock.
    ///
    /// The grid snapshot carries an epoch counter; if another mutation
    /// committed while this call was simulating, the stale simulation is
    /// discarded and the placement is re-validated against the fresh grid
    /// under the lock.
    pub fn try_build(&self, tile: TileCoord) -> Result<bool, GridError> {
        let (mut scratch, epoch) = {
            let engine = self.lock();
            if tile == engine.spawn() || tile == engine.goal() || engine.is_blocked(tile)? {
                return Ok(false);
            }
            (engine.grid_snapshot(), engine.epoch())
        };

        scratch.set_blocked(tile, true);
        let field = FlowField::build(&scratch);
        if field.first_stranded(&scratch).is_some() {
            return Ok(false);
        }

        let mut engine = self.lock();
        if engine.epoch() == epoch {
            engine.commit_validated(tile, field);
            Ok(true)
        } else {
            engine.try_build(tile)
        }
    }

    /// Removes the tower at the tile, if one is present.
    pub fn remove_obstruction(&self, tile: TileCoord) -> Result<bool, GridError> {
        self.lock().remove_obstruction(tile)
    }

    /// Next tile a unit on `tile` should step toward.
    pub fn next_step(&self, tile: TileCoord) -> Result<NextHop, GridError> {
        self.lock().next_step(tile)
    }

    /// Ordered tile sequence from `tile` to the goal.
    pub fn path_to_goal(&self, tile: TileCoord) -> Result<Vec<TileCoord>, GridError> {
        self.lock().path_to_goal(tile)
    }

    /// Cumulative travel cost from the tile to the goal.
    pub fn cost_to_goal(&self, tile: TileCoord) -> Result<f64, GridError> {
        self.lock().cost_to_goal(tile)
    }

    /// Stored obstruction bit for the tile.
    pub fn is_blocked(&self, tile: TileCoord) -> Result<bool, GridError> {
        self.lock().is_blocked(tile)
    }

    /// Attaches a decorative effect marker to the tile.
    pub fn add_effect(&self, tile: TileCoord, kind: EffectKind) -> Result<(), GridError> {
        self.lock().add_effect(tile, kind)
    }

    /// Head effect marker of every affected tile, in coordinate order.
    #[must_use]
    pub fn active_effects(&self) -> Vec<(TileCoord, EffectKind)> {
        self.lock().active_effects()
    }

    /// Ages every effect marker by one tick.
    pub fn tick_effects(&self) {
        self.lock().tick_effects();
    }

    fn lock(&self) -> MutexGuard<'_, PathEngine> {
        match self.inner.lock() {
            Ok(guard) => guard,
            // The engine holds no invariant-breaking intermediate state, so
            // a poisoned lock still guards a consistent grid-field pair.
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn shared_4x4() -> SharedEngine {
        let engine = PathEngine::new(4, 4, TileCoord::new(0, 0), TileCoord::new(3, 3))
            .expect("valid geometry");
        SharedEngine::new(engine)
    }

    #[test]
    fn shared_handle_commits_validated_placements() {
        let shared = shared_4x4();
        let tile = TileCoord::new(1, 1);

        assert_eq!(shared.try_build(tile), Ok(true));
        assert_eq!(shared.is_blocked(tile), Ok(true));
        assert_eq!(shared.try_build(tile), Ok(false));
    }

    #[test]
    fn concurrent_builders_never_strand_a_tile() {
        let shared = shared_4x4();

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for y in 0..4 {
                        let _ = shared
                            .try_build(TileCoord::new(worker, y))
                            .expect("coordinates are in bounds");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("worker completed");
        }

        for x in 0..4 {
            for y in 0..4 {
                let tile = TileCoord::new(x, y);
                if !shared.is_blocked(tile).expect("in bounds") {
                    assert!(
                        shared.next_step(tile).is_ok(),
                        "open tile {tile} lost its route",
                    );
                }
            }
        }
    }
}
