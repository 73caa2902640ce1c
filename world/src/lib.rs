#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative pathing engine for Grid Defence.
//!
//! The engine owns a rectangular obstruction grid with fixed spawn and goal
//! tiles plus the flow field derived from it: a shortest-path tree rooted at
//! the goal that answers per-unit movement queries in constant time. Every
//! obstruction mutation goes through the placement validator, which
//! simulates the change on a scratch copy of the grid and commits only when
//! every open tile keeps a route to the goal. The live grid and field are
//! replaced together, so readers never observe a tree computed from a
//! different obstruction state.

mod effects;
mod grid;
mod navigation;
mod sync;

pub use sync::SharedEngine;

use grid_defence_core::{EffectKind, GridError, NextHop, TileCoord};

use crate::{effects::EffectBoard, grid::Grid, navigation::FlowField};

/// Pathing engine combining the obstruction grid, its flow field, and the
/// decorative effect registry.
#[derive(Debug)]
pub struct PathEngine {
    grid: Grid,
    field: FlowField,
    effects: EffectBoard,
    epoch: u64,
}

impl PathEngine {
    /// Creates an engine over an all-open grid.
    ///
    /// Fails with [`GridError::InvalidGeometry`] when the dimensions contain
    /// no tiles, a terminal falls outside the grid, or spawn and goal
    /// coincide.
    pub fn new(
        width: u32,
        height: u32,
        spawn: TileCoord,
        goal: TileCoord,
    ) -> Result<Self, GridError> {
        let grid = Grid::new(width, height, spawn, goal)?;
        let field = FlowField::build(&grid);
        Ok(Self {
            grid,
            field,
            effects: EffectBoard::default(),
            epoch: 0,
        })
    }

    /// Attempts to place a tower at the tile.
    ///
    /// Placements on spawn, goal, or an already-blocked tile are rejected
    /// without touching any state, as is any placement that would strand an
    /// open tile. Rejection is an ordinary `Ok(false)`; only an out-of-range
    /// coordinate is an error. On success the obstruction and the freshly
    /// simulated flow field are committed together, so the simulation result
    /// is never recomputed.
    pub fn try_build(&mut self, tile: TileCoord) -> Result<bool, GridError> {
        if tile == self.grid.spawn() || tile == self.grid.goal() || self.grid.is_blocked(tile)? {
            return Ok(false);
        }

        let mut scratch = self.grid.clone();
        scratch.set_blocked(tile, true);

        let field = FlowField::build(&scratch);
        if field.first_stranded(&scratch).is_some() {
            return Ok(false);
        }

        self.commit_validated(tile, field);
        Ok(true)
    }

    /// Removes the tower at the tile, if one is present.
    ///
    /// Removal can only widen connectivity, so it needs no simulation: the
    /// obstruction is cleared and the flow field rebuilt. Returns `false`
    /// when the tile was already open (spawn and goal always are).
    pub fn remove_obstruction(&mut self, tile: TileCoord) -> Result<bool, GridError> {
        if !self.grid.is_blocked(tile)? {
            return Ok(false);
        }

        self.grid.set_blocked(tile, false);
        self.field = FlowField::build(&self.grid);
        self.epoch = self.epoch.wrapping_add(1);
        Ok(true)
    }

    /// Next tile a unit on `tile` should step toward.
    ///
    /// Returns [`NextHop::Terminal`] for the goal itself. Querying a blocked
    /// tile, or an open tile the flow field somehow missed, surfaces
    /// [`GridError::Unreachable`]; the latter means the solvability
    /// invariant was violated and deserves loud reporting by the caller.
    pub fn next_step(&self, tile: TileCoord) -> Result<NextHop, GridError> {
        if tile == self.grid.goal() {
            return Ok(NextHop::Terminal);
        }

        if self.grid.is_blocked(tile)? {
            return Err(GridError::Unreachable { coord: tile });
        }

        self.field
            .parent(tile)
            .map(NextHop::Step)
            .ok_or(GridError::Unreachable { coord: tile })
    }

    /// Ordered tile sequence from `tile` to the goal, both ends included.
    pub fn path_to_goal(&self, tile: TileCoord) -> Result<Vec<TileCoord>, GridError> {
        if self.grid.is_blocked(tile)? {
            return Err(GridError::Unreachable { coord: tile });
        }

        let goal = self.grid.goal();
        let mut path = Vec::new();
        let mut current = tile;

        // A healthy parent chain is strictly shorter than the tile count.
        let mut remaining = u64::from(self.grid.width()) * u64::from(self.grid.height());

        while current != goal {
            path.push(current);
            current = self
                .field
                .parent(current)
                .ok_or(GridError::Unreachable { coord: current })?;

            remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                return Err(GridError::Unreachable { coord: tile });
            }
        }

        path.push(goal);
        Ok(path)
    }

    /// Cumulative travel cost from the tile to the goal.
    pub fn cost_to_goal(&self, tile: TileCoord) -> Result<f64, GridError> {
        if self.grid.is_blocked(tile)? {
            return Err(GridError::Unreachable { coord: tile });
        }

        self.field
            .cost(tile)
            .ok_or(GridError::Unreachable { coord: tile })
    }

    /// Stored obstruction bit for the tile.
    pub fn is_blocked(&self, tile: TileCoord) -> Result<bool, GridError> {
        self.grid.is_blocked(tile)
    }

    /// Number of tile columns contained in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.grid.width()
    }

    /// Number of tile rows contained in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Fixed tile where units enter the grid.
    #[must_use]
    pub const fn spawn(&self) -> TileCoord {
        self.grid.spawn()
    }

    /// Fixed tile that every open tile can reach.
    #[must_use]
    pub const fn goal(&self) -> TileCoord {
        self.grid.goal()
    }

    /// Attaches a decorative effect marker to the tile.
    ///
    /// Effects never feed back into pathing; they exist for adapters to
    /// serialize and render.
    pub fn add_effect(&mut self, tile: TileCoord, kind: EffectKind) -> Result<(), GridError> {
        // Same bounds validation as every other tile operation.
        let _ = self.grid.is_blocked(tile)?;
        self.effects.add(tile, kind);
        Ok(())
    }

    /// Head effect marker of every affected tile, in coordinate order.
    #[must_use]
    pub fn active_effects(&self) -> Vec<(TileCoord, EffectKind)> {
        self.effects.active()
    }

    /// Ages every effect marker by one tick, dropping the expired ones.
    pub fn tick_effects(&mut self) {
        self.effects.tick();
    }

    pub(crate) const fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn grid_snapshot(&self) -> Grid {
        self.grid.clone()
    }

    pub(crate) fn commit_validated(&mut self, tile: TileCoord, field: FlowField) {
        self.grid.set_blocked(tile, true);
        self.field = field;
        self.epoch = self.epoch.wrapping_add(1);
    }
}
