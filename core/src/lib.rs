#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Defence pathing engine.
//!
//! This crate defines the vocabulary that connects the obstruction grid, the
//! flow-field computation, and the adapters that serialize engine state for
//! the outside world: tile coordinates, movement query results, decorative
//! tile-effect kinds, and the engine's error taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Defence.";

/// Location of a single grid tile expressed as x and y coordinates.
///
/// The origin sits in the upper-left corner of the grid; `x` grows to the
/// right and `y` grows downward, matching the row-major storage order used
/// by the obstruction matrix and the flow field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    x: u32,
    y: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based horizontal index of the tile.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based vertical index of the tile.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Computes the Euclidean distance between two tile coordinates.
    ///
    /// Adjacent orthogonal tiles are exactly `1.0` apart and adjacent
    /// diagonal tiles exactly `sqrt(2)`, which makes this the edge weight of
    /// the flow-field graph.
    #[must_use]
    pub fn euclidean_distance(self, other: TileCoord) -> f64 {
        let dx = f64::from(self.x.abs_diff(other.x));
        let dy = f64::from(self.y.abs_diff(other.y));
        dx.hypot(dy)
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Result of a movement query against the live flow field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NextHop {
    /// The unit should advance to the contained tile.
    Step(TileCoord),
    /// The queried tile is the goal itself; there is nowhere left to go.
    Terminal,
}

/// Decorative marker kinds that adapters may attach to tiles.
///
/// Effects are presentation-only: the pathing algorithm never reads them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Tile is burning.
    Fire,
    /// Units on the tile are stunned.
    Stun,
}

/// Construction failures surfaced by the engine at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The requested grid contains no tiles.
    #[error("grid dimensions {width}x{height} contain no tiles")]
    EmptyGrid {
        /// Requested number of tile columns.
        width: u32,
        /// Requested number of tile rows.
        height: u32,
    },
    /// A spawn or goal terminal falls outside the grid bounds.
    #[error("terminal {coord} lies outside the {width}x{height} grid")]
    TerminalOutOfBounds {
        /// Terminal coordinate provided by the caller.
        coord: TileCoord,
        /// Number of tile columns in the grid.
        width: u32,
        /// Number of tile rows in the grid.
        height: u32,
    },
    /// Spawn and goal occupy the same tile.
    #[error("spawn and goal both occupy {coord}")]
    TerminalsOverlap {
        /// Coordinate claimed by both terminals.
        coord: TileCoord,
    },
}

/// Errors surfaced by grid and flow-field operations.
///
/// A rejected tower placement is never an error; callers routinely attempt
/// illegal placements and receive a plain `false` instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// A coordinate fell outside the grid. Validated input never triggers
    /// this, so it indicates a caller bug and is fatal to the operation.
    #[error("coordinate {coord} lies outside the {width}x{height} grid")]
    OutOfBounds {
        /// Offending coordinate.
        coord: TileCoord,
        /// Number of tile columns in the grid.
        width: u32,
        /// Number of tile rows in the grid.
        height: u32,
    },
    /// Construction parameters describe an unusable grid.
    #[error("invalid grid geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),
    /// An open tile had no flow-field entry. The solvability invariant makes
    /// this impossible for live state, so observing it means the invariant
    /// was violated; callers should report it loudly rather than default.
    #[error("open tile {coord} has no route to the goal")]
    Unreachable {
        /// Tile whose flow-field entry was missing.
        coord: TileCoord,
    },
}
