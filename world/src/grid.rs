//! Obstruction grid and boundary-aware neighbor geometry.

use grid_defence_core::{GeometryError, GridError, TileCoord};

/// Dense obstruction matrix with fixed spawn and goal terminals.
///
/// The grid owns the only mutable obstruction state in the engine. Spawn and
/// goal are validated once at construction and stay unblocked for the grid's
/// lifetime; `set_blocked` is deliberately raw and relies on the placement
/// validator to preserve that guarantee.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    width: u32,
    height: u32,
    spawn: TileCoord,
    goal: TileCoord,
    blocked: Vec<bool>,
}

impl Grid {
    /// Creates an all-open grid with the provided terminals.
    pub(crate) fn new(
        width: u32,
        height: u32,
        spawn: TileCoord,
        goal: TileCoord,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::EmptyGrid { width, height }.into());
        }

        for terminal in [spawn, goal] {
            if terminal.x() >= width || terminal.y() >= height {
                return Err(GeometryError::TerminalOutOfBounds {
                    coord: terminal,
                    width,
                    height,
                }
                .into());
            }
        }

        if spawn == goal {
            return Err(GeometryError::TerminalsOverlap { coord: spawn }.into());
        }

        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);

        Ok(Self {
            width,
            height,
            spawn,
            goal,
            blocked: vec![false; capacity],
        })
    }

    /// Number of tile columns contained in the grid.
    #[must_use]
    pub(crate) const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows contained in the grid.
    #[must_use]
    pub(crate) const fn height(&self) -> u32 {
        self.height
    }

    /// Fixed tile where units enter the grid.
    #[must_use]
    pub(crate) const fn spawn(&self) -> TileCoord {
        self.spawn
    }

    /// Fixed tile that every open tile must be able to reach.
    #[must_use]
    pub(crate) const fn goal(&self) -> TileCoord {
        self.goal
    }

    /// Reports whether the coordinate lies inside the grid bounds.
    #[must_use]
    pub(crate) fn contains(&self, tile: TileCoord) -> bool {
        tile.x() < self.width && tile.y() < self.height
    }

    /// Stored obstruction bit for the tile.
    ///
    /// Out-of-range coordinates are a caller bug, never clamped.
    pub(crate) fn is_blocked(&self, tile: TileCoord) -> Result<bool, GridError> {
        self.index(tile)
            .and_then(|index| self.blocked.get(index).copied())
            .ok_or(GridError::OutOfBounds {
                coord: tile,
                width: self.width,
                height: self.height,
            })
    }

    /// Obstruction bit for a tile already known to be in bounds.
    ///
    /// Out-of-range coordinates read as blocked so neighbor loops can skip
    /// them without branching.
    #[must_use]
    pub(crate) fn blocked_bit(&self, tile: TileCoord) -> bool {
        self.index(tile)
            .and_then(|index| self.blocked.get(index).copied())
            .unwrap_or(true)
    }

    /// Raw obstruction mutation with no solvability validation.
    ///
    /// Callers own the solvability invariant; out-of-range coordinates are
    /// ignored, mirroring the occupancy writes elsewhere in the workspace.
    pub(crate) fn set_blocked(&mut self, tile: TileCoord, value: bool) {
        if let Some(index) = self.index(tile) {
            if let Some(slot) = self.blocked.get_mut(index) {
                *slot = value;
            }
        }
    }

    /// Up-to-4 orthogonal neighbors of the tile, clipped at the boundary.
    ///
    /// A corner tile yields 2 neighbors, an edge tile 3, an interior tile 4.
    #[must_use]
    pub(crate) fn neighbors4(&self, tile: TileCoord) -> NeighborIter {
        let mut neighbors = NeighborIter::default();

        if tile.y() > 0 {
            neighbors.push(TileCoord::new(tile.x(), tile.y() - 1));
        }
        if tile.x() + 1 < self.width {
            neighbors.push(TileCoord::new(tile.x() + 1, tile.y()));
        }
        if tile.y() + 1 < self.height {
            neighbors.push(TileCoord::new(tile.x(), tile.y() + 1));
        }
        if tile.x() > 0 {
            neighbors.push(TileCoord::new(tile.x() - 1, tile.y()));
        }

        neighbors
    }

    /// Up-to-4 diagonal neighbors of the tile, clipped at the boundary.
    #[must_use]
    pub(crate) fn neighbors_diagonal(&self, tile: TileCoord) -> NeighborIter {
        let mut neighbors = NeighborIter::default();

        if tile.x() > 0 && tile.y() > 0 {
            neighbors.push(TileCoord::new(tile.x() - 1, tile.y() - 1));
        }
        if tile.x() + 1 < self.width && tile.y() > 0 {
            neighbors.push(TileCoord::new(tile.x() + 1, tile.y() - 1));
        }
        if tile.x() + 1 < self.width && tile.y() + 1 < self.height {
            neighbors.push(TileCoord::new(tile.x() + 1, tile.y() + 1));
        }
        if tile.x() > 0 && tile.y() + 1 < self.height {
            neighbors.push(TileCoord::new(tile.x() - 1, tile.y() + 1));
        }

        neighbors
    }

    pub(crate) fn index(&self, tile: TileCoord) -> Option<usize> {
        if self.contains(tile) {
            let row = usize::try_from(tile.y()).ok()?;
            let column = usize::try_from(tile.x()).ok()?;
            let width = usize::try_from(self.width).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Fixed-capacity iterator over boundary-clipped neighbor coordinates.
#[derive(Clone, Debug, Default)]
pub(crate) struct NeighborIter {
    buffer: [Option<TileCoord>; 4],
    len: usize,
    cursor: usize,
}

impl NeighborIter {
    fn push(&mut self, tile: TileCoord) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(tile);
            self.len += 1;
        }
    }
}

impl Iterator for NeighborIter {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }

        let value = self.buffer[self.cursor];
        self.cursor += 1;
        value
    }
}
