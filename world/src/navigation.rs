//! Goal-rooted flow field built by a min-cost Dijkstra sweep.
//!
//! The field stores, for every tile that can reach the goal under the
//! current obstructions, the next tile to step toward and the cumulative
//! travel cost. Orthogonal steps cost `1.0`, diagonal steps `sqrt(2)`, and a
//! diagonal edge is removed entirely when both tiles forming its corner are
//! blocked. The field is always rebuilt from scratch; at the grid sizes this
//! engine targets a full recomputation is cheaper to reason about than
//! incremental shortest-path-tree repair.

use std::{cmp::Ordering, collections::BinaryHeap};

use grid_defence_core::TileCoord;

use crate::grid::Grid;

/// Dense shortest-path tree rooted at the grid's goal tile.
///
/// Costs default to `f64::INFINITY` for tiles without a route so callers can
/// distinguish walls and stranded tiles from traversable ones.
#[derive(Clone, Debug)]
pub(crate) struct FlowField {
    width: u32,
    height: u32,
    parents: Vec<Option<TileCoord>>,
    costs: Vec<f64>,
}

impl FlowField {
    /// Computes the flow field for the provided obstruction grid.
    #[must_use]
    pub(crate) fn build(grid: &Grid) -> Self {
        let width = grid.width();
        let height = grid.height();
        let cell_count_u64 = u64::from(width) * u64::from(height);
        let cell_count = usize::try_from(cell_count_u64).unwrap_or(0);

        let mut field = Self {
            width,
            height,
            parents: vec![None; cell_count],
            costs: vec![f64::INFINITY; cell_count],
        };

        let goal = grid.goal();
        let Some(goal_index) = grid.index(goal) else {
            return field;
        };

        field.costs[goal_index] = 0.0;

        let mut frontier = BinaryHeap::new();
        frontier.push(FrontierEntry {
            cost: 0.0,
            tile: goal,
        });

        while let Some(entry) = frontier.pop() {
            let Some(current_index) = grid.index(entry.tile) else {
                continue;
            };

            // Stale heap entry from an earlier, more expensive relaxation.
            if entry.cost > field.costs[current_index] {
                continue;
            }

            for neighbor in grid.neighbors4(entry.tile) {
                relax(grid, &mut field, &mut frontier, entry, neighbor);
            }

            for neighbor in grid.neighbors_diagonal(entry.tile) {
                if corner_cut(grid, entry.tile, neighbor) {
                    continue;
                }
                relax(grid, &mut field, &mut frontier, entry, neighbor);
            }
        }

        field
    }

    /// Next tile to step toward from the provided tile, if it has a route.
    ///
    /// Returns `None` both for the goal itself and for tiles without a field
    /// entry; callers disambiguate via the grid's goal coordinate.
    #[must_use]
    pub(crate) fn parent(&self, tile: TileCoord) -> Option<TileCoord> {
        self.index(tile).and_then(|index| self.parents[index])
    }

    /// Cumulative travel cost from the tile to the goal, if reachable.
    #[must_use]
    pub(crate) fn cost(&self, tile: TileCoord) -> Option<f64> {
        self.index(tile)
            .map(|index| self.costs[index])
            .filter(|cost| cost.is_finite())
    }

    /// First open tile without a field entry, scanning in row-major order.
    ///
    /// The placement validator rejects any candidate obstruction for which
    /// this returns `Some`.
    #[must_use]
    pub(crate) fn first_stranded(&self, grid: &Grid) -> Option<TileCoord> {
        for y in 0..self.height {
            for x in 0..self.width {
                let tile = TileCoord::new(x, y);
                if !grid.blocked_bit(tile) && self.cost(tile).is_none() {
                    return Some(tile);
                }
            }
        }

        None
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if tile.x() >= self.width || tile.y() >= self.height {
            return None;
        }

        let row = usize::try_from(tile.y()).ok()?;
        let column = usize::try_from(tile.x()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }
}

fn relax(
    grid: &Grid,
    field: &mut FlowField,
    frontier: &mut BinaryHeap<FrontierEntry>,
    current: FrontierEntry,
    neighbor: TileCoord,
) {
    if grid.blocked_bit(neighbor) {
        return;
    }

    let Some(neighbor_index) = grid.index(neighbor) else {
        return;
    };

    let candidate = current.cost + current.tile.euclidean_distance(neighbor);
    if candidate < field.costs[neighbor_index] {
        field.costs[neighbor_index] = candidate;
        field.parents[neighbor_index] = Some(current.tile);
        frontier.push(FrontierEntry {
            cost: candidate,
            tile: neighbor,
        });
    }
}

/// Reports whether the diagonal move between `a` and `b` squeezes through a
/// fully blocked corner.
///
/// The two corner tiles are the tiles orthogonally adjacent to both ends of
/// the diagonal. One open corner is enough to keep the edge; only when both
/// are blocked does the edge disappear. Blocked tiles never join the tree
/// themselves but still participate here as corners.
fn corner_cut(grid: &Grid, a: TileCoord, b: TileCoord) -> bool {
    let first = TileCoord::new(a.x(), b.y());
    let second = TileCoord::new(b.x(), a.y());
    grid.blocked_bit(first) && grid.blocked_bit(second)
}

/// Frontier entry ordered so the cheapest tile pops first.
///
/// Equal costs fall back to row-major coordinate order, which makes the
/// sweep, and therefore the chosen tree among equal-cost alternatives, fully
/// deterministic.
#[derive(Clone, Copy, Debug)]
struct FrontierEntry {
    cost: f64,
    tile: TileCoord,
}

impl FrontierEntry {
    fn rank(&self) -> (u32, u32) {
        (self.tile.y(), self.tile.x())
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap, so compare costs reversed.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.rank().cmp(&self.rank()))
    }
}
